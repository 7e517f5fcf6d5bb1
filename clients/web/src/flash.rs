use actix_web::{cookie::Cookie, HttpRequest};

pub const NOTICE_COOKIE: &str = "contact_notice";

/// One-shot message shown on the next contact list render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    Deleted,
    Updated,
}

impl Notice {
    fn cookie_value(&self) -> &'static str {
        match self {
            Notice::Added => "added",
            Notice::Deleted => "deleted",
            Notice::Updated => "updated",
        }
    }

    fn from_cookie_value(value: &str) -> Option<Self> {
        match value {
            "added" => Some(Notice::Added),
            "deleted" => Some(Notice::Deleted),
            "updated" => Some(Notice::Updated),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::Added => "Data has been added.",
            Notice::Deleted => "Data has been deleted.",
            Notice::Updated => "Data has been updated.",
        }
    }

    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build(NOTICE_COOKIE, self.cookie_value())
            .path("/")
            .http_only(true)
            .finish()
    }
}

/// The pending notice, if any, plus the cookie that clears it
pub fn take_notice(req: &HttpRequest) -> (Option<Notice>, Option<Cookie<'static>>) {
    let Some(cookie) = req.cookie(NOTICE_COOKIE) else {
        return (None, None);
    };

    let mut removal = Cookie::build(NOTICE_COOKIE, "").path("/").finish();
    removal.make_removal();

    (Notice::from_cookie_value(cookie.value()), Some(removal))
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn notice_is_read_and_cleared() {
        let req = TestRequest::default()
            .cookie(Notice::Updated.cookie())
            .to_http_request();

        let (notice, removal) = take_notice(&req);

        assert_eq!(notice, Some(Notice::Updated));
        assert_eq!(removal.map(|c| c.value().to_string()), Some(String::new()));
    }

    #[test]
    fn unknown_values_are_ignored_but_cleared() {
        let req = TestRequest::default()
            .cookie(Cookie::new(NOTICE_COOKIE, "bogus"))
            .to_http_request();

        let (notice, removal) = take_notice(&req);

        assert_eq!(notice, None);
        assert!(removal.is_some());
    }

    #[test]
    fn no_cookie_no_notice() {
        let req = TestRequest::default().to_http_request();

        let (notice, removal) = take_notice(&req);

        assert_eq!(notice, None);
        assert!(removal.is_none());
    }
}
