//! Server-rendered pages. Every user-supplied value goes through `escape_html` (text and
//! attributes) or `encode_path_segment` (links) before it lands in the markup.

use contactdb::model::contact::Contact;

use crate::{flash::Notice, forms::ContactForm, validation::FieldError};

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Percent-encodes everything outside the RFC 3986 unreserved set
pub fn encode_path_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());

    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }

    encoded
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Contact App</title>
</head>
<body>
<nav>
<a href="/">Home</a>
<a href="/about">About</a>
<a href="/contact">Contact</a>
</nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

pub fn index_page() -> String {
    layout(
        "Home",
        r#"<h1>Contact App</h1>
<p>Keep track of the people you know.</p>
<p><a href="/contact">Open contacts</a></p>"#,
    )
}

pub fn about_page() -> String {
    layout(
        "About",
        r#"<h1>About</h1>
<p>A small address book. Add, edit and remove contacts with a name, phone number and email.</p>"#,
    )
}

pub fn contact_list_page(contacts: &[Contact], notice: Option<Notice>) -> String {
    let mut body = String::from("<h1>Contacts</h1>\n");

    if let Some(notice) = notice {
        body.push_str(&format!(
            "<p class=\"notice\" role=\"status\">{}</p>\n",
            escape_html(notice.message())
        ));
    }

    body.push_str("<p><a href=\"/contact/add\">Add contact</a></p>\n");

    if contacts.is_empty() {
        body.push_str("<p>No contacts yet.</p>");
        return layout("Contacts", &body);
    }

    body.push_str("<table>\n<thead><tr><th>#</th><th>Name</th><th>Phone Number</th><th></th></tr></thead>\n<tbody>\n");

    for (position, contact) in contacts.iter().enumerate() {
        let id = contact.id.as_str();

        body.push_str(&format!(
            r#"<tr>
<td>{position}</td>
<td>{name}</td>
<td>{number}</td>
<td>
<a href="/contact/{link}">Detail</a>
<a href="/contact/edit/{link}">Edit</a>
<form action="/contact/delete?_method=DELETE" method="post">
<input type="hidden" name="id" value="{id}">
<button type="submit">Delete</button>
</form>
</td>
</tr>
"#,
            position = position + 1,
            name = escape_html(&contact.name),
            number = escape_html(&contact.number),
            link = encode_path_segment(id),
            id = escape_html(id),
        ));
    }

    body.push_str("</tbody>\n</table>");

    layout("Contacts", &body)
}

fn error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items: String = errors
        .iter()
        .map(|error| {
            format!(
                "<li data-field=\"{}\">{}</li>",
                error.field,
                escape_html(error.message)
            )
        })
        .collect();

    format!("<ul class=\"errors\" role=\"alert\">{}</ul>\n", items)
}

fn contact_fields(values: &ContactForm) -> String {
    format!(
        r#"<label>First Name <input type="text" name="fName" value="{first_name}"></label>
<label>Last Name <input type="text" name="lName" value="{last_name}"></label>
<label>Phone Number <input type="text" name="number" value="{number}"></label>
<label>Email <input type="text" name="email" value="{email}"></label>
"#,
        first_name = escape_html(&values.first_name),
        last_name = escape_html(&values.last_name),
        number = escape_html(&values.number),
        email = escape_html(&values.email),
    )
}

/// Add form; re-rendered with the submitted values when validation fails
pub fn add_contact_page(values: &ContactForm, errors: &[FieldError]) -> String {
    let body = format!(
        r#"<h1>Add Contact</h1>
{errors}<form action="/contact" method="post">
{fields}<button type="submit">Add</button>
</form>
<p><a href="/contact">Back</a></p>"#,
        errors = error_list(errors),
        fields = contact_fields(values),
    );

    layout("Add Contact", &body)
}

pub fn edit_contact_page(editing: &Contact, values: &ContactForm, errors: &[FieldError]) -> String {
    let body = format!(
        r#"<h1>Edit Contact</h1>
{errors}<form action="/contact?_method=PUT" method="post">
<input type="hidden" name="id" value="{id}">
<input type="hidden" name="oldName" value="{old_name}">
{fields}<button type="submit">Save</button>
</form>
<p><a href="/contact">Back</a></p>"#,
        errors = error_list(errors),
        id = escape_html(editing.id.as_str()),
        old_name = escape_html(&editing.name),
        fields = contact_fields(values),
    );

    layout("Edit Contact", &body)
}

pub fn contact_detail_page(contact: &Contact) -> String {
    let id = contact.id.as_str();

    let body = format!(
        r#"<h1>{name}</h1>
<dl>
<dt>Phone Number</dt><dd>{number}</dd>
<dt>Email</dt><dd>{email}</dd>
</dl>
<p>
<a href="/contact/edit/{link}">Edit</a>
<a href="/contact/delete/{link}">Delete</a>
<a href="/contact">Back</a>
</p>"#,
        name = escape_html(&contact.name),
        number = escape_html(&contact.number),
        email = escape_html(&contact.email),
        link = encode_path_segment(id),
    );

    layout("Contact Detail", &body)
}

pub fn not_found_page() -> String {
    layout(
        "Not Found",
        r#"<h1>404</h1>
<p>Page not found.</p>
<p><a href="/">Home</a></p>"#,
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!("<h1>Error</h1>\n<p>{}</p>", escape_html(message)),
    )
}

#[cfg(test)]
mod tests {
    use contactdb::consts::consts::EntityId;

    use super::*;

    fn script_contact() -> Contact {
        Contact {
            id: EntityId::from("<id>"),
            name: "<script>alert('x')</script>".to_string(),
            number: "081234567890".to_string(),
            email: "a&b@example.com".to_string(),
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn encodes_path_segments() {
        assert_eq!(encode_path_segment("Budi Santoso"), "Budi%20Santoso");
        assert_eq!(encode_path_segment("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(encode_path_segment("Zoë"), "Zo%C3%AB");
    }

    #[test]
    fn pages_never_echo_raw_contact_data() {
        let contact = script_contact();

        let pages = [
            contact_list_page(&[contact.clone()], None),
            contact_detail_page(&contact),
            edit_contact_page(&contact, &ContactForm::from_contact(&contact), &[]),
        ];

        for page in pages {
            assert!(!page.contains("<script>"), "{}", page);
            assert!(!page.contains("<id>"), "{}", page);
            assert!(page.contains("&lt;script&gt;"), "{}", page);
        }
    }

    #[test]
    fn list_shows_notice_and_empty_state() {
        let page = contact_list_page(&[], Some(Notice::Deleted));

        assert!(page.contains("Data has been deleted."));
        assert!(page.contains("No contacts yet."));
    }

    #[test]
    fn forms_list_every_error() {
        let errors = vec![
            FieldError::duplicate_name(),
            FieldError {
                field: "email",
                message: crate::validation::EMAIL_NOT_VALID,
            },
        ];

        let page = add_contact_page(&ContactForm::default(), &errors);

        assert!(page.contains("Name is already used!"));
        assert!(page.contains("Email is not valid!"));
    }
}
