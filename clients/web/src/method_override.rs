use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    web, Error,
};
use actix_web_lab::middleware::Next;
use serde::Deserialize;

#[derive(Deserialize)]
struct MethodOverrideQuery {
    #[serde(rename = "_method")]
    method: Option<String>,
}

/// HTML forms can only POST; `POST /contact?_method=PUT` is routed as `PUT /contact`
pub fn overridden_method(method: &Method, query_string: &str) -> Option<Method> {
    if method != Method::POST {
        return None;
    }

    let query = web::Query::<MethodOverrideQuery>::from_query(query_string).ok()?;

    match query.method.as_deref()?.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

pub async fn method_override(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if let Some(method) = overridden_method(req.method(), req.query_string()) {
        log::debug!("Method override: {} -> {}", req.method(), method);
        req.head_mut().method = method;
    }

    next.call(req).await
}
