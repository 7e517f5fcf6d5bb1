use actix_web::{http::header::ContentType, http::StatusCode, HttpResponse, ResponseError};
use contactdb::store::StoreError;
use thiserror::Error;

use crate::views;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Contact store failure: {0}")]
    Store(#[from] StoreError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("❌ {}", self);

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(views::error_page("Something went wrong while handling your request."))
    }
}
