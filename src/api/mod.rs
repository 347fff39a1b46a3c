pub mod calendar;
pub mod health;
pub mod leave_request;
pub mod policy;
pub mod user;

use actix_web::{Error, HttpRequest, error::{JsonPayloadError, PathError, QueryPayloadError}};

use crate::error::AppError;

// Extractor failures surface in the same error envelope as everything else.

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::Validation(format!("Invalid JSON body: {err}")).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::Validation(format!("Invalid query string: {err}")).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    AppError::Validation(format!("Invalid path parameter: {err}")).into()
}
