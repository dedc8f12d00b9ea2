use crate::models::UploadResponse;
use crate::utils::file_type::Rejection;
use actix_multipart::MultipartError;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;

/// Everything that ends an upload request early. The display string is the
/// message sent back to the client.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please upload a valid image")]
    NoImage,
    #[error("Please upload at least one valid image")]
    NoImages,
    #[error("Error: You can only upload images")]
    InvalidType(Rejection),
    #[error("Unexpected field")]
    UnexpectedField,
    #[error("File too large")]
    FileTooLarge,
    #[error("Malformed multipart body")]
    Multipart(#[from] MultipartError),
    #[error("Internal server error")]
    Io(#[from] std::io::Error),
    #[error("Internal server error")]
    Blocking(#[from] BlockingError),
}

impl ResponseError for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Io(_) | UploadError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("Upload failed: {:?}", self);
        }
        HttpResponse::build(self.status_code()).json(UploadResponse::new(self.to_string()))
    }
}
