pub mod upload_response;

pub use upload_response::UploadResponse;
