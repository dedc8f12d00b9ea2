use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub message: String,
}

impl UploadResponse {
    pub fn new(message: impl Into<String>) -> Self {
        UploadResponse {
            message: message.into(),
        }
    }
}
