use serde::{Deserialize, Serialize};

/// Standard `{ data, message }` envelope wrapping most API payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
