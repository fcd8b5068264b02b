use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{error}")]
pub struct ServiceError {
    pub error: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn from_body(body: &Value) -> Option<Self> {
        body.as_object()?
            .get("error")?
            .as_str()
            .filter(|message| !message.trim().is_empty())
            .map(Self::new)
    }
}
