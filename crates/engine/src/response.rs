//! Uniform result shape handed to callers.
//!
//! Every operation can be folded into `{ success, message?, data? }`. A
//! `success: false` response is authoritative even when `data` is present.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T> From<EngineError> for Response<T> {
    fn from(err: EngineError) -> Self {
        if let EngineError::Database(db_err) = &err {
            tracing::error!("database error: {db_err}");
        }
        Self::failure(err.to_string())
    }
}

impl<T> From<ResultEngine<T>> for Response<T> {
    fn from(result: ResultEngine<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => err.into(),
        }
    }
}
