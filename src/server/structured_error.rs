use std::fmt::Display;

use serde::Serialize;

/// Trait for mapping errors to structured error codes and optional tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    pub success: bool,
    pub messages: Vec<ErrorMessage>,
}

impl StructuredError {
    #[must_use]
    pub fn new(code: &str, message: String) -> Self {
        Self {
            success: false,
            messages: vec![ErrorMessage {
                code: code.to_string(),
                message,
                tip: None,
            }],
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: &str) -> Self {
        if let Some(msg) = self.messages.first_mut() {
            msg.tip = Some(tip.to_string());
        }
        self
    }

    /// Build from an error using its `Display` text as the message.
    #[must_use]
    pub fn from_error<E: ToStructuredError + Display>(err: &E) -> Self {
        Self::from_parts(err, err.to_string())
    }

    /// Build from an error but with a caller-supplied message.
    #[must_use]
    pub fn from_parts<E: ToStructuredError>(err: &E, message: String) -> Self {
        let (code, tip) = err.error_code_and_tip();
        let se = Self::new(code, message);
        if let Some(tip) = tip {
            se.with_tip(tip)
        } else {
            se
        }
    }
}

#[cfg(test)]
#[path = "structured_error_tests.rs"]
mod structured_error_tests;
