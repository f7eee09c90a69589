// ABOUTME: Wire types for the question-answering service: request payloads and JSON bodies.
// ABOUTME: QaPair is shared by the transcript, the export fetch, and the summary document.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// One question and the answer it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A PDF ready to be sent as the `file` multipart field.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Body of a `/ask` response.
///
/// The service answers `200` with `{"error": ...}` when it has nothing stored
/// for the file, so both fields are optional on the wire.
#[derive(Debug, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AskResponse {
    /// Resolve the body into the answer text or a rejection.
    pub fn into_answer(self) -> Result<String, ServiceError> {
        match (self.answer, self.error) {
            (Some(answer), _) => Ok(answer),
            (None, Some(error)) => Err(ServiceError::Rejected(error)),
            (None, None) => Err(ServiceError::Decode {
                endpoint: "/ask",
                message: "response has neither `answer` nor `error`".to_string(),
            }),
        }
    }
}

/// Body of an `/export-pdf` response.
#[derive(Debug, Deserialize)]
pub struct ExportResponse {
    #[serde(default)]
    pub qa_pairs: Vec<QaPair>,
}
