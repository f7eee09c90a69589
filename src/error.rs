// ABOUTME: Error types for pdfchat: input validation, service calls, and export.
// ABOUTME: Validation messages double as the user-facing notice text.

use std::path::PathBuf;

use thiserror::Error;

/// A user action rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The service is not ready yet.")]
    NotReady,
    #[error("Please upload a valid PDF file.")]
    NotPdf,
    #[error("Please upload a PDF first.")]
    NoDocument,
    #[error("Please enter a question.")]
    EmptyQuestion,
}

/// A failed call to the question-answering service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("{endpoint} returned an unexpected body: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    /// The service answered successfully but reported an error in the body.
    #[error("service rejected the request: {0}")]
    Rejected(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failed transcript export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not fetch the stored transcript: {0}")]
    Fetch(#[from] ServiceError),

    #[error("could not render the summary document: {0}")]
    Render(#[from] lopdf::Error),

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::NotPdf.to_string(),
            "Please upload a valid PDF file."
        );
        assert_eq!(
            ValidationError::NoDocument.to_string(),
            "Please upload a PDF first."
        );
        assert_eq!(
            ValidationError::EmptyQuestion.to_string(),
            "Please enter a question."
        );
    }

    #[test]
    fn status_error_names_endpoint() {
        let err = ServiceError::Status {
            endpoint: "/upload",
            status: 500,
        };
        assert_eq!(err.to_string(), "/upload returned HTTP 500");
    }

    #[test]
    fn export_error_wraps_service_error() {
        let err: ExportError = ServiceError::Rejected("gone".to_string()).into();
        assert!(err.to_string().contains("gone"));
    }
}
