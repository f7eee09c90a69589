// ABOUTME: Service module: the remote PDF question-answering backend as seen by the client.
// ABOUTME: Defines the QaService seam, its wire types, and the HTTP implementation.

pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::error::ServiceError;

pub use http::HttpService;
pub use types::{AskResponse, ExportResponse, QaPair, UploadFile};

/// The operations the backend exposes. Implemented over HTTP in production and
/// by in-memory fakes in tests.
#[async_trait]
pub trait QaService: Send + Sync {
    /// Liveness probe. Any success status means the service is ready.
    async fn health(&self) -> Result<(), ServiceError>;

    /// Upload a PDF for ingestion. The response body is ignored.
    async fn upload(&self, file: UploadFile) -> Result<(), ServiceError>;

    /// Ask a question about a previously uploaded file and return the answer text.
    async fn ask(&self, filename: &str, question: &str) -> Result<String, ServiceError>;

    /// Fetch the question/answer pairs the service has stored for a file.
    async fn fetch_transcript(&self, filename: &str) -> Result<Vec<QaPair>, ServiceError>;
}
