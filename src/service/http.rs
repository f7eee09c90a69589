// ABOUTME: HTTP implementation of QaService using reqwest.
// ABOUTME: Talks to /healthz, /upload, /ask, and /export-pdf on a configurable base URL.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

use crate::error::ServiceError;
use crate::service::QaService;
use crate::service::types::{AskResponse, ExportResponse, QaPair, UploadFile};

const HEALTH_PATH: &str = "/healthz";
const UPLOAD_PATH: &str = "/upload";
const ASK_PATH: &str = "/ask";
const EXPORT_PATH: &str = "/export-pdf";

/// Client for the question-answering backend.
pub struct HttpService {
    client: Client,
    base_url: String,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a transport failure onto the endpoint it was aimed at.
fn transport(endpoint: &'static str) -> impl FnOnce(reqwest::Error) -> ServiceError {
    move |source| ServiceError::Transport { endpoint, source }
}

fn check_status(endpoint: &'static str, response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ServiceError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ServiceError> {
    response.json::<T>().await.map_err(|e| ServiceError::Decode {
        endpoint,
        message: e.to_string(),
    })
}

#[async_trait]
impl QaService for HttpService {
    async fn health(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(transport(HEALTH_PATH))?;
        check_status(HEALTH_PATH, response)?;
        Ok(())
    }

    async fn upload(&self, file: UploadFile) -> Result<(), ServiceError> {
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.content_type)
            .map_err(transport(UPLOAD_PATH))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(transport(UPLOAD_PATH))?;
        check_status(UPLOAD_PATH, response)?;
        Ok(())
    }

    async fn ask(&self, filename: &str, question: &str) -> Result<String, ServiceError> {
        let form = Form::new()
            .text("filename", filename.to_string())
            .text("question", question.to_string());

        let response = self
            .client
            .post(self.url(ASK_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(transport(ASK_PATH))?;
        let response = check_status(ASK_PATH, response)?;
        let body: AskResponse = decode(ASK_PATH, response).await?;
        body.into_answer()
    }

    async fn fetch_transcript(&self, filename: &str) -> Result<Vec<QaPair>, ServiceError> {
        let response = self
            .client
            .get(self.url(EXPORT_PATH))
            .query(&[("filename", filename)])
            .send()
            .await
            .map_err(transport(EXPORT_PATH))?;
        let response = check_status(EXPORT_PATH, response)?;
        let body: ExportResponse = decode(EXPORT_PATH, response).await?;
        Ok(body.qa_pairs)
    }
}
