// ABOUTME: Dispatcher: runs controller Requests against the QaService on spawned tasks.
// ABOUTME: Every request reports exactly one terminal ServiceEvent back over an mpsc channel.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::controller::readiness::{self, RetryPolicy};
use crate::controller::{AskRequest, ExportRequest, Request, ServiceEvent, UploadRequest};
use crate::error::{ExportError, ServiceError};
use crate::export::{self, SummaryLayout};
use crate::service::{QaService, UploadFile};

/// Where and how exported summaries are written.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_path: PathBuf,
    pub title: String,
    pub layout: SummaryLayout,
}

/// Runs requests concurrently; none of them blocks the caller or each other.
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<dyn QaService>,
    events: mpsc::Sender<ServiceEvent>,
    retry: RetryPolicy,
    export: ExportSettings,
}

impl Dispatcher {
    pub fn new(
        service: Arc<dyn QaService>,
        events: mpsc::Sender<ServiceEvent>,
        retry: RetryPolicy,
        export: ExportSettings,
    ) -> Self {
        Self {
            service,
            events,
            retry,
            export,
        }
    }

    /// Start `request` in the background.
    pub fn dispatch(&self, request: Request) {
        tracing::debug!(?request, "dispatching");
        match request {
            Request::CheckHealth => self.spawn_readiness(),
            Request::Upload(req) => self.spawn_upload(req),
            Request::Ask(req) => self.spawn_ask(req),
            Request::Export(req) => self.spawn_export(req),
        }
    }

    fn spawn_readiness(&self) {
        let service = self.service.clone();
        let events = self.events.clone();
        let policy = self.retry.clone();
        tokio::spawn(async move {
            let readiness = readiness::wait_until_ready(service.as_ref(), &policy, &events).await;
            let _ = events.send(readiness.into()).await;
        });
    }

    fn spawn_upload(&self, req: UploadRequest) {
        let service = self.service.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let filename = req.filename.clone();
            let result = upload(service.as_ref(), req).await;
            let _ = events
                .send(ServiceEvent::UploadFinished { filename, result })
                .await;
        });
    }

    fn spawn_ask(&self, req: AskRequest) {
        let service = self.service.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = service.ask(&req.filename, &req.question).await;
            let _ = events
                .send(ServiceEvent::AskFinished {
                    question: req.question,
                    result,
                })
                .await;
        });
    }

    fn spawn_export(&self, req: ExportRequest) {
        let service = self.service.clone();
        let events = self.events.clone();
        let settings = self.export.clone();
        tokio::spawn(async move {
            let result = export_transcript(service.as_ref(), &req.filename, &settings).await;
            let _ = events.send(ServiceEvent::ExportFinished { result }).await;
        });
    }
}

async fn upload(service: &dyn QaService, req: UploadRequest) -> Result<(), ServiceError> {
    let bytes = tokio::fs::read(&req.path)
        .await
        .map_err(|source| ServiceError::Io {
            path: req.path.clone(),
            source,
        })?;
    tracing::info!(filename = %req.filename, size = bytes.len(), "uploading document");
    service
        .upload(UploadFile {
            name: req.filename,
            content_type: req.content_type,
            bytes,
        })
        .await
}

/// Fetch the stored transcript for `filename` and write it as a summary PDF.
pub async fn export_transcript(
    service: &dyn QaService,
    filename: &str,
    settings: &ExportSettings,
) -> Result<PathBuf, ExportError> {
    let pairs = service.fetch_transcript(filename).await?;
    tracing::info!(%filename, pairs = pairs.len(), "rendering transcript summary");

    let pages = settings.layout.layout(&settings.title, &pairs);
    let bytes = export::render_pdf(&pages, &settings.layout)?;

    let path = settings.output_path.clone();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
