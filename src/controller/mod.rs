// ABOUTME: Chat screen controller: validates user actions and applies service results to the Session.
// ABOUTME: Produces Requests for the dispatcher and consumes ServiceEvents it reports back.

pub mod dispatch;
pub mod readiness;

use std::path::{Path, PathBuf};

use crate::config::AskOrdering;
use crate::error::{ExportError, ServiceError, ValidationError};
use crate::service::QaPair;
use crate::session::{ServiceStatus, Session};

pub use dispatch::Dispatcher;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Work for the dispatcher to run against the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CheckHealth,
    Upload(UploadRequest),
    Ask(AskRequest),
    Export(ExportRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    pub filename: String,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub filename: String,
}

/// Results reported by the dispatcher.
#[derive(Debug)]
pub enum ServiceEvent {
    ProbeFailed {
        attempt: u32,
        error: String,
    },
    Ready,
    Unavailable {
        attempts: u32,
        last_error: String,
    },
    UploadFinished {
        filename: String,
        result: Result<(), ServiceError>,
    },
    AskFinished {
        question: String,
        result: Result<String, ServiceError>,
    },
    ExportFinished {
        result: Result<PathBuf, ExportError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        Notice::error(err.to_string())
    }
}

/// What the screen should do after an event was applied.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    pub notice: Option<Notice>,
    pub follow_up: Option<Request>,
}

impl Reaction {
    fn none() -> Self {
        Self::default()
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            follow_up: None,
        }
    }

    fn follow_up(request: Request) -> Self {
        Self {
            notice: None,
            follow_up: Some(request),
        }
    }
}

/// Owns the Session and drives it through readiness, upload, ask, and export.
#[derive(Debug)]
pub struct ChatController {
    session: Session,
    ordering: AskOrdering,
    queued_ask: Option<AskRequest>,
    initial_upload: Option<PathBuf>,
    last_export: Option<PathBuf>,
}

impl ChatController {
    pub fn new(ordering: AskOrdering) -> Self {
        Self {
            session: Session::new(),
            ordering,
            queued_ask: None,
            initial_upload: None,
            last_export: None,
        }
    }

    /// Upload `path` as soon as the service becomes ready.
    pub fn with_initial_upload(mut self, path: PathBuf) -> Self {
        self.initial_upload = Some(path);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn ordering(&self) -> AskOrdering {
        self.ordering
    }

    /// The question being composed.
    pub fn question(&self) -> &str {
        &self.session.pending_question
    }

    pub fn question_mut(&mut self) -> &mut String {
        &mut self.session.pending_question
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.session.pending_question = text.into();
    }

    pub fn queued_question(&self) -> Option<&str> {
        self.queued_ask.as_ref().map(|req| req.question.as_str())
    }

    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    /// Validate a file selection. Only files whose name declares a PDF are accepted.
    pub fn request_upload(&self, path: &Path) -> Result<Request, ValidationError> {
        if !self.session.is_service_ready() {
            return Err(ValidationError::NotReady);
        }
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or(ValidationError::NotPdf)?;
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .ok_or(ValidationError::NotPdf)?;
        if content_type != PDF_CONTENT_TYPE {
            return Err(ValidationError::NotPdf);
        }

        Ok(Request::Upload(UploadRequest {
            path: path.to_path_buf(),
            filename,
            content_type,
        }))
    }

    /// Submit the pending question.
    ///
    /// Returns `Ok(None)` when the question was parked in the queue slot
    /// because another one is still in flight under serialized ordering.
    pub fn request_ask(&mut self) -> Result<Option<Request>, ValidationError> {
        if !self.session.is_service_ready() {
            return Err(ValidationError::NotReady);
        }
        let filename = self
            .session
            .current_filename()
            .ok_or(ValidationError::NoDocument)?
            .to_string();
        if self.session.pending_question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        let question = std::mem::take(&mut self.session.pending_question);
        if self.ordering == AskOrdering::Serialized && self.session.is_answer_loading() {
            tracing::debug!("question queued behind the one in flight");
            self.queued_ask = Some(AskRequest { filename, question });
            return Ok(None);
        }
        Ok(Some(self.start_ask(filename, question)))
    }

    fn start_ask(&mut self, filename: String, question: String) -> Request {
        self.session.begin_ask();
        Request::Ask(AskRequest { filename, question })
    }

    /// Ask for an export of the current document's stored transcript.
    /// Without a document there is nothing to export.
    pub fn request_export(&self) -> Option<Request> {
        if !self.session.is_service_ready() {
            return None;
        }
        match self.session.current_filename() {
            Some(filename) => Some(Request::Export(ExportRequest {
                filename: filename.to_string(),
            })),
            None => {
                tracing::warn!("export requested with no document loaded");
                None
            }
        }
    }

    /// Restart probing after the service was declared unavailable.
    pub fn retry_readiness(&mut self) -> Option<Request> {
        match self.session.service_status() {
            ServiceStatus::Unavailable { .. } => {
                self.session
                    .set_service_status(ServiceStatus::Loading { attempt: 0 });
                Some(Request::CheckHealth)
            }
            _ => None,
        }
    }

    /// Apply a result reported by the dispatcher.
    pub fn apply(&mut self, event: ServiceEvent) -> Reaction {
        match event {
            ServiceEvent::ProbeFailed { attempt, .. } => {
                self.session
                    .set_service_status(ServiceStatus::Loading { attempt });
                Reaction::none()
            }
            ServiceEvent::Ready => {
                self.session.set_service_status(ServiceStatus::Ready);
                match self.initial_upload.take() {
                    Some(path) => match self.request_upload(&path) {
                        Ok(request) => Reaction::follow_up(request),
                        Err(err) => Reaction::notice(err.into()),
                    },
                    None => Reaction::none(),
                }
            }
            ServiceEvent::Unavailable {
                attempts,
                last_error,
            } => {
                self.session.set_service_status(ServiceStatus::Unavailable {
                    attempts,
                    last_error,
                });
                Reaction::none()
            }
            ServiceEvent::UploadFinished { filename, result } => match result {
                Ok(()) => {
                    tracing::info!(%filename, "document uploaded");
                    self.session.open_document(filename);
                    Reaction::none()
                }
                Err(e) => {
                    tracing::error!(%filename, error = %e, "upload failed");
                    Reaction::notice(Notice::error("Failed to upload PDF."))
                }
            },
            ServiceEvent::AskFinished { question, result } => {
                let notice = match result {
                    Ok(answer) => {
                        self.session.finish_ask(QaPair::new(question, answer));
                        None
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "ask failed");
                        self.session.finish_ask(QaPair::new(question, ""));
                        Some(Notice::error("Error getting the answer."))
                    }
                };
                let follow_up = self.dequeue_question();
                Reaction { notice, follow_up }
            }
            ServiceEvent::ExportFinished { result } => {
                match result {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "transcript exported");
                        self.last_export = Some(path);
                    }
                    Err(e) => tracing::error!(error = %e, "export failed"),
                }
                Reaction::none()
            }
        }
    }

    fn dequeue_question(&mut self) -> Option<Request> {
        if self.session.is_answer_loading() {
            return None;
        }
        let AskRequest { filename, question } = self.queued_ask.take()?;
        Some(self.start_ask(filename, question))
    }
}
