// ABOUTME: Session: the in-memory record of the uploaded document and its Q&A transcript.
// ABOUTME: Mutated only by the controller; lives for the lifetime of the process.

use crate::service::QaPair;

/// Readiness of the backend as observed by the liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Probing; `attempt` counts failed probes so far.
    Loading { attempt: u32 },
    Ready,
    /// All probe attempts failed.
    Unavailable { attempts: u32, last_error: String },
}

/// The screen's session state.
///
/// The transcript is cleared whenever a different document becomes current,
/// and `asks_in_flight` counts questions sent but not yet resolved.
#[derive(Debug)]
pub struct Session {
    current_filename: Option<String>,
    transcript: Vec<QaPair>,
    /// The question being composed in the input line.
    pub pending_question: String,
    asks_in_flight: usize,
    service: ServiceStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_filename: None,
            transcript: Vec::new(),
            pending_question: String::new(),
            asks_in_flight: 0,
            service: ServiceStatus::Loading { attempt: 0 },
        }
    }

    pub fn current_filename(&self) -> Option<&str> {
        self.current_filename.as_deref()
    }

    pub fn transcript(&self) -> &[QaPair] {
        &self.transcript
    }

    pub fn asks_in_flight(&self) -> usize {
        self.asks_in_flight
    }

    /// Whether at least one question is waiting for its answer.
    pub fn is_answer_loading(&self) -> bool {
        self.asks_in_flight > 0
    }

    pub fn service_status(&self) -> &ServiceStatus {
        &self.service
    }

    pub fn is_service_ready(&self) -> bool {
        self.service == ServiceStatus::Ready
    }

    pub(crate) fn set_service_status(&mut self, status: ServiceStatus) {
        self.service = status;
    }

    /// Make `filename` the current document and start a fresh transcript.
    pub(crate) fn open_document(&mut self, filename: String) {
        self.current_filename = Some(filename);
        self.transcript.clear();
    }

    pub(crate) fn begin_ask(&mut self) {
        self.asks_in_flight += 1;
    }

    /// Record a resolved question at the end of the transcript.
    pub(crate) fn finish_ask(&mut self, pair: QaPair) {
        self.asks_in_flight = self.asks_in_flight.saturating_sub(1);
        self.transcript.push(pair);
    }
}
