// ABOUTME: Liveness probing: bounded retry of the /healthz check with exponential backoff.
// ABOUTME: Ends in Ready on the first success or Unavailable once attempts run out.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::controller::ServiceEvent;
use crate::service::QaService;

/// How often and how patiently to probe the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the next probe after failed attempt `attempt` (1-based).
    /// Doubles each time, capped at `max_delay`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Final result of a probing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready { attempts: u32 },
    Unavailable { attempts: u32, last_error: String },
}

impl From<Readiness> for ServiceEvent {
    fn from(readiness: Readiness) -> Self {
        match readiness {
            Readiness::Ready { .. } => ServiceEvent::Ready,
            Readiness::Unavailable {
                attempts,
                last_error,
            } => ServiceEvent::Unavailable {
                attempts,
                last_error,
            },
        }
    }
}

/// Probe `service` until it answers or the policy gives up. Each failed
/// attempt is reported on `events` as it happens.
pub async fn wait_until_ready(
    service: &dyn QaService,
    policy: &RetryPolicy,
    events: &mpsc::Sender<ServiceEvent>,
) -> Readiness {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match service.health().await {
            Ok(()) => {
                tracing::info!(attempt, "service is ready");
                return Readiness::Ready { attempts: attempt };
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "liveness probe failed");
                let _ = events
                    .send(ServiceEvent::ProbeFailed {
                        attempt,
                        error: e.to_string(),
                    })
                    .await;

                if attempt >= policy.max_attempts {
                    tracing::error!(attempts = attempt, "giving up on liveness probe");
                    return Readiness::Unavailable {
                        attempts: attempt,
                        last_error: e.to_string(),
                    };
                }
                tokio::time::sleep(policy.delay_after(attempt)).await;
            }
        }
    }
}
