//! Remote image-to-3D service: the client seam and the fixed-interval poll
//! loop shared by every job.

pub mod client;
pub mod types;

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::config::generation::GenerationParams;
use crate::error::Result;
use types::{SessionData, SessionStatus};

/// One method per remote operation. The poll loop, the job runner and the
/// orchestrator are generic over this trait so batches can run against an
/// in-memory service in tests.
pub trait MeshService {
    /// Submit one image for conversion. Succeeds only when the service
    /// answers with a success status AND a non-empty session code; no retry
    /// happens at this layer.
    fn create_session(&self, image_url: &str, params: &GenerationParams) -> Result<String>;

    /// Fetch the current session payload once.
    fn fetch_status(&self, session_code: &str) -> Result<SessionData>;

    /// Stream the artifact at `url` to `dest`. The final path must only
    /// exist on confirmed success; a short or interrupted transfer is an
    /// error and leaves no file behind.
    fn fetch_artifact(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Terminal poll results. A failing status request is an `Err` from
/// [`poll_session`] instead: fatal for the job, not retried.
#[derive(Debug)]
pub enum PollTerminal {
    Complete(SessionData),
    RemoteFailure { detail: String },
    TimedOut { waited: Duration },
}

/// Poll the session at a fixed interval until it reaches a terminal state or
/// the accumulated wait reaches the timeout.
///
/// The wait is accounted in whole intervals rather than wall-clock time, so
/// a timeout of T at interval I performs exactly ceil(T/I) status fetches.
/// Status transitions are reported as progress and have no other effect.
pub fn poll_session<S: MeshService>(
    service: &S,
    session_code: &str,
    config: &PollConfig,
) -> Result<PollTerminal> {
    let mut waited = Duration::ZERO;
    let mut last_status: Option<SessionStatus> = None;

    loop {
        let session = service.fetch_status(session_code)?;

        if last_status != Some(session.session_status) {
            info!(
                session_code,
                status = ?session.session_status,
                percent = session.percent_done,
                "session status"
            );
            last_status = Some(session.session_status);
        }

        match session.session_status {
            SessionStatus::Complete => return Ok(PollTerminal::Complete(session)),
            SessionStatus::Failed => {
                return Ok(PollTerminal::RemoteFailure {
                    detail: "remote service reported the session failed".to_string(),
                });
            }
            SessionStatus::Pending | SessionStatus::Processing => {}
        }

        waited += config.interval;
        if waited >= config.timeout {
            return Ok(PollTerminal::TimedOut { waited });
        }
        std::thread::sleep(config.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshBatchError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub that serves a fixed sequence of statuses, then repeats the last.
    struct SequenceService {
        statuses: Vec<SessionStatus>,
        calls: AtomicUsize,
        fail_requests: bool,
    }

    impl SequenceService {
        fn new(statuses: Vec<SessionStatus>) -> Self {
            SequenceService {
                statuses,
                calls: AtomicUsize::new(0),
                fail_requests: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MeshService for SequenceService {
        fn create_session(&self, _: &str, _: &GenerationParams) -> Result<String> {
            unreachable!("poll tests never submit")
        }

        fn fetch_status(&self, session_code: &str) -> Result<SessionData> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_requests {
                return Err(MeshBatchError::status("boom"));
            }
            let status = *self
                .statuses
                .get(n)
                .or_else(|| self.statuses.last())
                .expect("sequence not empty");
            Ok(SessionData {
                session_code: session_code.to_string(),
                session_status: status,
                percent_done: 0,
                mesh_url_glb: None,
                credits: None,
            })
        }

        fn fetch_artifact(&self, _: &str, _: &Path) -> Result<()> {
            unreachable!("poll tests never download")
        }
    }

    fn fast_poll() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(30),
        }
    }

    #[test]
    fn test_timeout_after_exactly_three_polls() {
        // timeout 30 / interval 10 -> 3回のステータス取得でタイムアウト
        let service = SequenceService::new(vec![SessionStatus::Processing]);
        let result = poll_session(&service, "S", &fast_poll()).expect("no transport error");
        assert!(matches!(result, PollTerminal::TimedOut { .. }));
        assert_eq!(service.calls(), 3, "never 2 or 4");
    }

    #[test]
    fn test_complete_ends_the_loop() {
        let service = SequenceService::new(vec![
            SessionStatus::Pending,
            SessionStatus::Processing,
            SessionStatus::Complete,
        ]);
        let result = poll_session(&service, "S", &fast_poll()).expect("no transport error");
        match result {
            PollTerminal::Complete(session) => {
                assert_eq!(session.session_status, SessionStatus::Complete)
            }
            other => panic!("expected Complete, got {other:?}"),
        }
        assert_eq!(service.calls(), 3);
    }

    #[test]
    fn test_reported_failure_is_a_terminal_value() {
        let service = SequenceService::new(vec![SessionStatus::Failed]);
        let result = poll_session(&service, "S", &fast_poll()).expect("no transport error");
        assert!(matches!(result, PollTerminal::RemoteFailure { .. }));
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn test_request_failure_aborts_the_poll() {
        let mut service = SequenceService::new(vec![SessionStatus::Processing]);
        service.fail_requests = true;
        let result = poll_session(&service, "S", &fast_poll());
        assert!(result.is_err(), "status request failure is fatal, not retried");
        assert_eq!(service.calls(), 1);
    }
}
