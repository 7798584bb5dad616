//! Prioritized failover across interchangeable generation backends.
//!
//! The chain tries each backend exactly once, in configuration order, and
//! returns the first success. Attempts are strictly sequential — never
//! raced — so cost stays predictable and a single healthy backend is
//! enough to keep the service answering. Retries within a backend are the
//! caller's responsibility.

use super::openrouter::{BackendError, ChatModel};
use super::prompt::Prompt;

/// Diagnostic record for one failed backend attempt.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub model: String,
    pub error: String,
}

/// Failure of an entire `generate` call.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Every backend in the chain failed. Carries the last underlying
    /// failure plus a per-attempt trail for observability.
    #[error("All {attempted} generation backends exhausted; last failure: {last}")]
    AllBackendsExhausted {
        attempted: usize,
        attempts: Vec<AttemptRecord>,
        #[source]
        last: BackendError,
    },
    #[error("No generation backends configured")]
    EmptyChain,
}

impl DispatchError {
    /// Attempt trail, empty for `EmptyChain`.
    pub fn attempts(&self) -> &[AttemptRecord] {
        match self {
            DispatchError::AllBackendsExhausted { attempts, .. } => attempts,
            DispatchError::EmptyChain => &[],
        }
    }
}

/// Ordered chain of generation backends. First entry is the primary,
/// the rest are fallbacks in priority order. Built once at startup.
pub struct FailoverChain {
    backends: Vec<Box<dyn ChatModel>>,
}

impl FailoverChain {
    pub fn new(backends: Vec<Box<dyn ChatModel>>) -> Self {
        Self { backends }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Dispatch a prompt: try each backend once, return the first success.
    pub fn generate(&self, prompt: &Prompt) -> Result<String, DispatchError> {
        let mut attempts: Vec<AttemptRecord> = Vec::new();
        let mut last: Option<BackendError> = None;

        for backend in &self.backends {
            match backend.generate(prompt) {
                Ok(text) => {
                    if !attempts.is_empty() {
                        tracing::info!(
                            model = backend.model_id(),
                            failed_attempts = attempts.len(),
                            "Fallback backend answered after primary failure"
                        );
                    }
                    return Ok(text);
                }
                Err(err) => {
                    tracing::warn!(
                        model = backend.model_id(),
                        error = %err,
                        "Backend attempt failed, advancing chain"
                    );
                    attempts.push(AttemptRecord {
                        model: backend.model_id().to_string(),
                        error: err.to_string(),
                    });
                    last = Some(err);
                }
            }
        }

        match last {
            Some(last) => Err(DispatchError::AllBackendsExhausted {
                attempted: attempts.len(),
                attempts,
                last,
            }),
            None => Err(DispatchError::EmptyChain),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::llm::openrouter::MockChatModel;

    fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn first_success_wins_without_touching_fallbacks() {
        let calls = log();
        let chain = FailoverChain::new(vec![
            Box::new(MockChatModel::succeeding("primary", "primary answer").with_log(calls.clone())),
            Box::new(MockChatModel::failing("backup").with_log(calls.clone())),
        ]);

        let out = chain.generate(&Prompt::new("s", "q")).unwrap();
        assert_eq!(out, "primary answer");
        assert_eq!(*calls.lock().unwrap(), vec!["primary".to_string()]);
    }

    #[test]
    fn chain_advances_in_priority_order() {
        let calls = log();
        let chain = FailoverChain::new(vec![
            Box::new(MockChatModel::failing("one").with_log(calls.clone())),
            Box::new(MockChatModel::failing("two").with_log(calls.clone())),
            Box::new(MockChatModel::succeeding("three", "third answer").with_log(calls.clone())),
        ]);

        let out = chain.generate(&Prompt::new("s", "q")).unwrap();
        assert_eq!(out, "third answer");
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["one".to_string(), "two".to_string(), "three".to_string()]
        );
    }

    #[test]
    fn exhaustion_reports_every_attempt() {
        let chain = FailoverChain::new(vec![
            Box::new(MockChatModel::failing("one")),
            Box::new(MockChatModel::failing("two")),
        ]);

        let err = chain.generate(&Prompt::new("s", "q")).unwrap_err();
        match &err {
            DispatchError::AllBackendsExhausted {
                attempted,
                attempts,
                last,
            } => {
                assert_eq!(*attempted, 2);
                assert_eq!(attempts[0].model, "one");
                assert_eq!(attempts[1].model, "two");
                assert!(matches!(last, BackendError::RateLimited));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(err.attempts().len(), 2);
    }

    #[test]
    fn single_attempt_per_backend_per_call() {
        let calls = log();
        let chain = FailoverChain::new(vec![
            Box::new(MockChatModel::failing("one").with_log(calls.clone())),
            Box::new(MockChatModel::succeeding("two", "ok").with_log(calls.clone())),
        ]);
        chain.generate(&Prompt::new("s", "q")).unwrap();

        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.iter().filter(|m| *m == "one").count(), 1);
        assert_eq!(recorded.iter().filter(|m| *m == "two").count(), 1);
    }

    #[test]
    fn empty_chain_is_an_error() {
        let chain = FailoverChain::new(vec![]);
        let err = chain.generate(&Prompt::new("s", "q")).unwrap_err();
        assert!(matches!(err, DispatchError::EmptyChain));
        assert!(err.attempts().is_empty());
    }
}
