//! Invocation Wrapper
//!
//! `BackupHandler` is the only way callers drive a transport. Whatever the
//! transport does (returns a failed outcome, returns an error, or panics
//! somewhere inside libssh2, reqwest or a child process), the caller gets a
//! plain `bool` and the details go to the log.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error, info_span, Span};

use crate::domain::ports::Transport;
use crate::domain::value_objects::TransferOutcome;

/// A transport plus the logging span that identifies it
pub struct BackupHandler<T> {
    transport: T,
    span: Span,
}

impl<T: Transport> BackupHandler<T> {
    pub fn new(transport: T) -> Self {
        let span = info_span!(
            "backup",
            kind = transport.kind(),
            destination = %transport.display_name()
        );
        Self { transport, span }
    }

    /// Wrap `transport`, logging under a span supplied by the caller
    pub fn with_span(transport: T, span: Span) -> Self {
        Self { transport, span }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn display_name(&self) -> String {
        self.transport.display_name()
    }

    /// Push `file`; `true` only if the transport fully succeeded.
    pub fn process(&self, file: &Path) -> bool {
        self.process_detailed(file).is_success()
    }

    /// Push `file`, folding every fault into a failed outcome.
    pub fn process_detailed(&self, file: &Path) -> TransferOutcome {
        let _entered = self.span.enter();
        let shown = file.display().to_string();

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.transport.process_file(file)));
        match result {
            Ok(Ok(outcome)) if outcome.is_success() => {
                debug!(file = %shown, "processed");
                outcome
            }
            Ok(Ok(outcome)) => {
                error!(file = %shown, status = ?outcome.status, reason = %outcome, "failed to process");
                outcome
            }
            Ok(Err(e)) => {
                error!(file = %shown, error = %e, "failed to process");
                TransferOutcome::failed(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(file = %shown, panic = %message, "transport panicked");
                TransferOutcome::failed(format!("transport panicked: {message}"))
            }
        }
    }
}

impl<T: Transport> From<T> for BackupHandler<T> {
    fn from(transport: T) -> Self {
        Self::new(transport)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TransferError;
    use std::io;

    enum Behaviour {
        Succeed,
        Refuse,
        Error,
        Panic,
    }

    struct Scripted(Behaviour);

    impl Transport for Scripted {
        fn kind(&self) -> &'static str {
            "scripted"
        }

        fn display_name(&self) -> String {
            "scripted://test".to_string()
        }

        fn process_file(&self, _source: &Path) -> Result<TransferOutcome, TransferError> {
            match self.0 {
                Behaviour::Succeed => Ok(TransferOutcome::succeeded()),
                Behaviour::Refuse => Ok(TransferOutcome::failed("no").with_status(501)),
                Behaviour::Error => Err(TransferError::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "refused",
                ))),
                Behaviour::Panic => panic!("exploded deep inside the transport"),
            }
        }
    }

    #[test]
    fn success_is_true() {
        assert!(BackupHandler::new(Scripted(Behaviour::Succeed)).process(Path::new("a")));
    }

    #[test]
    fn failed_outcome_is_false_and_keeps_status() {
        let handler = BackupHandler::new(Scripted(Behaviour::Refuse));
        let outcome = handler.process_detailed(Path::new("a"));
        assert!(!outcome.is_success());
        assert_eq!(outcome.status, Some(501));
        assert!(!handler.process(Path::new("a")));
    }

    #[test]
    fn error_is_false() {
        let handler = BackupHandler::new(Scripted(Behaviour::Error));
        let outcome = handler.process_detailed(Path::new("a"));
        assert!(!outcome.is_success());
        assert!(outcome.message.unwrap().contains("refused"));
    }

    #[test]
    fn panic_does_not_escape() {
        let handler = BackupHandler::new(Scripted(Behaviour::Panic));
        let outcome = handler.process_detailed(Path::new("a"));
        assert!(!outcome.is_success());
        assert!(outcome.message.unwrap().contains("exploded"));
        // Still usable afterwards.
        assert!(!handler.process(Path::new("b")));
    }

    #[test]
    fn injected_span_is_used() {
        let span = tracing::info_span!("custom");
        let handler = BackupHandler::with_span(Scripted(Behaviour::Succeed), span);
        assert_eq!(handler.display_name(), "scripted://test");
        assert!(handler.process(Path::new("a")));
    }
}
