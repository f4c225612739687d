//! The `Logger` collaborator (§6): an application-supplied sink for
//! presence-domain log lines, independent of (and in addition to) the
//! `log` facade the engine always writes to.

/// Minimum severity a [`Logger`] will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Info,
    Warning,
    Error,
}

/// Application-supplied log sink.
///
/// The engine thread and user threads may both call into this
/// implementation concurrently (§5), so implementations must be `Send +
/// Sync` and internally synchronized if they hold mutable state.
pub trait Logger: Send + Sync {
    fn level(&self) -> LogLevel;
    fn trace(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// A [`Logger`] that discards everything. The default when no logger is
/// supplied to [`crate::client::DiscordIpcClient::new`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn level(&self) -> LogLevel {
        LogLevel::Error
    }
    fn trace(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Dispatches to both the supplied [`Logger`] (if any, and if the message's
/// level clears its filter) and the `log` facade, matching the ambient
/// logging contract described in SPEC_FULL.md's "Ambient stack" section.
pub(crate) fn dispatch(logger: Option<&dyn Logger>, level: LogLevel, message: &str) {
    match level {
        LogLevel::Trace => log::trace!("{message}"),
        LogLevel::Info => log::info!("{message}"),
        LogLevel::Warning => log::warn!("{message}"),
        LogLevel::Error => log::error!("{message}"),
    }

    if let Some(logger) = logger {
        if logger.level() <= level {
            match level {
                LogLevel::Trace => logger.trace(message),
                LogLevel::Info => logger.info(message),
                LogLevel::Warning => logger.warning(message),
                LogLevel::Error => logger.error(message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLogger {
        level: LogLevel,
        calls: AtomicUsize,
    }

    impl Logger for CountingLogger {
        fn level(&self) -> LogLevel {
            self.level
        }
        fn trace(&self, _message: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        fn info(&self, _message: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        fn warning(&self, _message: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        fn error(&self, _message: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn dispatch_filters_below_configured_level() {
        let logger = CountingLogger {
            level: LogLevel::Warning,
            calls: AtomicUsize::new(0),
        };

        dispatch(Some(&logger), LogLevel::Trace, "ignored");
        dispatch(Some(&logger), LogLevel::Info, "ignored");
        dispatch(Some(&logger), LogLevel::Warning, "kept");
        dispatch(Some(&logger), LogLevel::Error, "kept");

        assert_eq!(logger.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn null_logger_never_panics() {
        let logger = NullLogger;
        dispatch(Some(&logger), LogLevel::Error, "whatever");
    }
}
