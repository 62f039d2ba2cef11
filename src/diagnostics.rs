//! Diagnostic sink for non-fatal problems found while matching.
//!
//! Matchers never fail; when they hit something they cannot interpret they
//! degrade to a conservative answer and report it here. The sink is handed to
//! the matcher at construction so callers and tests decide where reports go.

use crate::error::VersionError;

#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink: Send + Sync {
    /// The reference OS version could not be reduced to a build number
    fn malformed_version(&self, version: &str, error: &VersionError);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn malformed_version(&self, version: &str, error: &VersionError) {
        log::error!(
            "failure to parse Windows version string {:?}: {}",
            version,
            error
        );
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn malformed_version(&self, version: &str, error: &VersionError) {
        (**self).malformed_version(version, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample_error() -> VersionError {
        VersionError::ComponentCount {
            version: "10.0".into(),
            found: 2,
        }
    }

    #[test_log::test]
    fn test_log_sink_does_not_panic() {
        LogSink.malformed_version("10.0", &sample_error());
    }

    #[test]
    fn test_arc_sink_forwards() {
        // --- Setup ---
        let mut sink = MockDiagnosticSink::new();
        sink.expect_malformed_version()
            .withf(|version, error| version == "10.0" && *error == sample_error())
            .times(1)
            .return_const(());
        let shared: Arc<dyn DiagnosticSink> = Arc::new(sink);

        // --- Execute & Verify ---
        shared.malformed_version("10.0", &sample_error());
    }
}
