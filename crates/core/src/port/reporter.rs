// Skew Reporter Port
// Where significant rounds are written (log lines in production)

use crate::domain::SkewReport;

/// Sink for significant-skew reports
///
/// Implementations:
/// - TracingReporter: renders a table through `tracing` (application::report)
/// - RecordingReporter: keeps reports in memory for tests
pub trait SkewReporter: Send + Sync {
    fn report(&self, report: &SkewReport);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Reporter that records every report it receives
    #[derive(Clone, Default)]
    pub struct RecordingReporter {
        reports: Arc<Mutex<Vec<SkewReport>>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reports(&self) -> Vec<SkewReport> {
            self.reports.lock().unwrap().clone()
        }
    }

    impl SkewReporter for RecordingReporter {
        fn report(&self, report: &SkewReport) {
            self.reports.lock().unwrap().push(report.clone());
        }
    }
}
