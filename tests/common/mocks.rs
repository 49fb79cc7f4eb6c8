use mockall::mock;

use wpt_import::{DiagnosticSink, Severity};

mock! {
    pub Sink {}

    impl DiagnosticSink for Sink {
        fn emit(&self, severity: Severity, message: &str);
    }
}

impl MockSink {
    /// Accept any diagnostic below `Error`
    pub fn allow_non_errors(&mut self) {
        self.expect_emit()
            .withf(|severity, _| *severity < Severity::Error)
            .returning(|_, _| ());
    }
}
