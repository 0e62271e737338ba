//! Reporting sink: where fatal errors and the import preview end up.

use crate::error::Error;
use crate::import::ImportedManifest;

/// Receives the single outcome of an import.
pub trait ReportSink {
    /// A fatal error: short title plus one or more detail lines.
    fn fatal(&mut self, title: &str, lines: &[String]);

    /// The annotated manifest, on success.
    fn preview(&mut self, manifest: &ImportedManifest);

    fn report_error(&mut self, error: &Error) {
        self.fatal(error.title(), &error.details());
    }
}

/// Keeps whatever it is given, for callers that render later.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub fatal: Option<(String, Vec<String>)>,
    pub previews: usize,
}

impl ReportSink for CollectingSink {
    fn fatal(&mut self, title: &str, lines: &[String]) {
        self.fatal = Some((title.to_string(), lines.to_vec()));
    }

    fn preview(&mut self, _manifest: &ImportedManifest) {
        self.previews += 1;
    }
}
