//! Manifest classification and resolution.
//!
//! The pipeline, leaves first:
//!
//! - [`ResourceResolver`] finds `<identifierref>.dat` for a leaf item
//! - [`classify`] maps a descriptor to a [`CanvasType`]
//! - [`ManifestWalker`] walks the organization and writes the annotations
//! - [`PageMaterializer`] creates pages for `resource/x-bb-document` items
//!
//! [`import_package`] wires them together for a working directory.

mod classify;
mod outline;
mod page;
mod resolver;
mod walker;

pub use classify::{
    CanvasType, Classification, ContentHandler, classify, content_handler, has_body_text,
};
pub use outline::{OutlineEntry, Summary, outline};
pub use page::{PageMaterializer, build_page};
pub use resolver::{Resolution, ResourceResolver};
pub use walker::ManifestWalker;

use tracing::info;

use crate::canvas::{CoursePages, HtmlRewriter};
use crate::config::ImportConfig;
use crate::dom::{self, Document, NodeId};
use crate::error::{Error, Result};
use crate::report::ReportSink;

/// A fully annotated manifest.
#[derive(Debug)]
pub struct ImportedManifest {
    pub document: Document,
    /// The `organization` element the walk started from.
    pub organization: NodeId,
    pub pages_created: usize,
}

impl ImportedManifest {
    pub fn outline(&self, config: &ImportConfig) -> Vec<OutlineEntry> {
        outline(&self.document, self.organization, config)
    }
}

/// The `organization` to walk: the first one under `<organizations>`.
pub fn find_organization(manifest: &Document) -> Result<NodeId> {
    let root = manifest
        .root()
        .ok_or_else(|| Error::MalformedManifest("empty document".to_string()))?;
    manifest
        .find_path(root, &["organizations", "organization"])
        .ok_or_else(|| {
            Error::MalformedManifest("no <organizations><organization> element".to_string())
        })
}

/// Load the manifest from the working directory and annotate it.
///
/// Pages for `resource/x-bb-document` items are created in `course_id`
/// through `pages` during the walk. Nothing is returned on failure: the
/// partially annotated tree is dropped with the error.
pub fn import_package(
    config: &ImportConfig,
    course_id: &str,
    pages: &mut dyn CoursePages,
    rewriter: &dyn HtmlRewriter,
) -> Result<ImportedManifest> {
    config.validate()?;

    let manifest_path = config.manifest_path();
    let mut document = dom::load(&manifest_path)?.ok_or(Error::ManifestMissing(manifest_path))?;
    let organization = find_organization(&document)?;

    let mut walker = ManifestWalker::new(config, PageMaterializer::new(pages, rewriter, course_id));
    walker.walk(&mut document, organization, None)?;
    let pages_created = walker.pages_created();

    info!(
        working_dir = %config.working_dir.display(),
        pages_created,
        "manifest annotated"
    );

    Ok(ImportedManifest {
        document,
        organization,
        pages_created,
    })
}

/// Run [`import_package`] and hand the outcome to a reporting sink.
///
/// Returns `true` on success.
pub fn import_and_report(
    config: &ImportConfig,
    course_id: &str,
    pages: &mut dyn CoursePages,
    rewriter: &dyn HtmlRewriter,
    sink: &mut dyn ReportSink,
) -> bool {
    match import_package(config, course_id, pages, rewriter) {
        Ok(manifest) => {
            sink.preview(&manifest);
            true
        }
        Err(err) => {
            sink.report_error(&err);
            false
        }
    }
}
