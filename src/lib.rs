//! # bbcanvas
//!
//! Classify a Blackboard course export for import into Canvas.
//!
//! A Blackboard export is an IMS content package: `imsmanifest.xml` holds the
//! course's table of contents as nested `<item>` elements, and each leaf item
//! points (`identifierref`) at a `resNNNNN.dat` resource descriptor whose
//! content handler says what the item really is. This crate walks that tree,
//! resolves every leaf against its descriptor, and annotates each item with
//! the Canvas content type it should become (`import-type`) and its nesting
//! depth (`indent-level`). Document items are turned into Canvas pages as the
//! walk reaches them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bbcanvas::canvas::{BlackboardHtml, DryRun};
//! use bbcanvas::{ImportConfig, import_package, to_xml};
//!
//! let config = ImportConfig::new("/tmp/blackboard-export");
//! let mut pages = DryRun::new();
//!
//! let manifest = import_package(&config, "1126", &mut pages, &BlackboardHtml)?;
//! println!("{}", to_xml(&manifest.document));
//! # Ok::<(), bbcanvas::Error>(())
//! ```
//!
//! ## Classifying a single descriptor
//!
//! ```
//! use bbcanvas::dom::parse_str;
//! use bbcanvas::import::{CanvasType, Classification, classify};
//!
//! let descriptor = parse_str(
//!     r#"<CONTENT><CONTENTHANDLER VALUE="resource/x-bb-folder"/></CONTENT>"#,
//! ).unwrap();
//!
//! // Folders become modules at the top of the course, subheaders below it.
//! assert!(matches!(classify(&descriptor, None), Classification::Typed { ty: CanvasType::Module, .. }));
//! assert!(matches!(classify(&descriptor, Some(0)), Classification::Typed { ty: CanvasType::Subheader, .. }));
//! ```

pub mod canvas;
pub mod config;
pub mod dom;
pub mod error;
pub mod import;
pub mod report;
pub(crate) mod util;

pub use config::{ImportConfig, UnknownHandlerPolicy};
pub use dom::{Document, NodeId, to_xml};
pub use error::{Error, Result};
pub use import::{CanvasType, ImportedManifest, import_and_report, import_package};
pub use report::ReportSink;
