//! Error types for bbcanvas operations.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// What a page-producing descriptor was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFault {
    /// No `<title>` element, or one with an empty `value`.
    MissingTitle,
    /// No `<body><text>` element.
    MissingText,
}

impl fmt::Display for DescriptorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => f.write_str("missing <title> tag"),
            Self::MissingText => f.write_str("missing <text> tag"),
        }
    }
}

/// Errors that can occur while classifying or importing a course package.
///
/// Every variant is fatal: the walk stops at the first one and nothing
/// annotated so far is handed back.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error in {location}: {reason}")]
    Xml { location: String, reason: String },

    #[error("Manifest not found: {}", .0.display())]
    ManifestMissing(PathBuf),

    #[error("Invalid manifest: {0}")]
    MalformedManifest(String),

    #[error("Missing resource file {identifier} (expected {})", path.display())]
    ResourceMissing { identifier: String, path: PathBuf },

    #[error("Malformed resource {identifier}: {fault}")]
    MalformedDescriptor {
        identifier: String,
        fault: DescriptorFault,
    },

    #[error("Unknown content handler {handler:?} in resource {identifier}")]
    UnknownContentHandler { identifier: String, handler: String },

    #[error("Canvas API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Short headline for the reporting sink.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Io(_) => "I/O Error",
            Self::Xml { .. } => "Unreadable XML",
            Self::ManifestMissing(_) => "Manifest Not Found",
            Self::MalformedManifest(_) => "Invalid Manifest",
            Self::ResourceMissing { .. } => "Missing Resource File",
            Self::MalformedDescriptor {
                fault: DescriptorFault::MissingTitle,
                ..
            } => "Title Not Found",
            Self::MalformedDescriptor {
                fault: DescriptorFault::MissingText,
                ..
            } => "Text Not Found",
            Self::UnknownContentHandler { .. } => "Unknown Content Handler",
            Self::Api(_) => "Canvas API Error",
            Self::Config(_) => "Configuration Error",
        }
    }

    /// Human-readable detail lines for the reporting sink.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::ResourceMissing { identifier, path } => vec![
                format!(
                    "A resource file ({identifier}) containing details about one of your items is missing."
                ),
                format!("Expected it at {}.", path.display()),
            ],
            Self::MalformedDescriptor {
                identifier,
                fault: DescriptorFault::MissingTitle,
            } => vec![format!(
                "A resource file that we needed ({identifier}) was missing a <title> tag that we were looking for to create a page in Canvas."
            )],
            Self::MalformedDescriptor {
                identifier,
                fault: DescriptorFault::MissingText,
            } => vec![format!(
                "A resource file that we needed ({identifier}) was missing a <text> tag that we were looking for to create a page in Canvas."
            )],
            Self::UnknownContentHandler {
                identifier,
                handler,
            } => vec![
                format!("The resource file {identifier} uses a content handler we do not know how to import: {handler}."),
                "Set unknown_handler to skip or do-not-import to continue without it.".to_string(),
            ],
            other => vec![other.to_string()],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
