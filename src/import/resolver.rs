//! Resource descriptor lookup.

use std::path::PathBuf;

use crate::config::ImportConfig;
use crate::dom::{self, Document};
use crate::error::{Error, Result};

/// Result of looking up one `identifierref`.
pub enum Resolution {
    Found { descriptor: Document, path: PathBuf },
    Missing { identifier: String, path: PathBuf },
}

impl Resolution {
    /// Treat a missing descriptor as fatal.
    pub fn require(self) -> Result<(Document, PathBuf)> {
        match self {
            Self::Found { descriptor, path } => Ok((descriptor, path)),
            Self::Missing { identifier, path } => Err(Error::ResourceMissing { identifier, path }),
        }
    }
}

/// Loads `<identifier>.dat` descriptors from the working tree on demand.
pub struct ResourceResolver<'a> {
    config: &'a ImportConfig,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    /// Locate and load the descriptor for `identifier`.
    ///
    /// A descriptor that exists but is not well-formed XML is an error, not a
    /// `Missing`. An empty identifier looks up `.dat` itself, which is
    /// normally `Missing`.
    pub fn resolve(&self, identifier: &str) -> Result<Resolution> {
        if identifier == ".." || identifier.contains(['/', '\\']) {
            return Err(Error::MalformedManifest(format!(
                "identifierref {identifier:?} is not a plain resource name"
            )));
        }

        let path = self.config.descriptor_path(identifier);
        Ok(match dom::load(&path)? {
            Some(descriptor) => Resolution::Found { descriptor, path },
            None => Resolution::Missing {
                identifier: identifier.to_string(),
                path,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_resolve_found_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("res00001.dat"),
            "<CONTENT><CONTENTHANDLER VALUE=\"resource/x-bb-file\"/></CONTENT>",
        )
        .unwrap();
        let config = ImportConfig::new(dir.path());
        let resolver = ResourceResolver::new(&config);

        match resolver.resolve("res00001").unwrap() {
            Resolution::Found { descriptor, path } => {
                assert_eq!(path, dir.path().join("res00001.dat"));
                let root = descriptor.root().unwrap();
                assert_eq!(descriptor.element_name(root), Some("content"));
            }
            Resolution::Missing { .. } => panic!("res00001 should resolve"),
        }

        match resolver.resolve("res00007").unwrap() {
            Resolution::Missing { identifier, path } => {
                assert_eq!(identifier, "res00007");
                assert_eq!(path, dir.path().join("res00007.dat"));
            }
            Resolution::Found { .. } => panic!("res00007 should be missing"),
        }
    }

    #[test]
    fn test_require_turns_missing_into_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImportConfig::new(dir.path());
        let err = ResourceResolver::new(&config)
            .resolve("res00007")
            .unwrap()
            .require()
            .unwrap_err();
        assert!(
            matches!(&err, Error::ResourceMissing { identifier, .. } if identifier == "res00007"),
            "{err:?}"
        );
    }

    #[test]
    fn test_malformed_descriptor_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("res00002.dat"), "<CONTENT><TITLE></CONTENT>").unwrap();
        let config = ImportConfig::new(dir.path());

        let err = ResourceResolver::new(&config).resolve("res00002").err().unwrap();
        assert!(matches!(err, Error::Xml { .. }), "{err:?}");
    }

    #[test]
    fn test_empty_identifier_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ImportConfig::new(dir.path());

        let err = ResourceResolver::new(&config)
            .resolve("")
            .unwrap()
            .require()
            .unwrap_err();
        match err {
            Error::ResourceMissing { identifier, path } => {
                assert_eq!(identifier, "");
                assert_eq!(path, dir.path().join(".dat"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_path_like_identifiers_are_rejected() {
        let config = ImportConfig::default();
        let resolver = ResourceResolver::new(&config);
        for bad in ["../secret", "a/b", "..", "a\\b"] {
            assert!(matches!(
                resolver.resolve(bad),
                Err(Error::MalformedManifest(_))
            ));
        }
    }
}
