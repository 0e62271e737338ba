//! Manifest walk: annotate every `item` with its Canvas type and depth.

use tracing::{debug, warn};

use super::classify::{CanvasType, Classification, classify};
use super::page::PageMaterializer;
use super::resolver::ResourceResolver;
use crate::config::{ImportConfig, UnknownHandlerPolicy};
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};

/// Depth-first, document-order walker over an organization tree.
///
/// Holds no state between items apart from the page counter in the
/// materializer, so sibling order in the tree is the order of every side
/// effect.
pub struct ManifestWalker<'a> {
    config: &'a ImportConfig,
    resolver: ResourceResolver<'a>,
    pages: PageMaterializer<'a>,
}

impl<'a> ManifestWalker<'a> {
    pub fn new(config: &'a ImportConfig, pages: PageMaterializer<'a>) -> Self {
        Self {
            config,
            resolver: ResourceResolver::new(config),
            pages,
        }
    }

    /// Pages created by the walk so far.
    pub fn pages_created(&self) -> usize {
        self.pages.created()
    }

    /// Annotate the `item` children of `container`, recursing into nested
    /// items.
    ///
    /// `depth` is `None` for the organization's own children (the top tier)
    /// and `Some(n)` below it. The first error aborts the walk; items after
    /// the failing one stay unannotated.
    pub fn walk(&mut self, doc: &mut Document, container: NodeId, depth: Option<u32>) -> Result<()> {
        let items: Vec<NodeId> = doc.child_elements(container, "item").collect();

        for item in items {
            if let Some(level) = depth {
                self.annotate(doc, item, &self.config.indent_level_attr, &level.to_string());
            }

            if doc.first_child_element(item, "item").is_some() {
                let ty = match depth {
                    None => CanvasType::Module,
                    Some(_) => CanvasType::Subheader,
                };
                self.set_type(doc, item, ty);
                self.walk(doc, item, Some(depth.map_or(0, |d| d + 1)))?;
            } else if let Some(identifier) = doc.attr(item, "identifierref").map(str::to_owned) {
                self.classify_leaf(doc, item, &identifier, depth)?;
            }
        }

        Ok(())
    }

    fn classify_leaf(
        &mut self,
        doc: &mut Document,
        item: NodeId,
        identifier: &str,
        depth: Option<u32>,
    ) -> Result<()> {
        let (descriptor, path) = self.resolver.resolve(identifier)?.require()?;

        match classify(&descriptor, depth) {
            Classification::Typed {
                ty,
                materialize_page,
            } => {
                debug!(identifier, path = %path.display(), %ty, "classified item");
                self.set_type(doc, item, ty);
                if materialize_page {
                    self.pages.materialize(identifier, &descriptor)?;
                }
            }
            Classification::NoHandler => {
                debug!(identifier, "descriptor has no content handler");
                self.set_type(doc, item, CanvasType::DoNotImport);
            }
            Classification::Unknown(handler) => match self.config.unknown_handler {
                UnknownHandlerPolicy::Fail => {
                    return Err(Error::UnknownContentHandler {
                        identifier: identifier.to_string(),
                        handler,
                    });
                }
                UnknownHandlerPolicy::DoNotImport => {
                    warn!(identifier, %handler, "unknown content handler, not importing");
                    self.set_type(doc, item, CanvasType::DoNotImport);
                }
                UnknownHandlerPolicy::Skip => {
                    warn!(identifier, %handler, "unknown content handler, leaving item unannotated");
                }
            },
        }

        Ok(())
    }

    fn set_type(&self, doc: &mut Document, item: NodeId, ty: CanvasType) {
        self.annotate(doc, item, &self.config.import_type_attr, ty.as_str());
    }

    fn annotate(&self, doc: &mut Document, item: NodeId, name: &str, value: &str) {
        if !doc.add_attr(item, name, value) {
            warn!(
                attribute = name,
                existing = doc.attr(item, name).unwrap_or_default(),
                ignored = value,
                "item already annotated"
            );
        }
    }
}
