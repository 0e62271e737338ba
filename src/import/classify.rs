//! Content classification: Blackboard content handler -> Canvas type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::Document;

/// The kinds of Canvas content an item can become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanvasType {
    Module,
    Subheader,
    File,
    Page,
    ExternalUrl,
    ModuleItem,
    Quiz,
    Assignment,
    Discussion,
    Announcement,
    DoNotImport,
}

impl CanvasType {
    pub const ALL: [CanvasType; 11] = [
        Self::Module,
        Self::Subheader,
        Self::File,
        Self::Page,
        Self::ExternalUrl,
        Self::ModuleItem,
        Self::Quiz,
        Self::Assignment,
        Self::Discussion,
        Self::Announcement,
        Self::DoNotImport,
    ];

    /// The tag written into the `import-type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "MODULE",
            Self::Subheader => "SUBHEADER",
            Self::File => "FILE",
            Self::Page => "PAGE",
            Self::ExternalUrl => "EXTERNAL_URL",
            Self::ModuleItem => "MODULE_ITEM",
            Self::Quiz => "QUIZ",
            Self::Assignment => "ASSIGNMENT",
            Self::Discussion => "DISCUSSION",
            Self::Announcement => "ANNOUNCEMENT",
            Self::DoNotImport => "DO_NOT_IMPORT",
        }
    }
}

impl fmt::Display for CanvasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanvasType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown Canvas type: {s}"))
    }
}

/// Blackboard content handlers the classifier understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentHandler {
    Assignment,
    CourseLink,
    ExternalLink,
    SurveyLink,
    Folder,
    Lesson,
    /// Virtual classroom (conferencing) link.
    VcLink,
    File,
    Document,
}

impl ContentHandler {
    pub fn from_value(value: &str) -> Option<Self> {
        Some(match value {
            "resource/x-bb-assignment" => Self::Assignment,
            "resource/x-bb-courselink" => Self::CourseLink,
            "resource/x-bb-externallink" => Self::ExternalLink,
            "resource/x-bb-asmt-survey-link" => Self::SurveyLink,
            "resource/x-bb-folder" => Self::Folder,
            "resource/x-bb-lesson" => Self::Lesson,
            "resource/x-bb-vclink" => Self::VcLink,
            "resource/x-bb-file" => Self::File,
            "resource/x-bb-document" => Self::Document,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "resource/x-bb-assignment",
            Self::CourseLink => "resource/x-bb-courselink",
            Self::ExternalLink => "resource/x-bb-externallink",
            Self::SurveyLink => "resource/x-bb-asmt-survey-link",
            Self::Folder => "resource/x-bb-folder",
            Self::Lesson => "resource/x-bb-lesson",
            Self::VcLink => "resource/x-bb-vclink",
            Self::File => "resource/x-bb-file",
            Self::Document => "resource/x-bb-document",
        }
    }
}

/// Outcome of classifying one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Typed {
        ty: CanvasType,
        /// The descriptor should be turned into a page right away.
        materialize_page: bool,
    },
    /// The descriptor carries no content handler at all.
    NoHandler,
    /// A content handler outside the table.
    Unknown(String),
}

impl Classification {
    fn typed(ty: CanvasType) -> Self {
        Self::Typed {
            ty,
            materialize_page: false,
        }
    }
}

/// The `value` of the descriptor's `<contenthandler>` element.
pub fn content_handler(descriptor: &Document) -> Option<&str> {
    let root = descriptor.root()?;
    let handler = descriptor.first_child_element(root, "contenthandler")?;
    descriptor.attr(handler, "value")
}

/// Whether `<body><text>` exists and is non-empty.
pub fn has_body_text(descriptor: &Document) -> bool {
    descriptor
        .root()
        .and_then(|root| descriptor.find_path(root, &["body", "text"]))
        .is_some_and(|text| !descriptor.text(text).is_empty())
}

/// Classify a resource descriptor.
///
/// `depth` is `None` for the top tier of the organization and `Some(n)` for
/// items nested `n` levels below it; only folders and lessons care.
pub fn classify(descriptor: &Document, depth: Option<u32>) -> Classification {
    let Some(value) = content_handler(descriptor) else {
        return Classification::NoHandler;
    };
    let Some(handler) = ContentHandler::from_value(value) else {
        return Classification::Unknown(value.to_string());
    };

    match handler {
        ContentHandler::Assignment => Classification::typed(CanvasType::Assignment),
        ContentHandler::CourseLink => Classification::typed(CanvasType::ModuleItem),
        ContentHandler::ExternalLink if has_body_text(descriptor) => {
            Classification::typed(CanvasType::Page)
        }
        ContentHandler::ExternalLink => Classification::typed(CanvasType::ExternalUrl),
        ContentHandler::SurveyLink => Classification::typed(CanvasType::Quiz),
        ContentHandler::Folder | ContentHandler::Lesson => match depth {
            None => Classification::typed(CanvasType::Module),
            Some(_) => Classification::typed(CanvasType::Subheader),
        },
        // Canvas has no conference item type; the link becomes a plain module item.
        ContentHandler::VcLink => Classification::typed(CanvasType::ModuleItem),
        ContentHandler::File if has_body_text(descriptor) => Classification::typed(CanvasType::Page),
        ContentHandler::File => Classification::typed(CanvasType::File),
        ContentHandler::Document => Classification::Typed {
            ty: CanvasType::Page,
            materialize_page: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::dom::{escape_xml, parse_str};

    fn descriptor(handler: Option<&str>, body: Option<&str>) -> Document {
        let mut xml = String::from("<CONTENT><TITLE VALUE=\"Item\"/>");
        if let Some(body) = body {
            xml.push_str(&format!("<BODY><TEXT>{}</TEXT></BODY>", escape_xml(body)));
        }
        if let Some(handler) = handler {
            xml.push_str(&format!("<CONTENTHANDLER VALUE=\"{handler}\"/>"));
        }
        xml.push_str("</CONTENT>");
        parse_str(&xml).unwrap()
    }

    fn ty(handler: &str, body: Option<&str>, depth: Option<u32>) -> CanvasType {
        match classify(&descriptor(Some(handler), body), depth) {
            Classification::Typed { ty, .. } => ty,
            other => panic!("expected a type, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_handlers() {
        assert_eq!(ty("resource/x-bb-assignment", None, Some(0)), CanvasType::Assignment);
        assert_eq!(ty("resource/x-bb-courselink", None, Some(2)), CanvasType::ModuleItem);
        assert_eq!(ty("resource/x-bb-asmt-survey-link", None, None), CanvasType::Quiz);
        assert_eq!(ty("resource/x-bb-vclink", None, Some(0)), CanvasType::ModuleItem);
    }

    #[test]
    fn test_body_text_rules() {
        assert_eq!(ty("resource/x-bb-externallink", Some("<p>see</p>"), Some(0)), CanvasType::Page);
        assert_eq!(ty("resource/x-bb-externallink", Some(""), Some(0)), CanvasType::ExternalUrl);
        assert_eq!(ty("resource/x-bb-externallink", None, Some(0)), CanvasType::ExternalUrl);
        assert_eq!(ty("resource/x-bb-file", Some("notes"), None), CanvasType::Page);
        assert_eq!(ty("resource/x-bb-file", None, None), CanvasType::File);
    }

    #[test]
    fn test_folders_depend_on_depth() {
        for handler in ["resource/x-bb-folder", "resource/x-bb-lesson"] {
            assert_eq!(ty(handler, None, None), CanvasType::Module);
            assert_eq!(ty(handler, None, Some(0)), CanvasType::Subheader);
            assert_eq!(ty(handler, None, Some(5)), CanvasType::Subheader);
        }
    }

    #[test]
    fn test_only_documents_materialize() {
        let doc = classify(&descriptor(Some("resource/x-bb-document"), Some("x")), Some(0));
        assert_eq!(
            doc,
            Classification::Typed {
                ty: CanvasType::Page,
                materialize_page: true
            }
        );

        let file = classify(&descriptor(Some("resource/x-bb-file"), Some("x")), Some(0));
        assert_eq!(
            file,
            Classification::Typed {
                ty: CanvasType::Page,
                materialize_page: false
            }
        );
    }

    #[test]
    fn test_missing_and_unknown_handlers() {
        assert_eq!(classify(&descriptor(None, None), None), Classification::NoHandler);

        let no_value = parse_str("<content><contenthandler/></content>").unwrap();
        assert_eq!(classify(&no_value, None), Classification::NoHandler);

        assert_eq!(
            classify(&descriptor(Some("resource/x-bb-blankpage"), None), Some(0)),
            Classification::Unknown("resource/x-bb-blankpage".to_string())
        );
    }

    #[test]
    fn test_canvas_type_tags_round_trip() {
        for ty in CanvasType::ALL {
            assert_eq!(ty.as_str().parse::<CanvasType>(), Ok(ty));
        }
        assert!("NO IMPORT".parse::<CanvasType>().is_err());
    }

    proptest! {
        #[test]
        fn prop_file_body_text_decides_page(body in "[a-zA-Z0-9 <>/]{0,40}", depth in proptest::option::of(0u32..8)) {
            let expected = if body.is_empty() { CanvasType::File } else { CanvasType::Page };
            prop_assert_eq!(ty("resource/x-bb-file", Some(&body), depth), expected);
        }

        #[test]
        fn prop_classification_is_idempotent(
            handler in prop::sample::select(vec![
                "resource/x-bb-assignment",
                "resource/x-bb-courselink",
                "resource/x-bb-externallink",
                "resource/x-bb-asmt-survey-link",
                "resource/x-bb-folder",
                "resource/x-bb-lesson",
                "resource/x-bb-vclink",
                "resource/x-bb-file",
                "resource/x-bb-document",
                "resource/x-bb-mystery",
            ]),
            body in proptest::option::of("[a-z ]{0,10}"),
            depth in proptest::option::of(0u32..4),
        ) {
            let doc = descriptor(Some(handler), body.as_deref());
            prop_assert_eq!(classify(&doc, depth), classify(&doc, depth));
        }
    }
}
