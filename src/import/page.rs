//! Turns `resource/x-bb-document` descriptors into Canvas pages.

use tracing::info;

use crate::canvas::{CoursePages, HtmlRewriter, NewPage};
use crate::dom::{Document, escape_xml};
use crate::error::{DescriptorFault, Error, Result};

/// Build the page for a descriptor without sending it.
///
/// The descriptor must have `<title value="...">` (non-empty) and
/// `<body><text>`; the body may be empty. Canvas strips `<h1>`, so the title
/// is repeated as an `<h2>` at the top of the body.
pub fn build_page(
    identifier: &str,
    descriptor: &Document,
    course_id: &str,
    rewriter: &dyn HtmlRewriter,
) -> Result<NewPage> {
    let malformed = |fault| Error::MalformedDescriptor {
        identifier: identifier.to_string(),
        fault,
    };
    let root = descriptor
        .root()
        .ok_or_else(|| malformed(DescriptorFault::MissingTitle))?;

    let title = descriptor
        .first_child_element(root, "title")
        .and_then(|node| descriptor.attr(node, "value"))
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| malformed(DescriptorFault::MissingTitle))?;

    let text = descriptor
        .find_path(root, &["body", "text"])
        .ok_or_else(|| malformed(DescriptorFault::MissingText))?;

    let body = rewriter.rewrite(&descriptor.text(text));

    Ok(NewPage {
        course_id: course_id.to_string(),
        title: title.to_string(),
        body: format!("<h2>{}</h2>\n{body}", escape_xml(title)),
        published: true,
    })
}

/// Creates pages in one course as the walk reaches them.
pub struct PageMaterializer<'a> {
    pages: &'a mut dyn CoursePages,
    rewriter: &'a dyn HtmlRewriter,
    course_id: String,
    created: usize,
}

impl<'a> PageMaterializer<'a> {
    pub fn new(
        pages: &'a mut dyn CoursePages,
        rewriter: &'a dyn HtmlRewriter,
        course_id: impl Into<String>,
    ) -> Self {
        Self {
            pages,
            rewriter,
            course_id: course_id.into(),
            created: 0,
        }
    }

    pub fn materialize(&mut self, identifier: &str, descriptor: &Document) -> Result<()> {
        let page = build_page(identifier, descriptor, &self.course_id, self.rewriter)?;
        self.pages.create_page(&page)?;
        self.created += 1;
        info!(identifier, title = %page.title, "materialized page");
        Ok(())
    }

    /// Pages created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BlackboardHtml, DryRun};
    use crate::dom::parse_str;

    #[test]
    fn test_build_page() {
        let descriptor = parse_str(
            r#"<CONTENT>
  <TITLE VALUE="Course Syllabus"/>
  <BODY><TEXT>&amp;lt;p&amp;gt;Welcome&amp;lt;/p&amp;gt;</TEXT><TYPE value="H"/></BODY>
  <CONTENTHANDLER VALUE="resource/x-bb-document"/>
</CONTENT>"#,
        )
        .unwrap();

        let page = build_page("res00003", &descriptor, "1126", &BlackboardHtml).unwrap();
        assert_eq!(page.title, "Course Syllabus");
        assert_eq!(page.body, "<h2>Course Syllabus</h2>\n<p>Welcome</p>");
        assert_eq!(page.course_id, "1126");
        assert!(page.published);
    }

    #[test]
    fn test_missing_title_names_identifier() {
        let descriptor = parse_str("<content><body><text>hi</text></body></content>").unwrap();
        let err = build_page("res00009", &descriptor, "1", &BlackboardHtml).unwrap_err();
        match err {
            Error::MalformedDescriptor { identifier, fault } => {
                assert_eq!(identifier, "res00009");
                assert_eq!(fault, DescriptorFault::MissingTitle);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let blank = parse_str("<content><title value=\"  \"/><body><text/></body></content>").unwrap();
        assert!(build_page("res1", &blank, "1", &BlackboardHtml).is_err());
    }

    #[test]
    fn test_missing_text() {
        let descriptor = parse_str("<content><title value=\"T\"/><body/></content>").unwrap();
        let err = build_page("res00010", &descriptor, "1", &BlackboardHtml).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedDescriptor {
                fault: DescriptorFault::MissingText,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_body_is_allowed() {
        let descriptor = parse_str("<content><title value=\"T\"/><body><text/></body></content>").unwrap();
        let page = build_page("res1", &descriptor, "1", &BlackboardHtml).unwrap();
        assert_eq!(page.body, "<h2>T</h2>\n");
    }

    #[test]
    fn test_materializer_submits_and_counts() {
        let descriptor = parse_str("<content><title value=\"T\"/><body><text>x</text></body></content>").unwrap();
        let mut api = DryRun::new();
        {
            let mut pages = PageMaterializer::new(&mut api, &BlackboardHtml, "77");
            pages.materialize("res1", &descriptor).unwrap();
            assert_eq!(pages.created(), 1);
        }
        assert_eq!(api.pages.len(), 1);
        assert_eq!(api.pages[0].course_id, "77");
    }
}
