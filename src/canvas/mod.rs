//! Canvas-facing collaborators.
//!
//! The classification engine only needs two things from the outside world
//! while it walks: somewhere to create pages ([`CoursePages`]) and a way to
//! clean up Blackboard body markup ([`HtmlRewriter`]).

#[cfg(feature = "canvas")]
mod client;

#[cfg(feature = "canvas")]
pub use client::{CanvasClient, CanvasConfig};

use tracing::debug;

use crate::error::{Error, Result};

/// A wiki page ready to be created in a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub course_id: String,
    pub title: String,
    /// Rewritten HTML body, title heading included.
    pub body: String,
    pub published: bool,
}

/// Remote course API: creates pages.
pub trait CoursePages {
    fn create_page(&mut self, page: &NewPage) -> Result<()>;
}

/// Body markup cleanup applied before a page is submitted.
pub trait HtmlRewriter {
    fn rewrite(&self, html: &str) -> String;
}

/// Cleans up Blackboard body text for Canvas.
///
/// Some exports double-escape their markup, so after XML decoding the body
/// still reads `&lt;p&gt;`. Those are turned back into tags.
///
/// TODO: rewrite embedded file references (`@X@EmbeddedFile.requestUrlStub@X@...`
/// and `@X@EmbeddedFile.location@X@...`) to the Canvas URLs of files that
/// have already been uploaded. They pass through unchanged for now.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackboardHtml;

impl HtmlRewriter for BlackboardHtml {
    fn rewrite(&self, html: &str) -> String {
        html.replace("&lt;", "<").replace("&gt;", ">")
    }
}

/// Records pages instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct DryRun {
    pub pages: Vec<NewPage>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoursePages for DryRun {
    fn create_page(&mut self, page: &NewPage) -> Result<()> {
        debug!(course = %page.course_id, title = %page.title, "dry run: page not sent");
        self.pages.push(page.clone());
        Ok(())
    }
}

/// Extract a course id from either a bare id or a Canvas course URL.
///
/// ```
/// use bbcanvas::canvas::parse_course_ref;
///
/// assert_eq!(parse_course_ref("1127").unwrap(), "1127");
/// assert_eq!(
///     parse_course_ref("https://school.instructure.com/courses/1127/modules").unwrap(),
///     "1127"
/// );
/// ```
pub fn parse_course_ref(input: &str) -> Result<String> {
    let input = input.trim();
    let is_id = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if is_id(input) {
        return Ok(input.to_string());
    }

    let mut segments = input.split(['/', '?', '#']);
    while let Some(segment) = segments.next() {
        if segment == "courses"
            && let Some(id) = segments.next()
            && is_id(id)
        {
            return Ok(id.to_string());
        }
    }

    Err(Error::Config(format!(
        "not a Canvas course id or course URL: {input:?}"
    )))
}
