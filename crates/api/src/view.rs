//! HTML page rendering.
//!
//! The page template is embedded at compile time. It is named `*.html`, so
//! minijinja escapes every interpolated value; model output never reaches
//! the browser unescaped.

use minijinja::{context, Environment};
use serde::Serialize;

use dbimpact_core::page::{FailureNotice, PageState, SessionContext};
use dbimpact_core::render::RenderedAnalysis;
use dbimpact_core::schema::{Branding, SchemaCatalog};

const PAGE_TEMPLATE: &str = "page.html";

/// Everything the page template reads.
#[derive(Debug, Serialize)]
struct PageView<'a> {
    branding: &'a Branding,
    input: &'a str,
    notice: Option<&'static str>,
    result: Option<&'a RenderedAnalysis>,
    failure: Option<&'a FailureNotice>,
}

/// Compiled page template.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../templates/page.html"))?;
        Ok(Self { env })
    }

    /// Render the full page for one session.
    pub fn render(
        &self,
        catalog: &SchemaCatalog,
        session: &SessionContext,
    ) -> Result<String, minijinja::Error> {
        let (result, failure) = match session.state() {
            PageState::Displaying(rendered) => (Some(rendered), None),
            PageState::Failed(failure) => (None, Some(failure)),
            // An abandoned request shows nothing until the next submit.
            PageState::Idle | PageState::Requesting(_) => (None, None),
        };

        let page = PageView {
            branding: &catalog.branding,
            input: session.input(),
            notice: session.notice(),
            result,
            failure,
        };

        self.env
            .get_template(PAGE_TEMPLATE)?
            .render(context! { page => page })
    }
}
