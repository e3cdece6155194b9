//! Per-session page state.
//!
//! Each browser session owns one [`SessionContext`]. It records the last
//! submitted input and what the results area currently shows, and guards
//! the transition into a request so blank input never reaches the model.

use serde::Serialize;

use crate::analysis::{AnalysisRequest, AnalysisResult};
use crate::render::{render_analysis, RenderedAnalysis};

/// Shown while nothing has ever been submitted in this session.
pub const ENTER_ACTION_NOTICE: &str =
    "Enter an action above and click 'Analyze' to see the results.";

/// A failed analysis as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureNotice {
    /// Stable machine-readable error code.
    pub code: String,
    pub message: String,
    /// Raw upstream payload, pretty-printed, when one is available.
    pub diagnostic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Idle,
    /// The analyzer has been invoked and has not returned yet.
    Requesting(AnalysisRequest),
    Displaying(RenderedAnalysis),
    Failed(FailureNotice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    input: String,
    state: PageState,
    submitted_any: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: PageState::Idle,
            submitted_any: false,
        }
    }

    /// Text currently held in the input box.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Handle a press of the analyze control.
    ///
    /// Blank input is a no-op: the state (and any result on display) is
    /// left untouched and `None` is returned, so the caller must not invoke
    /// the analyzer. Otherwise the session moves to `Requesting` and the
    /// request to send is returned.
    pub fn begin(&mut self, input: &str) -> Option<AnalysisRequest> {
        let request = AnalysisRequest::new(input).ok()?;
        self.input = input.to_string();
        self.submitted_any = true;
        self.state = PageState::Requesting(request.clone());
        Some(request)
    }

    /// Record the analyzer's outcome for the request started by [`begin`].
    ///
    /// Ignored unless a request is in flight.
    ///
    /// [`begin`]: SessionContext::begin
    pub fn finish(&mut self, outcome: Result<AnalysisResult, FailureNotice>) {
        let PageState::Requesting(request) = &self.state else {
            return;
        };
        self.state = match outcome {
            Ok(result) => PageState::Displaying(render_analysis(request.action(), &result)),
            Err(failure) => PageState::Failed(failure),
        };
    }

    /// Clear the input and any displayed result.
    pub fn reset(&mut self) {
        self.input.clear();
        self.state = PageState::Idle;
    }

    /// Passive notice for a session that has never submitted anything.
    pub fn notice(&self) -> Option<&'static str> {
        match self.state {
            PageState::Idle if !self.submitted_any => Some(ENTER_ACTION_NOTICE),
            _ => None,
        }
    }
}
