//! Pure state machine for the search interaction
//!
//! The interaction is a fixed linear script. This module only knows the order
//! of the steps and how each one ends; it does no I/O. The driver in
//! [`crate::interaction`] performs each step and feeds the result back in.
//!
//! - Pure function: transition(state, event) -> state
//! - Invalid transitions go to Failed state (never panic)

use serde::{Deserialize, Serialize};

/// One step of the search interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Load the search page and let it render
    LoadPage,
    /// Click "Expand all" to reveal the advanced filters
    ExpandFilters,
    /// Type the keyword into the title-name input
    EnterKeyword,
    /// Click the "Movie" category chip
    SelectCategory,
    /// Press Enter on the title-name input
    SubmitSearch,
    /// Wait for the first result title
    AwaitResults,
}

impl Step {
    /// All steps, in execution order
    pub const SEQUENCE: [Step; 6] = [
        Step::LoadPage,
        Step::ExpandFilters,
        Step::EnterKeyword,
        Step::SelectCategory,
        Step::SubmitSearch,
        Step::AwaitResults,
    ];

    pub fn first() -> Self {
        Step::LoadPage
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::LoadPage => Some(Step::ExpandFilters),
            Step::ExpandFilters => Some(Step::EnterKeyword),
            Step::EnterKeyword => Some(Step::SelectCategory),
            Step::SelectCategory => Some(Step::SubmitSearch),
            Step::SubmitSearch => Some(Step::AwaitResults),
            Step::AwaitResults => None,
        }
    }

    /// Name of the diagnostic snapshot taken after this step, if any
    pub fn snapshot_name(self) -> Option<&'static str> {
        match self {
            Step::LoadPage => Some("01_current_url"),
            Step::ExpandFilters => Some("02_after_expand_all_click"),
            Step::EnterKeyword => Some("03_after_sending_keyword"),
            Step::SelectCategory => Some("04_after_movie_button_click"),
            Step::SubmitSearch => None,
            Step::AwaitResults => Some("05_after_search_results_found"),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::LoadPage => write!(f, "load_page"),
            Step::ExpandFilters => write!(f, "expand_filters"),
            Step::EnterKeyword => write!(f, "enter_keyword"),
            Step::SelectCategory => write!(f, "select_category"),
            Step::SubmitSearch => write!(f, "submit_search"),
            Step::AwaitResults => write!(f, "await_results"),
        }
    }
}

/// Interaction state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Step is next to run
    Ready(Step),
    /// Results page loaded
    Complete,
    /// A step failed; the interaction is over
    Failed { step: Option<Step>, error: String },
}

impl State {
    pub fn initial() -> Self {
        State::Ready(Step::first())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Complete | State::Failed { .. })
    }
}

/// Result of running the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StepSucceeded,
    StepFailed { error: String },
}

/// Pure state transition function
///
/// Events arriving in a terminal state produce a Failed state describing the
/// invalid transition. This function never panics.
pub fn transition(state: State, event: Event) -> State {
    match (state, event) {
        (State::Ready(step), Event::StepSucceeded) => match step.next() {
            Some(next) => State::Ready(next),
            None => State::Complete,
        },
        (State::Ready(step), Event::StepFailed { error }) => State::Failed {
            step: Some(step),
            error,
        },
        (state, event) => State::Failed {
            step: None,
            error: format!("Invalid transition from {:?} on {:?}", state, event),
        },
    }
}
