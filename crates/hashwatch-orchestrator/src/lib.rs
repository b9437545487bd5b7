//! Interaction sequence and end-to-end run pipeline for hashwatch
//!
//! This crate provides:
//! - A pure state machine for the search steps
//! - An interaction driver that executes those steps against a browser session
//! - Fail-open observer hooks run after each step (diagnostic screenshots)
//! - The pipeline tying session, traffic capture, extraction and the stored
//!   hash together

pub mod hooks;
pub mod interaction;
pub mod pipeline;
pub mod state_machine;

pub use hooks::{HookResult, ObserverPipeline, ScreenshotHook, StepObserver};
pub use interaction::{InteractionDriver, InteractionScript, Selectors};
pub use pipeline::Pipeline;
pub use state_machine::{transition, Event, State, Step};
