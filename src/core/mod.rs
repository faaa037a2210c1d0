//! Run orchestration.

pub mod runtime;

pub use runtime::{run_screen, ScreenRuntime, PROGRESS_EVERY};
