// Library surface for headless/integration tests and reuse.
// The terminal front end lives in the binary (main.rs, ui.rs).
pub mod app_dirs;
pub mod celebration;
pub mod challenge;
pub mod clock;
pub mod config;
pub mod grade;
pub mod history;
pub mod logging;
pub mod presenter;
pub mod runtime;
pub mod scheduler;
pub mod stats;
pub mod stopwatch;
pub mod target;

pub use challenge::Challenge;
