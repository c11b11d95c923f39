mod app;
mod args;
mod commands;
mod input;
mod picker;
#[doc(hidden)]
pub mod test_support;
pub(crate) mod theme;
mod timeline;

pub use app::{AppState, Regions, layout_regions, run_tui};
pub use args::CliArgs;
