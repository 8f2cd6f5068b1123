//! ANSI output for zones and the text projections of panel read models.

mod core;
mod views;

pub use core::{AnsiRenderer, RendererSettings, wrap_to_width};
pub use views::{WorkbenchFrame, project_frame};
