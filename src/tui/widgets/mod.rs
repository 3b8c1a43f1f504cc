//! TUI Widgets
//!
//! Result renderers for the DataLens TUI.

pub mod chart;
pub mod table;

pub use chart::render_chart;
pub use table::{render_clean, render_rows, render_stats};
