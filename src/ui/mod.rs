//! Terminal UI module using ratatui.

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
