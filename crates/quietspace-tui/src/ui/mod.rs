//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `heatmap`: Contribution grid drawing shared by two tabs
//! - `tabs`: Tab-specific content rendering

pub mod heatmap;
pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
