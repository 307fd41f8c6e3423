//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, loading view and overlays
//! - `input`: Keyboard event handling
//! - `form`: Drawing of form inputs
//! - `styles`: Color schemes and text styling
//! - `screens`: One renderer per screen of the two stacks

pub mod form;
pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
