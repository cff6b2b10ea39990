//! Utility modules.

mod layout_config;

pub use layout_config::{LayoutConfig, TableLayoutConfig, TerminalLayoutConfig, WindowLayoutConfig};
