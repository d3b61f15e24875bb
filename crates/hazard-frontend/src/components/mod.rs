//! # UI Components Module
//!
//! Leptos components for the hazard dashboard.

pub mod alert_list;
pub mod controls;
pub mod header;
pub mod map_panel;
pub mod sensor_panel;

pub use alert_list::*;
pub use controls::*;
pub use header::*;
pub use map_panel::*;
pub use sensor_panel::*;
