//! Render extraction
//!
//! Drawing lives outside this crate. This module only copies active body
//! state into plain-old-data records a renderer can upload as-is.

pub mod instance;

pub use instance::{BodyInstance, REFERENCE_SPEED, as_bytes, extract_instances, speed_color};
