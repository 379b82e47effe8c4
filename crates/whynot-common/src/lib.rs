//! Common utilities for the whynot layout engine.
//!
//! This crate provides shared infrastructure used by all whynot components:
//! - **Warning System** - colored, deduplicated terminal output
//! - **Images** - decoded RGBA image data shared by layout and rendering

pub mod image;
pub mod warning;
