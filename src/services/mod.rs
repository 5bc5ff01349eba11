//! Service layer for business logic
//!
//! This module provides the logic shared by every HTTP handler.

mod encoder;

pub use encoder::*;
