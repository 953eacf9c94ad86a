//! Common imports and types used throughout Madrona.

pub use std::collections::HashMap;

pub type Result<T> = std::result::Result<T, crate::core::errors::CoreError>;
