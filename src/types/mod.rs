//! Shared types used throughout the library.

mod direction;
mod transform;

pub use direction::{Axis, Direction};
pub use transform::{ElementRotation, ModelRotation};

use std::collections::HashMap;

/// A block to render: its identifier and block-state properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBlock {
    /// Block name, e.g., "minecraft:stone"
    pub name: String,
    /// Block properties, e.g., {"facing": "north"}
    pub properties: HashMap<String, String>,
}

impl InputBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Prefix an identifier with the default namespace if it has none.
pub fn with_namespace(location: &str) -> String {
    if location.contains(':') {
        location.to_string()
    } else {
        format!("minecraft:{}", location)
    }
}
