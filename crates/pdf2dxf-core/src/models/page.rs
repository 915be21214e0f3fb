//! Page descriptors produced by the illustration locator.

use serde::{Deserialize, Serialize};

/// A page containing an illustration, with its declared size in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Declared page width (1/72 inch).
    pub width: f64,
    /// Declared page height (1/72 inch).
    pub height: f64,
    /// Vector file name, relative to the metadata document.
    pub vector_file: String,
}

impl PageDescriptor {
    /// Build a descriptor, rejecting non-positive sizes and empty file references.
    pub fn new(width: f64, height: f64, vector_file: impl Into<String>) -> Option<Self> {
        let vector_file = vector_file.into();
        let valid = width.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 0.0
            && !vector_file.is_empty();

        valid.then_some(Self {
            width,
            height,
            vector_file,
        })
    }
}
