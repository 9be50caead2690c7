//! Type definitions shared by the transformation stages.

use source_map::OriginalPosition;

/// One exported token after naming, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    /// The token name as it appears in the declaration.
    pub display_name: String,
    /// Where the token's rule starts in the original stylesheet, if known.
    pub original_position: Option<OriginalPosition>,
}

impl Transformation {
    /// Creates a transformation without a known position.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            original_position: None,
        }
    }

    /// Attaches an original position.
    pub fn with_position(mut self, position: OriginalPosition) -> Self {
        self.original_position = Some(position);
        self
    }
}
