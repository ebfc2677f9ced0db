//! Core view-state newtypes

/// Height of a row in lines. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineHeight(u16);

/// Error returned when attempting to create a LineHeight of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("LineHeight must be >= 1 (got {0})")]
pub struct InvalidLineHeight(pub u16);

impl LineHeight {
    /// Minimum row height.
    pub const ONE: Self = Self(1);

    /// Smart constructor that validates line height is >= 1.
    pub fn new(height: u16) -> Result<Self, InvalidLineHeight> {
        if height == 0 {
            Err(InvalidLineHeight(height))
        } else {
            Ok(Self(height))
        }
    }

    /// Get the raw u16 value.
    pub fn get(&self) -> u16 {
        self.0
    }
}

impl Default for LineHeight {
    fn default() -> Self {
        Self::ONE
    }
}

/// Absolute line offset from the top of the list. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LineOffset(usize);

impl LineOffset {
    /// Create a new LineOffset from a raw value.
    pub fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Get the raw usize value.
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Viewport dimensions in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportDimensions {
    /// Width in terminal columns.
    pub width: u16,
    /// Height in terminal rows.
    pub height: u16,
}

impl ViewportDimensions {
    /// Create new viewport dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}
