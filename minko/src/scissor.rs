//! Scissor test and related types.
//!
//! The scissor test is a special test performed at rendering time. It allows to define a region of
//! the screen outside of which fragments will be discarded.

/// The region outside of which fragments will be discarded.
///
/// A box with a negative width or height is a sentinel meaning “the whole current viewport”.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ScissorBox {
  /// The x screen position of the scissor region.
  pub x: i32,

  /// The y screen position of the scissor region.
  pub y: i32,

  /// The screen width of the scissor region.
  pub width: i32,

  /// The screen height of the scissor region.
  pub height: i32,
}

impl ScissorBox {
  /// Sentinel box covering the current viewport.
  pub const FULL_VIEWPORT: ScissorBox = ScissorBox {
    x: 0,
    y: 0,
    width: -1,
    height: -1,
  };

  /// Create a new scissor box.
  pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
    ScissorBox {
      x,
      y,
      width,
      height,
    }
  }

  /// Whether this box stands for the whole viewport.
  pub fn is_full_viewport(&self) -> bool {
    self.width < 0 || self.height < 0
  }
}

impl Default for ScissorBox {
  fn default() -> Self {
    ScissorBox::FULL_VIEWPORT
  }
}

/// A viewport rectangle, in window coordinates.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Viewport {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

impl Viewport {
  pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
    Viewport {
      x,
      y,
      width,
      height,
    }
  }
}
