//! Depth and stencil test related features.

/// Comparison to perform for depth / stencil operations. `a` is the incoming fragment’s data and b
/// is the fragment’s data that is already stored.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum CompareMode {
  /// Test always succeeds.
  Always,
  /// Test succeeds if `a == b`.
  Equal,
  /// Test succeeds if `a > b`.
  Greater,
  /// Test succeeds if `a >= b`.
  GreaterEqual,
  /// Test succeeds if `a < b`.
  Less,
  /// Test succeeds if `a <= b`.
  LessEqual,
  /// Test never succeeds.
  Never,
  /// Test succeeds if `a != b`.
  NotEqual,
}

impl Default for CompareMode {
  fn default() -> Self {
    CompareMode::Less
  }
}

/// Possible stencil operations.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum StencilOperation {
  /// Keep the current value.
  Keep,

  /// Set the stencil value to zero.
  Zero,

  /// Replace the stencil value with the reference value.
  Replace,

  /// Increment the stencil value.
  ///
  /// If the stencil value reaches the maximum possible value, it is clamped.
  Incr,

  /// Increment the stencil value.
  ///
  /// If the stencil value reaches the maximum possible value, it wraps around back to `0`.
  IncrWrap,

  /// Decrement the stencil value.
  ///
  /// If the stencil value reaches 0, it is clamped.
  Decr,

  /// Decrement the stencil value.
  ///
  /// If the stencil value reaches 0, it wraps back to the maximum value.
  DecrWrap,

  /// Bit-wise inversion.
  Invert,
}

impl Default for StencilOperation {
  fn default() -> Self {
    StencilOperation::Keep
  }
}

/// The stencil test is a bit weird. It’s a [`CompareMode`] as well as a reference value and the
/// « stencil mask ».
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct StencilFunction {
  /// Comparison to apply to make a fragment pass the test.
  pub func: CompareMode,

  /// Reference value for the comparison.
  pub reference: i32,

  /// The mask to apply on the fragment stencil value.
  pub mask: u32,
}

impl StencilFunction {
  /// Create a new [`StencilFunction`] from the comparison, reference and mask values.
  pub fn new(func: CompareMode, reference: i32, mask: u32) -> Self {
    Self {
      func,
      reference,
      mask,
    }
  }
}

/// Default: always pass, reference `0`, full mask.
impl Default for StencilFunction {
  fn default() -> Self {
    StencilFunction::new(CompareMode::Always, 0, 0xFF)
  }
}

/// The stencil operations, one per outcome of the stencil and depth tests.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct StencilOperations {
  /// Action to take when the stencil test fails.
  pub fail: StencilOperation,

  /// Action to take when the stencil test passes but not the depth test.
  pub z_fail: StencilOperation,

  /// Action to take when both the depth and stencil tests pass.
  pub z_pass: StencilOperation,
}

impl StencilOperations {
  /// Create a new set of stencil operations.
  pub fn new(fail: StencilOperation, z_fail: StencilOperation, z_pass: StencilOperation) -> Self {
    StencilOperations {
      fail,
      z_fail,
      z_pass,
    }
  }
}
