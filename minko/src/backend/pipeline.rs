//! Fixed-function state and draw call backend interface.

use std::ops::BitOr;

use crate::backend::DriverError;
use crate::blending::{Destination, Source};
use crate::depth_stencil::{CompareMode, StencilOperation};
use crate::face_culling::Face;

/// Device capabilities that can be switched on and off.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Capability {
  Blend,
  DepthTest,
  StencilTest,
  CullFace,
  ScissorTest,
}

/// Buffers to clear.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ClearMask(u8);

impl ClearMask {
  pub const COLOR: ClearMask = ClearMask(1 << 0);
  pub const DEPTH: ClearMask = ClearMask(1 << 1);
  pub const STENCIL: ClearMask = ClearMask(1 << 2);
  pub const ALL: ClearMask = ClearMask(0b111);

  pub fn contains(self, other: ClearMask) -> bool {
    self.0 & other.0 == other.0
  }

  pub fn is_empty(self) -> bool {
    self.0 == 0
  }
}

impl BitOr for ClearMask {
  type Output = ClearMask;

  fn bitor(self, rhs: ClearMask) -> ClearMask {
    ClearMask(self.0 | rhs.0)
  }
}

/// Pipeline backend.
pub trait Pipeline {
  fn enable(&mut self, capability: Capability);

  fn disable(&mut self, capability: Capability);

  fn blend_func(&mut self, source: Source, destination: Destination);

  fn depth_mask(&mut self, mask: bool);

  fn depth_func(&mut self, func: CompareMode);

  fn stencil_func(&mut self, func: CompareMode, reference: i32, mask: u32);

  fn stencil_op(&mut self, fail: StencilOperation, z_fail: StencilOperation, z_pass: StencilOperation);

  fn cull_face(&mut self, face: Face);

  fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);

  fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);

  /// Viewport currently set on the device, as `[x, y, width, height]`.
  fn get_viewport(&mut self) -> [i32; 4];

  fn color_mask(&mut self, mask: bool);

  fn clear_color(&mut self, color: [f32; 4]);

  fn clear_depth(&mut self, depth: f32);

  fn clear_stencil(&mut self, stencil: i32);

  fn clear(&mut self, mask: ClearMask);

  /// Describe float vertex attribute `slot` from the bound array buffer. `stride` and `offset`
  /// are in bytes.
  fn vertex_attrib_pointer(&mut self, slot: u32, size: u32, stride: usize, offset: usize);

  fn enable_vertex_attrib_array(&mut self, slot: u32);

  fn disable_vertex_attrib_array(&mut self, slot: u32);

  /// Draw `count` 16-bit indices of the bound element buffer as triangles.
  fn draw_elements(&mut self, count: u32, first_index: u32);

  /// Draw `count` vertices as triangles.
  fn draw_arrays(&mut self, first: u32, count: u32);

  /// Pop the device error flag.
  fn get_error(&mut self) -> Option<DriverError>;

  /// Extensions advertised by the device.
  fn extensions(&mut self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clear_mask_union() {
    let mask = ClearMask::COLOR | ClearMask::DEPTH;

    assert!(mask.contains(ClearMask::COLOR));
    assert!(mask.contains(ClearMask::DEPTH));
    assert!(!mask.contains(ClearMask::STENCIL));
    assert!(ClearMask::ALL.contains(mask));
  }
}
