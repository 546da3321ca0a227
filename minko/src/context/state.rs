//! Device state mirror.

use crate::backend::texture::TextureTarget;
use crate::backend::Name;
use crate::blending::Mode;
use crate::context::RenderTarget;
use crate::depth_stencil::{CompareMode, StencilFunction, StencilOperations};
use crate::face_culling::TriangleCulling;
use crate::handle::{TextureHandle, VertexBufferHandle};
use crate::scissor::{ScissorBox, Viewport};

/// Cached value.
///
/// A cached value is used to prevent issuing costly device commands if we know the target value
/// is already set to what the command tries to set. An empty cache is always invalid, whatever
/// the compared value: it forces the next command through.
#[derive(Debug)]
pub(crate) struct Cached<T>(Option<T>)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  /// Cache a value.
  pub(crate) fn new(initial: T) -> Self {
    Cached(Some(initial))
  }

  /// A cache that knows nothing yet.
  pub(crate) fn unknown() -> Self {
    Cached(None)
  }

  /// Explicitly invalidate a value.
  pub(crate) fn invalidate(&mut self) {
    self.0 = None;
  }

  pub(crate) fn set(&mut self, value: T) {
    self.0 = Some(value);
  }

  pub(crate) fn get(&self) -> Option<&T> {
    self.0.as_ref()
  }

  /// Check if the cached value is invalid regarding a value.
  pub(crate) fn is_invalid(&self, new_val: &T) -> bool {
    match &self.0 {
      Some(ref t) => t != new_val,
      _ => true,
    }
  }
}

/// Attribute pointer setup of one vertex slot. `stride` and `offset` are in floats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct VertexSlot {
  pub(crate) buffer: VertexBufferHandle,
  pub(crate) size: u32,
  pub(crate) stride: u32,
  pub(crate) offset: u32,
}

/// Texture bound to a unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TextureBinding {
  pub(crate) handle: TextureHandle,
  pub(crate) target: TextureTarget,
}

/// What the context believes the device currently holds.
#[derive(Debug)]
pub(crate) struct DeviceState {
  pub(crate) bound_array_buffer: Cached<Name>,
  pub(crate) bound_element_buffer: Cached<Name>,
  pub(crate) vertex_slots: Vec<Cached<VertexSlot>>,
  /// One bit per vertex slot whose attribute array is enabled.
  pub(crate) enabled_vertex_slots: u32,

  pub(crate) active_unit: Cached<u32>,
  pub(crate) bound_textures: Vec<Option<TextureBinding>>,

  pub(crate) current_program: Cached<Name>,

  pub(crate) blending_mode: Cached<Mode>,
  pub(crate) depth: Cached<(bool, CompareMode)>,
  pub(crate) stencil_function: Cached<StencilFunction>,
  pub(crate) stencil_operations: Cached<StencilOperations>,
  pub(crate) triangle_culling: Cached<TriangleCulling>,

  pub(crate) scissor: Cached<(bool, ScissorBox)>,
  /// Whether the scissor test capability is on at the device level.
  pub(crate) scissor_test_enabled: bool,
  pub(crate) viewport: Cached<Viewport>,
  pub(crate) color_mask: Cached<bool>,

  pub(crate) clear_color: Cached<[f32; 4]>,
  pub(crate) clear_depth: Cached<f32>,
  pub(crate) clear_stencil: Cached<i32>,

  pub(crate) bound_framebuffer: Cached<Name>,
  pub(crate) render_target: RenderTarget,
  pub(crate) saved_viewport: Option<Viewport>,
}

impl DeviceState {
  pub(crate) fn new(vertex_attribute_slots: u32, texture_units: u32) -> Self {
    DeviceState {
      bound_array_buffer: Cached::new(0),
      bound_element_buffer: Cached::new(0),
      vertex_slots: (0..vertex_attribute_slots).map(|_| Cached::unknown()).collect(),
      enabled_vertex_slots: 0,
      active_unit: Cached::unknown(),
      bound_textures: vec![None; texture_units as usize],
      current_program: Cached::unknown(),
      blending_mode: Cached::unknown(),
      depth: Cached::unknown(),
      stencil_function: Cached::unknown(),
      stencil_operations: Cached::unknown(),
      triangle_culling: Cached::unknown(),
      scissor: Cached::unknown(),
      scissor_test_enabled: false,
      viewport: Cached::unknown(),
      color_mask: Cached::unknown(),
      clear_color: Cached::unknown(),
      clear_depth: Cached::unknown(),
      clear_stencil: Cached::unknown(),
      bound_framebuffer: Cached::new(0),
      render_target: RenderTarget::BackBuffer,
      saved_viewport: None,
    }
  }

  pub(crate) fn is_vertex_slot_enabled(&self, slot: u32) -> bool {
    self.enabled_vertex_slots & (1 << slot) != 0
  }

  pub(crate) fn set_vertex_slot_enabled(&mut self, slot: u32, enabled: bool) {
    if enabled {
      self.enabled_vertex_slots |= 1 << slot;
    } else {
      self.enabled_vertex_slots &= !(1 << slot);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_cache_is_always_invalid() {
    let mut cache = Cached::unknown();

    assert!(cache.is_invalid(&3));
    cache.set(3);
    assert!(!cache.is_invalid(&3));
    assert!(cache.is_invalid(&4));

    cache.invalidate();
    assert!(cache.is_invalid(&3));
  }

  #[test]
  fn vertex_slot_bitmap() {
    let mut state = DeviceState::new(8, 8);

    state.set_vertex_slot_enabled(3, true);
    state.set_vertex_slot_enabled(5, true);
    state.set_vertex_slot_enabled(3, false);

    assert!(!state.is_vertex_slot_enabled(3));
    assert!(state.is_vertex_slot_enabled(5));
    assert_eq!(state.enabled_vertex_slots, 1 << 5);
  }
}
