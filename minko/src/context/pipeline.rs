//! Fixed-function state, bindings and draw calls.

use crate::backend::pipeline::{Capability, ClearMask};
use crate::backend::Backend;
use crate::blending::{Destination, Mode, Source};
use crate::context::state::VertexSlot;
use crate::context::{Context, ContextError};
use crate::depth_stencil::{CompareMode, StencilFunction, StencilOperation, StencilOperations};
use crate::face_culling::TriangleCulling;
use crate::handle::{IndexBufferHandle, TextureHandle, VertexBufferHandle};
use crate::render_state::States;
use crate::scissor::{ScissorBox, Viewport};
use crate::shader::Location;
use crate::texture::{MipFilter, TextureFilter, WrapMode};

impl<B> Context<B>
where
  B: Backend,
{
  /// Feed vertex attribute `slot` from a vertex buffer.
  ///
  /// `size` is the number of components, `stride` and `offset` are counted in floats. `None`
  /// disables the attribute array of the slot.
  pub fn set_vertex_buffer_at(
    &mut self,
    slot: u32,
    buffer: Option<VertexBufferHandle>,
    size: u32,
    stride: u32,
    offset: u32,
  ) -> Result<(), ContextError> {
    if slot >= self.config.vertex_attribute_slots {
      return Err(ContextError::invalid_argument(format!(
        "vertex attribute slot {} out of range (0..{})",
        slot, self.config.vertex_attribute_slots
      )));
    }

    match buffer {
      Some(buffer) => {
        let name = self
          .vertex_buffers
          .get(buffer)
          .ok_or(ContextError::StaleHandle)?
          .name;
        let setup = VertexSlot {
          buffer,
          size,
          stride,
          offset,
        };

        if self.state.vertex_slots[slot as usize].is_invalid(&setup) {
          self.bind_array_buffer(name);
          self.backend.vertex_attrib_pointer(
            slot,
            size,
            stride as usize * 4,
            offset as usize * 4,
          );
          self.state.vertex_slots[slot as usize].set(setup);
        }

        if !self.state.is_vertex_slot_enabled(slot) {
          self.backend.enable_vertex_attrib_array(slot);
          self.state.set_vertex_slot_enabled(slot, true);
        }
      }

      None => {
        if self.state.is_vertex_slot_enabled(slot) {
          self.backend.disable_vertex_attrib_array(slot);
          self.state.set_vertex_slot_enabled(slot, false);
        }
      }
    }

    self.debug_check();
    Ok(())
  }

  /// Bind a texture to unit `slot` and point the sampler uniform at `location` to it.
  ///
  /// The binding is skipped when the unit already holds the texture; the uniform is always pushed.
  pub fn set_texture_at(
    &mut self,
    slot: u32,
    texture: Option<TextureHandle>,
    location: Option<Location>,
  ) -> Result<(), ContextError> {
    self.check_texture_unit(slot)?;
    self.bind_texture_unit(slot, texture)?;

    if let (Some(_), Some(location)) = (texture, location) {
      if location >= 0 {
        self.backend.uniform_ints(location, 1, &[slot as i32]);
      }
    }

    self.debug_check();
    Ok(())
  }

  /// Set the sampler state of the texture bound to unit `slot`.
  ///
  /// Sampler parameters belong to the texture: each is compared against what was last set on
  /// that texture, wherever it was bound. Textures without mipmaps always get
  /// [`MipFilter::None`]. Nothing happens if the unit is empty.
  pub fn set_sampler_state_at(
    &mut self,
    slot: u32,
    wrap_mode: WrapMode,
    texture_filter: TextureFilter,
    mip_filter: MipFilter,
  ) -> Result<(), ContextError> {
    self.check_texture_unit(slot)?;
    self.apply_sampler_state(slot, wrap_mode, texture_filter, mip_filter)
  }

  pub fn set_blending_mode(&mut self, mode: Mode) {
    if self.state.blending_mode.is_invalid(&mode) {
      self.backend.blend_func(mode.source(), mode.destination());
      self.state.blending_mode.set(mode);
      self.debug_check();
    }
  }

  pub fn set_blending_factors(&mut self, source: Source, destination: Destination) {
    self.set_blending_mode(source | destination);
  }

  /// Set the depth write mask and comparison; both are sent whenever either changes.
  pub fn set_depth_test(&mut self, depth_mask: bool, depth_func: CompareMode) {
    let depth = (depth_mask, depth_func);

    if self.state.depth.is_invalid(&depth) {
      self.backend.depth_mask(depth_mask);
      self.backend.depth_func(depth_func);
      self.state.depth.set(depth);
      self.debug_check();
    }
  }

  /// Set the stencil test.
  ///
  /// The function group (`func`, `reference`, `mask`) and the operation group (`fail`,
  /// `z_fail`, `z_pass`) are compared independently.
  pub fn set_stencil_test(
    &mut self,
    func: CompareMode,
    reference: i32,
    mask: u32,
    fail: StencilOperation,
    z_fail: StencilOperation,
    z_pass: StencilOperation,
  ) {
    let function = StencilFunction::new(func, reference, mask);
    let operations = StencilOperations::new(fail, z_fail, z_pass);

    if self.state.stencil_function.is_invalid(&function) {
      self.backend.stencil_func(func, reference, mask);
      self.state.stencil_function.set(function);
    }

    if self.state.stencil_operations.is_invalid(&operations) {
      self.backend.stencil_op(fail, z_fail, z_pass);
      self.state.stencil_operations.set(operations);
    }

    self.debug_check();
  }

  /// Set triangle culling. [`TriangleCulling::None`] switches culling off at the device level.
  pub fn set_triangle_culling(&mut self, culling: TriangleCulling) {
    if !self.state.triangle_culling.is_invalid(&culling) {
      return;
    }

    match culling.face() {
      None => self.backend.disable(Capability::CullFace),

      Some(face) => {
        let was_culling = matches!(
          self.state.triangle_culling.get(),
          Some(previous) if *previous != TriangleCulling::None
        );

        if !was_culling {
          self.backend.enable(Capability::CullFace);
        }

        self.backend.cull_face(face);
      }
    }

    self.state.triangle_culling.set(culling);
    self.debug_check();
  }

  /// Set the scissor test.
  ///
  /// A box with a negative dimension stands for the current viewport.
  pub fn set_scissor_test(&mut self, enabled: bool, scissor_box: ScissorBox) {
    let scissor = (enabled, scissor_box);

    if self.state.scissor.is_invalid(&scissor) {
      self.state.scissor.set(scissor);
      self.sync_scissor();
      self.debug_check();
    }
  }

  // Push the mirrored scissor state to the device. A full-viewport box follows the viewport; with
  // no viewport known yet, the test is left off.
  fn sync_scissor(&mut self) {
    let (enabled, scissor_box) = match self.state.scissor.get() {
      Some(scissor) => *scissor,
      None => return,
    };

    let rect = if !enabled {
      None
    } else if scissor_box.is_full_viewport() {
      self
        .state
        .viewport
        .get()
        .map(|v| ScissorBox::new(v.x, v.y, v.width, v.height))
    } else {
      Some(scissor_box)
    };

    match rect {
      Some(rect) => {
        if !self.state.scissor_test_enabled {
          self.backend.enable(Capability::ScissorTest);
          self.state.scissor_test_enabled = true;
        }

        self
          .backend
          .scissor(rect.x, rect.y, rect.width, rect.height);
      }

      None => {
        if self.state.scissor_test_enabled {
          self.backend.disable(Capability::ScissorTest);
          self.state.scissor_test_enabled = false;
        }
      }
    }
  }

  pub fn configure_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
    let viewport = Viewport::new(x, y, width, height);

    if self.state.viewport.is_invalid(&viewport) {
      self.backend.viewport(x, y, width, height);
      self.state.viewport.set(viewport);

      if matches!(self.state.scissor.get(), Some((true, b)) if b.is_full_viewport()) {
        self.sync_scissor();
      }

      self.debug_check();
    }
  }

  pub fn set_color_mask(&mut self, color_mask: bool) {
    if self.state.color_mask.is_invalid(&color_mask) {
      self.backend.color_mask(color_mask);
      self.state.color_mask.set(color_mask);
      self.debug_check();
    }
  }

  /// Clear the buffers selected by `mask` of the current render target.
  ///
  /// Clear values are cached. Clearing depth turns the depth write mask on.
  pub fn clear(&mut self, color: [f32; 4], depth: f32, stencil: i32, mask: ClearMask) {
    if mask.is_empty() {
      return;
    }

    if mask.contains(ClearMask::COLOR) && self.state.clear_color.is_invalid(&color) {
      self.backend.clear_color(color);
      self.state.clear_color.set(color);
    }

    if mask.contains(ClearMask::DEPTH) {
      if self.state.clear_depth.is_invalid(&depth) {
        self.backend.clear_depth(depth);
        self.state.clear_depth.set(depth);
      }

      let depth_func = self
        .state
        .depth
        .get()
        .map(|(_, func)| *func)
        .unwrap_or_default();
      self.set_depth_test(true, depth_func);
    }

    if mask.contains(ClearMask::STENCIL) && self.state.clear_stencil.is_invalid(&stencil) {
      self.backend.clear_stencil(stencil);
      self.state.clear_stencil.set(stencil);
    }

    self.backend.clear(mask);
    self.debug_check();
  }

  /// Draw `num_triangles` indexed triangles, starting at index `first_index`.
  ///
  /// The indices read must lie within the index buffer.
  pub fn draw_triangles(
    &mut self,
    index_buffer: IndexBufferHandle,
    first_index: u32,
    num_triangles: u32,
  ) -> Result<(), ContextError> {
    let record = self
      .index_buffers
      .get(index_buffer)
      .ok_or(ContextError::StaleHandle)?;
    let name = record.name;

    let count = num_triangles
      .checked_mul(3)
      .filter(|count| u64::from(first_index) + u64::from(*count) <= record.len as u64)
      .ok_or_else(|| {
        ContextError::invalid_argument(format!(
          "{} triangles from index {} overrun an index buffer of {} indices",
          num_triangles, first_index, record.len
        ))
      })?;

    self.bind_element_buffer(name);
    self.backend.draw_elements(count, first_index);

    self.debug_check();
    Ok(())
  }

  /// Draw `num_triangles` non-indexed triangles, starting at vertex `first_vertex`.
  ///
  /// The element buffer is unbound.
  pub fn draw_triangles_arrays(&mut self, first_vertex: u32, num_triangles: u32) {
    self.bind_element_buffer(0);
    self
      .backend
      .draw_arrays(first_vertex, num_triangles.saturating_mul(3));
    self.debug_check();
  }

  /// Read back RGBA8 pixels from the current render target into `out`.
  ///
  /// This is a synchronous read: it stalls until the device has completed every pending command.
  pub fn read_pixels(
    &mut self,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    out: &mut [u8],
  ) -> Result<(), ContextError> {
    let expected = width as usize * height as usize * 4;

    if out.len() < expected {
      return Err(ContextError::invalid_argument(format!(
        "{} bytes given to read back {}×{} RGBA pixels ({} expected)",
        out.len(),
        width,
        height,
        expected
      )));
    }

    self
      .backend
      .read_pixels(x, y, width, height, &mut out[..expected]);

    self.debug_check();
    Ok(())
  }

  /// Apply the fixed-function part and the render target of a [`States`] snapshot.
  ///
  /// Sampler states are keyed by sampler name; they are applied by whoever maps names to units,
  /// through [`Context::set_sampler_state_at`].
  pub fn apply_states(&mut self, states: &States) -> Result<(), ContextError> {
    match states.target() {
      Some(target) => self.set_render_to_texture(target, true)?,
      None => self.set_render_to_back_buffer(),
    }

    self.set_blending_mode(states.blending_mode());
    self.set_depth_test(states.depth_mask(), states.depth_function());
    self.set_triangle_culling(states.triangle_culling());

    let function = states.stencil_function();
    let operations = states.stencil_operations();
    self.set_stencil_test(
      function.func,
      function.reference,
      function.mask,
      operations.fail,
      operations.z_fail,
      operations.z_pass,
    );

    self.set_scissor_test(states.scissor_test(), states.scissor_box());

    Ok(())
  }
}
