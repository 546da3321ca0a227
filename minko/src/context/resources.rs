//! Buffer and texture lifecycle: creation, upload, deletion.

use log::debug;

use crate::backend::buffer::{BufferTarget, BufferUsage};
use crate::backend::texture::{CubeFace, ImageTarget};
use crate::backend::Backend;
use crate::backend::Name;
use crate::context::state::{Cached, TextureBinding};
use crate::context::{
  BufferRecord, Context, ContextError, RenderTarget, RenderTargetRecord, SamplerCache,
  TextureRecord,
};
use crate::handle::{IndexBufferHandle, TextureHandle, VertexBufferHandle};
use crate::texture::{
  MipFilter, SamplerState, TextureFilter, TextureFormat, TextureFormatInfo, TextureType, WrapMode,
};

fn image_targets(ty: TextureType) -> Vec<ImageTarget> {
  match ty {
    TextureType::Texture2d => vec![ImageTarget::Texture2d],
    TextureType::CubeTexture => CubeFace::ALL.iter().map(|f| ImageTarget::CubeFace(*f)).collect(),
  }
}

// Dimensions of every level of a chain; a single level without mipmapping.
fn mip_chain(width: u32, height: u32, mip_mapping: bool) -> Vec<(u32, u32)> {
  let mut levels = vec![(width, height)];

  if mip_mapping {
    let (mut w, mut h) = (width, height);

    while w > 1 || h > 1 {
      w = (w / 2).max(1);
      h = (h / 2).max(1);
      levels.push((w, h));
    }
  }

  levels
}

// Uploads may fill a level, never re-specify it: the record describes the allocation.
fn check_level_size(
  record: &TextureRecord,
  mip_level: u32,
  width: u32,
  height: u32,
) -> Result<(), ContextError> {
  let chain = mip_chain(record.width, record.height, record.mip_mapping);

  match chain.get(mip_level as usize) {
    Some(&level) if level == (width, height) => Ok(()),

    Some(&(w, h)) => Err(ContextError::invalid_argument(format!(
      "level {} of this texture is {}×{}, got {}×{}",
      mip_level, w, h, width, height
    ))),

    None => Err(ContextError::invalid_argument(format!(
      "mip level {} beyond a chain of {} levels",
      mip_level,
      chain.len()
    ))),
  }
}

impl<B> Context<B>
where
  B: Backend,
{
  pub(super) fn bind_array_buffer(&mut self, name: Name) {
    if self.state.bound_array_buffer.is_invalid(&name) {
      self.backend.bind_buffer(BufferTarget::Array, name);
      self.state.bound_array_buffer.set(name);
    }
  }

  pub(super) fn bind_element_buffer(&mut self, name: Name) {
    if self.state.bound_element_buffer.is_invalid(&name) {
      self.backend.bind_buffer(BufferTarget::ElementArray, name);
      self.state.bound_element_buffer.set(name);
    }
  }

  pub(super) fn bind_framebuffer(&mut self, name: Name) {
    if self.state.bound_framebuffer.is_invalid(&name) {
      self.backend.bind_framebuffer(name);
      self.state.bound_framebuffer.set(name);
    }
  }

  pub(super) fn activate_texture_unit(&mut self, unit: u32) {
    if self.state.active_unit.is_invalid(&unit) {
      self.backend.active_texture(unit);
      self.state.active_unit.set(unit);
    }
  }

  pub(super) fn check_texture_unit(&self, slot: u32) -> Result<(), ContextError> {
    if slot < self.config.texture_units {
      Ok(())
    } else {
      Err(ContextError::invalid_argument(format!(
        "texture unit {} out of range (0..{})",
        slot, self.config.texture_units
      )))
    }
  }

  /// Bind a texture (or nothing) to a unit, through the mirror.
  pub(super) fn bind_texture_unit(
    &mut self,
    unit: u32,
    texture: Option<TextureHandle>,
  ) -> Result<(), ContextError> {
    let binding = match texture {
      Some(handle) => Some(TextureBinding {
        handle,
        target: self.texture(handle)?.target,
      }),
      None => None,
    };
    let current = self.state.bound_textures[unit as usize];

    if current != binding {
      self.activate_texture_unit(unit);

      match binding {
        Some(b) => {
          let name = self.texture(b.handle)?.name;
          self.backend.bind_texture(b.target, name);
        }

        None => {
          if let Some(previous) = current {
            self.backend.bind_texture(previous.target, 0);
          }
        }
      }

      self.state.bound_textures[unit as usize] = binding;
    }

    Ok(())
  }

  // Make a texture the target of image and parameter calls: bound on the active unit.
  fn bind_for_update(&mut self, texture: TextureHandle) -> Result<(), ContextError> {
    let unit = self.state.active_unit.get().copied().unwrap_or(0);
    self.activate_texture_unit(unit);
    self.bind_texture_unit(unit, Some(texture))
  }

  /// Create a vertex buffer able to hold `len` floats.
  pub fn create_vertex_buffer(&mut self, len: usize) -> Result<VertexBufferHandle, ContextError> {
    if len == 0 {
      return Err(ContextError::invalid_argument("empty vertex buffer"));
    }

    let name = self.backend.gen_buffer();
    self.bind_array_buffer(name);
    self
      .backend
      .buffer_storage(BufferTarget::Array, len * 4, BufferUsage::StaticDraw);

    let handle = self.vertex_buffers.insert(BufferRecord { name, len });
    debug!("created vertex buffer {:?} ({} floats)", handle, len);

    self.debug_check();
    Ok(handle)
  }

  /// Write floats to a vertex buffer, `offset` being counted in floats.
  pub fn upload_vertex_buffer_data(
    &mut self,
    buffer: VertexBufferHandle,
    offset: usize,
    data: &[f32],
  ) -> Result<(), ContextError> {
    let record = self
      .vertex_buffers
      .get(buffer)
      .ok_or(ContextError::StaleHandle)?;

    if offset + data.len() > record.len {
      return Err(ContextError::invalid_argument(format!(
        "writing {} floats at {} overflows a {} floats vertex buffer",
        data.len(),
        offset,
        record.len
      )));
    }

    let name = record.name;
    self.bind_array_buffer(name);
    self
      .backend
      .buffer_sub_data_f32(BufferTarget::Array, offset * 4, data);

    self.debug_check();
    Ok(())
  }

  pub fn delete_vertex_buffer(&mut self, buffer: VertexBufferHandle) -> Result<(), ContextError> {
    let record = self
      .vertex_buffers
      .remove(buffer)
      .ok_or(ContextError::StaleHandle)?;

    self.backend.delete_buffer(record.name);

    for slot in &mut self.state.vertex_slots {
      if slot.get().map_or(false, |s| s.buffer == buffer) {
        slot.invalidate();
      }
    }

    // the device unbinds a deleted buffer
    if !self.state.bound_array_buffer.is_invalid(&record.name) {
      self.state.bound_array_buffer.set(0);
    }

    debug!("deleted vertex buffer {:?}", buffer);
    self.debug_check();
    Ok(())
  }

  /// Create an index buffer able to hold `len` 16-bit indices.
  pub fn create_index_buffer(&mut self, len: usize) -> Result<IndexBufferHandle, ContextError> {
    if len == 0 {
      return Err(ContextError::invalid_argument("empty index buffer"));
    }

    let name = self.backend.gen_buffer();
    self.bind_element_buffer(name);
    self
      .backend
      .buffer_storage(BufferTarget::ElementArray, len * 2, BufferUsage::StaticDraw);

    let handle = self.index_buffers.insert(BufferRecord { name, len });
    debug!("created index buffer {:?} ({} indices)", handle, len);

    self.debug_check();
    Ok(handle)
  }

  /// Write indices to an index buffer, `offset` being counted in indices.
  pub fn upload_index_buffer_data(
    &mut self,
    buffer: IndexBufferHandle,
    offset: usize,
    data: &[u16],
  ) -> Result<(), ContextError> {
    let record = self
      .index_buffers
      .get(buffer)
      .ok_or(ContextError::StaleHandle)?;

    if offset + data.len() > record.len {
      return Err(ContextError::invalid_argument(format!(
        "writing {} indices at {} overflows a {} indices buffer",
        data.len(),
        offset,
        record.len
      )));
    }

    let name = record.name;
    self.bind_element_buffer(name);
    self
      .backend
      .buffer_sub_data_u16(BufferTarget::ElementArray, offset * 2, data);

    self.debug_check();
    Ok(())
  }

  pub fn delete_index_buffer(&mut self, buffer: IndexBufferHandle) -> Result<(), ContextError> {
    let record = self
      .index_buffers
      .remove(buffer)
      .ok_or(ContextError::StaleHandle)?;

    self.backend.delete_buffer(record.name);

    if !self.state.bound_element_buffer.is_invalid(&record.name) {
      self.state.bound_element_buffer.set(0);
    }

    debug!("deleted index buffer {:?}", buffer);
    self.debug_check();
    Ok(())
  }

  /// Create an uncompressed RGBA texture.
  ///
  /// Every level is allocated (the whole chain down to 1×1 with `mip_mapping`) and the default
  /// sampler state is applied. With `optimize_for_render_to_texture`, a 2D texture also gets a
  /// framebuffer and a depth / stencil renderbuffer so that it can be rendered to.
  ///
  /// Fails with [`ContextError::InvalidArgument`] if a dimension is zero, over
  /// [`Context::max_texture_size`], not a power of two while `assert_power_of_two_sized` is set,
  /// or if a cube texture is not square; with [`ContextError::LogicError`] if mipmapping is
  /// requested without the power-of-two assertion.
  pub fn create_texture(
    &mut self,
    ty: TextureType,
    width: u32,
    height: u32,
    mip_mapping: bool,
    optimize_for_render_to_texture: bool,
    assert_power_of_two_sized: bool,
  ) -> Result<TextureHandle, ContextError> {
    self.check_texture_dimensions(ty, width, height)?;

    if assert_power_of_two_sized && !(width.is_power_of_two() && height.is_power_of_two()) {
      return Err(ContextError::invalid_argument(format!(
        "texture dimensions must be powers of two, got {}×{}",
        width, height
      )));
    }

    if mip_mapping && !assert_power_of_two_sized {
      return Err(ContextError::logic_error(
        "mipmapping requires power-of-two sized textures",
      ));
    }

    let handle = self.register_texture(ty, None, width, height, mip_mapping);

    for target in image_targets(ty) {
      for (level, (w, h)) in mip_chain(width, height, mip_mapping).into_iter().enumerate() {
        self.backend.tex_image(target, level as u32, w, h, None);
      }
    }

    if optimize_for_render_to_texture && ty == TextureType::Texture2d {
      self.create_render_target(handle)?;
    }

    debug!(
      "created {:?} texture {:?} ({}×{}, mipmapping: {})",
      ty, handle, width, height, mip_mapping
    );

    self.debug_check();
    Ok(handle)
  }

  /// Create a block-compressed texture; levels are allocated zero-filled.
  pub fn create_compressed_texture(
    &mut self,
    ty: TextureType,
    format: TextureFormat,
    width: u32,
    height: u32,
    mip_mapping: bool,
  ) -> Result<TextureHandle, ContextError> {
    let info = TextureFormatInfo::get(format)?;

    if !info.is_compressed {
      return Err(ContextError::invalid_argument(format!(
        "{} is not a compressed format",
        format
      )));
    }

    self.check_texture_dimensions(ty, width, height)?;

    if mip_mapping && !(width.is_power_of_two() && height.is_power_of_two()) {
      return Err(ContextError::invalid_argument(format!(
        "mipmapped texture dimensions must be powers of two, got {}×{}",
        width, height
      )));
    }

    let handle = self.register_texture(ty, Some(format), width, height, mip_mapping);

    for target in image_targets(ty) {
      for (level, (w, h)) in mip_chain(width, height, mip_mapping).into_iter().enumerate() {
        let zeroes = vec![0; info.size_of(w, h)];
        self
          .backend
          .compressed_tex_image(target, level as u32, format, w, h, &zeroes);
      }
    }

    debug!(
      "created {:?} {} texture {:?} ({}×{}, mipmapping: {})",
      ty, format, handle, width, height, mip_mapping
    );

    self.debug_check();
    Ok(handle)
  }

  fn check_texture_dimensions(
    &self,
    ty: TextureType,
    width: u32,
    height: u32,
  ) -> Result<(), ContextError> {
    if width == 0 || height == 0 {
      return Err(ContextError::invalid_argument("texture dimensions must be non-zero"));
    }

    if width > self.max_texture_size || height > self.max_texture_size {
      return Err(ContextError::invalid_argument(format!(
        "texture dimensions {}×{} exceed the maximum size {}",
        width, height, self.max_texture_size
      )));
    }

    if ty == TextureType::CubeTexture && width != height {
      return Err(ContextError::invalid_argument(format!(
        "cube texture faces must be square, got {}×{}",
        width, height
      )));
    }

    Ok(())
  }

  // Generate, register and bind a texture with the default sampler state.
  fn register_texture(
    &mut self,
    ty: TextureType,
    compressed_format: Option<TextureFormat>,
    width: u32,
    height: u32,
    mip_mapping: bool,
  ) -> TextureHandle {
    let name = self.backend.gen_texture();
    let target = ty.target();
    let sampler = SamplerState::default();

    let handle = self.textures.insert(TextureRecord {
      name,
      ty,
      target,
      compressed_format,
      width,
      height,
      mip_mapping,
      sampler: SamplerCache {
        wrap_mode: Cached::new(sampler.wrap_mode),
        texture_filter: Cached::new(sampler.texture_filter),
        mip_filter: Cached::new(sampler.mip_filter),
      },
      render_target: None,
    });

    // the record exists, binding cannot fail
    let _ = self.bind_for_update(handle);

    self.backend.set_wrap_mode(target, sampler.wrap_mode);
    self
      .backend
      .set_filters(target, sampler.texture_filter, sampler.mip_filter);

    handle
  }

  fn create_render_target(&mut self, texture: TextureHandle) -> Result<(), ContextError> {
    let (name, width, height) = {
      let record = self.texture(texture)?;
      (record.name, record.width, record.height)
    };
    let previous = self.state.bound_framebuffer.get().copied().unwrap_or(0);

    let framebuffer = self.backend.gen_framebuffer();
    self.bind_framebuffer(framebuffer);
    self
      .backend
      .framebuffer_texture(ImageTarget::Texture2d, name);

    let renderbuffer = self.backend.gen_renderbuffer();
    self.backend.bind_renderbuffer(renderbuffer);
    self
      .backend
      .renderbuffer_depth_stencil_storage(width, height);
    self
      .backend
      .framebuffer_depth_stencil_renderbuffer(renderbuffer);

    let complete = self.backend.framebuffer_complete();

    self.texture_mut(texture)?.render_target = Some(RenderTargetRecord {
      framebuffer,
      renderbuffer,
      depth_stencil_attached: true,
    });

    self.bind_framebuffer(previous);

    if complete {
      Ok(())
    } else {
      self.delete_texture(texture)?;
      Err(ContextError::IncompleteFramebuffer)
    }
  }

  /// Upload one level of an uncompressed 2D texture; `data` is tightly packed RGBA8.
  pub fn upload_texture_2d_data(
    &mut self,
    texture: TextureHandle,
    width: u32,
    height: u32,
    mip_level: u32,
    data: &[u8],
  ) -> Result<(), ContextError> {
    self.upload_texels(texture, ImageTarget::Texture2d, width, height, mip_level, data)
  }

  /// Upload one level of one face of an uncompressed cube texture; `data` is RGBA8.
  pub fn upload_cube_texture_data(
    &mut self,
    texture: TextureHandle,
    face: CubeFace,
    width: u32,
    height: u32,
    mip_level: u32,
    data: &[u8],
  ) -> Result<(), ContextError> {
    self.upload_texels(
      texture,
      ImageTarget::CubeFace(face),
      width,
      height,
      mip_level,
      data,
    )
  }

  fn upload_texels(
    &mut self,
    texture: TextureHandle,
    target: ImageTarget,
    width: u32,
    height: u32,
    mip_level: u32,
    data: &[u8],
  ) -> Result<(), ContextError> {
    let record = self.texture(texture)?;

    if record.target != target.texture_target() || record.compressed_format.is_some() {
      return Err(ContextError::logic_error(format!(
        "cannot upload uncompressed {:?} texels to a {:?} texture",
        target, record.ty
      )));
    }

    check_level_size(record, mip_level, width, height)?;

    let expected = width as usize * height as usize * 4;
    if data.len() < expected {
      return Err(ContextError::invalid_argument(format!(
        "{} bytes given for a {}×{} RGBA image ({} expected)",
        data.len(),
        width,
        height,
        expected
      )));
    }

    self.bind_for_update(texture)?;
    self
      .backend
      .tex_image(target, mip_level, width, height, Some(&data[..expected]));

    self.debug_check();
    Ok(())
  }

  /// Upload one level of a compressed 2D texture.
  pub fn upload_compressed_texture_2d_data(
    &mut self,
    texture: TextureHandle,
    format: TextureFormat,
    width: u32,
    height: u32,
    mip_level: u32,
    data: &[u8],
  ) -> Result<(), ContextError> {
    self.upload_compressed(
      texture,
      ImageTarget::Texture2d,
      format,
      width,
      height,
      mip_level,
      data,
    )
  }

  /// Upload one level of one face of a compressed cube texture.
  #[allow(clippy::too_many_arguments)]
  pub fn upload_compressed_cube_texture_data(
    &mut self,
    texture: TextureHandle,
    face: CubeFace,
    format: TextureFormat,
    width: u32,
    height: u32,
    mip_level: u32,
    data: &[u8],
  ) -> Result<(), ContextError> {
    self.upload_compressed(
      texture,
      ImageTarget::CubeFace(face),
      format,
      width,
      height,
      mip_level,
      data,
    )
  }

  #[allow(clippy::too_many_arguments)]
  fn upload_compressed(
    &mut self,
    texture: TextureHandle,
    target: ImageTarget,
    format: TextureFormat,
    width: u32,
    height: u32,
    mip_level: u32,
    data: &[u8],
  ) -> Result<(), ContextError> {
    let record = self.texture(texture)?;

    if record.target != target.texture_target() || record.compressed_format != Some(format) {
      return Err(ContextError::logic_error(format!(
        "cannot upload {} {:?} data to this {:?} texture",
        format, target, record.ty
      )));
    }

    check_level_size(record, mip_level, width, height)?;

    let expected = TextureFormatInfo::texture_size(format, width, height)?;
    if data.len() < expected {
      return Err(ContextError::invalid_argument(format!(
        "{} bytes given for a {}×{} {} image ({} expected)",
        data.len(),
        width,
        height,
        format,
        expected
      )));
    }

    self.bind_for_update(texture)?;
    self.backend.compressed_tex_image(
      target,
      mip_level,
      format,
      width,
      height,
      &data[..expected],
    );

    self.debug_check();
    Ok(())
  }

  /// Let the device compute the mip chain from level 0.
  pub fn generate_mipmaps(&mut self, texture: TextureHandle) -> Result<(), ContextError> {
    let record = self.texture(texture)?;

    if !record.mip_mapping {
      return Err(ContextError::logic_error(
        "cannot generate mipmaps of a texture created without mipmapping",
      ));
    }

    let target = record.target;
    self.bind_for_update(texture)?;
    self.backend.generate_mipmap(target);

    self.debug_check();
    Ok(())
  }

  /// Delete a texture, its render target buffers included.
  ///
  /// Rendering to the texture switches back to the back buffer first; every unit it was bound to
  /// is scrubbed from the mirror.
  pub fn delete_texture(&mut self, texture: TextureHandle) -> Result<(), ContextError> {
    if self.state.render_target == RenderTarget::Texture(texture) {
      self.set_render_to_back_buffer();
    }

    let record = self
      .textures
      .remove(texture)
      .ok_or(ContextError::StaleHandle)?;

    if let Some(rt) = record.render_target {
      self.backend.delete_renderbuffer(rt.renderbuffer);
      self.backend.delete_framebuffer(rt.framebuffer);

      if !self.state.bound_framebuffer.is_invalid(&rt.framebuffer) {
        self.state.bound_framebuffer.set(0);
      }
    }

    self.backend.delete_texture(record.name);

    for binding in &mut self.state.bound_textures {
      if binding.map_or(false, |b| b.handle == texture) {
        *binding = None;
      }
    }

    debug!("deleted texture {:?}", texture);
    self.debug_check();
    Ok(())
  }

  /// Sampler state of a texture, as mirrored.
  pub fn texture_sampler_state(&self, texture: TextureHandle) -> Result<Option<SamplerState>, ContextError> {
    let sampler = &self.texture(texture)?.sampler;

    let state = match (
      sampler.wrap_mode.get(),
      sampler.texture_filter.get(),
      sampler.mip_filter.get(),
    ) {
      (Some(wrap), Some(filter), Some(mip)) => Some(SamplerState::new(*wrap, *filter, *mip)),
      _ => None,
    };

    Ok(state)
  }

  pub(super) fn apply_sampler_state(
    &mut self,
    slot: u32,
    wrap_mode: WrapMode,
    texture_filter: TextureFilter,
    mip_filter: MipFilter,
  ) -> Result<(), ContextError> {
    let binding = match self.state.bound_textures[slot as usize] {
      Some(binding) => binding,
      None => return Ok(()),
    };

    let (wrap_changed, filters_changed, mip_filter) = {
      let record = self.texture_mut(binding.handle)?;
      let mip_filter = if record.mip_mapping {
        mip_filter
      } else {
        MipFilter::None
      };
      let sampler = &mut record.sampler;
      let wrap_changed = sampler.wrap_mode.is_invalid(&wrap_mode);
      let filters_changed =
        sampler.texture_filter.is_invalid(&texture_filter) || sampler.mip_filter.is_invalid(&mip_filter);

      sampler.wrap_mode.set(wrap_mode);
      sampler.texture_filter.set(texture_filter);
      sampler.mip_filter.set(mip_filter);

      (wrap_changed, filters_changed, mip_filter)
    };

    if wrap_changed || filters_changed {
      self.activate_texture_unit(slot);

      if wrap_changed {
        self.backend.set_wrap_mode(binding.target, wrap_mode);
      }

      if filters_changed {
        self
          .backend
          .set_filters(binding.target, texture_filter, mip_filter);
      }

      self.debug_check();
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mip_chain_goes_down_to_one() {
    assert_eq!(mip_chain(4, 2, true), vec![(4, 2), (2, 1), (1, 1)]);
    assert_eq!(mip_chain(4, 2, false), vec![(4, 2)]);
    assert_eq!(mip_chain(1, 1, true), vec![(1, 1)]);
  }
}
