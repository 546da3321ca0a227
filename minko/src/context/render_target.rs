//! Render target switching.
//!
//! Two states: drawing to the back buffer, or drawing to the framebuffer of a texture. Leaving
//! the back buffer saves the viewport, coming back restores it; moving from one texture to another
//! only rebinds.

use log::trace;

use crate::backend::Backend;
use crate::context::{Context, ContextError, RenderTarget};
use crate::handle::TextureHandle;
use crate::scissor::Viewport;

impl<B> Context<B>
where
  B: Backend,
{
  /// Render to a texture created with render-to-texture optimization.
  ///
  /// The viewport is set to the texture dimensions. `enable_depth_and_stencil` attaches or
  /// detaches the texture depth / stencil renderbuffer. Fails with
  /// [`ContextError::UnsupportedTarget`] if the texture has no framebuffer.
  pub fn set_render_to_texture(
    &mut self,
    texture: TextureHandle,
    enable_depth_and_stencil: bool,
  ) -> Result<(), ContextError> {
    let (rt, width, height) = {
      let record = self.texture(texture)?;
      let rt = record.render_target.ok_or(ContextError::UnsupportedTarget)?;
      (rt, record.width, record.height)
    };

    if self.state.render_target != RenderTarget::Texture(texture) {
      if self.state.render_target == RenderTarget::BackBuffer {
        self.state.saved_viewport = Some(self.back_buffer_viewport());
      }

      trace!("rendering to texture {:?}", texture);

      self.bind_framebuffer(rt.framebuffer);
      self.configure_viewport(0, 0, width as i32, height as i32);
      self.state.render_target = RenderTarget::Texture(texture);
    }

    if rt.depth_stencil_attached != enable_depth_and_stencil {
      let renderbuffer = if enable_depth_and_stencil {
        rt.renderbuffer
      } else {
        0
      };

      self
        .backend
        .framebuffer_depth_stencil_renderbuffer(renderbuffer);

      if let Some(rt) = self.texture_mut(texture)?.render_target.as_mut() {
        rt.depth_stencil_attached = enable_depth_and_stencil;
      }
    }

    self.debug_check();
    Ok(())
  }

  /// Render to the back buffer again, restoring the viewport saved when it was left.
  pub fn set_render_to_back_buffer(&mut self) {
    if self.state.render_target == RenderTarget::BackBuffer {
      return;
    }

    trace!("rendering to the back buffer");

    self.bind_framebuffer(0);
    self.state.render_target = RenderTarget::BackBuffer;

    if let Some(viewport) = self.state.saved_viewport.take() {
      self.configure_viewport(viewport.x, viewport.y, viewport.width, viewport.height);
    }

    self.debug_check();
  }

  // The mirrored viewport, or the device one if none was configured yet.
  fn back_buffer_viewport(&mut self) -> Viewport {
    if let Some(viewport) = self.state.viewport.get() {
      return *viewport;
    }

    let [x, y, width, height] = self.backend.get_viewport();
    Viewport::new(x, y, width, height)
  }
}
