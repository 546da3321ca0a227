//! Framebuffer backend interface.
//!
//! Framebuffers back render-to-texture: each render target texture owns one framebuffer object
//! with the texture as color attachment and a combined depth / stencil renderbuffer.

use crate::backend::texture::ImageTarget;
use crate::backend::Name;

/// Framebuffer backend.
pub trait Framebuffer {
  fn gen_framebuffer(&mut self) -> Name;

  fn delete_framebuffer(&mut self, framebuffer: Name);

  /// Bind a framebuffer; `0` is the default back buffer.
  fn bind_framebuffer(&mut self, framebuffer: Name);

  /// Attach a texture image as color attachment of the bound framebuffer.
  fn framebuffer_texture(&mut self, target: ImageTarget, texture: Name);

  fn gen_renderbuffer(&mut self) -> Name;

  fn delete_renderbuffer(&mut self, renderbuffer: Name);

  fn bind_renderbuffer(&mut self, renderbuffer: Name);

  /// Allocate depth / stencil storage for the bound renderbuffer.
  fn renderbuffer_depth_stencil_storage(&mut self, width: u32, height: u32);

  /// Attach a renderbuffer as depth / stencil attachment of the bound framebuffer; `0` detaches.
  fn framebuffer_depth_stencil_renderbuffer(&mut self, renderbuffer: Name);

  /// Whether the bound framebuffer is complete.
  fn framebuffer_complete(&mut self) -> bool;

  /// Read back RGBA8 pixels from the bound framebuffer.
  ///
  /// This stalls until the device has finished every pending command.
  fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32, out: &mut [u8]);
}
