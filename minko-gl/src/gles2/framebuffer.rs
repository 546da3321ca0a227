//! OpenGL ES 2 framebuffer implementation.

use std::os::raw::c_void;

use gl::types::*;
use minko::backend::framebuffer::Framebuffer;
use minko::backend::texture::ImageTarget;
use minko::backend::Name;

use crate::gles2::texture::image_target_to_glenum;
use crate::gles2::Gles2;

// GL_DEPTH24_STENCIL8_OES; the same value as the desktop token.
const DEPTH24_STENCIL8: GLenum = 0x88F0;

impl Framebuffer for Gles2 {
  fn gen_framebuffer(&mut self) -> Name {
    let mut framebuffer: GLuint = 0;

    unsafe {
      gl::GenFramebuffers(1, &mut framebuffer);
    }

    framebuffer
  }

  fn delete_framebuffer(&mut self, framebuffer: Name) {
    unsafe {
      gl::DeleteFramebuffers(1, &framebuffer);
    }
  }

  fn bind_framebuffer(&mut self, framebuffer: Name) {
    unsafe {
      gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer);
    }
  }

  fn framebuffer_texture(&mut self, target: ImageTarget, texture: Name) {
    unsafe {
      gl::FramebufferTexture2D(
        gl::FRAMEBUFFER,
        gl::COLOR_ATTACHMENT0,
        image_target_to_glenum(target),
        texture,
        0,
      );
    }
  }

  fn gen_renderbuffer(&mut self) -> Name {
    let mut renderbuffer: GLuint = 0;

    unsafe {
      gl::GenRenderbuffers(1, &mut renderbuffer);
    }

    renderbuffer
  }

  fn delete_renderbuffer(&mut self, renderbuffer: Name) {
    unsafe {
      gl::DeleteRenderbuffers(1, &renderbuffer);
    }
  }

  fn bind_renderbuffer(&mut self, renderbuffer: Name) {
    unsafe {
      gl::BindRenderbuffer(gl::RENDERBUFFER, renderbuffer);
    }
  }

  fn renderbuffer_depth_stencil_storage(&mut self, width: u32, height: u32) {
    unsafe {
      gl::RenderbufferStorage(
        gl::RENDERBUFFER,
        DEPTH24_STENCIL8,
        width as GLsizei,
        height as GLsizei,
      );
    }
  }

  fn framebuffer_depth_stencil_renderbuffer(&mut self, renderbuffer: Name) {
    // ES 2 has no combined attachment point: the packed buffer goes to both
    unsafe {
      gl::FramebufferRenderbuffer(
        gl::FRAMEBUFFER,
        gl::DEPTH_ATTACHMENT,
        gl::RENDERBUFFER,
        renderbuffer,
      );
      gl::FramebufferRenderbuffer(
        gl::FRAMEBUFFER,
        gl::STENCIL_ATTACHMENT,
        gl::RENDERBUFFER,
        renderbuffer,
      );
    }
  }

  fn framebuffer_complete(&mut self) -> bool {
    unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) == gl::FRAMEBUFFER_COMPLETE }
  }

  fn read_pixels(&mut self, x: i32, y: i32, width: u32, height: u32, out: &mut [u8]) {
    unsafe {
      gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
      gl::ReadPixels(
        x,
        y,
        width as GLsizei,
        height as GLsizei,
        gl::RGBA,
        gl::UNSIGNED_BYTE,
        out.as_mut_ptr() as *mut c_void,
      );
    }
  }
}
