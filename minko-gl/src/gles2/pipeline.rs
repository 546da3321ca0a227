//! OpenGL ES 2 fixed-function state and draw calls.

use std::ffi::CStr;
use std::mem;
use std::os::raw::{c_char, c_void};

use gl::types::*;
use minko::backend::pipeline::{Capability, ClearMask, Pipeline};
use minko::backend::DriverError;
use minko::blending::{Destination, Source};
use minko::depth_stencil::{CompareMode, StencilOperation};
use minko::face_culling::Face;

use crate::gles2::Gles2;

fn capability_to_glenum(capability: Capability) -> GLenum {
  match capability {
    Capability::Blend => gl::BLEND,
    Capability::DepthTest => gl::DEPTH_TEST,
    Capability::StencilTest => gl::STENCIL_TEST,
    Capability::CullFace => gl::CULL_FACE,
    Capability::ScissorTest => gl::SCISSOR_TEST,
  }
}

fn source_to_glenum(source: Source) -> GLenum {
  match source {
    Source::Zero => gl::ZERO,
    Source::One => gl::ONE,
    Source::SrcColor => gl::SRC_COLOR,
    Source::OneMinusSrcColor => gl::ONE_MINUS_SRC_COLOR,
    Source::SrcAlpha => gl::SRC_ALPHA,
    Source::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
    Source::DstAlpha => gl::DST_ALPHA,
    Source::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
  }
}

fn destination_to_glenum(destination: Destination) -> GLenum {
  match destination {
    Destination::Zero => gl::ZERO,
    Destination::One => gl::ONE,
    Destination::DstColor => gl::DST_COLOR,
    Destination::OneMinusDstColor => gl::ONE_MINUS_DST_COLOR,
    Destination::SrcAlphaSaturate => gl::SRC_ALPHA_SATURATE,
    Destination::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
    Destination::DstAlpha => gl::DST_ALPHA,
    Destination::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
  }
}

pub(crate) fn compare_mode_to_glenum(mode: CompareMode) -> GLenum {
  match mode {
    CompareMode::Never => gl::NEVER,
    CompareMode::Always => gl::ALWAYS,
    CompareMode::Equal => gl::EQUAL,
    CompareMode::NotEqual => gl::NOTEQUAL,
    CompareMode::Less => gl::LESS,
    CompareMode::LessEqual => gl::LEQUAL,
    CompareMode::Greater => gl::GREATER,
    CompareMode::GreaterEqual => gl::GEQUAL,
  }
}

pub(crate) fn stencil_op_to_glenum(op: StencilOperation) -> GLenum {
  match op {
    StencilOperation::Keep => gl::KEEP,
    StencilOperation::Zero => gl::ZERO,
    StencilOperation::Replace => gl::REPLACE,
    StencilOperation::Incr => gl::INCR,
    StencilOperation::IncrWrap => gl::INCR_WRAP,
    StencilOperation::Decr => gl::DECR,
    StencilOperation::DecrWrap => gl::DECR_WRAP,
    StencilOperation::Invert => gl::INVERT,
  }
}

fn face_to_glenum(face: Face) -> GLenum {
  match face {
    Face::Front => gl::FRONT,
    Face::Back => gl::BACK,
    Face::FrontAndBack => gl::FRONT_AND_BACK,
  }
}

fn clear_mask_to_glbitfield(mask: ClearMask) -> GLbitfield {
  let mut bits = 0;

  if mask.contains(ClearMask::COLOR) {
    bits |= gl::COLOR_BUFFER_BIT;
  }

  if mask.contains(ClearMask::DEPTH) {
    bits |= gl::DEPTH_BUFFER_BIT;
  }

  if mask.contains(ClearMask::STENCIL) {
    bits |= gl::STENCIL_BUFFER_BIT;
  }

  bits
}

fn glenum_to_driver_error(code: GLenum) -> DriverError {
  let description = match code {
    gl::INVALID_ENUM => "invalid enum",
    gl::INVALID_VALUE => "invalid value",
    gl::INVALID_OPERATION => "invalid operation",
    gl::INVALID_FRAMEBUFFER_OPERATION => "invalid framebuffer operation",
    gl::OUT_OF_MEMORY => "out of memory",
    _ => "unknown error",
  };

  DriverError { code, description }
}

fn gl_bool(value: bool) -> GLboolean {
  if value {
    gl::TRUE
  } else {
    gl::FALSE
  }
}

impl Pipeline for Gles2 {
  fn enable(&mut self, capability: Capability) {
    unsafe {
      gl::Enable(capability_to_glenum(capability));
    }
  }

  fn disable(&mut self, capability: Capability) {
    unsafe {
      gl::Disable(capability_to_glenum(capability));
    }
  }

  fn blend_func(&mut self, source: Source, destination: Destination) {
    unsafe {
      gl::BlendFunc(source_to_glenum(source), destination_to_glenum(destination));
    }
  }

  fn depth_mask(&mut self, mask: bool) {
    unsafe {
      gl::DepthMask(gl_bool(mask));
    }
  }

  fn depth_func(&mut self, func: CompareMode) {
    unsafe {
      gl::DepthFunc(compare_mode_to_glenum(func));
    }
  }

  fn stencil_func(&mut self, func: CompareMode, reference: i32, mask: u32) {
    unsafe {
      gl::StencilFunc(compare_mode_to_glenum(func), reference, mask);
    }
  }

  fn stencil_op(&mut self, fail: StencilOperation, z_fail: StencilOperation, z_pass: StencilOperation) {
    unsafe {
      gl::StencilOp(
        stencil_op_to_glenum(fail),
        stencil_op_to_glenum(z_fail),
        stencil_op_to_glenum(z_pass),
      );
    }
  }

  fn cull_face(&mut self, face: Face) {
    unsafe {
      gl::CullFace(face_to_glenum(face));
    }
  }

  fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
    unsafe {
      gl::Scissor(x, y, width, height);
    }
  }

  fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
    unsafe {
      gl::Viewport(x, y, width, height);
    }
  }

  fn get_viewport(&mut self) -> [i32; 4] {
    let mut viewport = [0; 4];

    unsafe {
      gl::GetIntegerv(gl::VIEWPORT, viewport.as_mut_ptr());
    }

    viewport
  }

  fn color_mask(&mut self, mask: bool) {
    let mask = gl_bool(mask);

    unsafe {
      gl::ColorMask(mask, mask, mask, mask);
    }
  }

  fn clear_color(&mut self, color: [f32; 4]) {
    unsafe {
      gl::ClearColor(color[0], color[1], color[2], color[3]);
    }
  }

  fn clear_depth(&mut self, depth: f32) {
    unsafe {
      gl::ClearDepthf(depth);
    }
  }

  fn clear_stencil(&mut self, stencil: i32) {
    unsafe {
      gl::ClearStencil(stencil);
    }
  }

  fn clear(&mut self, mask: ClearMask) {
    unsafe {
      gl::Clear(clear_mask_to_glbitfield(mask));
    }
  }

  fn vertex_attrib_pointer(&mut self, slot: u32, size: u32, stride: usize, offset: usize) {
    unsafe {
      gl::VertexAttribPointer(
        slot,
        size as GLint,
        gl::FLOAT,
        gl::FALSE,
        stride as GLsizei,
        offset as *const c_void,
      );
    }
  }

  fn enable_vertex_attrib_array(&mut self, slot: u32) {
    unsafe {
      gl::EnableVertexAttribArray(slot);
    }
  }

  fn disable_vertex_attrib_array(&mut self, slot: u32) {
    unsafe {
      gl::DisableVertexAttribArray(slot);
    }
  }

  fn draw_elements(&mut self, count: u32, first_index: u32) {
    let offset = first_index as usize * mem::size_of::<u16>();

    unsafe {
      gl::DrawElements(
        gl::TRIANGLES,
        count as GLsizei,
        gl::UNSIGNED_SHORT,
        offset as *const c_void,
      );
    }
  }

  fn draw_arrays(&mut self, first: u32, count: u32) {
    unsafe {
      gl::DrawArrays(gl::TRIANGLES, first as GLint, count as GLsizei);
    }
  }

  fn get_error(&mut self) -> Option<DriverError> {
    match unsafe { gl::GetError() } {
      gl::NO_ERROR => None,
      code => Some(glenum_to_driver_error(code)),
    }
  }

  fn extensions(&mut self) -> Vec<String> {
    let extensions = unsafe { gl::GetString(gl::EXTENSIONS) };

    if extensions.is_null() {
      return Vec::new();
    }

    let extensions = unsafe { CStr::from_ptr(extensions as *const c_char) };

    extensions
      .to_string_lossy()
      .split_whitespace()
      .map(str::to_owned)
      .collect()
  }
}
