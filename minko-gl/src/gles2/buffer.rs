//! OpenGL ES 2 buffer implementation.

use std::mem;
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;
use minko::backend::buffer::{Buffer, BufferTarget, BufferUsage};
use minko::backend::Name;

use crate::gles2::Gles2;

fn buffer_target_to_glenum(target: BufferTarget) -> GLenum {
  match target {
    BufferTarget::Array => gl::ARRAY_BUFFER,
    BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
  }
}

fn buffer_usage_to_glenum(usage: BufferUsage) -> GLenum {
  match usage {
    BufferUsage::StaticDraw => gl::STATIC_DRAW,
    BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
  }
}

// Write a slice of plain values at byte `offset` of the buffer bound to `target`.
fn sub_data<T>(target: BufferTarget, offset: usize, data: &[T]) {
  unsafe {
    gl::BufferSubData(
      buffer_target_to_glenum(target),
      offset as GLintptr,
      (data.len() * mem::size_of::<T>()) as GLsizeiptr,
      data.as_ptr() as *const c_void,
    );
  }
}

impl Buffer for Gles2 {
  fn gen_buffer(&mut self) -> Name {
    let mut buffer: GLuint = 0;

    unsafe {
      gl::GenBuffers(1, &mut buffer);
    }

    buffer
  }

  fn delete_buffer(&mut self, buffer: Name) {
    unsafe {
      gl::DeleteBuffers(1, &buffer);
    }
  }

  fn bind_buffer(&mut self, target: BufferTarget, buffer: Name) {
    unsafe {
      gl::BindBuffer(buffer_target_to_glenum(target), buffer);
    }
  }

  fn buffer_storage(&mut self, target: BufferTarget, size: usize, usage: BufferUsage) {
    unsafe {
      gl::BufferData(
        buffer_target_to_glenum(target),
        size as GLsizeiptr,
        ptr::null(),
        buffer_usage_to_glenum(usage),
      );
    }
  }

  fn buffer_sub_data_f32(&mut self, target: BufferTarget, offset: usize, data: &[f32]) {
    sub_data(target, offset, data);
  }

  fn buffer_sub_data_u16(&mut self, target: BufferTarget, offset: usize, data: &[u16]) {
    sub_data(target, offset, data);
  }
}
