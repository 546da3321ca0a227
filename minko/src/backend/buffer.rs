//! Buffer backend interface.
//!
//! This interface defines the low-level API vertex and index buffers rely on.

use crate::backend::Name;

/// Binding point of a buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BufferTarget {
  /// Vertex data.
  Array,
  /// Index data.
  ElementArray,
}

/// Usage hint given when allocating buffer storage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BufferUsage {
  StaticDraw,
  DynamicDraw,
}

/// Buffer backend.
///
/// Every data call applies to the buffer currently bound to the given target.
pub trait Buffer {
  /// Generate a new buffer name.
  fn gen_buffer(&mut self) -> Name;

  fn delete_buffer(&mut self, buffer: Name);

  fn bind_buffer(&mut self, target: BufferTarget, buffer: Name);

  /// Allocate `size` bytes of uninitialized storage.
  fn buffer_storage(&mut self, target: BufferTarget, size: usize, usage: BufferUsage);

  /// Write floats starting at byte `offset`.
  fn buffer_sub_data_f32(&mut self, target: BufferTarget, offset: usize, data: &[f32]);

  /// Write 16-bit indices starting at byte `offset`.
  fn buffer_sub_data_u16(&mut self, target: BufferTarget, offset: usize, data: &[u16]);
}
