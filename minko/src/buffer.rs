//! Index buffers and buffer errors.
//!
//! Like every CPU-side resource of the crate, an [`IndexBuffer`] keeps its data until told
//! otherwise and creates its device object lazily, on first [`IndexBuffer::upload`]. The device
//! object lives in the [`Context`] registries; the buffer only keeps its handle.

use std::error;
use std::fmt;

use crate::backend::Backend;
use crate::context::{Context, ContextError};
use crate::handle::IndexBufferHandle;

/// Buffer errors.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BufferError {
  /// An attribute with the same name already exists.
  DuplicateAttributeName(String),
  /// No attribute has this name.
  UnknownAttribute(String),
  /// An argument is out of the accepted range.
  InvalidArgument(String),
  /// Vertex buffers of one geometry disagree on their number of vertices.
  InconsistentVertexCount { expected: usize, found: usize },
  /// The context refused the operation.
  Context(ContextError),
}

impl fmt::Display for BufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      BufferError::DuplicateAttributeName(ref name) => {
        write!(f, "duplicate vertex attribute: {}", name)
      }

      BufferError::UnknownAttribute(ref name) => write!(f, "unknown vertex attribute: {}", name),
      BufferError::InvalidArgument(ref reason) => write!(f, "invalid argument: {}", reason),

      BufferError::InconsistentVertexCount { expected, found } => write!(
        f,
        "inconsistent vertex count: expected {} vertices, found {}",
        expected, found
      ),

      BufferError::Context(ref e) => write!(f, "context error: {}", e),
    }
  }
}

impl error::Error for BufferError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      BufferError::Context(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ContextError> for BufferError {
  fn from(e: ContextError) -> Self {
    BufferError::Context(e)
  }
}

/// Triangle indices.
///
/// Indices are 16-bit: meshes with more than 65536 vertices must be split by their producer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexBuffer {
  data: Vec<u16>,
  handle: Option<IndexBufferHandle>,
}

impl IndexBuffer {
  pub fn new(data: Vec<u16>) -> Self {
    IndexBuffer { data, handle: None }
  }

  pub fn data(&self) -> &[u16] {
    &self.data
  }

  /// Replace the retained indices. Call [`IndexBuffer::upload`] to push them.
  pub fn set_data(&mut self, data: Vec<u16>) {
    self.data = data;
  }

  pub fn num_indices(&self) -> usize {
    self.data.len()
  }

  pub fn handle(&self) -> Option<IndexBufferHandle> {
    self.handle
  }

  /// Push `count` indices (all remaining ones if `0`) starting at index `offset`.
  ///
  /// The device buffer is created on first upload, sized to the whole data. Nothing happens if
  /// no index is retained.
  pub fn upload<B>(
    &mut self,
    ctx: &mut Context<B>,
    offset: usize,
    count: usize,
  ) -> Result<(), BufferError>
  where
    B: Backend,
  {
    if self.data.is_empty() {
      return Ok(());
    }

    let end = if count == 0 {
      self.data.len()
    } else {
      offset + count
    };

    if offset >= self.data.len() || end > self.data.len() {
      return Err(BufferError::InvalidArgument(format!(
        "indices {}..{} out of a {} indices buffer",
        offset,
        end,
        self.data.len()
      )));
    }

    let handle = match self.handle {
      Some(handle) => handle,
      None => {
        let handle = ctx.create_index_buffer(self.data.len())?;
        self.handle = Some(handle);
        handle
      }
    };

    ctx.upload_index_buffer_data(handle, offset, &self.data[offset..end])?;
    Ok(())
  }

  /// Delete the device buffer and the retained indices.
  pub fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), BufferError>
  where
    B: Backend,
  {
    if let Some(handle) = self.handle.take() {
      ctx.delete_index_buffer(handle)?;
    }

    self.dispose_data();
    Ok(())
  }

  /// Free the retained indices, keeping the device copy.
  pub fn dispose_data(&mut self) {
    self.data = Vec::new();
  }
}
