//! Geometries: vertex buffers sharing one vertex count, plus optional indices.
//!
//! A [`Geometry`] owns its buffers, so every layout mutation goes through it and it can keep its
//! vertex count in sync without any notification machinery.

use crate::backend::Backend;
use crate::buffer::{BufferError, IndexBuffer};
use crate::context::Context;
use crate::vertex::VertexBuffer;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
  vertex_buffers: Vec<VertexBuffer>,
  indices: Option<IndexBuffer>,
  num_vertices: usize,
}

impl Geometry {
  pub fn new() -> Self {
    Geometry::default()
  }

  pub fn vertex_buffers(&self) -> &[VertexBuffer] {
    &self.vertex_buffers
  }

  /// The vertex buffer providing the attribute called `name`.
  pub fn vertex_buffer(&self, name: &str) -> Option<&VertexBuffer> {
    self.vertex_buffers.iter().find(|vb| vb.has_attribute(name))
  }

  pub fn indices(&self) -> Option<&IndexBuffer> {
    self.indices.as_ref()
  }

  pub fn set_indices(&mut self, indices: impl Into<Option<IndexBuffer>>) {
    self.indices = indices.into();
  }

  /// Vertex count shared by every vertex buffer with a layout.
  pub fn num_vertices(&self) -> usize {
    self.num_vertices
  }

  /// Add a vertex buffer and return its index.
  ///
  /// Its attribute names must not clash with the ones already present and, if it has a layout,
  /// its vertex count must match the geometry's.
  pub fn add_vertex_buffer(&mut self, vertex_buffer: VertexBuffer) -> Result<usize, BufferError> {
    if let Some(attribute) = vertex_buffer
      .attributes()
      .iter()
      .find(|a| self.vertex_buffer(&a.name).is_some())
    {
      return Err(BufferError::DuplicateAttributeName(attribute.name.clone()));
    }

    if vertex_buffer.vertex_size() > 0 {
      self.check_vertex_count(vertex_buffer.num_vertices())?;
      self.num_vertices = vertex_buffer.num_vertices();
    }

    self.vertex_buffers.push(vertex_buffer);
    Ok(self.vertex_buffers.len() - 1)
  }

  /// Take a vertex buffer out of the geometry. Its device buffer, if any, is left alive.
  pub fn remove_vertex_buffer(&mut self, index: usize) -> Result<VertexBuffer, BufferError> {
    self.check_index(index)?;

    let vertex_buffer = self.vertex_buffers.remove(index);

    if self.vertex_buffers.iter().all(|vb| vb.vertex_size() == 0) {
      self.num_vertices = 0;
    }

    Ok(vertex_buffer)
  }

  /// Add an attribute to the vertex buffer at `index`.
  ///
  /// The attribute is not kept if the new layout gives the buffer a vertex count different from
  /// the other buffers'.
  pub fn add_attribute(
    &mut self,
    index: usize,
    name: &str,
    size: u32,
    offset: u32,
  ) -> Result<(), BufferError> {
    self.check_index(index)?;

    if self.vertex_buffer(name).is_some() {
      return Err(BufferError::DuplicateAttributeName(name.to_owned()));
    }

    self.vertex_buffers[index].add_attribute(name, size, offset)?;

    if let Err(e) = self.vertex_size_changed(index) {
      // just added, cannot be missing
      let _ = self.vertex_buffers[index].remove_attribute(name);
      return Err(e);
    }

    Ok(())
  }

  /// Remove an attribute from whichever vertex buffer holds it.
  ///
  /// Like [`Geometry::add_attribute`], the removal is undone if it breaks the shared vertex count.
  pub fn remove_attribute(&mut self, name: &str) -> Result<(), BufferError> {
    let index = self
      .vertex_buffers
      .iter()
      .position(|vb| vb.has_attribute(name))
      .ok_or_else(|| BufferError::UnknownAttribute(name.to_owned()))?;

    let vertex_buffer = &mut self.vertex_buffers[index];
    let position = vertex_buffer
      .attributes()
      .iter()
      .position(|a| a.name == name)
      .ok_or_else(|| BufferError::UnknownAttribute(name.to_owned()))?;
    let attribute = vertex_buffer.attributes()[position].clone();
    vertex_buffer.remove_attribute(name)?;

    if let Err(e) = self.vertex_size_changed(index) {
      self.vertex_buffers[index].restore_attribute(position, attribute);
      return Err(e);
    }

    Ok(())
  }

  /// Upload every vertex buffer and the indices.
  pub fn upload<B>(&mut self, ctx: &mut Context<B>) -> Result<(), BufferError>
  where
    B: Backend,
  {
    for vertex_buffer in &mut self.vertex_buffers {
      vertex_buffer.upload(ctx, 0, 0)?;
    }

    if let Some(ref mut indices) = self.indices {
      indices.upload(ctx, 0, 0)?;
    }

    Ok(())
  }

  /// Dispose every buffer, device and CPU sides.
  pub fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), BufferError>
  where
    B: Backend,
  {
    for vertex_buffer in &mut self.vertex_buffers {
      vertex_buffer.dispose(ctx)?;
    }

    if let Some(ref mut indices) = self.indices {
      indices.dispose(ctx)?;
    }

    self.num_vertices = 0;
    Ok(())
  }

  /// Free every retained CPU copy.
  pub fn dispose_data(&mut self) {
    for vertex_buffer in &mut self.vertex_buffers {
      vertex_buffer.dispose_data();
    }

    if let Some(ref mut indices) = self.indices {
      indices.dispose_data();
    }
  }

  // Recompute the shared vertex count once the layout of the buffer at `index` changed.
  fn vertex_size_changed(&mut self, index: usize) -> Result<(), BufferError> {
    let changed = &self.vertex_buffers[index];

    if changed.vertex_size() == 0 {
      if self.vertex_buffers.iter().all(|vb| vb.vertex_size() == 0) {
        self.num_vertices = 0;
      }

      return Ok(());
    }

    let found = changed.num_vertices();
    let mismatch = self
      .vertex_buffers
      .iter()
      .enumerate()
      .filter(|(i, vb)| *i != index && vb.vertex_size() > 0)
      .map(|(_, vb)| vb.num_vertices())
      .find(|expected| *expected != found);

    if let Some(expected) = mismatch {
      return Err(BufferError::InconsistentVertexCount { expected, found });
    }

    self.num_vertices = found;
    Ok(())
  }

  fn check_vertex_count(&self, found: usize) -> Result<(), BufferError> {
    let has_layout = self.vertex_buffers.iter().any(|vb| vb.vertex_size() > 0);

    if has_layout && found != self.num_vertices {
      Err(BufferError::InconsistentVertexCount {
        expected: self.num_vertices,
        found,
      })
    } else {
      Ok(())
    }
  }

  fn check_index(&self, index: usize) -> Result<(), BufferError> {
    if index < self.vertex_buffers.len() {
      Ok(())
    } else {
      Err(BufferError::InvalidArgument(format!(
        "no vertex buffer at {} ({} buffers)",
        index,
        self.vertex_buffers.len()
      )))
    }
  }
}
