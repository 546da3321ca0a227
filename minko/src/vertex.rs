//! Vertex buffers and their attribute layout.
//!
//! A [`VertexBuffer`] holds interleaved float vertices. Its layout is a list of named
//! [`VertexAttribute`]s, each one being `size` floats at `offset` floats from the start of a
//! vertex; the sum of the attribute sizes is the vertex size (the stride, in floats).
//!
//! Two behaviors are worth knowing:
//!
//! - an attribute added with offset `0` is packed right after the current vertex size, so an
//!   explicit offset of `0` only means `0` for the first attribute;
//! - removing an attribute updates the layout but leaves the data untouched: the floats of the
//!   removed attribute stay in place until the caller rebuilds and uploads the data again.

use crate::backend::Backend;
use crate::buffer::BufferError;
use crate::context::Context;
use crate::handle::VertexBufferHandle;

/// A named float attribute of a vertex.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttribute {
  pub name: String,
  /// Number of components, 1 to 4.
  pub size: u32,
  /// Offset of the first component in the vertex, in floats.
  pub offset: u32,
}

/// Interleaved float vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexBuffer {
  data: Vec<f32>,
  attributes: Vec<VertexAttribute>,
  vertex_size: u32,
  handle: Option<VertexBufferHandle>,
}

impl VertexBuffer {
  pub fn new(data: Vec<f32>) -> Self {
    VertexBuffer {
      data,
      ..VertexBuffer::default()
    }
  }

  pub fn data(&self) -> &[f32] {
    &self.data
  }

  /// Replace the retained floats. Call [`VertexBuffer::upload`] to push them.
  pub fn set_data(&mut self, data: Vec<f32>) {
    self.data = data;
  }

  /// Attributes, in insertion order.
  pub fn attributes(&self) -> &[VertexAttribute] {
    &self.attributes
  }

  /// Sum of the attribute sizes, in floats.
  pub fn vertex_size(&self) -> u32 {
    self.vertex_size
  }

  pub fn num_vertices(&self) -> usize {
    if self.vertex_size == 0 {
      0
    } else {
      self.data.len() / self.vertex_size as usize
    }
  }

  pub fn handle(&self) -> Option<VertexBufferHandle> {
    self.handle
  }

  /// Add an attribute of `size` floats.
  ///
  /// An `offset` of `0` packs the attribute after the current vertex size.
  pub fn add_attribute(&mut self, name: &str, size: u32, offset: u32) -> Result<(), BufferError> {
    if self.has_attribute(name) {
      return Err(BufferError::DuplicateAttributeName(name.to_owned()));
    }

    if !(1..=4).contains(&size) {
      return Err(BufferError::InvalidArgument(format!(
        "attribute {} has {} components, 1 to 4 expected",
        name, size
      )));
    }

    let offset = if offset == 0 { self.vertex_size } else { offset };

    self.attributes.push(VertexAttribute {
      name: name.to_owned(),
      size,
      offset,
    });
    self.vertex_size += size;

    Ok(())
  }

  /// Remove an attribute. The data is not repacked.
  pub fn remove_attribute(&mut self, name: &str) -> Result<(), BufferError> {
    let index = self
      .attributes
      .iter()
      .position(|attribute| attribute.name == name)
      .ok_or_else(|| BufferError::UnknownAttribute(name.to_owned()))?;

    let attribute = self.attributes.remove(index);
    self.vertex_size -= attribute.size;

    Ok(())
  }

  // Put back an attribute removed from `position`, offset untouched.
  pub(crate) fn restore_attribute(&mut self, position: usize, attribute: VertexAttribute) {
    self.vertex_size += attribute.size;
    self.attributes.insert(position, attribute);
  }

  pub fn has_attribute(&self, name: &str) -> bool {
    self.attributes.iter().any(|attribute| attribute.name == name)
  }

  pub fn attribute(&self, name: &str) -> Result<&VertexAttribute, BufferError> {
    self
      .attributes
      .iter()
      .find(|attribute| attribute.name == name)
      .ok_or_else(|| BufferError::UnknownAttribute(name.to_owned()))
  }

  /// Push `count` vertices (all remaining floats if `0`) starting at vertex `offset`.
  ///
  /// The device buffer is created on first upload, sized to the whole data. Nothing happens if no
  /// float is retained.
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

    let vertex_size = self.vertex_size as usize;
    let start = offset * vertex_size;
    let end = if count == 0 {
      self.data.len()
    } else {
      start + count * vertex_size
    };

    if start > end || end > self.data.len() {
      return Err(BufferError::InvalidArgument(format!(
        "{} vertices at {} out of a {} vertices buffer",
        count,
        offset,
        self.num_vertices()
      )));
    }

    let handle = match self.handle {
      Some(handle) => handle,
      None => {
        let handle = ctx.create_vertex_buffer(self.data.len())?;
        self.handle = Some(handle);
        handle
      }
    };

    ctx.upload_vertex_buffer_data(handle, start, &self.data[start..end])?;
    Ok(())
  }

  /// Feed vertex attribute `slot` with an attribute of the buffer.
  pub fn bind_attribute<B>(
    &self,
    ctx: &mut Context<B>,
    name: &str,
    slot: u32,
  ) -> Result<(), BufferError>
  where
    B: Backend,
  {
    let attribute = self.attribute(name)?;
    let handle = self
      .handle
      .ok_or_else(|| BufferError::InvalidArgument("vertex buffer not uploaded".to_owned()))?;

    ctx.set_vertex_buffer_at(
      slot,
      Some(handle),
      attribute.size,
      self.vertex_size,
      attribute.offset,
    )?;

    Ok(())
  }

  /// Delete the device buffer and the retained floats.
  pub fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), BufferError>
  where
    B: Backend,
  {
    if let Some(handle) = self.handle.take() {
      ctx.delete_vertex_buffer(handle)?;
    }

    self.dispose_data();
    Ok(())
  }

  /// Free the retained floats, keeping the device copy.
  pub fn dispose_data(&mut self) {
    self.data = Vec::new();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attributes_pack_sequentially() {
    let mut vb = VertexBuffer::new(vec![0.; 10]);

    vb.add_attribute("position", 3, 0).unwrap();
    vb.add_attribute("uv", 2, 3).unwrap();

    assert_eq!(vb.vertex_size(), 5);
    assert_eq!(vb.num_vertices(), 2);
    assert_eq!(vb.attribute("uv").map(|a| a.offset), Ok(3));
  }

  #[test]
  fn zero_offset_means_auto_pack() {
    let mut vb = VertexBuffer::default();

    vb.add_attribute("position", 3, 0).unwrap();
    vb.add_attribute("normal", 3, 0).unwrap();

    assert_eq!(vb.attribute("normal").map(|a| a.offset), Ok(3));
  }

  #[test]
  fn duplicate_and_unknown_attributes() {
    let mut vb = VertexBuffer::default();
    vb.add_attribute("position", 3, 0).unwrap();

    assert_eq!(
      vb.add_attribute("position", 2, 0),
      Err(BufferError::DuplicateAttributeName("position".to_owned()))
    );
    assert_eq!(
      vb.remove_attribute("uv"),
      Err(BufferError::UnknownAttribute("uv".to_owned()))
    );
    assert!(vb.attribute("uv").is_err());
    assert!(matches!(vb.add_attribute("w", 5, 0), Err(BufferError::InvalidArgument(_))));
  }

  #[test]
  fn vertex_size_tracks_attributes() {
    let mut vb = VertexBuffer::new(vec![0.; 24]);
    let layout = [("position", 3), ("normal", 3), ("uv", 2), ("color", 4)];

    for (name, size) in layout.iter() {
      vb.add_attribute(name, *size, 0).unwrap();
    }

    vb.remove_attribute("normal").unwrap();
    vb.remove_attribute("color").unwrap();

    let sum: u32 = vb.attributes().iter().map(|a| a.size).sum();
    assert_eq!(vb.vertex_size(), sum);
    assert_eq!(vb.num_vertices(), 24 / 5);
    // removal does not repack
    assert_eq!(vb.data().len(), 24);
    assert_eq!(vb.attribute("uv").map(|a| a.offset), Ok(6));
  }

  #[test]
  fn no_attribute_no_vertex() {
    let vb = VertexBuffer::new(vec![1., 2., 3.]);
    assert_eq!(vb.num_vertices(), 0);
  }
}
