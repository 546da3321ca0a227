//! Typed, generation-counted resource handles.
//!
//! A [`Handle`] is an index into one of the context’s resource registries plus a generation tag.
//! Deleting a resource bumps the generation of its slot, so a handle kept around after deletion is
//! detected as stale instead of silently designating whatever resource reuses the slot.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Resource kinds, used to tag handles at the type level.
pub mod kind {
  /// Vertex buffer resources.
  #[derive(Debug)]
  pub enum VertexBuffer {}

  /// Index buffer resources.
  #[derive(Debug)]
  pub enum IndexBuffer {}

  /// Texture resources (2D, cube and shared).
  #[derive(Debug)]
  pub enum Texture {}

  /// Linked shader programs.
  #[derive(Debug)]
  pub enum Program {}

  /// Vertex shader stages.
  #[derive(Debug)]
  pub enum VertexShader {}

  /// Fragment shader stages.
  #[derive(Debug)]
  pub enum FragmentShader {}
}

pub type VertexBufferHandle = Handle<kind::VertexBuffer>;
pub type IndexBufferHandle = Handle<kind::IndexBuffer>;
pub type TextureHandle = Handle<kind::Texture>;
pub type ProgramHandle = Handle<kind::Program>;
pub type VertexShaderHandle = Handle<kind::VertexShader>;
pub type FragmentShaderHandle = Handle<kind::FragmentShader>;

/// Either shader stage handle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShaderHandle {
  Vertex(VertexShaderHandle),
  Fragment(FragmentShaderHandle),
}

impl From<VertexShaderHandle> for ShaderHandle {
  fn from(handle: VertexShaderHandle) -> Self {
    ShaderHandle::Vertex(handle)
  }
}

impl From<FragmentShaderHandle> for ShaderHandle {
  fn from(handle: FragmentShaderHandle) -> Self {
    ShaderHandle::Fragment(handle)
  }
}

/// Opaque handle to a resource owned by a context.
pub struct Handle<K> {
  index: u32,
  generation: u32,
  _kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
  fn new(index: u32, generation: u32) -> Self {
    Handle {
      index,
      generation,
      _kind: PhantomData,
    }
  }

  /// Slot index of the handle.
  pub fn index(&self) -> u32 {
    self.index
  }

  /// Generation of the slot when the handle was issued.
  pub fn generation(&self) -> u32 {
    self.generation
  }
}

impl<K> Clone for Handle<K> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
  fn eq(&self, rhs: &Self) -> bool {
    self.index == rhs.index && self.generation == rhs.generation
  }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
  fn hash<H>(&self, state: &mut H)
  where
    H: Hasher,
  {
    self.index.hash(state);
    self.generation.hash(state);
  }
}

impl<K> fmt::Debug for Handle<K> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Handle({}v{})", self.index, self.generation)
  }
}

#[derive(Debug)]
struct Slot<R> {
  generation: u32,
  record: Option<R>,
}

/// Arena of resource records addressed by [`Handle`].
#[derive(Debug)]
pub(crate) struct Registry<K, R> {
  slots: Vec<Slot<R>>,
  free: Vec<u32>,
  _kind: PhantomData<fn() -> K>,
}

impl<K, R> Registry<K, R> {
  pub(crate) fn new() -> Self {
    Registry {
      slots: Vec::new(),
      free: Vec::new(),
      _kind: PhantomData,
    }
  }

  pub(crate) fn insert(&mut self, record: R) -> Handle<K> {
    match self.free.pop() {
      Some(index) => {
        let slot = &mut self.slots[index as usize];
        slot.record = Some(record);
        Handle::new(index, slot.generation)
      }

      None => {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
          generation: 0,
          record: Some(record),
        });
        Handle::new(index, 0)
      }
    }
  }

  pub(crate) fn get(&self, handle: Handle<K>) -> Option<&R> {
    self
      .slots
      .get(handle.index as usize)
      .filter(|slot| slot.generation == handle.generation)
      .and_then(|slot| slot.record.as_ref())
  }

  pub(crate) fn get_mut(&mut self, handle: Handle<K>) -> Option<&mut R> {
    self
      .slots
      .get_mut(handle.index as usize)
      .filter(|slot| slot.generation == handle.generation)
      .and_then(|slot| slot.record.as_mut())
  }

  pub(crate) fn remove(&mut self, handle: Handle<K>) -> Option<R> {
    let slot = self
      .slots
      .get_mut(handle.index as usize)
      .filter(|slot| slot.generation == handle.generation)?;
    let record = slot.record.take()?;

    slot.generation = slot.generation.wrapping_add(1);
    self.free.push(handle.index);

    Some(record)
  }

  pub(crate) fn len(&self) -> usize {
    self.slots.iter().filter(|slot| slot.record.is_some()).count()
  }

  /// Live handles, in slot order.
  pub(crate) fn handles(&self) -> Vec<Handle<K>> {
    self
      .slots
      .iter()
      .enumerate()
      .filter(|(_, slot)| slot.record.is_some())
      .map(|(index, slot)| Handle::new(index as u32, slot.generation))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn removed_handle_is_stale() {
    let mut registry = Registry::<kind::Texture, &str>::new();
    let a = registry.insert("a");

    assert_eq!(registry.get(a), Some(&"a"));
    assert_eq!(registry.remove(a), Some("a"));
    assert_eq!(registry.get(a), None);
    assert_eq!(registry.remove(a), None);
  }

  #[test]
  fn reused_slot_gets_new_generation() {
    let mut registry = Registry::<kind::Texture, u32>::new();
    let a = registry.insert(1);
    registry.remove(a);
    let b = registry.insert(2);

    assert_eq!(a.index(), b.index());
    assert_ne!(a, b);
    assert_eq!(registry.get(a), None);
    assert_eq!(registry.get(b), Some(&2));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.handles(), vec![b]);
  }
}
