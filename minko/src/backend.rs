//! Backend interfacing.
//!
//! A backend is the low-level vocabulary a device understands: create, bind, upload and delete
//! objects, set fixed-function state and issue draw calls. Backends know nothing about caching:
//! [`Context`](crate::context::Context) filters every call through its state mirror before
//! reaching them, so a backend method is expected to hit the device every time it is called.
//!
//! The interface is split by concern, one trait per module, and gathered under [`Backend`].
//! Objects are designated by raw device [`Name`]s; `0` always means “no object”.

use std::fmt;

pub mod buffer;
pub mod framebuffer;
pub mod headless;
pub mod pipeline;
pub mod shader;
pub mod texture;

/// Raw device object name. `0` is reserved for “none”.
pub type Name = u32;

/// A complete backend.
pub trait Backend:
  buffer::Buffer + texture::Texture + framebuffer::Framebuffer + shader::Shader + pipeline::Pipeline
{
  /// Human readable name of the backend, used in logs.
  fn backend_name(&self) -> &'static str;
}

/// An error flag raised by the device.
///
/// Device errors are diagnostics: they are reported after the offending call has already been
/// issued and are never part of the control flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DriverError {
  pub code: u32,
  pub description: &'static str,
}

impl fmt::Display for DriverError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{} (0x{:04X})", self.description, self.code)
  }
}
