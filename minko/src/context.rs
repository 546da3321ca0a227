//! Graphics context.
//!
//! [`Context`] is the state-caching façade every resource and every draw goes through. It owns:
//!
//! - a backend `B`, the raw device vocabulary (see [`crate::backend`]);
//! - a mirror of the device state: bound buffers and textures, vertex attribute setup, program
//!   in use, blending, depth, stencil, culling, scissor, viewport, render target…;
//! - the registries of every device object it created, addressed by generation-counted
//!   [`Handle`](crate::handle::Handle)s.
//!
//! Every state setter compares the requested value with the mirror and only reaches the backend
//! on change. Deleting an object scrubs every mirror entry that references it, so a device name
//! recycled by the driver can never be mistaken for an already bound object.
//!
//! # On context and threads
//!
//! A context is `!Send` and `!Sync`: device contexts are bound to the thread that created them and
//! calls must be issued from that thread, in order. There is no internal locking.

use std::error;
use std::fmt;
use std::marker::PhantomData;

use log::{debug, info, warn};

use crate::backend::pipeline::Capability;
use crate::backend::texture::TextureTarget;
use crate::backend::{Backend, Name};
use crate::handle::{kind, Handle, Registry, TextureHandle};
use crate::scissor::Viewport;
use crate::texture::{MipFilter, TextureFilter, TextureFormat, TextureFormatError, TextureType, WrapMode};

mod pipeline;
mod program;
mod render_target;
mod resources;
pub(crate) mod state;

use self::state::{Cached, DeviceState};

// Upper bound on the error flags drained by a single check.
const MAX_ERROR_FLAGS: usize = 16;

/// Context configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContextConfig {
  /// Number of vertex attribute slots mirrored (at most 32).
  pub vertex_attribute_slots: u32,
  /// Number of texture units mirrored.
  pub texture_units: u32,
  /// Poll the device error flag after mutating calls.
  pub check_errors: bool,
}

impl ContextConfig {
  pub fn vertex_attribute_slots(self, vertex_attribute_slots: u32) -> Self {
    ContextConfig {
      vertex_attribute_slots,
      ..self
    }
  }

  pub fn texture_units(self, texture_units: u32) -> Self {
    ContextConfig {
      texture_units,
      ..self
    }
  }

  pub fn check_errors(self, check_errors: bool) -> Self {
    ContextConfig {
      check_errors,
      ..self
    }
  }
}

/// 8 vertex attribute slots, 8 texture units; errors are checked in debug builds only.
impl Default for ContextConfig {
  fn default() -> Self {
    ContextConfig {
      vertex_attribute_slots: 8,
      texture_units: 8,
      check_errors: cfg!(debug_assertions),
    }
  }
}

/// Errors raised by context operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContextError {
  /// The handle designates an object that was deleted (or never created by this context).
  StaleHandle,
  /// An argument is out of the accepted range.
  InvalidArgument(String),
  /// Arguments are individually valid but contradict each other.
  LogicError(String),
  /// The texture cannot be rendered to: it has no framebuffer.
  UnsupportedTarget,
  /// A program input has a device type the engine does not know.
  UnsupportedType { name: String, token: u32 },
  /// A render-to-texture framebuffer could not be completed by the device.
  IncompleteFramebuffer,
  /// Shader compilation failed; carries the compilation log.
  ShaderCompilation(String),
  /// Program link failed; carries the link log.
  ProgramLink(String),
  /// Texture format lookup failed.
  TextureFormat(TextureFormatError),
}

impl ContextError {
  pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
    ContextError::InvalidArgument(reason.into())
  }

  pub(crate) fn logic_error(reason: impl Into<String>) -> Self {
    ContextError::LogicError(reason.into())
  }
}

impl fmt::Display for ContextError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      ContextError::StaleHandle => f.write_str("stale or foreign handle"),
      ContextError::InvalidArgument(ref reason) => write!(f, "invalid argument: {}", reason),
      ContextError::LogicError(ref reason) => write!(f, "logic error: {}", reason),
      ContextError::UnsupportedTarget => f.write_str("texture has no render target"),
      ContextError::UnsupportedType { ref name, token } => {
        write!(f, "unsupported type 0x{:04X} for program input {}", token, name)
      }
      ContextError::IncompleteFramebuffer => f.write_str("incomplete framebuffer"),
      ContextError::ShaderCompilation(ref log) => write!(f, "shader compilation failed: {}", log),
      ContextError::ProgramLink(ref log) => write!(f, "program link failed: {}", log),
      ContextError::TextureFormat(ref e) => write!(f, "texture format error: {}", e),
    }
  }
}

impl error::Error for ContextError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ContextError::TextureFormat(e) => Some(e),
      _ => None,
    }
  }
}

impl From<TextureFormatError> for ContextError {
  fn from(e: TextureFormatError) -> Self {
    ContextError::TextureFormat(e)
  }
}

/// Where draws currently land.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderTarget {
  /// The default framebuffer.
  BackBuffer,
  /// The framebuffer of a render-to-texture texture.
  Texture(TextureHandle),
}

#[derive(Debug)]
pub(crate) struct BufferRecord {
  pub(crate) name: Name,
  /// Capacity, in elements.
  pub(crate) len: usize,
}

#[derive(Debug)]
pub(crate) struct SamplerCache {
  pub(crate) wrap_mode: Cached<WrapMode>,
  pub(crate) texture_filter: Cached<TextureFilter>,
  pub(crate) mip_filter: Cached<MipFilter>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RenderTargetRecord {
  pub(crate) framebuffer: Name,
  pub(crate) renderbuffer: Name,
  pub(crate) depth_stencil_attached: bool,
}

#[derive(Debug)]
pub(crate) struct TextureRecord {
  pub(crate) name: Name,
  pub(crate) ty: TextureType,
  pub(crate) target: TextureTarget,
  /// `None` for uncompressed RGBA storage.
  pub(crate) compressed_format: Option<TextureFormat>,
  pub(crate) width: u32,
  pub(crate) height: u32,
  pub(crate) mip_mapping: bool,
  pub(crate) sampler: SamplerCache,
  pub(crate) render_target: Option<RenderTargetRecord>,
}

#[derive(Debug)]
pub(crate) struct ObjectRecord {
  pub(crate) name: Name,
}

/// The state-caching context.
#[derive(Debug)]
pub struct Context<B>
where
  B: Backend,
{
  _a: PhantomData<*const ()>, // !Send and !Sync
  backend: B,
  config: ContextConfig,
  state: DeviceState,
  vertex_buffers: Registry<kind::VertexBuffer, BufferRecord>,
  index_buffers: Registry<kind::IndexBuffer, BufferRecord>,
  textures: Registry<kind::Texture, TextureRecord>,
  programs: Registry<kind::Program, ObjectRecord>,
  vertex_shaders: Registry<kind::VertexShader, ObjectRecord>,
  fragment_shaders: Registry<kind::FragmentShader, ObjectRecord>,
  max_texture_size: u32,
  texture_formats: Option<Vec<TextureFormat>>,
  extensions: Option<Vec<String>>,
}

impl<B> Context<B>
where
  B: Backend,
{
  /// Wrap a backend.
  ///
  /// The device is assumed fresh: blending, depth and stencil tests are switched on and every
  /// other piece of state is considered unknown until first set.
  pub fn new(mut backend: B, config: ContextConfig) -> Self {
    let mut config = config;

    if config.vertex_attribute_slots > 32 {
      warn!(
        "{} vertex attribute slots requested, only 32 are mirrored",
        config.vertex_attribute_slots
      );
      config.vertex_attribute_slots = 32;
    }

    let max_texture_size = backend.max_texture_size();

    info!(
      "{} context: {} vertex attribute slots, {} texture units, max texture size {}",
      backend.backend_name(),
      config.vertex_attribute_slots,
      config.texture_units,
      max_texture_size
    );

    backend.enable(Capability::Blend);
    backend.enable(Capability::DepthTest);
    backend.enable(Capability::StencilTest);

    let state = DeviceState::new(config.vertex_attribute_slots, config.texture_units);

    Context {
      _a: PhantomData,
      backend,
      config,
      state,
      vertex_buffers: Registry::new(),
      index_buffers: Registry::new(),
      textures: Registry::new(),
      programs: Registry::new(),
      vertex_shaders: Registry::new(),
      fragment_shaders: Registry::new(),
      max_texture_size,
      texture_formats: None,
      extensions: None,
    }
  }

  /// The wrapped backend.
  pub fn backend(&self) -> &B {
    &self.backend
  }

  /// The wrapped backend, mutably.
  ///
  /// Calls issued directly on the backend bypass the state mirror: the context will not notice
  /// them and may skip calls it believes redundant afterwards.
  pub fn backend_mut(&mut self) -> &mut B {
    &mut self.backend
  }

  pub fn config(&self) -> &ContextConfig {
    &self.config
  }

  pub fn vertex_attribute_slots(&self) -> u32 {
    self.config.vertex_attribute_slots
  }

  pub fn texture_units(&self) -> u32 {
    self.config.texture_units
  }

  /// Largest texture side accepted by the device.
  pub fn max_texture_size(&self) -> u32 {
    self.max_texture_size
  }

  /// Whether the device advertises an extension.
  pub fn supports_extension(&mut self, extension: &str) -> bool {
    if self.extensions.is_none() {
      let extensions = self.backend.extensions();
      debug!("{} extensions advertised", extensions.len());
      self.extensions = Some(extensions);
    }

    self
      .extensions
      .as_ref()
      .map_or(false, |extensions| extensions.iter().any(|e| e == extension))
  }

  /// Texture formats the device can sample from.
  ///
  /// Uncompressed RGB and RGBA are always available; compressed formats are the ones the device
  /// advertises and the backend knows how to name. Computed once.
  pub fn available_texture_formats(&mut self) -> &[TextureFormat] {
    if self.texture_formats.is_none() {
      let mut formats = vec![TextureFormat::Rgb, TextureFormat::Rgba];

      for token in self.backend.compressed_texture_formats() {
        match B::texture_format_from_token(token) {
          Some(format) if !formats.contains(&format) => formats.push(format),
          Some(_) => (),
          None => debug!("skipping unknown compressed texture format 0x{:04X}", token),
        }
      }

      self.texture_formats = Some(formats);
    }

    self.texture_formats.as_deref().unwrap_or(&[])
  }

  /// Current render target.
  pub fn render_target(&self) -> RenderTarget {
    self.state.render_target
  }

  /// Last viewport set through the context, if any.
  pub fn current_viewport(&self) -> Option<Viewport> {
    self.state.viewport.get().copied()
  }

  /// Texture bound to a unit, as mirrored.
  pub fn bound_texture_at(&self, slot: u32) -> Option<TextureHandle> {
    self
      .state
      .bound_textures
      .get(slot as usize)
      .and_then(|binding| binding.map(|b| b.handle))
  }

  /// Drain and log the device error flags.
  ///
  /// Device errors are diagnostics: they are never turned into failures. Returns whether any flag
  /// was raised.
  pub fn check_for_errors(&mut self) -> bool {
    let mut raised = false;

    for _ in 0..MAX_ERROR_FLAGS {
      match self.backend.get_error() {
        Some(e) => {
          warn!("{} device error: {}", self.backend.backend_name(), e);
          raised = true;
        }

        None => break,
      }
    }

    raised
  }

  // Error polling after mutating calls, when enabled.
  fn debug_check(&mut self) {
    if self.config.check_errors {
      self.check_for_errors();
    }
  }

  fn texture(&self, texture: TextureHandle) -> Result<&TextureRecord, ContextError> {
    self.textures.get(texture).ok_or(ContextError::StaleHandle)
  }

  fn texture_mut(&mut self, texture: TextureHandle) -> Result<&mut TextureRecord, ContextError> {
    self.textures.get_mut(texture).ok_or(ContextError::StaleHandle)
  }

  /// Whether a handle designates a live object of this context.
  pub fn is_live<K>(&self, handle: Handle<K>) -> bool
  where
    Self: Liveness<K>,
  {
    Liveness::<K>::contains(self, handle)
  }
}

/// Liveness lookup, per resource kind.
pub trait Liveness<K> {
  fn contains(&self, handle: Handle<K>) -> bool;
}

macro_rules! impl_liveness {
  ($($kind:ident => $registry:ident),* $(,)?) => {
    $(
      impl<B> Liveness<kind::$kind> for Context<B>
      where
        B: Backend,
      {
        fn contains(&self, handle: Handle<kind::$kind>) -> bool {
          self.$registry.get(handle).is_some()
        }
      }
    )*
  }
}

impl_liveness!(
  VertexBuffer => vertex_buffers,
  IndexBuffer => index_buffers,
  Texture => textures,
  Program => programs,
  VertexShader => vertex_shaders,
  FragmentShader => fragment_shaders,
);

impl<B> Drop for Context<B>
where
  B: Backend,
{
  fn drop(&mut self) {
    debug!(
      "dropping {} context: {} vertex buffers, {} index buffers, {} textures, {} programs",
      self.backend.backend_name(),
      self.vertex_buffers.len(),
      self.index_buffers.len(),
      self.textures.len(),
      self.programs.len()
    );

    // handles come straight from the registries, deletion cannot fail
    for handle in self.textures.handles() {
      let _ = self.delete_texture(handle);
    }

    for handle in self.vertex_buffers.handles() {
      let _ = self.delete_vertex_buffer(handle);
    }

    for handle in self.index_buffers.handles() {
      let _ = self.delete_index_buffer(handle);
    }

    for handle in self.programs.handles() {
      let _ = self.delete_program(handle);
    }

    for handle in self.vertex_shaders.handles() {
      let _ = self.delete_vertex_shader(handle);
    }

    for handle in self.fragment_shaders.handles() {
      let _ = self.delete_fragment_shader(handle);
    }
  }
}
