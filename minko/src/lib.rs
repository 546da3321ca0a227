//! # A state-caching GPU context for the Minko engine
//!
//! minko is the layer sitting right above the graphics driver: it owns every GPU object the engine
//! creates (vertex and index buffers, textures, shaders and programs), keeps a software mirror of
//! the driver state and filters every state change through it, so that redundant driver calls are
//! never issued.
//!
//! # What’s included?
//!
//! - **Texture formats**: [`texture::TextureFormatInfo`] describes every format the engine knows,
//!   compressed or not, and computes the byte size of an image or a mip level.
//! - **Buffers**: [`vertex::VertexBuffer`] holds interleaved float vertices described by named
//!   attributes; [`buffer::IndexBuffer`] holds 16-bit triangle indices; [`geometry::Geometry`]
//!   gathers both.
//! - **Textures**: 2D textures, cube textures and shared textures fed by an external producer, all
//!   behind the [`texture::AbstractTexture`] trait. Data is kept CPU side until disposed, and GPU
//!   objects are created lazily on first upload.
//! - **Render states**: [`render_state::States`] snapshots blending, depth and stencil tests,
//!   culling, scissor, samplers and render target.
//! - **The context**: [`context::Context`] is the only way to reach the driver. It hands out typed,
//!   generation-counted [handles](handle) and detects stale ones.
//!
//! # Backends
//!
//! The driver itself is abstracted by the traits of [`backend`]. The context is generic over them,
//! so that the caching rules are written once. Two backends exist:
//!
//! - [`backend::headless::Headless`], shipped with this crate, which records every call it
//!   receives. It is what the tests run against.
//! - `Gles2`, in the minko-gl crate, which speaks OpenGL ES 2.
//!
//! # Threading
//!
//! Everything is single-threaded. A context is neither [`Send`] nor [`Sync`]: it must stay on the
//! thread owning the driver context.

pub mod backend;
pub mod blending;
pub mod buffer;
pub mod context;
pub mod depth_stencil;
pub mod face_culling;
pub mod geometry;
pub mod handle;
pub mod render_state;
pub mod scissor;
pub mod shader;
pub mod texture;
pub mod vertex;

pub use crate::context::{Context, ContextConfig, ContextError};
pub use crate::render_state::States;
