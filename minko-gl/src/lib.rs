//! OpenGL ES 2 backend.
//!
//! This crate exports an [OpenGL ES 2](https://www.khronos.org/opengles/) backend for the
//! [minko](../minko) context core. Desktop drivers exposing the ES 2 compatible subset of OpenGL
//! work as well.
//!
//! The windowing layer creates the driver context, makes it current and hands a function loader to
//! [`Gles2::new`]. The backend is then wrapped in a context:
//!
//! ```ignore
//! use minko::ContextConfig;
//! use minko_gl::{Gles2, OpenGles2Context};
//!
//! let backend = Gles2::new(|symbol| window.get_proc_address(symbol))?;
//! let mut ctx = OpenGles2Context::new(backend, ContextConfig::default());
//! ```

#[cfg(feature = "gles2")]
pub mod gles2;

#[cfg(feature = "gles2")]
pub use gles2::{Gles2, Gles2Error, OpenGles2Context};
