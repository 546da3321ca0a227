//! OpenGL ES 2 backend.
//!
//! This module implements the minko backend traits over OpenGL ES 2. The backend type is
//! [`Gles2`]; the context most users want is [`OpenGles2Context`].

mod buffer;
mod framebuffer;
mod pipeline;
mod shader;
mod texture;

use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_void;

use log::debug;
use minko::backend::Backend;
use minko::context::Context;

pub use self::texture::compressed;

// TLS synchronization barrier for `Gles2`: one backend per thread.
thread_local!(static TLS_ACQUIRE_GLES2: RefCell<Option<()>> = RefCell::new(Some(())));

/// A minko context driving OpenGL ES 2.
pub type OpenGles2Context = Context<Gles2>;

/// Errors raised while acquiring the backend.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Gles2Error {
  /// The backend is unavailable.
  ///
  /// That occurs when a backend already lives on the current thread.
  Unavailable,
  /// The loader could not provide a required entry point.
  MissingFunction(&'static str),
}

impl fmt::Display for Gles2Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      Gles2Error::Unavailable => f.write_str("OpenGL ES 2 backend unavailable on this thread"),
      Gles2Error::MissingFunction(name) => write!(f, "missing OpenGL function: {}", name),
    }
  }
}

impl error::Error for Gles2Error {}

/// An OpenGL ES 2 backend.
///
/// Calls go straight to the driver context current on the creating thread; the type is neither
/// [`Send`] nor [`Sync`].
#[derive(Debug)]
pub struct Gles2 {
  _a: PhantomData<*const ()>, // !Send and !Sync
}

impl Gles2 {
  /// Load the OpenGL entry points with `loader` and acquire the backend for the current thread.
  ///
  /// > Note: keep in mind you can create only one per thread. The slot is given back when the
  /// > backend is dropped.
  pub fn new<F>(loader: F) -> Result<Self, Gles2Error>
  where
    F: FnMut(&'static str) -> *const c_void,
  {
    TLS_ACQUIRE_GLES2.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          gl::load_with(loader);
          check_loaded()?;
          inner.take();

          debug!("acquired OpenGL ES 2 backend");
          Ok(Gles2 { _a: PhantomData })
        }

        None => Err(Gles2Error::Unavailable),
      }
    })
  }
}

impl Drop for Gles2 {
  fn drop(&mut self) {
    TLS_ACQUIRE_GLES2.with(|rc| *rc.borrow_mut() = Some(()));
  }
}

impl Backend for Gles2 {
  fn backend_name(&self) -> &'static str {
    "OpenGL ES 2"
  }
}

fn check_loaded() -> Result<(), Gles2Error> {
  let required = [
    ("glGenBuffers", gl::GenBuffers::is_loaded()),
    ("glTexImage2D", gl::TexImage2D::is_loaded()),
    ("glCompressedTexImage2D", gl::CompressedTexImage2D::is_loaded()),
    ("glGenFramebuffers", gl::GenFramebuffers::is_loaded()),
    ("glCreateShader", gl::CreateShader::is_loaded()),
    ("glDrawElements", gl::DrawElements::is_loaded()),
  ];

  match required.iter().find(|(_, loaded)| !loaded) {
    Some((name, _)) => Err(Gles2Error::MissingFunction(*name)),
    None => Ok(()),
  }
}
