//! Texture backend interface.
//!
//! Uncompressed texels always cross this interface as tightly packed 8-bit RGBA; compressed
//! texels are handed over verbatim with their [`TextureFormat`].

use crate::backend::Name;
use crate::texture::{MipFilter, TextureFilter, TextureFormat, WrapMode};

/// Binding point of a texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TextureTarget {
  Texture2d,
  CubeMap,
}

/// Face of a cube map.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CubeFace {
  PositiveX,
  NegativeX,
  PositiveY,
  NegativeY,
  PositiveZ,
  NegativeZ,
}

impl CubeFace {
  /// The six faces, in device order.
  pub const ALL: [CubeFace; 6] = [
    CubeFace::PositiveX,
    CubeFace::NegativeX,
    CubeFace::PositiveY,
    CubeFace::NegativeY,
    CubeFace::PositiveZ,
    CubeFace::NegativeZ,
  ];

  /// Position of the face in [`CubeFace::ALL`].
  pub fn index(self) -> usize {
    match self {
      CubeFace::PositiveX => 0,
      CubeFace::NegativeX => 1,
      CubeFace::PositiveY => 2,
      CubeFace::NegativeY => 3,
      CubeFace::PositiveZ => 4,
      CubeFace::NegativeZ => 5,
    }
  }
}

/// Image receiving texels: a 2D texture or one face of a cube map.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ImageTarget {
  Texture2d,
  CubeFace(CubeFace),
}

impl ImageTarget {
  /// Binding point the image belongs to.
  pub fn texture_target(self) -> TextureTarget {
    match self {
      ImageTarget::Texture2d => TextureTarget::Texture2d,
      ImageTarget::CubeFace(_) => TextureTarget::CubeMap,
    }
  }
}

/// Texture backend.
///
/// Image, mipmap and parameter calls apply to the texture bound to the active unit.
pub trait Texture {
  fn gen_texture(&mut self) -> Name;

  fn delete_texture(&mut self, texture: Name);

  /// Select the texture unit subsequent bindings apply to.
  fn active_texture(&mut self, unit: u32);

  fn bind_texture(&mut self, target: TextureTarget, texture: Name);

  /// Specify one level of an RGBA8 image. `None` only allocates storage.
  fn tex_image(
    &mut self,
    target: ImageTarget,
    level: u32,
    width: u32,
    height: u32,
    texels: Option<&[u8]>,
  );

  /// Specify one level of a block-compressed image.
  fn compressed_tex_image(
    &mut self,
    target: ImageTarget,
    level: u32,
    format: TextureFormat,
    width: u32,
    height: u32,
    data: &[u8],
  );

  fn generate_mipmap(&mut self, target: TextureTarget);

  fn set_wrap_mode(&mut self, target: TextureTarget, wrap_mode: WrapMode);

  /// Set minification and magnification filters.
  fn set_filters(&mut self, target: TextureTarget, filter: TextureFilter, mip_filter: MipFilter);

  /// Largest texture side the device accepts.
  fn max_texture_size(&mut self) -> u32;

  /// Raw tokens of the compressed formats the device advertises.
  fn compressed_texture_formats(&mut self) -> Vec<u32>;

  /// Map a raw compressed-format token to an engine format, if the backend knows it.
  fn texture_format_from_token(token: u32) -> Option<TextureFormat>
  where
    Self: Sized;
}
