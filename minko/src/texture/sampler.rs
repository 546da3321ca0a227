//! Sampler state: how a shader samples a bound texture.

/// How to wrap texture coordinates while sampling textures?
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum WrapMode {
  /// If textures coordinates lay outside of *[0;1]*, they will be clamped to either *0* or *1* for
  /// every components.
  Clamp,
  /// Textures coordinates are repeated if they lay outside of *[0;1]*.
  Repeat,
}

/// Texel filtering, used for both minification and magnification.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum TextureFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
}

/// Filtering between mip levels.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum MipFilter {
  /// Mipmaps are not sampled.
  None,
  /// Pick the nearest mip level.
  Nearest,
  /// Interpolate linearly between the two nearest mip levels.
  Linear,
}

/// A full sampler configuration.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct SamplerState {
  pub wrap_mode: WrapMode,
  pub texture_filter: TextureFilter,
  pub mip_filter: MipFilter,
}

impl SamplerState {
  pub fn new(wrap_mode: WrapMode, texture_filter: TextureFilter, mip_filter: MipFilter) -> Self {
    SamplerState {
      wrap_mode,
      texture_filter,
      mip_filter,
    }
  }
}

/// Clamped, nearest, no mipmap: the state every freshly created texture is given.
impl Default for SamplerState {
  fn default() -> Self {
    SamplerState::new(WrapMode::Clamp, TextureFilter::Nearest, MipFilter::None)
  }
}
