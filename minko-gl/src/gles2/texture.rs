//! OpenGL ES 2 texture implementation.

use std::os::raw::c_void;
use std::ptr;

use gl::types::*;
use minko::backend::texture::{CubeFace, ImageTarget, Texture, TextureTarget};
use minko::backend::Name;
use minko::texture::{MipFilter, TextureFilter, TextureFormat, WrapMode};

use crate::gles2::Gles2;

/// Compressed format tokens, as defined by their respective extensions.
pub mod compressed {
  use gl::types::GLenum;

  pub const RGB_S3TC_DXT1: GLenum = 0x83F0;
  pub const RGBA_S3TC_DXT1: GLenum = 0x83F1;
  pub const RGBA_S3TC_DXT3: GLenum = 0x83F2;
  pub const RGBA_S3TC_DXT5: GLenum = 0x83F3;
  pub const ETC1_RGB8: GLenum = 0x8D64;
  pub const RGB_PVRTC_4BPPV1: GLenum = 0x8C00;
  pub const RGB_PVRTC_2BPPV1: GLenum = 0x8C01;
  pub const RGBA_PVRTC_4BPPV1: GLenum = 0x8C02;
  pub const RGBA_PVRTC_2BPPV1: GLenum = 0x8C03;
  pub const RGBA_PVRTC_2BPPV2: GLenum = 0x9137;
  pub const RGBA_PVRTC_4BPPV2: GLenum = 0x9138;
  pub const ATC_RGB: GLenum = 0x8C92;
  pub const ATC_RGBA_EXPLICIT_ALPHA: GLenum = 0x8C93;
  pub const ATC_RGBA_INTERPOLATED_ALPHA: GLenum = 0x87EE;
}

/// Token of a format. ETC1 carries no alpha: its RGBA flavor is two ETC1 images (color then
/// alpha) sharing the same token.
pub(crate) fn format_to_glenum(format: TextureFormat) -> GLenum {
  match format {
    TextureFormat::Rgb => gl::RGB,
    TextureFormat::Rgba => gl::RGBA,
    TextureFormat::RgbDxt1 => compressed::RGB_S3TC_DXT1,
    TextureFormat::RgbaDxt1 => compressed::RGBA_S3TC_DXT1,
    TextureFormat::RgbaDxt3 => compressed::RGBA_S3TC_DXT3,
    TextureFormat::RgbaDxt5 => compressed::RGBA_S3TC_DXT5,
    TextureFormat::RgbEtc1 | TextureFormat::RgbaEtc1 => compressed::ETC1_RGB8,
    TextureFormat::RgbPvrtc1_2bpp => compressed::RGB_PVRTC_2BPPV1,
    TextureFormat::RgbPvrtc1_4bpp => compressed::RGB_PVRTC_4BPPV1,
    TextureFormat::RgbaPvrtc1_2bpp => compressed::RGBA_PVRTC_2BPPV1,
    TextureFormat::RgbaPvrtc1_4bpp => compressed::RGBA_PVRTC_4BPPV1,
    TextureFormat::RgbaPvrtc2_2bpp => compressed::RGBA_PVRTC_2BPPV2,
    TextureFormat::RgbaPvrtc2_4bpp => compressed::RGBA_PVRTC_4BPPV2,
    TextureFormat::RgbAtitc => compressed::ATC_RGB,
    TextureFormat::RgbaAtitc => compressed::ATC_RGBA_INTERPOLATED_ALPHA,
  }
}

pub(crate) fn glenum_to_format(token: GLenum) -> Option<TextureFormat> {
  match token {
    compressed::RGB_S3TC_DXT1 => Some(TextureFormat::RgbDxt1),
    compressed::RGBA_S3TC_DXT1 => Some(TextureFormat::RgbaDxt1),
    compressed::RGBA_S3TC_DXT3 => Some(TextureFormat::RgbaDxt3),
    compressed::RGBA_S3TC_DXT5 => Some(TextureFormat::RgbaDxt5),
    compressed::ETC1_RGB8 => Some(TextureFormat::RgbEtc1),
    compressed::RGB_PVRTC_2BPPV1 => Some(TextureFormat::RgbPvrtc1_2bpp),
    compressed::RGB_PVRTC_4BPPV1 => Some(TextureFormat::RgbPvrtc1_4bpp),
    compressed::RGBA_PVRTC_2BPPV1 => Some(TextureFormat::RgbaPvrtc1_2bpp),
    compressed::RGBA_PVRTC_4BPPV1 => Some(TextureFormat::RgbaPvrtc1_4bpp),
    compressed::RGBA_PVRTC_2BPPV2 => Some(TextureFormat::RgbaPvrtc2_2bpp),
    compressed::RGBA_PVRTC_4BPPV2 => Some(TextureFormat::RgbaPvrtc2_4bpp),
    compressed::ATC_RGB => Some(TextureFormat::RgbAtitc),
    compressed::ATC_RGBA_EXPLICIT_ALPHA | compressed::ATC_RGBA_INTERPOLATED_ALPHA => {
      Some(TextureFormat::RgbaAtitc)
    }
    _ => None,
  }
}

pub(crate) fn texture_target_to_glenum(target: TextureTarget) -> GLenum {
  match target {
    TextureTarget::Texture2d => gl::TEXTURE_2D,
    TextureTarget::CubeMap => gl::TEXTURE_CUBE_MAP,
  }
}

pub(crate) fn image_target_to_glenum(target: ImageTarget) -> GLenum {
  match target {
    ImageTarget::Texture2d => gl::TEXTURE_2D,
    ImageTarget::CubeFace(CubeFace::PositiveX) => gl::TEXTURE_CUBE_MAP_POSITIVE_X,
    ImageTarget::CubeFace(CubeFace::NegativeX) => gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
    ImageTarget::CubeFace(CubeFace::PositiveY) => gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
    ImageTarget::CubeFace(CubeFace::NegativeY) => gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
    ImageTarget::CubeFace(CubeFace::PositiveZ) => gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
    ImageTarget::CubeFace(CubeFace::NegativeZ) => gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
  }
}

fn wrap_mode_to_glenum(wrap_mode: WrapMode) -> GLenum {
  match wrap_mode {
    WrapMode::Clamp => gl::CLAMP_TO_EDGE,
    WrapMode::Repeat => gl::REPEAT,
  }
}

fn min_filter_to_glenum(filter: TextureFilter, mip_filter: MipFilter) -> GLenum {
  match (filter, mip_filter) {
    (TextureFilter::Nearest, MipFilter::None) => gl::NEAREST,
    (TextureFilter::Nearest, MipFilter::Nearest) => gl::NEAREST_MIPMAP_NEAREST,
    (TextureFilter::Nearest, MipFilter::Linear) => gl::NEAREST_MIPMAP_LINEAR,
    (TextureFilter::Linear, MipFilter::None) => gl::LINEAR,
    (TextureFilter::Linear, MipFilter::Nearest) => gl::LINEAR_MIPMAP_NEAREST,
    (TextureFilter::Linear, MipFilter::Linear) => gl::LINEAR_MIPMAP_LINEAR,
  }
}

fn mag_filter_to_glenum(filter: TextureFilter) -> GLenum {
  match filter {
    TextureFilter::Nearest => gl::NEAREST,
    TextureFilter::Linear => gl::LINEAR,
  }
}

impl Texture for Gles2 {
  fn gen_texture(&mut self) -> Name {
    let mut texture: GLuint = 0;

    unsafe {
      gl::GenTextures(1, &mut texture);
    }

    texture
  }

  fn delete_texture(&mut self, texture: Name) {
    unsafe {
      gl::DeleteTextures(1, &texture);
    }
  }

  fn active_texture(&mut self, unit: u32) {
    unsafe {
      gl::ActiveTexture(gl::TEXTURE0 + unit);
    }
  }

  fn bind_texture(&mut self, target: TextureTarget, texture: Name) {
    unsafe {
      gl::BindTexture(texture_target_to_glenum(target), texture);
    }
  }

  fn tex_image(
    &mut self,
    target: ImageTarget,
    level: u32,
    width: u32,
    height: u32,
    texels: Option<&[u8]>,
  ) {
    let texels = texels.map_or(ptr::null(), |texels| texels.as_ptr() as *const c_void);

    unsafe {
      gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
      gl::TexImage2D(
        image_target_to_glenum(target),
        level as GLint,
        gl::RGBA as GLint,
        width as GLsizei,
        height as GLsizei,
        0,
        gl::RGBA,
        gl::UNSIGNED_BYTE,
        texels,
      );
    }
  }

  fn compressed_tex_image(
    &mut self,
    target: ImageTarget,
    level: u32,
    format: TextureFormat,
    width: u32,
    height: u32,
    data: &[u8],
  ) {
    unsafe {
      gl::CompressedTexImage2D(
        image_target_to_glenum(target),
        level as GLint,
        format_to_glenum(format),
        width as GLsizei,
        height as GLsizei,
        0,
        data.len() as GLsizei,
        data.as_ptr() as *const c_void,
      );
    }
  }

  fn generate_mipmap(&mut self, target: TextureTarget) {
    unsafe {
      gl::GenerateMipmap(texture_target_to_glenum(target));
    }
  }

  fn set_wrap_mode(&mut self, target: TextureTarget, wrap_mode: WrapMode) {
    let target = texture_target_to_glenum(target);
    let wrap = wrap_mode_to_glenum(wrap_mode) as GLint;

    unsafe {
      gl::TexParameteri(target, gl::TEXTURE_WRAP_S, wrap);
      gl::TexParameteri(target, gl::TEXTURE_WRAP_T, wrap);
    }
  }

  fn set_filters(&mut self, target: TextureTarget, filter: TextureFilter, mip_filter: MipFilter) {
    let target = texture_target_to_glenum(target);

    unsafe {
      gl::TexParameteri(
        target,
        gl::TEXTURE_MIN_FILTER,
        min_filter_to_glenum(filter, mip_filter) as GLint,
      );
      gl::TexParameteri(
        target,
        gl::TEXTURE_MAG_FILTER,
        mag_filter_to_glenum(filter) as GLint,
      );
    }
  }

  fn max_texture_size(&mut self) -> u32 {
    let mut size: GLint = 0;

    unsafe {
      gl::GetIntegerv(gl::MAX_TEXTURE_SIZE, &mut size);
    }

    size.max(0) as u32
  }

  fn compressed_texture_formats(&mut self) -> Vec<u32> {
    let mut count: GLint = 0;

    unsafe {
      gl::GetIntegerv(gl::NUM_COMPRESSED_TEXTURE_FORMATS, &mut count);
    }

    if count <= 0 {
      return Vec::new();
    }

    let mut tokens = vec![0 as GLint; count as usize];

    unsafe {
      gl::GetIntegerv(gl::COMPRESSED_TEXTURE_FORMATS, tokens.as_mut_ptr());
    }

    tokens.into_iter().map(|token| token as u32).collect()
  }

  fn texture_format_from_token(token: u32) -> Option<TextureFormat> {
    glenum_to_format(token)
  }
}
