//! Textures.
//!
//! Textures are CPU-side objects holding pixel data until they are uploaded to a [`Context`].
//! Three kinds exist:
//!
//! - [`Texture`], a 2D image;
//! - [`CubeTexture`], six square faces;
//! - [`SharedTexture`], a 2D texture fed with frames produced elsewhere (a camera, a video
//!   decoder…), which never keeps a copy of the pixels.
//!
//! Every texture has *logical* dimensions (what was asked for) and *GPU* dimensions (what is
//! allocated on the device). With mipmapping, GPU dimensions are padded to the next power of two
//! and uncompressed pixels are resampled to fit; block-compressed pixels cannot be resampled and
//! are stored verbatim.
//!
//! The device object is created lazily, on first upload, and lives in the context registries: a
//! texture only keeps its [`TextureHandle`].

use std::error;
use std::fmt;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::debug;

use crate::backend::texture::{CubeFace, TextureTarget};
use crate::backend::Backend;
use crate::context::{Context, ContextError};
use crate::handle::TextureHandle;

pub mod format;
pub mod sampler;

pub use self::format::{TextureFormat, TextureFormatError, TextureFormatInfo};
pub use self::sampler::{MipFilter, SamplerState, TextureFilter, WrapMode};

/// Largest texture side accepted by textures, whatever the device.
pub const MAX_SIZE: u32 = 4096;

/// Kind of texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TextureType {
  Texture2d,
  CubeTexture,
}

impl TextureType {
  pub(crate) fn target(self) -> TextureTarget {
    match self {
      TextureType::Texture2d => TextureTarget::Texture2d,
      TextureType::CubeTexture => TextureTarget::CubeMap,
    }
  }
}

/// Errors that might happen when working with textures.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextureError {
  /// A dimension or a format is out of the accepted range.
  InvalidArgument(String),
  /// Not enough pixel data provided.
  ///
  /// The first [`usize`] is the number of expected bytes and the second one the number provided.
  NotEnoughData(usize, usize),
  /// The operation needs the texture to be uploaded first.
  NotUploaded,
  /// Format lookup failed.
  Format(TextureFormatError),
  /// The context refused the operation.
  Context(ContextError),
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::InvalidArgument(ref reason) => write!(f, "invalid argument: {}", reason),

      TextureError::NotEnoughData(expected, provided) => write!(
        f,
        "not enough texels provided: expected {} bytes, provided {} bytes",
        expected, provided
      ),

      TextureError::NotUploaded => f.write_str("texture not uploaded"),
      TextureError::Format(ref e) => write!(f, "texture format error: {}", e),
      TextureError::Context(ref e) => write!(f, "context error: {}", e),
    }
  }
}

impl error::Error for TextureError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TextureError::Format(e) => Some(e),
      TextureError::Context(e) => Some(e),
      _ => None,
    }
  }
}

impl From<TextureFormatError> for TextureError {
  fn from(e: TextureFormatError) -> Self {
    TextureError::Format(e)
  }
}

impl From<ContextError> for TextureError {
  fn from(e: ContextError) -> Self {
    TextureError::Context(e)
  }
}

/// State shared by every kind of texture.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextureBase {
  ty: TextureType,
  format: TextureFormat,
  width: u32,
  height: u32,
  width_gpu: u32,
  height_gpu: u32,
  mip_mapping: bool,
  optimize_for_render_to_texture: bool,
  resize_smoothly: bool,
  handle: Option<TextureHandle>,
  // layout the device texture was allocated with
  allocated: Option<Layout>,
}

// Device dimensions, plus the format for compressed storage.
type Layout = (u32, u32, Option<TextureFormat>);

impl TextureBase {
  fn new(
    ty: TextureType,
    width: u32,
    height: u32,
    mip_mapping: bool,
    optimize_for_render_to_texture: bool,
    resize_smoothly: bool,
  ) -> Result<Self, TextureError> {
    check_size(width)?;
    check_size(height)?;

    Ok(TextureBase {
      ty,
      format: TextureFormat::Rgba,
      width,
      height,
      width_gpu: gpu_size(width, mip_mapping),
      height_gpu: gpu_size(height, mip_mapping),
      mip_mapping,
      optimize_for_render_to_texture,
      resize_smoothly,
      handle: None,
      allocated: None,
    })
  }

  fn is_compressed(&self) -> Result<bool, TextureError> {
    Ok(TextureFormatInfo::is_compressed(self.format)?)
  }

  fn layout(&self) -> Result<Layout, TextureError> {
    let compressed_format = if self.is_compressed()? {
      Some(self.format)
    } else {
      None
    };

    Ok((self.width_gpu, self.height_gpu, compressed_format))
  }

  /// Device handle, as long as it matches the retained layout.
  fn current_handle(&self) -> Result<TextureHandle, TextureError> {
    match self.handle {
      Some(handle) if self.allocated == Some(self.layout()?) => Ok(handle),
      _ => Err(TextureError::NotUploaded),
    }
  }

  /// Create the device texture, or allocate it again if the layout changed since.
  fn create<B>(&mut self, ctx: &mut Context<B>) -> Result<TextureHandle, TextureError>
  where
    B: Backend,
  {
    let layout = self.layout()?;

    if let Some(handle) = self.handle {
      if self.allocated == Some(layout) {
        return Ok(handle);
      }

      debug!(
        "reallocating texture {:?} as {}×{} ({})",
        handle, layout.0, layout.1, self.format
      );
      self.delete(ctx)?;
    }

    let handle = if self.is_compressed()? {
      ctx.create_compressed_texture(
        self.ty,
        self.format,
        self.width_gpu,
        self.height_gpu,
        self.mip_mapping,
      )?
    } else {
      ctx.create_texture(
        self.ty,
        self.width_gpu,
        self.height_gpu,
        self.mip_mapping,
        self.optimize_for_render_to_texture,
        self.mip_mapping,
      )?
    };

    self.handle = Some(handle);
    self.allocated = Some(layout);
    Ok(handle)
  }

  fn delete<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    self.allocated = None;

    if let Some(handle) = self.handle.take() {
      ctx.delete_texture(handle)?;
    }

    Ok(())
  }

  // Dimensions and expected byte size of a mip level.
  fn mip_level(&self, level: u32) -> Result<(u32, u32, usize), TextureError> {
    let last_level = if self.mip_mapping {
      31 - self.width_gpu.max(self.height_gpu).leading_zeros()
    } else {
      0
    };

    if level > last_level {
      return Err(TextureError::InvalidArgument(format!(
        "mip level {} beyond the chain of a {}×{} texture",
        level, self.width_gpu, self.height_gpu
      )));
    }

    let w = (self.width_gpu >> level).max(1);
    let h = (self.height_gpu >> level).max(1);
    let size = TextureFormatInfo::texture_size(self.format, w, h)?;

    Ok((w, h, size))
  }
}

/// Common interface of the texture kinds.
pub trait AbstractTexture {
  fn base(&self) -> &TextureBase;

  fn ty(&self) -> TextureType {
    self.base().ty
  }

  fn format(&self) -> TextureFormat {
    self.base().format
  }

  /// Logical width.
  fn width(&self) -> u32 {
    self.base().width
  }

  /// Logical height.
  fn height(&self) -> u32 {
    self.base().height
  }

  /// Width allocated on the device.
  fn width_gpu(&self) -> u32 {
    self.base().width_gpu
  }

  /// Height allocated on the device.
  fn height_gpu(&self) -> u32 {
    self.base().height_gpu
  }

  fn mip_mapping(&self) -> bool {
    self.base().mip_mapping
  }

  fn optimize_for_render_to_texture(&self) -> bool {
    self.base().optimize_for_render_to_texture
  }

  fn resize_smoothly(&self) -> bool {
    self.base().resize_smoothly
  }

  /// Device handle, once uploaded.
  fn handle(&self) -> Option<TextureHandle> {
    self.base().handle
  }

  /// Create the device texture if needed and push the retained pixels.
  fn upload<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend;

  /// Delete the device texture and free the retained pixels.
  fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend;

  /// Free the retained pixels, keeping the device copy.
  fn dispose_data(&mut self);
}

/// A 2D texture.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Texture {
  base: TextureBase,
  // RGBA at GPU dimensions, or verbatim compressed blocks
  data: Vec<u8>,
}

impl Texture {
  pub fn new(
    width: u32,
    height: u32,
    mip_mapping: bool,
    optimize_for_render_to_texture: bool,
    resize_smoothly: bool,
  ) -> Result<Self, TextureError> {
    Ok(Texture {
      base: TextureBase::new(
        TextureType::Texture2d,
        width,
        height,
        mip_mapping,
        optimize_for_render_to_texture,
        resize_smoothly,
      )?,
      data: Vec::new(),
    })
  }

  /// Set the pixels of the texture.
  ///
  /// `width_gpu` and `height_gpu` override the device dimensions (e.g. when the caller already
  /// padded the image); they must not exceed [`MAX_SIZE`] and must be powers of two when
  /// mipmapping. Uncompressed pixels (RGB or RGBA, at logical dimensions) are stored as RGBA and
  /// resampled to the device dimensions. Compressed pixels are stored verbatim; their device
  /// dimensions are the logical ones.
  ///
  /// If the device dimensions or the storage format change after an upload, the next
  /// [`upload`](AbstractTexture::upload) replaces the device texture and its handle.
  pub fn data(
    &mut self,
    bytes: &[u8],
    format: TextureFormat,
    width_gpu: Option<u32>,
    height_gpu: Option<u32>,
  ) -> Result<(), TextureError> {
    let info = TextureFormatInfo::get(format)?;
    let base = &mut self.base;

    if info.is_compressed {
      let expected = info.size_of(base.width, base.height);

      if bytes.len() < expected {
        return Err(TextureError::NotEnoughData(expected, bytes.len()));
      }

      base.format = format;
      base.width_gpu = base.width;
      base.height_gpu = base.height;
      self.data = bytes[..expected].to_vec();

      return Ok(());
    }

    let width_gpu = width_gpu.unwrap_or(base.width_gpu);
    let height_gpu = height_gpu.unwrap_or(base.height_gpu);

    check_size(width_gpu)?;
    check_size(height_gpu)?;

    if base.mip_mapping && !(width_gpu.is_power_of_two() && height_gpu.is_power_of_two()) {
      return Err(TextureError::InvalidArgument(format!(
        "mipmapped textures need power-of-two device dimensions, got {}×{}",
        width_gpu, height_gpu
      )));
    }

    let rgba = to_rgba(bytes, format, base.width, base.height)?;
    self.data = resample(
      rgba,
      (base.width, base.height),
      (width_gpu, height_gpu),
      base.resize_smoothly,
    )?;

    base.format = format;
    base.width_gpu = width_gpu;
    base.height_gpu = height_gpu;

    Ok(())
  }

  /// Retained pixels: RGBA at device dimensions, or compressed blocks.
  pub fn texels(&self) -> &[u8] {
    &self.data
  }

  /// Upload one mip level computed offline.
  ///
  /// `data` is in the texture format; its expected size comes from [`TextureFormatInfo`] and is
  /// never below the format minimum block size.
  pub fn upload_mip_level<B>(
    &mut self,
    ctx: &mut Context<B>,
    level: u32,
    data: &[u8],
  ) -> Result<(), TextureError>
  where
    B: Backend,
  {
    let handle = self.base.current_handle()?;
    let (w, h, expected) = self.base.mip_level(level)?;

    if data.len() < expected {
      return Err(TextureError::NotEnoughData(expected, data.len()));
    }

    if self.base.is_compressed()? {
      ctx.upload_compressed_texture_2d_data(handle, self.base.format, w, h, level, &data[..expected])?;
    } else {
      let rgba = to_rgba(&data[..expected], self.base.format, w, h)?;
      ctx.upload_texture_2d_data(handle, w, h, level, &rgba)?;
    }

    Ok(())
  }

  /// Change the logical dimensions.
  ///
  /// Device dimensions are recomputed, retained uncompressed pixels are resampled and the device
  /// texture is deleted: the next upload allocates it again. Compressed textures cannot be resized.
  pub fn resize<B>(
    &mut self,
    ctx: &mut Context<B>,
    width: u32,
    height: u32,
    resize_smoothly: bool,
  ) -> Result<(), TextureError>
  where
    B: Backend,
  {
    check_size(width)?;
    check_size(height)?;

    if self.base.is_compressed()? {
      return Err(TextureError::InvalidArgument(format!(
        "cannot resize a {} texture",
        self.base.format
      )));
    }

    let width_gpu = gpu_size(width, self.base.mip_mapping);
    let height_gpu = gpu_size(height, self.base.mip_mapping);

    if !self.data.is_empty() {
      let data = std::mem::take(&mut self.data);
      self.data = resample(
        data,
        (self.base.width_gpu, self.base.height_gpu),
        (width_gpu, height_gpu),
        resize_smoothly,
      )?;
    }

    self.base.delete(ctx)?;
    self.base.width = width;
    self.base.height = height;
    self.base.width_gpu = width_gpu;
    self.base.height_gpu = height_gpu;
    self.base.resize_smoothly = resize_smoothly;

    Ok(())
  }
}

impl AbstractTexture for Texture {
  fn base(&self) -> &TextureBase {
    &self.base
  }

  fn upload<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    let handle = self.base.create(ctx)?;

    if self.data.is_empty() {
      return Ok(());
    }

    let (w, h) = (self.base.width_gpu, self.base.height_gpu);

    if self.base.is_compressed()? {
      ctx.upload_compressed_texture_2d_data(handle, self.base.format, w, h, 0, &self.data)?;
    } else {
      ctx.upload_texture_2d_data(handle, w, h, 0, &self.data)?;

      if self.base.mip_mapping {
        ctx.generate_mipmaps(handle)?;
      }
    }

    Ok(())
  }

  fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    self.base.delete(ctx)?;
    self.dispose_data();
    Ok(())
  }

  fn dispose_data(&mut self) {
    self.data = Vec::new();
  }
}

/// A cube texture: six square faces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CubeTexture {
  base: TextureBase,
  faces: [Vec<u8>; 6],
}

impl CubeTexture {
  pub fn new(
    size: u32,
    mip_mapping: bool,
    optimize_for_render_to_texture: bool,
    resize_smoothly: bool,
  ) -> Result<Self, TextureError> {
    Ok(CubeTexture {
      base: TextureBase::new(
        TextureType::CubeTexture,
        size,
        size,
        mip_mapping,
        optimize_for_render_to_texture,
        resize_smoothly,
      )?,
      faces: Default::default(),
    })
  }

  /// Set the pixels of one face, at logical dimensions.
  ///
  /// All faces share one format.
  pub fn set_face_data(
    &mut self,
    face: CubeFace,
    bytes: &[u8],
    format: TextureFormat,
  ) -> Result<(), TextureError> {
    let info = TextureFormatInfo::get(format)?;
    let others_set = self
      .faces
      .iter()
      .enumerate()
      .any(|(i, data)| i != face.index() && !data.is_empty());

    if others_set && format != self.base.format {
      return Err(TextureError::InvalidArgument(format!(
        "{:?} face given as {} while other faces are {}",
        face, format, self.base.format
      )));
    }

    let base = &mut self.base;

    let data = if info.is_compressed {
      let expected = info.size_of(base.width, base.height);

      if bytes.len() < expected {
        return Err(TextureError::NotEnoughData(expected, bytes.len()));
      }

      base.width_gpu = base.width;
      base.height_gpu = base.height;
      bytes[..expected].to_vec()
    } else {
      base.width_gpu = gpu_size(base.width, base.mip_mapping);
      base.height_gpu = gpu_size(base.height, base.mip_mapping);

      let rgba = to_rgba(bytes, format, base.width, base.height)?;
      resample(
        rgba,
        (base.width, base.height),
        (base.width_gpu, base.height_gpu),
        base.resize_smoothly,
      )?
    };

    base.format = format;
    self.faces[face.index()] = data;

    Ok(())
  }

  /// Retained pixels of a face.
  pub fn face_texels(&self, face: CubeFace) -> &[u8] {
    &self.faces[face.index()]
  }

  /// Upload one mip level of one face, computed offline.
  pub fn upload_mip_level<B>(
    &mut self,
    ctx: &mut Context<B>,
    face: CubeFace,
    level: u32,
    data: &[u8],
  ) -> Result<(), TextureError>
  where
    B: Backend,
  {
    let handle = self.base.current_handle()?;
    let (w, h, expected) = self.base.mip_level(level)?;

    if data.len() < expected {
      return Err(TextureError::NotEnoughData(expected, data.len()));
    }

    if self.base.is_compressed()? {
      ctx.upload_compressed_cube_texture_data(
        handle,
        face,
        self.base.format,
        w,
        h,
        level,
        &data[..expected],
      )?;
    } else {
      let rgba = to_rgba(&data[..expected], self.base.format, w, h)?;
      ctx.upload_cube_texture_data(handle, face, w, h, level, &rgba)?;
    }

    Ok(())
  }
}

impl AbstractTexture for CubeTexture {
  fn base(&self) -> &TextureBase {
    &self.base
  }

  fn upload<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    let handle = self.base.create(ctx)?;
    let compressed = self.base.is_compressed()?;
    let (w, h) = (self.base.width_gpu, self.base.height_gpu);
    let mut uploaded = false;

    for face in CubeFace::ALL.iter() {
      let data = &self.faces[face.index()];

      if data.is_empty() {
        continue;
      }

      if compressed {
        ctx.upload_compressed_cube_texture_data(handle, *face, self.base.format, w, h, 0, data)?;
      } else {
        ctx.upload_cube_texture_data(handle, *face, w, h, 0, data)?;
      }

      uploaded = true;
    }

    if uploaded && !compressed && self.base.mip_mapping {
      ctx.generate_mipmaps(handle)?;
    }

    Ok(())
  }

  fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    self.base.delete(ctx)?;
    self.dispose_data();
    Ok(())
  }

  fn dispose_data(&mut self) {
    self.faces = Default::default();
  }
}

/// A 2D texture fed with externally produced RGBA frames.
///
/// No pixel is retained: each frame is pushed straight to the device.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SharedTexture {
  base: TextureBase,
}

impl SharedTexture {
  pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
    Ok(SharedTexture {
      base: TextureBase::new(TextureType::Texture2d, width, height, false, false, false)?,
    })
  }

  /// Push a frame, RGBA at the texture dimensions. The device texture is created if needed.
  pub fn update_frame<B>(&mut self, ctx: &mut Context<B>, frame: &[u8]) -> Result<(), TextureError>
  where
    B: Backend,
  {
    let handle = self.base.create(ctx)?;
    let (w, h) = (self.base.width_gpu, self.base.height_gpu);
    let expected = w as usize * h as usize * 4;

    if frame.len() < expected {
      return Err(TextureError::NotEnoughData(expected, frame.len()));
    }

    ctx.upload_texture_2d_data(handle, w, h, 0, &frame[..expected])?;
    Ok(())
  }
}

impl AbstractTexture for SharedTexture {
  fn base(&self) -> &TextureBase {
    &self.base
  }

  fn upload<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    self.base.create(ctx).map(|_| ())
  }

  fn dispose<B>(&mut self, ctx: &mut Context<B>) -> Result<(), TextureError>
  where
    B: Backend,
  {
    self.base.delete(ctx)
  }

  fn dispose_data(&mut self) {}
}

fn check_size(size: u32) -> Result<(), TextureError> {
  if size == 0 || size > MAX_SIZE {
    Err(TextureError::InvalidArgument(format!(
      "texture side {} out of range (1..={})",
      size, MAX_SIZE
    )))
  } else {
    Ok(())
  }
}

fn gpu_size(size: u32, mip_mapping: bool) -> u32 {
  if mip_mapping {
    size.next_power_of_two()
  } else {
    size
  }
}

// Expand RGB to RGBA with opaque alpha; RGBA is copied.
fn to_rgba(bytes: &[u8], format: TextureFormat, width: u32, height: u32) -> Result<Vec<u8>, TextureError> {
  let texels = width as usize * height as usize;

  match format {
    TextureFormat::Rgba => {
      let expected = texels * 4;

      if bytes.len() < expected {
        return Err(TextureError::NotEnoughData(expected, bytes.len()));
      }

      Ok(bytes[..expected].to_vec())
    }

    TextureFormat::Rgb => {
      let expected = texels * 3;

      if bytes.len() < expected {
        return Err(TextureError::NotEnoughData(expected, bytes.len()));
      }

      let mut rgba = Vec::with_capacity(texels * 4);
      for rgb in bytes[..expected].chunks_exact(3) {
        rgba.extend_from_slice(rgb);
        rgba.push(0xFF);
      }

      Ok(rgba)
    }

    _ => Err(TextureError::InvalidArgument(format!(
      "{} is not an uncompressed format",
      format
    ))),
  }
}

fn resample(
  rgba: Vec<u8>,
  from: (u32, u32),
  to: (u32, u32),
  smooth: bool,
) -> Result<Vec<u8>, TextureError> {
  if from == to {
    return Ok(rgba);
  }

  let provided = rgba.len();
  let image = RgbaImage::from_raw(from.0, from.1, rgba).ok_or_else(|| {
    TextureError::NotEnoughData(from.0 as usize * from.1 as usize * 4, provided)
  })?;
  let filter = if smooth {
    FilterType::Triangle
  } else {
    FilterType::Nearest
  };

  Ok(imageops::resize(&image, to.0, to.1, filter).into_raw())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mipmapped_gpu_size_is_padded() {
    let texture = Texture::new(200, 256, true, false, false).unwrap();

    assert_eq!(texture.width(), 200);
    assert_eq!(texture.width_gpu(), 256);
    assert_eq!(texture.height_gpu(), 256);

    let texture = Texture::new(200, 100, false, false, false).unwrap();
    assert_eq!((texture.width_gpu(), texture.height_gpu()), (200, 100));
  }

  #[test]
  fn oversized_texture_is_rejected() {
    assert!(matches!(
      Texture::new(MAX_SIZE + 1, 16, false, false, false),
      Err(TextureError::InvalidArgument(_))
    ));

    let mut texture = Texture::new(4, 4, false, false, false).unwrap();
    let pixels = vec![0; 4 * 4 * 4];
    assert!(matches!(
      texture.data(&pixels, TextureFormat::Rgba, Some(8192), None),
      Err(TextureError::InvalidArgument(_))
    ));
  }

  #[test]
  fn rgb_is_expanded_with_opaque_alpha() {
    let mut texture = Texture::new(2, 1, false, false, false).unwrap();
    texture
      .data(&[1, 2, 3, 4, 5, 6], TextureFormat::Rgb, None, None)
      .unwrap();

    assert_eq!(texture.texels(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    assert_eq!(texture.format(), TextureFormat::Rgb);
  }

  #[test]
  fn nearest_resampling_to_gpu_size() {
    let mut texture = Texture::new(1, 1, false, false, false).unwrap();
    texture
      .data(&[10, 20, 30, 40], TextureFormat::Rgba, Some(2), Some(2))
      .unwrap();

    assert_eq!(texture.texels(), &[10u8, 20, 30, 40].repeat(4)[..]);
    assert_eq!((texture.width_gpu(), texture.height_gpu()), (2, 2));
  }

  #[test]
  fn compressed_data_is_verbatim() {
    let mut texture = Texture::new(8, 8, false, false, false).unwrap();
    let blocks: Vec<u8> = (0..32).collect();

    texture
      .data(&blocks, TextureFormat::RgbDxt1, None, None)
      .unwrap();
    assert_eq!(texture.texels(), &blocks[..]);

    assert_eq!(
      texture.data(&blocks[..16], TextureFormat::RgbDxt1, None, None),
      Err(TextureError::NotEnoughData(32, 16))
    );
  }

  #[test]
  fn cube_faces_share_a_format() {
    let mut cube = CubeTexture::new(4, false, false, false).unwrap();
    let rgba = vec![0; 4 * 4 * 4];
    let rgb = vec![0; 4 * 4 * 3];

    cube
      .set_face_data(CubeFace::PositiveX, &rgba, TextureFormat::Rgba)
      .unwrap();

    assert!(matches!(
      cube.set_face_data(CubeFace::NegativeX, &rgb, TextureFormat::Rgb),
      Err(TextureError::InvalidArgument(_))
    ));
    assert_eq!(cube.face_texels(CubeFace::PositiveX).len(), 64);
    assert!(cube.face_texels(CubeFace::NegativeX).is_empty());
  }
}
