//! Texture formats and their byte layout.
//!
//! [`TextureFormatInfo`] is a process-wide, immutable registry describing every [`TextureFormat`]:
//! whether it is block-compressed, how many bits a texel takes, the smallest valid block and
//! whether an alpha channel is present. It is a plain `static` table; nothing is ever registered at
//! runtime.

use std::error;
use std::fmt;
use std::str::FromStr;

/// Pixel encodings known to the engine.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TextureFormat {
  Rgb,
  Rgba,
  RgbDxt1,
  RgbaDxt1,
  RgbaDxt3,
  RgbaDxt5,
  RgbEtc1,
  RgbaEtc1,
  RgbPvrtc1_2bpp,
  RgbPvrtc1_4bpp,
  RgbaPvrtc1_2bpp,
  RgbaPvrtc1_4bpp,
  RgbaPvrtc2_2bpp,
  RgbaPvrtc2_4bpp,
  RgbAtitc,
  RgbaAtitc,
}

impl TextureFormat {
  /// Every format, in declaration order.
  pub const ALL: [TextureFormat; 16] = [
    TextureFormat::Rgb,
    TextureFormat::Rgba,
    TextureFormat::RgbDxt1,
    TextureFormat::RgbaDxt1,
    TextureFormat::RgbaDxt3,
    TextureFormat::RgbaDxt5,
    TextureFormat::RgbEtc1,
    TextureFormat::RgbaEtc1,
    TextureFormat::RgbPvrtc1_2bpp,
    TextureFormat::RgbPvrtc1_4bpp,
    TextureFormat::RgbaPvrtc1_2bpp,
    TextureFormat::RgbaPvrtc1_4bpp,
    TextureFormat::RgbaPvrtc2_2bpp,
    TextureFormat::RgbaPvrtc2_4bpp,
    TextureFormat::RgbAtitc,
    TextureFormat::RgbaAtitc,
  ];

  /// Look a format up by its registered name (e.g. `"RGBA_DXT5"`).
  pub fn from_name(name: &str) -> Result<Self, TextureFormatError> {
    FORMATS
      .iter()
      .find(|info| info.name == name)
      .map(|info| info.format)
      .ok_or_else(|| TextureFormatError::UnknownFormat(name.to_owned()))
  }
}

impl FromStr for TextureFormat {
  type Err = TextureFormatError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    TextureFormat::from_name(s)
  }
}

impl fmt::Display for TextureFormat {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match TextureFormatInfo::get(*self) {
      Ok(info) => f.write_str(info.name),
      Err(_) => write!(f, "{:?}", self),
    }
  }
}

/// Error raised by format lookups.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextureFormatError {
  /// The format has no registered entry.
  ///
  /// This is a programmer error: the format table and the backend disagree.
  UnknownFormat(String),
}

impl fmt::Display for TextureFormatError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      TextureFormatError::UnknownFormat(ref name) => write!(f, "unknown texture format: {}", name),
    }
  }
}

impl error::Error for TextureFormatError {}

/// Registry entry describing one [`TextureFormat`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextureFormatInfo {
  pub format: TextureFormat,
  pub name: &'static str,
  pub is_compressed: bool,
  pub num_bits_per_pixel: u32,
  /// Smallest valid byte size of a mip level (one block, or the format’s minimal block group).
  pub minimum_size: usize,
  /// Width of a compression block, in texels. `1` for uncompressed formats.
  pub block_width: u32,
  /// Height of a compression block, in texels. `1` for uncompressed formats.
  pub block_height: u32,
  pub has_alpha_channel: bool,
  pub has_separate_alpha_channel: bool,
}

macro_rules! format_table {
  ($( $format:ident => ($name:expr, $compressed:expr, $bpp:expr, $min:expr, $bw:expr, $bh:expr, $alpha:expr, $separate:expr) ),* $(,)?) => {
    static FORMATS: &[TextureFormatInfo] = &[
      $(
        TextureFormatInfo {
          format: TextureFormat::$format,
          name: $name,
          is_compressed: $compressed,
          num_bits_per_pixel: $bpp,
          minimum_size: $min,
          block_width: $bw,
          block_height: $bh,
          has_alpha_channel: $alpha,
          has_separate_alpha_channel: $separate,
        },
      )*
    ];
  }
}

format_table!(
  Rgb => ("RGB", false, 24, 3, 1, 1, false, false),
  Rgba => ("RGBA", false, 32, 4, 1, 1, true, false),
  RgbDxt1 => ("RGB_DXT1", true, 4, 8, 4, 4, false, false),
  RgbaDxt1 => ("RGBA_DXT1", true, 4, 8, 4, 4, true, false),
  RgbaDxt3 => ("RGBA_DXT3", true, 8, 16, 4, 4, true, false),
  RgbaDxt5 => ("RGBA_DXT5", true, 8, 16, 4, 4, true, false),
  RgbEtc1 => ("RGB_ETC1", true, 4, 8, 4, 4, false, false),
  RgbaEtc1 => ("RGBA_ETC1", true, 8, 16, 4, 4, true, true),
  RgbPvrtc1_2bpp => ("RGB_PVRTC1_2BPP", true, 2, 32, 8, 4, false, false),
  RgbPvrtc1_4bpp => ("RGB_PVRTC1_4BPP", true, 4, 32, 4, 4, false, false),
  RgbaPvrtc1_2bpp => ("RGBA_PVRTC1_2BPP", true, 2, 32, 8, 4, true, false),
  RgbaPvrtc1_4bpp => ("RGBA_PVRTC1_4BPP", true, 4, 32, 4, 4, true, false),
  RgbaPvrtc2_2bpp => ("RGBA_PVRTC2_2BPP", true, 2, 8, 8, 4, true, false),
  RgbaPvrtc2_4bpp => ("RGBA_PVRTC2_4BPP", true, 4, 8, 4, 4, true, false),
  RgbAtitc => ("RGB_ATITC", true, 4, 8, 4, 4, false, false),
  RgbaAtitc => ("RGBA_ATITC", true, 8, 16, 4, 4, true, false),
);

impl TextureFormatInfo {
  /// Registry entry of a format.
  pub fn get(format: TextureFormat) -> Result<&'static TextureFormatInfo, TextureFormatError> {
    FORMATS
      .iter()
      .find(|info| info.format == format)
      .ok_or_else(|| TextureFormatError::UnknownFormat(format!("{:?}", format)))
  }

  pub fn is_supported(format: TextureFormat) -> bool {
    Self::get(format).is_ok()
  }

  pub fn is_compressed(format: TextureFormat) -> Result<bool, TextureFormatError> {
    Self::get(format).map(|info| info.is_compressed)
  }

  pub fn num_bits_per_pixel(format: TextureFormat) -> Result<u32, TextureFormatError> {
    Self::get(format).map(|info| info.num_bits_per_pixel)
  }

  pub fn minimum_size(format: TextureFormat) -> Result<usize, TextureFormatError> {
    Self::get(format).map(|info| info.minimum_size)
  }

  pub fn has_alpha_channel(format: TextureFormat) -> Result<bool, TextureFormatError> {
    Self::get(format).map(|info| info.has_alpha_channel)
  }

  pub fn has_separate_alpha_channel(format: TextureFormat) -> Result<bool, TextureFormatError> {
    Self::get(format).map(|info| info.has_separate_alpha_channel)
  }

  pub fn name(format: TextureFormat) -> Result<&'static str, TextureFormatError> {
    Self::get(format).map(|info| info.name)
  }

  /// Exact byte size of a `width` × `height` image in `format`.
  ///
  /// Block-compressed formats are rounded up to whole blocks and never go below
  /// [`TextureFormatInfo::minimum_size`].
  pub fn texture_size(
    format: TextureFormat,
    width: u32,
    height: u32,
  ) -> Result<usize, TextureFormatError> {
    Self::get(format).map(|info| info.size_of(width, height))
  }

  /// Every registered format.
  pub fn texture_formats() -> Vec<TextureFormat> {
    FORMATS.iter().map(|info| info.format).collect()
  }

  /// Byte size of an image described by this entry.
  pub fn size_of(&self, width: u32, height: u32) -> usize {
    if self.is_compressed {
      let w = round_up(width.max(1), self.block_width) as usize;
      let h = round_up(height.max(1), self.block_height) as usize;
      let size = (w * h * self.num_bits_per_pixel as usize + 7) / 8;

      size.max(self.minimum_size)
    } else {
      (width as usize * height as usize * self.num_bits_per_pixel as usize) / 8
    }
  }
}

fn round_up(value: u32, granularity: u32) -> u32 {
  (value + granularity - 1) / granularity * granularity
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_format_has_exactly_one_entry() {
    for format in TextureFormat::ALL.iter() {
      let count = FORMATS.iter().filter(|info| info.format == *format).count();
      assert_eq!(count, 1, "{:?}", format);
    }

    assert_eq!(FORMATS.len(), TextureFormat::ALL.len());
  }

  #[test]
  fn uncompressed_size() {
    assert_eq!(TextureFormatInfo::texture_size(TextureFormat::Rgba, 256, 128), Ok(256 * 128 * 4));
    assert_eq!(TextureFormatInfo::texture_size(TextureFormat::Rgb, 3, 5), Ok(45));
  }

  #[test]
  fn compressed_size_rounds_to_blocks() {
    // 5×5 DXT1 → 8×8 texels → 4 blocks of 8 bytes
    assert_eq!(TextureFormatInfo::texture_size(TextureFormat::RgbDxt1, 5, 5), Ok(32));
    assert_eq!(TextureFormatInfo::texture_size(TextureFormat::RgbaDxt5, 1, 1), Ok(16));
    assert_eq!(TextureFormatInfo::texture_size(TextureFormat::RgbPvrtc1_4bpp, 1, 1), Ok(32));
  }

  #[test]
  fn size_is_monotonic_and_above_minimum() {
    for format in TextureFormatInfo::texture_formats() {
      let min = TextureFormatInfo::minimum_size(format).unwrap();
      let compressed = TextureFormatInfo::is_compressed(format).unwrap();

      for w in 1..40 {
        for h in 1..40 {
          let size = TextureFormatInfo::texture_size(format, w, h).unwrap();

          assert!(size <= TextureFormatInfo::texture_size(format, w + 1, h).unwrap());
          assert!(size <= TextureFormatInfo::texture_size(format, w, h + 1).unwrap());

          if compressed {
            assert!(size >= min, "{:?} {}×{}", format, w, h);
          }
        }
      }
    }
  }

  #[test]
  fn names_round_trip() {
    for format in TextureFormat::ALL.iter() {
      let name = TextureFormatInfo::name(*format).unwrap();
      assert_eq!(name.parse::<TextureFormat>(), Ok(*format));
    }

    assert_eq!(
      "RGBA_BC7".parse::<TextureFormat>(),
      Err(TextureFormatError::UnknownFormat("RGBA_BC7".to_owned()))
    );
  }

  #[test]
  fn alpha_flags() {
    assert_eq!(TextureFormatInfo::has_alpha_channel(TextureFormat::RgbEtc1), Ok(false));
    assert_eq!(TextureFormatInfo::has_separate_alpha_channel(TextureFormat::RgbaEtc1), Ok(true));
    assert_eq!(TextureFormatInfo::has_alpha_channel(TextureFormat::RgbaDxt1), Ok(true));
  }
}
