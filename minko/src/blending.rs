//! That module exports blending-related types and functions.
//!
//! Given two pixels *src* and *dst* – source and destination, we associate each pixel a blending
//! factor – respectively, *srcK* and *dstK*. *src* is the pixel being computed, and *dst* is the
//! pixel that is already stored in the framebuffer.
//!
//! Factors are split in two families, [`Source`] and [`Destination`]. Both are encoded as bit
//! flags in a single 16-bit word: source factors live in the low byte and destination factors in
//! the high byte, so that a [`Mode`] is simply `Source | Destination`.

use std::ops::BitOr;

/// Source blending factor. Occupies the low byte of a [`Mode`].
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[repr(u16)]
pub enum Source {
  /// `0 * src`
  Zero = 1 << 0,
  /// `1 * src`
  One = 1 << 1,
  /// `src * src`
  SrcColor = 1 << 2,
  /// `(1 - src) * src`
  OneMinusSrcColor = 1 << 3,
  /// `srcA * src`
  SrcAlpha = 1 << 4,
  /// `(1 - srcA) * src`
  OneMinusSrcAlpha = 1 << 5,
  /// `dstA * src`
  DstAlpha = 1 << 6,
  /// `(1 - dstA) * src`
  OneMinusDstAlpha = 1 << 7,
}

/// Destination blending factor. Occupies the high byte of a [`Mode`].
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[repr(u16)]
pub enum Destination {
  /// `0 * dst`
  Zero = 1 << 8,
  /// `1 * dst`
  One = 1 << 9,
  /// `dst * dst`
  DstColor = 1 << 10,
  /// `(1 - dst) * dst`
  OneMinusDstColor = 1 << 11,
  /// `min(srcA, 1 - dstA) * dst`
  SrcAlphaSaturate = 1 << 12,
  /// `(1 - srcA) * dst`
  OneMinusSrcAlpha = 1 << 13,
  /// `dstA * dst`
  DstAlpha = 1 << 14,
  /// `(1 - dstA) * dst`
  OneMinusDstAlpha = 1 << 15,
}

const SOURCES: [Source; 8] = [
  Source::Zero,
  Source::One,
  Source::SrcColor,
  Source::OneMinusSrcColor,
  Source::SrcAlpha,
  Source::OneMinusSrcAlpha,
  Source::DstAlpha,
  Source::OneMinusDstAlpha,
];

const DESTINATIONS: [Destination; 8] = [
  Destination::Zero,
  Destination::One,
  Destination::DstColor,
  Destination::OneMinusDstColor,
  Destination::SrcAlphaSaturate,
  Destination::OneMinusSrcAlpha,
  Destination::DstAlpha,
  Destination::OneMinusDstAlpha,
];

/// A packed pair of blending factors.
///
/// The low byte holds exactly one [`Source`] bit and the high byte exactly one [`Destination`]
/// bit.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Mode(u16);

impl Mode {
  /// `src * 1 + dst * 0`: blending is effectively off.
  pub const DEFAULT: Mode = Mode(Source::One as u16 | Destination::Zero as u16);

  /// Classic alpha blending.
  pub const ALPHA: Mode = Mode(Source::SrcAlpha as u16 | Destination::OneMinusSrcAlpha as u16);

  /// Additive blending weighted by the source alpha.
  pub const ADDITIVE: Mode = Mode(Source::SrcAlpha as u16 | Destination::One as u16);

  /// Build a mode out of both factors.
  pub const fn new(source: Source, destination: Destination) -> Self {
    Mode(source as u16 | destination as u16)
  }

  /// Decode a raw packed value.
  ///
  /// Returns `None` if either byte does not hold exactly one known factor.
  pub fn from_bits(bits: u16) -> Option<Self> {
    let src = SOURCES.iter().find(|&&s| s as u16 == bits & 0x00FF)?;
    let dst = DESTINATIONS.iter().find(|&&d| d as u16 == bits & 0xFF00)?;

    Some(Mode::new(*src, *dst))
  }

  /// Raw packed value.
  pub const fn bits(self) -> u16 {
    self.0
  }

  /// Source factor.
  pub fn source(self) -> Source {
    SOURCES
      .iter()
      .copied()
      .find(|&s| s as u16 == self.0 & 0x00FF)
      .unwrap_or(Source::One)
  }

  /// Destination factor.
  pub fn destination(self) -> Destination {
    DESTINATIONS
      .iter()
      .copied()
      .find(|&d| d as u16 == self.0 & 0xFF00)
      .unwrap_or(Destination::Zero)
  }
}

impl Default for Mode {
  fn default() -> Self {
    Mode::DEFAULT
  }
}

impl BitOr<Destination> for Source {
  type Output = Mode;

  fn bitor(self, rhs: Destination) -> Mode {
    Mode::new(self, rhs)
  }
}

impl From<(Source, Destination)> for Mode {
  fn from((source, destination): (Source, Destination)) -> Self {
    Mode::new(source, destination)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn source_low_byte_destination_high_byte() {
    for s in SOURCES.iter() {
      assert_eq!(*s as u16 & 0xFF00, 0);
    }

    for d in DESTINATIONS.iter() {
      assert_eq!(*d as u16 & 0x00FF, 0);
    }
  }

  #[test]
  fn mode_is_source_or_destination() {
    let mode = Source::SrcAlpha | Destination::OneMinusSrcAlpha;

    assert_eq!(mode, Mode::ALPHA);
    assert_eq!(mode.source(), Source::SrcAlpha);
    assert_eq!(mode.destination(), Destination::OneMinusSrcAlpha);
  }

  #[test]
  fn presets_decode() {
    assert_eq!(Mode::ADDITIVE.source(), Source::SrcAlpha);
    assert_eq!(Mode::ADDITIVE.destination(), Destination::One);
    assert_eq!(Mode::DEFAULT.source(), Source::One);
    assert_eq!(Mode::DEFAULT.destination(), Destination::Zero);
  }

  #[test]
  fn from_bits_rejects_garbage() {
    assert_eq!(Mode::from_bits(Mode::ALPHA.bits()), Some(Mode::ALPHA));
    assert_eq!(Mode::from_bits(0), None);
    assert_eq!(Mode::from_bits(Source::One as u16), None);
    assert_eq!(
      Mode::from_bits(Source::One as u16 | Source::Zero as u16 | Destination::One as u16),
      None
    );
  }
}
