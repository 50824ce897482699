//! Image writer seam: the formats decoded banners and icons can be saved as.
//!
//! Encoding is delegated to an [`ImageWriter`]. The bundled
//! [`CodecWriter`] uses the `image` crate for PNG and GIF and the `png`
//! crate for APNG; either animated codec can be compiled out through the
//! `gif` and `apng` Cargo features, in which case the writer reports it as
//! unavailable.
//!
//! ## Animated formats, in default priority order
//!
//! | Format | Extension | Output |
//! |--------|-----------|--------|
//! | APNG   | `.png` | one animated PNG |
//! | GIF    | `.gif` | one animated GIF |
//! | FPF    | `.png` | one PNG per frame |
//! | VS     | `.png` | all frames stacked vertically in one PNG |
//! | HS     | `.png` | all frames side by side in one PNG |

mod codec;

pub use codec::CodecWriter;

use std::time::Duration;

use crate::anim::IconSequence;
use crate::texture::DecodedImage;
use crate::Result;

/// Animated output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimFormat {
    Apng,
    Gif,
    /// PNG, file per frame.
    PngFpf,
    /// PNG, vertical strip.
    PngVs,
    /// PNG, horizontal strip.
    PngHs,
}

impl AnimFormat {
    /// Every format, in default-selection priority order.
    pub const ALL: [AnimFormat; 5] = [
        AnimFormat::Apng,
        AnimFormat::Gif,
        AnimFormat::PngFpf,
        AnimFormat::PngVs,
        AnimFormat::PngHs,
    ];

    /// Short name, also accepted by [`from_name`](Self::from_name).
    pub fn name(self) -> &'static str {
        match self {
            AnimFormat::Apng => "apng",
            AnimFormat::Gif => "gif",
            AnimFormat::PngFpf => "fpf",
            AnimFormat::PngVs => "vs",
            AnimFormat::PngHs => "hs",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            AnimFormat::Gif => "gif",
            _ => "png",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AnimFormat::Apng => "Animated PNG",
            AnimFormat::Gif => "Animated GIF",
            AnimFormat::PngFpf => "PNG (file per frame)",
            AnimFormat::PngVs => "PNG (vertical strip)",
            AnimFormat::PngHs => "PNG (horizontal strip)",
        }
    }

    /// Look up a format by [`name`](Self::name), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// What a writer reports about one animated format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: AnimFormat,
    pub name: &'static str,
    pub extension: &'static str,
    pub description: &'static str,
    /// `false` when the codec is compiled out.
    pub available: bool,
}

impl FormatInfo {
    pub fn new(format: AnimFormat, available: bool) -> Self {
        Self {
            format,
            name: format.name(),
            extension: format.extension(),
            description: format.description(),
            available,
        }
    }
}

/// Writer-side settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Wall-clock length of one icon-delay tick.
    pub tick: Duration,
}

impl Default for WriterConfig {
    /// One GameCube icon speed unit: 4 vblanks at 60 Hz.
    fn default() -> Self {
        Self {
            tick: Duration::from_micros(66_667),
        }
    }
}

/// External image-encoding collaborator.
pub trait ImageWriter {
    /// Every animated format this writer knows, with availability.
    fn formats(&self) -> Vec<FormatInfo>;

    /// Encode a single image as PNG.
    fn write_still(&self, img: &DecodedImage) -> Result<Vec<u8>>;

    /// Encode an icon sequence. Returns one buffer per output file, which
    /// is more than one only for [`AnimFormat::PngFpf`].
    fn write_anim(&self, seq: &IconSequence, format: AnimFormat) -> Result<Vec<Vec<u8>>>;

    /// Whether `format` is available on this writer.
    fn supports(&self, format: AnimFormat) -> bool {
        self.formats()
            .iter()
            .any(|info| info.format == format && info.available)
    }
}

/// First available format in [`AnimFormat::ALL`] order.
pub fn default_anim_format<W: ImageWriter + ?Sized>(writer: &W) -> Option<AnimFormat> {
    let formats = writer.formats();
    AnimFormat::ALL.into_iter().find(|f| {
        formats
            .iter()
            .any(|info| info.format == *f && info.available)
    })
}
