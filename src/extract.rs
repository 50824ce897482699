//! Per-file extraction pipeline.
//!
//! ```text
//! identify -> read -> decode banner / icons -> hand off to ImageWriter -> files
//! ```
//!
//! Each input is processed independently. A failure at any stage aborts
//! that file only; [`Extractor::extract_all`] keeps going with the rest.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::anim::{IconSequence, Icons};
use crate::formats::{self, Banner, ContainerKind};
use crate::texture::DecodedImage;
use crate::writer::{default_anim_format, AnimFormat, ImageWriter};
use crate::{Error, Result};

/// Which outputs to produce for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Where to write the banner PNG.
    pub banner: Option<PathBuf>,
    /// Where to write the icon. For [`AnimFormat::PngFpf`] this is the
    /// base name that frame numbers are inserted into.
    pub icon: Option<PathBuf>,
    /// Replace the icon path's extension with the one matching the
    /// encoded output (`png` for a still icon, the animated format's
    /// extension otherwise).
    pub icon_auto_ext: bool,
}

/// What was written for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub kind: ContainerKind,
    pub banner: Option<PathBuf>,
    pub icon: Vec<PathBuf>,
    /// Number of icon frames in the container.
    pub icon_frames: usize,
}

/// An encoded icon, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedIcon {
    /// One PNG.
    Still(Vec<u8>),
    /// One or more files in `format`.
    Animated {
        format: AnimFormat,
        files: Vec<Vec<u8>>,
    },
}

/// Drives the pipeline and hands decoded images to an [`ImageWriter`].
#[derive(Debug, Clone)]
pub struct Extractor<W> {
    writer: W,
    anim_format: Option<AnimFormat>,
}

impl<W: ImageWriter> Extractor<W> {
    /// Create an extractor using the writer's first available animated
    /// format, if any.
    pub fn new(writer: W) -> Self {
        let anim_format = default_anim_format(&writer);
        debug!(
            "default animated format: {}",
            anim_format.map_or("none", AnimFormat::name)
        );
        Self {
            writer,
            anim_format,
        }
    }

    /// Select a specific animated format.
    pub fn with_anim_format(mut self, format: AnimFormat) -> Result<Self> {
        if !self.writer.supports(format) {
            return Err(Error::UnsupportedFormat(format));
        }
        self.anim_format = Some(format);
        Ok(self)
    }

    /// The animated format in use, or `None` if the writer has none.
    pub fn anim_format(&self) -> Option<AnimFormat> {
        self.anim_format
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Encode a still image as PNG.
    pub fn encode_still(&self, img: &DecodedImage) -> Result<Vec<u8>> {
        self.writer.write_still(img)
    }

    /// Encode an icon sequence in the selected animated format.
    pub fn encode_sequence(&self, seq: &IconSequence) -> Result<EncodedIcon> {
        let format = self.anim_format.ok_or(Error::NoAnimFormatAvailable)?;
        let files = self.writer.write_anim(seq, format)?;
        Ok(EncodedIcon::Animated { format, files })
    }

    /// Encode whatever icon a banner carries.
    pub fn encode_icons(&self, icons: &Icons) -> Result<EncodedIcon> {
        match icons {
            Icons::None => Err(Error::NoIcon),
            Icons::Still(img) => self.encode_still(img).map(EncodedIcon::Still),
            Icons::Animated(seq) => self.encode_sequence(seq),
        }
    }

    /// Decode and write the banner image to `path`.
    pub fn save_banner(&self, banner: &Banner, path: &Path) -> Result<()> {
        let png = self.encode_still(&banner.banner_image()?)?;
        fs::write(path, png)?;
        Ok(())
    }

    /// Decode and write the icon to `path`. Returns every file written.
    ///
    /// With `auto_ext`, the extension of `path` is replaced to match the
    /// encoded output.
    pub fn save_icon(&self, banner: &Banner, path: &Path, auto_ext: bool) -> Result<Vec<PathBuf>> {
        let written = match self.encode_icons(&banner.icons()?)? {
            EncodedIcon::Still(png) => {
                let path = if auto_ext {
                    path.with_extension("png")
                } else {
                    path.to_path_buf()
                };
                fs::write(&path, png)?;
                vec![path]
            }
            EncodedIcon::Animated { format, files } => {
                let path = if auto_ext {
                    path.with_extension(format.extension())
                } else {
                    path.to_path_buf()
                };
                let paths = if format == AnimFormat::PngFpf {
                    (0..files.len()).map(|i| frame_path(&path, i)).collect()
                } else {
                    vec![path]
                };
                for (p, data) in paths.iter().zip(&files) {
                    fs::write(p, data)?;
                }
                paths
            }
        };
        Ok(written)
    }

    /// Run the whole pipeline for one input file.
    pub fn extract(&self, input: &Path, request: &ExtractRequest) -> Result<ExtractReport> {
        let mut r = BufReader::new(File::open(input)?);
        let kind = formats::identify(&mut r)?;
        if kind == ContainerKind::Unknown {
            return Err(Error::UnknownFormat);
        }
        let banner = Banner::read(&mut r, kind)?;

        let mut report = ExtractReport {
            kind,
            banner: None,
            icon: Vec::new(),
            icon_frames: banner.icon_count(),
        };
        if let Some(path) = &request.banner {
            self.save_banner(&banner, path)?;
            report.banner = Some(path.clone());
        }
        if let Some(path) = &request.icon {
            report.icon = self.save_icon(&banner, path, request.icon_auto_ext)?;
        }
        Ok(report)
    }

    /// Process several inputs. One result per input, in order; a failure
    /// is logged and does not stop later inputs.
    pub fn extract_all<'a, I>(&self, jobs: I) -> Vec<Result<ExtractReport>>
    where
        I: IntoIterator<Item = (&'a Path, &'a ExtractRequest)>,
    {
        jobs.into_iter()
            .map(|(input, request)| {
                let result = self.extract(input, request);
                if let Err(e) = &result {
                    warn!("{}: {e}", input.display());
                }
                result
            })
            .collect()
    }
}

/// `icon.png` -> `icon.03.png`.
pub fn frame_path(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{index:02}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{index:02}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::AnimMode;
    use crate::writer::FormatInfo;

    /// A writer with no animated codecs at all.
    #[derive(Debug)]
    struct StillOnly;

    impl ImageWriter for StillOnly {
        fn formats(&self) -> Vec<FormatInfo> {
            AnimFormat::ALL.map(|f| FormatInfo::new(f, false)).to_vec()
        }
        fn write_still(&self, _: &DecodedImage) -> Result<Vec<u8>> {
            Ok(b"still".to_vec())
        }
        fn write_anim(&self, _: &IconSequence, f: AnimFormat) -> Result<Vec<Vec<u8>>> {
            Err(Error::UnsupportedFormat(f))
        }
    }

    fn two_frames() -> IconSequence {
        let f = DecodedImage::from_rgba(1, 1, vec![0; 4]).unwrap();
        IconSequence {
            frames: vec![f.clone(), f],
            delay: 1,
            mode: AnimMode::Forward,
        }
    }

    #[test]
    fn animated_needs_a_format() {
        let ex = Extractor::new(StillOnly);
        assert_eq!(ex.anim_format(), None);
        assert!(matches!(
            ex.encode_sequence(&two_frames()),
            Err(Error::NoAnimFormatAvailable)
        ));
        // Still output is unaffected.
        let img = DecodedImage::from_rgba(1, 1, vec![0; 4]).unwrap();
        assert_eq!(ex.encode_icons(&Icons::Still(img)).unwrap(), EncodedIcon::Still(b"still".to_vec()));
        assert!(matches!(ex.encode_icons(&Icons::None), Err(Error::NoIcon)));
    }

    #[test]
    fn explicit_format_must_be_available() {
        let err = Extractor::new(StillOnly).with_anim_format(AnimFormat::Gif).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(AnimFormat::Gif)));
    }

    #[test]
    fn frame_paths() {
        assert_eq!(
            frame_path(Path::new("out/icon.png"), 3),
            PathBuf::from("out/icon.03.png")
        );
        assert_eq!(frame_path(Path::new("icon"), 0), PathBuf::from("icon.00"));
    }
}
