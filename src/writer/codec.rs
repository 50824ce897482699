//! [`ImageWriter`] backed by the `image` and `png` crates.

use image::codecs::png::PngEncoder;
use image::{ColorType, GenericImage, ImageEncoder, RgbaImage};

use super::{AnimFormat, FormatInfo, ImageWriter, WriterConfig};
use crate::anim::IconSequence;
use crate::texture::DecodedImage;
use crate::{Error, Result};

/// The bundled image writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecWriter {
    config: WriterConfig,
}

impl CodecWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    fn available(format: AnimFormat) -> bool {
        match format {
            AnimFormat::Apng => cfg!(feature = "apng"),
            AnimFormat::Gif => cfg!(feature = "gif"),
            AnimFormat::PngFpf | AnimFormat::PngVs | AnimFormat::PngHs => true,
        }
    }

    fn strip(&self, seq: &IconSequence, vertical: bool) -> Result<Vec<u8>> {
        let frames: Vec<&DecodedImage> = seq.playback_frames().collect();
        let (w, h) = match frames.first() {
            Some(f) => (f.width(), f.height()),
            None => return Err(Error::NoIcon),
        };
        let n = frames.len() as u32;
        let mut strip = if vertical {
            RgbaImage::new(w, h * n)
        } else {
            RgbaImage::new(w * n, h)
        };
        for (i, frame) in frames.iter().enumerate() {
            let i = i as u32;
            let (x, y) = if vertical { (0, i * h) } else { (i * w, 0) };
            strip.copy_from(&frame.to_rgba_image(), x, y)?;
        }
        encode_png(strip.as_raw(), strip.width(), strip.height())
    }

    #[cfg(feature = "apng")]
    fn apng(&self, seq: &IconSequence) -> Result<Vec<u8>> {
        let frames: Vec<&DecodedImage> = seq.playback_frames().collect();
        let Some(first) = frames.first() else {
            return Err(Error::NoIcon);
        };
        let delay_ms = seq
            .frame_duration(self.config.tick)
            .as_millis()
            .min(u16::MAX as u128) as u16;

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, first.width(), first.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            // 0 plays = loop forever
            encoder.set_animated(frames.len() as u32, if seq.loops() { 0 } else { 1 })?;
            encoder.set_frame_delay(delay_ms, 1000)?;
            let mut writer = encoder.write_header()?;
            for frame in &frames {
                writer.write_image_data(frame.data())?;
            }
            writer.finish()?;
        }
        Ok(buf)
    }

    #[cfg(feature = "gif")]
    fn gif(&self, seq: &IconSequence) -> Result<Vec<u8>> {
        use image::codecs::gif::{GifEncoder, Repeat};
        use image::{Delay, Frame};

        let delay = Delay::from_saturating_duration(seq.frame_duration(self.config.tick));
        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut buf);
            // Without a repeat extension the GIF plays once.
            if seq.loops() {
                encoder.set_repeat(Repeat::Infinite)?;
            }
            encoder.encode_frames(
                seq.playback_frames()
                    .map(|f| Frame::from_parts(f.to_rgba_image(), 0, 0, delay)),
            )?;
        }
        Ok(buf)
    }
}

fn encode_png(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(rgba, width, height, ColorType::Rgba8)?;
    Ok(buf)
}

impl ImageWriter for CodecWriter {
    fn formats(&self) -> Vec<FormatInfo> {
        AnimFormat::ALL
            .into_iter()
            .map(|f| FormatInfo::new(f, Self::available(f)))
            .collect()
    }

    fn write_still(&self, img: &DecodedImage) -> Result<Vec<u8>> {
        encode_png(img.data(), img.width(), img.height())
    }

    fn write_anim(&self, seq: &IconSequence, format: AnimFormat) -> Result<Vec<Vec<u8>>> {
        match format {
            #[cfg(feature = "apng")]
            AnimFormat::Apng => Ok(vec![self.apng(seq)?]),
            #[cfg(feature = "gif")]
            AnimFormat::Gif => Ok(vec![self.gif(seq)?]),
            AnimFormat::PngFpf => seq.playback_frames().map(|f| self.write_still(f)).collect(),
            AnimFormat::PngVs => Ok(vec![self.strip(seq, true)?]),
            AnimFormat::PngHs => Ok(vec![self.strip(seq, false)?]),
            #[allow(unreachable_patterns)]
            other => Err(Error::UnsupportedFormat(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::AnimMode;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn seq(n: u8, mode: AnimMode) -> IconSequence {
        IconSequence {
            frames: (0..n)
                .map(|i| DecodedImage::from_rgba(2, 2, vec![i * 40; 16]).unwrap())
                .collect(),
            delay: 1,
            mode,
        }
    }

    fn decode_png(data: &[u8]) -> RgbaImage {
        image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .unwrap()
            .to_rgba8()
    }

    #[test]
    fn still_png_round_trips() {
        let img = DecodedImage::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let png = CodecWriter::default().write_still(&img).unwrap();
        assert!(png.starts_with(PNG_MAGIC));
        assert_eq!(decode_png(&png).into_raw(), img.data());
    }

    #[test]
    fn strips_follow_playback_order() {
        let w = CodecWriter::default();
        let s = seq(3, AnimMode::Bounce);

        let hs = w.write_anim(&s, AnimFormat::PngHs).unwrap();
        assert_eq!(hs.len(), 1);
        let hs = decode_png(&hs[0]);
        assert_eq!(hs.dimensions(), (8, 2));
        assert_eq!(hs.get_pixel(6, 0).0, [40; 4]);

        let vs = decode_png(&w.write_anim(&s, AnimFormat::PngVs).unwrap()[0]);
        assert_eq!(vs.dimensions(), (2, 8));
    }

    #[test]
    fn file_per_frame() {
        let files = CodecWriter::default()
            .write_anim(&seq(4, AnimMode::Bounce), AnimFormat::PngFpf)
            .unwrap();
        assert_eq!(files.len(), 6);
        assert!(files.iter().all(|f| f.starts_with(PNG_MAGIC)));
    }

    #[cfg(feature = "apng")]
    #[test]
    fn apng_has_animation_control() {
        let out = CodecWriter::default()
            .write_anim(&seq(2, AnimMode::Forward), AnimFormat::Apng)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with(PNG_MAGIC));
        assert!(out[0].windows(4).any(|w| w == b"acTL"));
    }

    #[cfg(feature = "gif")]
    #[test]
    fn gif_header() {
        let out = CodecWriter::default()
            .write_anim(&seq(2, AnimMode::Forward), AnimFormat::Gif)
            .unwrap();
        assert!(out[0].starts_with(b"GIF89a"));
    }

    #[test]
    fn strip_formats_always_available() {
        let w = CodecWriter::default();
        assert!(w.supports(AnimFormat::PngFpf));
        assert_eq!(w.supports(AnimFormat::Gif), cfg!(feature = "gif"));
    }
}
