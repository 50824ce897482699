//! Icon frame assembly for animated Wii save icons.
//!
//! A WIBN holds up to eight 48x48 icon frames. With two or more frames
//! they form an [`IconSequence`] whose playback order depends on the
//! banner's bounce flag:
//!
//! ```text
//! Forward:  0 1 2 3 | 0 1 2 3 | ...
//! Bounce:   0 1 2 3 2 1 | 0 1 2 3 2 1 | ...
//! ```
//!
//! The delay is kept as the raw tick count from the banner. Converting
//! ticks to wall-clock time is left to the image writer
//! ([`crate::writer::WriterConfig::tick`]).

use std::time::Duration;

use crate::formats::wibn::WiiBanner;
use crate::texture::DecodedImage;
use crate::Result;

/// How an icon sequence loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimMode {
    /// Play once, no looping.
    None,
    /// Loop `0..n`.
    Forward,
    /// Loop `0..n` then back down to frame 1.
    Bounce,
}

/// Decoded icon frames plus their timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSequence {
    /// Frames in storage order.
    pub frames: Vec<DecodedImage>,
    /// Per-frame delay in ticks.
    pub delay: u16,
    pub mode: AnimMode,
}

impl IconSequence {
    /// Indices into [`frames`](Self::frames) for one full animation cycle.
    pub fn playback_order(&self) -> Vec<usize> {
        let n = self.frames.len();
        let mut order: Vec<usize> = (0..n).collect();
        if self.mode == AnimMode::Bounce && n > 2 {
            order.extend((1..n - 1).rev());
        }
        order
    }

    /// Frames for one full animation cycle, in playback order.
    pub fn playback_frames(&self) -> impl Iterator<Item = &DecodedImage> {
        self.playback_order()
            .into_iter()
            .map(move |i| &self.frames[i])
    }

    /// Wall-clock time per frame for a given tick length. A zero delay
    /// counts as one tick.
    pub fn frame_duration(&self, tick: Duration) -> Duration {
        tick * u32::from(self.delay.max(1))
    }

    /// Whether the animation repeats.
    pub fn loops(&self) -> bool {
        self.mode != AnimMode::None
    }
}

/// Result of icon assembly for one banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icons {
    /// The container carries no icon.
    None,
    /// A single static icon.
    Still(DecodedImage),
    /// Two or more frames.
    Animated(IconSequence),
}

impl Icons {
    /// Number of decoded frames.
    pub fn frame_count(&self) -> usize {
        match self {
            Icons::None => 0,
            Icons::Still(_) => 1,
            Icons::Animated(seq) => seq.frames.len(),
        }
    }
}

/// Decode every icon frame of `banner` and build its animation.
///
/// Any truncated frame fails the whole call; partial sequences are never
/// returned.
pub fn assemble(banner: &WiiBanner) -> Result<Icons> {
    let frames = (0..banner.icons.len())
        .filter_map(|i| banner.icon_image(i))
        .collect::<Result<Vec<_>>>()?;

    let mut frames = frames.into_iter();
    Ok(match frames.len() {
        0 => Icons::None,
        1 => match frames.next() {
            Some(frame) => Icons::Still(frame),
            None => Icons::None,
        },
        _ => Icons::Animated(IconSequence {
            frames: frames.collect(),
            delay: banner.icon_delay,
            mode: if banner.icon_bounce() {
                AnimMode::Bounce
            } else {
                AnimMode::Forward
            },
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::wibn::{FLAG_ICON_BOUNCE, ICON_SIZE};

    fn frame(shade: u8) -> DecodedImage {
        DecodedImage::from_rgba(1, 1, vec![shade, shade, shade, 0xFF]).unwrap()
    }

    fn sequence(n: u8, mode: AnimMode) -> IconSequence {
        IconSequence {
            frames: (0..n).map(frame).collect(),
            delay: 2,
            mode,
        }
    }

    fn banner(icons: usize, flags: u32) -> WiiBanner {
        WiiBanner {
            flags,
            icon_delay: 5,
            title: String::new(),
            subtitle: String::new(),
            banner_pixels: Vec::new(),
            icons: vec![vec![0xFF; ICON_SIZE]; icons],
            save_header: None,
        }
    }

    #[test]
    fn playback_orders() {
        assert_eq!(sequence(4, AnimMode::Forward).playback_order(), [0, 1, 2, 3]);
        assert_eq!(sequence(4, AnimMode::Bounce).playback_order(), [0, 1, 2, 3, 2, 1]);
        assert_eq!(sequence(2, AnimMode::Bounce).playback_order(), [0, 1]);
        assert_eq!(sequence(3, AnimMode::None).playback_order(), [0, 1, 2]);
    }

    #[test]
    fn frame_duration_scales_ticks() {
        let seq = sequence(2, AnimMode::Forward);
        assert_eq!(seq.frame_duration(Duration::from_millis(10)), Duration::from_millis(20));
        let zero = IconSequence { delay: 0, ..seq };
        assert_eq!(zero.frame_duration(Duration::from_millis(10)), Duration::from_millis(10));
    }

    #[test]
    fn assemble_by_frame_count() {
        assert_eq!(assemble(&banner(0, 0)).unwrap(), Icons::None);
        assert!(matches!(assemble(&banner(1, 0)).unwrap(), Icons::Still(_)));

        let Icons::Animated(seq) = assemble(&banner(3, FLAG_ICON_BOUNCE)).unwrap() else {
            panic!("expected animation");
        };
        assert_eq!(seq.frames.len(), 3);
        assert_eq!(seq.mode, AnimMode::Bounce);
        assert_eq!(seq.delay, 5);

        let Icons::Animated(seq) = assemble(&banner(2, 0)).unwrap() else {
            panic!("expected animation");
        };
        assert_eq!(seq.mode, AnimMode::Forward);
    }

    #[test]
    fn truncated_frame_fails_whole_sequence() {
        let mut b = banner(3, 0);
        b.icons[1].truncate(100);
        assert!(matches!(
            assemble(&b),
            Err(crate::Error::TruncatedPixelData { .. })
        ));
    }
}
