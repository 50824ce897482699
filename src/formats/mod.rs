//! Parsers for GameCube and Wii banner containers.
//!
//! All parsers follow the same conventions:
//!
//! * **Generic over** [`std::io::Read`] + [`std::io::Seek`] - pass a
//!   [`std::fs::File`], a [`std::io::Cursor`], or anything else that
//!   implements both traits.
//! * **Identify once, then parse** - [`identify`] classifies a stream into a
//!   [`ContainerKind`]; [`Banner::read`] dispatches to exactly one parser for
//!   that kind and returns a [`Banner`] sum type. Later stages match on the
//!   variant instead of re-checking the kind.
//! * **Size first** - every parser validates the total length against its
//!   format's size rule before any pixel data is touched.
//!
//! ## Format overview
//!
//! | Module   | Format       | Description |
//! |----------|--------------|-------------|
//! | [`bnr`]  | BNR1 / BNR2  | GameCube disc banner, 96x32 image plus comment text |
//! | [`wibn`] | WIBN         | Wii save banner, 192x64 image plus 0-8 48x48 icon frames; raw or inside an encrypted `data.bin` |

pub mod bnr;
pub mod wibn;

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::anim::{self, Icons};
use crate::crypto;
use crate::texture::DecodedImage;
use crate::utils::{read_fill, stream_len};
use crate::{Error, Result};

use bnr::{BnrVersion, GcnBanner};
use wibn::WiiBanner;

/// Bytes decrypted by the encrypted-savegame probe.
const PROBE_SIZE: usize = 64;
/// Offset of the WIBN magic inside a decrypted `data.bin`.
const PROBE_MAGIC_OFFSET: usize = wibn::SAVE_HEADER_SIZE;

/// Container classification from [`identify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Bnr1,
    Bnr2,
    /// Plain `banner.bin`.
    WibnRaw,
    /// SD-exported `data.bin`.
    WibnEncrypted,
    Unknown,
}

impl ContainerKind {
    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Bnr1 => "BNR1",
            ContainerKind::Bnr2 => "BNR2",
            ContainerKind::WibnRaw => "WIBN",
            ContainerKind::WibnEncrypted => "WIBN (encrypted)",
            ContainerKind::Unknown => "unknown",
        }
    }
}

/// Classify a container by its magic, falling back to a decryption probe
/// for SD-exported Wii saves.
///
/// The stream position is restored before returning. Unrecognised data is
/// reported as [`ContainerKind::Unknown`], not as an error; only I/O
/// failures produce `Err`.
pub fn identify<R: Read + Seek>(r: &mut R) -> Result<ContainerKind> {
    let pos = r.stream_position()?;
    r.seek(SeekFrom::Start(0))?;
    let mut head = [0u8; PROBE_SIZE];
    let got = read_fill(r, &mut head);
    r.seek(SeekFrom::Start(pos))?;
    let kind = identify_bytes(&head[..got?]);
    debug!("identified container as {}", kind.name());
    Ok(kind)
}

/// Classify the leading bytes of a container. See [`identify`].
pub fn identify_bytes(head: &[u8]) -> ContainerKind {
    match head.get(..4) {
        Some(b"BNR1") => return ContainerKind::Bnr1,
        Some(b"BNR2") => return ContainerKind::Bnr2,
        Some(b"WIBN") => return ContainerKind::WibnRaw,
        Some(_) => {}
        None => return ContainerKind::Unknown,
    }

    let Some(probe) = head.get(..PROBE_SIZE) else {
        return ContainerKind::Unknown;
    };
    let plain = crypto::sd_decrypt(probe);
    if &plain[PROBE_MAGIC_OFFSET..PROBE_MAGIC_OFFSET + 4] == b"WIBN" {
        ContainerKind::WibnEncrypted
    } else {
        ContainerKind::Unknown
    }
}

/// A parsed banner container.
#[derive(Debug, Clone)]
pub enum Banner {
    /// BNR1 or BNR2.
    Gcn(GcnBanner),
    /// WIBN, raw or decrypted.
    Wii(WiiBanner),
}

impl Banner {
    /// Parse the whole stream as a container of the given kind.
    ///
    /// The stream length is taken as the container length and the stream
    /// is read from offset 0.
    pub fn read<R: Read + Seek>(r: &mut R, kind: ContainerKind) -> Result<Self> {
        let len = stream_len(r)?;
        match kind {
            ContainerKind::Bnr1 => GcnBanner::parse(r, BnrVersion::Bnr1, len).map(Banner::Gcn),
            ContainerKind::Bnr2 => GcnBanner::parse(r, BnrVersion::Bnr2, len).map(Banner::Gcn),
            ContainerKind::WibnRaw => WiiBanner::parse(r, len).map(Banner::Wii),
            ContainerKind::WibnEncrypted => WiiBanner::parse_encrypted(r, len).map(Banner::Wii),
            ContainerKind::Unknown => Err(Error::UnknownFormat),
        }
    }

    /// Identify and parse in one step.
    pub fn load<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let kind = identify(r)?;
        Self::read(r, kind)
    }

    /// The container kind this banner was parsed from.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Banner::Gcn(b) => match b.version {
                BnrVersion::Bnr1 => ContainerKind::Bnr1,
                BnrVersion::Bnr2 => ContainerKind::Bnr2,
            },
            Banner::Wii(b) if b.save_header.is_some() => ContainerKind::WibnEncrypted,
            Banner::Wii(_) => ContainerKind::WibnRaw,
        }
    }

    /// Decode the banner image (96x32 for GameCube, 192x64 for Wii).
    pub fn banner_image(&self) -> Result<DecodedImage> {
        match self {
            Banner::Gcn(b) => b.banner_image(),
            Banner::Wii(b) => b.banner_image(),
        }
    }

    /// Number of stored icon frames. Always 0 for GameCube banners.
    pub fn icon_count(&self) -> usize {
        match self {
            Banner::Gcn(_) => 0,
            Banner::Wii(b) => b.icons.len(),
        }
    }

    /// Decode the icon frames and build their animation.
    pub fn icons(&self) -> Result<Icons> {
        match self {
            Banner::Gcn(_) => Ok(Icons::None),
            Banner::Wii(b) => anim::assemble(b),
        }
    }

    /// Primary title text, if the format has one. GameCube text is decoded
    /// as cp1252; see [`bnr::BnrComment::decode`] for Shift-JIS.
    pub fn title(&self) -> String {
        match self {
            Banner::Gcn(b) => b
                .comments
                .first()
                .map(|c| c.full_game_name())
                .unwrap_or_default(),
            Banner::Wii(b) => b.title.clone(),
        }
    }
}
