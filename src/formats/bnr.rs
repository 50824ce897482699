//! BNR1 / BNR2 - GameCube disc banner (`opening.bnr`).
//!
//! A fixed-size structure holding one 96x32 RGB5A3 banner and one (BNR1)
//! or six (BNR2) comment blocks.
//!
//! ## Layout
//! ```text
//! [0x0000] Magic "BNR1" or "BNR2"           (4 bytes)
//! [0x0004] Reserved                         (0x1C bytes)
//! [0x0020] Banner, 96x32 RGB5A3, tiled      (0x1800 bytes)
//! [0x1820] Comment block(s)                 (0x140 bytes each)
//! ```
//!
//! ## Comment block (0x140 bytes)
//! ```text
//! [0x000] Short game name                   (0x20 bytes)
//! [0x020] Short company name                (0x20 bytes)
//! [0x040] Full game name                    (0x40 bytes)
//! [0x080] Full company name                 (0x40 bytes)
//! [0x0C0] Description                       (0x80 bytes)
//! ```
//! Text is NUL-padded. BNR1 from Japanese discs uses Shift-JIS; every
//! other banner uses cp1252. BNR2 blocks are, in order: English, German,
//! French, Spanish, Italian, Dutch.

use std::io::Read;

use encoding::all::{WINDOWS_1252, WINDOWS_31J};
use encoding::{DecoderTrap, Encoding};

use crate::texture::{self, DecodedImage};
use crate::utils::{bytesa, bytesv, until_nul};
use crate::{Error, Result};

/// Banner width in pixels.
pub const BANNER_WIDTH: u32 = 96;
/// Banner height in pixels.
pub const BANNER_HEIGHT: u32 = 32;
/// Size of the banner pixel block in bytes.
pub const BANNER_SIZE: usize = (BANNER_WIDTH * BANNER_HEIGHT * 2) as usize;
/// Size of one comment block in bytes.
pub const COMMENT_SIZE: usize = 0x140;
/// Offset of the first comment block.
const COMMENTS_OFFSET: usize = 0x20 + BANNER_SIZE;
/// Total BNR1 size (one comment block).
pub const BNR1_SIZE: usize = COMMENTS_OFFSET + COMMENT_SIZE;
/// Total BNR2 size (six comment blocks).
pub const BNR2_SIZE: usize = COMMENTS_OFFSET + 6 * COMMENT_SIZE;

/// BNR revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BnrVersion {
    /// Single comment block.
    Bnr1,
    /// Six comment blocks, one per PAL language.
    Bnr2,
}

impl BnrVersion {
    /// Exact file size for this revision.
    pub fn file_size(self) -> usize {
        match self {
            BnrVersion::Bnr1 => BNR1_SIZE,
            BnrVersion::Bnr2 => BNR2_SIZE,
        }
    }

    /// Number of comment blocks.
    pub fn comment_count(self) -> usize {
        match self {
            BnrVersion::Bnr1 => 1,
            BnrVersion::Bnr2 => 6,
        }
    }

    pub fn magic(self) -> &'static [u8; 4] {
        match self {
            BnrVersion::Bnr1 => b"BNR1",
            BnrVersion::Bnr2 => b"BNR2",
        }
    }
}

/// Code page of the comment text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Western discs.
    #[default]
    Windows1252,
    /// Japanese discs (decoded as cp932, the Shift-JIS superset).
    ShiftJis,
}

impl TextEncoding {
    /// Decode a NUL-padded field. Unmappable bytes become U+FFFD.
    pub fn decode(self, raw: &[u8]) -> String {
        let raw = until_nul(raw);
        let decoded = match self {
            TextEncoding::Windows1252 => WINDOWS_1252.decode(raw, DecoderTrap::Replace),
            TextEncoding::ShiftJis => WINDOWS_31J.decode(raw, DecoderTrap::Replace),
        };
        decoded.unwrap_or_else(|partial| partial.into_owned())
    }
}

/// One comment block, fields kept as raw NUL-padded bytes.
///
/// The plain accessors decode as cp1252; use [`decode`](Self::decode) for
/// Shift-JIS banners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnrComment {
    pub game_name: [u8; 0x20],
    pub company: [u8; 0x20],
    pub full_game_name: [u8; 0x40],
    pub full_company: [u8; 0x40],
    pub description: [u8; 0x80],
}

/// A comment block with every field decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnrText {
    pub game_name: String,
    pub company: String,
    pub full_game_name: String,
    pub full_company: String,
    pub description: String,
}

impl BnrComment {
    fn parse<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            game_name: bytesa(r)?,
            company: bytesa(r)?,
            full_game_name: bytesa(r)?,
            full_company: bytesa(r)?,
            description: bytesa(r)?,
        })
    }

    /// Decode every field with `enc`.
    pub fn decode(&self, enc: TextEncoding) -> BnrText {
        BnrText {
            game_name: enc.decode(&self.game_name),
            company: enc.decode(&self.company),
            full_game_name: enc.decode(&self.full_game_name),
            full_company: enc.decode(&self.full_company),
            description: enc.decode(&self.description),
        }
    }

    pub fn game_name(&self) -> String {
        TextEncoding::Windows1252.decode(&self.game_name)
    }

    pub fn company(&self) -> String {
        TextEncoding::Windows1252.decode(&self.company)
    }

    pub fn full_game_name(&self) -> String {
        TextEncoding::Windows1252.decode(&self.full_game_name)
    }

    pub fn full_company(&self) -> String {
        TextEncoding::Windows1252.decode(&self.full_company)
    }

    pub fn description(&self) -> String {
        TextEncoding::Windows1252.decode(&self.description)
    }
}

/// Parsed GameCube banner.
#[derive(Debug, Clone)]
pub struct GcnBanner {
    pub version: BnrVersion,
    /// Tiled RGB5A3 banner texels, big-endian.
    pub pixels: Vec<u8>,
    /// One entry for BNR1, six for BNR2.
    pub comments: Vec<BnrComment>,
}

impl GcnBanner {
    /// Parse a banner of `len` bytes from `r`, positioned at the magic.
    ///
    /// `len` must equal the fixed size for `version`; anything else is
    /// rejected with [`Error::InvalidSize`] before reading.
    pub fn parse<R: Read>(r: &mut R, version: BnrVersion, len: u64) -> Result<Self> {
        let expected = version.file_size();
        if len != expected as u64 {
            return Err(Error::InvalidSize {
                expected: expected.to_string(),
                actual: len,
            });
        }

        let magic = bytesa::<4>(r)?;
        if &magic != version.magic() {
            return Err(Error::UnknownFormat);
        }
        let _reserved = bytesa::<0x1C>(r)?;
        let pixels = bytesv(r, BANNER_SIZE)?;

        let mut comments = Vec::with_capacity(version.comment_count());
        for _ in 0..version.comment_count() {
            comments.push(BnrComment::parse(r)?);
        }

        Ok(Self {
            version,
            pixels,
            comments,
        })
    }

    /// Decode the 96x32 banner.
    pub fn banner_image(&self) -> Result<DecodedImage> {
        texture::decode_rgb5a3(&self.pixels, BANNER_WIDTH, BANNER_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build(version: BnrVersion) -> Vec<u8> {
        let mut buf = vec![0u8; version.file_size()];
        buf[..4].copy_from_slice(version.magic());
        let name = b"Sample Game";
        buf[COMMENTS_OFFSET..COMMENTS_OFFSET + name.len()].copy_from_slice(name);
        buf
    }

    #[test]
    fn sizes() {
        assert_eq!(BNR1_SIZE, 6496);
        assert_eq!(BNR2_SIZE, 8096);
    }

    #[test]
    fn parse_bnr2_comments() {
        let buf = build(BnrVersion::Bnr2);
        let bnr = GcnBanner::parse(&mut Cursor::new(&buf), BnrVersion::Bnr2, buf.len() as u64)
            .unwrap();
        assert_eq!(bnr.comments.len(), 6);
        assert_eq!(bnr.comments[0].game_name(), "Sample Game");
        assert_eq!(bnr.comments[1].game_name(), "");
    }

    #[test]
    fn comment_text_code_pages() {
        let mut buf = build(BnrVersion::Bnr1);
        let name = b"Tom Clancy\x92s \x99";
        buf[COMMENTS_OFFSET..COMMENTS_OFFSET + name.len()].copy_from_slice(name);
        // "ゼルダ"
        let sjis = [0x83, 0x5B, 0x83, 0x8B, 0x83, 0x5F];
        buf[COMMENTS_OFFSET + 0x40..COMMENTS_OFFSET + 0x46].copy_from_slice(&sjis);

        let bnr = GcnBanner::parse(&mut Cursor::new(&buf), BnrVersion::Bnr1, buf.len() as u64)
            .unwrap();
        let comment = &bnr.comments[0];
        assert_eq!(comment.game_name(), "Tom Clancy\u{2019}s \u{2122}");

        let text = comment.decode(TextEncoding::ShiftJis);
        assert_eq!(text.full_game_name, "\u{30bc}\u{30eb}\u{30c0}");
        assert_eq!(text.company, "");
    }

    #[test]
    fn wrong_length_is_invalid_size() {
        let buf = build(BnrVersion::Bnr1);
        let err = GcnBanner::parse(&mut Cursor::new(&buf), BnrVersion::Bnr1, 6000).unwrap_err();
        assert!(matches!(err, Error::InvalidSize { actual: 6000, .. }));
    }

    #[test]
    fn declared_length_longer_than_data_is_truncated() {
        let buf = build(BnrVersion::Bnr1);
        let err =
            GcnBanner::parse(&mut Cursor::new(&buf[..100]), BnrVersion::Bnr1, BNR1_SIZE as u64)
                .unwrap_err();
        assert!(matches!(err, Error::TruncatedRead));
    }
}
