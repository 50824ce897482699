//! WIBN - Wii savegame banner (`banner.bin`), raw or inside `data.bin`.
//!
//! The raw form is the file found in a save's title directory. The same
//! structure appears at offset 0x20 of an SD-exported `data.bin`, whose
//! leading 0xF0C0 bytes are AES-128-CBC encrypted with the fixed SD key.
//!
//! ## WIBN layout
//! ```text
//! [0x0000] Magic "WIBN"                      (4 bytes)
//! [0x0004] Flags                             (u32 BE)
//!          bit 0 = no copy, bit 4 = icon bounce animation
//! [0x0008] Icon delay                        (u16 BE)
//! [0x000A] Reserved                          (0x16 bytes)
//! [0x0020] Title, UTF-16BE                   (32 units)
//! [0x0060] Subtitle, UTF-16BE                (32 units)
//! [0x00A0] Banner, 192x64 RGB5A3, tiled      (0x6000 bytes)
//! [0x60A0] Icons, 48x48 RGB5A3, tiled        (0x1200 bytes each, 0-8)
//! ```
//! The icon count is not stored; it follows from the total size, which
//! must be exactly `0x60A0 + n * 0x1200` with `n <= 8`.
//!
//! ## data.bin header (0x20 bytes, before the WIBN)
//! ```text
//! [0x00] Savegame (title) ID                 (u64 BE)
//! [0x08] Banner size                         (u32 BE)
//! [0x0C] Permissions                         (1 byte)
//! [0x0D] Unknown                             (1 byte)
//! [0x0E] MD5 of the header, blanked          (16 bytes)
//! [0x1E] Padding                             (2 bytes)
//! ```

use std::io::{Cursor, Read};

use log::debug;

use crate::crypto;
use crate::texture::{self, DecodedImage};
use crate::utils::{be_u16, be_u32, be_u64, bytesa, bytesv, u8, utf16be_string};
use crate::{Error, Result};

pub const BANNER_WIDTH: u32 = 192;
pub const BANNER_HEIGHT: u32 = 64;
pub const ICON_WIDTH: u32 = 48;
pub const ICON_HEIGHT: u32 = 48;
/// Size of the banner pixel block in bytes.
pub const BANNER_SIZE: usize = (BANNER_WIDTH * BANNER_HEIGHT * 2) as usize;
/// Size of one icon frame in bytes.
pub const ICON_SIZE: usize = (ICON_WIDTH * ICON_HEIGHT * 2) as usize;
/// Size of a WIBN with no icons.
pub const BASE_SIZE: usize = 0xA0 + BANNER_SIZE;
/// Maximum icon frames.
pub const MAX_ICONS: usize = 8;
/// Size of a WIBN with all eight icons.
pub const MAX_SIZE: usize = BASE_SIZE + MAX_ICONS * ICON_SIZE;
/// Size of the `data.bin` header preceding the WIBN.
pub const SAVE_HEADER_SIZE: usize = 0x20;
/// Encrypted region at the start of `data.bin` (header + largest WIBN).
pub const ENCRYPTED_REGION_SIZE: usize = SAVE_HEADER_SIZE + MAX_SIZE;

/// Flag bit: the save may not be copied.
pub const FLAG_NO_COPY: u32 = 0x01;
/// Flag bit: icon animation plays forward then backward.
pub const FLAG_ICON_BOUNCE: u32 = 0x10;

/// Validate a WIBN length and return its icon count.
pub fn icon_count_for_len(len: u64) -> Result<usize> {
    let invalid = || Error::InvalidSize {
        expected: format!("{BASE_SIZE} + n*{ICON_SIZE} (n <= {MAX_ICONS})"),
        actual: len,
    };
    let extra = len.checked_sub(BASE_SIZE as u64).ok_or_else(invalid)?;
    if extra % ICON_SIZE as u64 != 0 {
        return Err(invalid());
    }
    let count = (extra / ICON_SIZE as u64) as usize;
    if count > MAX_ICONS {
        return Err(invalid());
    }
    Ok(count)
}

/// Header in front of the WIBN inside a decrypted `data.bin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    /// Title ID of the game that owns the save.
    pub savegame_id: u64,
    /// Size of the following WIBN in bytes.
    pub banner_size: u32,
    pub permissions: u8,
    pub unknown: u8,
    pub md5: [u8; 16],
}

impl SaveHeader {
    fn parse<R: Read>(r: &mut R) -> Result<Self> {
        let savegame_id = be_u64(r)?;
        let banner_size = be_u32(r)?;
        let permissions = u8(r)?;
        let unknown = u8(r)?;
        let md5 = bytesa(r)?;
        let _padding = be_u16(r)?;
        Ok(Self {
            savegame_id,
            banner_size,
            permissions,
            unknown,
            md5,
        })
    }

    /// Four-character game code from the low half of the title ID, e.g. `RSBE`.
    pub fn game_code(&self) -> String {
        (self.savegame_id as u32)
            .to_be_bytes()
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect()
    }
}

/// Parsed Wii savegame banner.
#[derive(Debug, Clone)]
pub struct WiiBanner {
    pub flags: u32,
    /// Raw per-frame icon delay, in ticks.
    pub icon_delay: u16,
    pub title: String,
    pub subtitle: String,
    /// Tiled RGB5A3 banner texels, big-endian.
    pub banner_pixels: Vec<u8>,
    /// Tiled RGB5A3 texels of each icon frame.
    pub icons: Vec<Vec<u8>>,
    /// Present only when the banner came from an encrypted `data.bin`.
    pub save_header: Option<SaveHeader>,
}

impl WiiBanner {
    /// Parse a raw `banner.bin` of `len` bytes, positioned at the magic.
    pub fn parse<R: Read>(r: &mut R, len: u64) -> Result<Self> {
        let icon_count = icon_count_for_len(len)?;
        let buf = bytesv(r, len as usize)?;
        Self::parse_record(&buf, icon_count)
    }

    /// Decrypt and parse an SD-exported `data.bin` of `len` bytes.
    ///
    /// The whole 0xF0C0-byte encrypted region is decrypted first; the
    /// banner size recorded in the save header then has to satisfy the
    /// WIBN size rule.
    pub fn parse_encrypted<R: Read>(r: &mut R, len: u64) -> Result<Self> {
        if len < ENCRYPTED_REGION_SIZE as u64 {
            return Err(Error::InvalidSize {
                expected: format!(">= {ENCRYPTED_REGION_SIZE}"),
                actual: len,
            });
        }
        let encrypted = bytesv(r, ENCRYPTED_REGION_SIZE)?;
        let plain = crypto::sd_decrypt(&encrypted);

        let header = SaveHeader::parse(&mut Cursor::new(&plain[..SAVE_HEADER_SIZE]))?;
        debug!(
            "data.bin: title {:016X} ({}), banner size {:#X}",
            header.savegame_id,
            header.game_code(),
            header.banner_size
        );
        let icon_count = icon_count_for_len(header.banner_size as u64)?;
        let end = SAVE_HEADER_SIZE + header.banner_size as usize;

        let mut banner = Self::parse_record(&plain[SAVE_HEADER_SIZE..end], icon_count)?;
        banner.save_header = Some(header);
        Ok(banner)
    }

    fn parse_record(buf: &[u8], icon_count: usize) -> Result<Self> {
        let mut r = Cursor::new(buf);
        let magic = bytesa::<4>(&mut r)?;
        if &magic != b"WIBN" {
            return Err(Error::UnknownFormat);
        }
        let flags = be_u32(&mut r)?;
        let icon_delay = be_u16(&mut r)?;
        let _reserved = bytesa::<0x16>(&mut r)?;
        let title = utf16be_string(&bytesa::<0x40>(&mut r)?);
        let subtitle = utf16be_string(&bytesa::<0x40>(&mut r)?);
        let banner_pixels = bytesv(&mut r, BANNER_SIZE)?;

        let mut icons = Vec::with_capacity(icon_count);
        for _ in 0..icon_count {
            icons.push(bytesv(&mut r, ICON_SIZE)?);
        }
        debug!("WIBN: flags {flags:#X}, delay {icon_delay}, {icon_count} icon(s)");

        Ok(Self {
            flags,
            icon_delay,
            title,
            subtitle,
            banner_pixels,
            icons,
            save_header: None,
        })
    }

    pub fn no_copy(&self) -> bool {
        self.flags & FLAG_NO_COPY != 0
    }

    pub fn icon_bounce(&self) -> bool {
        self.flags & FLAG_ICON_BOUNCE != 0
    }

    /// Decode the 192x64 banner.
    pub fn banner_image(&self) -> Result<DecodedImage> {
        texture::decode_rgb5a3(&self.banner_pixels, BANNER_WIDTH, BANNER_HEIGHT)
    }

    /// Decode icon frame `index`, or `None` if there is no such frame.
    pub fn icon_image(&self, index: usize) -> Option<Result<DecodedImage>> {
        self.icons
            .get(index)
            .map(|px| texture::decode_rgb5a3(px, ICON_WIDTH, ICON_HEIGHT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(icons: usize, flags: u32) -> Vec<u8> {
        let mut buf = vec![0u8; BASE_SIZE + icons * ICON_SIZE];
        buf[..4].copy_from_slice(b"WIBN");
        buf[4..8].copy_from_slice(&flags.to_be_bytes());
        buf[8..10].copy_from_slice(&3u16.to_be_bytes());
        for (i, c) in "Wii Sports".encode_utf16().enumerate() {
            buf[0x20 + i * 2..0x22 + i * 2].copy_from_slice(&c.to_be_bytes());
        }
        buf
    }

    #[test]
    fn constants() {
        assert_eq!(BASE_SIZE, 24736);
        assert_eq!(ICON_SIZE, 0x1200);
        assert_eq!(ENCRYPTED_REGION_SIZE, 0xF0C0);
    }

    #[test]
    fn icon_count_rule() {
        assert_eq!(icon_count_for_len(BASE_SIZE as u64).unwrap(), 0);
        assert_eq!(icon_count_for_len((BASE_SIZE + 3 * ICON_SIZE) as u64).unwrap(), 3);
        assert_eq!(icon_count_for_len(MAX_SIZE as u64).unwrap(), 8);
        for bad in [0, BASE_SIZE as u64 - 1, BASE_SIZE as u64 + 1, (MAX_SIZE + ICON_SIZE) as u64] {
            assert!(matches!(icon_count_for_len(bad), Err(Error::InvalidSize { .. })));
        }
    }

    #[test]
    fn parse_raw_fields() {
        let buf = build(2, FLAG_ICON_BOUNCE | FLAG_NO_COPY);
        let wibn = WiiBanner::parse(&mut Cursor::new(&buf), buf.len() as u64).unwrap();
        assert_eq!(wibn.title, "Wii Sports");
        assert_eq!(wibn.subtitle, "");
        assert_eq!(wibn.icon_delay, 3);
        assert_eq!(wibn.icons.len(), 2);
        assert!(wibn.icon_bounce());
        assert!(wibn.no_copy());
        assert!(wibn.save_header.is_none());
        assert!(wibn.icon_image(2).is_none());
    }

    #[test]
    fn parse_encrypted_save() {
        let wibn = build(1, 0);
        let mut plain = vec![0u8; ENCRYPTED_REGION_SIZE];
        plain[..8].copy_from_slice(&0x0001_0000_5253_4245u64.to_be_bytes());
        plain[8..12].copy_from_slice(&(wibn.len() as u32).to_be_bytes());
        plain[SAVE_HEADER_SIZE..SAVE_HEADER_SIZE + wibn.len()].copy_from_slice(&wibn);
        let mut file = crypto::sd_encrypt(&plain);
        // Trailing file data past the encrypted header is ignored.
        file.extend_from_slice(&[0xAA; 0x40]);

        let parsed = WiiBanner::parse_encrypted(&mut Cursor::new(&file), file.len() as u64).unwrap();
        let header = parsed.save_header.as_ref().unwrap();
        assert_eq!(header.game_code(), "RSBE");
        assert_eq!(parsed.icons.len(), 1);
        assert_eq!(parsed.title, "Wii Sports");
    }

    #[test]
    fn encrypted_bad_banner_size() {
        let mut plain = vec![0u8; ENCRYPTED_REGION_SIZE];
        plain[8..12].copy_from_slice(&((BASE_SIZE + 1) as u32).to_be_bytes());
        let file = crypto::sd_encrypt(&plain);
        let err = WiiBanner::parse_encrypted(&mut Cursor::new(&file), file.len() as u64)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSize { .. }));
    }
}
