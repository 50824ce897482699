//! Low-level I/O primitives shared by all parsers.
//!
//! Each function reads exactly the bytes it promises or returns an error.
//! A short read surfaces as [`Error::TruncatedRead`](crate::Error::TruncatedRead).

use std::io::{Read, Seek, SeekFrom};

use crate::Result;

/// Read one byte.
#[inline]
pub(crate) fn u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut b = [0u8; 1];
    r.read_exact(&mut b)?;
    Ok(b[0])
}

/// Read a big-endian `u16`.
#[inline]
pub(crate) fn be_u16<R: Read>(r: &mut R) -> Result<u16> {
    let mut b = [0u8; 2];
    r.read_exact(&mut b)?;
    Ok(u16::from_be_bytes(b))
}

/// Read a big-endian `u32`.
#[inline]
pub(crate) fn be_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_be_bytes(b))
}

/// Read a big-endian `u64`.
#[inline]
pub(crate) fn be_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut b = [0u8; 8];
    r.read_exact(&mut b)?;
    Ok(u64::from_be_bytes(b))
}

/// Read exactly `N` bytes into a fixed-size array.
#[inline]
pub(crate) fn bytesa<const N: usize>(r: &mut impl Read) -> Result<[u8; N]> {
    let mut b = [0u8; N];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Read exactly `len` bytes into a `Vec`.
#[inline]
pub(crate) fn bytesv<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut b = vec![0u8; len];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Total length of the stream. Leaves the position at the start.
pub(crate) fn stream_len<R: Seek>(r: &mut R) -> Result<u64> {
    let len = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(0))?;
    Ok(len)
}

/// Read up to `buf.len()` bytes, stopping early only at end of stream.
///
/// Returns the number of bytes actually read.
pub(crate) fn read_fill<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// The part of a fixed-width NUL-padded field before the first NUL.
pub(crate) fn until_nul(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}

/// Decode a fixed-width UTF-16BE string, stopping at the first NUL unit.
pub(crate) fn utf16be_string(buf: &[u8]) -> String {
    let units: Vec<u16> = buf
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn short_read_is_truncated() {
        let mut c = Cursor::new([0x12u8, 0x34, 0x56]);
        assert_eq!(be_u16(&mut c).unwrap(), 0x1234);
        assert!(matches!(be_u32(&mut c), Err(crate::Error::TruncatedRead)));
    }

    #[test]
    fn strings_stop_at_nul() {
        assert_eq!(until_nul(b"Zelda\0junk"), b"Zelda");
        assert_eq!(until_nul(b"full"), b"full");
        let wide = [0x00, b'W', 0x00, b'i', 0x00, 0x00, 0x00, b'x'];
        assert_eq!(utf16be_string(&wide), "Wi");
    }

    #[test]
    fn read_fill_stops_at_eof() {
        let mut c = Cursor::new(vec![1u8; 10]);
        let mut buf = [0u8; 64];
        assert_eq!(read_fill(&mut c, &mut buf).unwrap(), 10);
    }
}
