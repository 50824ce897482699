//! **gcbanner** - extract GameCube and Wii save banners and icons.
//!
//! # Supported formats
//! | Module | Format |
//! |--------|--------|
//! | [`formats::bnr`]  | BNR1 / BNR2 - GameCube disc banner |
//! | [`formats::wibn`] | WIBN - Wii save banner, raw `banner.bin` or encrypted `data.bin` |
//!
//! # Pipeline
//! 1. [`formats::identify`] classifies the input by magic (or by a
//!    decryption probe for `data.bin`).
//! 2. [`formats::Banner::read`] validates the size and parses the record,
//!    decrypting first via [`crypto`] when needed.
//! 3. [`texture::decode_rgb5a3`] turns tiled RGB5A3 texels into RGBA8.
//! 4. [`anim::assemble`] groups Wii icon frames into an animation.
//! 5. [`extract::Extractor`] hands the results to a [`writer::ImageWriter`].
//!
//! ```no_run
//! use std::fs::File;
//! use gcbanner::formats::Banner;
//!
//! # fn main() -> gcbanner::Result<()> {
//! let banner = Banner::load(&mut File::open("banner.bin")?)?;
//! let image = banner.banner_image()?;
//! println!("{}x{}, {} icon frame(s)", image.width(), image.height(), banner.icon_count());
//! # Ok(())
//! # }
//! ```

pub mod anim;
pub mod crypto;
pub mod error;
pub mod extract;
pub mod formats;
pub mod keys;
pub mod texture;
pub mod utils;
pub mod writer;

pub use error::{Error, Result};
