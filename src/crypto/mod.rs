//! Cryptographic operations for Wii savegame containers.
//!
//! A pure-Rust AES-128 is used to unwrap the SD-exported savegame
//! (`data.bin`). The key and IV are fixed public constants from
//! [`crate::keys`]; nothing here protects secrets.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`aes`] | AES-128 block primitives and key schedule ([`aes::Aes128`]) |
//! | [`cbc`] | CBC chaining over arbitrary-length buffers |

pub mod aes;
pub mod cbc;

use crate::keys::{SD_IV, SD_KEY};

/// Decrypt bytes from the start of an SD-exported Wii savegame.
pub fn sd_decrypt(data: &[u8]) -> Vec<u8> {
    let aes = aes::Aes128::new(&SD_KEY);
    let mut iv = SD_IV;
    cbc::decrypt_cbc(&aes, &mut iv, data)
}

/// Encrypt bytes as the start of an SD-exported Wii savegame.
pub fn sd_encrypt(data: &[u8]) -> Vec<u8> {
    let aes = aes::Aes128::new(&SD_KEY);
    let mut iv = SD_IV;
    cbc::encrypt_cbc(&aes, &mut iv, data)
}
