//! Fixed key material for Wii savegame containers.
//!
//! Every `data.bin` exported to an SD card is AES-128-CBC encrypted with the
//! same console-wide "SD key" and "SD IV". Both values are public; they are
//! an obfuscation layer, not a per-user secret.
//!
//! This module holds plain data only. The cipher itself lives in
//! [`crate::crypto`].

/// AES-128 key used for Wii savegames exported to SD.
pub const SD_KEY: [u8; 16] = [
    0xAB, 0x01, 0xB9, 0xD8, 0xE1, 0x62, 0x2B, 0x08, 0xAF, 0xBA, 0xD8, 0x4D, 0xBF, 0xC2, 0xA5, 0x5D,
];

/// Initial CBC chaining value paired with [`SD_KEY`].
pub const SD_IV: [u8; 16] = [
    0x21, 0x67, 0x12, 0xE6, 0xAA, 0x1F, 0x68, 0x9F, 0x95, 0xC5, 0xA2, 0x23, 0x24, 0xDC, 0x6A, 0x98,
];
