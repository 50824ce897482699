//! AES-128-CBC over arbitrary-length buffers.
//!
//! `iv` is updated in place to the final chaining value, so a second call
//! with the same `iv` continues the stream where the first one stopped.
//!
//! ## Trailing partial block
//! When the length is not a multiple of 16, the last `r` bytes are
//! zero-padded to a full block and XORed with `E_K(chain)`; only the first
//! `r` output bytes are emitted. The operation is identical in both
//! directions, so `decrypt(encrypt(x)) == x` for every length. The chaining
//! value afterwards is the `r` ciphertext bytes followed by
//! `E_K(chain)[r..]`.
//!
//! This intentionally differs from zero-padding the tail and running it
//! through the block cipher, which would need the padded block to invert.
//! Tools that pad instead produce different bytes for the tail; whole
//! blocks, including the 0xF0C0-byte `data.bin` region, are unaffected.
//!
//! <https://en.wikipedia.org/wiki/Block_cipher_mode_of_operation#Cipher_block_chaining_(CBC)>

use super::aes::{Aes128, Block};

/// Encrypt `input` with CBC chaining starting from `iv`.
pub fn encrypt_cbc(aes: &Aes128, iv: &mut Block, input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut blocks = input.chunks_exact(16);
    for chunk in &mut blocks {
        let mut b: Block = [0u8; 16];
        for i in 0..16 {
            b[i] = chunk[i] ^ iv[i];
        }
        aes.encrypt_block(&mut b);
        out.extend_from_slice(&b);
        *iv = b;
    }
    let tail = blocks.remainder();
    if !tail.is_empty() {
        let ks = keystream(aes, iv);
        let start = out.len();
        out.extend(tail.iter().zip(ks.iter()).map(|(p, k)| p ^ k));
        chain_after_tail(iv, &out[start..], &ks);
    }
    out
}

/// Decrypt `input` with CBC chaining starting from `iv`.
///
/// Never fails: a wrong key or IV yields garbage plaintext.
pub fn decrypt_cbc(aes: &Aes128, iv: &mut Block, input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut blocks = input.chunks_exact(16);
    for chunk in &mut blocks {
        let mut c: Block = [0u8; 16];
        c.copy_from_slice(chunk);
        let mut b = c;
        aes.decrypt_block(&mut b);
        for i in 0..16 {
            b[i] ^= iv[i];
        }
        out.extend_from_slice(&b);
        *iv = c;
    }
    let tail = blocks.remainder();
    if !tail.is_empty() {
        let ks = keystream(aes, iv);
        out.extend(tail.iter().zip(ks.iter()).map(|(c, k)| c ^ k));
        chain_after_tail(iv, tail, &ks);
    }
    out
}

fn keystream(aes: &Aes128, iv: &Block) -> Block {
    let mut ks = *iv;
    aes.encrypt_block(&mut ks);
    ks
}

fn chain_after_tail(iv: &mut Block, ciphertext: &[u8], ks: &Block) {
    let r = ciphertext.len();
    iv[..r].copy_from_slice(ciphertext);
    iv[r..].copy_from_slice(&ks[r..]);
}
