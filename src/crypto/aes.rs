//! AES-128 (Rijndael with Nb=4, Nk=4, Nr=10) block primitives.
//!
//! Lookup tables (S-box, inverse S-box, GF(2^8) log/antilog tables, round
//! constants) are derived from the field arithmetic on first use and shared
//! read-only by every [`Aes128`] context afterwards. A [`OnceLock`] guards
//! the one-time build, so contexts may be created from any thread.
//!
//! The key schedule lives in the context itself; there is no global cipher
//! state. This is not constant-time and is only meant for reading console
//! file formats.
//!
//! <https://en.wikipedia.org/wiki/Advanced_Encryption_Standard>

use std::fmt;
use std::sync::OnceLock;

/// One 16-byte AES state, column-major.
pub type Block = [u8; 16];

/// Number of rounds for a 128-bit key.
const ROUNDS: usize = 10;

struct Tables {
    sbox: [u8; 256],
    inv_sbox: [u8; 256],
    /// `alog[i] = 3^i` in GF(2^8).
    alog: [u8; 256],
    /// Discrete log base 3; `log[0]` is unused.
    log: [u8; 256],
    rcon: [u8; ROUNDS],
}

static TABLES: OnceLock<Tables> = OnceLock::new();

/// Multiply by x modulo x^8+x^4+x^3+x+1.
#[inline]
fn xtime(a: u8) -> u8 {
    (a << 1) ^ if a & 0x80 != 0 { 0x1B } else { 0 }
}

impl Tables {
    fn get() -> &'static Tables {
        TABLES.get_or_init(Tables::build)
    }

    fn build() -> Tables {
        let mut alog = [0u8; 256];
        let mut log = [0u8; 256];

        // 3 generates the multiplicative group, so 255 steps visit every
        // non-zero element exactly once.
        let mut x = 1u8;
        for i in 0..255 {
            alog[i] = x;
            log[x as usize] = i as u8;
            x ^= xtime(x);
        }
        alog[255] = alog[0];

        let mut sbox = [0u8; 256];
        let mut inv_sbox = [0u8; 256];
        for i in 0..256usize {
            let inv = if i == 0 {
                0
            } else {
                alog[(255 - log[i] as usize) % 255]
            };
            // Affine transform over GF(2).
            let s = inv
                ^ inv.rotate_left(1)
                ^ inv.rotate_left(2)
                ^ inv.rotate_left(3)
                ^ inv.rotate_left(4)
                ^ 0x63;
            sbox[i] = s;
            inv_sbox[s as usize] = i as u8;
        }

        let mut rcon = [0u8; ROUNDS];
        let mut r = 1u8;
        for c in rcon.iter_mut() {
            *c = r;
            r = xtime(r);
        }

        Tables {
            sbox,
            inv_sbox,
            alog,
            log,
            rcon,
        }
    }

    #[inline]
    fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.alog[(self.log[a as usize] as usize + self.log[b as usize] as usize) % 255]
    }
}

/// An AES-128 cipher context holding an expanded key schedule.
#[derive(Clone)]
pub struct Aes128 {
    round_keys: [u8; 16 * (ROUNDS + 1)],
    t: &'static Tables,
}

impl fmt::Debug for Aes128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aes128").finish_non_exhaustive()
    }
}

impl Aes128 {
    /// Build the lookup tables if needed and expand `key` into 11 round keys.
    pub fn new(key: &[u8; 16]) -> Self {
        let t = Tables::get();
        let mut w = [0u8; 16 * (ROUNDS + 1)];
        w[..16].copy_from_slice(key);
        for i in 4..4 * (ROUNDS + 1) {
            let mut word = [
                w[(i - 1) * 4],
                w[(i - 1) * 4 + 1],
                w[(i - 1) * 4 + 2],
                w[(i - 1) * 4 + 3],
            ];
            if i % 4 == 0 {
                // RotWord, SubWord, Rcon
                word = [
                    t.sbox[word[1] as usize] ^ t.rcon[i / 4 - 1],
                    t.sbox[word[2] as usize],
                    t.sbox[word[3] as usize],
                    t.sbox[word[0] as usize],
                ];
            }
            for j in 0..4 {
                w[i * 4 + j] = w[(i - 4) * 4 + j] ^ word[j];
            }
        }
        Self { round_keys: w, t }
    }

    fn round_key(&self, round: usize) -> &[u8] {
        &self.round_keys[round * 16..(round + 1) * 16]
    }

    /// Encrypt one block in place (ECB).
    pub fn encrypt_block(&self, s: &mut Block) {
        add_round_key(s, self.round_key(0));
        for round in 1..ROUNDS {
            self.sub_bytes(s);
            shift_rows(s);
            self.mix_columns(s);
            add_round_key(s, self.round_key(round));
        }
        self.sub_bytes(s);
        shift_rows(s);
        add_round_key(s, self.round_key(ROUNDS));
    }

    /// Decrypt one block in place (ECB).
    pub fn decrypt_block(&self, s: &mut Block) {
        add_round_key(s, self.round_key(ROUNDS));
        for round in (1..ROUNDS).rev() {
            inv_shift_rows(s);
            self.inv_sub_bytes(s);
            add_round_key(s, self.round_key(round));
            self.inv_mix_columns(s);
        }
        inv_shift_rows(s);
        self.inv_sub_bytes(s);
        add_round_key(s, self.round_key(0));
    }

    fn sub_bytes(&self, s: &mut Block) {
        for b in s.iter_mut() {
            *b = self.t.sbox[*b as usize];
        }
    }

    fn inv_sub_bytes(&self, s: &mut Block) {
        for b in s.iter_mut() {
            *b = self.t.inv_sbox[*b as usize];
        }
    }

    // Each column times the MDS matrix with rows rotating [2, 3, 1, 1].
    fn mix_columns(&self, s: &mut Block) {
        let m = |a, b| self.t.mul(a, b);
        for c in s.chunks_exact_mut(4) {
            let (s0, s1, s2, s3) = (c[0], c[1], c[2], c[3]);
            c[0] = m(2, s0) ^ m(3, s1) ^ s2 ^ s3;
            c[1] = s0 ^ m(2, s1) ^ m(3, s2) ^ s3;
            c[2] = s0 ^ s1 ^ m(2, s2) ^ m(3, s3);
            c[3] = m(3, s0) ^ s1 ^ s2 ^ m(2, s3);
        }
    }

    // Inverse matrix rows rotate [0x0E, 0x0B, 0x0D, 0x09].
    fn inv_mix_columns(&self, s: &mut Block) {
        let m = |a, b| self.t.mul(a, b);
        for c in s.chunks_exact_mut(4) {
            let (s0, s1, s2, s3) = (c[0], c[1], c[2], c[3]);
            c[0] = m(0x0E, s0) ^ m(0x0B, s1) ^ m(0x0D, s2) ^ m(0x09, s3);
            c[1] = m(0x09, s0) ^ m(0x0E, s1) ^ m(0x0B, s2) ^ m(0x0D, s3);
            c[2] = m(0x0D, s0) ^ m(0x09, s1) ^ m(0x0E, s2) ^ m(0x0B, s3);
            c[3] = m(0x0B, s0) ^ m(0x0D, s1) ^ m(0x09, s2) ^ m(0x0E, s3);
        }
    }
}

fn add_round_key(s: &mut Block, rk: &[u8]) {
    for (b, k) in s.iter_mut().zip(rk.iter()) {
        *b ^= k;
    }
}

// Row i is bytes {i, i+4, i+8, i+12}; rotate row i left by i.
fn shift_rows(s: &mut Block) {
    let t = s[1];
    s[1] = s[5];
    s[5] = s[9];
    s[9] = s[13];
    s[13] = t;

    s.swap(2, 10);
    s.swap(6, 14);

    let t = s[15];
    s[15] = s[11];
    s[11] = s[7];
    s[7] = s[3];
    s[3] = t;
}

fn inv_shift_rows(s: &mut Block) {
    let t = s[13];
    s[13] = s[9];
    s[9] = s[5];
    s[5] = s[1];
    s[1] = t;

    s.swap(2, 10);
    s.swap(6, 14);

    let t = s[3];
    s[3] = s[7];
    s[7] = s[11];
    s[11] = s[15];
    s[15] = t;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex16(s: &str) -> Block {
        let mut out = [0u8; 16];
        for (i, b) in out.iter_mut().enumerate() {
            *b = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).unwrap();
        }
        out
    }

    #[test]
    fn sbox_known_entries() {
        let t = Tables::get();
        assert_eq!(t.sbox[0x00], 0x63);
        assert_eq!(t.sbox[0x01], 0x7C);
        assert_eq!(t.sbox[0x53], 0xED);
        assert_eq!(t.sbox[0xFF], 0x16);
        for i in 0..256 {
            assert_eq!(t.inv_sbox[t.sbox[i] as usize] as usize, i);
        }
        assert_eq!(t.rcon, [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1B, 0x36]);
    }

    #[test]
    fn gf_mul_matches_xtime() {
        let t = Tables::get();
        assert_eq!(t.mul(0x57, 0x83), 0xC1);
        for a in 0..=255u8 {
            assert_eq!(t.mul(a, 2), xtime(a));
        }
    }

    #[test]
    fn fips197_appendix_c1() {
        let aes = Aes128::new(&hex16("000102030405060708090a0b0c0d0e0f"));
        let mut block = hex16("00112233445566778899aabbccddeeff");
        aes.encrypt_block(&mut block);
        assert_eq!(block, hex16("69c4e0d86a7b0430d8cdb78070b4c55a"));
        aes.decrypt_block(&mut block);
        assert_eq!(block, hex16("00112233445566778899aabbccddeeff"));
    }

    #[test]
    fn fips197_key_expansion_last_word() {
        let aes = Aes128::new(&hex16("2b7e151628aed2a6abf7158809cf4f3c"));
        assert_eq!(&aes.round_keys[160..], &hex16("d014f9a8c9ee2589e13f0cc8b6630ca6"));
    }
}
