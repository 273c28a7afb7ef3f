//! Generation of the two secrets this system mints: verification codes and
//! symmetric key material. Both draw from the operating system's
//! cryptographically secure random source; a general-purpose PRNG is not
//! acceptable here.

use rand_core::{OsRng, RngCore};

/// Width of a verification code in ASCII digits.
pub const CODE_LEN: usize = 6;

/// Length of generated symmetric key material in raw bytes (hex-encoded to
/// twice this many characters).
const KEY_LEN: usize = 32;

/// Generate a verification code: exactly [`CODE_LEN`] ASCII digits,
/// left-zero-padded, uniformly distributed over the code space.
pub fn generate_code() -> String {
  // Four random bytes reduced modulo 10^6; the residual bias over 2^32 draws
  // is ~1e-4 of a single code's probability.
  let mut buf = [0u8; 4];
  OsRng.fill_bytes(&mut buf);
  let n = u32::from_be_bytes(buf) % 1_000_000;
  format!("{n:06}")
}

/// Generate fresh symmetric key material, hex-encoded.
pub fn generate_key() -> String {
  let mut buf = [0u8; KEY_LEN];
  OsRng.fill_bytes(&mut buf);
  hex::encode(buf)
}
