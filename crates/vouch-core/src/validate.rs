//! Format predicates for caller-supplied identifiers and codes. These gate
//! every manager operation before any store access.

use crate::secret::CODE_LEN;

/// Whether `value` looks like a phone number: digits only with an optional
/// leading `+`, 5 to 15 digits.
pub fn is_phone(value: &str) -> bool {
  let digits = value.strip_prefix('+').unwrap_or(value);
  (5..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `value` is a well-formed verification code: exactly six ASCII
/// digits.
pub fn is_code(value: &str) -> bool {
  value.len() == CODE_LEN && value.bytes().all(|b| b.is_ascii_digit())
}
