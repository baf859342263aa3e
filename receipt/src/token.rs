//! Receipt token generation.
//!
//! A token has the shape `RPG-XXXX-YYYY-DDDD`: a fixed tag, two blocks of
//! four uppercase ASCII letters, and a block of four decimal digits whose
//! digit sum is exactly [`DIGIT_SUM`]. Authenticity is a property of the
//! string alone: [`crate::verify_token`] re-derives it from the format, with
//! no secret and no lookup.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::verify::{TokenRejection, verify_token};

pub const TOKEN_PREFIX: &str = "RPG";
pub const DIGIT_SUM: u32 = 21;
pub const BLOCK_LEN: usize = 4;
/// `RPG-XXXX-YYYY-DDDD`
pub const TOKEN_LEN: usize = TOKEN_PREFIX.len() + 3 * (BLOCK_LEN + 1);

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A receipt identifier known to satisfy the format and digit-sum invariant.
///
/// Only produced by the generator or by a successful [`verify_token`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReceiptToken(String);

impl ReceiptToken {
    pub(crate) fn from_verified(raw: String) -> Self {
        debug_assert_eq!(raw.len(), TOKEN_LEN);
        Self(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two letter blocks, in order.
    #[must_use]
    pub fn letter_blocks(&self) -> (&str, &str) {
        let first = TOKEN_PREFIX.len() + 1;
        let second = first + BLOCK_LEN + 1;
        (
            &self.0[first..first + BLOCK_LEN],
            &self.0[second..second + BLOCK_LEN],
        )
    }

    /// The trailing digits as numeric values.
    #[must_use]
    pub fn digits(&self) -> [u8; BLOCK_LEN] {
        let tail = &self.0.as_bytes()[TOKEN_LEN - BLOCK_LEN..];
        [
            tail[0] - b'0',
            tail[1] - b'0',
            tail[2] - b'0',
            tail[3] - b'0',
        ]
    }
}

impl fmt::Display for ReceiptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReceiptToken {
    type Err = TokenRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        verify_token(s)
    }
}

impl TryFrom<String> for ReceiptToken {
    type Error = TokenRejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        verify_token(&value)
    }
}

impl From<ReceiptToken> for String {
    fn from(value: ReceiptToken) -> Self {
        value.0
    }
}

impl AsRef<str> for ReceiptToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a fresh token from the thread-local RNG.
#[must_use]
pub fn generate_token() -> ReceiptToken {
    generate_token_with(&mut rand::rng())
}

/// Generate a token from the given RNG. Seeded RNGs give reproducible tokens.
pub fn generate_token_with<R: Rng>(rng: &mut R) -> ReceiptToken {
    let first = letter_block(rng);
    let second = letter_block(rng);
    let digits = draw_digit_block(|| rng.random_range(0..10u8));

    let mut raw = String::with_capacity(TOKEN_LEN);
    raw.push_str(TOKEN_PREFIX);
    raw.push('-');
    raw.push_str(&first);
    raw.push('-');
    raw.push_str(&second);
    raw.push('-');
    raw.extend(digits.iter().map(|d| char::from(b'0' + d)));

    ReceiptToken::from_verified(raw)
}

fn letter_block<R: Rng>(rng: &mut R) -> String {
    (0..BLOCK_LEN)
        .map(|_| char::from(LETTERS[rng.random_range(0..LETTERS.len())]))
        .collect()
}

/// Draw a digit block whose digits sum to [`DIGIT_SUM`].
///
/// Rejection sampling: take three digits from `next_digit`, derive the fourth
/// as `DIGIT_SUM - (d1 + d2 + d3)`, and start over with three new digits when
/// the fourth falls outside `0..=9`. There is no attempt cap; a round succeeds
/// with probability 592/1000 for uniform digits.
///
/// `next_digit` must yield values in `0..=9`.
pub fn draw_digit_block(mut next_digit: impl FnMut() -> u8) -> [u8; BLOCK_LEN] {
    loop {
        let d1 = next_digit();
        let d2 = next_digit();
        let d3 = next_digit();
        debug_assert!(d1 <= 9 && d2 <= 9 && d3 <= 9, "digit source out of range");

        let partial = u32::from(d1) + u32::from(d2) + u32::from(d3);
        if let Some(d4) = DIGIT_SUM.checked_sub(partial)
            && d4 <= 9
        {
            return [d1, d2, d3, d4 as u8];
        }
    }
}
