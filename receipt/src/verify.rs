//! Receipt token verification.
//!
//! Two checks, in order, short-circuiting on the first failure:
//! 1. the whole input matches `RPG-[A-Z]{4}-[A-Z]{4}-[0-9]{4}` exactly;
//! 2. the four trailing digits sum to [`DIGIT_SUM`].
//!
//! Verification is case-sensitive. Interactive callers that want to accept
//! lowercase input run [`normalize_input`] first.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::token::{BLOCK_LEN, DIGIT_SUM, ReceiptToken};

// `\d` would admit non-ASCII digits; the class is spelled out.
static TOKEN_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^RPG-[A-Z]{4}-[A-Z]{4}-[0-9]{4}$").expect("token shape pattern is valid")
});

/// Why an input is not a legitimate receipt token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token does not match RPG-XXXX-YYYY-DDDD")]
    Malformed,
    #[error("token digits sum to {sum}, expected {expected}", expected = DIGIT_SUM)]
    ChecksumMismatch { sum: u32 },
}

/// Lexical check only: does `input` have the token shape?
#[must_use]
pub fn matches_shape(input: &str) -> bool {
    TOKEN_SHAPE.is_match(input)
}

/// Classify `input`, returning the token or the first failed check.
pub fn verify_token(input: &str) -> Result<ReceiptToken, TokenRejection> {
    if !matches_shape(input) {
        return Err(TokenRejection::Malformed);
    }

    // Shape check guarantees the last BLOCK_LEN bytes are ASCII digits.
    let sum: u32 = input.as_bytes()[input.len() - BLOCK_LEN..]
        .iter()
        .map(|b| u32::from(b - b'0'))
        .sum();
    if sum != DIGIT_SUM {
        return Err(TokenRejection::ChecksumMismatch { sum });
    }

    Ok(ReceiptToken::from_verified(input.to_string()))
}

/// `true` when `input` is well-formed and its digits sum to [`DIGIT_SUM`].
#[must_use]
pub fn validate_token(input: &str) -> bool {
    verify_token(input).is_ok()
}

/// Usability normalization for typed input: trim surrounding whitespace and
/// uppercase. Not applied by [`validate_token`].
#[must_use]
pub fn normalize_input(input: &str) -> String {
    input.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::{TokenRejection, matches_shape, normalize_input, validate_token, verify_token};

    #[test]
    fn accepts_sum_of_twenty_one() {
        assert!(validate_token("RPG-ABCD-EFGH-9534"));
    }

    #[test]
    fn rejects_sum_of_twenty() {
        assert_eq!(
            verify_token("RPG-ABCD-EFGH-9533"),
            Err(TokenRejection::ChecksumMismatch { sum: 20 })
        );
    }

    #[test]
    fn rejects_sum_of_twenty_two() {
        assert_eq!(
            verify_token("RPG-ABCD-EFGH-9535"),
            Err(TokenRejection::ChecksumMismatch { sum: 22 })
        );
    }

    #[test]
    fn lowercase_needs_normalization() {
        let raw = "rpg-abcd-efgh-9534";
        assert_eq!(verify_token(raw), Err(TokenRejection::Malformed));
        assert!(validate_token(&normalize_input(raw)));
    }

    #[test]
    fn normalization_trims_whitespace() {
        assert_eq!(normalize_input("  rpg-abcd-efgh-9534\n"), "RPG-ABCD-EFGH-9534");
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(verify_token(""), Err(TokenRejection::Malformed));
    }

    #[test]
    fn rejects_short_letter_block() {
        assert!(!validate_token("RPG-AB-EFGH-9534"));
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(!validate_token("RPG-ABCD-EFGH-953"));
        assert!(!validate_token("RPG-ABCD-EFGH-95340"));
        assert!(!validate_token("RPG-ABCDE-EFGH-9534"));
        assert!(!validate_token(&"RPG-ABCD-EFGH-9534".repeat(1_000)));
    }

    #[test]
    fn rejects_surrounding_characters() {
        assert!(!validate_token(" RPG-ABCD-EFGH-9534"));
        assert!(!validate_token("RPG-ABCD-EFGH-9534 "));
        assert!(!validate_token("RPG-ABCD-EFGH-9534\n"));
        assert!(!validate_token("xRPG-ABCD-EFGH-9534"));
    }

    #[test]
    fn rejects_wrong_tag_or_separator() {
        assert!(!validate_token("RPX-ABCD-EFGH-9534"));
        assert!(!validate_token("RPG_ABCD_EFGH_9534"));
        assert!(!validate_token("RPGABCDEFGH9534"));
    }

    #[test]
    fn rejects_non_letters_in_letter_blocks() {
        assert!(!validate_token("RPG-AB1D-EFGH-9534"));
        assert!(!validate_token("RPG-AB!D-EFGH-9534"));
        assert!(!validate_token("RPG-ABÇD-EFGH-9534"));
        assert!(!validate_token("RPG-abcd-EFGH-9534"));
    }

    #[test]
    fn rejects_non_ascii_digits() {
        // Arabic-Indic digits nine, five, three, four.
        assert!(!matches_shape("RPG-ABCD-EFGH-٩٥٣٤"));
        assert!(!validate_token("RPG-ABCD-EFGH-95A4"));
    }

    #[test]
    fn letters_do_not_affect_verdict() {
        for letters in ["AAAA-AAAA", "ZZZZ-ZZZZ", "QWER-TYUI"] {
            assert!(validate_token(&format!("RPG-{letters}-0993")));
            assert!(validate_token(&format!("RPG-{letters}-7770")));
        }
    }

    #[test]
    fn verdict_is_deterministic() {
        for input in ["RPG-ABCD-EFGH-9534", "RPG-ABCD-EFGH-9533", "", "garbage"] {
            assert_eq!(verify_token(input), verify_token(input));
        }
    }

    #[test]
    fn accepted_tokens_round_trip_to_input() {
        let token = verify_token("RPG-WXYZ-KLMN-3981").unwrap();
        assert_eq!(token.as_str(), "RPG-WXYZ-KLMN-3981");
    }

    #[test]
    fn exhaustive_digit_blocks_agree_with_sum() {
        // Soundness and completeness over every digit block for fixed letters.
        for n in 0..10_000u32 {
            let block = format!("{n:04}");
            let sum: u32 = block.bytes().map(|b| u32::from(b - b'0')).sum();
            let input = format!("RPG-ABCD-EFGH-{block}");
            assert_eq!(validate_token(&input), sum == 21, "{input}");
        }
    }
}
