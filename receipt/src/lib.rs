//! Receipt tokens and invoices for Emporium.
//!
//! - **`token`**: generator for `RPG-XXXX-YYYY-DDDD` identifiers whose digits sum to 21
//! - **`verify`**: the matching format + checksum validator
//! - **`status`**: idle/valid/invalid presentation wrapper for interactive checks
//! - **`invoice`**: the stamped receipt produced at checkout
//!
//! Token generation and verification are pure and synchronous; they share no
//! state and may be called from any thread.

mod invoice;
mod status;
mod token;
mod verify;

pub use invoice::{FLAVOR_TEXTS, Invoice, InvoiceLine, QR_PAYLOAD_TAG};
pub use status::{TokenVerifier, VerificationStatus};
pub use token::{
    BLOCK_LEN, DIGIT_SUM, ReceiptToken, TOKEN_LEN, TOKEN_PREFIX, draw_digit_block,
    generate_token, generate_token_with,
};
pub use verify::{TokenRejection, matches_shape, normalize_input, validate_token, verify_token};
