//! Invoice ("Recibo Imperial") assembly and plain-text rendering.

use std::fmt::Write;

use rand::Rng;
use serde::{Serialize, Serializer};

use emporium_types::{CustomerDetails, Gold};

use crate::token::{ReceiptToken, generate_token_with};

pub const FLAVOR_TEXTS: &[&str] = &[
    "Cuidado com os mímicos disfarçados de baús!",
    "Este recibo é válido em todos os planos materiais conhecidos.",
    "O Empório não se responsabiliza por perdas de membros em combate.",
    "Que a sorte dos dados acompanhe seus passos.",
];

/// Prefix of the QR payload; scanners split on `:`.
pub const QR_PAYLOAD_TAG: &str = "RPGRECEIPT";

const WIDTH: usize = 48;
const NAME_COL: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: u64,
    pub unit_price: Gold,
}

impl InvoiceLine {
    #[must_use]
    pub fn line_total(&self) -> Gold {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// A completed purchase, stamped with a freshly generated receipt token.
///
/// Serializes with the derived `total` and `change` alongside the stored
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub store_name: String,
    pub customer: CustomerDetails,
    pub lines: Vec<InvoiceLine>,
    pub paid: Gold,
    pub flavor_text: String,
    pub token: ReceiptToken,
}

impl Invoice {
    /// Stamp a new invoice using the thread-local RNG.
    #[must_use]
    pub fn issue(
        store_name: impl Into<String>,
        customer: CustomerDetails,
        lines: Vec<InvoiceLine>,
        paid: Gold,
    ) -> Self {
        Self::issue_with(store_name, customer, lines, paid, &mut rand::rng())
    }

    pub fn issue_with<R: Rng>(
        store_name: impl Into<String>,
        customer: CustomerDetails,
        lines: Vec<InvoiceLine>,
        paid: Gold,
        rng: &mut R,
    ) -> Self {
        let flavor_text = FLAVOR_TEXTS[rng.random_range(0..FLAVOR_TEXTS.len())].to_string();
        let token = generate_token_with(rng);
        tracing::info!(token = %token, lines = lines.len(), "invoice issued");
        Self {
            store_name: store_name.into(),
            customer,
            lines,
            paid,
            flavor_text,
            token,
        }
    }

    #[must_use]
    pub fn total(&self) -> Gold {
        self.lines
            .iter()
            .fold(Gold::ZERO, |acc, line| acc.saturating_add(line.line_total()))
    }

    /// `paid - total`, floored at zero.
    #[must_use]
    pub fn change(&self) -> Gold {
        self.paid.checked_sub(self.total()).unwrap_or(Gold::ZERO)
    }

    /// Payload for QR encoders: `RPGRECEIPT:<token>:<total pieces>`.
    #[must_use]
    pub fn qr_payload(&self) -> String {
        format!(
            "{QR_PAYLOAD_TAG}:{}:{}",
            self.token,
            self.total().pieces()
        )
    }

    /// `Recibo_<customer name>.txt`. Whitespace runs and anything other than
    /// letters, digits, `-`, `_` and `.` become `_`, so the result is always a
    /// single path component.
    #[must_use]
    pub fn download_file_name(&self) -> String {
        let name: String = self
            .customer
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("Recibo_{name}.txt")
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^WIDTH$}", "RECIBO IMPERIAL");
        let _ = writeln!(out, "{:^WIDTH$}", "Autenticado pelo Sindicato dos Dragões");
        let _ = writeln!(out, "{:^WIDTH$}", self.store_name);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Portador: {}", self.customer.name);
        let _ = writeln!(out, "Classe:   {}", self.customer.character_class);
        if let Some(guild) = &self.customer.guild {
            let _ = writeln!(out, "Guilda:   {guild}");
        }
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "{:<NAME_COL$} {:>5} {:>11}", "Item", "Qtd", "Total");
        for line in &self.lines {
            let name: String = line.name.chars().take(NAME_COL).collect();
            let _ = writeln!(
                out,
                "{name:<NAME_COL$} {:>5} {:>11}",
                line.quantity,
                line.line_total().to_string()
            );
        }
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "{:>36}{:>12}", "Total:", self.total().to_string());
        let _ = writeln!(out, "{:>36}{:>12}", "Pago:", self.paid.to_string());
        let _ = writeln!(out, "{:>36}{:>12}", "Troco:", self.change().to_string());
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "\"{}\"", self.flavor_text);
        let _ = writeln!(out, "Token Rúnico: {}", self.token);
        let _ = write!(out, "{rule}");
        out
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceView<'a> {
    store_name: &'a str,
    customer: &'a CustomerDetails,
    lines: &'a [InvoiceLine],
    total: Gold,
    paid: Gold,
    change: Gold,
    flavor_text: &'a str,
    token: &'a ReceiptToken,
}

impl Serialize for Invoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        InvoiceView {
            store_name: &self.store_name,
            customer: &self.customer,
            lines: &self.lines,
            total: self.total(),
            paid: self.paid,
            change: self.change(),
            flavor_text: &self.flavor_text,
            token: &self.token,
        }
        .serialize(serializer)
    }
}
