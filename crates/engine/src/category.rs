use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Fixed expense classification used for the per-category breakdown.
///
/// The set is closed: anything outside the six canonical codes is rejected at
/// construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "FOOD")]
    Food,
    #[serde(rename = "TRANS")]
    Transport,
    #[serde(rename = "STAY")]
    Stay,
    #[serde(rename = "SHOP")]
    Shopping,
    #[serde(rename = "TICKET")]
    Ticket,
    #[serde(rename = "ETC")]
    Etc,
}

impl Category {
    /// All categories in declaration order, which is also report order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Stay,
        Category::Shopping,
        Category::Ticket,
        Category::Etc,
    ];

    /// Canonical category code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Transport => "TRANS",
            Category::Stay => "STAY",
            Category::Shopping => "SHOP",
            Category::Ticket => "TICKET",
            Category::Etc => "ETC",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Category {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FOOD" => Ok(Category::Food),
            "TRANS" => Ok(Category::Transport),
            "STAY" => Ok(Category::Stay),
            "SHOP" => Ok(Category::Shopping),
            "TICKET" => Ok(Category::Ticket),
            "ETC" => Ok(Category::Etc),
            other => Err(LedgerError::UnknownCategory(other.to_string())),
        }
    }
}

/// How an expense was paid. Informational only, never used in computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayMethod {
    Card,
    Cash,
    Qr,
}

impl PayMethod {
    /// Canonical method code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            PayMethod::Card => "CARD",
            PayMethod::Cash => "CASH",
            PayMethod::Qr => "QR",
        }
    }
}

impl core::fmt::Display for PayMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for PayMethod {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CARD" => Ok(PayMethod::Card),
            "CASH" => Ok(PayMethod::Cash),
            "QR" => Ok(PayMethod::Qr),
            other => Err(LedgerError::UnknownMethod(other.to_string())),
        }
    }
}
