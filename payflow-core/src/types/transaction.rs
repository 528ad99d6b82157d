use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::types::CardInput;

/// The transaction kinds understood by the Payflow gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Authorization,
    Capture,
    Void,
    Credit,
    Inquire,
    GenerateToken,
    CheckoutDetails,
    CheckoutPayment,
    PaypalSale,
}

impl TransactionKind {
    /// The one-letter `TRXTYPE` code sent on the wire.
    pub const fn trx_type(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "S",
            TransactionKind::Authorization => "A",
            TransactionKind::Capture => "D",
            TransactionKind::Void => "V",
            TransactionKind::Credit => "C",
            TransactionKind::Inquire => "I",
            TransactionKind::GenerateToken
            | TransactionKind::CheckoutDetails
            | TransactionKind::CheckoutPayment
            | TransactionKind::PaypalSale => "S",
        }
    }

    /// The express checkout `ACTION` code, for the kinds that carry one.
    pub const fn action(&self) -> Option<&'static str> {
        match self {
            TransactionKind::CheckoutDetails => Some("G"),
            TransactionKind::CheckoutPayment | TransactionKind::PaypalSale => Some("D"),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Authorization => "authorization",
            TransactionKind::Capture => "capture",
            TransactionKind::Void => "void",
            TransactionKind::Credit => "credit",
            TransactionKind::Inquire => "inquire",
            TransactionKind::GenerateToken => "generate_token",
            TransactionKind::CheckoutDetails => "checkout_details",
            TransactionKind::CheckoutPayment => "checkout_payment",
            TransactionKind::PaypalSale => "paypal_sale",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Payment method category sent as `TENDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tender {
    /// Credit card, also used for every reference transaction.
    Card,
    /// PayPal token based flows.
    Paypal,
}

impl Tender {
    pub const fn code(&self) -> &'static str {
        match self {
            Tender::Card => "C",
            Tender::Paypal => "P",
        }
    }
}

/// What a transaction is charged against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The `PNREF` of a prior transaction.
    Reference(String),
    /// Fresh card data.
    Card(CardInput),
}

impl Subject {
    pub fn reference(reference: impl Into<String>) -> Self {
        Subject::Reference(reference.into())
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Subject::Reference(r) => Some(r),
            Subject::Card(_) => None,
        }
    }

    pub fn as_card(&self) -> Option<&CardInput> {
        match self {
            Subject::Card(card) => Some(card),
            Subject::Reference(_) => None,
        }
    }
}

impl From<CardInput> for Subject {
    fn from(card: CardInput) -> Self {
        Subject::Card(card)
    }
}

impl From<String> for Subject {
    fn from(reference: String) -> Self {
        Subject::Reference(reference)
    }
}

impl From<&str> for Subject {
    fn from(reference: &str) -> Self {
        Subject::Reference(reference.to_string())
    }
}
