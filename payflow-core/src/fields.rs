//! The ordered field set a request is accumulated into before encoding.

use std::{borrow::Cow, fmt::Display};

use indexmap::IndexMap;

use crate::{
    errors::{Error, Result},
    types::Money,
};

/// Request fields written by the request builder and the encoder.
///
/// Every internally written key is one of these, so the set of keys a
/// transaction kind can produce is closed. Caller supplied pairs are the only
/// open-ended keys and go through [`FieldSet::set_pair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TrxType,
    Action,
    Tender,
    Amount,
    Currency,
    OrigId,
    CardType,
    Account,
    ExpDate,
    Cvv2,
    Swipe,
    SwipedEcrHost,
    EncTrack2,
    EncMp,
    DeviceSn,
    MpStatus,
    EncryptionBlockType,
    RegisteredBy,
    Ksn,
    MagtekCardType,
    ReturnUrl,
    CancelUrl,
    OrderDesc,
    InvoiceNumber,
    Token,
    PayerId,
    TaxAmount,
    ItemAmount,
    FreightAmount,
    Discount,
    CaptureComplete,
    LineName(usize),
    LineDesc(usize),
    LineItemNumber(usize),
    LineCost(usize),
    LineTaxAmount(usize),
    LineQuantity(usize),
    Vendor,
    Partner,
    Password,
    User,
}

impl Field {
    /// The field key as written into the set, before wire normalization.
    pub fn key(&self) -> Cow<'static, str> {
        let key = match self {
            Field::TrxType => "trxtype",
            Field::Action => "action",
            Field::Tender => "tender",
            Field::Amount => "amt",
            Field::Currency => "currency",
            Field::OrigId => "origid",
            Field::CardType => "card_type",
            Field::Account => "acct",
            Field::ExpDate => "expdate",
            Field::Cvv2 => "cvv2",
            Field::Swipe => "swipe",
            Field::SwipedEcrHost => "swiped_ecr_host",
            Field::EncTrack2 => "enctrack2",
            Field::EncMp => "encmp",
            Field::DeviceSn => "devicesn",
            Field::MpStatus => "mpstatus",
            Field::EncryptionBlockType => "encryption_block_type",
            Field::RegisteredBy => "registered_by",
            Field::Ksn => "ksn",
            Field::MagtekCardType => "magtek_card_type",
            Field::ReturnUrl => "returnurl",
            Field::CancelUrl => "cancelurl",
            Field::OrderDesc => "orderdesc",
            Field::InvoiceNumber => "invnum",
            Field::Token => "token",
            Field::PayerId => "payerid",
            Field::TaxAmount => "taxamt",
            Field::ItemAmount => "itemamt",
            Field::FreightAmount => "freightamt",
            Field::Discount => "discount",
            Field::CaptureComplete => "capturecomplete",
            Field::LineName(i) => return Cow::Owned(format!("l_name{i}")),
            Field::LineDesc(i) => return Cow::Owned(format!("l_desc{i}")),
            Field::LineItemNumber(i) => return Cow::Owned(format!("l_itemnumber{i}")),
            Field::LineCost(i) => return Cow::Owned(format!("l_cost{i}")),
            Field::LineTaxAmount(i) => return Cow::Owned(format!("l_taxamt{i}")),
            Field::LineQuantity(i) => return Cow::Owned(format!("l_qty{i}")),
            Field::Vendor => "vendor",
            Field::Partner => "partner",
            Field::Password => "pwd",
            Field::User => "user",
        };
        Cow::Borrowed(key)
    }

    pub fn wire_key(&self) -> String {
        wire_key(&self.key())
    }
}

/// Normalize a field key the way the gateway reads it: underscores removed,
/// upper-cased.
pub fn wire_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Money(Money),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Money(m) => write!(f, "{m}"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<Money> for FieldValue {
    fn from(value: Money) -> Self {
        FieldValue::Money(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: FieldValue,
}

/// Ordered request fields, keyed by their normalized wire key.
///
/// Insertion order is preserved. Rewriting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: IndexMap<String, Entry>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an internal field. Internal writes always win, replacing any
    /// earlier value on the same wire key in place.
    pub fn set(&mut self, field: Field, value: impl Into<FieldValue>) {
        let key = field.key();
        self.entries.insert(
            wire_key(&key),
            Entry {
                key: key.into_owned(),
                value: value.into(),
            },
        );
    }

    /// Write a caller supplied pair.
    ///
    /// Rewriting the same key replaces its value. A different key that
    /// normalizes to an occupied wire key is rejected, as is any key that is
    /// not made of ASCII letters, digits and underscores.
    pub fn set_pair(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<()> {
        let valid = key.chars().any(|c| c.is_ascii_alphanumeric())
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(Error::InvalidFieldKey(key.to_string()));
        }

        let wire = wire_key(key);
        if let Some(existing) = self.entries.get(&wire) {
            if existing.key != key {
                return Err(Error::KeyCollision {
                    key: key.to_string(),
                    existing: existing.key.clone(),
                    wire_key: wire,
                });
            }
        }

        self.entries.insert(
            wire,
            Entry {
                key: key.to_string(),
                value: value.into(),
            },
        );
        Ok(())
    }

    /// Write a field at the end of the set, dropping any earlier entry on the
    /// same wire key.
    pub fn set_last(&mut self, field: Field, value: impl Into<FieldValue>) {
        let key = field.key();
        let wire = wire_key(&key);
        self.entries.shift_remove(&wire);
        self.entries.insert(
            wire,
            Entry {
                key: key.into_owned(),
                value: value.into(),
            },
        );
    }

    /// Look a value up by any spelling of its key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.get(&wire_key(key)).map(|e| &e.value)
    }

    pub fn get_field(&self, field: Field) -> Option<&FieldValue> {
        self.get(&field.key())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&wire_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields in insertion order, with the key as it was written.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.values().map(|e| (e.key.as_str(), &e.value))
    }

    /// Fields in insertion order, with normalized wire keys.
    pub fn wire_pairs(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(wire, e)| (wire.as_str(), &e.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_wire_keys() {
        assert_eq!(wire_key("swiped_ecr_host"), "SWIPEDECRHOST");
        assert_eq!(Field::CardType.wire_key(), "CARDTYPE");
        assert_eq!(Field::LineItemNumber(3).wire_key(), "LITEMNUMBER3");
    }

    #[test]
    fn keeps_insertion_order_and_position_on_rewrite() {
        let mut fields = FieldSet::new();
        fields.set(Field::TrxType, "S");
        fields.set_pair("comment1", "VERIFY").unwrap();
        fields.set(Field::Tender, "C");
        fields.set(Field::TrxType, "A");

        let keys: Vec<_> = fields.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["trxtype", "comment1", "tender"]);
        assert_eq!(fields.get("TRXTYPE"), Some(&FieldValue::from("A")));
    }

    #[test]
    fn internal_writes_override_pairs() {
        let mut fields = FieldSet::new();
        fields.set_pair("tender", "X").unwrap();
        fields.set(Field::Tender, "C");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get_field(Field::Tender), Some(&FieldValue::from("C")));
    }

    #[test]
    fn same_pair_key_rewrites() {
        let mut fields = FieldSet::new();
        fields.set_pair("comment1", "a").unwrap();
        fields.set_pair("comment1", "b").unwrap();
        assert_eq!(fields.get("comment1"), Some(&FieldValue::from("b")));
    }

    #[test]
    fn colliding_pair_keys_are_rejected() {
        let mut fields = FieldSet::new();
        fields.set_pair("comment_1", "a").unwrap();
        let err = fields.set_pair("COMMENT1", "b").unwrap_err();
        assert_eq!(
            err,
            Error::KeyCollision {
                key: "COMMENT1".to_string(),
                existing: "comment_1".to_string(),
                wire_key: "COMMENT1".to_string(),
            }
        );
        assert_eq!(fields.get("comment1"), Some(&FieldValue::from("a")));
    }

    #[test]
    fn unframeable_keys_are_rejected() {
        let mut fields = FieldSet::new();
        for key in ["", "_", "a=b", "a&b", "amt[2]", "na me"] {
            assert_eq!(
                fields.set_pair(key, "x"),
                Err(Error::InvalidFieldKey(key.to_string()))
            );
        }
        assert!(fields.is_empty());
    }

    #[test]
    fn set_last_moves_to_the_end() {
        let mut fields = FieldSet::new();
        fields.set_pair("vendor", "caller").unwrap();
        fields.set(Field::TrxType, "S");
        fields.set_last(Field::Vendor, "merchant");

        let pairs: Vec<_> = fields
            .wire_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("TRXTYPE".to_string(), "S".to_string()),
                ("VENDOR".to_string(), "merchant".to_string()),
            ]
        );
    }
}
