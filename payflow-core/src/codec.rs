//! The Payflow length-prefixed NVP request format.
//!
//! Requests are framed as `KEY[len]=value` segments joined by `&`, where `len`
//! is the number of characters in `value`. Values are not URL-encoded; the
//! length prefix is what delimits them, so a value may itself contain `&` or
//! `=`.
//!
//! ```
//! use payflow_core::{
//!     codec::encode,
//!     fields::{Field, FieldSet},
//!     types::Credentials,
//! };
//!
//! let mut fields = FieldSet::new();
//! fields.set(Field::TrxType, "S");
//! fields.set(Field::Amount, "1.00");
//!
//! let credentials = Credentials::new("login", "PayPal", "pwd", None).unwrap();
//! let body = encode(&fields, &credentials);
//!
//! assert_eq!(
//!     body.as_str(),
//!     "TRXTYPE[1]=S&AMT[4]=1.00&VENDOR[5]=login&PARTNER[6]=PayPal&PWD[3]=pwd&USER[5]=login"
//! );
//! ```

use std::fmt::Display;

use crate::{
    errors::{Error, Result},
    fields::{Field, FieldSet},
    types::Credentials,
};

/// An encoded request body, ready to be posted to the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedRequestBody(String);

impl EncodedRequestBody {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for EncodedRequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for EncodedRequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The body carries the merchant password and card data.
        write!(f, "EncodedRequestBody({} bytes)", self.0.len())
    }
}

impl From<EncodedRequestBody> for String {
    fn from(body: EncodedRequestBody) -> Self {
        body.0
    }
}

/// Encode a field set with the merchant credentials appended last.
///
/// The caller's set is left untouched, so encoding the same set twice gives
/// the same body.
pub fn encode(fields: &FieldSet, credentials: &Credentials) -> EncodedRequestBody {
    let mut fields = fields.clone();
    fields.set_last(Field::Vendor, credentials.login());
    fields.set_last(Field::Partner, credentials.partner());
    fields.set_last(Field::Password, credentials.password());
    fields.set_last(Field::User, credentials.user());

    let body = fields
        .wire_pairs()
        .map(|(key, value)| {
            let value = value.to_string();
            format!("{key}[{}]={value}", value.chars().count())
        })
        .collect::<Vec<_>>()
        .join("&");

    EncodedRequestBody(body)
}

/// Decode a length-prefixed body back into its wire keys and values.
pub fn decode(body: &str) -> Result<Vec<(String, String)>> {
    let malformed = |offset, reason| Error::MalformedBody { offset, reason };

    let mut pairs = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];
        let open = rest
            .find('[')
            .ok_or_else(|| malformed(pos, "missing length prefix"))?;
        let key = &rest[..open];
        if key.is_empty() || key.contains(['&', '=']) {
            return Err(malformed(pos, "invalid key"));
        }

        let after_open = &rest[open + 1..];
        let close = after_open
            .find(']')
            .ok_or_else(|| malformed(pos + open, "unterminated length prefix"))?;
        let len: usize = after_open[..close]
            .parse()
            .map_err(|_| malformed(pos + open + 1, "invalid length"))?;

        let value_start = pos + open + 1 + close + 1;
        if !body[value_start..].starts_with('=') {
            return Err(malformed(value_start, "expected '='"));
        }
        let value_start = value_start + 1;

        let value_rest = &body[value_start..];
        let value_len = match value_rest.char_indices().nth(len) {
            Some((byte, _)) => byte,
            None if value_rest.chars().count() == len => value_rest.len(),
            None => return Err(malformed(value_start, "value shorter than its length")),
        };
        pairs.push((key.to_string(), value_rest[..value_len].to_string()));

        pos = value_start + value_len;
        if pos < body.len() {
            if !body[pos..].starts_with('&') {
                return Err(malformed(pos, "expected '&'"));
            }
            pos += 1;
            if pos == body.len() {
                return Err(malformed(pos, "trailing '&'"));
            }
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Money;

    fn credentials() -> Credentials {
        Credentials::new("login", "PayPal", "password", Some("user".into())).unwrap()
    }

    #[test]
    fn encodes_in_insertion_order_with_credentials_last() {
        let mut fields = FieldSet::new();
        fields.set(Field::TrxType, "A");
        fields.set(Field::Amount, Money::from(10u32));
        fields.set(Field::CardType, "");

        let body = encode(&fields, &credentials());
        assert_eq!(
            body.as_str(),
            "TRXTYPE[1]=A&AMT[5]=10.00&CARDTYPE[0]=&VENDOR[5]=login&PARTNER[6]=PayPal\
             &PWD[8]=password&USER[4]=user"
        );
    }

    #[test]
    fn credentials_override_caller_values_and_stay_last() {
        let mut fields = FieldSet::new();
        fields.set_pair("user", "spoofed").unwrap();
        fields.set_pair("pwd", "guess").unwrap();
        fields.set(Field::TrxType, "S");

        let body = encode(&fields, &credentials());
        assert_eq!(
            body.as_str(),
            "TRXTYPE[1]=S&VENDOR[5]=login&PARTNER[6]=PayPal&PWD[8]=password&USER[4]=user"
        );
    }

    #[test]
    fn encoding_is_pure() {
        let mut fields = FieldSet::new();
        fields.set(Field::TrxType, "S");

        let first = encode(&fields, &credentials());
        let second = encode(&fields, &credentials());
        assert_eq!(first, second);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn values_are_not_url_encoded() {
        let mut fields = FieldSet::new();
        fields.set(Field::OrderDesc, "a&b=c");
        let body = encode(&fields, &credentials());
        assert!(body.as_str().starts_with("ORDERDESC[5]=a&b=c&VENDOR"));
    }

    #[test]
    fn length_counts_characters() {
        let mut fields = FieldSet::new();
        fields.set(Field::OrderDesc, "café");
        let body = encode(&fields, &credentials());
        assert!(body.as_str().starts_with("ORDERDESC[4]=café&"));
    }

    #[test]
    fn decode_honors_length_prefix() {
        let mut fields = FieldSet::new();
        fields.set(Field::TrxType, "S");
        fields.set(Field::OrderDesc, "a&b=c [x]");
        fields.set(Field::Cvv2, "");

        let body = encode(&fields, &credentials());
        let decoded = decode(body.as_str()).unwrap();
        assert_eq!(decoded[0], ("TRXTYPE".to_string(), "S".to_string()));
        assert_eq!(decoded[1], ("ORDERDESC".to_string(), "a&b=c [x]".to_string()));
        assert_eq!(decoded[2], ("CVV2".to_string(), String::new()));
        assert_eq!(decoded[6], ("USER".to_string(), "user".to_string()));
        assert_eq!(decoded.len(), 7);
    }

    #[test]
    fn decode_empty_body() {
        assert_eq!(decode("").unwrap(), Vec::new());
    }

    #[test]
    fn decode_rejects_bad_framing() {
        for body in [
            "TRXTYPE=S",
            "TRXTYPE[x]=S",
            "TRXTYPE[2]=S",
            "TRXTYPE[1]S",
            "TRXTYPE[1]=SX",
            "TRXTYPE[1]=S&",
            "[1]=S",
        ] {
            assert!(
                matches!(decode(body), Err(Error::MalformedBody { .. })),
                "{body} should not decode"
            );
        }
    }
}
