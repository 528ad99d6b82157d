//! Synthetic gateway answers for the `mock` option.

use crate::{
    codec::{EncodedRequestBody, decode},
    errors::Result,
    response::RawResponse,
};

/// Answer an encoded request with an approval, without contacting the
/// gateway.
///
/// The body is decoded first, so a request that would not survive the wire
/// framing fails here too. `TRXTYPE`, `AMT` and `TOKEN` are echoed back and
/// the `PNREF` is derived from the request id.
pub fn mock_response(body: &EncodedRequestBody, request_id: &str) -> Result<RawResponse> {
    let pairs = decode(body.as_str())?;
    let echoed = ["TRXTYPE", "AMT", "TOKEN"].into_iter().filter_map(|key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(k, v)| format!("{k}={v}"))
    });

    let pnref: String = request_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(11)
        .collect::<String>()
        .to_ascii_uppercase();

    let response = [
        "RESULT=0".to_string(),
        format!("PNREF=M{pnref}"),
        "RESPMSG=Approved".to_string(),
    ]
    .into_iter()
    .chain(echoed)
    .collect::<Vec<_>>()
    .join("&");

    Ok(RawResponse::new(200, response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::encode,
        fields::{Field, FieldSet},
        response::Response,
        types::{Credentials, Money},
    };

    #[test]
    fn approves_and_echoes_request() {
        let mut fields = FieldSet::new();
        fields.set(Field::TrxType, "A");
        fields.set(Field::Amount, Money::from(1u32));
        let credentials = Credentials::new("login", "PayPal", "secret", None).unwrap();
        let body = encode(&fields, &credentials);

        let raw = mock_response(&body, "ab+c/d=12345678901234").unwrap();
        assert_eq!(
            raw.body,
            "RESULT=0&PNREF=MABCD1234567&RESPMSG=Approved&TRXTYPE=A&AMT=1.00"
        );

        let response = Response::parse(&raw);
        assert!(response.is_successful());
        assert_eq!(response.authorization_token(), Some("MABCD1234567"));
        assert!(response.result.get("pwd").is_none());
    }
}
