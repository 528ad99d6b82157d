//! Response parsing.
//!
//! Gateway responses are flat `KEY=value` pairs joined by `&`, without the
//! length prefixes used on requests. Parsing never fails: anything that does
//! not look like a pair is skipped, and a response without a `RESULT` field is
//! simply not successful.

use indexmap::IndexMap;

/// Status and body as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }
}

/// Response fields keyed by their lower-cased name, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResult {
    fields: IndexMap<String, String>,
}

impl ParsedResult {
    pub fn parse(body: &str) -> Self {
        let fields = body
            .trim_end_matches(['\r', '\n'])
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
                let key = key.trim();
                (!key.is_empty()).then(|| (key.to_ascii_lowercase(), value.to_string()))
            })
            .collect();

        ParsedResult { fields }
    }

    /// Look a field up by name, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParsedResult {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ParsedResult {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }
}

/// Address verification results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvsResult {
    /// `AVSADDR`: street address match, `Y`, `N` or `X`.
    pub street: Option<String>,
    /// `AVSZIP`: postal code match.
    pub zip: Option<String>,
    /// `IAVS`: whether the card was issued outside the US.
    pub international: Option<String>,
}

/// A parsed gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub result: ParsedResult,
}

impl Response {
    pub fn parse(raw: &RawResponse) -> Self {
        Response {
            status: raw.status,
            result: ParsedResult::parse(&raw.body),
        }
    }

    /// The numeric `RESULT` code, as sent.
    pub fn result_code(&self) -> Option<&str> {
        self.result.get("result")
    }

    pub fn is_successful(&self) -> bool {
        self.result_code() == Some("0")
    }

    pub fn message(&self) -> Option<&str> {
        self.result.first_of(&["message", "respmsg"])
    }

    /// The reference later transactions act on: `PNREF`, or `RPREF` for
    /// recurring profiles.
    pub fn authorization_token(&self) -> Option<&str> {
        self.result.first_of(&["pn_ref", "pnref", "rp_ref", "rpref"])
    }

    /// The express checkout `TOKEN`, falling back to the authorization token.
    pub fn token(&self) -> Option<&str> {
        self.result
            .get("token")
            .or_else(|| self.authorization_token())
    }

    pub fn avs_result(&self) -> AvsResult {
        let owned = |key| self.result.get(key).map(str::to_string);
        AvsResult {
            street: owned("avsaddr"),
            zip: owned("avszip"),
            international: owned("iavs"),
        }
    }

    /// `CVV2MATCH`: security code match.
    pub fn cvv_result(&self) -> Option<&str> {
        self.result.get("cvv2match")
    }
}

impl From<RawResponse> for Response {
    fn from(raw: RawResponse) -> Self {
        Response::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> Response {
        Response::parse(&RawResponse::new(200, body))
    }

    #[test]
    fn parses_approval() {
        let approved = response("RESULT=0&PNREF=V7004C204D9A&RESPMSG=HELLOMESSAGE");
        assert_eq!(approved.result_code(), Some("0"));
        assert_eq!(approved.authorization_token(), Some("V7004C204D9A"));
        assert_eq!(approved.message(), Some("HELLOMESSAGE"));
        assert!(approved.is_successful());
        assert_eq!(approved.status, 200);
    }

    #[test]
    fn keys_are_lower_cased() {
        let parsed = response(
            "RESULT=0&PNREF=PNREFAUTH&RESPMSG=HELLOMESSAGE\
             &PREFPSMSG=Review: More than one rule was triggered for Review",
        );
        assert_eq!(parsed.result.get("pnref"), Some("PNREFAUTH"));
        assert_eq!(parsed.result.get("result"), Some("0"));
        assert_eq!(
            parsed.result.get("prefpsmsg"),
            Some("Review: More than one rule was triggered for Review")
        );
        let keys: Vec<_> = parsed.result.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["result", "pnref", "respmsg", "prefpsmsg"]);
    }

    #[test]
    fn non_zero_result_is_not_successful() {
        assert!(!response("RESULT=1&RESPMSG=User authentication failed").is_successful());
        assert!(!response("RESULT=&PNREF=X").is_successful());
    }

    #[test]
    fn message_prefers_message_field() {
        let parsed = response("RESPMSG=Approved&MESSAGE=This is the auth response message");
        assert_eq!(parsed.message(), Some("This is the auth response message"));
    }

    #[test]
    fn authorization_token_falls_back_to_rp_ref() {
        let response = Response {
            status: 200,
            result: [("result", "0"), ("rp_ref", "RP_REF")].into_iter().collect(),
        };
        assert_eq!(response.authorization_token(), Some("RP_REF"));

        let response = Response {
            status: 200,
            result: [("rp_ref", "RP_REF"), ("pn_ref", "PN_REF")].into_iter().collect(),
        };
        assert_eq!(response.authorization_token(), Some("PN_REF"));
    }

    #[test]
    fn token_prefers_express_checkout_token() {
        assert_eq!(
            response("RESULT=0&PNREF=P1&TOKEN=EC-9").token(),
            Some("EC-9")
        );
        assert_eq!(response("RESULT=0&PNREF=P1").token(), Some("P1"));
    }

    #[test]
    fn avs_and_cvv_results() {
        let verified = response("RESULT=0&AVSADDR=Y&AVSZIP=N&IAVS=X&CVV2MATCH=Y");
        assert_eq!(
            verified.avs_result(),
            AvsResult {
                street: Some("Y".into()),
                zip: Some("N".into()),
                international: Some("X".into()),
            }
        );
        assert_eq!(verified.cvv_result(), Some("Y"));

        let bare = response("RESULT=0");
        assert_eq!(bare.avs_result(), AvsResult::default());
        assert_eq!(bare.cvv_result(), None);
    }

    #[test]
    fn malformed_bodies_degrade_to_missing_data() {
        for body in ["", "garbage", "&&&", "=x&=y", "<html>500</html>"] {
            let parsed = response(body);
            assert!(!parsed.is_successful(), "{body:?}");
            assert_eq!(parsed.authorization_token(), None);
            assert_eq!(parsed.message(), None);
        }
        assert_eq!(response("garbage").result.get("garbage"), Some(""));
    }

    #[test]
    fn values_split_on_first_equals() {
        let parsed = response("RESULT=0&RESPMSG=a=b\r\n");
        assert_eq!(parsed.message(), Some("a=b"));
    }
}
