//! Card inputs and the facts the request builder reads from them.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Card brands with a Payflow `CARDTYPE` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Master,
    Discover,
    AmericanExpress,
    DinersClub,
    Jcb,
}

impl CardBrand {
    pub const ALL: [CardBrand; 6] = [
        CardBrand::Visa,
        CardBrand::Master,
        CardBrand::Discover,
        CardBrand::AmericanExpress,
        CardBrand::DinersClub,
        CardBrand::Jcb,
    ];

    /// The numeric `CARDTYPE` code.
    pub const fn wire_code(&self) -> u8 {
        match self {
            CardBrand::Visa => 0,
            CardBrand::Master => 1,
            CardBrand::Discover => 2,
            CardBrand::AmericanExpress => 3,
            CardBrand::DinersClub => 4,
            CardBrand::Jcb => 5,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Master => "master",
            CardBrand::Discover => "discover",
            CardBrand::AmericanExpress => "american_express",
            CardBrand::DinersClub => "diners_club",
            CardBrand::Jcb => "jcb",
        }
    }

    /// Look a brand up by its snake case name, e.g. `american_express`.
    ///
    /// Returns `None` for blank or unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|brand| brand.name() == name)
    }
}

/// How the card data reached the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardPresentation {
    /// Number, expiry and optional security code typed in.
    Keyed,
    /// Raw track 2 read from the magnetic stripe.
    Swiped,
    /// Track data encrypted by a MagTek reader.
    Encrypted,
}

/// Raw card attributes as captured by the caller.
///
/// Brand detection and reader output are taken as given; the presentation
/// mode is derived from which attributes are populated.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInput {
    pub brand: Option<CardBrand>,
    #[builder(into)]
    pub number: Option<String>,
    #[builder(with = |value: impl ToString| value.to_string())]
    pub month: Option<String>,
    #[builder(with = |value: impl ToString| value.to_string())]
    pub year: Option<String>,
    #[builder(into)]
    pub security_code: Option<String>,
    /// Track 2 data, clear for swiped cards and encrypted for MagTek readers.
    #[builder(into)]
    pub track2: Option<String>,
    /// Encrypted MagnePrint block.
    #[builder(into)]
    pub mp: Option<String>,
    #[builder(into)]
    pub device_sn: Option<String>,
    #[builder(into)]
    pub mpstatus: Option<String>,
    /// Key serial number of the encrypting reader.
    #[builder(into)]
    pub ksn: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl CardInput {
    pub fn presentation(&self) -> CardPresentation {
        if present(&self.ksn).is_some() || present(&self.mp).is_some() {
            CardPresentation::Encrypted
        } else if present(&self.track2).is_some() {
            CardPresentation::Swiped
        } else {
            CardPresentation::Keyed
        }
    }

    /// The `CARDTYPE` value, empty when the brand is unknown.
    pub fn card_type(&self) -> String {
        self.brand
            .map(|brand| brand.wire_code().to_string())
            .unwrap_or_default()
    }

    /// The `EXPDATE` value in `MMYY` form, empty when it cannot be formatted.
    pub fn expiration_date(&self) -> String {
        format_expiration(
            self.month.as_deref().unwrap_or_default(),
            self.year.as_deref().unwrap_or_default(),
        )
    }

    /// The security code, if one was captured.
    pub fn security_code(&self) -> Option<&str> {
        present(&self.security_code)
    }
}

/// Format a month and year as `MMYY`.
///
/// Leading zeros are stripped before parsing, each part is padded to two
/// digits and only the last two digits of the year are kept. Any part that is
/// not a number yields an empty string.
pub fn format_expiration(month: &str, year: &str) -> String {
    fn two_digits(value: &str) -> Option<String> {
        let stripped = value.trim().trim_start_matches('0');
        let number: u32 = stripped.parse().ok()?;
        Some(format!("{number:02}"))
    }

    match (two_digits(month), two_digits(year)) {
        (Some(month), Some(year)) => format!("{month}{}", &year[year.len() - 2..]),
        _ => String::new(),
    }
}
