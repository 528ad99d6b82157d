use serde::{Deserialize, Serialize};

/// Which Payflow environment requests are aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// The pilot (sandbox) gateway.
    Test,
    #[default]
    Live,
}

impl Environment {
    pub const TEST_HOST: &'static str = "pilot-payflowpro.paypal.com";
    pub const LIVE_HOST: &'static str = "payflowpro.paypal.com";

    pub const TEST_CHECKOUT_BASE: &'static str = "http://localhost:3000";
    pub const LIVE_CHECKOUT_BASE: &'static str = "https://www.paypal.com/checkoutnow";

    pub fn from_test_flag(test: bool) -> Self {
        if test {
            Environment::Test
        } else {
            Environment::Live
        }
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Environment::Test)
    }

    /// Gateway host, also sent as the `Host` header.
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Test => Self::TEST_HOST,
            Environment::Live => Self::LIVE_HOST,
        }
    }

    /// Base URL for the express checkout return and cancel URLs.
    pub fn checkout_base(&self) -> &'static str {
        match self {
            Environment::Test => Self::TEST_CHECKOUT_BASE,
            Environment::Live => Self::LIVE_CHECKOUT_BASE,
        }
    }
}
