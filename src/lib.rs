//! # Payflow Kit
//!
//! A client for the Payflow Pro name-value-pair gateway.
//!
//! Every verb on [`Gateway`](gateway::Gateway) runs the same pipeline:
//!
//! 1. **Build**: [`request::build`] picks the fields for the transaction kind
//!    and card presentation into a [`FieldSet`](fields::FieldSet).
//! 2. **Encode**: [`codec::encode`] appends the merchant credentials and frames
//!    each field as `KEY[len]=value`.
//! 3. **Send**: a [`Transport`](transport::Transport) posts the body. The
//!    default [`HttpTransport`](transport::HttpTransport) uses `reqwest`; the
//!    `mock` option skips the network entirely.
//! 4. **Parse**: [`Response`](response::Response) reads the flat `KEY=value`
//!    answer and exposes success, message, tokens and AVS/CVV results.
//!
//! ## Quick Start
//!
//! ```no_run
//! use payflow_kit::{
//!     config::GatewayConfig,
//!     gateway::Gateway,
//!     request::TransactionOptions,
//!     transport::HttpTransport,
//!     types::{CardBrand, CardInput, Credentials, Environment, Money},
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::builder()
//!     .credentials(Credentials::new("login", "PayPal", "password", None)?)
//!     .environment(Environment::Test)
//!     .build()
//!     .with_env_override()?;
//!
//! let gateway = Gateway::new(config, HttpTransport::new());
//!
//! let card = CardInput::builder()
//!     .brand(CardBrand::Visa)
//!     .number("4111111111111111")
//!     .month(12)
//!     .year(2030)
//!     .security_code("123")
//!     .build();
//!
//! let response = gateway
//!     .authorize(Money::try_from("19.99")?, card, TransactionOptions::default())
//!     .await?;
//!
//! if response.is_successful() {
//!     let pnref = response.authorization_token().unwrap_or_default().to_string();
//!     gateway
//!         .capture(Money::try_from("19.99")?, pnref, TransactionOptions::default())
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`], [`fields`], [`codec`], [`request`], [`response`]: re-exported
//!   from `payflow-core`, usable without any transport.
//! - [`config`]: gateway configuration and endpoint selection.
//! - [`transport`]: the [`Transport`](transport::Transport) trait and its HTTP
//!   implementation.
//! - [`gateway`]: the verb facade.
//! - [`errors`]: request and gateway errors.

pub mod types {
    pub use payflow_core::types::*;
}

pub mod fields {
    pub use payflow_core::fields::*;
}

pub mod codec {
    pub use payflow_core::codec::*;
}

pub mod request {
    pub use payflow_core::request::*;
}

pub mod response {
    pub use payflow_core::response::*;
}

pub mod config;
pub mod errors;
pub mod gateway;
pub mod mock;
pub mod transport;
