//! Domain types used across the Payflow kit.

mod card;
mod credentials;
mod environment;
mod money;
mod transaction;

pub use card::*;
pub use credentials::*;
pub use environment::*;
pub use money::*;
pub use transaction::*;
