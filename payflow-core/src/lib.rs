//! Payflow core library.
//!
//! This library provides the transport-agnostic pieces of the Payflow Pro NVP
//! protocol: typed request inputs, the request builder, the length-prefixed
//! wire codec and the response parser.

pub mod codec;
pub mod errors;
pub mod fields;
pub mod request;
pub mod response;
pub mod types;
