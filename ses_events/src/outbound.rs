//! This module defines concrete implementations of the required outbound ports
//! Outbounds ports are things in the outside world that we reach out to

#[cfg(feature = "cloudwatch")]
pub mod cloudwatch;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub mod diagnostics;
pub mod time;
