#![deny(missing_docs)]
//! This crate turns SES delivery notifications delivered over SNS into flat records and writes
//! them to a key-value store and an append-only log stream.
//! It follows the hexagonal layout: [domain] holds models, extraction, ports and services,
//! [inbound] decodes the transport and [outbound] provides the concrete sinks.

pub mod domain;
pub mod inbound;
pub mod outbound;
