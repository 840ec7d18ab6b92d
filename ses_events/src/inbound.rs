//! Inbound adapters. Things in the outside world that call into us.

pub mod sns;
