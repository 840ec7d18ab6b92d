//! The domain of delivery events: what a notification is, which fields we pull out of it and the
//! services that push those fields into the sinks.

pub mod extract;
pub mod models;
pub mod ports;
pub mod services;
