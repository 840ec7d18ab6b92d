//! Models shared by the extractor, the services and the adapters

mod diagnostic;
mod notification;
mod record;

pub use diagnostic::*;
pub use notification::*;
pub use record::*;
