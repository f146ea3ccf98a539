//! Data models for the Zammad API.
//!
//! Backend records are opaque mappings: the structs here expose only the
//! fields the adapter inspects and carry everything else unchanged in a
//! flattened map, so no ticket data is lost or reshaped in transit.

mod article;
mod attachment;
mod priority;
mod ticket;

pub use article::*;
pub use attachment::*;
pub use priority::*;
pub use ticket::*;
