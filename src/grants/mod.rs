//! Grant records and the store façade
//!
//! A grant is one persisted security artifact: an authorization code, a
//! refresh token, a consent record, a device code. Its payload is opaque;
//! this crate only keys, filters and expires it.

mod record;
mod store;

pub use record::{Grant, GrantFilter};
pub use store::GrantStore;
