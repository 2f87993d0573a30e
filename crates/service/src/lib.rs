//! Service layer owning the in-memory items collection.
//! - Keeps validation next to the data it guards.
//! - Exposes a cloneable, lock-guarded store for the HTTP layer.

pub mod errors;
pub mod items;
