//! Session persistence

pub mod store;

pub use store::SessionStore;
