//! Core types and trait definitions for the clan registry.
//!
//! No HTTP or database dependencies live here. Backends implement
//! [`store::ClanStore`] and [`directory::ClanDirectory`]; everything above
//! them talks to [`registry::Registry`].

pub mod clan;
pub mod country;
pub mod directory;
pub mod error;
pub mod registry;
pub mod store;

pub use error::{Error, Result};
