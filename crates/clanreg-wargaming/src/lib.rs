//! Wargaming collaborators: the public clan directory API and the clan
//! profile pages.
//!
//! [`WargamingClient`] implements
//! [`ClanDirectory`](clanreg_core::directory::ClanDirectory),
//! [`ClanSearch`](clanreg_core::directory::ClanSearch) and
//! [`LanguageDiscovery`](clanreg_core::directory::LanguageDiscovery).

mod client;
pub mod error;
mod info;
mod profile;
mod search;

pub use client::{WargamingClient, WargamingConfig};
pub use error::{Error, Result};
pub use info::parse_clan_info;
pub use profile::extract_languages;
pub use search::parse_clan_search;
