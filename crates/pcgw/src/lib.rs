//! PCGamingWiki client for save-location lookup.
//!
//! Fetches a title's wiki article by Steam appid, extracts the rows of the
//! "Save game data location" table that apply to Windows/Steam, and
//! normalizes each location into a placeholder path template.

pub mod client;
pub mod extract;
pub mod normalize;

pub use client::{Client, Error};
pub use extract::save_paths_from_html;
pub use normalize::{PLACEHOLDERS, normalize};
