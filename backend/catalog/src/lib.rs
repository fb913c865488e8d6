//! # Catalog
//!
//! Shared model of the perk sharing platform. No I/O lives here, only the records every crate in
//! the backend agrees on and the rules that need no storage to evaluate.
//!
//! - [`perks`]: perks, membership types and users as they are stored
//! - [`votes`]: per session vote toggling
//! - [`payloads`]: JSON requests/responses exchanged with the frontend
//! - [`defaults`]: membership types and demo perks loaded into an empty deployment
pub mod defaults;
pub mod error;
pub mod payloads;
pub mod perks;
pub mod utils;
pub mod votes;
