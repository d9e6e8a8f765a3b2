//! Posterforged - poster/backdrop aggregation and selection engine
//!
//! Fetches candidate artwork from a canonical metadata API and a fleet of
//! scraped OTT platforms, normalizes everything into one record shape, and
//! drives a paginated, session-backed selection flow for a chat frontend.
//! The chat transport itself is an external collaborator; it talks to this
//! crate through [`engine::PosterEngine`].

pub mod aggregate;
pub mod caption;
pub mod config;
pub mod engine;
pub mod pagination;
pub mod posters;
pub mod providers;
pub mod session;
