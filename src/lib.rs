//! Card browser for the Star Wars Unlimited card database.
//!
//! The library holds the upstream client ([`api::CardApi`]), the record
//! normalizer, the HP range filter and sort engine, and the local proxy
//! ([`server::create_router`]) that serves a mirrored dataset.

pub mod api;
pub mod browse;
pub mod card;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod routes;
pub mod server;

pub use api::{CardApi, CardQuery};
pub use card::{CardRecord, RawCard};
pub use config::{ClientConfig, ProxyConfig, ResponseEnvelope};
pub use error::{AppError, ErrorKind, FetchError};
pub use server::{create_router, AppState};
