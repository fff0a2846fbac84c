//! # Arena Server
//!
//! Backend for the AI trading arena dashboard. Three AI models trade from
//! their own vaults during a season; this crate keeps a single reducer-driven
//! store of everything the dashboard renders and serves it over HTTP.
//!
//! ## Architecture
//! - `store`: state, actions, the pure reducer and the dispatching store
//! - `models`: vaults, seasons, live events and market data
//! - `adapter`: turns on-chain objects into models and derives live events
//! - `chain`: RPC node, object storage, price API and wallet collaborators
//! - `sync`: background loop feeding the store from the chain
//! - `routes` / `server`: the HTTP API
//! - `config`: environment configuration

pub mod adapter;
pub mod chain;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod server;
pub mod store;
pub mod sync;

pub use error::{ArenaError, Result};
pub use store::{AppAction, AppState, AppStore, Reducer, StoreConfig, TimeRange};
