//! # memecoin-pulse
//!
//! Periodically fetches memecoin prices, attaches a mock sentiment score to
//! each tracked coin, appends the result to a local SQLite table, and serves
//! the latest and recent snapshots over a small REST API.
//!
//! ## Architecture
//!
//! ```text
//! RefreshScheduler (service/)          HTTP clients
//!     │                                     │
//!     └── RefreshService                    ├── REST Handlers (api/)
//!           ├── PriceProvider (CoinGecko)   │
//!           ├── SentimentScorer (sentiment/)└── QueryService (service/)
//!           └── SnapshotWriter                    │
//!                 │                               │
//!                 └──── SQLite (persistence/) ────┘
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod sentiment;
pub mod service;
