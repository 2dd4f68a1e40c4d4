//! Service layer: the refresh pipeline and the query side.
//!
//! [`RefreshScheduler`] drives [`RefreshService`], which chains the
//! [`PriceProvider`], the sentiment scorer, and the [`SnapshotWriter`].
//! [`QueryService`] reads storage independently.

pub mod price_fetcher;
pub mod query_service;
pub mod refresh_service;
pub mod scheduler;
pub mod snapshot_writer;

pub use price_fetcher::{CoinGeckoClient, PriceMap, PriceProvider};
pub use query_service::{CoinHistory, HISTORY_LIMIT, QueryService};
pub use refresh_service::{RefreshReport, RefreshService};
pub use scheduler::RefreshScheduler;
pub use snapshot_writer::SnapshotWriter;
