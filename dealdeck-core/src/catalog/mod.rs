//! dealdeck catalog - deal records, view criteria and the result pipeline
//!
//! # Overview
//!
//! The catalog holds at most [`MAX_GAMES`] deals fetched from the deals API
//! and projects them through the user's store filter and sort order:
//!
//! ```text
//! DealsGateway ──fetch──▶ CatalogPipeline ──derive──▶ View
//!  (list/search/detail)    ResultSet + ViewCriteria    (cards, banners, modal)
//! ```
//!
//! Loads and searches replace the result set wholesale. Filtering and sorting
//! never touch the network; they re-derive from the result set in memory.

mod card;
mod criteria;
mod pipeline;
mod record;
pub mod stores;

pub use card::{format_price, DealCard, DetailCard};
pub use criteria::{derive_view, SortKey, ViewCriteria};
pub use pipeline::{CatalogPipeline, LoadOutcome, DETAIL_FAILURE_MESSAGE};
pub use record::{DealDetail, DealRecord, GameInfo, GameSummary, StoreOffer, MAX_GAMES};
pub use stores::{find_store, store_name, Storefront, INITIAL_STORE_ID, KNOWN_STORES};
