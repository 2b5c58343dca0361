//! Deals API gateway - abstraction over the remote pricing service
//!
//! The pipeline only ever talks to [`DealsGateway`]. The production
//! implementation is [`CheapSharkGateway`]; tests substitute scripted fakes.

mod cheapshark;
mod config;

pub use cheapshark::CheapSharkGateway;
pub use config::{GatewayConfig, DEFAULT_API_BASE};

use async_trait::async_trait;

use crate::catalog::{DealDetail, DealRecord};
use crate::error::TransportError;

/// The three fixed-shape requests the catalog needs
#[async_trait]
pub trait DealsGateway: Send + Sync {
    /// Currently discounted deals from one storefront
    async fn list_deals(
        &self,
        store_id: &str,
        limit: usize,
    ) -> Result<Vec<DealRecord>, TransportError>;

    /// Games whose title matches `term`, as judged by the remote service
    async fn search_by_title(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<DealRecord>, TransportError>;

    /// Extended detail for one game
    async fn get_detail(&self, game_id: &str) -> Result<DealDetail, TransportError>;

    /// Gateway identifier for logging
    fn name(&self) -> &'static str;
}
