//! Display-ready projections of deal records
//!
//! Front-ends render these instead of formatting raw records themselves, so
//! the table view and the interactive browser show identical cards.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::stores::store_name;
use super::{DealDetail, DealRecord};

const RATED_BLURB: &str = "Popular game with positive Steam reviews and an active deal.";
const UNRATED_BLURB: &str = "Title with basic information and a featured deal.";

/// A deal card as shown in the result grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealCard {
    pub game_id: String,
    pub title: String,
    pub thumb: String,
    pub store: String,
    pub sale_price: String,
    /// List price, only present when the deal carries a discount
    pub normal_price: Option<String>,
    pub discount_percent: i64,
    /// `-N%` badge, only present when the discount is positive
    pub discount_badge: Option<String>,
    pub rating: String,
    pub blurb: &'static str,
}

impl From<&DealRecord> for DealCard {
    fn from(record: &DealRecord) -> Self {
        let discount_percent = round_percent(record.savings);
        let discounted = discount_percent > 0;
        // Only a missing score is unknown; a reported 0 is still a rating
        let rating = record.steam_rating_percent;

        Self {
            game_id: record.game_id.clone(),
            title: record.title.clone(),
            thumb: record.thumb.clone(),
            store: store_name(&record.store_id),
            sale_price: format_price(record.sale_price),
            normal_price: discounted.then(|| format_price(record.normal_price)),
            discount_percent,
            discount_badge: discounted.then(|| format!("-{discount_percent}%")),
            rating: match rating {
                Some(percent) => format!("★ {}%", percent.normalize()),
                None => "★ N/A".to_string(),
            },
            blurb: if rating.is_some() {
                RATED_BLURB
            } else {
                UNRATED_BLURB
            },
        }
    }
}

/// The detail modal for a single game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailCard {
    pub title: String,
    pub thumb: String,
    pub original_price: String,
    pub sale_price: String,
    pub steam_url: Option<String>,
}

impl From<&DealDetail> for DetailCard {
    fn from(detail: &DealDetail) -> Self {
        let offer = detail.primary_offer();

        Self {
            title: detail.info.title.clone(),
            thumb: detail.info.thumb.clone(),
            original_price: offer
                .map(|o| format_price(o.retail_price))
                .unwrap_or_else(|| "N/A".to_string()),
            sale_price: offer
                .map(|o| format_price(o.price))
                .unwrap_or_else(|| "N/A".to_string()),
            steam_url: detail.steam_store_url(),
        }
    }
}

/// Format a price as `$x.yy`
pub fn format_price(price: Decimal) -> String {
    format!("${:.2}", price.round_dp(2))
}

fn round_percent(savings: Decimal) -> i64 {
    savings
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
