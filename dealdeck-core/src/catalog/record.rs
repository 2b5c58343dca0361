//! Deal records as served by the CheapShark API
//!
//! Prices and percentages arrive as JSON strings ("9.99") on most endpoints
//! and occasionally as bare numbers, so every decimal field goes through the
//! lenient deserializers in [`de`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of records held in a result set
pub const MAX_GAMES: usize = 15;

/// One discounted listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    /// Opaque game identifier
    #[serde(rename = "gameID")]
    pub game_id: String,

    /// Game title (missing titles deserialize as empty)
    #[serde(default)]
    pub title: String,

    /// Thumbnail image URL
    #[serde(default)]
    pub thumb: String,

    /// Selling storefront
    #[serde(rename = "storeID", default)]
    pub store_id: String,

    /// Current price
    #[serde(deserialize_with = "de::decimal")]
    pub sale_price: Decimal,

    /// List price, not guaranteed to be >= sale price
    #[serde(deserialize_with = "de::decimal")]
    pub normal_price: Decimal,

    /// Discount percentage, not clamped to 0-100
    #[serde(default, deserialize_with = "de::decimal")]
    pub savings: Decimal,

    /// Steam review score, `None` when unknown
    #[serde(default, deserialize_with = "de::optional_decimal")]
    pub steam_rating_percent: Option<Decimal>,

    /// Deal identifier on the storefront
    #[serde(rename = "dealID", default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,

    /// Steam review summary ("Very Positive", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_rating_text: Option<String>,
}

/// A title-search hit from `/games?title=`
///
/// The search endpoint returns per-game summaries rather than deals; they are
/// normalized into [`DealRecord`]s so a search result set flows through the
/// same pipeline as the initial listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[serde(rename = "gameID")]
    pub game_id: String,

    #[serde(rename = "steamAppID", default)]
    pub steam_app_id: Option<String>,

    /// Cheapest current price across stores
    #[serde(deserialize_with = "de::decimal")]
    pub cheapest: Decimal,

    #[serde(rename = "cheapestDealID", default)]
    pub cheapest_deal_id: Option<String>,

    /// Display title
    #[serde(default)]
    pub external: String,

    #[serde(default)]
    pub thumb: String,
}

impl From<GameSummary> for DealRecord {
    fn from(hit: GameSummary) -> Self {
        Self {
            game_id: hit.game_id,
            title: hit.external,
            thumb: hit.thumb,
            store_id: String::new(),
            sale_price: hit.cheapest,
            normal_price: hit.cheapest,
            savings: Decimal::ZERO,
            steam_rating_percent: None,
            deal_id: hit.cheapest_deal_id,
            steam_rating_text: None,
        }
    }
}

/// Extended detail for a single game (`/games?id=`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealDetail {
    #[serde(default)]
    pub info: GameInfo,

    /// Store-specific offers, cheapest first
    #[serde(default)]
    pub deals: Vec<StoreOffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub thumb: String,

    #[serde(rename = "steamAppID", default)]
    pub steam_app_id: Option<String>,
}

/// One storefront's offer inside a [`DealDetail`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOffer {
    #[serde(rename = "storeID", default)]
    pub store_id: String,

    #[serde(rename = "dealID", default)]
    pub deal_id: Option<String>,

    #[serde(deserialize_with = "de::decimal")]
    pub price: Decimal,

    #[serde(deserialize_with = "de::decimal")]
    pub retail_price: Decimal,

    #[serde(default, deserialize_with = "de::decimal")]
    pub savings: Decimal,
}

impl DealDetail {
    /// The only offer that gets presented
    pub fn primary_offer(&self) -> Option<&StoreOffer> {
        self.deals.first()
    }

    /// Steam store page, when the game is on Steam
    pub fn steam_store_url(&self) -> Option<String> {
        self.info
            .steam_app_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| format!("https://store.steampowered.com/app/{id}"))
    }
}

/// Lenient decimal deserializers
mod de {
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use std::fmt;
    use std::str::FromStr;

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number or numeric string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Decimal::from(value)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Decimal::from(value)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Decimal::from_f64(value)
                .map(Some)
                .ok_or_else(|| E::invalid_value(Unexpected::Float(value), &self))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(DecimalVisitor)
        }
    }

    pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        optional_decimal(deserializer)?.ok_or_else(|| de::Error::custom("expected a decimal value"))
    }

    pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }
}
