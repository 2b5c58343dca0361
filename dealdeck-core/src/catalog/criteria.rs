//! View criteria and the filter/sort projection over a result set

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::DealRecord;

/// Sort orders offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    SalePriceAsc,
    SalePriceDesc,
    NormalPriceAsc,
    NormalPriceDesc,
    SavingsDesc,
    TitleAsc,
}

impl SortKey {
    /// Every key, in the order the browser cycles through them
    pub const ALL: [SortKey; 6] = [
        SortKey::SalePriceAsc,
        SortKey::SalePriceDesc,
        SortKey::NormalPriceAsc,
        SortKey::NormalPriceDesc,
        SortKey::SavingsDesc,
        SortKey::TitleAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::SalePriceAsc => "salePriceAsc",
            SortKey::SalePriceDesc => "salePriceDesc",
            SortKey::NormalPriceAsc => "normalPriceAsc",
            SortKey::NormalPriceDesc => "normalPriceDesc",
            SortKey::SavingsDesc => "savingsDesc",
            SortKey::TitleAsc => "titleAsc",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::SalePriceAsc => "Price: low to high",
            SortKey::SalePriceDesc => "Price: high to low",
            SortKey::NormalPriceAsc => "List price: low to high",
            SortKey::NormalPriceDesc => "List price: high to low",
            SortKey::SavingsDesc => "Biggest discount",
            SortKey::TitleAsc => "Title A-Z",
        }
    }

    /// Next key in the cycle; `None` means "no sort" and follows the last key
    pub fn cycle(current: Option<SortKey>) -> Option<SortKey> {
        match current {
            None => Some(SortKey::ALL[0]),
            Some(key) => {
                let position = SortKey::ALL.iter().position(|k| *k == key).unwrap_or(0);
                SortKey::ALL.get(position + 1).copied()
            }
        }
    }

    fn compare(&self, a: &DealRecord, b: &DealRecord) -> Ordering {
        match self {
            SortKey::SalePriceAsc => a.sale_price.cmp(&b.sale_price),
            SortKey::SalePriceDesc => b.sale_price.cmp(&a.sale_price),
            SortKey::NormalPriceAsc => a.normal_price.cmp(&b.normal_price),
            SortKey::NormalPriceDesc => b.normal_price.cmp(&a.normal_price),
            SortKey::SavingsDesc => b.savings.cmp(&a.savings),
            SortKey::TitleAsc => compare_titles(&a.title, &b.title),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    /// Accepts the camelCase names and their kebab-case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        SortKey::ALL
            .iter()
            .find(|key| key.as_str().to_lowercase() == normalized)
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown sort key '{s}'. Expected one of: sale-price-asc, sale-price-desc, \
                     normal-price-asc, normal-price-desc, savings-desc, title-asc"
                )
            })
    }
}

/// Active filter and sort, mutated by user input and never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCriteria {
    /// Keep only records from this storefront
    pub store_filter: Option<String>,

    /// Ordering applied after filtering
    pub sort_key: Option<SortKey>,
}

impl ViewCriteria {
    pub fn is_empty(&self) -> bool {
        self.store_filter.is_none() && self.sort_key.is_none()
    }

    /// Project `records` through this criteria
    pub fn apply(&self, records: &[DealRecord]) -> Vec<DealRecord> {
        derive_view(records, self)
    }
}

/// Filter then sort a copy of `records`
///
/// The sort is stable, so records comparing equal keep their result-set order.
pub fn derive_view(records: &[DealRecord], criteria: &ViewCriteria) -> Vec<DealRecord> {
    let mut view: Vec<DealRecord> = match criteria.store_filter.as_deref() {
        Some(store) => records
            .iter()
            .filter(|record| record.store_id == store)
            .cloned()
            .collect(),
        None => records.to_vec(),
    };

    if let Some(key) = criteria.sort_key {
        view.sort_by(|a, b| key.compare(a, b));
    }

    view
}

/// Title collation: base letters first, then accents, then case
///
/// Titles differing only in accents or case still have a fixed order
/// (unaccented before accented, lowercase before uppercase). Only identical
/// titles tie.
fn compare_titles(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(&tertiary_key(b)))
}

/// Accent- and case-insensitive key
fn primary_key(title: &str) -> String {
    title
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case-insensitive key that keeps accents as combining marks
fn secondary_key(title: &str) -> Vec<(char, Vec<char>)> {
    let mut key: Vec<(char, Vec<char>)> = Vec::new();
    for c in title.nfkd().flat_map(char::to_lowercase) {
        match key.last_mut() {
            Some((_, marks)) if is_combining_mark(c) => marks.push(c),
            _ => key.push((c, Vec::new())),
        }
    }
    key
}

/// Case-sensitive key with lowercase ordered before uppercase
fn tertiary_key(title: &str) -> Vec<(bool, char)> {
    title
        .nfkd()
        .map(|c| (c.is_uppercase(), c.to_lowercase().next().unwrap_or(c)))
        .collect()
}
