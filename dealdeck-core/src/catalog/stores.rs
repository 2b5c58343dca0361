//! Well-known CheapShark storefronts
//!
//! The deals API identifies stores by numeric string id. This table covers the
//! storefronts offered in the store filter; anything else falls back to a
//! generic `Store #<id>` label.

/// Storefront used for the initial listing
pub const INITIAL_STORE_ID: &str = "1";

/// A storefront identifier with its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Storefront {
    pub id: &'static str,
    pub name: &'static str,
}

/// Known storefronts, in filter-cycle order
pub const KNOWN_STORES: &[Storefront] = &[
    Storefront { id: "1", name: "Steam" },
    Storefront { id: "2", name: "GamersGate" },
    Storefront { id: "3", name: "GreenManGaming" },
    Storefront { id: "7", name: "GOG" },
    Storefront { id: "8", name: "Origin" },
    Storefront { id: "11", name: "Humble Store" },
    Storefront { id: "13", name: "Uplay" },
    Storefront { id: "15", name: "Fanatical" },
    Storefront { id: "25", name: "Epic Games Store" },
];

/// Look up a storefront by id
pub fn find_store(id: &str) -> Option<&'static Storefront> {
    KNOWN_STORES.iter().find(|store| store.id == id)
}

/// Display name for a store id
pub fn store_name(id: &str) -> String {
    match find_store(id) {
        Some(store) => store.name.to_string(),
        None if id.is_empty() => "Any store".to_string(),
        None => format!("Store #{id}"),
    }
}

/// Next store filter in the cycle; `None` (all stores) follows the last entry
pub fn cycle_store(current: Option<&str>) -> Option<&'static str> {
    match current {
        None => KNOWN_STORES.first().map(|store| store.id),
        Some(id) => KNOWN_STORES
            .iter()
            .position(|store| store.id == id)
            .and_then(|position| KNOWN_STORES.get(position + 1))
            .map(|store| store.id),
    }
}
