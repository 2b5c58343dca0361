//! One-shot deal commands
//!
//! Each command drives the catalog pipeline against a [`TerminalView`], which
//! keeps only the most recent frame. Once the pipeline settles the frame is
//! printed as a table or as JSON.

use anyhow::{Context, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use dealdeck_core::catalog::{
    CatalogPipeline, DealCard, DealDetail, DealRecord, DetailCard, SortKey, KNOWN_STORES,
};
use dealdeck_core::gateway::{CheapSharkGateway, GatewayConfig};
use dealdeck_core::view::View;
use dealdeck_core::DealsError;

/// Inline notice for a failed list or search
pub const ERROR_NOTICE: &str = "Could not load deals. Please try again later.";
/// Notice for a request that matched nothing
pub const EMPTY_NOTICE: &str = "No games found.";

/// Global flags, validated once
#[derive(Debug, Clone)]
pub struct Settings {
    pub gateway: GatewayConfig,
    pub initial_store: String,
}

impl Settings {
    pub fn new(api_base: String, initial_store: String, timeout_secs: Option<u64>) -> Result<Self> {
        let initial_store = initial_store.trim().to_string();
        if initial_store.is_empty() {
            return Err(DealsError::Config("initial store id must not be empty".to_string()).into());
        }

        let gateway = GatewayConfig::default()
            .with_api_base(api_base)
            .with_timeout_seconds(timeout_secs);
        gateway.validate()?;

        Ok(Self {
            gateway,
            initial_store,
        })
    }

    /// Build a pipeline over the CheapShark gateway for the given view
    pub fn pipeline<V: View>(&self, view: V) -> Result<CatalogPipeline<CheapSharkGateway, V>> {
        let gateway = CheapSharkGateway::new(self.gateway.clone())
            .context("Failed to create deals gateway")?;
        Ok(CatalogPipeline::new(gateway, view).with_initial_store(self.initial_store.clone()))
    }
}

/// What the terminal would currently show
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Frame {
    #[default]
    Blank,
    List(Vec<DealRecord>),
    Empty,
    Error,
    Detail(DealDetail),
}

#[derive(Debug, Default)]
struct TerminalState {
    frame: Frame,
    alert: Option<String>,
}

/// View for one-shot commands
///
/// Intermediate renders (the listing before a filter is applied, say) are
/// overwritten; only the last one is printed. Progress goes to stderr so
/// JSON on stdout stays clean.
#[derive(Debug, Default)]
pub struct TerminalView {
    state: Mutex<TerminalState>,
    quiet: bool,
}

impl TerminalView {
    /// A view that prints no progress lines
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, TerminalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn frame(&self) -> Frame {
        self.lock().frame.clone()
    }

    pub fn alert_message(&self) -> Option<String> {
        self.lock().alert.clone()
    }

    fn set_frame(&self, frame: Frame) {
        self.lock().frame = frame;
    }
}

impl View for TerminalView {
    fn render_list(&self, records: &[DealRecord]) {
        self.set_frame(Frame::List(records.to_vec()));
    }

    fn render_empty(&self) {
        self.set_frame(Frame::Empty);
    }

    fn render_error(&self) {
        self.set_frame(Frame::Error);
    }

    fn clear_status(&self) {
        let mut state = self.lock();
        if matches!(state.frame, Frame::Empty | Frame::Error) {
            state.frame = Frame::Blank;
        }
    }

    fn set_loading(&self, loading: bool) {
        if loading && !self.quiet {
            eprintln!("Fetching deals...");
        }
    }

    fn render_detail(&self, detail: &DealDetail) {
        self.set_frame(Frame::Detail(detail.clone()));
    }

    fn alert(&self, message: &str) {
        self.lock().alert = Some(message.to_string());
    }
}

/// Table row for deal cards
#[derive(Tabled)]
struct DealRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<DealCard> for DealRow {
    fn from(card: DealCard) -> Self {
        let price = match card.normal_price {
            Some(normal) => format!("{} (was {})", card.sale_price, normal),
            None => card.sale_price,
        };

        Self {
            id: card.game_id,
            title: truncate(&card.title, 40),
            store: card.store,
            price,
            discount: card.discount_badge.unwrap_or_default(),
            rating: card.rating,
        }
    }
}

/// Table row for storefronts
#[derive(Tabled)]
struct StoreRow {
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(max_chars - 3).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn deals_table(records: &[DealRecord]) -> String {
    let rows: Vec<DealRow> = records
        .iter()
        .map(|record| DealRow::from(DealCard::from(record)))
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

/// Print the settled list frame; a failed load exits non-zero
fn print_deals(view: &TerminalView, json_output: bool) -> Result<()> {
    match view.frame() {
        Frame::List(records) => {
            if json_output {
                let cards: Vec<DealCard> = records.iter().map(DealCard::from).collect();
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else {
                println!("\nFound {} deal(s):\n", records.len());
                println!("{}", deals_table(&records));
            }
        }
        Frame::Error => {
            eprintln!("{ERROR_NOTICE}");
            std::process::exit(1);
        }
        Frame::Empty | Frame::Blank | Frame::Detail(_) => {
            if json_output {
                println!("[]");
            } else {
                println!("\n{EMPTY_NOTICE}");
            }
        }
    }

    Ok(())
}

fn apply_criteria<V: View>(
    pipeline: &CatalogPipeline<CheapSharkGateway, V>,
    store: Option<String>,
    sort: Option<SortKey>,
) {
    if store.is_some() {
        pipeline.set_store_filter(store);
    }
    if sort.is_some() {
        pipeline.set_sort(sort);
    }
}

pub async fn execute_list(
    settings: &Settings,
    store: Option<String>,
    sort: Option<SortKey>,
    json_output: bool,
) -> Result<()> {
    let pipeline = settings.pipeline(progress_view(json_output))?;

    if !pipeline.load_initial().await.is_failure() {
        apply_criteria(&pipeline, store, sort);
    }

    print_deals(pipeline.view(), json_output)
}

pub async fn execute_search(
    settings: &Settings,
    term: &str,
    store: Option<String>,
    sort: Option<SortKey>,
    json_output: bool,
) -> Result<()> {
    let pipeline = settings.pipeline(progress_view(json_output))?;

    if !pipeline.search(term).await.is_failure() {
        apply_criteria(&pipeline, store, sort);
    }

    print_deals(pipeline.view(), json_output)
}

pub async fn execute_show(settings: &Settings, game_id: &str, json_output: bool) -> Result<()> {
    let pipeline = settings.pipeline(progress_view(json_output))?;

    let detail = match pipeline.fetch_detail(game_id).await {
        Ok(detail) => detail,
        Err(_) => {
            let message = pipeline
                .view()
                .alert_message()
                .unwrap_or_else(|| format!("Could not load game '{game_id}'"));
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    let card = DetailCard::from(&detail);
    if json_output {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        print!("{}", detail_text(&card));
    }

    Ok(())
}

fn detail_text(card: &DetailCard) -> String {
    let mut text = format!("\n{}\n", card.title);
    text.push_str(&format!("  Original price: {}\n", card.original_price));
    text.push_str(&format!("  Sale price:     {}\n", card.sale_price));
    if let Some(url) = &card.steam_url {
        text.push_str(&format!("  Steam:          {url}\n"));
    }
    text
}

pub fn execute_stores() -> Result<()> {
    let rows: Vec<StoreRow> = KNOWN_STORES
        .iter()
        .map(|store| StoreRow {
            id: store.id,
            name: store.name,
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{table}");

    Ok(())
}

fn progress_view(json_output: bool) -> TerminalView {
    if json_output {
        TerminalView::quiet()
    } else {
        TerminalView::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealdeck_core::catalog::{GameInfo, StoreOffer};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn record(id: &str, title: &str, sale: i64, normal: i64, savings: i64) -> DealRecord {
        DealRecord {
            game_id: id.to_string(),
            title: title.to_string(),
            thumb: String::new(),
            store_id: "1".to_string(),
            sale_price: Decimal::from(sale),
            normal_price: Decimal::from(normal),
            savings: Decimal::from(savings),
            steam_rating_percent: Some(Decimal::from(90)),
            deal_id: None,
            steam_rating_text: None,
        }
    }

    #[test]
    fn test_settings_reject_blank_store() {
        let err = Settings::new("https://example.com".into(), "  ".into(), None).unwrap_err();
        assert!(err.to_string().contains("initial store"));
    }

    #[test]
    fn test_settings_reject_bad_base() {
        assert!(Settings::new("ftp://example.com".into(), "1".into(), None).is_err());
    }

    #[test]
    fn test_terminal_view_keeps_last_frame() {
        let view = TerminalView::quiet();
        view.render_list(&[record("1", "A", 5, 10, 50)]);
        view.render_empty();
        assert_eq!(view.frame(), Frame::Empty);

        view.clear_status();
        assert_eq!(view.frame(), Frame::Blank);
    }

    #[test]
    fn test_clear_status_keeps_list() {
        let view = TerminalView::quiet();
        let records = vec![record("1", "A", 5, 10, 50)];
        view.render_list(&records);
        view.clear_status();
        assert_eq!(view.frame(), Frame::List(records));
    }

    #[test]
    fn test_alert_is_recorded() {
        let view = TerminalView::quiet();
        view.alert("boom");
        assert_eq!(view.alert_message().as_deref(), Some("boom"));
    }

    #[test]
    fn test_deal_row_shows_list_price_only_when_discounted() {
        let row = DealRow::from(DealCard::from(&record("1", "Portal", 5, 20, 75)));
        assert_eq!(row.price, "$5.00 (was $20.00)");
        assert_eq!(row.discount, "-75%");

        let row = DealRow::from(DealCard::from(&record("2", "Portal 2", 9, 9, 0)));
        assert_eq!(row.price, "$9.00");
        assert_eq!(row.discount, "");
    }

    #[test]
    fn test_deals_table_contains_titles() {
        let table = deals_table(&[record("1", "Portal", 5, 20, 75), record("2", "Braid", 3, 3, 0)]);
        assert!(table.contains("Portal"));
        assert!(table.contains("Braid"));
        assert!(table.contains("Steam"));
    }

    #[test]
    fn test_truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 10), "abcdefg...");
    }

    #[test]
    fn test_detail_text() {
        let detail = DealDetail {
            info: GameInfo {
                title: "LEGO Batman".to_string(),
                thumb: String::new(),
                steam_app_id: Some("21000".to_string()),
            },
            deals: vec![StoreOffer {
                store_id: "1".to_string(),
                deal_id: None,
                price: Decimal::new(499, 2),
                retail_price: Decimal::new(1999, 2),
                savings: Decimal::from(75),
            }],
        };

        let text = detail_text(&DetailCard::from(&detail));
        assert_eq!(
            text,
            "\nLEGO Batman\n  Original price: $19.99\n  Sale price:     $4.99\n  Steam:          https://store.steampowered.com/app/21000\n"
        );
    }
}
