//! Presentation seam between the catalog pipeline and a front-end
//!
//! The pipeline never formats or prints anything itself. It pushes signals
//! through [`View`]; front-ends either implement the trait directly (the
//! table printer) or receive [`ViewEvent`]s over a channel (the interactive
//! browser, tests).

use tokio::sync::mpsc::UnboundedSender;

use crate::catalog::{DealDetail, DealRecord};

/// Rendering surface driven by the pipeline
///
/// Calls arrive while the pipeline holds its state lock, so implementations
/// must return promptly and must not call back into the pipeline.
pub trait View: Send + Sync {
    /// Replace whatever is shown with these cards (never empty)
    fn render_list(&self, records: &[DealRecord]);

    /// Show the "no results" indicator instead of a grid
    fn render_empty(&self);

    /// Show the inline error indicator; no stale or partial cards remain
    fn render_error(&self);

    /// Drop any empty/error indicator ahead of a new request
    fn clear_status(&self);

    /// Toggle the loading indicator
    fn set_loading(&self, loading: bool);

    /// Open the detail modal, replacing any open one
    fn render_detail(&self, detail: &DealDetail);

    /// Blocking notice, used for detail lookup failures
    fn alert(&self, message: &str);
}

/// A [`View`] call captured as a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    List(Vec<DealRecord>),
    Empty,
    Error,
    ClearStatus,
    Loading(bool),
    Detail(DealDetail),
    Alert(String),
}

/// Forwards every view call over an unbounded channel
///
/// Sends to a closed channel are dropped; the receiving front-end has
/// already gone away.
#[derive(Debug)]
pub struct ChannelView<E = ViewEvent> {
    tx: UnboundedSender<E>,
}

impl<E> Clone for ChannelView<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> ChannelView<E>
where
    E: From<ViewEvent> + Send,
{
    pub fn new(tx: UnboundedSender<E>) -> Self {
        Self { tx }
    }

    fn send(&self, event: ViewEvent) {
        if self.tx.send(E::from(event)).is_err() {
            tracing::trace!("view channel closed, dropping event");
        }
    }
}

impl<E> View for ChannelView<E>
where
    E: From<ViewEvent> + Send,
{
    fn render_list(&self, records: &[DealRecord]) {
        self.send(ViewEvent::List(records.to_vec()));
    }

    fn render_empty(&self) {
        self.send(ViewEvent::Empty);
    }

    fn render_error(&self) {
        self.send(ViewEvent::Error);
    }

    fn clear_status(&self) {
        self.send(ViewEvent::ClearStatus);
    }

    fn set_loading(&self, loading: bool) {
        self.send(ViewEvent::Loading(loading));
    }

    fn render_detail(&self, detail: &DealDetail) {
        self.send(ViewEvent::Detail(detail.clone()));
    }

    fn alert(&self, message: &str) {
        self.send(ViewEvent::Alert(message.to_string()));
    }
}
