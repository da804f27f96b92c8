//! Observable filter state shared by every filter-aware consumer.

use common::filters::normalize;
use common::{DateRange, FilterKind, FilterParams, FilterSelection};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Holds the current [`FilterSelection`].
///
/// Clones share the same state. Consumers observe changes through
/// [`FilterStore::subscribe`]; a setter that does not change the selection
/// does not notify them.
#[derive(Debug, Clone)]
pub struct FilterStore {
    state: Arc<watch::Sender<FilterSelection>>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterSelection::default())
    }
}

impl FilterStore {
    pub fn new(initial: FilterSelection) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn set_category(&self, value: Option<&str>) {
        self.set(FilterKind::Category, value);
    }

    pub fn set_client(&self, value: Option<&str>) {
        self.set(FilterKind::Client, value);
    }

    pub fn set_product(&self, value: Option<&str>) {
        self.set(FilterKind::Product, value);
    }

    pub fn set_employee(&self, value: Option<&str>) {
        self.set(FilterKind::Employee, value);
    }

    pub fn set_country(&self, value: Option<&str>) {
        self.set(FilterKind::Country, value);
    }

    pub fn set_date_range(&self, start: Option<&str>, end: Option<&str>) {
        let range = DateRange::new(start.map(str::to_string), end.map(str::to_string));
        self.state.send_if_modified(|selection| {
            if selection.date_range == range {
                return false;
            }
            debug!("Filter dateRange set to {:?}..{:?}", range.start, range.end);
            selection.date_range = range;
            true
        });
    }

    /// Resets one field, or both date bounds, to empty.
    pub fn clear_filter(&self, kind: FilterKind) {
        match kind {
            FilterKind::DateRange => self.set_date_range(None, None),
            _ => self.set(kind, None),
        }
    }

    pub fn reset(&self) {
        self.state.send_if_modified(|selection| {
            if *selection == FilterSelection::default() {
                return false;
            }
            debug!("Filters reset");
            *selection = FilterSelection::default();
            true
        });
    }

    fn set(&self, kind: FilterKind, value: Option<&str>) {
        let value = normalize(value.map(str::to_string));
        self.state.send_if_modified(|selection| {
            let field = match kind {
                FilterKind::Category => &mut selection.selected_category,
                FilterKind::Client => &mut selection.selected_client,
                FilterKind::Product => &mut selection.selected_product,
                FilterKind::Employee => &mut selection.selected_employee,
                FilterKind::Country => &mut selection.selected_country,
                FilterKind::DateRange => return false,
            };
            if *field == value {
                return false;
            }
            debug!("Filter {} set to {:?}", kind, value);
            *field = value;
            true
        });
    }

    pub fn has_active_filters(&self) -> bool {
        self.state.borrow().has_active_filters()
    }

    /// Snapshot of the current selection.
    pub fn selection(&self) -> FilterSelection {
        self.state.borrow().clone()
    }

    pub fn params(&self) -> FilterParams {
        self.state.borrow().to_params()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSelection> {
        self.state.subscribe()
    }
}
