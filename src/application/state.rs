//! Application state management for the user dashboard.
//!
//! This module owns the loaded records, the filter selections and the chart
//! derived from them, and reacts to user selections and to the background
//! load finishing.

use crate::domain::{ChartData, FilterState, PrimaryFilter, Record, SubFilter, UserAggregator};
use crate::infrastructure::{LoadOutcome, LoadTask};
use tracing::{debug, error};

/// Which select control receives option changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The primary "Filter Users" select
    #[default]
    Filter,
    /// The "Sub-Filter" select, only reachable under Government
    SubFilter,
}

/// Main application state for the dashboard.
///
/// The record set is the single source of truth; `chart` is recomputed from it
/// and `filter` after every change and never edited directly.
///
/// # Examples
///
/// ```
/// use user_dashboard::application::App;
///
/// let app = App::default();
/// assert!(app.chart.is_none());
/// assert!(!app.sub_filter_visible());
/// ```
#[derive(Debug, Default)]
pub struct App {
    /// Records from the spreadsheet, `None` until loading succeeds
    pub records: Option<Vec<Record>>,
    /// Current filter selections
    pub filter: FilterState,
    /// Chart derived from `records` and `filter`
    pub chart: Option<ChartData>,
    /// Focused select control
    pub focus: Focus,
    /// Set when the user asks to leave
    pub should_quit: bool,
    /// Load in flight, if any
    pending_load: Option<LoadTask>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a background load. A load already in flight is cancelled.
    pub fn start_loading(&mut self, task: LoadTask) {
        if let Some(previous) = self.pending_load.replace(task) {
            previous.cancel();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Checks the pending load and applies its outcome once it is available.
    ///
    /// Returns `true` when an outcome was applied.
    pub fn poll_load(&mut self) -> bool {
        let Some(outcome) = self.pending_load.as_ref().and_then(LoadTask::poll) else {
            return false;
        };
        self.pending_load = None;
        self.set_load_result(outcome);
        true
    }

    /// Processes the result of loading the spreadsheet.
    ///
    /// On success the records replace any previous set, the filters go back
    /// to All/All and the chart is computed. A failure is only logged; the
    /// chart stays empty and the dashboard keeps showing its loading text.
    ///
    /// # Arguments
    ///
    /// * `result` - Records parsed from the first worksheet, or the load error
    pub fn set_load_result(&mut self, result: LoadOutcome) {
        match result {
            Ok(records) => {
                self.records = Some(records);
                self.filter = FilterState::default();
                self.focus = Focus::Filter;
                self.refresh_chart();
            }
            Err(err) => {
                error!(error = %err, "error loading the spreadsheet");
            }
        }
    }

    /// Selects a primary filter, resetting the sub-filter to All.
    pub fn select_filter(&mut self, primary: PrimaryFilter) {
        self.filter = self.filter.with_primary(primary);
        if !self.sub_filter_visible() {
            self.focus = Focus::Filter;
        }
        debug!(filter = %primary, "filter changed");
        self.refresh_chart();
    }

    /// Selects a sub-filter. Ignored unless the sub-filter control is shown.
    pub fn select_sub_filter(&mut self, sub: SubFilter) {
        if !self.sub_filter_visible() {
            return;
        }
        self.filter = self.filter.with_sub(sub);
        debug!(sub_filter = %sub, "sub-filter changed");
        self.refresh_chart();
    }

    pub fn toggle_gsi(&mut self) {
        self.select_sub_filter(self.filter.sub.toggle());
    }

    /// Moves the focused select to its next option.
    pub fn next_option(&mut self) {
        match self.focus {
            Focus::Filter => self.select_filter(self.filter.primary.next()),
            Focus::SubFilter => self.toggle_gsi(),
        }
    }

    /// Moves the focused select to its previous option.
    pub fn previous_option(&mut self) {
        match self.focus {
            Focus::Filter => self.select_filter(self.filter.primary.previous()),
            Focus::SubFilter => self.toggle_gsi(),
        }
    }

    /// Cycles focus between the visible select controls.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Filter if self.sub_filter_visible() => Focus::SubFilter,
            _ => Focus::Filter,
        };
    }

    pub fn sub_filter_visible(&self) -> bool {
        self.filter.sub_filter_visible()
    }

    /// Recomputes the chart from the current records and filter.
    ///
    /// Before the first successful load there is nothing to chart.
    pub fn refresh_chart(&mut self) {
        self.chart = self
            .records
            .as_deref()
            .map(|records| UserAggregator::new(records).aggregate(self.filter));
    }

    /// Requests exit and drops any load still in flight.
    pub fn quit(&mut self) {
        self.should_quit = true;
        if let Some(task) = self.pending_load.take() {
            task.cancel();
        }
    }
}
