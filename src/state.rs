// src/state.rs

use crate::config::DashboardConfig;
use crate::filter::{self, FilterSet, StatusFilter, YearFilter};
use crate::record::ShipmentRecord;
use crate::stats::{self, Distribution, StatsSnapshot};
use crate::table::{self, Page, ShipmentDetail};
use crate::trend::{self, MonthlySeries};
use std::collections::BTreeSet;
use time::{Date, OffsetDateTime};
use tracing::info;

/// The two chart views, each with its own filter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    Distribution,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub query: String,
    pub page: usize,
    pub page_size: usize,
}

/// Everything the dashboard knows. Each transition consumes the state and
/// returns the next one; views are derived on demand by [`AppState::view`].
#[derive(Debug, Clone)]
pub struct AppState {
    pub shipments: Vec<ShipmentRecord>,
    pub distribution_filters: FilterSet,
    pub trend_filters: FilterSet,
    /// Year shown by the monthly released-quantity series.
    pub trend_year: i32,
    pub table: TableState,
    pub last_updated: Option<OffsetDateTime>,
    pub last_error: Option<String>,
}

/// Everything the presentation layer draws, computed from one state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: StatsSnapshot,
    pub distribution: Distribution,
    pub trend_stats: StatsSnapshot,
    pub monthly: MonthlySeries,
    pub year_options: BTreeSet<i32>,
    pub page: Page,
    pub last_updated: Option<OffsetDateTime>,
}

impl AppState {
    pub fn new(cfg: &DashboardConfig, current_year: i32) -> Self {
        let filters = FilterSet::new(cfg.year_reference, cfg.range_reference);
        Self {
            shipments: Vec::new(),
            distribution_filters: filters.clone(),
            trend_filters: filters,
            trend_year: current_year,
            table: TableState {
                query: String::new(),
                page: 1,
                page_size: cfg.records_per_page,
            },
            last_updated: None,
            last_error: None,
        }
    }

    /// Replace the whole collection with a fresh fetch.
    pub fn with_shipments(mut self, shipments: Vec<ShipmentRecord>, now: OffsetDateTime) -> Self {
        self.trend_year = trend::default_year(&shipments, now.year());
        self.shipments = shipments;
        self.table.page = 1;
        self.last_updated = Some(now);
        self.last_error = None;
        info!(
            records = self.shipments.len(),
            trend_year = self.trend_year,
            "Shipment collection replaced"
        );
        self
    }

    /// A failed refresh leaves an empty, still usable dashboard.
    pub fn with_fetch_failure(mut self, message: impl Into<String>) -> Self {
        self.shipments.clear();
        self.table.page = 1;
        self.last_error = Some(message.into());
        self
    }

    /// The year dimension is shared: setting it updates both views.
    pub fn with_year(mut self, year: YearFilter) -> Self {
        self.distribution_filters.year = year;
        self.trend_filters.year = year;
        self.table.page = 1;
        self
    }

    pub fn with_filters(
        mut self,
        view: ChartView,
        status: StatusFilter,
        date_from: Option<Date>,
        date_to: Option<Date>,
    ) -> Self {
        let filters = self.filters_mut(view);
        filters.status = status;
        filters.date_from = date_from;
        filters.date_to = date_to;
        self
    }

    /// Clear one view's filters. The shared year goes back to "all" for both.
    pub fn reset_filters(mut self, view: ChartView) -> Self {
        self.filters_mut(view).reset();
        self.with_year(YearFilter::All)
    }

    pub fn with_trend_year(mut self, year: i32) -> Self {
        self.trend_year = year;
        self
    }

    /// New query, back to the first page.
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.table.query = query.into();
        self.table.page = 1;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.table.page = page.max(1);
        self
    }

    pub fn filters(&self, view: ChartView) -> &FilterSet {
        match view {
            ChartView::Distribution => &self.distribution_filters,
            ChartView::Trend => &self.trend_filters,
        }
    }

    fn filters_mut(&mut self, view: ChartView) -> &mut FilterSet {
        match view {
            ChartView::Distribution => &mut self.distribution_filters,
            ChartView::Trend => &mut self.trend_filters,
        }
    }

    /// Records the table works from: the shared year filter only.
    pub fn table_records(&self) -> Vec<ShipmentRecord> {
        let year_view = filter::apply_year(&self.shipments, &self.distribution_filters);
        if self.table.query.is_empty() {
            year_view
        } else {
            table::search(&year_view, &self.table.query)
        }
    }

    pub fn detail(&self, mawb_first_leg: &str) -> Option<ShipmentDetail> {
        self.shipments
            .iter()
            .find(|r| r.mawb_first_leg == mawb_first_leg)
            .map(table::detail)
    }

    pub fn view(&self) -> DashboardView {
        let distribution_records = filter::apply(&self.shipments, &self.distribution_filters);
        let trend_records = filter::apply(&self.shipments, &self.trend_filters);
        let table_records = self.table_records();

        info!(
            total = self.shipments.len(),
            table = table_records.len(),
            distribution = distribution_records.len(),
            trend = trend_records.len(),
            "View recomputed"
        );

        let cards = stats::aggregate(&distribution_records);
        DashboardView {
            distribution: stats::distribution(&cards),
            cards,
            trend_stats: stats::aggregate(&trend_records),
            monthly: trend::monthly_released(&trend_records, self.trend_year),
            year_options: trend::release_years(&self.shipments),
            page: table::paginate(&table_records, self.table.page, self.table.page_size),
            last_updated: self.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Row;
    use crate::record;
    use time::macros::{date, datetime};

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn example_state() -> AppState {
        let records = record::parse_records(&rows(&[
            &["MAWB1", "MAWB2", "Status", "Start", "End"],
            &["123", "456", "In Review", "01/01/2024", "02/01/2024"],
            &["789", "", "Pending", "", ""],
        ]));
        AppState::new(&DashboardConfig::default(), 2026)
            .with_shipments(records, datetime!(2026-10-19 12:00 UTC))
    }

    fn dated(first: &str, status: &str, prealerta: &str, arribo: &str, release: &str) -> ShipmentRecord {
        ShipmentRecord {
            mawb_first_leg: first.into(),
            status: status.into(),
            prealerta_date: prealerta.into(),
            arrival_date: arribo.into(),
            release_date: release.into(),
            released_quantity: "1".into(),
            ..ShipmentRecord::default()
        }
    }

    #[test]
    fn example_rows_end_to_end() {
        let view = example_state().view();
        let cards = view.cards;
        assert_eq!(cards.review, 1);
        assert_eq!(cards.pending, 1);
        assert_eq!(cards.transmissions, 0);
        assert_eq!(cards.inspection, 0);
        assert_eq!(cards.released, 0);
        assert_eq!(cards.total, 2);
        assert_eq!(cards.review_percent(), 50);
        assert_eq!(cards.pending_percent(), 50);
        assert_eq!(view.page.total, 2);
        assert_eq!(view.distribution.total, 2);
    }

    #[test]
    fn search_narrows_the_table_and_resets_page() {
        let state = example_state().with_page(3).with_search("123");
        assert_eq!(state.table.page, 1);
        let view = state.view();
        assert_eq!(view.page.records.len(), 1);
        assert_eq!(view.page.records[0].mawb_first_leg, "123");
        // cards ignore the search
        assert_eq!(view.cards.total, 2);
    }

    #[test]
    fn year_is_shared_but_other_filters_are_not() {
        let state = AppState::new(&DashboardConfig::default(), 2026)
            .with_shipments(
                vec![
                    dated("a", "Released", "01/01/2024", "05/01/2024", "10/01/2024"),
                    dated("b", "Pending", "01/01/2023", "05/01/2023", ""),
                    dated("c", "Released", "", "", "10/02/2024"),
                ],
                datetime!(2026-10-19 12:00 UTC),
            )
            .with_year(YearFilter::Year(2024))
            .with_filters(
                ChartView::Distribution,
                StatusFilter::Contains("pending".into()),
                None,
                None,
            );

        assert_eq!(state.trend_filters.year, YearFilter::Year(2024));
        assert_eq!(state.trend_filters.status, StatusFilter::All);

        let view = state.view();
        // "b" is from 2023; "a" and "c" are not pending
        assert_eq!(view.cards.total, 0);
        assert_eq!(view.trend_stats.released, 2);
        assert_eq!(view.page.total, 2);
        assert_eq!(state.trend_year, 2024);
        assert_eq!(view.monthly.values[0], 1.0);
        assert_eq!(view.monthly.values[1], 1.0);
    }

    #[test]
    fn range_filter_drops_missing_arribo_in_one_view_only() {
        let state = AppState::new(&DashboardConfig::default(), 2026)
            .with_shipments(
                vec![
                    dated("with-arribo", "Pending", "", "05/03/2024", ""),
                    dated("no-arribo", "Pending", "", "", ""),
                ],
                datetime!(2026-10-19 12:00 UTC),
            )
            .with_filters(
                ChartView::Trend,
                StatusFilter::All,
                Some(date!(2024 - 01 - 01)),
                None,
            );

        let view = state.view();
        assert_eq!(view.cards.total, 2);
        assert_eq!(view.trend_stats.total, 1);
    }

    #[test]
    fn reset_clears_view_and_shared_year() {
        let state = example_state()
            .with_year(YearFilter::Year(2024))
            .with_filters(ChartView::Trend, StatusFilter::parse("review"), None, None)
            .with_filters(ChartView::Distribution, StatusFilter::parse("pending"), None, None)
            .reset_filters(ChartView::Trend);

        assert_eq!(state.trend_filters.status, StatusFilter::All);
        assert_eq!(state.trend_filters.year, YearFilter::All);
        assert_eq!(state.distribution_filters.year, YearFilter::All);
        assert_eq!(
            state.distribution_filters.status,
            StatusFilter::Contains("pending".into())
        );
    }

    #[test]
    fn trend_year_defaults_to_latest_release_or_current_year() {
        let none_released = example_state();
        assert_eq!(none_released.trend_year, 2026);

        let state = AppState::new(&DashboardConfig::default(), 2026).with_shipments(
            vec![
                dated("a", "Released", "", "", "01/01/2022"),
                dated("b", "Released", "", "", "01/01/2024"),
            ],
            datetime!(2026-10-19 12:00 UTC),
        );
        assert_eq!(state.trend_year, 2024);
        assert_eq!(state.view().year_options.len(), 2);
        assert_eq!(state.with_trend_year(2022).view().monthly.year, 2022);
    }

    #[test]
    fn fetch_failure_empties_but_keeps_filters() {
        let state = example_state()
            .with_year(YearFilter::Year(2024))
            .with_fetch_failure("source unreachable");
        assert!(state.shipments.is_empty());
        assert_eq!(state.last_error.as_deref(), Some("source unreachable"));
        assert_eq!(state.distribution_filters.year, YearFilter::Year(2024));

        let view = state.view();
        assert_eq!(view.cards, StatsSnapshot::default());
        assert!(view.page.records.is_empty());
    }

    #[test]
    fn refresh_replaces_rather_than_merges() {
        let state = example_state().with_shipments(
            vec![dated("new", "Released", "", "", "")],
            datetime!(2026-10-19 12:05 UTC),
        );
        assert_eq!(state.shipments.len(), 1);
        assert_eq!(state.last_updated, Some(datetime!(2026-10-19 12:05 UTC)));
    }

    #[test]
    fn detail_lookup_by_first_leg() {
        let state = example_state();
        assert_eq!(state.detail("789").unwrap().status_label, "Pendiente");
        assert!(state.detail("nope").is_none());
    }
}
