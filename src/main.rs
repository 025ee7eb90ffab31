use shipment_dashboard::filter::{StatusFilter, YearFilter};
use shipment_dashboard::refresh::{self, RefreshStatus};
use shipment_dashboard::state::{AppState, ChartView, DashboardView};
use shipment_dashboard::{config, status};
use std::env;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn config_path() -> String {
    env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| ".config/dashboard.toml".to_string())
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|v| v == "1")
}

/// `YYYY-MM-DD`, as a date picker would send it.
fn env_date(name: &str) -> Option<Date> {
    let raw = env::var(name).ok()?;
    match Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")) {
        Ok(d) => Some(d),
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, "Ignoring unparseable date");
            None
        }
    }
}

/// Filter, search and paging inputs, the way the dashboard menus set them.
fn apply_env_inputs(mut state: AppState) -> AppState {
    if let Ok(year) = env::var("YEAR") {
        state = state.with_year(YearFilter::parse(&year));
    }
    for (view, prefix) in [(ChartView::Distribution, ""), (ChartView::Trend, "TREND_")] {
        if env_flag(&format!("{prefix}RESET")) {
            state = state.reset_filters(view);
            continue;
        }
        let status = env::var(format!("{prefix}STATUS")).unwrap_or_default();
        state = state.with_filters(
            view,
            StatusFilter::parse(&status),
            env_date(&format!("{prefix}DATE_FROM")),
            env_date(&format!("{prefix}DATE_TO")),
        );
    }
    if let Some(year) = env::var("TREND_YEAR").ok().and_then(|y| y.parse().ok()) {
        state = state.with_trend_year(year);
    }
    if let Ok(query) = env::var("SEARCH") {
        state = state.with_search(query);
    }
    if let Some(page) = env::var("PAGE").ok().and_then(|p| p.parse().ok()) {
        state = state.with_page(page);
    }
    state
}

/// Stats cards, distribution ring, monthly series and the current table page.
fn emit_view(view: &DashboardView) {
    let cards = &view.cards;
    info!(
        review = cards.review,
        pending = cards.pending,
        transmissions = cards.transmissions,
        inspection = cards.inspection,
        released = cards.released,
        total = cards.total,
        review_pct = cards.review_percent(),
        pending_pct = cards.pending_percent(),
        transmissions_pct = cards.transmissions_percent(),
        inspection_pct = cards.inspection_percent(),
        released_pct = cards.released_percent(),
        "Stats"
    );

    info!(total = view.distribution.total, "Distribution");
    for segment in &view.distribution.segments {
        info!(
            label = segment.label,
            color = segment.color,
            count = segment.count,
            percent = segment.percent,
            "Segment"
        );
    }

    info!(
        total = view.trend_stats.total,
        released = view.trend_stats.released,
        "Trend view"
    );
    info!(
        year = view.monthly.year,
        total = view.monthly.total(),
        years_available = ?view.year_options,
        "PQ liberados por mes"
    );
    for (label, value) in view.monthly.labels.iter().zip(view.monthly.values.iter()) {
        info!(month = %label, value = %format!("{value:.3}"), "Month");
    }

    let page = &view.page;
    info!(
        start = page.start,
        end = page.end,
        total = page.total,
        page = page.page,
        pages = page.page_count,
        "Shipments"
    );
    for record in &page.records {
        info!(
            mawb_first = %record.mawb_first_leg,
            mawb_second = %record.mawb_second_leg,
            status = %status::display_label(&record.status),
            review_start = %record.review_start_date,
            review_end = %record.review_end_date,
            "Row"
        );
    }

    if let Some(updated) = view.last_updated {
        info!(at = %updated, "Last updated");
    }
}

fn emit_status(state: &AppState, status: &RefreshStatus) {
    match status {
        RefreshStatus::Loaded(n) => info!(records = n, "Dashboard loaded"),
        RefreshStatus::Empty => warn!("Sheet has no shipment data"),
        RefreshStatus::Failed(e) => error!(error = %e, "Could not load dashboard data"),
        RefreshStatus::AuthExpired => error!("Session expired, please log in again"),
        RefreshStatus::Denied => error!("Access denied for this identity's domain"),
    }
    emit_view(&state.view());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Install crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider already installed");
    }

    let cfg = config::Config::load(config_path())?;
    let client = reqwest::Client::new();

    let state = AppState::new(&cfg.dashboard, OffsetDateTime::now_utc().year());
    let (state, status) =
        refresh::refresh_cycle(&client, &cfg, state, env_flag("REFRESH")).await;
    let state = apply_env_inputs(state);
    emit_status(&state, &status);

    if let Ok(mawb) = env::var("DETAIL") {
        match state.detail(&mawb) {
            Some(detail) => info!(detail = ?detail, "Shipment detail"),
            None => warn!(mawb = %mawb, "No shipment with that MAWB"),
        }
    }

    if env_flag("WATCH") && !status.needs_login() {
        refresh::watch(client, &cfg, state, emit_status).await;
    }

    Ok(())
}
