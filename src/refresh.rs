// src/refresh.rs

use crate::auth;
use crate::config::Config;
use crate::record;
use crate::source::{self, FetchOutcome, RowSource};
use crate::state::AppState;
use reqwest::Client;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, info_span, warn, Instrument};

/// How one refresh went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshStatus {
    Loaded(usize),
    /// The sheet answered but no row had a first-leg identifier.
    Empty,
    Failed(String),
    /// Token rejected; the session has been dropped and no retry follows.
    AuthExpired,
    /// Signed-in identity is outside the allowed domain; the session has
    /// been dropped.
    Denied,
}

impl RefreshStatus {
    /// A fresh login is needed before anything else can load.
    pub fn needs_login(&self) -> bool {
        matches!(self, RefreshStatus::AuthExpired | RefreshStatus::Denied)
    }
}

/// Fold one fetch result into the state. The collection is always replaced
/// wholesale, never merged.
pub fn apply_outcome(
    state: AppState,
    outcome: FetchOutcome,
    now: OffsetDateTime,
) -> (AppState, RefreshStatus) {
    if let Some(err) = outcome.error {
        let status = if err.is_auth_expired() {
            RefreshStatus::AuthExpired
        } else {
            RefreshStatus::Failed(err.to_string())
        };
        return (state.with_fetch_failure(err.to_string()), status);
    }

    let records = record::parse_records(&outcome.rows);
    if records.is_empty() {
        warn!("No shipment data found in the sheet");
        return (
            state.with_fetch_failure("no shipment data found in the sheet"),
            RefreshStatus::Empty,
        );
    }

    let count = records.len();
    (state.with_shipments(records, now), RefreshStatus::Loaded(count))
}

pub async fn refresh_from(
    source: &dyn RowSource,
    state: AppState,
    now: OffsetDateTime,
) -> (AppState, RefreshStatus) {
    let outcome = source::load_rows(source).await;
    apply_outcome(state, outcome, now)
}

/// One full cycle: token (if the source needs one), fetch, rebuild state.
pub async fn refresh_cycle(
    client: &Client,
    cfg: &Config,
    state: AppState,
    force_token_refresh: bool,
) -> (AppState, RefreshStatus) {
    let token = if cfg.source.needs_token() {
        match auth::acquire_token(
            client,
            cfg.oauth.as_ref(),
            &cfg.dashboard.session_path,
            cfg.dashboard.allowed_domain.as_deref(),
            force_token_refresh,
        )
        .await
        {
            Ok(grant) if grant.authorized => Some(grant.access_token),
            Ok(_) => {
                warn!(
                    allowed_domain = ?cfg.dashboard.allowed_domain,
                    "Identity not authorized for this dashboard"
                );
                if let Err(e) = auth::revoke(&cfg.dashboard.session_path) {
                    error!(error = %e, "Could not clear the cached session");
                }
                return (
                    state.with_fetch_failure("identity outside the allowed domain"),
                    RefreshStatus::Denied,
                );
            }
            Err(e) => {
                error!(error = %e, "Could not obtain an access token");
                let message = e.to_string();
                return (state.with_fetch_failure(message.clone()), RefreshStatus::Failed(message));
            }
        }
    } else {
        None
    };

    let src = source::from_config(client.clone(), &cfg.source, token);
    let (state, status) = refresh_from(src.as_ref(), state, OffsetDateTime::now_utc()).await;

    if status == RefreshStatus::AuthExpired {
        if let Err(e) = auth::revoke(&cfg.dashboard.session_path) {
            error!(error = %e, "Could not clear the cached session");
        }
    }
    (state, status)
}

/// Timed refresh. Cycles run one after another in this task, so a fetch is
/// never started while the previous one is still in flight. Stops on
/// Ctrl-C or when a fresh login is needed.
pub async fn watch(
    client: Client,
    cfg: &Config,
    mut state: AppState,
    mut on_refresh: impl FnMut(&AppState, &RefreshStatus),
) -> AppState {
    let period = Duration::from_secs(cfg.dashboard.auto_refresh_minutes.max(1) * 60);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // first tick fires immediately; the caller already did the initial load
    ticker.tick().await;

    info!(every_secs = period.as_secs(), "Auto-refresh enabled");
    let mut cycle: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping auto-refresh");
                break;
            }
        }

        cycle += 1;
        let (next, status) = refresh_cycle(&client, cfg, state, false)
            .instrument(info_span!("refresh", cycle))
            .await;
        state = next;
        on_refresh(&state, &status);

        if status.needs_login() {
            warn!("Auto-refresh stopped until next login");
            break;
        }
    }
    state
}
