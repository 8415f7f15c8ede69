//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::adapters::dashboard_view::{comparison_view, ComparisonView, DashboardView};
use crate::domain::allocation::{allocate_momentum, parse_total_funds};
use crate::domain::dashboard::{
    Report, build_dashboard, compare as compare_returns, default_compare_start,
};
use crate::domain::error::MomentumError;

use super::templates::{CompareTemplate, DashboardTemplate, SymbolOption};
use super::{AppState, WebError};

fn render<T: Template>(template: &T) -> Result<Response, WebError> {
    let html = template
        .render()
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok(Html(html).into_response())
}

/// Run `job` on the blocking pool; price fetching blocks on network I/O.
async fn blocking<T, F>(job: F) -> Result<T, WebError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, MomentumError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| WebError::internal(e.to_string()))?
        .map_err(WebError::from)
}

fn dashboard_view(
    state: &AppState,
    total_funds: Option<f64>,
) -> Result<DashboardView, MomentumError> {
    let settings = &state.settings;
    let as_of = state.today();
    let start = settings.fetch_start(as_of);

    let loaded = state.load_prices(&settings.universe.symbols, start, as_of)?;
    let prices = loaded.table;
    let dashboard = build_dashboard(&prices, &settings.ranking, as_of);

    let allocations = match total_funds {
        Some(total) => Some((
            total,
            allocate_momentum(&dashboard.momentum_symbols(), total, &prices)?,
        )),
        None => None,
    };

    let mut report = Report::new(&dashboard).with_failures(&loaded.failures);
    if let Some((total, allocations)) = &allocations {
        report = report.with_allocation(*total, allocations);
    }
    Ok(DashboardView::from_report(&report))
}

fn render_dashboard(view: &DashboardView, default_funds: &str) -> Result<Response, WebError> {
    render(&DashboardTemplate {
        title: "Momentum dashboard",
        view,
        interactive: true,
        default_funds,
    })
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let default_funds = format!("{}", state.settings.total_funds);
    let view = blocking(move || dashboard_view(&state, None)).await?;
    render_dashboard(&view, &default_funds)
}

#[derive(Debug, serde::Deserialize)]
pub struct AllocateForm {
    pub total_funds: String,
}

pub async fn allocate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AllocateForm>,
) -> Result<Response, WebError> {
    let total = parse_total_funds(&form.total_funds).map_err(MomentumError::from)?;
    let view = blocking(move || dashboard_view(&state, Some(total))).await?;
    render_dashboard(&view, form.total_funds.trim())
}

fn parse_date_param(
    value: Option<&str>,
    default: NaiveDate,
    name: &str,
) -> Result<NaiveDate, WebError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            WebError::bad_request(format!("invalid {name} date {s:?}, expected YYYY-MM-DD"))
        }),
    }
}

/// `symbols` may repeat, one entry per selected option.
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let mut requested: Vec<String> = Vec::new();
    let mut start_param = None;
    let mut end_param = None;
    for (key, value) in params {
        match key.as_str() {
            "symbols" => requested.push(value),
            "start" => start_param = Some(value),
            "end" => end_param = Some(value),
            _ => {}
        }
    }

    let start = parse_date_param(start_param.as_deref(), default_compare_start(), "start")?;
    let end = parse_date_param(end_param.as_deref(), state.today(), "end")?;
    if start > end {
        return Err(WebError::bad_request(format!(
            "start {start} is after end {end}"
        )));
    }

    let picked = state
        .settings
        .universe
        .pick(&requested)
        .map_err(MomentumError::from)?;

    let options = state
        .settings
        .universe
        .symbols
        .iter()
        .map(|symbol| SymbolOption {
            symbol: symbol.clone(),
            selected: picked.contains(symbol),
        })
        .collect();

    let comparison: Option<ComparisonView> = if picked.is_empty() {
        None
    } else {
        let state = Arc::clone(&state);
        Some(
            blocking(move || {
                let loaded = state.load_prices(&picked, start, end)?;
                Ok(comparison_view(&compare_returns(&loaded.table, &picked)))
            })
            .await?,
        )
    };

    render(&CompareTemplate {
        title: "Compare",
        interactive: true,
        options,
        start: start.to_string(),
        end: end.to_string(),
        comparison,
    })
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> Redirect {
    state.reset();
    tracing::info!("price cache cleared");
    Redirect::to("/")
}

pub async fn not_found() -> WebError {
    WebError::not_found("page not found")
}
