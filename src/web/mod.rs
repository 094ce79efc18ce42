//! HTTP front-end: the dashboard page plus a small JSON API.
//!
//! Every request builds a fresh `Dashboard` from its query string, so the
//! shared state is only the read-only table and the static layout.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::dashboard::{Controls, Dashboard, DashboardLayout};
use crate::data::SalesTable;
use crate::error::AppError;
use crate::report::{ReportOutput, year_selector_disabled};

pub mod page;

pub use page::{escape_html, render_output, render_page};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8050";

/// Shared, read-only server state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub table: Arc<SalesTable>,
    pub layout: Arc<DashboardLayout>,
}

impl AppState {
    pub fn new(table: SalesTable) -> Self {
        let layout = DashboardLayout::from_table(&table);
        Self {
            table: Arc::new(table),
            layout: Arc::new(layout),
        }
    }
}

/// Control values as they arrive in a query string.
///
/// The page form submits the control ids as field names, the JSON API uses
/// the short names. Both are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    #[serde(default, alias = "dropdown-statistics")]
    pub statistics: Option<String>,
    #[serde(default, alias = "select-year")]
    pub year: Option<String>,
}

impl SelectionQuery {
    /// Resolve into controller inputs. A blank report type counts as no
    /// selection; a missing or unparsable year falls back to the layout's default.
    pub fn controls(&self, layout: &DashboardLayout) -> Controls {
        let statistics = self
            .statistics
            .clone()
            .filter(|s| !s.trim().is_empty());

        let year = self
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<i32>().ok())
            .unwrap_or_else(|| layout.default_year());

        Controls { statistics, year }
    }
}

#[derive(Debug, Serialize)]
pub struct YearDisabledResponse {
    pub disabled: bool,
}

type HandlerError = (StatusCode, String);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/layout", get(layout_json))
        .route("/api/year-disabled", get(year_disabled_json))
        .route("/api/report", get(report_json))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), AppError> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::new(4, format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("dashboard listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::new(4, format!("Server error: {e}")))
}

fn dashboard_for<'t>(state: &'t AppState, query: &SelectionQuery) -> Result<Dashboard<'t>, HandlerError> {
    let controls = query.controls(&state.layout);
    Dashboard::with_controls(&state.table, controls).map_err(internal_error)
}

fn internal_error(err: AppError) -> HandlerError {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.message().to_string())
}

async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Html<String>, HandlerError> {
    let dashboard = dashboard_for(&state, &query)?;
    let html = render_page(&state.layout, dashboard.controls(), dashboard.view()).map_err(internal_error)?;
    Ok(Html(html))
}

async fn layout_json(State(state): State<AppState>) -> Json<DashboardLayout> {
    Json(state.layout.as_ref().clone())
}

async fn year_disabled_json(Query(query): Query<SelectionQuery>) -> Json<YearDisabledResponse> {
    Json(YearDisabledResponse {
        disabled: year_selector_disabled(query.statistics.as_deref()),
    })
}

async fn report_json(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<ReportOutput>, HandlerError> {
    let dashboard = dashboard_for(&state, &query)?;
    Ok(Json(dashboard.view().output.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{record, table};

    fn state() -> AppState {
        AppState::new(table(vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 10.0, 5.0),
            record(1980, "Feb", 1, "Truck", 200.0, 30.0, 6.0),
            record(2020, "Mar", 1, "Sedan", 50.0, 5.0, 9.0),
            record(2021, "Jan", 0, "Sedan", 80.0, 7.0, 4.0),
        ]))
    }

    fn query(statistics: Option<&str>, year: Option<&str>) -> Query<SelectionQuery> {
        Query(SelectionQuery {
            statistics: statistics.map(str::to_string),
            year: year.map(str::to_string),
        })
    }

    #[test]
    fn query_defaults_year_and_blanks_statistics() {
        let s = state();
        let controls = SelectionQuery {
            statistics: Some("  ".to_string()),
            year: Some("not-a-year".to_string()),
        }
        .controls(&s.layout);

        assert_eq!(controls.statistics, None);
        assert_eq!(controls.year, 1980);
    }

    #[tokio::test]
    async fn year_disabled_endpoint_follows_selection() {
        let Json(none) = year_disabled_json(query(None, None)).await;
        assert!(none.disabled);

        let Json(yearly) = year_disabled_json(query(Some("Yearly Statistics"), None)).await;
        assert!(!yearly.disabled);
    }

    #[tokio::test]
    async fn padded_report_type_selects_nothing() {
        let Json(output) = report_json(State(state()), query(Some(" Yearly Statistics "), Some("1980")))
            .await
            .unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn report_endpoint_renders_charts_and_alerts() {
        let Json(charts) = report_json(State(state()), query(Some("Recession Statistics"), Some("1980")))
            .await
            .unwrap();
        assert_eq!(charts.charts().count(), 4);

        let Json(alert) = report_json(State(state()), query(Some("Recession Statistics"), Some("2020")))
            .await
            .unwrap();
        assert!(matches!(alert, ReportOutput::Alert(_)));

        let Json(empty) = report_json(State(state()), query(Some("Global Statistics"), Some("1980")))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn index_page_renders_selected_mode() {
        let Html(html) = index_page(State(state()), query(Some("Yearly Statistics"), Some("2021")))
            .await
            .unwrap();

        assert!(html.contains("<h1>Automobile Sales Statistics Dashboard</h1>"));
        assert!(html.contains("<option value=\"2021\" selected>2021</option>"));
        assert_eq!(html.matches("<svg").count(), 4);
    }

    #[tokio::test]
    async fn layout_endpoint_lists_year_options() {
        let Json(layout) = layout_json(State(state())).await;
        assert_eq!(layout.years, vec![1980, 2020, 2021]);
        assert_eq!(layout.statistics.options.len(), 2);
    }
}
