use std::fs;
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::{
    BudgetState, MAX_HORIZON_YEARS, PlanKind, ProjectionSettings, ProjectionSummary, ProjectionYear, RevenuePlan,
    Scenario, SettingsStore, SpendingPlan, YearOverlay, YearOverlayStore, apply_overlay,
    project_all, snapshot_from_state, summarize,
};

const MIN_YEAR: i32 = 1800;
const MAX_YEAR: i32 = 2500;

#[derive(Parser, Debug)]
#[command(
    name = "fiscal",
    about = "Federal budget projection engine (multi-year deficit, debt-to-GDP and what-if overlays)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the JSON HTTP API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Project a budget state and print the result as JSON.
    Project(ProjectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(long, help = "Budget state JSON document")]
    pub budget: PathBuf,
    #[arg(long, help = "Projection settings JSON; factory defaults when omitted")]
    pub settings: Option<PathBuf>,
    #[arg(long, help = "Named preset merged onto the settings, e.g. recession")]
    pub preset: Option<String>,
    #[arg(long, help = "Planning horizon in years, overrides settings")]
    pub horizon: Option<i32>,
    #[arg(long, help = "Base year, overrides settings")]
    pub base_year: Option<i32>,
    #[arg(long, default_value_t = false, help = "Pretty-print the JSON output")]
    pub pretty: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("unknown plan kind '{0}'; expected revenue or spending")]
    UnknownPlanKind(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::UnknownPlanKind(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::UnknownPreset(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    budget: BudgetState,
    settings: Option<ProjectionSettings>,
    apply_overlays: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    years: Vec<ProjectionYear>,
    summary: Option<ProjectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    with_overlays: Option<Vec<ProjectionYear>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlannedRateQuery {
    source: String,
    year: i32,
    fallback: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlannedFactorQuery {
    category: String,
    year: i32,
    fallback: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PlannedValueResponse {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DeltaPayload {
    pct: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveScenarioPayload {
    year: i32,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveScenarioResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone, Default)]
struct AppState {
    inner: Arc<Mutex<ServerInner>>,
}

#[derive(Debug, Default)]
struct ServerInner {
    settings: SettingsStore,
    overlays: YearOverlayStore,
}

impl ServerInner {
    fn project(&self, payload: ProjectPayload) -> Result<ProjectResponse, ApiError> {
        let snapshot = snapshot_from_state(&payload.budget);
        let settings = match payload.settings {
            Some(settings) => Arc::new(settings),
            None => self.settings.snapshot(),
        };
        validate_settings(&settings).map_err(ApiError::BadRequest)?;
        let years = project_all(Some(&snapshot), Some(&settings));
        let summary = summarize(&years);
        let with_overlays = payload.apply_overlays.then(|| {
            years
                .iter()
                .map(|year| match self.overlays.existing_overlay(year.year) {
                    Some(overlay) => apply_overlay(year, &overlay),
                    None => year.clone(),
                })
                .collect()
        });
        Ok(ProjectResponse {
            years,
            summary,
            with_overlays,
        })
    }

    fn replace_settings(
        &mut self,
        settings: ProjectionSettings,
    ) -> Result<Arc<ProjectionSettings>, ApiError> {
        validate_settings(&settings).map_err(ApiError::BadRequest)?;
        self.settings.replace(settings);
        Ok(self.settings.snapshot())
    }

    fn planned_rate(&self, query: &PlannedRateQuery) -> Result<PlannedValueResponse, ApiError> {
        validate_year("year", query.year).map_err(ApiError::BadRequest)?;
        let value = self
            .settings
            .planned_rate_for_year(&query.source, query.year, query.fallback);
        Ok(PlannedValueResponse { value })
    }

    fn planned_factor(
        &self,
        query: &PlannedFactorQuery,
    ) -> Result<PlannedValueResponse, ApiError> {
        validate_year("year", query.year).map_err(ApiError::BadRequest)?;
        let value = self
            .settings
            .planned_factor_for_year(&query.category, query.year, query.fallback);
        Ok(PlannedValueResponse { value })
    }

    fn apply_preset(&mut self, name: &str) -> Result<Arc<ProjectionSettings>, ApiError> {
        if !self.settings.apply_preset(name) {
            return Err(ApiError::UnknownPreset(name.to_string()));
        }
        Ok(self.settings.snapshot())
    }

    fn set_plan(
        &mut self,
        kind: &str,
        id: &str,
        body: serde_json::Value,
    ) -> Result<Arc<ProjectionSettings>, ApiError> {
        match parse_plan_kind(kind)? {
            PlanKind::Revenue => {
                let plan = plan_from_json::<RevenuePlan>(body)?;
                self.settings.set_revenue_plan(id, plan);
            }
            PlanKind::Spending => {
                let plan = plan_from_json::<SpendingPlan>(body)?;
                self.settings.set_spending_plan(id, plan);
            }
        }
        Ok(self.settings.snapshot())
    }

    fn clear_plan(&mut self, kind: &str, id: &str) -> Result<Arc<ProjectionSettings>, ApiError> {
        let kind = parse_plan_kind(kind)?;
        self.settings.clear_plan(id, kind);
        Ok(self.settings.snapshot())
    }

    fn set_delta(
        &mut self,
        year: i32,
        kind: &str,
        key: &str,
        pct: f64,
    ) -> Result<Arc<YearOverlay>, ApiError> {
        if !pct.is_finite() {
            return Err(ApiError::BadRequest("pct must be a finite number".to_string()));
        }
        match parse_plan_kind(kind)? {
            PlanKind::Revenue => self.overlays.set_revenue_delta(year, key, pct),
            PlanKind::Spending => self.overlays.set_spending_delta(year, key, pct),
        }
        Ok(self.overlays.overlay(year))
    }

    fn load_scenario(&mut self, id: &str) -> Result<Arc<YearOverlay>, ApiError> {
        if !self.overlays.load_scenario(id) {
            return Err(ApiError::NotFound(format!("scenario '{id}' not found")));
        }
        let year = self
            .overlays
            .scenarios()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.year.clone())
            .ok_or_else(|| ApiError::NotFound(format!("scenario '{id}' not found")))?;
        Ok(self.overlays.overlay(year))
    }
}

fn validate_settings(settings: &ProjectionSettings) -> Result<(), String> {
    let planning = settings.planning;
    if planning.horizon_years > MAX_HORIZON_YEARS {
        return Err(format!("horizonYears must be <= {MAX_HORIZON_YEARS}"));
    }
    validate_year("baseYear", planning.base_year)?;
    let last_year = planning.base_year + planning.horizon_years.max(1) - 1;
    validate_year("baseYear + horizonYears", last_year)
}

fn validate_year(field: &str, year: i32) -> Result<(), String> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(format!("{field} must be between {MIN_YEAR} and {MAX_YEAR}"));
    }
    Ok(())
}

fn parse_plan_kind(kind: &str) -> Result<PlanKind, ApiError> {
    kind.parse::<PlanKind>()
        .map_err(|_| ApiError::UnknownPlanKind(kind.to_string()))
}

fn plan_from_json<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(format!("invalid plan: {e}")))
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Serve { port } => run_http_server(port).await?,
        Command::Project(args) => {
            let output = run_projection_command(&args)?;
            println!("{output}");
        }
    }
    Ok(())
}

pub fn run_projection_command(args: &ProjectArgs) -> Result<String, CliError> {
    let response = build_projection_report(args)?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    Ok(output)
}

fn build_projection_report(args: &ProjectArgs) -> Result<ProjectResponse, CliError> {
    if args.horizon.is_some_and(|horizon| horizon <= 0) {
        return Err(CliError::InvalidArgument(
            "--horizon must be > 0".to_string(),
        ));
    }

    let budget = read_json::<BudgetState>(&args.budget)?;
    let settings = match &args.settings {
        Some(path) => read_json::<ProjectionSettings>(path)?,
        None => crate::core::factory_settings(),
    };

    let mut store = SettingsStore::new(settings);
    if let Some(name) = &args.preset
        && !store.apply_preset(name)
    {
        return Err(CliError::UnknownPreset(name.clone()));
    }
    let mut settings = ProjectionSettings::clone(&store.snapshot());
    if let Some(horizon) = args.horizon {
        settings.planning.horizon_years = horizon;
    }
    if let Some(base_year) = args.base_year {
        settings.planning.base_year = base_year;
    }

    validate_settings(&settings).map_err(CliError::InvalidArgument)?;

    info!(
        budget = %args.budget.display(),
        base_year = settings.planning.base_year,
        horizon = settings.planning.horizon_years,
        "running projection"
    );
    let inner = ServerInner {
        settings: SettingsStore::new(settings),
        overlays: YearOverlayStore::new(),
    };
    inner
        .project(ProjectPayload {
            budget,
            settings: None,
            apply_overlays: false,
        })
        .map_err(|e| CliError::InvalidArgument(e.to_string()))
}

fn read_json<T: DeserializeOwned>(path: &FsPath) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/project", post(project_handler))
        .route(
            "/api/settings",
            get(get_settings_handler).put(put_settings_handler),
        )
        .route("/api/settings/presets", get(list_presets_handler))
        .route("/api/settings/presets/:name", post(apply_preset_handler))
        .route(
            "/api/settings/spending-growth/reset",
            post(reset_all_growth_handler),
        )
        .route(
            "/api/settings/spending-growth/:key/reset",
            post(reset_growth_key_handler),
        )
        .route(
            "/api/settings/plans/:kind/:id",
            put(set_plan_handler).delete(clear_plan_handler),
        )
        .route("/api/settings/planned-rate", get(planned_rate_handler))
        .route("/api/settings/planned-factor", get(planned_factor_handler))
        .route(
            "/api/overlays/:year",
            get(get_overlay_handler).delete(reset_overlay_handler),
        )
        .route("/api/overlays/:year/:kind/:key", put(set_delta_handler))
        .route(
            "/api/scenarios",
            get(list_scenarios_handler).post(save_scenario_handler),
        )
        .route("/api/scenarios/:id", delete(delete_scenario_handler))
        .route("/api/scenarios/:id/load", post(load_scenario_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(AppState::default());

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fiscal HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/health");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn project_handler(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Response, ApiError> {
    let inner = state.inner.lock().await;
    let response = inner.project(payload)?;
    debug!(years = response.years.len(), "projection served");
    Ok(json_response(StatusCode::OK, response))
}

async fn get_settings_handler(State(state): State<AppState>) -> Response {
    let inner = state.inner.lock().await;
    json_response(StatusCode::OK, inner.settings.settings())
}

async fn put_settings_handler(
    State(state): State<AppState>,
    Json(settings): Json<ProjectionSettings>,
) -> Result<Response, ApiError> {
    let mut inner = state.inner.lock().await;
    let settings = inner.replace_settings(settings)?;
    Ok(json_response(StatusCode::OK, &*settings))
}

async fn list_presets_handler(State(state): State<AppState>) -> Response {
    let inner = state.inner.lock().await;
    json_response(StatusCode::OK, inner.settings.preset_names())
}

async fn apply_preset_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let mut inner = state.inner.lock().await;
    let settings = inner.apply_preset(&name)?;
    Ok(json_response(StatusCode::OK, &*settings))
}

async fn reset_all_growth_handler(State(state): State<AppState>) -> Response {
    let mut inner = state.inner.lock().await;
    inner.settings.reset_all_spending_growth();
    json_response(StatusCode::OK, inner.settings.settings())
}

async fn reset_growth_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Response {
    let mut inner = state.inner.lock().await;
    inner.settings.reset_spending_growth_key(&key);
    json_response(StatusCode::OK, inner.settings.settings())
}

async fn set_plan_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let mut inner = state.inner.lock().await;
    let settings = inner.set_plan(&kind, &id, body)?;
    Ok(json_response(StatusCode::OK, &*settings))
}

async fn clear_plan_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let mut inner = state.inner.lock().await;
    let settings = inner.clear_plan(&kind, &id)?;
    Ok(json_response(StatusCode::OK, &*settings))
}

async fn planned_rate_handler(
    State(state): State<AppState>,
    Query(query): Query<PlannedRateQuery>,
) -> Result<Response, ApiError> {
    let inner = state.inner.lock().await;
    let response = inner.planned_rate(&query)?;
    Ok(json_response(StatusCode::OK, response))
}

async fn planned_factor_handler(
    State(state): State<AppState>,
    Query(query): Query<PlannedFactorQuery>,
) -> Result<Response, ApiError> {
    let inner = state.inner.lock().await;
    let response = inner.planned_factor(&query)?;
    Ok(json_response(StatusCode::OK, response))
}

async fn get_overlay_handler(State(state): State<AppState>, Path(year): Path<i32>) -> Response {
    let mut inner = state.inner.lock().await;
    json_response(StatusCode::OK, &*inner.overlays.overlay(year))
}

async fn reset_overlay_handler(State(state): State<AppState>, Path(year): Path<i32>) -> Response {
    let mut inner = state.inner.lock().await;
    inner.overlays.reset_year(year);
    json_response(StatusCode::OK, &*inner.overlays.overlay(year))
}

async fn set_delta_handler(
    State(state): State<AppState>,
    Path((year, kind, key)): Path<(i32, String, String)>,
    Json(payload): Json<DeltaPayload>,
) -> Result<Response, ApiError> {
    let mut inner = state.inner.lock().await;
    let overlay = inner.set_delta(year, &kind, &key, payload.pct)?;
    Ok(json_response(StatusCode::OK, &*overlay))
}

async fn list_scenarios_handler(State(state): State<AppState>) -> Response {
    let inner = state.inner.lock().await;
    let scenarios: Vec<Scenario> = inner.overlays.scenarios().to_vec();
    json_response(StatusCode::OK, scenarios)
}

async fn save_scenario_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveScenarioPayload>,
) -> Response {
    let mut inner = state.inner.lock().await;
    let id = inner
        .overlays
        .save_scenario(payload.year, payload.name.as_deref());
    json_response(StatusCode::CREATED, SaveScenarioResponse { id })
}

async fn load_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let mut inner = state.inner.lock().await;
    let overlay = inner.load_scenario(&id)?;
    Ok(json_response(StatusCode::OK, &*overlay))
}

async fn delete_scenario_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let mut inner = state.inner.lock().await;
    inner.overlays.delete_scenario(&id);
    StatusCode::NO_CONTENT.into_response()
}

async fn not_found_handler() -> Response {
    ApiError::NotFound("Not found".to_string()).into_response()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
