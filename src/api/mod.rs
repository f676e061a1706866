use axum::{
    Router,
    extract::Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::core::{
    DEFAULT_RUNS, Inputs, MonteCarloConfig, MortgageCondition, MortgageStats, SimulationError,
    SummarizedMortgagePayment, YearlyExpenses, run_conditions,
};

pub const DEFAULT_PORT: u16 = 8000;
const MAX_RUNS: usize = 10_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInput {
    pub principal: f64,
    pub current_euribor: f64,
    pub yearly_variance: f64,
    pub yearly_expenses: f64,
}

impl GeneralInput {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = |field: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimulationError::invalid_input(field, "must be > 0"))
            }
        };
        positive("principal", self.principal)?;
        positive("currentEuribor", self.current_euribor)?;
        positive("yearlyVariance", self.yearly_variance)?;
        if !self.yearly_expenses.is_finite() {
            return Err(SimulationError::invalid_input(
                "yearlyExpenses",
                "must be finite",
            ));
        }
        Ok(())
    }

    pub fn to_inputs(&self) -> Inputs {
        Inputs {
            principal: self.principal,
            current_euribor: self.current_euribor,
            yearly_volatility: self.yearly_variance,
            yearly_expenses: YearlyExpenses::single(self.yearly_expenses),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub general_input: GeneralInput,
    pub conditions: Vec<MortgageCondition>,
    #[serde(default)]
    pub runs: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationRequest {
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.general_input.validate()?;

        if let Some(runs) = self.runs {
            if runs == 0 || runs > MAX_RUNS {
                return Err(SimulationError::invalid_input(
                    "runs",
                    &format!("must be between 1 and {MAX_RUNS}"),
                ));
            }
        }

        let mut names = HashSet::with_capacity(self.conditions.len());
        for condition in &self.conditions {
            condition.validate()?;
            if !names.insert(condition.name.as_str()) {
                return Err(SimulationError::DuplicateCondition(condition.name.clone()));
            }
        }
        Ok(())
    }

    pub fn config(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            runs: self.runs.unwrap_or(DEFAULT_RUNS),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub average_results: BTreeMap<String, Vec<MortgageStats>>,
    pub average_mortgage_payments: BTreeMap<String, Vec<SummarizedMortgagePayment>>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn request_from_json(json: &str) -> Result<SimulationRequest, SimulationError> {
    Ok(serde_json::from_str::<SimulationRequest>(json)?)
}

pub fn run_simulation(request: &SimulationRequest) -> Result<SimulationResponse, SimulationError> {
    request.validate()?;

    let inputs = request.general_input.to_inputs();
    let results = run_conditions(&inputs, &request.conditions, request.config())?;

    let mut average_results = BTreeMap::new();
    let mut average_mortgage_payments = BTreeMap::new();
    for result in results {
        average_results.insert(result.name.clone(), result.stats);
        average_mortgage_payments.insert(result.name, result.yearly);
    }

    Ok(SimulationResponse {
        average_results,
        average_mortgage_payments,
    })
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/simulate", post(simulate_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "mortgage simulator API listening");

    axum::serve(listener, router()).await
}

async fn root_handler() -> Response {
    json_response(
        StatusCode::OK,
        MessageResponse {
            message: "Mortgage Simulator API",
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(Json(request): Json<SimulationRequest>) -> Response {
    info!(
        conditions = request.conditions.len(),
        runs = request.runs.unwrap_or(DEFAULT_RUNS),
        seeded = request.seed.is_some(),
        "received simulation request"
    );

    match tokio::task::spawn_blocking(move || run_simulation(&request)).await {
        Ok(Ok(response)) => json_response(StatusCode::OK, response),
        Ok(Err(e)) => {
            warn!(error = %e, "rejected simulation request");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            error!(error = %e, "simulation task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Simulation failed")
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
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
