use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    AccountAmounts, CoreError, Inputs, MonthlyRecord, PensionRelief, ProjectionResult, TaxBand,
    TaxRules, build_schedule, build_truncated_schedule, compute_contributions,
    compute_withdrawals, pension_relief, project_summary, project_truncated_summary,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

// Monthly deposit above which the restricted account's £4,000 yearly cap
// would be breached. Warning threshold only; the engine still computes.
const RESTRICTED_MONTHLY_CAP: f64 = 4_000.0 / 12.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTaxBand {
    Basic,
    Higher,
}

impl From<CliTaxBand> for TaxBand {
    fn from(value: CliTaxBand) -> Self {
        match value {
            CliTaxBand::Basic => TaxBand::Basic,
            CliTaxBand::Higher => TaxBand::Higher,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiTaxBand {
    #[serde(alias = "brt", alias = "BRT")]
    Basic,
    #[serde(alias = "hrt", alias = "HRT")]
    Higher,
}

impl From<ApiTaxBand> for CliTaxBand {
    fn from(value: ApiTaxBand) -> Self {
        match value {
            ApiTaxBand::Basic => CliTaxBand::Basic,
            ApiTaxBand::Higher => CliTaxBand::Higher,
        }
    }
}

// The HTTP payload is applied on top of these defaults, so the arg help text
// is the single description of every knob.
#[derive(Debug, Parser)]
#[command(name = "nestegg")]
struct Cli {
    #[arg(
        long,
        default_value_t = 200.0,
        help = "Net monthly amount to save, before relief or bonus (£)"
    )]
    monthly_deposit: f64,
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        help = "Include the restricted (LISA-style) account in the comparison"
    )]
    include_restricted: bool,
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        help = "Contributions go through a salary sacrifice pension scheme"
    )]
    salary_sacrifice: bool,
    #[arg(
        long,
        value_enum,
        default_value_t = CliTaxBand::Higher,
        help = "Tax band while contributing"
    )]
    current_tax_band: CliTaxBand,
    #[arg(
        long,
        value_enum,
        default_value_t = CliTaxBand::Basic,
        help = "Expected tax band in retirement"
    )]
    retirement_tax_band: CliTaxBand,
    #[arg(long, default_value_t = 20, help = "Years until retirement")]
    years_to_retirement: u32,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Annual growth before retirement in percent"
    )]
    growth_rate: f64,
    #[arg(
        long,
        help = "Desired net monthly income in retirement (£); defaults to the monthly deposit"
    )]
    monthly_withdrawal: Option<f64>,
    #[arg(
        long,
        help = "Annual growth during drawdown in percent; defaults to the pre-retirement rate"
    )]
    retirement_growth_rate: Option<f64>,
    #[arg(long, default_value_t = 20, help = "Years of drawdown")]
    drawdown_years: u32,
}

fn default_cli() -> Cli {
    Cli::parse_from(["nestegg"])
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    monthly_deposit: Option<f64>,
    include_restricted: Option<bool>,
    salary_sacrifice: Option<bool>,
    current_tax_band: Option<ApiTaxBand>,
    retirement_tax_band: Option<ApiTaxBand>,
    years_to_retirement: Option<u32>,
    growth_rate: Option<f64>,
    monthly_withdrawal: Option<f64>,
    retirement_growth_rate: Option<f64>,
    drawdown_years: Option<u32>,
}

fn apply_payload(mut cli: Cli, payload: ProjectPayload) -> Cli {
    if let Some(value) = payload.monthly_deposit {
        cli.monthly_deposit = value;
    }
    if let Some(value) = payload.include_restricted {
        cli.include_restricted = value;
    }
    if let Some(value) = payload.salary_sacrifice {
        cli.salary_sacrifice = value;
    }
    if let Some(value) = payload.current_tax_band {
        cli.current_tax_band = value.into();
    }
    if let Some(value) = payload.retirement_tax_band {
        cli.retirement_tax_band = value.into();
    }
    if let Some(value) = payload.years_to_retirement {
        cli.years_to_retirement = value;
    }
    if let Some(value) = payload.growth_rate {
        cli.growth_rate = value;
    }
    if let Some(value) = payload.monthly_withdrawal {
        cli.monthly_withdrawal = Some(value);
    }
    if let Some(value) = payload.retirement_growth_rate {
        cli.retirement_growth_rate = Some(value);
    }
    if let Some(value) = payload.drawdown_years {
        cli.drawdown_years = value;
    }
    cli
}

fn build_inputs(cli: Cli) -> Result<Inputs, String> {
    if !cli.monthly_deposit.is_finite()
        || cli.monthly_deposit <= 0.0
        || cli.monthly_deposit > 100_000.0
    {
        return Err("--monthly-deposit must be between 0 and 100000".to_string());
    }

    if cli.years_to_retirement == 0 || cli.years_to_retirement > 100 {
        return Err("--years-to-retirement must be between 1 and 100".to_string());
    }

    if !(0.0..=100.0).contains(&cli.growth_rate) {
        return Err("--growth-rate must be between 0 and 100".to_string());
    }

    let monthly_withdrawal = cli.monthly_withdrawal.unwrap_or(cli.monthly_deposit);
    if !monthly_withdrawal.is_finite()
        || monthly_withdrawal <= 0.0
        || monthly_withdrawal > 100_000.0
    {
        return Err("--monthly-withdrawal must be between 0 and 100000".to_string());
    }

    let retirement_growth_rate = cli.retirement_growth_rate.unwrap_or(cli.growth_rate);
    if !(0.0..=100.0).contains(&retirement_growth_rate) {
        return Err("--retirement-growth-rate must be between 0 and 100".to_string());
    }

    if cli.drawdown_years == 0 || cli.drawdown_years > 100 {
        return Err("--drawdown-years must be between 1 and 100".to_string());
    }

    Ok(Inputs {
        monthly_deposit: cli.monthly_deposit,
        include_restricted: cli.include_restricted,
        salary_sacrifice: cli.salary_sacrifice,
        current_tax_band: cli.current_tax_band.into(),
        retirement_tax_band: cli.retirement_tax_band.into(),
        years_to_retirement: cli.years_to_retirement,
        growth_rate: cli.growth_rate,
        monthly_withdrawal,
        retirement_growth_rate,
        drawdown_years: cli.drawdown_years,
        rules: TaxRules::default(),
    })
}

fn api_request_from_json(json: &str) -> Result<Inputs, String> {
    let payload: ProjectPayload =
        serde_json::from_str(json).map_err(|e| format!("invalid request body: {e}"))?;
    build_inputs(apply_payload(default_cli(), payload))
}

// Advisory notes the front end shows alongside the results; the engine
// itself never warns.
fn collect_warnings(inputs: &Inputs) -> Vec<String> {
    let mut warnings = Vec::new();
    let lockout = inputs.rules.restricted_lockout_years;

    if inputs.include_restricted && inputs.monthly_deposit > RESTRICTED_MONTHLY_CAP {
        warnings.push(format!(
            "Saving £{:.2} per month would exceed the restricted account's yearly \
             deposit cap; its figures assume the full amount is deposited.",
            inputs.monthly_deposit
        ));
    }

    if inputs.include_restricted {
        if inputs.years_to_retirement <= lockout {
            warnings.push(format!(
                "With {} years to retirement the restricted account could not be \
                 contributed to at all; its lockout starts {lockout} years before \
                 withdrawals can begin.",
                inputs.years_to_retirement
            ));
        } else if inputs.years_to_retirement <= 2 * lockout {
            warnings.push(format!(
                "With {} years to retirement, check the restricted account can still \
                 be opened and contributed to before its lockout begins.",
                inputs.years_to_retirement
            ));
        }
    }

    if inputs.current_tax_band == TaxBand::Basic && inputs.retirement_tax_band == TaxBand::Higher
    {
        warnings.push(
            "Paying basic rate now but higher rate in retirement is unusual; \
             double-check the tax band selections."
                .to_string(),
        );
    }

    if inputs.monthly_withdrawal < inputs.monthly_deposit {
        warnings.push(
            "The desired withdrawal is below the monthly deposit, so every account \
             can sustain it indefinitely regardless of growth."
                .to_string(),
        );
    }

    if inputs.retirement_growth_rate > inputs.growth_rate {
        warnings.push(
            "Growth in retirement is set above pre-retirement growth; portfolios are \
             usually de-risked at retirement."
                .to_string(),
        );
    }

    warnings
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TruncatedProjection {
    schedule: Vec<MonthlyRecord>,
    summary: ProjectionResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    contributions: AccountAmounts,
    withdrawals: AccountAmounts,
    pension_relief: PensionRelief,
    summary: ProjectionResult,
    schedule: Vec<MonthlyRecord>,
    truncated: Option<TruncatedProjection>,
    truncated_unavailable: Option<String>,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_project_response(inputs: &Inputs) -> Result<ProjectResponse, CoreError> {
    let summary = project_summary(inputs)?;
    let schedule = build_schedule(inputs, &inputs.account_set())?;

    let (truncated, truncated_unavailable) = match build_truncated_schedule(inputs) {
        Ok(truncated_schedule) => (
            Some(TruncatedProjection {
                schedule: truncated_schedule,
                summary: project_truncated_summary(inputs)?,
            }),
            None,
        ),
        Err(error @ CoreError::TruncationUnavailable { .. }) => (None, Some(error.to_string())),
        Err(error) => return Err(error),
    };

    Ok(ProjectResponse {
        contributions: compute_contributions(inputs),
        withdrawals: compute_withdrawals(inputs),
        pension_relief: pension_relief(inputs),
        summary,
        schedule,
        truncated,
        truncated_unavailable,
        warnings: collect_warnings(inputs),
    })
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = serde_json::to_string(&ErrorResponse { error: message })
        .unwrap_or_else(|_| "{\"error\":\"internal error\"}".to_string());
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn project(body: String) -> Response {
    let inputs = match api_request_from_json(&body) {
        Ok(inputs) => inputs,
        Err(message) => {
            warn!(%message, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    match build_project_response(&inputs) {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(json) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                json,
            )
                .into_response(),
            Err(error) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to serialize response: {error}"),
            ),
        },
        Err(error) => {
            warn!(%error, "projection failed");
            error_response(StatusCode::BAD_REQUEST, error.to_string())
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn styles() -> Response {
    ([(header::CONTENT_TYPE, "text/css")], STYLES_CSS).into_response()
}

async fn app_js() -> Response {
    ([(header::CONTENT_TYPE, "application/javascript")], APP_JS).into_response()
}

pub async fn run_http_server(port: u16) -> Result<(), std::io::Error> {
    let app = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(app_js))
        .route("/api/project", post(project));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await
}
