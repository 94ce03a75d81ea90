//! Per-account summary projections: terminal fund value at retirement, how
//! long the desired income can be sustained, and the level monthly income a
//! fixed drawdown horizon would pay.

use super::annuity::{future_value, number_of_periods, payment};
use super::rules::{compute_contributions, compute_withdrawals};
use super::types::{AccountKind, AccountSummary, CoreError, Inputs, ProjectionResult};

pub fn funds_at_retirement(inputs: &Inputs) -> Result<Vec<(AccountKind, f64)>, CoreError> {
    let rate = inputs.growth_rate / 100.0 / 12.0;
    let deposits = compute_contributions(inputs);
    inputs
        .account_set()
        .into_iter()
        .map(|kind| {
            let fund = future_value(
                rate,
                inputs.accumulation_months(),
                deposits.for_kind(kind),
                0.0,
            )?;
            Ok((kind, fund))
        })
        .collect()
}

/// Funds at retirement when contributions stop at the restricted lockout and
/// then grow untouched for the remaining lockout years.
pub fn truncated_funds_at_retirement(
    inputs: &Inputs,
) -> Result<Vec<(AccountKind, f64)>, CoreError> {
    let lockout_years = inputs.rules.restricted_lockout_years;
    if inputs.years_to_retirement <= lockout_years {
        return Err(CoreError::TruncationUnavailable {
            years_to_retirement: inputs.years_to_retirement,
            lockout_years,
        });
    }
    let rate = inputs.growth_rate / 100.0 / 12.0;
    let contribution_months = (inputs.years_to_retirement - lockout_years) * 12;
    let deposits = compute_contributions(inputs);
    inputs
        .account_set()
        .into_iter()
        .map(|kind| {
            let at_lockout =
                future_value(rate, contribution_months, deposits.for_kind(kind), 0.0)?;
            let fund = future_value(rate, lockout_years * 12, 0.0, at_lockout)?;
            Ok((kind, fund))
        })
        .collect()
}

fn summarize(
    inputs: &Inputs,
    funds: Vec<(AccountKind, f64)>,
) -> Result<ProjectionResult, CoreError> {
    let rate = inputs.retirement_growth_rate / 100.0 / 12.0;
    let withdrawals = compute_withdrawals(inputs);
    let accounts = funds
        .into_iter()
        .map(|(kind, fund)| {
            let duration =
                number_of_periods(rate, -withdrawals.for_kind(kind), fund, 0.0)?;
            let gross_payment = -payment(rate, inputs.drawdown_months(), fund, 0.0)?;
            Ok(AccountSummary {
                kind,
                fund_at_retirement: fund,
                withdrawal_duration: duration,
                fixed_term_monthly_income: kind.net_withdrawal(
                    gross_payment,
                    inputs.retirement_tax_band,
                    &inputs.rules,
                ),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;
    Ok(ProjectionResult { accounts })
}

pub fn project_summary(inputs: &Inputs) -> Result<ProjectionResult, CoreError> {
    summarize(inputs, funds_at_retirement(inputs)?)
}

/// Same availability rule as [`super::schedule::build_truncated_schedule`].
pub fn project_truncated_summary(inputs: &Inputs) -> Result<ProjectionResult, CoreError> {
    summarize(inputs, truncated_funds_at_retirement(inputs)?)
}
