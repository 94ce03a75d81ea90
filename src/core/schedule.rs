//! Month-by-month accumulation and drawdown schedules: one continuous series
//! of [`MonthlyRecord`] rows with the month index running straight through
//! the retirement boundary. The truncated variant inserts a growth-only
//! phase covering the restricted account's contribution lockout, applied to
//! every account so the comparison stays like-for-like.

use super::annuity::future_value_series;
use super::rules::{compute_contributions, compute_withdrawals};
use super::types::{AccountFlow, AccountKind, CoreError, Inputs, MonthlyRecord};

struct AccountTrack {
    kind: AccountKind,
    flows: Vec<f64>,
    balances: Vec<f64>,
}

struct Phase {
    months: u32,
    growth_rate: f64,
    net_cash_flow: f64,
}

fn assemble(phases: &[Phase], tracks: Vec<AccountTrack>) -> Vec<MonthlyRecord> {
    let total_months: u32 = phases.iter().map(|phase| phase.months).sum();
    let mut records = Vec::with_capacity(total_months as usize);
    let mut month = 0u32;
    for phase in phases {
        for _ in 0..phase.months {
            let index = month as usize;
            month += 1;
            records.push(MonthlyRecord {
                month,
                growth_rate: phase.growth_rate,
                net_cash_flow: phase.net_cash_flow,
                accounts: tracks
                    .iter()
                    .map(|track| AccountFlow {
                        kind: track.kind,
                        flow: track.flows[index],
                        balance: track.balances[index],
                    })
                    .collect(),
            });
        }
    }
    records
}

/// Full accumulation-plus-drawdown schedule for the requested accounts only;
/// unrequested accounts are never computed.
pub fn build_schedule(
    inputs: &Inputs,
    accounts: &[AccountKind],
) -> Result<Vec<MonthlyRecord>, CoreError> {
    let pre_rate = inputs.growth_rate / 100.0 / 12.0;
    let post_rate = inputs.retirement_growth_rate / 100.0 / 12.0;
    let accumulation_months = inputs.accumulation_months();
    let drawdown_months = inputs.drawdown_months();
    let deposits = compute_contributions(inputs);
    let withdrawals = compute_withdrawals(inputs);

    let mut tracks = Vec::with_capacity(accounts.len());
    for &kind in accounts {
        let deposit = deposits.for_kind(kind);
        let withdrawal = withdrawals.for_kind(kind);
        let mut balances = future_value_series(pre_rate, accumulation_months, deposit, 0.0)?;
        let fund_at_retirement = balances.last().copied().unwrap_or(0.0);
        balances.extend(future_value_series(
            post_rate,
            drawdown_months,
            -withdrawal,
            fund_at_retirement,
        )?);

        let mut flows = vec![deposit; accumulation_months as usize];
        flows.extend(vec![-withdrawal; drawdown_months as usize]);
        tracks.push(AccountTrack {
            kind,
            flows,
            balances,
        });
    }

    let phases = [
        Phase {
            months: accumulation_months,
            growth_rate: inputs.growth_rate,
            net_cash_flow: -inputs.monthly_deposit,
        },
        Phase {
            months: drawdown_months,
            growth_rate: inputs.retirement_growth_rate,
            net_cash_flow: inputs.monthly_withdrawal,
        },
    ];
    Ok(assemble(&phases, tracks))
}

/// Variant where contributions to every account stop at the start of the
/// restricted lockout, with growth-only months up to the retirement boundary
/// before the normal drawdown. Fails with
/// [`CoreError::TruncationUnavailable`] when the lockout leaves no
/// contribution window at all.
pub fn build_truncated_schedule(inputs: &Inputs) -> Result<Vec<MonthlyRecord>, CoreError> {
    let lockout_years = inputs.rules.restricted_lockout_years;
    if inputs.years_to_retirement <= lockout_years {
        return Err(CoreError::TruncationUnavailable {
            years_to_retirement: inputs.years_to_retirement,
            lockout_years,
        });
    }

    let pre_rate = inputs.growth_rate / 100.0 / 12.0;
    let post_rate = inputs.retirement_growth_rate / 100.0 / 12.0;
    let contribution_months = (inputs.years_to_retirement - lockout_years) * 12;
    let lockout_months = lockout_years * 12;
    let drawdown_months = inputs.drawdown_months();
    let deposits = compute_contributions(inputs);
    let withdrawals = compute_withdrawals(inputs);

    let mut tracks = Vec::with_capacity(inputs.account_set().len());
    for kind in inputs.account_set() {
        let deposit = deposits.for_kind(kind);
        let withdrawal = withdrawals.for_kind(kind);
        let mut balances = future_value_series(pre_rate, contribution_months, deposit, 0.0)?;
        let fund_at_lockout = balances.last().copied().unwrap_or(0.0);
        balances.extend(future_value_series(
            pre_rate,
            lockout_months,
            0.0,
            fund_at_lockout,
        )?);
        let fund_at_retirement = balances.last().copied().unwrap_or(0.0);
        balances.extend(future_value_series(
            post_rate,
            drawdown_months,
            -withdrawal,
            fund_at_retirement,
        )?);

        let mut flows = vec![deposit; contribution_months as usize];
        flows.extend(vec![0.0; lockout_months as usize]);
        flows.extend(vec![-withdrawal; drawdown_months as usize]);
        tracks.push(AccountTrack {
            kind,
            flows,
            balances,
        });
    }

    let phases = [
        Phase {
            months: contribution_months,
            growth_rate: inputs.growth_rate,
            net_cash_flow: -inputs.monthly_deposit,
        },
        Phase {
            months: lockout_months,
            growth_rate: inputs.growth_rate,
            net_cash_flow: 0.0,
        },
        Phase {
            months: drawdown_months,
            growth_rate: inputs.retirement_growth_rate,
            net_cash_flow: inputs.monthly_withdrawal,
        },
    ];
    Ok(assemble(&phases, tracks))
}
