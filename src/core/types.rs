use serde::Serialize;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    Pension,
    RestrictedSavings,
    GeneralSavings,
}

impl AccountKind {
    pub const ALL: [AccountKind; 3] = [
        AccountKind::Pension,
        AccountKind::RestrictedSavings,
        AccountKind::GeneralSavings,
    ];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TaxBand {
    Basic,
    Higher,
}

/// Jurisdictional constants, injected rather than scattered through the
/// calculation code. `Default` carries the current UK figures.
#[derive(Debug, Clone, Copy)]
pub struct TaxRules {
    pub basic_income_tax_rate: f64,
    pub higher_income_tax_rate: f64,
    pub basic_ni_rate: f64,
    pub higher_ni_rate: f64,
    pub restricted_bonus_rate: f64,
    /// Share of every pension withdrawal that is tax-free.
    pub pension_tax_free_share: f64,
    /// Years before retirement during which the restricted account can no
    /// longer be contributed to.
    pub restricted_lockout_years: u32,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            basic_income_tax_rate: 0.20,
            higher_income_tax_rate: 0.40,
            basic_ni_rate: 0.08,
            higher_ni_rate: 0.02,
            restricted_bonus_rate: 0.25,
            pension_tax_free_share: 0.25,
            restricted_lockout_years: 10,
        }
    }
}

impl TaxRules {
    pub fn income_tax_rate(&self, band: TaxBand) -> f64 {
        match band {
            TaxBand::Basic => self.basic_income_tax_rate,
            TaxBand::Higher => self.higher_income_tax_rate,
        }
    }

    pub fn ni_rate(&self, band: TaxBand) -> f64 {
        match band {
            TaxBand::Basic => self.basic_ni_rate,
            TaxBand::Higher => self.higher_ni_rate,
        }
    }
}

/// One calculation request. Constructed once, never mutated; every derived
/// schedule and summary is a pure function of this value. Deposit and
/// withdrawal amounts are net to the saver; growth rates are annual percent.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub monthly_deposit: f64,
    pub include_restricted: bool,
    pub salary_sacrifice: bool,
    pub current_tax_band: TaxBand,
    pub retirement_tax_band: TaxBand,
    pub years_to_retirement: u32,
    pub growth_rate: f64,
    pub monthly_withdrawal: f64,
    pub retirement_growth_rate: f64,
    pub drawdown_years: u32,
    pub rules: TaxRules,
}

impl Inputs {
    pub fn accumulation_months(&self) -> u32 {
        self.years_to_retirement * 12
    }

    pub fn drawdown_months(&self) -> u32 {
        self.drawdown_years * 12
    }

    pub fn account_set(&self) -> Vec<AccountKind> {
        AccountKind::ALL
            .into_iter()
            .filter(|kind| self.include_restricted || *kind != AccountKind::RestrictedSavings)
            .collect()
    }
}

/// `flow` is from the fund's perspective: positive for a deposit, negative
/// for a withdrawal. `balance` is the fund value after that month's growth
/// and end-of-period flow.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFlow {
    pub kind: AccountKind,
    pub flow: f64,
    pub balance: f64,
}

/// One schedule row. Months are 1-based and continuous across the phase
/// boundary. `net_cash_flow` is from the saver's perspective, the opposite
/// sign to the fund flows: negative while saving, positive while drawing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month: u32,
    pub growth_rate: f64,
    pub net_cash_flow: f64,
    pub accounts: Vec<AccountFlow>,
}

impl MonthlyRecord {
    pub fn account(&self, kind: AccountKind) -> Option<&AccountFlow> {
        self.accounts.iter().find(|flow| flow.kind == kind)
    }
}

/// `Indefinite` means the fund's yield covers the draw. It is an answer,
/// not a failure, and callers can always tell it apart from a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WithdrawalDuration {
    Months(f64),
    Indefinite,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub kind: AccountKind,
    pub fund_at_retirement: f64,
    pub withdrawal_duration: WithdrawalDuration,
    /// Net monthly income when the fund is drawn down evenly over the
    /// requested horizon; for the pension this is after the tax-free/taxed
    /// split, for the other accounts net equals gross.
    pub fixed_term_monthly_income: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub accounts: Vec<AccountSummary>,
}

impl ProjectionResult {
    pub fn account(&self, kind: AccountKind) -> Option<&AccountSummary> {
        self.accounts.iter().find(|summary| summary.kind == kind)
    }
}

/// Gross monthly amounts per account, deposited or withdrawn.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAmounts {
    pub pension: f64,
    pub restricted: f64,
    pub general: f64,
}

impl AccountAmounts {
    pub fn for_kind(&self, kind: AccountKind) -> f64 {
        match kind {
            AccountKind::Pension => self.pension,
            AccountKind::RestrictedSavings => self.restricted,
            AccountKind::GeneralSavings => self.general,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoreError {
    #[error("periodic rate {0} is below -100%")]
    InvalidRate(f64),
    #[error(
        "no contribution window: {years_to_retirement} years to retirement is \
         within the {lockout_years}-year restricted lockout"
    )]
    TruncationUnavailable {
        years_to_retirement: u32,
        lockout_years: u32,
    },
}
