//! Contribution and withdrawal normalization: the saver thinks in net
//! amounts, each account converts them to the gross amount actually crossing
//! the fund boundary, with every rate read from the injected [`TaxRules`].

use super::types::{AccountAmounts, AccountKind, Inputs, TaxBand, TaxRules};

impl AccountKind {
    pub fn gross_deposit(
        self,
        net: f64,
        band: TaxBand,
        salary_sacrifice: bool,
        rules: &TaxRules,
    ) -> f64 {
        match self {
            AccountKind::Pension => {
                let tax = rules.income_tax_rate(band);
                let ni = if salary_sacrifice { rules.ni_rate(band) } else { 0.0 };
                net / (1.0 - tax - ni)
            }
            AccountKind::RestrictedSavings => net * (1.0 + rules.restricted_bonus_rate),
            AccountKind::GeneralSavings => net,
        }
    }

    pub fn gross_withdrawal(self, net: f64, band: TaxBand, rules: &TaxRules) -> f64 {
        match self {
            AccountKind::Pension => {
                let taxed_share = 1.0 - rules.pension_tax_free_share;
                net / (1.0 - taxed_share * rules.income_tax_rate(band))
            }
            AccountKind::RestrictedSavings | AccountKind::GeneralSavings => net,
        }
    }

    /// Inverse of [`AccountKind::gross_withdrawal`].
    pub fn net_withdrawal(self, gross: f64, band: TaxBand, rules: &TaxRules) -> f64 {
        match self {
            AccountKind::Pension => {
                let tax_free = gross * rules.pension_tax_free_share;
                let taxed = gross * (1.0 - rules.pension_tax_free_share);
                tax_free + taxed * (1.0 - rules.income_tax_rate(band))
            }
            AccountKind::RestrictedSavings | AccountKind::GeneralSavings => gross,
        }
    }
}

pub fn compute_contributions(inputs: &Inputs) -> AccountAmounts {
    let deposit = |kind: AccountKind| {
        kind.gross_deposit(
            inputs.monthly_deposit,
            inputs.current_tax_band,
            inputs.salary_sacrifice,
            &inputs.rules,
        )
    };
    AccountAmounts {
        pension: deposit(AccountKind::Pension),
        restricted: deposit(AccountKind::RestrictedSavings),
        general: deposit(AccountKind::GeneralSavings),
    }
}

pub fn compute_withdrawals(inputs: &Inputs) -> AccountAmounts {
    let withdrawal = |kind: AccountKind| {
        kind.gross_withdrawal(
            inputs.monthly_withdrawal,
            inputs.retirement_tax_band,
            &inputs.rules,
        )
    };
    AccountAmounts {
        pension: withdrawal(AccountKind::Pension),
        restricted: withdrawal(AccountKind::RestrictedSavings),
        general: withdrawal(AccountKind::GeneralSavings),
    }
}

/// Monthly relief on the pension flows: tax and NI relief on the gross
/// deposit while accumulating, tax paid on the taxed share while drawing.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionRelief {
    pub deposit_tax_relief: f64,
    pub deposit_ni_relief: f64,
    pub withdrawal_tax_paid: f64,
}

pub fn pension_relief(inputs: &Inputs) -> PensionRelief {
    let rules = &inputs.rules;
    let gross_deposit = AccountKind::Pension.gross_deposit(
        inputs.monthly_deposit,
        inputs.current_tax_band,
        inputs.salary_sacrifice,
        rules,
    );
    let gross_withdrawal = AccountKind::Pension.gross_withdrawal(
        inputs.monthly_withdrawal,
        inputs.retirement_tax_band,
        rules,
    );
    PensionRelief {
        deposit_tax_relief: gross_deposit * rules.income_tax_rate(inputs.current_tax_band),
        deposit_ni_relief: if inputs.salary_sacrifice {
            gross_deposit * rules.ni_rate(inputs.current_tax_band)
        } else {
            0.0
        },
        withdrawal_tax_paid: gross_withdrawal
            * (1.0 - rules.pension_tax_free_share)
            * rules.income_tax_rate(inputs.retirement_tax_band),
    }
}
