pub mod annuity;
pub mod rules;
pub mod schedule;
pub mod summary;
pub mod types;

pub use annuity::{future_value, future_value_series, number_of_periods, payment};
pub use rules::{PensionRelief, compute_contributions, compute_withdrawals, pension_relief};
pub use schedule::{build_schedule, build_truncated_schedule};
pub use summary::{project_summary, project_truncated_summary};
pub use types::{
    AccountAmounts, AccountFlow, AccountKind, AccountSummary, CoreError, Inputs, MonthlyRecord,
    ProjectionResult, TaxBand, TaxRules, WithdrawalDuration,
};
