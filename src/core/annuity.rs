//! Time-value-of-money primitives over end-of-period compounding.
//!
//! Everything uses the additive convention
//! `fv = pv*(1+r)^n + pmt*((1+r)^n - 1)/r`: a recurring deposit is a positive
//! `pmt`, a withdrawal a negative one. At `rate == 0` each formula reduces to
//! its exact linear form.

use super::types::{CoreError, WithdrawalDuration};

fn check_rate(rate: f64) -> Result<(), CoreError> {
    if rate < -1.0 || !rate.is_finite() {
        return Err(CoreError::InvalidRate(rate));
    }
    Ok(())
}

pub fn future_value(rate: f64, periods: u32, pmt: f64, pv: f64) -> Result<f64, CoreError> {
    check_rate(rate)?;
    if rate == 0.0 {
        return Ok(pv + pmt * periods as f64);
    }
    let factor = (1.0 + rate).powi(periods as i32);
    Ok(pv * factor + pmt * (factor - 1.0) / rate)
}

/// Running fund values for periods `1..=periods`, one pass of the recurrence
/// `v' = v*(1+rate) + pmt` rather than the closed form per month.
pub fn future_value_series(
    rate: f64,
    periods: u32,
    pmt: f64,
    pv: f64,
) -> Result<Vec<f64>, CoreError> {
    check_rate(rate)?;
    let mut values = Vec::with_capacity(periods as usize);
    let mut value = pv;
    for _ in 0..periods {
        value = value * (1.0 + rate) + pmt;
        values.push(value);
    }
    Ok(values)
}

/// Periods until a fund starting at `pv`, paying `pmt` each period, reaches
/// `fv`. `Indefinite` when the fund's steady-state yield meets or exceeds
/// the draw, so the target is never reached.
pub fn number_of_periods(
    rate: f64,
    pmt: f64,
    pv: f64,
    fv: f64,
) -> Result<WithdrawalDuration, CoreError> {
    check_rate(rate)?;
    if rate == 0.0 {
        if pmt >= 0.0 {
            return Ok(WithdrawalDuration::Indefinite);
        }
        return Ok(WithdrawalDuration::Months((fv - pv) / pmt));
    }
    // Perpetual sustainable withdrawal is pv*rate; a draw at or below it
    // never depletes the fund.
    if pv * rate + pmt >= 0.0 {
        return Ok(WithdrawalDuration::Indefinite);
    }
    let periods = ((fv * rate + pmt) / (pv * rate + pmt)).ln() / (1.0 + rate).ln();
    Ok(WithdrawalDuration::Months(periods))
}

/// Fixed per-period payment that moves a fund from `pv` to `fv`; negative
/// for a depleting fund.
pub fn payment(rate: f64, periods: u32, pv: f64, fv: f64) -> Result<f64, CoreError> {
    check_rate(rate)?;
    if rate == 0.0 {
        return Ok((fv - pv) / periods as f64);
    }
    let factor = (1.0 + rate).powi(periods as i32);
    Ok((fv - pv * factor) * rate / (factor - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_rel(actual: f64, expected: f64, tol: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() / scale <= tol,
            "expected {expected}, got {actual}, relative tolerance {tol}"
        );
    }

    #[test]
    fn future_value_zero_rate_is_exact_linear_sum() {
        assert_eq!(future_value(0.0, 240, 250.0, 0.0).unwrap(), 60_000.0);
        assert_eq!(future_value(0.0, 12, -100.0, 5_000.0).unwrap(), 3_800.0);
    }

    #[test]
    fn future_value_matches_annuity_formula() {
        let rate = 0.05 / 12.0;
        let value = future_value(rate, 240, 250.0, 0.0).unwrap();
        let factor = (1.0 + rate).powi(240);
        assert_approx(value, 250.0 * (factor - 1.0) / rate);
    }

    #[test]
    fn future_value_series_last_entry_matches_closed_form() {
        let rate = 0.05 / 12.0;
        let series = future_value_series(rate, 240, 250.0, 0.0).unwrap();
        assert_eq!(series.len(), 240);
        assert_rel(series[239], future_value(rate, 240, 250.0, 0.0).unwrap(), 1e-9);
        assert_rel(series[0], 250.0, 1e-12);
    }

    #[test]
    fn future_value_series_obeys_recurrence() {
        let rate = 0.04 / 12.0;
        let series = future_value_series(rate, 60, -150.0, 40_000.0).unwrap();
        let mut prior = 40_000.0;
        for value in &series {
            assert_approx(*value, prior * (1.0 + rate) - 150.0);
            prior = *value;
        }
    }

    #[test]
    fn number_of_periods_exhausts_fund_at_zero_rate() {
        let duration = number_of_periods(0.0, -200.0, 4_800.0, 0.0).unwrap();
        assert_eq!(duration, WithdrawalDuration::Months(24.0));
    }

    #[test]
    fn number_of_periods_indefinite_when_yield_covers_draw() {
        let rate = 0.05 / 12.0;
        let pv = 100_000.0;
        // Draw exactly the perpetual yield: never depletes.
        let duration = number_of_periods(rate, -pv * rate, pv, 0.0).unwrap();
        assert_eq!(duration, WithdrawalDuration::Indefinite);

        let duration = number_of_periods(0.0, 50.0, 1_000.0, 0.0).unwrap();
        assert_eq!(duration, WithdrawalDuration::Indefinite);
    }

    #[test]
    fn number_of_periods_round_trips_through_future_value() {
        let rate = 0.04 / 12.0;
        let pv = 120_000.0;
        let draw = -700.0;
        let WithdrawalDuration::Months(periods) = number_of_periods(rate, draw, pv, 0.0).unwrap()
        else {
            panic!("expected a finite duration");
        };
        // Fractional periods: check the closed form directly.
        let factor = (1.0 + rate).powf(periods);
        let residual = pv * factor + draw * (factor - 1.0) / rate;
        assert_rel(residual, 0.0, 1e-6);
    }

    #[test]
    fn payment_depletes_fund_over_fixed_horizon() {
        let rate = 0.03 / 12.0;
        let pv = 150_000.0;
        let pmt = payment(rate, 300, pv, 0.0).unwrap();
        assert!(pmt < 0.0);
        let residual = future_value(rate, 300, pmt, pv).unwrap();
        assert_rel(residual, 0.0, 1e-9);
    }

    #[test]
    fn payment_zero_rate_is_exact_linear_split() {
        assert_eq!(payment(0.0, 120, 12_000.0, 0.0).unwrap(), -100.0);
    }

    #[test]
    fn rates_below_minus_one_are_rejected() {
        assert_eq!(
            future_value(-1.5, 12, 100.0, 0.0),
            Err(CoreError::InvalidRate(-1.5))
        );
        assert_eq!(
            future_value_series(-1.5, 12, 100.0, 0.0),
            Err(CoreError::InvalidRate(-1.5))
        );
        assert_eq!(
            number_of_periods(-2.0, -100.0, 1_000.0, 0.0),
            Err(CoreError::InvalidRate(-2.0))
        );
        assert!(payment(f64::NAN, 12, 1_000.0, 0.0).is_err());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_indefinite_iff_yield_covers_draw(
            rate_bp in 1u32..1200,
            pv in 1u32..1_000_000,
            draw in 1u32..10_000
        ) {
            let rate = rate_bp as f64 / 10_000.0 / 12.0;
            let pv = pv as f64;
            let draw = draw as f64;
            let duration = number_of_periods(rate, -draw, pv, 0.0).unwrap();
            let sustainable = pv * rate;
            match duration {
                WithdrawalDuration::Indefinite => prop_assert!(sustainable >= draw),
                WithdrawalDuration::Months(months) => {
                    prop_assert!(sustainable < draw);
                    prop_assert!(months.is_finite() && months >= 0.0);
                }
            }
        }

        #[test]
        fn prop_payment_and_number_of_periods_are_inverses(
            rate_bp in 0u32..1200,
            periods in 1u32..600,
            pv in 1u32..1_000_000
        ) {
            let rate = rate_bp as f64 / 10_000.0 / 12.0;
            let pv = pv as f64;
            let pmt = payment(rate, periods, pv, 0.0).unwrap();
            let duration = number_of_periods(rate, pmt, pv, 0.0).unwrap();
            let WithdrawalDuration::Months(recovered) = duration else {
                return Err(proptest::test_runner::TestCaseError::fail(
                    "depleting payment must give a finite duration",
                ));
            };
            prop_assert!((recovered - periods as f64).abs() <= 1e-6 * periods as f64 + 1e-6);
        }

        #[test]
        fn prop_future_value_non_decreasing_in_periods(
            rate_bp in 0u32..1500,
            pmt in 1u32..5_000,
            periods in 1u32..600
        ) {
            let rate = rate_bp as f64 / 10_000.0 / 12.0;
            let shorter = future_value(rate, periods, pmt as f64, 0.0).unwrap();
            let longer = future_value(rate, periods + 12, pmt as f64, 0.0).unwrap();
            prop_assert!(longer >= shorter);
        }
    }
}
