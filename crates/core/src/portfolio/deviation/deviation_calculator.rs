use rust_decimal::Decimal;

use super::deviation_model::{DeviationFilter, DeviationState, DeviationSummary, TargetBasis};
use crate::portfolio::valuation::{ValuationRow, ValuationSnapshot};

/// Classifies a deviation against a symmetric tolerance band.
/// The band is inclusive: `|delta| == tolerance` is still within.
pub fn state(delta: Decimal, tolerance: Decimal) -> DeviationState {
    if delta > tolerance {
        DeviationState::Overweight
    } else if delta < -tolerance {
        DeviationState::Underweight
    } else {
        DeviationState::Within
    }
}

pub fn is_out_of_tolerance(delta: Decimal, tolerance: Decimal) -> bool {
    delta.abs() > tolerance
}

/// Whether a row should be displayed under the given filter.
///
/// Rows that could not be valued always pass so data-quality problems stay
/// visible even when only out-of-tolerance rows are requested.
pub fn should_include(row: &ValuationRow, filter: &DeviationFilter) -> bool {
    if !filter.only_out_of_tolerance || !row.is_ok() {
        return true;
    }

    let exceeds = |delta: Option<Decimal>| {
        delta.is_some_and(|d| is_out_of_tolerance(d, filter.tolerance))
    };

    (filter.show_research && exceeds(row.delta_research_pct))
        || (filter.show_user && exceeds(row.delta_user_pct))
}

/// Applies `should_include` to every row, keeping their order.
pub fn filter_rows<'a>(rows: &'a [ValuationRow], filter: &DeviationFilter) -> Vec<&'a ValuationRow> {
    rows.iter().filter(|row| should_include(row, filter)).collect()
}

/// Counts valued rows per deviation state against one target basis.
pub fn summarize(
    snapshot: &ValuationSnapshot,
    tolerance: Decimal,
    basis: TargetBasis,
) -> DeviationSummary {
    let mut summary = DeviationSummary::default();

    for row in &snapshot.rows {
        let Some(delta) = basis.delta_of(row).filter(|_| row.is_ok()) else {
            summary.excluded += 1;
            continue;
        };

        match state(delta, tolerance) {
            DeviationState::Within => summary.within += 1,
            DeviationState::Overweight => summary.overweight += 1,
            DeviationState::Underweight => summary.underweight += 1,
        }

        let magnitude = delta.abs();
        if summary.max_abs_delta_instrument_id.is_none() || magnitude > summary.max_abs_delta {
            summary.max_abs_delta = magnitude;
            summary.max_abs_delta_instrument_id = Some(row.instrument_id);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::valuation::ValuationStatus;
    use rust_decimal_macros::dec;

    fn row(id: i32, research: Option<Decimal>, user: Option<Decimal>, status: ValuationStatus) -> ValuationRow {
        ValuationRow {
            instrument_id: id,
            instrument_name: format!("Instrument {}", id),
            instrument_currency: "CHF".to_string(),
            research_target_pct: dec!(25),
            user_target_pct: dec!(25),
            current_value_base: status.is_ok().then_some(dec!(100)),
            actual_pct: Decimal::ZERO,
            delta_research_pct: research,
            delta_user_pct: user,
            status,
            notes: None,
        }
    }

    #[test]
    fn test_state_boundaries_are_inclusive() {
        let tol = dec!(5);
        assert_eq!(state(dec!(5), tol), DeviationState::Within);
        assert_eq!(state(dec!(-5), tol), DeviationState::Within);
        assert_eq!(state(dec!(0), tol), DeviationState::Within);
        assert_eq!(state(dec!(5.0001), tol), DeviationState::Overweight);
        assert_eq!(state(dec!(-5.0001), tol), DeviationState::Underweight);
    }

    #[test]
    fn test_is_out_of_tolerance() {
        assert!(!is_out_of_tolerance(dec!(2), dec!(2)));
        assert!(!is_out_of_tolerance(dec!(-2), dec!(2)));
        assert!(is_out_of_tolerance(dec!(-2.5), dec!(2)));
        assert!(is_out_of_tolerance(dec!(0.1), dec!(0)));
    }

    #[test]
    fn test_should_include_everything_without_tolerance_filter() {
        let filter = DeviationFilter::new(dec!(5));
        assert!(should_include(&row(1, Some(dec!(0)), Some(dec!(0)), ValuationStatus::Ok), &filter));
    }

    #[test]
    fn test_should_include_respects_enabled_columns() {
        let within_research_out_user =
            row(1, Some(dec!(1)), Some(dec!(-8)), ValuationStatus::Ok);

        let both = DeviationFilter::new(dec!(5)).out_of_tolerance_only();
        assert!(should_include(&within_research_out_user, &both));

        let research_only = DeviationFilter {
            show_user: false,
            ..both.clone()
        };
        assert!(!should_include(&within_research_out_user, &research_only));

        let user_only = DeviationFilter {
            show_research: false,
            ..both.clone()
        };
        assert!(should_include(&within_research_out_user, &user_only));

        let none = DeviationFilter {
            show_research: false,
            show_user: false,
            ..both
        };
        assert!(!should_include(&within_research_out_user, &none));
    }

    #[test]
    fn test_excluded_rows_always_pass() {
        let filter = DeviationFilter::new(dec!(5)).out_of_tolerance_only();
        assert!(should_include(&row(1, None, None, ValuationStatus::NoPosition), &filter));
        assert!(should_include(&row(2, None, None, ValuationStatus::FxMissing), &filter));
    }

    #[test]
    fn test_filter_rows_keeps_order() {
        let rows = vec![
            row(1, Some(dec!(10)), Some(dec!(10)), ValuationStatus::Ok),
            row(2, Some(dec!(1)), Some(dec!(1)), ValuationStatus::Ok),
            row(3, None, None, ValuationStatus::FxMissing),
            row(4, Some(dec!(-6)), Some(dec!(0)), ValuationStatus::Ok),
        ];
        let filter = DeviationFilter::new(dec!(5)).out_of_tolerance_only();
        let ids: Vec<i32> = filter_rows(&rows, &filter)
            .iter()
            .map(|r| r.instrument_id)
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_summarize_counts_states() {
        let snapshot = ValuationSnapshot {
            theme_id: 1,
            base_currency: "CHF".to_string(),
            total_value_base: dec!(300),
            excluded_fx_count: 1,
            rows: vec![
                row(1, Some(dec!(7)), Some(dec!(1)), ValuationStatus::Ok),
                row(2, Some(dec!(-12)), Some(dec!(-2)), ValuationStatus::Ok),
                row(3, Some(dec!(5)), Some(dec!(1)), ValuationStatus::Ok),
                row(4, None, None, ValuationStatus::FxMissing),
            ],
        };

        let research = summarize(&snapshot, dec!(5), TargetBasis::Research);
        assert_eq!(research.within, 1);
        assert_eq!(research.overweight, 1);
        assert_eq!(research.underweight, 1);
        assert_eq!(research.excluded, 1);
        assert_eq!(research.out_of_tolerance(), 2);
        assert_eq!(research.max_abs_delta, dec!(12));
        assert_eq!(research.max_abs_delta_instrument_id, Some(2));

        let user = summarize(&snapshot, dec!(5), TargetBasis::User);
        assert_eq!(user.within, 3);
        assert_eq!(user.out_of_tolerance(), 0);
        assert_eq!(user.max_abs_delta, dec!(2));
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        assert!(DeviationFilter::new(dec!(-1)).validate().is_err());
        assert!(DeviationFilter::new(dec!(0)).validate().is_ok());
    }
}
