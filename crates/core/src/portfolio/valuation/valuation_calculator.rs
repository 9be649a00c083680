use crate::errors::{DatabaseError, Error, Result};
use crate::fx::CurrencyConverter;
use crate::instruments::Instrument;
use crate::portfolio::valuation::valuation_model::{
    ExclusionReason, ValuationRow, ValuationSnapshot, ValuationStatus,
};
use crate::positions::PositionReport;
use crate::themes::ThemeAsset;

use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Outcome of valuing one target: a base-currency value, or why it was left out.
pub type PositionOutcome = std::result::Result<Decimal, ExclusionReason>;

/// Values one position in the base currency at the report's own timestamp.
///
/// The inner result carries the exclusion reason when the position is missing
/// or its currency has no usable rate. A value that does not fit in a
/// `Decimal` fails the whole call with [`Error::Valuation`].
pub fn value_position(
    instrument: &Instrument,
    position: Option<&PositionReport>,
    converter: &CurrencyConverter,
) -> Result<PositionOutcome> {
    let Some(position) = position else {
        return Ok(Err(ExclusionReason::NoPosition));
    };
    let native_value = position.native_value().ok_or_else(|| {
        Error::Valuation(format!(
            "Value of instrument {} ({}) overflows: {} x {}",
            instrument.id,
            instrument.name,
            position.quantity,
            position.current_price.unwrap_or_default()
        ))
    })?;

    match converter.convert_amount(
        native_value,
        &instrument.currency,
        converter.base_currency(),
        Some(position.report_date),
    ) {
        Ok(value) => Ok(Ok(value)),
        Err(e) if e.is_missing_rate() => Ok(Err(ExclusionReason::FxMissing(e))),
        Err(e) => Err(Error::Valuation(format!(
            "Instrument {} ({}): {}",
            instrument.id, instrument.name, e
        ))),
    }
}

/// Builds the valuation snapshot of a theme from pre-fetched inputs.
///
/// First pass values every target and accumulates the total of the rows that
/// could be valued. Second pass derives each valued row's share of that total
/// and its deviation from both targets.
///
/// # Arguments
///
/// * `theme_id` - The theme being valued.
/// * `targets` - The theme's target allocations; output rows keep their order.
/// * `instruments` - Instruments referenced by the targets, keyed by id.
/// * `positions` - Latest position report per instrument id.
/// * `converter` - Rate table for the currencies involved.
pub fn calculate_snapshot(
    theme_id: i32,
    targets: &[ThemeAsset],
    instruments: &HashMap<i32, Instrument>,
    positions: &HashMap<i32, PositionReport>,
    converter: &CurrencyConverter,
) -> Result<ValuationSnapshot> {
    let mut valued: Vec<(&ThemeAsset, &Instrument, PositionOutcome)> =
        Vec::with_capacity(targets.len());
    let mut total_value_base = Decimal::ZERO;
    let mut excluded_fx_count = 0usize;

    for target in targets {
        let instrument = instruments.get(&target.instrument_id).ok_or_else(|| {
            Error::Database(DatabaseError::NotFound(format!(
                "Instrument {} referenced by theme {}",
                target.instrument_id, theme_id
            )))
        })?;

        let outcome = value_position(instrument, positions.get(&target.instrument_id), converter)?;
        match &outcome {
            Ok(value) => {
                total_value_base = total_value_base.checked_add(*value).ok_or_else(|| {
                    Error::Valuation(format!(
                        "Total of theme {} overflows at instrument {} ({})",
                        theme_id, instrument.id, instrument.name
                    ))
                })?;
            }
            Err(ExclusionReason::FxMissing(reason)) => {
                excluded_fx_count += 1;
                warn!(
                    "Theme {}: excluding instrument {} ({}) from totals: {}",
                    theme_id, instrument.id, instrument.name, reason
                );
            }
            Err(ExclusionReason::NoPosition) => {
                debug!(
                    "Theme {}: no position reported for instrument {} ({})",
                    theme_id, instrument.id, instrument.name
                );
            }
        }
        valued.push((target, instrument, outcome));
    }

    let rows = valued
        .into_iter()
        .map(|(target, instrument, outcome)| {
            build_row(target, instrument, outcome, total_value_base)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Theme {} valued at {} {} ({} targets, {} excluded for FX)",
        theme_id,
        total_value_base,
        converter.base_currency(),
        targets.len(),
        excluded_fx_count
    );

    Ok(ValuationSnapshot {
        theme_id,
        base_currency: converter.base_currency().to_string(),
        total_value_base,
        excluded_fx_count,
        rows,
    })
}

fn build_row(
    target: &ThemeAsset,
    instrument: &Instrument,
    outcome: PositionOutcome,
    total_value_base: Decimal,
) -> Result<ValuationRow> {
    let (current_value_base, actual_pct, delta_research_pct, delta_user_pct, status) =
        match outcome {
            Ok(value) => {
                let overflow = || {
                    Error::Valuation(format!(
                        "Share of instrument {} ({}) overflows",
                        instrument.id, instrument.name
                    ))
                };
                let actual_pct = share_pct(value, total_value_base).ok_or_else(overflow)?;
                let delta_research = actual_pct
                    .checked_sub(target.research_target_pct)
                    .ok_or_else(overflow)?;
                let delta_user = actual_pct
                    .checked_sub(target.user_target_pct)
                    .ok_or_else(overflow)?;
                (
                    Some(value),
                    actual_pct,
                    Some(delta_research),
                    Some(delta_user),
                    ValuationStatus::Ok,
                )
            }
            Err(reason) => (None, Decimal::ZERO, None, None, reason.status()),
        };

    Ok(ValuationRow {
        instrument_id: instrument.id,
        instrument_name: instrument.name.clone(),
        instrument_currency: instrument.currency.clone(),
        research_target_pct: target.research_target_pct,
        user_target_pct: target.user_target_pct,
        current_value_base,
        actual_pct,
        delta_research_pct,
        delta_user_pct,
        status,
        notes: target.notes.clone(),
    })
}

/// `value / total * 100`, zero when the total is zero, `None` on overflow.
fn share_pct(value: Decimal, total: Decimal) -> Option<Decimal> {
    if total.is_zero() {
        return Some(Decimal::ZERO);
    }
    value
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}
