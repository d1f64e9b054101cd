//! Derivation engine: keeps every computed field consistent with its inputs
//!
//! The engine is synchronous and pure. `apply_field_edit` returns a new
//! record with the direct assignment applied plus every formula whose input
//! set includes the changed field re-evaluated, chained effects included
//! (a sqm edit updates its sqft pair, which feeds the TOTAL sqft roll-up).
//! Applying the engine twice with the same input yields an identical record.

use super::groups::{
    all_rate_rows, AreaTotalGroup, CostTable, ABSTRACT_COMPONENTS, ABSTRACT_ROUNDED,
    ABSTRACT_TOTAL, AREA_TOTALS, CASCADE_OUTPUTS, CONVERSION_PAIRS, COST_TABLES, OWNER_COMPONENTS,
    OWNER_ROUNDED, OWNER_TOTAL, PART_GROUPS, VALUATION_ROUNDED, VALUATION_ROWS, VALUATION_TOTAL,
};
use crate::formulas::{
    convert_area_unit, format_amount, format_whole, parse_amount, percent_of, product,
    round_to_thousand, sum,
};
use crate::record::{FieldValue, Record};

/// Apply a single scalar edit and re-derive everything it feeds
pub fn apply_field_edit(record: &Record, field: &str, value: impl Into<FieldValue>) -> Record {
    let mut next = record.clone();
    next.set(field, value);
    convert_pair_for(&mut next, field);
    derive_row_value_for(&mut next, field);
    recompute_totals(&mut next);
    next
}

/// Re-evaluate every aggregation group from the current field values
///
/// All groups are pure functions of their inputs, so this is idempotent and
/// safe to run after any mutation, including collection changes and loads.
pub fn recompute_totals(record: &mut Record) {
    recompute_valuation_cascade(record);
    for group in PART_GROUPS {
        let total = sum(group.fields.iter().map(|field| record.number(field)));
        record.set(group.total, total);
    }
    roll_up(record, ABSTRACT_COMPONENTS, ABSTRACT_TOTAL, ABSTRACT_ROUNDED);
    roll_up(record, OWNER_COMPONENTS, OWNER_TOTAL, OWNER_ROUNDED);
    for group in AREA_TOTALS {
        recompute_area_totals(record, group);
    }
    for table in COST_TABLES {
        recompute_cost_table(record, table);
    }
}

/// One-directional sqm -> sqft conversion; only fires when the sqm side of a
/// pair changed, and never back-computes sqm from sqft
fn convert_pair_for(record: &mut Record, field: &str) {
    if let Some(pair) = CONVERSION_PAIRS.iter().find(|pair| pair.sqm == field) {
        if let Some(sqft) = convert_area_unit(record.number(pair.sqm)) {
            record.set(pair.sqft, format_amount(sqft));
        }
    }
}

/// Re-derive the value of the fixed qty x rate row the changed field belongs
/// to, if any
fn derive_row_value_for(record: &mut Record, field: &str) {
    if let Some(row) = all_rate_rows().find(|row| row.qty == field || row.rate == field) {
        let value = product(record.number(row.qty), record.number(row.rate));
        record.set(row.value, value);
    }
}

/// Ten row values -> total -> rounded -> the four cascading outputs
fn recompute_valuation_cascade(record: &mut Record) {
    let total = sum(VALUATION_ROWS.iter().map(|row| record.number(row.value)));
    if total.is_empty() {
        record.set(VALUATION_TOTAL, "");
        record.set(VALUATION_ROUNDED, "");
        for (field, _) in CASCADE_OUTPUTS.iter().copied() {
            record.set(field, "");
        }
        return;
    }
    let rounded = round_to_thousand(parse_amount(&total));
    record.set(VALUATION_TOTAL, total);
    record.set(VALUATION_ROUNDED, format_whole(rounded));
    for (field, fraction) in CASCADE_OUTPUTS.iter().copied() {
        record.set(field, format_whole(percent_of(rounded, fraction)));
    }
}

fn roll_up(record: &mut Record, components: &[&str], total_field: &str, rounded_field: &str) {
    let total = sum(components.iter().map(|field| record.number(field)));
    if total.is_empty() {
        record.set(total_field, "");
        record.set(rounded_field, "");
    } else {
        let rounded = round_to_thousand(parse_amount(&total));
        record.set(total_field, total);
        record.set(rounded_field, format_whole(rounded));
    }
}

fn recompute_area_totals(record: &mut Record, group: &AreaTotalGroup) {
    let sqm_total = sum(group
        .fixed_sqm
        .iter()
        .map(|field| record.number(field))
        .chain(
            record
                .area_rows(group.collection)
                .iter()
                .map(|row| parse_amount(&row.sqm)),
        ));
    let sqft_total = sum(group
        .fixed_sqft
        .iter()
        .map(|field| record.number(field))
        .chain(
            record
                .area_rows(group.collection)
                .iter()
                .map(|row| parse_amount(&row.sqft)),
        ));
    record.set(group.total_sqm, sqm_total);
    record.set(group.total_sqft, sqft_total);
}

fn recompute_cost_table(record: &mut Record, table: &CostTable) {
    let sqft_total = sum(table
        .fixed
        .iter()
        .map(|row| record.number(row.qty))
        .chain(
            record
                .cost_rows(table.collection)
                .iter()
                .map(|row| parse_amount(&row.sqft)),
        ));
    let value_total = sum(table
        .fixed
        .iter()
        .map(|row| record.number(row.value))
        .chain(
            record
                .cost_rows(table.collection)
                .iter()
                .map(|row| parse_amount(&row.value)),
        ));
    record.set(table.total_sqft, sqft_total);
    record.set(table.total_value, value_total);
}
