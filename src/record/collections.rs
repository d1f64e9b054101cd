//! Add/remove/update operations for the dynamic collections
//!
//! Dynamic entries are created and destroyed only here, never implicitly.
//! Every mutation hands the result back through the derivation engine so the
//! table totals stay consistent.

use uuid::Uuid;

use super::data::{AreaRow, CostRow, NamedField, Record};
use crate::derivation;
use crate::error::ValuationError;
use crate::formulas::{convert_area_unit, format_amount, parse_amount, product};

/// One of the four dynamic row collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCollection {
    Extent,
    Balcony,
    Cost,
    BuiltUp,
}

impl RowCollection {
    fn default_label(&self, n: usize) -> String {
        match self {
            RowCollection::Balcony => format!("Custom {}", n),
            _ => format!("Custom Floor {}", n),
        }
    }
}

impl Record {
    /// Area rows of a collection; empty for the cost collections
    pub fn area_rows(&self, collection: RowCollection) -> &[AreaRow] {
        match collection {
            RowCollection::Extent => &self.custom_extent_fields,
            RowCollection::Balcony => &self.custom_balcony_fields,
            _ => &[],
        }
    }

    /// Cost rows of a collection; empty for the area collections
    pub fn cost_rows(&self, collection: RowCollection) -> &[CostRow] {
        match collection {
            RowCollection::Cost => &self.custom_cost_fields,
            RowCollection::BuiltUp => &self.custom_built_up_fields,
            _ => &[],
        }
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Append a new row with a fresh id, a default label, and empty numerics
pub fn add_row(record: &Record, collection: RowCollection) -> Record {
    let mut next = record.clone();
    match collection {
        RowCollection::Extent | RowCollection::Balcony => {
            let rows = match collection {
                RowCollection::Extent => &mut next.custom_extent_fields,
                _ => &mut next.custom_balcony_fields,
            };
            let name = collection.default_label(rows.len() + 1);
            rows.push(AreaRow {
                id: fresh_id(),
                name,
                sqm: String::new(),
                sqft: String::new(),
            });
        }
        RowCollection::Cost | RowCollection::BuiltUp => {
            let rows = match collection {
                RowCollection::Cost => &mut next.custom_cost_fields,
                _ => &mut next.custom_built_up_fields,
            };
            let label = collection.default_label(rows.len() + 1);
            rows.push(CostRow {
                id: fresh_id(),
                label,
                sqft: String::new(),
                rate: String::new(),
                value: String::new(),
            });
        }
    }
    derivation::recompute_totals(&mut next);
    next
}

/// Remove the row with the given id; a missing id is a silent no-op
pub fn remove_row(record: &Record, collection: RowCollection, id: &str) -> Record {
    let mut next = record.clone();
    match collection {
        RowCollection::Extent => next.custom_extent_fields.retain(|row| row.id != id),
        RowCollection::Balcony => next.custom_balcony_fields.retain(|row| row.id != id),
        RowCollection::Cost => next.custom_cost_fields.retain(|row| row.id != id),
        RowCollection::BuiltUp => next.custom_built_up_fields.retain(|row| row.id != id),
    }
    derivation::recompute_totals(&mut next);
    next
}

/// Edit one cell of one row, then re-derive the row pair/product and the
/// collection's totals
///
/// Unknown columns and unknown ids are silent no-ops.
pub fn update_row(
    record: &Record,
    collection: RowCollection,
    id: &str,
    column: &str,
    value: &str,
) -> Record {
    let mut next = record.clone();
    match collection {
        RowCollection::Extent | RowCollection::Balcony => {
            let rows = match collection {
                RowCollection::Extent => &mut next.custom_extent_fields,
                _ => &mut next.custom_balcony_fields,
            };
            if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
                match column {
                    "name" => row.name = value.to_owned(),
                    "sqm" => {
                        row.sqm = value.to_owned();
                        if let Some(sqft) = convert_area_unit(parse_amount(&row.sqm)) {
                            row.sqft = format_amount(sqft);
                        }
                    }
                    "sqft" => row.sqft = value.to_owned(),
                    _ => {}
                }
            }
        }
        RowCollection::Cost | RowCollection::BuiltUp => {
            let rows = match collection {
                RowCollection::Cost => &mut next.custom_cost_fields,
                _ => &mut next.custom_built_up_fields,
            };
            if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
                match column {
                    "label" => row.label = value.to_owned(),
                    "sqft" | "rate" => {
                        if column == "sqft" {
                            row.sqft = value.to_owned();
                        } else {
                            row.rate = value.to_owned();
                        }
                        row.value = product(parse_amount(&row.sqft), parse_amount(&row.rate));
                    }
                    "value" => row.value = value.to_owned(),
                    _ => {}
                }
            }
        }
    }
    derivation::recompute_totals(&mut next);
    next
}

/// Append a free-form named field
///
/// Rejected without mutating state when the name or value is empty, or when a
/// case-insensitive duplicate name already exists.
pub fn add_named_field(record: &Record, name: &str, value: &str) -> Result<Record, ValuationError> {
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        return Err(ValuationError::Validation(vec![
            "custom field name must not be empty".to_owned(),
        ]));
    }
    if value.is_empty() {
        return Err(ValuationError::Validation(vec![
            "custom field value must not be empty".to_owned(),
        ]));
    }
    let lowered = name.to_lowercase();
    if record
        .custom_fields
        .iter()
        .any(|field| field.name.to_lowercase() == lowered)
    {
        return Err(ValuationError::Validation(vec![format!(
            "custom field \"{}\" already exists",
            name
        )]));
    }

    let mut next = record.clone();
    next.custom_fields.push(NamedField {
        id: fresh_id(),
        name: name.to_owned(),
        value: value.to_owned(),
    });
    Ok(next)
}

/// Remove a named field by position; out of range is a silent no-op
pub fn remove_named_field(record: &Record, index: usize) -> Record {
    let mut next = record.clone();
    if index < next.custom_fields.len() {
        next.custom_fields.remove(index);
    }
    next
}
