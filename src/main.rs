//! Valuation System CLI
//!
//! Demo command line: builds (or loads) a valuation record, pushes edits
//! through the derivation engine, and prints the derived valuation summary.

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use valuation_system::record::collections;
use valuation_system::{apply_field_edit, Record, RowCollection};

#[derive(Debug, Parser)]
#[command(name = "valuation_system", about = "Property valuation record demo")]
struct Args {
    /// Load a record from a JSON file instead of using the built-in sample
    #[arg(long)]
    record: Option<PathBuf>,

    /// Write the fully derived record as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Build a representative record the way an operator would: one scalar edit
/// at a time, each re-entering the derivation engine
fn sample_record() -> Record {
    let mut record = Record::scaffold(Some("demo-1"));
    record = apply_field_edit(&record, "applicantName", "A. Kulkarni");
    record = apply_field_edit(&record, "propertyAddress", "12 FC Road");
    record = apply_field_edit(&record, "place", "Pune");
    record = apply_field_edit(&record, "inspectionDate", "2024-06-01");

    // Unit-specification areas; the sqft side derives from sqm
    record = apply_field_edit(&record, "carpetAreaSqm", "100");
    record = apply_field_edit(&record, "groundFloorAreaSqm", "60");
    record = apply_field_edit(&record, "firstFloorAreaSqm", "55");

    // Ten-item valuation table (only the rows with amounts)
    record = apply_field_edit(&record, "landQty", "1200");
    record = apply_field_edit(&record, "landRate", "850");
    record = apply_field_edit(&record, "buildingQty", "1150");
    record = apply_field_edit(&record, "buildingRate", "1400");
    record = apply_field_edit(&record, "compoundWallQty", "80");
    record = apply_field_edit(&record, "compoundWallRate", "600");

    // Floor-wise construction cost with one dynamic row
    record = apply_field_edit(&record, "groundFloorCostSqft", "646");
    record = apply_field_edit(&record, "groundFloorCostRate", "1800");
    record = collections::add_row(&record, RowCollection::Cost);
    let id = record.custom_cost_fields[0].id.clone();
    record = collections::update_row(&record, RowCollection::Cost, &id, "sqft", "200");
    record = collections::update_row(&record, RowCollection::Cost, &id, "rate", "1650");

    record
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Valuation System v0.1.0");
    println!("=======================\n");

    let record = match &args.record {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mut record: Record =
                serde_json::from_str(&raw).context("failed to parse record JSON")?;
            valuation_system::recompute_totals(&mut record);
            record
        }
        None => sample_record(),
    };

    println!("Record: {}", record.id.as_deref().unwrap_or("(unsaved)"));
    println!("  Applicant: {}", record.text("applicantName"));
    println!("  Place:     {}", record.text("place"));
    println!();

    println!("Areas:");
    println!(
        "  Carpet:       {:>10} sqm {:>12} sqft",
        record.text("carpetAreaSqm"),
        record.text("carpetAreaSqft")
    );
    println!(
        "  Total floor:  {:>10} sqm {:>12} sqft",
        record.text("totalFloorAreaSqm"),
        record.text("totalFloorAreaSqft")
    );
    println!();

    println!("Valuation:");
    println!("  Total amount:    {:>14}", record.text("totalValuationAmount"));
    println!("  Rounded:         {:>14}", record.text("totalValuationRounded"));
    println!("  Fair market:     {:>14}", record.text("fairMarketValue"));
    println!("  Realizable:      {:>14}", record.text("realizableValue"));
    println!("  Distress:        {:>14}", record.text("distressValue"));
    println!("  Insurable:       {:>14}", record.text("insurableValue"));
    println!();

    println!("Construction cost:");
    println!("  Fixed + dynamic sqft:  {:>12}", record.text("totalCostSqft"));
    println!("  Table total value:     {:>12}", record.text("totalCostValue"));
    for row in &record.custom_cost_fields {
        println!(
            "    {:<16} {:>8} sqft x {:>8} = {:>12}",
            row.label, row.sqft, row.rate, row.value
        );
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nDerived record written to: {}", path.display());
    }

    Ok(())
}
