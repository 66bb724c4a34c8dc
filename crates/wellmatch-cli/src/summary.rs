use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use wellmatch_cli::commands::RegistryListing;
use wellmatch_match::{MatchEntry, MatchReport};
use wellmatch_model::SymptomQuery;

pub fn print_report(report: &MatchReport) {
    if report.is_fallback() {
        println!(
            "No strong symptom match; showing {} ({}).",
            report.strategy,
            report.entries.len()
        );
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Practitioner"),
        header_cell("Specialty"),
        header_cell("Location"),
        header_cell("Rating"),
        header_cell("Matched symptoms"),
        header_cell("Distance"),
        header_cell("Match"),
    ]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Right);

    for entry in &report.entries {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.name).add_attribute(Attribute::Bold),
            Cell::new(&entry.specialty),
            optional_cell(entry.location.as_deref()),
            optional_cell(entry.rating.map(|r| format!("{r:.1}")).as_deref()),
            matched_cell(entry),
            optional_cell(entry.distance_km.map(|d| format!("{d:.0} km")).as_deref()),
            percent_cell(entry.match_percent),
        ]);
    }
    println!("{table}");
    println!(
        "Considered {} practitioners; registry {}",
        report.considered,
        short_fingerprint(&report.registry_fingerprint)
    );
}

pub fn print_report_json(report: &MatchReport) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_practitioners(listing: &RegistryListing) {
    let snapshot = &listing.snapshot;
    println!("Source: {}", snapshot.source);
    println!(
        "Practitioners: {} across {} specialties",
        snapshot.len(),
        snapshot.specialty_count()
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Specialty"),
        header_cell("Symptoms"),
        header_cell("Rating"),
        header_cell("Location"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for record in snapshot.records() {
        table.add_row(vec![
            Cell::new(record.id()),
            Cell::new(record.name()),
            Cell::new(record.specialty()),
            Cell::new(record.treatable_symptoms().join(", ")),
            optional_cell(record.rating().map(|r| format!("{r:.1}")).as_deref()),
            optional_cell(record.location()),
        ]);
    }
    println!("{table}");

    if !listing.rejected.is_empty() {
        eprintln!("Skipped rows:");
        for row in &listing.rejected {
            eprintln!("- line {}: {}", row.line, row.reason);
        }
    }
}

pub fn print_query(query: &SymptomQuery) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Token"), header_cell("Source")]);
    apply_table_style(&mut table);
    for token in query.tokens() {
        let source = if query.extracted().contains(token) {
            Cell::new("text")
        } else {
            dim_cell("synonym")
        };
        table.add_row(vec![Cell::new(token), source]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn matched_cell(entry: &MatchEntry) -> Cell {
    if entry.matched_symptoms.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(entry.matched_summary())
    }
}

fn percent_cell(percent: u8) -> Cell {
    let color = match percent {
        70.. => Color::Green,
        40..=69 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(format!("{percent}%"))
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
