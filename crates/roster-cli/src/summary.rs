use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use roster_map::{PresetApplication, Readiness};
use roster_model::{
    CanonicalField, ColumnMapping, FileIntrospection, MergeResult, SessionContext, SourceKind,
};
use roster_report::{MessageClass, Report, ReportStatus};

/// Rows shown in the file preview.
pub const PREVIEW_ROWS: usize = 3;

pub fn print_introspection(introspection: &FileIntrospection, context: &SessionContext) {
    println!("File: {}", introspection.filename);
    println!("Rows: {}", introspection.total_rows);
    println!("Columns: {}", introspection.columns.len());
    println!("Uploaded by: {}", context.describe());

    let preview = introspection.preview(PREVIEW_ROWS);
    if preview.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(introspection.columns.iter().map(|c| header_cell(c)));
    apply_table_style(&mut table);
    for row in preview {
        table.add_row(row.into_iter().map(|value| {
            if value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(value)
            }
        }));
    }
    println!();
    println!("Preview:");
    println!("{table}");
}

pub fn print_mapping(introspection: &FileIntrospection, mapping: &ColumnMapping) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Suggested"),
        header_cell("Mapped To"),
        header_cell("Required"),
    ]);
    apply_mapping_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for column in &introspection.columns {
        let suggested = introspection.suggestion_for(column);
        let mapped = mapping.get(column);
        table.add_row(vec![
            Cell::new(column).add_attribute(Attribute::Bold),
            field_cell(suggested, Color::DarkGrey),
            field_cell(mapped, Color::Blue),
            required_cell(mapped),
        ]);
    }
    println!();
    println!("Mapping:");
    println!("{table}");
}

pub fn print_readiness(readiness: &Readiness) {
    if readiness.is_ready() {
        println!("Mapping ready: all required fields are mapped.");
        return;
    }
    eprintln!("Mapping blocked:");
    if !readiness.missing.is_empty() {
        let labels: Vec<&str> = readiness.missing.iter().map(CanonicalField::label).collect();
        eprintln!("- Missing required fields: {}", labels.join(", "));
    }
    for (field, columns) in &readiness.duplicates {
        eprintln!("- {} is mapped from more than one column: {}", field.label(), columns.join(", "));
    }
}

pub fn print_preset_application(application: &PresetApplication) {
    println!("Preset applied to {} column(s).", application.applied.len());
    if !application.skipped.is_empty() {
        println!(
            "Skipped (not in this file): {}",
            application.skipped.join(", ")
        );
    }
}

pub fn print_local_suggestions(added: &[(String, CanonicalField)]) {
    if added.is_empty() {
        println!("Local suggestions: nothing to add.");
        return;
    }
    for (column, field) in added {
        println!("Local suggestion: {column} -> {field}");
    }
}

pub fn print_report(report: &Report) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Students Processed"),
        header_cell("High Risk"),
        header_cell("ML Accuracy"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        count_cell(report.headline.processed, Color::Green),
        count_cell(report.headline.high_risk, Color::Red),
        Cell::new(report.headline.accuracy_label()),
    ]);
    println!();
    println!("Processing {}:", status_label(report.status));
    println!("{table}");
    for message in &report.messages {
        match message.class {
            MessageClass::Error => eprintln!("error: {}", message.text),
            MessageClass::Warning => eprintln!("warning: {}", message.text),
            MessageClass::Success => println!("{}", message.text),
        }
    }
}

pub fn print_merge_result(result: &MergeResult) {
    let mut files = Table::new();
    files.set_header(vec![header_cell("Source"), header_cell("File")]);
    apply_table_style(&mut files);
    for kind in SourceKind::ALL {
        let name = result.uploaded_files.get(kind.id());
        files.add_row(vec![
            Cell::new(kind.id()).fg(Color::Blue),
            name.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }

    let matching = &result.matching_results;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Students"),
        header_cell("All Sources"),
        header_cell("Two Sources"),
        header_cell("Completeness"),
        header_cell("Multi-Area Risk"),
        header_cell("Stored"),
    ]);
    apply_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        count_cell(Some(matching.total_students), Color::Green),
        count_cell(Some(matching.perfect_matches), Color::Green),
        count_cell(Some(matching.partial_matches), Color::Yellow),
        Cell::new(format!("{:.1}%", matching.data_completeness)),
        count_cell(Some(matching.multi_area_risk_count), Color::Red),
        count_cell(Some(result.stored_count), Color::Green),
    ]);

    println!("Session: {}", result.session_id);
    println!("{files}");
    println!();
    println!("Merge results:");
    println!("{table}");
    if !result.message.is_empty() {
        println!("{}", result.message);
    }
}

pub fn print_fields() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Required"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in CanonicalField::ALL {
        table.add_row(vec![
            Cell::new(field.id()).fg(Color::Blue),
            Cell::new(field.label()),
            if field.is_required() {
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
}

fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Success => "succeeded",
        ReportStatus::Warning => "succeeded with warnings",
        ReportStatus::Error => "reported errors",
    }
}

fn field_cell(field: Option<CanonicalField>, color: Color) -> Cell {
    match field {
        Some(field) => Cell::new(field.id()).fg(color),
        None => dim_cell("-"),
    }
}

fn required_cell(field: Option<CanonicalField>) -> Cell {
    match field {
        Some(field) if field.is_required() => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        _ => dim_cell(""),
    }
}

fn count_cell(count: Option<u64>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_mapping_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
    ]);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
