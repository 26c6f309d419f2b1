//! Human-readable structure breakdown of an extracted document.

use docslides_core::{ContentElement, ElementKind};
use std::fmt::Write;

/// Render the section/element breakdown printed by `--summary`.
pub fn structure_breakdown(elements: &[ContentElement]) -> String {
    let mut out = String::from("Document Structure Breakdown:\n");
    let mut sections = 0;
    let mut count = 0;

    for element in elements {
        if element.kind == ElementKind::SectionTitle {
            sections += 1;
            let indent = "  ".repeat(element.section_level);
            let _ = writeln!(out, "\n{}SECTION {}: {}", indent, sections, element.text);
            continue;
        }

        count += 1;
        let _ = writeln!(out, "  | {:03}. {}", count, describe(element));

        if let Some(table) = element.table.as_ref().filter(|_| element.kind == ElementKind::Table) {
            out.push_str("  |     Table Content:\n");
            for row in &table.rows {
                let _ = writeln!(out, "  |     - {}", row.join(" | "));
            }
        }
    }

    let _ = writeln!(out, "\nTotal sections: {}", sections);
    let _ = writeln!(out, "Total content elements: {}", count);
    out
}

fn describe(element: &ContentElement) -> String {
    match element.kind {
        ElementKind::Image => format!(
            "Image (URL: {})",
            element.image.as_ref().map(|i| i.uri.as_str()).unwrap_or("")
        ),
        ElementKind::Table => match &element.table {
            Some(table) => format!("Table ({}x{})", table.row_count(), table.column_count()),
            None => "Table".to_string(),
        },
        _ => element.text.replace('\n', " / "),
    }
}
