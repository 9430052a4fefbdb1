//! CSV export of a filtered, sorted listing.

use super::{Catalog, ListQuery};
use crate::emperor::{EmperorRecord, ScoreField};

/// Byte-order mark so spreadsheet tools detect UTF-8.
const BOM: &str = "\u{feff}";

const TEXT_HEADERS: [&str; 5] = ["排名", "时代", "庙/谥/称号", "姓名", "短评"];

/// Render every record matching `query` (paging ignored) as CSV.
pub fn export_csv(catalog: &Catalog, query: &ListQuery) -> String {
    let mut out = String::from(BOM);

    let header: Vec<&str> = TEXT_HEADERS
        .iter()
        .copied()
        .chain(ScoreField::ALL.iter().map(|f| f.label()))
        .collect();
    push_row(&mut out, header.iter().map(|h| h.to_string()));

    for record in catalog.select(query) {
        push_row(&mut out, row_cells(record));
    }
    out
}

/// Suggested download name for an export.
pub fn export_filename() -> String {
    format!("emperors_{}.csv", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

fn row_cells(record: &EmperorRecord) -> impl Iterator<Item = String> + '_ {
    let text = [
        record.overall_rank.map(|r| r.to_string()).unwrap_or_default(),
        record.era.clone().unwrap_or_default(),
        record.title.clone(),
        record.name.clone(),
        record.short_comment.clone(),
    ];
    text.into_iter()
        .chain(ScoreField::ALL.iter().map(|f| format_score(record.score(*f))))
}

/// Whole numbers print without a fractional part.
pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let line: Vec<String> = cells.map(|c| escape(&c)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
