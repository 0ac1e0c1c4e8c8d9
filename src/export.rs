//! Flat-file export of the accumulated batch.
//!
//! Records are flat maps whose field sets may differ between sources, so the
//! CSV header is the union of all keys ordered by first appearance. Null
//! fields become empty cells. The writer is std-only (quotes + CRLF-safe);
//! JSON goes through serde_json.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::normalize::UnifiedRecord;

/// Union of field names across records, ordered by first appearance.
pub fn column_union(records: &[UnifiedRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Write the batch as CSV with a header row.
pub fn export_csv(records: &[UnifiedRecord], path: &Path) -> io::Result<()> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);

    let columns = column_union(records);
    write_row(&mut out, &columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|column| render_cell(record.get(column)))
            .collect();
        write_row(&mut out, &row)?;
    }
    out.flush()
}

/// Write the batch as a pretty-printed JSON array.
pub fn export_json(records: &[UnifiedRecord], path: &Path) -> io::Result<()> {
    ensure_parent(path)?;
    let mut json = serde_json::to_string_pretty(records).map_err(io::Error::from)?;
    json.push('\n');
    fs::write(path, json)
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn needs_quotes(cell: &str) -> bool {
    cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}

fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> UnifiedRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_column_union_orders_by_first_appearance() {
        let records = vec![
            record(&[("title", json!("a")), ("price", json!(1))]),
            record(&[("title", json!("b")), ("image", json!("x.jpg"))]),
        ];
        assert_eq!(column_union(&records), ["title", "price", "image"]);
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unified_records.csv");

        let records = vec![
            record(&[
                ("title", json!("Widget, large")),
                ("price", json!(19.99)),
                ("note", Value::Null),
            ]),
            record(&[("title", json!("Plain")), ("stock", json!(3))]),
        ];
        export_csv(&records, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "title,price,note,stock");
        // Comma in a cell forces quoting; absent and null fields are empty.
        assert_eq!(lines[1], "\"Widget, large\",19.99,,");
        assert_eq!(lines[2], "Plain,,,3");
    }

    #[test]
    fn test_csv_escapes_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.csv");

        let records = vec![record(&[("title", json!(r#"a "quoted" name"#))])];
        export_csv(&records, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().nth(1).unwrap(), r#""a ""quoted"" name""#);
    }

    #[test]
    fn test_json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/unified_records.json");

        let records = vec![record(&[("title", json!("Widget")), ("price", json!(19.99))])];
        export_json(&records, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let parsed: Vec<UnifiedRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, records);
    }
}
