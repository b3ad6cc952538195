use crate::models::{CategoryRecord, Dataset, TimePeriod};
use anyhow::{Result, anyhow};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One row of the tidy CSV schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Row {
    category: String,
    period_id: String,
    period_label: String,
    value: f64,
}

/// Save the dataset as long-format CSV: `category,period_id,period_label,value`.
pub fn save_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for c in dataset.categories() {
        for (p, v) in dataset.periods().iter().zip(&c.values) {
            wtr.serialize(Row {
                category: c.name.clone(),
                period_id: p.id.clone(),
                period_label: p.label.clone(),
                value: *v,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Load a long-format CSV. Periods and categories keep their first-seen order;
/// every category needs a value for every period.
pub fn load_csv<P: AsRef<Path>>(path: P, title: &str) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut periods: Vec<TimePeriod> = Vec::new();
    let mut cells: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    let mut rows: Vec<Row> = Vec::new();
    for rec in rdr.deserialize() {
        let row: Row = rec?;
        if !periods.iter().any(|p| p.id == row.period_id) {
            periods.push(TimePeriod::new(row.period_id.clone(), row.period_label.clone()));
        }
        rows.push(row);
    }
    for row in rows {
        let idx = periods
            .iter()
            .position(|p| p.id == row.period_id)
            .ok_or_else(|| anyhow!("unknown period `{}`", row.period_id))?;
        let pos = match cells.iter().position(|(name, _)| *name == row.category) {
            Some(pos) => pos,
            None => {
                cells.push((row.category.clone(), vec![None; periods.len()]));
                cells.len() - 1
            }
        };
        if cells[pos].1[idx].replace(row.value).is_some() {
            anyhow::bail!(
                "duplicate value for `{}` / `{}`",
                row.category,
                row.period_id
            );
        }
    }
    let mut categories = Vec::with_capacity(cells.len());
    for (name, values) in cells {
        let mut out = Vec::with_capacity(values.len());
        for (p, v) in periods.iter().zip(values) {
            let v = v.ok_or_else(|| crate::models::DataError::MissingValue {
                category: name.clone(),
                period: p.id.clone(),
            })?;
            out.push(v);
        }
        categories.push(CategoryRecord { name, values: out });
    }
    Ok(Dataset::new(title, periods, categories)?)
}

/// Save the dataset as pretty JSON.
pub fn save_json<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(dataset)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Load a JSON dataset (`{"title", "periods", "categories"}`); validated on load.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&text)?;
    Ok(dataset)
}

/// Load by extension: `.json` as JSON, everything else as CSV.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => {
            let title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            load_csv(path, &title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let d = Dataset::london_cost_of_living();
        save_csv(&d, &csvp).unwrap();
        save_json(&d, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
        let text = std::fs::read_to_string(&csvp).unwrap();
        assert!(text.starts_with("category,period_id,period_label,value"));
        assert_eq!(text.lines().count(), 1 + 5 * 4);
    }

    #[test]
    fn csv_missing_cell_is_error() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("gap.csv");
        std::fs::write(
            &p,
            "category,period_id,period_label,value\n\
             A,p1,P1,0.1\n\
             A,p2,P2,0.2\n\
             B,p1,P1,0.3\n",
        )
        .unwrap();
        let err = load_csv(&p, "gap").unwrap_err();
        assert!(err.to_string().contains("no value"), "{err}");
    }

    #[test]
    fn json_is_validated() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("bad.json");
        std::fs::write(
            &p,
            r#"{"title":"t","periods":[{"id":"a","label":"A"}],"categories":[{"name":"x","values":[2.0]}]}"#,
        )
        .unwrap();
        assert!(load_json(&p).is_err());
    }
}
