//! Row-oriented series for multi-line charts
//!
//! Charting libraries consume one row per time step with one column per
//! series: `{ "time": 3.0, "group1": 91.2, "group2": 78.0 }`. A [`ChartRow`]
//! serializes to exactly that shape, with missing values as `null`.

use std::iter;

use serde::{Serialize, ser::SerializeMap as _};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub time: f64,
    /// `(series name, value)` in column order.
    pub values: Vec<(String, Option<f64>)>,
}

impl ChartRow {
    #[must_use]
    pub fn get(&self, series: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == series)
            .and_then(|(_, value)| *value)
    }
}

impl Serialize for ChartRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("time", &self.time)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Renders rows as CSV with a `time` column followed by the series columns.
///
/// The header is taken from the first row; missing values are left empty.
#[must_use]
pub fn rows_to_csv(rows: &[ChartRow]) -> String {
    let header = rows
        .first()
        .into_iter()
        .flat_map(|row| row.values.iter().map(|(name, _)| name.as_str()));
    let mut lines = vec![iter::once("time").chain(header).collect::<Vec<_>>().join(",")];
    for row in rows {
        let values = row
            .values
            .iter()
            .map(|(_, value)| value.map_or_else(String::new, |v| v.to_string()));
        lines.push(
            iter::once(row.time.to_string())
                .chain(values)
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ChartRow {
        ChartRow {
            time: 2.5,
            values: vec![
                ("group1".to_owned(), Some(80.0)),
                ("group2".to_owned(), None),
            ],
        }
    }

    #[test]
    fn test_serialize_flat_object() {
        let json = serde_json::to_value(row()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "time": 2.5, "group1": 80.0, "group2": null })
        );
    }

    #[test]
    fn test_get() {
        let row = row();
        assert_eq!(row.get("group1"), Some(80.0));
        assert_eq!(row.get("group2"), None);
        assert_eq!(row.get("group3"), None);
    }

    #[test]
    fn test_csv() {
        assert_eq!(rows_to_csv(&[row()]), "time,group1,group2\n2.5,80,\n");
        assert_eq!(rows_to_csv(&[]), "time\n");
    }
}
