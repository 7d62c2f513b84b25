use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// One row of the catalog CSV. All columns beyond `index` may be absent
/// or empty; each consumer filters for the columns it needs.
#[derive(Debug, Clone, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl BookRecord {
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn summary(&self) -> Option<&str> {
        non_empty(self.summary.as_deref())
    }

    pub fn genre(&self) -> Option<&str> {
        non_empty(self.genre.as_deref())
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// Read every row of a catalog CSV. Missing file or malformed rows are a
/// `DataLoad` error; empty-field filtering is left to the caller.
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<BookRecord>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::data_load(path, e.to_string()))?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let record: BookRecord = record.map_err(|e| Error::data_load(path, e.to_string()))?;
        rows.push(record);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_rows_and_trims_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "index,title,summary,genre").unwrap();
        writeln!(f, "0,The Hobbit,  A hole in the ground ,fantasy").unwrap();
        writeln!(f, "1,,orphan summary,").unwrap();
        drop(f);

        let rows = read_catalog(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title(), Some("The Hobbit"));
        assert_eq!(rows[0].summary(), Some("A hole in the ground"));
        assert_eq!(rows[1].title(), None);
        assert_eq!(rows[1].genre(), None);
    }

    #[test]
    fn missing_file_is_data_load_error() {
        let err = read_catalog("nonexistent.csv").unwrap_err();
        assert!(matches!(err, Error::DataLoad { .. }));
    }
}
