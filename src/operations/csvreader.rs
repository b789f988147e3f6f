use crate::data::{FieldNames, RawRecord, Schema};
use crate::error::{QueryError, Result};

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Whether table files start with a header row naming their fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    Present,
    /// dbgen output: no header, names come from the table schema.
    Absent,
}

/// Reads pipe-delimited table files into `RawRecord`s.
#[derive(Debug, Clone)]
pub struct CSVReader {
    delimiter: u8,
    header: HeaderMode,
    schema: Option<Schema>,
}

impl Default for CSVReader {
    fn default() -> Self {
        CSVReader::new()
    }
}

impl CSVReader {
    pub fn new() -> Self {
        CSVReader {
            delimiter: b'|',
            header: HeaderMode::Present,
            schema: None,
        }
    }

    /// Reader for headerless files laid out as `schema`.
    pub fn headerless(schema: Schema) -> Self {
        CSVReader {
            delimiter: b'|',
            header: HeaderMode::Absent,
            schema: Some(schema),
        }
    }

    fn open(&self, path: &Path, has_headers: bool) -> Result<csv::Reader<File>> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .from_path(path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(err) => QueryError::io(path, err),
                kind => QueryError::integrity(format!("{}: {:?}", path.display(), kind)),
            })
    }

    /// Streams the records of `path` to `consume`. Rows are numbered from
    /// `first_row` so that split files continue the numbering.
    pub fn for_each_record<F>(&self, path: &Path, first_row: usize, mut consume: F) -> Result<usize>
    where
        F: FnMut(RawRecord) -> Result<()>,
    {
        let mut reader = self.open(path, self.header == HeaderMode::Present)?;

        let names = match (&self.header, &self.schema) {
            (HeaderMode::Present, _) => reader.headers()?.iter().map(|s| s.to_string()).collect(),
            (HeaderMode::Absent, Some(schema)) => schema.column_names(),
            (HeaderMode::Absent, None) => {
                return Err(QueryError::configuration(format!(
                    "no field names for headerless file {}",
                    path.display()
                )))
            }
        };
        let fields = Arc::new(FieldNames::new(names));

        let mut row = first_row;
        for result in reader.records() {
            let values = result?;
            // A blank trailing line parses as a single empty field.
            if values.len() == 1 && values[0].is_empty() {
                continue;
            }
            consume(RawRecord::new(fields.clone(), values, row))?;
            row += 1;
        }
        Ok(row - first_row)
    }

    /// Field names a file will expose, read from its header or the schema.
    pub fn field_names(&self, path: &Path) -> Result<FieldNames> {
        match (&self.header, &self.schema) {
            (HeaderMode::Absent, Some(schema)) => Ok(FieldNames::new(schema.column_names())),
            _ => {
                let mut reader = self.open(path, true)?;
                let names = reader.headers()?.iter().map(|s| s.to_string()).collect();
                Ok(FieldNames::new(names))
            }
        }
    }
}

/// `load_table(path) -> records` for a file with a header row.
pub fn load_table(path: &Path) -> Result<Vec<RawRecord>> {
    let mut records = vec![];
    CSVReader::new().for_each_record(path, 1, |record| {
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}
