use itertools::Itertools;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub key: bool,
}

impl Column {
    pub fn from_field(name: &str) -> Column {
        Self::from_field_with_key(name, false)
    }

    pub fn from_key_field(name: &str) -> Column {
        Self::from_field_with_key(name, true)
    }

    fn from_field_with_key(name: &str, key: bool) -> Column {
        Column {
            name: name.to_string(),
            key,
        }
    }
}

/// Column layout of a pipe-delimited table file.
#[derive(Debug, Clone)]
pub struct Schema {
    pub table: String,
    pub columns: Vec<Column>,
    _column_index: FxHashMap<String, usize>,
}

impl Schema {
    pub fn new(table: &str, columns: Vec<Column>) -> Schema {
        let _column_index = columns
            .iter()
            .enumerate()
            .map(|(i, x)| (x.name.clone(), i))
            .collect();
        Schema {
            table: table.to_string(),
            columns,
            _column_index,
        }
    }

    pub fn index(&self, column: &str) -> Option<usize> {
        self._column_index.get(column).copied()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Name of the primary key column(s), joined with `,`.
    pub fn key_name(&self) -> String {
        self.columns
            .iter()
            .filter(|c| c.key)
            .map(|c| c.name.as_str())
            .join(",")
    }
}
