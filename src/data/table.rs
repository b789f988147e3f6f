use crate::data::{Customer, LineItem, Nation, Order, Region, Supplier, TpchRecord};
use crate::error::{QueryError, Result};
use crate::operations::{CSVReader, HeaderMode};
use crate::utils::tpch;

use serde::Serialize;
use simple_error::SimpleError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

/// What to do with a line item whose price or discount does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericPolicy {
    /// Abort the load with an integrity error.
    FailFast,
    /// Drop the row, log a warning and count it.
    SkipRow,
}

impl Default for NumericPolicy {
    fn default() -> Self {
        NumericPolicy::FailFast
    }
}

impl FromStr for NumericPolicy {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail-fast" => Ok(NumericPolicy::FailFast),
            "skip-row" => Ok(NumericPolicy::SkipRow),
            _ => Err(SimpleError::new(format!(
                "unknown numeric policy {:?}, expected fail-fast or skip-row",
                s
            ))),
        }
    }
}

impl fmt::Display for NumericPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericPolicy::FailFast => write!(f, "fail-fast"),
            NumericPolicy::SkipRow => write!(f, "skip-row"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub header: HeaderMode,
    pub numeric_policy: NumericPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            header: HeaderMode::Present,
            numeric_policy: NumericPolicy::FailFast,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadStats {
    /// Rows kept per table.
    pub rows: BTreeMap<String, usize>,
    /// Line items dropped under `NumericPolicy::SkipRow`.
    pub skipped_lineitems: usize,
}

/// The six relations of one query run. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    pub region: Vec<Region>,
    pub nation: Vec<Nation>,
    pub supplier: Vec<Supplier>,
    pub customer: Vec<Customer>,
    pub orders: Vec<Order>,
    pub lineitem: Vec<LineItem>,
}

impl TableStore {
    /// Loads `{table}.tbl*` for each relation under `directory`.
    pub fn load(directory: &Path, options: &LoadOptions) -> Result<(TableStore, LoadStats)> {
        log::info!("Specified Input Directory: {}", directory.display());
        let mut stats = LoadStats::default();
        let store = TableStore {
            region: load_relation(directory, options, &mut stats)?,
            nation: load_relation(directory, options, &mut stats)?,
            supplier: load_relation(directory, options, &mut stats)?,
            customer: load_relation(directory, options, &mut stats)?,
            orders: load_relation(directory, options, &mut stats)?,
            lineitem: load_relation(directory, options, &mut stats)?,
        };
        Ok((store, stats))
    }
}

fn load_relation<T: TpchRecord>(
    directory: &Path,
    options: &LoadOptions,
    stats: &mut LoadStats,
) -> Result<Vec<T>> {
    let start_time = Instant::now();
    let reader = match options.header {
        HeaderMode::Present => CSVReader::new(),
        HeaderMode::Absent => CSVReader::headerless(tpch::schema(T::TABLE)?),
    };

    let mut rows = vec![];
    let mut skipped = 0;
    let mut next_row = 1;
    for path in tpch::table_files(directory, T::TABLE)? {
        let fields = reader.field_names(&path)?;
        if let Some(missing) = T::REQUIRED_FIELDS.iter().find(|f| !fields.contains(f)) {
            return Err(QueryError::integrity(format!(
                "{} file {} has no field {}",
                T::TABLE,
                path.display(),
                missing
            )));
        }
        let read = reader.for_each_record(&path, next_row, |record| {
            match T::from_raw(&record) {
                Ok(row) => rows.push(row),
                Err(QueryError::MalformedNumeric(table, row, field, value))
                    if options.numeric_policy == NumericPolicy::SkipRow =>
                {
                    log::warn!("Skipping {} row {}: malformed {} {:?}", table, row, field, value);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
            Ok(())
        })?;
        next_row += read;
    }

    log::info!(
        "Loaded {} rows of {} in {:.2?}",
        rows.len(),
        T::TABLE,
        start_time.elapsed()
    );
    stats.rows.insert(T::TABLE.to_string(), rows.len());
    if T::TABLE == tpch::LINEITEM {
        stats.skipped_lineitems += skipped;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_tables(name: &str, lineitem: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tpch-q5-table-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let files = [
            ("region.tbl", "r_regionkey|r_name\n2|ASIA\n"),
            ("nation.tbl", "n_nationkey|n_name|n_regionkey\n8|INDIA|2\n"),
            ("supplier.tbl", "s_suppkey|s_nationkey\n1|8\n"),
            ("customer.tbl", "c_custkey|c_nationkey\n1|8\n"),
            ("orders.tbl", "o_orderkey|o_custkey|o_orderdate\n1|1|1994-03-01\n"),
        ];
        for (file, contents) in files {
            fs::write(dir.join(file), contents).unwrap();
        }
        fs::write(dir.join("lineitem.tbl"), lineitem).unwrap();
        dir
    }

    const HEADER: &str = "l_orderkey|l_suppkey|l_extendedprice|l_discount\n";

    #[test]
    fn loads_all_relations() {
        let dir = write_tables("ok", &format!("{}1|1|100.00|0.10\n1|1|50.00|0.00\n", HEADER));
        let (store, stats) = TableStore::load(&dir, &LoadOptions::default()).unwrap();
        assert_eq!(store.region[0].name, "ASIA");
        assert_eq!(store.nation[0].regionkey, 2);
        assert_eq!(store.lineitem.len(), 2);
        assert_eq!(stats.rows["lineitem"], 2);
        assert_eq!(stats.rows.len(), 6);
        assert_eq!(stats.skipped_lineitems, 0);
    }

    #[test]
    fn malformed_price_fails_fast_by_default() {
        let dir = write_tables("fail", &format!("{}1|1|abc|0.10\n1|1|50.00|0.00\n", HEADER));
        let err = TableStore::load(&dir, &LoadOptions::default()).unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn malformed_price_is_skipped_under_skip_policy() {
        let dir = write_tables("skip", &format!("{}1|1|abc|0.10\n1|1|50.00|0.00\n", HEADER));
        let options = LoadOptions {
            numeric_policy: NumericPolicy::SkipRow,
            ..LoadOptions::default()
        };
        let (store, stats) = TableStore::load(&dir, &options).unwrap();
        assert_eq!(store.lineitem.len(), 1);
        assert_eq!(stats.skipped_lineitems, 1);
    }

    #[test]
    fn malformed_key_is_never_skipped() {
        let dir = write_tables("key", &format!("{}x|1|10.00|0.10\n", HEADER));
        let options = LoadOptions {
            numeric_policy: NumericPolicy::SkipRow,
            ..LoadOptions::default()
        };
        assert!(TableStore::load(&dir, &options).unwrap_err().is_integrity());
    }

    #[test]
    fn missing_column_is_reported_before_reading_rows() {
        let dir = write_tables("column", "l_orderkey|l_suppkey|l_extendedprice\n1|1|10.00\n");
        let err = TableStore::load(&dir, &LoadOptions::default()).unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("l_discount"));
    }

    #[test]
    fn policy_round_trips_through_str() {
        assert_eq!("skip-row".parse::<NumericPolicy>().unwrap(), NumericPolicy::SkipRow);
        assert_eq!(NumericPolicy::FailFast.to_string(), "fail-fast");
        assert!("lenient".parse::<NumericPolicy>().is_err());
    }
}
