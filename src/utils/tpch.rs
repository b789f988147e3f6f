use crate::data::{Column, Schema};
use crate::error::{QueryError, Result};

use glob::{glob, Pattern};
use std::io;
use std::path::{Path, PathBuf};

pub const REGION: &str = "region";
pub const NATION: &str = "nation";
pub const SUPPLIER: &str = "supplier";
pub const CUSTOMER: &str = "customer";
pub const ORDERS: &str = "orders";
pub const LINEITEM: &str = "lineitem";

/// The relations read by the revenue-per-nation query.
pub const TPCH_TABLES: [&str; 6] = [REGION, NATION, SUPPLIER, CUSTOMER, ORDERS, LINEITEM];

/// Data files of `table` under `directory`: `{table}.tbl` or its split parts
/// `{table}.tbl.1`, `{table}.tbl.2`, ... in partition order. Other siblings
/// such as `{table}.tbl.bak` are ignored.
pub fn table_files(directory: &Path, table: &str) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&directory.to_string_lossy());
    let pattern = Path::new(&escaped).join(format!("{}.tbl*", table));
    let pattern = pattern.to_string_lossy();
    let mut input_files = vec![];
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() && is_table_file(&path, table) => input_files.push(path),
            Ok(path) => log::debug!("Table {} ignores {}", table, path.display()),
            Err(e) => {
                let err = io::Error::new(e.error().kind(), e.to_string());
                return Err(QueryError::io(e.path().to_path_buf(), err));
            }
        }
    }
    if input_files.is_empty() {
        return Err(QueryError::configuration(format!(
            "no input files for table {} matching {}",
            table, pattern
        )));
    }
    // To sort slices correctly taking into account the partition numbers.
    alphanumeric_sort::sort_path_slice(&mut input_files);
    log::info!("Table {} reads {:?}", table, input_files);
    Ok(input_files)
}

fn is_table_file(path: &Path, table: &str) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    match name.strip_prefix(table).and_then(|rest| rest.strip_prefix(".tbl")) {
        Some("") => true,
        Some(part) => part
            .strip_prefix('.')
            .map_or(false, |n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// Full dbgen column layout, used to name the fields of headerless `.tbl`
/// files.
pub fn schema(table: &str) -> Result<Schema> {
    let columns = match table {
        "lineitem" => vec![
            Column::from_key_field("l_orderkey"),
            Column::from_field("l_partkey"),
            Column::from_field("l_suppkey"),
            Column::from_key_field("l_linenumber"),
            Column::from_field("l_quantity"),
            Column::from_field("l_extendedprice"),
            Column::from_field("l_discount"),
            Column::from_field("l_tax"),
            Column::from_field("l_returnflag"),
            Column::from_field("l_linestatus"),
            Column::from_field("l_shipdate"),
            Column::from_field("l_commitdate"),
            Column::from_field("l_receiptdate"),
            Column::from_field("l_shipinstruct"),
            Column::from_field("l_shipmode"),
            Column::from_field("l_comment"),
        ],
        "orders" => vec![
            Column::from_key_field("o_orderkey"),
            Column::from_field("o_custkey"),
            Column::from_field("o_orderstatus"),
            Column::from_field("o_totalprice"),
            Column::from_field("o_orderdate"),
            Column::from_field("o_orderpriority"),
            Column::from_field("o_clerk"),
            Column::from_field("o_shippriority"),
            Column::from_field("o_comment"),
        ],
        "customer" => vec![
            Column::from_key_field("c_custkey"),
            Column::from_field("c_name"),
            Column::from_field("c_address"),
            Column::from_field("c_nationkey"),
            Column::from_field("c_phone"),
            Column::from_field("c_acctbal"),
            Column::from_field("c_mktsegment"),
            Column::from_field("c_comment"),
        ],
        "supplier" => vec![
            Column::from_key_field("s_suppkey"),
            Column::from_field("s_name"),
            Column::from_field("s_address"),
            Column::from_field("s_nationkey"),
            Column::from_field("s_phone"),
            Column::from_field("s_acctbal"),
            Column::from_field("s_comment"),
        ],
        "nation" => vec![
            Column::from_key_field("n_nationkey"),
            Column::from_field("n_name"),
            Column::from_field("n_regionkey"),
            Column::from_field("n_comment"),
        ],
        "region" => vec![
            Column::from_key_field("r_regionkey"),
            Column::from_field("r_name"),
            Column::from_field("r_comment"),
        ],
        _ => vec![],
    };
    if columns.is_empty() {
        Err(QueryError::configuration(format!(
            "schema not defined for table {}",
            table
        )))
    } else {
        Ok(Schema::new(table, columns))
    }
}
