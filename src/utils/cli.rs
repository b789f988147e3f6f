use crate::data::{Date, DateRange, LoadOptions, NumericPolicy};
use crate::error::{QueryError, Result};
use crate::operations::{HeaderMode, Partitioning};
use crate::utils::query::{QueryConfig, QueryParams};

use std::path::PathBuf;
use structopt::StructOpt;

/// TPC-H Q5: revenue per nation of one region over an order-date interval.
#[derive(Debug, StructOpt)]
#[structopt(name = "tpch-q5")]
pub struct Opt {
    /// Region name, matched exactly (e.g. ASIA)
    #[structopt(long = "r_name")]
    pub r_name: String,

    /// First order date included, YYYY-MM-DD
    #[structopt(long = "start_date")]
    pub start_date: Date,

    /// First order date excluded, YYYY-MM-DD
    #[structopt(long = "end_date")]
    pub end_date: Date,

    /// Number of worker threads; clamped to [1, lineitem rows]
    #[structopt(long = "threads", allow_hyphen_values = true)]
    pub threads: i64,

    /// Directory holding region.tbl, nation.tbl, ... lineitem.tbl
    #[structopt(long = "table_path", parse(from_os_str))]
    pub table_path: PathBuf,

    /// File receiving one `nation|revenue` line per nation
    #[structopt(long = "result_path", parse(from_os_str))]
    pub result_path: PathBuf,

    /// Table files have no header row (dbgen output)
    #[structopt(long = "headerless")]
    pub headerless: bool,

    /// fail-fast or skip-row, for unparsable prices and discounts
    #[structopt(long = "numeric_policy", default_value = "fail-fast")]
    pub numeric_policy: NumericPolicy,

    /// contiguous or striped line-item partitions
    #[structopt(long = "partitioning", default_value = "contiguous")]
    pub partitioning: Partitioning,

    /// Optional JSON file receiving row counts and stage timings
    #[structopt(long = "stats_path", parse(from_os_str))]
    pub stats_path: Option<PathBuf>,
}

impl Opt {
    pub fn into_config(self) -> Result<QueryConfig> {
        let date_range = DateRange::new(self.start_date, self.end_date)
            .map_err(|e| QueryError::configuration(e.to_string()))?;
        if self.r_name.is_empty() {
            return Err(QueryError::configuration("region name must not be empty"));
        }
        Ok(QueryConfig {
            params: QueryParams {
                region_name: self.r_name,
                date_range,
                workers: self.threads,
                partitioning: self.partitioning,
            },
            table_path: self.table_path,
            result_path: self.result_path,
            load: LoadOptions {
                header: if self.headerless {
                    HeaderMode::Absent
                } else {
                    HeaderMode::Present
                },
                numeric_policy: self.numeric_policy,
            },
            stats_path: self.stats_path,
        })
    }
}
