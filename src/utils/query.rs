use crate::data::*;
use crate::error::{AtStage, Stage, StageError};
use crate::operations::{self, Indexes, Partitioning, ResultSet};
use crate::utils::output;

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Parameters of the revenue-per-nation query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParams {
    /// Exact, case-sensitive `r_name`.
    pub region_name: String,
    pub date_range: DateRange,
    /// Requested worker count; clamped to `[1, lineitem rows]` at execution.
    pub workers: i64,
    pub partitioning: Partitioning,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub params: QueryParams,
    pub table_path: PathBuf,
    pub result_path: PathBuf,
    pub load: LoadOptions,
    pub stats_path: Option<PathBuf>,
}

/// Elapsed milliseconds per stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageTimings {
    pub load_ms: f64,
    pub index_ms: f64,
    pub execute_ms: f64,
    pub write_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryStats {
    pub params: QueryParams,
    pub load: LoadStats,
    pub execution: operations::ExecutionStats,
    pub timings: StageTimings,
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1e3
}

/// Loads, indexes and aggregates, without writing anything.
pub fn evaluate(config: &QueryConfig) -> Result<(ResultSet, QueryStats), StageError> {
    let mut timings = StageTimings::default();

    let start_time = Instant::now();
    let (store, load) = TableStore::load(&config.table_path, &config.load).at_stage(Stage::Load)?;
    timings.load_ms = elapsed_ms(start_time);

    let start_time = Instant::now();
    let indexes = Indexes::build(&store).at_stage(Stage::Index)?;
    timings.index_ms = elapsed_ms(start_time);

    let start_time = Instant::now();
    let (result, execution) =
        operations::execute(&store, &indexes, &config.params).at_stage(Stage::Execute)?;
    timings.execute_ms = elapsed_ms(start_time);

    let stats = QueryStats {
        params: config.params.clone(),
        load,
        execution,
        timings,
    };
    Ok((result, stats))
}

/// Runs the query end to end and writes the result file (and the stats file
/// when configured). Nothing is written unless every earlier stage succeeded.
pub fn run_query(config: &QueryConfig) -> Result<QueryStats, StageError> {
    let start_time = Instant::now();
    log::info!(
        "Running revenue per nation for region {:?} over {} with {} workers",
        config.params.region_name,
        config.params.date_range,
        config.params.workers
    );
    let (result, mut stats) = evaluate(config)?;

    log::info!("Query Result");
    for (nation, revenue) in result.sorted_by_revenue() {
        log::info!("{}|{}", nation, revenue);
    }

    let write_time = Instant::now();
    output::write_results(&config.result_path, &result).at_stage(Stage::Write)?;
    stats.timings.write_ms = elapsed_ms(write_time);
    if let Some(stats_path) = &config.stats_path {
        // A failed run leaves no result file behind, stats included.
        if let Err(e) = output::write_json(stats_path, &stats) {
            if let Err(remove) = std::fs::remove_file(&config.result_path) {
                log::warn!("Could not remove {}: {}", config.result_path.display(), remove);
            }
            return Err(StageError::new(Stage::Write, e));
        }
    }
    log::info!("Query Took: {:.2?}", start_time.elapsed());
    Ok(stats)
}
