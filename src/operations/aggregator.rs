use crate::data::*;
use crate::error::{QueryError, Result};
use crate::operations::*;
use crate::utils::log_event;
use crate::utils::query::QueryParams;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Counters of one partition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    pub rows: usize,
    pub matched: usize,
    pub filtered_order_date: usize,
    pub filtered_nation: usize,
    pub filtered_region: usize,
}

impl PartitionStats {
    fn record(&mut self, outcome: &Outcome) {
        self.rows += 1;
        match outcome {
            Outcome::Contributes { .. } => self.matched += 1,
            Outcome::Filtered(FilterMismatch::OrderDate) => self.filtered_order_date += 1,
            Outcome::Filtered(FilterMismatch::NationMismatch) => self.filtered_nation += 1,
            Outcome::Filtered(FilterMismatch::Region) => self.filtered_region += 1,
        }
    }

    fn absorb(&mut self, other: &PartitionStats) {
        self.rows += other.rows;
        self.matched += other.matched;
        self.filtered_order_date += other.filtered_order_date;
        self.filtered_nation += other.filtered_nation;
        self.filtered_region += other.filtered_region;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionStats {
    /// Partitions, one per effective worker.
    pub workers: usize,
    /// OS threads running the partitions.
    pub threads: usize,
    pub partitioning: String,
    pub merges: usize,
    #[serde(flatten)]
    pub rows: PartitionStats,
}

#[derive(Debug, Default)]
struct SharedTotals {
    totals: FxHashMap<String, Revenue>,
    merges: usize,
}

/// Owns the result of one query execution. Workers accumulate privately and
/// call `merge` once each; the lock is held only while merging.
#[derive(Debug, Default)]
pub struct PartitionedAggregator {
    shared: Mutex<SharedTotals>,
}

impl PartitionedAggregator {
    pub fn new() -> Self {
        PartitionedAggregator::default()
    }

    /// Runs the join-filter over the rows of `partition` and merges the
    /// partial sums. On an integrity error nothing is merged.
    pub fn run_partition(
        &self,
        filter: &JoinFilter,
        lineitems: &[LineItem],
        partition: &Partition,
    ) -> Result<PartitionStats> {
        let mut local: FxHashMap<&str, Revenue> = FxHashMap::default();
        let mut stats = PartitionStats::default();
        for row in partition.rows() {
            let outcome = filter.evaluate(row, &lineitems[row])?;
            stats.record(&outcome);
            if let Outcome::Contributes { nation, revenue } = outcome {
                *local.entry(nation).or_insert(Revenue::ZERO) += revenue;
            }
        }
        log::debug!(
            "Partition {} matched {} of {} rows into {} nations",
            partition,
            stats.matched,
            stats.rows,
            local.len()
        );
        self.merge(local);
        Ok(stats)
    }

    /// Adds one worker's partial sums into the shared totals.
    pub fn merge(&self, partial: FxHashMap<&str, Revenue>) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        for (nation, revenue) in partial {
            match shared.totals.get_mut(nation) {
                Some(total) => *total += revenue,
                None => {
                    shared.totals.insert(nation.to_string(), revenue);
                }
            }
        }
        shared.merges += 1;
    }

    pub fn merges(&self) -> usize {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner).merges
    }

    pub fn into_result(self) -> ResultSet {
        let shared = self.shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        ResultSet::new(shared.totals)
    }
}

/// Threads for `workers` partitions: no more than the machine runs at once.
fn pool_threads(workers: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    workers.clamp(1, cores.max(1))
}

/// Executes the query over `store` with a worker pool created for this call
/// and torn down before it returns. All partitions finish before any error
/// is reported; the first failing partition (by id) wins.
pub fn execute(
    store: &TableStore,
    indexes: &Indexes,
    params: &QueryParams,
) -> Result<(ResultSet, ExecutionStats)> {
    let start_time = Instant::now();
    let lineitems = store.lineitem.as_slice();
    let workers = effective_workers(params.workers, lineitems.len());
    let partitions = params.partitioning.split(lineitems.len(), workers);
    let threads = pool_threads(workers);
    log::info!(
        "Executing over {} line items with {} {} partitions on {} threads",
        lineitems.len(),
        workers,
        params.partitioning,
        threads
    );

    let filter = JoinFilter::new(indexes, &params.region_name, params.date_range);
    let aggregator = PartitionedAggregator::new();

    // Scoped pool: every worker thread is joined before build_scoped returns.
    let outcomes: Vec<Result<PartitionStats>> = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("q5-worker-{}", i))
        .build_scoped(
            |thread| thread.run(),
            |pool| {
                pool.install(|| {
                    partitions
                        .par_iter()
                        .map(|partition| {
                            let task = format!("partition-{}", partition.id);
                            log_event(&task, "start");
                            let outcome = aggregator.run_partition(&filter, lineitems, partition);
                            log_event(&task, if outcome.is_ok() { "finish" } else { "abort" });
                            outcome
                        })
                        .collect::<Vec<_>>()
                })
            },
        )?;

    let mut stats = ExecutionStats {
        workers,
        threads,
        partitioning: params.partitioning.to_string(),
        ..ExecutionStats::default()
    };
    let mut first_error: Option<QueryError> = None;
    for (partition, outcome) in partitions.iter().zip(outcomes) {
        match outcome {
            Ok(partition_stats) => stats.rows.absorb(&partition_stats),
            Err(e) => {
                log::debug!("Partition {} failed: {}", partition, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    stats.merges = aggregator.merges();
    let result = aggregator.into_result();
    log::info!(
        "Matched {} of {} line items into {} nations in {:.2?}",
        stats.rows.matched,
        stats.rows.rows,
        result.len(),
        start_time.elapsed()
    );
    Ok((result, stats))
}
