use serde::Serialize;
use simple_error::SimpleError;
use std::fmt;
use std::str::FromStr;

/// How line-item rows are dealt to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Partitioning {
    /// Worker `i` takes one contiguous range; range sizes differ by at most one.
    Contiguous,
    /// Worker `i` takes rows `i, i + n, i + 2n, ...`.
    Striped,
}

impl Default for Partitioning {
    fn default() -> Self {
        Partitioning::Contiguous
    }
}

impl FromStr for Partitioning {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contiguous" => Ok(Partitioning::Contiguous),
            "striped" => Ok(Partitioning::Striped),
            _ => Err(SimpleError::new(format!(
                "unknown partitioning {:?}, expected contiguous or striped",
                s
            ))),
        }
    }
}

impl fmt::Display for Partitioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partitioning::Contiguous => write!(f, "contiguous"),
            Partitioning::Striped => write!(f, "striped"),
        }
    }
}

/// The rows `start, start + stride, ...` below `end` handled by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub id: usize,
    start: usize,
    end: usize,
    stride: usize,
}

impl Partition {
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(self.stride)
    }

    pub fn len(&self) -> usize {
        if self.start >= self.end {
            0
        } else {
            (self.end - self.start + self.stride - 1) / self.stride
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stride == 1 {
            write!(f, "#{} rows [{}, {})", self.id, self.start, self.end)
        } else {
            write!(
                f,
                "#{} rows {}..{} step {}",
                self.id, self.start, self.end, self.stride
            )
        }
    }
}

/// Effective number of workers for `rows` line items: at least one, at most
/// one per row.
pub fn effective_workers(requested: i64, rows: usize) -> usize {
    let upper = rows.max(1) as i64;
    let workers = requested.clamp(1, upper) as usize;
    if workers as i64 != requested {
        log::warn!(
            "Requested {} workers for {} line items, using {}",
            requested,
            rows,
            workers
        );
    }
    workers
}

impl Partitioning {
    /// Splits `rows` row positions into `workers` disjoint partitions that
    /// together cover every row once.
    pub fn split(&self, rows: usize, workers: usize) -> Vec<Partition> {
        let workers = workers.max(1);
        match self {
            Partitioning::Contiguous => {
                let base = rows / workers;
                let extra = rows % workers;
                let mut start = 0;
                (0..workers)
                    .map(|id| {
                        let len = base + usize::from(id < extra);
                        let partition = Partition {
                            id,
                            start,
                            end: start + len,
                            stride: 1,
                        };
                        start += len;
                        partition
                    })
                    .collect()
            }
            Partitioning::Striped => (0..workers)
                .map(|id| Partition {
                    id,
                    start: id,
                    end: rows,
                    stride: workers,
                })
                .collect(),
        }
    }
}
