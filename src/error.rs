use quick_error::quick_error;
use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, QueryError>;

quick_error! {
    #[derive(Debug)]
    pub enum QueryError {
        /// The input violates the TPC-H schema: a dangling foreign key, a
        /// duplicated primary key, or an unparsable key or date field.
        DataIntegrity(msg: String) {
            display("data integrity error: {}", msg)
        }
        /// A price or discount field failed to parse. Kept apart from
        /// `DataIntegrity` so that the loader can downgrade it under
        /// `NumericPolicy::SkipRow`.
        MalformedNumeric(table: &'static str, row: usize, field: &'static str, value: String) {
            display("data integrity error: {} row {} has malformed {} {:?}", table, row, field, value)
        }
        Configuration(msg: String) {
            display("configuration error: {}", msg)
        }
        Io(path: PathBuf, err: std::io::Error) {
            source(err)
            display("i/o error on {}: {}", path.display(), err)
        }
        Csv(err: csv::Error) {
            from()
            source(err)
            display("csv error: {}", err)
        }
        Json(err: serde_json::Error) {
            from()
            source(err)
            display("json error: {}", err)
        }
        Glob(err: glob::PatternError) {
            from()
            source(err)
            display("invalid table path pattern: {}", err)
        }
        ThreadPool(err: rayon::ThreadPoolBuildError) {
            from()
            source(err)
            display("failed to start worker pool: {}", err)
        }
    }
}

impl QueryError {
    pub fn integrity<S: Into<String>>(msg: S) -> Self {
        QueryError::DataIntegrity(msg.into())
    }

    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        QueryError::Configuration(msg.into())
    }

    pub fn io<P: Into<PathBuf>>(path: P, err: std::io::Error) -> Self {
        QueryError::Io(path.into(), err)
    }

    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            QueryError::DataIntegrity(_) | QueryError::MalformedNumeric(..)
        )
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, QueryError::Configuration(_))
    }
}

/// The step of a query run that failed. Reported to the user and mapped to
/// the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Index,
    Execute,
    Write,
}

impl Stage {
    pub fn exit_code(&self) -> i32 {
        match self {
            Stage::Load => 3,
            Stage::Index => 4,
            Stage::Execute => 5,
            Stage::Write => 6,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Index => "index",
            Stage::Execute => "execute",
            Stage::Write => "write",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug)]
pub struct StageError {
    pub stage: Stage,
    pub error: QueryError,
}

impl StageError {
    pub fn new(stage: Stage, error: QueryError) -> Self {
        StageError { stage, error }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Attaches the failing stage to a `QueryError` result.
pub trait AtStage<T> {
    fn at_stage(self, stage: Stage) -> std::result::Result<T, StageError>;
}

impl<T> AtStage<T> for Result<T> {
    fn at_stage(self, stage: Stage) -> std::result::Result<T, StageError> {
        self.map_err(|error| StageError::new(stage, error))
    }
}
