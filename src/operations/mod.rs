mod aggregator;
mod csvreader;
mod index;
mod join_filter;
mod partition;
mod result;

pub use aggregator::*;
pub use csvreader::*;
pub use index::*;
pub use join_filter::*;
pub use partition::*;
pub use result::*;
