mod date;
mod decimal;
mod record;
mod schema;
mod table;

pub use date::*;
pub use decimal::*;
pub use record::*;
pub use schema::*;
pub use table::*;
