use crate::data::{Date, Decimal};
use crate::error::{QueryError, Result};
use crate::utils::tpch;

use csv::StringRecord;
use getset::{CopyGetters, Getters};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Primary and foreign key values of every relation.
pub type Key = i64;

/// Field names of one table file, shared by all its records.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNames {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl FieldNames {
    /// Empty names (a trailing `|` on the header line) are not addressable.
    pub fn new(names: Vec<String>) -> FieldNames {
        let index = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, name)| (name.clone(), i))
            .collect();
        FieldNames { names, index }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One row as handed over by the ingestion layer: field name to raw string.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct RawRecord {
    #[getset(get = "pub")]
    fields: Arc<FieldNames>,
    values: StringRecord,
    /// 1-based data row number within its table.
    #[getset(get_copy = "pub")]
    row: usize,
}

impl RawRecord {
    pub fn new(fields: Arc<FieldNames>, values: StringRecord, row: usize) -> RawRecord {
        RawRecord {
            fields,
            values,
            row,
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .position(field)
            .and_then(|i| self.values.get(i))
    }

    /// `(name, value)` pairs of the named fields present in this row.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .names()
            .iter()
            .zip(self.values.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// A fixed-shape row of one TPC-H relation, converted once at load time.
pub trait TpchRecord: Sized + Send + Sync {
    const TABLE: &'static str;

    /// Fields `from_raw` reads; each file header is checked against it.
    const REQUIRED_FIELDS: &'static [&'static str];

    fn from_raw(record: &RawRecord) -> Result<Self>;
}

/// A record addressable by its primary key.
pub trait Keyed {
    fn key(&self) -> Key;
}

fn text<'a>(record: &'a RawRecord, table: &str, field: &str) -> Result<&'a str> {
    record.get(field).ok_or_else(|| {
        QueryError::integrity(format!(
            "{} row {} has no field {}",
            table,
            record.row(),
            field
        ))
    })
}

fn key(record: &RawRecord, table: &str, field: &str) -> Result<Key> {
    let value = text(record, table, field)?;
    value.parse::<Key>().map_err(|_| {
        QueryError::integrity(format!(
            "{} row {} has malformed {} {:?}",
            table,
            record.row(),
            field,
            value
        ))
    })
}

fn decimal(record: &RawRecord, table: &'static str, field: &'static str) -> Result<Decimal> {
    let value = text(record, table, field)?;
    value
        .parse::<Decimal>()
        .map_err(|_| QueryError::MalformedNumeric(table, record.row(), field, value.to_string()))
}

fn date(record: &RawRecord, table: &str, field: &str) -> Result<Date> {
    let value = text(record, table, field)?;
    value.parse::<Date>().map_err(|e| {
        QueryError::integrity(format!(
            "{} row {} has malformed {} {:?}: {}",
            table,
            record.row(),
            field,
            value,
            e
        ))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub regionkey: Key,
    pub name: String,
}

impl TpchRecord for Region {
    const TABLE: &'static str = tpch::REGION;
    const REQUIRED_FIELDS: &'static [&'static str] = &["r_regionkey", "r_name"];

    fn from_raw(record: &RawRecord) -> Result<Self> {
        Ok(Region {
            regionkey: key(record, Self::TABLE, "r_regionkey")?,
            name: text(record, Self::TABLE, "r_name")?.to_string(),
        })
    }
}

impl Keyed for Region {
    fn key(&self) -> Key {
        self.regionkey
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nation {
    pub nationkey: Key,
    pub name: String,
    pub regionkey: Key,
}

impl TpchRecord for Nation {
    const TABLE: &'static str = tpch::NATION;
    const REQUIRED_FIELDS: &'static [&'static str] = &["n_nationkey", "n_name", "n_regionkey"];

    fn from_raw(record: &RawRecord) -> Result<Self> {
        Ok(Nation {
            nationkey: key(record, Self::TABLE, "n_nationkey")?,
            name: text(record, Self::TABLE, "n_name")?.to_string(),
            regionkey: key(record, Self::TABLE, "n_regionkey")?,
        })
    }
}

impl Keyed for Nation {
    fn key(&self) -> Key {
        self.nationkey
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub suppkey: Key,
    pub nationkey: Key,
}

impl TpchRecord for Supplier {
    const TABLE: &'static str = tpch::SUPPLIER;
    const REQUIRED_FIELDS: &'static [&'static str] = &["s_suppkey", "s_nationkey"];

    fn from_raw(record: &RawRecord) -> Result<Self> {
        Ok(Supplier {
            suppkey: key(record, Self::TABLE, "s_suppkey")?,
            nationkey: key(record, Self::TABLE, "s_nationkey")?,
        })
    }
}

impl Keyed for Supplier {
    fn key(&self) -> Key {
        self.suppkey
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub custkey: Key,
    pub nationkey: Key,
}

impl TpchRecord for Customer {
    const TABLE: &'static str = tpch::CUSTOMER;
    const REQUIRED_FIELDS: &'static [&'static str] = &["c_custkey", "c_nationkey"];

    fn from_raw(record: &RawRecord) -> Result<Self> {
        Ok(Customer {
            custkey: key(record, Self::TABLE, "c_custkey")?,
            nationkey: key(record, Self::TABLE, "c_nationkey")?,
        })
    }
}

impl Keyed for Customer {
    fn key(&self) -> Key {
        self.custkey
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub orderkey: Key,
    pub custkey: Key,
    pub orderdate: Date,
}

impl TpchRecord for Order {
    const TABLE: &'static str = tpch::ORDERS;
    const REQUIRED_FIELDS: &'static [&'static str] = &["o_orderkey", "o_custkey", "o_orderdate"];

    fn from_raw(record: &RawRecord) -> Result<Self> {
        Ok(Order {
            orderkey: key(record, Self::TABLE, "o_orderkey")?,
            custkey: key(record, Self::TABLE, "o_custkey")?,
            orderdate: date(record, Self::TABLE, "o_orderdate")?,
        })
    }
}

impl Keyed for Order {
    fn key(&self) -> Key {
        self.orderkey
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub orderkey: Key,
    pub suppkey: Key,
    pub extendedprice: Decimal,
    pub discount: Decimal,
}

impl TpchRecord for LineItem {
    const TABLE: &'static str = tpch::LINEITEM;
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["l_orderkey", "l_suppkey", "l_extendedprice", "l_discount"];

    fn from_raw(record: &RawRecord) -> Result<Self> {
        Ok(LineItem {
            orderkey: key(record, Self::TABLE, "l_orderkey")?,
            suppkey: key(record, Self::TABLE, "l_suppkey")?,
            extendedprice: decimal(record, Self::TABLE, "l_extendedprice")?,
            discount: decimal(record, Self::TABLE, "l_discount")?,
        })
    }
}
