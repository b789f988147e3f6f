use crate::data::*;
use crate::error::{QueryError, Result};
use crate::utils::tpch;

use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::time::Instant;

/// Primary key lookup over one loaded relation. Borrows the rows, so an
/// index never outlives the `TableStore` it was built from.
#[derive(Debug)]
pub struct KeyIndex<'a, T> {
    table: &'static str,
    rows: FxHashMap<Key, &'a T>,
}

impl<'a, T: TpchRecord + Keyed> KeyIndex<'a, T> {
    /// Single pass over `rows`. A repeated primary key is an integrity error.
    pub fn build(rows: &'a [T]) -> Result<Self> {
        let mut index = FxHashMap::with_capacity_and_hasher(rows.len(), Default::default());
        for row in rows {
            match index.entry(row.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(_) => {
                    let column = tpch::schema(T::TABLE)
                        .map(|schema| schema.key_name())
                        .unwrap_or_else(|_| "key".to_string());
                    return Err(QueryError::integrity(format!(
                        "duplicate {} {} in table {}",
                        column,
                        row.key(),
                        T::TABLE
                    )));
                }
            }
        }
        Ok(KeyIndex {
            table: T::TABLE,
            rows: index,
        })
    }
}

impl<'a, T> KeyIndex<'a, T> {
    pub fn probe(&self, key: Key) -> Option<&'a T> {
        self.rows.get(&key).copied()
    }

    /// Like `probe`, but a miss is a dangling foreign key. `referrer` names
    /// the referencing row and is only evaluated on a miss.
    pub fn resolve<F>(&self, key: Key, referrer: F) -> Result<&'a T>
    where
        F: FnOnce() -> String,
    {
        self.probe(key).ok_or_else(|| {
            QueryError::integrity(format!(
                "{} references missing {} key {}",
                referrer(),
                self.table,
                key
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lookups for every relation the join walks from a line item.
#[derive(Debug)]
pub struct Indexes<'a> {
    pub region: KeyIndex<'a, Region>,
    pub nation: KeyIndex<'a, Nation>,
    pub supplier: KeyIndex<'a, Supplier>,
    pub customer: KeyIndex<'a, Customer>,
    pub orders: KeyIndex<'a, Order>,
}

impl<'a> Indexes<'a> {
    pub fn build(store: &'a TableStore) -> Result<Self> {
        let start_time = Instant::now();
        let indexes = Indexes {
            region: KeyIndex::build(&store.region)?,
            nation: KeyIndex::build(&store.nation)?,
            supplier: KeyIndex::build(&store.supplier)?,
            customer: KeyIndex::build(&store.customer)?,
            orders: KeyIndex::build(&store.orders)?,
        };
        log::info!(
            "Built indexes (region {}, nation {}, supplier {}, customer {}, orders {}) in {:.2?}",
            indexes.region.len(),
            indexes.nation.len(),
            indexes.supplier.len(),
            indexes.customer.len(),
            indexes.orders.len(),
            start_time.elapsed()
        );
        Ok(indexes)
    }
}
