use crate::data::Revenue;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;

/// Total revenue per nation name. Unordered; callers pick an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    totals: FxHashMap<String, Revenue>,
}

impl ResultSet {
    pub fn new(totals: FxHashMap<String, Revenue>) -> Self {
        ResultSet { totals }
    }

    pub fn get(&self, nation: &str) -> Option<Revenue> {
        self.totals.get(nation).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Revenue)> {
        self.totals.iter().map(|(name, revenue)| (name.as_str(), *revenue))
    }

    /// Grand total over all nations.
    pub fn total(&self) -> Revenue {
        self.totals.values().copied().sum()
    }

    pub fn sorted_by_name(&self) -> Vec<(&str, Revenue)> {
        self.iter().sorted_by(|a, b| a.0.cmp(b.0)).collect()
    }

    /// `order by revenue desc`, ties broken by name.
    pub fn sorted_by_revenue(&self) -> Vec<(&str, Revenue)> {
        self.iter()
            .sorted_by_key(|(name, revenue)| (Reverse(*revenue), *name))
            .collect()
    }

    pub fn into_inner(self) -> FxHashMap<String, Revenue> {
        self.totals
    }
}

impl FromIterator<(String, Revenue)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (String, Revenue)>>(iter: I) -> Self {
        let mut totals = FxHashMap::default();
        for (name, revenue) in iter {
            *totals.entry(name).or_insert(Revenue::ZERO) += revenue;
        }
        ResultSet { totals }
    }
}
