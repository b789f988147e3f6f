use crate::data::*;
use crate::error::Result;
use crate::operations::Indexes;

/// Why a line item did not contribute. Not an error: this is the filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMismatch {
    OrderDate,
    NationMismatch,
    Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Contributes { nation: &'a str, revenue: Revenue },
    Filtered(FilterMismatch),
}

/// Resolves the join chain of one line item and applies the query
/// predicates:
///
/// ```text
/// lineitem -> orders (o_orderdate in range) -> customer -> nation
///          -> supplier -> nation (same as the customer's) -> region (r_name)
/// ```
///
/// Shared by all workers; evaluating a row reads the indexes only.
#[derive(Debug, Clone, Copy)]
pub struct JoinFilter<'i, 'a> {
    indexes: &'i Indexes<'a>,
    region_name: &'i str,
    date_range: DateRange,
}

impl<'i, 'a> JoinFilter<'i, 'a> {
    pub fn new(indexes: &'i Indexes<'a>, region_name: &'i str, date_range: DateRange) -> Self {
        JoinFilter {
            indexes,
            region_name,
            date_range,
        }
    }

    /// `row` is the position of `item` in the line-item table; it is only
    /// used to name the row in integrity errors.
    pub fn evaluate(&self, row: usize, item: &LineItem) -> Result<Outcome<'a>> {
        let lineitem_row = || format!("lineitem row {}", row + 1);

        let order = self.indexes.orders.resolve(item.orderkey, lineitem_row)?;
        if !self.date_range.contains(&order.orderdate) {
            return Ok(Outcome::Filtered(FilterMismatch::OrderDate));
        }

        let customer = self
            .indexes
            .customer
            .resolve(order.custkey, || format!("order {}", order.orderkey))?;
        let customer_nation = self
            .indexes
            .nation
            .resolve(customer.nationkey, || format!("customer {}", customer.custkey))?;

        let supplier = self.indexes.supplier.resolve(item.suppkey, lineitem_row)?;
        let supplier_nation = self
            .indexes
            .nation
            .resolve(supplier.nationkey, || format!("supplier {}", supplier.suppkey))?;

        if customer_nation.nationkey != supplier_nation.nationkey {
            return Ok(Outcome::Filtered(FilterMismatch::NationMismatch));
        }

        let region = self
            .indexes
            .region
            .resolve(supplier_nation.regionkey, || format!("nation {}", supplier_nation.nationkey))?;
        if region.name != self.region_name {
            return Ok(Outcome::Filtered(FilterMismatch::Region));
        }

        Ok(Outcome::Contributes {
            nation: supplier_nation.name.as_str(),
            revenue: item.extendedprice.discounted(item.discount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn store() -> TableStore {
        TableStore {
            region: vec![
                Region { regionkey: 2, name: "ASIA".into() },
                Region { regionkey: 3, name: "EUROPE".into() },
            ],
            nation: vec![
                Nation { nationkey: 8, name: "INDIA".into(), regionkey: 2 },
                Nation { nationkey: 18, name: "CHINA".into(), regionkey: 2 },
                Nation { nationkey: 6, name: "FRANCE".into(), regionkey: 3 },
            ],
            supplier: vec![
                Supplier { suppkey: 1, nationkey: 8 },
                Supplier { suppkey: 2, nationkey: 18 },
                Supplier { suppkey: 3, nationkey: 6 },
            ],
            customer: vec![
                Customer { custkey: 10, nationkey: 8 },
                Customer { custkey: 20, nationkey: 6 },
                Customer { custkey: 30, nationkey: 99 },
            ],
            orders: vec![
                Order { orderkey: 100, custkey: 10, orderdate: date("1994-01-01") },
                Order { orderkey: 101, custkey: 10, orderdate: date("1995-01-01") },
                Order { orderkey: 102, custkey: 20, orderdate: date("1994-06-01") },
                Order { orderkey: 103, custkey: 30, orderdate: date("1994-06-01") },
                Order { orderkey: 104, custkey: 40, orderdate: date("1994-06-01") },
            ],
            lineitem: vec![],
        }
    }

    fn item(orderkey: Key, suppkey: Key) -> LineItem {
        LineItem {
            orderkey,
            suppkey,
            extendedprice: dec("1000.00"),
            discount: dec("0.05"),
        }
    }

    fn range() -> DateRange {
        DateRange::new(date("1994-01-01"), date("1995-01-01")).unwrap()
    }

    #[test]
    fn matching_item_contributes_discounted_price() {
        let store = store();
        let indexes = Indexes::build(&store).unwrap();
        let filter = JoinFilter::new(&indexes, "ASIA", range());
        let outcome = filter.evaluate(0, &item(100, 1)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Contributes {
                nation: "INDIA",
                revenue: Revenue::from_units(9_500_000),
            }
        );
    }

    #[test]
    fn date_range_is_half_open() {
        let store = store();
        let indexes = Indexes::build(&store).unwrap();
        let filter = JoinFilter::new(&indexes, "ASIA", range());
        assert!(matches!(
            filter.evaluate(0, &item(100, 1)).unwrap(),
            Outcome::Contributes { .. }
        ));
        assert_eq!(
            filter.evaluate(0, &item(101, 1)).unwrap(),
            Outcome::Filtered(FilterMismatch::OrderDate)
        );
    }

    #[test]
    fn supplier_nation_must_match_customer_nation() {
        let store = store();
        let indexes = Indexes::build(&store).unwrap();
        let filter = JoinFilter::new(&indexes, "ASIA", range());
        assert_eq!(
            filter.evaluate(0, &item(100, 2)).unwrap(),
            Outcome::Filtered(FilterMismatch::NationMismatch)
        );
    }

    #[test]
    fn region_name_is_exact_and_case_sensitive() {
        let store = store();
        let indexes = Indexes::build(&store).unwrap();
        let filter = JoinFilter::new(&indexes, "ASIA", range());
        assert_eq!(
            filter.evaluate(0, &item(102, 3)).unwrap(),
            Outcome::Filtered(FilterMismatch::Region)
        );
        let filter = JoinFilter::new(&indexes, "asia", range());
        assert_eq!(
            filter.evaluate(0, &item(100, 1)).unwrap(),
            Outcome::Filtered(FilterMismatch::Region)
        );
    }

    #[test]
    fn dangling_references_are_integrity_errors() {
        let store = store();
        let indexes = Indexes::build(&store).unwrap();
        let filter = JoinFilter::new(&indexes, "ASIA", range());

        let err = filter.evaluate(4, &item(999, 1)).unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("lineitem row 5 references missing orders key 999"));

        let err = filter.evaluate(0, &item(104, 1)).unwrap_err();
        assert!(err.to_string().contains("order 104 references missing customer key 40"));

        let err = filter.evaluate(0, &item(103, 1)).unwrap_err();
        assert!(err.to_string().contains("customer 30 references missing nation key 99"));

        let err = filter.evaluate(0, &item(100, 77)).unwrap_err();
        assert!(err.to_string().contains("missing supplier key 77"));
    }

    #[test]
    fn out_of_range_order_is_filtered_before_further_resolution() {
        let mut store = store();
        store.orders.push(Order { orderkey: 105, custkey: 40, orderdate: date("1990-01-01") });
        let indexes = Indexes::build(&store).unwrap();
        let filter = JoinFilter::new(&indexes, "ASIA", range());
        assert_eq!(
            filter.evaluate(0, &item(105, 1)).unwrap(),
            Outcome::Filtered(FilterMismatch::OrderDate)
        );
    }
}
