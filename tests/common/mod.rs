#![allow(dead_code)]

use nanoid::nanoid;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tpch_q5::data::{DateRange, LoadOptions};
use tpch_q5::operations::Partitioning;
use tpch_q5::utils::query::{QueryConfig, QueryParams};

const SCRATCH_ID_LEN: usize = 12;
const SCRATCH_ID_ALPHABET: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn resource(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources").join(path)
}

/// A fresh directory under the system temp dir, unique per call.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tpch-q5-{}-{}",
        name,
        nanoid!(SCRATCH_ID_LEN, &SCRATCH_ID_ALPHABET)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Copies a fixture directory so a test can tamper with it.
pub fn copy_fixture(fixture: &str) -> PathBuf {
    let dir = scratch_dir(fixture);
    for entry in fs::read_dir(resource(fixture)).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.join(entry.file_name())).unwrap();
    }
    dir
}

pub fn append_line(path: &Path, line: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    writeln!(file, "{}", line).unwrap();
}

pub fn expected_output(name: &str) -> String {
    fs::read_to_string(resource("expected-outputs").join(name)).unwrap()
}

pub fn asia_1994(workers: i64) -> QueryParams {
    QueryParams {
        region_name: "ASIA".to_string(),
        date_range: DateRange::new("1994-01-01".parse().unwrap(), "1995-01-01".parse().unwrap())
            .unwrap(),
        workers,
        partitioning: Partitioning::Contiguous,
    }
}

pub fn config(table_path: PathBuf, params: QueryParams) -> QueryConfig {
    let result_path = scratch_dir("out").join("result.txt");
    QueryConfig {
        params,
        table_path,
        result_path,
        load: LoadOptions::default(),
        stats_path: None,
    }
}

pub mod generated {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tpch_q5::data::*;

    pub const REGIONS: [&str; 5] = ["AFRICA", "AMERICA", "ASIA", "EUROPE", "MIDDLE EAST"];

    /// A referentially complete store with `lineitems` random line items.
    pub fn store(seed: u64, lineitems: usize) -> TableStore {
        let mut rng = StdRng::seed_from_u64(seed);
        let nations = 25;
        let suppliers = 40;
        let customers = 60;
        let orders = 300;
        TableStore {
            region: REGIONS
                .iter()
                .enumerate()
                .map(|(i, name)| Region { regionkey: i as Key, name: name.to_string() })
                .collect(),
            nation: (0..nations)
                .map(|i| Nation {
                    nationkey: i,
                    name: format!("NATION{:02}", i),
                    regionkey: i % REGIONS.len() as Key,
                })
                .collect(),
            supplier: (1..=suppliers)
                .map(|i| Supplier { suppkey: i, nationkey: rng.gen_range(0..nations) })
                .collect(),
            customer: (1..=customers)
                .map(|i| Customer { custkey: i, nationkey: rng.gen_range(0..nations) })
                .collect(),
            orders: (1..=orders)
                .map(|i| Order {
                    orderkey: i,
                    custkey: rng.gen_range(1..=customers),
                    orderdate: Date::new(
                        rng.gen_range(1992..=1998),
                        rng.gen_range(1..=12),
                        rng.gen_range(1..=28),
                    )
                    .unwrap(),
                })
                .collect(),
            lineitem: (0..lineitems)
                .map(|_| LineItem {
                    orderkey: rng.gen_range(1..=orders),
                    suppkey: rng.gen_range(1..=suppliers),
                    extendedprice: Decimal::from_units(rng.gen_range(90_000..10_500_000)),
                    discount: Decimal::from_units(rng.gen_range(0..=10)),
                })
                .collect(),
        }
    }
}
