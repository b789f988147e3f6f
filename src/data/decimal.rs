use serde::Serialize;
use simple_error::SimpleError;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Number of fractional digits carried by a `Decimal`.
pub const DECIMAL_SCALE: u32 = 2;
const DECIMAL_ONE: i64 = 10i64.pow(DECIMAL_SCALE);

/// Number of fractional digits carried by a `Revenue`. A product of two
/// `Decimal`s fits exactly.
pub const REVENUE_SCALE: u32 = 2 * DECIMAL_SCALE;
const REVENUE_ONE: i128 = 10i128.pow(REVENUE_SCALE);

/// Fixed-point decimal with two fractional digits, the precision of every
/// TPC-H money and percentage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal {
    units: i64,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal { units: 0 };
    pub const ONE: Decimal = Decimal { units: DECIMAL_ONE };

    pub fn from_units(units: i64) -> Self {
        Decimal { units }
    }

    pub fn units(&self) -> i64 {
        self.units
    }

    pub fn to_f64(&self) -> f64 {
        self.units as f64 / DECIMAL_ONE as f64
    }

    /// `self * (1 - discount)`, exact.
    pub fn discounted(&self, discount: Decimal) -> Revenue {
        Revenue::from_units(self.units as i128 * (DECIMAL_ONE as i128 - discount.units as i128))
    }
}

impl FromStr for Decimal {
    type Err = SimpleError;

    /// Accepts `[-+]digits[.digits]`. Fractional digits beyond the scale are
    /// allowed only when they are zero, so no precision is ever dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (whole, frac) = match body.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (body, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(SimpleError::new(format!("empty decimal {:?}", s)));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SimpleError::new(format!("invalid decimal {:?}", s)));
        }
        let scale = DECIMAL_SCALE as usize;
        if frac.len() > scale && frac[scale..].bytes().any(|b| b != b'0') {
            return Err(SimpleError::new(format!("decimal {:?} has more than {} fractional digits", s, scale)));
        }

        let mut units: i64 = 0;
        let digits = whole
            .bytes()
            .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(scale));
        for digit in digits {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add((digit - b'0') as i64))
                .ok_or_else(|| SimpleError::new(format!("decimal {:?} out of range", s)))?;
        }
        Ok(Decimal::from_units(if negative { -units } else { units }))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.units as i128, DECIMAL_ONE as i128, DECIMAL_SCALE)
    }
}

/// Exact revenue amount with four fractional digits. Sums of revenues are
/// exact, so the aggregation result does not depend on summation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revenue {
    units: i128,
}

impl Revenue {
    pub const ZERO: Revenue = Revenue { units: 0 };

    pub fn from_units(units: i128) -> Self {
        Revenue { units }
    }

    pub fn units(&self) -> i128 {
        self.units
    }

    pub fn to_f64(&self) -> f64 {
        self.units as f64 / REVENUE_ONE as f64
    }
}

impl Add for Revenue {
    type Output = Revenue;

    fn add(self, rhs: Revenue) -> Revenue {
        Revenue::from_units(self.units + rhs.units)
    }
}

impl AddAssign for Revenue {
    fn add_assign(&mut self, rhs: Revenue) {
        self.units += rhs.units;
    }
}

impl Sum for Revenue {
    fn sum<I: Iterator<Item = Revenue>>(iter: I) -> Revenue {
        iter.fold(Revenue::ZERO, |acc, r| acc + r)
    }
}

impl fmt::Display for Revenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.units, REVENUE_ONE, REVENUE_SCALE)
    }
}

impl Serialize for Revenue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn write_fixed(f: &mut fmt::Formatter<'_>, units: i128, one: i128, scale: u32) -> fmt::Result {
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    let one = one as u128;
    write!(
        f,
        "{}{}.{:0width$}",
        sign,
        abs / one,
        abs % one,
        width = scale as usize
    )
}
