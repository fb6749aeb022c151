//! Built-in algebras
//!
//! Range sums need the element count of a range to apply additive
//! updates, so they aggregate into a cell carrying `(sum, len)`.
//!
//! The `i64` algebras saturate instead of overflowing. Results are exact
//! while every intermediate sum stays strictly between `i64::MIN` and
//! `i64::MAX`; past that they clamp, and for [`AddMin`] / [`AddMax`] a
//! clamped value reads as the infinite identity.

use super::{LazyMonoid, ScalarAction};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Sum of a range together with the number of elements in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SumCell {
    /// Sum of the elements
    pub sum: i64,
    /// Number of elements
    pub len: i64,
}

impl SumCell {
    /// Cell for a single element.
    pub fn new(value: i64) -> Self {
        Self { sum: value, len: 1 }
    }
}

fn sum_op(a: &SumCell, b: &SumCell) -> SumCell {
    SumCell {
        sum: a.sum.saturating_add(b.sum),
        len: a.len.saturating_add(b.len),
    }
}

/// Range add, range sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddSum;

impl LazyMonoid for AddSum {
    type Value = SumCell;
    type Update = i64;

    fn id() -> SumCell {
        SumCell::default()
    }

    fn op(a: &SumCell, b: &SumCell) -> SumCell {
        sum_op(a, b)
    }

    fn f_id() -> i64 {
        0
    }

    fn f_apply(f: &i64, x: &SumCell) -> SumCell {
        SumCell {
            sum: x.sum.saturating_add(f.saturating_mul(x.len)),
            len: x.len,
        }
    }

    fn f_compose(outer: &i64, inner: &i64) -> i64 {
        outer.saturating_add(*inner)
    }
}

impl ScalarAction for AddSum {
    fn value_of(x: i64) -> SumCell {
        SumCell::new(x)
    }

    fn update_of(x: i64) -> i64 {
        x
    }

    fn render(value: &SumCell) -> String {
        value.sum.to_string()
    }
}

/// Range assign, range sum. `None` is the no-op update.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignSum;

impl LazyMonoid for AssignSum {
    type Value = SumCell;
    type Update = Option<i64>;

    fn id() -> SumCell {
        SumCell::default()
    }

    fn op(a: &SumCell, b: &SumCell) -> SumCell {
        sum_op(a, b)
    }

    fn f_id() -> Option<i64> {
        None
    }

    fn f_apply(f: &Option<i64>, x: &SumCell) -> SumCell {
        match f {
            Some(v) => SumCell {
                sum: v.saturating_mul(x.len),
                len: x.len,
            },
            None => *x,
        }
    }

    fn f_compose(outer: &Option<i64>, inner: &Option<i64>) -> Option<i64> {
        outer.or(*inner)
    }
}

impl ScalarAction for AssignSum {
    fn value_of(x: i64) -> SumCell {
        SumCell::new(x)
    }

    fn update_of(x: i64) -> Option<i64> {
        Some(x)
    }

    fn render(value: &SumCell) -> String {
        value.sum.to_string()
    }
}

/// Range add, range minimum. `i64::MAX` is +inf and absorbs additions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddMin;

impl LazyMonoid for AddMin {
    type Value = i64;
    type Update = i64;

    fn id() -> i64 {
        i64::MAX
    }

    fn op(a: &i64, b: &i64) -> i64 {
        *a.min(b)
    }

    fn f_id() -> i64 {
        0
    }

    fn f_apply(f: &i64, x: &i64) -> i64 {
        if *x == i64::MAX {
            *x
        } else {
            x.saturating_add(*f)
        }
    }

    fn f_compose(outer: &i64, inner: &i64) -> i64 {
        outer.saturating_add(*inner)
    }
}

impl ScalarAction for AddMin {
    fn value_of(x: i64) -> i64 {
        x
    }

    fn update_of(x: i64) -> i64 {
        x
    }

    fn render(value: &i64) -> String {
        if *value == i64::MAX {
            "inf".to_string()
        } else {
            value.to_string()
        }
    }
}

/// Range add, range maximum. `i64::MIN` is -inf and absorbs additions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddMax;

impl LazyMonoid for AddMax {
    type Value = i64;
    type Update = i64;

    fn id() -> i64 {
        i64::MIN
    }

    fn op(a: &i64, b: &i64) -> i64 {
        *a.max(b)
    }

    fn f_id() -> i64 {
        0
    }

    fn f_apply(f: &i64, x: &i64) -> i64 {
        if *x == i64::MIN {
            *x
        } else {
            x.saturating_add(*f)
        }
    }

    fn f_compose(outer: &i64, inner: &i64) -> i64 {
        outer.saturating_add(*inner)
    }
}

impl ScalarAction for AddMax {
    fn value_of(x: i64) -> i64 {
        x
    }

    fn update_of(x: i64) -> i64 {
        x
    }

    fn render(value: &i64) -> String {
        if *value == i64::MIN {
            "-inf".to_string()
        } else {
            value.to_string()
        }
    }
}

/// Modulus used by [`AffineSum`].
pub const MOD: u64 = 998_244_353;

/// Sum modulo [`MOD`] together with the element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ModCell {
    /// Sum of the elements, reduced
    pub sum: u64,
    /// Number of elements, reduced
    pub len: u64,
}

impl ModCell {
    /// Cell for a single element.
    pub fn new(value: u64) -> Self {
        Self {
            sum: value % MOD,
            len: 1,
        }
    }
}

/// The map `x -> mul * x + add` modulo [`MOD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Affine {
    /// Multiplier
    pub mul: u64,
    /// Offset
    pub add: u64,
}

impl Affine {
    /// Build a reduced map.
    pub fn new(mul: u64, add: u64) -> Self {
        Self {
            mul: mul % MOD,
            add: add % MOD,
        }
    }
}

/// Range affine map, range sum, modulo 998244353.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffineSum;

impl LazyMonoid for AffineSum {
    type Value = ModCell;
    type Update = Affine;

    fn id() -> ModCell {
        ModCell::default()
    }

    fn op(a: &ModCell, b: &ModCell) -> ModCell {
        ModCell {
            sum: (a.sum + b.sum) % MOD,
            len: (a.len + b.len) % MOD,
        }
    }

    fn f_id() -> Affine {
        Affine { mul: 1, add: 0 }
    }

    fn f_apply(f: &Affine, x: &ModCell) -> ModCell {
        ModCell {
            sum: (f.mul * x.sum + f.add * x.len) % MOD,
            len: x.len,
        }
    }

    fn f_compose(outer: &Affine, inner: &Affine) -> Affine {
        Affine {
            mul: outer.mul * inner.mul % MOD,
            add: (outer.mul * inner.add + outer.add) % MOD,
        }
    }
}
