//! Shared helpers: a plain `Vec` model to check trees against

#![allow(dead_code)]

use perseg::{LazyMonoid, PersistentSegTree};

/// Reference implementation: elements stored directly
pub struct Model<M: LazyMonoid> {
    pub values: Vec<M::Value>,
}

impl<M: LazyMonoid> Model<M> {
    pub fn new(values: Vec<M::Value>) -> Self {
        Self { values }
    }

    pub fn set(&self, index: usize, value: M::Value) -> Self {
        let mut values = self.values.clone();
        values[index] = value;
        Self { values }
    }

    pub fn apply(&self, start: usize, end: usize, f: &M::Update) -> Self {
        let mut values = self.values.clone();
        for value in &mut values[start..end] {
            *value = M::f_apply(f, value);
        }
        Self { values }
    }

    pub fn fold(&self, start: usize, end: usize) -> M::Value {
        self.values[start..end]
            .iter()
            .fold(M::id(), |acc, x| M::op(&acc, x))
    }
}

/// Every `(start, end)` pair with `start <= end <= len`
pub fn all_ranges(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..=len).flat_map(move |start| (start..=len).map(move |end| (start, end)))
}

/// Compare every range fold of `tree` against `model`
pub fn assert_matches<M>(tree: &PersistentSegTree<M>, model: &Model<M>)
where
    M: LazyMonoid,
    M::Value: PartialEq + std::fmt::Debug,
{
    assert_eq!(tree.len(), model.values.len());
    assert_eq!(tree.to_vec(), model.values);
    for (start, end) in all_ranges(tree.len()) {
        assert_eq!(
            tree.fold(start..end),
            model.fold(start, end),
            "fold mismatch on {}..{}",
            start,
            end
        );
    }
}
