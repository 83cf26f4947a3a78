//! Equality, hashing and snapshot strategies for change tracking.
//!
//! A [`ValueComparer`] answers the three questions a change tracker asks about a
//! column value: are two snapshots equal, what is the hash, and give me a deep copy
//! to keep as a baseline. Collection comparers are built from an element comparer,
//! so `Vec<Option<i32>>` gets
//! `ListComparer<NullableComparer<DefaultComparer<i32>>>`.
//!
//! The sequence and map algorithms are exposed as free functions and reused by the
//! dynamic [`Value`](crate::core::Value) comparers in [`value`].

pub mod value;

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

pub use value::{
    FixedCharValueComparer, HstoreValueComparer, MultirangeValueComparer,
    NullableValueComparer, RangeValueComparer, ScalarValueComparer, SequenceValueComparer,
    SharedComparer,
};

/// Equality, hashing and snapshotting for values of type `T`.
///
/// Implementations must keep `equals(a, b) => hash(a) == hash(b)`.
pub trait ValueComparer<T>: Send + Sync {
    fn equals(&self, a: &T, b: &T) -> bool;

    fn hash(&self, value: &T) -> u64;

    /// Deep copy suitable as a change-tracking baseline.
    fn snapshot(&self, value: &T) -> T;
}

/// Hash a single value with the process-stable default hasher.
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Order-dependent hash combination.
pub fn combine_hash(seed: u64, hash: u64) -> u64 {
    seed ^ hash
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Hash for floats consistent with NaN == NaN and 0.0 == -0.0.
pub fn hash_f64(value: f64) -> u64 {
    if value.is_nan() {
        hash_one(&u64::MAX)
    } else if value == 0.0 {
        hash_one(&0u64)
    } else {
        hash_one(&value.to_bits())
    }
}

/// Float equality where NaN equals NaN.
pub fn f64_equals(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Index-wise equality; a length mismatch short-circuits to false.
pub fn sequence_equals<T, C>(a: &[T], b: &[T], element: &C) -> bool
where
    C: ValueComparer<T> + ?Sized,
{
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).all(|(x, y)| element.equals(x, y))
}

/// Order-dependent hash of every element.
pub fn sequence_hash<T, C>(items: &[T], element: &C) -> u64
where
    C: ValueComparer<T> + ?Sized,
{
    items
        .iter()
        .fold(hash_one(&items.len()), |acc, item| {
            combine_hash(acc, element.hash(item))
        })
}

/// Element-wise deep copy.
pub fn sequence_snapshot<T, C>(items: &[T], element: &C) -> Vec<T>
where
    C: ValueComparer<T> + ?Sized,
{
    items.iter().map(|item| element.snapshot(item)).collect()
}

/// Order-independent accumulation of `(key hash, value hash)` pairs.
pub fn unordered_hash(len: usize, entries: impl Iterator<Item = (u64, u64)>) -> u64 {
    entries.fold(hash_one(&len), |acc, (k, v)| {
        acc.wrapping_add(combine_hash(k, v))
    })
}

/// Comparer using the type's own `PartialEq`/`Hash`/`Clone`.
pub struct DefaultComparer<T>(PhantomData<fn() -> T>);

impl<T> DefaultComparer<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for DefaultComparer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DefaultComparer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for DefaultComparer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DefaultComparer")
    }
}

impl<T> ValueComparer<T> for DefaultComparer<T>
where
    T: PartialEq + Hash + Clone,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash(&self, value: &T) -> u64 {
        hash_one(value)
    }

    fn snapshot(&self, value: &T) -> T {
        value.clone()
    }
}

/// Comparer for `f64` where NaN equals NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatComparer;

impl ValueComparer<f64> for FloatComparer {
    fn equals(&self, a: &f64, b: &f64) -> bool {
        f64_equals(*a, *b)
    }

    fn hash(&self, value: &f64) -> u64 {
        hash_f64(*value)
    }

    fn snapshot(&self, value: &f64) -> f64 {
        *value
    }
}

/// Comparer for fixed-width `char(n)` strings: trailing whitespace is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCharComparer;

impl ValueComparer<String> for FixedCharComparer {
    fn equals(&self, a: &String, b: &String) -> bool {
        a.trim_end() == b.trim_end()
    }

    fn hash(&self, value: &String) -> u64 {
        hash_one(value.trim_end())
    }

    fn snapshot(&self, value: &String) -> String {
        value.clone()
    }
}

/// Lifts an element comparer over `Option<T>`.
///
/// Two `None`s are equal, `None` never equals `Some`, and two `Some`s delegate.
#[derive(Debug, Clone, Default)]
pub struct NullableComparer<C>(C);

impl<C> NullableComparer<C> {
    pub fn new(inner: C) -> Self {
        Self(inner)
    }
}

impl<T, C> ValueComparer<Option<T>> for NullableComparer<C>
where
    C: ValueComparer<T>,
{
    fn equals(&self, a: &Option<T>, b: &Option<T>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => self.0.equals(x, y),
            _ => false,
        }
    }

    fn hash(&self, value: &Option<T>) -> u64 {
        match value {
            None => 0,
            Some(v) => self.0.hash(v),
        }
    }

    fn snapshot(&self, value: &Option<T>) -> Option<T> {
        value.as_ref().map(|v| self.0.snapshot(v))
    }
}

/// Structural, order-sensitive comparer for `Vec<T>`.
#[derive(Debug, Clone, Default)]
pub struct ListComparer<C>(C);

impl<C> ListComparer<C> {
    pub fn new(element: C) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &C {
        &self.0
    }
}

impl<T, C> ValueComparer<Vec<T>> for ListComparer<C>
where
    C: ValueComparer<T>,
{
    fn equals(&self, a: &Vec<T>, b: &Vec<T>) -> bool {
        sequence_equals(a, b, &self.0)
    }

    fn hash(&self, value: &Vec<T>) -> u64 {
        sequence_hash(value, &self.0)
    }

    fn snapshot(&self, value: &Vec<T>) -> Vec<T> {
        sequence_snapshot(value, &self.0)
    }
}

/// Key-set plus per-key value comparer for maps.
///
/// Equality and hashing ignore insertion order.
#[derive(Debug, Clone, Default)]
pub struct MapComparer<C>(C);

impl<C> MapComparer<C> {
    pub fn new(value: C) -> Self {
        Self(value)
    }
}

impl<K, T, C> ValueComparer<HashMap<K, T>> for MapComparer<C>
where
    K: Eq + Hash + Clone,
    C: ValueComparer<T>,
{
    fn equals(&self, a: &HashMap<K, T>, b: &HashMap<K, T>) -> bool {
        if a.len() != b.len() {
            return false;
        }
        a.iter().all(|(k, v)| match b.get(k) {
            Some(other) => self.0.equals(v, other),
            None => false,
        })
    }

    fn hash(&self, value: &HashMap<K, T>) -> u64 {
        unordered_hash(
            value.len(),
            value.iter().map(|(k, v)| (hash_one(k), self.0.hash(v))),
        )
    }

    fn snapshot(&self, value: &HashMap<K, T>) -> HashMap<K, T> {
        value
            .iter()
            .map(|(k, v)| (k.clone(), self.0.snapshot(v)))
            .collect()
    }
}

impl<K, T, C> ValueComparer<BTreeMap<K, T>> for MapComparer<C>
where
    K: Ord + Hash + Clone,
    C: ValueComparer<T>,
{
    fn equals(&self, a: &BTreeMap<K, T>, b: &BTreeMap<K, T>) -> bool {
        if a.len() != b.len() {
            return false;
        }
        a.iter().all(|(k, v)| match b.get(k) {
            Some(other) => self.0.equals(v, other),
            None => false,
        })
    }

    fn hash(&self, value: &BTreeMap<K, T>) -> u64 {
        unordered_hash(
            value.len(),
            value.iter().map(|(k, v)| (hash_one(k), self.0.hash(v))),
        )
    }

    fn snapshot(&self, value: &BTreeMap<K, T>) -> BTreeMap<K, T> {
        value
            .iter()
            .map(|(k, v)| (k.clone(), self.0.snapshot(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nullable_int_list() -> ListComparer<NullableComparer<DefaultComparer<i32>>> {
        ListComparer::new(NullableComparer::new(DefaultComparer::new()))
    }

    #[test]
    fn test_list_equality_is_order_sensitive() {
        let cmp = ListComparer::new(DefaultComparer::<i32>::new());
        assert!(cmp.equals(&vec![1, 2], &vec![1, 2]));
        assert!(!cmp.equals(&vec![1, 2], &vec![2, 1]));
        assert!(!cmp.equals(&vec![1, 2], &vec![1, 2, 3]));
        assert_ne!(cmp.hash(&vec![1, 2]), cmp.hash(&vec![2, 1]));
    }

    #[test]
    fn test_nullable_element_three_way_branch() {
        let cmp = nullable_int_list();
        assert!(cmp.equals(&vec![None, Some(1)], &vec![None, Some(1)]));
        assert!(!cmp.equals(&vec![None, Some(1)], &vec![Some(1), None]));
        assert!(!cmp.equals(&vec![Some(1), None], &vec![Some(1), Some(1)]));
        assert_eq!(
            cmp.hash(&vec![None, Some(1)]),
            cmp.hash(&vec![None, Some(1)])
        );
    }

    #[test]
    fn test_map_equality_is_order_insensitive() {
        let cmp = MapComparer::new(DefaultComparer::<i32>::new());
        let mut a = HashMap::new();
        a.insert("a".to_string(), 1);
        a.insert("b".to_string(), 2);
        let mut b = HashMap::new();
        b.insert("b".to_string(), 2);
        b.insert("a".to_string(), 1);

        assert!(cmp.equals(&a, &b));
        assert_eq!(cmp.hash(&a), cmp.hash(&b));

        b.insert("a".to_string(), 3);
        assert!(!cmp.equals(&a, &b));
    }

    #[test]
    fn test_map_key_set_mismatch() {
        let cmp = MapComparer::new(DefaultComparer::<i32>::new());
        let a: HashMap<String, i32> = [("a".to_string(), 1)].into_iter().collect();
        let b: HashMap<String, i32> = [("b".to_string(), 1)].into_iter().collect();
        assert!(!cmp.equals(&a, &b));
    }

    #[test]
    fn test_snapshot_is_deep() {
        let cmp = ListComparer::new(ListComparer::new(DefaultComparer::<i32>::new()));
        let mut source = vec![vec![1, 2], vec![3]];
        let snapshot = cmp.snapshot(&source);
        source[0][0] = 99;
        assert_eq!(snapshot[0][0], 1);
        assert!(!cmp.equals(&source, &snapshot));
    }

    #[test]
    fn test_null_source_snapshots_to_null() {
        let cmp = NullableComparer::new(ListComparer::new(DefaultComparer::<i32>::new()));
        assert_eq!(cmp.snapshot(&None), None);
        assert_eq!(cmp.snapshot(&Some(vec![1])), Some(vec![1]));
    }

    #[test]
    fn test_float_comparer_nan_and_signed_zero() {
        let cmp = FloatComparer;
        assert!(cmp.equals(&f64::NAN, &f64::NAN));
        assert!(cmp.equals(&0.0, &-0.0));
        assert_eq!(cmp.hash(&0.0), cmp.hash(&-0.0));
        assert!(!cmp.equals(&1.0, &f64::NAN));
    }

    #[test]
    fn test_fixed_char_ignores_trailing_whitespace() {
        let cmp = FixedCharComparer;
        assert!(cmp.equals(&"abc  ".to_string(), &"abc".to_string()));
        assert!(!cmp.equals(&"  abc".to_string(), &"abc".to_string()));
        assert_eq!(cmp.hash(&"abc  ".to_string()), cmp.hash(&"abc".to_string()));
    }

    #[test]
    fn test_hash_consistency_for_generated_pairs() {
        let cmp = nullable_int_list();
        let samples: Vec<Vec<Option<i32>>> = vec![
            vec![],
            vec![None],
            vec![Some(0)],
            vec![None, Some(1)],
            vec![Some(1), None],
            vec![Some(1), Some(1)],
            vec![None, Some(1)],
        ];
        for a in &samples {
            for b in &samples {
                if cmp.equals(a, b) {
                    assert_eq!(cmp.hash(a), cmp.hash(b), "{:?} vs {:?}", a, b);
                }
            }
        }
    }
}
