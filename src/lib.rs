//! A growable sequence stored across variable-length buckets.
//!
//! `FragmentedVec` never moves its whole content to grow. Elements live in an
//! ordered list of buckets (each a contiguous growable array) and the logical
//! sequence is the concatenation of the buckets. Inserting into a full bucket
//! splits it, copying only the smaller side, and removals that leave many
//! near-empty buckets eventually trigger a compaction back into one bucket.
//!
//! # Example
//!
//! ```
//! use fragmented_vec::FragmentedVec;
//!
//! let mut vec: FragmentedVec<i32> = FragmentedVec::new();
//! vec.append_range([1, 2, 3, 4, 5]);
//! vec.insert(2, 99).unwrap();
//! assert_eq!(vec.to_vec(), [1, 2, 99, 3, 4, 5]);
//!
//! vec.remove_range(1, 3).unwrap();
//! assert_eq!(vec.to_vec(), [1, 4, 5]);
//!
//! vec.sort();
//! assert_eq!(vec.binary_search(&4), Ok(1));
//! ```

mod buckets;
mod config;
mod defrag;
mod error;
mod into_iter;
mod iter;
mod mutate;
mod position;
mod range;
mod search;

pub use allocator_api2::alloc::{Allocator, Global};
pub use config::{
    Config, DEFAULT_AUTO_DEFRAGMENT_THRESHOLD, DEFAULT_COMPACTION_RATIO, DEFAULT_SPARSE_DIVISOR,
};
pub use error::{Error, ErrorKind, Result};
pub use into_iter::IntoIter;
pub use iter::{Iter, IterMut};

use buckets::{Bucket, BucketStore};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// A sequence container partitioned into variable-length buckets.
///
/// Random access walks the bucket list, so indexing costs `O(buckets)`
/// rather than `O(1)`; in exchange, inserting or removing in the middle only
/// moves the elements of one bucket.
///
/// # Synchronization
///
/// Structural changes require `&mut self`, so the borrow checker already
/// keeps readers from observing a half-rebuilt bucket list. Callers that
/// coordinate access across threads through their own interior mutability
/// can use [`sync_root`](Self::sync_root) as a shared lock.
pub struct FragmentedVec<T, A: Allocator + Clone = Global> {
    /// Buckets and cached length
    pub(crate) buf: BucketStore<T, A>,
    pub(crate) config: Config,
    sync_root: Arc<Mutex<()>>,
}

impl<T> FragmentedVec<T> {
    /// Creates a new empty `FragmentedVec`.
    ///
    /// Does not allocate until elements are added.
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let vec: FragmentedVec<i32> = FragmentedVec::new();
    /// assert!(vec.is_empty());
    /// assert_eq!(vec.bucket_count(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a new `FragmentedVec` holding one empty bucket of `capacity`.
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let vec: FragmentedVec<i32> = FragmentedVec::with_capacity(100);
    /// assert!(vec.capacity() >= 100);
    /// assert!(vec.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates a new empty `FragmentedVec` with the given compaction settings.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let mut vec = Self::new();
        vec.config = config;
        Ok(vec)
    }
}

impl<T, A: Allocator + Clone> FragmentedVec<T, A> {
    /// Creates a new empty `FragmentedVec` whose buckets allocate from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self::from_store(BucketStore::new_in(alloc))
    }

    /// Creates a new `FragmentedVec` holding one empty bucket of `capacity`
    /// allocated from `alloc`.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::from(Bucket::with_capacity_in(capacity, alloc))
    }

    fn from_store(buf: BucketStore<T, A>) -> Self {
        Self {
            buf,
            config: Config::default(),
            sync_root: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if there are no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.buf.len() == 0
    }

    /// Returns the sum of all bucket capacities.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buf.bucket_count()
    }

    /// Returns the length of each bucket, in order.
    ///
    /// Intended for diagnostics; the layout is not part of the logical value.
    pub fn bucket_lens(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.buf.buckets().iter().map(Bucket::len)
    }

    /// Returns the allocator used for new buckets.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Returns the compaction settings.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the compaction settings.
    ///
    /// Takes effect at the next removal; nothing is rebuilt immediately.
    pub fn set_config(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Returns the fraction of sparse buckets above which removals compact.
    #[inline]
    pub fn auto_defragment_threshold(&self) -> f64 {
        self.config.auto_defragment_threshold
    }

    /// Sets the fraction of sparse buckets, in `(0, 1]`, above which removals compact.
    pub fn set_auto_defragment_threshold(&mut self, threshold: f64) -> Result<()> {
        config::check_fraction("auto_defragment_threshold", threshold)?;
        self.config.auto_defragment_threshold = threshold;
        Ok(())
    }

    /// Returns the lock callers may share to coordinate access to this container.
    ///
    /// The handle is created with the container; clones of the container get
    /// their own.
    #[inline]
    pub fn sync_root(&self) -> &Arc<Mutex<()>> {
        &self.sync_root
    }

    /// Returns a reference to the element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        let point = self.buf.resolve_point(index).ok()?;
        Some(&self.buf.bucket(point.cursor.bucket)[point.cursor.offset])
    }

    /// Returns a mutable reference to the element at `index`, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let point = self.buf.resolve_point(index).ok()?;
        Some(&mut self.buf.bucket_mut(point.cursor.bucket)[point.cursor.offset])
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.buf.buckets().iter().find_map(|b| b.first())
    }

    /// Returns a reference to the last element, or `None` if empty.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.buf.buckets().iter().rev().find_map(|b| b.last())
    }

    /// Swaps the elements at `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, a: usize, b: usize) {
        let len = self.len();
        let (pa, pb) = match (self.buf.resolve_point(a), self.buf.resolve_point(b)) {
            (Ok(pa), Ok(pb)) => (pa, pb),
            _ => panic!("swap indices ({a}, {b}) out of bounds for length {len}"),
        };
        self.swap_cursors(pa.cursor, pb.cursor);
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(self.buf.buckets(), self.len())
    }

    /// Returns an iterator over mutable references to the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, A> {
        let len = self.len();
        IterMut::new(self.buf.buckets_mut(), len)
    }

    /// Clones every element into a `Vec`.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        for bucket in self.buf.buckets() {
            out.extend_from_slice(bucket);
        }
        out
    }
}

// Trait implementations
impl<T: Clone, A: Allocator + Clone> Clone for FragmentedVec<T, A> {
    /// Clones bucket by bucket, preserving the layout.
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            config: self.config,
            sync_root: Arc::new(Mutex::new(())),
        }
    }
}

impl<T: PartialEq, A: Allocator + Clone> PartialEq for FragmentedVec<T, A> {
    /// Compares the logical sequences; bucket layouts may differ.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator + Clone> Eq for FragmentedVec<T, A> {}

impl<T: PartialOrd, A: Allocator + Clone> PartialOrd for FragmentedVec<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, A: Allocator + Clone> Ord for FragmentedVec<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: std::hash::Hash, A: Allocator + Clone> std::hash::Hash for FragmentedVec<T, A> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

impl<T: fmt::Debug, A: Allocator + Clone> fmt::Debug for FragmentedVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator + Clone> fmt::Display for FragmentedVec<T, A> {
    /// Diagnostic summary: the total count, then the length of every bucket.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Count = {}", self.len())?;
        for (i, len) in self.bucket_lens().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{len}")?;
        }
        Ok(())
    }
}

impl<T> Default for FragmentedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator + Clone> Index<usize> for FragmentedVec<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("index out of bounds")
    }
}

impl<T, A: Allocator + Clone> IndexMut<usize> for FragmentedVec<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.get_mut(index).expect("index out of bounds")
    }
}

impl<T, A: Allocator + Clone> Extend<T> for FragmentedVec<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_range(iter);
    }
}

impl<'a, T: Clone + 'a, A: Allocator + Clone> Extend<&'a T> for FragmentedVec<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.append_range(iter.into_iter().cloned());
    }
}

impl<T> FromIterator<T> for FragmentedVec<T> {
    /// Seeds a single bucket with the collected elements.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bucket = Bucket::with_capacity_in(iter.size_hint().0, Global);
        bucket.extend(iter);
        Self::from(bucket)
    }
}

impl<T, A: Allocator + Clone> From<allocator_api2::vec::Vec<T, A>> for FragmentedVec<T, A> {
    /// Adopts `bucket` as the only bucket, without copying.
    fn from(bucket: allocator_api2::vec::Vec<T, A>) -> Self {
        if bucket.is_empty() && bucket.capacity() == 0 {
            return Self::new_in(bucket.allocator().clone());
        }
        Self::from_store(BucketStore::from_bucket(bucket))
    }
}

impl<T> From<Vec<T>> for FragmentedVec<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T, A: Allocator + Clone> IntoIterator for FragmentedVec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator + Clone> IntoIterator for &'a FragmentedVec<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator + Clone> IntoIterator for &'a mut FragmentedVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a container with exactly the given bucket layout.
    pub(crate) fn layout(parts: &[&[i32]]) -> FragmentedVec<i32> {
        let mut vec = FragmentedVec::new();
        for part in parts {
            let mut bucket = vec.buf.new_bucket(part.len());
            bucket.extend_from_slice(part);
            vec.buf.grow_len(part.len());
            vec.buf.push_bucket(bucket);
        }
        vec
    }

    /// Cached length matches the buckets and no bucket is left empty.
    pub(crate) fn assert_invariants<T>(vec: &FragmentedVec<T>) {
        assert!(vec.buf.is_consistent(), "cached length out of sync");
        if vec.len() > 0 {
            assert!(
                vec.bucket_lens().all(|len| len > 0),
                "empty bucket left behind: {:?}",
                vec.bucket_lens().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_new_empty() {
        let vec: FragmentedVec<i32> = FragmentedVec::new();
        assert!(vec.is_empty());
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.bucket_count(), 0);
        assert_eq!(vec.get(0), None);
        assert_eq!(vec.first(), None);
        assert_eq!(vec.last(), None);
    }

    #[test]
    fn test_with_capacity() {
        let vec: FragmentedVec<i32> = FragmentedVec::with_capacity(100);
        assert!(vec.capacity() >= 100);
        assert_eq!(vec.bucket_count(), 1);
        assert!(vec.is_empty());
    }

    #[test]
    fn test_from_iter_seeds_one_bucket() {
        let vec: FragmentedVec<i32> = (0..10).collect();
        assert_eq!(vec.len(), 10);
        assert_eq!(vec.bucket_count(), 1);
        assert_invariants(&vec);

        let empty: FragmentedVec<i32> = std::iter::empty().collect();
        assert_eq!(empty.bucket_count(), 0);
    }

    #[test]
    fn test_get_across_buckets() {
        let mut vec = layout(&[&[1, 2], &[3], &[4, 5, 6]]);
        assert_eq!(vec.get(0), Some(&1));
        assert_eq!(vec.get(2), Some(&3));
        assert_eq!(vec.get(5), Some(&6));
        assert_eq!(vec.get(6), None);
        assert_eq!(vec.first(), Some(&1));
        assert_eq!(vec.last(), Some(&6));

        *vec.get_mut(3).unwrap() = 40;
        vec[4] = 50;
        assert_eq!(vec.to_vec(), vec![1, 2, 3, 40, 50, 6]);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_index_out_of_bounds() {
        let vec = layout(&[&[1]]);
        let _ = vec[1];
    }

    #[test]
    fn test_swap_across_buckets() {
        let mut vec = layout(&[&[1, 2], &[3, 4]]);
        vec.swap(0, 3);
        vec.swap(1, 1);
        assert_eq!(vec.to_vec(), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_display_reports_layout() {
        let vec = layout(&[&[1, 2], &[3], &[4, 5, 6]]);
        assert_eq!(vec.to_string(), "Count = 6\n2 1 3");
        assert_eq!(format!("{:?}", vec), "[1, 2, 3, 4, 5, 6]");
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a = layout(&[&[1, 2], &[3]]);
        let b = layout(&[&[1], &[2, 3]]);
        let c: FragmentedVec<i32> = vec![1, 2, 4].into();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let hash = |v: &FragmentedVec<i32>| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));
    }

    #[test]
    fn test_clone_preserves_layout() {
        let a = layout(&[&[1, 2], &[3]]);
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.bucket_lens().collect::<Vec<_>>(), vec![2, 1]);
        assert!(!Arc::ptr_eq(a.sync_root(), b.sync_root()));
    }

    #[test]
    fn test_threshold_setter_validates() {
        let mut vec: FragmentedVec<i32> = FragmentedVec::new();
        assert_eq!(vec.auto_defragment_threshold(), 0.8);
        vec.set_auto_defragment_threshold(0.5).unwrap();
        assert_eq!(vec.auto_defragment_threshold(), 0.5);
        let err = vec.set_auto_defragment_threshold(1.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(vec.auto_defragment_threshold(), 0.5);
        assert!(FragmentedVec::<i32>::with_config(Config::new().with_sparse_divisor(0)).is_err());
    }

    #[test]
    fn test_sync_root_is_lockable() {
        let vec: FragmentedVec<i32> = FragmentedVec::new();
        let root = Arc::clone(vec.sync_root());
        let guard = root.lock();
        assert!(vec.sync_root().try_lock().is_none());
        drop(guard);
        assert!(vec.sync_root().try_lock().is_some());
    }

    #[test]
    fn test_drop_elements() {
        use std::rc::Rc;
        let marker = Rc::new(());
        {
            let mut vec = FragmentedVec::new();
            for _ in 0..10 {
                vec.push(Rc::clone(&marker));
            }
            vec.insert(5, Rc::clone(&marker)).unwrap();
            assert_eq!(Rc::strong_count(&marker), 12);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
