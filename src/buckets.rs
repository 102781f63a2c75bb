//! Bucket storage for `FragmentedVec`.
//!
//! This module owns the ordered bucket list and the cached element count,
//! similar to how `RawVec` owns the buffer for `Vec`. It knows nothing about
//! logical positions; that is the job of the `position` module.

use std::ops::Range;

use allocator_api2::alloc::Allocator;

/// One contiguous fragment of the sequence.
pub(crate) type Bucket<T, A> = allocator_api2::vec::Vec<T, A>;

/// Ordered list of buckets plus the total number of elements they hold.
///
/// Invariant (outside of a compound operation in progress):
/// `len == buckets.iter().map(Bucket::len).sum()`.
pub(crate) struct BucketStore<T, A: Allocator + Clone> {
    buckets: Vec<Bucket<T, A>>,
    /// Cached total element count
    len: usize,
    alloc: A,
}

impl<T, A: Allocator + Clone> BucketStore<T, A> {
    /// Creates a store with no buckets.
    #[inline]
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            buckets: Vec::new(),
            len: 0,
            alloc,
        }
    }

    /// Creates a store holding exactly one bucket.
    pub(crate) fn from_bucket(bucket: Bucket<T, A>) -> Self {
        let alloc = bucket.allocator().clone();
        Self {
            len: bucket.len(),
            buckets: vec![bucket],
            alloc,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Records `n` elements added directly to a bucket.
    #[inline]
    pub(crate) fn grow_len(&mut self, n: usize) {
        self.len += n;
    }

    /// Records `n` elements removed directly from a bucket.
    #[inline]
    pub(crate) fn shrink_len(&mut self, n: usize) {
        debug_assert!(n <= self.len);
        self.len -= n;
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn buckets(&self) -> &[Bucket<T, A>] {
        &self.buckets
    }

    #[inline]
    pub(crate) fn buckets_mut(&mut self) -> &mut [Bucket<T, A>] {
        &mut self.buckets
    }

    #[inline]
    pub(crate) fn bucket(&self, index: usize) -> &Bucket<T, A> {
        &self.buckets[index]
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self, index: usize) -> &mut Bucket<T, A> {
        &mut self.buckets[index]
    }

    /// Sum of all bucket capacities.
    ///
    /// Saturates, since every bucket of a zero-sized type reports `usize::MAX`.
    pub(crate) fn capacity(&self) -> usize {
        self.buckets
            .iter()
            .fold(0usize, |acc, b| acc.saturating_add(b.capacity()))
    }

    /// Allocates a fresh, unlinked bucket.
    #[inline]
    pub(crate) fn new_bucket(&self, capacity: usize) -> Bucket<T, A> {
        Bucket::with_capacity_in(capacity, self.alloc.clone())
    }

    /// Appends a bucket after the last one. Does not touch `len`.
    #[inline]
    pub(crate) fn push_bucket(&mut self, bucket: Bucket<T, A>) {
        self.buckets.push(bucket);
    }

    /// Links a bucket at `index`, shifting later buckets back. Does not touch `len`.
    #[inline]
    pub(crate) fn insert_bucket(&mut self, index: usize, bucket: Bucket<T, A>) {
        self.buckets.insert(index, bucket);
    }

    /// Unlinks and drops the buckets in `range`. Does not touch `len`.
    pub(crate) fn remove_buckets(&mut self, range: Range<usize>) {
        self.buckets.drain(range);
    }

    /// Returns the trailing bucket, creating an empty one if there is none.
    pub(crate) fn last_or_insert(&mut self) -> &mut Bucket<T, A> {
        if self.buckets.is_empty() {
            let bucket = self.new_bucket(0);
            self.buckets.push(bucket);
        }
        let last = self.buckets.len() - 1;
        &mut self.buckets[last]
    }

    /// Discards every bucket with no elements, returning how many were discarded.
    pub(crate) fn remove_empty(&mut self) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|b| !b.is_empty());
        before - self.buckets.len()
    }

    /// Moves every element, in order, into a single bucket of `capacity`.
    ///
    /// With no elements and zero capacity no bucket is kept at all.
    pub(crate) fn collapse(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);
        if self.len == 0 && capacity == 0 {
            self.buckets.clear();
            return;
        }
        let mut merged = self.new_bucket(capacity);
        for mut bucket in self.buckets.drain(..) {
            merged.extend(bucket.drain(..));
        }
        self.buckets.push(merged);
    }

    /// Collapses into one bucket only if the content is spread over several.
    ///
    /// Returns the surviving bucket.
    pub(crate) fn make_contiguous(&mut self) -> Option<&mut Bucket<T, A>> {
        if self.buckets.len() > 1 {
            self.collapse(self.len);
        }
        self.buckets.first_mut()
    }

    /// Gives up the bucket list.
    pub(crate) fn into_buckets(self) -> Vec<Bucket<T, A>> {
        self.buckets
    }

    /// Drops every bucket.
    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Checks the cached length against the buckets.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.len == self.buckets.iter().map(Bucket::len).sum::<usize>()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for BucketStore<T, A> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            alloc: self.alloc.clone(),
        }
    }
}
