//! Owning iterator for `FragmentedVec`.

use std::iter::FusedIterator;

use allocator_api2::alloc::{Allocator, Global};

use crate::buckets::Bucket;
use crate::FragmentedVec;

type BucketIntoIter<T, A> = allocator_api2::vec::IntoIter<T, A>;

/// An owning iterator over elements of a `FragmentedVec`.
///
/// This struct is created by the `into_iter` method on `FragmentedVec`
/// (provided by the [`IntoIterator`] trait). Elements are moved out bucket by
/// bucket; unconsumed elements are dropped with the iterator.
pub struct IntoIter<T, A: Allocator = Global> {
    pub(crate) buckets: std::vec::IntoIter<Bucket<T, A>>,
    pub(crate) front: Option<BucketIntoIter<T, A>>,
    pub(crate) back: Option<BucketIntoIter<T, A>>,
    pub(crate) remaining: usize,
}

impl<T, A: Allocator + Clone> IntoIter<T, A> {
    /// Creates a new owning iterator from a `FragmentedVec`.
    #[inline]
    pub fn new(vec: FragmentedVec<T, A>) -> Self {
        let remaining = vec.len();
        Self {
            buckets: vec.buf.into_buckets().into_iter(),
            front: None,
            back: None,
            remaining,
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.front.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(item);
            }
            match self.buckets.next() {
                Some(bucket) => self.front = Some(bucket.into_iter()),
                None => break,
            }
        }
        let item = self.back.as_mut()?.next()?;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    #[inline]
    fn count(self) -> usize {
        self.remaining
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.back.as_mut().and_then(DoubleEndedIterator::next_back) {
                self.remaining -= 1;
                return Some(item);
            }
            match self.buckets.next_back() {
                Some(bucket) => self.back = Some(bucket.into_iter()),
                None => break,
            }
        }
        let item = self.front.as_mut()?.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: std::fmt::Debug, A: Allocator> std::fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.remaining)
            .finish()
    }
}
