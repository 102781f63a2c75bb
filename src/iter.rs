//! Iterator implementations for `FragmentedVec`.

use std::iter::FusedIterator;
use std::slice;

use allocator_api2::alloc::{Allocator, Global};

use crate::buckets::Bucket;

/// An iterator over references to elements of a `FragmentedVec`.
///
/// Walks the buckets in order, yielding each bucket's elements as a slice
/// iterator so that no position is resolved per element.
pub struct Iter<'a, T, A: Allocator = Global> {
    /// Buckets not yet entered from either end
    pub(crate) buckets: slice::Iter<'a, Bucket<T, A>>,
    /// Current bucket from the front
    pub(crate) front: slice::Iter<'a, T>,
    /// Current bucket from the back
    pub(crate) back: slice::Iter<'a, T>,
    /// Elements left to yield
    pub(crate) remaining: usize,
}

impl<'a, T, A: Allocator> Iter<'a, T, A> {
    pub(crate) fn new(buckets: &'a [Bucket<T, A>], len: usize) -> Self {
        Self {
            buckets: buckets.iter(),
            front: (&[]).iter(),
            back: (&[]).iter(),
            remaining: len,
        }
    }
}

impl<'a, T, A: Allocator> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.front.next() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.buckets.next() {
                Some(bucket) => self.front = bucket.iter(),
                None => break,
            }
        }
        let item = self.back.next()?;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for Iter<'_, T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.back.next_back() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.buckets.next_back() {
                Some(bucket) => self.back = bucket.iter(),
                None => break,
            }
        }
        let item = self.front.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<T, A: Allocator> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: Allocator> FusedIterator for Iter<'_, T, A> {}

impl<T, A: Allocator> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

/// An iterator over mutable references to elements of a `FragmentedVec`.
pub struct IterMut<'a, T, A: Allocator = Global> {
    pub(crate) buckets: slice::IterMut<'a, Bucket<T, A>>,
    pub(crate) front: slice::IterMut<'a, T>,
    pub(crate) back: slice::IterMut<'a, T>,
    pub(crate) remaining: usize,
}

impl<'a, T, A: Allocator> IterMut<'a, T, A> {
    pub(crate) fn new(buckets: &'a mut [Bucket<T, A>], len: usize) -> Self {
        Self {
            buckets: buckets.iter_mut(),
            front: (&mut []).iter_mut(),
            back: (&mut []).iter_mut(),
            remaining: len,
        }
    }
}

impl<'a, T, A: Allocator> Iterator for IterMut<'a, T, A> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.front.next() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.buckets.next() {
                Some(bucket) => self.front = bucket.iter_mut(),
                None => break,
            }
        }
        let item = self.back.next()?;
        self.remaining -= 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IterMut<'_, T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.back.next_back() {
                self.remaining -= 1;
                return Some(item);
            }
            match self.buckets.next_back() {
                Some(bucket) => self.back = bucket.iter_mut(),
                None => break,
            }
        }
        let item = self.front.next_back()?;
        self.remaining -= 1;
        Some(item)
    }
}

impl<T, A: Allocator> ExactSizeIterator for IterMut<'_, T, A> {}

impl<T, A: Allocator> FusedIterator for IterMut<'_, T, A> {}
