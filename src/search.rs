//! Linear and binary search across buckets.
//!
//! Every search runs a native slice search per bucket and converts the
//! bucket-local hit into an absolute index with the running prefix.

use std::cmp::Ordering;

use allocator_api2::alloc::Allocator;

use crate::error::Result;
use crate::position::Window;
use crate::FragmentedVec;

impl<T, A: Allocator + Clone> FragmentedVec<T, A> {
    /// Window covering the whole container, `None` when empty.
    fn whole(&self) -> Option<Window> {
        self.buf.resolve_window(0, self.len()).ok().flatten()
    }

    fn scan_forward<F>(&self, window: Option<Window>, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let window = window?;
        let buckets = self.buf.buckets();
        let mut prefix = window.prefix;
        for (b, span) in window.spans(buckets) {
            let start = span.start;
            if let Some(i) = buckets[b][span].iter().position(&mut pred) {
                return Some(prefix + start + i);
            }
            prefix += buckets[b].len();
        }
        None
    }

    fn scan_backward<F>(&self, window: Option<Window>, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let window = window?;
        let buckets = self.buf.buckets();
        let mut prefix = self.buf.prefix_at(&window, window.end.bucket);
        for (b, span) in window.spans(buckets).rev() {
            let start = span.start;
            if let Some(i) = buckets[b][span].iter().rposition(&mut pred) {
                return Some(prefix + start + i);
            }
            if b > window.start.bucket {
                prefix -= buckets[b - 1].len();
            }
        }
        None
    }

    /// Returns `true` if some element equals `x`.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.buf.buckets().iter().any(|b| b.contains(x))
    }

    /// Returns the index of the first element equal to `x`.
    pub fn index_of(&self, x: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.scan_forward(self.whole(), |y| y == x)
    }

    /// Returns the index of the first element equal to `x` within
    /// `index..index + count`.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`](crate::Error::RangeOutOfRange) if the window
    /// does not fit.
    pub fn index_of_in(&self, x: &T, index: usize, count: usize) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let window = self.buf.resolve_window(index, count)?;
        Ok(self.scan_forward(window, |y| y == x))
    }

    /// Returns the index of the last element equal to `x`.
    pub fn last_index_of(&self, x: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.scan_backward(self.whole(), |y| y == x)
    }

    /// Returns the index of the last element equal to `x` within
    /// `index..index + count`.
    pub fn last_index_of_in(&self, x: &T, index: usize, count: usize) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let window = self.buf.resolve_window(index, count)?;
        Ok(self.scan_backward(window, |y| y == x))
    }

    /// Returns the first element matching `pred`.
    pub fn find<F>(&self, mut pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|x| pred(x))
    }

    /// Returns the last element matching `pred`.
    pub fn find_last<F>(&self, mut pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().rev().find(|x| pred(x))
    }

    /// Returns the index of the first element matching `pred`.
    pub fn find_index<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.scan_forward(self.whole(), pred)
    }

    /// Returns the index of the first element matching `pred` within
    /// `index..index + count`.
    pub fn find_index_in<F>(&self, index: usize, count: usize, pred: F) -> Result<Option<usize>>
    where
        F: FnMut(&T) -> bool,
    {
        let window = self.buf.resolve_window(index, count)?;
        Ok(self.scan_forward(window, pred))
    }

    /// Returns the index of the last element matching `pred`.
    pub fn find_last_index<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.scan_backward(self.whole(), pred)
    }

    /// Returns the index of the last element matching `pred` within
    /// `index..index + count`.
    pub fn find_last_index_in<F>(
        &self,
        index: usize,
        count: usize,
        pred: F,
    ) -> Result<Option<usize>>
    where
        F: FnMut(&T) -> bool,
    {
        let window = self.buf.resolve_window(index, count)?;
        Ok(self.scan_backward(window, pred))
    }

    /// Clones every element matching `pred` into a `Vec`, in order.
    pub fn find_all<F>(&self, mut pred: F) -> Vec<T>
    where
        T: Clone,
        F: FnMut(&T) -> bool,
    {
        self.iter().filter(|x| pred(x)).cloned().collect()
    }

    /// Returns `true` if any element matches `pred`.
    pub fn exists<F>(&self, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.find_index(pred).is_some()
    }

    /// Returns `true` if every element matches `pred`. Vacuously true when empty.
    pub fn true_for_all<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.buf.buckets().iter().all(|b| b.iter().all(&mut pred))
    }

    /// Binary searches a sorted container for `x`.
    ///
    /// Returns `Ok(index)` of a matching element, or `Err(index)` where `x`
    /// could be inserted keeping the order, like [`slice::binary_search`].
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let mut vec: FragmentedVec<i32> = FragmentedVec::new();
    /// vec.append_range([1, 3, 5]);
    /// vec.append_range([7, 9]);
    /// assert_eq!(vec.binary_search(&7), Ok(3));
    /// assert_eq!(vec.binary_search(&4), Err(2));
    /// assert_eq!(vec.binary_search(&10), Err(5));
    /// ```
    pub fn binary_search(&self, x: &T) -> std::result::Result<usize, usize>
    where
        T: Ord,
    {
        self.binary_search_by(|probe| probe.cmp(x))
    }

    /// Binary searches a sorted container with a comparator.
    ///
    /// `f` returns the ordering of the probed element relative to the target.
    pub fn binary_search_by<F>(&self, f: F) -> std::result::Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.whole() {
            Some(window) => self.search_window(&window, f),
            None => Err(0),
        }
    }

    /// Binary searches a container sorted by the key `f` extracts.
    pub fn binary_search_by_key<B, F>(&self, b: &B, mut f: F) -> std::result::Result<usize, usize>
    where
        B: Ord,
        F: FnMut(&T) -> B,
    {
        self.binary_search_by(|probe| f(probe).cmp(b))
    }

    /// Binary searches the sorted window `index..index + count`.
    ///
    /// Indices in the inner result are absolute. An empty window yields
    /// `Err(index)`.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`](crate::Error::RangeOutOfRange) if the window
    /// does not fit.
    pub fn binary_search_in<F>(
        &self,
        index: usize,
        count: usize,
        f: F,
    ) -> Result<std::result::Result<usize, usize>>
    where
        F: FnMut(&T) -> Ordering,
    {
        Ok(match self.buf.resolve_window(index, count)? {
            Some(window) => self.search_window(&window, f),
            None => Err(index),
        })
    }

    /// Outer search over buckets by their first and last element, inner
    /// search within the bucket that brackets the target.
    fn search_window<F>(&self, window: &Window, mut f: F) -> std::result::Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        let buckets = self.buf.buckets();
        let mut lo = window.start.bucket;
        let mut hi = window.end.bucket + 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let span = window.span(mid, buckets[mid].len());
            let start = span.start;
            let slice = &buckets[mid][span];
            let (Some(first), Some(last)) = (slice.first(), slice.last()) else {
                unreachable!("empty bucket inside a resolved window");
            };
            if f(first) == Ordering::Greater {
                hi = mid;
            } else if f(last) == Ordering::Less {
                lo = mid + 1;
            } else {
                let base = self.buf.prefix_at(window, mid) + start;
                return slice
                    .binary_search_by(&mut f)
                    .map(|i| base + i)
                    .map_err(|i| base + i);
            }
        }
        // Every bucket before `lo` ends below the target, `lo` starts above it.
        if lo > window.end.bucket {
            Err(window.index() + window.len)
        } else {
            let start = window.span(lo, buckets[lo].len()).start;
            Err(self.buf.prefix_at(window, lo) + start)
        }
    }
}
