//! Bulk operations over windows: copying, reversing, sorting.

use std::cmp::Ordering;

use allocator_api2::alloc::Allocator;
use tracing::trace;

use crate::buckets::Bucket;
use crate::error::{Error, Result};
use crate::position::Cursor;
use crate::FragmentedVec;

impl<T, A: Allocator + Clone> FragmentedVec<T, A> {
    /// Clones the elements of `index..index + count` into a `Vec`.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the window does not fit.
    pub fn get_range(&self, index: usize, count: usize) -> Result<Vec<T>>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(count);
        if let Some(window) = self.buf.resolve_window(index, count)? {
            let buckets = self.buf.buckets();
            for (b, span) in window.spans(buckets) {
                out.extend_from_slice(&buckets[b][span]);
            }
        }
        Ok(out)
    }

    /// Clones the elements of `index..index + count` into a new container.
    ///
    /// The result gets one bucket per source bucket the window touches, so
    /// the fragment shape carries over. It shares this container's settings.
    pub fn get_fragment_range(&self, index: usize, count: usize) -> Result<Self>
    where
        T: Clone,
    {
        let window = self.buf.resolve_window(index, count)?;
        let mut out = Self::new_in(self.allocator().clone());
        out.config = self.config;
        if let Some(window) = window {
            let buckets = self.buf.buckets();
            for (b, span) in window.spans(buckets) {
                let mut fragment = out.buf.new_bucket(span.len());
                fragment.extend_from_slice(&buckets[b][span]);
                out.buf.push_bucket(fragment);
            }
            out.buf.grow_len(window.len);
        }
        Ok(out)
    }

    /// Clones every element into `dst` starting at `dst_index`.
    ///
    /// # Errors
    ///
    /// [`Error::DestinationTooSmall`] if `dst` has fewer than
    /// `dst_index + len()` slots.
    pub fn copy_to(&self, dst: &mut [T], dst_index: usize) -> Result<()>
    where
        T: Clone,
    {
        self.copy_range_to(0, self.len(), dst, dst_index)
    }

    /// Clones the elements of `index..index + count` into `dst` starting at
    /// `dst_index`.
    pub fn copy_range_to(
        &self,
        index: usize,
        count: usize,
        dst: &mut [T],
        dst_index: usize,
    ) -> Result<()>
    where
        T: Clone,
    {
        let window = self.buf.resolve_window(index, count)?;
        let required = dst_index.saturating_add(count);
        if required > dst.len() {
            return Err(Error::DestinationTooSmall {
                required,
                available: dst.len(),
            });
        }
        let Some(window) = window else {
            return Ok(());
        };
        let buckets = self.buf.buckets();
        let mut at = dst_index;
        for (b, span) in window.spans(buckets) {
            let src = &buckets[b][span];
            dst[at..at + src.len()].clone_from_slice(src);
            at += src.len();
        }
        Ok(())
    }

    /// Reverses the order of all elements.
    ///
    /// Reverses the bucket order and then each bucket, so the layout is mirrored.
    pub fn reverse(&mut self) {
        let buckets = self.buf.buckets_mut();
        buckets.reverse();
        for bucket in buckets {
            bucket.reverse();
        }
    }

    /// Reverses the order of the elements in `index..index + count`.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the window does not fit.
    pub fn reverse_range(&mut self, index: usize, count: usize) -> Result<()> {
        let Some(window) = self.buf.resolve_window(index, count)? else {
            return Ok(());
        };
        if window.start.bucket == window.end.bucket {
            let b = window.start.bucket;
            let span = window.span(b, self.buf.bucket(b).len());
            self.buf.bucket_mut(b)[span].reverse();
            return Ok(());
        }
        let mut front = window.start;
        let mut back = window.end;
        for _ in 0..window.len / 2 {
            self.swap_cursors(front, back);
            match (self.buf.step_forward(front), self.buf.step_back(back)) {
                (Some(f), Some(b)) => {
                    front = f;
                    back = b;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Swaps the elements at two resolved coordinates.
    pub(crate) fn swap_cursors(&mut self, a: Cursor, b: Cursor) {
        if a.bucket == b.bucket {
            self.buf.bucket_mut(a.bucket).swap(a.offset, b.offset);
            return;
        }
        let (lo, hi) = if a.bucket < b.bucket { (a, b) } else { (b, a) };
        let (left, right) = self.buf.buckets_mut().split_at_mut(hi.bucket);
        std::mem::swap(&mut left[lo.bucket][lo.offset], &mut right[0][hi.offset]);
    }

    /// Collapses into one bucket so the whole content is a single slice.
    fn contiguous(&mut self) -> Option<&mut Bucket<T, A>> {
        if self.bucket_count() > 1 {
            trace!(
                buckets = self.bucket_count(),
                len = self.len(),
                "collapsing for whole sort"
            );
        }
        self.buf.make_contiguous()
    }

    /// Sorts all elements, stable.
    ///
    /// The container ends up as a single bucket.
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let mut vec: FragmentedVec<i32> = FragmentedVec::new();
    /// vec.append_range([3, 1]);
    /// vec.append_range([2]);
    /// vec.sort();
    /// assert_eq!(vec.to_vec(), [1, 2, 3]);
    /// assert_eq!(vec.bucket_count(), 1);
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(|a, b| a.cmp(b));
    }

    /// Sorts all elements with a comparator, stable.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if let Some(bucket) = self.contiguous() {
            bucket.sort_by(compare);
        }
    }

    /// Sorts all elements by an extracted key, stable.
    pub fn sort_by_key<K, F>(&mut self, f: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        if let Some(bucket) = self.contiguous() {
            bucket.sort_by_key(f);
        }
    }

    /// Sorts all elements, not preserving the order of equal elements.
    pub fn sort_unstable(&mut self)
    where
        T: Ord,
    {
        if let Some(bucket) = self.contiguous() {
            bucket.sort_unstable();
        }
    }

    /// Sorts all elements with a comparator, not preserving the order of
    /// equal elements.
    pub fn sort_unstable_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if let Some(bucket) = self.contiguous() {
            bucket.sort_unstable_by(compare);
        }
    }

    /// Sorts all elements by an extracted key, not preserving the order of
    /// equal elements.
    pub fn sort_unstable_by_key<K, F>(&mut self, f: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        if let Some(bucket) = self.contiguous() {
            bucket.sort_unstable_by_key(f);
        }
    }

    /// Sorts the elements of `index..index + count`, stable.
    ///
    /// Buckets outside the window keep their shape.
    pub fn sort_range(&mut self, index: usize, count: usize) -> Result<()>
    where
        T: Ord,
    {
        self.sort_range_by(index, count, |a, b| a.cmp(b))
    }

    /// Sorts the elements of `index..index + count` with a comparator, stable.
    ///
    /// A window spanning several buckets is moved out, sorted on its own and
    /// inserted back at the same position.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if the window does not fit.
    pub fn sort_range_by<F>(&mut self, index: usize, count: usize, compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let Some(window) = self.buf.resolve_window(index, count)? else {
            return Ok(());
        };
        if window.start.bucket == window.end.bucket {
            let b = window.start.bucket;
            let span = window.span(b, self.buf.bucket(b).len());
            self.buf.bucket_mut(b)[span].sort_by(compare);
            return Ok(());
        }
        let mut taken = self.take_window(&window);
        taken.sort_by(compare);
        self.buf.remove_empty();
        self.splice_bucket(window.index(), taken)
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{assert_invariants, layout};
    use crate::{Error, FragmentedVec};

    #[test]
    fn test_get_range() {
        let vec = layout(&[&[1, 2, 3], &[4], &[5, 6]]);
        assert_eq!(vec.get_range(1, 4).unwrap(), vec![2, 3, 4, 5]);
        assert_eq!(vec.get_range(6, 0).unwrap(), Vec::<i32>::new());
        assert!(vec.get_range(5, 2).is_err());
    }

    #[test]
    fn test_get_fragment_range_keeps_shape() {
        let vec = layout(&[&[1, 2, 3], &[4], &[5, 6]]);
        let part = vec.get_fragment_range(1, 4).unwrap();
        assert_eq!(part.to_vec(), vec![2, 3, 4, 5]);
        assert_eq!(part.bucket_lens().collect::<Vec<_>>(), vec![2, 1, 1]);
        assert_invariants(&part);

        let empty = vec.get_fragment_range(0, 0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.bucket_count(), 0);
    }

    #[test]
    fn test_copy_to() {
        let vec = layout(&[&[1, 2], &[3]]);
        let mut dst = [0; 5];
        vec.copy_to(&mut dst, 1).unwrap();
        assert_eq!(dst, [0, 1, 2, 3, 0]);

        let mut dst = [0; 2];
        vec.copy_range_to(1, 2, &mut dst, 0).unwrap();
        assert_eq!(dst, [2, 3]);

        let err = vec.copy_to(&mut dst, 0).unwrap_err();
        assert_eq!(
            err,
            Error::DestinationTooSmall {
                required: 3,
                available: 2
            }
        );
        assert_eq!(dst, [2, 3]);
    }

    #[test]
    fn test_reverse_mirrors_layout() {
        let mut vec = layout(&[&[1, 2, 3], &[4], &[5, 6]]);
        vec.reverse();
        assert_eq!(vec.to_vec(), vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(vec.bucket_lens().collect::<Vec<_>>(), vec![2, 1, 3]);
    }

    #[test]
    fn test_reverse_range_across_buckets() {
        let mut vec = layout(&[&[1, 2, 3], &[4], &[5, 6, 7]]);
        vec.reverse_range(1, 5).unwrap();
        assert_eq!(vec.to_vec(), vec![1, 6, 5, 4, 3, 2, 7]);
        assert_eq!(vec.bucket_lens().collect::<Vec<_>>(), vec![3, 1, 3]);

        let mut vec = layout(&[&[1, 2], &[3, 4]]);
        vec.reverse_range(0, 4).unwrap();
        assert_eq!(vec.to_vec(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_reverse_range_within_bucket() {
        let mut vec = layout(&[&[1, 2, 3, 4], &[5]]);
        vec.reverse_range(1, 3).unwrap();
        assert_eq!(vec.to_vec(), vec![1, 4, 3, 2, 5]);
        vec.reverse_range(2, 0).unwrap();
        assert!(vec.reverse_range(4, 2).is_err());
        assert_eq!(vec.to_vec(), vec![1, 4, 3, 2, 5]);
    }

    #[test]
    fn test_sort_collapses() {
        let mut vec = layout(&[&[5, 3], &[9, 1], &[4]]);
        vec.sort();
        assert_eq!(vec.to_vec(), vec![1, 3, 4, 5, 9]);
        assert_eq!(vec.bucket_count(), 1);

        vec.sort_by(|a, b| b.cmp(a));
        assert_eq!(vec.to_vec(), vec![9, 5, 4, 3, 1]);
        vec.sort_unstable_by_key(|&x| x % 3);
        assert_eq!(
            vec.iter().map(|x| x % 3).collect::<Vec<_>>(),
            vec![0, 0, 1, 1, 2]
        );

        let mut empty: FragmentedVec<i32> = FragmentedVec::new();
        empty.sort();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sort_range_keeps_outside_buckets() {
        let mut vec = layout(&[&[9, 8], &[7, 6, 5], &[4, 3], &[2, 1]]);
        vec.sort_range(1, 6).unwrap();
        assert_eq!(vec.to_vec(), vec![9, 3, 4, 5, 6, 7, 8, 2, 1]);
        assert_eq!(vec.bucket_lens().last(), Some(2));
        assert_eq!(vec.len(), 9);
        assert_invariants(&vec);
    }

    #[test]
    fn test_sort_range_within_bucket() {
        let mut vec = layout(&[&[4, 3, 2, 1], &[0]]);
        vec.sort_range(0, 3).unwrap();
        assert_eq!(vec.to_vec(), vec![2, 3, 4, 1, 0]);
        assert_eq!(vec.bucket_lens().collect::<Vec<_>>(), vec![4, 1]);
        assert!(vec.sort_range(3, 3).is_err());
    }

    #[test]
    fn test_sort_range_moves_non_clone_values() {
        struct Key(u32);
        let mut vec: FragmentedVec<Key> = FragmentedVec::new();
        vec.append_range([Key(3), Key(1)]);
        vec.append_range([Key(2)]);
        vec.sort_range_by(0, 3, |a, b| a.0.cmp(&b.0)).unwrap();
        assert_eq!(vec.iter().map(|k| k.0).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
