//! Insertion and removal.
//!
//! Growing a full bucket would reallocate and copy all of it, so a full bucket
//! is split instead and only the smaller side is moved.

use allocator_api2::alloc::Allocator;
use tracing::trace;

use crate::buckets::Bucket;
use crate::error::{Error, Result};
use crate::position::{Cursor, Window};
use crate::FragmentedVec;

impl<T, A: Allocator + Clone> FragmentedVec<T, A> {
    /// Appends an element to the back.
    ///
    /// Goes into the trailing bucket, which grows like a `Vec` when full.
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let mut vec: FragmentedVec<i32> = FragmentedVec::new();
    /// vec.push(1);
    /// vec.push(2);
    /// assert_eq!(vec.len(), 2);
    /// assert_eq!(vec.bucket_count(), 1);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        self.buf.last_or_insert().push(value);
        self.buf.grow_len(1);
    }

    /// Removes the last element and returns it, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        let bucket = self.buf.buckets().iter().rposition(|b| !b.is_empty())?;
        let value = self.buf.bucket_mut(bucket).pop()?;
        self.buf.shrink_len(1);
        self.after_removal();
        Some(value)
    }

    /// Inserts `value` at `index`, shifting later elements back.
    ///
    /// Inserting at `len()` is the same as [`push`](Self::push). When the
    /// owning bucket is full it is split rather than grown.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index > len()`.
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let mut vec: FragmentedVec<i32> = (1..=5).collect();
    /// vec.insert(2, 99).unwrap();
    /// assert_eq!(vec.to_vec(), [1, 2, 99, 3, 4, 5]);
    /// assert!(vec.insert(7, 0).is_err());
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(Error::index(index, len));
        }
        if index == len {
            self.push(value);
            return Ok(());
        }

        let Cursor { bucket, offset } = self.buf.resolve_point(index)?.cursor;
        let target = self.buf.bucket_mut(bucket);
        if target.len() < target.capacity() {
            target.insert(offset, value);
        } else if offset == 0 && bucket > 0 {
            // Front of a full bucket: the tail of the previous one is the same position.
            self.buf.bucket_mut(bucket - 1).push(value);
        } else if offset == 0 {
            target.insert(0, value);
        } else {
            self.split_insert(bucket, offset, value);
        }
        self.buf.grow_len(1);
        Ok(())
    }

    /// Splits the full bucket at `offset` and places `value` at the cut.
    ///
    /// The smaller side moves into a new bucket together with `value`.
    fn split_insert(&mut self, bucket: usize, offset: usize, value: T) {
        let len = self.buf.bucket(bucket).len();
        if offset < len - offset {
            let mut head = self.buf.new_bucket(offset + 1);
            head.extend(self.buf.bucket_mut(bucket).drain(..offset));
            head.push(value);
            self.buf.insert_bucket(bucket, head);
            trace!(bucket, offset, side = "head", "split full bucket");
        } else {
            let mut tail = self.buf.new_bucket(len - offset + 1);
            tail.push(value);
            tail.extend(self.buf.bucket_mut(bucket).drain(offset..));
            self.buf.insert_bucket(bucket + 1, tail);
            trace!(bucket, offset, side = "tail", "split full bucket");
        }
    }

    /// Inserts every element of `iter` at `index`, in order.
    ///
    /// The batch is collected into one bucket first. If the owning bucket has
    /// room for the whole batch it is inserted in place; otherwise the batch
    /// bucket is linked in as-is, splitting the owning bucket if needed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index > len()`.
    pub fn insert_range<I>(&mut self, index: usize, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        if index > len {
            return Err(Error::index(index, len));
        }
        let batch = self.materialize(iter);
        self.splice_bucket(index, batch)
    }

    /// Appends every element of `iter`.
    ///
    /// Fills the trailing bucket if the batch fits in its spare capacity,
    /// otherwise links the batch as a new bucket.
    pub fn append_range<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let batch = self.materialize(iter);
        self.append_bucket(batch);
    }

    fn materialize<I>(&self, iter: I) -> Bucket<T, A>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let mut batch = self.buf.new_bucket(iter.size_hint().0);
        batch.extend(iter);
        batch
    }

    fn append_bucket(&mut self, batch: Bucket<T, A>) {
        let n = batch.len();
        if n == 0 {
            return;
        }
        match self.buf.buckets_mut().last_mut() {
            Some(last) if last.capacity() - last.len() >= n => last.extend(batch),
            // A lone reserved bucket too small for the batch.
            Some(last) if last.is_empty() => *last = batch,
            _ => self.buf.push_bucket(batch),
        }
        self.buf.grow_len(n);
    }

    /// Links `batch` in at `index`, which must be at most `len()`.
    pub(crate) fn splice_bucket(&mut self, index: usize, batch: Bucket<T, A>) -> Result<()> {
        let n = batch.len();
        if n == 0 {
            return Ok(());
        }
        if index == self.len() {
            self.append_bucket(batch);
            return Ok(());
        }

        let Cursor { bucket, offset } = self.buf.resolve_point(index)?.cursor;
        let target = self.buf.bucket_mut(bucket);
        let len = target.len();
        if target.capacity() - len >= n {
            target.extend(batch);
            target[offset..].rotate_right(n);
        } else if offset == 0 {
            self.buf.insert_bucket(bucket, batch);
        } else if offset < len - offset {
            let mut head = self.buf.new_bucket(offset);
            head.extend(self.buf.bucket_mut(bucket).drain(..offset));
            self.buf.insert_bucket(bucket, head);
            self.buf.insert_bucket(bucket + 1, batch);
            trace!(bucket, offset, side = "head", "split bucket for batch");
        } else {
            let mut tail = self.buf.new_bucket(len - offset);
            tail.extend(self.buf.bucket_mut(bucket).drain(offset..));
            self.buf.insert_bucket(bucket + 1, tail);
            self.buf.insert_bucket(bucket + 1, batch);
            trace!(bucket, offset, side = "tail", "split bucket for batch");
        }
        self.buf.grow_len(n);
        Ok(())
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let Cursor { bucket, offset } = self.buf.resolve_point(index)?.cursor;
        let value = self.buf.bucket_mut(bucket).remove(offset);
        self.buf.shrink_len(1);
        self.after_removal();
        Ok(value)
    }

    /// Removes the first element equal to `x`. Returns whether one was found.
    pub fn remove_item(&mut self, x: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(x) {
            Some(index) => self.remove(index).is_ok(),
            None => false,
        }
    }

    /// Removes the `count` elements starting at `index`.
    ///
    /// Buckets lying entirely inside the window are unlinked whole.
    ///
    /// # Errors
    ///
    /// [`Error::RangeOutOfRange`] if `index + count > len()`.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let Some(window) = self.buf.resolve_window(index, count)? else {
            return Ok(());
        };
        let Window { start, end, len, .. } = window;
        if start.bucket == end.bucket {
            self.buf
                .bucket_mut(start.bucket)
                .drain(start.offset..=end.offset);
        } else {
            self.buf.bucket_mut(start.bucket).truncate(start.offset);
            self.buf.bucket_mut(end.bucket).drain(..=end.offset);
            self.buf.remove_buckets(start.bucket + 1..end.bucket);
        }
        self.buf.shrink_len(len);
        self.after_removal();
        Ok(())
    }

    /// Moves the elements of `window` out into a new bucket.
    ///
    /// Leaves emptied buckets in place; the caller runs the cleanup.
    pub(crate) fn take_window(&mut self, window: &Window) -> Bucket<T, A> {
        let mut taken = self.buf.new_bucket(window.len);
        for b in window.start.bucket..=window.end.bucket {
            let bucket = self.buf.bucket_mut(b);
            let span = window.span(b, bucket.len());
            taken.extend(bucket.drain(span));
        }
        self.buf.shrink_len(window.len);
        taken
    }

    /// Removes every element matching `pred`, returning how many were removed.
    pub fn remove_all<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        for bucket in self.buf.buckets_mut() {
            let before = bucket.len();
            bucket.retain(|x| !pred(x));
            removed += before - bucket.len();
        }
        self.buf.shrink_len(removed);
        self.after_removal();
        removed
    }

    /// Keeps only the elements matching `keep`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.remove_all(|x| !keep(x));
    }

    /// Removes every element and bucket.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let Cursor { bucket, offset } = self.buf.resolve_point(index)?.cursor;
        Ok(std::mem::replace(
            &mut self.buf.bucket_mut(bucket)[offset],
            value,
        ))
    }
}
