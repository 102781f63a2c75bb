//! Translation of logical positions into bucket coordinates.
//!
//! Point and window lookups share a single walk, [`seek`], so both agree on
//! which bucket owns an index that falls exactly on a bucket edge.

use allocator_api2::alloc::Allocator;

use crate::buckets::{Bucket, BucketStore};
use crate::error::{Error, Result};

/// A bucket-local coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Cursor {
    pub(crate) bucket: usize,
    pub(crate) offset: usize,
}

/// A resolved logical index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Point {
    pub(crate) cursor: Cursor,
    /// Number of elements in all buckets before `cursor.bucket`
    pub(crate) prefix: usize,
}

/// A resolved, non-empty window `index..index + len`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Window {
    pub(crate) start: Cursor,
    /// Coordinate of the last element of the window (inclusive)
    pub(crate) end: Cursor,
    /// Number of elements in all buckets before `start.bucket`
    pub(crate) prefix: usize,
    pub(crate) len: usize,
}

impl Window {
    /// Logical index of the first element.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.prefix + self.start.offset
    }

    /// The part of bucket `bucket` covered by the window, as an offset range.
    ///
    /// `bucket_len` is the length of that bucket.
    #[inline]
    pub(crate) fn span(&self, bucket: usize, bucket_len: usize) -> std::ops::Range<usize> {
        let lo = if bucket == self.start.bucket {
            self.start.offset
        } else {
            0
        };
        let hi = if bucket == self.end.bucket {
            self.end.offset + 1
        } else {
            bucket_len
        };
        lo..hi
    }

    /// Iterates over `(bucket index, covered offsets)` from first to last bucket.
    pub(crate) fn spans<'a, T, A: Allocator>(
        &'a self,
        buckets: &'a [Bucket<T, A>],
    ) -> impl DoubleEndedIterator<Item = (usize, std::ops::Range<usize>)> + 'a {
        (self.start.bucket..=self.end.bucket).map(move |b| (b, self.span(b, buckets[b].len())))
    }
}

/// Walks bucket lengths looking for the bucket that holds `index`.
///
/// `lens` yields the lengths of consecutive buckets starting at `first_bucket`,
/// and `prefix` is the number of elements before `first_bucket`. The owning
/// bucket is the first one with `prefix <= index < prefix + len`, so empty
/// buckets are never selected. Returns `None` if `index` lies past the last
/// bucket walked.
pub(crate) fn seek<I>(lens: I, first_bucket: usize, prefix: usize, index: usize) -> Option<Point>
where
    I: IntoIterator<Item = usize>,
{
    let mut prefix = prefix;
    for (i, len) in lens.into_iter().enumerate() {
        if index < prefix + len {
            return Some(Point {
                cursor: Cursor {
                    bucket: first_bucket + i,
                    offset: index - prefix,
                },
                prefix,
            });
        }
        prefix += len;
    }
    None
}

impl<T, A: Allocator + Clone> BucketStore<T, A> {
    fn lens_from(&self, bucket: usize) -> impl Iterator<Item = usize> + '_ {
        self.buckets()[bucket..].iter().map(Bucket::len)
    }

    /// Resolves `index`, which must address an existing element.
    pub(crate) fn resolve_point(&self, index: usize) -> Result<Point> {
        let len = self.len();
        if index >= len {
            return Err(Error::index(index, len));
        }
        seek(self.lens_from(0), 0, 0, index).ok_or(Error::index(index, len))
    }

    /// Resolves the window `index..index + count`.
    ///
    /// Returns `Ok(None)` for an empty window whose bounds are valid.
    pub(crate) fn resolve_window(&self, index: usize, count: usize) -> Result<Option<Window>> {
        let len = self.len();
        let invalid = || Error::range(index, count, len);
        match index.checked_add(count) {
            Some(end) if end <= len => {}
            _ => return Err(invalid()),
        }
        if count == 0 {
            return Ok(None);
        }
        let start = seek(self.lens_from(0), 0, 0, index).ok_or_else(invalid)?;
        // The end is searched from the start bucket onwards, never before it.
        let end = seek(
            self.lens_from(start.cursor.bucket),
            start.cursor.bucket,
            start.prefix,
            index + count - 1,
        )
        .ok_or_else(invalid)?;
        Ok(Some(Window {
            start: start.cursor,
            end: end.cursor,
            prefix: start.prefix,
            len: count,
        }))
    }

    /// The coordinate following `cursor`, skipping empty buckets.
    ///
    /// Returns `None` when `cursor` is the last element.
    pub(crate) fn step_forward(&self, cursor: Cursor) -> Option<Cursor> {
        let buckets = self.buckets();
        if cursor.offset + 1 < buckets[cursor.bucket].len() {
            return Some(Cursor {
                bucket: cursor.bucket,
                offset: cursor.offset + 1,
            });
        }
        (cursor.bucket + 1..buckets.len())
            .find(|&b| !buckets[b].is_empty())
            .map(|bucket| Cursor { bucket, offset: 0 })
    }

    /// The coordinate preceding `cursor`, skipping empty buckets.
    ///
    /// Returns `None` when `cursor` is the first element.
    pub(crate) fn step_back(&self, cursor: Cursor) -> Option<Cursor> {
        if cursor.offset > 0 {
            return Some(Cursor {
                bucket: cursor.bucket,
                offset: cursor.offset - 1,
            });
        }
        let buckets = self.buckets();
        (0..cursor.bucket)
            .rev()
            .find(|&b| !buckets[b].is_empty())
            .map(|bucket| Cursor {
                bucket,
                offset: buckets[bucket].len() - 1,
            })
    }

    /// Number of elements before `bucket`, given that `window` starts at or before it.
    pub(crate) fn prefix_at(&self, window: &Window, bucket: usize) -> usize {
        debug_assert!(bucket >= window.start.bucket);
        window.prefix
            + self.buckets()[window.start.bucket..bucket]
                .iter()
                .map(Bucket::len)
                .sum::<usize>()
    }
}
