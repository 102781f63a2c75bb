//! Fragmentation tracking and compaction.

use allocator_api2::alloc::Allocator;
use tracing::debug;

use crate::error::{Error, Result};
use crate::FragmentedVec;

impl<T, A: Allocator + Clone> FragmentedVec<T, A> {
    /// Returns the fraction of buckets that are sparse, in `[0, 1]`.
    ///
    /// A bucket is sparse when it holds fewer than `len / sparse_divisor`
    /// elements. An empty container reports `0.0`.
    pub fn fragmentation(&self) -> f64 {
        let count = self.bucket_count();
        if count == 0 {
            return 0.0;
        }
        let floor = self.len() / self.config.sparse_divisor;
        let sparse = self.bucket_lens().filter(|&len| len < floor).count();
        sparse as f64 / count as f64
    }

    /// Cleanup run after every removal: drops emptied buckets, then compacts
    /// if fragmentation passed the threshold.
    pub(crate) fn after_removal(&mut self) {
        self.buf.remove_empty();
        self.auto_defragment();
    }

    fn auto_defragment(&mut self) {
        let fragmentation = self.fragmentation();
        if fragmentation > self.config.auto_defragment_threshold {
            debug!(
                fragmentation,
                buckets = self.bucket_count(),
                len = self.len(),
                "fragmentation over threshold"
            );
            self.trim_excess();
        }
    }

    /// Rebuilds into a single bucket sized to `len()` when enough capacity is unused.
    ///
    /// Nothing happens unless `len() < capacity() * compaction_ratio`. Calling
    /// it twice in a row changes nothing the second time.
    ///
    /// # Example
    ///
    /// ```
    /// use fragmented_vec::FragmentedVec;
    /// let mut vec: FragmentedVec<i32> = FragmentedVec::with_capacity(100);
    /// vec.append_range(0..10);
    /// vec.trim_excess();
    /// assert_eq!(vec.capacity(), 10);
    /// assert_eq!(vec.bucket_count(), 1);
    /// ```
    pub fn trim_excess(&mut self) {
        let len = self.len();
        let capacity = self.capacity();
        if (len as f64) < capacity as f64 * self.config.compaction_ratio {
            let buckets = self.bucket_count();
            self.buf.collapse(len);
            debug!(
                buckets_before = buckets,
                capacity_before = capacity,
                len,
                "compacted into one bucket"
            );
        }
    }

    /// Rebuilds into a single bucket holding exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityBelowLength`] if `capacity < len()`.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        let len = self.len();
        if capacity < len {
            return Err(Error::CapacityBelowLength { capacity, len });
        }
        let buckets = self.bucket_count();
        self.buf.collapse(capacity);
        debug!(buckets_before = buckets, capacity, len, "rebuilt with new capacity");
        Ok(())
    }

    /// Reserves room for at least `additional` more elements at the back.
    ///
    /// Only the trailing bucket grows; interior buckets are left alone.
    pub fn reserve(&mut self, additional: usize) {
        if additional == 0 {
            return;
        }
        self.buf.last_or_insert().reserve(additional);
    }
}
