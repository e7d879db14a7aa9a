//! Approximate depth ordering with fixed depth buckets.

use super::pool::CMDT_POOL_CAPACITY;
use super::RenderError;
use crate::config::SORT_DEPTH;

/// Depth-sort collaborator.
///
/// Records are bucketed by scaled depth. Within a bucket, iteration follows
/// insertion order.
pub trait DepthSort {
    /// Empty every bucket.
    fn reset(&mut self);

    /// Append pool slot `link` to the bucket for `depth`.
    fn insert(&mut self, link: u16, depth: i32) -> Result<(), RenderError>;

    /// Visit every inserted slot, buckets in ascending depth order.
    fn iterate_ascending(&self, visitor: &mut dyn FnMut(u16));
}

const NIL: u16 = u16::MAX;

#[derive(Clone, Copy, Debug)]
struct Bucket {
    head: u16,
    tail: u16,
}

impl Bucket {
    const EMPTY: Self = Self { head: NIL, tail: NIL };
}

#[derive(Clone, Copy, Debug)]
struct SortEntry {
    link: u16,
    next: u16,
}

/// Bucket sort over `BUCKETS` depth slots, each an intrusive singly linked
/// list threaded through a preallocated entry array.
///
/// Depths outside `0..BUCKETS` land in the first or last bucket.
#[derive(Clone, Debug)]
pub struct BucketSort<const BUCKETS: usize = SORT_DEPTH, const CAPACITY: usize = CMDT_POOL_CAPACITY> {
    buckets: [Bucket; BUCKETS],
    entries: heapless::Vec<SortEntry, CAPACITY>,
}

impl<const BUCKETS: usize, const CAPACITY: usize> Default for BucketSort<BUCKETS, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BUCKETS: usize, const CAPACITY: usize> BucketSort<BUCKETS, CAPACITY> {
    pub const fn new() -> Self {
        Self {
            buckets: [Bucket::EMPTY; BUCKETS],
            entries: heapless::Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bucket_index(depth: i32) -> usize {
        depth.clamp(0, BUCKETS as i32 - 1) as usize
    }
}

impl<const BUCKETS: usize, const CAPACITY: usize> DepthSort for BucketSort<BUCKETS, CAPACITY> {
    fn reset(&mut self) {
        self.buckets.fill(Bucket::EMPTY);
        self.entries.clear();
    }

    fn insert(&mut self, link: u16, depth: i32) -> Result<(), RenderError> {
        let entry = self.entries.len() as u16;
        self.entries
            .push(SortEntry { link, next: NIL })
            .map_err(|_| RenderError::SortExhausted { capacity: CAPACITY })?;

        let bucket = &mut self.buckets[Self::bucket_index(depth)];
        if bucket.tail == NIL {
            bucket.head = entry;
        } else {
            self.entries[bucket.tail as usize].next = entry;
        }
        bucket.tail = entry;

        Ok(())
    }

    fn iterate_ascending(&self, visitor: &mut dyn FnMut(u16)) {
        for bucket in &self.buckets {
            let mut cursor = bucket.head;
            while cursor != NIL {
                let entry = &self.entries[cursor as usize];
                visitor(entry.link);
                cursor = entry.next;
            }
        }
    }
}
