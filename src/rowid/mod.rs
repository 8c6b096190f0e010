//! Stable row identity for mutable, position-sensitive backing stores.
//!
//! An append-only store (lines in a file, slots in a vector) determines
//! row identity by physical position. `RowIdManager` keeps the logical
//! row-id space aligned with that physical order across inserts and
//! deletes: deleted rows leave a tombstone that still occupies its
//! physical slot until the store is compacted.
//!
//! # Design Principles
//!
//! - Live intervals stay sorted and non-overlapping after every operation
//! - A live id is never reissued
//! - Failed operations apply no partial mutation
//! - No internal locking; the manager is owned by a single adapter
//!   instance (single-writer)

mod errors;

pub use errors::{RowIdError, RowIdResult};

/// One stretch of the physical record sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Half-open interval of live row ids.
    Live { start: i64, end: i64 },
    /// A single deleted slot, still physically present.
    Tombstone,
}

/// A physical-position marker produced by iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A live row with its id.
    Live(i64),
    /// A deleted slot to skip (or garbage-collect on compaction).
    Tombstone,
}

impl Slot {
    /// Returns the id of a live slot.
    pub fn id(&self) -> Option<i64> {
        match self {
            Slot::Live(id) => Some(*id),
            Slot::Tombstone => None,
        }
    }
}

/// Tracks live row-id intervals and tombstoned slots for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowIdManager {
    segments: Vec<Segment>,
}

impl RowIdManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates a manager for a store that already holds `count` rows,
    /// ids `0..count`.
    pub fn contiguous(count: i64) -> Self {
        let mut manager = Self::new();
        if count > 0 {
            manager.segments.push(Segment::Live {
                start: 0,
                end: count,
            });
        }
        manager
    }

    /// Returns true if the id is live.
    pub fn contains(&self, row_id: i64) -> bool {
        self.segments.iter().any(|segment| match segment {
            Segment::Live { start, end } => *start <= row_id && row_id < *end,
            Segment::Tombstone => false,
        })
    }

    /// The largest live id, if any rows are live.
    pub fn max_live_id(&self) -> Option<i64> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Live { end, .. } => Some(end - 1),
                Segment::Tombstone => None,
            })
            .max()
    }

    /// Number of live rows.
    pub fn live_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Live { start, end } => (end - start) as usize,
                Segment::Tombstone => 0,
            })
            .sum()
    }

    /// Inserts a new row id.
    ///
    /// Without an explicit id the next id past the largest live one is
    /// allocated and the trailing interval extended (new records are
    /// appended to the store). With an explicit id the row must not
    /// already be live; an adjacent interval is extended when contiguous,
    /// otherwise a singleton interval is inserted in sorted position.
    pub fn insert(&mut self, row_id: Option<i64>) -> RowIdResult<i64> {
        match row_id {
            None => {
                let id = self.max_live_id().map_or(0, |max| max + 1);
                match self.segments.last_mut() {
                    Some(Segment::Live { end, .. }) if *end == id => *end += 1,
                    _ => self.segments.push(Segment::Live {
                        start: id,
                        end: id + 1,
                    }),
                }
                Ok(id)
            }
            Some(id) => {
                if self.contains(id) {
                    return Err(RowIdError::AlreadyPresent(id));
                }
                self.insert_sorted(id);
                Ok(id)
            }
        }
    }

    fn insert_sorted(&mut self, id: i64) {
        // index of the first live segment starting past the new id, and
        // the index of the live segment just before it
        let mut insert_at = self.segments.len();
        let mut prev_live: Option<usize> = None;
        for (i, segment) in self.segments.iter().enumerate() {
            if let Segment::Live { start, .. } = segment {
                if *start > id {
                    insert_at = i;
                    break;
                }
                prev_live = Some(i);
            }
        }

        // extend the preceding interval when contiguous
        if let Some(prev) = prev_live {
            if let Segment::Live { end, .. } = &mut self.segments[prev] {
                if *end == id {
                    *end += 1;
                    self.merge_forward(prev);
                    return;
                }
            }
        }

        // extend the following interval when contiguous
        if insert_at < self.segments.len() {
            if let Segment::Live { start, .. } = &mut self.segments[insert_at] {
                if *start == id + 1 {
                    *start = id;
                    return;
                }
            }
        }

        self.segments.insert(
            insert_at,
            Segment::Live {
                start: id,
                end: id + 1,
            },
        );
    }

    /// Merges the segment at `index` with its immediate successor when
    /// both are live and contiguous.
    fn merge_forward(&mut self, index: usize) {
        if index + 1 >= self.segments.len() {
            return;
        }
        if let (Segment::Live { end, .. }, Segment::Live { start, end: next_end }) =
            (&self.segments[index], &self.segments[index + 1])
        {
            if *end == *start {
                let next_end = *next_end;
                if let Segment::Live { end, .. } = &mut self.segments[index] {
                    *end = next_end;
                }
                self.segments.remove(index + 1);
            }
        }
    }

    /// Marks a row id as deleted, leaving a tombstone at its physical
    /// position.
    pub fn delete(&mut self, row_id: i64) -> RowIdResult<()> {
        for (i, segment) in self.segments.iter().enumerate() {
            let (start, end) = match segment {
                Segment::Live { start, end } => (*start, *end),
                Segment::Tombstone => continue,
            };
            if row_id < start || row_id >= end {
                continue;
            }

            if start == end - 1 {
                self.segments[i] = Segment::Tombstone;
            } else if row_id == start {
                self.segments[i] = Segment::Live {
                    start: start + 1,
                    end,
                };
                self.segments.insert(i, Segment::Tombstone);
            } else if row_id == end - 1 {
                self.segments[i] = Segment::Live {
                    start,
                    end: end - 1,
                };
                self.segments.insert(i + 1, Segment::Tombstone);
            } else {
                self.segments[i] = Segment::Live { start, end: row_id };
                self.segments.insert(i + 1, Segment::Tombstone);
                self.segments.insert(
                    i + 2,
                    Segment::Live {
                        start: row_id + 1,
                        end,
                    },
                );
            }
            return Ok(());
        }

        Err(RowIdError::NotFound(row_id))
    }

    /// Walks physical positions in order: live ids interleaved with
    /// tombstones for deleted slots. Restartable; used to iterate a
    /// backing store in lockstep and to skip dead records on compaction.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().flat_map(|segment| match segment {
            Segment::Live { start, end } => SlotIter::Live(*start..*end),
            Segment::Tombstone => SlotIter::Tombstone(std::iter::once(Slot::Tombstone)),
        })
    }
}

enum SlotIter {
    Live(std::ops::Range<i64>),
    Tombstone(std::iter::Once<Slot>),
}

impl Iterator for SlotIter {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        match self {
            SlotIter::Live(range) => range.next().map(Slot::Live),
            SlotIter::Tombstone(once) => once.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(manager: &RowIdManager) -> Vec<Option<i64>> {
        manager.slots().map(|slot| slot.id()).collect()
    }

    #[test]
    fn test_append_allocates_next_id() {
        let mut manager = RowIdManager::contiguous(3);
        assert_eq!(manager.insert(None).unwrap(), 3);
        assert_eq!(manager.insert(None).unwrap(), 4);
        assert_eq!(ids(&manager), vec![Some(0), Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_explicit_id_creates_gap() {
        let mut manager = RowIdManager::contiguous(3);
        assert_eq!(manager.insert(Some(10)).unwrap(), 10);
        assert_eq!(ids(&manager), vec![Some(0), Some(1), Some(2), Some(10)]);

        // the next automatic id comes after the gap
        assert_eq!(manager.insert(None).unwrap(), 11);
    }

    #[test]
    fn test_explicit_id_fills_gap_in_sorted_position() {
        let mut manager = RowIdManager::contiguous(3);
        manager.insert(Some(10)).unwrap();
        manager.insert(Some(5)).unwrap();
        assert_eq!(
            ids(&manager),
            vec![Some(0), Some(1), Some(2), Some(5), Some(10)]
        );
    }

    #[test]
    fn test_contiguous_ids_merge_intervals() {
        let mut manager = RowIdManager::contiguous(3);
        manager.insert(Some(5)).unwrap();
        manager.insert(Some(3)).unwrap();
        manager.insert(Some(4)).unwrap();
        assert_eq!(manager.max_live_id(), Some(5));
        assert_eq!(manager.live_count(), 6);
        assert_eq!(
            ids(&manager),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut manager = RowIdManager::contiguous(3);
        assert_eq!(manager.insert(Some(1)), Err(RowIdError::AlreadyPresent(1)));
        // no partial mutation
        assert_eq!(manager.live_count(), 3);
    }

    #[test]
    fn test_delete_middle_leaves_tombstone() {
        let mut manager = RowIdManager::contiguous(5);
        manager.delete(2).unwrap();
        assert_eq!(
            ids(&manager),
            vec![Some(0), Some(1), None, Some(3), Some(4)]
        );
        assert_eq!(manager.live_count(), 4);
        assert!(!manager.contains(2));
    }

    #[test]
    fn test_delete_edges() {
        let mut manager = RowIdManager::contiguous(3);
        manager.delete(0).unwrap();
        manager.delete(2).unwrap();
        assert_eq!(ids(&manager), vec![None, Some(1), None]);
    }

    #[test]
    fn test_delete_singleton() {
        let mut manager = RowIdManager::contiguous(6);
        manager.insert(Some(9)).unwrap();
        manager.delete(9).unwrap();
        // back to the contiguous run plus one tombstone for the dead slot
        assert_eq!(
            ids(&manager),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), None]
        );
        assert_eq!(manager.max_live_id(), Some(5));
    }

    #[test]
    fn test_delete_missing_id() {
        let mut manager = RowIdManager::contiguous(3);
        assert_eq!(manager.delete(7), Err(RowIdError::NotFound(7)));
        assert_eq!(manager.delete(1), Ok(()));
        assert_eq!(manager.delete(1), Err(RowIdError::NotFound(1)));
    }

    #[test]
    fn test_empty_manager_allocates_zero() {
        let mut manager = RowIdManager::new();
        assert_eq!(manager.insert(None).unwrap(), 0);
        assert_eq!(ids(&manager), vec![Some(0)]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut manager = RowIdManager::contiguous(3);
        manager.delete(1).unwrap();
        let first: Vec<_> = ids(&manager);
        let second: Vec<_> = ids(&manager);
        assert_eq!(first, second);
    }

    #[test]
    fn test_append_after_trailing_delete() {
        let mut manager = RowIdManager::contiguous(4);
        manager.delete(3).unwrap();
        // allocation is driven by the largest LIVE id (2 here), so a
        // tombstoned id can be handed out again for a fresh record
        assert_eq!(manager.insert(None).unwrap(), 3);
        assert_eq!(ids(&manager), vec![Some(0), Some(1), Some(2), None, Some(3)]);
    }
}
