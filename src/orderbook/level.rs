//! Price levels and the price-sorted structure of one book side.

use super::arena::{Entry, EntryArena, EntryHandle};
use super::snapshot::Bbo;
use crate::order::Side;
use crate::utils::precision::{is_equal, is_greater, is_less};

/// All resting orders sharing one price, in FIFO arrival order.
///
/// The queue is an intrusive doubly-linked list threaded through the book's
/// [`EntryArena`], so removal by handle is O(1) and never disturbs the handles
/// of neighbouring entries.
#[derive(Debug)]
pub(crate) struct PriceLevel {
    pub price: f64,
    /// Aggregate remaining quantity across all entries, kept equal to the sum of
    /// the queue within one epsilon.
    pub total_volume: f64,
    head: Option<EntryHandle>,
    tail: Option<EntryHandle>,
    len: usize,
}

impl PriceLevel {
    pub(crate) fn new(price: f64) -> Self {
        Self {
            price,
            total_volume: 0.0,
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the oldest entry, the next to be matched.
    pub(crate) fn front(&self) -> Option<EntryHandle> {
        self.head
    }

    /// Appends `entry` at the back of the FIFO queue and folds its remaining
    /// quantity into `total_volume`.
    pub(crate) fn push_back(&mut self, arena: &mut EntryArena, mut entry: Entry) -> EntryHandle {
        entry.prev = self.tail;
        entry.next = None;
        self.total_volume += entry.remaining_quantity;
        let handle = arena.insert(entry);
        match self.tail {
            Some(tail) => {
                arena
                    .get_mut(tail)
                    .expect("level tail points at a vacant slot")
                    .next = Some(handle);
            }
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;
        handle
    }

    /// Removes the entry behind `handle` from the queue and the arena.
    ///
    /// The caller adjusts `total_volume`; fills and cancels account for volume
    /// differently (a fill has already consumed part of the entry).
    pub(crate) fn unlink(&mut self, arena: &mut EntryArena, handle: EntryHandle) -> Option<Entry> {
        let entry = arena.remove(handle)?;
        match entry.prev {
            Some(prev) => {
                arena
                    .get_mut(prev)
                    .expect("entry prev points at a vacant slot")
                    .next = entry.next;
            }
            None => self.head = entry.next,
        }
        match entry.next {
            Some(next) => {
                arena
                    .get_mut(next)
                    .expect("entry next points at a vacant slot")
                    .prev = entry.prev;
            }
            None => self.tail = entry.prev,
        }
        self.len -= 1;
        Some(entry)
    }

    /// Iterates the queue front to back.
    pub(crate) fn iter<'a>(&self, arena: &'a EntryArena) -> impl Iterator<Item = &'a Entry> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let handle = cursor?;
            let entry = arena.get(handle)?;
            cursor = entry.next;
            Some(entry)
        })
    }
}

/// One side of a book: price levels kept sorted best-first (bids descending,
/// asks ascending) in a dense vector with binary-search insertion.
///
/// Best-level access is O(1), lookup is O(log L), insertion and erasure shift at
/// most L levels — a good trade while L stays within the configured level cap.
#[derive(Debug)]
pub(crate) struct BookSide {
    side: Side,
    levels: Vec<PriceLevel>,
}

impl BookSide {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            levels: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub(crate) fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    /// The best level: highest bid or lowest ask.
    pub(crate) fn best(&self) -> Option<&PriceLevel> {
        self.levels.first()
    }

    pub(crate) fn best_mut(&mut self) -> Option<&mut PriceLevel> {
        self.levels.first_mut()
    }

    /// Removes the best level. Called the instant it runs out of entries.
    pub(crate) fn pop_best(&mut self) -> Option<PriceLevel> {
        if self.levels.is_empty() {
            None
        } else {
            Some(self.levels.remove(0))
        }
    }

    /// True if `candidate` ranks strictly ahead of `incumbent` on this side.
    fn outranks(&self, candidate: f64, incumbent: f64) -> bool {
        match self.side {
            Side::Buy => is_greater(candidate, incumbent),
            Side::Sell => is_less(candidate, incumbent),
        }
    }

    /// Index of the level at `price` (epsilon-safe equality), if it exists.
    pub(crate) fn find(&self, price: f64) -> Option<usize> {
        let idx = self
            .levels
            .partition_point(|level| self.outranks(level.price, price));
        (idx < self.levels.len() && is_equal(self.levels[idx].price, price)).then_some(idx)
    }

    /// Index of the level at `price`, creating it in sorted position if absent.
    pub(crate) fn find_or_create(&mut self, price: f64) -> usize {
        let idx = self
            .levels
            .partition_point(|level| self.outranks(level.price, price));
        if idx >= self.levels.len() || !is_equal(self.levels[idx].price, price) {
            self.levels.insert(idx, PriceLevel::new(price));
        }
        idx
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut PriceLevel {
        &mut self.levels[idx]
    }

    /// Erases the level at `idx` if it has no entries left.
    pub(crate) fn prune_if_empty(&mut self, idx: usize) {
        if self.levels[idx].is_empty() {
            self.levels.remove(idx);
        }
    }

    /// Current top of this side, or the empty sentinel.
    pub(crate) fn top_of_book(&self) -> Bbo {
        self.levels
            .first()
            .map(|level| Bbo::new(level.price, level.total_volume))
            .unwrap_or(Bbo::EMPTY)
    }

    pub(crate) fn clear(&mut self) {
        self.levels.clear();
    }
}
