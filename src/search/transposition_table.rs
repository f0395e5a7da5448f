//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Direct-mapped on the top bits of the key, one entry per slot. Replacement
//! prefers deeper results and evicts entries whose search horizon the game has
//! already moved past.

use crate::game_state::game_types::Move;

/// log2 of the slot count.
pub const TT_INDEX_BITS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Fail-high: the true score is at least `score`.
    Lower,
    /// Fail-low: the true score is at most `score`.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub bound: Bound,
    pub depth: u8,
    pub score: i32,
    pub best_move: Option<Move>,
    /// Game turn at which the entry was produced.
    pub turn: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    stats: TTStats,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_index_bits(TT_INDEX_BITS)
    }

    /// Table with `2^bits` slots.
    pub fn with_index_bits(bits: u32) -> Self {
        assert!((1..=32).contains(&bits), "unsupported table size 2^{bits}");
        Self {
            entries: vec![None; 1usize << bits],
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        let bits = self.entries.len().trailing_zeros();
        (key >> (64 - bits)) as usize
    }

    /// Stored entry for exactly this key, if any.
    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, entry: TTEntry) {
        let idx = self.idx(entry.key);
        let replace = match self.entries[idx] {
            None => true,
            Some(existing) => {
                entry.depth >= existing.depth
                    || u32::from(entry.turn) > u32::from(existing.turn) + u32::from(existing.depth)
            }
        };

        if replace {
            self.stats.stores += 1;
            self.entries[idx] = Some(entry);
        } else {
            self.stats.rejected += 1;
        }
    }
}
