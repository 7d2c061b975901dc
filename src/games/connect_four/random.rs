//! Column selection for the computer opponent.

use super::types::Board;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Source of computer moves.
///
/// Implementations receive the legal columns (never empty, ascending) and
/// return one of them.
pub trait ColumnPicker: Send + std::fmt::Debug {
    /// Picks one column from `valid`.
    fn pick_column(&mut self, valid: &[usize]) -> usize;
}

/// Picks uniformly at random among the legal columns.
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Creates a picker seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible picker.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnPicker for RandomPicker {
    fn pick_column(&mut self, valid: &[usize]) -> usize {
        let idx = self.rng.random_range(0..valid.len());
        valid[idx]
    }
}

/// Replays a fixed sequence of columns.
///
/// A scripted column that is no longer legal, or an exhausted script, falls
/// back to the lowest legal column.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    script: VecDeque<usize>,
}

impl ScriptedPicker {
    /// Creates a picker that plays `columns` in order.
    pub fn new(columns: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: columns.into_iter().collect(),
        }
    }
}

impl ColumnPicker for ScriptedPicker {
    fn pick_column(&mut self, valid: &[usize]) -> usize {
        match self.script.pop_front() {
            Some(col) if valid.contains(&col) => col,
            other => {
                debug!(scripted = ?other, fallback = valid[0], "Scripted column unavailable");
                valid[0]
            }
        }
    }
}

impl Board {
    /// Chooses the computer's column, `None` when the board is full.
    #[instrument(skip(self, picker))]
    pub fn pick_random_move(&self, picker: &mut dyn ColumnPicker) -> Option<usize> {
        let valid = self.list_valid_moves();
        if valid.is_empty() {
            return None;
        }
        Some(picker.pick_column(&valid))
    }
}
