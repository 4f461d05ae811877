//! Batch planning
//!
//! Resolves the configured start offset and record limit against the rows
//! actually present, then partitions the selection into fixed-size windows.

use crate::error::{Error, Result};
use std::ops::Range;

/// The selected row range of a table and how it is split into batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    /// First selected row index
    start: usize,
    /// Number of rows selected, after resolving the `0 = all` sentinel
    selected: usize,
    /// Maximum rows per batch
    batch_size: usize,
}

impl BatchPlan {
    /// Plan batches over a grid of `total_rows` rows.
    ///
    /// `max_items == 0` selects every row from `start` onwards; any other
    /// value is clamped to the rows that exist.
    pub fn new(total_rows: usize, start: usize, max_items: usize, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::invalid_value(
                "batch_size",
                "must be greater than zero",
            ));
        }

        let available = total_rows.saturating_sub(start);
        let selected = if max_items == 0 {
            available
        } else {
            max_items.min(available)
        };

        Ok(Self {
            start,
            selected,
            batch_size,
        })
    }

    /// First selected row index
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last selected row index
    pub fn end(&self) -> usize {
        self.start + self.selected
    }

    /// Number of rows selected
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Maximum rows per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected == 0
    }

    /// Number of batches the selection splits into
    pub fn batch_count(&self) -> usize {
        self.selected.div_ceil(self.batch_size)
    }

    /// Row ranges of each batch, in order
    pub fn batches(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let end = self.end();
        (self.start..end)
            .step_by(self.batch_size)
            .map(move |lo| lo..lo.saturating_add(self.batch_size).min(end))
    }
}
