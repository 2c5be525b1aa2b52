//! Sequential cursors over the sample tables.
//!
//! Every table is consumed one sample at a time, in the same order
//! as samples are assigned to chunks, so none of these ever seek.

use crate::Mp4Error;

/// Run-length table entry, e.g. "`count` samples share `value`".
pub trait Run {
    type Value: Copy;

    /// Number of samples covered by this run.
    fn count(&self) -> u32;

    /// Value shared by all samples in this run.
    fn value(&self) -> Self::Value;
}

/// Steps through a run-length table one sample at a time.
#[derive(Debug, Clone)]
pub(crate) struct RunCursor<'a, R: Run> {
    /// Table name for error messages.
    table: &'static str,
    runs: &'a [R],
    index: usize,
    consumed: u32,
}

impl <'a, R: Run> RunCursor<'a, R> {
    pub(crate) fn new(table: &'static str, runs: &'a [R]) -> Self {
        Self {
            table,
            runs,
            index: 0,
            consumed: 0,
        }
    }

    /// Returns the value for the next sample,
    /// or `None` if all runs are used up.
    /// Runs with a sample count of 0 are skipped.
    pub(crate) fn next_value(&mut self) -> Option<R::Value> {
        loop {
            let run = self.runs.get(self.index)?;
            if self.consumed < run.count() {
                self.consumed += 1;
                return Some(run.value())
            }
            self.index += 1;
            self.consumed = 0;
        }
    }

    /// Returns the value for the next sample,
    /// treating an exhausted table as malformed.
    pub(crate) fn take(&mut self, sample_number: u32) -> Result<R::Value, Mp4Error> {
        self.next_value()
            .ok_or(Mp4Error::TableExhausted{table: self.table, sample_number})
    }
}

/// Cursor over an ascending list of 1-based sample numbers
/// (`stss`, `stps`).
#[derive(Debug, Clone)]
pub(crate) struct SampleNumberCursor<'a> {
    numbers: &'a [u32],
    index: usize,
}

impl <'a> SampleNumberCursor<'a> {
    pub(crate) fn new(numbers: &'a [u32]) -> Self {
        Self {numbers, index: 0}
    }

    /// Returns true and advances if the current entry
    /// is `sample_number`.
    pub(crate) fn matches(&mut self, sample_number: u32) -> bool {
        match self.numbers.get(self.index) {
            Some(n) if *n == sample_number => {
                self.index += 1;
                true
            },
            _ => false
        }
    }
}

/// Cursor over a table with exactly one entry per sample
/// (`stsz` entries, `sdtp`).
#[derive(Debug, Clone)]
pub(crate) struct EntryCursor<'a, T> {
    table: &'static str,
    entries: std::slice::Iter<'a, T>,
}

impl <'a, T> EntryCursor<'a, T> {
    pub(crate) fn new(table: &'static str, entries: &'a [T]) -> Self {
        Self {
            table,
            entries: entries.iter(),
        }
    }

    pub(crate) fn next_entry(&mut self) -> Option<&'a T> {
        self.entries.next()
    }

    pub(crate) fn take(&mut self, sample_number: u32) -> Result<&'a T, Mp4Error> {
        self.next_entry()
            .ok_or(Mp4Error::TableExhausted{table: self.table, sample_number})
    }
}
