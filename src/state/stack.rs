use std::collections::HashSet;
use std::sync::Arc;

use super::data::{EntryId, ImageEntry};
use crate::error::{Result, StackError};

/// Ordered sequence of entries, first = bottom, last = top.
///
/// Every operation returns a new `Stack`. The entries live behind an `Arc`,
/// so a clone handed to an in-flight render never observes later edits.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    entries: Arc<[ImageEntry]>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Append new entries after all existing ones, in the given order.
    /// Entries whose id is already in the stack are skipped.
    pub fn append(&self, new_entries: impl IntoIterator<Item = ImageEntry>) -> Stack {
        let mut seen: HashSet<EntryId> = self.entries.iter().map(|e| e.id).collect();
        let mut entries = self.entries.to_vec();

        for entry in new_entries {
            if seen.insert(entry.id) {
                entries.push(entry);
            }
        }

        Stack {
            entries: entries.into(),
        }
    }

    /// Delete the entry at `index`, keeping the others in order
    pub fn remove(&self, index: usize) -> Result<Stack> {
        self.check_index(index)?;

        let entries: Vec<ImageEntry> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.clone())
            .collect();

        Ok(Stack {
            entries: entries.into(),
        })
    }

    /// Swap the entry at `index` with the one below it. No change at the bottom.
    pub fn move_up(&self, index: usize) -> Result<Stack> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(self.clone());
        }
        Ok(self.swapped(index, index - 1))
    }

    /// Swap the entry at `index` with the one above it. No change at the top.
    pub fn move_down(&self, index: usize) -> Result<Stack> {
        self.check_index(index)?;
        if index == self.len() - 1 {
            return Ok(self.clone());
        }
        Ok(self.swapped(index, index + 1))
    }

    fn swapped(&self, a: usize, b: usize) -> Stack {
        let mut entries = self.entries.to_vec();
        entries.swap(a, b);
        Stack {
            entries: entries.into(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(StackError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}
