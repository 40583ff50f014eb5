/// State management module
///
/// This module handles the editor's data model:
/// - Shared data structures (data.rs)
/// - The ordered, immutable image stack (stack.rs)

pub mod data;
pub mod stack;

pub use data::{EntryId, ImageEntry, SourceFile};
pub use stack::Stack;
