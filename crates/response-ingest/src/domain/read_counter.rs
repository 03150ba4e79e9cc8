//! Read-Counter State Machine
//!
//! ```text
//! read(has_max_reads=false) ──→ [untracked]           (no store access)
//! read(has_max_reads=true)  ──→ copy gone?            ──→ [already gone]
//!                               reads + 1 < max_reads ──→ [counted]  rewrite tags
//!                               reads + 1 ≥ max_reads ──→ [expired]  delete copy + invite image
//! ```
//!
//! The store access around this is a plain read-then-write with no
//! conditional put. Two concurrent reads of one copy can both see the same
//! count; the limit is soft enforcement, so an off-by-a-few count is
//! accepted.

use shared_types::{CopyTags, ResponderError};

/// Next state of a tracked copy after one read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadTransition {
    /// Below the limit: write these tags back (only `stello-reads` changed).
    Counted(CopyTags),
    /// Limit reached: delete the copy and its invite image.
    Expired { reads: u64 },
}

/// Apply one read to a copy's current tags.
///
/// # Errors
///
/// `Dependency` when either counter tag is missing or malformed.
pub fn next_read(tags: CopyTags) -> Result<ReadTransition, ResponderError> {
    let reads = tags.reads()?.saturating_add(1);
    let max_reads = tags.max_reads()?;

    if reads >= max_reads {
        Ok(ReadTransition::Expired { reads })
    } else {
        Ok(ReadTransition::Counted(tags.with_reads(reads)))
    }
}

/// Where a read event left its copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Copy was already deleted.
    AlreadyGone,
    /// Counter advanced to `reads`.
    Counted { reads: u64 },
    /// Copy deleted after `reads` reads.
    Expired { reads: u64 },
}
