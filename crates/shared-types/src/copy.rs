//! Copy object tags.
//!
//! A copy carries `stello-reads` and `stello-max-reads` alongside tags the
//! sender's client set for its own purposes (e.g. `stello-lifespan`). Any
//! rewrite must carry those through untouched.

use std::collections::BTreeMap;

use crate::ResponderError;

/// Number of times the copy has been read.
pub const READS_TAG: &str = "stello-reads";

/// Read count at which the copy is deleted.
pub const MAX_READS_TAG: &str = "stello-max-reads";

/// Object tags as stored.
pub type TagSet = BTreeMap<String, String>;

/// Tag set of one copy object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTags {
    tags: TagSet,
}

impl CopyTags {
    /// Wrap a fetched tag set.
    pub fn new(tags: TagSet) -> Self {
        Self { tags }
    }

    /// Current read count.
    ///
    /// # Errors
    ///
    /// `Dependency` if the tag is missing or not an unsigned integer.
    pub fn reads(&self) -> Result<u64, ResponderError> {
        self.counter(READS_TAG)
    }

    /// Read limit fixed at creation.
    ///
    /// # Errors
    ///
    /// `Dependency` if the tag is missing or not an unsigned integer.
    pub fn max_reads(&self) -> Result<u64, ResponderError> {
        self.counter(MAX_READS_TAG)
    }

    /// Replace the read count, leaving every other tag as it was.
    pub fn with_reads(mut self, reads: u64) -> Self {
        self.tags.insert(READS_TAG.to_string(), reads.to_string());
        self
    }

    /// Borrow the full tag set.
    pub fn as_tags(&self) -> &TagSet {
        &self.tags
    }

    /// Take the full tag set.
    pub fn into_tags(self) -> TagSet {
        self.tags
    }

    fn counter(&self, name: &str) -> Result<u64, ResponderError> {
        self.tags
            .get(name)
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| {
                ResponderError::Dependency(format!("copy tag '{}' missing or not an integer", name))
            })
    }
}
