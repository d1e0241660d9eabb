//! Buffer validation.
//!
//! Editing operations keep every link reciprocal, but raw writes, pasted
//! data and imported files can break that. [`Buffer::validate`] reports
//! what is wrong without changing anything.

use std::fmt::Display;

use geometry::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::Level;
use upc::InvalidUpc;

use crate::buffer::Buffer;

/// An enumeration of possible severity levels.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning.
    #[default]
    Warning,
    /// An error.
    Error,
}

/// An issue identified during validation of a buffer.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidatorIssue {
    cause: Cause,
    severity: Severity,
}

/// The reason a buffer failed validation.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cause {
    /// A packed cell holds a bit pattern that does not decode.
    InvalidCell {
        /// The cell.
        coord: CellCoord,
        /// The raw bits.
        bits: u32,
    },
    /// A metal link is not returned by the neighbor.
    DanglingMetalLink {
        /// The cell holding the link.
        coord: CellCoord,
        /// The side the link points toward.
        side: Side,
    },
    /// A silicon link is not returned by the neighbor.
    DanglingSiLink {
        /// The cell holding the link.
        coord: CellCoord,
        /// The side the link points toward.
        side: Side,
    },
    /// Two silicon cells link to each other with mismatched polarity.
    PolarityMismatch {
        /// The cell holding the link.
        coord: CellCoord,
        /// The side the link points toward.
        side: Side,
    },
}

/// A collection of issues.
#[derive(Debug, Clone, Default)]
pub struct IssueSet {
    issues: Vec<ValidatorIssue>,
    num_errors: usize,
}

impl ValidatorIssue {
    /// Creates a new validator issue from the given cause and severity.
    pub(crate) fn new(cause: Cause, severity: Severity) -> Self {
        Self { cause, severity }
    }

    /// Creates a new validator issue and logs it immediately.
    ///
    /// The log level will be selected according to the given severity.
    pub(crate) fn new_and_log(cause: Cause, severity: Severity) -> Self {
        let result = Self::new(cause, severity);
        match severity {
            Severity::Info => tracing::event!(Level::INFO, issue = ?result.cause, "{}", result),
            Severity::Warning => tracing::event!(Level::WARN, issue = ?result.cause, "{}", result),
            Severity::Error => tracing::event!(Level::ERROR, issue = ?result.cause, "{}", result),
        }
        result
    }

    /// Gets the underlying cause of this issue.
    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Gets the severity of this issue.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl IssueSet {
    /// Creates a new, empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given issue to the issue set.
    pub fn add(&mut self, issue: ValidatorIssue) {
        if issue.severity == Severity::Error {
            self.num_errors += 1;
        }
        self.issues.push(issue);
    }

    /// Returns an iterator over all issues in the set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ValidatorIssue> {
        self.issues.iter()
    }

    /// The number of issues in this issue set.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if this issue set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `true` if this issue set contains an error.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }
}

impl IntoIterator for IssueSet {
    type Item = ValidatorIssue;
    type IntoIter = std::vec::IntoIter<ValidatorIssue>;
    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl Buffer {
    /// Checks that every cell decodes and every link is reciprocal.
    ///
    /// Issues are reported in `(x, y)` cell order. Each non-reciprocal link
    /// is reported from the cell that holds it.
    pub fn validate(&self) -> IssueSet {
        let _guard = tracing::span!(Level::DEBUG, "validating buffer").entered();
        let mut issues = IssueSet::new();
        for (coord, packed) in self.sorted_cells() {
            let cell = match packed.try_normalize() {
                Ok(cell) => cell,
                Err(InvalidUpc(bits)) => {
                    issues.add(ValidatorIssue::new_and_log(
                        Cause::InvalidCell { coord, bits },
                        Severity::Error,
                    ));
                    continue;
                }
            };
            for side in Side::ALL {
                if cell.metal.links(side) && !self.metal_linked(coord, side) {
                    issues.add(ValidatorIssue::new_and_log(
                        Cause::DanglingMetalLink { coord, side },
                        Severity::Error,
                    ));
                }
                if !cell.si.links(side) {
                    continue;
                }
                let other = coord.checked_neighbor(side).map(|n| self.cell(n).si);
                let Some(other) = other.filter(|other| other.links(side.opposite())) else {
                    issues.add(ValidatorIssue::new_and_log(
                        Cause::DanglingSiLink { coord, side },
                        Severity::Error,
                    ));
                    continue;
                };
                if cell.si.polarity_at(side) != other.polarity_at(side.opposite()) {
                    issues.add(ValidatorIssue::new_and_log(
                        Cause::PolarityMismatch { coord, side },
                        Severity::Error,
                    ));
                }
            }
        }
        issues
    }
}

impl Display for ValidatorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.cause)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCell { coord, bits } => {
                write!(f, "invalid cell: {coord} holds undecodable bits {bits:#010x}")
            }
            Self::DanglingMetalLink { coord, side } => write!(
                f,
                "dangling metal link: {coord} links {side} but its neighbor does not link back"
            ),
            Self::DanglingSiLink { coord, side } => write!(
                f,
                "dangling silicon link: {coord} links {side} but its neighbor does not link back"
            ),
            Self::PolarityMismatch { coord, side } => write!(
                f,
                "polarity mismatch: silicon at {coord} links {side} into silicon of the opposite polarity"
            ),
        }
    }
}

impl Display for IssueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in self.issues.iter() {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}
