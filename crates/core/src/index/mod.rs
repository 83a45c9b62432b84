// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

///////////////////////////////////////////////////////////////////////

use std::fmt;

use semval::prelude::*;

/// A two-part position, e.g. track 4 of 12.
///
/// Both parts are always present. A total of 0 means that the total
/// is unknown, which is how the native `trkn`/`disk` atoms encode it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IndexPair {
    pub index: u16,
    pub total: u16,
}

impl IndexPair {
    #[must_use]
    pub const fn new(index: u16, total: u16) -> Self {
        Self { index, total }
    }

    /// Combines two independently optional parts.
    ///
    /// Partial input collapses to `None`: a pair is either fully present
    /// or fully absent.
    #[must_use]
    pub const fn from_parts(index: Option<u16>, total: Option<u16>) -> Option<Self> {
        match (index, total) {
            (Some(index), Some(total)) => Some(Self { index, total }),
            _ => None,
        }
    }

    #[must_use]
    pub const fn into_parts(self) -> (u16, u16) {
        let Self { index, total } = self;
        (index, total)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndexPairInvalidity {
    IndexExceedsTotal,
}

impl Validate for IndexPair {
    type Invalidity = IndexPairInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let Self { index, total } = *self;
        ValidationContext::new()
            .invalidate_if(
                total > 0 && index > total,
                Self::Invalidity::IndexExceedsTotal,
            )
            .into()
    }
}

impl fmt::Display for IndexPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { index, total } = self;
        if *total > 0 {
            write!(f, "{index}/{total}")
        } else {
            index.fmt(f)
        }
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
