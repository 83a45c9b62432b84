// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Track and disc pairs, encoded as two big-endian `u16` values.

use tagsync_core::index::IndexPair;

use super::Scratch;

pub const PAIR_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairCommit {
    /// Both sides are equal, no native call.
    Unchanged,

    /// The native commit has been invoked with the given result.
    Committed(bool),
}

#[must_use]
pub fn decode_pair(region: Option<&[u8]>) -> Option<IndexPair> {
    let region = region?;
    let &[i0, i1, t0, t1] = region else {
        log::warn!(
            "Ignoring pair region of {len} byte(s), expected {PAIR_WIDTH}",
            len = region.len()
        );
        return None;
    };
    Some(IndexPair::new(
        u16::from_be_bytes([i0, i1]),
        u16::from_be_bytes([t0, t1]),
    ))
}

/// Writes a pair, but only if it differs from the current one.
///
/// A missing pair clears both native parts at once.
pub fn commit_pair<F>(
    scratch: &Scratch,
    pair: Option<IndexPair>,
    current: Option<IndexPair>,
    commit: F,
) -> PairCommit
where
    F: FnOnce(Option<&[u8]>) -> bool,
{
    if pair == current {
        return PairCommit::Unchanged;
    }
    let Some(IndexPair { index, total }) = pair else {
        return PairCommit::Committed(commit(None));
    };
    let mut region = scratch.alloc(PAIR_WIDTH);
    let buf = region.as_mut_slice();
    buf[..2].copy_from_slice(&index.to_be_bytes());
    buf[2..].copy_from_slice(&total.to_be_bytes());
    PairCommit::Committed(commit(Some(&region[..])))
}
