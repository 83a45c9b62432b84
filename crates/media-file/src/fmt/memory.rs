// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! A store that keeps a single tag record in memory.
//!
//! Records every commit and allows to inject failures, e.g. for
//! testing how the sync controller deals with them.

use std::{
    cell::{Ref, RefCell},
    collections::{BTreeSet, HashMap},
    path::Path,
    rc::Rc,
};

use anyhow::anyhow;
use bytes::Bytes;

use crate::{
    Error, Result,
    tag::{ArtworkRef, FieldId, NativeArtwork, TagSnapshot, field::CommitSurface},
};

use super::{StoreHandle, TagStore};

/// A single commit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub field: FieldId,

    /// The committed region, `None` if the field has been cleared.
    pub region: Option<Bytes>,
}

#[derive(Debug, Default)]
struct State {
    snapshot: TagSnapshot,
    raw_atoms: HashMap<(String, String), Bytes>,
    journal: Vec<CommitRecord>,
    rejected: BTreeSet<FieldId>,
    fail_open: bool,
    fail_fetch: bool,
    fail_persist: bool,
    opened: usize,
    closed: usize,
    persisted: usize,
}

/// In-memory [`TagStore`].
///
/// Cloned stores share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(snapshot: TagSnapshot) -> Self {
        let state = State {
            snapshot,
            ..Default::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// The persisted tag record.
    #[must_use]
    pub fn snapshot(&self) -> Ref<'_, TagSnapshot> {
        Ref::map(self.state.borrow(), |state| &state.snapshot)
    }

    pub fn set_snapshot(&self, snapshot: TagSnapshot) {
        self.state.borrow_mut().snapshot = snapshot;
    }

    pub fn set_raw_atom(&self, namespace: &str, name: &str, payload: impl Into<Bytes>) {
        self.state
            .borrow_mut()
            .raw_atoms
            .insert((namespace.to_owned(), name.to_owned()), payload.into());
    }

    /// All commits since the last call of [`Self::take_journal`].
    #[must_use]
    pub fn take_journal(&self) -> Vec<CommitRecord> {
        std::mem::take(&mut self.state.borrow_mut().journal)
    }

    /// Lets all following commits of `field` fail.
    pub fn reject_commits(&self, field: FieldId) {
        self.state.borrow_mut().rejected.insert(field);
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.state.borrow_mut().fail_open = fail;
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.state.borrow_mut().fail_fetch = fail;
    }

    pub fn set_fail_persist(&self, fail: bool) {
        self.state.borrow_mut().fail_persist = fail;
    }

    /// Number of handles that have been opened, but not closed yet.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        let state = self.state.borrow();
        state.opened - state.closed
    }

    /// Number of handles opened so far.
    #[must_use]
    pub fn opened_handles(&self) -> usize {
        self.state.borrow().opened
    }

    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.state.borrow().persisted
    }

    fn open(&self, path: &Path, writable: bool) -> Result<MemoryHandle> {
        let mut state = self.state.borrow_mut();
        if state.fail_open {
            return Err(anyhow!("cannot open {}", path.display()).into());
        }
        state.opened += 1;
        Ok(MemoryHandle {
            state: Rc::clone(&self.state),
            staged: state.snapshot.clone(),
            writable,
            closed: false,
        })
    }
}

impl TagStore for MemoryStore {
    type Handle = MemoryHandle;

    fn open_read(&self, path: &Path) -> Result<Self::Handle> {
        self.open(path, false)
    }

    fn open_modify(&self, path: &Path) -> Result<Self::Handle> {
        self.open(path, true)
    }
}

/// Handle of a [`MemoryStore`].
///
/// Commits are staged and only become visible in the store
/// after persisting.
#[derive(Debug)]
pub struct MemoryHandle {
    state: Rc<RefCell<State>>,
    staged: TagSnapshot,
    writable: bool,
    closed: bool,
}

impl MemoryHandle {
    fn record(&mut self, field: FieldId, region: Option<Bytes>) -> bool {
        debug_assert!(!self.closed);
        let mut state = self.state.borrow_mut();
        state.journal.push(CommitRecord {
            field,
            region: region.clone(),
        });
        if !self.writable || state.rejected.contains(&field) {
            return false;
        }
        drop(state);
        if field != FieldId::Artwork {
            self.staged.set(field, region);
        }
        true
    }
}

impl CommitSurface for MemoryHandle {
    fn commit(&mut self, field: FieldId, region: Option<&[u8]>) -> bool {
        self.record(field, region.map(Bytes::copy_from_slice))
    }

    fn commit_artwork(&mut self, artwork: Option<ArtworkRef<'_>>) -> bool {
        let artwork = artwork.map(|ArtworkRef { format, data }| NativeArtwork {
            format,
            data: Bytes::copy_from_slice(data),
        });
        let region = artwork.as_ref().map(|artwork| artwork.data.clone());
        if !self.record(FieldId::Artwork, region) {
            return false;
        }
        let artwork_count = u32::from(artwork.is_some());
        self.staged.set_artwork(artwork);
        self.staged.set_artwork_count(artwork_count);
        true
    }
}

impl StoreHandle for MemoryHandle {
    fn fetch_tags(&mut self) -> Result<TagSnapshot> {
        if self.state.borrow().fail_fetch {
            return Err(anyhow!("cannot fetch tags").into());
        }
        Ok(self.staged.clone())
    }

    fn find_raw_atom(&self, namespace: &str, name: &str) -> Option<Bytes> {
        self.state
            .borrow()
            .raw_atoms
            .get(&(namespace.to_owned(), name.to_owned()))
            .cloned()
    }

    fn persist(&mut self) -> Result<()> {
        if !self.writable {
            return Err(Error::Other(anyhow!("opened read-only")));
        }
        let mut state = self.state.borrow_mut();
        if state.fail_persist {
            return Err(anyhow!("cannot persist tags").into());
        }
        state.snapshot = self.staged.clone();
        state.persisted += 1;
        Ok(())
    }

    fn close(&mut self) {
        debug_assert!(!self.closed);
        if self.closed {
            return;
        }
        self.closed = true;
        self.state.borrow_mut().closed += 1;
    }
}
