// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Container stores that hold the native tag record.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    path::Path,
};

use bytes::Bytes;

use crate::{
    Result,
    tag::{TagSnapshot, field::CommitSurface},
};

pub mod memory;
pub mod mp4;

/// Opens files for reading or modifying their tags.
pub trait TagStore {
    type Handle: StoreHandle;

    fn open_read(&self, path: &Path) -> Result<Self::Handle>;

    fn open_modify(&self, path: &Path) -> Result<Self::Handle>;
}

/// An open file of a [`TagStore`].
///
/// Field values are committed through the [`CommitSurface`] and only
/// become durable after [`StoreHandle::persist`].
pub trait StoreHandle: CommitSurface {
    /// Reads the current tag record.
    fn fetch_tags(&mut self) -> Result<TagSnapshot>;

    /// Looks up the payload of a freeform atom.
    fn find_raw_atom(&self, namespace: &str, name: &str) -> Option<Bytes>;

    /// Writes all committed values back to the file.
    fn persist(&mut self) -> Result<()>;

    /// Releases the handle.
    ///
    /// Invoked exactly once, see [`OpenHandle`].
    fn close(&mut self);
}

/// Owns a [`StoreHandle`] and closes it when dropped.
pub struct OpenHandle<H: StoreHandle> {
    handle: H,
}

impl<H: StoreHandle> OpenHandle<H> {
    #[must_use]
    pub const fn new(handle: H) -> Self {
        Self { handle }
    }
}

impl<H: StoreHandle> Deref for OpenHandle<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H: StoreHandle> DerefMut for OpenHandle<H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: StoreHandle> Drop for OpenHandle<H> {
    fn drop(&mut self) {
        self.handle.close();
    }
}

impl<H: StoreHandle> fmt::Debug for OpenHandle<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenHandle").finish_non_exhaustive()
    }
}
