// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reading and writing the tags of a single media file.

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use semval::prelude::*;

use tagsync_core::{
    Metadata,
    atom::{MovieInfo, RatingInfo},
    index::IndexPair,
};

use crate::{
    Error, Operation, Result,
    atom::{self, RawAtom},
    codec::Scratch,
    fmt::{OpenHandle, StoreHandle, TagStore, mp4::Mp4Store},
    tag::{
        FieldId,
        field::{self, ApplyOutcome},
    },
};

pub use crate::tag::field::WritePolicy;

#[rustfmt::skip]
bitflags! {
    /// Optional parts of the metadata that are synchronized.
    ///
    /// All flags are enabled by default.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SyncFlags: u8 {
        /// Read the content advisory rating from the `iTunEXTC` atom
        const RATING_INFO = 0b0000_0001;

        /// Read the movie credits from the `iTunMOVI` atom
        const MOVIE_INFO  = 0b0000_0010;

        /// Read and write the cover art
        const ARTWORK     = 0b0000_0100;
    }
}

impl SyncFlags {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        Self::all().contains(self)
    }
}

impl Default for SyncFlags {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncConfig {
    pub flags: SyncFlags,
    pub write_policy: WritePolicy,
}

/// Recoverable errors and warnings
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Issues {
    messages: Vec<String>,
}

impl Issues {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        let Self { messages } = self;
        messages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let Self { messages } = self;
        messages.len()
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug_assert!(!message.trim().is_empty());
        self.messages.push(message);
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        let Self { messages } = self;
        messages
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOutcome {
    pub issues: Issues,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Fields that have been written.
    pub committed: Vec<FieldId>,

    /// Fields that could not be written.
    pub failed: Vec<FieldId>,
}

impl WriteOutcome {
    /// Nothing needed to be written.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        let Self { committed, failed } = self;
        committed.is_empty() && failed.is_empty()
    }

    /// All changed fields have been written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn read_raw_atom<A, H>(handle: &H, issues: &mut Issues) -> Option<A>
where
    A: RawAtom,
    H: StoreHandle,
{
    match atom::fetch::<A, _>(handle)? {
        Ok(record) => Some(record),
        Err(err) => {
            log::warn!(
                "Failed to parse raw atom {namespace}:{name}: {err}",
                namespace = A::NAMESPACE,
                name = A::NAME,
            );
            issues.add_message(format!("Failed to parse {name}: {err}", name = A::NAME));
            None
        }
    }
}

fn log_invalid_pair(field: FieldId, pair: Option<IndexPair>) {
    let Some(pair) = pair else {
        return;
    };
    if !pair.is_valid() {
        log::warn!("Writing invalid {field} {pair}");
    }
}

/// A media file whose tags are synchronized with a [`Metadata`] model.
///
/// The file is only accessed while reading or writing. Concurrent
/// access to the same file must be serialized by the caller.
#[derive(Debug)]
pub struct MediaFile<S = Mp4Store> {
    path: PathBuf,
    store: S,
    config: SyncConfig,
    metadata: Metadata,
}

impl MediaFile<Mp4Store> {
    /// Refers to an existing MPEG-4 file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_store(path, Mp4Store)
    }
}

impl<S> MediaFile<S>
where
    S: TagStore,
{
    /// Refers to an existing file of a custom store.
    ///
    /// Fails if the path is empty or does not point to a file.
    pub fn with_store(path: impl Into<PathBuf>, store: S) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() || !path.is_file() {
            return Err(Error::InvalidPath(path));
        }
        Ok(Self {
            path,
            store,
            config: Default::default(),
            metadata: Default::default(),
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        debug_assert!(config.flags.is_valid());
        self.config = config;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    #[must_use]
    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    fn open_handle(&self, writable: bool) -> Result<OpenHandle<S::Handle>> {
        let handle = if writable {
            self.store.open_modify(&self.path)
        } else {
            self.store.open_read(&self.path)
        };
        handle
            .map(OpenHandle::new)
            .map_err(|err| Error::store(Operation::Open, err))
    }

    /// Replaces the metadata with the tags of the file.
    ///
    /// Unparsable raw atoms are reported as issues and leave the
    /// corresponding record empty.
    pub fn read_tags(&mut self) -> Result<ReadOutcome> {
        let SyncConfig { flags, .. } = self.config;
        log::debug!("Reading tags from {}", self.path.display());
        let mut handle = self.open_handle(false)?;
        let snapshot = handle
            .fetch_tags()
            .map_err(|err| Error::store(Operation::Fetch, err))?;
        let mut metadata = Metadata::default();
        field::populate(&snapshot, &mut metadata, flags.contains(SyncFlags::ARTWORK));
        let mut issues = Issues::new();
        if flags.contains(SyncFlags::RATING_INFO) {
            metadata.rating_info = read_raw_atom::<RatingInfo, _>(&*handle, &mut issues);
        }
        if flags.contains(SyncFlags::MOVIE_INFO) {
            metadata.movie_info = read_raw_atom::<MovieInfo, _>(&*handle, &mut issues)
                .filter(|movie_info| !movie_info.is_empty());
        }
        drop(handle);
        self.metadata = metadata;
        Ok(ReadOutcome { issues })
    }

    /// Writes all fields of the metadata that differ from the file.
    ///
    /// The tags are fetched again before writing. If no field differs
    /// the store is not persisted, i.e. the file is opened and read
    /// but never written.
    pub fn write_tags(&self) -> Result<WriteOutcome> {
        let SyncConfig {
            flags,
            write_policy,
        } = self.config;
        log_invalid_pair(FieldId::Track, self.metadata.track);
        log_invalid_pair(FieldId::Disc, self.metadata.disc);
        log::debug!("Writing tags into {}", self.path.display());
        let mut handle = self.open_handle(true)?;
        let snapshot = handle
            .fetch_tags()
            .map_err(|err| Error::store(Operation::Fetch, err))?;
        let scratch = Scratch::new();
        let ApplyOutcome { committed, failed } = field::diff_and_apply(
            &self.metadata,
            &snapshot,
            &scratch,
            &mut *handle,
            flags.contains(SyncFlags::ARTWORK),
            write_policy,
        );
        debug_assert_eq!(0, scratch.live_regions());
        if let (WritePolicy::AbortOnFirstFailure, Some(&field)) = (write_policy, failed.first()) {
            log::warn!("Aborted writing tags into {}", self.path.display());
            return Err(Error::Commit(field));
        }
        if committed.is_empty() && failed.is_empty() {
            log::debug!("Tags of {} are unchanged", self.path.display());
            return Ok(WriteOutcome::default());
        }
        handle
            .persist()
            .map_err(|err| Error::store(Operation::Persist, err))?;
        log::debug!(
            "Wrote {committed} field(s) into {path}",
            committed = committed.len(),
            path = self.path.display()
        );
        Ok(WriteOutcome { committed, failed })
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
