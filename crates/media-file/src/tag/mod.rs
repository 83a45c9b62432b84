// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use bytes::Bytes;
use strum::{Display, IntoStaticStr, VariantArray};

use tagsync_core::artwork::ArtworkFormat;

pub mod field;

/// Fields of the flat native tag record that could be written.
///
/// The declaration order is the order in which changed fields
/// are committed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, VariantArray,
)]
#[strum(serialize_all = "snake_case")]
pub enum FieldId {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Grouping,
    Composer,
    Comment,
    Genre,
    GenreType,
    ReleaseDate,
    Tempo,
    IsCompilation,
    TvShow,
    TvNetwork,
    EpisodeId,
    SeasonNumber,
    EpisodeNumber,
    Description,
    LongDescription,
    Lyrics,
    SortName,
    SortArtist,
    SortAlbum,
    SortAlbumArtist,
    SortComposer,
    SortTvShow,
    Copyright,
    EncodingTool,
    EncodedBy,
    PurchaseDate,
    IsPodcast,
    Keywords,
    Category,
    IsHdVideo,
    MediaKind,
    ContentRating,
    IsGapless,
    MediaStoreAccount,
    MediaStoreAccountKind,
    MediaStoreCountry,
    ContentId,
    ArtistId,
    PlaylistId,
    GenreId,
    ComposerId,
    Xid,
    Track,
    Disc,
    Artwork,
}

/// Embedded cover art as stored natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeArtwork {
    pub format: ArtworkFormat,
    pub data: Bytes,
}

/// Borrowed cover art that is passed to a single commit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtworkRef<'a> {
    pub format: ArtworkFormat,
    pub data: &'a [u8],
}

impl NativeArtwork {
    #[must_use]
    pub fn to_ref(&self) -> ArtworkRef<'_> {
        let Self { format, data } = self;
        ArtworkRef {
            format: *format,
            data: data.as_ref(),
        }
    }
}

/// Byte-for-byte copy of the native tag record.
///
/// Text is stored as UTF-8, scalars as big-endian bytes of their
/// native width, pairs as 4 bytes. A missing entry is a missing value.
/// The artwork is kept separately together with its format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    values: BTreeMap<FieldId, Bytes>,
    artwork: Option<NativeArtwork>,
    artwork_count: u32,
}

impl TagSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            artwork: None,
            artwork_count: 0,
        }
    }

    /// The raw region of a field.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&[u8]> {
        debug_assert_ne!(field, FieldId::Artwork);
        self.values.get(&field).map(Bytes::as_ref)
    }

    /// The text of a field.
    ///
    /// Invalid UTF-8 is replaced and logged.
    #[must_use]
    pub fn text(&self, field: FieldId) -> Option<String> {
        let bytes = self.get(field)?;
        let text = String::from_utf8_lossy(bytes);
        if let std::borrow::Cow::Owned(_) = text {
            log::warn!("Invalid UTF-8 in text field {field}");
        }
        Some(text.into_owned())
    }

    /// Replaces or removes the raw region of a field.
    pub fn set(&mut self, field: FieldId, region: Option<impl Into<Bytes>>) {
        debug_assert_ne!(field, FieldId::Artwork);
        if let Some(region) = region {
            self.values.insert(field, region.into());
        } else {
            self.values.remove(&field);
        }
    }

    #[must_use]
    pub const fn artwork(&self) -> Option<&NativeArtwork> {
        self.artwork.as_ref()
    }

    pub fn set_artwork(&mut self, artwork: Option<NativeArtwork>) {
        self.artwork = artwork;
    }

    #[must_use]
    pub const fn artwork_count(&self) -> u32 {
        self.artwork_count
    }

    pub fn set_artwork_count(&mut self, artwork_count: u32) {
        self.artwork_count = artwork_count;
    }

    /// Fields with a value, excluding the artwork.
    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.values.keys().copied()
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
