// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Mapping between the [`Metadata`] model and the flat [`TagSnapshot`].
//!
//! Every field is described by a single entry in a static table that
//! knows how to decode the native value, compare it with the model,
//! and commit the model value. All operations iterate over this table.

use std::convert::identity;

use tagsync_core::{
    Metadata,
    artwork::ArtworkImage,
    index::IndexPair,
    media::{ContentRating, Country, MediaKind, MediaStoreAccountKind, NativeEnum},
};

use crate::codec::{
    self, Scalar, Scratch,
    pair::{PairCommit, commit_pair, decode_pair},
};

use super::{ArtworkRef, FieldId, TagSnapshot};

/// Write access to the native tag record.
pub trait CommitSurface {
    /// Sets (`Some`) or clears (`None`) a single field.
    ///
    /// Returns `false` if the native store rejected the value.
    fn commit(&mut self, field: FieldId, region: Option<&[u8]>) -> bool;

    /// Replaces (`Some`) or removes (`None`) the cover art.
    fn commit_artwork(&mut self, artwork: Option<ArtworkRef<'_>>) -> bool;
}

/// How to proceed after a field could not be committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Commit all other changed fields anyway.
    #[default]
    BestEffort,

    /// Stop at the first failed commit.
    AbortOnFirstFailure,
}

/// The fields that have been touched while applying changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub committed: Vec<FieldId>,
    pub failed: Vec<FieldId>,
}

impl ApplyOutcome {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        let Self { committed, failed } = self;
        committed.is_empty() && failed.is_empty()
    }
}

pub(crate) trait Field: Sync {
    fn id(&self) -> FieldId;

    fn populate(&self, snapshot: &TagSnapshot, metadata: &mut Metadata);

    fn is_changed(&self, metadata: &Metadata, snapshot: &TagSnapshot) -> bool;

    /// Commits the model value.
    ///
    /// Returns `None` if no native call was needed.
    fn commit(
        &self,
        metadata: &Metadata,
        snapshot: &TagSnapshot,
        scratch: &Scratch,
        surface: &mut dyn CommitSurface,
    ) -> Option<bool>;
}

struct TextField {
    id: FieldId,
    get: fn(&Metadata) -> &str,
    set: fn(&mut Metadata, String),
}

impl Field for TextField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn populate(&self, snapshot: &TagSnapshot, metadata: &mut Metadata) {
        (self.set)(metadata, snapshot.text(self.id).unwrap_or_default());
    }

    fn is_changed(&self, metadata: &Metadata, snapshot: &TagSnapshot) -> bool {
        // Missing and empty text are the same
        snapshot.text(self.id).as_deref().unwrap_or_default() != (self.get)(metadata)
    }

    fn commit(
        &self,
        metadata: &Metadata,
        _snapshot: &TagSnapshot,
        _scratch: &Scratch,
        surface: &mut dyn CommitSurface,
    ) -> Option<bool> {
        let text = (self.get)(metadata);
        let region = (!text.is_empty()).then_some(text.as_bytes());
        Some(surface.commit(self.id, region))
    }
}

/// A scalar field with native type `T` and model type `V`.
struct ScalarField<T, V> {
    id: FieldId,
    get: fn(&Metadata) -> V,
    set: fn(&mut Metadata, V),
    decode: fn(Option<T>) -> V,
    encode: fn(V) -> Option<T>,
}

impl<T, V> ScalarField<T, V>
where
    T: Scalar,
{
    fn decode_snapshot(&self, snapshot: &TagSnapshot) -> V {
        (self.decode)(codec::decode(snapshot.get(self.id)))
    }
}

impl<T, V> Field for ScalarField<T, V>
where
    T: Scalar,
    V: Copy + PartialEq,
{
    fn id(&self) -> FieldId {
        self.id
    }

    fn populate(&self, snapshot: &TagSnapshot, metadata: &mut Metadata) {
        (self.set)(metadata, self.decode_snapshot(snapshot));
    }

    fn is_changed(&self, metadata: &Metadata, snapshot: &TagSnapshot) -> bool {
        // Compare decoded values, not native bytes
        self.decode_snapshot(snapshot) != (self.get)(metadata)
    }

    fn commit(
        &self,
        metadata: &Metadata,
        _snapshot: &TagSnapshot,
        scratch: &Scratch,
        surface: &mut dyn CommitSurface,
    ) -> Option<bool> {
        let value = (self.encode)((self.get)(metadata));
        Some(codec::encode_and_commit(scratch, value, |region| {
            surface.commit(self.id, region)
        }))
    }
}

struct PairField {
    id: FieldId,
    get: fn(&Metadata) -> Option<IndexPair>,
    set: fn(&mut Metadata, Option<IndexPair>),
}

impl Field for PairField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn populate(&self, snapshot: &TagSnapshot, metadata: &mut Metadata) {
        (self.set)(metadata, decode_pair(snapshot.get(self.id)));
    }

    fn is_changed(&self, metadata: &Metadata, snapshot: &TagSnapshot) -> bool {
        decode_pair(snapshot.get(self.id)) != (self.get)(metadata)
    }

    fn commit(
        &self,
        metadata: &Metadata,
        snapshot: &TagSnapshot,
        scratch: &Scratch,
        surface: &mut dyn CommitSurface,
    ) -> Option<bool> {
        let current = decode_pair(snapshot.get(self.id));
        match commit_pair(scratch, (self.get)(metadata), current, |region| {
            surface.commit(self.id, region)
        }) {
            PairCommit::Unchanged => None,
            PairCommit::Committed(ok) => Some(ok),
        }
    }
}

struct ArtworkField;

impl Field for ArtworkField {
    fn id(&self) -> FieldId {
        FieldId::Artwork
    }

    fn populate(&self, snapshot: &TagSnapshot, metadata: &mut Metadata) {
        let artwork = snapshot
            .artwork()
            .map(|artwork| ArtworkImage::new(artwork.format, artwork.data.clone()));
        metadata.set_artwork(artwork);
    }

    fn is_changed(&self, metadata: &Metadata, snapshot: &TagSnapshot) -> bool {
        metadata.artwork().map(ArtworkImage::data)
            != snapshot.artwork().map(|artwork| artwork.data.as_ref())
    }

    fn commit(
        &self,
        metadata: &Metadata,
        _snapshot: &TagSnapshot,
        _scratch: &Scratch,
        surface: &mut dyn CommitSurface,
    ) -> Option<bool> {
        let artwork = metadata.artwork().map(|artwork| ArtworkRef {
            format: artwork.format(),
            data: artwork.data(),
        });
        Some(surface.commit_artwork(artwork))
    }
}

macro_rules! text_field {
    ($id:ident, $field:ident) => {
        &TextField {
            id: FieldId::$id,
            get: |metadata| metadata.$field.as_str(),
            set: |metadata, value| metadata.$field = value,
        }
    };
}

macro_rules! scalar_field {
    ($id:ident, $field:ident, $ty:ty) => {
        &ScalarField::<$ty, Option<$ty>> {
            id: FieldId::$id,
            get: |metadata| metadata.$field,
            set: |metadata, value| metadata.$field = value,
            decode: identity,
            encode: identity,
        }
    };
}

macro_rules! enum_field {
    ($id:ident, $field:ident, $ty:ty) => {
        &ScalarField::<<$ty as NativeEnum>::Repr, $ty> {
            id: FieldId::$id,
            get: |metadata| metadata.$field,
            set: |metadata, value| metadata.$field = value,
            decode: <$ty as NativeEnum>::from_native,
            encode: <$ty as NativeEnum>::to_native,
        }
    };
}

macro_rules! pair_field {
    ($id:ident, $field:ident) => {
        &PairField {
            id: FieldId::$id,
            get: |metadata| metadata.$field,
            set: |metadata, value| metadata.$field = value,
        }
    };
}

/// All fields in commit order, see [`FieldId`].
pub(crate) static FIELDS: &[&dyn Field] = &[
    text_field!(Title, title),
    text_field!(Artist, artist),
    text_field!(Album, album),
    text_field!(AlbumArtist, album_artist),
    text_field!(Grouping, grouping),
    text_field!(Composer, composer),
    text_field!(Comment, comment),
    text_field!(Genre, genre),
    scalar_field!(GenreType, genre_type, i16),
    text_field!(ReleaseDate, release_date),
    scalar_field!(Tempo, tempo, i16),
    scalar_field!(IsCompilation, is_compilation, bool),
    text_field!(TvShow, tv_show),
    text_field!(TvNetwork, tv_network),
    text_field!(EpisodeId, episode_id),
    scalar_field!(SeasonNumber, season_number, i32),
    scalar_field!(EpisodeNumber, episode_number, i32),
    text_field!(Description, description),
    text_field!(LongDescription, long_description),
    text_field!(Lyrics, lyrics),
    text_field!(SortName, sort_name),
    text_field!(SortArtist, sort_artist),
    text_field!(SortAlbum, sort_album),
    text_field!(SortAlbumArtist, sort_album_artist),
    text_field!(SortComposer, sort_composer),
    text_field!(SortTvShow, sort_tv_show),
    text_field!(Copyright, copyright),
    text_field!(EncodingTool, encoding_tool),
    text_field!(EncodedBy, encoded_by),
    text_field!(PurchaseDate, purchase_date),
    scalar_field!(IsPodcast, is_podcast, bool),
    text_field!(Keywords, keywords),
    text_field!(Category, category),
    scalar_field!(IsHdVideo, is_hd_video, bool),
    enum_field!(MediaKind, media_kind, MediaKind),
    enum_field!(ContentRating, content_rating, ContentRating),
    scalar_field!(IsGapless, is_gapless, bool),
    text_field!(MediaStoreAccount, media_store_account),
    enum_field!(
        MediaStoreAccountKind,
        media_store_account_kind,
        MediaStoreAccountKind
    ),
    enum_field!(MediaStoreCountry, media_store_country, Country),
    scalar_field!(ContentId, content_id, i32),
    scalar_field!(ArtistId, artist_id, i32),
    scalar_field!(PlaylistId, playlist_id, i64),
    scalar_field!(GenreId, genre_id, i32),
    scalar_field!(ComposerId, composer_id, i32),
    text_field!(Xid, xid),
    pair_field!(Track, track),
    pair_field!(Disc, disc),
    &ArtworkField,
];

fn fields(with_artwork: bool) -> impl Iterator<Item = &'static dyn Field> {
    FIELDS
        .iter()
        .copied()
        .filter(move |field| with_artwork || field.id() != FieldId::Artwork)
}

/// Loads all fields of the snapshot into the model.
///
/// The raw atom records of the model are not touched.
pub fn populate(snapshot: &TagSnapshot, metadata: &mut Metadata, with_artwork: bool) {
    for field in fields(with_artwork) {
        field.populate(snapshot, metadata);
    }
    metadata.artwork_count = snapshot.artwork_count();
}

/// The fields of the model that differ from the snapshot.
#[must_use]
pub fn changed_fields(
    metadata: &Metadata,
    snapshot: &TagSnapshot,
    with_artwork: bool,
) -> Vec<FieldId> {
    fields(with_artwork)
        .filter(|field| field.is_changed(metadata, snapshot))
        .map(|field| field.id())
        .collect()
}

/// Commits all fields of the model that differ from the snapshot.
///
/// Unchanged fields are skipped without any native call. Failed commits
/// are logged and handled according to the `policy`.
pub fn diff_and_apply(
    metadata: &Metadata,
    snapshot: &TagSnapshot,
    scratch: &Scratch,
    surface: &mut dyn CommitSurface,
    with_artwork: bool,
    policy: WritePolicy,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();
    for field in fields(with_artwork) {
        if !field.is_changed(metadata, snapshot) {
            continue;
        }
        let id = field.id();
        match field.commit(metadata, snapshot, scratch, surface) {
            None => {
                log::trace!("Skipped commit of unchanged {id}");
            }
            Some(true) => {
                log::trace!("Committed {id}");
                outcome.committed.push(id);
            }
            Some(false) => {
                log::warn!("Failed to commit {id}");
                outcome.failed.push(id);
                if policy == WritePolicy::AbortOnFirstFailure {
                    break;
                }
            }
        }
        debug_assert_eq!(0, scratch.live_regions());
    }
    outcome
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
