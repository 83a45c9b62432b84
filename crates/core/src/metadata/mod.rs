// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{
    artwork::{ArtworkFormat, ArtworkImage},
    atom::{MovieInfo, RatingInfo},
    index::IndexPair,
    media::{ContentRating, Country, MediaKind, MediaStoreAccountKind},
};

/// Editable tag metadata of a media file.
///
/// Text fields use the empty string for a missing value. All other
/// fields are explicitly optional, either wrapped into [`Option`] or
/// by a `NotSet` enum variant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub grouping: String,
    pub composer: String,
    pub comment: String,
    pub genre: String,
    pub genre_type: Option<i16>,
    pub release_date: String,

    pub track: Option<IndexPair>,
    pub disc: Option<IndexPair>,

    pub tempo: Option<i16>,
    pub is_compilation: Option<bool>,

    pub tv_show: String,
    pub tv_network: String,
    pub episode_id: String,
    pub season_number: Option<i32>,
    pub episode_number: Option<i32>,

    pub description: String,
    pub long_description: String,
    pub lyrics: String,

    pub sort_name: String,
    pub sort_artist: String,
    pub sort_album_artist: String,
    pub sort_album: String,
    pub sort_composer: String,
    pub sort_tv_show: String,

    pub copyright: String,
    pub encoding_tool: String,
    pub encoded_by: String,
    pub purchase_date: String,
    pub is_podcast: Option<bool>,
    pub keywords: String,
    pub category: String,
    pub is_hd_video: Option<bool>,
    pub media_kind: MediaKind,
    pub content_rating: ContentRating,
    pub is_gapless: Option<bool>,

    pub media_store_account: String,
    pub media_store_account_kind: MediaStoreAccountKind,
    pub media_store_country: Country,

    pub content_id: Option<i32>,
    pub artist_id: Option<i32>,
    pub playlist_id: Option<i64>,
    pub genre_id: Option<i32>,
    pub composer_id: Option<i32>,
    pub xid: String,

    /// Number of embedded images as reported by the store.
    ///
    /// Informational only, never written.
    pub artwork_count: u32,

    /// Populated from the `iTunEXTC` atom, never written.
    pub rating_info: Option<RatingInfo>,

    /// Populated from the `iTunMOVI` atom, never written.
    pub movie_info: Option<MovieInfo>,

    /// The front cover.
    pub artwork: Option<ArtworkImage>,
}

impl Metadata {
    #[must_use]
    pub const fn artwork(&self) -> Option<&ArtworkImage> {
        self.artwork.as_ref()
    }

    /// Replaces or removes the artwork.
    ///
    /// The [`artwork_format`](Self::artwork_format) follows the new image.
    pub fn set_artwork(&mut self, artwork: Option<ArtworkImage>) {
        self.artwork = artwork;
    }

    #[must_use]
    pub fn take_artwork(&mut self) -> Option<ArtworkImage> {
        self.artwork.take()
    }

    /// The format of the current artwork, `None` without artwork.
    #[must_use]
    pub fn artwork_format(&self) -> Option<ArtworkFormat> {
        self.artwork.as_ref().map(ArtworkImage::format)
    }

    #[must_use]
    pub fn track_index(&self) -> Option<u16> {
        self.track.map(|track| track.index)
    }

    #[must_use]
    pub fn track_total(&self) -> Option<u16> {
        self.track.map(|track| track.total)
    }

    /// Sets both track parts at once.
    ///
    /// If any part is missing the track is cleared.
    pub fn set_track_parts(&mut self, index: Option<u16>, total: Option<u16>) {
        self.track = IndexPair::from_parts(index, total);
    }

    #[must_use]
    pub fn disc_index(&self) -> Option<u16> {
        self.disc.map(|disc| disc.index)
    }

    #[must_use]
    pub fn disc_total(&self) -> Option<u16> {
        self.disc.map(|disc| disc.total)
    }

    /// Sets both disc parts at once.
    ///
    /// If any part is missing the disc is cleared.
    pub fn set_disc_parts(&mut self, index: Option<u16>, total: Option<u16>) {
        self.disc = IndexPair::from_parts(index, total);
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
