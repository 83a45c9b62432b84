// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn default_is_empty() {
    let metadata = Metadata::default();
    assert!(metadata.title.is_empty());
    assert_eq!(None, metadata.track);
    assert_eq!(MediaKind::NotSet, metadata.media_kind);
    assert_eq!(Country::NotSet, metadata.media_store_country);
    assert!(metadata.artwork().is_none());
    assert_eq!(None, metadata.artwork_format());
}

#[test]
fn partial_track_parts_collapse() {
    let mut metadata = Metadata::default();
    metadata.set_track_parts(Some(4), Some(12));
    assert_eq!(Some(4), metadata.track_index());
    assert_eq!(Some(12), metadata.track_total());
    metadata.set_track_parts(Some(5), None);
    assert_eq!(None, metadata.track);
    assert_eq!(None, metadata.track_index());
    assert_eq!(None, metadata.track_total());
}

#[test]
fn partial_disc_parts_collapse() {
    let mut metadata = Metadata::default();
    metadata.set_disc_parts(Some(1), Some(2));
    assert_eq!(Some(IndexPair::new(1, 2)), metadata.disc);
    metadata.set_disc_parts(None, Some(2));
    assert_eq!(None, metadata.disc);
}

#[test]
fn artwork_format_follows_artwork() {
    let mut metadata = Metadata::default();
    metadata.set_artwork(Some(ArtworkImage::new(ArtworkFormat::Png, vec![0u8; 4])));
    assert_eq!(Some(ArtworkFormat::Png), metadata.artwork_format());
    metadata.set_artwork(Some(ArtworkImage::new(ArtworkFormat::Gif, vec![0u8; 4])));
    assert_eq!(Some(ArtworkFormat::Gif), metadata.artwork_format());
    assert!(metadata.take_artwork().is_some());
    assert_eq!(None, metadata.artwork_format());
}

#[test]
fn construct_with_artwork() {
    let artwork = ArtworkImage::new(ArtworkFormat::Jpeg, vec![0xff, 0xd8, 0xff]);
    let metadata = Metadata {
        title: "Title".to_owned(),
        artwork: Some(artwork.clone()),
        ..Default::default()
    };
    assert_eq!(Some(&artwork), metadata.artwork());
    assert_eq!(Some(ArtworkFormat::Jpeg), metadata.artwork_format());
    let copy = Metadata {
        title: "Other".to_owned(),
        ..metadata.clone()
    };
    assert_eq!(metadata.artwork, copy.artwork);
}
