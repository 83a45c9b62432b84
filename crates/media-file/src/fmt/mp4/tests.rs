// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::Write as _;

use tagsync_core::prelude::*;

use super::*;
use crate::{fmt::OpenHandle, io::MediaFile};

fn mp4_box(kind: &[u8; 4], content: &[u8]) -> Vec<u8> {
    let size = u32::try_from(8 + content.len()).unwrap();
    let mut bytes = size.to_be_bytes().to_vec();
    bytes.extend_from_slice(kind);
    bytes.extend_from_slice(content);
    bytes
}

/// An MPEG-4 file without any tracks and tags.
fn empty_mp4_file() -> tempfile::NamedTempFile {
    let ftyp = mp4_box(b"ftyp", b"M4A \0\0\0\0M4A isom");
    let mut mvhd = Vec::with_capacity(100);
    // Version, flags, creation and modification time
    mvhd.extend_from_slice(&[0; 12]);
    // Time scale and duration
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&0u32.to_be_bytes());
    // Rate and volume
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes());
    mvhd.extend_from_slice(&[0; 10]);
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend_from_slice(&value.to_be_bytes());
    }
    mvhd.extend_from_slice(&[0; 24]);
    // Next track id
    mvhd.extend_from_slice(&1u32.to_be_bytes());
    debug_assert_eq!(100, mvhd.len());
    let moov = mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd));
    let mut file = tempfile::Builder::new().suffix(".m4a").tempfile().unwrap();
    file.write_all(&ftyp).unwrap();
    file.write_all(&moov).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn integer_widths_match_the_model() {
    for &field in FieldId::VARIANTS {
        let expected_width = match field {
            FieldId::GenreType | FieldId::Tempo => Some(2),
            FieldId::IsCompilation
            | FieldId::IsPodcast
            | FieldId::IsHdVideo
            | FieldId::IsGapless
            | FieldId::MediaKind
            | FieldId::ContentRating
            | FieldId::MediaStoreAccountKind => Some(1),
            FieldId::SeasonNumber
            | FieldId::EpisodeNumber
            | FieldId::MediaStoreCountry
            | FieldId::ContentId
            | FieldId::ArtistId
            | FieldId::GenreId
            | FieldId::ComposerId => Some(4),
            FieldId::PlaylistId => Some(8),
            _ => None,
        };
        let width = match layout(field) {
            Layout::Integer(_, width) => Some(width),
            _ => None,
        };
        assert_eq!(expected_width, width, "{field}");
    }
}

#[test]
fn fourccs_are_unique() {
    let mut fourccs = FieldId::VARIANTS
        .iter()
        .filter_map(|&field| match layout(field) {
            Layout::Text(fourcc) | Layout::Integer(fourcc, _) => Some(fourcc),
            Layout::Pair | Layout::Artwork => None,
        })
        .collect::<Vec<_>>();
    let count = fourccs.len();
    fourccs.sort_unstable();
    fourccs.dedup();
    assert_eq!(count, fourccs.len());
}

#[test]
fn sign_extension() {
    assert_eq!(Some(-1), be_signed(&[0xff]));
    assert_eq!(Some(127), be_signed(&[0x7f]));
    assert_eq!(Some(-2), be_signed(&[0xff, 0xfe]));
    assert_eq!(Some(0x0102_0304), be_signed(&[1, 2, 3, 4]));
    assert_eq!(None, be_signed(&[]));
    assert_eq!(None, be_signed(&[0; 9]));
}

#[test]
fn integers_are_resized_to_the_field_width() {
    assert_eq!(Some(vec![0x00, 0x78]), integer_to_region(120, 2));
    assert_eq!(Some(vec![0xff]), integer_to_region(255, 1));
    assert_eq!(Some(vec![0xff]), integer_to_region(-1, 1));
    assert_eq!(Some(vec![0, 2, 0x30, 0x51]), integer_to_region(143_441, 4));
    assert_eq!(None, integer_to_region(256, 1));
    assert_eq!(None, integer_to_region(0x8000, 2));
    assert_eq!(None, integer_to_region(1, 3));
}

#[test]
fn integer_data_to_region() {
    assert_eq!(
        Some(vec![0, 0, 0, 7]),
        data_to_region(&AtomData::SignedInteger(7), 4)
    );
    assert_eq!(
        Some(vec![9]),
        data_to_region(&AtomData::UnsignedInteger(9), 1)
    );
    assert_eq!(Some(vec![1]), data_to_region(&AtomData::Bool(true), 1));
    assert_eq!(
        Some(vec![0, 0, 0, 0, 0, 0, 0, 42]),
        data_to_region(
            &AtomData::Unknown {
                code: DataType::BeSignedInteger,
                data: vec![0, 0, 0, 0, 0, 0, 0, 42],
            },
            8
        )
    );
    // Narrower native data is widened
    assert_eq!(
        Some(vec![0, 0, 0, 0, 0, 0, 0, 42]),
        data_to_region(
            &AtomData::Unknown {
                code: DataType::BeSignedInteger,
                data: vec![0, 0, 0, 42],
            },
            8
        )
    );
    assert_eq!(
        None,
        data_to_region(&AtomData::UTF8("128".to_owned()), 2)
    );
}

#[test]
fn artwork_format_mapping() {
    for format in [
        ArtworkFormat::Bmp,
        ArtworkFormat::Gif,
        ArtworkFormat::Jpeg,
        ArtworkFormat::Png,
    ] {
        let mime_type = mime_type_from_artwork_format(format);
        assert!(mime_type.is_some());
        assert_eq!(
            format,
            artwork_format_from_mime_type(mime_type.as_ref(), &[])
        );
    }
    assert_eq!(None, mime_type_from_artwork_format(ArtworkFormat::Unknown));
}

#[test]
fn open_fails_for_non_mp4_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"This is not an MPEG-4 file").unwrap();
    file.flush().unwrap();
    assert!(Mp4Store.open_read(file.path()).is_err());
    assert!(Mp4Store.open_modify(file.path()).is_err());
}

#[test]
fn open_fails_for_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.m4a");
    assert!(matches!(
        Mp4Store.open_read(&path),
        Err(crate::Error::Io(_))
    ));
}

#[test]
fn empty_file_has_no_tags() {
    let file = empty_mp4_file();
    let mut handle = OpenHandle::new(Mp4Store.open_read(file.path()).unwrap());
    let snapshot = handle.fetch_tags().unwrap();
    assert_eq!(TagSnapshot::new(), snapshot);
    assert!(handle.find_raw_atom("com.apple.iTunes", "iTunEXTC").is_none());
}

#[test]
fn genre_type_is_stored_as_is() {
    let file = empty_mp4_file();
    {
        let mut handle = OpenHandle::new(Mp4Store.open_modify(file.path()).unwrap());
        assert!(handle.commit(FieldId::GenreType, Some(&[0x00, 0x11][..])));
        handle.persist().unwrap();
    }
    let mut handle = OpenHandle::new(Mp4Store.open_read(file.path()).unwrap());
    let snapshot = handle.fetch_tags().unwrap();
    assert_eq!(Some(&[0x00, 0x11][..]), snapshot.get(FieldId::GenreType));
    assert_eq!(None, snapshot.get(FieldId::Genre));
}

#[test]
fn read_only_handle_rejects_commits() {
    let file = empty_mp4_file();
    let mut handle = OpenHandle::new(Mp4Store.open_read(file.path()).unwrap());
    assert!(!handle.commit(FieldId::Title, Some(&b"Title"[..])));
    assert!(handle.persist().is_err());
}

#[test]
fn write_and_read_back_each_layout() {
    let file = empty_mp4_file();
    let mut metadata = Metadata {
        title: "Title".to_owned(),
        genre_type: Some(17),
        tempo: Some(-120),
        is_compilation: Some(true),
        media_kind: MediaKind::Movie,
        media_store_country: Country::Germany,
        playlist_id: Some(9_876_543_210),
        artwork: Some(ArtworkImage::new(
            ArtworkFormat::Png,
            b"\x89PNG\r\n\x1a\n".to_vec(),
        )),
        ..Default::default()
    };
    metadata.set_track_parts(Some(4), Some(12));
    metadata.set_disc_parts(Some(1), Some(2));

    let mut media_file = MediaFile::open(file.path()).unwrap();
    *media_file.metadata_mut() = metadata.clone();
    let outcome = media_file.write_tags().unwrap();
    assert!(outcome.is_complete());
    assert_eq!(10, outcome.committed.len());

    let mut media_file = MediaFile::open(file.path()).unwrap();
    let outcome = media_file.read_tags().unwrap();
    assert!(outcome.issues.is_empty());
    assert_eq!(
        Metadata {
            artwork_count: 1,
            ..metadata
        },
        *media_file.metadata()
    );
    assert!(media_file.metadata().genre.is_empty());

    // Unmodified
    assert!(media_file.write_tags().unwrap().is_unchanged());

    media_file.metadata_mut().set_artwork(None);
    media_file.metadata_mut().tempo = None;
    let outcome = media_file.write_tags().unwrap();
    assert_eq!(vec![FieldId::Tempo, FieldId::Artwork], outcome.committed);

    let mut media_file = MediaFile::open(file.path()).unwrap();
    media_file.read_tags().unwrap();
    let metadata = media_file.metadata();
    assert!(metadata.artwork().is_none());
    assert_eq!(0, metadata.artwork_count);
    assert_eq!(None, metadata.tempo);
    assert_eq!(Some(17), metadata.genre_type);
    assert_eq!(Some(9_876_543_210), metadata.playlist_id);
    assert!(media_file.write_tags().unwrap().is_unchanged());
}
