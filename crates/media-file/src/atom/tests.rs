// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use tagsync_core::atom::{MovieInfo, RatingInfo};

use super::*;
use crate::{
    fmt::{TagStore as _, memory::MemoryStore},
    tag::TagSnapshot,
};

const MOVIE_INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>cast</key>
	<array>
		<dict>
			<key>name</key>
			<string>Jane Doe</string>
		</dict>
		<dict>
			<key>name</key>
			<string>John Roe</string>
			<key>tag</key>
			<string>lead</string>
		</dict>
	</array>
	<key>directors</key>
	<array>
		<dict>
			<key>name</key>
			<string>Ann Smith</string>
		</dict>
	</array>
	<key>codirectors</key>
	<array/>
	<key>screenwriters</key>
	<array>
		<dict>
			<key>name</key>
			<string>Tom &amp; Jerry</string>
		</dict>
	</array>
	<key>studio</key>
	<string>Example Pictures</string>
	<key>asset-info</key>
	<dict>
		<key>flavor</key>
		<string>1:720p</string>
		<key>file-size</key>
		<integer>1234567</integer>
		<key>hd</key>
		<true/>
	</dict>
</dict>
</plist>
"#;

#[test]
fn parse_rating_info() {
    assert_eq!(
        RatingInfo {
            source: "mpaa".to_owned(),
            rating: "PG-13".to_owned(),
            sort_value: 300,
            annotation: None,
        },
        RatingInfo::parse(b"mpaa|PG-13|300|").unwrap()
    );
    assert_eq!(
        RatingInfo {
            source: "us-tv".to_owned(),
            rating: "TV-MA".to_owned(),
            sort_value: 600,
            annotation: Some("Violence".to_owned()),
        },
        RatingInfo::parse(b"us-tv|TV-MA|600|Violence").unwrap()
    );
    // Without trailing separator
    assert_eq!(
        300,
        RatingInfo::parse(b"mpaa|PG-13|300").unwrap().sort_value
    );
}

#[test]
fn parse_rating_info_malformed() {
    assert!(RatingInfo::parse(b"").is_err());
    assert!(RatingInfo::parse(b"mpaa|PG-13").is_err());
    assert!(RatingInfo::parse(b"mpaa|PG-13|high|").is_err());
    assert!(RatingInfo::parse(b"|PG-13|300|").is_err());
    assert!(matches!(
        RatingInfo::parse(b"mpaa|\xff|300|"),
        Err(AtomParseError::Utf8(_))
    ));
}

#[test]
fn parse_movie_info() {
    let movie_info = MovieInfo::parse(MOVIE_INFO_PLIST.as_bytes()).unwrap();
    assert_eq!(
        MovieInfo {
            cast: vec!["Jane Doe".to_owned(), "John Roe".to_owned()],
            directors: vec!["Ann Smith".to_owned()],
            codirectors: vec![],
            producers: vec![],
            screenwriters: vec!["Tom & Jerry".to_owned()],
            studio: Some("Example Pictures".to_owned()),
        },
        movie_info
    );
}

#[test]
fn parse_movie_info_empty_dict() {
    let movie_info = MovieInfo::parse(b"<plist version=\"1.0\"><dict/></plist>").unwrap();
    assert!(movie_info.is_empty());
}

#[test]
fn parse_movie_info_malformed() {
    assert!(MovieInfo::parse(b"").is_err());
    assert!(MovieInfo::parse(b"<plist version=\"1.0\"><dict><key>cast</key>").is_err());
    assert!(
        MovieInfo::parse(b"<plist version=\"1.0\"><array/></plist>").is_err(),
        "root must be a dictionary"
    );
    assert!(MovieInfo::parse(b"mpaa|PG-13|300|").is_err());
}

#[test]
fn fetch_and_parse_missing_atom() {
    let store = MemoryStore::new(TagSnapshot::new());
    let handle = store.open_read(Path::new("test.m4a")).unwrap();
    let parsed = fetch_and_parse(&handle, ITUNES_NAMESPACE, RatingInfo::NAME, |_| {
        unreachable!("parser must not be invoked");
    });
    assert!(parsed.is_none());
}

#[test]
fn fetch_and_parse_invokes_parser_once() {
    let store = MemoryStore::new(TagSnapshot::new());
    store.set_raw_atom(ITUNES_NAMESPACE, "iTunEXTC", &b"mpaa|R|400|"[..]);
    let handle = store.open_read(Path::new("test.m4a")).unwrap();
    let mut invocations = 0;
    let parsed = fetch_and_parse(&handle, ITUNES_NAMESPACE, "iTunEXTC", |payload| {
        invocations += 1;
        payload.len()
    });
    assert_eq!(Some(11), parsed);
    assert_eq!(1, invocations);
}

#[test]
fn fetch_typed_atoms_independently() {
    let store = MemoryStore::new(TagSnapshot::new());
    store.set_raw_atom(ITUNES_NAMESPACE, RatingInfo::NAME, &b"mpaa|R|400|"[..]);
    store.set_raw_atom(ITUNES_NAMESPACE, MovieInfo::NAME, &b"<plist>"[..]);
    let handle = store.open_read(Path::new("test.m4a")).unwrap();
    assert_eq!(
        "R",
        fetch::<RatingInfo, _>(&handle).unwrap().unwrap().rating
    );
    assert!(fetch::<MovieInfo, _>(&handle).unwrap().is_err());
}

#[test]
fn parse_movie_info_character_references() {
    let movie_info = MovieInfo::parse(
        b"<plist version=\"1.0\"><dict><key>studio</key><string>Tom &#38; Jerry &#x26; Co &lt;&#xE9;&gt;</string></dict></plist>",
    )
    .unwrap();
    assert_eq!(Some("Tom & Jerry & Co <\u{e9}>"), movie_info.studio.as_deref());
    // Unknown or broken references are kept
    let movie_info = MovieInfo::parse(
        b"<plist version=\"1.0\"><dict><key>studio</key><string>A &nbsp; B &#xD800; &</string></dict></plist>",
    )
    .unwrap();
    assert_eq!(Some("A &nbsp; B &#xD800; &"), movie_info.studio.as_deref());
}

#[test]
fn parse_movie_info_nested_arrays() {
    let nested = |depth: usize| {
        let mut plist = "<plist version=\"1.0\"><dict><key>cast</key>".to_owned();
        plist.push_str(&"<array>".repeat(depth));
        plist.push_str(&"</array>".repeat(depth));
        plist.push_str("</dict></plist>");
        plist
    };
    assert!(MovieInfo::parse(nested(8).as_bytes()).unwrap().is_empty());
    assert!(matches!(
        MovieInfo::parse(nested(64).as_bytes()),
        Err(AtomParseError::Malformed(_))
    ));
}

#[test]
fn parse_movie_info_deeply_nested_garbage() {
    let mut payload = "<plist>".to_owned();
    payload.push_str(&"<array>".repeat(20_000));
    assert!(MovieInfo::parse(payload.as_bytes()).is_err());
}
