// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn text_is_decoded_lossy() {
    let mut snapshot = TagSnapshot::new();
    snapshot.set(FieldId::Title, Some(&b"Intro"[..]));
    assert_eq!(Some("Intro".to_owned()), snapshot.text(FieldId::Title));
    snapshot.set(FieldId::Title, Some(&b"A\xffB"[..]));
    assert_eq!(Some("A\u{fffd}B".to_owned()), snapshot.text(FieldId::Title));
    snapshot.set(FieldId::Title, None::<Bytes>);
    assert_eq!(None, snapshot.text(FieldId::Title));
}

#[test]
fn fields_are_ordered() {
    let mut snapshot = TagSnapshot::new();
    snapshot.set(FieldId::Disc, Some(vec![0, 1, 0, 2]));
    snapshot.set(FieldId::Title, Some(&b"Intro"[..]));
    assert_eq!(
        vec![FieldId::Title, FieldId::Disc],
        snapshot.fields().collect::<Vec<_>>()
    );
}

#[test]
fn field_names() {
    assert_eq!("title", FieldId::Title.to_string());
    assert_eq!("media_store_country", FieldId::MediaStoreCountry.to_string());
    assert_eq!("is_hd_video", <&str>::from(FieldId::IsHdVideo));
}
