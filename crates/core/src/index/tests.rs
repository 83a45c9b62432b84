// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn from_parts_requires_both_sides() {
    assert_eq!(
        Some(IndexPair::new(3, 3)),
        IndexPair::from_parts(Some(3), Some(3))
    );
    assert_eq!(None, IndexPair::from_parts(Some(3), None));
    assert_eq!(None, IndexPair::from_parts(None, Some(3)));
    assert_eq!(None, IndexPair::from_parts(None, None));
}

#[test]
fn validate() {
    assert!(IndexPair::new(4, 12).is_valid());
    assert!(IndexPair::new(12, 12).is_valid());
    // Unknown total
    assert!(IndexPair::new(4, 0).is_valid());
    assert!(!IndexPair::new(13, 12).is_valid());
}

#[test]
fn display() {
    assert_eq!("4/12", IndexPair::new(4, 12).to_string());
    assert_eq!("4", IndexPair::new(4, 0).to_string());
}
