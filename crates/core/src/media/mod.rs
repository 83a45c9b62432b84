// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Enumerated iTunes tag values.
//!
//! Each enum reserves a `NotSet` variant that stands for a missing atom.
//! It is never written as a value.

use strum::FromRepr;

/// Mapping between an enum and its native representation.
pub trait NativeEnum: Copy + Eq + Sized {
    type Repr: Copy;

    /// The variant that represents an absent native value.
    const NOT_SET: Self;

    /// Unknown values are mapped onto [`Self::NOT_SET`].
    #[must_use]
    fn from_native(repr: Option<Self::Repr>) -> Self;

    #[must_use]
    fn to_native(self) -> Option<Self::Repr>;

    #[must_use]
    fn is_not_set(self) -> bool {
        self == Self::NOT_SET
    }
}

macro_rules! impl_native_enum {
    ($ty:ty, $repr:ty) => {
        impl NativeEnum for $ty {
            type Repr = $repr;

            const NOT_SET: Self = Self::NotSet;

            fn from_native(repr: Option<Self::Repr>) -> Self {
                repr.and_then(Self::from_repr).unwrap_or(Self::NotSet)
            }

            fn to_native(self) -> Option<Self::Repr> {
                (self != Self::NotSet).then_some(self as $repr)
            }
        }
    };
}

/// The `stik` atom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum MediaKind {
    HomeVideo = 0,
    Music = 1,
    Audiobook = 2,
    MusicVideo = 6,
    Movie = 9,
    TvShow = 10,
    Booklet = 11,
    Ringtone = 14,
    Podcast = 21,
    ITunesU = 23,
    #[default]
    NotSet = 0xff,
}

impl_native_enum!(MediaKind, u8);

/// The `rtng` atom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum ContentRating {
    Inoffensive = 0,
    Explicit = 1,
    Clean = 2,
    // Written by older versions of iTunes
    ExplicitLegacy = 4,
    #[default]
    NotSet = 0xff,
}

impl_native_enum!(ContentRating, u8);

/// The `akID` atom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum MediaStoreAccountKind {
    ITunes = 0,
    Aol = 1,
    #[default]
    NotSet = 0xff,
}

impl_native_enum!(MediaStoreAccountKind, u8);

/// Storefront identifiers of the `sfID` atom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromRepr)]
#[repr(i32)]
pub enum Country {
    #[default]
    NotSet = 0,
    UnitedStates = 143_441,
    France = 143_442,
    Germany = 143_443,
    UnitedKingdom = 143_444,
    Austria = 143_445,
    Belgium = 143_446,
    Finland = 143_447,
    Greece = 143_448,
    Ireland = 143_449,
    Italy = 143_450,
    Luxembourg = 143_451,
    Netherlands = 143_452,
    Portugal = 143_453,
    Spain = 143_454,
    Canada = 143_455,
    Sweden = 143_456,
    Norway = 143_457,
    Denmark = 143_458,
    Switzerland = 143_459,
    Australia = 143_460,
    NewZealand = 143_461,
    Japan = 143_462,
}

impl_native_enum!(Country, i32);

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
