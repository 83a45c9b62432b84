// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Records stored in opaque, freeform atoms.
//!
//! Both records are read-only: they are materialized when reading
//! tags and never written back.

/// Content advisory rating from the `iTunEXTC` atom,
/// e.g. `mpaa|PG-13|300|`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RatingInfo {
    /// The rating system, e.g. `mpaa` or `us-tv`.
    pub source: String,

    /// The rating label within the rating system, e.g. `PG-13`.
    pub rating: String,

    /// Numeric value for ordering ratings across rating systems.
    pub sort_value: i32,

    /// Optional reason for the rating.
    pub annotation: Option<String>,
}

/// Movie credits from the `iTunMOVI` atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieInfo {
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub codirectors: Vec<String>,
    pub producers: Vec<String>,
    pub screenwriters: Vec<String>,
    pub studio: Option<String>,
}

impl MovieInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let Self {
            cast,
            directors,
            codirectors,
            producers,
            screenwriters,
            studio,
        } = self;
        cast.is_empty()
            && directors.is_empty()
            && codirectors.is_empty()
            && producers.is_empty()
            && screenwriters.is_empty()
            && studio.is_none()
    }
}
