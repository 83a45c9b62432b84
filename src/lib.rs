// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Selective synchronization of MP4 metadata.
//!
//! Reads the tags of a media file into an editable [`Metadata`](crate::core::Metadata)
//! model and writes back only the fields that have actually changed.

pub use tagsync_core as core;

#[cfg(feature = "media-file")]
pub use tagsync_media_file as media_file;

pub mod prelude {
    pub use tagsync_core::prelude::*;

    #[cfg(feature = "media-file")]
    pub use tagsync_media_file::prelude::*;
}
