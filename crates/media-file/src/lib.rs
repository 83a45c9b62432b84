// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

// Opt-in for allowed-by-default lints (in alphabetical order)
// See also: <https://doc.rust-lang.org/rustc/lints>
#![warn(future_incompatible)]
#![warn(let_underscore)]
#![warn(missing_debug_implementations)]
//#![warn(missing_docs)] // TODO
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(unused)]
// Clippy lints
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]
// Using wildcard imports consciously is acceptable.
#![allow(clippy::wildcard_imports)]
// Importing all enum variants into a narrow, local scope is acceptable.
#![allow(clippy::enum_glob_use)]
// TODO: Add missing docs
#![allow(clippy::missing_errors_doc)]

pub mod atom;
pub mod codec;
pub mod fmt;
pub mod io;
pub mod tag;

use std::{io::Error as IoError, path::PathBuf, result::Result as StdResult};

use image::ImageError;
use lofty::error::LoftyError;
use strum::Display;
use thiserror::Error;

use tagsync_core::artwork::ArtworkImageError;

use self::tag::FieldId;

/// Store operations that could fail as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Open,
    Fetch,
    Persist,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid file path {0:?}")]
    InvalidPath(PathBuf),

    #[error("failed to {operation} tags: {source}")]
    Store {
        operation: Operation,
        source: Box<Error>,
    },

    #[error("failed to commit {0}")]
    Commit(FieldId),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Metadata(anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    #[must_use]
    pub fn store(operation: Operation, source: Self) -> Self {
        Self::Store {
            operation,
            source: Box::new(source),
        }
    }

    /// The store operation that failed, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Store { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

pub type Result<T> = StdResult<T, Error>;

impl From<LoftyError> for Error {
    fn from(err: LoftyError) -> Self {
        Self::Metadata(err.into())
    }
}

impl From<ImageError> for Error {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(err) => Self::Io(err),
            _ => Self::Metadata(err.into()),
        }
    }
}

impl From<ArtworkImageError> for Error {
    fn from(err: ArtworkImageError) -> Self {
        match err {
            ArtworkImageError::UnsupportedFormat(image_format) => Self::Metadata(anyhow::anyhow!(
                "unsupported artwork image format: {image_format:?}"
            )),
            ArtworkImageError::Image(err) => err.into(),
        }
    }
}

pub mod prelude {
    pub use super::{
        Error, Operation, Result,
        io::{MediaFile, ReadOutcome, SyncConfig, SyncFlags, WriteOutcome, WritePolicy},
        tag::FieldId,
    };
}
