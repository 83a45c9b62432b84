// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Records stored as raw payloads of freeform atoms.

use std::str::Utf8Error;

use thiserror::Error;

use crate::fmt::StoreHandle;

mod movie;
mod rating;

/// Namespace of all freeform atoms written by iTunes.
pub const ITUNES_NAMESPACE: &str = "com.apple.iTunes";

#[derive(Error, Debug)]
pub enum AtomParseError {
    #[error(transparent)]
    Utf8(#[from] Utf8Error),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type AtomParseResult<T> = Result<T, AtomParseError>;

impl<E: std::fmt::Debug> From<nom::Err<E>> for AtomParseError {
    fn from(err: nom::Err<E>) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// A record that is parsed from the payload of a freeform atom.
pub trait RawAtom: Sized {
    const NAMESPACE: &'static str = ITUNES_NAMESPACE;

    const NAME: &'static str;

    fn parse(payload: &[u8]) -> AtomParseResult<Self>;
}

/// Looks up a raw atom and parses its payload.
///
/// The `parser` is only invoked if the atom exists.
pub fn fetch_and_parse<H, R>(
    handle: &H,
    namespace: &str,
    name: &str,
    parser: impl FnOnce(&[u8]) -> R,
) -> Option<R>
where
    H: StoreHandle + ?Sized,
{
    let Some(payload) = handle.find_raw_atom(namespace, name) else {
        log::debug!("No raw atom {namespace}:{name}");
        return None;
    };
    Some(parser(&payload))
}

/// Fetches and parses a [`RawAtom`].
pub fn fetch<A, H>(handle: &H) -> Option<AtomParseResult<A>>
where
    A: RawAtom,
    H: StoreHandle + ?Sized,
{
    fetch_and_parse(handle, A::NAMESPACE, A::NAME, A::parse)
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
