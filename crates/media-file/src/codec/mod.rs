// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Encoding and decoding of scalar tag values.
//!
//! Scalars are exchanged with the store as regions of big-endian bytes
//! with the exact width of the value type. A missing region represents
//! a missing value.

use std::{cell::Cell, fmt, ops::Deref};

use bytes::BytesMut;

pub mod pair;

/// Scalar types with a fixed-width native representation.
pub trait Scalar: Copy + PartialEq + fmt::Debug {
    const WIDTH: usize;

    /// Writes exactly [`Self::WIDTH`] bytes.
    fn write_to(self, buf: &mut [u8]);

    /// Reads exactly [`Self::WIDTH`] bytes.
    fn read_from(buf: &[u8]) -> Self;
}

macro_rules! impl_scalar_int {
    ($ty:ty) => {
        impl Scalar for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn write_to(self, buf: &mut [u8]) {
                buf.copy_from_slice(&self.to_be_bytes());
            }

            fn read_from(buf: &[u8]) -> Self {
                let mut bytes = [0; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(buf);
                <$ty>::from_be_bytes(bytes)
            }
        }
    };
}

impl_scalar_int!(i16);
impl_scalar_int!(i32);
impl_scalar_int!(i64);
impl_scalar_int!(u8);

impl Scalar for bool {
    const WIDTH: usize = 1;

    fn write_to(self, buf: &mut [u8]) {
        buf[0] = u8::from(self);
    }

    fn read_from(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

/// Allocator for transient regions.
///
/// Keeps track of the regions that are currently alive. A region is
/// released when dropped, no matter how the surrounding code exits.
#[derive(Debug, Default)]
pub struct Scratch {
    live: Cell<usize>,
    allocated: Cell<usize>,
}

impl Scratch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            live: Cell::new(0),
            allocated: Cell::new(0),
        }
    }

    /// Allocates a zero-initialized region of `len` bytes.
    #[must_use]
    pub fn alloc(&self, len: usize) -> Region<'_> {
        self.live.set(self.live.get() + 1);
        self.allocated.set(self.allocated.get() + 1);
        Region {
            scratch: self,
            bytes: BytesMut::zeroed(len),
        }
    }

    /// Number of regions that have not been released yet.
    #[must_use]
    pub fn live_regions(&self) -> usize {
        self.live.get()
    }

    /// Number of regions allocated so far.
    #[must_use]
    pub fn total_allocations(&self) -> usize {
        self.allocated.get()
    }
}

/// A transient buffer that is handed to a single commit call.
pub struct Region<'a> {
    scratch: &'a Scratch,
    bytes: BytesMut,
}

impl Region<'_> {
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Deref for Region<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Region").field(&self.bytes.as_ref()).finish()
    }
}

impl Drop for Region<'_> {
    fn drop(&mut self) {
        let live = self.scratch.live.get();
        debug_assert!(live > 0);
        self.scratch.live.set(live.saturating_sub(1));
    }
}

/// Decodes an optional region.
///
/// Regions of an unexpected width are treated as missing.
#[must_use]
pub fn decode<T: Scalar>(region: Option<&[u8]>) -> Option<T> {
    let region = region?;
    if region.len() != T::WIDTH {
        log::warn!(
            "Ignoring region of {len} byte(s), expected {width}",
            len = region.len(),
            width = T::WIDTH,
        );
        return None;
    }
    Some(T::read_from(region))
}

/// Encodes a single value into a transient region and commits it.
///
/// A region is only allocated for a present value. A missing value is
/// committed as `None`. The region is released right after `commit`
/// returns or unwinds.
pub fn encode_and_commit<T, F>(scratch: &Scratch, value: Option<T>, commit: F) -> bool
where
    T: Scalar,
    F: FnOnce(Option<&[u8]>) -> bool,
{
    let Some(value) = value else {
        return commit(None);
    };
    let mut region = scratch.alloc(T::WIDTH);
    value.write_to(region.as_mut_slice());
    commit(Some(&region[..]))
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
