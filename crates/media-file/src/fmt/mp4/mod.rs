// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! MPEG-4 files with iTunes-style `ilst` atoms.

use std::{
    borrow::Cow,
    fmt,
    fs::{File, OpenOptions},
    io::Seek as _,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use bytes::Bytes;
use lofty::{
    config::{ParseOptions, WriteOptions},
    file::AudioFile,
    mp4::{Atom, AtomData, AtomIdent, DataType, Ilst, Mp4File},
    picture::{MimeType, Picture, PictureType},
    tag::Accessor as _,
};
use strum::VariantArray as _;

use tagsync_core::artwork::ArtworkFormat;

use crate::{
    Result,
    codec::pair::PAIR_WIDTH,
    tag::{ArtworkRef, FieldId, NativeArtwork, TagSnapshot, field::CommitSurface},
};

use super::{StoreHandle, TagStore};

const COVR_IDENT: AtomIdent<'_> = AtomIdent::Fourcc(*b"covr");

const TRKN_IDENT: AtomIdent<'_> = AtomIdent::Fourcc(*b"trkn");

const DISK_IDENT: AtomIdent<'_> = AtomIdent::Fourcc(*b"disk");

/// How a field is stored in the `ilst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Text([u8; 4]),
    /// Big-endian integer with the given width in bytes.
    Integer([u8; 4], usize),
    Pair,
    Artwork,
}

#[allow(clippy::too_many_lines)]
const fn layout(field: FieldId) -> Layout {
    use FieldId::*;
    use Layout::{Integer, Pair, Text};
    match field {
        Title => Text(*b"\xa9nam"),
        Artist => Text(*b"\xa9ART"),
        Album => Text(*b"\xa9alb"),
        AlbumArtist => Text(*b"aART"),
        Grouping => Text(*b"\xa9grp"),
        Composer => Text(*b"\xa9wrt"),
        Comment => Text(*b"\xa9cmt"),
        Genre => Text(*b"\xa9gen"),
        GenreType => Integer(*b"gnre", 2),
        ReleaseDate => Text(*b"\xa9day"),
        Tempo => Integer(*b"tmpo", 2),
        IsCompilation => Integer(*b"cpil", 1),
        TvShow => Text(*b"tvsh"),
        TvNetwork => Text(*b"tvnn"),
        EpisodeId => Text(*b"tven"),
        SeasonNumber => Integer(*b"tvsn", 4),
        EpisodeNumber => Integer(*b"tves", 4),
        Description => Text(*b"desc"),
        LongDescription => Text(*b"ldes"),
        Lyrics => Text(*b"\xa9lyr"),
        SortName => Text(*b"sonm"),
        SortArtist => Text(*b"soar"),
        SortAlbum => Text(*b"soal"),
        SortAlbumArtist => Text(*b"soaa"),
        SortComposer => Text(*b"soco"),
        SortTvShow => Text(*b"sosn"),
        Copyright => Text(*b"cprt"),
        EncodingTool => Text(*b"\xa9too"),
        EncodedBy => Text(*b"\xa9enc"),
        PurchaseDate => Text(*b"purd"),
        IsPodcast => Integer(*b"pcst", 1),
        Keywords => Text(*b"keyw"),
        Category => Text(*b"catg"),
        IsHdVideo => Integer(*b"hdvd", 1),
        MediaKind => Integer(*b"stik", 1),
        ContentRating => Integer(*b"rtng", 1),
        IsGapless => Integer(*b"pgap", 1),
        MediaStoreAccount => Text(*b"apID"),
        MediaStoreAccountKind => Integer(*b"akID", 1),
        MediaStoreCountry => Integer(*b"sfID", 4),
        ContentId => Integer(*b"cnID", 4),
        ArtistId => Integer(*b"atID", 4),
        PlaylistId => Integer(*b"plID", 8),
        GenreId => Integer(*b"geID", 4),
        ComposerId => Integer(*b"cmID", 4),
        Xid => Text(*b"xid "),
        Track | Disc => Pair,
        Artwork => Layout::Artwork,
    }
}

/// Sign-extends up to 8 big-endian bytes.
fn be_signed(bytes: &[u8]) -> Option<i64> {
    let len = bytes.len();
    if len == 0 || len > 8 {
        return None;
    }
    let mut buf = if bytes[0] & 0x80 == 0 {
        [0x00; 8]
    } else {
        [0xff; 8]
    };
    buf[8 - len..].copy_from_slice(bytes);
    Some(i64::from_be_bytes(buf))
}

/// Encodes an integer into a region of exactly `width` bytes.
///
/// Single bytes are accepted both signed and unsigned.
fn integer_to_region(value: i64, width: usize) -> Option<Vec<u8>> {
    let fits = match width {
        1 => (-0x80..=0xff).contains(&value),
        2 => i16::try_from(value).is_ok(),
        4 => i32::try_from(value).is_ok(),
        8 => true,
        _ => false,
    };
    if !fits {
        return None;
    }
    Some(value.to_be_bytes()[8 - width..].to_vec())
}

/// Converts integer data into a region of exactly `width` bytes.
fn data_to_region(data: &AtomData, width: usize) -> Option<Vec<u8>> {
    let value = match data {
        AtomData::SignedInteger(value) => i64::from(*value),
        AtomData::UnsignedInteger(value) => i64::from(*value),
        AtomData::Bool(value) => i64::from(*value),
        AtomData::Unknown { data, .. } => {
            if data.len() == width {
                return Some(data.clone());
            }
            be_signed(data)?
        }
        _ => return None,
    };
    integer_to_region(value, width)
}

fn artwork_format_from_mime_type(mime_type: Option<&MimeType>, data: &[u8]) -> ArtworkFormat {
    match mime_type {
        Some(MimeType::Bmp) => ArtworkFormat::Bmp,
        Some(MimeType::Gif) => ArtworkFormat::Gif,
        Some(MimeType::Jpeg) => ArtworkFormat::Jpeg,
        Some(MimeType::Png) => ArtworkFormat::Png,
        _ => ArtworkFormat::guess(data),
    }
}

const fn mime_type_from_artwork_format(format: ArtworkFormat) -> Option<MimeType> {
    match format {
        ArtworkFormat::Bmp => Some(MimeType::Bmp),
        ArtworkFormat::Gif => Some(MimeType::Gif),
        ArtworkFormat::Jpeg => Some(MimeType::Jpeg),
        ArtworkFormat::Png => Some(MimeType::Png),
        ArtworkFormat::Unknown => None,
    }
}

/// Keeps all atoms as stored, e.g. `gnre` must not be converted into `©gen`.
fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .implicit_conversions(false)
}

/// [`TagStore`] for MPEG-4 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4Store;

impl Mp4Store {
    fn open(path: &Path, mut file: File, writable: bool) -> Result<Mp4Handle> {
        let mut mp4_file = <Mp4File as AudioFile>::read_from(&mut file, parse_options())?;
        let ilst = mp4_file.ilst_mut().map(std::mem::take).unwrap_or_default();
        log::debug!("Opened {}", path.display());
        Ok(Mp4Handle {
            path: path.to_path_buf(),
            file: Some(file),
            mp4_file,
            ilst,
            writable,
        })
    }
}

impl TagStore for Mp4Store {
    type Handle = Mp4Handle;

    fn open_read(&self, path: &Path) -> Result<Self::Handle> {
        let file = File::open(path)?;
        Self::open(path, file, false)
    }

    fn open_modify(&self, path: &Path) -> Result<Self::Handle> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::open(path, file, true)
    }
}

/// Handle of an open MPEG-4 file.
///
/// All commits modify a detached copy of the `ilst` that is only
/// written back into the file when persisting.
pub struct Mp4Handle {
    path: PathBuf,
    file: Option<File>,
    mp4_file: Mp4File,
    ilst: Ilst,
    writable: bool,
}

impl Mp4Handle {
    fn first_data(&self, ident: &AtomIdent<'_>) -> Option<&AtomData> {
        self.ilst.get(ident).and_then(|atom| atom.data().next())
    }

    fn text(&self, fourcc: [u8; 4]) -> Option<&str> {
        let atom = self.ilst.get(&AtomIdent::Fourcc(fourcc))?;
        atom.data().find_map(|data| match data {
            AtomData::UTF8(text) | AtomData::UTF16(text) => Some(text.as_str()),
            _ => None,
        })
    }

    fn integer_region(&self, field: FieldId, fourcc: [u8; 4], width: usize) -> Option<Vec<u8>> {
        let data = self.first_data(&AtomIdent::Fourcc(fourcc))?;
        let region = data_to_region(data, width);
        if region.is_none() {
            log::warn!("Ignoring unexpected data of {field}: {data:?}");
        }
        region
    }

    fn pair_region(&self, field: FieldId) -> Option<Vec<u8>> {
        let (index, total) = match field {
            FieldId::Track => (self.ilst.track(), self.ilst.track_total()),
            FieldId::Disc => (self.ilst.disk(), self.ilst.disk_total()),
            _ => unreachable!(),
        };
        if index.is_none() && total.is_none() {
            return None;
        }
        let (Ok(index), Ok(total)) = (
            u16::try_from(index.unwrap_or_default()),
            u16::try_from(total.unwrap_or_default()),
        ) else {
            log::warn!("Ignoring {field} out of range: {index:?}/{total:?}");
            return None;
        };
        let mut region = Vec::with_capacity(PAIR_WIDTH);
        region.extend_from_slice(&index.to_be_bytes());
        region.extend_from_slice(&total.to_be_bytes());
        Some(region)
    }

    fn artworks(&self) -> impl Iterator<Item = &Picture> {
        self.ilst
            .get(&COVR_IDENT)
            .into_iter()
            .flat_map(|atom| atom.data())
            .filter_map(|data| match data {
                AtomData::Picture(picture) => Some(picture),
                _ => None,
            })
    }

    fn remove(&mut self, ident: &AtomIdent<'_>) {
        self.ilst.remove(ident).for_each(drop);
    }

    fn commit_pair(&mut self, field: FieldId, region: Option<&[u8]>) -> bool {
        let ident = match field {
            FieldId::Track => TRKN_IDENT,
            FieldId::Disc => DISK_IDENT,
            _ => unreachable!(),
        };
        self.remove(&ident);
        let Some(region) = region else {
            return true;
        };
        let &[i0, i1, t0, t1] = region else {
            log::warn!("Rejecting {field} region of {len} byte(s)", len = region.len());
            return false;
        };
        let index = u32::from(u16::from_be_bytes([i0, i1]));
        let total = u32::from(u16::from_be_bytes([t0, t1]));
        if field == FieldId::Track {
            self.ilst.set_track(index);
            self.ilst.set_track_total(total);
        } else {
            self.ilst.set_disk(index);
            self.ilst.set_disk_total(total);
        }
        true
    }
}

impl fmt::Debug for Mp4Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mp4Handle")
            .field("path", &self.path)
            .field("writable", &self.writable)
            .field("closed", &self.file.is_none())
            .finish_non_exhaustive()
    }
}

impl CommitSurface for Mp4Handle {
    fn commit(&mut self, field: FieldId, region: Option<&[u8]>) -> bool {
        if !self.writable {
            log::warn!("Cannot commit {field} into read-only {}", self.path.display());
            return false;
        }
        match layout(field) {
            Layout::Text(fourcc) => {
                let ident = AtomIdent::Fourcc(fourcc);
                let Some(region) = region else {
                    self.remove(&ident);
                    return true;
                };
                let Ok(text) = std::str::from_utf8(region) else {
                    log::warn!("Rejecting invalid UTF-8 text of {field}");
                    return false;
                };
                self.ilst
                    .replace_atom(Atom::new(ident, AtomData::UTF8(text.to_owned())));
                true
            }
            Layout::Integer(fourcc, width) => {
                let ident = AtomIdent::Fourcc(fourcc);
                let Some(region) = region else {
                    self.remove(&ident);
                    return true;
                };
                if region.len() != width {
                    log::warn!(
                        "Rejecting {field} region of {len} byte(s), expected {width}",
                        len = region.len()
                    );
                    return false;
                }
                let data = AtomData::Unknown {
                    code: DataType::BeSignedInteger,
                    data: region.to_vec(),
                };
                self.ilst.replace_atom(Atom::new(ident, data));
                true
            }
            Layout::Pair => self.commit_pair(field, region),
            Layout::Artwork => {
                log::warn!("Artwork must be committed as a picture");
                false
            }
        }
    }

    fn commit_artwork(&mut self, artwork: Option<ArtworkRef<'_>>) -> bool {
        if !self.writable {
            log::warn!("Cannot commit artwork into read-only {}", self.path.display());
            return false;
        }
        let Some(ArtworkRef { format, data }) = artwork else {
            self.remove(&COVR_IDENT);
            return true;
        };
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            mime_type_from_artwork_format(format),
            None,
            data.to_vec(),
        );
        // Only a single cover is supported
        self.ilst
            .replace_atom(Atom::new(COVR_IDENT, AtomData::Picture(picture)));
        true
    }
}

impl StoreHandle for Mp4Handle {
    fn fetch_tags(&mut self) -> Result<TagSnapshot> {
        let mut snapshot = TagSnapshot::new();
        for &field in FieldId::VARIANTS {
            match layout(field) {
                Layout::Text(fourcc) => {
                    snapshot.set(field, self.text(fourcc).map(|text| text.as_bytes().to_vec()));
                }
                Layout::Integer(fourcc, width) => {
                    snapshot.set(field, self.integer_region(field, fourcc, width));
                }
                Layout::Pair => {
                    snapshot.set(field, self.pair_region(field));
                }
                Layout::Artwork => {
                    let mut artworks = self.artworks();
                    let artwork = artworks.next().map(|picture| NativeArtwork {
                        format: artwork_format_from_mime_type(
                            picture.mime_type(),
                            picture.data(),
                        ),
                        data: Bytes::copy_from_slice(picture.data()),
                    });
                    let count = artwork.as_ref().map_or(0, |_| 1 + artworks.count());
                    snapshot.set_artwork(artwork);
                    snapshot.set_artwork_count(u32::try_from(count).unwrap_or(u32::MAX));
                }
            }
        }
        Ok(snapshot)
    }

    fn find_raw_atom(&self, namespace: &str, name: &str) -> Option<Bytes> {
        let ident = AtomIdent::Freeform {
            mean: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        };
        self.ilst.get(&ident)?.data().find_map(|data| match data {
            AtomData::UTF8(text) | AtomData::UTF16(text) => {
                Some(Bytes::copy_from_slice(text.as_bytes()))
            }
            AtomData::Unknown { data, .. } => Some(Bytes::copy_from_slice(data)),
            _ => None,
        })
    }

    fn persist(&mut self) -> Result<()> {
        if !self.writable {
            return Err(anyhow!("{} has been opened read-only", self.path.display()).into());
        }
        let Some(file) = self.file.as_mut() else {
            return Err(anyhow!("{} has already been closed", self.path.display()).into());
        };
        self.mp4_file.set_ilst(self.ilst.clone());
        // Ensure that the file could be read again
        file.rewind()?;
        self.mp4_file.save_to(file, WriteOptions::default())?;
        log::debug!("Saved tags of {}", self.path.display());
        Ok(())
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            log::debug!("Closed {}", self.path.display());
        }
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
