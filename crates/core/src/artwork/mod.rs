// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtworkImageError {
    #[error("unsupported format {0:?}")]
    UnsupportedFormat(ImageFormat),

    #[error(transparent)]
    Image(#[from] ImageError),
}

pub type ArtworkImageResult<T> = std::result::Result<T, ArtworkImageError>;

/// Image formats that could be stored in a `covr` atom.
///
/// `Unknown` is the fallback for images of which the format could
/// neither be inferred from the native type nor from the contents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ArtworkFormat {
    Bmp,
    Gif,
    Jpeg,
    Png,
    #[default]
    Unknown,
}

impl ArtworkFormat {
    #[must_use]
    pub const fn from_image_format(image_format: ImageFormat) -> Self {
        match image_format {
            ImageFormat::Bmp => Self::Bmp,
            ImageFormat::Gif => Self::Gif,
            ImageFormat::Jpeg => Self::Jpeg,
            ImageFormat::Png => Self::Png,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn image_format(self) -> Option<ImageFormat> {
        let image_format = match self {
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Unknown => return None,
        };
        Some(image_format)
    }

    /// Inspects the magic bytes of the image data.
    #[must_use]
    pub fn guess(data: &[u8]) -> Self {
        image::guess_format(data).map_or(Self::Unknown, Self::from_image_format)
    }
}

/// Embedded artwork image data.
///
/// The raw data is kept verbatim. Decoding is deferred until the
/// pixels or dimensions are actually requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtworkImage {
    format: ArtworkFormat,
    data: Bytes,
}

impl ArtworkImage {
    /// Wraps image data as stored, without any validation.
    ///
    /// An `Unknown` format is refined by inspecting the data.
    #[must_use]
    pub fn new(format: ArtworkFormat, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let format = match format {
            ArtworkFormat::Unknown => ArtworkFormat::guess(&data),
            format => format,
        };
        Self { format, data }
    }

    /// Validates and wraps encoded image data.
    ///
    /// Only formats that are supported for MPEG-4 cover art are accepted.
    /// The image is decoded once to reject corrupt data early.
    pub fn from_bytes(data: impl Into<Bytes>) -> ArtworkImageResult<Self> {
        let data = data.into();
        let image_format = image::guess_format(&data)?;
        let format = ArtworkFormat::from_image_format(image_format);
        if format == ArtworkFormat::Unknown {
            return Err(ArtworkImageError::UnsupportedFormat(image_format));
        }
        image::load_from_memory_with_format(&data, image_format)?;
        Ok(Self { format, data })
    }

    #[must_use]
    pub const fn format(&self) -> ArtworkFormat {
        self.format
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }

    pub fn decode(&self) -> ArtworkImageResult<DynamicImage> {
        let picture = if let Some(image_format) = self.format.image_format() {
            image::load_from_memory_with_format(&self.data, image_format)
        } else {
            image::load_from_memory(&self.data)
        }?;
        Ok(picture)
    }

    /// Reads the dimensions from the image header without decoding the pixels.
    pub fn dimensions(&self) -> ArtworkImageResult<(u32, u32)> {
        let mut reader = ImageReader::new(Cursor::new(self.data.as_ref()));
        if let Some(image_format) = self.format.image_format() {
            reader.set_format(image_format);
        } else {
            reader = reader.with_guessed_format().map_err(ImageError::IoError)?;
        }
        Ok(reader.into_dimensions()?)
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
