//! JPEG EXIF orientation: a minimal APP1 reader and the eight corrective transforms.
//!
//! Anything unexpected in the byte stream degrades to [`Orientation::Normal`].

const SOI: u16 = 0xFFD8;
const APP1: u16 = 0xFFE1;
const SOS: u16 = 0xFFDA;
const EXIF_MAGIC: u32 = 0x4578_6966; // "Exif"
const TIFF_LITTLE_ENDIAN: u16 = 0x4949; // "II"
const TIFF_MAGIC: u16 = 0x002A;
const TAG_ORIENTATION: u16 = 0x0112;

/// EXIF orientation tag values 1..=8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    /// Map a raw tag value; anything outside 1..=8 is `Normal`.
    pub fn from_exif(value: u16) -> Self {
        match value {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    pub fn exif_value(self) -> u16 {
        match self {
            Self::Normal => 1,
            Self::FlipHorizontal => 2,
            Self::Rotate180 => 3,
            Self::FlipVertical => 4,
            Self::Transpose => 5,
            Self::Rotate90 => 6,
            Self::Transverse => 7,
            Self::Rotate270 => 8,
        }
    }

    /// Whether correcting this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }

    /// Redraw `img` upright.
    pub fn apply(self, img: image::DynamicImage) -> image::DynamicImage {
        match self {
            Self::Normal => img,
            Self::FlipHorizontal => img.fliph(),
            Self::Rotate180 => img.rotate180(),
            Self::FlipVertical => img.flipv(),
            Self::Transpose => img.rotate90().fliph(),
            Self::Rotate90 => img.rotate90(),
            Self::Transverse => img.rotate270().fliph(),
            Self::Rotate270 => img.rotate270(),
        }
    }
}

/// Read the orientation tag from a JPEG buffer.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    match find_orientation_tag(bytes) {
        Some(v) => Orientation::from_exif(v),
        None => {
            tracing::debug!(len = bytes.len(), "no usable exif orientation, assuming 1");
            Orientation::Normal
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl Reader<'_> {
    fn u16(&self, at: usize, little: bool) -> Option<u16> {
        let b: [u8; 2] = self.bytes.get(at..at.checked_add(2)?)?.try_into().ok()?;
        Some(if little {
            u16::from_le_bytes(b)
        } else {
            u16::from_be_bytes(b)
        })
    }

    fn u32(&self, at: usize, little: bool) -> Option<u32> {
        let b: [u8; 4] = self.bytes.get(at..at.checked_add(4)?)?.try_into().ok()?;
        Some(if little {
            u32::from_le_bytes(b)
        } else {
            u32::from_be_bytes(b)
        })
    }
}

fn find_orientation_tag(bytes: &[u8]) -> Option<u16> {
    let r = Reader { bytes };
    if r.u16(0, false)? != SOI {
        return None;
    }

    let mut offset = 2usize;
    while offset < bytes.len() {
        let marker = r.u16(offset, false)?;
        if marker == APP1 {
            return read_app1(&r, offset + 4);
        }
        if marker == SOS {
            return None;
        }
        let segment_len = usize::from(r.u16(offset + 2, false)?);
        offset = offset.checked_add(2 + segment_len)?;
    }
    None
}

fn read_app1(r: &Reader<'_>, exif_start: usize) -> Option<u16> {
    if r.u32(exif_start, false)? != EXIF_MAGIC {
        return None;
    }
    let tiff = exif_start + 6;
    let little = r.u16(tiff, false)? == TIFF_LITTLE_ENDIAN;
    if r.u16(tiff + 2, little)? != TIFF_MAGIC {
        return None;
    }

    let ifd = tiff.checked_add(usize::try_from(r.u32(tiff + 4, little)?).ok()?)?;
    let entries = r.u16(ifd, little)?;
    for i in 0..usize::from(entries) {
        let entry = ifd + 2 + i * 12;
        if entry + 12 > r.bytes.len() {
            break;
        }
        if r.u16(entry, little)? == TAG_ORIENTATION {
            return r.u16(entry + 8, little);
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/assets/exif.rs"]
mod tests;
