use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;

use super::constants::*;
use super::error::MfmFrameError;
use super::frame_view::{load_bits, FrameItem, FrameView};

/// The primary header of a GET MFM frame.
///
/// All sizes are stored as they appear on disk (in units of SIZE_UNIT for the frame
/// and header sizes, bytes for the item size).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MfmFrameHeader {
    pub meta_type: u8,
    pub frame_size: u32,
    pub data_source: u8,
    pub frame_type: u16,
    pub revision: u8,
    pub header_size: u16,
    pub item_size: u16,
    pub n_items: u32,
    pub event_time: u64,
    pub event_id: u32,
    pub cobo_id: u8,
    pub asad_id: u8,
}

impl TryFrom<&[u8]> for MfmFrameHeader {
    type Error = MfmFrameError;

    fn try_from(buffer: &[u8]) -> Result<Self, Self::Error> {
        let mut cursor = Cursor::new(buffer);
        let header = MfmFrameHeader {
            meta_type: cursor.read_u8()?,
            frame_size: cursor.read_u24::<BigEndian>()?,
            data_source: cursor.read_u8()?,
            frame_type: cursor.read_u16::<BigEndian>()?,
            revision: cursor.read_u8()?,
            header_size: cursor.read_u16::<BigEndian>()?,
            item_size: cursor.read_u16::<BigEndian>()?,
            n_items: cursor.read_u32::<BigEndian>()?,
            event_time: cursor.read_u48::<BigEndian>()?,
            event_id: cursor.read_u32::<BigEndian>()?,
            cobo_id: cursor.read_u8()?,
            asad_id: cursor.read_u8()?,
        };

        if header.meta_type != EXPECTED_META_TYPE {
            return Err(MfmFrameError::IncorrectMetaType(header.meta_type));
        }
        Ok(header)
    }
}

impl MfmFrameHeader {
    pub fn frame_size_bytes(&self) -> usize {
        self.frame_size as usize * SIZE_UNIT
    }

    pub fn header_size_bytes(&self) -> usize {
        self.header_size as usize * SIZE_UNIT
    }
}

/// MfmFrame is an owned GET frame: the raw bytes plus the decoded primary header.
///
/// The layout is validated on construction, so every item inside `n_items` is
/// guaranteed to lie within the frame.
#[derive(Debug, Clone)]
pub struct MfmFrame {
    pub header: MfmFrameHeader,
    data: Vec<u8>,
}

impl TryFrom<Vec<u8>> for MfmFrame {
    type Error = MfmFrameError;

    fn try_from(mut data: Vec<u8>) -> Result<Self, Self::Error> {
        let header = MfmFrameHeader::try_from(data.as_slice())?;

        let frame_bytes = header.frame_size_bytes();
        if data.len() < frame_bytes {
            return Err(MfmFrameError::IncorrectFrameSize(data.len(), frame_bytes));
        }
        data.truncate(frame_bytes);

        let header_bytes = header.header_size_bytes();
        if header_bytes < MIN_HEADER_SIZE || header_bytes > frame_bytes {
            return Err(MfmFrameError::IncorrectHeaderSize(header_bytes));
        }

        let n_items = header.n_items as usize;
        let item_size = header.item_size as usize;
        if item_size == 0 && n_items > 0 {
            return Err(MfmFrameError::ZeroItemSize(n_items));
        }
        let body_end = n_items
            .checked_mul(item_size)
            .and_then(|body| body.checked_add(header_bytes));
        match body_end {
            Some(end) if end <= frame_bytes => (),
            _ => return Err(MfmFrameError::ItemOverrun(n_items, item_size, frame_bytes)),
        }

        Ok(Self { header, data })
    }
}

impl MfmFrame {
    /// The full frame, header included
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FrameView for MfmFrame {
    fn item_count(&self) -> usize {
        self.header.n_items as usize
    }

    fn item_at(&self, index: usize) -> Option<FrameItem<'_>> {
        if index >= self.item_count() {
            return None;
        }
        let item_size = self.header.item_size as usize;
        let start = self.header.header_size_bytes() + index * item_size;
        self.data.get(start..(start + item_size)).map(FrameItem::new)
    }

    fn header_field(&self, bit_offset: usize, bit_width: usize) -> u64 {
        match self.data.get(..self.header.header_size_bytes()) {
            Some(header) => load_bits(header, bit_offset, bit_width),
            None => 0,
        }
    }
}
