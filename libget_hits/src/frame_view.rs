use bitvec::prelude::*;

/// Read `bit_width` bits starting `msb_offset` bits from the most significant bit of `bytes`,
/// interpreting them as a big-endian unsigned integer.
///
/// Fields that fall outside of `bytes` or are wider than 64 bits read as zero.
pub(crate) fn load_bits(bytes: &[u8], msb_offset: usize, bit_width: usize) -> u64 {
    let bits = bytes.view_bits::<Msb0>();
    if bit_width == 0 || bit_width > 64 {
        return 0;
    }
    match bits.get(msb_offset..(msb_offset + bit_width)) {
        Some(field) => field.load_be::<u64>(),
        None => 0,
    }
}

/// FrameItem is a borrowed view of a single fixed-size item in the body of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameItem<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameItem<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Extract an unsigned sub-field from the item.
    ///
    /// The item is read as a big-endian word, and `bit_offset` counts from its least
    /// significant bit. Fields which do not fit in the item read as zero.
    pub fn field(&self, bit_offset: usize, bit_width: usize) -> u64 {
        let total = self.bytes.len() * 8;
        if bit_offset + bit_width > total {
            return 0;
        }
        load_bits(self.bytes, total - bit_offset - bit_width, bit_width)
    }
}

/// FrameView is the interface a frame reader has to provide for hit extraction.
///
/// A frame is a fixed header followed by an ordered sequence of fixed-size items.
pub trait FrameView {
    /// Number of items in the frame body
    fn item_count(&self) -> usize;

    /// Get the item at index. Returns None if the index is past the end of the body
    fn item_at(&self, index: usize) -> Option<FrameItem<'_>>;

    /// Extract an unsigned sub-field from the header. `bit_offset` counts from the most
    /// significant bit of the first header byte. Bits outside the header read as zero.
    fn header_field(&self, bit_offset: usize, bit_width: usize) -> u64;

    /// Iterate over the items of the frame in order
    fn items(&self) -> Items<'_, Self> {
        Items {
            frame: self,
            index: 0,
        }
    }
}

/// Iterator over the items of a FrameView
#[derive(Debug)]
pub struct Items<'a, F: FrameView + ?Sized> {
    frame: &'a F,
    index: usize,
}

impl<'a, F: FrameView + ?Sized> Iterator for Items<'a, F> {
    type Item = FrameItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.frame.item_count() {
            return None;
        }
        let item = self.frame.item_at(self.index)?;
        self.index += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_field_lsb_numbering() {
        // 0b10_0000101_001100100_00_101010111100
        let word: u32 = (2 << 30) | (5 << 23) | (100 << 14) | 0xABC;
        let bytes = word.to_be_bytes();
        let item = FrameItem::new(&bytes);
        assert_eq!(item.size_bytes(), 4);
        assert_eq!(item.field(0, 12), 0xABC);
        assert_eq!(item.field(14, 9), 100);
        assert_eq!(item.field(23, 7), 5);
        assert_eq!(item.field(30, 2), 2);
        assert_eq!(item.field(0, 32), word as u64);
    }

    #[test]
    fn test_item_field_out_of_range() {
        let bytes = [0xffu8, 0xff];
        let item = FrameItem::new(&bytes);
        assert_eq!(item.field(14, 2), 3);
        assert_eq!(item.field(15, 2), 0);
    }

    #[test]
    fn test_load_bits_msb_numbering() {
        let bytes = [0x00, 0x12, 0x34, 0xff];
        assert_eq!(load_bits(&bytes, 8, 16), 0x1234);
        assert_eq!(load_bits(&bytes, 24, 4), 0xf);
        assert_eq!(load_bits(&bytes, 24, 16), 0);
        assert_eq!(load_bits(&bytes, 0, 0), 0);
    }
}
