// MFM frame layout
pub const EXPECTED_META_TYPE: u8 = 8;
pub const SIZE_UNIT: usize = 256; // 2^(meta type)
pub const EXPECTED_ITEM_SIZE_PARTIAL: usize = 4;
pub const EXPECTED_ITEM_SIZE_FULL: usize = 2;
pub const FRAME_TYPE_PARTIAL: u16 = 1; // compressed (zero suppressed)
pub const FRAME_TYPE_FULL: u16 = 2; // uncompressed (full readout)
pub const PREAMBLE_SIZE: usize = 4; // meta type + frame size
pub const MIN_HEADER_SIZE: usize = 28; // through the AsAd index

// Header bit fields (bit 0 is the MSB of the first header byte)
pub const FRAME_TYPE_BIT_OFFSET: usize = 40;
pub const FRAME_TYPE_BIT_WIDTH: usize = 16;
pub const COBO_BIT_OFFSET: usize = 208;
pub const COBO_BIT_WIDTH: usize = 8;
pub const ASAD_BIT_OFFSET: usize = 216;
pub const ASAD_BIT_WIDTH: usize = 8;

// Partial readout item (bit 0 is the LSB of the 32-bit word)
pub const PARTIAL_SAMPLE_OFFSET: usize = 0;
pub const PARTIAL_SAMPLE_WIDTH: usize = 12;
pub const PARTIAL_BUCKET_OFFSET: usize = 14;
pub const PARTIAL_BUCKET_WIDTH: usize = 9;
pub const PARTIAL_CHANNEL_OFFSET: usize = 23;
pub const PARTIAL_CHANNEL_WIDTH: usize = 7;
pub const PARTIAL_AGET_OFFSET: usize = 30;
pub const PARTIAL_AGET_WIDTH: usize = 2;

// Full readout item (bit 0 is the LSB of the 16-bit word)
pub const FULL_SAMPLE_OFFSET: usize = 0;
pub const FULL_SAMPLE_WIDTH: usize = 12;
pub const FULL_AGET_OFFSET: usize = 14;
pub const FULL_AGET_WIDTH: usize = 2;

// Electronics constants
pub const NUMBER_OF_AGETS: usize = 4; // per asad
pub const NUMBER_OF_CHANNELS: usize = 68; // per aget
pub const NUMBER_OF_CHANNEL_KEYS: usize = NUMBER_OF_AGETS * NUMBER_OF_CHANNELS;

// Hit records
pub const HIT_RECORD_SIZE: usize = 4 * 4 + 3 * 8;
pub const HIT_COUNT_SIZE: usize = 4;
