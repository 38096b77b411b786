use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::constants::{HIT_COUNT_SIZE, HIT_RECORD_SIZE};
use super::error::HitBlockError;

/// The pulse features extracted from one channel of one frame.
///
/// `cobo` and `asad` are the board and sub-board of the frame, `aget` and `channel`
/// the chip and channel within the chip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hit {
    pub cobo: u32,
    pub asad: u32,
    pub aget: u32,
    pub channel: u32,
    /// Charge weighted centroid, in time buckets
    pub time: f64,
    /// Baseline subtracted peak height (3 point parabolic interpolation)
    pub peak: f64,
    /// Baseline subtracted integral of the trace
    pub integral: f64,
}

impl Hit {
    /// The fixed-size record: four u32 identifiers then three f64 values
    pub fn to_bytes(&self) -> [u8; HIT_RECORD_SIZE] {
        let mut record = [0u8; HIT_RECORD_SIZE];
        LittleEndian::write_u32(&mut record[0..4], self.cobo);
        LittleEndian::write_u32(&mut record[4..8], self.asad);
        LittleEndian::write_u32(&mut record[8..12], self.aget);
        LittleEndian::write_u32(&mut record[12..16], self.channel);
        LittleEndian::write_f64(&mut record[16..24], self.time);
        LittleEndian::write_f64(&mut record[24..32], self.peak);
        LittleEndian::write_f64(&mut record[32..40], self.integral);
        record
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
        writer.write_all(&self.to_bytes())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, std::io::Error> {
        Ok(Self {
            cobo: reader.read_u32::<LittleEndian>()?,
            asad: reader.read_u32::<LittleEndian>()?,
            aget: reader.read_u32::<LittleEndian>()?,
            channel: reader.read_u32::<LittleEndian>()?,
            time: reader.read_f64::<LittleEndian>()?,
            peak: reader.read_f64::<LittleEndian>()?,
            integral: reader.read_f64::<LittleEndian>()?,
        })
    }
}

/// Pack hits into a block: a u32 hit count followed by the hit records
pub fn encode_hit_block(hits: &[Hit]) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(HIT_COUNT_SIZE + hits.len() * HIT_RECORD_SIZE);
    buffer.extend_from_slice(&(hits.len() as u32).to_le_bytes());
    for hit in hits {
        buffer.extend_from_slice(&hit.to_bytes());
    }
    buffer
}

pub fn write_hit_block<W: Write>(writer: &mut W, hits: &[Hit]) -> Result<(), std::io::Error> {
    writer.write_u32::<LittleEndian>(hits.len() as u32)?;
    for hit in hits {
        hit.write_to(writer)?;
    }
    Ok(())
}

/// Unpack a block written by `encode_hit_block`. Bytes past the declared hits are ignored.
pub fn decode_hit_block(buffer: &[u8]) -> Result<Vec<Hit>, HitBlockError> {
    let mut reader = buffer;
    let n_hits = reader.read_u32::<LittleEndian>()?;
    if reader.len() < n_hits as usize * HIT_RECORD_SIZE {
        return Err(HitBlockError::Truncated(n_hits, buffer.len()));
    }
    let mut hits = Vec::with_capacity(n_hits as usize);
    for _ in 0..n_hits {
        hits.push(Hit::read_from(&mut reader)?);
    }
    Ok(hits)
}
