use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::constants::{HIT_COUNT_SIZE, HIT_RECORD_SIZE};
use super::error::HitFileError;
use super::hit::{decode_hit_block, write_hit_block, Hit};

/// The hits of a single frame, tagged with the frame's event identifiers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameHits {
    pub event_id: u32,
    pub event_time: u64,
    pub hits: Vec<Hit>,
}

/// HitWriter appends FrameHits records to a stream.
///
/// Each record is the event id (u32), the event time (u64) and a hit block, all little
/// endian. Frames without hits are not written.
#[derive(Debug)]
pub struct HitWriter<W: Write> {
    writer: W,
    frames_written: u64,
    hits_written: u64,
}

impl HitWriter<BufWriter<File>> {
    /// Create (or truncate) a hit file at path
    pub fn create(path: &Path) -> Result<Self, HitFileError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> HitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_written: 0,
            hits_written: 0,
        }
    }

    /// Write the hits of a frame. Returns false if there was nothing to write
    pub fn write_frame(
        &mut self,
        event_id: u32,
        event_time: u64,
        hits: &[Hit],
    ) -> Result<bool, HitFileError> {
        if hits.is_empty() {
            return Ok(false);
        }
        self.writer.write_u32::<LittleEndian>(event_id)?;
        self.writer.write_u64::<LittleEndian>(event_time)?;
        write_hit_block(&mut self.writer, hits)?;
        self.frames_written += 1;
        self.hits_written += hits.len() as u64;
        Ok(true)
    }

    pub fn get_frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn get_hits_written(&self) -> u64 {
        self.hits_written
    }

    /// Flush and hand back the underlying writer
    pub fn close(mut self) -> Result<W, HitFileError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// HitReader reads back the records written by a HitWriter
#[derive(Debug)]
pub struct HitReader<R: Read> {
    reader: R,
}

impl HitReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, HitFileError> {
        if !path.exists() {
            return Err(HitFileError::BadFilePath(path.to_path_buf()));
        }
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read> HitReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the next record. Returns None at a clean end of the stream
    pub fn read_frame(&mut self) -> Result<Option<FrameHits>, HitFileError> {
        let event_id = match self.reader.read_u32::<LittleEndian>() {
            Ok(id) => id,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(HitFileError::IOError(e)),
        };
        let event_time = self.reader.read_u64::<LittleEndian>()?;
        let n_hits = self.reader.read_u32::<LittleEndian>()?;

        let record_bytes = n_hits as u64 * HIT_RECORD_SIZE as u64;
        let mut block: Vec<u8> = Vec::with_capacity(HIT_COUNT_SIZE);
        block.extend_from_slice(&n_hits.to_le_bytes());
        let n_read = self.reader.by_ref().take(record_bytes).read_to_end(&mut block)?;
        if (n_read as u64) < record_bytes {
            return Err(HitFileError::IOError(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("event {event_id} declares {n_hits} hits but the stream ended early"),
            )));
        }

        Ok(Some(FrameHits {
            event_id,
            event_time,
            hits: decode_hit_block(&block)?,
        }))
    }
}

impl<R: Read> Iterator for HitReader<R> {
    type Item = Result<FrameHits, HitFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}
