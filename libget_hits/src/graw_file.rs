use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use super::constants::{EXPECTED_META_TYPE, PREAMBLE_SIZE, SIZE_UNIT};
use super::error::{GrawFileError, MfmFrameError};
use super::mfm_frame::MfmFrame;

/// Read the next MfmFrame from a stream of concatenated frames.
///
/// Returns `GrawFileError::EndOfFile` if the stream ends cleanly before a new frame starts.
/// A stream that ends partway through a frame is an IO error.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<MfmFrame, GrawFileError> {
    let meta_type = match reader.read_u8() {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(GrawFileError::EndOfFile),
        Err(e) => return Err(GrawFileError::IOError(e)),
    };
    if meta_type != EXPECTED_META_TYPE {
        return Err(MfmFrameError::IncorrectMetaType(meta_type).into());
    }
    let frame_size = reader.read_u24::<BigEndian>()?;

    let frame_bytes = (frame_size as usize * SIZE_UNIT).max(PREAMBLE_SIZE);
    let remaining = (frame_bytes - PREAMBLE_SIZE) as u64;
    // Sized by the bytes actually read, not the declared frame size
    let mut buffer: Vec<u8> = Vec::with_capacity(PREAMBLE_SIZE);
    buffer.push(meta_type);
    buffer.extend_from_slice(&frame_size.to_be_bytes()[1..]);
    let n_read = reader.by_ref().take(remaining).read_to_end(&mut buffer)?;
    if (n_read as u64) < remaining {
        return Err(GrawFileError::IOError(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!(
                "frame declares {frame_bytes} bytes but the stream ended after {}",
                buffer.len()
            ),
        )));
    }

    Ok(MfmFrame::try_from(buffer)?)
}

/// GrawFile is a sequential reader over a single .graw file written by the GET DAQ.
#[derive(Debug)]
pub struct GrawFile {
    file_path: PathBuf,
    reader: BufReader<File>,
    size_bytes: u64,
    is_eof: bool,
}

impl GrawFile {
    /// Open a .graw file for reading
    pub fn new(path: &Path) -> Result<Self, GrawFileError> {
        if !path.exists() {
            return Err(GrawFileError::BadFilePath(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let size_bytes = file.metadata()?.len();
        Ok(Self {
            file_path: path.to_path_buf(),
            reader: BufReader::new(file),
            size_bytes,
            is_eof: false,
        })
    }

    /// Get the next frame in the file.
    ///
    /// Once the end of the file is reached every call returns `GrawFileError::EndOfFile`.
    pub fn get_next_frame(&mut self) -> Result<MfmFrame, GrawFileError> {
        if self.is_eof {
            return Err(GrawFileError::EndOfFile);
        }
        match read_frame(&mut self.reader) {
            Err(GrawFileError::EndOfFile) => {
                self.is_eof = true;
                Err(GrawFileError::EndOfFile)
            }
            result => result,
        }
    }

    pub fn get_size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn get_path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_eof(&self) -> bool {
        self.is_eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FRAME_TYPE_FULL, FRAME_TYPE_PARTIAL};
    use crate::mfm_frame::test_support::*;
    use std::io::Cursor;

    #[test]
    fn test_read_consecutive_frames() {
        let mut first = TestFrame::new(FRAME_TYPE_FULL, 2, full_item(1, 20).to_vec());
        first.event_id = 1;
        let mut second = TestFrame::new(FRAME_TYPE_PARTIAL, 4, vec![0; 4 * 100]);
        second.event_id = 2;

        let mut stream = first.to_bytes();
        stream.extend(second.to_bytes());
        let mut cursor = Cursor::new(stream);

        let frame = read_frame(&mut cursor).unwrap();
        assert_eq!(frame.header.event_id, 1);
        let frame = read_frame(&mut cursor).unwrap();
        assert_eq!(frame.header.event_id, 2);
        assert_eq!(frame.header.n_items, 100);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(GrawFileError::EndOfFile)
        ));
    }

    #[test]
    fn test_partial_frame_is_io_error() {
        let mut stream = TestFrame::new(FRAME_TYPE_FULL, 2, vec![0; 10]).to_bytes();
        stream.truncate(100);
        let mut cursor = Cursor::new(stream);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(GrawFileError::IOError(_))
        ));
    }

    #[test]
    fn test_oversized_frame_size_is_io_error() {
        let mut stream = TestFrame::new(FRAME_TYPE_FULL, 2, vec![0; 10]).to_bytes();
        stream[1..4].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
        let mut cursor = Cursor::new(stream);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(GrawFileError::IOError(e)) if e.kind() == ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn test_bad_meta_type() {
        let mut cursor = Cursor::new(vec![3u8, 0, 0, 1]);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(GrawFileError::BadFrame(MfmFrameError::IncorrectMetaType(3)))
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/this/path/does/not/exist.graw");
        assert!(matches!(
            GrawFile::new(path),
            Err(GrawFileError::BadFilePath(_))
        ));
    }
}
