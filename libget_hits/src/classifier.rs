use super::constants::*;
use super::frame_view::FrameView;

/// The readout mode of a frame, as given by the frame type code in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Partial readout; each item carries its own channel and time bucket
    Compressed,
    /// Full readout; channels are interleaved round-robin and buckets are implied
    Uncompressed,
    /// Any other frame type. Not an error, the frame is simply skipped
    Unrecognized(u16),
}

impl From<u16> for FrameKind {
    fn from(value: u16) -> Self {
        match value {
            FRAME_TYPE_PARTIAL => Self::Compressed,
            FRAME_TYPE_FULL => Self::Uncompressed,
            other => Self::Unrecognized(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClass {
    pub kind: FrameKind,
    pub cobo: u8,
    pub asad: u8,
}

/// Read the frame type and the board identifiers from the header of a frame
pub fn classify_frame<F: FrameView + ?Sized>(frame: &F) -> FrameClass {
    let frame_type = frame.header_field(FRAME_TYPE_BIT_OFFSET, FRAME_TYPE_BIT_WIDTH) as u16;
    FrameClass {
        kind: FrameKind::from(frame_type),
        cobo: frame.header_field(COBO_BIT_OFFSET, COBO_BIT_WIDTH) as u8,
        asad: frame.header_field(ASAD_BIT_OFFSET, ASAD_BIT_WIDTH) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mfm_frame::test_support::TestFrame;
    use crate::mfm_frame::MfmFrame;

    #[test]
    fn test_classify() {
        let mut test = TestFrame::new(FRAME_TYPE_PARTIAL, 4, Vec::new());
        test.cobo = 4;
        test.asad = 1;
        let frame = MfmFrame::try_from(test.to_bytes()).unwrap();
        assert_eq!(
            classify_frame(&frame),
            FrameClass {
                kind: FrameKind::Compressed,
                cobo: 4,
                asad: 1
            }
        );
    }

    #[test]
    fn test_unrecognized_type() {
        let frame = MfmFrame::try_from(TestFrame::new(7, 2, Vec::new()).to_bytes()).unwrap();
        assert_eq!(classify_frame(&frame).kind, FrameKind::Unrecognized(7));
        assert_eq!(FrameKind::from(FRAME_TYPE_FULL), FrameKind::Uncompressed);
    }
}
