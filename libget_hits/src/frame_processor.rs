use super::channel_data::ChannelAccumulator;
use super::classifier::{classify_frame, FrameKind};
use super::decoder::{decode_full, decode_partial};
use super::error::DecodeError;
use super::extractor::extract_hit;
use super::frame_view::FrameView;
use super::hit::Hit;

/// Turn one frame into the Hits of its channels.
///
/// Frames of an unrecognized type give an empty list. A malformed partial readout frame
/// gives an error and no hits at all. Otherwise there is exactly one Hit per channel that
/// received at least one sample, ordered by AGET then channel.
pub fn process_frame<F: FrameView + ?Sized>(frame: &F) -> Result<Vec<Hit>, DecodeError> {
    let mut channels = ChannelAccumulator::new();
    process_frame_with(frame, &mut channels)
}

/// Same as `process_frame`, but reuses the storage of an existing accumulator.
///
/// The accumulator is cleared before decoding, so no state carries over between frames.
pub fn process_frame_with<F: FrameView + ?Sized>(
    frame: &F,
    channels: &mut ChannelAccumulator,
) -> Result<Vec<Hit>, DecodeError> {
    channels.clear();
    let class = classify_frame(frame);
    match class.kind {
        FrameKind::Compressed => decode_partial(frame, channels)?,
        FrameKind::Uncompressed => decode_full(frame, channels),
        FrameKind::Unrecognized(frame_type) => {
            spdlog::debug!("Skipping frame with unrecognized frame type {frame_type}");
            return Ok(Vec::new());
        }
    }

    Ok(channels
        .iter_active()
        .filter_map(|(key, samples)| extract_hit(class.cobo, class.asad, key, samples))
        .collect())
}
