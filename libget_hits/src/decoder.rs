use super::channel_data::{ChannelAccumulator, ChannelKey, RawSample};
use super::constants::*;
use super::error::DecodeError;
use super::frame_view::FrameView;

/// Unpack a partial readout (compressed) frame into the accumulator.
///
/// Every item is a 32-bit word carrying its own AGET, channel, time bucket and sample.
/// An item of any other size means the item stream is out of sync, so decoding stops
/// with an error and the accumulator contents must be discarded.
pub fn decode_partial<F: FrameView + ?Sized>(
    frame: &F,
    channels: &mut ChannelAccumulator,
) -> Result<(), DecodeError> {
    for (index, item) in frame.items().enumerate() {
        if item.size_bytes() != EXPECTED_ITEM_SIZE_PARTIAL {
            return Err(DecodeError::IncorrectItemSize {
                index,
                size: item.size_bytes(),
            });
        }

        let aget = item.field(PARTIAL_AGET_OFFSET, PARTIAL_AGET_WIDTH) as usize;
        let channel = item.field(PARTIAL_CHANNEL_OFFSET, PARTIAL_CHANNEL_WIDTH) as usize;
        let bucket = item.field(PARTIAL_BUCKET_OFFSET, PARTIAL_BUCKET_WIDTH) as u32;
        let sample = item.field(PARTIAL_SAMPLE_OFFSET, PARTIAL_SAMPLE_WIDTH) as u16;

        match ChannelKey::new(aget, channel) {
            Some(key) => channels.push(key, RawSample::new(bucket, sample)),
            None => spdlog::warn!(
                "Dropping item {index} of partial readout frame with invalid channel {channel} (AGET {aget})"
            ),
        }
    }
    Ok(())
}

/// Unpack a full readout (uncompressed) frame into the accumulator.
///
/// Items are 16-bit words carrying only the AGET and the sample. Within each AGET the
/// channels are read out in turn (0..67, then wrap), and the time bucket of a sample is
/// the number of samples already seen for that channel.
pub fn decode_full<F: FrameView + ?Sized>(frame: &F, channels: &mut ChannelAccumulator) {
    let mut next_channel = [0usize; NUMBER_OF_AGETS];
    for item in frame.items() {
        let aget = item.field(FULL_AGET_OFFSET, FULL_AGET_WIDTH) as usize;
        let sample = item.field(FULL_SAMPLE_OFFSET, FULL_SAMPLE_WIDTH) as u16;

        let channel = next_channel[aget];
        next_channel[aget] = (channel + 1) % NUMBER_OF_CHANNELS;

        if let Some(key) = ChannelKey::new(aget, channel) {
            let bucket = channels.len_of(key) as u32;
            channels.push(key, RawSample::new(bucket, sample));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mfm_frame::test_support::*;
    use crate::mfm_frame::MfmFrame;

    fn partial_frame(items: &[[u8; 4]]) -> MfmFrame {
        let body: Vec<u8> = items.iter().flatten().copied().collect();
        MfmFrame::try_from(TestFrame::new(FRAME_TYPE_PARTIAL, 4, body).to_bytes()).unwrap()
    }

    fn full_frame(items: &[[u8; 2]]) -> MfmFrame {
        let body: Vec<u8> = items.iter().flatten().copied().collect();
        MfmFrame::try_from(TestFrame::new(FRAME_TYPE_FULL, 2, body).to_bytes()).unwrap()
    }

    #[test]
    fn test_partial_single_word() {
        let frame = partial_frame(&[partial_item(2, 5, 100, 0xABC)]);
        let mut channels = ChannelAccumulator::new();
        decode_partial(&frame, &mut channels).unwrap();

        assert_eq!(channels.active_channels(), 1);
        let key = ChannelKey::new(2, 5).unwrap();
        assert_eq!(key.index(), 2 * 68 + 5);
        assert_eq!(channels.samples(key), &[RawSample::new(100, 0xABC)]);
    }

    #[test]
    fn test_partial_keeps_arrival_order() {
        let frame = partial_frame(&[
            partial_item(0, 1, 30, 5),
            partial_item(1, 1, 2, 6),
            partial_item(0, 1, 10, 7),
        ]);
        let mut channels = ChannelAccumulator::new();
        decode_partial(&frame, &mut channels).unwrap();
        let key = ChannelKey::new(0, 1).unwrap();
        assert_eq!(
            channels.samples(key),
            &[RawSample::new(30, 5), RawSample::new(10, 7)]
        );
    }

    #[test]
    fn test_partial_wrong_item_size() {
        // A full readout frame passed to the partial decoder has 2 byte items
        let frame = full_frame(&[full_item(0, 1), full_item(0, 2)]);
        let mut channels = ChannelAccumulator::new();
        assert_eq!(
            decode_partial(&frame, &mut channels),
            Err(DecodeError::IncorrectItemSize { index: 0, size: 2 })
        );
    }

    #[test]
    fn test_partial_invalid_channel_dropped() {
        let frame = partial_frame(&[partial_item(0, 100, 0, 1), partial_item(0, 2, 0, 1)]);
        let mut channels = ChannelAccumulator::new();
        decode_partial(&frame, &mut channels).unwrap();
        assert_eq!(channels.active_channels(), 1);
    }

    #[test]
    fn test_full_round_robin() {
        let items: Vec<[u8; 2]> = (0..(2 * NUMBER_OF_CHANNELS + 2))
            .map(|i| full_item(0, i as u16))
            .collect();
        let frame = full_frame(&items);
        let mut channels = ChannelAccumulator::new();
        decode_full(&frame, &mut channels);

        assert_eq!(channels.active_channels(), NUMBER_OF_CHANNELS);
        for channel in 0..NUMBER_OF_CHANNELS {
            let key = ChannelKey::new(0, channel).unwrap();
            let samples = channels.samples(key);
            assert_eq!(samples[0], RawSample::new(0, channel as u16));
            assert_eq!(
                samples[1],
                RawSample::new(1, (channel + NUMBER_OF_CHANNELS) as u16)
            );
            if channel < 2 {
                assert_eq!(samples.len(), 3);
                assert_eq!(samples[2].bucket, 2);
            } else {
                assert_eq!(samples.len(), 2);
            }
        }
    }

    #[test]
    fn test_full_counters_per_aget() {
        let frame = full_frame(&[
            full_item(0, 1),
            full_item(3, 2),
            full_item(0, 3),
            full_item(3, 4),
        ]);
        let mut channels = ChannelAccumulator::new();
        decode_full(&frame, &mut channels);

        let expect = [((0, 0), 1), ((3, 0), 2), ((0, 1), 3), ((3, 1), 4)];
        for ((aget, channel), value) in expect {
            let key = ChannelKey::new(aget, channel).unwrap();
            assert_eq!(channels.samples(key), &[RawSample::new(0, value)]);
        }
    }
}
