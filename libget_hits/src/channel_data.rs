use super::constants::{NUMBER_OF_AGETS, NUMBER_OF_CHANNELS, NUMBER_OF_CHANNEL_KEYS};

/// A single digitized sample of a channel trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub bucket: u32,
    pub value: u16,
}

impl RawSample {
    pub fn new(bucket: u32, value: u16) -> Self {
        Self { bucket, value }
    }
}

/// Absolute channel index within one AsAd: `aget * 68 + channel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelKey(usize);

impl ChannelKey {
    /// Returns None if either index is out of range for an AsAd
    pub fn new(aget: usize, channel: usize) -> Option<Self> {
        if aget < NUMBER_OF_AGETS && channel < NUMBER_OF_CHANNELS {
            Some(Self(aget * NUMBER_OF_CHANNELS + channel))
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn aget(&self) -> usize {
        self.0 / NUMBER_OF_CHANNELS
    }

    pub fn channel(&self) -> usize {
        self.0 % NUMBER_OF_CHANNELS
    }
}

/// ChannelAccumulator collects the samples of every channel of one frame.
///
/// The keyspace is dense and fixed, so samples are stored in an array indexed by
/// ChannelKey. Samples keep their arrival order.
#[derive(Debug, Clone)]
pub struct ChannelAccumulator {
    channels: [Vec<RawSample>; NUMBER_OF_CHANNEL_KEYS],
}

impl Default for ChannelAccumulator {
    fn default() -> Self {
        Self {
            channels: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl ChannelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: ChannelKey, sample: RawSample) {
        self.channels[key.index()].push(sample);
    }

    pub fn samples(&self, key: ChannelKey) -> &[RawSample] {
        &self.channels[key.index()]
    }

    /// Number of samples collected so far for a channel
    pub fn len_of(&self, key: ChannelKey) -> usize {
        self.channels[key.index()].len()
    }

    /// Number of channels with at least one sample
    pub fn active_channels(&self) -> usize {
        self.channels.iter().filter(|c| !c.is_empty()).count()
    }

    /// Iterate over the channels with at least one sample, in key order
    pub fn iter_active(&self) -> impl Iterator<Item = (ChannelKey, &[RawSample])> + '_ {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(idx, samples)| (ChannelKey(idx), samples.as_slice()))
    }

    pub fn clear(&mut self) {
        self.channels.iter_mut().for_each(|c| c.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_decomposition() {
        let key = ChannelKey::new(2, 5).unwrap();
        assert_eq!(key.index(), 2 * 68 + 5);
        assert_eq!(key.aget(), 2);
        assert_eq!(key.channel(), 5);
        let last = ChannelKey::new(3, 67).unwrap();
        assert_eq!(last.index(), 271);
        assert!(ChannelKey::new(4, 0).is_none());
        assert!(ChannelKey::new(0, 68).is_none());
    }

    #[test]
    fn test_accumulate() {
        let mut acc = ChannelAccumulator::new();
        let a = ChannelKey::new(0, 3).unwrap();
        let b = ChannelKey::new(3, 0).unwrap();
        acc.push(b, RawSample::new(7, 100));
        acc.push(a, RawSample::new(2, 10));
        acc.push(a, RawSample::new(1, 20));

        assert_eq!(acc.active_channels(), 2);
        assert_eq!(acc.len_of(a), 2);
        assert_eq!(acc.samples(a)[1], RawSample::new(1, 20));

        let keys: Vec<ChannelKey> = acc.iter_active().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![a, b]);

        acc.clear();
        assert_eq!(acc.active_channels(), 0);
    }
}
