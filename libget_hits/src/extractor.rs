use super::channel_data::{ChannelKey, RawSample};
use super::hit::Hit;

/// Baseline estimate of a trace: the smaller of the first and last samples
fn baseline(samples: &[RawSample]) -> Option<u16> {
    let first = samples.first()?.value;
    let last = samples.last()?.value;
    Some(first.min(last))
}

/// Compute the Hit for a single channel trace.
///
/// The baseline is taken as the smaller of the first and last samples. The integral is the
/// sum of the baseline subtracted samples and the time is their bucket weighted centroid.
/// The centroid is not guarded: a trace whose baseline subtracted samples sum to zero
/// yields a NaN (or infinite) time. Returns None for an empty trace.
pub fn extract_hit(cobo: u8, asad: u8, key: ChannelKey, samples: &[RawSample]) -> Option<Hit> {
    let offset = baseline(samples)?;

    let mut sum = 0.0;
    let mut weighted_sum = 0.0;
    let mut max_index = 0;
    let mut max_height = f64::MIN;
    for (idx, sample) in samples.iter().enumerate() {
        let height = f64::from(sample.value) - f64::from(offset);
        sum += height;
        weighted_sum += f64::from(sample.bucket) * height;
        if height > max_height {
            max_height = height;
            max_index = idx;
        }
    }

    Some(Hit {
        cobo: cobo as u32,
        asad: asad as u32,
        aget: key.aget() as u32,
        channel: key.channel() as u32,
        time: weighted_sum / sum,
        peak: interpolate_peak(samples, max_index, offset),
        integral: sum,
    })
}

/// Estimate the peak height of a trace around the sample at `max_index`.
///
/// If the maximum has a neighbor on both sides, a parabola is fit through the three points
/// and evaluated at its vertex. Otherwise, or if the three points do not define a vertex,
/// the raw baseline subtracted maximum is returned. Buckets need not be contiguous.
pub fn interpolate_peak(samples: &[RawSample], max_index: usize, offset: u16) -> f64 {
    let point = |idx: usize| -> (f64, f64) {
        let s = samples[idx];
        (f64::from(s.bucket), f64::from(s.value) - f64::from(offset))
    };

    let Some(max_sample) = samples.get(max_index) else {
        return 0.0;
    };
    let raw_max = f64::from(max_sample.value) - f64::from(offset);
    if max_index == 0 || max_index + 1 >= samples.len() {
        return raw_max;
    }

    let p1 = point(max_index - 1);
    let p2 = point(max_index);
    let p3 = point(max_index + 1);
    match vertex_position(p1, p2, p3) {
        Some(x) => lagrange(p1, p2, p3, x).unwrap_or(raw_max),
        None => raw_max,
    }
}

/// Position of the vertex of the parabola through three points, if there is one
fn vertex_position(
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    (x3, y3): (f64, f64),
) -> Option<f64> {
    let denom = (y1 - y2) * (x3 - x2) + (y3 - y2) * (x2 - x1);
    if denom == 0.0 {
        return None;
    }
    let numer = (y1 - y2) * (x3 - x2).powi(2) - (y3 - y2) * (x2 - x1).powi(2);
    Some(x2 + numer / (2.0 * denom))
}

/// Evaluate the 2nd order Lagrange polynomial through three points at x
fn lagrange(
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    (x3, y3): (f64, f64),
    x: f64,
) -> Option<f64> {
    let d1 = (x1 - x2) * (x1 - x3);
    let d2 = (x2 - x3) * (x2 - x1);
    let d3 = (x3 - x1) * (x3 - x2);
    if d1 * d2 * d3 == 0.0 {
        return None;
    }
    Some(
        y1 * (x - x2) * (x - x3) / d1
            + y2 * (x - x3) * (x - x1) / d2
            + y3 * (x - x1) * (x - x2) / d3,
    )
}
