use ndarray::{Array2, Array3, ArrayView2, Axis};

/// Values above this count towards a channel's coverage.
pub const COVERAGE_THRESHOLD: f32 = 0.5;

const RAMP: &[u8] = b" .:-=+*#%@";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub channel: usize,
    pub peak: f32,
    /// `(x, y)` of the first pixel holding `peak`.
    pub peak_at: (usize, usize),
    /// Fraction of pixels above [`COVERAGE_THRESHOLD`].
    pub coverage: f32,
}

pub fn channel_stats(stack: &Array3<f32>) -> Vec<ChannelStats> {
    stack
        .outer_iter()
        .enumerate()
        .map(|(channel, map)| stats(channel, map))
        .collect()
}

fn stats(channel: usize, map: ArrayView2<'_, f32>) -> ChannelStats {
    let mut peak = 0.0_f32;
    let mut peak_at = (0, 0);
    let mut covered = 0_usize;
    for ((y, x), &value) in map.indexed_iter() {
        if value > peak {
            peak = value;
            peak_at = (x, y);
        }
        if value > COVERAGE_THRESHOLD {
            covered += 1;
        }
    }
    let coverage = if map.is_empty() {
        0.0
    } else {
        covered as f32 / map.len() as f32
    };
    ChannelStats {
        channel,
        peak,
        peak_at,
        coverage,
    }
}

/// Element-wise maximum over all channels, `(H, W)`.
pub fn max_projection(stack: &Array3<f32>) -> Array2<f32> {
    stack.fold_axis(Axis(0), 0.0_f32, |&acc, &value| acc.max(value))
}

/// Render a `[0, 1]` map as ASCII art, one character per pixel.
pub fn ascii_preview(map: &Array2<f32>) -> String {
    let levels = (RAMP.len() - 1) as f32;
    let mut preview = String::with_capacity(map.len() + map.nrows());
    for row in map.outer_iter() {
        for &value in row.iter() {
            let level = (value.max(0.0).min(1.0) * levels).round() as usize;
            preview.push(char::from(RAMP[level]));
        }
        preview.push('\n');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use ndarray::{array, Array3};

    fn stack() -> Array3<f32> {
        let mut stack = Array3::zeros((2, 2, 4));
        stack[[0, 1, 2]] = 1.0;
        stack[[0, 0, 0]] = 0.25;
        stack[[1, 0, 3]] = 0.75;
        stack[[1, 1, 3]] = 0.75;
        stack
    }

    #[test]
    fn stats_per_channel() {
        let stats = channel_stats(&stack());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].peak, 1.0);
        assert_eq!(stats[0].peak_at, (2, 1));
        assert_approx_eq!(stats[0].coverage, 0.125);
        assert_eq!(stats[1].peak, 0.75);
        assert_eq!(stats[1].peak_at, (3, 0));
        assert_approx_eq!(stats[1].coverage, 0.25);
    }

    #[test]
    fn empty_channel() {
        let stats = channel_stats(&Array3::zeros((1, 3, 3)));
        assert_eq!(stats[0].peak, 0.0);
        assert_eq!(stats[0].coverage, 0.0);
    }

    #[test]
    fn projection_takes_the_maximum() {
        let expected: Array2<f32> = array![[0.25, 0.0, 0.0, 0.75], [0.0, 0.0, 1.0, 0.75]];
        assert_eq!(max_projection(&stack()), expected);
        assert_eq!(
            max_projection(&Array3::zeros((0, 2, 3))),
            Array2::<f32>::zeros((2, 3))
        );
    }

    #[test]
    fn preview() {
        let map = array![[0.0, 1.0, 0.5], [1.0, 0.0, 0.0]];
        assert_eq!(ascii_preview(&map), " @+\n@  \n");
    }
}
