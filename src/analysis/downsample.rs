//! Stride thinning for display.
//!
//! This bounds how many points a chart draws; it is not a statistical sampler.

/// Stride used for `len` points at the given display density: `max(1, len / target)`.
///
/// A target of 0 is treated as 1.
pub fn stride(len: usize, target: usize) -> usize {
    (len / target.max(1)).max(1)
}

/// Keep every `stride(len, target)`-th point, starting with the first.
pub fn downsample<T: Clone>(points: &[T], target: usize) -> Vec<T> {
    let step = stride(points.len(), target);
    points.iter().step_by(step).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs_are_kept_whole() {
        let pts: Vec<usize> = (1..=40).collect();
        assert_eq!(downsample(&pts, 50), pts);
    }

    #[test]
    fn stride_is_integer_ratio() {
        assert_eq!(stride(730, 50), 14);
        assert_eq!(stride(104, 50), 2);
        assert_eq!(stride(24, 15), 1);
        assert_eq!(stride(0, 50), 1);
        assert_eq!(stride(10, 0), 10);
    }

    #[test]
    fn keeps_first_point_and_order() {
        let pts: Vec<usize> = (1..=730).collect();
        let out = downsample(&pts, 50);

        assert_eq!(out[0], 1);
        assert!(out.windows(2).all(|w| w[1] - w[0] == 14));
        assert_eq!(out.len(), 730usize.div_ceil(14));
    }

    #[test]
    fn non_empty_input_never_yields_nothing() {
        for n in 1..=200usize {
            for target in [0usize, 1, 15, 50] {
                let pts: Vec<usize> = (0..n).collect();
                let out = downsample(&pts, target);
                assert!(!out.is_empty(), "n={n} target={target}");
                assert_eq!(out[0], 0);
            }
        }
        assert!(downsample::<f64>(&[], 50).is_empty());
    }
}
