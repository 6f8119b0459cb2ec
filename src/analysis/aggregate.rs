//! Fixed-width bucketing of a daily series.

use crate::domain::{Bucket, BucketSize, RevenueSeries};

/// Sum revenue over consecutive, non-overlapping runs of `size` days.
///
/// Buckets start at the first day of the series and are numbered `1..=K`. A
/// trailing run shorter than the bucket size still forms a bucket with whatever
/// days remain.
pub fn aggregate(series: &RevenueSeries, size: BucketSize) -> Vec<Bucket> {
    let width = size.days();
    let buckets: Vec<Bucket> = series
        .points()
        .chunks(width)
        .enumerate()
        .map(|(idx, chunk)| Bucket {
            index: idx + 1,
            revenue: chunk.iter().map(|p| p.revenue).sum(),
            days: chunk.len(),
        })
        .collect();

    log::debug!(
        "aggregated {} day(s) into {} {:?} bucket(s)",
        series.len(),
        buckets.len(),
        size
    );
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_fortnight_gives_two_full_weeks() {
        let series = RevenueSeries::from_amounts(std::iter::repeat(12.5).take(14));
        let buckets = aggregate(&series, BucketSize::Week);

        assert_eq!(buckets.len(), 2);
        for (i, b) in buckets.iter().enumerate() {
            assert_eq!(b.index, i + 1);
            assert_eq!(b.days, 7);
            assert!((b.revenue - 7.0 * 12.5).abs() < 1e-12);
        }
    }

    #[test]
    fn partial_final_bucket_sums_remaining_days() {
        let series = RevenueSeries::from_amounts((1..=10).map(|d| d as f64));
        let buckets = aggregate(&series, BucketSize::Week);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].revenue, (1..=7).sum::<i32>() as f64);
        assert_eq!(buckets[1].revenue, 8.0 + 9.0 + 10.0);
        assert_eq!(buckets[1].days, 3);
    }

    #[test]
    fn month_buckets_cover_thirty_days() {
        let series = RevenueSeries::from_amounts(std::iter::repeat(1.0).take(65));
        let buckets = aggregate(&series, BucketSize::Month);

        let sums: Vec<f64> = buckets.iter().map(|b| b.revenue).collect();
        assert_eq!(sums, vec![30.0, 30.0, 5.0]);
    }

    #[test]
    fn empty_series_has_no_buckets() {
        assert!(aggregate(&RevenueSeries::default(), BucketSize::Month).is_empty());
    }

    #[test]
    fn input_series_is_left_untouched() {
        let series = RevenueSeries::from_amounts([1.0, 2.0, 3.0]);
        let before = series.clone();
        let _ = aggregate(&series, BucketSize::Week);
        assert_eq!(series, before);
    }
}
