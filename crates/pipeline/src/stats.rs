//! Descriptive statistics used by the aggregations.
//!
//! - [`RatingAccumulator`]: streaming count, mean and sample variance
//! - [`RatingStats`]: the finished (avg, var, count) triple of a group
//! - [`kendall_tau`]: tie-corrected Kendall rank correlation (tau-b)

use serde::Serialize;

/// The three statistics reported for every group of ratings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub avg_rating: f64,
    /// Sample variance (n - 1 denominator); `None` for a single rating
    pub var_of_ratings: Option<f64>,
    pub num_of_ratings: usize,
}

/// Streaming accumulator for rating statistics.
///
/// The mean is `sum / count`; the variance uses Welford's update so that
/// large groups do not lose precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingAccumulator {
    count: usize,
    sum: f64,
    running_mean: f64,
    m2: f64,
}

impl RatingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one rating value
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        let delta = value - self.running_mean;
        self.running_mean += delta / self.count as f64;
        self.m2 += delta * (value - self.running_mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, `None` when nothing was pushed
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Sample variance, `None` below two observations
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Finished statistics, `None` for an empty accumulator
    pub fn finish(&self) -> Option<RatingStats> {
        Some(RatingStats {
            avg_rating: self.mean()?,
            var_of_ratings: self.sample_variance(),
            num_of_ratings: self.count,
        })
    }
}

impl FromIterator<f64> for RatingAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for value in iter {
            acc.push(value);
        }
        acc
    }
}

/// Kendall's tau-b between two paired samples.
///
/// Runs in O(n log n): pairs are sorted by (x, y) and discordant pairs are
/// counted as inversions of the y sequence during a merge sort. Ties are
/// corrected for on both sides.
///
/// Returns `None` when the samples differ in length, hold fewer than two
/// pairs, or either side is constant (the statistic is undefined).
pub fn kendall_tau(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }

    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let total = (n as u64) * (n as u64 - 1) / 2;
    let x_ties = tied_pairs(pairs.iter().map(|p| p.0));
    let joint_ties = tied_pairs(pairs.iter().copied());

    let mut ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let discordant = count_inversions(&mut ys);
    // `ys` is sorted now
    let y_ties = tied_pairs(ys.iter().copied());

    if x_ties == total || y_ties == total {
        return None;
    }

    let con_minus_dis =
        total as i64 - x_ties as i64 - y_ties as i64 + joint_ties as i64 - 2 * discordant as i64;
    let tau = con_minus_dis as f64
        / ((total - x_ties) as f64).sqrt()
        / ((total - y_ties) as f64).sqrt();

    Some(tau.clamp(-1.0, 1.0))
}

/// Number of tied pairs in a sorted sequence: sum of t(t-1)/2 over runs
fn tied_pairs<T: PartialEq>(sorted: impl IntoIterator<Item = T>) -> u64 {
    let mut iter = sorted.into_iter();
    let Some(mut prev) = iter.next() else {
        return 0;
    };

    let mut total = 0;
    let mut run: u64 = 1;
    for value in iter {
        if value == prev {
            run += 1;
        } else {
            total += run * (run - 1) / 2;
            run = 1;
            prev = value;
        }
    }
    total + run * (run - 1) / 2
}

/// Sort `values` ascending, returning the number of strict inversions
fn count_inversions(values: &mut [f64]) -> u64 {
    let mut buffer = values.to_vec();
    merge_count(values, &mut buffer)
}

fn merge_count(values: &mut [f64], buffer: &mut [f64]) -> u64 {
    let n = values.len();
    if n < 2 {
        return 0;
    }

    let mid = n / 2;
    let mut count = {
        let (left, right) = values.split_at_mut(mid);
        let (buf_left, buf_right) = buffer.split_at_mut(mid);
        merge_count(left, buf_left) + merge_count(right, buf_right)
    };

    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < mid && j < n {
        if values[i] <= values[j] {
            buffer[k] = values[i];
            i += 1;
        } else {
            buffer[k] = values[j];
            j += 1;
            count += (mid - i) as u64;
        }
        k += 1;
    }
    let rest = mid - i;
    buffer[k..k + rest].copy_from_slice(&values[i..mid]);
    buffer[k + rest..].copy_from_slice(&values[j..]);
    values.copy_from_slice(buffer);

    count
}

/// Round to a fixed number of decimal places for display
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_accumulator_basic() {
        let acc: RatingAccumulator = [5.0, 3.0].into_iter().collect();
        let stats = acc.finish().unwrap();

        assert_eq!(stats.num_of_ratings, 2);
        assert_eq!(stats.avg_rating, 4.0);
        assert_eq!(stats.var_of_ratings, Some(2.0));
    }

    #[test]
    fn test_single_value_has_no_variance() {
        let acc: RatingAccumulator = [4.5].into_iter().collect();
        let stats = acc.finish().unwrap();

        assert_eq!(stats.avg_rating, 4.5);
        assert_eq!(stats.var_of_ratings, None);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = RatingAccumulator::new();
        assert!(acc.mean().is_none());
        assert!(acc.finish().is_none());
    }

    #[test]
    fn test_variance_matches_two_pass() {
        let values = [0.5, 1.0, 3.5, 4.0, 4.0, 5.0, 2.5, 3.0];
        let acc: RatingAccumulator = values.iter().copied().collect();

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (values.len() - 1) as f64;

        assert!(approx_eq(acc.mean().unwrap(), mean));
        assert!(approx_eq(acc.sample_variance().unwrap(), var));
    }

    #[test]
    fn test_kendall_perfect_agreement() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!(approx_eq(kendall_tau(&x, &[10.0, 20.0, 30.0, 40.0]).unwrap(), 1.0));
        assert!(approx_eq(kendall_tau(&x, &[4.0, 3.0, 2.0, 1.0]).unwrap(), -1.0));
    }

    #[test]
    fn test_kendall_with_ties() {
        // Tau-b reference value for this sample: -0.47140452079103173
        let x = [12.0, 2.0, 1.0, 12.0, 2.0];
        let y = [1.0, 4.0, 7.0, 1.0, 0.0];
        let tau = kendall_tau(&x, &y).unwrap();
        assert!((tau - (-0.47140452079103173)).abs() < 1e-12);
    }

    #[test]
    fn test_kendall_matches_pairwise_definition() {
        let x = [3.5, 4.0, 2.0, 4.0, 3.0, 5.0, 1.5, 3.5];
        let y = [20.0, 5.0, 7.0, 5.0, 100.0, 2.0, 9.0, 31.0];

        let (mut con, mut dis, mut tx, mut ty) = (0i64, 0i64, 0i64, 0i64);
        for i in 0..x.len() {
            for j in (i + 1)..x.len() {
                let dx = x[i] - x[j];
                let dy = y[i] - y[j];
                if dx == 0.0 && dy == 0.0 {
                    continue;
                } else if dx == 0.0 {
                    tx += 1;
                } else if dy == 0.0 {
                    ty += 1;
                } else if dx * dy > 0.0 {
                    con += 1;
                } else {
                    dis += 1;
                }
            }
        }
        let expected = (con - dis) as f64
            / (((con + dis + tx) as f64) * ((con + dis + ty) as f64)).sqrt();

        assert!(approx_eq(kendall_tau(&x, &y).unwrap(), expected));
    }

    #[test]
    fn test_kendall_undefined() {
        assert_eq!(kendall_tau(&[1.0], &[2.0]), None);
        assert_eq!(kendall_tau(&[1.0, 2.0], &[2.0]), None);
        assert_eq!(kendall_tau(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(-0.12345, 3), -0.123);
        assert_eq!(round_to(3.50149, 3), 3.501);
    }
}
