//! Trailing-window smoothing filters applied per series.

use crate::models::DEFAULT_WINDOW;
use crate::series::SeriesSet;
use std::collections::VecDeque;

/// Signature shared by the filters so they can be applied to a whole [`SeriesSet`].
pub type MovingFilter = fn(&mut [f64], usize);

fn effective_window(n: usize) -> usize {
    if n == 0 { DEFAULT_WINDOW } else { n }
}

/// Trailing mean over the last `min(i + 1, n)` samples, in place.
///
/// The window shrinks at the start instead of padding. Non-finite samples
/// are left untouched and never enter the window. `n == 0` uses [`DEFAULT_WINDOW`].
pub fn moving_average(values: &mut [f64], n: usize) {
    let n = effective_window(n);
    let mut window: VecDeque<f64> = VecDeque::with_capacity(n.min(values.len()));
    for v in values.iter_mut() {
        if !v.is_finite() {
            continue;
        }
        window.push_back(*v);
        if window.len() > n {
            window.pop_front();
        }
        *v = window.iter().sum::<f64>() / window.len() as f64;
    }
}

/// "Moving maximum" filter.
///
/// Kept output-compatible with the plotting option it backs: it produces the
/// trailing **mean**, exactly like [`moving_average`], not a sliding maximum.
/// Callers that want a true maximum must compute it themselves.
pub fn moving_maximum(values: &mut [f64], n: usize) {
    moving_average(values, n)
}

/// Apply `filter` with window `n` to every series independently.
pub fn apply_moving_filter(set: &mut SeriesSet, filter: MovingFilter, n: usize) {
    for series in set.iter_mut() {
        filter(&mut series.y, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_shrinks_at_start() {
        let mut v = [3.0, 1.0, 2.0, 3.0, 4.0];
        moving_average(&mut v, 3);
        assert_eq!(v, [3.0, 2.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_window_falls_back_to_default() {
        let mut a = [3.0, 1.0, 2.0, 3.0, 4.0];
        let mut b = a;
        moving_average(&mut a, 0);
        moving_average(&mut b, DEFAULT_WINDOW);
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_samples_pass_through() {
        let mut v = [2.0, f64::NAN, 4.0];
        moving_average(&mut v, 2);
        assert_eq!(v[0], 2.0);
        assert!(v[1].is_nan());
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn huge_window_is_a_running_mean() {
        let mut v = [3.0, 1.0, 2.0];
        moving_average(&mut v, usize::MAX);
        assert_eq!(v, [3.0, 2.0, 2.0]);
    }
}
