//! Local-extrema segmentation of a wealth series
//!
//! Pure functions over an ordered sequence, independent of the
//! simulation engine so they can be exercised with synthetic series.

/// Era boundary indices for a series: always the first and last index,
/// plus every interior local extremum that survives the prominence
/// filter. Output is strictly increasing.
///
/// An interior index is a candidate when its value is strictly greater
/// than both neighbors (local max) or strictly less (local min).
/// Plateaus collapse to the plateau's first index: the comparison on
/// the right skips over equal values, so a run of equal values yields
/// at most one candidate and no spurious single-tick eras.
///
/// A candidate whose deviation from the last kept boundary falls below
/// `min_prominence` is treated as noise and dropped, which merges the
/// two adjacent eras.
pub fn era_boundaries(series: &[f32], min_prominence: f32) -> Vec<usize> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let mut boundaries = vec![0];
    let mut last_kept = series[0];

    let mut i = 1;
    while i < n - 1 {
        if series[i] == series[i - 1] {
            i += 1;
            continue;
        }
        // end of the plateau starting at i (or i+1 when no plateau)
        let mut j = i + 1;
        while j < n && series[j] == series[i] {
            j += 1;
        }
        if j == n {
            break; // plateau runs to the end; the last index covers it
        }
        let prev = series[i - 1];
        let next = series[j];
        let is_max = series[i] > prev && series[i] > next;
        let is_min = series[i] < prev && series[i] < next;
        if (is_max || is_min) && (series[i] - last_kept).abs() >= min_prominence {
            boundaries.push(i);
            last_kept = series[i];
        }
        i = j;
    }

    boundaries.push(n - 1);
    boundaries
}
