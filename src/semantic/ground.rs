// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ground plane estimate from the z distribution

/// Estimate the ground height of a mesh from its vertex heights.
///
/// The heights are binned into `bins` equal-width buckets spanning
/// `[min, max]`. The result is the lower edge of the first bucket whose count
/// exceeds `peak_fraction` of the fullest bucket.
pub fn estimate_ground_height(zs: &[f64], bins: usize, peak_fraction: f64) -> f64 {
    let Some((min_z, max_z)) = zs.iter().fold(None, |acc: Option<(f64, f64)>, &z| {
        Some(match acc {
            Some((lo, hi)) => (lo.min(z), hi.max(z)),
            None => (z, z),
        })
    }) else {
        return 0.0;
    };

    if bins == 0 {
        return min_z;
    }
    let bin_width = (max_z - min_z) / bins as f64;
    if bin_width == 0.0 {
        return min_z;
    }

    let mut histogram = vec![0usize; bins];
    for &z in zs {
        let bin = (((z - min_z) / bin_width) as usize).min(bins - 1);
        histogram[bin] += 1;
    }

    let max_count = histogram.iter().copied().max().unwrap_or(0);
    let threshold = max_count as f64 * peak_fraction;

    histogram
        .iter()
        .position(|&count| count as f64 > threshold)
        .map(|i| min_z + i as f64 * bin_width)
        .unwrap_or(min_z)
}
