//! Dominant color extraction.
//!
//! `k == 1` asks for the exact most common pixel. Larger palettes come from
//! k-means in RGB space, seeded so that the same image always yields the same
//! palette.

use std::borrow::Cow;
use std::collections::HashMap;

use image::{RgbImage, imageops::FilterType};
use kmeans_colors::get_kmeans;
use log::{debug, warn};
use palette::Srgb;

use crate::config::{ExtractOptions, validate_color_count};
use crate::error::{PaletteError, Result};

/// A representative color and the number of pixels it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    pub color: Srgb<u8>,
    pub count: usize,
}

/// Representative colors sorted by descending pixel count.
///
/// Never empty: construction goes through [`dominant_colors`], which rejects
/// empty images.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    clusters: Vec<Cluster>,
    total_pixels: usize,
}

impl Palette {
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn colors(&self) -> Vec<Srgb<u8>> {
        self.clusters.iter().map(|c| c.color).collect()
    }

    /// The most prevalent color.
    pub fn dominant(&self) -> Srgb<u8> {
        self.clusters[0].color
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of pixels the palette was computed from.
    pub fn total_pixels(&self) -> usize {
        self.total_pixels
    }

    /// Fraction of pixels belonging to entry `rank` (0-based).
    pub fn share(&self, rank: usize) -> f64 {
        self.clusters[rank].count as f64 / self.total_pixels as f64
    }
}

/// Reduce an image to `k` colors ordered by prevalence.
pub fn dominant_colors(image: &RgbImage, k: usize, options: &ExtractOptions) -> Result<Palette> {
    validate_color_count(k)?;
    options.validate()?;

    if image.width() == 0 || image.height() == 0 {
        return Err(PaletteError::EmptyImage);
    }

    let working = downsample(image, options.max_side);
    let pixels: Vec<Srgb<u8>> = working
        .pixels()
        .map(|p| Srgb::new(p[0], p[1], p[2]))
        .collect();

    let mut clusters = if k == 1 {
        vec![most_common(&pixels)]
    } else {
        cluster_with(&pixels, k, options)
    };

    // Stable: equal counts keep ascending cluster index.
    clusters.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(Palette {
        clusters,
        total_pixels: pixels.len(),
    })
}

/// Partition `points` into exactly `k` clusters with k-means.
///
/// Clusters come back in index order: numbered by the first point assigned to
/// each, with empty clusters last. Returns an empty vector when there is
/// nothing to cluster.
pub fn cluster(points: &[Srgb<u8>], k: usize, seed: u64) -> Vec<Cluster> {
    let options = ExtractOptions {
        seed,
        ..Default::default()
    };
    cluster_with(points, k, &options)
}

fn cluster_with(points: &[Srgb<u8>], k: usize, options: &ExtractOptions) -> Vec<Cluster> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }

    let distinct = distinct_colors(points);
    debug!("{} pixels, {} distinct colors, k = {k}", points.len(), distinct.len());

    if distinct.len() <= k {
        // Every color gets its own cluster; nothing left to optimise.
        let mut clusters: Vec<Cluster> = distinct
            .iter()
            .map(|&(color, count)| Cluster { color, count })
            .collect();
        fill_empty(&mut clusters, &distinct, k);
        return clusters;
    }

    let buf: Vec<Srgb<f32>> = points.iter().map(|c| c.into_format::<f32>()).collect();
    let result = get_kmeans(
        k,
        options.max_iterations,
        options.converge,
        false,
        &buf,
        options.seed,
    );
    debug!("k-means score {}", result.score);

    let labels: Vec<usize> = result.indices.iter().map(|&i| i as usize).collect();
    let mut clusters = centroids_in_first_seen_order(points, &labels, k);
    if clusters.len() < k {
        warn!(
            "{} of {k} clusters ended empty, re-seeding from input pixels",
            k - clusters.len()
        );
        fill_empty(&mut clusters, &distinct, k);
    }
    clusters
}

/// Mean color of each non-empty cluster, renumbered by first assigned point.
fn centroids_in_first_seen_order(points: &[Srgb<u8>], labels: &[usize], k: usize) -> Vec<Cluster> {
    let mut slot_of: Vec<Option<usize>> = vec![None; k];
    let mut sums: Vec<[u64; 3]> = Vec::with_capacity(k);
    let mut counts: Vec<usize> = Vec::with_capacity(k);

    for (point, &label) in points.iter().zip(labels) {
        let slot = *slot_of[label].get_or_insert_with(|| {
            sums.push([0; 3]);
            counts.push(0);
            counts.len() - 1
        });
        sums[slot][0] += u64::from(point.red);
        sums[slot][1] += u64::from(point.green);
        sums[slot][2] += u64::from(point.blue);
        counts[slot] += 1;
    }

    sums.iter()
        .zip(&counts)
        .map(|(sum, &count)| Cluster {
            color: Srgb::new(
                mean_channel(sum[0], count),
                mean_channel(sum[1], count),
                mean_channel(sum[2], count),
            ),
            count,
        })
        .collect()
}

/// Halves round to even, so a mean of 0.5 becomes 0 and 2.5 becomes 2.
fn mean_channel(sum: u64, count: usize) -> u8 {
    (sum as f64 / count as f64).round_ties_even().clamp(0.0, 255.0) as u8
}

/// Pad `clusters` to `k` with zero-count entries taken from distinct input
/// colors, preferring colors not already used as a centroid.
fn fill_empty(clusters: &mut Vec<Cluster>, distinct: &[(Srgb<u8>, usize)], k: usize) {
    let unused: Vec<Srgb<u8>> = distinct
        .iter()
        .map(|&(color, _)| color)
        .filter(|color| clusters.iter().all(|c| c.color != *color))
        .collect();
    let mut seeds = unused
        .into_iter()
        .chain(distinct.iter().map(|&(color, _)| color).cycle());

    while clusters.len() < k {
        match seeds.next() {
            Some(color) => clusters.push(Cluster { color, count: 0 }),
            None => break,
        }
    }
}

/// Exact mode of the pixels. Ties go to the color seen first.
fn most_common(pixels: &[Srgb<u8>]) -> Cluster {
    let mut best = Cluster {
        color: pixels[0],
        count: 0,
    };
    for (color, count) in distinct_colors(pixels) {
        if count > best.count {
            best = Cluster { color, count };
        }
    }
    best
}

/// Distinct colors with their counts, in order of first appearance.
fn distinct_colors(pixels: &[Srgb<u8>]) -> Vec<(Srgb<u8>, usize)> {
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut entries: Vec<(Srgb<u8>, usize)> = Vec::new();
    for &p in pixels {
        let key = [p.red, p.green, p.blue];
        match index.get(&key) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(key, entries.len());
                entries.push((p, 1));
            }
        }
    }
    entries
}

/// Nearest-neighbour shrink so the longest side is at most `max_side`.
fn downsample(image: &RgbImage, max_side: Option<u32>) -> Cow<'_, RgbImage> {
    let (w, h) = image.dimensions();
    match max_side {
        Some(side) if w.max(h) > side => {
            let ratio = side as f32 / w.max(h) as f32;
            let out_w = ((w as f32) * ratio).round().max(1.0) as u32;
            let out_h = ((h as f32) * ratio).round().max(1.0) as u32;
            debug!("downsampling {w}x{h} to {out_w}x{out_h}");
            Cow::Owned(image::imageops::resize(image, out_w, out_h, FilterType::Nearest))
        }
        _ => Cow::Borrowed(image),
    }
}
