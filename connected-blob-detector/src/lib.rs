//! # Connected-component blob detector
//!
//! Default [`BlobDetector`] implementation. The difference raster is thresholded into a
//! foreground mask, 8-connected regions are collected by flood fill, small regions are
//! discarded and overlapping survivors are optionally merged into one.

use bgsub::prelude::v1::*;
use nalgebra as na;

/// Connected-component detector over a thresholded difference raster.
///
/// The mask buffer is reused across calls, so a detector instance causes no per-frame
/// allocation once warmed up.
#[derive(Default)]
pub struct ConnectedBlobDetector {
    mask: Vec<bool>,
}

impl ConnectedBlobDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobDetector for ConnectedBlobDetector {
    fn find_blobs(
        &mut self,
        diff: &Raster,
        params: &BlobParams,
        out: &mut Vec<Blob>,
    ) -> Result<()> {
        out.clear();

        let (width, height) = diff.dim();

        // A pixel is foreground when any channel difference falls within its band.
        self.mask.clear();
        self.mask.extend(diff.pixels().iter().map(|px| {
            [
                (px.r, params.bands[0]),
                (px.g, params.bands[1]),
                (px.b, params.bands[2]),
            ]
            .iter()
            .any(|&(v, band)| v >= band.lo && v <= band.hi)
        }));

        // Flood fill each unvisited foreground pixel into a region, clearing the mask
        // as we go.
        let mut to_fill = vec![];

        for start in 0..self.mask.len() {
            if !self.mask[start] {
                continue;
            }

            let mut pixels = 0usize;
            let (mut sum_x, mut sum_y) = (0f64, 0f64);
            let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
            let (mut max_x, mut max_y) = (0usize, 0usize);

            self.mask[start] = false;
            to_fill.clear();
            to_fill.push(start);

            while let Some(idx) = to_fill.pop() {
                let (x, y) = (idx % width, idx / width);

                pixels += 1;
                sum_x += x as f64;
                sum_y += y as f64;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                let neighbor_offs = (-1..=1).flat_map(|x| (-1..=1).map(move |y| (x, y)));

                // Go through each 8-connected neighbor and add any unvisited
                // foreground entries.
                for (x, y) in neighbor_offs
                    .map(|(ox, oy)| (x as isize + ox, y as isize + oy))
                    .filter(|&(x, y)| {
                        (0..width as isize).contains(&x) && (0..height as isize).contains(&y)
                    })
                    .map(|(x, y)| (x as usize, y as usize))
                {
                    let idx = y * width + x;
                    if self.mask[idx] {
                        self.mask[idx] = false;
                        to_fill.push(idx);
                    }
                }
            }

            if pixels < params.area_threshold {
                continue;
            }

            out.push(Blob {
                centroid: na::Point2::new(
                    (sum_x / pixels as f64) as f32,
                    (sum_y / pixels as f64) as f32,
                ),
                pixels,
                rect: Rect {
                    x: min_x,
                    y: min_y,
                    w: max_x - min_x + 1,
                    h: max_y - min_y + 1,
                },
            });
        }

        if params.merge {
            merge_overlapping(out);
        }

        Ok(())
    }
}

/// Coalesce blobs with overlapping bounding rectangles until none remain.
///
/// Merging sums pixel counts, unions bounding boxes and combines centroids weighted by
/// pixel count.
fn merge_overlapping(blobs: &mut Vec<Blob>) {
    let mut merged = true;

    while merged {
        merged = false;

        'outer: for i in 0..blobs.len() {
            for j in (i + 1)..blobs.len() {
                if blobs[i].rect.overlaps(&blobs[j].rect) {
                    let other = blobs.swap_remove(j);
                    let blob = &mut blobs[i];

                    let wa = blob.pixels as f32;
                    let wb = other.pixels as f32;
                    blob.centroid = na::Point2::new(
                        (blob.centroid.x * wa + other.centroid.x * wb) / (wa + wb),
                        (blob.centroid.y * wa + other.centroid.y * wb) / (wa + wb),
                    );
                    blob.pixels += other.pixels;
                    blob.rect = blob.rect.union(&other.rect);

                    merged = true;
                    break 'outer;
                }
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::prelude::*;

    fn params(area_threshold: usize, merge: bool) -> BlobParams {
        BlobParams {
            area_threshold,
            merge,
            ..Default::default()
        }
    }

    fn paint(raster: &mut Raster, x0: usize, y0: usize, w: usize, h: usize, v: u8) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                raster.set(x, y, Rgb::splat(v));
            }
        }
    }

    fn detect(diff: &Raster, params: &BlobParams) -> Vec<Blob> {
        let mut out = vec![];
        ConnectedBlobDetector::new()
            .find_blobs(diff, params, &mut out)
            .unwrap();
        out
    }

    #[test]
    fn detects_rectangle_with_centroid_and_bbox() {
        let mut diff = Raster::new(64, 48).unwrap();
        paint(&mut diff, 10, 5, 20, 20, 60);

        let blobs = detect(&diff, &params(100, false));

        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].pixels, 400);
        assert_eq!(blobs[0].rect, Rect { x: 10, y: 5, w: 20, h: 20 });
        assert_approx_eq!(blobs[0].centroid.x, 19.5, 1e-3);
        assert_approx_eq!(blobs[0].centroid.y, 14.5, 1e-3);
    }

    #[test]
    fn area_threshold_discards_small_blobs() {
        let mut diff = Raster::new(64, 48).unwrap();
        paint(&mut diff, 10, 5, 20, 20, 60);

        assert_eq!(detect(&diff, &params(400, false)).len(), 1);
        assert!(detect(&diff, &params(401, false)).is_empty());
    }

    #[test]
    fn band_bounds_are_inclusive_per_channel() {
        let mut diff = Raster::new(8, 8).unwrap();
        // Below lo, above hi, and a single in-band channel.
        diff.set(0, 0, Rgb::splat(9));
        diff.set(2, 0, Rgb::splat(201));
        diff.set(4, 0, Rgb::new(0, 60, 0));
        diff.set(6, 0, Rgb::new(10, 0, 0));

        let blobs = detect(&diff, &params(1, false));

        let found: Vec<_> = blobs.iter().map(|b| b.rect.x).collect();
        assert_eq!(found, vec![4, 6]);
    }

    #[test]
    fn diagonal_touch_is_connected() {
        let mut diff = Raster::new(16, 16).unwrap();
        paint(&mut diff, 0, 0, 3, 3, 60);
        paint(&mut diff, 3, 3, 3, 3, 60);

        let blobs = detect(&diff, &params(1, false));

        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].pixels, 18);
    }

    #[test]
    fn gap_of_two_pixels_separates_regions() {
        let mut diff = Raster::new(16, 16).unwrap();
        paint(&mut diff, 0, 0, 3, 3, 60);
        paint(&mut diff, 5, 0, 3, 3, 60);

        let blobs = detect(&diff, &params(1, false));

        assert_eq!(blobs.len(), 2);
    }

    #[test]
    fn merge_coalesces_overlapping_bounding_boxes() {
        let mut diff = Raster::new(32, 32).unwrap();
        // An L-shaped region whose bounding box encloses a detached single pixel.
        paint(&mut diff, 0, 0, 11, 1, 60);
        paint(&mut diff, 0, 1, 1, 10, 60);
        diff.set(5, 5, Rgb::splat(60));

        let separate = detect(&diff, &params(1, false));
        let merged = detect(&diff, &params(1, true));

        assert_eq!(separate.len(), 2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pixels, 22);
        assert_eq!(merged[0].rect, Rect { x: 0, y: 0, w: 11, h: 11 });
    }

    #[test]
    fn merged_centroid_is_pixel_weighted() {
        let mut diff = Raster::new(32, 32).unwrap();
        // L-shaped region (21 px) plus a detached square (16 px) inside its bounding box.
        paint(&mut diff, 0, 0, 11, 1, 60);
        paint(&mut diff, 0, 1, 1, 10, 60);
        paint(&mut diff, 4, 4, 4, 4, 60);

        let blobs = detect(&diff, &params(1, true));

        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].pixels, 37);
        // (55/21 * 21 + 5.5 * 16) / 37 on both axes.
        assert_approx_eq!(blobs[0].centroid.x, 143.0 / 37.0, 1e-3);
        assert_approx_eq!(blobs[0].centroid.y, 143.0 / 37.0, 1e-3);
    }

    #[test]
    fn sparse_noise_stays_below_area_threshold() {
        let mut diff = Raster::new(320, 240).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let x = rng.gen_range(0..320);
            let y = rng.gen_range(0..240);
            diff.set(x, y, Rgb::splat(60));
        }

        assert!(detect(&diff, &BlobParams::default()).is_empty());
    }

    #[test]
    fn output_is_deterministic_scan_order() {
        let mut diff = Raster::new(32, 32).unwrap();
        paint(&mut diff, 20, 0, 3, 3, 60);
        paint(&mut diff, 0, 10, 3, 3, 60);

        let blobs = detect(&diff, &params(1, false));

        // Regions surface in row-major order of their topmost pixel.
        assert_eq!(blobs[0].rect.y, 0);
        assert_eq!(blobs[1].rect.y, 10);
    }
}
