//! Per-raster scalar statistics (brightness, texture, keypoint count) and the formulas used to
//! compare them. Each comparison returns a score in 0..=100.

use crate::Raster;

/// Mean over all pixels of `(r + g + b) / 3`.
#[must_use]
pub fn brightness(raster: &Raster) -> f64 {
    let total: f64 = raster
        .pixels()
        .map(|[r, g, b, _a]| (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0)
        .sum();
    total / raster.pixel_count() as f64
}

/// Local-variance proxy: for every pixel not on the outer 1-pixel border, the sum of absolute
/// luminance differences to its 8 neighbours, averaged over those pixels. Rasters with no
/// interior pixels have a texture of 0.
#[must_use]
pub fn texture(raster: &Raster) -> f64 {
    let (width, height) = (raster.width() as usize, raster.height() as usize);
    if width < 3 || height < 3 {
        return 0.0;
    }

    let luma = raster.luma_plane();
    let at = |x: usize, y: usize| luma[y * width + x];

    let mut total = 0.0;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let centre = at(x, y);
            let mut local = 0.0;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if (nx, ny) != (x, y) {
                        local += (centre - at(nx, ny)).abs();
                    }
                }
            }
            total += local;
        }
    }

    total / ((width - 2) * (height - 2)) as f64
}

/// Corner proxy: the number of pixels, at least 2 pixels away from every edge, whose luminance
/// gradient magnitude (central differences) exceeds `threshold`.
#[must_use]
pub fn keypoint_count(raster: &Raster, threshold: f64) -> u32 {
    let (width, height) = (raster.width() as usize, raster.height() as usize);
    if width < 5 || height < 5 {
        return 0;
    }

    let luma = raster.luma_plane();
    let at = |x: usize, y: usize| luma[y * width + x];

    let mut count = 0;
    for y in 2..height - 2 {
        for x in 2..width - 2 {
            let gx = at(x + 1, y) - at(x - 1, y);
            let gy = at(x, y + 1) - at(x, y - 1);
            if gx.hypot(gy) > threshold {
                count += 1;
            }
        }
    }
    count
}

#[must_use]
pub fn compare_brightness(first: f64, second: f64) -> f64 {
    100.0 * (1.0 - (first - second).abs() / 255.0).max(0.0)
}

/// `normalization` is an empirical scale, not an upper bound on texture values: very different
/// textures score 0.
#[must_use]
pub fn compare_texture(first: f64, second: f64, normalization: f64) -> f64 {
    100.0 * (1.0 - (first - second).abs() / normalization).max(0.0)
}

#[must_use]
pub fn compare_keypoints(first: u32, second: u32) -> f64 {
    let larger = first.max(second).max(1);
    100.0 * (1.0 - f64::from(first.abs_diff(second)) / f64::from(larger)).max(0.0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::definitions::{DEFAULT_KEYPOINT_THRESHOLD, DEFAULT_TEXTURE_NORMALIZATION};

    const GREY: [u8; 4] = [128, 128, 128, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn test_brightness_of_solid_colours() {
        assert_eq!(brightness(&Raster::solid(5, 5, [0, 0, 0, 255])), 0.0);
        assert_eq!(brightness(&Raster::solid(5, 5, WHITE)), 255.0);
        assert_eq!(brightness(&Raster::solid(5, 5, [30, 60, 90, 0])), 60.0);
    }

    #[test]
    fn test_brightness_comparison() {
        assert_eq!(compare_brightness(0.0, 255.0), 0.0);
        assert_eq!(compare_brightness(100.0, 100.0), 100.0);
        assert!((compare_brightness(0.0, 25.5) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_raster_has_no_texture_or_keypoints() {
        let raster = Raster::solid(20, 20, GREY);
        assert_eq!(texture(&raster), 0.0);
        assert_eq!(keypoint_count(&raster, DEFAULT_KEYPOINT_THRESHOLD), 0);
    }

    #[test]
    fn test_tiny_rasters() {
        let raster = Raster::solid(2, 2, WHITE);
        assert_eq!(texture(&raster), 0.0);
        assert_eq!(keypoint_count(&raster, DEFAULT_KEYPOINT_THRESHOLD), 0);
    }

    #[test]
    fn test_single_bright_pixel_texture() {
        // 3x3 raster: only the centre is interior, and it differs from all 8 neighbours by 255.
        let raster = Raster::with_rect(3, 3, [0, 0, 0, 255], (1, 1, 1, 1), WHITE);
        assert!((texture(&raster) - 8.0 * 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_keypoints_around_a_rectangle() {
        // A 10x10 rectangle well inside the raster: each of its 4 sides produces a 2-pixel-wide
        // band of 10 pixels with a strong gradient. The bands overlap at the 4 inner corners and
        // the diagonal outer corners see no gradient.
        let raster = Raster::with_rect(100, 100, GREY, (45, 45, 10, 10), WHITE);
        assert_eq!(keypoint_count(&raster, DEFAULT_KEYPOINT_THRESHOLD), 76);
    }

    #[test]
    fn test_keypoints_ignore_the_margin() {
        // Rectangle in the corner: only its right and bottom sides are counted, and only from
        // row/column 2 onwards, sharing the pixel at (9, 9).
        let raster = Raster::with_rect(100, 100, GREY, (0, 0, 10, 10), WHITE);
        assert_eq!(keypoint_count(&raster, DEFAULT_KEYPOINT_THRESHOLD), 31);
    }

    #[test]
    fn test_keypoint_threshold() {
        // central difference across a step of 50 is 50
        let raster = Raster::with_rect(10, 10, [0, 0, 0, 255], (5, 0, 5, 10), [50, 50, 50, 255]);
        assert_eq!(keypoint_count(&raster, 50.5), 0);
        assert_eq!(keypoint_count(&raster, 49.5), 12);
    }

    #[test]
    fn test_keypoint_comparison() {
        assert_eq!(compare_keypoints(0, 0), 100.0);
        assert_eq!(compare_keypoints(80, 80), 100.0);
        assert_eq!(compare_keypoints(0, 10), 0.0);
        assert!((compare_keypoints(80, 32) - 40.0).abs() < 1e-9);
        assert!((compare_keypoints(76, 31) - 100.0 * 31.0 / 76.0).abs() < 1e-9);
        assert_eq!(compare_keypoints(32, 80), compare_keypoints(80, 32));
    }

    #[test]
    fn test_texture_comparison_floors_at_zero() {
        assert_eq!(compare_texture(0.0, 500.0, DEFAULT_TEXTURE_NORMALIZATION), 0.0);
        assert_eq!(compare_texture(12.5, 12.5, DEFAULT_TEXTURE_NORMALIZATION), 100.0);
        assert!((compare_texture(10.0, 20.0, DEFAULT_TEXTURE_NORMALIZATION) - 90.0).abs() < 1e-9);
    }
}
