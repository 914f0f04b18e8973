use std::num::NonZeroU32;

use crate::{
    definitions::{SSIM_C1, SSIM_C2},
    EngineResult, Error, Raster,
};

/// Single-window SSIM between two equal-length intensity signals.
///
/// `SSIM = ((2*mu_x*mu_y + C1) * (2*cov_xy + C2)) / ((mu_x^2 + mu_y^2 + C1) * (var_x + var_y + C2))`
///
/// Variances and covariance are population statistics. The result is clamped to 0..=1
/// (negatively correlated signals score 0). Empty or mismatched inputs score 0.
#[must_use]
pub fn global_ssim(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return 0.0;
    }

    let n = x.len() as f64;
    let mu_x = x.iter().sum::<f64>() / n;
    let mu_y = y.iter().sum::<f64>() / n;

    let (mut var_x, mut var_y, mut cov_xy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mu_x;
        let dy = b - mu_y;
        var_x += dx * dx;
        var_y += dy * dy;
        cov_xy += dx * dy;
    }
    var_x /= n;
    var_y /= n;
    cov_xy /= n;

    let numerator = (2.0 * mu_x * mu_y + SSIM_C1) * (2.0 * cov_xy + SSIM_C2);
    let denominator = (mu_x * mu_x + mu_y * mu_y + SSIM_C1) * (var_x + var_y + SSIM_C2);

    (numerator / denominator).clamp(0.0, 1.0)
}

/// Global SSIM of two rasters after resampling both to `size` x `size` and reducing each pixel
/// to the plain mean of its R, G and B channels. Returns a value in 0..=1.
///
/// # Errors
/// [`Error::InvalidOptions`] if `size` is zero, or a resize error.
pub fn ssim_lite(first: &Raster, second: &Raster, size: u32) -> EngineResult<f64> {
    let side = NonZeroU32::new(size)
        .ok_or_else(|| Error::InvalidOptions("ssim size must be nonzero".to_string()))?;

    let x = channel_means(&first.resized(side, side)?);
    let y = channel_means(&second.resized(side, side)?);

    Ok(global_ssim(&x, &y))
}

fn channel_means(raster: &Raster) -> Vec<f64> {
    raster
        .pixels()
        .map(|[r, g, b, _a]| (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0)
        .collect()
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;

    #[test]
    fn test_identical_signals_score_one() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let x: Vec<f64> = (0..256).map(|_| rng.gen_range(0.0..255.0)).collect();
            assert!((global_ssim(&x, &x) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_inverted_signal_is_clamped_to_zero() {
        let x: Vec<f64> = (0..256).map(f64::from).map(|v| v % 2.0 * 255.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 255.0 - v).collect();
        assert_eq!(global_ssim(&x, &y), 0.0);
    }

    #[test]
    fn test_bounds_and_symmetry() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            let x: Vec<f64> = (0..64).map(|_| rng.gen_range(0.0..255.0)).collect();
            let y: Vec<f64> = (0..64).map(|_| rng.gen_range(0.0..255.0)).collect();
            let xy = global_ssim(&x, &y);
            assert!((0.0..=1.0).contains(&xy));
            assert!((xy - global_ssim(&y, &x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flat_signals_depend_only_on_means() {
        // With zero variance the structure term is C2/C2 = 1, leaving only the luminance term.
        let black = vec![0.0; 16];
        let white = vec![255.0; 16];
        let expected = SSIM_C1 / (255.0 * 255.0 + SSIM_C1);
        assert!((global_ssim(&black, &white) - expected).abs() < 1e-12);
        assert_eq!(global_ssim(&black, &black), 1.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(global_ssim(&[], &[]), 0.0);
        assert_eq!(global_ssim(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_ssim_lite_on_rasters() {
        let mut rng = StdRng::seed_from_u64(13);
        let noise = Raster::random_noise(64, 48, &mut rng);
        let same = ssim_lite(&noise, &noise, 32).expect("valid size");
        assert!((same - 1.0).abs() < 1e-9);

        let grey = Raster::solid(64, 48, [128, 128, 128, 255]);
        let different = ssim_lite(&noise, &grey, 32).expect("valid size");
        assert!(different < same);

        assert!(matches!(
            ssim_lite(&noise, &grey, 0),
            Err(Error::InvalidOptions(_))
        ));
    }
}
