//! Zernike least-squares fit
//!
//! The coefficients are the minimum-norm least-squares solution of `A c = w`,
//! with `A` the Zernike design matrix, computed from the singular value decomposition of `A`.
//! Singular values smaller than `rcond` times the largest singular value are discarded,
//! `rcond` defaults to the machine precision times the largest dimension of `A`.
//! Rank deficient systems (too few samples, degenerate sample geometry) are solved
//! without error.

use crate::{
    design::design_matrix,
    metrics::{peak_to_valley, rms},
    mode::Mode,
    samples::{check_samples, Polar},
    Result, ZernikeError, N_MODE,
};
use nalgebra::{DMatrix, DVector};
use strum::IntoEnumIterator;

// piston, tip and tilt
const N_LOW_ORDER: usize = 3;
// SVD iteration cap
const SVD_MAX_NITER: usize = 10_000;

/// Reconstructed surface and fit residual
#[derive(Debug, Clone)]
pub struct FitSurface {
    /// the surface reconstructed from the Zernike coefficients
    pub fit: Vec<f64>,
    /// the surface minus the reconstructed surface
    pub residual: Vec<f64>,
}

/// Zernike coefficients
#[derive(Debug, Clone)]
pub struct ZernikeFit {
    /// coefficients in the ANSI order of [Mode]
    pub coefficients: Vec<f64>,
    /// reconstructed surface and residual, if requested
    pub surface: Option<FitSurface>,
}
impl ZernikeFit {
    /// Returns the coefficient of a given mode
    pub fn coefficient(&self, mode: Mode) -> f64 {
        self.coefficients[mode.index()]
    }
    /// Iterator over the modes and their coefficients
    pub fn iter(&self) -> impl Iterator<Item = (Mode, f64)> + '_ {
        Mode::iter().zip(self.coefficients.iter().cloned())
    }
    /// RMS of the fit residual, if the fit surface was requested
    pub fn residual_rms(&self) -> Option<f64> {
        self.surface.as_ref().map(|surface| rms(&surface.residual))
    }
    /// Peak-to-valley of the fit residual, if the fit surface was requested
    pub fn residual_pv(&self) -> Option<f64> {
        self.surface
            .as_ref()
            .map(|surface| peak_to_valley(&surface.residual))
    }
}

/// Zernike least-squares fitter
///
/// ```
/// use zernike_fit::ZernikeFitter;
///
/// let fitter = ZernikeFitter::default().rcond(1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZernikeFitter {
    rcond: Option<f64>,
}
impl ZernikeFitter {
    /// Sets the relative threshold below which singular values are discarded
    pub fn rcond(self, rcond: f64) -> Self {
        Self {
            rcond: Some(rcond),
        }
    }
    fn lstsq(&self, a: &DMatrix<f64>, w: &[f64]) -> Result<DVector<f64>> {
        let (n_sample, n_mode) = a.shape();
        let svd = a
            .clone()
            .try_svd(true, true, f64::EPSILON, SVD_MAX_NITER)
            .ok_or(ZernikeError::Solver("SVD did not converge"))?;
        let sigma_max = svd.singular_values.iter().cloned().fold(0f64, f64::max);
        let rcond = self
            .rcond
            .unwrap_or(f64::EPSILON * n_sample.max(n_mode) as f64);
        let eps = rcond * sigma_max;
        let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
        log::debug!(
            "SVD of {:?} design matrix: rank {}, threshold {:e}",
            a.shape(),
            rank,
            eps
        );
        if rank < n_mode {
            log::warn!(
                "Rank deficient Zernike fit (rank {} for {} modes): minimum-norm solution",
                rank,
                n_mode
            );
        }
        svd.solve(&DVector::from_column_slice(w), eps)
            .map_err(ZernikeError::Solver)
    }
    pub(crate) fn fit_design(
        &self,
        x: &[f64],
        y: &[f64],
        w: &[f64],
        return_fit: bool,
    ) -> Result<(DMatrix<f64>, ZernikeFit)> {
        check_samples(x, y, w)?;
        let polar = Polar::new(x, y)?;
        let a = design_matrix(&polar, N_MODE);
        let coefficients = self.lstsq(&a, w)?;
        let surface = return_fit.then(|| {
            let fit = &a * &coefficients;
            let residual = w.iter().zip(fit.iter()).map(|(w, f)| w - f).collect();
            FitSurface {
                fit: fit.as_slice().to_vec(),
                residual,
            }
        });
        Ok((
            a,
            ZernikeFit {
                coefficients: coefficients.as_slice().to_vec(),
                surface,
            },
        ))
    }
    /// Fits the 15 Zernike modes to the surface `w` sampled at `(x, y)`
    ///
    /// If `return_fit` is set, the reconstructed surface and the residual are returned as well.
    pub fn fit(&self, x: &[f64], y: &[f64], w: &[f64], return_fit: bool) -> Result<ZernikeFit> {
        self.fit_design(x, y, w, return_fit).map(|(_, fit)| fit)
    }
    /// Returns the surface `w` minus its piston, tip and tilt components
    pub fn remove_piston_tip_tilt(&self, x: &[f64], y: &[f64], w: &[f64]) -> Result<Vec<f64>> {
        check_samples(x, y, w)?;
        let polar = Polar::new(x, y)?;
        let a = design_matrix(&polar, N_LOW_ORDER);
        let coefficients = self.lstsq(&a, w)?;
        let low_order = &a * &coefficients;
        Ok(w.iter().zip(low_order.iter()).map(|(w, l)| w - l).collect())
    }
}

/// Fits the 15 Zernike modes to the surface `w` sampled at `(x, y)`
///
/// The coordinates are normalized by the largest radius of the sample set.
/// If `return_fit` is set, the reconstructed surface and the residual are returned as well.
pub fn extract_zernike_coeffs(
    x: &[f64],
    y: &[f64],
    w: &[f64],
    return_fit: bool,
) -> Result<ZernikeFit> {
    ZernikeFitter::default().fit(x, y, w, return_fit)
}

/// Returns the surface `w` minus its piston, tip and tilt components
pub fn remove_piston_tip_tilt(x: &[f64], y: &[f64], w: &[f64]) -> Result<Vec<f64>> {
    ZernikeFitter::default().remove_piston_tip_tilt(x, y, w)
}
