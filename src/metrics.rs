//! Surface quality metrics
//!
//! RMS and peak-to-valley amplitudes of each Zernike mode in a surface.

use crate::{
    fit::{ZernikeFit, ZernikeFitter},
    mode::Mode,
    Result,
};
use itertools::{Itertools, MinMaxResult};
use nalgebra::DMatrix;
use std::fmt;
use strum::IntoEnumIterator;

/// Root mean square of `values`
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0f64;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}
/// Peak-to-valley (max - min) of `values`
pub fn peak_to_valley(values: &[f64]) -> f64 {
    match values.iter().minmax() {
        MinMaxResult::MinMax(min, max) => max - min,
        _ => 0f64,
    }
}

/// RMS and peak-to-valley of each Zernike mode
#[derive(Debug, Clone, Default)]
pub struct SurfaceMetrics {
    /// RMS in the ANSI order of [Mode]
    pub rms: Vec<f64>,
    /// peak-to-valley in the ANSI order of [Mode]
    pub pv: Vec<f64>,
}
impl SurfaceMetrics {
    /// Computes the metrics of the columns of the design matrix `a` scaled by the `coefficients`
    pub fn new(a: &DMatrix<f64>, coefficients: &[f64]) -> Self {
        let (rms_values, pv_values) = a
            .column_iter()
            .zip(coefficients)
            .map(|(column, c)| {
                let mode_surface: Vec<f64> = column.iter().map(|a| a * c).collect();
                (rms(&mode_surface), peak_to_valley(&mode_surface))
            })
            .unzip();
        Self {
            rms: rms_values,
            pv: pv_values,
        }
    }
    /// Iterator over the modes with their RMS and peak-to-valley
    pub fn iter(&self) -> impl Iterator<Item = (Mode, f64, f64)> + '_ {
        Mode::iter()
            .zip(self.rms.iter().zip(&self.pv))
            .map(|(mode, (&rms, &pv))| (mode, rms, pv))
    }
    /// Returns the RMS and the peak-to-valley sequences
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.rms, self.pv)
    }
}
impl fmt::Display for SurfaceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {:>2} {:>2} {:>3} {:<30}: {:>12} {:>12}",
            "#", "N", "M", "MODE", "RMS", "PV"
        )?;
        for (mode, rms, pv) in self.iter() {
            writeln!(
                f,
                "  {:>2} {:>2} {:>3} {:<30}: {:>12.3e} {:>12.3e}",
                mode.index(),
                mode.radial_order(),
                mode.azimuthal_frequency(),
                mode.to_string(),
                rms,
                pv
            )?;
        }
        Ok(())
    }
}

impl ZernikeFitter {
    /// Fits the surface and returns the fit together with the RMS and peak-to-valley of each mode
    pub fn fit_metrics(
        &self,
        x: &[f64],
        y: &[f64],
        w: &[f64],
    ) -> Result<(ZernikeFit, SurfaceMetrics)> {
        let (a, zfit) = self.fit_design(x, y, w, true)?;
        let metrics = SurfaceMetrics::new(&a, &zfit.coefficients);
        Ok((zfit, metrics))
    }
    /// Fits the surface and returns the RMS and peak-to-valley of each mode
    pub fn surface_metrics(&self, x: &[f64], y: &[f64], w: &[f64]) -> Result<SurfaceMetrics> {
        self.fit_metrics(x, y, w).map(|(_, metrics)| metrics)
    }
}

/// Returns the RMS and peak-to-valley of each Zernike mode in the surface `w` sampled at `(x, y)`
pub fn zernike_surface_metrics(x: &[f64], y: &[f64], w: &[f64]) -> Result<SurfaceMetrics> {
    ZernikeFitter::default().surface_metrics(x, y, w)
}
