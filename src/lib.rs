//! Zernike polynomial fitting of scattered surface-height data
//!
//! The first 15 Zernike modes (radial orders 0 to 4, ANSI ordering) are fitted
//! to a surface `w` sampled at `(x, y)` with a minimum-norm least-squares solver.
//! The coordinates are normalized by the largest radius of the sample set.
//!
//! ```
//! use zernike_fit::{extract_zernike_coeffs, Mode};
//!
//! let x = [-0.5, 0., 0.5, -0.5, 0., 0.5, -0.5, 0., 0.5];
//! let y = [-0.5, -0.5, -0.5, 0., 0., 0., 0.5, 0.5, 0.5];
//! // tilt along x
//! let w: Vec<f64> = x.iter().map(|x| 0.1 * x).collect();
//! let zfit = extract_zernike_coeffs(&x, &y, &w, true)?;
//! assert_eq!(zfit.coefficients.len(), Mode::first(15).count());
//! assert!(zfit.residual_rms().unwrap() < 1e-12);
//! # Ok::<(), zernike_fit::ZernikeError>(())
//! ```

mod error;
pub use error::{Result, ZernikeError};
pub mod mode;
pub use mode::{zernike_mode, Mode, N_MODE};
pub mod design;
pub use design::{design_matrix, zernike_design_matrix};
pub mod samples;
pub use samples::{Polar, SamplesError, SurfaceSamples};
mod fit;
pub use fit::{extract_zernike_coeffs, remove_piston_tip_tilt, FitSurface, ZernikeFit, ZernikeFitter};
pub mod metrics;
pub use metrics::{zernike_surface_metrics, SurfaceMetrics};
