//! Zernike modes
//!
//! The first 15 Zernike polynomials (radial orders 0 to 4) in the ANSI ordering,
//! defined over the unit disk in normalized polar coordinates.

use crate::{Result, ZernikeError};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Number of supported Zernike modes
pub const N_MODE: usize = 15;

/// Zernike mode in ANSI order
///
/// The variant order is the column order of the design matrix
/// and the order of the fitted coefficients.
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Piston,
    TiltY,
    TiltX,
    ObliqueAstigmatism,
    Defocus,
    VerticalAstigmatism,
    VerticalTrefoil,
    VerticalComa,
    HorizontalComa,
    ObliqueTrefoil,
    ObliqueQuadrafoil,
    ObliqueSecondaryAstigmatism,
    PrimarySpherical,
    VerticalSecondaryAstigmatism,
    VerticalQuadrafoil,
}
impl Mode {
    /// Iterator over the first `n_mode` modes
    pub fn first(n_mode: usize) -> impl Iterator<Item = Mode> {
        Mode::iter().take(n_mode)
    }
    /// Position of the mode in the ANSI ordering
    pub fn index(&self) -> usize {
        *self as usize
    }
    /// Radial order `n`
    pub fn radial_order(&self) -> i32 {
        <(i32, i32)>::from(*self).0
    }
    /// Azimuthal frequency `m`
    pub fn azimuthal_frequency(&self) -> i32 {
        <(i32, i32)>::from(*self).1
    }
    /// Value of the mode at the normalized radius `r` and angle `theta`
    pub fn value(&self, r: f64, theta: f64) -> f64 {
        use Mode::*;
        match self {
            Piston => 1f64,
            TiltY => r * theta.sin(),
            TiltX => r * theta.cos(),
            ObliqueAstigmatism => r.powi(2) * (2. * theta).sin(),
            Defocus => 2. * r.powi(2) - 1.,
            VerticalAstigmatism => r.powi(2) * (2. * theta).cos(),
            VerticalTrefoil => r.powi(3) * (3. * theta).sin(),
            VerticalComa => (3. * r.powi(3) - 2. * r) * theta.sin(),
            HorizontalComa => (3. * r.powi(3) - 2. * r) * theta.cos(),
            ObliqueTrefoil => r.powi(3) * (3. * theta).cos(),
            ObliqueQuadrafoil => r.powi(4) * (4. * theta).sin(),
            ObliqueSecondaryAstigmatism => (4. * r.powi(4) - 3. * r.powi(2)) * (2. * theta).sin(),
            PrimarySpherical => 6. * r.powi(4) - 6. * r.powi(2) + 1.,
            VerticalSecondaryAstigmatism => (4. * r.powi(4) - 3. * r.powi(2)) * (2. * theta).cos(),
            VerticalQuadrafoil => r.powi(4) * (4. * theta).cos(),
        }
    }
    /// Evaluates the mode at every `(r, theta)` pair
    ///
    /// The piston mode returns a vector of ones of the same length as the inputs.
    pub fn eval(&self, r: &[f64], theta: &[f64]) -> Result<Vec<f64>> {
        if r.len() != theta.len() {
            return Err(ZernikeError::ShapeMismatch(vec![r.len(), theta.len()]));
        }
        Ok(r.iter()
            .zip(theta)
            .map(|(&r, &theta)| self.value(r, theta))
            .collect())
    }
}
impl From<Mode> for (i32, i32) {
    fn from(mode: Mode) -> Self {
        use Mode::*;
        match mode {
            Piston => (0, 0),
            TiltY => (1, -1),
            TiltX => (1, 1),
            ObliqueAstigmatism => (2, -2),
            Defocus => (2, 0),
            VerticalAstigmatism => (2, 2),
            VerticalTrefoil => (3, -3),
            VerticalComa => (3, -1),
            HorizontalComa => (3, 1),
            ObliqueTrefoil => (3, 3),
            ObliqueQuadrafoil => (4, -4),
            ObliqueSecondaryAstigmatism => (4, -2),
            PrimarySpherical => (4, 0),
            VerticalSecondaryAstigmatism => (4, 2),
            VerticalQuadrafoil => (4, 4),
        }
    }
}
impl TryFrom<(i32, i32)> for Mode {
    type Error = ZernikeError;

    fn try_from((n, m): (i32, i32)) -> Result<Self> {
        Mode::iter()
            .find(|&mode| <(i32, i32)>::from(mode) == (n, m))
            .ok_or(ZernikeError::UnsupportedMode { n, m })
    }
}
impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Mode::*;
        let name = match self {
            Piston => "piston",
            TiltY => "tilt-y",
            TiltX => "tilt-x",
            ObliqueAstigmatism => "oblique astigmatism",
            Defocus => "defocus",
            VerticalAstigmatism => "vertical astigmatism",
            VerticalTrefoil => "vertical trefoil",
            VerticalComa => "vertical coma",
            HorizontalComa => "horizontal coma",
            ObliqueTrefoil => "oblique trefoil",
            ObliqueQuadrafoil => "oblique quadrafoil",
            ObliqueSecondaryAstigmatism => "oblique secondary astigmatism",
            PrimarySpherical => "primary spherical",
            VerticalSecondaryAstigmatism => "vertical secondary astigmatism",
            VerticalQuadrafoil => "vertical quadrafoil",
        };
        write!(f, "{}", name)
    }
}

/// Evaluates the Zernike mode `(n, m)` at every `(r, theta)` pair
///
/// Fails with [ZernikeError::UnsupportedMode] if `(n, m)` is not one of the first 15 modes.
pub fn zernike_mode(n: i32, m: i32, r: &[f64], theta: &[f64]) -> Result<Vec<f64>> {
    Mode::try_from((n, m))?.eval(r, theta)
}
