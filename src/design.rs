//! Zernike design matrix
//!
//! Each column of the matrix is one Zernike mode evaluated at every sample,
//! the columns follow the ANSI ordering of [Mode].

use crate::{mode::Mode, samples::Polar, Result, ZernikeError, N_MODE};
use nalgebra::DMatrix;

fn build(r: &[f64], theta: &[f64], n_mode: usize) -> DMatrix<f64> {
    let modes: Vec<Mode> = Mode::first(n_mode).collect();
    let mut a = DMatrix::<f64>::zeros(r.len(), modes.len());
    a.column_iter_mut()
        .zip(&modes)
        .for_each(|(mut column, mode)| {
            column
                .iter_mut()
                .zip(r.iter().zip(theta))
                .for_each(|(v, (&r, &theta))| *v = mode.value(r, theta));
        });
    a
}

/// Design matrix of the first `n_mode` Zernike modes
///
/// `n_mode` is capped at [N_MODE].
pub fn design_matrix(polar: &Polar, n_mode: usize) -> DMatrix<f64> {
    let a = build(polar.r(), polar.theta(), n_mode);
    log::debug!("Zernike design matrix: {:?}", a.shape());
    a
}

/// Design matrix of the 15 Zernike modes evaluated at `(r, theta)`
pub fn zernike_design_matrix(r: &[f64], theta: &[f64]) -> Result<DMatrix<f64>> {
    if r.len() != theta.len() {
        return Err(ZernikeError::ShapeMismatch(vec![r.len(), theta.len()]));
    }
    Ok(build(r, theta, N_MODE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn column_order() {
        let r = [0., 0.25, 0.5, 0.75, 1., 0.9, 0.1];
        let theta = [0., 0.4, -1.3, 3.1, -2.2, 1.7, -0.6];
        let a = zernike_design_matrix(&r, &theta).unwrap();
        assert_eq!(a.shape(), (7, N_MODE));
        for mode in Mode::iter() {
            let (n, m): (i32, i32) = mode.into();
            let column = crate::zernike_mode(n, m, &r, &theta).unwrap();
            let a_column: Vec<f64> = a.column(mode.index()).iter().cloned().collect();
            assert_eq!(a_column, column, "{mode}");
        }
    }

    #[test]
    fn single_sample() {
        let a = zernike_design_matrix(&[1.], &[0.]).unwrap();
        assert_eq!(a.shape(), (1, N_MODE));
        assert_eq!(a[(0, 0)], 1.);
        assert_eq!(a[(0, Mode::Defocus.index())], 1.);
    }

    #[test]
    fn low_order_columns() {
        let polar = Polar::new(&[1., 0., -0.5, 0.3], &[0., 2., 0.5, -0.1]).unwrap();
        let a = design_matrix(&polar, N_MODE);
        let a3 = design_matrix(&polar, 3);
        assert_eq!(a3.shape(), (4, 3));
        assert_eq!(a3, a.columns(0, 3).into_owned());
        assert_eq!(design_matrix(&polar, 20).ncols(), N_MODE);
    }

    #[test]
    fn shape_mismatch() {
        assert!(matches!(
            zernike_design_matrix(&[0.5, 0.6], &[0.]),
            Err(ZernikeError::ShapeMismatch(_))
        ));
    }
}
