//! Surface samples
//!
//! Scattered `(x, y)` positions with the surface value `w` at each position,
//! and their normalized polar coordinates.
//!
//! Samples are loaded from CSV files with the header `x,y,w`,
//! optionally gzip compressed (*\*.csv.gz*).

use crate::{Result, ZernikeError};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

#[derive(thiserror::Error, Debug)]
pub enum SamplesError {
    #[error("Failed to open the surface samples file")]
    Io(#[from] std::io::Error),
    #[error("Failed to deserialize the CSV file")]
    Csv(#[from] csv::Error),
}

#[derive(Deserialize, Debug)]
struct Record {
    x: f64,
    y: f64,
    w: f64,
}

// index of the first non-finite value in any of the sequences
fn first_non_finite(sequences: &[&[f64]]) -> Option<usize> {
    sequences
        .iter()
        .filter_map(|values| values.iter().position(|v| !v.is_finite()))
        .min()
}

/// Checks that the coordinate sequences are non-empty, of equal length and finite
pub(crate) fn check_samples(x: &[f64], y: &[f64], w: &[f64]) -> Result<()> {
    if x.len() != y.len() || x.len() != w.len() {
        return Err(ZernikeError::ShapeMismatch(vec![x.len(), y.len(), w.len()]));
    }
    if x.is_empty() {
        return Err(ZernikeError::NoData);
    }
    match first_non_finite(&[x, y, w]) {
        Some(index) => Err(ZernikeError::NonFinite(index)),
        None => Ok(()),
    }
}

/// Surface samples
#[derive(Debug, Clone)]
pub struct SurfaceSamples {
    // the x coordinates
    x: Vec<f64>,
    // the y coordinates
    y: Vec<f64>,
    // the surface value at (x,y)
    w: Vec<f64>,
}
impl SurfaceSamples {
    /// Creates a new sample set
    ///
    /// Fails if the sequences have different lengths, are empty or hold NaN or infinite values
    pub fn new(x: Vec<f64>, y: Vec<f64>, w: Vec<f64>) -> Result<Self> {
        check_samples(&x, &y, &w)?;
        Ok(Self { x, y, w })
    }
    /// Loads the samples from a CSV file with the columns `x`, `y` and `w`
    ///
    /// Files with the `gz` extension are decompressed first.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = read_contents(path)?;
        let (x, y, w) = parse_records(&contents)?;
        log::info!("Loaded {} surface samples from {:?}", x.len(), path);
        Self::new(x, y, w)
    }
    pub fn len(&self) -> usize {
        self.w.len()
    }
    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }
    pub fn x(&self) -> &[f64] {
        &self.x
    }
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    pub fn w(&self) -> &[f64] {
        &self.w
    }
    /// Iterator over the `(x, y, w)` triplets
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.w)
            .map(|((&x, &y), &w)| (x, y, w))
    }
    /// Returns the normalized polar coordinates of the samples
    pub fn polar(&self) -> Result<Polar> {
        Polar::new(&self.x, &self.y)
    }
}

fn read_contents(path: &Path) -> std::result::Result<String, SamplesError> {
    let file = File::open(path)?;
    let mut contents = String::new();
    if path.extension().and_then(|ext| ext.to_str()) == Some("gz") {
        GzDecoder::new(file).read_to_string(&mut contents)?;
    } else {
        BufReader::new(file).read_to_string(&mut contents)?;
    }
    Ok(contents)
}

type Columns = (Vec<f64>, Vec<f64>, Vec<f64>);
fn parse_records(contents: &str) -> std::result::Result<Columns, SamplesError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let mut columns: Columns = Default::default();
    for result in rdr.deserialize() {
        let record: Record = result?;
        columns.0.push(record.x);
        columns.1.push(record.y);
        columns.2.push(record.w);
    }
    Ok(columns)
}

/// Normalized polar coordinates
///
/// The radius is scaled by the largest radius of the sample set,
/// so the outermost sample lies on the unit circle.
#[derive(Debug, Clone)]
pub struct Polar {
    // the normalized radius in [0,1]
    r: Vec<f64>,
    // the angle in ]-pi,pi]
    theta: Vec<f64>,
    // the radius normalization factor
    max_radius: f64,
}
impl Polar {
    /// Converts the Cartesian coordinates `(x, y)` to normalized polar coordinates
    ///
    /// Fails if a coordinate is not finite or if all the samples are at the origin
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(ZernikeError::ShapeMismatch(vec![x.len(), y.len()]));
        }
        if x.is_empty() {
            return Err(ZernikeError::NoData);
        }
        if let Some(index) = first_non_finite(&[x, y]) {
            return Err(ZernikeError::NonFinite(index));
        }
        let r_raw: Vec<f64> = x.iter().zip(y).map(|(x, y)| x.hypot(*y)).collect();
        let max_radius = r_raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !(max_radius.is_finite() && max_radius > 0f64) {
            return Err(ZernikeError::DegenerateInput(max_radius));
        }
        Ok(Self {
            r: r_raw.into_iter().map(|r| r / max_radius).collect(),
            theta: x.iter().zip(y).map(|(x, y)| y.atan2(*x)).collect(),
            max_radius,
        })
    }
    pub fn len(&self) -> usize {
        self.r.len()
    }
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
    /// Normalized radius
    pub fn r(&self) -> &[f64] {
        &self.r
    }
    /// Angle [rd]
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }
    /// Largest radius of the sample set, in the units of the Cartesian coordinates
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::{error::Error, f64::consts::PI, fs, io::Write, path::PathBuf};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("zernike-fit_{}_{}", std::process::id(), name))
    }

    #[test]
    fn shape_mismatch() {
        match SurfaceSamples::new(vec![0.; 3], vec![0.; 3], vec![0.; 2]) {
            Err(ZernikeError::ShapeMismatch(lengths)) => assert_eq!(lengths, vec![3, 3, 2]),
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn no_data() {
        assert!(matches!(
            SurfaceSamples::new(vec![], vec![], vec![]),
            Err(ZernikeError::NoData)
        ));
    }

    #[test]
    fn polar_normalization() -> std::result::Result<(), Box<dyn Error>> {
        let polar = Polar::new(&[2., 0., -1., 0.], &[0., 1., 0., -0.5])?;
        assert_eq!(polar.max_radius(), 2.);
        assert_eq!(polar.r(), &[1., 0.5, 0.5, 0.25]);
        let expected_theta = [0., PI / 2., PI, -PI / 2.];
        polar
            .theta()
            .iter()
            .zip(expected_theta)
            .for_each(|(t, e)| assert!((t - e).abs() < 1e-15));
        Ok(())
    }

    #[test]
    fn non_finite_samples() {
        assert!(matches!(
            SurfaceSamples::new(vec![0.1, 0.2, 0.3], vec![0.; 3], vec![1., f64::INFINITY, 1.]),
            Err(ZernikeError::NonFinite(1))
        ));
        assert!(matches!(
            Polar::new(&[0.5, 0.1, -0.2], &[0.3, 0.2, f64::NAN]),
            Err(ZernikeError::NonFinite(2))
        ));
        assert!(matches!(
            Polar::new(&[f64::NEG_INFINITY, 0.1], &[0.3, 0.2]),
            Err(ZernikeError::NonFinite(0))
        ));
    }

    #[test]
    fn degenerate_radius() {
        assert!(matches!(
            Polar::new(&[0., 0.], &[0., 0.]),
            Err(ZernikeError::DegenerateInput(r)) if r == 0.
        ));
    }

    #[test]
    fn load_csv() -> std::result::Result<(), Box<dyn Error>> {
        let path = temp_path("surface.csv");
        fs::write(&path, "x,y,w\n1.0, 0.0, 0.5\n0.0,1.0,-0.5\n-1,0,0.25\n")?;
        let samples = SurfaceSamples::from_path(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.x(), &[1., 0., -1.]);
        assert_eq!(samples.y(), &[0., 1., 0.]);
        assert_eq!(samples.w(), &[0.5, -0.5, 0.25]);
        Ok(())
    }

    #[test]
    fn load_csv_gz() -> std::result::Result<(), Box<dyn Error>> {
        let path = temp_path("surface.csv.gz");
        let mut gz = GzEncoder::new(File::create(&path)?, Compression::default());
        gz.write_all(b"x,y,w\n0.5,0.5,1.0\n-0.5,0.5,2.0\n")?;
        gz.finish()?;
        let samples = SurfaceSamples::from_path(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(
            samples.iter().collect::<Vec<_>>(),
            vec![(0.5, 0.5, 1.0), (-0.5, 0.5, 2.0)]
        );
        Ok(())
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            SurfaceSamples::from_path(temp_path("missing.csv")),
            Err(ZernikeError::Samples(SamplesError::Io(_)))
        ));
    }

    #[test]
    fn load_malformed_csv() -> std::result::Result<(), Box<dyn Error>> {
        let path = temp_path("malformed.csv");
        fs::write(&path, "x,y,w\n1.0,zero,0.5\n")?;
        let result = SurfaceSamples::from_path(&path);
        fs::remove_file(&path)?;
        assert!(matches!(
            result,
            Err(ZernikeError::Samples(SamplesError::Csv(_)))
        ));
        Ok(())
    }
}
