use crate::samples::SamplesError;

#[derive(thiserror::Error, Debug)]
pub enum ZernikeError {
    #[error("Unsupported (n={n}, m={m}) combination for the first 15 Zernike modes")]
    UnsupportedMode { n: i32, m: i32 },
    #[error("Coordinate sequences have different lengths ({0:?})")]
    ShapeMismatch(Vec<usize>),
    #[error("No surface samples to fit")]
    NoData,
    #[error("Sample #{0} is not finite")]
    NonFinite(usize),
    #[error("Cannot normalize coordinates with a maximum radius of {0}")]
    DegenerateInput(f64),
    #[error("Least-squares solver failed: {0}")]
    Solver(&'static str),
    #[error("Error in the `samples` module")]
    Samples(#[from] SamplesError),
}
pub type Result<T> = std::result::Result<T, ZernikeError>;
