use std::path::PathBuf;
use structopt::StructOpt;
use zernike_fit::{
    metrics::{peak_to_valley, rms},
    SurfaceSamples, ZernikeFitter,
};

#[derive(Debug, StructOpt)]
#[structopt(name = "zernike-fit", about = "Fitting Zernike modes to surface samples")]
struct Opt {
    /// Path to the surface samples CSV file with the columns x, y and w (*.csv or *.csv.gz)
    #[structopt(short, long, parse(from_os_str))]
    path: PathBuf,
    /// Singular values below rcond times the largest singular value are discarded
    #[structopt(long)]
    rcond: Option<f64>,
    /// Reports the surface RMS and PV after removing piston, tip and tilt
    #[structopt(long)]
    remove_ptt: bool,
    /// Prints only the fit residual, as CSV, to stdout
    #[structopt(short, long)]
    residual: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let samples = SurfaceSamples::from_path(&opt.path)?;
    let mut fitter = ZernikeFitter::default();
    if let Some(arg) = opt.rcond {
        fitter = fitter.rcond(arg);
    }

    let (x, y, w) = (samples.x(), samples.y(), samples.w());
    if opt.residual {
        let zfit = fitter.fit(x, y, w, true)?;
        if let Some(surface) = zfit.surface.as_ref() {
            print!("{}", residual_csv(x, y, &surface.residual));
        }
        return Ok(());
    }

    let (zfit, metrics) = fitter.fit_metrics(x, y, w)?;

    println!("SURFACE:");
    println!(" - # of samples: {}", samples.len());
    println!(" - max. radius: {:.6}", samples.polar()?.max_radius());
    println!(" - RMS: {:.3e}, PV: {:.3e}", rms(w), peak_to_valley(w));
    println!("ZERNIKE COEFFICIENTS:");
    zfit.iter().for_each(|(mode, c)| {
        println!(
            "  {:>2} ({},{:>2}) {:<30}: {:>+12.3e}",
            mode.index(),
            mode.radial_order(),
            mode.azimuthal_frequency(),
            mode.to_string(),
            c
        )
    });
    println!("ZERNIKE MODES:");
    print!("{}", metrics);
    if let (Some(res_rms), Some(res_pv)) = (zfit.residual_rms(), zfit.residual_pv()) {
        println!("FIT RESIDUAL:");
        println!(" - RMS: {:.3e}, PV: {:.3e}", res_rms, res_pv);
    }
    if opt.remove_ptt {
        let w_ptt = fitter.remove_piston_tip_tilt(x, y, w)?;
        println!("PISTON, TIP & TILT REMOVED:");
        println!(
            " - RMS: {:.3e}, PV: {:.3e}",
            rms(&w_ptt),
            peak_to_valley(&w_ptt)
        );
    }

    Ok(())
}

fn residual_csv(x: &[f64], y: &[f64], residual: &[f64]) -> String {
    let mut csv = String::from("x,y,residual\n");
    x.iter()
        .zip(y)
        .zip(residual)
        .for_each(|((x, y), r)| csv.push_str(&format!("{},{},{}\n", x, y, r)));
    csv
}
