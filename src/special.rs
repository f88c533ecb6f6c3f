//! special functions backing the log-rank p-value

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// error function, Abramowitz & Stegun 7.1.26 (max abs error ~1.5e-7)
pub fn erf(x: f64) -> f64 {
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// chi-square CDF
///
/// exact up to the erf approximation for df = 1. every other df gets the rough
/// `1 - exp(-x/2)`, which is only the true CDF for df = 2; bring your own CDF
/// if you need anything else. zero at and below the origin, where the erf
/// approximation would otherwise leave a ~1e-9 residue.
pub fn chi_square_cdf(x: f64, df: u32) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let cdf = if df == 1 {
        erf((x / 2.0).sqrt())
    } else {
        1.0 - (-x / 2.0).exp()
    };
    cdf.clamp(0.0, 1.0)
}
