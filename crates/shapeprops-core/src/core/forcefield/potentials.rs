/// Harmonic stretch k(r − r0)². Returns the energy and dE/dr.
#[inline]
pub fn harmonic_stretch(dist: f64, r0: f64, k: f64) -> (f64, f64) {
    let dr = dist - r0;
    (k * dr * dr, 2.0 * k * dr)
}

/// Cosine-harmonic bend k(cos θ − cos θ0)². Returns the energy and dE/d(cos θ).
#[inline]
pub fn cosine_harmonic(cos_theta: f64, cos_theta0: f64, k: f64) -> (f64, f64) {
    let dc = cos_theta - cos_theta0;
    (k * dc * dc, 2.0 * k * dc)
}

/// Out-of-plane penalty kV² on a signed volume V. Returns the energy and dE/dV.
#[inline]
pub fn planarity(volume: f64, k: f64) -> (f64, f64) {
    (k * volume * volume, 2.0 * k * volume)
}

/// One-sided harmonic wall k(r0 − r)² for r < r0, zero beyond.
/// Returns the energy and dE/dr.
#[inline]
pub fn soft_repulsion(dist: f64, r0: f64, k: f64) -> (f64, f64) {
    if dist >= r0 {
        return (0.0, 0.0);
    }
    let overlap = r0 - dist;
    (k * overlap * overlap, -2.0 * k * overlap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 1e-6;

    fn assert_derivative(f: impl Fn(f64) -> (f64, f64), x: f64) {
        let numeric = (f(x + H).0 - f(x - H).0) / (2.0 * H);
        let analytic = f(x).1;
        assert!(
            (numeric - analytic).abs() < 1e-5,
            "numeric {numeric} vs analytic {analytic} at {x}"
        );
    }

    #[test]
    fn stretch_is_zero_at_equilibrium() {
        assert_eq!(harmonic_stretch(1.5, 1.5, 300.0), (0.0, 0.0));
        assert!((harmonic_stretch(1.6, 1.5, 300.0).0 - 3.0).abs() < 1e-9);
        assert_derivative(|r| harmonic_stretch(r, 1.5, 300.0), 1.37);
    }

    #[test]
    fn bend_derivative_matches_finite_difference() {
        assert_eq!(cosine_harmonic(-0.5, -0.5, 100.0).0, 0.0);
        assert_derivative(|c| cosine_harmonic(c, -1.0 / 3.0, 100.0), 0.1);
    }

    #[test]
    fn planarity_is_even_in_volume() {
        assert_eq!(planarity(0.3, 10.0).0, planarity(-0.3, 10.0).0);
        assert_derivative(|v| planarity(v, 10.0), -0.7);
    }

    #[test]
    fn repulsion_vanishes_beyond_onset() {
        assert_eq!(soft_repulsion(3.0, 2.5, 20.0), (0.0, 0.0));
        assert!(soft_repulsion(2.0, 2.5, 20.0).0 > 0.0);
        assert!(soft_repulsion(2.0, 2.5, 20.0).1 < 0.0);
        assert_derivative(|r| soft_repulsion(r, 2.5, 20.0), 2.1);
    }
}
