use super::field::ForceField;
use super::term::EnergyTerm;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

const MIN_STEP: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MinimizerSettings {
    pub max_iterations: usize,
    /// Convergence threshold on the largest per-atom gradient norm (kcal/mol/Å).
    pub gradient_tolerance: f64,
    /// Initial maximum displacement of any atom per step (Å).
    pub initial_step: f64,
    /// Upper bound for the adaptive step (Å).
    pub max_step: f64,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            gradient_tolerance: 1e-3,
            initial_step: 0.05,
            max_step: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizationResult {
    pub energy: EnergyTerm,
    pub iterations: usize,
    pub converged: bool,
}

fn max_gradient_norm(gradient: &[Vector3<f64>]) -> f64 {
    gradient.iter().map(|g| g.norm()).fold(0.0, f64::max)
}

/// Steepest descent with an adaptive step.
///
/// Each step moves all atoms along the negative gradient, scaled so that the
/// atom with the largest gradient moves by the current step length. A step
/// that does not raise the energy is accepted and the step grows by 20%
/// (capped at `max_step`); otherwise it is rejected and the step is halved.
/// `positions` always holds the lowest-energy geometry found.
pub fn minimize(
    force_field: &ForceField,
    positions: &mut [Point3<f64>],
    settings: &MinimizerSettings,
) -> MinimizationResult {
    let n = positions.len();
    let mut gradient = vec![Vector3::zeros(); n];
    let mut energy = force_field.energy_and_gradient(positions, &mut gradient);

    let mut trial = positions.to_vec();
    let mut trial_gradient = vec![Vector3::zeros(); n];
    let mut step = settings.initial_step;
    let mut iterations = 0;

    while iterations < settings.max_iterations {
        let max_gradient = max_gradient_norm(&gradient);
        if max_gradient < settings.gradient_tolerance || step < MIN_STEP {
            break;
        }
        iterations += 1;

        let scale = step / max_gradient;
        for ((t, p), g) in trial.iter_mut().zip(positions.iter()).zip(&gradient) {
            *t = p - g * scale;
        }
        let trial_energy = force_field.energy_and_gradient(&trial, &mut trial_gradient);

        if trial_energy.total().is_finite() && trial_energy.total() <= energy.total() {
            positions.copy_from_slice(&trial);
            std::mem::swap(&mut gradient, &mut trial_gradient);
            energy = trial_energy;
            step = (step * 1.2).min(settings.max_step);
        } else {
            step *= 0.5;
        }
    }

    MinimizationResult {
        energy,
        iterations,
        converged: max_gradient_norm(&gradient) < settings.gradient_tolerance,
    }
}
