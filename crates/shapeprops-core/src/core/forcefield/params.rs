use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Stiffness constants and geometric rules of the valence force field.
///
/// Energies are in kcal/mol and lengths in Angstroms. Missing fields in a
/// parameter file keep their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceFieldParams {
    /// Bond stretch constant k in k(r − r0)².
    pub bond_stiffness: f64,
    /// Angle bend constant k in k(cos θ − cos θ0)².
    pub angle_stiffness: f64,
    /// Planarity constant k in kV², V being the triple product of three bond vectors.
    pub planarity_stiffness: f64,
    /// Repulsion constant k in k(r0 − r)² for r < r0.
    pub repulsion_stiffness: f64,
    /// Repulsion onset as a fraction of the summed van der Waals radii.
    pub repulsion_scale: f64,
    /// Pauling bond-order correction factor λ in r = r1 + r2 − λ(r1 + r2) ln(n).
    pub bond_order_correction: f64,
    /// Covalent radius of carbon by hybridization (sp3, sp2, sp).
    pub carbon_radii: [f64; 3],
}

impl Default for ForceFieldParams {
    fn default() -> Self {
        Self {
            bond_stiffness: 350.0,
            angle_stiffness: 120.0,
            planarity_stiffness: 10.0,
            repulsion_stiffness: 20.0,
            repulsion_scale: 0.75,
            bond_order_correction: 0.1332,
            carbon_radii: [0.76, 0.73, 0.69],
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameter '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

impl ForceFieldParams {
    /// Reads parameters from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let params: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamLoadError> {
        let non_negative = [
            ("bond_stiffness", self.bond_stiffness),
            ("angle_stiffness", self.angle_stiffness),
            ("planarity_stiffness", self.planarity_stiffness),
            ("repulsion_stiffness", self.repulsion_stiffness),
            ("repulsion_scale", self.repulsion_scale),
            ("bond_order_correction", self.bond_order_correction),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamLoadError::Invalid {
                    name: name.to_string(),
                    reason: format!("must be a finite non-negative number (got {value})"),
                });
            }
        }
        if self.carbon_radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(ParamLoadError::Invalid {
                name: "carbon_radii".to_string(),
                reason: "radii must be finite and positive".to_string(),
            });
        }
        Ok(())
    }
}
