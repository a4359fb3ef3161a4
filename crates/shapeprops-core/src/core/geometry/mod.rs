//! Geometric primitives shared by the descriptors and the conformer search.
//!
//! - [`point_cloud`] - Immutable, validated coordinate snapshots of conformers
//! - [`plane`] - Least-squares plane fitting via singular value decomposition
//! - [`superpose`] - Optimal superposition (Kabsch) and RMSD
//! - [`transform`] - Rotations about axes and bonds

pub mod plane;
pub mod point_cloud;
pub mod superpose;
pub mod transform;
