//! Molecular descriptors.
//!
//! Shape descriptors ([`shape`]) are evaluated on one conformer's point cloud
//! at a time; topological ([`topology`]) and compositional ([`composition`])
//! descriptors depend only on the bond graph and are evaluated once per
//! molecule.

pub mod composition;
pub mod shape;
pub mod topology;
