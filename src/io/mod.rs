/// Blockbench-shaped model documents and their compiler.
pub mod bbmodel;

/// Imports a bundle directory into an aspect.
pub mod bundle;

/// The bundle manifest.
pub mod manifest;

pub mod texture_io;
