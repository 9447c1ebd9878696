//! Typed parameter records.
//!
//! Each record is read from its fixed section of a resolved
//! [`ParameterStore`]. Binding is a pure projection: it never changes the
//! store, and binding the same store twice gives equal records.

use tracing::warn;

use crate::error::Result;
use crate::store::{ParameterStore, SectionView};

/// Settings needed before the dimension-dependent schema can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    /// Spatial dimension, 1 to 3
    pub dim: u32,
}

/// Which initial values to start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialValues {
    /// `parsed` or `interpolate_old_field`
    pub function_name: String,
}

/// Grid generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// One of the grids in [`GRID_NAMES`](crate::schema::GRID_NAMES)
    pub grid_name: String,
    /// Grid-specific sizes
    pub sizes: Vec<f64>,
    /// Rigid body shifts followed by rotations
    pub transformations: Vec<f64>,
}

/// Error-driven refinement settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveRefinement {
    pub initial_cycles: u32,
    pub max_level: u32,
    pub max_cells: u32,
    pub interval: u32,
    pub cycles_at_interval: u32,
    pub refine_fraction: f64,
    pub coarsen_fraction: f64,
}

/// Initial and adaptive grid refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub initial_global_cycles: u32,
    pub initial_boundary_cycles: u32,
    /// Boundary IDs whose adjacent cells are refined initially
    pub boundaries_to_refine: Vec<u32>,
    pub adaptive: AdaptiveRefinement,
}

/// Time stepping.
#[derive(Debug, Clone, PartialEq)]
pub struct Time {
    pub end_time: f64,
    /// Zero means "derive from `global_refinement_levels`"
    pub step_size: f64,
    pub global_refinement_levels: u32,
}

impl Time {
    /// The step size to use: `step_size`, or `end_time / 2^global_refinement_levels`
    /// when `step_size` is zero.
    pub fn effective_step_size(&self) -> f64 {
        if self.step_size > 0. {
            self.step_size
        } else {
            let levels = i32::try_from(self.global_refinement_levels).unwrap_or(i32::MAX);
            self.end_time / 2f64.powi(levels)
        }
    }
}

/// Linear solver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeSolver {
    pub method: String,
    pub max_iterations: u32,
    pub tolerance: f64,
    /// Scale the tolerance by the L2-norm of the right-hand side
    pub normalize_tolerance: bool,
}

/// Solution output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub write_solution_vtk: bool,
    pub write_solution_table: bool,
    /// Write every n-th step; zero writes only the final time
    pub time_step_interval: u32,
}

/// Comparison against an exact solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub enabled: bool,
}

/// Every typed record of a resolved parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredParameters {
    pub meta: Meta,
    pub initial_values: InitialValues,
    pub geometry: Geometry,
    pub refinement: Refinement,
    pub time: Time,
    pub solver: IterativeSolver,
    pub output: Output,
    pub verification: Verification,
}

impl StructuredParameters {
    /// Bind every record from `store`.
    pub fn from_store(store: &ParameterStore) -> Result<Self> {
        let root = store.root();
        Ok(Self {
            meta: Meta::from_section(&root.subsection("meta")?)?,
            initial_values: InitialValues::from_section(&root.subsection("initial_values")?)?,
            geometry: Geometry::from_section(&root.subsection("geometry")?)?,
            refinement: Refinement::from_section(&root.subsection("refinement")?)?,
            time: Time::from_section(&root.subsection("time")?)?,
            solver: IterativeSolver::from_section(&root.subsection("solver")?)?,
            output: Output::from_section(&root.subsection("output")?)?,
            verification: Verification::from_section(&root.subsection("verification")?)?,
        })
    }
}

impl Meta {
    /// Read from the `meta` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            dim: prm.get_parsed("dim")?,
        })
    }
}

impl InitialValues {
    /// Read from the `initial_values` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            function_name: prm.get("function_name")?.to_string(),
        })
    }
}

impl Geometry {
    /// Read from the `geometry` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            grid_name: prm.get("grid_name")?.to_string(),
            sizes: prm.get_list("sizes")?,
            transformations: prm.get_list("transformations")?,
        })
    }
}

impl AdaptiveRefinement {
    /// Read from the `refinement.adaptive` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        let adaptive = Self {
            initial_cycles: prm.get_parsed("initial_cycles")?,
            max_level: prm.get_parsed("max_level")?,
            max_cells: prm.get_parsed("max_cells")?,
            interval: prm.get_parsed("interval")?,
            cycles_at_interval: prm.get_parsed("cycles_at_interval")?,
            refine_fraction: prm.get_parsed("refine_fraction")?,
            coarsen_fraction: prm.get_parsed("coarsen_fraction")?,
        };
        if adaptive.refine_fraction + adaptive.coarsen_fraction > 1. {
            warn!(
                refine = adaptive.refine_fraction,
                coarsen = adaptive.coarsen_fraction,
                "refine and coarsen fractions add up to more than one"
            );
        }
        Ok(adaptive)
    }
}

impl Refinement {
    /// Read from the `refinement` section and its `adaptive` child.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            initial_global_cycles: prm.get_parsed("initial_global_cycles")?,
            initial_boundary_cycles: prm.get_parsed("initial_boundary_cycles")?,
            boundaries_to_refine: prm.get_list("boundaries_to_refine")?,
            adaptive: AdaptiveRefinement::from_section(&prm.subsection("adaptive")?)?,
        })
    }
}

impl Time {
    /// Read from the `time` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            end_time: prm.get_parsed("end_time")?,
            step_size: prm.get_parsed("step_size")?,
            global_refinement_levels: prm.get_parsed("global_refinement_levels")?,
        })
    }
}

impl IterativeSolver {
    /// Read from the `solver` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            method: prm.get("method")?.to_string(),
            max_iterations: prm.get_parsed("max_iterations")?,
            tolerance: prm.get_parsed("tolerance")?,
            normalize_tolerance: prm.get_bool("normalize_tolerance")?,
        })
    }
}

impl Output {
    /// Read from the `output` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            write_solution_vtk: prm.get_bool("write_solution_vtk")?,
            write_solution_table: prm.get_bool("write_solution_table")?,
            time_step_interval: prm.get_parsed("time_step_interval")?,
        })
    }
}

impl Verification {
    /// Read from the `verification` section.
    pub fn from_section(prm: &SectionView<'_>) -> Result<Self> {
        Ok(Self {
            enabled: prm.get_bool("enabled")?,
        })
    }
}
