//! The declaration routine for the Peclet parameter tree.
//!
//! This is the one place that names every parameter, its pattern, its
//! default and its documentation.

use super::builder::SchemaBuilder;
use super::tree::SchemaTree;
use crate::error::Result;
use crate::function::{FunctionHandles, FunctionParameters};
use crate::pattern::Pattern;

/// Grids the solver knows how to generate.
pub const GRID_NAMES: &str = "hyper_rectangle | hyper_cube | hyper_shell | hemisphere_cylinder_shell \
     | cylinder | cylinder_with_split_boundaries | hyper_cube_with_cylindrical_hole";

/// Build the full schema for `dim` spatial dimensions.
pub fn build_schema<F: FunctionParameters>(
    dim: u32,
    functions: &FunctionHandles<F>,
) -> Result<SchemaTree> {
    let mut prm = SchemaBuilder::new();
    declare(&mut prm, dim, functions)?;
    prm.finish()
}

/// Declare every section and parameter into `prm`.
pub fn declare<F: FunctionParameters>(
    prm: &mut SchemaBuilder,
    dim: u32,
    functions: &FunctionHandles<F>,
) -> Result<()> {
    prm.subsection("meta", |prm| {
        prm.declare_entry("dim", &dim.to_string(), Pattern::integer_range(1, 3), "")
    })?;

    prm.subsection("source_function", |prm| {
        functions.source.declare_parameters(prm)
    })?;

    prm.subsection("geometry", |prm| {
        prm.declare_entry(
            "grid_name",
            "hyper_cube",
            Pattern::selection(GRID_NAMES),
            "Select the name of the geometry and grid to generate.\
             \nhyper_shell\
             \n\tInner boundary ID = 0\
             \n\tOuter boundary ID = 1\
             \nhemisphere_cylinder_shell\
             \ncylinder:\
             \n\tBoundary ID's\
             \n\t\t0: Heat flux\
             \n\t\t1: Outflow\
             \n\t\t2: Domain sides\
             \n\t\t3: Inflow\
             \nhyper_cube_with_cylindrical_hole:\
             \n\tOuter boundary ID = 0\
             \n\tInner spherical boundary ID = 1",
        )?;
        prm.declare_entry(
            "sizes",
            "0., 1.",
            Pattern::list(Pattern::real_min(0.)),
            "Set the sizes for the grid's geometry.\
             \n hyper_shell: {inner_radius, outer_radius}\
             \n hemisphere_cylinder_shell: {inner_sphere_radius, outer_sphere_radius, \
             inner_cylinder_length, outer_cylinder_length}\
             \n cylinder: {L0, L1, L2}\
             \n hyper_cube_with_cylindrical_hole: {hole_radius, half_of_outer_edge_length}",
        )?;
        prm.declare_entry(
            "transformations",
            "0., 0., 0.",
            Pattern::list(Pattern::real()),
            "Set the rigid body transformation vector.\
             \n 2D: {shift_along_x, shift_along_y, rotate_about_z}\
             \n 3D: {shift_along_x, shift_along_y, shift_along_z, \
             rotate_about_x, rotate_about_y, rotate_about_z}",
        )
    })?;

    prm.subsection("initial_values", |prm| {
        prm.declare_entry(
            "function_name",
            "parsed",
            Pattern::list(Pattern::selection("parsed | interpolate_old_field")),
            "",
        )?;
        prm.subsection("parsed_function", |prm| {
            functions.initial_values.declare_parameters(prm)
        })
    })?;

    prm.subsection("refinement", |prm| {
        prm.declare_entry(
            "initial_global_cycles",
            "4",
            Pattern::unsigned(),
            "Initially globally refine the grid this many times \
             without using any error measure",
        )?;
        prm.declare_entry(
            "initial_boundary_cycles",
            "0",
            Pattern::unsigned(),
            "Initially refine the grid this many times \
             near the boundaries that are listed for refinement",
        )?;
        prm.declare_entry(
            "boundaries_to_refine",
            "0",
            Pattern::list(Pattern::unsigned()),
            "Refine cells that contain these boundaries",
        )?;

        prm.subsection("adaptive", |prm| {
            prm.declare_entry(
                "initial_cycles",
                "0",
                Pattern::unsigned(),
                "Refine grid adaptively using an error measure \
                 this many times before beginning the time stepping.",
            )?;
            prm.declare_entry(
                "interval",
                "0",
                Pattern::unsigned(),
                "Only refine the grid after every occurence of \
                 this many time steps.",
            )?;
            prm.declare_entry("max_level", "10", Pattern::unsigned(), "Max grid refinement level")?;
            prm.declare_entry(
                "max_cells",
                "2000",
                Pattern::unsigned(),
                "Skip grid refinement if the number of active cells \
                 already exceeds this",
            )?;
            prm.declare_entry(
                "refine_fraction",
                "0.3",
                Pattern::real(),
                "Fraction of cells to refine",
            )?;
            prm.declare_entry(
                "coarsen_fraction",
                "0.3",
                Pattern::real(),
                "Fraction of cells to coarsen",
            )?;
            prm.declare_entry(
                "cycles_at_interval",
                "5",
                Pattern::unsigned(),
                "Refine this many times at every refinement interval",
            )
        })
    })?;

    prm.subsection("time", |prm| {
        prm.declare_entry(
            "end_time",
            "1.",
            Pattern::real_min(0.),
            "End the time-dependent simulation once this time is reached.",
        )?;
        prm.declare_entry(
            "step_size",
            "0.",
            Pattern::real_min(0.),
            "Time step size.\
             \nSet to zero to instead use global_refinement_levels",
        )?;
        prm.declare_entry(
            "global_refinement_levels",
            "4",
            Pattern::unsigned(),
            "If step_size is set to zero, then compute \
             step_size = end_time/(2^global_refinement_levels)",
        )
    })?;

    prm.subsection("solver", |prm| {
        prm.declare_entry("method", "GMRES", Pattern::selection("GMRES"), "")?;
        prm.declare_entry("max_iterations", "1000", Pattern::unsigned(), "")?;
        prm.declare_entry("tolerance", "1e-8", Pattern::real_min(0.), "")?;
        prm.declare_entry(
            "normalize_tolerance",
            "false",
            Pattern::Boolean,
            "If true, then the residual will be multiplied by the L2-norm of the RHS \
             before comparing to the tolerance.",
        )
    })?;

    prm.subsection("output", |prm| {
        prm.declare_entry("write_solution_vtk", "true", Pattern::Boolean, "")?;
        prm.declare_entry(
            "write_solution_table",
            "false",
            Pattern::Boolean,
            "This allows simple export of 1D solutions into a table format \
             easily read by MATLAB.\
             \nThis takes a great deal of memory, so it should probably only be used in 1D.",
        )?;
        prm.declare_entry(
            "time_step_interval",
            "1",
            Pattern::unsigned(),
            "Solutions will only be written at every time_step_interval time step.\
             \nSet to one to output at every time step.\
             \nSet to zero to output only the final time.",
        )
    })?;

    prm.subsection("verification", |prm| {
        prm.declare_entry("enabled", "false", Pattern::Boolean, "")?;
        prm.subsection("exact_solution_function", |prm| {
            functions.exact_solution.declare_parameters(prm)
        })
    })
}
