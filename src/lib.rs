//! # Peclet Params
//!
//! Schema-driven run parameters for a convection-diffusion solver.
//!
//! This library provides:
//! - A declared, documented tree of parameters with validation patterns
//! - A human-editable parameter file format with nested subsections
//! - An echo of every resolved value, readable as input again
//! - Typed records bound from the resolved tree
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`pattern`] - Validation rules for parameter text
//! - [`schema`] - Section/leaf declarations and the fixed topology
//! - [`store`] - Resolved values and scoped section views
//! - [`dsl`] - Parser for the parameter file format
//! - [`reader`] - All-or-nothing overlay of a parsed file onto a store
//! - [`echo`] - Writing resolved values back out
//! - [`params`] - Typed parameter records
//! - [`function`] - Analytic function sub-scopes
//! - [`load`] - Entry points tying the above together
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! peclet-params input.prm --echo used_parameters.prm
//! peclet-params --print-defaults > defaults.prm
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use std::path::Path;
//!
//! let path = Path::new("input.prm");
//! let meta = peclet_params::read_meta_parameters(Some(path))?;
//! let params = peclet_params::read(Some(path), meta.dim)?;
//! println!("{}", params.structured.geometry.grid_name);
//! # Ok::<(), peclet_params::ParamError>(())
//! ```
//!
//! ## Loading Sequence
//!
//! The function sub-scopes have one component per spatial dimension plus
//! two, so the full schema depends on `meta.dim`:
//!
//! 1. Read `meta` against the schema for [`DEFAULT_DIMENSION`]
//! 2. Build the schema for `meta.dim` and fill in the defaults
//! 3. Overlay the parameter file; any problem aborts without changes
//! 4. Write the echo file
//! 5. Bind the typed records and the function sub-scopes

pub mod dsl;
pub mod echo;
pub mod error;
pub mod function;
pub mod load;
pub mod params;
pub mod pattern;
pub mod reader;
pub mod schema;
pub mod store;

// Re-export main types for convenience
pub use error::{ParamError, Result};
pub use function::{FunctionHandles, FunctionParameters, ParsedFunction};
pub use load::{read, read_meta_parameters, write_defaults, ParameterLoader, Parameters};
pub use params::StructuredParameters;
pub use pattern::Pattern;
pub use store::ParameterStore;

/// Dimension used for the schema of the `meta` pre-pass
pub const DEFAULT_DIMENSION: u32 = 1;

/// File name of the echo written next to the run
pub const ECHO_FILE_NAME: &str = "used_parameters.prm";
