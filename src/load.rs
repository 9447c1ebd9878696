//! Entry points: declare, overlay, echo, bind.
//!
//! Loading is one linear pass:
//!
//! 1. build the schema for the requested dimension
//! 2. fill a [`ParameterStore`] with the declared defaults
//! 3. overlay the parameter file, if any
//! 4. write the echo file
//! 5. bind the typed records and the function sub-scopes
//!
//! The dimension decides the arity of the function sub-scopes, so callers
//! that do not know it yet run [`read_meta_parameters`] first.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::echo;
use crate::error::Result;
use crate::function::{FunctionHandles, FunctionParameters, ParsedFunction};
use crate::params::{Meta, StructuredParameters};
use crate::reader;
use crate::schema::build_schema;
use crate::store::ParameterStore;
use crate::{DEFAULT_DIMENSION, ECHO_FILE_NAME};

/// Typed records plus the bound function sub-scopes.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters<F = ParsedFunction> {
    pub structured: StructuredParameters,
    pub functions: FunctionHandles<F>,
}

/// Configures and runs a parameter load.
#[derive(Debug, Clone)]
pub struct ParameterLoader {
    dim: u32,
    input: Option<PathBuf>,
    echo: Option<PathBuf>,
}

impl ParameterLoader {
    /// A loader for `dim` spatial dimensions, with no input file and the echo
    /// written to [`ECHO_FILE_NAME`] in the working directory.
    pub fn new(dim: u32) -> Self {
        Self {
            dim,
            input: None,
            echo: Some(PathBuf::from(ECHO_FILE_NAME)),
        }
    }

    /// Read values from `path`. An empty path means no input file.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.input = (!path.as_os_str().is_empty()).then(|| path.to_path_buf());
        self
    }

    /// Write the echo file to `path` instead of the default location.
    pub fn echo_to(mut self, path: impl AsRef<Path>) -> Self {
        self.echo = Some(path.as_ref().to_path_buf());
        self
    }

    /// Do not write an echo file.
    pub fn without_echo(mut self) -> Self {
        self.echo = None;
        self
    }

    /// Build the schema, fill in defaults and overlay the input file.
    pub fn resolve<F: FunctionParameters>(
        &self,
        functions: &FunctionHandles<F>,
    ) -> Result<ParameterStore> {
        let schema = build_schema(self.dim, functions)?;
        let mut store = ParameterStore::new(schema)?;
        reader::read_input(self.input.as_deref(), &mut store)?;
        Ok(store)
    }

    /// Run the full load, binding into caller-supplied function handles.
    pub fn read_with<F: FunctionParameters>(
        &self,
        functions: &mut FunctionHandles<F>,
    ) -> Result<StructuredParameters> {
        let store = self.resolve(functions)?;
        if let Some(echo) = &self.echo {
            echo::write_file(&store, echo)?;
        }

        let structured = StructuredParameters::from_store(&store)?;
        functions.parse_parameters(&store)?;

        if structured.meta.dim != self.dim {
            warn!(
                file = structured.meta.dim,
                loaded = self.dim,
                "meta.dim differs from the dimension the parameters were loaded for"
            );
        }
        info!(
            dim = self.dim,
            input = ?self.input,
            grid = %structured.geometry.grid_name,
            "parameters loaded"
        );
        Ok(structured)
    }

    /// Run the full load with [`ParsedFunction`] sub-scopes.
    pub fn read(&self) -> Result<Parameters> {
        let mut functions = FunctionHandles::parsed(self.dim);
        let structured = self.read_with(&mut functions)?;
        Ok(Parameters {
            structured,
            functions,
        })
    }
}

/// Read only the `meta` section, using the default dimension's schema.
///
/// No echo file is written.
pub fn read_meta_parameters(path: Option<&Path>) -> Result<Meta> {
    let loader = ParameterLoader::new(DEFAULT_DIMENSION)
        .input(path.unwrap_or(Path::new("")))
        .without_echo();
    let store = loader.resolve(&FunctionHandles::parsed(DEFAULT_DIMENSION))?;
    Meta::from_section(&store.view(&["meta"])?)
}

/// Write the all-defaults echo for `dim` dimensions to `out`.
///
/// No parameter file is read, so the output lists exactly the declared
/// defaults.
pub fn write_defaults<W: Write>(dim: u32, out: W) -> Result<()> {
    let store = ParameterLoader::new(dim)
        .without_echo()
        .resolve(&FunctionHandles::parsed(dim))?;
    echo::write_parameters(&store, out)
}

/// Load every record for `dim` dimensions and write the echo file to the
/// working directory.
pub fn read(path: Option<&Path>, dim: u32) -> Result<Parameters> {
    ParameterLoader::new(dim)
        .input(path.unwrap_or(Path::new("")))
        .read()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::error::ParamError;
    use crate::schema::{LeafDeclaration, SchemaVisitor};

    fn write_input(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("input.prm");
        std::fs::write(&path, text).unwrap();
        path
    }

    fn loader(dir: &TempDir, dim: u32) -> ParameterLoader {
        ParameterLoader::new(dim).echo_to(dir.path().join(ECHO_FILE_NAME))
    }

    /// Checks that the store holds the declared default at every leaf.
    struct DefaultsHeld<'a> {
        store: &'a ParameterStore,
        checked: usize,
    }

    impl SchemaVisitor for DefaultsHeld<'_> {
        fn visit_leaf(&mut self, path: &[String], leaf: &LeafDeclaration) -> Result<()> {
            assert_eq!(self.store.get(path, &leaf.name)?, leaf.default_value);
            self.checked += 1;
            Ok(())
        }
    }

    #[test]
    fn test_no_input_yields_defaults_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader(&dir, 2);
        let store = loader.resolve(&FunctionHandles::parsed(2)).unwrap();
        let mut check = DefaultsHeld {
            store: &store,
            checked: 0,
        };
        store.schema().walk(&mut check).unwrap();
        assert_eq!(check.checked, 35);

        let params = loader.read().unwrap();
        assert_eq!(params.structured, StructuredParameters::from_store(&store).unwrap());
        assert_eq!(params.functions, FunctionHandles::parsed(2));
    }

    #[test]
    fn test_defaults_listing_ignores_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "subsection geometry\n  grid_name = cylinder\nend\n");
        let overlaid = loader(&dir, 2)
            .input(&input)
            .resolve(&FunctionHandles::parsed(2))
            .unwrap();
        assert_eq!(overlaid.get(&["geometry"], "grid_name").unwrap(), "cylinder");

        let mut listing = Vec::new();
        write_defaults(2, &mut listing).unwrap();
        let listing = String::from_utf8(listing).unwrap();
        assert!(listing.contains("set grid_name = hyper_cube\n"));
        assert!(!listing.contains("set grid_name = cylinder"));

        let defaults = ParameterLoader::new(2)
            .without_echo()
            .resolve(&FunctionHandles::parsed(2))
            .unwrap();
        assert_eq!(listing, echo::to_string(&defaults).unwrap());
    }

    #[test]
    fn test_read_writes_echo_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "subsection time\n  end_time = 2.5\nend\n");
        let params = loader(&dir, 2).input(&input).read().unwrap();
        assert_relative_eq!(params.structured.time.end_time, 2.5);

        let echo = std::fs::read_to_string(dir.path().join(ECHO_FILE_NAME)).unwrap();
        assert!(echo.contains("set end_time = 2.5"));
        assert!(echo.contains("set grid_name = hyper_cube"));
    }

    #[test]
    fn test_list_values_bind_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "subsection geometry\n  sizes = 0.5, 2.5, 3.0\nend\n");
        let params = loader(&dir, 2).input(&input).read().unwrap();
        assert_eq!(params.structured.geometry.sizes, vec![0.5, 2.5, 3.0]);
    }

    #[test]
    fn test_echo_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            &dir,
            "\
subsection meta
  dim = 2
end
subsection source_function
  set Function constants = a=0.5
  set Function expression = a*x*y; 0; 1; exp(-t)
end
subsection geometry
  grid_name = hyper_cube_with_cylindrical_hole
  sizes = 0.25, 1.
  transformations = 0.1, -0.2, 0.
end
subsection initial_values
  function_name = interpolate_old_field
end
subsection refinement
  boundaries_to_refine = 1, 2
  subsection adaptive
    max_level = 7
    coarsen_fraction = 0.05
  end
end
subsection solver
  tolerance = 1e-10
  normalize_tolerance = true
end
subsection verification
  enabled = true
  subsection exact_solution_function
    Variable names = x,y
    Function expression = x; y; 0; 0
  end
end
",
        );
        let first = loader(&dir, 2).input(&input).read().unwrap();

        let echoed = dir.path().join("echoed.prm");
        std::fs::copy(dir.path().join(ECHO_FILE_NAME), &echoed).unwrap();
        let second = loader(&dir, 2).input(&echoed).read().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.functions.source.constants, vec![("a".to_string(), 0.5)]);
        assert!(!first.functions.exact_solution.is_time_dependent());
    }

    #[test]
    fn test_invalid_input_aborts_before_echo() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "subsection geometry\n  grid_name = not_a_shape\nend\n");
        let err = loader(&dir, 2).input(&input).read().unwrap_err();
        assert!(matches!(err, ParamError::InvalidValue { .. }));
        assert!(!dir.path().join(ECHO_FILE_NAME).exists());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "subsection geometry\n  bogus_field = 1\nend\n");
        let err = loader(&dir, 2).input(&input).read().unwrap_err();
        assert!(matches!(err, ParamError::UnknownParameter { .. }));
    }

    #[test]
    fn test_explicit_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader(&dir, 2)
            .input(dir.path().join("missing.prm"))
            .read()
            .unwrap_err();
        assert!(matches!(err, ParamError::FileReadError { .. }));
    }

    #[test]
    fn test_unwritable_echo_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = ParameterLoader::new(2)
            .echo_to(dir.path().join("no_such_dir").join(ECHO_FILE_NAME))
            .read()
            .unwrap_err();
        assert!(matches!(err, ParamError::FileWriteError { .. }));
    }

    #[test]
    fn test_meta_gates_dimension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_meta_parameters(None).unwrap().dim, DEFAULT_DIMENSION);

        let input = write_input(&dir, "subsection meta\n  dim = 2\nend\n");
        let meta = read_meta_parameters(Some(&input)).unwrap();
        assert_eq!(meta.dim, 2);
        let params = loader(&dir, meta.dim).input(&input).read().unwrap();
        assert_eq!(params.structured.meta.dim, 2);
        assert_eq!(params.functions.source.n_components(), 4);

        let input = write_input(&dir, "subsection meta\n  dim = 5\nend\n");
        let err = read_meta_parameters(Some(&input)).unwrap_err();
        assert!(matches!(err, ParamError::InvalidValue { .. }));
    }

    #[test]
    fn test_boolean_case_matters() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "subsection solver\n  normalize_tolerance = TRUE\nend\n");
        assert!(matches!(
            loader(&dir, 2).input(&input).read(),
            Err(ParamError::InvalidValue { .. })
        ));

        let input = write_input(&dir, "subsection solver\n  normalize_tolerance = true\nend\n");
        let params = loader(&dir, 2).input(&input).read().unwrap();
        assert!(params.structured.solver.normalize_tolerance);
    }
}
