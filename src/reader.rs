//! Overlay of parameter file values onto a [`ParameterStore`].
//!
//! Reading is all-or-nothing: every assignment is checked against the
//! schema first, and the store is only modified when the whole input is
//! clean. All independent problems of one input (syntax, unknown sections,
//! unknown parameters, invalid values) are reported together; a single
//! problem is returned as itself, several as [`ParamError::Multiple`].

use std::path::Path;

use tracing::{debug, warn};

use crate::dsl::{self, Entry, ParameterAst};
use crate::error::{ParamError, Result};
use crate::schema::{display_path, SectionNode};
use crate::store::ParameterStore;

/// A checked assignment waiting to be committed.
struct Pending {
    path: Vec<String>,
    key: String,
    value: String,
    line: usize,
}

/// Parse `input` and overlay its values onto `store`.
pub fn read_str(input: &str, store: &mut ParameterStore) -> Result<()> {
    let (ast, mut errors) = dsl::parse_collecting(input);
    let pending = check(&ast, store, &mut errors);
    commit(pending, errors, store)
}

/// Read the file at `path` and overlay its values onto `store`.
///
/// `None`, or an empty path, leaves the defaults in place.
pub fn read_input(path: Option<&Path>, store: &mut ParameterStore) -> Result<()> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => {
            debug!(path = %path.display(), "reading parameter file");
            let input = dsl::read_file(path)?;
            read_str(&input, store)
        }
        _ => {
            debug!("no parameter file given; using defaults");
            Ok(())
        }
    }
}

fn check(ast: &ParameterAst, store: &ParameterStore, errors: &mut Vec<ParamError>) -> Vec<Pending> {
    let mut pending = Vec::new();
    let mut path = Vec::new();
    check_block(
        &ast.entries,
        store.schema().root(),
        &mut path,
        &mut pending,
        errors,
    );
    pending
}

fn check_block(
    entries: &[Entry],
    section: &SectionNode,
    path: &mut Vec<String>,
    pending: &mut Vec<Pending>,
    errors: &mut Vec<ParamError>,
) {
    for entry in entries {
        match entry {
            Entry::Assignment(assignment) => {
                let Some(leaf) = section.entry(&assignment.key) else {
                    errors.push(ParamError::UnknownParameter {
                        path: display_path(path.as_slice()),
                        key: assignment.key.clone(),
                        line: assignment.line,
                    });
                    continue;
                };
                if !leaf.pattern.validate(&assignment.value) {
                    errors.push(ParamError::InvalidValue {
                        path: display_path(path.as_slice()),
                        key: assignment.key.clone(),
                        value: assignment.value.clone(),
                        pattern: leaf.pattern.describe(),
                        line: Some(assignment.line),
                    });
                    continue;
                }
                if let Some(earlier) = pending
                    .iter()
                    .find(|p| p.path == *path && p.key == assignment.key)
                {
                    warn!(
                        section = %display_path(path.as_slice()),
                        key = %assignment.key,
                        first = earlier.line,
                        again = assignment.line,
                        "parameter set more than once; the last value wins"
                    );
                }
                pending.push(Pending {
                    path: path.clone(),
                    key: assignment.key.clone(),
                    value: assignment.value.clone(),
                    line: assignment.line,
                });
            }
            Entry::Subsection(subsection) => {
                let Some(child) = section.section(&subsection.name) else {
                    errors.push(ParamError::UnknownSection {
                        path: display_path(path.as_slice()),
                        name: subsection.name.clone(),
                        line: subsection.line,
                    });
                    continue;
                };
                path.push(subsection.name.clone());
                check_block(&subsection.entries, child, path, pending, errors);
                path.pop();
            }
        }
    }
}

fn commit(pending: Vec<Pending>, errors: Vec<ParamError>, store: &mut ParameterStore) -> Result<()> {
    if let Some(err) = ParamError::aggregate(errors) {
        return Err(err);
    }
    for Pending {
        path,
        key,
        value,
        line,
    } in pending
    {
        debug!(section = %display_path(&path), %key, %value, line, "overlaying parameter");
        store.set(&path, &key, &value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FunctionHandles;
    use crate::schema::build_schema;

    fn store() -> ParameterStore {
        ParameterStore::new(build_schema(2, &FunctionHandles::parsed(2)).unwrap()).unwrap()
    }

    #[test]
    fn test_overlay_replaces_defaults() {
        let mut store = store();
        read_str(
            "subsection geometry\n  set grid_name = hyper_shell\n  sizes = 0.5, 1.\nend\n",
            &mut store,
        )
        .unwrap();
        assert_eq!(store.get(&["geometry"], "grid_name").unwrap(), "hyper_shell");
        assert_eq!(store.get(&["geometry"], "sizes").unwrap(), "0.5, 1.");
        assert_eq!(store.get(&["geometry"], "transformations").unwrap(), "0., 0., 0.");
    }

    #[test]
    fn test_empty_input_keeps_defaults() {
        let mut store = store();
        let before = store.clone();
        read_str("", &mut store).unwrap();
        read_str("# only a comment\n\n", &mut store).unwrap();
        read_input(None, &mut store).unwrap();
        read_input(Some(Path::new("")), &mut store).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_invalid_values() {
        for (section, key, value) in [
            ("geometry", "grid_name", "not_a_shape"),
            ("time", "end_time", "-1."),
            ("solver", "max_iterations", "abc"),
            ("solver", "normalize_tolerance", "TRUE"),
        ] {
            let mut store = store();
            let input = format!("subsection {section}\n  {key} = {value}\nend\n");
            match read_str(&input, &mut store) {
                Err(ParamError::InvalidValue {
                    path,
                    key: bad_key,
                    line,
                    pattern,
                    ..
                }) => {
                    assert_eq!(path, section);
                    assert_eq!(bad_key, key);
                    assert_eq!(line, Some(2));
                    assert!(pattern.starts_with('['));
                }
                other => panic!("expected InvalidValue for {key} = {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unknown_parameter_and_section() {
        let mut store = store();
        let err = read_str("subsection geometry\n  bogus_field = 1\nend\n", &mut store).unwrap_err();
        assert!(matches!(
            err,
            ParamError::UnknownParameter { ref path, ref key, line: 2 } if path == "geometry" && key == "bogus_field"
        ));

        let err = read_str("subsection nowhere\n  dim = 2\nend\n", &mut store).unwrap_err();
        assert!(matches!(err, ParamError::UnknownSection { ref name, line: 1, .. } if name == "nowhere"));

        // A leaf of another section is unknown here.
        let err = read_str("subsection time\n  dim = 2\nend\n", &mut store).unwrap_err();
        assert!(matches!(err, ParamError::UnknownParameter { .. }));
    }

    #[test]
    fn test_errors_are_aggregated_and_nothing_is_committed() {
        let mut store = store();
        let input = "\
subsection time
  end_time = 3.
  step_size = -0.1
end
subsection geometry
  bogus_field = 1
  grid_name hyper_shell
end
subsection nowhere
  anything = at all
end
";
        let err = read_str(input, &mut store).unwrap_err();
        let problems: Vec<&ParamError> = err.problems().collect();
        assert_eq!(problems.len(), 4);
        assert!(problems
            .iter()
            .any(|e| matches!(e, ParamError::MalformedInput { line: 7, .. })));
        assert!(problems
            .iter()
            .any(|e| matches!(e, ParamError::InvalidValue { line: Some(3), .. })));
        assert!(problems
            .iter()
            .any(|e| matches!(e, ParamError::UnknownParameter { line: 6, .. })));
        assert!(problems
            .iter()
            .any(|e| matches!(e, ParamError::UnknownSection { line: 9, .. })));

        // end_time was valid but must not have been applied.
        assert_eq!(store.get(&["time"], "end_time").unwrap(), "1.");
    }

    #[test]
    fn test_assigning_to_subsection_keyword_is_malformed() {
        let mut store = store();
        let err = read_str("subsection = 2\n", &mut store).unwrap_err();
        assert!(matches!(err, ParamError::MalformedInput { line: 1, .. }));
    }

    #[test]
    fn test_last_assignment_wins() {
        let mut store = store();
        read_str(
            "subsection output\n  time_step_interval = 2\n  time_step_interval = 5\nend\n",
            &mut store,
        )
        .unwrap();
        assert_eq!(store.get(&["output"], "time_step_interval").unwrap(), "5");
    }

    #[test]
    fn test_repeated_sections_merge() {
        let mut store = store();
        read_str(
            "subsection solver\n  tolerance = 1e-6\nend\nsubsection solver\n  max_iterations = 50\nend\n",
            &mut store,
        )
        .unwrap();
        assert_eq!(store.get(&["solver"], "tolerance").unwrap(), "1e-6");
        assert_eq!(store.get(&["solver"], "max_iterations").unwrap(), "50");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut store = store();
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.prm")), &mut store).unwrap_err();
        assert!(matches!(err, ParamError::FileReadError { .. }));
    }
}
