//! Writing the resolved parameter tree back out.
//!
//! The output uses the input grammar, so an echo file can be read back and
//! yields the same records. Documentation is written as `#` comments.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{ParamError, Result};
use crate::schema::{LeafDeclaration, SchemaVisitor, SectionNode};
use crate::store::ParameterStore;

const INDENT: &str = "  ";

/// Writes `subsection`/`set` lines while walking the schema.
struct EchoWriter<'s, W> {
    store: &'s ParameterStore,
    out: W,
    first_in_section: bool,
}

impl<W: Write> EchoWriter<'_, W> {
    fn indent(&self, depth: usize) -> String {
        INDENT.repeat(depth)
    }
}

fn write_error(source: io::Error) -> ParamError {
    ParamError::FileWriteError {
        path: "<echo>".to_string(),
        source,
    }
}

impl<W: Write> SchemaVisitor for EchoWriter<'_, W> {
    fn enter_section(&mut self, path: &[String], _node: &SectionNode) -> Result<()> {
        let indent = self.indent(path.len() - 1);
        let name = path.last().map(String::as_str).unwrap_or_default();
        writeln!(self.out).map_err(write_error)?;
        writeln!(self.out, "{indent}subsection {name}").map_err(write_error)?;
        self.first_in_section = true;
        Ok(())
    }

    fn visit_leaf(&mut self, path: &[String], leaf: &LeafDeclaration) -> Result<()> {
        let indent = self.indent(path.len());
        let value = self.store.get(path, &leaf.name)?;
        if !leaf.documentation.is_empty() {
            if !self.first_in_section {
                writeln!(self.out).map_err(write_error)?;
            }
            for line in leaf.documentation.lines() {
                writeln!(self.out, "{indent}# {}", line.trim_end()).map_err(write_error)?;
            }
        }
        writeln!(self.out, "{indent}set {} = {value}", leaf.name).map_err(write_error)?;
        self.first_in_section = false;
        Ok(())
    }

    fn leave_section(&mut self, path: &[String], _node: &SectionNode) -> Result<()> {
        let indent = self.indent(path.len() - 1);
        writeln!(self.out, "{indent}end").map_err(write_error)?;
        self.first_in_section = false;
        Ok(())
    }
}

/// Write the resolved values of `store` to `out`.
pub fn write_parameters<W: Write>(store: &ParameterStore, out: W) -> Result<()> {
    let mut writer = EchoWriter {
        store,
        out,
        first_in_section: true,
    };
    writeln!(writer.out, "# Listing of Parameters").map_err(write_error)?;
    writeln!(writer.out, "# ---------------------").map_err(write_error)?;
    store.schema().walk(&mut writer)?;
    writer.out.flush().map_err(write_error)
}

/// The echo text of `store`.
pub fn to_string(store: &ParameterStore) -> Result<String> {
    let mut buffer = Vec::new();
    write_parameters(store, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the echo of `store` to the file at `path`.
pub fn write_file(store: &ParameterStore, path: &Path) -> Result<()> {
    let with_path = |err: ParamError| match err {
        ParamError::FileWriteError { source, .. } => ParamError::FileWriteError {
            path: path.display().to_string(),
            source,
        },
        other => other,
    };
    let file = File::create(path).map_err(|source| ParamError::FileWriteError {
        path: path.display().to_string(),
        source,
    })?;
    write_parameters(store, BufWriter::new(file)).map_err(with_path)?;
    info!(path = %path.display(), "wrote used parameters");
    Ok(())
}
