//! C source generator

use std::fmt::{self, Write as FmtWrite};

use super::{array_name, count_name, SurfaceRecord};

/// Everything needed to render one generated `.c` file
#[derive(Debug, Clone, Copy)]
pub struct SurfaceArray<'a> {
    /// Base identifier; the array is `<symbol>_surfaces`
    pub symbol: &'a str,
    /// File name of the source mesh, recorded in the banner
    pub source_name: Option<&'a str>,
    pub includes: &'a [String],
    pub records: &'a [SurfaceRecord],
}

/// Render a surface array and its count constant.
pub fn generate_surface_source(array: &SurfaceArray<'_>) -> Result<String, fmt::Error> {
    let mut output = String::new();
    write_surface_source(&mut output, array)?;
    Ok(output)
}

/// Render a surface array into any text sink.
pub fn write_surface_source<W: FmtWrite>(w: &mut W, array: &SurfaceArray<'_>) -> fmt::Result {
    let name = array_name(array.symbol);

    writeln!(w, "// GENERATED FILE - DO NOT EDIT")?;
    if let Some(source) = array.source_name {
        writeln!(w, "// Source: {}", source)?;
    }
    writeln!(w, "// Surfaces: {}", array.records.len())?;
    writeln!(w)?;

    if !array.includes.is_empty() {
        for include in array.includes {
            writeln!(w, "#include \"{}\"", include)?;
        }
        writeln!(w)?;
    }

    writeln!(w, "const struct SM64Surface {}[] = {{", name)?;
    for (i, record) in array.records.iter().enumerate() {
        write!(w, "    {}", record)?;
        if i + 1 != array.records.len() {
            write!(w, ",")?;
        }
        writeln!(w)?;
    }
    writeln!(w, "}};")?;
    writeln!(w)?;

    writeln!(
        w,
        "const size_t {} = sizeof({}) / sizeof({}[0]);",
        count_name(array.symbol),
        name,
        name
    )?;

    Ok(())
}

/// Render a header declaring the arrays of several generated files.
pub fn generate_extern_header<S: AsRef<str>>(symbols: &[S]) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(output, "// GENERATED FILE - DO NOT EDIT")?;
    writeln!(output)?;
    writeln!(output, "#pragma once")?;
    writeln!(output)?;
    writeln!(output, "#include <stddef.h>")?;
    writeln!(output, "#include \"libsm64.h\"")?;

    for symbol in symbols {
        let symbol = symbol.as_ref();
        writeln!(output)?;
        writeln!(output, "extern const struct SM64Surface {}[];", array_name(symbol))?;
        writeln!(output, "extern const size_t {};", count_name(symbol))?;
    }

    Ok(output)
}
