use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::{ProfError, Profiler, Result, Snapshot};

/// Header row of the delimited export.
pub const CSV_HEADER: &str = "Function,Time (ms)";

/// Label of the trailing allocation row of the delimited export.
pub const CSV_ALLOCATION_LABEL: &str = "Total Allocated (bytes)";

/// Write the human readable report.
pub fn write_text<W: Write>(snapshot: &Snapshot, mut writer: W) -> io::Result<()> {
    writeln!(writer, "Profiling Results:")?;

    for total in snapshot.regions() {
        writeln!(
            writer,
            "Function: {} | Time: {:.3} ms",
            total.key(),
            total.millis()
        )?;
    }

    writeln!(writer, "Total allocated: {} bytes", snapshot.allocated_bytes())?;

    Ok(())
}

pub fn format_text(snapshot: &Snapshot) -> String {
    let mut buf = vec![];
    // writing into a Vec can't fail.
    _ = write_text(snapshot, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Quote a field containing a delimiter, quote or line break.
fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

/// Write the delimited export: header, one row per region, allocation total row.
pub fn write_csv<W: Write>(snapshot: &Snapshot, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;

    for total in snapshot.regions() {
        writeln!(
            writer,
            "{},{:.3}",
            escape_field(total.key().as_str()),
            total.millis()
        )?;
    }

    writeln!(
        writer,
        "{CSV_ALLOCATION_LABEL},{}",
        snapshot.allocated_bytes()
    )?;

    Ok(())
}

pub fn format_csv(snapshot: &Snapshot) -> String {
    let mut buf = vec![];
    _ = write_csv(snapshot, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write the delimited export to `path`, replacing any existing file.
pub fn export_csv<P: AsRef<Path>>(snapshot: &Snapshot, path: P) -> Result<()> {
    let path = path.as_ref();

    let file = File::create(path).map_err(|source| {
        log::error!("can't open profile export {path:?}: {source}");

        ProfError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut writer = BufWriter::new(file);

    write_csv(snapshot, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|source| {
            log::error!("failed writing profile export {path:?}: {source}");

            ProfError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;

    log::debug!(
        "exported {} regions to {path:?}",
        snapshot.regions().len()
    );

    Ok(())
}

/// Export to `dir`, naming the file after the snapshot's capture time.
///
/// Returns the path written.
pub fn dump_csv<P: AsRef<Path>>(snapshot: &Snapshot, dir: P) -> Result<PathBuf> {
    let datetime: DateTime<Local> = snapshot.taken_at().into();

    let path = dir.as_ref().join(format!(
        "profile.{}.csv",
        datetime
            .format("%+")
            .to_string()
            .replace(['-', ':', ' ', '+', '.'], "_")
    ));

    export_csv(snapshot, &path)?;

    Ok(path)
}

/// Print the text report of the global profiler to stdout.
pub fn print_results() {
    let snapshot = Profiler::global().snapshot();

    let stdout = io::stdout();

    if let Err(err) = write_text(&snapshot, stdout.lock()) {
        log::error!("failed printing profile: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_with_delimiters_are_quoted() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
