//! File-level conversion with atomic output.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::gif::{ByteSource, ConversionReport, EchoWriter, GifStream, Walker};
use crate::speed::SpeedPlan;
use crate::util::{Error, Result};

/// Output buffer size for file conversions.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Rewrite `input` into `output`.
///
/// The result is written to a temporary file next to `output` and renamed
/// over it only after the trailer was reached, so a failed conversion leaves
/// `output` untouched.
///
/// The output keeps the permissions of the file it replaces, or takes the
/// input's when it is new.
#[tracing::instrument(skip_all, fields(input = tracing::field::Empty))]
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    plan: &SpeedPlan,
) -> Result<ConversionReport> {
    let input = input.as_ref();
    let output = output.as_ref();
    tracing::Span::current().record("input", tracing::field::display(input.display()));

    let file = File::open(input).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(input.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    if is_same_file(input, output) {
        return Err(Error::other(format!(
            "output would overwrite input: {}",
            output.display()
        )));
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    tracing::debug!(tmp = %tmp.path().display(), "writing to temporary file");

    let writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, tmp.as_file());
    let stream = GifStream::new(ByteSource::new(file), EchoWriter::new(writer));
    let (report, writer) = Walker::new(stream, plan).run()?;
    drop(writer);

    let permissions = match fs::metadata(output) {
        Ok(meta) => meta.permissions(),
        Err(_) => file_permissions(input)?,
    };
    tmp.as_file().set_permissions(permissions)?;
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| Error::Io(e.error))?;
    tracing::debug!(output = %output.display(), "persisted");
    Ok(report)
}

/// Rewrite an in-memory GIF.
pub fn rewrite_bytes(data: &[u8], plan: &SpeedPlan) -> Result<(Vec<u8>, ConversionReport)> {
    let stream = GifStream::new(
        ByteSource::new(data),
        EchoWriter::new(Vec::with_capacity(data.len())),
    );
    let (report, out) = Walker::new(stream, plan).run()?;
    Ok((out, report))
}

/// `anim.gif` -> `anim-speed.gif`, in the same directory.
///
/// Inputs without a `.gif` extension keep their full name before the suffix.
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_gif = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    let base = if is_gif { input.file_stem() } else { input.file_name() };
    let base = base.map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    input.with_file_name(format!("{}-speed.gif", base))
}

fn file_permissions(path: &Path) -> Result<fs::Permissions> {
    Ok(fs::metadata(path)?.permissions())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
