use std::path::Path;
use tokio::{
    fs as tokio_fs,
    io::{AsyncWrite, BufWriter as TokioBufWriter, stdout as tokio_stdout},
};

use crate::error::Result;

/// Output path that sends the dump to stdout instead of a file
pub const STDOUT_MARKER: &str = "$";

/// Represents a type that can be used as an output writer
pub type OutputWriter = TokioBufWriter<Box<dyn AsyncWrite + Unpin + Send>>;

/// Open the dump destination, truncating any existing file
pub async fn create_dump_writer(path: &Path) -> Result<OutputWriter> {
    if path.as_os_str() == STDOUT_MARKER {
        log::debug!("Using stdout for output");
        return Ok(TokioBufWriter::new(Box::new(tokio_stdout())));
    }

    log::debug!("Using file for output: {}", path.display());
    let file = tokio_fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;

    log::debug!("Output file opened successfully");
    Ok(TokioBufWriter::new(Box::new(file)))
}
