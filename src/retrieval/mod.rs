mod progress;
mod scroll_page;

use bytesize::ByteSize;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::AsyncWriteExt;

use crate::error::{RelayError, Result};
use crate::kibana::{ProxyRequest, ProxyTransport};
use crate::output;
use crate::processing;

pub use self::progress::setup_dump_spinner;
pub use self::scroll_page::{
    SCROLL_PATH, ScrollPage, clear_scroll_request, first_page_request, next_page_request,
};

/// Records requested per scroll page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Scroll keep-alive, renewed by every follow-up request
pub const DEFAULT_KEEP_ALIVE: &str = "1m";

#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub page_size: usize,
    pub keep_alive: String,
    /// Release the server-side cursor once the last page is read.
    /// Off by default: the cursor is simply left to expire.
    pub clear_scroll: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            keep_alive: DEFAULT_KEEP_ALIVE.to_string(),
            clear_scroll: false,
        }
    }
}

/// What a finished dump did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpReport {
    /// Scroll requests issued, teardown excluded
    pub requests: usize,
    /// Fetched count of every page in order, including the final empty one
    pub page_counts: Vec<usize>,
    pub records: u64,
    pub bytes: u64,
}

/// `<index>.json` in the working directory
pub fn default_output_path(index: &str) -> PathBuf {
    PathBuf::from(format!("{}.json", index))
}

/// Drain `index` into `output_path`, one hit per line, following the scroll
/// cursor until the backend returns an empty page.
///
/// Any transport or parsing failure aborts the dump. Pages written before
/// the failure stay on disk since every page is flushed once written.
pub async fn dump_index<T: ProxyTransport>(
    transport: &T,
    index: &str,
    output_path: &Path,
    options: &DumpOptions,
    spinner: Option<&ProgressBar>,
) -> Result<DumpReport> {
    if index.is_empty() {
        return Err(RelayError::Usage("index name must not be empty".to_string()));
    }

    debug!("Starting dump of index {} into {}", index, output_path.display());
    let start_time = Instant::now();

    let mut writer = output::create_dump_writer(output_path).await?;
    let mut report = DumpReport::default();

    let request = first_page_request(index, options.page_size, &options.keep_alive);
    let mut page = fetch_page(transport, request, &mut report).await?;

    loop {
        let fetched = page.hits.len();
        report.page_counts.push(fetched);
        let summary = progress::page_summary(index, fetched);
        progress::report_page(spinner, &summary);
        debug!("{}", summary);

        if page.is_empty() {
            break;
        }

        let encoded = processing::encode_hits(&page.hits)?;
        writer.write_all(&encoded.buffer).await?;
        writer.flush().await?;

        report.records += encoded.doc_count;
        report.bytes += encoded.buffer.len() as u64;
        if let Some(pb) = spinner {
            progress::record_page(pb, encoded.doc_count, report.bytes);
        }

        debug!("Continuing with scroll_id: {}", page.scroll_id);
        let request = next_page_request(&page.scroll_id, &options.keep_alive);
        page = fetch_page(transport, request, &mut report).await?;
    }

    writer.flush().await?;
    drop(writer);

    if options.clear_scroll {
        clear_scroll(transport, &page.scroll_id).await;
    }

    let elapsed = start_time.elapsed();
    if let Some(pb) = spinner {
        pb.finish_with_message(format!("{} written", ByteSize(report.bytes)));
    }
    info!(
        "Dump completed: {} records ({}) from {} in {:.2?} over {} requests",
        report.records,
        ByteSize(report.bytes),
        index,
        elapsed,
        report.requests
    );

    Ok(report)
}

async fn fetch_page<T: ProxyTransport>(
    transport: &T,
    request: ProxyRequest,
    report: &mut DumpReport,
) -> Result<ScrollPage> {
    let path = request.path.clone();
    report.requests += 1;

    let response = transport.send(request).await?;
    let body = response.json(&path)?;
    ScrollPage::from_response(body, &path)
}

/// Teardown failures are logged, never fatal
async fn clear_scroll<T: ProxyTransport>(transport: &T, scroll_id: &str) {
    match transport.send(clear_scroll_request(scroll_id)).await {
        Ok(_) => debug!("Scroll context cleared"),
        Err(e) => warn!("Failed to clear scroll context: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = DumpOptions::default();
        assert_eq!(options.page_size, 1000);
        assert_eq!(options.keep_alive, "1m");
        assert!(!options.clear_scroll);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("audit-2024.01"),
            PathBuf::from("audit-2024.01.json")
        );
    }
}
