use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr tracking records written during a dump
pub fn setup_dump_spinner(index: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {prefix}: {pos} records ({per_sec}, {msg})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(index.to_string());
    pb.set_message("Waiting for first page...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Advance the spinner after a page has been written
pub fn record_page(pb: &ProgressBar, doc_count: u64, total_bytes: u64) {
    pb.inc(doc_count);
    pb.set_message(format!("{} written", ByteSize(total_bytes)));
}

pub fn page_summary(index: &str, fetched: usize) -> String {
    format!("Fetched {} records from {}", fetched, index)
}

/// Per-page count, shown whatever the log filter or `--quiet` say
pub fn report_page(spinner: Option<&ProgressBar>, line: &str) {
    match spinner {
        Some(pb) => pb.println(line),
        None => eprintln!("{}", line),
    }
}
