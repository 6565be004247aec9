use console::style;
use log::debug;
use serde_json::Value;
use std::path::PathBuf;

use crate::cli::Operation;
use crate::error::Result;
use crate::kibana::{ProxyRequest, ProxyTransport, SEARCH_TIMEOUT};
use crate::query;
use crate::retrieval::{self, DumpOptions};

/// Result of a one-shot command, printed as-is or pretty-printed
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Text(String),
    Json(Value),
}

impl CommandOutput {
    pub fn render(&self) -> String {
        match self {
            CommandOutput::Text(text) => text.clone(),
            CommandOutput::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

pub async fn fetch_indices<T: ProxyTransport>(
    transport: &T,
    json_format: bool,
) -> Result<CommandOutput> {
    if json_format {
        let path = "/_cat/indices?format=json";
        let response = transport.send(ProxyRequest::get(path)).await?;
        Ok(CommandOutput::Json(response.json(path)?))
    } else {
        let response = transport.send(ProxyRequest::get("/_cat/indices")).await?;
        Ok(CommandOutput::Text(response.text))
    }
}

pub async fn cluster_stats<T: ProxyTransport>(transport: &T) -> Result<CommandOutput> {
    let path = "/_cluster/stats?format=json";
    let response = transport.send(ProxyRequest::get(path)).await?;
    Ok(CommandOutput::Json(response.json(path)?))
}

/// Backend path for a `*term*` query-string search
pub fn wildcard_search_path(term: &str, index: Option<&str>) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
    match index {
        Some(index) => format!("/{}/_search?q=*{}*", index, encoded),
        None => format!("/_search?q=*{}*", encoded),
    }
}

pub fn search_path(index: Option<&str>) -> String {
    match index {
        Some(index) => format!("/{}/_search", index),
        None => "/_search".to_string(),
    }
}

pub async fn wildcard_search<T: ProxyTransport>(
    transport: &T,
    term: &str,
    index: Option<&str>,
) -> Result<CommandOutput> {
    let path = wildcard_search_path(term, index);
    let request = ProxyRequest::get(path.clone()).with_timeout(SEARCH_TIMEOUT);
    let response = transport.send(request).await?;
    Ok(CommandOutput::Json(response.json(&path)?))
}

pub async fn raw_query_search<T: ProxyTransport>(
    transport: &T,
    body: Value,
    index: Option<&str>,
) -> Result<CommandOutput> {
    let path = search_path(index);
    let request = ProxyRequest::post(path.clone())
        .with_body(body)
        .with_timeout(SEARCH_TIMEOUT);
    let response = transport.send(request).await?;
    Ok(CommandOutput::Json(response.json(&path)?))
}

/// Run one operation end to end, printing results to stdout
pub async fn execute<T: ProxyTransport>(
    transport: &T,
    operation: Operation,
    quiet: bool,
) -> Result<()> {
    debug!("Executing {:?}", operation);

    let output = match operation {
        Operation::GetIndices { json } => fetch_indices(transport, json).await?,
        Operation::GetStats => cluster_stats(transport).await?,
        Operation::Search { term, index } => {
            if let Some(index) = &index {
                println!("Searching in indice: {}", style(index).cyan().bold());
            }
            wildcard_search(transport, &term, index.as_deref()).await?
        }
        Operation::RawQuery { query, index } => {
            let body = query::load_raw_query(&query).await?;
            if let Some(index) = &index {
                println!("Searching in indice: {}", style(index).cyan().bold());
            }
            raw_query_search(transport, body, index.as_deref()).await?
        }
        Operation::Dump {
            index,
            output,
            clear_scroll,
        } => {
            let output_path = output
                .map(PathBuf::from)
                .unwrap_or_else(|| retrieval::default_output_path(&index));
            let options = DumpOptions {
                clear_scroll,
                ..DumpOptions::default()
            };

            let spinner = (!quiet).then(|| retrieval::setup_dump_spinner(&index));
            let report = retrieval::dump_index(
                transport,
                &index,
                &output_path,
                &options,
                spinner.as_ref(),
            )
            .await?;

            eprintln!(
                "{} {} records from {} into {}",
                style("Dumped").green().bold(),
                report.records,
                index,
                output_path.display()
            );
            return Ok(());
        }
    };

    println!("{}", output.render());
    Ok(())
}
