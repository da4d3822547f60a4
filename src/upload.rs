// src/upload.rs
//! Batch uploader: fire-and-forget submission of validated records to the
//! remote ingestion endpoint. Every batch is attempted exactly once; a
//! failed batch is logged and never blocks the ones after it.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::record::FaxRecord;

pub const DEFAULT_BATCH_SIZE: usize = 100;

#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn submit(&self, records: &[FaxRecord]) -> Result<()>;
}

/// Production sink: one `POST {"records": [...]}` per batch, any 2xx counts
/// as accepted.
pub struct HttpRecordSink {
    endpoint: String,
    client: Client,
}

impl HttpRecordSink {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl RecordSink for HttpRecordSink {
    async fn submit(&self, records: &[FaxRecord]) -> Result<()> {
        let body = serde_json::json!({ "records": records });
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("posting record batch")?;

        let status = resp.status();
        if !status.is_success() {
            // Keep whatever detail the endpoint offered.
            let detail = resp.text().await.unwrap_or_default();
            bail!("ingestion endpoint returned {status}: {detail}");
        }
        Ok(())
    }
}

/// Outcome of one batch submission.
#[derive(Debug, Clone)]
pub struct BatchEvent {
    pub index: usize,
    pub size: usize,
    pub error: Option<String>,
}

impl BatchEvent {
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Partition `records` into consecutive batches of at most `batch_size`
/// (order preserved) and submit each batch independently.
pub async fn upload_in_batches(
    records: &[FaxRecord],
    batch_size: usize,
    sink: &dyn RecordSink,
) -> Vec<BatchEvent> {
    let batch_size = batch_size.max(1);
    let mut events = Vec::new();
    for (index, chunk) in records.chunks(batch_size).enumerate() {
        match sink.submit(chunk).await {
            Ok(()) => {
                info!(target: "upload", batch = index, size = chunk.len(), "batch accepted");
                events.push(BatchEvent {
                    index,
                    size: chunk.len(),
                    error: None,
                });
            }
            Err(e) => {
                error!(target: "upload", batch = index, size = chunk.len(), error = %e, "batch rejected");
                events.push(BatchEvent {
                    index,
                    size: chunk.len(),
                    error: Some(e.to_string()),
                });
            }
        }
    }
    events
}

// --- Test helper ---
pub struct MockSink {
    pub calls: std::sync::Mutex<Vec<Vec<FaxRecord>>>,
    fail_batches: std::collections::HashSet<usize>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    /// Sink that rejects the batches at the given submission indexes.
    pub fn failing_on(batches: &[usize]) -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            fail_batches: batches.iter().copied().collect(),
        }
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSink for MockSink {
    async fn submit(&self, records: &[FaxRecord]) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(records.to_vec());
        if self.fail_batches.contains(&index) {
            bail!("mock sink rejected batch {index}");
        }
        Ok(())
    }
}
