use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PineconeConfig;
use crate::store::{IndexSpec, Metric, NameMetadata, Record, ScoredRecord, VectorStore};
use crate::{Error, Result};

/// REST API version this client speaks.
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Pinecone serverless index client.
///
/// Index management goes to the controller (`api.pinecone.io`); upserts and
/// queries go to the per-index host learned in [`ensure_index`], so data
/// plane calls fail until the index has been ensured.
///
/// [`ensure_index`]: VectorStore::ensure_index
pub struct PineconeStore {
    http: Client,
    controller_url: String,
    cloud: String,
    region: String,
    upsert_batch_size: usize,
    ready_poll_attempts: u32,
    ready_poll_interval: Duration,
    host: Option<String>,
}

impl PineconeStore {
    /// Create a new client. No network traffic happens until the index is
    /// ensured.
    pub fn new(config: &PineconeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Config("PINECONE_API_KEY is not a valid header value".into()))?;
        api_key.set_sensitive(true);
        headers.insert("Api-Key", api_key);
        headers.insert(
            "X-Pinecone-API-Version",
            HeaderValue::from_static(PINECONE_API_VERSION),
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("namesake/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            controller_url: config.controller_url.trim_end_matches('/').to_string(),
            cloud: config.cloud.clone(),
            region: config.region.clone(),
            upsert_batch_size: config.upsert_batch_size,
            ready_poll_attempts: config.ready_poll_attempts,
            ready_poll_interval: Duration::from_millis(config.ready_poll_interval_ms),
            host: None,
        })
    }

    /// Data plane host of the ensured index, if any.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn describe_index(&self, name: &str) -> Result<Option<IndexDescription>> {
        let response = self
            .http
            .get(format!("{}/indexes/{name}", self.controller_url))
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(check(response)?.json()?))
    }

    fn create_index(&self, spec: &IndexSpec) -> Result<()> {
        let body = serde_json::json!({
            "name": spec.name,
            "dimension": spec.dimension,
            "metric": spec.metric,
            "spec": {
                "serverless": {
                    "cloud": self.cloud,
                    "region": self.region,
                }
            }
        });

        let response = self
            .http
            .post(format!("{}/indexes", self.controller_url))
            .json(&body)
            .send()?;

        if response.status() == StatusCode::CONFLICT {
            warn!(index = %spec.name, "index was created concurrently");
            return Ok(());
        }

        check(response)?;
        info!(
            index = %spec.name,
            dimension = spec.dimension,
            metric = %spec.metric,
            cloud = %self.cloud,
            region = %self.region,
            "created index"
        );
        Ok(())
    }

    fn wait_until_ready(&self, name: &str) -> Result<IndexDescription> {
        for attempt in 1..=self.ready_poll_attempts {
            if let Some(description) = self.describe_index(name)? {
                if description.status.ready {
                    return Ok(description);
                }
                debug!(index = name, attempt, state = %description.status.state, "index not ready");
            }
            thread::sleep(self.ready_poll_interval);
        }

        Err(Error::Store(format!(
            "index {name} not ready after {} attempts",
            self.ready_poll_attempts
        )))
    }

    fn data_url(&self, path: &str) -> Result<String> {
        let host = self.host.as_deref().ok_or_else(|| {
            Error::Store("index host unknown, ensure the index first".to_string())
        })?;
        Ok(format!("{host}{path}"))
    }
}

impl VectorStore for PineconeStore {
    fn ensure_index(&mut self, spec: &IndexSpec) -> Result<()> {
        let description = match self.describe_index(&spec.name)? {
            Some(description) if description.status.ready => description,
            Some(_) => self.wait_until_ready(&spec.name)?,
            None => {
                self.create_index(spec)?;
                self.wait_until_ready(&spec.name)?
            }
        };

        if description.dimension != spec.dimension {
            return Err(Error::DimensionMismatch {
                expected: spec.dimension,
                actual: description.dimension,
            });
        }
        if description.metric != spec.metric {
            return Err(Error::Store(format!(
                "index {} uses metric {}, expected {}",
                spec.name, description.metric, spec.metric
            )));
        }

        debug!(index = %spec.name, host = %description.host, "index ready");
        self.host = Some(host_url(&description.host));
        Ok(())
    }

    fn upsert(&mut self, records: &[Record]) -> Result<usize> {
        let url = self.data_url("/vectors/upsert")?;
        let mut upserted = 0;

        for batch in records.chunks(self.upsert_batch_size.max(1)) {
            let response = self
                .http
                .post(&url)
                .json(&UpsertRequest { vectors: batch })
                .send()?;
            let result: UpsertResponse = check(response)?.json()?;
            debug!(batch = batch.len(), upserted = result.upserted_count, "upserted batch");
            upserted += result.upserted_count;
        }

        info!(records = upserted, "upsert complete");
        Ok(upserted)
    }

    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredRecord>> {
        let url = self.data_url("/query")?;
        let response = self
            .http
            .post(&url)
            .json(&QueryRequest {
                vector,
                top_k,
                include_metadata,
                include_values: false,
            })
            .send()?;

        let result: QueryResponse = check(response)?.json()?;
        debug!(top_k, matches = result.matches.len(), "query complete");

        result
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m
                    .metadata
                    .map(serde_json::from_value::<NameMetadata>)
                    .transpose()
                    .map_err(|e| {
                        Error::Store(format!("match {} has malformed metadata: {e}", m.id))
                    })?;
                Ok(ScoredRecord {
                    id: m.id,
                    score: m.score,
                    metadata,
                })
            })
            .collect::<Result<Vec<_>>>()
    }

    fn count(&self) -> Result<usize> {
        let url = self.data_url("/describe_index_stats")?;
        let response = self.http.post(&url).json(&serde_json::json!({})).send()?;
        let stats: IndexStats = check(response)?.json()?;
        Ok(stats.total_vector_count)
    }
}

/// Map non-success statuses onto store errors.
fn check(response: Response) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        return Err(Error::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        let error_text = response.text().unwrap_or_default();
        return Err(Error::Store(format!("pinecone returned {status}: {error_text}")));
    }

    Ok(response)
}

/// Index hosts come back without a scheme.
fn host_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    dimension: usize,
    metric: Metric,
    host: String,
    status: IndexStatus,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    ready: bool,
    #[serde(default)]
    state: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [Record],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    score: f64,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    #[serde(default)]
    total_vector_count: usize,
}
