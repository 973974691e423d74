use std::time::Duration;

use catalog_core::{Filter, Row, SortSpec};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Response, Url};
use serde_json::Value;

use crate::{FailureKind, QueryError, QueryService};

const REST_PATH: &str = "rest/v1/";

#[derive(Debug, Clone)]
pub struct RestSettings {
    /// Project root, e.g. `https://project.example.co`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for RestSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Query service speaking the hosted store's PostgREST dialect.
///
/// One client is built up front and shared by every call.
#[derive(Debug, Clone)]
pub struct RestQueryService {
    client: reqwest::Client,
    rest_root: Url,
}

impl RestQueryService {
    pub fn new(settings: RestSettings) -> Result<Self, QueryError> {
        let mut base = settings.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let rest_root = Url::parse(&base)
            .and_then(|base| base.join(REST_PATH))
            .map_err(|err| QueryError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(key) = settings.api_key.as_deref() {
            let invalid = |_| {
                QueryError::new(
                    FailureKind::InvalidUrl,
                    "api key is not a valid header value",
                )
            };
            headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
            );
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| QueryError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client, rest_root })
    }

    fn collection_url(&self, collection: &str, filters: &[Filter]) -> Result<Url, QueryError> {
        let mut url = self
            .rest_root
            .join(collection)
            .map_err(|err| QueryError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for filter in filters {
                pairs.append_pair(filter.field(), &encode_filter(filter));
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl QueryService for RestQueryService {
    async fn count(&self, collection: &str, filters: &[Filter]) -> Result<Option<u64>, QueryError> {
        let url = self.collection_url(collection, filters)?;
        let response = self
            .client
            .head(url)
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        Ok(response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total))
    }

    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        sort: &SortSpec,
        limit: Option<usize>,
    ) -> Result<Vec<Row>, QueryError> {
        let mut url = self.collection_url(collection, filters)?;
        {
            let direction = if sort.ascending { "asc" } else { "desc" };
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("order", &format!("{}.{direction}", sort.field));
            if let Some(limit) = limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice::<Vec<Row>>(&body)
            .map_err(|err| QueryError::new(FailureKind::Decode, err.to_string()))
    }
}

async fn ensure_success(response: Response) -> Result<Response, QueryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(QueryError::new(
        FailureKind::HttpStatus(status.as_u16()),
        error_message(&body).unwrap_or_else(|| status.to_string()),
    ))
}

/// Pulls `message` out of a PostgREST error body.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(ToOwned::to_owned)
}

/// Total from `Content-Range: 0-24/120` or `*/0`. `None` for an unknown total.
fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}

fn encode_filter(filter: &Filter) -> String {
    match filter {
        Filter::Eq { value, .. } => format!("eq.{}", scalar(value)),
        Filter::IsNull { .. } => "is.null".to_string(),
        Filter::In { values, .. } => {
            let items: Vec<String> = values.iter().map(list_item).collect();
            format!("in.({})", items.join(","))
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn list_item(value: &Value) -> String {
    let raw = scalar(value);
    if raw.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        raw
    }
}

fn map_reqwest_error(err: reqwest::Error) -> QueryError {
    if err.is_timeout() {
        return QueryError::timeout();
    }
    if err.is_decode() {
        return QueryError::new(FailureKind::Decode, err.to_string());
    }
    QueryError::new(FailureKind::Network, err.to_string())
}
