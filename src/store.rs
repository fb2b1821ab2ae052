//! Document store (Elasticsearch-style REST) the daily records are written to.

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, info};
use reqwest::StatusCode;
use serde::Serialize;

use crate::{
    config::SdConfig,
    data::{daily::DailyRecord, stock::StockRef},
    error::{SdError, SdResult},
    utils::{
        datetime::date_to_str,
        net::{http_head, http_post, http_put, join_url},
    },
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndexStatus {
    Exists,
    Created,
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Creates the index from the schema template unless it already exists.
    async fn ensure_index(&self) -> SdResult<IndexStatus>;

    /// Writes one record as a new document.
    async fn ingest(&self, stock: &StockRef, record: &DailyRecord) -> SdResult<()>;
}

pub struct IndexStore {
    api: String,
    index_name: String,
    doc_type: String,
    schema_path: PathBuf,
    dedup: bool,
    timeout_secs: u64,
    max_retries: u64,
}

#[derive(Serialize)]
struct StockDocument<'a> {
    code: &'a str,

    #[serde(flatten)]
    record: &'a DailyRecord,
}

impl IndexStore {
    pub fn from_config(config: &SdConfig) -> Self {
        Self {
            api: config.store_api.clone(),
            index_name: config.index_name.clone(),
            doc_type: config.doc_type.clone(),
            schema_path: PathBuf::from(&config.schema_path),
            dedup: config.dedup,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        }
    }

    pub async fn ping(&self) -> SdResult<()> {
        let status = http_head(&self.api, self.timeout_secs, self.max_retries).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(SdError::HttpStatusError {
                status: status.to_string(),
                request: format!("HEAD {}", self.api),
            })
        }
    }

    fn document_url(&self, stock: &StockRef, record: &DailyRecord) -> SdResult<String> {
        let path = if self.dedup {
            format!(
                "{}/{}/{}_{}",
                self.index_name,
                self.doc_type,
                stock.code,
                date_to_str(&record.date)
            )
        } else {
            format!("{}/{}", self.index_name, self.doc_type)
        };

        Ok(join_url(&self.api, &path)?)
    }
}

#[async_trait]
impl RecordSink for IndexStore {
    async fn ensure_index(&self) -> SdResult<IndexStatus> {
        let index_url = join_url(&self.api, &self.index_name)?;

        let status = http_head(&index_url, self.timeout_secs, self.max_retries).await?;
        if status.is_success() {
            debug!("[Store] Index '{}' exists", self.index_name);
            return Ok(IndexStatus::Exists);
        } else if status != StatusCode::NOT_FOUND {
            return Err(SdError::HttpStatusError {
                status: status.to_string(),
                request: format!("HEAD {index_url}"),
            });
        }

        let schema = load_schema(&self.schema_path)?;
        http_put(&index_url, &schema, self.timeout_secs, self.max_retries).await?;

        info!("[Store] Index '{}' created", self.index_name);
        Ok(IndexStatus::Created)
    }

    async fn ingest(&self, stock: &StockRef, record: &DailyRecord) -> SdResult<()> {
        let url = self.document_url(stock, record)?;
        let document = serde_json::to_value(StockDocument {
            code: &stock.code,
            record,
        })?;

        if self.dedup {
            http_put(&url, &document, self.timeout_secs, self.max_retries).await?;
        } else {
            http_post(&url, &document, self.timeout_secs, self.max_retries).await?;
        }

        Ok(())
    }
}

pub fn load_schema(path: &Path) -> SdResult<serde_json::Value> {
    if !path.is_file() {
        return Err(SdError::NotExists {
            code: "SCHEMA_NOT_EXISTS",
            message: format!("Schema file '{}' not exists", path.display()),
        });
    }

    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;

    fn store(uri: &str, schema_path: &Path, dedup: bool) -> IndexStore {
        IndexStore {
            api: uri.to_string(),
            index_name: "stock".to_string(),
            doc_type: "daily".to_string(),
            schema_path: schema_path.to_path_buf(),
            dedup,
            timeout_secs: 5,
            max_retries: 0,
        }
    }

    fn record() -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            close_price: 71900,
            change: -500,
            open_price: 72500,
            high_price: 73000,
            low_price: 71700,
            volume: 13038939,
        }
    }

    fn document() -> serde_json::Value {
        json!({
            "code": "005930",
            "date": "2024-01-15",
            "endPrice": 71900,
            "compareYesterday": -500,
            "price": 72500,
            "highPrice": 73000,
            "lowPrice": 71700,
            "tradeCount": 13038939,
        })
    }

    #[tokio::test]
    async fn test_ensure_index_exists() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/stock"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = store(&server.uri(), Path::new("missing.json"), false);
        assert_eq!(store.ensure_index().await.unwrap(), IndexStatus::Exists);
    }

    #[tokio::test]
    async fn test_ensure_index_created() {
        let schema = json!({ "mappings": { "properties": { "date": { "type": "date" } } } });
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("setting.json");
        fs::write(&schema_path, schema.to_string()).unwrap();

        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/stock"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/stock"))
            .and(body_json(&schema))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store(&server.uri(), &schema_path, false);
        assert_eq!(store.ensure_index().await.unwrap(), IndexStatus::Created);
    }

    #[tokio::test]
    async fn test_ensure_index_without_schema() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = store(&server.uri(), &dir.path().join("setting.json"), false);
        assert!(matches!(
            store.ensure_index().await,
            Err(SdError::NotExists { code: "SCHEMA_NOT_EXISTS", .. })
        ));
    }

    #[tokio::test]
    async fn test_ingest() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stock/daily"))
            .and(body_json(document()))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&server)
            .await;

        let store = store(&server.uri(), Path::new("setting.json"), false);
        let stock = StockRef::new("5930", "Sample Co");

        // No existence check: the same record is written twice
        store.ingest(&stock, &record()).await.unwrap();
        store.ingest(&stock, &record()).await.unwrap();
    }

    #[tokio::test]
    async fn test_ingest_dedup() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/stock/daily/005930_2024-01-15"))
            .and(body_json(document()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = store(&server.uri(), Path::new("setting.json"), true);
        store
            .ingest(&StockRef::new("005930", "Sample Co"), &record())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ingest_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let store = store(&server.uri(), Path::new("setting.json"), false);
        assert!(matches!(
            store
                .ingest(&StockRef::new("005930", "Sample Co"), &record())
                .await,
            Err(SdError::HttpStatusError { .. })
        ));
    }
}
