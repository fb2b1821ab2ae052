use std::{path::Path, str::FromStr};

use log::warn;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::{SdError, SdResult};

static CONFIG_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SdConfig {
    pub source_api: String,
    pub source_endpoint: String,
    pub store_api: String,
    pub index_name: String,
    pub doc_type: String,
    pub registry_path: String,
    pub schema_path: String,
    pub poll_hour: u32,
    pub poll_interval_secs: u64,
    pub request_delay_secs: u64,
    pub timeout_secs: u64,
    pub max_retries: u64,
    pub dedup: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, strum::Display, strum::EnumIter, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConfigKey {
    SourceApi,
    SourceEndpoint,
    StoreApi,
    IndexName,
    DocType,
    RegistryPath,
    SchemaPath,
    PollHour,
    PollIntervalSecs,
    RequestDelaySecs,
    TimeoutSecs,
    MaxRetries,
    Dedup,
}

impl Default for SdConfig {
    fn default() -> Self {
        Self {
            source_api: "https://finance.naver.com".to_string(),
            source_endpoint: "sise_day.naver".to_string(),
            store_api: "http://127.0.0.1:9200".to_string(),
            index_name: "stock".to_string(),
            doc_type: "daily".to_string(),
            registry_path: "data.csv".to_string(),
            schema_path: "setting.json".to_string(),
            poll_hour: 20,
            poll_interval_secs: 60,
            request_delay_secs: 3,
            timeout_secs: 30,
            max_retries: 3,
            dedup: false,
        }
    }
}

impl SdConfig {
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::SourceApi => self.source_api.clone(),
            ConfigKey::SourceEndpoint => self.source_endpoint.clone(),
            ConfigKey::StoreApi => self.store_api.clone(),
            ConfigKey::IndexName => self.index_name.clone(),
            ConfigKey::DocType => self.doc_type.clone(),
            ConfigKey::RegistryPath => self.registry_path.clone(),
            ConfigKey::SchemaPath => self.schema_path.clone(),
            ConfigKey::PollHour => self.poll_hour.to_string(),
            ConfigKey::PollIntervalSecs => self.poll_interval_secs.to_string(),
            ConfigKey::RequestDelaySecs => self.request_delay_secs.to_string(),
            ConfigKey::TimeoutSecs => self.timeout_secs.to_string(),
            ConfigKey::MaxRetries => self.max_retries.to_string(),
            ConfigKey::Dedup => self.dedup.to_string(),
        }
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        ConfigKey::iter()
            .map(|key| (key.to_string(), self.get(key)))
            .collect()
    }

    pub fn set(&mut self, key: &str, value: &str) -> SdResult<()> {
        let key = ConfigKey::from_str(key.trim()).map_err(|_| SdError::Invalid {
            code: "UNKNOWN_CONFIG_KEY",
            message: format!("Unknown config key '{key}'"),
        })?;
        let value = value.trim();

        match key {
            ConfigKey::SourceApi => self.source_api = value.to_string(),
            ConfigKey::SourceEndpoint => self.source_endpoint = value.to_string(),
            ConfigKey::StoreApi => self.store_api = value.to_string(),
            ConfigKey::IndexName => self.index_name = value.to_string(),
            ConfigKey::DocType => self.doc_type = value.to_string(),
            ConfigKey::RegistryPath => self.registry_path = value.to_string(),
            ConfigKey::SchemaPath => self.schema_path = value.to_string(),
            ConfigKey::PollHour => {
                let hour: u32 = parse_value(key, value)?;
                if hour > 23 {
                    return Err(SdError::Invalid {
                        code: "INVALID_CONFIG_VALUE",
                        message: format!("'{key}' must be within 0..=23, got {hour}"),
                    });
                }
                self.poll_hour = hour;
            }
            ConfigKey::PollIntervalSecs => self.poll_interval_secs = parse_value(key, value)?,
            ConfigKey::RequestDelaySecs => self.request_delay_secs = parse_value(key, value)?,
            ConfigKey::TimeoutSecs => self.timeout_secs = parse_value(key, value)?,
            ConfigKey::MaxRetries => self.max_retries = parse_value(key, value)?,
            ConfigKey::Dedup => self.dedup = parse_value(key, value)?,
        }

        self.normalize();
        Ok(())
    }

    /// Clamps values that would stall the poll loop or break the HTTP client.
    pub fn normalize(&mut self) {
        if self.poll_hour > 23 {
            let default_hour = Self::default().poll_hour;
            warn!(
                "[Config] poll_hour {} out of 0..=23, use {default_hour}",
                self.poll_hour
            );
            self.poll_hour = default_hour;
        }

        if self.poll_interval_secs == 0 {
            warn!("[Config] poll_interval_secs is 0, use 1");
            self.poll_interval_secs = 1;
        }

        if self.timeout_secs == 0 {
            warn!("[Config] timeout_secs is 0, use 1");
            self.timeout_secs = 1;
        }
    }
}

pub fn load() -> SdConfig {
    let config = confy::load(CONFIG_NAME, None);
    normalized_or_default(config)
}

pub fn load_path(path: &Path) -> SdConfig {
    let config = confy::load_path(path);
    normalized_or_default(config)
}

pub fn store(config: &SdConfig) -> SdResult<()> {
    confy::store(CONFIG_NAME, None, config)?;
    Ok(())
}

fn normalized_or_default(config: Result<SdConfig, confy::ConfyError>) -> SdConfig {
    match config {
        Ok(mut config) => {
            config.normalize();
            config
        }
        Err(err) => {
            warn!("Load config error, fall back to defaults: {err}");
            SdConfig::default()
        }
    }
}

fn parse_value<T: FromStr>(key: ConfigKey, value: &str) -> SdResult<T> {
    value.parse::<T>().map_err(|_| SdError::Invalid {
        code: "INVALID_CONFIG_VALUE",
        message: format!("Invalid value '{value}' for '{key}'"),
    })
}
