// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path, time::Duration};
use url::Url;

use crate::dashboard::Coordinates;
use crate::project::DEFAULT_LIMIT;
use crate::record::AliasTable;

/// District-wise MGNREGA dataset on data.gov.in.
pub const DEFAULT_BASE_URL: &str =
    "https://api.data.gov.in/resource/ee03643a-ee4c-48c2-ac30-9f2ff26ab722";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub format: String,
    /// Sent as `filters[<key>]=<value>`.
    pub filters: BTreeMap<String, String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            format: "json".to_string(),
            filters: BTreeMap::from([("state_name".to_string(), "KARNATAKA".to_string())]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    /// Unset means every interaction fetches afresh.
    pub cache_ttl_secs: Option<u64>,
    pub chart_limit: usize,
    pub name_aliases: Vec<String>,
    /// Position reported by the console geolocator; unset means denied.
    pub location: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            request_timeout_secs: 10,
            max_retries: 2,
            backoff_ms: 500,
            cache_ttl_secs: None,
            chart_limit: DEFAULT_LIMIT,
            name_aliases: vec!["district_name".to_string(), "district".to_string()],
            location: None,
        }
    }
}

impl Config {
    /// Read `path` if it exists, otherwise start from defaults; then apply
    /// `DASHBOARD_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))?
        } else {
            Self::default()
        };
        cfg.apply_overrides(|k| std::env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = get("DASHBOARD_BASE_URL") {
            self.endpoint.base_url = v;
        }
        if let Some(v) = get("DASHBOARD_API_KEY") {
            self.endpoint.api_key = Some(v);
        }
        if let Some(v) = get("DASHBOARD_STATE") {
            self.endpoint.filters.insert("state_name".to_string(), v);
        }
        if let Some(v) = get("DASHBOARD_TIMEOUT_SECS") {
            self.request_timeout_secs = v
                .parse()
                .with_context(|| format!("DASHBOARD_TIMEOUT_SECS={}", v))?;
        }
        if let Some(v) = get("DASHBOARD_CACHE_TTL_SECS") {
            self.cache_ttl_secs = Some(
                v.parse()
                    .with_context(|| format!("DASHBOARD_CACHE_TTL_SECS={}", v))?,
            );
        }
        Ok(())
    }

    /// Full request URL: base plus `api-key`, `format` and `filters[..]` query pairs.
    pub fn endpoint_url(&self) -> Result<Url> {
        let ep = &self.endpoint;
        let mut url = Url::parse(&ep.base_url)
            .with_context(|| format!("parsing endpoint URL {}", ep.base_url))?;
        {
            let mut q = url.query_pairs_mut();
            if let Some(key) = &ep.api_key {
                q.append_pair("api-key", key);
            }
            q.append_pair("format", &ep.format);
            for (k, v) in &ep.filters {
                q.append_pair(&format!("filters[{}]", k), v);
            }
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn aliases(&self) -> AliasTable {
        AliasTable::with_name_aliases(self.name_aliases.clone())
    }
}
