use crate::core::ConfigProvider;
use crate::domain::model::GiftOrder;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: Option<SiteInfo>,
    pub store: StoreConfig,
    pub listing: Option<ListingConfig>,
    pub report: Option<ReportConfig>,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub order: Option<GiftOrder>,
    pub refresh_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub page_size: Option<usize>,
}

/// 播種資料：禮物清單與賓客（含同行者），由管理端一次性建立
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub gifts: Vec<String>,
    #[serde(default)]
    pub guests: Vec<SeedGuest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedGuest {
    pub name: String,
    #[serde(default)]
    pub companions: Vec<String>,
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigError {
            message: format!("env substitution regex: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("store.url", &self.store.url)?;

        if self.store.api_key.trim().is_empty() {
            return Err(SiteError::MissingConfigError {
                field: "store.api_key".to_string(),
            });
        }

        if let Some(report) = &self.report {
            if let Some(page_size) = report.page_size {
                validate_positive_number("report.page_size", page_size, 1)?;
            }
        }

        if let Some(listing) = &self.listing {
            if let Some(refresh) = listing.refresh_seconds {
                validate_positive_number("listing.refresh_seconds", refresh as usize, 1)?;
            }
        }

        Ok(())
    }

    pub fn refresh_seconds(&self) -> u64 {
        self.listing
            .as_ref()
            .and_then(|l| l.refresh_seconds)
            .unwrap_or(6)
    }
}

impl ConfigProvider for SiteConfig {
    fn store_url(&self) -> &str {
        &self.store.url
    }

    fn api_key(&self) -> &str {
        &self.store.api_key
    }

    fn listing_order(&self) -> GiftOrder {
        self.listing
            .as_ref()
            .and_then(|l| l.order)
            .unwrap_or_default()
    }

    fn page_size(&self) -> usize {
        self.report
            .as_ref()
            .and_then(|r| r.page_size)
            .unwrap_or(crate::core::report::DEFAULT_PAGE_SIZE)
    }

    fn timeout_seconds(&self) -> u64 {
        self.store.timeout_seconds.unwrap_or(10)
    }

    fn retry_attempts(&self) -> u32 {
        self.store.retry_attempts.unwrap_or(2)
    }

    fn retry_delay_seconds(&self) -> u64 {
        self.store.retry_delay_seconds.unwrap_or(1)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
