pub mod site_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::core::ConfigProvider;
    use crate::domain::model::GiftOrder;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        self, validate_positive_number, validate_url, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "rsvp-admin")]
    #[command(about = "Admin CLI for the wedding RSVP and gift registry")]
    pub struct CliConfig {
        /// Base URL of the hosted data service (Supabase project URL)
        #[arg(long)]
        pub store_url: String,

        /// API key sent as apikey + bearer token
        #[arg(long)]
        pub api_key: String,

        /// Listing order: created_at or name
        #[arg(long, default_value = "created_at")]
        pub order: String,

        /// Show the gift -> claimant report instead of the listing
        #[arg(long)]
        pub report: bool,

        /// Report page (1-indexed)
        #[arg(long, default_value = "1")]
        pub page: usize,

        #[arg(long, default_value = "10")]
        pub page_size: usize,

        /// Keep refreshing the listing (like the site's polling)
        #[arg(long)]
        pub watch: bool,

        #[arg(long, default_value = "6")]
        pub refresh_seconds: u64,

        #[arg(long, default_value = "10")]
        pub timeout_seconds: u64,

        #[arg(long, default_value = "2")]
        pub retry_attempts: u32,

        #[arg(long, default_value = "1")]
        pub retry_delay_seconds: u64,

        /// Enable verbose output
        #[arg(long)]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn store_url(&self) -> &str {
            &self.store_url
        }

        fn api_key(&self) -> &str {
            &self.api_key
        }

        fn listing_order(&self) -> GiftOrder {
            self.order.parse().unwrap_or_default()
        }

        fn page_size(&self) -> usize {
            self.page_size
        }

        fn timeout_seconds(&self) -> u64 {
            self.timeout_seconds
        }

        fn retry_attempts(&self) -> u32 {
            self.retry_attempts
        }

        fn retry_delay_seconds(&self) -> u64 {
            self.retry_delay_seconds
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_url("store_url", &self.store_url)?;
            validation::validate_non_empty_string("api_key", &self.api_key).map_err(|_| {
                crate::utils::error::SiteError::MissingConfigError {
                    field: "api_key".to_string(),
                }
            })?;
            validate_positive_number("page_size", self.page_size, 1)?;
            validate_positive_number("page", self.page, 1)?;

            self.order.parse::<GiftOrder>().map_err(|reason| {
                crate::utils::error::SiteError::InvalidConfigValueError {
                    field: "order".to_string(),
                    value: self.order.clone(),
                    reason,
                }
            })?;

            Ok(())
        }
    }
}
