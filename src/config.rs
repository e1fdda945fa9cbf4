use anyhow::Result;

pub const DEFAULT_API_ENDPOINT: &str = "https://filfox.info/api/v1";
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_endpoint: String,
    pub page_size: usize,
    pub account_name: String,
    pub countervalue_ticker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            account_name: "Filfox API".to_string(),
            countervalue_ticker: "USD".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let defaults = Config::default();
        let config = Config {
            api_endpoint: std::env::var("FILFOX_API_URL")
                .unwrap_or(defaults.api_endpoint),
            page_size: std::env::var("FILFOX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&size| size > 0)
                .unwrap_or(defaults.page_size),
            account_name: std::env::var("LEDGER_ACCOUNT_NAME")
                .unwrap_or(defaults.account_name),
            countervalue_ticker: std::env::var("LEDGER_COUNTERVALUE_TICKER")
                .unwrap_or(defaults.countervalue_ticker),
        };

        Ok(config)
    }
}
