use log::{debug, warn};
use reqwest::blocking::Client;

use crate::{
    config::Config,
    error::{Error, Result},
    models::{RawRecord, TransfersPage},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct FilfoxClient {
    client: Client,
    endpoint: String,
    page_size: usize,
}

impl FilfoxClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| Error::Network {
                url: config.api_endpoint.clone(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// Pages through every transfer record of `wallet`, in server order,
    /// until the total count reported by the first page is reached.
    pub fn get_transfers(&self, wallet: &str) -> Result<Vec<RawRecord>> {
        let first = self.get_page(wallet, 0)?;
        let total_count = first.total_count;
        let mut records = first.transfers;
        let mut page = 0;

        while records.len() < total_count {
            page += 1;
            let next = self.get_page(wallet, page)?;
            if next.transfers.is_empty() {
                warn!(
                    "Page {} came back empty with {} of {} records retrieved, stopping",
                    page,
                    records.len(),
                    total_count
                );
                break;
            }
            records.extend(next.transfers);
        }

        Ok(records)
    }

    fn get_page(&self, wallet: &str, page: usize) -> Result<TransfersPage> {
        let url = format!("{}/address/{}/transfers", self.endpoint, wallet);
        debug!("API call {}?pageSize={}&page={}", url, self.page_size, page);

        let network_error = |source: reqwest::Error| Error::Network {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .query(&[("pageSize", self.page_size), ("page", page)])
            .send()
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                url: url.clone(),
                status,
            });
        }

        let body = response.text().map_err(network_error)?;
        let parsed: TransfersPage = serde_json::from_str(&body).map_err(|source| Error::Decode {
            url: url.clone(),
            source,
        })?;
        debug!(
            "Page carried {} records (total {}, types {:?})",
            parsed.transfers.len(),
            parsed.total_count,
            parsed.types
        );

        Ok(parsed)
    }
}
