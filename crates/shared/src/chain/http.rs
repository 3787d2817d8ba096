use super::ChainSnapshotSource;
use crate::models::{NeuronInfo, SubnetInfo};
use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct BlockResponse {
    block: u64,
}

/// Chain state served as JSON by a snapshot gateway.
pub struct HttpSnapshotSource {
    client: Client,
    base_url: String,
}

impl HttpSnapshotSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).context("Invalid snapshot URL")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("subnet-stats")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let url = format!("{}{route}", self.base_url);
        debug!("Fetching {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {url}"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Request to {url} failed with status {status}");
        }

        let response_text = response
            .text()
            .context("Failed to get response text")?;
        serde_json::from_str(&response_text)
            .with_context(|| format!("Failed to parse response from {url}"))
    }
}

impl ChainSnapshotSource for HttpSnapshotSource {
    fn get_subnet_info(&self, netuid: u16) -> Result<SubnetInfo> {
        self.get_json(&format!("/subnets/{netuid}"))
    }

    fn get_node_list(&self, netuid: u16) -> Result<Vec<NeuronInfo>> {
        self.get_json(&format!("/subnets/{netuid}/neurons"))
    }

    fn get_current_block(&self) -> Result<u64> {
        let response: BlockResponse = self.get_json("/block")?;
        Ok(response.block)
    }

    fn get_registration_block(&self, netuid: u16, uid: u16) -> Result<u64> {
        let response: BlockResponse =
            self.get_json(&format!("/subnets/{netuid}/registration/{uid}"))?;
        Ok(response.block)
    }
}
