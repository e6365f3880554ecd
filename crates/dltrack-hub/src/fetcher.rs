//! Snapshot fetcher: one listing call turned into today's download counts.

use crate::client::{ClientConfig, HubClient};
use crate::models::ModelInfo;
use dltrack_common::{format_count, DlTrackError, Result, Snapshot};
use dltrack_config::HubConfig;
use tracing::{info, instrument, warn};

/// Fetches the current download counts for every model of one namespace.
#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    client: HubClient,
    namespace: String,
}

impl SnapshotFetcher {
    /// Creates a fetcher for `namespace` using an existing client.
    pub fn new(client: HubClient, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    /// Creates a fetcher from the `hub` config section.
    pub fn from_config(hub: &HubConfig) -> Result<Self> {
        let client = HubClient::new(ClientConfig::from(hub))?;
        Ok(Self::new(client, hub.namespace.trim()))
    }

    /// Namespace whose models are fetched.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fetches the snapshot. An upstream failure or an empty listing is an
    /// error; nothing is retried.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn fetch(&self) -> Result<Snapshot> {
        info!("Fetching models from {} namespace...", self.namespace);
        let models = self.client.list_models(&self.namespace).await?;
        snapshot_from_models(&self.namespace, &models)
    }
}

/// Builds a snapshot from a listing, stripping the `<namespace>/` prefix and
/// reading a missing download count as `0`.
pub fn snapshot_from_models(namespace: &str, models: &[ModelInfo]) -> Result<Snapshot> {
    if models.is_empty() {
        return Err(DlTrackError::hub(format!(
            "No models found in {namespace} namespace"
        )));
    }

    let mut snapshot = Snapshot::new();
    for model in models {
        let name = model.short_name(namespace);
        let downloads = model.downloads.unwrap_or(0);
        if snapshot.contains(name) {
            warn!("Duplicate model {} in listing, keeping the later entry", name);
        }
        info!("  {}: {} downloads", name, format_count(downloads));
        snapshot.insert(name, downloads);
    }

    Ok(snapshot)
}
