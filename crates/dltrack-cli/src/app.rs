//! Orchestration of the fetch and plot stages.

use crate::{AppError, AppResult, Cli, Command};
use chrono::NaiveDate;
use dltrack_common::{format_count, today, Snapshot};
use dltrack_config::{Config, ConfigLoader};
use dltrack_graphs::{render_charts, CumulativeSeries, RenderedCharts};
use dltrack_hub::SnapshotFetcher;
use dltrack_ledger::{Ledger, MergeOutcome};
use tracing::{info, instrument};

/// The fetch and plot stages over one loaded configuration.
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
}

impl App {
    /// Create an app over an already validated configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Load configuration as directed by the command line.
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let config = ConfigLoader::load(cli.config.as_deref()).map_err(AppError::Config)?;
        Ok(Self::new(config))
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one subcommand.
    pub async fn execute(&self, command: Command) -> AppResult<()> {
        match command {
            Command::Fetch => {
                self.fetch().await?;
            }
            Command::Plot => {
                self.plot()?;
            }
            Command::Run => {
                self.fetch().await?;
                self.plot()?;
            }
        }
        Ok(())
    }

    /// Fetch today's snapshot and merge it into the ledger.
    #[instrument(skip(self), fields(namespace = %self.config.hub.namespace))]
    pub async fn fetch(&self) -> AppResult<MergeOutcome> {
        let fetcher = SnapshotFetcher::from_config(&self.config.hub).map_err(AppError::Fetch)?;
        let snapshot = fetcher.fetch().await.map_err(AppError::Fetch)?;
        info!(
            "Fetched {} model(s), {} downloads in total",
            snapshot.len(),
            format_count(snapshot.total())
        );
        self.record(&snapshot, today())
    }

    /// Merge `snapshot` into the ledger as the row for `date`.
    pub fn record(&self, snapshot: &Snapshot, date: NaiveDate) -> AppResult<MergeOutcome> {
        let ledger = Ledger::new(&self.config.ledger.path).with_policy(self.config.ledger.same_day);
        let outcome = ledger.merge(snapshot, date).map_err(AppError::Ledger)?;
        info!("Saved to {} ({})", ledger.path().display(), outcome);
        Ok(outcome)
    }

    /// Render both charts from the ledger.
    #[instrument(skip(self))]
    pub fn plot(&self) -> AppResult<RenderedCharts> {
        let series = CumulativeSeries::load(&self.config.ledger.path).map_err(AppError::Plot)?;
        info!(
            "Loaded {} date(s) for {} model(s) from {}",
            series.dates().len(),
            series.models().len(),
            self.config.ledger.path.display()
        );
        render_charts(&series, &self.config.charts).map_err(AppError::Plot)
    }
}
