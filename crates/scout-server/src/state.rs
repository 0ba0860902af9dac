//! Shared application state.

use crate::config::Config;
use scout_core::{synth, InsightSource, JobStore, QueryStore, Synthesizer};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub queries: Arc<QueryStore>,
    pub jobs: Arc<JobStore>,
    /// Seeds new queries.
    pub source: Arc<dyn InsightSource>,
    /// Feeds compile jobs.
    pub compile_source: Arc<dyn InsightSource>,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> scout_core::Result<Self> {
        let synthesizer: Arc<dyn Synthesizer> = Arc::from(synth::from_config(&config.llm)?);
        Self::with_synthesizer(config, synthesizer)
    }

    /// Build state around an explicit synthesizer.
    pub fn with_synthesizer(
        config: Config,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> scout_core::Result<Self> {
        let queries = Arc::new(QueryStore::open(&config.db_path)?);
        let jobs = Arc::new(JobStore::open(&config.db_path)?);
        let source: Arc<dyn InsightSource> = Arc::from(config.seed_source.build());
        let compile_source: Arc<dyn InsightSource> = Arc::from(config.compile_source.build());

        Ok(Self {
            queries,
            jobs,
            source,
            compile_source,
            synthesizer,
            config,
        })
    }
}
