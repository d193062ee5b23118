// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::time::Instant;

use wanisync_anki::AnkiConnectClient;
use wanisync_core::{
    CacheStore, Config, SyncReport, Synchronizer, UnlockReport, WaniKaniClient,
    unsuspend_unlocked,
};

/// Loaded configuration and cache shared by the commands.
#[derive(Debug)]
pub struct App {
    config: Config,
    store: CacheStore,
    synchronizer: Synchronizer,
}

impl App {
    /// Opens the cache file of the given configuration.
    pub async fn new(mut config: Config) -> Result<Self, Box<dyn Error>> {
        let store = CacheStore::for_config(&config)?;
        tracing::debug!(path = %store.path().display(), "loading kanji cache...");
        config.kanji_list_cache = store.load().await?;
        Ok(Self {
            config,
            store,
            synchronizer: Synchronizer::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn anki(&self) -> Result<AnkiConnectClient, Box<dyn Error>> {
        Ok(AnkiConnectClient::new(&self.config.anki)?)
    }

    fn wanikani(&self) -> Result<WaniKaniClient, Box<dyn Error>> {
        if self.config.wk_api_key.is_empty() {
            return Err("WaniKani API key is not configured".into());
        }
        Ok(WaniKaniClient::new(self.config.api_config())?)
    }

    /// Runs a sync pass and persists the cache.
    pub async fn sync(&mut self) -> Result<SyncReport, Box<dyn Error>> {
        let client = self.wanikani()?;
        let (config, report) = self
            .synchronizer
            .run(self.config.clone(), &client)
            .await?;
        self.commit(config).await?;
        Ok(report)
    }

    /// Syncs and persists the cache, then unsuspends the matching cards.
    ///
    /// The cache is saved before Anki is contacted, so an unreachable
    /// collection does not discard the pass.
    pub async fn unlock(&mut self) -> Result<UnlockReport, Box<dyn Error>> {
        let started = Instant::now();
        let sync = self.sync().await?;
        let sync_elapsed = started.elapsed();

        let anki = self.anki()?;
        let report = unsuspend_unlocked(&self.config, &anki, sync, sync_elapsed).await?;
        Ok(report)
    }

    async fn commit(&mut self, config: Config) -> Result<(), Box<dyn Error>> {
        self.store.save(&config.kanji_list_cache).await?;
        self.config = config;
        Ok(())
    }
}
