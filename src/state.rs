use crate::config::Config;
use crate::pipeline::import::Importer;
use crate::types::activity::Activity;
use crate::types::palette::Palette;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    importer: Arc<Importer>,
    activities: Arc<DashMap<String, CachedActivity>>,
}

struct CachedActivity {
    activity: Activity,
    inserted_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let importer = Importer::new(Palette::new(config.palette.as_slice()));
        Self {
            config,
            importer: Arc::new(importer),
            activities: Arc::new(DashMap::new()),
        }
    }

    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    pub fn insert(&self, activity: Activity) {
        self.activities.insert(
            activity.id.clone(),
            CachedActivity {
                activity,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<Activity> {
        self.activities.get(id).map(|entry| entry.activity.clone())
    }

    /// Applies `update` to the stored activity and returns the result.
    pub fn update<F>(&self, id: &str, update: F) -> Option<Activity>
    where
        F: FnOnce(&mut Activity),
    {
        let mut entry = self.activities.get_mut(id)?;
        update(&mut entry.activity);
        Some(entry.activity.clone())
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.activities.retain(|_, cached| {
            now.duration_since(cached.inserted_at) < ttl
        });
        tracing::info!("Cache eviction complete. Current size: {}", self.activities.len());
    }
}
