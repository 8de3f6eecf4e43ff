//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/store/enhancer traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use lovenote_core::draft::Drafts;
use lovenote_core::service::confession::ConfessionService;
use lovenote_core::wizard::{Wizard, WizardSettings};
use lovenote_infra::config::load_config;
use lovenote_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use lovenote_infra::llm::{GeminiEnhancer, build_enhancer};
use lovenote_infra::sqlite::confession::SqliteConfessionRepository;
use lovenote_infra::sqlite::draft::SqliteDraftStore;
use lovenote_infra::sqlite::pool::{DatabasePool, database_url};
use lovenote_infra::sqlite::reaction::SqliteReactionRepository;
use lovenote_types::config::LovenoteConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteConfessionService =
    ConfessionService<SqliteConfessionRepository, SqliteReactionRepository>;

pub type ConcreteWizard = Wizard<SqliteDraftStore, GeminiEnhancer>;

/// A wizard opened over HTTP and the last time a request reached it.
pub struct WizardEntry {
    pub wizard: Arc<tokio::sync::Mutex<ConcreteWizard>>,
    pub touched: Instant,
}

impl WizardEntry {
    pub fn new(wizard: ConcreteWizard) -> Self {
        Self {
            wizard: Arc::new(tokio::sync::Mutex::new(wizard)),
            touched: Instant::now(),
        }
    }
}

/// Wizards opened over HTTP, keyed by wizard id.
pub type WizardSessions = DashMap<Uuid, WizardEntry>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub confession_service: Arc<ConcreteConfessionService>,
    pub drafts: Drafts<SqliteDraftStore>,
    pub enhancer: Option<Arc<GeminiEnhancer>>,
    pub wizards: Arc<WizardSessions>,
    pub config: Arc<LovenoteConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: read config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        Ok(Self::from_parts(data_dir, config, db_pool))
    }

    /// Wire services over an already-open pool.
    pub fn from_parts(data_dir: PathBuf, config: LovenoteConfig, db_pool: DatabasePool) -> Self {
        let confession_service = ConfessionService::new(
            SqliteConfessionRepository::new(db_pool.clone()),
            SqliteReactionRepository::new(db_pool.clone()),
        );
        let drafts = Drafts::new(SqliteDraftStore::new(db_pool.clone()));
        let enhancer = build_enhancer(&config.enhancement).map(Arc::new);

        Self {
            confession_service: Arc::new(confession_service),
            drafts,
            enhancer,
            wizards: Arc::new(DashMap::new()),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }

    /// How long an HTTP wizard may sit untouched before it is dropped.
    pub fn wizard_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.config.wizard.idle_timeout_secs)
    }

    /// Drop HTTP wizards idle for longer than the configured timeout.
    pub fn evict_idle_wizards(&self) -> usize {
        let idle = self.wizard_idle_timeout();
        let before = self.wizards.len();
        self.wizards.retain(|_, entry| entry.touched.elapsed() < idle);
        let evicted = before.saturating_sub(self.wizards.len());
        if evicted > 0 {
            tracing::debug!(evicted, "dropped idle wizards");
        }
        evicted
    }

    /// Sweep idle HTTP wizards in the background until the handle is aborted.
    pub fn spawn_wizard_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        let period = self
            .wizard_idle_timeout()
            .clamp(Duration::from_secs(1), Duration::from_secs(60));
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tick.tick().await;
                state.evict_idle_wizards();
            }
        })
    }

    /// Park a freshly opened wizard, making room under the open-wizard cap.
    pub fn register_wizard(&self, wizard: ConcreteWizard) -> Uuid {
        self.evict_idle_wizards();
        let cap = self.config.wizard.max_open.max(1);
        while self.wizards.len() >= cap {
            let oldest = self
                .wizards
                .iter()
                .min_by_key(|entry| entry.value().touched)
                .map(|entry| *entry.key());
            match oldest {
                Some(id) => {
                    self.wizards.remove(&id);
                    tracing::debug!(wizard_id = %id, "dropped least recently used wizard");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        self.wizards.insert(id, WizardEntry::new(wizard));
        id
    }

    pub fn wizard_settings(&self) -> WizardSettings {
        WizardSettings::from_config(&self.config)
    }

    /// Open a submission wizard over the draft slot `key`.
    pub async fn open_wizard(&self, key: impl Into<String>) -> ConcreteWizard {
        Wizard::open(
            &self.drafts,
            key,
            self.enhancer.clone(),
            self.wizard_settings(),
        )
        .await
    }
}
