use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::core::auth::AdminDirectory;
use crate::core::draw::{DrawService, OsSelector};
use crate::core::draw_log::DrawLogStore;
use crate::core::participants::ParticipantStore;
use crate::core::session::SessionManager;
use crate::core::settings::SettingsStore;
use crate::core::store::StoreError;

/// Shared server state: one service per concern, wired once at startup.
pub struct ServerState {
    pub participants: ParticipantStore,
    pub settings: SettingsStore,
    pub draw_log: DrawLogStore,
    pub admins: AdminDirectory,
    pub sessions: SessionManager,
    pub draw: DrawService,
}

impl ServerState {
    pub async fn new(config: &Config) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let participants =
            ParticipantStore::open(Some(config.data_dir.join("participants.json")))?;
        let settings = SettingsStore::open(Some(config.data_dir.join("settings.json")))?;
        let draw_log = DrawLogStore::open(Some(config.data_dir.join("draw_log.json")))?;
        let admins = AdminDirectory::open(Some(config.data_dir.join("admins.json")))?;
        admins
            .bootstrap(&config.admin_username, &config.admin_password)
            .await?;
        let sessions = SessionManager::new(Duration::from_secs(config.session_ttl_secs));
        let draw = DrawService::new(
            participants.clone(),
            draw_log.clone(),
            Arc::new(OsSelector),
            config.winner_count,
        );
        Ok(Self {
            participants,
            settings,
            draw_log,
            admins,
            sessions,
            draw,
        })
    }
}
