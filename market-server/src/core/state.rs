use std::path::PathBuf;
use std::sync::Arc;

use shared::models::{UserRole, UserStatus};
use sqlx::SqlitePool;

use crate::auth::{JwtService, LogOtpSender, OtpSender, OtpThrottle, password};
use crate::core::{BootstrapAdmin, Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::order::SqliteOrderStorage;
use crate::db::repository::user::{self, NewUser};
use crate::notify::{
    NOTIFICATION_QUEUE_CAPACITY, NotificationWorker, Notifier, TelegramClient,
};
use crate::orders::OrderManager;

/// Shared service handles
///
/// Cheap to clone: every field is an `Arc` or a pool handle.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | server configuration |
/// | pool | SQLite connection pool |
/// | jwt_service | token issuing and validation |
/// | order_manager | order lifecycle |
/// | otp_sender | OTP delivery |
/// | otp_throttle | `send-otp` cooldown per phone |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub order_manager: Arc<OrderManager>,
    pub otp_sender: Arc<dyn OtpSender>,
    pub otp_throttle: Arc<OtpThrottle>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("order_manager", &self.order_manager)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Build state from an open pool. Notifications are dropped when
    /// `notifier` is `None`.
    pub fn new(config: Config, pool: SqlitePool, notifier: Option<Notifier>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let storage = Arc::new(SqliteOrderStorage::new(pool.clone()));
        let order_manager = Arc::new(OrderManager::new(storage, notifier));
        let otp_throttle = Arc::new(OtpThrottle::new(config.otp_resend_seconds));
        Self {
            config,
            pool,
            jwt_service,
            order_manager,
            otp_sender: Arc::new(LogOtpSender),
            otp_throttle,
        }
    }

    /// Replace the OTP delivery channel
    pub fn with_otp_sender(mut self, sender: Arc<dyn OtpSender>) -> Self {
        self.otp_sender = sender;
        self
    }

    /// Open the database, prepare the work directory, seed the bootstrap
    /// admin and start the notification worker.
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(config.uploads_dir())?;

        let db = DbService::new(&config.database_url).await?;

        if let Some(admin) = &config.bootstrap_admin {
            ensure_bootstrap_admin(&db.pool, admin).await?;
        }

        let (notifier, rx) = Notifier::channel(NOTIFICATION_QUEUE_CAPACITY);
        let telegram = match &config.telegram {
            Some(telegram) => Some(
                TelegramClient::new(telegram)
                    .map_err(|e| ServerError::Config(format!("Telegram client: {e}")))?,
            ),
            None => None,
        };
        tokio::spawn(NotificationWorker::new(telegram).run(rx));

        Ok(Self::new(config.clone(), db.pool, Some(notifier)))
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.config.uploads_dir()
    }
}

/// Create the SUPER_ADMIN account unless the phone is already registered
async fn ensure_bootstrap_admin(pool: &SqlitePool, admin: &BootstrapAdmin) -> Result<()> {
    let exists = user::phone_exists(pool, &admin.phone_number)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    if exists {
        return Ok(());
    }

    let password_hash = password::hash_password(&admin.password)?;
    let new_user = NewUser {
        first_name: "Super",
        last_name: "Admin",
        phone_number: &admin.phone_number,
        password_hash: &password_hash,
        role: UserRole::SuperAdmin,
        status: UserStatus::Active,
        region_id: None,
    };
    let created = user::create(pool, &new_user, None)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    tracing::info!(user_id = created.id, "Bootstrap SUPER_ADMIN created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let db = DbService::in_memory().await.unwrap();
        let admin = BootstrapAdmin {
            phone_number: "+998900000000".into(),
            password: "rootpass123".into(),
        };
        ensure_bootstrap_admin(&db.pool, &admin).await.unwrap();
        ensure_bootstrap_admin(&db.pool, &admin).await.unwrap();

        let user = user::find_by_phone(&db.pool, "+998900000000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::SuperAdmin);
        assert_eq!(user.status, UserStatus::Active);
    }
}
