use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::RngCore;
use tokio::sync::RwLock;

/// CSRF token store abstraction. The in-memory map is the default and test
/// implementation; multi-instance deployments back this with a shared store.
#[async_trait]
pub trait CsrfStore: Send + Sync {
    async fn put(&self, token: String, owner_id: String, ttl: Duration);
    async fn validate(&self, token: &str, owner_id: &str) -> bool;
}

/// Tokens are bound to the session's user and expire after 24 hours
pub const CSRF_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// 32 random bytes, hex-encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

struct CsrfEntry {
    owner_id: String,
    expires_at: i64,
}

#[derive(Default)]
pub struct MemoryCsrfStore {
    entries: RwLock<HashMap<String, CsrfEntry>>,
}

impl MemoryCsrfStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hourly sweep deleting entries past their expiry
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                let removed = store.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "swept expired CSRF tokens");
                }
            }
        })
    }

    pub async fn sweep(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }
}

#[async_trait]
impl CsrfStore for MemoryCsrfStore {
    async fn put(&self, token: String, owner_id: String, ttl: Duration) {
        let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
        self.entries.write().await.insert(
            token,
            CsrfEntry {
                owner_id,
                expires_at,
            },
        );
    }

    async fn validate(&self, token: &str, owner_id: &str) -> bool {
        let now = Utc::now().timestamp();

        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(e) if e.expires_at > now => return e.owner_id == owner_id,
                Some(_) => {} // expired, fall through to remove
                None => return false,
            }
        }

        self.entries.write().await.remove(token);
        false
    }
}
