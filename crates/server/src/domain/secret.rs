use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Secret {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Base64-encoded ciphertext + nonce. Never decrypted outside `Get`/`reveal`.
    pub encrypted_value: String,
    pub description: Option<String>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
