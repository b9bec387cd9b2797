//! Valid PIN repository for database operations.

use sqlx::PgPool;

/// Read-only access to the valid_pins table.
#[derive(Clone)]
pub struct ValidPinRepository {
    pool: PgPool,
}

impl ValidPinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the PIN exists and is active.
    pub async fn is_active(&self, pin: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM valid_pins WHERE pin_code = $1 AND is_active = true)
            "#,
        )
        .bind(pin)
        .fetch_one(&self.pool)
        .await
    }
}
