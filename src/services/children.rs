use crate::db::operations::{self, Child};
use crate::db::Database;
use crate::services::ServiceError;

pub const NAME_MAX_CHARS: usize = 64;

/// Trims and checks a display name (1 to 64 characters).
pub fn normalize_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidName("name must not be empty"));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ServiceError::InvalidName("name must be at most 64 characters"));
    }
    Ok(name.to_string())
}

pub async fn create_child(db: &Database, raw_name: &str) -> Result<Child, ServiceError> {
    let name = normalize_name(raw_name)?;

    let mut tx = db.begin_write().await?;
    let child = operations::insert_child(tx.conn(), &name).await?;
    tx.commit().await?;

    tracing::info!(child_id = child.id, "child created");
    Ok(child)
}

pub async fn list_children(db: &Database) -> Result<Vec<Child>, ServiceError> {
    Ok(operations::list_children_desc(db.pool()).await?)
}

pub async fn require_child(db: &Database, child_id: i64) -> Result<Child, ServiceError> {
    operations::get_child(db.pool(), child_id)
        .await?
        .ok_or(ServiceError::ChildNotFound(child_id))
}

pub async fn delete_child(db: &Database, child_id: i64) -> Result<(), ServiceError> {
    let mut tx = db.begin_write().await?;
    let deleted = operations::delete_child(tx.conn(), child_id).await?;
    if !deleted {
        return Err(ServiceError::ChildNotFound(child_id));
    }
    tx.commit().await?;

    tracing::info!(child_id, "child deleted with sessions");
    Ok(())
}
