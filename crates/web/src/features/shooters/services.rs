use sqlx::PgPool;
use storage::{
    dto::shooter::{CreateShooterRequest, UpdateShooterRequest},
    error::Result,
    models::Shooter,
    repository::shooter::ShooterRepository,
};
use uuid::Uuid;

use crate::live::{Change, ChangeBus};

pub async fn list_shooters(pool: &PgPool) -> Result<Vec<Shooter>> {
    ShooterRepository::new(pool).list().await
}

pub async fn get_shooter(pool: &PgPool, shooter_id: Uuid) -> Result<Shooter> {
    ShooterRepository::new(pool).find_by_id(shooter_id).await
}

pub async fn search_shooters(pool: &PgPool, query: &str) -> Result<Vec<Shooter>> {
    ShooterRepository::new(pool).search(query).await
}

/// Register a shooter with the next free start number
pub async fn create_shooter(
    pool: &PgPool,
    changes: &ChangeBus,
    request: &CreateShooterRequest,
) -> Result<Shooter> {
    let shooter = ShooterRepository::new(pool).create(request).await?;
    changes.publish(Change::Shooters);
    Ok(shooter)
}

pub async fn update_shooter(
    pool: &PgPool,
    changes: &ChangeBus,
    shooter_id: Uuid,
    request: &UpdateShooterRequest,
) -> Result<Shooter> {
    let shooter = ShooterRepository::new(pool)
        .update(shooter_id, request)
        .await?;
    changes.publish(Change::Shooters);
    Ok(shooter)
}

pub async fn delete_shooter(pool: &PgPool, changes: &ChangeBus, shooter_id: Uuid) -> Result<()> {
    ShooterRepository::new(pool).delete(shooter_id).await?;

    tracing::info!(%shooter_id, "Deleted shooter");
    changes.publish(Change::Shooters);

    Ok(())
}
