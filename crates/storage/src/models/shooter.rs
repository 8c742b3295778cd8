use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Klass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Shooter {
    pub shooter_id: Uuid,
    pub name: String,
    pub club: String,
    pub klass: Klass,
    pub start_number: i32,
    pub created_at: NaiveDateTime,
}
