// src/models/bidang.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bidang {
    pub id: String,
    pub nama: String,
    pub deskripsi: Option<String>,
    pub kepala_bidang_id: Option<String>,
    pub urutan: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
