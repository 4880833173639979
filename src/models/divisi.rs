// src/models/divisi.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::models::bidang::Bidang;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Divisi {
    pub id: String,
    pub bidang_id: String,
    pub nama: String,
    pub deskripsi: Option<String>,
    pub urutan: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Divisi beserta bidang induknya, disusun di aplikasi dari dua fetch terpisah.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisiDetail {
    #[serde(flatten)]
    pub divisi: Divisi,
    pub bidang: Option<Bidang>,
}

impl DivisiDetail {
    pub fn susun(divisi: Divisi, bidang_list: &[Bidang]) -> Self {
        let bidang = bidang_list
            .iter()
            .find(|b| b.id == divisi.bidang_id)
            .cloned();
        Self { divisi, bidang }
    }
}
