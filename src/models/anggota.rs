// src/models/anggota.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::models::bidang::Bidang;
use crate::models::divisi::{Divisi, DivisiDetail};

/// `divisi_id` NULL menandakan pengurus inti; klasifikasi ini diturunkan
/// ulang pada setiap pembacaan, tidak pernah disimpan sebagai flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Anggota {
    pub id: String,
    pub nama: String,
    pub jabatan: String,
    pub angkatan: i32,
    pub divisi_id: Option<String>,
    pub foto_url: Option<String>,
    pub email: Option<String>,
    pub telepon: Option<String>,
    pub bio: Option<String>,
    pub urutan: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnggotaDetail {
    #[serde(flatten)]
    pub anggota: Anggota,
    pub divisi: Option<DivisiDetail>,
}

impl AnggotaDetail {
    pub fn susun(anggota: Anggota, divisi_list: &[Divisi], bidang_list: &[Bidang]) -> Self {
        let divisi = anggota
            .divisi_id
            .as_ref()
            .and_then(|id| divisi_list.iter().find(|d| &d.id == id).cloned())
            .map(|d| DivisiDetail::susun(d, bidang_list));
        Self { anggota, divisi }
    }
}
