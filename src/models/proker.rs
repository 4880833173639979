// src/models/proker.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::models::anggota::Anggota;
use crate::models::bidang::Bidang;
use crate::models::divisi::{Divisi, DivisiDetail};

/// Status pelaksanaan program kerja divisi. Disimpan sebagai teks di
/// database; varian tertutup ini dipakai untuk validasi input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusProker {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl StatusProker {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "ongoing" => Some(Self::Ongoing),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Program kerja tingkat divisi. `divisi_id` NULL berarti program milik
/// pengurus inti (difilter lewat jabatan penanggung jawabnya).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProkerDivisi {
    pub id: String,
    pub nama: String,
    pub deskripsi: Option<String>,
    pub divisi_id: Option<String>,
    pub penanggung_jawab_id: Option<String>,
    pub foto_url: Option<String>,
    pub status: Option<String>,
    pub tanggal_mulai: Option<NaiveDate>,
    pub tanggal_selesai: Option<NaiveDate>,
    pub urutan: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProkerDivisiDetail {
    #[serde(flatten)]
    pub proker: ProkerDivisi,
    pub divisi: Option<DivisiDetail>,
    pub penanggung_jawab: Option<Anggota>,
}

impl ProkerDivisiDetail {
    pub fn susun(
        proker: ProkerDivisi,
        divisi_list: &[Divisi],
        bidang_list: &[Bidang],
        anggota_list: &[Anggota],
    ) -> Self {
        let divisi = proker
            .divisi_id
            .as_ref()
            .and_then(|id| divisi_list.iter().find(|d| &d.id == id).cloned())
            .map(|d| DivisiDetail::susun(d, bidang_list));
        let penanggung_jawab = proker
            .penanggung_jawab_id
            .as_ref()
            .and_then(|id| anggota_list.iter().find(|a| &a.id == id).cloned());
        Self {
            proker,
            divisi,
            penanggung_jawab,
        }
    }
}

/// Program kerja tingkat bidang; `bidang_id` wajib terisi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProkerBidang {
    pub id: String,
    pub nama: String,
    pub deskripsi: Option<String>,
    pub bidang_id: String,
    pub penanggung_jawab_id: Option<String>,
    pub foto_url: Option<String>,
    pub urutan: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProkerBidangDetail {
    #[serde(flatten)]
    pub proker: ProkerBidang,
    pub bidang: Option<Bidang>,
    pub penanggung_jawab: Option<Anggota>,
}

impl ProkerBidangDetail {
    pub fn susun(proker: ProkerBidang, bidang_list: &[Bidang], anggota_list: &[Anggota]) -> Self {
        let bidang = bidang_list
            .iter()
            .find(|b| b.id == proker.bidang_id)
            .cloned();
        let penanggung_jawab = proker
            .penanggung_jawab_id
            .as_ref()
            .and_then(|id| anggota_list.iter().find(|a| &a.id == id).cloned());
        Self {
            proker,
            bidang,
            penanggung_jawab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_valid() {
        assert_eq!(StatusProker::parse("planned"), Some(StatusProker::Planned));
        assert_eq!(StatusProker::parse("ongoing"), Some(StatusProker::Ongoing));
        assert_eq!(
            StatusProker::parse("completed"),
            Some(StatusProker::Completed)
        );
        assert_eq!(
            StatusProker::parse("cancelled"),
            Some(StatusProker::Cancelled)
        );
    }

    #[test]
    fn parse_status_invalid() {
        assert_eq!(StatusProker::parse(""), None);
        assert_eq!(StatusProker::parse("selesai"), None);
        assert_eq!(StatusProker::parse("Planned"), None);
    }

    #[test]
    fn status_round_trip() {
        for s in ["planned", "ongoing", "completed", "cancelled"] {
            assert_eq!(StatusProker::parse(s).unwrap().as_str(), s);
        }
    }
}
