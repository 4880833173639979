// src/controllers/organisasi_controller.rs
//
// Endpoint baca publik untuk halaman struktur organisasi: pohon
// bidang -> divisi -> anggota, pengurus inti, dan pembacaan anggota.
use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use sqlx::MySqlPool;

use crate::jabatan::peran_anggota;
use crate::models::anggota::{Anggota, AnggotaDetail};
use crate::models::bidang::Bidang;
use crate::models::divisi::{Divisi, DivisiDetail};
use crate::respons;
use crate::struktur::{pengurus_inti, susun_struktur};

pub async fn ambil_semua_bidang(pool: &MySqlPool) -> Result<Vec<Bidang>, sqlx::Error> {
    sqlx::query_as::<_, Bidang>(
        "SELECT id, nama, deskripsi, kepala_bidang_id, urutan, created_at, updated_at
         FROM bidang ORDER BY urutan ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn ambil_semua_divisi(pool: &MySqlPool) -> Result<Vec<Divisi>, sqlx::Error> {
    sqlx::query_as::<_, Divisi>(
        "SELECT id, bidang_id, nama, deskripsi, urutan, created_at, updated_at
         FROM divisi ORDER BY urutan ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn ambil_semua_anggota(pool: &MySqlPool) -> Result<Vec<Anggota>, sqlx::Error> {
    sqlx::query_as::<_, Anggota>(
        "SELECT id, nama, jabatan, angkatan, divisi_id, foto_url, email, telepon, bio,
                urutan, created_at, updated_at
         FROM anggota ORDER BY urutan ASC",
    )
    .fetch_all(pool)
    .await
}

/// Satu anggota dengan divisi dan bidang induknya terlampir.
pub async fn ambil_anggota_detail(
    pool: &MySqlPool,
    id: &str,
) -> Result<Option<AnggotaDetail>, sqlx::Error> {
    let Some(anggota) = sqlx::query_as::<_, Anggota>(
        "SELECT id, nama, jabatan, angkatan, divisi_id, foto_url, email, telepon, bio,
                urutan, created_at, updated_at
         FROM anggota WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let divisi = match &anggota.divisi_id {
        Some(divisi_id) => {
            sqlx::query_as::<_, Divisi>(
                "SELECT id, bidang_id, nama, deskripsi, urutan, created_at, updated_at
                 FROM divisi WHERE id = ?",
            )
            .bind(divisi_id)
            .fetch_optional(pool)
            .await?
        }
        None => None,
    };

    let bidang = match &divisi {
        Some(d) => {
            sqlx::query_as::<_, Bidang>(
                "SELECT id, nama, deskripsi, kepala_bidang_id, urutan, created_at, updated_at
                 FROM bidang WHERE id = ?",
            )
            .bind(&d.bidang_id)
            .fetch_optional(pool)
            .await?
        }
        None => None,
    };

    Ok(Some(AnggotaDetail {
        anggota,
        divisi: divisi.map(|d| DivisiDetail { divisi: d, bidang }),
    }))
}

#[get("/api/organisasi/struktur")]
pub async fn get_struktur(pool: web::Data<MySqlPool>) -> HttpResponse {
    let bidang_list = match ambil_semua_bidang(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil bidang: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let divisi_list = match ambil_semua_divisi(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil divisi: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let anggota_list = match ambil_semua_anggota(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil anggota: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };

    respons::sukses(susun_struktur(bidang_list, divisi_list, anggota_list))
}

/// Pengurus inti beserta label peran turunannya (Ketua/Wakil Ketua/
/// Sekretaris/Bendahara, atau "Pengurus Inti" bila jabatan tidak
/// terklasifikasi). Dihitung ulang setiap pembacaan, tidak disimpan.
#[derive(Debug, Serialize)]
struct PengurusInti {
    #[serde(flatten)]
    anggota: Anggota,
    peran: &'static str,
}

#[get("/api/organisasi/pengurus-inti")]
pub async fn get_pengurus_inti(pool: web::Data<MySqlPool>) -> HttpResponse {
    match ambil_semua_anggota(pool.get_ref()).await {
        Ok(anggota_list) => {
            let data: Vec<PengurusInti> = pengurus_inti(&anggota_list)
                .into_iter()
                .map(|a| {
                    let peran = peran_anggota(&a).label();
                    PengurusInti { anggota: a, peran }
                })
                .collect();
            respons::sukses(data)
        }
        Err(e) => {
            log::error!("Gagal mengambil anggota: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[get("/api/anggota")]
pub async fn get_semua_anggota(pool: web::Data<MySqlPool>) -> HttpResponse {
    let anggota_list = match ambil_semua_anggota(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil anggota: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let divisi_list = match ambil_semua_divisi(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => return respons::gagal_server(e.to_string()),
    };
    let bidang_list = match ambil_semua_bidang(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let detail: Vec<AnggotaDetail> = anggota_list
        .into_iter()
        .map(|a| AnggotaDetail::susun(a, &divisi_list, &bidang_list))
        .collect();
    respons::sukses(detail)
}

#[get("/api/anggota/{id}")]
pub async fn get_anggota_by_id(pool: web::Data<MySqlPool>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    match ambil_anggota_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Anggota tidak ditemukan"),
        Err(e) => {
            log::error!("Gagal mengambil anggota {}: {:?}", id, e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[get("/api/divisi/{id}/anggota")]
pub async fn get_anggota_by_divisi(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> HttpResponse {
    let divisi_id = path.into_inner();
    let anggota_list = match sqlx::query_as::<_, Anggota>(
        "SELECT id, nama, jabatan, angkatan, divisi_id, foto_url, email, telepon, bio,
                urutan, created_at, updated_at
         FROM anggota WHERE divisi_id = ? ORDER BY urutan ASC",
    )
    .bind(&divisi_id)
    .fetch_all(pool.get_ref())
    .await
    {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil anggota divisi {}: {:?}", divisi_id, e);
            return respons::gagal_server(e.to_string());
        }
    };

    let divisi_list = match ambil_semua_divisi(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => return respons::gagal_server(e.to_string()),
    };
    let bidang_list = match ambil_semua_bidang(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let detail: Vec<AnggotaDetail> = anggota_list
        .into_iter()
        .map(|a| AnggotaDetail::susun(a, &divisi_list, &bidang_list))
        .collect();
    respons::sukses(detail)
}
