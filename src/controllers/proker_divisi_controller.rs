// src/controllers/proker_divisi_controller.rs
//
// Program kerja tingkat divisi: pembacaan publik (daftar, opsi filter,
// detail) dan CRUD admin termasuk foto.
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt as _;
use serde::Deserialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use crate::auth;
use crate::controllers::organisasi_controller::{
    ambil_semua_anggota, ambil_semua_bidang, ambil_semua_divisi,
};
use crate::jabatan::PeranInti;
use crate::models::proker::{ProkerDivisi, ProkerDivisiDetail, StatusProker};
use crate::respons;
use crate::statistik::{self, cocok_peran};
use crate::utils::{
    self, opsi_ganda, GalatUnggah, DIR_FOTO_PROKER_DIVISI, MAKS_FOTO_PROKER,
};

async fn ambil_semua_proker(pool: &MySqlPool) -> Result<Vec<ProkerDivisi>, sqlx::Error> {
    sqlx::query_as::<_, ProkerDivisi>(
        "SELECT id, nama, deskripsi, divisi_id, penanggung_jawab_id, foto_url, status,
                tanggal_mulai, tanggal_selesai, urutan, created_at, updated_at
         FROM proker_divisi ORDER BY urutan ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn ambil_semua_proker_detail(
    pool: &MySqlPool,
) -> Result<Vec<ProkerDivisiDetail>, sqlx::Error> {
    let proker_list = ambil_semua_proker(pool).await?;
    let divisi_list = ambil_semua_divisi(pool).await?;
    let bidang_list = ambil_semua_bidang(pool).await?;
    let anggota_list = ambil_semua_anggota(pool).await?;

    Ok(proker_list
        .into_iter()
        .map(|p| ProkerDivisiDetail::susun(p, &divisi_list, &bidang_list, &anggota_list))
        .collect())
}

async fn ambil_proker_detail(
    pool: &MySqlPool,
    id: &str,
) -> Result<Option<ProkerDivisiDetail>, sqlx::Error> {
    let Some(proker) = sqlx::query_as::<_, ProkerDivisi>(
        "SELECT id, nama, deskripsi, divisi_id, penanggung_jawab_id, foto_url, status,
                tanggal_mulai, tanggal_selesai, urutan, created_at, updated_at
         FROM proker_divisi WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let divisi_list = ambil_semua_divisi(pool).await?;
    let bidang_list = ambil_semua_bidang(pool).await?;
    let anggota_list = ambil_semua_anggota(pool).await?;
    Ok(Some(ProkerDivisiDetail::susun(
        proker,
        &divisi_list,
        &bidang_list,
        &anggota_list,
    )))
}

async fn ambil_foto_url(pool: &MySqlPool, id: &str) -> Result<Option<Option<String>>, sqlx::Error> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT foto_url FROM proker_divisi WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(foto,)| foto))
}

#[derive(Debug, Deserialize)]
pub struct FilterProkerDivisi {
    // "null" memilih proker tanpa divisi (milik pengurus inti)
    pub divisi_id: Option<String>,
    // kunci peran inti: ketua | wakil | sekretaris | bendahara
    pub jabatan: Option<String>,
    pub penanggung_jawab_id: Option<String>,
}

#[get("/api/proker-divisi")]
pub async fn get_semua_proker_divisi(
    pool: web::Data<MySqlPool>,
    query: web::Query<FilterProkerDivisi>,
) -> HttpResponse {
    let mut rows = match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil proker divisi: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };

    if let Some(divisi_id) = &query.divisi_id {
        if divisi_id == "null" {
            rows.retain(|p| p.proker.divisi_id.is_none());
        } else {
            rows.retain(|p| p.proker.divisi_id.as_deref() == Some(divisi_id.as_str()));
        }
    }
    if let Some(kunci) = &query.jabatan {
        let Some(peran) = PeranInti::dari_kunci(kunci) else {
            return respons::gagal_validasi(
                "Parameter jabatan harus salah satu dari: ketua, wakil, sekretaris, bendahara",
            );
        };
        rows.retain(|p| cocok_peran(p, peran));
    }
    if let Some(pj) = &query.penanggung_jawab_id {
        rows.retain(|p| p.proker.penanggung_jawab_id.as_deref() == Some(pj.as_str()));
    }

    respons::sukses(rows)
}

#[get("/api/proker-divisi/filter-opsi")]
pub async fn get_filter_opsi_proker_divisi(pool: web::Data<MySqlPool>) -> HttpResponse {
    let rows = match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil proker divisi: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let divisi_list = match ambil_semua_divisi(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    respons::sukses(statistik::opsi_filter_proker(&rows, &divisi_list))
}

#[get("/api/proker-divisi/{id}")]
pub async fn get_proker_divisi_by_id(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    match ambil_proker_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => {
            log::error!("Gagal mengambil proker {}: {:?}", id, e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuatProkerDivisi {
    pub nama: String,
    pub deskripsi: Option<String>,
    pub divisi_id: Option<String>,
    pub penanggung_jawab_id: Option<String>,
    pub status: Option<String>,
    pub tanggal_mulai: Option<NaiveDate>,
    pub tanggal_selesai: Option<NaiveDate>,
    pub urutan: Option<i32>,
}

#[post("/api/adminpanel/proker-divisi")]
pub async fn create_proker_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    data: web::Json<BuatProkerDivisi>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let nama = data.nama.trim();
    if nama.is_empty() {
        return respons::gagal_validasi("Nama program kerja wajib diisi");
    }
    let status = match &data.status {
        Some(s) => match StatusProker::parse(s) {
            Some(st) => Some(st),
            None => {
                return respons::gagal_validasi(
                    "Status harus salah satu dari: planned, ongoing, completed, cancelled",
                )
            }
        },
        None => None,
    };

    let id = Uuid::new_v4().to_string();
    let kini = Utc::now();
    if let Err(e) = sqlx::query(
        "INSERT INTO proker_divisi
            (id, nama, deskripsi, divisi_id, penanggung_jawab_id, status,
             tanggal_mulai, tanggal_selesai, urutan, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(nama)
    .bind(&data.deskripsi)
    .bind(&data.divisi_id)
    .bind(&data.penanggung_jawab_id)
    .bind(status.map(|s| s.as_str()))
    .bind(data.tanggal_mulai)
    .bind(data.tanggal_selesai)
    .bind(data.urutan.unwrap_or(0))
    .bind(kini)
    .bind(kini)
    .execute(pool.get_ref())
    .await
    {
        log::error!("Gagal menyimpan proker divisi: {:?}", e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_proker_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::dibuat(detail),
        Ok(None) => respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UbahProkerDivisi {
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub deskripsi: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub divisi_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub penanggung_jawab_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub tanggal_mulai: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub tanggal_selesai: Option<Option<NaiveDate>>,
    pub urutan: Option<i32>,
}

#[put("/api/adminpanel/proker-divisi/{id}")]
pub async fn update_proker_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UbahProkerDivisi>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let data = data.into_inner();

    if let Some(Some(status)) = &data.status {
        if StatusProker::parse(status).is_none() {
            return respons::gagal_validasi(
                "Status harus salah satu dari: planned, ongoing, completed, cancelled",
            );
        }
    }

    let mut qb: QueryBuilder<MySql> = QueryBuilder::new("UPDATE proker_divisi SET ");
    let mut first = true;
    let mut has_any = false;

    if let Some(v) = &data.nama {
        let v = v.trim();
        if v.is_empty() {
            return respons::gagal_validasi("Nama program kerja tidak boleh kosong");
        }
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("nama = ").push_bind(v.to_string());
    }
    for (kolom, nilai) in [
        ("deskripsi", &data.deskripsi),
        ("divisi_id", &data.divisi_id),
        ("penanggung_jawab_id", &data.penanggung_jawab_id),
        ("status", &data.status),
    ] {
        if let Some(v) = nilai {
            if !first {
                qb.push(", ");
            }
            first = false;
            has_any = true;
            qb.push(kolom).push(" = ");
            match v {
                Some(s) => {
                    qb.push_bind(s.clone());
                }
                None => {
                    qb.push("NULL");
                }
            }
        }
    }
    for (kolom, nilai) in [
        ("tanggal_mulai", &data.tanggal_mulai),
        ("tanggal_selesai", &data.tanggal_selesai),
    ] {
        if let Some(v) = nilai {
            if !first {
                qb.push(", ");
            }
            first = false;
            has_any = true;
            qb.push(kolom).push(" = ");
            match v {
                Some(tanggal) => {
                    qb.push_bind(*tanggal);
                }
                None => {
                    qb.push("NULL");
                }
            }
        }
    }
    if let Some(v) = data.urutan {
        if !first {
            qb.push(", ");
        }
        has_any = true;
        qb.push("urutan = ").push_bind(v);
    }

    if !has_any {
        return respons::gagal_validasi("Tidak ada field untuk diupdate");
    }

    qb.push(", updated_at = ").push_bind(Utc::now());
    qb.push(" WHERE id = ").push_bind(id.clone());

    if let Err(e) = qb.build().execute(pool.get_ref()).await {
        log::error!("Gagal mengupdate proker divisi {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_proker_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[delete("/api/adminpanel/proker-divisi/{id}")]
pub async fn delete_proker_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let foto_lama = match ambil_foto_url(pool.get_ref(), &id).await {
        Ok(Some(foto)) => foto,
        Ok(None) => return respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let result = match sqlx::query("DELETE FROM proker_divisi WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Gagal menghapus proker divisi {}: {:?}", id, e);
            return respons::gagal_server(e.to_string());
        }
    };

    if result.rows_affected() == 0 {
        return respons::tidak_ditemukan("Program kerja tidak ditemukan");
    }

    if let Some(foto) = foto_lama {
        utils::hapus_file_jika_ada(&foto).await;
    }

    respons::sukses(serde_json::json!({ "id": id }))
}

#[get("/api/adminpanel/proker-divisi")]
pub async fn get_semua_proker_divisi_admin(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(rows) => respons::sukses(rows),
        Err(e) => {
            log::error!("Gagal mengambil proker divisi: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[get("/api/adminpanel/proker-divisi/statistik")]
pub async fn get_statistik_proker_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(rows) => respons::sukses(statistik::statistik_proker_divisi(&rows)),
        Err(e) => {
            log::error!("Gagal menghitung statistik proker divisi: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[post("/api/adminpanel/proker-divisi/{id}/foto")]
pub async fn upload_foto_proker_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    mut payload: Multipart,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let foto_lama = match ambil_foto_url(pool.get_ref(), &id).await {
        Ok(Some(foto)) => foto,
        Ok(None) => return respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let mut foto_baru: Option<String> = None;
    loop {
        let field = match payload.try_next().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return respons::gagal_server(format!("Gagal membaca multipart: {e}")),
        };
        let nama_field = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or("");
        if nama_field == "foto" {
            match utils::simpan_foto(field, DIR_FOTO_PROKER_DIVISI, &id, MAKS_FOTO_PROKER).await {
                Ok(p) => foto_baru = Some(p),
                Err(GalatUnggah::Validasi(pesan)) => return respons::gagal_validasi(pesan),
                Err(GalatUnggah::Penyimpanan(pesan)) => {
                    log::error!("Gagal menyimpan foto proker {}: {}", id, pesan);
                    return respons::gagal_server(pesan);
                }
            }
        }
    }

    let Some(foto_baru) = foto_baru else {
        return respons::gagal_validasi("Field foto wajib diisi");
    };

    if let Err(e) =
        sqlx::query("UPDATE proker_divisi SET foto_url = ?, updated_at = ? WHERE id = ?")
            .bind(&foto_baru)
            .bind(Utc::now())
            .bind(&id)
            .execute(pool.get_ref())
            .await
    {
        log::error!("Gagal menyimpan foto_url proker {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    if let Some(lama) = foto_lama {
        if lama != foto_baru {
            utils::hapus_file_jika_ada(&lama).await;
        }
    }

    respons::sukses(serde_json::json!({ "foto_url": foto_baru }))
}

#[delete("/api/adminpanel/proker-divisi/{id}/foto")]
pub async fn delete_foto_proker_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let foto_lama = match ambil_foto_url(pool.get_ref(), &id).await {
        Ok(Some(foto)) => foto,
        Ok(None) => return respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let Some(foto) = foto_lama else {
        return respons::gagal_validasi("Tidak ada foto untuk dihapus");
    };

    if let Err(e) =
        sqlx::query("UPDATE proker_divisi SET foto_url = NULL, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(&id)
            .execute(pool.get_ref())
            .await
    {
        log::error!("Gagal menghapus foto_url proker {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    utils::hapus_file_jika_ada(&foto).await;

    respons::sukses(serde_json::json!({ "id": id }))
}
