// src/controllers/divisi_controller.rs
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use crate::auth;
use crate::controllers::organisasi_controller::{ambil_semua_bidang, ambil_semua_divisi};
use crate::models::bidang::Bidang;
use crate::models::divisi::{Divisi, DivisiDetail};
use crate::respons;
use crate::utils::opsi_ganda;

pub async fn ambil_divisi_detail(
    pool: &MySqlPool,
    id: &str,
) -> Result<Option<DivisiDetail>, sqlx::Error> {
    let Some(divisi) = sqlx::query_as::<_, Divisi>(
        "SELECT id, bidang_id, nama, deskripsi, urutan, created_at, updated_at
         FROM divisi WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let bidang = sqlx::query_as::<_, Bidang>(
        "SELECT id, nama, deskripsi, kepala_bidang_id, urutan, created_at, updated_at
         FROM bidang WHERE id = ?",
    )
    .bind(&divisi.bidang_id)
    .fetch_optional(pool)
    .await?;

    Ok(Some(DivisiDetail { divisi, bidang }))
}

#[get("/api/adminpanel/divisi")]
pub async fn get_semua_divisi(pool: web::Data<MySqlPool>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let divisi_list = match ambil_semua_divisi(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil divisi: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let bidang_list = match ambil_semua_bidang(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let detail: Vec<DivisiDetail> = divisi_list
        .into_iter()
        .map(|d| DivisiDetail::susun(d, &bidang_list))
        .collect();
    respons::sukses(detail)
}

#[derive(Debug, Deserialize)]
pub struct BuatDivisi {
    pub bidang_id: String,
    pub nama: String,
    pub deskripsi: Option<String>,
    pub urutan: Option<i32>,
}

#[post("/api/adminpanel/divisi")]
pub async fn create_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    data: web::Json<BuatDivisi>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let nama = data.nama.trim();
    if nama.is_empty() {
        return respons::gagal_validasi("Nama divisi wajib diisi");
    }
    if data.bidang_id.trim().is_empty() {
        return respons::gagal_validasi("Bidang wajib dipilih");
    }

    let id = Uuid::new_v4().to_string();
    let kini = Utc::now();
    if let Err(e) = sqlx::query(
        "INSERT INTO divisi (id, bidang_id, nama, deskripsi, urutan, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(data.bidang_id.trim())
    .bind(nama)
    .bind(&data.deskripsi)
    .bind(data.urutan.unwrap_or(0))
    .bind(kini)
    .bind(kini)
    .execute(pool.get_ref())
    .await
    {
        log::error!("Gagal menyimpan divisi: {:?}", e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_divisi_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::dibuat(detail),
        Ok(None) => respons::tidak_ditemukan("Divisi tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UbahDivisi {
    pub bidang_id: Option<String>,
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub deskripsi: Option<Option<String>>,
    pub urutan: Option<i32>,
}

#[put("/api/adminpanel/divisi/{id}")]
pub async fn update_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UbahDivisi>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let data = data.into_inner();

    let mut qb: QueryBuilder<MySql> = QueryBuilder::new("UPDATE divisi SET ");
    let mut first = true;
    let mut has_any = false;

    if let Some(v) = &data.bidang_id {
        if v.trim().is_empty() {
            return respons::gagal_validasi("Bidang tidak boleh kosong");
        }
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("bidang_id = ").push_bind(v.trim().to_string());
    }
    if let Some(v) = &data.nama {
        let v = v.trim();
        if v.is_empty() {
            return respons::gagal_validasi("Nama divisi tidak boleh kosong");
        }
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("nama = ").push_bind(v.to_string());
    }
    if let Some(v) = &data.deskripsi {
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("deskripsi = ");
        match v {
            Some(s) => {
                qb.push_bind(s.clone());
            }
            None => {
                qb.push("NULL");
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
        log::error!("Gagal mengupdate divisi {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_divisi_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Divisi tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[delete("/api/adminpanel/divisi/{id}")]
pub async fn delete_divisi(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    // anggota.divisi_id ditangani skema (ON DELETE SET NULL), bukan aplikasi;
    // anggota terdampak otomatis terbaca sebagai pengurus inti pada fetch berikutnya
    let result = match sqlx::query("DELETE FROM divisi WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Gagal menghapus divisi {}: {:?}", id, e);
            return respons::gagal_server(e.to_string());
        }
    };

    if result.rows_affected() == 0 {
        return respons::tidak_ditemukan("Divisi tidak ditemukan");
    }

    respons::sukses(serde_json::json!({ "id": id }))
}
