// src/controllers/bidang_controller.rs
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use crate::auth;
use crate::controllers::organisasi_controller::ambil_semua_bidang;
use crate::models::bidang::Bidang;
use crate::respons;
use crate::utils::opsi_ganda;

async fn ambil_bidang(pool: &MySqlPool, id: &str) -> Result<Option<Bidang>, sqlx::Error> {
    sqlx::query_as::<_, Bidang>(
        "SELECT id, nama, deskripsi, kepala_bidang_id, urutan, created_at, updated_at
         FROM bidang WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[get("/api/adminpanel/bidang")]
pub async fn get_semua_bidang(pool: web::Data<MySqlPool>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }
    match ambil_semua_bidang(pool.get_ref()).await {
        Ok(data) => respons::sukses(data),
        Err(e) => {
            log::error!("Gagal mengambil bidang: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuatBidang {
    pub nama: String,
    pub deskripsi: Option<String>,
    pub kepala_bidang_id: Option<String>,
    pub urutan: Option<i32>,
}

#[post("/api/adminpanel/bidang")]
pub async fn create_bidang(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    data: web::Json<BuatBidang>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let nama = data.nama.trim();
    if nama.is_empty() {
        return respons::gagal_validasi("Nama bidang wajib diisi");
    }

    let id = Uuid::new_v4().to_string();
    let kini = Utc::now();
    if let Err(e) = sqlx::query(
        "INSERT INTO bidang (id, nama, deskripsi, kepala_bidang_id, urutan, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(nama)
    .bind(&data.deskripsi)
    .bind(&data.kepala_bidang_id)
    .bind(data.urutan.unwrap_or(0))
    .bind(kini)
    .bind(kini)
    .execute(pool.get_ref())
    .await
    {
        log::error!("Gagal menyimpan bidang: {:?}", e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_bidang(pool.get_ref(), &id).await {
        Ok(Some(bidang)) => respons::dibuat(bidang),
        Ok(None) => respons::tidak_ditemukan("Bidang tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UbahBidang {
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub deskripsi: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub kepala_bidang_id: Option<Option<String>>,
    pub urutan: Option<i32>,
}

#[put("/api/adminpanel/bidang/{id}")]
pub async fn update_bidang(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UbahBidang>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let data = data.into_inner();

    let mut qb: QueryBuilder<MySql> = QueryBuilder::new("UPDATE bidang SET ");
    let mut first = true;
    let mut has_any = false;

    if let Some(v) = &data.nama {
        let v = v.trim();
        if v.is_empty() {
            return respons::gagal_validasi("Nama bidang tidak boleh kosong");
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
    if let Some(v) = &data.kepala_bidang_id {
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("kepala_bidang_id = ");
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
        log::error!("Gagal mengupdate bidang {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_bidang(pool.get_ref(), &id).await {
        Ok(Some(bidang)) => respons::sukses(bidang),
        Ok(None) => respons::tidak_ditemukan("Bidang tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[delete("/api/adminpanel/bidang/{id}")]
pub async fn delete_bidang(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    // divisi turunan ikut terhapus lewat cascade FK di database
    let result = match sqlx::query("DELETE FROM bidang WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Gagal menghapus bidang {}: {:?}", id, e);
            return respons::gagal_server(e.to_string());
        }
    };

    if result.rows_affected() == 0 {
        return respons::tidak_ditemukan("Bidang tidak ditemukan");
    }

    respons::sukses(serde_json::json!({ "id": id }))
}
