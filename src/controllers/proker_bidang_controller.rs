// src/controllers/proker_bidang_controller.rs
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt as _;
use serde::Deserialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use crate::auth;
use crate::controllers::organisasi_controller::{ambil_semua_anggota, ambil_semua_bidang};
use crate::models::proker::{ProkerBidang, ProkerBidangDetail};
use crate::respons;
use crate::statistik;
use crate::utils::{
    self, opsi_ganda, GalatUnggah, DIR_FOTO_PROKER_BIDANG, MAKS_FOTO_PROKER,
};

async fn ambil_semua_proker(pool: &MySqlPool) -> Result<Vec<ProkerBidang>, sqlx::Error> {
    sqlx::query_as::<_, ProkerBidang>(
        "SELECT id, nama, deskripsi, bidang_id, penanggung_jawab_id, foto_url, urutan,
                created_at, updated_at
         FROM proker_bidang ORDER BY urutan ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn ambil_semua_proker_detail(
    pool: &MySqlPool,
) -> Result<Vec<ProkerBidangDetail>, sqlx::Error> {
    let proker_list = ambil_semua_proker(pool).await?;
    let bidang_list = ambil_semua_bidang(pool).await?;
    let anggota_list = ambil_semua_anggota(pool).await?;

    Ok(proker_list
        .into_iter()
        .map(|p| ProkerBidangDetail::susun(p, &bidang_list, &anggota_list))
        .collect())
}

async fn ambil_proker_detail(
    pool: &MySqlPool,
    id: &str,
) -> Result<Option<ProkerBidangDetail>, sqlx::Error> {
    let Some(proker) = sqlx::query_as::<_, ProkerBidang>(
        "SELECT id, nama, deskripsi, bidang_id, penanggung_jawab_id, foto_url, urutan,
                created_at, updated_at
         FROM proker_bidang WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let bidang_list = ambil_semua_bidang(pool).await?;
    let anggota_list = ambil_semua_anggota(pool).await?;
    Ok(Some(ProkerBidangDetail::susun(
        proker,
        &bidang_list,
        &anggota_list,
    )))
}

async fn ambil_foto_url(pool: &MySqlPool, id: &str) -> Result<Option<Option<String>>, sqlx::Error> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT foto_url FROM proker_bidang WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(foto,)| foto))
}

#[derive(Debug, Deserialize)]
pub struct FilterProkerBidang {
    pub bidang_id: Option<String>,
}

#[get("/api/proker-bidang")]
pub async fn get_semua_proker_bidang(
    pool: web::Data<MySqlPool>,
    query: web::Query<FilterProkerBidang>,
) -> HttpResponse {
    let mut rows = match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil proker bidang: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };

    if let Some(bidang_id) = &query.bidang_id {
        rows.retain(|p| p.proker.bidang_id == *bidang_id);
    }

    respons::sukses(rows)
}

#[get("/api/proker-bidang/{id}")]
pub async fn get_proker_bidang_by_id(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    match ambil_proker_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => {
            log::error!("Gagal mengambil proker bidang {}: {:?}", id, e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuatProkerBidang {
    pub nama: String,
    pub deskripsi: Option<String>,
    pub bidang_id: String,
    pub penanggung_jawab_id: Option<String>,
    pub urutan: Option<i32>,
}

#[post("/api/adminpanel/proker-bidang")]
pub async fn create_proker_bidang(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    data: web::Json<BuatProkerBidang>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let nama = data.nama.trim();
    if nama.is_empty() {
        return respons::gagal_validasi("Nama program kerja wajib diisi");
    }
    if data.bidang_id.trim().is_empty() {
        return respons::gagal_validasi("Bidang wajib dipilih");
    }

    let id = Uuid::new_v4().to_string();
    let kini = Utc::now();
    if let Err(e) = sqlx::query(
        "INSERT INTO proker_bidang
            (id, nama, deskripsi, bidang_id, penanggung_jawab_id, urutan,
             created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(nama)
    .bind(&data.deskripsi)
    .bind(data.bidang_id.trim())
    .bind(&data.penanggung_jawab_id)
    .bind(data.urutan.unwrap_or(0))
    .bind(kini)
    .bind(kini)
    .execute(pool.get_ref())
    .await
    {
        log::error!("Gagal menyimpan proker bidang: {:?}", e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_proker_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::dibuat(detail),
        Ok(None) => respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UbahProkerBidang {
    pub nama: Option<String>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub deskripsi: Option<Option<String>>,
    pub bidang_id: Option<String>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub penanggung_jawab_id: Option<Option<String>>,
    pub urutan: Option<i32>,
}

#[put("/api/adminpanel/proker-bidang/{id}")]
pub async fn update_proker_bidang(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UbahProkerBidang>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let data = data.into_inner();

    let mut qb: QueryBuilder<MySql> = QueryBuilder::new("UPDATE proker_bidang SET ");
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
    for (kolom, nilai) in [
        ("deskripsi", &data.deskripsi),
        ("penanggung_jawab_id", &data.penanggung_jawab_id),
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
        log::error!("Gagal mengupdate proker bidang {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_proker_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Program kerja tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[delete("/api/adminpanel/proker-bidang/{id}")]
pub async fn delete_proker_bidang(
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

    let result = match sqlx::query("DELETE FROM proker_bidang WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Gagal menghapus proker bidang {}: {:?}", id, e);
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

#[get("/api/adminpanel/proker-bidang")]
pub async fn get_semua_proker_bidang_admin(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(rows) => respons::sukses(rows),
        Err(e) => {
            log::error!("Gagal mengambil proker bidang: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[get("/api/adminpanel/proker-bidang/statistik")]
pub async fn get_statistik_proker_bidang(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    match ambil_semua_proker_detail(pool.get_ref()).await {
        Ok(rows) => respons::sukses(statistik::statistik_proker_bidang(&rows)),
        Err(e) => {
            log::error!("Gagal menghitung statistik proker bidang: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}

#[post("/api/adminpanel/proker-bidang/{id}/foto")]
pub async fn upload_foto_proker_bidang(
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
            match utils::simpan_foto(field, DIR_FOTO_PROKER_BIDANG, &id, MAKS_FOTO_PROKER).await {
                Ok(p) => foto_baru = Some(p),
                Err(GalatUnggah::Validasi(pesan)) => return respons::gagal_validasi(pesan),
                Err(GalatUnggah::Penyimpanan(pesan)) => {
                    log::error!("Gagal menyimpan foto proker bidang {}: {}", id, pesan);
                    return respons::gagal_server(pesan);
                }
            }
        }
    }

    let Some(foto_baru) = foto_baru else {
        return respons::gagal_validasi("Field foto wajib diisi");
    };

    if let Err(e) =
        sqlx::query("UPDATE proker_bidang SET foto_url = ?, updated_at = ? WHERE id = ?")
            .bind(&foto_baru)
            .bind(Utc::now())
            .bind(&id)
            .execute(pool.get_ref())
            .await
    {
        log::error!("Gagal menyimpan foto_url proker bidang {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    if let Some(lama) = foto_lama {
        if lama != foto_baru {
            utils::hapus_file_jika_ada(&lama).await;
        }
    }

    respons::sukses(serde_json::json!({ "foto_url": foto_baru }))
}

#[delete("/api/adminpanel/proker-bidang/{id}/foto")]
pub async fn delete_foto_proker_bidang(
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
        sqlx::query("UPDATE proker_bidang SET foto_url = NULL, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(&id)
            .execute(pool.get_ref())
            .await
    {
        log::error!("Gagal menghapus foto_url proker bidang {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    utils::hapus_file_jika_ada(&foto).await;

    respons::sukses(serde_json::json!({ "id": id }))
}
