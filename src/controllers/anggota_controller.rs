// src/controllers/anggota_controller.rs
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt as _;
use serde::Deserialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use crate::auth;
use crate::controllers::organisasi_controller::{
    ambil_anggota_detail, ambil_semua_anggota, ambil_semua_bidang, ambil_semua_divisi,
};
use crate::models::anggota::AnggotaDetail;
use crate::respons;
use crate::utils::{
    self, opsi_ganda, GalatUnggah, DIR_FOTO_ANGGOTA, MAKS_FOTO_ANGGOTA,
};

async fn ambil_foto_url(pool: &MySqlPool, id: &str) -> Result<Option<Option<String>>, sqlx::Error> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT foto_url FROM anggota WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(foto,)| foto))
}

#[get("/api/adminpanel/anggota")]
pub async fn get_semua_anggota_admin(pool: web::Data<MySqlPool>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

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

#[derive(Debug, Deserialize)]
pub struct BuatAnggota {
    pub nama: String,
    pub jabatan: String,
    pub angkatan: i32,
    pub divisi_id: Option<String>,
    pub email: Option<String>,
    pub telepon: Option<String>,
    pub bio: Option<String>,
    pub urutan: Option<i32>,
}

#[post("/api/adminpanel/anggota")]
pub async fn create_anggota(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    data: web::Json<BuatAnggota>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let nama = data.nama.trim();
    if nama.is_empty() {
        return respons::gagal_validasi("Nama anggota wajib diisi");
    }
    if data.jabatan.trim().is_empty() {
        return respons::gagal_validasi("Jabatan wajib diisi");
    }

    let id = Uuid::new_v4().to_string();
    let kini = Utc::now();
    if let Err(e) = sqlx::query(
        "INSERT INTO anggota
            (id, nama, jabatan, angkatan, divisi_id, email, telepon, bio, urutan,
             created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(nama)
    .bind(data.jabatan.trim())
    .bind(data.angkatan)
    .bind(&data.divisi_id)
    .bind(&data.email)
    .bind(&data.telepon)
    .bind(&data.bio)
    .bind(data.urutan.unwrap_or(0))
    .bind(kini)
    .bind(kini)
    .execute(pool.get_ref())
    .await
    {
        log::error!("Gagal menyimpan anggota: {:?}", e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_anggota_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::dibuat(detail),
        Ok(None) => respons::tidak_ditemukan("Anggota tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UbahAnggota {
    pub nama: Option<String>,
    pub jabatan: Option<String>,
    pub angkatan: Option<i32>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub divisi_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub telepon: Option<Option<String>>,
    #[serde(default, deserialize_with = "opsi_ganda")]
    pub bio: Option<Option<String>>,
    pub urutan: Option<i32>,
}

#[put("/api/adminpanel/anggota/{id}")]
pub async fn update_anggota(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UbahAnggota>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();
    let data = data.into_inner();

    let mut qb: QueryBuilder<MySql> = QueryBuilder::new("UPDATE anggota SET ");
    let mut first = true;
    let mut has_any = false;

    if let Some(v) = &data.nama {
        let v = v.trim();
        if v.is_empty() {
            return respons::gagal_validasi("Nama anggota tidak boleh kosong");
        }
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("nama = ").push_bind(v.to_string());
    }
    if let Some(v) = &data.jabatan {
        let v = v.trim();
        if v.is_empty() {
            return respons::gagal_validasi("Jabatan tidak boleh kosong");
        }
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("jabatan = ").push_bind(v.to_string());
    }
    if let Some(v) = data.angkatan {
        if !first {
            qb.push(", ");
        }
        first = false;
        has_any = true;
        qb.push("angkatan = ").push_bind(v);
    }
    // divisi_id null berarti memindahkan anggota ke pengurus inti
    for (kolom, nilai) in [
        ("divisi_id", &data.divisi_id),
        ("email", &data.email),
        ("telepon", &data.telepon),
        ("bio", &data.bio),
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
        log::error!("Gagal mengupdate anggota {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    match ambil_anggota_detail(pool.get_ref(), &id).await {
        Ok(Some(detail)) => respons::sukses(detail),
        Ok(None) => respons::tidak_ditemukan("Anggota tidak ditemukan"),
        Err(e) => respons::gagal_server(e.to_string()),
    }
}

#[delete("/api/adminpanel/anggota/{id}")]
pub async fn delete_anggota(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let id = path.into_inner();

    // ambil path foto sebelum row hilang
    let foto_lama = match ambil_foto_url(pool.get_ref(), &id).await {
        Ok(Some(foto)) => foto,
        Ok(None) => return respons::tidak_ditemukan("Anggota tidak ditemukan"),
        Err(e) => {
            log::error!("Gagal mengambil anggota {}: {:?}", id, e);
            return respons::gagal_server(e.to_string());
        }
    };

    let result = match sqlx::query("DELETE FROM anggota WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Gagal menghapus anggota {}: {:?}", id, e);
            return respons::gagal_server(e.to_string());
        }
    };

    if result.rows_affected() == 0 {
        return respons::tidak_ditemukan("Anggota tidak ditemukan");
    }

    if let Some(foto) = foto_lama {
        utils::hapus_file_jika_ada(&foto).await;
    }

    respons::sukses(serde_json::json!({ "id": id }))
}

#[post("/api/adminpanel/anggota/{id}/foto")]
pub async fn upload_foto_anggota(
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
        Ok(None) => return respons::tidak_ditemukan("Anggota tidak ditemukan"),
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
            match utils::simpan_foto(field, DIR_FOTO_ANGGOTA, &id, MAKS_FOTO_ANGGOTA).await {
                Ok(p) => foto_baru = Some(p),
                Err(GalatUnggah::Validasi(pesan)) => return respons::gagal_validasi(pesan),
                Err(GalatUnggah::Penyimpanan(pesan)) => {
                    log::error!("Gagal menyimpan foto anggota {}: {}", id, pesan);
                    return respons::gagal_server(pesan);
                }
            }
        }
    }

    let Some(foto_baru) = foto_baru else {
        return respons::gagal_validasi("Field foto wajib diisi");
    };

    if let Err(e) = sqlx::query("UPDATE anggota SET foto_url = ?, updated_at = ? WHERE id = ?")
        .bind(&foto_baru)
        .bind(Utc::now())
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        log::error!("Gagal menyimpan foto_url anggota {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    // file lama dihapus setelah referensi baru tersimpan; kegagalan
    // penghapusan hanya meninggalkan file yatim
    if let Some(lama) = foto_lama {
        if lama != foto_baru {
            utils::hapus_file_jika_ada(&lama).await;
        }
    }

    respons::sukses(serde_json::json!({ "foto_url": foto_baru }))
}

#[delete("/api/adminpanel/anggota/{id}/foto")]
pub async fn delete_foto_anggota(
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
        Ok(None) => return respons::tidak_ditemukan("Anggota tidak ditemukan"),
        Err(e) => return respons::gagal_server(e.to_string()),
    };

    let Some(foto) = foto_lama else {
        return respons::gagal_validasi("Tidak ada foto untuk dihapus");
    };

    if let Err(e) = sqlx::query("UPDATE anggota SET foto_url = NULL, updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        log::error!("Gagal menghapus foto_url anggota {}: {:?}", id, e);
        return respons::gagal_server(e.to_string());
    }

    utils::hapus_file_jika_ada(&foto).await;

    respons::sukses(serde_json::json!({ "id": id }))
}
