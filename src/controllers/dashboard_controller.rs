// src/controllers/dashboard_controller.rs
use actix_web::{get, web, HttpRequest, HttpResponse};
use sqlx::MySqlPool;

use crate::auth;
use crate::controllers::organisasi_controller::{
    ambil_semua_anggota, ambil_semua_bidang, ambil_semua_divisi,
};
use crate::respons;
use crate::statistik;
use crate::struktur::susun_struktur;

/// Penghitung dasbor admin. Kegagalan salah satu fetch menggagalkan seluruh
/// respons; statistik parsial tidak pernah dikembalikan.
#[get("/api/adminpanel/statistik")]
pub async fn get_statistik_dasbor(pool: web::Data<MySqlPool>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = auth::jaga_admin(&req) {
        return resp;
    }

    let bidang_list = match ambil_semua_bidang(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil bidang untuk statistik: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let divisi_list = match ambil_semua_divisi(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil divisi untuk statistik: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let anggota_list = match ambil_semua_anggota(pool.get_ref()).await {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal mengambil anggota untuk statistik: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };

    let total_proker_divisi = match sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM proker_divisi",
    )
    .fetch_one(pool.get_ref())
    .await
    {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal menghitung proker divisi: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };
    let total_proker_bidang = match sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM proker_bidang",
    )
    .fetch_one(pool.get_ref())
    .await
    {
        Ok(v) => v,
        Err(e) => {
            log::error!("Gagal menghitung proker bidang: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };

    let struktur = susun_struktur(bidang_list, divisi_list, anggota_list.clone());
    let stat = statistik::statistik_dasbor(
        &struktur,
        &anggota_list,
        total_proker_divisi as usize,
        total_proker_bidang as usize,
    );

    respons::sukses(stat)
}
