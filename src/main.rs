// main.rs
use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::JsonConfig;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

mod auth;
mod controllers;
mod db;
mod jabatan;
mod models;
mod respons;
mod statistik;
mod struktur;
mod utils;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");
    let pool = match db::establish_connection().await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Gagal inisialisasi pool database: {:?}", e);
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        let json_config = JsonConfig::default()
            .limit(2 * 1024 * 1024) // 2MB untuk JSON
            .error_handler(|err, _req| {
                log::error!("JSON payload error: {}", err);
                actix_web::error::ErrorBadRequest(format!("Payload error: {}", err))
            });

        // Untuk multipart foto (batas per-file dicek di handler)
        let payload_config = web::PayloadConfig::new(6 * 1024 * 1024).limit(6 * 1024 * 1024);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(json_config)
            .app_data(payload_config)
            .wrap(cors)
            .wrap(Logger::default())
            .service(Files::new("/uploads", "./uploads"))
            //auth
            .service(controllers::auth_controller::login)
            .service(controllers::auth_controller::logout)
            .service(controllers::auth_controller::get_current_user)
            //organisasi (publik)
            .service(controllers::organisasi_controller::get_struktur)
            .service(controllers::organisasi_controller::get_pengurus_inti)
            .service(controllers::organisasi_controller::get_semua_anggota)
            .service(controllers::organisasi_controller::get_anggota_by_id)
            .service(controllers::organisasi_controller::get_anggota_by_divisi)
            //proker divisi (publik)
            .service(controllers::proker_divisi_controller::get_filter_opsi_proker_divisi)
            .service(controllers::proker_divisi_controller::get_semua_proker_divisi)
            .service(controllers::proker_divisi_controller::get_proker_divisi_by_id)
            //proker bidang (publik)
            .service(controllers::proker_bidang_controller::get_semua_proker_bidang)
            .service(controllers::proker_bidang_controller::get_proker_bidang_by_id)
            //bidang
            .service(controllers::bidang_controller::get_semua_bidang)
            .service(controllers::bidang_controller::create_bidang)
            .service(controllers::bidang_controller::update_bidang)
            .service(controllers::bidang_controller::delete_bidang)
            //divisi
            .service(controllers::divisi_controller::get_semua_divisi)
            .service(controllers::divisi_controller::create_divisi)
            .service(controllers::divisi_controller::update_divisi)
            .service(controllers::divisi_controller::delete_divisi)
            //anggota
            .service(controllers::anggota_controller::get_semua_anggota_admin)
            .service(controllers::anggota_controller::create_anggota)
            .service(controllers::anggota_controller::update_anggota)
            .service(controllers::anggota_controller::delete_anggota)
            .service(controllers::anggota_controller::upload_foto_anggota)
            .service(controllers::anggota_controller::delete_foto_anggota)
            //proker divisi (admin)
            .service(controllers::proker_divisi_controller::get_semua_proker_divisi_admin)
            .service(controllers::proker_divisi_controller::get_statistik_proker_divisi)
            .service(controllers::proker_divisi_controller::create_proker_divisi)
            .service(controllers::proker_divisi_controller::update_proker_divisi)
            .service(controllers::proker_divisi_controller::delete_proker_divisi)
            .service(controllers::proker_divisi_controller::upload_foto_proker_divisi)
            .service(controllers::proker_divisi_controller::delete_foto_proker_divisi)
            //proker bidang (admin)
            .service(controllers::proker_bidang_controller::get_semua_proker_bidang_admin)
            .service(controllers::proker_bidang_controller::get_statistik_proker_bidang)
            .service(controllers::proker_bidang_controller::create_proker_bidang)
            .service(controllers::proker_bidang_controller::update_proker_bidang)
            .service(controllers::proker_bidang_controller::delete_proker_bidang)
            .service(controllers::proker_bidang_controller::upload_foto_proker_bidang)
            .service(controllers::proker_bidang_controller::delete_foto_proker_bidang)
            //dashboard
            .service(controllers::dashboard_controller::get_statistik_dasbor)
    })
    .bind(("127.0.0.1", 8000))?
    .run()
    .await
}
