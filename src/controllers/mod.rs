pub mod anggota_controller;
pub mod auth_controller;
pub mod bidang_controller;
pub mod dashboard_controller;
pub mod divisi_controller;
pub mod organisasi_controller;
pub mod proker_bidang_controller;
pub mod proker_divisi_controller;
