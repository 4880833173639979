pub mod anggota;
pub mod bidang;
pub mod divisi;
pub mod proker;
pub mod user;
