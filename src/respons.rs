// src/respons.rs
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Amplop seragam untuk semua handler: `{success, data}` atau
/// `{success, error}`. Pemanggil tidak pernah menerima error mentah dari
/// framework untuk kegagalan domain.
#[derive(Debug, Serialize)]
pub struct Sampul<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn sukses<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Sampul {
        success: true,
        data: Some(data),
        error: None,
    })
}

pub fn dibuat<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Sampul {
        success: true,
        data: Some(data),
        error: None,
    })
}

pub fn gagal(status: StatusCode, pesan: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(Sampul::<()> {
        success: false,
        data: None,
        error: Some(pesan.into()),
    })
}

pub fn gagal_validasi(pesan: impl Into<String>) -> HttpResponse {
    gagal(StatusCode::BAD_REQUEST, pesan)
}

pub fn tidak_ditemukan(pesan: impl Into<String>) -> HttpResponse {
    gagal(StatusCode::NOT_FOUND, pesan)
}

pub fn gagal_server(pesan: impl Into<String>) -> HttpResponse {
    gagal(StatusCode::INTERNAL_SERVER_ERROR, pesan)
}
