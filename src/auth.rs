use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::respons;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
    pub user_id: String,
    pub nama_user: String,
}

pub fn generate_jwt(user: &User) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        role: user.role.clone(),
        user_id: user.id.clone(),
        nama_user: user.name.clone(),
        exp: (now + chrono::Duration::days(2)).timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_jwt(req: &HttpRequest) -> Result<Claims, actix_web::Error> {
    let token = req
        .cookie("access_token")
        .ok_or_else(|| {
            log::error!("No access_token cookie found in request to {}", req.path());
            actix_web::error::ErrorUnauthorized("Token tidak ditemukan")
        })?
        .value()
        .to_string();

    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        log::error!("JWT verification failed: {:?}", e);
        actix_web::error::ErrorUnauthorized(format!("Invalid or expired token: {}", e))
    })?;

    Ok(token_data.claims)
}

/// Verifikasi token lalu cek role admin; dipakai setiap handler adminpanel.
/// Kegagalan langsung berupa respons amplop 401/403.
pub fn jaga_admin(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    let claims =
        verify_jwt(req).map_err(|e| respons::gagal(StatusCode::UNAUTHORIZED, e.to_string()))?;
    if !["Superadmin", "Administrator"].contains(&claims.role.as_str()) {
        return Err(respons::gagal(
            StatusCode::FORBIDDEN,
            "Hanya Superadmin atau Administrator yang dapat mengakses",
        ));
    }
    Ok(claims)
}
