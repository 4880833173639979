//auth_controller.rs
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{get, http::StatusCode, post, web, HttpRequest, HttpResponse};
use bcrypt::verify;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth;
use crate::models::user::User;
use crate::respons;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[post("/api/auth/login")]
pub async fn login(pool: web::Data<MySqlPool>, payload: web::Json<LoginPayload>) -> HttpResponse {
    let email = payload.email.trim();
    let password = payload.password.trim();

    if email.is_empty() || password.is_empty() {
        return respons::gagal_validasi("Email atau password kosong");
    }

    let user = match sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, role, created_at, updated_at
         FROM users WHERE email = ? LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(u)) => u,
        Ok(None) => return respons::gagal(StatusCode::UNAUTHORIZED, "Email tidak terdaftar"),
        Err(e) => {
            log::error!("DB error get user: {:?}", e);
            return respons::gagal_server(e.to_string());
        }
    };

    let ok = match verify(password, &user.password) {
        Ok(v) => v,
        Err(e) => {
            log::error!("bcrypt verify: {:?}", e);
            return respons::gagal_server("Verify error");
        }
    };
    if !ok {
        return respons::gagal(StatusCode::UNAUTHORIZED, "Kredensial tidak valid");
    }

    let token = match auth::generate_jwt(&user) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Gagal menghasilkan JWT: {:?}", e);
            return respons::gagal_server("Gagal menghasilkan token");
        }
    };

    let access_cookie = Cookie::build("access_token", token)
        .path("/")
        .http_only(true)
        .secure(false) // false untuk development (HTTP)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(2))
        .finish();

    HttpResponse::Ok().cookie(access_cookie).json(json!({
        "success": true,
        "data": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role
        }
    }))
}

#[post("/api/auth/logout")]
pub async fn logout() -> HttpResponse {
    let access_cookie = Cookie::build("access_token", "")
        .path("/")
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0))
        .finish();

    HttpResponse::Ok().cookie(access_cookie).json(json!({
        "success": true,
        "data": { "message": "Berhasil logout" }
    }))
}

#[get("/api/auth/me")]
pub async fn get_current_user(pool: web::Data<MySqlPool>, req: HttpRequest) -> HttpResponse {
    let claims = match auth::verify_jwt(&req) {
        Ok(c) => c,
        Err(e) => return respons::gagal(StatusCode::UNAUTHORIZED, e.to_string()),
    };

    match sqlx::query_as::<_, User>(
        "SELECT id, name, email, password, role, created_at, updated_at
         FROM users WHERE id = ? LIMIT 1",
    )
    .bind(&claims.user_id)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(user)) => respons::sukses(json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role
        })),
        Ok(None) => respons::tidak_ditemukan("User tidak ditemukan"),
        Err(e) => {
            log::error!("DB error get current user: {:?}", e);
            respons::gagal_server(e.to_string())
        }
    }
}
