//! Password login (JWT + refresh) and the request extractors that resolve
//! the caller. `JwtAuth` is the single place a session is read; `AdminAuth`
//! additionally enforces the admin role.

use actix_web::{get, post, web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use redis::{AsyncCommands, Client as RedisClient};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::settings;
use crate::db::models::{Player, Role};
use crate::http::error::ApiError;
use crate::state::AppState;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    pub pid: String, // player id
    pub role: String,
    pub exp: usize,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub role: Role,
}

/// Sign an access token for `player`, valid for `ttl_minutes`.
pub fn issue_access_token(
    secret: &str,
    account_id: Uuid,
    player: &Player,
    ttl_minutes: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp() as usize;
    let claims = Claims {
        sub: account_id.to_string(),
        pid: player.id.to_string(),
        role: player.role.clone(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_access_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

//////////////////////////////////////////////////
// ─────────────  Extractors  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use super::decode_access_token;
    use crate::config::settings;
    use crate::db::models::Role;
    use actix_web::{
        dev::Payload,
        error::{ErrorForbidden, ErrorUnauthorized},
        FromRequest, HttpRequest, Result as ActixResult,
    };
    use futures_util::future::{ready, Ready};
    use uuid::Uuid;

    /// Validated Bearer-JWT of the calling member.
    #[derive(Debug, Clone)]
    pub struct JwtAuth {
        pub account_id: Uuid,
        pub player_id: Uuid,
        pub role: Role,
    }

    fn authenticate(req: &HttpRequest) -> ActixResult<JwtAuth> {
        // Expect:  Authorization: Bearer <JWT>
        let hdr = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ErrorUnauthorized("missing Authorization header"))?;

        let token = hdr
            .strip_prefix("Bearer ")
            .ok_or_else(|| ErrorUnauthorized("malformed Authorization header"))?;

        let secret = &settings().jwt_secret;
        if secret.is_empty() {
            return Err(ErrorUnauthorized("server mis-config"));
        }
        let claims = decode_access_token(secret, token)
            .map_err(|_| ErrorUnauthorized("invalid / expired token"))?;

        let account_id =
            Uuid::parse_str(&claims.sub).map_err(|_| ErrorUnauthorized("bad sub"))?;
        let player_id = Uuid::parse_str(&claims.pid).map_err(|_| ErrorUnauthorized("bad pid"))?;

        Ok(JwtAuth {
            account_id,
            player_id,
            role: Role::parse(&claims.role),
        })
    }

    impl FromRequest for JwtAuth {
        type Error = actix_web::Error;
        type Future = Ready<ActixResult<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            ready(authenticate(req))
        }
    }

    /// A `JwtAuth` whose role is admin; everyone else gets 403.
    #[derive(Debug, Clone)]
    pub struct AdminAuth(pub JwtAuth);

    impl FromRequest for AdminAuth {
        type Error = actix_web::Error;
        type Future = Ready<ActixResult<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            ready(authenticate(req).and_then(|auth| {
                if auth.role == Role::Admin {
                    Ok(AdminAuth(auth))
                } else {
                    Err(ErrorForbidden("admin role required"))
                }
            }))
        }
    }
}
pub use extractor::{AdminAuth, JwtAuth};

fn refresh_key(token: &str) -> String {
    format!("refresh:{token}")
}

/// Remember `token` → `email` for `ttl_secs`.
pub async fn store_refresh_token(
    redis: &RedisClient,
    token: &str,
    email: &str,
    ttl_secs: u64,
) -> redis::RedisResult<()> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set_ex(refresh_key(token), email, ttl_secs).await
}

/// Read and delete `token` in one GETDEL, so a token is redeemed at most once.
pub async fn consume_refresh_token(
    redis: &RedisClient,
    token: &str,
) -> redis::RedisResult<Option<String>> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.get_del(refresh_key(token)).await
}

/// Access + fresh refresh token for `player`; the refresh token maps to the
/// member's email in Redis.
async fn issue_tokens(
    redis: &RedisClient,
    account_id: Uuid,
    player: &Player,
) -> Result<TokenResponse, ApiError> {
    let cfg = settings();
    if cfg.jwt_secret.is_empty() {
        return Err(ApiError::Internal(anyhow::anyhow!("JWT_SECRET is not set")));
    }
    let access_token = issue_access_token(&cfg.jwt_secret, account_id, player, cfg.access_ttl_minutes)
        .map_err(|e| ApiError::Internal(e.into()))?;

    let refresh_token = Uuid::new_v4().to_string();
    store_refresh_token(redis, &refresh_token, &player.email, cfg.refresh_ttl)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        expires_in: cfg.access_ttl_minutes * 60,
        role: player.role(),
    })
}

//////////////////////////////////////////////////
// POST /api/login
//////////////////////////////////////////////////
#[post("/login")]
pub async fn login(
    info: web::Json<LoginRequest>,
    state: web::Data<AppState>,
    redis: web::Data<RedisClient>,
) -> Result<HttpResponse, ApiError> {
    let account_id = state
        .backend
        .verify_credentials(&info.email, &info.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid email or password".into()))?;

    // Email joins the identity account to the profile row.
    let player = state
        .backend
        .find_player_by_email(&info.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("no player profile for this account".into()))?;

    let tokens = issue_tokens(&redis, account_id, &player).await?;
    log::info!("login: {} ({})", player.email, player.role);
    Ok(HttpResponse::Ok().json(tokens))
}

//////////////////////////////////////////////////
// POST /api/refresh
//////////////////////////////////////////////////
#[post("/refresh")]
pub async fn refresh(
    info: web::Json<RefreshRequest>,
    state: web::Data<AppState>,
    redis: web::Data<RedisClient>,
) -> Result<HttpResponse, ApiError> {
    // 1) consume old refresh → email
    let email = consume_refresh_token(&redis, &info.refresh_token)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .ok_or_else(|| ApiError::Unauthorized("invalid refresh".into()))?;

    // 2) reload profile so role changes take effect
    let player = state
        .backend
        .find_player_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("profile no longer exists".into()))?;
    let account_id = player
        .auth_id
        .ok_or_else(|| ApiError::Unauthorized("profile has no account".into()))?;

    Ok(HttpResponse::Ok().json(issue_tokens(&redis, account_id, &player).await?))
}

//////////////////////////////////////////////////
// POST /api/logout
//////////////////////////////////////////////////
#[post("/logout")]
pub async fn logout(
    info: web::Json<RefreshRequest>,
    redis: web::Data<RedisClient>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    let _: () = conn
        .del(refresh_key(&info.refresh_token))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    Ok(HttpResponse::Ok().body("logged out"))
}

//////////////////////////////////////////////////
// GET /api/me
//////////////////////////////////////////////////
#[get("/me")]
pub async fn me(auth: JwtAuth, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let player = state
        .backend
        .get_player(auth.player_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("profile not found".into()))?;
    Ok(HttpResponse::Ok().json(player))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(refresh)
        .service(logout)
        .service(me);
}
