use crate::auth::{authenticate, hash_password, LoginIdentity};
use crate::session::{session_id, with_session, without_session};
use crate::{error::AppError, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::CookieJar;
use core_types::filter::empty_as_none;
use core_types::{NewProperty, NewUser, Property, PropertyFilter, User};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

/// The public part of a user, as returned by the auth routes.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// # POST /users
/// Creates an account and logs it in.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".to_string()));
    }
    if state.users.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::BadRequest("email is already registered".to_string()));
    }

    let password = hash_password(&state.hasher, request.password).await?;
    let user = state
        .users
        .insert(&NewUser {
            name: request.name,
            email: request.email,
            password,
        })
        .await?;
    tracing::info!(user_id = user.id, "User registered.");

    let session = state.sessions.create(user.id).await;
    Ok((
        with_session(jar, session),
        Json(json!({ "user": UserSummary::from(&user) })),
    ))
}

/// # POST /users/login
/// Accepts an email or a name plus a password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let identity = LoginIdentity::from_parts(request.email, request.name)
        .ok_or_else(|| AppError::BadRequest("email or name is required".to_string()))?;

    let user = authenticate(state.users.as_ref(), &state.hasher, &identity, request.password)
        .await?
        .ok_or_else(|| {
            tracing::warn!(?identity, "Login rejected.");
            AppError::Unauthorized("invalid credentials".to_string())
        })?;

    // A session the caller already held is replaced, not kept alongside.
    if let Some(previous) = session_id(&jar) {
        state.sessions.destroy(&previous).await;
    }
    let session = state.sessions.create(user.id).await;
    Ok((
        with_session(jar, session),
        Json(json!({ "user": UserSummary::from(&user) })),
    ))
}

/// # POST /users/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    if let Some(session) = session_id(&jar) {
        state.sessions.destroy(&session).await;
    }
    (without_session(jar), Json(json!({})))
}

/// # GET /users/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Value>, AppError> {
    let Some(user_id) = current_user_id(&state, &jar).await else {
        return Ok(Json(json!({ "message": "not logged in" })));
    };
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("no user with that id".to_string()))?;
    Ok(Json(json!({ "user": UserSummary::from(&user) })))
}

/// # GET /api/properties
/// Searches listings. Every query parameter is optional.
pub async fn search_properties(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PropertyFilter>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let limit = resolve_limit(pagination.limit, state.search.default_limit)?;
    let properties = state.listings.search(&filter, limit).await?;
    Ok(Json(json!({ "properties": properties })))
}

/// # POST /api/properties
/// Lists a property owned by the logged-in user.
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(mut property): Json<NewProperty>,
) -> Result<Json<Property>, AppError> {
    property.owner_id = require_user_id(&state, &jar).await?;
    let property = state.listings.insert_property(&property).await?;
    Ok(Json(property))
}

/// # GET /api/reservations
/// Past reservations of the logged-in user.
pub async fn get_reservations(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let guest_id = require_user_id(&state, &jar).await?;
    let limit = resolve_limit(pagination.limit, state.search.default_limit)?;
    let reservations = state.listings.past_reservations(guest_id, limit).await?;
    Ok(Json(json!({ "reservations": reservations })))
}

async fn current_user_id(state: &AppState, jar: &CookieJar) -> Option<i32> {
    let session = session_id(jar)?;
    state.sessions.user_id(&session).await
}

async fn require_user_id(state: &AppState, jar: &CookieJar) -> Result<i32, AppError> {
    current_user_id(state, jar)
        .await
        .ok_or_else(|| AppError::Unauthorized("not logged in".to_string()))
}

fn resolve_limit(requested: Option<i64>, default: i64) -> Result<i64, AppError> {
    match requested {
        None => Ok(default),
        Some(limit) if limit > 0 => Ok(limit),
        Some(limit) => Err(AppError::BadRequest(format!(
            "limit must be positive, got {limit}"
        ))),
    }
}
