use axum::{
    extract::{FromRef, Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::Key;
use axum_extra::extract::SignedCookieJar;
use shared::{AddPetResponse, AuthResponse, CredentialsForm, ErrorResponse};
use std::collections::HashMap;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db;
use crate::domain::{AnimalService, AuthError, CredentialService};
use crate::normalize;
use crate::session;
use crate::views;

/// Application state passed by handle into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub animals: AnimalService,
    pub credentials: CredentialService,
    pub session_key: Key,
}

impl AppState {
    pub fn new(animals: AnimalService, credentials: CredentialService, session_key: Key) -> Self {
        Self {
            animals,
            credentials,
            session_key,
        }
    }
}

// The signed cookie jar extractor pulls its key out of the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.session_key.clone()
    }
}

/// Build the full route surface.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/add", get(add_page).post(add_submit))
        .route("/add_pet", post(add_pet))
        .route("/delete", get(delete_page))
        .route("/delete/:id", post(delete_submit))
        .route("/details/:id", get(details))
        .route("/edit/:id", get(edit_page))
        .route("/update/:id", post(update_submit))
        .route("/login", get(login_page).post(login_submit))
        .route("/register", get(register_page).post(register_submit))
        .route("/logout", get(logout_get).post(logout_post))
        .route("/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn internal_error(context: &str, err: anyhow::Error) -> Response {
    tracing::error!("{}: {:?}", context, err);
    (StatusCode::INTERNAL_SERVER_ERROR, context.to_string()).into_response()
}

/// GET /
async fn home(State(state): State<AppState>) -> Response {
    info!("GET /");
    match state.animals.list().await {
        Ok(animals) => Html(views::home_page(&animals)).into_response(),
        Err(e) => internal_error("Error listing animals", e),
    }
}

/// GET /add - auth-gated form page
async fn add_page(jar: SignedCookieJar, headers: HeaderMap) -> Response {
    info!("GET /add");
    if session::current_user(&jar).is_none() {
        return session::denied(&headers);
    }
    Html(views::add_page()).into_response()
}

/// POST /add - auth-gated form submission
async fn add_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    info!("POST /add");
    if session::current_user(&jar).is_none() {
        return session::denied(&headers);
    }

    let animal = match normalize::from_form(&fields) {
        Ok(animal) => animal,
        // Missing name sends the form back to itself
        Err(_) => return Redirect::to("/add").into_response(),
    };

    match state.animals.add(&animal).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => internal_error("Error adding animal", e),
    }
}

/// POST /add_pet - auth-gated JSON submission
async fn add_pet(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    info!("POST /add_pet");
    if session::current_user(&jar).is_none() {
        return session::denied_json();
    }

    let animal = match normalize::from_json(&payload) {
        Ok(animal) => animal,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    match state.animals.add(&animal).await {
        Ok(id) => (StatusCode::CREATED, Json(AddPetResponse { id })).into_response(),
        Err(e) => internal_error("Error adding pet", e),
    }
}

/// GET /delete - auth-gated list with delete controls
async fn delete_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
) -> Response {
    info!("GET /delete");
    if session::current_user(&jar).is_none() {
        return session::denied(&headers);
    }

    match state.animals.list().await {
        Ok(animals) => Html(views::delete_page(&animals)).into_response(),
        Err(e) => internal_error("Error listing animals", e),
    }
}

/// POST /delete/:id - auth-gated removal
async fn delete_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    info!("POST /delete/{}", id);
    if session::current_user(&jar).is_none() {
        return session::denied(&headers);
    }

    if !db::valid_id(&id) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match state.animals.remove(&id).await {
        // Absence is not an error; the record is gone either way
        Ok(_) => {
            if session::accepts_json(&headers) {
                Json(AuthResponse::ok()).into_response()
            } else {
                Redirect::to("/").into_response()
            }
        }
        Err(e) => internal_error("Error deleting animal", e),
    }
}

/// GET /details/:id
async fn details(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /details/{}", id);
    match state.animals.get(&id).await {
        Ok(Some(animal)) => Html(views::details_page(&animal)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => internal_error("Error loading animal", e),
    }
}

/// GET /edit/:id
async fn edit_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("GET /edit/{}", id);
    match state.animals.get(&id).await {
        Ok(Some(animal)) => Html(views::edit_page(&animal)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => internal_error("Error loading animal", e),
    }
}

/// POST /update/:id - full replacement of the stored record's fields
async fn update_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    info!("POST /update/{}", id);
    if !db::valid_id(&id) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let animal = match normalize::from_form(&fields) {
        Ok(animal) => animal,
        // Missing name sends the form back to the edit page
        Err(_) => return Redirect::to(&format!("/edit/{id}")).into_response(),
    };

    match state.animals.replace(&id, &animal).await {
        Ok(()) => Redirect::to(&format!("/details/{id}")).into_response(),
        Err(e) => internal_error("Error updating animal", e),
    }
}

/// GET /login
async fn login_page() -> Html<String> {
    Html(views::login_page())
}

/// POST /login
async fn login_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    info!("POST /login - username: {}", form.username);
    if form.username.trim().is_empty() || form.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failure("Username and password are required")),
        )
            .into_response();
    }

    match state.credentials.login(&form.username, &form.password).await {
        Ok(user) => {
            let jar = session::establish(jar, &user);
            (jar, Json(AuthResponse::ok())).into_response()
        }
        Err(AuthError::BadCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::failure(AuthError::BadCredentials.to_string())),
        )
            .into_response(),
        Err(AuthError::Internal(e)) => internal_error("Error logging in", e),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /register
async fn register_page() -> Html<String> {
    Html(views::register_page())
}

/// POST /register
async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    info!("POST /register - username: {}", form.username);
    match state
        .credentials
        .register(&form.username, &form.password)
        .await
    {
        Ok(id) => Json(AuthResponse::created(id)).into_response(),
        Err(e @ AuthError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failure(e.to_string())),
        )
            .into_response(),
        Err(e @ AuthError::Conflict) => (
            StatusCode::CONFLICT,
            Json(AuthResponse::failure(e.to_string())),
        )
            .into_response(),
        Err(AuthError::Internal(e)) => internal_error("Error registering user", e),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failure(e.to_string())),
        )
            .into_response(),
    }
}

/// GET /logout - clears the session unconditionally
async fn logout_get(jar: SignedCookieJar) -> Response {
    info!("GET /logout");
    (session::clear(jar), Redirect::to("/")).into_response()
}

/// POST /logout
async fn logout_post(jar: SignedCookieJar) -> Response {
    info!("POST /logout");
    (session::clear(jar), Json(AuthResponse::ok())).into_response()
}

/// GET /search - stub page
async fn search() -> Html<String> {
    Html(views::search_page())
}
