use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::{
    AppState, catalog,
    error::AppResult,
    models::{
        FeedbackDeleteRequest, FeedbackRequest, LoginRequest, MovieDeleteRequest, MovieDetails,
        MovieUpdateRequest, RegisterRequest,
    },
    templates,
};

pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Html<String> {
    let session = state.sessions.current(&jar).await;
    Html(templates::index_page(session.user_email.is_some()))
}

pub async fn about() -> Html<String> {
    Html(templates::about_page())
}

pub async fn contact() -> Html<String> {
    Html(templates::contact_page())
}

pub async fn register_form() -> Html<String> {
    Html(templates::register_page())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(req): Form<RegisterRequest>,
) -> AppResult<Redirect> {
    catalog::register(&*state.store, &*state.notifier, req).await?;
    Ok(Redirect::to("/login"))
}

pub async fn login_form() -> Html<String> {
    Html(templates::login_page())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> AppResult<(CookieJar, Redirect)> {
    let user = catalog::login(&*state.store, &*state.notifier, req).await?;
    let jar = state.sessions.update(jar, |s| s.user_email = Some(user.email)).await;
    Ok((jar, Redirect::to("/user/dashboard")))
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    (state.sessions.clear(jar).await, Redirect::to("/"))
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(movie_id): Path<String>,
) -> AppResult<Response> {
    let Some(email) = state.sessions.current(&jar).await.user_email else {
        let body = json!({ "success": false, "message": "Not logged in" });
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    };

    match catalog::toggle_favorite(&*state.store, &email, &movie_id).await? {
        Some(toggle) => Ok(Json(toggle).into_response()),
        None => {
            let body = json!({ "success": false, "message": "User not found" });
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        },
    }
}

pub async fn user_dashboard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(email) = state.sessions.current(&jar).await.user_email else {
        return Ok(Redirect::to("/login").into_response());
    };

    match catalog::user_dashboard(&*state.store, &email).await? {
        Some(dash) => Ok(Html(templates::user_dashboard(&dash)).into_response()),
        None => Ok(Redirect::to("/logout").into_response()),
    }
}

pub async fn add_feedback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<FeedbackRequest>,
) -> AppResult<Redirect> {
    let Some(email) = state.sessions.current(&jar).await.user_email else {
        return Ok(Redirect::to("/login"));
    };

    catalog::submit_feedback(&*state.store, &*state.notifier, &email, req).await?;
    Ok(Redirect::to("/user/dashboard"))
}

pub async fn admin_login_form() -> Html<String> {
    Html(templates::admin_login_page())
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> AppResult<(CookieJar, Redirect)> {
    catalog::admin_login(
        &*state.notifier,
        &state.config.admin_email,
        &state.config.admin_password,
        req,
    )
    .await?;
    let jar = state.sessions.update(jar, |s| s.admin = true).await;
    Ok((jar, Redirect::to("/admin/dashboard")))
}

pub async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<Response> {
    if !is_admin(&state, &jar).await {
        return Ok(Redirect::to("/admin/login").into_response());
    }
    let rows = catalog::admin_dashboard(&*state.store).await?;
    Ok(Html(templates::admin_dashboard(&rows)).into_response())
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(details): Form<MovieDetails>,
) -> AppResult<Redirect> {
    if !is_admin(&state, &jar).await {
        return Ok(Redirect::to("/admin/login"));
    }
    catalog::add_movie(&*state.store, &*state.notifier, details).await?;
    Ok(Redirect::to("/admin/dashboard"))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<MovieUpdateRequest>,
) -> AppResult<Redirect> {
    if !is_admin(&state, &jar).await {
        return Ok(Redirect::to("/admin/login"));
    }
    catalog::update_movie(&*state.store, &req.movie_id, req.details).await?;
    Ok(Redirect::to("/admin/dashboard"))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<MovieDeleteRequest>,
) -> AppResult<Redirect> {
    if !is_admin(&state, &jar).await {
        return Ok(Redirect::to("/admin/login"));
    }
    catalog::delete_movie(&*state.store, &*state.notifier, &req.movie_id).await?;
    Ok(Redirect::to("/admin/dashboard"))
}

pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<FeedbackDeleteRequest>,
) -> AppResult<Redirect> {
    if !is_admin(&state, &jar).await {
        return Ok(Redirect::to("/admin/login"));
    }
    catalog::delete_feedback(&*state.store, &req.feedback_id).await?;
    Ok(Redirect::to("/admin/dashboard"))
}

async fn is_admin(state: &AppState, jar: &CookieJar) -> bool {
    state.sessions.current(jar).await.admin
}
