use crate::chart::{ChartData, ChartInput, ChartParams, build_chart};
use crate::client::{ApiClient, ApiError, Snapshot, load_articles, load_clients, or_empty};
use crate::errors::AppError;
use crate::listing::{ListFilter, entries_from_form, entry_rows, exit_rows, exits_from_form};
use crate::models::{
    Article, Client, Credentials, EntryForm, EntryRow, ExitForm, ExitRow, Registration,
    SavedResponse,
};
use crate::session::Session;
use crate::state::AppState;
use crate::storage::{persist_session, remove_session};
use crate::ui::{render_index, render_login, render_register};
use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Response {
    let Some(api) = state.api().await else {
        return Redirect::to("/login").into_response();
    };
    let (articles, clients) = tokio::join!(load_articles(&api), load_clients(&api));
    Html(render_index(&articles, &clients)).into_response()
}

pub async fn login_page(State(state): State<AppState>) -> Response {
    if state.current_session().await.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(render_login(None)).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    match state.anonymous().login(&credentials).await {
        Ok(token) => {
            start_session(&state, token).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err @ (ApiError::Network(_) | ApiError::Decode(_))) => {
            Err(AppError::from_backend(err, "Could not reach the backend."))
        }
        Err(err) => {
            warn!("login failed: {err}");
            let page = Html(render_login(Some("Invalid credentials")));
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
    }
}

pub async fn register_page() -> Html<String> {
    Html(render_register(None))
}

pub async fn register(
    State(state): State<AppState>,
    Form(registration): Form<Registration>,
) -> Result<Response, AppError> {
    if registration.password1 != registration.password2 {
        let page = Html(render_register(Some("Passwords do not match")));
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    match state.anonymous().register(&registration).await {
        Ok(token) => {
            start_session(&state, token).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            warn!("registration failed: {err}");
            let page = Html(render_register(Some("Registration failed!")));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.session.lock().await.take();
    remove_session(&state.config.session_path).await?;
    info!("session closed");
    Ok(Redirect::to("/login"))
}

pub async fn get_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let api = require_session(&state).await?;
    Ok(Json(load_articles(&api).await))
}

pub async fn get_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, AppError> {
    let api = require_session(&state).await?;
    Ok(Json(load_clients(&api).await))
}

pub async fn get_entries(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<EntryRow>>, AppError> {
    let api = require_session(&state).await?;
    Ok(Json(list_entries(&api, &filter).await?))
}

pub async fn create_entries(
    State(state): State<AppState>,
    Json(form): Json<EntryForm>,
) -> Result<Json<SavedResponse<EntryRow>>, AppError> {
    let api = require_session(&state).await?;
    let entries = entries_from_form(&form)?;

    for entry in &entries {
        api.create_entry(entry)
            .await
            .map_err(|err| AppError::from_backend(err, "Could not save entries."))?;
    }
    info!("created {} entries", entries.len());

    Ok(Json(SavedResponse {
        message: "Entries saved.".to_string(),
        rows: list_entries(&api, &ListFilter::default()).await?,
    }))
}

pub async fn get_exits(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<ExitRow>>, AppError> {
    let api = require_session(&state).await?;
    Ok(Json(list_exits(&api, &filter).await?))
}

pub async fn create_exits(
    State(state): State<AppState>,
    Json(form): Json<ExitForm>,
) -> Result<Json<SavedResponse<ExitRow>>, AppError> {
    let api = require_session(&state).await?;
    let payload = exits_from_form(&form)?;

    let created = api
        .create_multiple_exits(&payload)
        .await
        .map_err(|err| AppError::from_backend(err, "Could not save exits."))?;
    info!(
        "created {} exits for client {}: {}",
        created.exits.len(),
        payload.client,
        created.status
    );

    Ok(Json(SavedResponse {
        message: "Exits saved and awaiting authorization.".to_string(),
        rows: list_exits(&api, &ListFilter::default()).await?,
    }))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> Result<Json<ChartData>, AppError> {
    let api = require_session(&state).await?;
    let query = params.into_query()?;
    let snapshot = Snapshot::load(&api).await;

    let input = ChartInput {
        entries: &snapshot.entries,
        exits: &snapshot.exits,
        articles: &snapshot.articles,
        clients: &snapshot.clients,
    };
    Ok(Json(build_chart(&input, &query)))
}

async fn require_session(state: &AppState) -> Result<ApiClient, AppError> {
    state.api().await.ok_or_else(AppError::unauthorized)
}

async fn start_session(state: &AppState, token: String) -> Result<(), AppError> {
    let session = Session::new(token, state.config.auth_scheme.clone());
    persist_session(&state.config.session_path, &session).await?;
    *state.session.lock().await = Some(session);
    info!("session started");
    Ok(())
}

async fn list_entries(api: &ApiClient, filter: &ListFilter) -> Result<Vec<EntryRow>, AppError> {
    let (entries, articles) = tokio::join!(
        or_empty("entries", api.list_entries()),
        load_articles(api),
    );
    Ok(entry_rows(&entries, &articles, filter)?)
}

async fn list_exits(api: &ApiClient, filter: &ListFilter) -> Result<Vec<ExitRow>, AppError> {
    let (exits, articles, clients) = tokio::join!(
        or_empty("exits", api.list_exits()),
        load_articles(api),
        load_clients(api),
    );
    Ok(exit_rows(&exits, &articles, &clients, filter)?)
}
