//! Server-rendered admin pages.
//!
//! Mutations answer with a 303 back to the list page carrying a toast. A
//! rejected name re-renders the form instead, so the user keeps what they
//! typed and sees the field message.

use super::shared::{redirect_with_notice, ToastQuery};
use crate::error::ApiError;
use crate::render::{self, FormState, ListState};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Form,
};
use catalog_core::validation::{ID_FIELD, NAME_FIELD};
use catalog_core::{
    notice_for, CatalogError, CreateInput, DeleteInput, EntityKind, Notice, Operation,
    UpdateInput,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};

/// Body of the create and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: Option<String>,
}

/// A rejected name re-renders the form. A bad id has no form to return to.
fn rejected_name(err: &CatalogError) -> bool {
    err.first_field_message(ID_FIELD).is_none() && err.first_field_message(NAME_FIELD).is_some()
}

/// A failed read shown as a toast on the list page.
fn fetch_notice(kind: EntityKind, err: CatalogError) -> Notice {
    Notice::error(ApiError::fetch_failed(kind, err).message())
}

pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut counts = Vec::new();
    for kind in EntityKind::all() {
        let count = match state.api.count(kind).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("Failed to count {}: {}", kind.plural(), e);
                None
            }
        };
        counts.push((kind, count));
    }
    Html(render::home_view(&counts))
}

async fn render_list(
    state: &AppState,
    kind: EntityKind,
    form: &FormState,
    notice: Option<&Notice>,
) -> String {
    match state.api.list(kind).await {
        Ok(records) => render::list_view(kind, ListState::Ready(records.as_slice()), form, notice),
        Err(e) => {
            error!("Error fetching {}: {}", kind.plural(), e);
            render::list_view(kind, ListState::Failed, form, notice)
        }
    }
}

pub async fn list_page(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Query(query): Query<ToastQuery>,
) -> Html<String> {
    let notice = query.into_notice();
    Html(render_list(&state, kind, &FormState::default(), notice.as_ref()).await)
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Form(form): Form<NameForm>,
) -> Response {
    let typed = form.name.clone().unwrap_or_default();
    let result = state.api.create(kind, CreateInput { name: form.name }).await;
    let notice = notice_for(kind, Operation::Create, &result);

    match result {
        Err(e) if rejected_name(&e) => {
            let form = FormState::rejected(typed, &e);
            let html = render_list(&state, kind, &form, Some(&notice)).await;
            (StatusCode::BAD_REQUEST, Html(html)).into_response()
        }
        _ => redirect_with_notice(kind, &notice).into_response(),
    }
}

pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
) -> Response {
    match state.api.get(kind, &id).await {
        Ok(record) => {
            let form = FormState::with_value(record.name);
            Html(render::edit_view(kind, &id, &form, None)).into_response()
        }
        Err(e) => redirect_with_notice(kind, &fetch_notice(kind, e)).into_response(),
    }
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
    Form(form): Form<NameForm>,
) -> Response {
    let typed = form.name.clone().unwrap_or_default();
    let input = UpdateInput {
        id: id.clone(),
        name: form.name,
    };
    let result = state.api.update(kind, input).await;
    let notice = notice_for(kind, Operation::Update, &result);

    match result {
        Err(e) if rejected_name(&e) => {
            let form = FormState::rejected(typed, &e);
            let html = render::edit_view(kind, &id, &form, Some(&notice));
            (StatusCode::BAD_REQUEST, Html(html)).into_response()
        }
        _ => redirect_with_notice(kind, &notice).into_response(),
    }
}

pub async fn confirm_delete_page(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
) -> Response {
    match state.api.get(kind, &id).await {
        Ok(record) => Html(render::confirm_delete_view(kind, &record)).into_response(),
        Err(e) => redirect_with_notice(kind, &fetch_notice(kind, e)).into_response(),
    }
}

pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
) -> Response {
    let result = state.api.delete(kind, DeleteInput::new(id)).await;
    redirect_with_notice(kind, &notice_for(kind, Operation::Delete, &result)).into_response()
}
