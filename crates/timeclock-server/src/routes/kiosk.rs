use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;

use timeclock_core::member::Member;
use timeclock_core::reconcile::Reconciler;
use timeclock_core::TimeclockError;

use crate::error::AppError;
use crate::pages;
use crate::session::Session;
use crate::state::AppState;

const NO_SIGNUP_MESSAGE: &str = "No open signup was found for you. Please check in with a coordinator.";
const SCAN_FIRST: &str = "no member scanned in this session";

async fn current_member(app: &AppState, session: &Session) -> Member {
    app.sessions
        .get(session.id)
        .await
        .unwrap_or_else(|| app.new_member())
}

/// GET /: forget the session's member and show the scan page.
pub async fn index(State(app): State<AppState>, session: Session) -> Response {
    app.sessions.remove(session.id).await;
    let sessions = app.sessions.len().await;
    tracing::debug!(session = %session.id, sessions, "session reset");
    session.attach(Html(pages::index()).into_response())
}

#[derive(Deserialize)]
pub struct MemberForm {
    #[serde(default)]
    pub member_id: String,
}

/// POST /action: record the scanned member id for this session.
pub async fn set_member(
    State(app): State<AppState>,
    session: Session,
    Form(form): Form<MemberForm>,
) -> Result<Response, AppError> {
    let mut member = current_member(&app, &session).await;
    member.set_member_id(&form.member_id)?;
    let member_id = member.member_id().unwrap_or_default().to_string();
    app.sessions.put(session.id, member).await;
    let body = Json(serde_json::json!({ "response": member_id }));
    Ok(session.attach(body.into_response()))
}

/// GET /action: greet the member and list their open events.
pub async fn choose_event(
    State(app): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let mut member = current_member(&app, &session).await;
    if member.member_id().is_none() {
        return Err(AppError::bad_request(SCAN_FIRST));
    }
    let name = member.name(app.store.as_ref()).await?;
    let events = member.load_events(app.store.as_ref()).await?;
    if !app.sessions.put_if_current(session.id, member).await {
        tracing::debug!(session = %session.id, "session changed while loading events");
    }
    Ok(session.attach(Html(pages::action(&name, &events)).into_response()))
}

#[derive(Deserialize)]
pub struct SentQuery {
    pub event: String,
}

/// GET /sent?event=: clock the member in or out of the chosen event.
pub async fn log_hours(
    State(app): State<AppState>,
    session: Session,
    Query(query): Query<SentQuery>,
) -> Result<Response, AppError> {
    let member = current_member(&app, &session).await;
    let Some(member_id) = member.member_id() else {
        return Err(AppError::bad_request(SCAN_FIRST));
    };
    let event_id = member.event_id(&query.event)?;

    let reconciler = Reconciler::new(
        app.store.as_ref(),
        &app.time,
        app.config.clock.min_dwell_minutes,
    );
    let page = match reconciler.log_hours(member_id, event_id).await {
        Ok(outcome) => Html(pages::sent(outcome.message())).into_response(),
        Err(TimeclockError::NoOpenSignup(id)) => {
            tracing::info!(member_id = %id, event_id, "no open signup at clock-in");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(pages::sent(NO_SIGNUP_MESSAGE)),
            )
                .into_response()
        }
        Err(e) => return Err(e.into()),
    };
    Ok(session.attach(page))
}
