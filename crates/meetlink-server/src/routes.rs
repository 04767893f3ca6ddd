//! HTTP routes and their handlers.

use std::collections::HashMap;
use std::convert::Infallible;

use warp::http::{StatusCode, Uri};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use meetlink_auth::TokenRecord;
use meetlink_calendar::{compose, EventInput};
use meetlink_core::AuthError;

use crate::error::AppError;
use crate::state::AppState;
use crate::views;

/// Largest accepted `/create-event` form body
const FORM_LIMIT: u64 = 16 * 1024;

/// All routes, with request tracing and HTML rejection pages.
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let home = warp::path::end()
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(index);

    let callback = warp::path!("oauth2callback")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state.clone()))
        .and_then(oauth_callback);

    let create = warp::path!("create-event")
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form::<EventInput>())
        .and(with_state(state.clone()))
        .and_then(create_event);

    let sign_out = warp::path!("logout")
        .and(warp::get())
        .and(with_state(state))
        .and_then(logout);

    home.or(callback)
        .or(create)
        .or(sign_out)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn html(body: String) -> Response {
    warp::reply::html(body).into_response()
}

fn error_response(err: AppError) -> Response {
    tracing::error!("{}", err);
    warp::reply::with_status(
        warp::reply::html(views::error_page(err.user_message(), err.suggests_sign_in())),
        err.status(),
    )
    .into_response()
}

/// `GET /`: sign-in link, event form, or an auto-created event.
async fn index(state: AppState) -> Result<Response, Rejection> {
    let response = match state.tokens.read_token() {
        Ok(None) => html(views::sign_in_page(&state.authorization_url())),
        Ok(Some(token)) if state.config.auto_create => {
            create_and_render(&state, &token, &EventInput::default()).await
        }
        Ok(Some(_)) => html(views::event_form_page()),
        Err(e) => error_response(e.into()),
    };
    Ok(response)
}

/// `GET /oauth2callback`: exchange the code and persist the token.
async fn oauth_callback(
    params: HashMap<String, String>,
    state: AppState,
) -> Result<Response, Rejection> {
    if let Some(reason) = params.get("error") {
        return Ok(error_response(AuthError::Denied(reason.clone()).into()));
    }

    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return Ok(error_response(AuthError::MissingCode.into()));
    };

    let token = match state.session.exchange_code_for_tokens(code).await {
        Ok(token) => token,
        Err(e) => return Ok(error_response(e.into())),
    };

    if let Err(e) = state.tokens.write_token(&token) {
        return Ok(error_response(e.into()));
    }

    tracing::info!("Signed in; token persisted");
    Ok(html(views::auth_success_page()))
}

/// `POST /create-event`: compose, send, render.
async fn create_event(input: EventInput, state: AppState) -> Result<Response, Rejection> {
    let response = match state.tokens.read_token() {
        Ok(Some(token)) => create_and_render(&state, &token, &input).await,
        Ok(None) => warp::redirect::see_other(Uri::from_static("/")).into_response(),
        Err(e) => error_response(e.into()),
    };
    Ok(response)
}

/// `GET /logout`: forget the token.
async fn logout(state: AppState) -> Result<Response, Rejection> {
    let response = match state.tokens.clear_token() {
        Ok(()) => {
            tracing::info!("Signed out");
            html(views::logged_out_page())
        }
        Err(e) => error_response(e.into()),
    };
    Ok(response)
}

async fn create_and_render(state: &AppState, token: &TokenRecord, input: &EventInput) -> Response {
    let request = compose(input, &state.defaults);
    let client = state.session.authorized_client(token);

    match state
        .gateway
        .create_event(&client, &state.config.calendar_id, &request)
        .await
    {
        Ok(event) => html(views::event_created_page(&event)),
        Err(e) => error_response(e.into()),
    }
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Page not found.")
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Form too large.")
    } else {
        tracing::debug!("Unhandled rejection: {:?}", rejection);
        (StatusCode::BAD_REQUEST, "Bad request.")
    };

    Ok(warp::reply::with_status(warp::reply::html(views::error_page(message, false)), status)
        .into_response())
}
