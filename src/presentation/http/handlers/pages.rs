//! Page Handlers
//!
//! The browser flow around the hub: pick a username, create or join a
//! room, then open the room page which connects to `/ws`.

use askama::Template;
use axum::{
    extract::Query,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use url::form_urlencoded;

use crate::application::dto::{JoinChatForm, JoinQuery, RoomQuery, StartChatForm};
use crate::domain::RoomId;
use crate::shared::error::AppError;
use crate::shared::room_code::generate_room_code;
use crate::shared::validation::validate;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    title: &'a str,
}

#[derive(Template)]
#[template(path = "join.html")]
struct JoinPage<'a> {
    title: &'a str,
    room_id: &'a str,
}

#[derive(Template)]
#[template(path = "room.html")]
struct RoomPage<'a> {
    title: &'a str,
    room_link: &'a str,
    room_id: &'a str,
    username: &'a str,
}

fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

/// Build `path?key=value&...` with every value URL-encoded.
fn location(path: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", path, query)
}

/// GET / - start page
pub async fn index() -> Result<Html<String>, AppError> {
    render(&IndexPage { title: "Start a chat" })
}

/// POST /start-chat - create a fresh room and enter it
pub async fn start_chat(Form(form): Form<StartChatForm>) -> Result<Redirect, AppError> {
    validate(&form)?;

    let room = generate_room_code();
    tracing::debug!(room = %room, "Room created");

    Ok(Redirect::to(&location(
        "/room",
        &[("rid", room.as_str()), ("uname", form.uname.as_str())],
    )))
}

/// GET /join?rid= - ask for a username before entering an existing room
pub async fn join(Query(query): Query<JoinQuery>) -> Result<Html<String>, AppError> {
    render(&JoinPage {
        title: "Join a chat",
        room_id: &query.rid,
    })
}

/// POST /join-chat - enter an existing room
pub async fn join_chat(Form(form): Form<JoinChatForm>) -> Result<Redirect, AppError> {
    validate(&form)?;

    Ok(Redirect::to(&location(
        "/room",
        &[("rid", form.rid.as_str()), ("uname", form.uname.as_str())],
    )))
}

/// GET /room?rid=&uname= - the chat room itself
pub async fn room(headers: HeaderMap, Query(query): Query<RoomQuery>) -> Result<Response, AppError> {
    if query.uname.is_empty() {
        return Ok(Redirect::to(&location("/join", &[("rid", query.rid.as_str())])).into_response());
    }
    if query.rid.is_empty() {
        return Err(AppError::BadRequest("No Room".into()));
    }
    let room = RoomId::parse(&query.rid)?;

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    let room_link = format!("{}{}", host, location("/room", &[("rid", room.as_str())]));

    let page = render(&RoomPage {
        title: room.as_str(),
        room_link: &room_link,
        room_id: room.as_str(),
        username: &query.uname,
    })?;
    Ok(page.into_response())
}
