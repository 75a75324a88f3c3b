use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::handlers;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("static header is valid ASCII")
}

fn response(status: u16, content_type: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    Response::new(
        StatusCode(status),
        vec![header("Content-Type", content_type)],
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    response(200, "text/html; charset=utf-8", body.into_bytes())
}

pub fn text_response(status: u16, body: String) -> Response<Cursor<Vec<u8>>> {
    response(status, "text/plain; charset=utf-8", body.into_bytes())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    text_response(404, "404 Not Found".into())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

pub fn dispatch(mut request: Request, state: &AppState) {
    let response = route(&mut request, state);
    let _ = request.respond(response);
}

fn route(request: &mut Request, state: &AppState) -> Response<Cursor<Vec<u8>>> {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();

    debug!(%method, path = %path, "request");

    match (method, path.as_str()) {
        (Method::Get,  "/")        => handlers::home::handle_get(state),
        (Method::Post, "/predict") => handlers::predict::handle_post(request, state),
        (Method::Get,  "/healthz") => handlers::health::handle_get(state),
        _ => not_found(),
    }
}
