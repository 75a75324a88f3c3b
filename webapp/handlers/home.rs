use std::io::Cursor;
use tiny_http::Response;

use crate::render::render_page;
use crate::state::AppState;

/// `GET /`: upload form and stage panels, no result.
pub fn handle_get(state: &AppState) -> Response<Cursor<Vec<u8>>> {
    crate::routes::html_response(render_page(state, |tmpl| tmpl))
}
