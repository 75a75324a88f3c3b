use std::io::Cursor;
use tiny_http::Response;

use crate::state::AppState;

/// `GET /healthz`: reachable only once the model has loaded, so a 200 here
/// means the pipeline is ready.
pub fn handle_get(state: &AppState) -> Response<Cursor<Vec<u8>>> {
    let classifier = state.pipeline.classifier();
    let body = format!(
        "ok\ninput: {:?}\nlabels: {}\n",
        classifier.input_shape(),
        classifier.labels().iter().collect::<Vec<_>>().join(", "),
    );
    crate::routes::text_response(200, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;

    #[test]
    fn reports_input_shape_and_labels() {
        let response = handle_get(&test_state());
        assert_eq!(response.status_code().0, 200);
        let body = String::from_utf8(response.into_reader().into_inner()).unwrap();
        assert!(body.starts_with("ok\n"));
        assert!(body.contains("input: [1, 10, 12, 1]"));
        assert!(body.contains("labels: Mild Demented, Moderate Demented, Non Demented, Very Mild Demented"));
    }
}
