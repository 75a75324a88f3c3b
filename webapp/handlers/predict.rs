use std::io::{Cursor, Read};

use base64::{engine::general_purpose, Engine as _};
use tiny_http::{Request, Response};
use tracing::{info, warn};

use mri_classifier::{Classification, LabelSet, PipelineError};

use crate::render::render_page;
use crate::state::AppState;
use crate::util::html::html_escape;
use crate::util::multipart::{extract_boundary, extract_file};

/// Form field carrying the scan.
pub const FILE_FIELD: &str = "mri_file";

const ACCEPTED_CONTENT_TYPES: [&str; 4] =
    ["image/png", "image/jpeg", "image/jpg", "application/octet-stream"];

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub fn handle_post(request: &mut Request, state: &AppState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let declared = request.body_length();
    let outcome = read_body(request.as_reader(), declared, state.max_upload_bytes)
        .and_then(|body| upload_from_body(&body, &content_type))
        .and_then(|bytes| state.pipeline.classify(&bytes));

    if let Ok(c) = &outcome {
        info!(label = %c.prediction.label, confidence = c.prediction.confidence, "prediction served");
    }
    crate::routes::html_response(render_result(state, &outcome))
}

/// Reads at most `limit` bytes of body. Anything larger is rejected, up front
/// when the declared length already says so.
fn read_body(reader: impl Read, declared: Option<usize>, limit: usize) -> Result<Vec<u8>, PipelineError> {
    if declared.is_some_and(|len| len > limit) {
        return Err(PipelineError::UploadTooLarge { limit });
    }
    let mut body = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut body)?;
    if body.len() > limit {
        return Err(PipelineError::UploadTooLarge { limit });
    }
    Ok(body)
}

/// Pulls the uploaded image out of a multipart body.
pub fn upload_from_body(body: &[u8], content_type: &str) -> Result<Vec<u8>, PipelineError> {
    let boundary = extract_boundary(content_type).ok_or(PipelineError::EmptyUpload)?;
    let part = extract_file(body, &boundary, FILE_FIELD).ok_or(PipelineError::EmptyUpload)?;
    if part.data.is_empty() {
        return Err(PipelineError::EmptyUpload);
    }
    if let Some(ct) = &part.content_type {
        let ct = ct.to_ascii_lowercase();
        if !ACCEPTED_CONTENT_TYPES.contains(&ct.as_str()) {
            return Err(PipelineError::UnsupportedFormat(ct));
        }
    }
    Ok(part.data)
}

/// Full page for a prediction outcome. Errors become an error panel; the
/// rest of the page is unchanged.
pub fn render_result(state: &AppState, outcome: &Result<Classification, PipelineError>) -> String {
    let section = match outcome {
        Ok(c) => result_html(c, state.pipeline.classifier().labels()),
        Err(e) => {
            warn!(error = %e, "prediction failed");
            error_html(&e.to_string())
        }
    };
    render_page(state, |tmpl| tmpl.replace("{{RESULT_SECTION}}", &section))
}

// ---------------------------------------------------------------------------
// Output formatters
// ---------------------------------------------------------------------------

fn result_html(c: &Classification, labels: &LabelSet) -> String {
    let preview = match c.image.preview_png() {
        Ok(png) => format!(
            r#"<figure class="preview"><img src="data:image/png;base64,{}" width="300" alt="Uploaded MRI"><figcaption>🖼 Uploaded MRI (Grayscale)</figcaption></figure>"#,
            general_purpose::STANDARD.encode(png)
        ),
        Err(e) => {
            warn!(error = %e, "could not encode preview");
            String::new()
        }
    };

    let p = &c.prediction;
    let rows: String = p.ranked(labels.as_slice()).iter().map(|(label, prob)| {
        let width = (prob.clamp(0.0, 1.0) * 260.0) as u32;
        let dim   = if *label != p.label { " dim" } else { "" };
        format!(
            r#"<tr><td>{}</td><td><div class="bar-wrap"><div class="bar-fill{}" style="width:{}px"></div></div></td><td>{:.2}%</td></tr>"#,
            html_escape(label), dim, width, prob * 100.0
        )
    }).collect();

    format!(
        r#"<div class="result-card">
{preview}
<div class="alert success">🔍 <em>Prediction</em>: {label}</div>
<div class="alert info">📈 <em>Confidence</em>: {conf}</div>
<table class="prob-table"><tbody>{rows}</tbody></table>
</div>"#,
        preview = preview,
        label   = html_escape(&p.label),
        conf    = p.confidence_display(),
        rows    = rows,
    )
}

fn error_html(msg: &str) -> String {
    format!(r#"<div class="result-card"><div class="alert error">❌ Error: {}</div></div>"#, html_escape(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};

    fn png_bytes() -> Vec<u8> {
        let img = GrayImage::from_fn(12, 10, |x, y| Luma([(x * 20 + y) as u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    fn multipart(data: &[u8], part_type: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"--B0undary\r\n");
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"mri_file\"; filename=\"scan\"\r\nContent-Type: {}\r\n\r\n",
                part_type
            ).as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n--B0undary--\r\n");
        body
    }

    const CT: &str = "multipart/form-data; boundary=B0undary";

    #[test]
    fn upload_is_extracted() {
        let png = png_bytes();
        assert_eq!(upload_from_body(&multipart(&png, "image/png"), CT).unwrap(), png);
    }

    #[test]
    fn non_multipart_request_has_no_upload() {
        let err = upload_from_body(b"a=b", "application/x-www-form-urlencoded").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyUpload));
    }

    #[test]
    fn empty_file_field_is_empty_upload() {
        let err = upload_from_body(&multipart(b"", "application/octet-stream"), CT).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyUpload));
    }

    #[test]
    fn declared_non_image_type_is_rejected() {
        let err = upload_from_body(&multipart(b"%PDF-1.4", "application/pdf"), CT).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }

    #[test]
    fn successful_prediction_renders_label_confidence_and_panels() {
        let state = test_state();
        let outcome = state.pipeline.classify(&png_bytes());
        let page = render_result(&state, &outcome);
        let prediction = &outcome.as_ref().unwrap().prediction;
        assert!(page.contains(&format!("<em>Prediction</em>: {}", prediction.label)));
        assert!(page.contains(&prediction.confidence_display()));
        assert!(page.contains("data:image/png;base64,"));
        assert!(page.contains("Recommended Action:"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn corrupt_upload_renders_error_and_panels() {
        let state = test_state();
        let outcome = upload_from_body(&multipart(b"\x89PNG\r\n\x1a\ngarbage", "image/png"), CT)
            .and_then(|bytes| state.pipeline.classify(&bytes));
        let page = render_result(&state, &outcome);
        assert!(page.contains("❌ Error:"));
        assert!(page.contains("Very Mild Demented"));
        assert!(page.contains("Moderate Alzheimer's: Mayo Clinic"));

        // The shared pipeline keeps working after a failed request.
        assert!(state.pipeline.classify(&png_bytes()).is_ok());
    }

    #[test]
    fn body_exactly_at_limit_is_read() {
        let body = read_body(&[7u8; 64][..], None, 64).unwrap();
        assert_eq!(body.len(), 64);
    }

    #[test]
    fn chunked_body_over_limit_is_too_large() {
        let err = read_body(&[7u8; 65][..], None, 64).unwrap_err();
        assert!(matches!(err, PipelineError::UploadTooLarge { limit: 64 }));
    }

    #[test]
    fn declared_length_over_limit_is_rejected_before_reading() {
        struct Untouched;
        impl Read for Untouched {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                panic!("body should not be read");
            }
        }
        let err = read_body(Untouched, Some(1 << 30), 64).unwrap_err();
        assert!(matches!(err, PipelineError::UploadTooLarge { limit: 64 }));
    }

    #[test]
    fn error_text_is_escaped() {
        assert!(error_html("<script>").contains("&lt;script&gt;"));
    }
}
