/// Page renderer for the web UI.
///
/// The UI is a single HTML template (`webapp/assets/index.html`) with
/// `{{TOKEN}}` placeholders, embedded at compile time. `render_page` fills
/// the placeholders every page shares (upload limits, input size and the
/// stage panels), hands the rest to a caller closure, and blanks whatever
/// is left.
use mri_classifier::stages::{StageInfo, STAGES};

use crate::state::AppState;
use crate::util::html::html_escape;

const TEMPLATE: &str = include_str!("assets/index.html");

/// Renders the full page.
///
/// Stage panels are filled before `fill` runs, so they appear on every
/// page whatever the handler does.
pub fn render_page<F>(state: &AppState, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let (width, height) = state.pipeline.preprocessor().dimensions();
    let upload_mb = format!("{:.0}", state.max_upload_bytes as f64 / (1024.0 * 1024.0));

    let mut html = TEMPLATE.to_owned();
    html = html.replace("{{MAX_UPLOAD_MB}}", &upload_mb);
    html = html.replace("{{INPUT_WIDTH}}", &width.to_string());
    html = html.replace("{{INPUT_HEIGHT}}", &height.to_string());
    html = html.replace("{{STAGE_PANELS_LEFT}}", &stage_panels(&STAGES[..2]));
    html = html.replace("{{STAGE_PANELS_RIGHT}}", &stage_panels(&STAGES[2..]));

    html = fill(html);

    blank_remaining(html)
}

fn stage_panels(stages: &[StageInfo]) -> String {
    stages.iter().map(stage_panel).collect::<Vec<_>>().join("\n")
}

fn stage_panel(stage: &StageInfo) -> String {
    let list = |items: &[&str]| -> String {
        items.iter().map(|i| format!("<li>{}</li>", html_escape(i))).collect()
    };
    format!(
        r#"<details>
  <summary>{marker} {label}</summary>
  <div class="disease-title">Description:</div>
  <ul class="symptom-list">{description}</ul>
  <div class="disease-title">Recommended Action:</div>
  <ul class="symptom-list">{actions}</ul>
  <a href="{url}" target="_blank" rel="noopener">🔗 {link}</a>
</details>"#,
        marker      = stage.marker,
        label       = html_escape(stage.label),
        description = list(stage.description),
        actions     = list(stage.actions),
        url         = html_escape(stage.link_url),
        link        = html_escape(stage.link_text),
    )
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that was not substituted with an empty
/// string. Braces that do not form such a token are left alone.
fn blank_remaining(mut html: String) -> String {
    let mut cursor = 0;
    while let Some(rel) = html[cursor..].find("{{") {
        let start = cursor + rel;
        let Some(end) = html[start + 2..].find("}}") else { break };
        let token = &html[start + 2..start + 2 + end];
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
            html.replace_range(start..start + 2 + end + 2, "");
            cursor = start;
        } else {
            cursor = start + 2;
        }
    }
    html
}
