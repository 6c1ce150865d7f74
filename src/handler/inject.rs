//! Entry document rendering.
//!
//! Reads the entry HTML document fresh from disk, substitutes the recognized
//! placeholder markers with their environment values, and builds the
//! response. Every request re-reads and re-renders; there is no cache.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve the rendered entry document.
///
/// A read failure is answered with a 500 and a diagnostic on stderr; it does
/// not fall through to the static-file path.
pub async fn serve_entry(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let path = Path::new(&state.config.site.root).join(&state.config.site.entry_file);

    let template = match fs::read_to_string(&path).await {
        Ok(t) => t,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read entry document '{}': {e}",
                path.display()
            ));
            return http::build_500_response();
        }
    };

    let values = state.placeholders.resolve();
    let html = render(&template, &values);

    if ctx.access_log {
        logger::log_response(html.len());
    }
    http::response::build_entry_response(html, ctx.is_head)
}

/// Replace every occurrence of each marker with its value.
///
/// Replacement is literal and global, in the order the pairs are given.
/// Unrecognized markers are left untouched; values are substituted verbatim
/// with no escaping.
pub fn render(template: &str, values: &[(String, String)]) -> String {
    let mut out = template.to_string();
    for (marker, value) in values {
        out = out.replace(marker, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(m, v)| ((*m).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn replaces_every_occurrence_of_each_marker() {
        let values = pairs(&[("{{SUPABASE_URL}}", "https://db.example")]);
        let out = render("{{SUPABASE_URL}} and again {{SUPABASE_URL}}", &values);
        assert_eq!(out, "https://db.example and again https://db.example");
    }

    #[test]
    fn renders_the_supabase_entry_document() {
        let values = pairs(&[
            ("{{SUPABASE_URL}}", "abc"),
            ("{{SUPABASE_ANON_KEY}}", "xyz"),
        ]);
        let out = render("<html>{{SUPABASE_URL}}-{{SUPABASE_ANON_KEY}}</html>", &values);
        assert_eq!(out, "<html>abc-xyz</html>");
    }

    #[test]
    fn empty_values_erase_the_markers() {
        let values = pairs(&[("{{SUPABASE_URL}}", ""), ("{{SUPABASE_ANON_KEY}}", "")]);
        let out = render("<html>{{SUPABASE_URL}}{{SUPABASE_ANON_KEY}}</html>", &values);
        assert_eq!(out, "<html></html>");
    }

    #[test]
    fn unrecognized_markers_are_left_untouched() {
        let values = pairs(&[("{{SUPABASE_URL}}", "abc")]);
        let out = render("{{SUPABASE_URL}} {{OTHER}} {{SUPABASE_URL} ", &values);
        assert_eq!(out, "abc {{OTHER}} {{SUPABASE_URL} ");
    }

    #[test]
    fn values_are_substituted_verbatim_without_escaping() {
        let values = pairs(&[("{{SUPABASE_URL}}", "<script>\"&'</script>")]);
        let out = render("x{{SUPABASE_URL}}y", &values);
        assert_eq!(out, "x<script>\"&'</script>y");
    }

    #[test]
    fn rendering_is_deterministic() {
        let values = pairs(&[
            ("{{SUPABASE_URL}}", "abc"),
            ("{{SUPABASE_ANON_KEY}}", "xyz"),
        ]);
        let template = "<html>{{SUPABASE_URL}}-{{SUPABASE_ANON_KEY}}</html>";
        assert_eq!(render(template, &values), render(template, &values));
    }
}
