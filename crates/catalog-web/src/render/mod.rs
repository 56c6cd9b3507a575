//! Server-side HTML rendering.
//!
//! Pages are plain strings assembled from small fragments. Every value that
//! came from a user goes through [`escape`].

mod views;

pub use views::{
    confirm_delete_view, edit_view, home_view, list_view, FormState, ListState, EMPTY_MESSAGE,
    LOAD_FAILED_MESSAGE,
};

use catalog_core::config::AppConfig;
use catalog_core::{EntityKind, Notice};

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #78350f; }
header, footer { padding: 1rem; border-bottom: 1px solid #fde68a; }
footer { border-top: 1px solid #fde68a; border-bottom: none; font-size: .85rem; }
.layout { display: grid; grid-template-columns: 1fr 4fr; min-height: 80vh; }
nav ul { list-style: none; padding: 1rem; margin: 0; }
nav a { display: block; padding: .6rem; border-radius: .4rem; color: #374151; text-decoration: none; }
nav a.active { background: #eff6ff; color: #d97706; }
main { padding: 1rem 2rem; }
.panel { border: 1px solid #d97706; padding: 1.25rem; }
.panel-header { display: flex; justify-content: space-between; align-items: center; }
.cards { list-style: none; padding: 0; }
.card { display: flex; justify-content: space-between; padding: 1rem; margin-bottom: 1rem;
        background: #fff; border-radius: .5rem; box-shadow: 0 1px 2px rgba(0,0,0,.1); }
.empty { color: #6b7280; font-size: 1.1rem; }
.error, .field-error { color: #dc2626; font-size: .9rem; }
.toast { position: fixed; top: 1rem; right: 1rem; padding: .8rem 1.2rem; border-radius: .4rem;
         color: #fff; transition: opacity .5s; }
.toast-success { background: #16a34a; }
.toast-error { background: #dc2626; }
"#;

// Fades the toast and strips its query parameters so a reload does not repeat it.
const TOAST_SCRIPT: &str = r#"
<script>
(function () {
  var toast = document.getElementById('toast');
  if (!toast) return;
  if (window.history && window.history.replaceState) {
    window.history.replaceState(null, '', window.location.pathname);
  }
  setTimeout(function () { toast.style.opacity = '0'; }, 4000);
  setTimeout(function () { toast.remove(); }, 4600);
})();
</script>
"#;

fn toast(notice: &Notice) -> String {
    format!(
        r#"<div id="toast" class="toast toast-{level}" role="status">{message}</div>"#,
        level = notice.level.as_str(),
        message = escape(&notice.message),
    )
}

fn nav(active: Option<EntityKind>) -> String {
    let mut items = vec![("/".to_string(), "Home", active.is_none())];
    for kind in EntityKind::all() {
        items.push((format!("/{}", kind.as_str()), kind.plural_label(), active == Some(kind)));
    }

    let links: String = items
        .into_iter()
        .map(|(href, label, is_active)| {
            format!(
                r#"<li><a href="{href}"{class}>{label}</a></li>"#,
                class = if is_active { r#" class="active""# } else { "" },
            )
        })
        .collect();

    format!("<nav><ul>{links}</ul></nav>")
}

/// Wrap a page body in the shared layout.
///
/// `active` highlights the entity in the navigation; `None` is the home page.
pub fn layout(title: &str, active: Option<EntityKind>, notice: Option<&Notice>, body: &str) -> String {
    let toast_html = notice.map(toast).unwrap_or_default();
    let script = if notice.is_some() { TOAST_SCRIPT } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {app}</title>
<style>{STYLE}</style>
</head>
<body>
<header><strong>{app}</strong></header>
{toast_html}
<div class="layout">
{nav}
<main>
{body}
</main>
</div>
<footer>{app}</footer>
{script}
</body>
</html>
"#,
        title = escape(title),
        app = AppConfig::APP_NAME,
        nav = nav(active),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_layout_marks_active_entity() {
        let html = layout("Types", Some(EntityKind::Type), None, "<p>body</p>");
        assert!(html.contains(r#"<a href="/type" class="active">Types</a>"#));
        assert!(html.contains(r#"<a href="/category">Categories</a>"#));
        assert!(html.contains("<p>body</p>"));
        assert!(!html.contains("id=\"toast\""));
    }

    #[test]
    fn test_layout_renders_escaped_toast() {
        let notice = Notice::error("Failed to create <type>");
        let html = layout("Types", Some(EntityKind::Type), Some(&notice), "");
        assert!(html.contains("toast-error"));
        assert!(html.contains("Failed to create &lt;type&gt;"));
    }
}
