//! Page rendering port and its adapters.
//!
//! Handlers describe a page as a template name plus a JSON context; a
//! [`PageRenderer`] turns that into a response body. [`HtmlShellRenderer`]
//! produces a self-contained HTML document; [`JsonPageRenderer`] echoes the
//! template and context so tests can assert on what a handler rendered.

use std::fmt::Write as _;

use actix_web::http::header::ContentType;
use serde_json::{Map, Value, json};

use crate::domain::team::DEFAULT_THEME_COLOR;
use crate::domain::{CurrentUser, Error, SiteSettings};

use super::session::Flash;

/// Body and content type produced for one page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub content_type: ContentType,
    pub body: String,
}

/// Turns a template name and context into a response body.
pub trait PageRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<RenderedPage, Error>;
}

/// Build the context every page receives: the handler's entries plus `user`,
/// `messages` and `site`.
///
/// A non-object handler context is kept under the `page` key.
pub fn page_context(
    handler_context: Value,
    user: Option<&CurrentUser>,
    messages: &[Flash],
    site: &SiteSettings,
) -> Value {
    let mut context = match handler_context {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("page".to_owned(), other);
            map
        }
    };
    context.insert("user".to_owned(), json!(user));
    context.insert("messages".to_owned(), json!(messages));
    context.insert("site".to_owned(), json!(site));
    Value::Object(context)
}

/// Escape text for inclusion in HTML element content or attribute values.
///
/// # Examples
/// ```
/// use ecoactions::inbound::http::render::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders any context as a plain HTML document.
///
/// The template name becomes the page title and the context is laid out as
/// nested definition lists. Every string is escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlShellRenderer;

impl HtmlShellRenderer {
    fn title(template: &str) -> String {
        template
            .trim_end_matches(".html")
            .replace(['/', '_'], " ")
    }

    fn write_value(out: &mut String, value: &Value) -> std::fmt::Result {
        match value {
            Value::Null => Ok(()),
            Value::Bool(flag) => write!(out, "{flag}"),
            Value::Number(number) => write!(out, "{number}"),
            Value::String(text) => out.write_str(&escape_html(text)),
            Value::Array(items) => {
                out.write_str("<ul>")?;
                for item in items {
                    out.write_str("<li>")?;
                    Self::write_value(out, item)?;
                    out.write_str("</li>")?;
                }
                out.write_str("</ul>")
            }
            Value::Object(entries) => {
                out.write_str("<dl>")?;
                for (key, item) in entries {
                    write!(out, "<dt>{}</dt><dd>", escape_html(key))?;
                    Self::write_value(out, item)?;
                    out.write_str("</dd>")?;
                }
                out.write_str("</dl>")
            }
        }
    }

    fn write_document(template: &str, context: &Value) -> Result<String, std::fmt::Error> {
        let site = context.get("site");
        let theme = site
            .and_then(|site| site.get("theme_color"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_THEME_COLOR);
        let footer = site
            .and_then(|site| site.get("footer_text"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut out = String::new();
        write!(
            out,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{title}</title>\
             <style>:root{{--theme-color:{theme};}}</style></head>\
             <body><main data-template=\"{template}\">",
            title = escape_html(&Self::title(template)),
            theme = escape_html(theme),
            template = escape_html(template),
        )?;
        Self::write_value(&mut out, context)?;
        write!(
            out,
            "</main><footer>{}</footer></body></html>",
            escape_html(footer)
        )?;
        Ok(out)
    }
}

impl PageRenderer for HtmlShellRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<RenderedPage, Error> {
        let body = Self::write_document(template, context)
            .map_err(|_| Error::internal(format!("failed to render {template}")))?;
        Ok(RenderedPage {
            content_type: ContentType::html(),
            body,
        })
    }
}

/// Emits `{"template": ..., "context": ...}` as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPageRenderer;

impl PageRenderer for JsonPageRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<RenderedPage, Error> {
        let body = serde_json::to_string(&json!({
            "template": template,
            "context": context,
        }))
        .map_err(|err| Error::internal(format!("failed to encode {template}: {err}")))?;
        Ok(RenderedPage {
            content_type: ContentType::json(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::inbound::http::session::FlashLevel;
    use rstest::rstest;

    fn alice() -> CurrentUser {
        CurrentUser {
            id: UserId::random(),
            username: "alice".into(),
            is_staff: false,
        }
    }

    #[rstest]
    fn page_context_adds_shared_entries() {
        let messages = [Flash::new(FlashLevel::Success, "Saved")];
        let context = page_context(
            json!({"actions": []}),
            Some(&alice()),
            &messages,
            &SiteSettings::default(),
        );
        assert_eq!(context["actions"], json!([]));
        assert_eq!(context["user"]["username"], "alice");
        assert_eq!(context["messages"][0]["message"], "Saved");
        assert_eq!(context["messages"][0]["level"], "success");
        assert_eq!(context["site"]["theme_color"], "#28a745");
    }

    #[rstest]
    fn anonymous_pages_carry_null_user() {
        let context = page_context(Value::Null, None, &[], &SiteSettings::default());
        assert!(context["user"].is_null());
        assert_eq!(context["messages"], json!([]));
    }

    #[rstest]
    fn html_shell_escapes_user_content() {
        let context = page_context(
            json!({"title": "<script>alert(1)</script>"}),
            None,
            &[],
            &SiteSettings::default(),
        );
        let page = HtmlShellRenderer
            .render("actions/detail.html", &context)
            .expect("render");
        assert!(page.body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.body.contains("<script>"));
        assert!(page.body.contains("<title>actions detail</title>"));
        assert!(page.body.contains("--theme-color:#28a745"));
    }

    #[rstest]
    fn json_renderer_echoes_template_and_context() {
        let page = JsonPageRenderer
            .render("home.html", &json!({"a": 1}))
            .expect("render");
        let value: Value = serde_json::from_str(&page.body).expect("json body");
        assert_eq!(value["template"], "home.html");
        assert_eq!(value["context"]["a"], 1);
    }
}
