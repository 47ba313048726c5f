//! HTML template system for page generation.
//!
//! Placeholders are written as `{{ name }}`; `{{ name? }}` renders empty
//! when the variable is absent. Values are inserted verbatim, so callers
//! escape text through [`TemplateContext::with_text`].

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw (already safe) value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Add a raw value, builder style.
    #[must_use]
    pub fn with_raw(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a plain-text value, HTML-escaped.
    #[must_use]
    pub fn with_text(mut self, key: impl Into<String>, value: &str) -> Self {
        self.insert(key, escape_html(value));
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template string.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the template with the given context.
    ///
    /// Substituted values are never rescanned for placeholders.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed {{{{ in template '{}'", self.name))
            })?;

            let var = after[..end].trim();
            let (var, optional) = match var.strip_suffix('?') {
                Some(stripped) => (stripped.trim(), true),
                None => (var, false),
            };

            match context.get(var) {
                Some(value) => out.push_str(value),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(var.to_string())),
            }

            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Template::new("page", DEFAULT_PAGE_TEMPLATE));
        registry.register(Template::new("index", DEFAULT_INDEX_TEMPLATE));
        registry
    }

    /// Register a template, replacing any with the same name.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// CSS shared by the page and index templates.
pub const SHARED_STYLE: &str = "body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial;max-width:820px;margin:32px auto;padding:0 16px;line-height:1.6}\n    .card{border:1px solid #e7e7e7;border-radius:16px;padding:20px}";

/// Landing page template.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="ru">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width,initial-scale=1"/>
  <title>{{ title }}</title>
  <meta name="description" content="{{ description }}"/>
  <link rel="canonical" href="{{ canonical_url }}"/>
  <meta property="og:title" content="{{ title }}"/>
  <meta property="og:description" content="{{ description }}"/>
  <meta property="og:type" content="article"/>
  <meta property="og:url" content="{{ canonical_url }}"/>
  <style>
    {{ style }}
    .btn{display:inline-block;padding:14px 18px;border-radius:12px;text-decoration:none;background:#111;color:#fff}
    .muted{color:#666}
  </style>
</head>
<body>
  <div class="card">
    <h1>{{ title }}</h1>
    <p class="muted">{{ description }}</p>

    {{ body }}

    <p><a class="btn" href="{{ group_url }}" rel="noopener">Перейти в Telegram</a></p>
    <p class="muted">Если Telegram не открылся — нажмите кнопку ещё раз.</p>
  </div>
</body>
</html>
"#;

/// Site root template.
pub const DEFAULT_INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="ru">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width,initial-scale=1"/>
  <title>{{ site_title }}</title>
  <link rel="canonical" href="{{ base_url }}/"/>
  <style>
    {{ style }}
    a{color:#0b57d0;text-decoration:none}
    a:hover{text-decoration:underline}
  </style>
</head>
<body>
  <div class="card">
    <h1>{{ site_title }}</h1>
    <p>Если ты пришёл сюда из поиска — открой страницу по ссылке из поста.</p>
    {{ pages? }}
    <p>Технические файлы:</p>
    <ul>
      <li><a href="{{ base_url }}/sitemap.xml">sitemap.xml</a></li>
      <li><a href="{{ base_url }}/robots.txt">robots.txt</a></li>
    </ul>
  </div>
</body>
</html>
"#;
