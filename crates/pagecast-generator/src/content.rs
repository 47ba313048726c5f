//! Post text and page body sources.
//!
//! A [`ContentSource`] turns `(query, title, url)` into the post text, the
//! page body fragment and the meta description. Sources never fail: the
//! OpenAI-backed source falls back to the fixed template on any error.

use std::time::Duration;

use async_trait::async_trait;
use pagecast_core::ContentSettings;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Posts longer than this many characters are cut back.
pub const POST_MAX_CHARS: usize = 3500;

/// Length an oversized post is cut to before the call-to-action is re-added.
/// Long URLs shorten the cut so the result stays within [`POST_MAX_CHARS`].
pub const POST_TRUNCATE_CHARS: usize = 3400;

/// Generated material for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    /// Text sent to the channel. Always contains the page URL.
    pub post_text: String,
    /// HTML fragment placed inside the landing page.
    pub page_body: String,
    /// Meta description.
    pub description: String,
}

/// Produces content for a query. Implementations must not fail.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn generate(&self, query: &str, title: &str, url: &str) -> GeneratedContent;
}

/// Call-to-action line linking back to the page.
#[must_use]
pub fn cta_line(url: &str) -> String {
    format!("👉 Узнать больше: {url}")
}

/// Deterministic content populated with the title and URL.
#[must_use]
pub fn template_content(title: &str, url: &str) -> GeneratedContent {
    let description = format!("Краткий разбор по теме: {title}. Пошагово и без лишней воды.");

    let page_body = "<h2>Пошагово</h2>
<ol>
  <li>Определи цель и формат: что именно хочешь получить.</li>
  <li>Собери инструменты: бот/канал/напоминания/закреп.</li>
  <li>Сделай простой первый вариант и протестируй 1–2 дня.</li>
  <li>Улучшай: добавляй шаблоны, категории и правила.</li>
</ol>

<h2>FAQ</h2>
<p><b>С чего начать быстрее всего?</b> С одного списка задач и ежедневных напоминаний.</p>
<p><b>Как не бросить?</b> Делай маленькие шаги и фиксируй прогресс.</p>"
        .to_string();

    let post_text = format!(
        "{title}\n\
         Коротко: собрал понятный план, чтобы сделать это быстро и без хаоса ✅\n\n\
         1) Определи цель 🎯\n\
         2) Настрой список/канал/бота 🧩\n\
         3) Добавь напоминания ⏰\n\
         4) Проверь 1–2 дня и поправь 🔧\n\n\
         {}",
        cta_line(url)
    );

    GeneratedContent {
        post_text,
        page_body,
        description,
    }
}

/// Content source that always returns the fixed template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSource;

#[async_trait]
impl ContentSource for TemplateSource {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, _query: &str, title: &str, url: &str) -> GeneratedContent {
        template_fallback(title, url)
    }
}

/// Errors inside the OpenAI source. Never leave this module.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("reply has no message content")]
    EmptyReply,

    #[error("no JSON object found in model output")]
    NoJson,

    #[error("invalid JSON in model output: {0}")]
    Json(#[from] serde_json::Error),
}

const INSTRUCTIONS: &str = "Ты готовишь контент для SEO-страницы и поста в Telegram.
Ответь ТОЛЬКО JSON-объектом с ключами:
- tg_post: текст поста (примерно 1800–2200 символов) с заголовком, в конце призыв со ссылкой.
- page_body_html: HTML-фрагмент без <html>/<head> (h2/ol/p/ul) с полезным текстом.
- description: короткое meta description (до 160–180 символов).

Правила:
- Никаких обещаний прибыли или гарантий.
- Нейтральный тон, без опасных или незаконных инструкций.
- Не упоминай, что текст сгенерирован.";

/// Content source backed by an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiSource {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiSource {
    /// Create a source for the given endpoint, model and key.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else {
            format!("{base}/chat/completions")
        }
    }

    async fn request(&self, query: &str, title: &str, url: &str) -> Result<String, ContentError> {
        let user_input = format!(
            "Запрос: {query}\nЗаголовок (H1): {title}\nСсылка для CTA: {url}\nСгенерируй контент."
        );
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": INSTRUCTIONS },
                { "role": "user", "content": user_input },
            ],
        });

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await?;
        json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .ok_or(ContentError::EmptyReply)
    }
}

#[async_trait]
impl ContentSource for OpenAiSource {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, query: &str, title: &str, url: &str) -> GeneratedContent {
        let reply = match self.request(query, title, url).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, query, "content request failed, using template");
                return template_fallback(title, url);
            }
        };

        match parse_reply(&reply) {
            Ok(draft) => {
                debug!(query, "generated content");
                finalize(draft, title, url)
            }
            Err(e) => {
                warn!(error = %e, query, "unusable model output, using template");
                template_fallback(title, url)
            }
        }
    }
}

/// Pick the OpenAI source when a key is configured, otherwise the template.
#[must_use]
pub fn content_source_from_settings(settings: &ContentSettings) -> Box<dyn ContentSource> {
    let Some(api_key) = settings.api_key.as_deref() else {
        debug!("no OpenAI key configured, using template content");
        return Box::new(TemplateSource);
    };

    match OpenAiSource::new(&settings.base_url, &settings.model, api_key) {
        Ok(source) => Box::new(source),
        Err(e) => {
            warn!(error = %e, "failed to create OpenAI client, using template content");
            Box::new(TemplateSource)
        }
    }
}

/// Raw fields pulled out of the model's JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub post_text: String,
    pub page_body: String,
    pub description: String,
}

/// Parse the model reply into a draft.
pub fn parse_reply(reply: &str) -> Result<Draft, ContentError> {
    let object = extract_json_object(reply).ok_or(ContentError::NoJson)?;
    let data: Value = serde_json::from_str(object)?;

    Ok(Draft {
        post_text: field_text(&data, "tg_post"),
        page_body: field_text(&data, "page_body_html"),
        description: field_text(&data, "description"),
    })
}

/// The whole reply when it is an object, else the span from the first `{`
/// to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.starts_with('{') && text.ends_with('}') {
        return Some(text);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn field_text(data: &Value, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Template content with the same length ceiling as generated posts.
fn template_fallback(title: &str, url: &str) -> GeneratedContent {
    finalize(Draft::default(), title, url)
}

/// Fill gaps from the template and enforce the post invariants: the URL is
/// present and the text stays under [`POST_MAX_CHARS`].
#[must_use]
pub fn finalize(draft: Draft, title: &str, url: &str) -> GeneratedContent {
    let fallback = template_content(title, url);

    let mut post_text = if draft.post_text.is_empty() {
        fallback.post_text
    } else {
        draft.post_text
    };

    if !post_text.contains(url) {
        post_text = format!("{}\n\n{}", post_text.trim_end(), cta_line(url));
    }

    if post_text.chars().count() > POST_MAX_CHARS {
        let tail = format!("\n\n{}", cta_line(url));
        let budget = POST_TRUNCATE_CHARS.min(POST_MAX_CHARS.saturating_sub(tail.chars().count()));
        let cut: String = post_text.chars().take(budget).collect();
        post_text = format!("{}{tail}", cut.trim_end());
    }

    GeneratedContent {
        post_text,
        page_body: if draft.page_body.is_empty() {
            fallback.page_body
        } else {
            draft.page_body
        },
        description: if draft.description.is_empty() {
            fallback.description
        } else {
            draft.description
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/kuda-skhodit/";

    #[test]
    fn test_template_content() {
        let content = template_content("Куда Сходить", URL);
        assert!(content.post_text.starts_with("Куда Сходить\n"));
        assert!(content.post_text.ends_with(&cta_line(URL)));
        assert!(content.description.contains("Куда Сходить"));
        assert!(content.page_body.contains("<h2>Пошагово</h2>"));
    }

    #[tokio::test]
    async fn test_template_source_ignores_query() {
        let a = TemplateSource.generate("one", "Title", URL).await;
        let b = TemplateSource.generate("two", "Title", URL).await;
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object(" {\"a\":1} "), Some("{\"a\":1}"));
        assert_eq!(
            extract_json_object("```json\n{\"a\":{\"b\":2}}\n```"),
            Some("{\"a\":{\"b\":2}}")
        );
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_reply() {
        let draft = parse_reply(
            "Here you go:\n{\"tg_post\":\" Пост \",\"page_body_html\":\"<p>x</p>\",\"description\":null}",
        )
        .unwrap();
        assert_eq!(draft.post_text, "Пост");
        assert_eq!(draft.page_body, "<p>x</p>");
        assert_eq!(draft.description, "");
    }

    #[test]
    fn test_parse_reply_rejects_garbage() {
        assert!(matches!(parse_reply("nothing"), Err(ContentError::NoJson)));
        assert!(matches!(parse_reply("{not json}"), Err(ContentError::Json(_))));
    }

    #[test]
    fn test_finalize_appends_missing_url() {
        let draft = Draft {
            post_text: "Пост без ссылки\n".to_string(),
            page_body: "<p>body</p>".to_string(),
            description: "desc".to_string(),
        };
        let content = finalize(draft, "Title", URL);
        assert_eq!(content.post_text, format!("Пост без ссылки\n\n{}", cta_line(URL)));
        assert_eq!(content.page_body, "<p>body</p>");
    }

    #[test]
    fn test_finalize_keeps_existing_url() {
        let text = format!("Читайте: {URL}");
        let draft = Draft {
            post_text: text.clone(),
            ..Draft::default()
        };
        assert_eq!(finalize(draft, "Title", URL).post_text, text);
    }

    #[test]
    fn test_finalize_fills_empty_fields_from_template() {
        let content = finalize(Draft::default(), "Title", URL);
        let fallback = template_content("Title", URL);
        assert_eq!(content, fallback);
    }

    #[test]
    fn test_finalize_truncates_long_posts() {
        let draft = Draft {
            post_text: format!("{} {URL}", "ж".repeat(5000)),
            ..Draft::default()
        };
        let content = finalize(draft, "Title", URL);

        let expected_tail = format!("\n\n{}", cta_line(URL));
        assert!(content.post_text.ends_with(&expected_tail));
        assert_eq!(
            content.post_text.chars().count(),
            POST_TRUNCATE_CHARS + expected_tail.chars().count()
        );
        assert!(content.post_text.chars().count() <= POST_MAX_CHARS);
    }

    #[test]
    fn test_finalize_budgets_for_long_urls() {
        let url = format!("https://example.com/{}/", "a".repeat(200));
        let draft = Draft {
            post_text: "ж".repeat(5000),
            ..Draft::default()
        };
        let content = finalize(draft, "Title", &url);

        assert_eq!(content.post_text.chars().count(), POST_MAX_CHARS);
        assert!(content.post_text.ends_with(&cta_line(&url)));
    }

    #[tokio::test]
    async fn test_template_source_caps_long_titles() {
        let title = "Слово ".repeat(800);
        let content = TemplateSource.generate("q", title.trim_end(), URL).await;

        assert!(content.post_text.chars().count() <= POST_MAX_CHARS);
        assert!(content.post_text.ends_with(&cta_line(URL)));
    }

    #[tokio::test]
    async fn test_openai_fallback_caps_long_titles() {
        let source = OpenAiSource::new("http://127.0.0.1:9/v1", "test-model", "sk-test").unwrap();
        let title = "ж".repeat(4000);
        let content = source.generate("query", &title, URL).await;

        assert!(content.post_text.chars().count() <= POST_MAX_CHARS);
        assert!(content.post_text.contains(URL));
    }

    #[tokio::test]
    async fn test_openai_failure_falls_back_to_template() {
        let source = OpenAiSource::new("http://127.0.0.1:9/v1", "test-model", "sk-test").unwrap();
        let content = source.generate("query", "Title", URL).await;
        assert_eq!(content, template_content("Title", URL));
    }

    #[test]
    fn test_endpoint_resolution() {
        let source = OpenAiSource::new("https://api.example.com/v1/", "m", "k").unwrap();
        assert_eq!(source.endpoint(), "https://api.example.com/v1/chat/completions");

        let source =
            OpenAiSource::new("https://api.example.com/v1/chat/completions", "m", "k").unwrap();
        assert_eq!(source.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_source_selection() {
        let mut settings = ContentSettings {
            api_key: None,
            model: "m".to_string(),
            base_url: "https://api.example.com/v1".to_string(),
        };
        assert_eq!(content_source_from_settings(&settings).name(), "template");

        settings.api_key = Some("sk-test".to_string());
        assert_eq!(content_source_from_settings(&settings).name(), "openai");
    }
}
