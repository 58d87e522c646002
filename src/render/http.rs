// src/render/http.rs

//! HTTP renderer.
//!
//! Fetches a page over plain HTTP and extracts its title, visible text and
//! outbound links from the parsed document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, PageUrl};
use crate::render::{RenderError, RenderResult, RenderedPage, Renderer};

/// Elements whose text never reaches the rendered page.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Renderer that fetches static HTML over HTTP.
pub struct HttpRenderer {
    client: Client,
    title_selector: Selector,
    body_selector: Selector,
    link_selector: Selector,
}

impl HttpRenderer {
    /// Create a renderer with the configured user agent and timeout.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            title_selector: parse_selector("title")?,
            body_selector: parse_selector("body")?,
            link_selector: parse_selector("a[href]")?,
        })
    }

    /// Extract title, visible text and outbound links from an HTML document.
    fn extract(&self, html: &str) -> RenderedPage {
        let document = Html::parse_document(html);

        let title = document
            .select(&self.title_selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();

        let mut text = String::new();
        match document.select(&self.body_selector).next() {
            Some(body) => collect_visible_text(body, &mut text),
            None => collect_visible_text(document.root_element(), &mut text),
        }

        let links = document
            .select(&self.link_selector)
            .filter_map(|el| el.value().attr("href"))
            .map(str::to_string)
            .collect();

        RenderedPage {
            title: normalize_whitespace(&title),
            text_content: normalize_whitespace(&text),
            links,
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&self, url: &PageUrl) -> RenderResult {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RenderError::Transient(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(RenderError::Permanent(format!("HTTP {status}")));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(RenderError::Permanent(format!(
                "unsupported content type: {content_type}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| RenderError::Transient(format!("body read failed: {e}")))?;

        Ok(self.extract(&html))
    }
}

/// Map a request-level failure onto the render failure taxonomy.
fn classify_request_error(error: reqwest::Error) -> RenderError {
    if error.is_builder() {
        RenderError::Fatal(error.to_string())
    } else if error.is_redirect() {
        RenderError::Permanent(error.to_string())
    } else {
        // Timeouts and refused connections may clear up on a later attempt.
        RenderError::Transient(error.to_string())
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Append the text of every visible descendant of `element`.
fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    if INVISIBLE_ELEMENTS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_visible_text(child_element, out);
        }
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> HttpRenderer {
        HttpRenderer::new(&CrawlerConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_title_text_and_links() {
        let html = r#"
            <html><head><title>  Welcome   Page </title></head>
            <body>
              <h1>Hello</h1>
              <p>Some <b>bold</b> text.</p>
              <a href="/a">A</a>
              <a href="https://other.org/b">B</a>
              <a>no href</a>
            </body></html>
        "#;
        let page = renderer().extract(html);
        assert_eq!(page.title, "Welcome Page");
        assert_eq!(page.text_content, "Hello Some bold text. A B no href");
        assert_eq!(page.links, vec!["/a", "https://other.org/b"]);
    }

    #[test]
    fn test_extract_skips_invisible_elements() {
        let html = r#"
            <body>
              <p>Visible</p>
              <script>var hidden = 1;</script>
              <style>.x { color: red; }</style>
              <noscript>Enable JS</noscript>
            </body>
        "#;
        let page = renderer().extract(html);
        assert_eq!(page.text_content, "Visible");
    }

    #[test]
    fn test_extract_missing_title_is_empty() {
        let page = renderer().extract("<body><p>No title here</p></body>");
        assert_eq!(page.title, "");
        assert_eq!(page.text_content, "No title here");
    }

    #[test]
    fn test_extract_title_not_counted_as_body_text() {
        let html = "<html><head><title>T</title></head><body>B</body></html>";
        let page = renderer().extract(html);
        assert_eq!(page.title, "T");
        assert_eq!(page.text_content, "B");
    }
}
