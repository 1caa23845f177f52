use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::domain::repository::{DocumentRenderer, RenderError};
use crate::domain::types::PageOptions;

const CONVERT_HTML_PATH: &str = "forms/chromium/convert/html";

/// Chromium HTML to PDF conversion over HTTP (Gotenberg-compatible API).
#[derive(Clone)]
pub struct HttpPdfRenderer {
    client: Client,
    endpoint: String,
}

impl HttpPdfRenderer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/{CONVERT_HTML_PATH}", base_url.trim_end_matches('/')),
        })
    }
}

fn millimetres(value: f32) -> String {
    format!("{value}mm")
}

fn page_form(markup: &str, page: &PageOptions) -> Result<Form, RenderError> {
    let index = Part::text(markup.to_owned())
        .file_name("index.html")
        .mime_str("text/html; charset=utf-8")
        .map_err(|e| RenderError::Unreachable(e.to_string()))?;
    let margin = millimetres(page.margin_mm);
    Ok(Form::new()
        .part("files", index)
        .text("paperWidth", millimetres(page.width_mm))
        .text("paperHeight", millimetres(page.height_mm))
        .text("marginTop", margin.clone())
        .text("marginBottom", margin.clone())
        .text("marginLeft", margin.clone())
        .text("marginRight", margin)
        .text("printBackground", "true"))
}

impl DocumentRenderer for HttpPdfRenderer {
    async fn render(&self, markup: &str, page: &PageOptions) -> Result<Bytes, RenderError> {
        let form = page_form(markup, page)?;
        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RenderError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(RenderError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let pdf = resp
            .bytes()
            .await
            .map_err(|e| RenderError::Unreachable(e.to_string()))?;
        if pdf.is_empty() {
            return Err(RenderError::EmptyDocument);
        }
        Ok(pdf)
    }
}
