use super::redact::{HttpLogConfig, header_lines, redact_text_body, redact_url, truncate_for_log};
use crate::trace::SessionTrace;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::fmt;

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    log: HttpLogConfig,
    trace: Option<SessionTrace>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("log", &self.log)
            .field("traced", &self.trace.is_some())
            .finish()
    }
}

impl HttpClient {
    pub fn new(inner: Client, log: HttpLogConfig) -> Self {
        Self {
            inner,
            log,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: SessionTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        payload: &T,
    ) -> Result<HttpResponseData, reqwest::Error> {
        let request = self.inner.post(url).query(query).json(payload).build()?;
        if let Some(trace) = &self.trace {
            let body_json = serde_json::to_string(payload)
                .unwrap_or_else(|err| format!("{{\"_serialization_error\":\"{err}\"}}"));
            trace.log_http_request(&request_log_lines(self.log, &request, &body_json));
        }

        let response = match self.inner.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                if let Some(trace) = &self.trace {
                    trace.log_http_error(&err.to_string());
                }
                return Err(err);
            }
        };
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if let Some(trace) = &self.trace {
            trace.log_http_response(&response_log_lines(self.log, status, &headers, &body));
        }

        Ok(HttpResponseData { status, body })
    }
}

fn request_log_lines(log: HttpLogConfig, request: &reqwest::Request, body_json: &str) -> Vec<String> {
    let url = redact_url(request.url(), log.redact_secrets);
    let body = redact_text_body(body_json, log.redact_secrets);
    let body = truncate_for_log(&body, log.max_body_chars);

    let mut lines = vec![format!("{} {}", request.method(), url)];
    lines.extend(header_lines(request.headers(), log.redact_secrets));
    append_body_lines(&mut lines, &body);
    lines
}

fn response_log_lines(log: HttpLogConfig, status: u16, headers: &HeaderMap, body: &str) -> Vec<String> {
    let body = redact_text_body(body, log.redact_secrets);
    let body = truncate_for_log(&body, log.max_body_chars);

    let mut lines = vec![format!("HTTP {status}")];
    lines.extend(header_lines(headers, log.redact_secrets));
    append_body_lines(&mut lines, &body);
    lines
}

fn append_body_lines(lines: &mut Vec<String>, body: &str) {
    if body.is_empty() {
        lines.push("<empty body>".to_string());
        return;
    }

    lines.extend(body.lines().map(ToOwned::to_owned));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseData {
    pub status: u16,
    pub body: String,
}
