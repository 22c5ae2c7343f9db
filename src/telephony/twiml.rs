//! TwiML documents returned to the telephony provider

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use quick_xml::escape::escape;
use std::fmt::Write;

/// Builder for a `<Response>` document. Every text node and attribute
/// value is escaped on the way in.
#[derive(Debug, Default)]
pub struct Twiml {
    verbs: String,
}

impl Twiml {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn say(mut self, voice: &str, text: &str) -> Self {
        let _ = write!(
            self.verbs,
            r#"<Say voice="{}">{}</Say>"#,
            escape(voice),
            escape(text)
        );
        self
    }

    /// Wait for a single keypress, posted to `action`
    #[must_use]
    pub fn gather(mut self, action: &str, timeout_secs: u32) -> Self {
        let _ = write!(
            self.verbs,
            r#"<Gather action="{}" method="POST" numDigits="1" timeout="{timeout_secs}"></Gather>"#,
            escape(action)
        );
        self
    }

    #[must_use]
    pub fn redirect(mut self, url: &str) -> Self {
        let _ = write!(
            self.verbs,
            r#"<Redirect method="POST">{}</Redirect>"#,
            escape(url)
        );
        self
    }

    #[must_use]
    pub fn dial(mut self, number: &str) -> Self {
        let _ = write!(self.verbs, "<Dial>{}</Dial>", escape(number));
        self
    }

    #[must_use]
    pub fn hangup(mut self) -> Self {
        self.verbs.push_str("<Hangup/>");
        self
    }

    pub fn render(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Response>{}</Response>"#,
            self.verbs
        )
    }
}

impl IntoResponse for Twiml {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, "application/xml")], self.render()).into_response()
    }
}
