//! Shared fixtures: result pages and a scripted transport

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use pwnlook::infrastructure::traits::{FormFields, FormTransport};
use pwnlook::infrastructure::TransportError;

/// One print_r style record block.
pub fn record_block(id: i64, luser: &str, domain: &str, password: &str) -> String {
    format!(
        "Array\n(\n    [id] => {id}\n    [luser] => {luser}\n    [domain] => {domain}\n    [password] => {password}\n)\n\n"
    )
}

/// Result page laid out like the live service: the records sit in the
/// `<pre>` of the fifth section of `#container`.
pub fn result_page(payload: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>results</title></head>
<body>
<div id="container">
  <section><h1>search</h1></section>
  <section><form method="post"><input name="luser"></form></section>
  <section><p>donate to keep the service running</p></section>
  <section><p>results</p></section>
  <section><pre>{payload}</pre></section>
</div>
</body>
</html>"#
    )
}

/// Page without any results block.
pub fn page_without_results() -> String {
    r#"<html><body><div id="container"><section><p>maintenance</p></section></div></body></html>"#
        .to_string()
}

/// Transport replaying scripted responses and recording every submitted form.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    calls: Mutex<Vec<(String, FormFields)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, FormFields)> {
        self.calls.lock().unwrap().clone()
    }
}

impl FormTransport for ScriptedTransport {
    fn post_form(&self, url: &str, form: &[(&'static str, String)]) -> Result<String, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), form.to_vec()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {url}"))
    }
}

pub fn status_error(status: u16) -> TransportError {
    TransportError::Status {
        url: "https://search.test/".into(),
        status,
    }
}
