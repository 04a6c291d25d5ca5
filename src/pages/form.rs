#![forbid(unsafe_code)]

use anyhow::Result;
use log::error;
use poem::{Body, Request, Response, handler};
use std::collections::BTreeMap;
use tera::Context;
use url::form_urlencoded;

use crate::utils::templates;
use crate::utils::web_utils::{self, RequestDebug, make_html_200, make_http_500};

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
/// The parsed content of one POSTed form body.  Lives for a single request;
/// nothing is persisted.
pub struct FormSubmission {
    fields: BTreeMap<String, String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for FormSubmission {
    type Req = FormSubmission;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    num_fields: ");
        s.push_str(&self.fields.len().to_string());
        for (key, value) in &self.fields {
            s.push_str("\n    ");
            s.push_str(key);
            s.push_str(": ");
            s.push_str(value);
        }
        s
    }
}

// ***************************************************************************
//                                 Endpoints
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_form:
// ---------------------------------------------------------------------------
/** Serve the input form.  The request carries no data of interest and any
 * body is left unread.
 */
#[handler]
pub fn get_form() -> Response {
    match templates::render(templates::FORM, &Context::new()) {
        Ok(body) => make_html_200(body),
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            error!("{}", msg);
            make_http_500(msg)
        }
    }
}

// ---------------------------------------------------------------------------
// post_form:
// ---------------------------------------------------------------------------
/** Parse the form-encoded body and echo the submitted fields.  Parsing is
 * total: an unreadable or malformed body degrades to an empty submission
 * rather than a client error.
 */
#[handler]
pub async fn post_form(http_req: &Request, body: Body) -> Response {
    let bytes = body.into_vec().await.unwrap_or_default();
    let submission = FormSubmission::from_bytes(&bytes);

    // Conditional logging depending on log level.
    web_utils::debug_request(http_req, &submission);

    // Process the request.
    match submission.render() {
        Ok(body) => make_html_200(body),
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            error!("{}", msg);
            make_http_500(msg)
        }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl FormSubmission {
    /// Parse a form-encoded body.  Duplicate keys keep the last value, so
    /// keys are unique per submission.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut fields = BTreeMap::new();
        for (key, value) in form_urlencoded::parse(bytes) {
            fields.insert(key.into_owned(), value.into_owned());
        }
        Self {fields}
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the echo page listing exactly the received pairs.
    fn render(&self) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("fields", &self.fields);
        ctx.insert("num_fields", &self.fields.len());
        templates::render(templates::FORM_RESULT, &ctx)
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem::{Route, get};

    fn form_routes() -> Route {
        Route::new().at("/form", get(get_form).post(post_form))
    }

    #[test]
    fn two_fields_parse_exactly() {
        let submission = FormSubmission::from_bytes(b"a=1&b=2");
        assert_eq!(submission.fields().len(), 2);
        assert_eq!(submission.fields().get("a").map(String::as_str), Some("1"));
        assert_eq!(submission.fields().get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let submission = FormSubmission::from_bytes(b"a=1&a=2");
        assert_eq!(submission.fields().len(), 1);
        assert_eq!(submission.fields().get("a").map(String::as_str), Some("2"));
    }

    #[test]
    fn percent_and_plus_sequences_decode() {
        let submission = FormSubmission::from_bytes(b"name=J%C3%B6rg&motto=a+b");
        assert_eq!(submission.fields().get("name").map(String::as_str), Some("J\u{f6}rg"));
        assert_eq!(submission.fields().get("motto").map(String::as_str), Some("a b"));
    }

    #[test]
    fn empty_body_is_an_empty_submission() {
        let submission = FormSubmission::from_bytes(b"");
        assert!(submission.is_empty());
        let body = submission.render().expect("render should succeed");
        assert!(body.contains("No fields were submitted."));
    }

    #[test]
    fn echo_page_lists_each_pair_once() {
        let submission = FormSubmission::from_bytes(b"a=1&b=2");
        let body = submission.render().expect("render should succeed");
        assert!(body.contains("a = 1"));
        assert!(body.contains("b = 2"));
        assert_eq!(body.matches("<li>").count(), 2);
    }

    #[test]
    fn input_form_posts_back_to_itself() {
        let body = templates::render(templates::FORM, &Context::new()).unwrap();
        assert!(body.contains(r#"method="post""#));
        assert!(body.contains(r#"action="/form""#));
    }

    #[tokio::test]
    async fn get_form_never_reads_the_body() {
        let cli = TestClient::new(form_routes());
        let expected = templates::render(templates::FORM, &Context::new()).unwrap();

        // Even a GET carrying a sneaky body renders the plain input form.
        let resp = cli.get("/form").body("a=1&b=2").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(expected).await;
    }

    #[tokio::test]
    async fn post_form_echoes_the_submission() {
        let cli = TestClient::new(form_routes());
        let expected = FormSubmission::from_bytes(b"a=1&b=2").render().unwrap();

        let resp = cli.post("/form")
            .content_type("application/x-www-form-urlencoded")
            .body("a=1&b=2")
            .send().await;
        resp.assert_status_is_ok();
        resp.assert_text(expected).await;
    }

    #[tokio::test]
    async fn post_form_with_no_body_echoes_the_empty_submission() {
        let cli = TestClient::new(form_routes());
        let expected = FormSubmission::from_bytes(b"").render().unwrap();

        let resp = cli.post("/form").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(expected).await;
    }

    #[tokio::test]
    async fn other_verbs_are_method_not_allowed() {
        let cli = TestClient::new(form_routes());

        let resp = cli.put("/form").send().await;
        resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);

        let resp = cli.delete("/form").send().await;
        resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
