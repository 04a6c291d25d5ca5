#![forbid(unsafe_code)]

use anyhow::Result;
use log::error;
use poem::web::Path;
use poem::{Request, Response, handler};
use tera::Context;

use crate::pages::catalog;
use crate::utils::templates;
use crate::utils::web_utils::{self, RequestDebug, make_html_200, make_http_500};

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
/// The greeting input.  Absence of a name is a normal, expected case and is
/// carried explicitly; the empty string greets like an absent name.
pub struct GreetingContext {
    pub name: Option<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for GreetingContext {
    type Req = GreetingContext;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(64);
        s.push_str("  Request body:");
        s.push_str("\n    name: ");
        match &self.name {
            Some(name) => s.push_str(name),
            None => s.push_str("(none)"),
        }
        s
    }
}

// ***************************************************************************
//                                 Endpoints
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_hello:
// ---------------------------------------------------------------------------
/** The anonymous-visitor greeting, served on /hello and /hello/. */
#[handler]
pub fn get_hello(http_req: &Request) -> Response {
    respond(http_req, GreetingContext::new(None))
}

// ---------------------------------------------------------------------------
// get_hello_named:
// ---------------------------------------------------------------------------
/** The named greeting.  The name is taken verbatim from the path and the
 * page also shows the catalog listing.
 */
#[handler]
pub fn get_hello_named(http_req: &Request, Path(name): Path<String>) -> Response {
    respond(http_req, GreetingContext::new(Some(name)))
}

// ---------------------------------------------------------------------------
// get_greet_named:
// ---------------------------------------------------------------------------
/** The capitalized variant: first character uppercased, the rest lowercased. */
#[handler]
pub fn get_greet_named(http_req: &Request, Path(name): Path<String>) -> Response {
    let greeting = GreetingContext::new(Some(name));

    // Conditional logging depending on log level.
    web_utils::debug_request(http_req, &greeting);

    match greeting.render_capitalized() {
        Ok(body) => make_html_200(body),
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            error!("{}", msg);
            make_http_500(msg)
        }
    }
}

// ---------------------------------------------------------------------------
// respond:
// ---------------------------------------------------------------------------
fn respond(http_req: &Request, greeting: GreetingContext) -> Response {
    // Conditional logging depending on log level.
    web_utils::debug_request(http_req, &greeting);

    match greeting.render() {
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
impl GreetingContext {
    pub fn new(name: Option<String>) -> Self {
        Self {name}
    }

    /// Render the verbatim greeting page.  The catalog items ride along in
    /// the context because the named branch of the template includes the
    /// catalog listing; the visitor branch ignores them.
    fn render(&self) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("name", &self.name);
        ctx.insert("items", &catalog::items());
        templates::render(templates::HELLO, &ctx)
    }

    /// Render the capitalized greeting page.  Callers must supply a name.
    fn render_capitalized(&self) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("name", &self.name);
        templates::render(templates::GREET, &ctx)
    }
}
