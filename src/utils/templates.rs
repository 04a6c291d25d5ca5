#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use log::info;
use tera::{Context, Tera};

use crate::utils::errors::Errors;
use crate::utils::template_sources;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Template identifiers used at render call sites.  The ".html" suffix keeps
// tera's autoescaping enabled for every page.
pub const BASE: &str = "base.html";
pub const HELLO: &str = "hello.html";
pub const GREET: &str = "greet.html";
pub const CATALOG: &str = "catalog.html";
pub const CATALOG_PAGE: &str = "catalog_page.html";
pub const FORM: &str = "form.html";
pub const FORM_RESULT: &str = "form_result.html";
pub const CHRISTMAS: &str = "christmas.html";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the template registry so that it has a 'static lifetime.
// Registration failures are programming errors in the embedded sources, so
// we exit rather than limp along without pages to serve.
lazy_static! {
    static ref TEMPLATES: Tera = register_templates();
}

// ***************************************************************************
//                               Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_templates:
// ---------------------------------------------------------------------------
/** Force registration of the embedded templates before the serving loop
 * starts, so that a bad source aborts startup rather than the first request.
 */
pub fn init_templates() {
    info!("Registered {} page templates.", TEMPLATES.get_template_names().count());
}

// ---------------------------------------------------------------------------
// render:
// ---------------------------------------------------------------------------
/** Render a registered template with the given context.  The only expected
 * failure after successful registration is a context that does not satisfy
 * the template, which callers surface as a server error.
 */
pub fn render(template: &str, ctx: &Context) -> Result<String> {
    TEMPLATES.render(template, ctx)
        .map_err(|e| anyhow!(Errors::TemplateRender(template.to_string(), e.to_string())))
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// register_templates:
// ---------------------------------------------------------------------------
/** Build the registry from the embedded sources.  add_raw_templates resolves
 * inheritance and includes across the whole set, so the base layout and the
 * catalog fragment must be part of the same call.
 */
fn register_templates() -> Tera {
    let mut tera = Tera::default();
    let result = tera.add_raw_templates(vec![
        (BASE,         template_sources::BASE_PAGE),
        (HELLO,        template_sources::HELLO_PAGE),
        (GREET,        template_sources::GREET_PAGE),
        (CATALOG,      template_sources::CATALOG_LISTING),
        (CATALOG_PAGE, template_sources::CATALOG_PAGE),
        (FORM,         template_sources::FORM_PAGE),
        (FORM_RESULT,  template_sources::FORM_RESULT_PAGE),
        (CHRISTMAS,    template_sources::CHRISTMAS_PAGE),
    ]);
    match result {
        Ok(_) => tera,
        Err(e) => {
            panic!("{}", Errors::TemplateRegistration(e.to_string()));
        },
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_registered() {
        let names: Vec<&str> = TEMPLATES.get_template_names().collect();
        for expected in [BASE, HELLO, GREET, CATALOG, CATALOG_PAGE, FORM, FORM_RESULT, CHRISTMAS] {
            assert!(names.contains(&expected), "missing template {}", expected);
        }
    }

    #[test]
    fn render_unregistered_template_fails() {
        let ctx = Context::new();
        assert!(render("no_such_page.html", &ctx).is_err());
    }

    #[test]
    fn base_layout_renders_alone() {
        let body = render(BASE, &Context::new()).expect("base should render");
        assert!(body.contains("<!DOCTYPE html>"));
        assert!(body.contains("<title>Menagerie</title>"));
    }
}
