#![forbid(unsafe_code)]

use anyhow::Result;
use chrono::{Datelike, Local};
use log::error;
use poem::{Response, handler};
use tera::Context;

use crate::utils::templates;
use crate::utils::web_utils::{make_html_200, make_http_500};

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_christmas:
// ---------------------------------------------------------------------------
/** Answer the only question this page knows: is the server's local date
 * December 25?
 */
#[handler]
pub fn get_christmas() -> Response {
    let today = Local::now();
    match render_christmas(is_christmas(&today)) {
        Ok(body) => make_html_200(body),
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            error!("{}", msg);
            make_http_500(msg)
        }
    }
}

// ***************************************************************************
//                               Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// is_christmas:
// ---------------------------------------------------------------------------
/** True exactly on December 25, any year. */
pub fn is_christmas<D: Datelike>(date: &D) -> bool {
    date.month() == 12 && date.day() == 25
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// render_christmas:
// ---------------------------------------------------------------------------
fn render_christmas(christmas: bool) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("christmas", &christmas);
    templates::render(templates::CHRISTMAS, &ctx)
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use poem::test::TestClient;
    use poem::{Route, get};

    #[test]
    fn christmas_day_is_christmas() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert!(is_christmas(&date));

        // Any year will do.
        let date = NaiveDate::from_ymd_opt(1999, 12, 25).unwrap();
        assert!(is_christmas(&date));
    }

    #[test]
    fn other_days_are_not_christmas() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        assert!(!is_christmas(&date));

        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert!(!is_christmas(&date));

        // Same day number, wrong month.
        let date = NaiveDate::from_ymd_opt(2025, 11, 25).unwrap();
        assert!(!is_christmas(&date));
    }

    #[test]
    fn page_answers_yes_or_no() {
        let yes = render_christmas(true).expect("render should succeed");
        assert!(yes.contains("YES"));
        assert!(!yes.contains("NO"));

        let no = render_christmas(false).expect("render should succeed");
        assert!(no.contains("NO"));
        assert!(!no.contains("YES"));
    }

    #[tokio::test]
    async fn route_serves_the_page() {
        let cli = TestClient::new(Route::new().at("/christmas", get(get_christmas)));
        let resp = cli.get("/christmas").send().await;
        resp.assert_status_is_ok();
    }
}
