#![forbid(unsafe_code)]

use anyhow::Result;
use poem::handler;
use poem::web::Json;
use serde::Serialize;

// From cargo.toml.
const SERVER_VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
const SERVER_NAME: Option<&str> = option_env!("CARGO_PKG_NAME");

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
#[derive(Serialize)]
pub struct RespVersion
{
    result_code: String,
    result_msg: String,
    app_name: String,
    app_version: String,
}

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_version:
// ---------------------------------------------------------------------------
#[handler]
pub fn get_version() -> Json<RespVersion> {
    let resp = match RespVersion::process() {
        Ok(r) => r,
        Err(e) => {
            let msg = "ERROR: ".to_owned() + e.to_string().as_str();
            RespVersion::new("1", msg.as_str(), "", "")},
    };

    Json(resp)
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespVersion {
    fn new(result_code: &str, result_msg: &str, name: &str, version: &str) -> Self {
        Self {result_code: result_code.to_string(),
              result_msg: result_msg.to_string(),
              app_name: name.to_string(),
              app_version: version.to_string(),
        }
    }

    fn process() -> Result<RespVersion> {
        Ok(Self::new("0",
                    "success",
                    SERVER_NAME.unwrap_or("unknown"),
                    SERVER_VERSION.unwrap_or("unknown")),
        )
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::test::TestClient;
    use poem::{Route, get};

    #[test]
    fn process_reports_cargo_metadata() {
        let resp = RespVersion::process().expect("process should succeed");
        let value = serde_json::to_value(&resp).expect("serialization should succeed");

        assert_eq!(value["result_code"], "0");
        assert_eq!(value["result_msg"], "success");
        assert_eq!(value["app_name"], "menagerie_server");
        assert!(!value["app_version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn route_serves_json() {
        let cli = TestClient::new(Route::new().at("/version", get(get_version)));
        let resp = cli.get("/version").send().await;
        resp.assert_status_is_ok();
    }
}
