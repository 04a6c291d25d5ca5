#![forbid(unsafe_code)]

use anyhow::Result;
use lazy_static::lazy_static;
use log::error;
use poem::{Request, Response, handler};
use serde::Serialize;
use tera::Context;

use crate::utils::templates;
use crate::utils::web_utils::{self, RequestDebug, make_html_200, make_http_500};

// ***************************************************************************
//                              Catalog Data
// ***************************************************************************
// The catalog is fixed for the life of the process.  Nothing outside this
// module can modify it; the only escape is the read-only slice below.
lazy_static! {
    static ref CATALOG: Vec<CatalogItem> = vec![
        CatalogItem::new("Elephant", "https://menagerie.example/images/elephant.png", 100),
        CatalogItem::new("Penguin",  "https://menagerie.example/images/penguin.png",  200),
        CatalogItem::new("Zebra",    "https://menagerie.example/images/zebra.png",    300),
    ];
}

// ---------------------------------------------------------------------------
// CatalogItem:
// ---------------------------------------------------------------------------
/// A fixed display record: what the item is called, where its picture lives
/// and what it costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub title: String,
    pub image: String,
    pub cost: u32,
}

impl CatalogItem {
    fn new(title: &str, image: &str, cost: u32) -> Self {
        Self {title: title.to_string(), image: image.to_string(), cost}
    }
}

// ---------------------------------------------------------------------------
// items:
// ---------------------------------------------------------------------------
/** The catalog in insertion order, for read-only iteration. */
pub fn items() -> &'static [CatalogItem] {
    &CATALOG
}

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct CatalogListing {
    items: &'static [CatalogItem],
}

// Implement the debug record trait for logging.
impl RequestDebug for CatalogListing {
    type Req = CatalogListing;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(64);
        s.push_str("  Request body:");
        s.push_str("\n    num_items: ");
        s.push_str(&self.items.len().to_string());
        s
    }
}

// ***************************************************************************
//                                 Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_catalog:
// ---------------------------------------------------------------------------
#[handler]
pub fn get_catalog(http_req: &Request) -> Response {
    let listing = CatalogListing::new();

    // Conditional logging depending on log level.
    web_utils::debug_request(http_req, &listing);

    // Process the request.
    match listing.render() {
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
impl CatalogListing {
    /// Create a listing over the process-wide catalog.
    pub fn new() -> Self {
        Self {items: items()}
    }

    /// Render the standalone catalog page.  The ordered item sequence is the
    /// whole template context.
    fn render(&self) -> Result<String> {
        let mut ctx = Context::new();
        ctx.insert("items", &self.items);
        templates::render(templates::CATALOG_PAGE, &ctx)
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_fixed_and_ordered() {
        let catalog = items();
        assert_eq!(catalog.len(), 3);

        let titles: Vec<&str> = catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Elephant", "Penguin", "Zebra"]);

        let costs: Vec<u32> = catalog.iter().map(|i| i.cost).collect();
        assert_eq!(costs, vec![100, 200, 300]);
    }

    #[test]
    fn sample_costs_are_positive() {
        for item in items() {
            assert!(item.cost > 0, "{} has a non-positive cost", item.title);
        }
    }

    #[test]
    fn sample_images_are_valid_urls() {
        for item in items() {
            url::Url::parse(&item.image)
                .unwrap_or_else(|_| panic!("{} has an invalid image url", item.title));
        }
    }

    #[test]
    fn listing_page_preserves_item_order() {
        let body = CatalogListing::new().render().expect("render should succeed");
        let elephant = body.find("Elephant").expect("missing Elephant");
        let penguin = body.find("Penguin").expect("missing Penguin");
        let zebra = body.find("Zebra").expect("missing Zebra");
        assert!(elephant < penguin && penguin < zebra);
        assert!(body.contains("Elephant: 100"));
        assert!(body.contains("Penguin: 200"));
        assert!(body.contains("Zebra: 300"));
    }

    #[test]
    fn empty_catalog_renders_empty_listing() {
        // The listing fragment itself, rendered over no items, is still a page.
        let mut ctx = Context::new();
        ctx.insert("items", &Vec::<CatalogItem>::new());
        let body = templates::render(templates::CATALOG, &ctx).expect("render should succeed");
        assert!(body.contains("<ul"));
        assert!(!body.contains("<li"));
    }
}
