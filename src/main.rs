#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use log::info;
use poem::listener::TcpListener;
use poem::web::Html;
use poem::{Route, Server, get, handler};

// Menagerie utilities
use crate::pages::{catalog, christmas, form, hello, version};
use crate::utils::config::{RuntimeCtx, init_log, init_runtime_context};
use crate::utils::errors::Errors;
use crate::utils::templates;

// Modules
mod pages;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "MenagerieServer"; // for poem logging

// The root page is a fixed string; everything else goes through the
// template registry.
const ROOT_GREETING : &str = "Hello there <b>mate!</b>";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that it has a 'static lifetime.
// Initialization also creates the data directories.  We exit if we can't
// read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Menagerie ------------
    // Announce ourselves.
    println!("Starting menagerie_server!");

    // Initialize the server.
    menagerie_init();

    // The data directories were created while the runtime context
    // initialized, so this administrative mode is already done.
    if RUNTIME_CTX.server_args.create_dirs_only {
        println!("Data directories created under {}.", RUNTIME_CTX.server_dirs.root_dir);
        return Ok(());
    }

    // --------------- Main Loop Set Up ---------------
    // Assign bind address.
    let addr = format!("{}:{}",
        RUNTIME_CTX.parms.config.http_addr,
        RUNTIME_CTX.parms.config.http_port);
    info!("{} listening on {}.", RUNTIME_CTX.parms.config.title, addr);

    // Create the routes and run the server.
    let app = build_routes();

    // ------------------ Main Loop -------------------
    Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// build_routes:
// ---------------------------------------------------------------------------
/** The complete route table, built once at startup.  Method dispatch on a
 * matched path is poem's: methods without a handler answer 405 and
 * unmatched paths answer 404.
 */
fn build_routes() -> Route {
    Route::new()
        .at("/", get(get_root))
        .at("/hello", get(hello::get_hello))
        .at("/hello/", get(hello::get_hello))
        .at("/hello/:name", get(hello::get_hello_named))
        .at("/greet/:name", get(hello::get_greet_named))
        .at("/catalog", get(catalog::get_catalog))
        .at("/form", get(form::get_form).post(form::post_form))
        .at("/christmas", get(christmas::get_christmas))
        .at("/version", get(version::get_version))
}

// ---------------------------------------------------------------------------
// menagerie_init:
// ---------------------------------------------------------------------------
/** Initialize all subsystems and data structures other than those needed
 * to configure the main loop processor.
 */
fn menagerie_init() {
    // Configure our log.
    init_log();

    // Force the reading of input parameters and initialization of the
    // runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();

    // Register the embedded page templates so a bad source fails here
    // and not on the first request.
    templates::init_templates();
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    // Log build info.
    info!("{}.", format!("\n*** Running {}={}",
                        option_env!("CARGO_PKG_NAME").unwrap_or("unknown"),
                        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")),
    );
}

// ***************************************************************************
//                              Root Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// root endpoint:
// ---------------------------------------------------------------------------
#[handler]
fn get_root() -> Html<&'static str> {
    Html(ROOT_GREETING)
}
