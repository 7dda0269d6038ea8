//! Write the OpenAPI document for the HTTP surface.
//!
//! Usage: `export_openapi [PATH]`. `-` prints to stdout; the default path feeds the docs site.

use rust_authcode_server::ApiDoc;
use std::path::Path;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "docs/assets/openapi/openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let document = ApiDoc::openapi().to_pretty_json()?;

    if target == "-" {
        println!("{document}");
        return Ok(());
    }

    let path = Path::new(&target);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, document)?;
    eprintln!("OpenAPI document written to {}", path.display());

    Ok(())
}
