//! Dump the assembled OpenAPI document as JSON on stdout.

use backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), serde_json::Error> {
    let document = ApiDoc::openapi().to_json()?;
    println!("{document}");
    Ok(())
}
