//! Collection listing HTTP handlers.
//!
//! ```text
//! GET /api/v1/collections
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CollectionSummary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters for listing collections.
#[derive(Debug, Deserialize)]
pub struct ListCollectionsQuery {
    pub all: Option<String>,
}

/// A collection as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub username: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<&CollectionSummary> for CollectionBody {
    fn from(summary: &CollectionSummary) -> Self {
        Self {
            id: summary.id().to_string(),
            name: summary.name().to_string(),
            username: summary.owner_username().to_string(),
            created_at: summary.created_at().to_rfc3339(),
        }
    }
}

/// List the caller's collections, or every collection for an admin asking
/// for `all`.
///
/// The `all` switch is forwarded as-is; role enforcement lives in the
/// domain service, which ignores the switch for non-admin callers.
#[utoipa::path(
    get,
    path = "/api/v1/collections",
    params(
        ("all" = Option<String>, Query, description = "true widens an admin to every collection")
    ),
    responses(
        (status = 200, description = "Collections", body = [CollectionBody]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["collections"],
    operation_id = "listCollections",
    security(("SessionCookie" = []))
)]
#[get("/collections")]
pub async fn list_collections(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListCollectionsQuery>,
) -> ApiResult<web::Json<Vec<CollectionBody>>> {
    let caller = session.require_user()?;
    let all_collections = query.into_inner().all.as_deref() == Some("true");
    let collections = state.collections.list(&caller, all_collections).await?;
    Ok(web::Json(
        collections.iter().map(CollectionBody::from).collect(),
    ))
}
