// HTTP handlers for watchlist and readlist endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::error::ApiError;
use crate::lists::{AddMembershipRequest, ListedItem, Membership, MembershipService};
use crate::models::ItemKind;

/// Routes mounted under `/api/list`
pub fn routes(service: MembershipService) -> Router {
    Router::new()
        .route("/:kind", post(add_membership))
        .route("/:kind/:user_id", get(list_membership))
        .route("/:kind/:user_id/:item_id", delete(remove_membership))
        .with_state(service)
}

/// Handler for POST /api/list/{kind}
#[utoipa::path(
    post,
    path = "/api/list/{kind}",
    params(("kind" = ItemKind, Path, description = "movies (watchlist) or books (readlist)")),
    request_body = AddMembershipRequest,
    responses(
        (status = 201, description = "Item added to the list", body = Membership),
        (status = 404, description = "User or item not found"),
        (status = 409, description = "Item already on the list")
    ),
    tag = "lists"
)]
pub async fn add_membership(
    State(service): State<MembershipService>,
    Path(kind): Path<ItemKind>,
    Json(request): Json<AddMembershipRequest>,
) -> Result<(StatusCode, Json<Membership>), ApiError> {
    tracing::debug!(
        "Adding {} {} to {} of user {}",
        kind.label(),
        request.item_id,
        kind.list_name(),
        request.user_id
    );

    let membership = service
        .add_membership(kind, request.user_id, request.item_id)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

/// Handler for GET /api/list/{kind}/{user_id}
#[utoipa::path(
    get,
    path = "/api/list/{kind}/{user_id}",
    params(
        ("kind" = ItemKind, Path, description = "movies (watchlist) or books (readlist)"),
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Items on the user's list", body = Vec<ListedItem>),
        (status = 404, description = "User not found")
    ),
    tag = "lists"
)]
pub async fn list_membership(
    State(service): State<MembershipService>,
    Path((kind, user_id)): Path<(ItemKind, i32)>,
) -> Result<Json<Vec<ListedItem>>, ApiError> {
    let items = service.list_membership(kind, user_id).await?;
    Ok(Json(items))
}

/// Handler for DELETE /api/list/{kind}/{user_id}/{item_id}
#[utoipa::path(
    delete,
    path = "/api/list/{kind}/{user_id}/{item_id}",
    params(
        ("kind" = ItemKind, Path, description = "movies (watchlist) or books (readlist)"),
        ("user_id" = i32, Path, description = "User ID"),
        ("item_id" = i32, Path, description = "Movie or book ID")
    ),
    responses(
        (status = 200, description = "Item removed from the list", body = Membership),
        (status = 404, description = "Item was not on the list")
    ),
    tag = "lists"
)]
pub async fn remove_membership(
    State(service): State<MembershipService>,
    Path((kind, user_id, item_id)): Path<(ItemKind, i32, i32)>,
) -> Result<Json<Membership>, ApiError> {
    service
        .remove_membership(kind, user_id, item_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound {
            resource: format!("{} entry", kind.list_name()),
            id: format!("{}/{}", user_id, item_id),
        })
}
