use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::items::get_item,
        crate::routes::items::count_items,
        crate::routes::items::list_items,
        crate::routes::items::add_item,
        crate::routes::items::update_item,
        crate::routes::items::delete_item,
    ),
    components(
        schemas(
            HealthResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "items")
    )
)]
pub struct ApiDoc;
