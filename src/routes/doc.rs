use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    db::{PoolState, PoolStatus},
    response::{ApiResponse, Meta},
    routes::health,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::database_status
    ),
    components(
        schemas(
            health::HealthData,
            PoolState,
            PoolStatus,
            Meta,
            ApiResponse<health::HealthData>,
            ApiResponse<PoolStatus>
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database pool status"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
