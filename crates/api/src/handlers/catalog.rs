use axum::extract::State;
use axum::Json;
use dbimpact_core::schema::SchemaCatalog;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/catalog
///
/// The schema catalog this deployment sends to the model.
pub async fn get_catalog(State(state): State<AppState>) -> Json<DataResponse<SchemaCatalog>> {
    Json(DataResponse {
        data: SchemaCatalog::clone(&state.catalog),
    })
}
