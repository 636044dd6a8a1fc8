use axum::{extract::State, Json};

use crate::dto::candidate_dto::{CandidateSearchQuery, CandidateSearchResponse};
use crate::error::Result;
use crate::routes::extract::AppQuery;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/candidates/search",
    tag = "candidates",
    params(CandidateSearchQuery),
    responses(
        (status = 200, description = "Completed interviews matching the filter", body = CandidateSearchResponse),
        (status = 400, description = "Out of range minScore or limit"),
        (status = 500, description = "Storage failure"),
    ),
)]
pub async fn search_candidates(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CandidateSearchQuery>,
) -> Result<Json<CandidateSearchResponse>> {
    Ok(Json(state.candidate_search.search(query).await?))
}
