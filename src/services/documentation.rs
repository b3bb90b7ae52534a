use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the matchday backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::websocket::ws_handler,
        crate::routes::live::current_live_match,
        crate::routes::live::set_match_live,
        crate::routes::teams::list_teams,
        crate::routes::teams::get_team,
        crate::routes::teams::create_team,
        crate::routes::teams::update_team,
        crate::routes::teams::delete_team,
        crate::routes::players::list_players,
        crate::routes::players::get_player,
        crate::routes::players::create_player,
        crate::routes::players::update_player,
        crate::routes::players::delete_player,
        crate::routes::matches::list_matches,
        crate::routes::matches::get_match,
        crate::routes::matches::create_match,
        crate::routes::matches::update_match,
        crate::routes::matches::delete_match,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::live::ClientMessage,
            crate::dto::live::ServerMessage,
            crate::dto::live::SetExtraTimeRequest,
            crate::dto::live::MakeGoalRequest,
            crate::dto::live::GoalScoredPayload,
            crate::dto::common::MatchSnapshot,
            crate::dto::common::TeamRef,
            crate::dto::common::GoalFlag,
            crate::dto::teams::TeamInput,
            crate::dto::teams::TeamSummary,
            crate::dto::players::PlayerInput,
            crate::dto::players::UpdatePlayerRequest,
            crate::dto::players::PlayerDetail,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::UpdateMatchRequest,
            crate::dto::matches::MatchSummary,
            crate::dto::matches::GoalSummary,
            crate::dao::models::MatchStatus,
            crate::dao::models::MatchStage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "live", description = "Live match administration"),
        (name = "teams", description = "Team administration"),
        (name = "players", description = "Player administration"),
        (name = "matches", description = "Fixture administration"),
    )
)]
pub struct ApiDoc;
