use crate::error::ApiErrorBody;
use crate::models::{DeleteResponse, Idea, NewIdea, StatusUpdate, TipoIdea, TipoPost, UpdateIdea};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_ideas,
        crate::routes::get_idea,
        crate::routes::create_idea,
        crate::routes::update_idea,
        crate::routes::delete_idea,
        crate::routes::update_status,
    ),
    components(schemas(
        Idea, NewIdea, UpdateIdea, StatusUpdate, DeleteResponse, TipoIdea, TipoPost, ApiErrorBody
    )),
    tags(
        (name = "ideas", description = "Content idea triage"),
    )
)]
pub struct ApiDoc;
