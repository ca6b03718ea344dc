use serde::Serialize;

use crate::models::{Idea, TipoIdea, TipoPost};

/// Category counts shown above the idea grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IdeaStats {
    pub total: usize,
    pub web_apps: usize,
    pub workflows: usize,
    pub videos: usize,
    pub images: usize,
}

impl IdeaStats {
    pub fn from_ideas<'a>(ideas: impl IntoIterator<Item = &'a Idea>) -> Self {
        ideas.into_iter().fold(IdeaStats::default(), |mut acc, idea| {
            acc.total += 1;
            match idea.tipo_idea {
                Some(TipoIdea::WebApp) => acc.web_apps += 1,
                Some(TipoIdea::WorkflowN8n) => acc.workflows += 1,
                None => {}
            }
            match idea.tipo_post {
                Some(TipoPost::Video) => acc.videos += 1,
                Some(TipoPost::Imagen) => acc.images += 1,
                None => {}
            }
            acc
        })
    }
}
