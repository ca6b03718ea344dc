use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Idea, IdeaStatus, TipoIdea, TipoPost};

/// Active dashboard filters. Every `None` criterion matches everything; the
/// rest are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub tipo_idea: Option<TipoIdea>,
    pub tipo_post: Option<TipoPost>,
    pub status: Option<IdeaStatus>,
    pub network: Option<String>,
}

impl FilterCriteria {
    pub fn has_filters(&self) -> bool {
        self.active_query().is_some()
            || self.tipo_idea.is_some()
            || self.tipo_post.is_some()
            || self.status.is_some()
            || self.network.is_some()
    }

    pub fn clear(&mut self) {
        *self = FilterCriteria::default();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.query = (!query.is_empty()).then_some(query);
    }

    // Chip semantics: clicking the active chip switches it off.
    pub fn toggle_tipo_idea(&mut self, value: TipoIdea) {
        self.tipo_idea = toggled(self.tipo_idea, value);
    }

    pub fn toggle_tipo_post(&mut self, value: TipoPost) {
        self.tipo_post = toggled(self.tipo_post, value);
    }

    pub fn toggle_status(&mut self, value: IdeaStatus) {
        self.status = toggled(self.status, value);
    }

    pub fn toggle_network(&mut self, value: &str) {
        if self.network.as_deref() == Some(value) {
            self.network = None;
        } else {
            self.network = Some(value.to_string());
        }
    }

    pub fn matches(&self, idea: &Idea) -> bool {
        if let Some(query) = self.active_query() {
            let needle = query.to_lowercase();
            let hit = [
                idea.idea.as_str(),
                idea.body.as_str(),
                idea.nicho.as_str(),
                idea.guion.as_deref().unwrap_or_default(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.tipo_idea.is_some_and(|t| idea.tipo_idea != Some(t)) {
            return false;
        }
        if self.tipo_post.is_some_and(|t| idea.tipo_post != Some(t)) {
            return false;
        }
        if self.status.is_some_and(|s| idea.status != s) {
            return false;
        }
        if let Some(network) = &self.network {
            if !idea.redes_sociales.iter().any(|r| r == network) {
                return false;
            }
        }
        true
    }

    fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

fn toggled<T: PartialEq>(current: Option<T>, value: T) -> Option<T> {
    if current.as_ref() == Some(&value) {
        None
    } else {
        Some(value)
    }
}

/// Ideas matching `criteria`, in their original order.
pub fn filter_ideas<'a>(ideas: &'a [Idea], criteria: &FilterCriteria) -> Vec<&'a Idea> {
    ideas.iter().filter(|idea| criteria.matches(idea)).collect()
}

/// Sorted, de-duplicated social networks across every idea.
pub fn available_networks(ideas: &[Idea]) -> Vec<String> {
    ideas
        .iter()
        .flat_map(|idea| idea.redes_sociales.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
