//! Presentation-layer state for the ideas dashboard, without any rendering.
//!
//! The dashboard owns the last fetched list and the active filters, derives
//! the visible grid, the stats bar and the network chips from them, and runs
//! mutations through an [`IdeaApi`]. After every successful mutation the full
//! list is fetched again instead of being patched in place. Mutations take
//! `&mut self`, so only one can be in flight at a time.

use tracing::{info, warn};

use crate::client::{ClientError, IdeaApi};
use crate::filter::{available_networks, filter_ideas, FilterCriteria};
use crate::models::{Id, Idea, IdeaStatus};
use crate::placeholder::placeholder_ideas;
use crate::stats::IdeaStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Nothing fetched yet.
    Empty,
    Api,
    /// The API was unreachable; showing the static placeholder set.
    Placeholder,
}

/// Short transient message for the user after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

pub struct Dashboard<A> {
    api: A,
    ideas: Vec<Idea>,
    networks: Vec<String>,
    criteria: FilterCriteria,
    selected: Option<Id>,
    source: DataSource,
    load_error: Option<String>,
    notices: Vec<Notice>,
}

impl<A: IdeaApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            ideas: Vec::new(),
            networks: Vec::new(),
            criteria: FilterCriteria::default(),
            selected: None,
            source: DataSource::Empty,
            load_error: None,
            notices: Vec::new(),
        }
    }

    /// Fetch every idea; falls back to the placeholder set when the API fails.
    pub async fn refresh(&mut self) {
        match self.api.list_ideas().await {
            Ok(ideas) => {
                self.source = DataSource::Api;
                self.load_error = None;
                self.set_ideas(ideas);
            }
            Err(e) => {
                warn!(error = %e, "could not load ideas, using placeholder data");
                self.source = DataSource::Placeholder;
                self.load_error = Some(e.to_string());
                self.set_ideas(placeholder_ideas());
            }
        }
    }

    fn set_ideas(&mut self, ideas: Vec<Idea>) {
        self.networks = available_networks(&ideas);
        self.ideas = ideas;
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn visible(&self) -> Vec<&Idea> {
        filter_ideas(&self.ideas, &self.criteria)
    }

    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    /// Counts over the whole set, not just the visible ideas.
    pub fn stats(&self) -> IdeaStats {
        IdeaStats::from_ideas(&self.ideas)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Open the detail view. Returns false for unknown ids.
    pub fn select(&mut self, id: Id) -> bool {
        let known = self.ideas.iter().any(|i| i.id == id);
        if known {
            self.selected = Some(id);
        }
        known
    }

    pub fn selected(&self) -> Option<&Idea> {
        let id = self.selected?;
        self.ideas.iter().find(|i| i.id == id)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn delete(&mut self, id: Id) -> bool {
        match self.api.delete_idea(id).await {
            Ok(()) => {
                info!(id, "idea deleted");
                self.notices.push(Notice::Success("Idea deleted".into()));
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.push(Notice::Error(failure_message(&e, "Could not delete the idea")));
                false
            }
        }
    }

    pub async fn change_status(&mut self, id: Id, status: IdeaStatus) -> bool {
        match self.api.update_status(id, status).await {
            Ok(_) => {
                info!(id, status = status.code(), "idea status updated");
                self.notices.push(Notice::Success("Status updated".into()));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notices.push(Notice::Error(failure_message(&e, "Could not update the status")));
                false
            }
        }
    }
}

fn failure_message(err: &ClientError, fallback: &str) -> String {
    let msg = err.to_string();
    if msg.trim().is_empty() { fallback.to_string() } else { msg }
}
