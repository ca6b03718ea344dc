//! Static ideas shown when the API cannot be reached, so the dashboard stays
//! usable offline and during local development.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::models::{Idea, IdeaStatus, TipoIdea, TipoPost};

static PLACEHOLDER_IDEAS: Lazy<Vec<Idea>> = Lazy::new(build);

pub fn placeholder_ideas() -> Vec<Idea> {
    PLACEHOLDER_IDEAS.clone()
}

struct Seed {
    id: i64,
    fecha: (i32, u32, u32),
    nicho: &'static str,
    idea: &'static str,
    body: &'static str,
    tipo_idea: TipoIdea,
    tipo_post: TipoPost,
    status: IdeaStatus,
    guion: Option<&'static str>,
    redes: &'static [&'static str],
    images: &'static [&'static str],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 1,
        fecha: (2024, 6, 12),
        nicho: "Fitness",
        idea: "Habit streak tracker",
        body: "A tiny web app that tracks workout streaks and sends a nudge when a streak is at risk.",
        tipo_idea: TipoIdea::WebApp,
        tipo_post: TipoPost::Video,
        status: IdeaStatus::Pending,
        guion: Some("Hook: 'I never missed a workout for 90 days'. Show the streak calendar, then the reminder."),
        redes: &["TikTok", "Instagram"],
        images: &[],
    },
    Seed {
        id: 2,
        fecha: (2024, 6, 10),
        nicho: "Freelancing",
        idea: "Automatic invoice chaser",
        body: "An n8n workflow that reads unpaid invoices from a sheet and emails polite reminders.",
        tipo_idea: TipoIdea::WorkflowN8n,
        tipo_post: TipoPost::Imagen,
        status: IdeaStatus::Progress,
        guion: None,
        redes: &["LinkedIn"],
        images: &["Flat illustration of an inbox with paid stamps", "Workflow diagram with three nodes"],
    },
    Seed {
        id: 3,
        fecha: (2024, 6, 7),
        nicho: "Cooking",
        idea: "Fridge leftovers recipe finder",
        body: "Type what is left in the fridge and get three recipes ranked by prep time.",
        tipo_idea: TipoIdea::WebApp,
        tipo_post: TipoPost::Imagen,
        status: IdeaStatus::Posting,
        guion: None,
        redes: &["Instagram", "Pinterest"],
        images: &["Top-down photo of colourful leftovers on a wooden table"],
    },
    Seed {
        id: 4,
        fecha: (2024, 6, 3),
        nicho: "Sales",
        idea: "Lead scoring from form replies",
        body: "Workflow that scores inbound form leads with an LLM and posts hot leads to Slack.",
        tipo_idea: TipoIdea::WorkflowN8n,
        tipo_post: TipoPost::Video,
        status: IdeaStatus::Pending,
        guion: Some("Screen recording: a form submission lands and a Slack alert pops up seconds later."),
        redes: &["LinkedIn", "YouTube"],
        images: &[],
    },
    Seed {
        id: 5,
        fecha: (2024, 5, 28),
        nicho: "Personal finance",
        idea: "Subscription audit dashboard",
        body: "Connect a bank export and see every recurring charge with a cancel link.",
        tipo_idea: TipoIdea::WebApp,
        tipo_post: TipoPost::Video,
        status: IdeaStatus::Rejected,
        guion: None,
        redes: &["TikTok"],
        images: &[],
    },
];

fn build() -> Vec<Idea> {
    SEEDS
        .iter()
        .filter_map(|seed| {
            let (y, m, d) = seed.fecha;
            Some(Idea {
                id: seed.id,
                fecha: NaiveDate::from_ymd_opt(y, m, d)?,
                nicho: seed.nicho.to_string(),
                body: seed.body.to_string(),
                tipo_idea: Some(seed.tipo_idea),
                tipo_post: Some(seed.tipo_post),
                guion: seed.guion.map(str::to_string),
                idea: seed.idea.to_string(),
                status: seed.status,
                web_app_prompt: None,
                db_structure: None,
                redes_sociales: seed.redes.iter().map(|s| s.to_string()).collect(),
                images_prompt: seed.images.iter().map(|s| s.to_string()).collect(),
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
}
