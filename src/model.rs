use crate::config::{Language, Settings};
use crate::jupiter::JupiterState;
use crate::roemer::RoemerState;
use crate::scheduler::{Scheduler, TimerId};
use crate::venus::VenusState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Page {
    Jupiter,
    Venus,
    Roemer,
}

impl Page {
    pub(crate) const ALL: [Page; 3] = [Page::Jupiter, Page::Venus, Page::Roemer];

    pub(crate) fn next(self) -> Page {
        match self {
            Page::Jupiter => Page::Venus,
            Page::Venus => Page::Roemer,
            Page::Roemer => Page::Jupiter,
        }
    }

    pub(crate) fn title(self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Danish, Page::Jupiter) => "Jupiters måner",
            (Language::Danish, Page::Venus) => "Venus' faser",
            (Language::Danish, Page::Roemer) => "Rømers lysforsinkelse",
            (Language::English, Page::Jupiter) => "Jupiter's moons",
            (Language::English, Page::Venus) => "Phases of Venus",
            (Language::English, Page::Roemer) => "Rømer's light delay",
        }
    }

    /// The play timer that belongs to this page, if it has one.
    pub(crate) fn timer(self) -> Option<TimerId> {
        match self {
            Page::Jupiter => Some(TimerId::Jupiter),
            Page::Venus => Some(TimerId::Venus),
            Page::Roemer => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    Help,
    /// Date/time entry for the Jupiter page; holds the text typed so far.
    DateEntry(String),
}

#[derive(Debug)]
pub(crate) struct AppState {
    pub(crate) page: Page,
    pub(crate) scene: Scene,
    pub(crate) jupiter: JupiterState,
    pub(crate) venus: VenusState,
    pub(crate) roemer: RoemerState,
    pub(crate) scheduler: Scheduler,
    pub(crate) status: Option<String>,
}

impl AppState {
    pub(crate) fn new(settings: &Settings, now: DateTime<Utc>) -> Self {
        Self {
            page: settings.start_page,
            scene: Scene::Main,
            jupiter: JupiterState::new(now, settings.show_labels),
            venus: VenusState::default(),
            roemer: RoemerState::default(),
            scheduler: Scheduler::new(),
            status: None,
        }
    }
}
