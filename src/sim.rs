use crate::config::Settings;
use crate::jupiter::{jupiter_view, JupiterPreset};
use crate::model::{AppState, Page, Scene};
use crate::roemer::{roemer_geometry, RoemerPreset};
use crate::scheduler::TimerId;
use crate::surface::{Hud, Panel, Surface};
use crate::venus::{venus_view, VenusPreset};
use chrono::{Duration as ChronoDuration, TimeZone};
use std::time::Duration;

const ENTRY_MAX: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Quit,
    HelpToggle,
    Back,
    NextPage,
    GoTo(Page),
    TogglePlay,
    ShiftHours(i64),
    Rotate(f64),
    Jupiter(JupiterPreset),
    ToggleLabels,
    EntryOpen,
    EntryChar(char),
    EntryBackspace,
    EntryCommit,
    EntryCancel,
    NudgeVenus(f64),
    Venus(VenusPreset),
    NudgeMonth(f64),
    Roemer(RoemerPreset),
}

impl AppState {
    pub(crate) fn apply<Tz>(&mut self, action: Action, settings: &Settings, tz: &Tz)
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match action {
            Action::Quit => {}
            Action::HelpToggle => {
                self.scene = match self.scene {
                    Scene::Help => Scene::Main,
                    _ => Scene::Help,
                };
            }
            Action::Back => self.scene = Scene::Main,
            Action::NextPage => self.go_to(self.page.next()),
            Action::GoTo(page) => self.go_to(page),
            Action::TogglePlay => self.toggle_play(settings),
            Action::ShiftHours(h) => {
                self.jupiter
                    .nudge_offset(h, settings.jupiter.offset_range_hours);
            }
            Action::Rotate(d) => self.jupiter.nudge_angle(d),
            Action::Jupiter(preset) => match preset.resolve(tz) {
                Ok(at) => {
                    tracing::info!(?preset, %at, "jupiter preset");
                    self.jupiter.set_time(at);
                    self.status = None;
                }
                Err(e) => {
                    tracing::warn!(?preset, error = %e, "preset could not be resolved");
                    self.status = Some(e.to_string());
                }
            },
            Action::ToggleLabels => self.jupiter.show_labels = !self.jupiter.show_labels,
            Action::EntryOpen => {
                if self.page == Page::Jupiter {
                    let local = self.jupiter.clock.current.with_timezone(tz);
                    self.scene = Scene::DateEntry(local.format("%Y-%m-%d %H:%M").to_string());
                }
            }
            Action::EntryChar(ch) => {
                if let Scene::DateEntry(ref mut text) = self.scene {
                    if text.chars().count() < ENTRY_MAX {
                        text.push(ch);
                    }
                }
            }
            Action::EntryBackspace => {
                if let Scene::DateEntry(ref mut text) = self.scene {
                    text.pop();
                }
            }
            Action::EntryCommit => {
                if let Scene::DateEntry(ref text) = self.scene {
                    match crate::clock::parse_entry(text, tz) {
                        Ok(at) => {
                            tracing::info!(%at, "date entry accepted");
                            self.jupiter.set_time(at);
                            self.status = None;
                        }
                        Err(e) => {
                            tracing::warn!(entry = %text, error = %e, "date entry rejected");
                            self.status = Some(e.to_string());
                        }
                    }
                    self.scene = Scene::Main;
                }
            }
            Action::EntryCancel => self.scene = Scene::Main,
            Action::NudgeVenus(d) => self.venus = self.venus.with_angle(self.venus.angle + d),
            Action::Venus(preset) => {
                tracing::info!(?preset, "venus preset");
                self.venus = self.venus.with_angle(preset.angle());
            }
            Action::NudgeMonth(m) => self.roemer = self.roemer.with_month(self.roemer.month + m),
            Action::Roemer(preset) => {
                tracing::info!(?preset, "roemer preset");
                self.roemer = self.roemer.with_month(preset.month());
            }
        }
    }

    fn go_to(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        // a page that is not shown keeps no timer alive
        self.pause(self.page);
        tracing::info!(from = ?self.page, to = ?page, "page change");
        self.page = page;
        self.scene = Scene::Main;
        self.status = None;
    }

    fn pause(&mut self, page: Page) {
        match page {
            Page::Jupiter => self.jupiter.clock.playing = false,
            Page::Venus => self.venus.playing = false,
            Page::Roemer => {}
        }
        if let Some(id) = page.timer() {
            self.scheduler.cancel(id);
        }
    }

    fn toggle_play(&mut self, settings: &Settings) {
        let (playing, every) = match self.page {
            Page::Jupiter => {
                self.jupiter.clock.playing = !self.jupiter.clock.playing;
                (self.jupiter.clock.playing, settings.jupiter.tick_ms)
            }
            Page::Venus => {
                self.venus.playing = !self.venus.playing;
                (self.venus.playing, settings.venus.tick_ms)
            }
            Page::Roemer => return,
        };
        let Some(id) = self.page.timer() else {
            return;
        };
        tracing::debug!(page = ?self.page, playing, "play toggled");
        if playing {
            self.scheduler.start(id, Duration::from_millis(every));
        } else {
            self.scheduler.cancel(id);
        }
    }

    /// Feed elapsed wall-clock time to the play timers and apply their ticks.
    pub(crate) fn tick(&mut self, dt: Duration, settings: &Settings) {
        for (id, ticks) in self.scheduler.advance(dt) {
            match id {
                TimerId::Jupiter => {
                    let Some(step) = ChronoDuration::try_minutes(settings.jupiter.step_minutes) else {
                        tracing::warn!(step_minutes = settings.jupiter.step_minutes, "play step out of range");
                        continue;
                    };
                    for _ in 0..ticks {
                        self.jupiter = self.jupiter.advanced(step);
                    }
                }
                TimerId::Venus => {
                    for _ in 0..ticks {
                        self.venus = self.venus.advanced(settings.venus.step_degrees);
                    }
                }
            }
        }
    }
}

/// Compute the visible page's view and hand it to `surface`.
pub(crate) fn render<S: Surface + ?Sized>(state: &AppState, settings: &Settings, surface: &mut S) {
    match state.page {
        Page::Jupiter => surface.jupiter(&jupiter_view(&state.jupiter)),
        Page::Venus => {
            let view = venus_view(
                &state.venus,
                surface.viewport(Panel::Ptolemy),
                surface.viewport(Panel::Copernicus),
            );
            surface.venus(&view);
        }
        Page::Roemer => {
            if let Some(vp) = surface.viewport(Panel::Roemer) {
                surface.roemer(&roemer_geometry(state.roemer.month, vp));
            }
        }
    }

    let entry = match state.scene {
        Scene::DateEntry(ref text) => Some(text.clone()),
        _ => None,
    };
    surface.hud(&Hud {
        page: state.page,
        language: settings.language,
        status: state.status.clone(),
        entry,
        help: state.scene == Scene::Help,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Viewport;
    use crate::jupiter::JupiterView;
    use crate::moons::j2000;
    use crate::roemer::RoemerReading;
    use crate::surface::NullSurface;
    use crate::venus::VenusView;
    use chrono::Utc;

    fn state() -> AppState {
        AppState::new(&Settings::default(), j2000())
    }

    #[derive(Default)]
    struct Recorder {
        roemer_panel: bool,
        jupiter: Vec<JupiterView>,
        venus: Vec<VenusView>,
        roemer: Vec<RoemerReading>,
        huds: Vec<Hud>,
    }

    impl Surface for Recorder {
        fn viewport(&self, panel: Panel) -> Option<Viewport> {
            match panel {
                Panel::Roemer if !self.roemer_panel => None,
                _ => Some(Viewport::new(400.0, 300.0)),
            }
        }
        fn jupiter(&mut self, view: &JupiterView) {
            self.jupiter.push(view.clone());
        }
        fn venus(&mut self, view: &VenusView) {
            self.venus.push(*view);
        }
        fn roemer(&mut self, reading: &RoemerReading) {
            self.roemer.push(*reading);
        }
        fn hud(&mut self, hud: &Hud) {
            self.huds.push(hud.clone());
        }
    }

    #[test]
    fn toggling_play_twice_leaves_no_timer() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::TogglePlay, &s, &Utc);
        assert!(st.jupiter.clock.playing);
        assert_eq!(st.scheduler.active_count(), 1);
        st.apply(Action::TogglePlay, &s, &Utc);
        assert!(!st.jupiter.clock.playing);
        assert_eq!(st.scheduler.active_count(), 0);
    }

    #[test]
    fn jupiter_play_advances_half_an_hour_per_tick() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::TogglePlay, &s, &Utc);
        st.tick(Duration::from_millis(250), &s);
        assert_eq!(st.jupiter.clock.current, j2000() + ChronoDuration::minutes(60));
        // base is untouched by playback
        assert_eq!(st.jupiter.clock.base, j2000());
    }

    #[test]
    fn oversized_play_step_does_not_panic() {
        let mut s = Settings::default();
        s.jupiter.step_minutes = 1_000_000_000_000_000_000;
        let mut st = state();
        st.apply(Action::TogglePlay, &s, &Utc);
        st.tick(Duration::from_millis(100), &s);
        assert_eq!(st.jupiter.clock.current, j2000());

        // in range for TimeDelta but runs off the calendar after a few ticks
        s.jupiter.step_minutes = 100_000_000_000;
        for _ in 0..10 {
            st.tick(Duration::from_millis(100), &s);
        }
        assert!(st.jupiter.clock.current > j2000());
    }

    #[test]
    fn venus_play_wraps_the_drive_angle() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::GoTo(Page::Venus), &s, &Utc);
        st.apply(Action::NudgeVenus(356.0), &s, &Utc);
        st.apply(Action::TogglePlay, &s, &Utc);
        st.tick(Duration::from_millis(150), &s);
        assert_eq!(st.venus.angle, 2.0);
    }

    #[test]
    fn leaving_a_page_pauses_its_widget() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::TogglePlay, &s, &Utc);
        st.apply(Action::NextPage, &s, &Utc);
        assert_eq!(st.page, Page::Venus);
        assert!(!st.jupiter.clock.playing);
        assert_eq!(st.scheduler.active_count(), 0);

        let before = st.jupiter.clock.current;
        st.tick(Duration::from_secs(1), &s);
        assert_eq!(st.jupiter.clock.current, before);
    }

    #[test]
    fn roemer_has_no_play_mode() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::GoTo(Page::Roemer), &s, &Utc);
        st.apply(Action::TogglePlay, &s, &Utc);
        assert_eq!(st.scheduler.active_count(), 0);
    }

    #[test]
    fn date_entry_commit_sets_clock() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::EntryOpen, &s, &Utc);
        assert_eq!(st.scene, Scene::DateEntry("2000-01-01 12:00".into()));
        for _ in 0..16 {
            st.apply(Action::EntryBackspace, &s, &Utc);
        }
        for ch in "1610-01-07 18:00".chars() {
            st.apply(Action::EntryChar(ch), &s, &Utc);
        }
        st.apply(Action::ShiftHours(3), &s, &Utc);
        st.apply(Action::EntryCommit, &s, &Utc);
        assert_eq!(st.scene, Scene::Main);
        assert_eq!(st.jupiter.clock.current, JupiterPreset::Galileo.resolve(&Utc).unwrap());
        assert_eq!(st.jupiter.offset_hours, 0);
        assert!(st.status.is_none());
    }

    #[test]
    fn rejected_entry_keeps_clock_and_reports() {
        let s = Settings::default();
        let mut st = state();
        st.scene = Scene::DateEntry("2024-02-30 10:00".into());
        st.apply(Action::EntryCommit, &s, &Utc);
        assert_eq!(st.jupiter.clock.current, j2000());
        assert_eq!(st.scene, Scene::Main);
        assert!(st.status.as_deref().unwrap_or("").contains("2024-02-30"));
    }

    #[test]
    fn entry_length_is_bounded() {
        let s = Settings::default();
        let mut st = state();
        st.scene = Scene::DateEntry(String::new());
        for _ in 0..40 {
            st.apply(Action::EntryChar('9'), &s, &Utc);
        }
        assert_eq!(st.scene, Scene::DateEntry("9".repeat(ENTRY_MAX)));
    }

    #[test]
    fn presets_set_widget_state() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::Venus(VenusPreset::GreatestElongation), &s, &Utc);
        assert_eq!(st.venus.angle, 90.0);
        st.apply(Action::Roemer(RoemerPreset::Opposition), &s, &Utc);
        assert_eq!(st.roemer.month, 6.0);
        st.apply(Action::NudgeMonth(6.5), &s, &Utc);
        assert_eq!(st.roemer.month, 0.5);
    }

    #[test]
    fn render_skips_absent_panels() {
        let s = Settings::default();
        let mut st = state();
        st.apply(Action::GoTo(Page::Roemer), &s, &Utc);

        let mut rec = Recorder::default();
        render(&st, &s, &mut rec);
        assert!(rec.roemer.is_empty());
        assert_eq!(rec.huds.len(), 1);

        rec.roemer_panel = true;
        render(&st, &s, &mut rec);
        assert_eq!(rec.roemer.len(), 1);
        assert_eq!(rec.roemer[0].delay_text(), "0");

        // a surface without any panels accepts every call
        render(&st, &s, &mut NullSurface);
    }

    #[test]
    fn render_reports_each_page() {
        let s = Settings::default();
        let mut st = state();
        let mut rec = Recorder::default();
        render(&st, &s, &mut rec);
        st.apply(Action::GoTo(Page::Venus), &s, &Utc);
        render(&st, &s, &mut rec);

        assert_eq!(rec.jupiter.len(), 1);
        assert_eq!(rec.jupiter[0].moons.len(), 4);
        assert_eq!(rec.venus.len(), 1);
        assert!(rec.venus[0].ptolemy.is_some() && rec.venus[0].copernicus.is_some());
        assert_eq!(rec.huds[1].page, Page::Venus);
    }
}
