use crate::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_event_to_action};
use crate::logging::init_logging;
use crate::model::AppState;
use crate::render::{build_stars, Star, Terminal, TerminalSurface};
use crate::sim::{render, Action};
use chrono::{Local, Utc};
use std::time::{Duration, Instant};

const STAR_SEED: u64 = 0x1610_0107;

pub(crate) struct App {
    settings: Settings,
    state: AppState,
    paths: Paths,
    term: Terminal,
    stars: Vec<Star>,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        let settings = load_settings(&paths.settings_path);
        init_logging(&paths.log_dir, &settings.log_level)?;
        tracing::info!(path = %paths.settings_path.display(), language = ?settings.language, "starting");

        let state = AppState::new(&settings, Utc::now());
        let term = Terminal::begin()?;
        let stars = build_stars(term.cols, term.rows, STAR_SEED);

        Ok(Self {
            settings,
            state,
            paths,
            term,
            stars,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let mut last_frame = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();
            if self.term.resize_if_needed()? {
                tracing::debug!(cols = self.term.cols, rows = self.term.rows, "resized");
                self.stars = build_stars(self.term.cols, self.term.rows, STAR_SEED);
            }

            // input
            for ev in collect_input_nonblocking(frame_dt)? {
                let Some(action) = map_event_to_action(self.state.page, &self.state.scene, ev) else {
                    continue;
                };
                if action == Action::Quit {
                    self.should_quit = true;
                    break;
                }
                self.state.apply(action, &self.settings, &Local);
            }

            // play timers
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            self.state.tick(real_dt, &self.settings);

            self.render_frame()?;
            spin_sleep(frame_dt, frame_start);
        }

        self.settings.show_labels = self.state.jupiter.show_labels;
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear();
        {
            let mut surface = TerminalSurface::new(&mut self.term.cur, &self.stars, &self.settings);
            render(&self.state, &self.settings, &mut surface);
        }
        self.term.present(true)
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    let result = app.run();
    app.term.end()?;
    save_settings_atomic(&app.paths.settings_path, &app.settings)?;
    tracing::info!("stopped");
    result
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
