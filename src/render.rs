use crate::config::{Language, Settings};
use crate::geom::{deg, on_circle, Vec2, Viewport};
use crate::jupiter::JupiterView;
use crate::model::Page;
use crate::moons::{Moon, JUPITER_RADIUS};
use crate::roemer::RoemerReading;
use crate::surface::{Hud, Panel, Surface};
use crate::venus::{VenusAppearance, VenusView};
use chrono::{DateTime, Local, Locale, TimeZone};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::TAU;
use std::fmt::Display;
use std::io::{self, Write};

/// Width, in display units, that every widget panel is laid out at. Panels are
/// scaled to the terminal afterwards so the widget constants keep their size.
const PANEL_UNITS: f64 = 400.0;
/// Half-width of the Jupiter system in display units (Callisto plus margin).
const SYSTEM_HALF_SPAN: f64 = 210.0;
const HUD_W: u16 = 34;

const BG: Color = Color::Black;
const FG: Color = Color::Rgb { r: 220, g: 228, b: 240 };
const DIM: Color = Color::Rgb { r: 130, g: 140, b: 160 };
const EDGE: Color = Color::Rgb { r: 80, g: 95, b: 120 };
const ORBIT: Color = Color::Rgb { r: 70, g: 80, b: 100 };

const SUN: (u8, u8, u8) = (255, 214, 110);
const EARTH: (u8, u8, u8) = (90, 170, 255);
const JUPITER_BANDS: [(u8, u8, u8); 3] = [(200, 150, 105), (230, 200, 160), (175, 120, 85)];
const VENUS_LIT: (u8, u8, u8) = (255, 236, 180);
const VENUS_DARK: (u8, u8, u8) = (60, 56, 70);
const LIGHT: (u8, u8, u8) = (255, 240, 150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: BG,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn put(&mut self, x: u16, y: u16, ch: char, fg: Color) {
        self.set(x, y, Cell { ch, fg, bg: BG });
    }

    /// Only writes over empty cells.
    fn put_under(&mut self, x: u16, y: u16, ch: char, fg: Color) {
        if self.get(x, y).is_some_and(|c| c.ch == ' ') {
            self.put(x, y, ch, fg);
        }
    }

    fn write_str(&mut self, x: u16, y: u16, max_w: u16, s: &str, fg: Color) {
        for (i, ch) in s.chars().take(max_w as usize).enumerate() {
            self.put(x.saturating_add(i as u16), y, ch, fg);
        }
    }

    fn box_draw(&mut self, r: Rect, fg: Color) {
        if r.w < 2 || r.h < 2 {
            return;
        }
        let x1 = r.x + r.w - 1;
        let y1 = r.y + r.h - 1;
        for x in r.x + 1..x1 {
            self.put(x, r.y, '─', fg);
            self.put(x, y1, '─', fg);
        }
        for y in r.y + 1..y1 {
            self.put(r.x, y, '│', fg);
            self.put(x1, y, '│', fg);
        }
        self.put(r.x, r.y, '┌', fg);
        self.put(x1, r.y, '┐', fg);
        self.put(r.x, y1, '└', fg);
        self.put(x1, y1, '┘', fg);
    }

    fn fill(&mut self, r: Rect) {
        for y in r.y..r.y + r.h {
            for x in r.x..r.x + r.w {
                self.set(x, y, Cell::default());
            }
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        execute!(self.out, terminal::Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Starfield backdrop
------------------------------ */

#[derive(Clone, Copy, Debug)]
pub(crate) struct Star {
    x: u16,
    y: u16,
    depth: f32,
}

pub(crate) fn build_stars(w: u16, h: u16, seed: u64) -> Vec<Star> {
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed ^ ((w as u64) << 32) ^ h as u64);
    let count = ((w as usize * h as usize) / 60).clamp(20, 240);
    (0..count)
        .map(|_| Star {
            x: rng.gen_range(0..w),
            y: rng.gen_range(0..h),
            depth: rng.gen_range(0.3..1.0),
        })
        .collect()
}

/* -----------------------------
   Braille encoding: 2×4 dots per cell
------------------------------ */

fn braille_from_2x4(bits: [[bool; 2]; 4]) -> char {
    let mut mask = 0u32;
    if bits[0][0] { mask |= 1 << 0; }
    if bits[1][0] { mask |= 1 << 1; }
    if bits[2][0] { mask |= 1 << 2; }
    if bits[0][1] { mask |= 1 << 3; }
    if bits[1][1] { mask |= 1 << 4; }
    if bits[2][1] { mask |= 1 << 5; }
    if bits[3][0] { mask |= 1 << 6; }
    if bits[3][1] { mask |= 1 << 7; }
    char::from_u32(0x2800 + mask).unwrap_or(' ')
}

/* -----------------------------
   Layout
------------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) w: u16,
    pub(crate) h: u16,
}

impl Rect {
    fn inset(self, d: u16) -> Rect {
        Rect {
            x: self.x + d,
            y: self.y + d,
            w: self.w.saturating_sub(2 * d),
            h: self.h.saturating_sub(2 * d),
        }
    }

    fn split_cols(self) -> (Rect, Rect) {
        let lw = self.w / 2;
        (
            Rect { w: lw, ..self },
            Rect {
                x: self.x + lw,
                w: self.w - lw,
                ..self
            },
        )
    }

    /// Top part gets `frac` of the rows.
    fn split_rows(self, frac: f64) -> (Rect, Rect) {
        let th = ((self.h as f64) * frac).round() as u16;
        let th = th.min(self.h);
        (
            Rect { h: th, ..self },
            Rect {
                y: self.y + th,
                h: self.h - th,
                ..self
            },
        )
    }

    fn center(self) -> (f64, f64) {
        (self.x as f64 + self.w as f64 / 2.0, self.y as f64 + self.h as f64 / 2.0)
    }
}

/// Maps display units of a [`Viewport`] onto a cell rectangle. Terminal cells
/// are about twice as tall as wide, so y is halved.
#[derive(Clone, Copy, Debug)]
struct Projection {
    rect: Rect,
    scale: f64,
}

impl Projection {
    fn for_panel(rect: Rect) -> Self {
        Self {
            rect,
            scale: rect.w as f64 / PANEL_UNITS,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(PANEL_UNITS, self.rect.h as f64 * 2.0 / self.scale)
    }

    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let x = self.rect.x as f64 + p.x * self.scale;
        let y = self.rect.y as f64 + p.y * self.scale / 2.0;
        let inside = x >= self.rect.x as f64
            && y >= self.rect.y as f64
            && x < (self.rect.x + self.rect.w) as f64
            && y < (self.rect.y + self.rect.h) as f64;
        inside.then(|| (x as u16, y as u16))
    }
}

pub(crate) struct TerminalSurface<'a> {
    buf: &'a mut CellBuffer,
    stars: &'a [Star],
    enable_color: bool,
    language: Language,
    offset_range: f64,
    main: Rect,
    hud: Rect,
}

impl<'a> TerminalSurface<'a> {
    pub(crate) fn new(buf: &'a mut CellBuffer, stars: &'a [Star], settings: &Settings) -> Self {
        let hud_w = HUD_W.min(buf.w / 2);
        let main = Rect {
            x: 0,
            y: 0,
            w: buf.w - hud_w,
            h: buf.h,
        };
        let hud = Rect {
            x: main.w,
            y: 0,
            w: hud_w,
            h: buf.h,
        };
        Self {
            buf,
            stars,
            enable_color: settings.enable_color,
            language: settings.language,
            offset_range: settings.jupiter.offset_range_hours.max(1) as f64,
            main,
            hud,
        }
    }

    fn color(&self, rgb: (u8, u8, u8)) -> Color {
        if self.enable_color {
            Color::Rgb { r: rgb.0, g: rgb.1, b: rgb.2 }
        } else {
            Color::White
        }
    }

    fn faded(&self, rgb: (u8, u8, u8), opacity: f64) -> Color {
        let k = opacity.clamp(0.0, 1.0);
        if !self.enable_color {
            return if k < 0.5 { Color::DarkGrey } else { Color::White };
        }
        let f = |c: u8| (c as f64 * k).round() as u8;
        Color::Rgb { r: f(rgb.0), g: f(rgb.1), b: f(rgb.2) }
    }

    /// Venus columns: title row, diagram, disk.
    fn venus_layout(&self, panel: Panel) -> Option<(Rect, Rect)> {
        let (left, right) = self.main.split_cols();
        let col = match panel {
            Panel::Ptolemy => left,
            Panel::Copernicus => right,
            Panel::Roemer => return None,
        }
        .inset(1);
        let body = Rect {
            y: col.y + 1,
            h: col.h.saturating_sub(1),
            ..col
        };
        let (diagram, disk) = body.split_rows(0.55);
        (diagram.w >= 16 && diagram.h >= 6 && disk.h >= 5).then_some((diagram, disk))
    }

    fn panel_rect(&self, panel: Panel) -> Option<Rect> {
        match panel {
            Panel::Ptolemy | Panel::Copernicus => self.venus_layout(panel).map(|(d, _)| d),
            Panel::Roemer => {
                let r = self.main.inset(1);
                (r.w >= 20 && r.h >= 8).then_some(r)
            }
        }
    }

    fn draw_stars(&mut self, area: Rect) {
        for s in self.stars {
            if s.x < area.x || s.y < area.y || s.x >= area.x + area.w || s.y >= area.y + area.h {
                continue;
            }
            let c = (40.0 + s.depth * 120.0) as u8;
            let ch = if s.depth > 0.85 { '•' } else { '·' };
            let fg = if self.enable_color {
                Color::Rgb { r: c, g: c, b: c.saturating_add(25) }
            } else {
                Color::DarkGrey
            };
            self.buf.put(s.x, s.y, ch, fg);
        }
    }

    fn dotted_circle(&mut self, proj: &Projection, center: Vec2, r: f64, fg: Color) {
        let steps = ((r * proj.scale) * 6.0).max(24.0) as usize;
        for s in 0..steps {
            let p = on_circle(center, r, TAU * s as f64 / steps as f64);
            if let Some((x, y)) = proj.cell(p) {
                if s % 2 == 0 {
                    self.buf.put_under(x, y, '·', fg);
                }
            }
        }
    }

    fn body(&mut self, proj: &Projection, p: Vec2, ch: char, fg: Color, label: Option<&str>) {
        if let Some((x, y)) = proj.cell(p) {
            self.buf.put(x, y, ch, fg);
            if let Some(label) = label {
                let room = (proj.rect.x + proj.rect.w).saturating_sub(x + 2);
                self.buf.write_str(x + 2, y, room, label, DIM);
            }
        }
    }

    fn disk(&mut self, area: Rect, a: &VenusAppearance) {
        let sub_w = area.w as f64 * 2.0;
        let sub_h = area.h as f64 * 4.0;
        let r_max = (sub_w.min(sub_h) / 2.0 - 1.0).max(1.0);
        let r = (r_max * a.size.clamp(0.05, 1.0)).max(1.0);
        let (cx, cy) = (sub_w / 2.0, sub_h / 2.0);
        let lit = self.color(VENUS_LIT);
        let dark = self.faded(VENUS_DARK, 1.0);

        for row in 0..area.h {
            for col in 0..area.w {
                let mut lit_bits = [[false; 2]; 4];
                let mut dark_bits = [[false; 2]; 4];
                let (mut any_lit, mut any_dark) = (false, false);
                for (dy, (lit_row, dark_row)) in lit_bits.iter_mut().zip(dark_bits.iter_mut()).enumerate() {
                    for dx in 0..2 {
                        let px = (col as f64) * 2.0 + dx as f64 + 0.5;
                        let py = (row as f64) * 4.0 + dy as f64 + 0.5;
                        let nx = (px - cx) / r;
                        let ny = (py - cy) / r;
                        if nx * nx + ny * ny > 1.0 {
                            continue;
                        }
                        if a.shadow.covers(nx, ny) {
                            dark_row[dx] = true;
                            any_dark = true;
                        } else {
                            lit_row[dx] = true;
                            any_lit = true;
                        }
                    }
                }
                let (x, y) = (area.x + col, area.y + row);
                if any_lit {
                    self.buf.put(x, y, braille_from_2x4(lit_bits), lit);
                } else if any_dark {
                    self.buf.put(x, y, braille_from_2x4(dark_bits), dark);
                }
            }
        }
    }

    fn hud_lines(&mut self, y0: u16, lines: &[(String, Color)]) -> u16 {
        let inner = self.hud.inset(1);
        let mut y = y0;
        for (line, fg) in lines {
            if y >= inner.y + inner.h {
                break;
            }
            self.buf.write_str(inner.x + 1, y, inner.w.saturating_sub(1), line, *fg);
            y += 1;
        }
        y
    }

    fn center_box(&mut self, title: &str, body: &[String]) {
        let w = self.buf.w;
        let h = self.buf.h;
        let bw = 56.min(w.saturating_sub(4));
        let bh = (body.len() as u16 + 4).min(h.saturating_sub(2));
        if bw < 10 || bh < 4 {
            return;
        }
        let r = Rect {
            x: (w - bw) / 2,
            y: (h - bh) / 2,
            w: bw,
            h: bh,
        };
        self.buf.fill(r);
        self.buf.box_draw(r, FG);
        self.buf.write_str(r.x + 2, r.y + 1, bw - 4, title, FG);
        for (i, line) in body.iter().enumerate() {
            let y = r.y + 3 + i as u16;
            if y >= r.y + r.h - 1 {
                break;
            }
            self.buf.write_str(r.x + 2, y, bw - 4, line, DIM);
        }
    }
}

/// HUD wording that follows the configured language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Term {
    Offset,
    Angle,
    Month,
    Distance,
    LightTime,
    Delay,
    Behind,
    FarSide,
    Earth,
    Sun,
    Geocentric,
    Heliocentric,
    GeocentricTitle,
    HeliocentricTitle,
}

impl Term {
    fn text(self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Danish, Term::Offset) => "Forskydning",
            (Language::Danish, Term::Angle) => "Vinkel",
            (Language::Danish, Term::Month) => "Måned",
            (Language::Danish, Term::Distance) => "Afstand",
            (Language::Danish, Term::LightTime) => "Lystid",
            (Language::Danish, Term::Delay) => "Forsinkelse",
            (Language::Danish, Term::Behind) => "skjult",
            (Language::Danish, Term::FarSide) => "bagved",
            (Language::Danish, Term::Earth) => "Jorden",
            (Language::Danish, Term::Sun) => "Solen",
            (Language::Danish, Term::Geocentric) => "Ptolemæus",
            (Language::Danish, Term::Heliocentric) => "Kopernikus",
            (Language::Danish, Term::GeocentricTitle) => "Ptolemæus (geocentrisk)",
            (Language::Danish, Term::HeliocentricTitle) => "Kopernikus (heliocentrisk)",
            (Language::English, Term::Offset) => "Offset",
            (Language::English, Term::Angle) => "Angle",
            (Language::English, Term::Month) => "Month",
            (Language::English, Term::Distance) => "Distance",
            (Language::English, Term::LightTime) => "Light time",
            (Language::English, Term::Delay) => "Delay",
            (Language::English, Term::Behind) => "hidden",
            (Language::English, Term::FarSide) => "far side",
            (Language::English, Term::Earth) => "Earth",
            (Language::English, Term::Sun) => "Sun",
            (Language::English, Term::Geocentric) => "Ptolemy",
            (Language::English, Term::Heliocentric) => "Copernicus",
            (Language::English, Term::GeocentricTitle) => "Ptolemy (geocentric)",
            (Language::English, Term::HeliocentricTitle) => "Copernicus (heliocentric)",
        }
    }
}

fn date_text<Tz: TimeZone>(t: &DateTime<Tz>, lang: Language) -> String
where
    Tz::Offset: Display,
{
    match lang {
        Language::Danish => t.format_localized("%-d. %b %Y %H:%M", Locale::da_DK).to_string(),
        Language::English => t.format("%-d %b %Y %H:%M").to_string(),
    }
}

fn play_label(lang: Language, playing: bool) -> &'static str {
    match (lang, playing) {
        (_, true) => "Pause",
        (Language::Danish, false) => "Afspil",
        (Language::English, false) => "Play",
    }
}

fn slider(value: f64, min: f64, max: f64, width: usize) -> String {
    let width = width.max(3);
    let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
    let knob = (t * (width - 1) as f64).round() as usize;
    (0..width).map(|i| if i == knob { '◆' } else { '─' }).collect()
}

impl Surface for TerminalSurface<'_> {
    fn viewport(&self, panel: Panel) -> Option<Viewport> {
        self.panel_rect(panel)
            .map(|r| Projection::for_panel(r).viewport())
    }

    fn jupiter(&mut self, view: &JupiterView) {
        let area = self.main.inset(1);
        if area.w < 20 || area.h < 6 {
            return;
        }
        self.draw_stars(area);

        let (cx, cy) = area.center();
        let scale = (area.w as f64 / 2.0 - 1.0) / SYSTEM_HALF_SPAN;
        let to_cell = |p: Vec2| -> Option<(u16, u16)> {
            let x = cx + p.x * scale;
            let y = cy + p.y * scale / 2.0;
            let inside = x >= area.x as f64
                && y >= area.y as f64
                && x < (area.x + area.w) as f64
                && y < (area.y + area.h) as f64;
            inside.then(|| (x as u16, y as u16))
        };

        let (behind, front): (Vec<_>, Vec<_>) = view
            .moons
            .iter()
            .map(|s| (to_cell(s.offset), s))
            .partition(|(_, s)| s.is_behind);

        for (cell, s) in &behind {
            if let Some((x, y)) = *cell {
                let fg = self.faded(s.moon.orbit().rgb, s.opacity);
                self.buf.put(x, y, '●', fg);
            }
        }

        // Jupiter's disk, banded
        let rx = JUPITER_RADIUS * scale;
        let ry = rx / 2.0;
        let y_lo = (cy - ry).floor().max(area.y as f64) as u16;
        let y_hi = (cy + ry).ceil().min((area.y + area.h) as f64) as u16;
        let x_lo = (cx - rx).floor().max(area.x as f64) as u16;
        let x_hi = (cx + rx).ceil().min((area.x + area.w) as f64) as u16;
        for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                let nx = (x as f64 + 0.5 - cx) / rx.max(0.5);
                let ny = (y as f64 + 0.5 - cy) / ry.max(0.5);
                if nx * nx + ny * ny <= 1.0 {
                    let band = self.color(JUPITER_BANDS[(y - y_lo) as usize % JUPITER_BANDS.len()]);
                    self.buf.put(x, y, '█', band);
                }
            }
        }

        for (cell, s) in &front {
            if let Some((x, y)) = *cell {
                let fg = self.faded(s.moon.orbit().rgb, s.opacity);
                self.buf.put(x, y, '●', fg);
            }
        }

        if view.show_labels {
            for s in &view.moons {
                if let Some((x, y)) = to_cell(s.offset) {
                    let label = short_name(s.moon);
                    let ly = if y > area.y { y - 1 } else { y + 1 };
                    let lx = x.saturating_sub(label.len() as u16 / 2).max(area.x);
                    self.buf.write_str(lx, ly, (area.x + area.w).saturating_sub(lx), label, DIM);
                }
            }
        }

        let lang = self.language;
        let local = view.time.with_timezone(&Local);
        let slider_w = self.hud.w.saturating_sub(6) as usize;
        let mut lines = vec![
            (Page::Jupiter.title(lang).to_string(), FG),
            (date_text(&local, lang), FG),
            (format!("{}: {:+} h", Term::Offset.text(lang), view.offset_hours), DIM),
            (slider(view.offset_hours as f64, -self.offset_range, self.offset_range, slider_w), DIM),
            (format!("{}: {}°", Term::Angle.text(lang), view.angle_text()), DIM),
            (format!("[ {} ]", play_label(lang, view.playing)), FG),
            (String::new(), DIM),
        ];
        for s in &view.moons {
            let mark = match (s.is_behind, s.far_side) {
                (true, _) => format!(" ({})", Term::Behind.text(lang)),
                (false, true) => format!(" ({})", Term::FarSide.text(lang)),
                (false, false) => String::new(),
            };
            lines.push((format!("{:<9}{:>+7.1}{}", s.moon.name(), s.x, mark), DIM));
        }
        let y0 = self.hud.y + 1;
        let y = self.hud_lines(y0, &lines);
        let controls = [
            "Space play/pause".to_string(),
            "←/→ ±1 h  ↓/↑ ±1 day".to_string(),
            "[/] rotate  L labels".to_string(),
            "G Galileo 1610  N now".to_string(),
            "D enter date/time".to_string(),
        ];
        let lines: Vec<(String, Color)> = controls.into_iter().map(|c| (c, DIM)).collect();
        self.hud_lines(y + 1, &lines);
    }

    fn venus(&mut self, view: &VenusView) {
        let lang = self.language;
        let (left, right) = self.main.split_cols();

        if let (Some(v), Some((diagram, disk))) = (view.ptolemy, self.venus_layout(Panel::Ptolemy)) {
            let title = left.inset(1);
            self.buf.write_str(title.x, title.y, title.w, Term::GeocentricTitle.text(lang), FG);
            let proj = Projection::for_panel(diagram);
            self.dotted_circle(&proj, v.earth, v.deferent_radius, ORBIT);
            self.dotted_circle(&proj, v.epicycle_center, v.epicycle_radius, ORBIT);
            self.body(&proj, v.earth, '◉', self.color(EARTH), Some(Term::Earth.text(lang)));
            self.body(&proj, v.sun, '●', self.color(SUN), Some(Term::Sun.text(lang)));
            self.body(&proj, v.venus, '●', self.color(VENUS_LIT), None);
            self.venus_disk(disk, &v.appearance, lang);
        }

        if let (Some(v), Some((diagram, disk))) = (view.copernicus, self.venus_layout(Panel::Copernicus)) {
            let title = right.inset(1);
            self.buf.write_str(title.x, title.y, title.w, Term::HeliocentricTitle.text(lang), FG);
            let proj = Projection::for_panel(diagram);
            self.dotted_circle(&proj, v.sun, v.venus_orbit, ORBIT);
            self.dotted_circle(&proj, v.sun, v.earth_orbit, ORBIT);
            self.body(&proj, v.sun, '●', self.color(SUN), Some(Term::Sun.text(lang)));
            self.body(&proj, v.earth, '◉', self.color(EARTH), Some(Term::Earth.text(lang)));
            self.body(&proj, v.venus, '●', self.color(VENUS_LIT), None);
            self.venus_disk(disk, &v.appearance, lang);
        }

        let slider_w = self.hud.w.saturating_sub(6) as usize;
        let mut lines = vec![
            (Page::Venus.title(lang).to_string(), FG),
            (format!("{}: {:.0}°", Term::Angle.text(lang), view.angle), DIM),
            (slider(view.angle, 0.0, 360.0, slider_w), DIM),
            (format!("[ {} ]", play_label(lang, view.playing)), FG),
            (String::new(), DIM),
        ];
        if let Some(p) = view.ptolemy {
            lines.push((format!("{}: {}", Term::Geocentric.text(lang), p.appearance.phase_label(lang)), DIM));
        }
        if let Some(c) = view.copernicus {
            lines.push((format!("{}: {}", Term::Heliocentric.text(lang), c.appearance.phase_label(lang)), DIM));
        }
        lines.push((String::new(), DIM));
        for c in [
            "Space play/pause",
            "←/→ ±2°",
            "I inferior conj. (0°)",
            "E elongation (90°)",
            "S superior conj. (180°)",
        ] {
            lines.push((c.to_string(), DIM));
        }
        self.hud_lines(self.hud.y + 1, &lines);
    }

    fn roemer(&mut self, r: &RoemerReading) {
        let Some(rect) = self.panel_rect(Panel::Roemer) else {
            return;
        };
        let lang = self.language;
        self.draw_stars(rect);
        let proj = Projection::for_panel(rect);
        self.dotted_circle(&proj, r.sun, r.earth_orbit, ORBIT);
        self.dotted_circle(&proj, r.sun, r.jupiter_orbit, ORBIT);

        let light = self.color(LIGHT);
        let steps = (r.ray.length * proj.scale * 2.0).max(2.0) as usize;
        for i in 1..steps {
            let t = i as f64 / steps as f64;
            let p = on_circle(r.ray.origin, r.ray.length * t, deg(r.ray.angle_deg));
            if let Some((x, y)) = proj.cell(p) {
                self.buf.put(x, y, '·', light);
            }
        }

        self.body(&proj, r.sun, '●', self.color(SUN), None);
        self.body(&proj, r.earth, '◉', self.color(EARTH), Some(Term::Earth.text(lang)));
        self.body(&proj, r.jupiter, '●', self.color(JUPITER_BANDS[0]), Some("Jupiter"));

        let slider_w = self.hud.w.saturating_sub(6) as usize;
        let lines = vec![
            (Page::Roemer.title(lang).to_string(), FG),
            (format!("{}: {:.1}", Term::Month.text(lang), r.month), DIM),
            (slider(r.month, 0.0, 12.0, slider_w), DIM),
            (String::new(), DIM),
            (format!("{}: {} AU", Term::Distance.text(lang), r.distance_text()), FG),
            (format!("{}: {} min", Term::LightTime.text(lang), r.time_text()), FG),
            (format!("{}: {} min", Term::Delay.text(lang), r.delay_text()), FG),
            (String::new(), DIM),
            ("←/→ ±0.1 month  ↓/↑ ±1".to_string(), DIM),
            ("O opposition (6)".to_string(), DIM),
            ("C conjunction (0)".to_string(), DIM),
        ];
        self.hud_lines(self.hud.y + 1, &lines);
    }

    fn hud(&mut self, hud: &Hud) {
        if self.hud.w < 4 {
            return;
        }
        self.buf.box_draw(self.hud, EDGE);

        let tabs: Vec<String> = Page::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mark = if *p == hud.page { '*' } else { ' ' };
                format!("{}{}", mark, i + 1)
            })
            .collect();
        let bottom = self.hud.y + self.hud.h.saturating_sub(2);
        let inner_w = self.hud.w.saturating_sub(3);
        self.buf
            .write_str(self.hud.x + 2, bottom, inner_w, &format!("{}  H help  Q quit", tabs.join(" ")), DIM);
        if let Some(status) = &hud.status {
            self.buf.write_str(self.hud.x + 2, bottom.saturating_sub(1), inner_w, status, Color::Red);
        }

        if let Some(entry) = &hud.entry {
            self.center_box(
                "Date and time",
                &[
                    "YYYY-MM-DD HH:MM (local time)".to_string(),
                    String::new(),
                    format!("> {}_", entry),
                    String::new(),
                    "Enter set | Esc cancel | Backspace delete".to_string(),
                ],
            );
        } else if hud.help {
            let lang = match hud.language {
                Language::Danish => "Dansk",
                Language::English => "English",
            };
            self.center_box(
                "Himlen",
                &[
                    "1 Jupiter's moons: moon offsets seen edge-on.".to_string(),
                    "2 Venus: the Ptolemaic model never shows a full".to_string(),
                    "  disk; the Copernican one runs from new to full.".to_string(),
                    "3 Rømer: light from Jupiter takes longer when".to_string(),
                    "  Earth is on the far side of the Sun.".to_string(),
                    String::new(),
                    "Tab next page | Space play/pause | Esc close".to_string(),
                    format!("Labels: {}", lang),
                ],
            );
        }
    }
}

impl TerminalSurface<'_> {
    fn venus_disk(&mut self, area: Rect, a: &VenusAppearance, lang: Language) {
        let labels = Rect {
            y: area.y + area.h.saturating_sub(2),
            h: 2.min(area.h),
            ..area
        };
        let disk_area = Rect {
            h: area.h.saturating_sub(2),
            ..area
        };
        self.disk(disk_area, a);
        self.buf.write_str(labels.x, labels.y, labels.w, &a.phase_label(lang), FG);
        self.buf
            .write_str(labels.x, labels.y + 1, labels.w, a.size_class.label(lang), DIM);
    }
}

fn short_name(moon: Moon) -> &'static str {
    match moon {
        Moon::Io => "I",
        Moon::Europa => "E",
        Moon::Ganymede => "G",
        Moon::Callisto => "C",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jupiter::{jupiter_view, JupiterState};
    use crate::model::AppState;
    use crate::moons::j2000;
    use crate::sim::{render, Action};
    use crate::venus::VenusPreset;
    use chrono::Utc;

    fn text(buf: &CellBuffer) -> String {
        buf.cells.iter().map(|c| c.ch).collect()
    }

    #[test]
    fn braille_maps_dots_to_codepoints() {
        let mut bits = [[false; 2]; 4];
        assert_eq!(braille_from_2x4(bits), '\u{2800}');
        bits[0][0] = true;
        bits[3][1] = true;
        assert_eq!(braille_from_2x4(bits), '\u{2881}');
    }

    #[test]
    fn tiny_terminal_skips_panels() {
        let settings = Settings::default();
        let mut buf = CellBuffer::new(12, 4);
        let surface = TerminalSurface::new(&mut buf, &[], &settings);
        assert!(surface.viewport(Panel::Roemer).is_none());
        assert!(surface.viewport(Panel::Ptolemy).is_none());
    }

    #[test]
    fn panel_viewport_keeps_layout_width() {
        let settings = Settings::default();
        let mut buf = CellBuffer::new(120, 40);
        let surface = TerminalSurface::new(&mut buf, &[], &settings);
        let vp = surface.viewport(Panel::Roemer).unwrap();
        assert_eq!(vp.width, PANEL_UNITS);
        assert!(vp.height > 0.0);
    }

    #[test]
    fn jupiter_page_draws_disk_and_hud() {
        let settings = Settings::default();
        let mut buf = CellBuffer::new(120, 40);
        let view = jupiter_view(&JupiterState::new(j2000(), true));
        let mut surface = TerminalSurface::new(&mut buf, &[], &settings);
        surface.jupiter(&view);
        let t = text(&buf);
        assert!(t.contains('█'));
        assert!(t.contains("Jupiters måner"));
        assert!(t.contains("Forskydning: +0 h"));
        assert!(t.contains("Afspil"));
    }

    #[test]
    fn venus_page_shows_both_models() {
        let settings = Settings::default();
        let mut st = AppState::new(&settings, j2000());
        st.apply(Action::GoTo(Page::Venus), &settings, &Utc);
        st.apply(Action::Venus(VenusPreset::GreatestElongation), &settings, &Utc);

        let mut buf = CellBuffer::new(140, 48);
        {
            let mut surface = TerminalSurface::new(&mut buf, &[], &settings);
            render(&st, &settings, &mut surface);
        }
        let t = text(&buf);
        assert!(t.contains("Ptolemæus (geocentrisk)"));
        assert!(t.contains("Kopernikus (heliocentrisk)"));
        assert!(t.chars().any(|c| ('\u{2801}'..='\u{28ff}').contains(&c)));
    }

    fn roemer_text(language: Language) -> String {
        let settings = Settings {
            language,
            ..Settings::default()
        };
        let mut st = AppState::new(&settings, j2000());
        st.apply(Action::GoTo(Page::Roemer), &settings, &Utc);
        let mut buf = CellBuffer::new(120, 40);
        {
            let mut surface = TerminalSurface::new(&mut buf, &[], &settings);
            render(&st, &settings, &mut surface);
        }
        text(&buf)
    }

    #[test]
    fn roemer_page_prints_delay_in_either_language() {
        let da = roemer_text(Language::Danish);
        assert!(da.contains("Forsinkelse: 0 min"));
        assert!(da.contains("Afstand: 4.2 AU"));
        assert!(!da.contains("Distance"));

        let en = roemer_text(Language::English);
        assert!(en.contains("Delay: 0 min"));
        assert!(en.contains("Distance: 4.2 AU"));
        assert!(en.contains("Month: 0.0"));
    }

    #[test]
    fn dates_use_the_language_month_names() {
        let t = Utc.with_ymd_and_hms(2024, 5, 7, 18, 0, 0).unwrap();
        assert_eq!(date_text(&t, Language::English), "7 May 2024 18:00");
        let da = date_text(&t, Language::Danish);
        assert!(da.starts_with("7. "));
        assert!(da.contains("maj"));
        assert!(da.ends_with("2024 18:00"));
    }

    #[test]
    fn slider_knob_tracks_value() {
        assert_eq!(slider(0.0, 0.0, 10.0, 5), "◆────");
        assert_eq!(slider(10.0, 0.0, 10.0, 5), "────◆");
        assert_eq!(slider(99.0, 0.0, 10.0, 5), "────◆");
    }
}
