//! Venus phases under the Ptolemaic and Copernican models.
//!
//! One drive angle feeds both models. The Ptolemaic phase and size are plain
//! functions of the epicycle angle and never reach a full disk; the Copernican
//! ones come from the actual Sun/Venus/Earth geometry.

use crate::config::Language;
use crate::geom::{deg, on_circle, Vec2, Viewport};

const DEFERENT_SCALE: f64 = 0.35;
const SUN_RATE: f64 = 0.3;
const EPICYCLE_RADIUS: f64 = 25.0;
const EPICYCLE_RATE: f64 = 2.0;
const EPICYCLE_TILT: f64 = 0.3;

const VENUS_ORBIT_SCALE: f64 = 0.18;
const EARTH_ORBIT_SCALE: f64 = 0.32;
/// Earth's angular rate relative to Venus (ratio of the orbital periods).
const EARTH_RATE: f64 = 0.615;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VenusState {
    /// Degrees, kept in `[0, 360)`.
    pub(crate) angle: f64,
    pub(crate) playing: bool,
}

impl Default for VenusState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            playing: false,
        }
    }
}

impl VenusState {
    pub(crate) fn with_angle(self, angle: f64) -> Self {
        Self {
            angle: angle.rem_euclid(360.0),
            ..self
        }
    }

    pub(crate) fn advanced(self, step_degrees: f64) -> Self {
        self.with_angle(self.angle + step_degrees)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VenusPreset {
    InferiorConjunction,
    GreatestElongation,
    SuperiorConjunction,
}

impl VenusPreset {
    pub(crate) fn angle(self) -> f64 {
        match self {
            VenusPreset::InferiorConjunction => 0.0,
            VenusPreset::GreatestElongation => 90.0,
            VenusPreset::SuperiorConjunction => 180.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PhaseName {
    New,
    Crescent,
    Half,
    Gibbous,
    Full,
}

impl PhaseName {
    pub(crate) fn from_phase(phase: f64) -> Self {
        if phase < 0.1 {
            PhaseName::New
        } else if phase < 0.35 {
            PhaseName::Crescent
        } else if phase < 0.65 {
            PhaseName::Half
        } else if phase < 0.9 {
            PhaseName::Gibbous
        } else {
            PhaseName::Full
        }
    }

    pub(crate) fn label(self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Danish, PhaseName::New) => "Ny",
            (Language::Danish, PhaseName::Crescent) => "Segl",
            (Language::Danish, PhaseName::Half) => "Halvt oplyst",
            (Language::Danish, PhaseName::Gibbous) => "Trekvart",
            (Language::Danish, PhaseName::Full) => "Fuld",
            (Language::English, PhaseName::New) => "New",
            (Language::English, PhaseName::Crescent) => "Crescent",
            (Language::English, PhaseName::Half) => "Half",
            (Language::English, PhaseName::Gibbous) => "Gibbous",
            (Language::English, PhaseName::Full) => "Full",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SizeClass {
    Large,
    Medium,
    Small,
}

impl SizeClass {
    pub(crate) fn from_size(size: f64) -> Self {
        if size > 0.7 {
            SizeClass::Large
        } else if size > 0.5 {
            SizeClass::Medium
        } else {
            SizeClass::Small
        }
    }

    pub(crate) fn label(self, lang: Language) -> &'static str {
        match (lang, self) {
            (Language::Danish, SizeClass::Large) => "Stor (tæt på)",
            (Language::Danish, SizeClass::Medium) => "Mellem",
            (Language::Danish, SizeClass::Small) => "Lille (langt væk)",
            (Language::English, SizeClass::Large) => "Large (near)",
            (Language::English, SizeClass::Medium) => "Medium",
            (Language::English, SizeClass::Small) => "Small (far)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShadowEdge {
    Left,
    Right,
}

/// Dark part of the disk: it grows in from `edge`, spans `width` of the
/// diameter along the equator and ends on an elliptical terminator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shadow {
    pub(crate) edge: ShadowEdge,
    pub(crate) width: f64,
}

impl Shadow {
    pub(crate) fn for_phase(phase: f64) -> Self {
        let phase = phase.clamp(0.0, 1.0);
        let edge = if phase <= 0.5 {
            ShadowEdge::Right
        } else {
            ShadowEdge::Left
        };
        Self {
            edge,
            width: 1.0 - phase,
        }
    }

    /// Whether the point `(nx, ny)` of the unit disk (x to the right) is dark.
    pub(crate) fn covers(self, nx: f64, ny: f64) -> bool {
        let half_chord = (1.0 - ny * ny).max(0.0).sqrt();
        let terminator = (1.0 - 2.0 * self.width) * half_chord;
        match self.edge {
            ShadowEdge::Right => nx > terminator,
            ShadowEdge::Left => -nx > terminator,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VenusAppearance {
    /// Illuminated fraction, 0..=1.
    pub(crate) phase: f64,
    /// Apparent size, 1.0 being the largest disk drawn.
    pub(crate) size: f64,
    pub(crate) shadow: Shadow,
    pub(crate) name: PhaseName,
    pub(crate) size_class: SizeClass,
}

impl VenusAppearance {
    pub(crate) fn new(phase: f64, size: f64) -> Self {
        Self {
            phase,
            size,
            shadow: Shadow::for_phase(phase),
            name: PhaseName::from_phase(phase),
            size_class: SizeClass::from_size(size),
        }
    }

    pub(crate) fn percent(&self) -> i64 {
        (self.phase * 100.0).round() as i64
    }

    pub(crate) fn phase_label(&self, lang: Language) -> String {
        format!("{} ({}%)", self.name.label(lang), self.percent())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PtolemyView {
    pub(crate) earth: Vec2,
    pub(crate) deferent_radius: f64,
    pub(crate) sun: Vec2,
    pub(crate) epicycle_center: Vec2,
    pub(crate) epicycle_radius: f64,
    pub(crate) venus: Vec2,
    pub(crate) appearance: VenusAppearance,
}

pub(crate) fn ptolemy(angle_deg: f64, vp: Viewport) -> PtolemyView {
    let earth = vp.center();
    let deferent_radius = vp.width * DEFERENT_SCALE;
    let sun = on_circle(earth, deferent_radius, deg(angle_deg) * SUN_RATE);

    let epicycle_center = earth.lerp(sun, 0.5);
    let eps = deg(angle_deg) * EPICYCLE_RATE;
    let venus = Vec2 {
        x: epicycle_center.x + EPICYCLE_RADIUS * eps.sin(),
        y: epicycle_center.y - EPICYCLE_RADIUS * eps.cos() * EPICYCLE_TILT,
    };

    let phase = 0.15 + 0.25 * (0.5 + 0.5 * eps.sin());
    let size = 0.7 + 0.15 * eps.sin();

    PtolemyView {
        earth,
        deferent_radius,
        sun,
        epicycle_center,
        epicycle_radius: EPICYCLE_RADIUS,
        venus,
        appearance: VenusAppearance::new(phase, size),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CopernicusView {
    pub(crate) sun: Vec2,
    pub(crate) venus_orbit: f64,
    pub(crate) earth_orbit: f64,
    pub(crate) venus: Vec2,
    pub(crate) earth: Vec2,
    pub(crate) appearance: VenusAppearance,
}

/// Lit fraction of Venus seen from Earth: `(1 + cos θ) / 2`, θ being the angle
/// between the Venus→Sun and Venus→Earth directions.
pub(crate) fn illuminated_fraction(sun: Vec2, venus: Vec2, earth: Vec2) -> f64 {
    let to_sun = sun.sub(venus).angle();
    let to_earth = earth.sub(venus).angle();
    (1.0 + (to_earth - to_sun).cos()) / 2.0
}

pub(crate) fn copernicus(angle_deg: f64, vp: Viewport) -> CopernicusView {
    let sun = vp.center();
    let venus_orbit = vp.width * VENUS_ORBIT_SCALE;
    let earth_orbit = vp.width * EARTH_ORBIT_SCALE;
    let a = deg(angle_deg);
    let venus = on_circle(sun, venus_orbit, a);
    let earth = on_circle(sun, earth_orbit, a * EARTH_RATE);

    let phase = illuminated_fraction(sun, venus, earth);

    let dist = earth.sub(venus).len();
    let max_dist = venus_orbit + earth_orbit;
    let min_dist = (earth_orbit - venus_orbit).abs();
    let ratio = 1.0 - (dist - min_dist) / (max_dist - min_dist);

    CopernicusView {
        sun,
        venus_orbit,
        earth_orbit,
        venus,
        earth,
        appearance: VenusAppearance::new(phase, 0.35 + ratio * 0.65),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VenusView {
    pub(crate) angle: f64,
    pub(crate) playing: bool,
    pub(crate) ptolemy: Option<PtolemyView>,
    pub(crate) copernicus: Option<CopernicusView>,
}

/// A model whose panel is missing is left out of the view.
pub(crate) fn venus_view(
    state: &VenusState,
    ptolemy_vp: Option<Viewport>,
    copernicus_vp: Option<Viewport>,
) -> VenusView {
    VenusView {
        angle: state.angle,
        playing: state.playing,
        ptolemy: ptolemy_vp.map(|vp| ptolemy(state.angle, vp)),
        copernicus: copernicus_vp.map(|vp| copernicus(state.angle, vp)),
    }
}
