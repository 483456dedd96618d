//! Rømer's light-delay diagram.
//!
//! Only Earth moves; Jupiter stays at the top of its orbit. The on-screen
//! Earth–Jupiter distance is rescaled into the 4.2–6.0 AU range and turned into
//! a light-travel time.

use crate::geom::{on_circle, Vec2, Viewport};
use std::f64::consts::{FRAC_PI_2, TAU};

const EARTH_ORBIT_SCALE: f64 = 0.175;
const JUPITER_ORBIT_SCALE: f64 = 0.425;

pub(crate) const MIN_DISTANCE_AU: f64 = 4.2;
pub(crate) const DISTANCE_SPAN_AU: f64 = 1.8;
pub(crate) const MINUTES_PER_AU: f64 = 8.3;

pub(crate) const MONTHS: f64 = 12.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RoemerState {
    /// Continuous month of the year, kept in `[0, 12)`.
    pub(crate) month: f64,
}

impl RoemerState {
    pub(crate) fn with_month(self, month: f64) -> Self {
        Self {
            month: month.rem_euclid(MONTHS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RoemerPreset {
    Opposition,
    Conjunction,
}

impl RoemerPreset {
    pub(crate) fn month(self) -> f64 {
        match self {
            RoemerPreset::Opposition => 6.0,
            RoemerPreset::Conjunction => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LightRay {
    pub(crate) origin: Vec2,
    pub(crate) length: f64,
    /// Direction from Jupiter to Earth in screen degrees.
    pub(crate) angle_deg: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RoemerReading {
    pub(crate) month: f64,
    pub(crate) sun: Vec2,
    pub(crate) earth_orbit: f64,
    pub(crate) jupiter_orbit: f64,
    pub(crate) earth: Vec2,
    pub(crate) jupiter: Vec2,
    pub(crate) ray: LightRay,
    pub(crate) distance_au: f64,
    pub(crate) light_minutes: f64,
    /// Extra minutes relative to the closest configuration.
    pub(crate) delay_minutes: f64,
}

impl RoemerReading {
    pub(crate) fn distance_text(&self) -> String {
        format!("{:.1}", self.distance_au)
    }

    pub(crate) fn time_text(&self) -> String {
        format!("{}", self.light_minutes.round() as i64)
    }

    pub(crate) fn delay_text(&self) -> String {
        let minutes = self.delay_minutes.round() as i64;
        let sign = if minutes > 0 { "+" } else { "" };
        format!("{}{}", sign, minutes)
    }
}

pub(crate) fn roemer_geometry(month: f64, vp: Viewport) -> RoemerReading {
    let sun = vp.center();
    let earth_orbit = vp.width * EARTH_ORBIT_SCALE;
    let jupiter_orbit = vp.width * JUPITER_ORBIT_SCALE;

    let earth = on_circle(sun, earth_orbit, month / MONTHS * TAU - FRAC_PI_2);
    let jupiter = on_circle(sun, jupiter_orbit, -FRAC_PI_2);

    let d = earth.sub(jupiter);
    let distance = d.len();
    let ray = LightRay {
        origin: jupiter,
        length: distance,
        angle_deg: d.angle().to_degrees(),
    };

    let min_dist = jupiter_orbit - earth_orbit;
    let max_dist = jupiter_orbit + earth_orbit;
    let distance_au = MIN_DISTANCE_AU + (distance - min_dist) / (max_dist - min_dist) * DISTANCE_SPAN_AU;
    let light_minutes = distance_au * MINUTES_PER_AU;

    RoemerReading {
        month,
        sun,
        earth_orbit,
        jupiter_orbit,
        earth,
        jupiter,
        ray,
        distance_au,
        light_minutes,
        delay_minutes: light_minutes - MIN_DISTANCE_AU * MINUTES_PER_AU,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const VP: Viewport = Viewport::new(400.0, 400.0);

    #[test]
    fn month_zero_is_the_minimum_delay() {
        let r = roemer_geometry(0.0, VP);
        assert_abs_diff_eq!(r.distance_au, 4.2, epsilon = 1e-9);
        assert_abs_diff_eq!(r.delay_minutes, 0.0, epsilon = 1e-9);
        assert_eq!(r.delay_text(), "0");
        assert_eq!(r.time_text(), "35");
    }

    #[test]
    fn month_six_is_the_maximum_delay() {
        let r = roemer_geometry(6.0, VP);
        assert_abs_diff_eq!(r.distance_au, 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.delay_minutes, 1.8 * 8.3, epsilon = 1e-9);
        assert_eq!(r.distance_text(), "6.0");
        assert_eq!(r.delay_text(), "+15");

        let min = roemer_geometry(0.0, VP).delay_minutes;
        for i in 0..120 {
            let d = roemer_geometry(i as f64 * 0.1, VP).delay_minutes;
            assert!(d >= min - 1e-9 && d <= r.delay_minutes + 1e-9);
        }
    }

    #[test]
    fn delay_is_symmetric_and_periodic() {
        for &m in &[0.5, 2.0, 3.7, 5.1] {
            let a = roemer_geometry(m, VP).delay_minutes;
            let b = roemer_geometry(12.0 - m, VP).delay_minutes;
            let c = roemer_geometry(m + 12.0, VP).delay_minutes;
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
            assert_abs_diff_eq!(a, c, epsilon = 1e-9);
        }
    }

    #[test]
    fn ray_runs_from_jupiter_to_earth() {
        let r = roemer_geometry(3.0, VP);
        assert_eq!(r.ray.origin, r.jupiter);
        let tip = on_circle(r.ray.origin, r.ray.length, r.ray.angle_deg.to_radians());
        assert_abs_diff_eq!(tip.x, r.earth.x, epsilon = 1e-9);
        assert_abs_diff_eq!(tip.y, r.earth.y, epsilon = 1e-9);
    }

    #[test]
    fn jupiter_stays_put() {
        let a = roemer_geometry(1.0, VP).jupiter;
        let b = roemer_geometry(8.0, VP).jupiter;
        assert_eq!(a, b);
        assert_abs_diff_eq!(a.y, 200.0 - 0.425 * 400.0, epsilon = 1e-9);
    }

    #[test]
    fn presets_and_wrapping() {
        assert_eq!(RoemerState::default().with_month(12.5).month, 0.5);
        assert_eq!(RoemerState::default().with_month(-1.0).month, 11.0);
        assert_eq!(RoemerPreset::Opposition.month(), 6.0);
        assert_eq!(RoemerPreset::Conjunction.month(), 0.0);
    }
}
