//! Galilean moon positions as seen edge-on from Earth.
//!
//! Each moon runs on a uniform circular orbit; projecting it onto the line of
//! sight leaves a one-dimensional oscillation around Jupiter.

use chrono::{DateTime, TimeZone, Utc};
use std::f64::consts::{PI, TAU};

/// Jupiter's apparent radius in display units. A moon on the far side within
/// this distance of the centre is hidden behind the disk.
pub(crate) const JUPITER_RADIUS: f64 = 25.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Moon {
    Io,
    Europa,
    Ganymede,
    Callisto,
}

impl Moon {
    pub(crate) const ALL: [Moon; 4] = [Moon::Io, Moon::Europa, Moon::Ganymede, Moon::Callisto];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Moon::Io => "Io",
            Moon::Europa => "Europa",
            Moon::Ganymede => "Ganymede",
            Moon::Callisto => "Callisto",
        }
    }

    pub(crate) fn orbit(self) -> MoonOrbit {
        match self {
            Moon::Io => MoonOrbit {
                period_days: 1.769,
                semi_major_axis: 75.0,
                initial_phase: 0.0,
                rgb: (0xe8, 0xa8, 0x48),
            },
            Moon::Europa => MoonOrbit {
                period_days: 3.551,
                semi_major_axis: 105.0,
                initial_phase: PI * 0.3,
                rgb: (0xa8, 0xc8, 0xe8),
            },
            Moon::Ganymede => MoonOrbit {
                period_days: 7.155,
                semi_major_axis: 145.0,
                initial_phase: PI * 0.8,
                rgb: (0xb8, 0xb8, 0xc8),
            },
            Moon::Callisto => MoonOrbit {
                period_days: 16.689,
                semi_major_axis: 195.0,
                initial_phase: PI * 1.5,
                rgb: (0xa8, 0x98, 0x88),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MoonOrbit {
    pub(crate) period_days: f64,
    /// Display units; Jupiter's radius is [`JUPITER_RADIUS`].
    pub(crate) semi_major_axis: f64,
    /// Orbital angle at J2000, radians.
    pub(crate) initial_phase: f64,
    pub(crate) rgb: (u8, u8, u8),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MoonPosition {
    /// Signed offset from Jupiter's centre along the line of the orbits.
    pub(crate) x: f64,
    pub(crate) is_behind: bool,
    /// Unwrapped orbital angle, radians.
    pub(crate) angle: f64,
}

/// 2000-01-01T12:00:00Z
pub(crate) fn j2000() -> DateTime<Utc> {
    Utc.timestamp_opt(946_728_000, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

pub(crate) fn days_since_j2000(time: DateTime<Utc>) -> f64 {
    let dt = time - j2000();
    // millisecond resolution keeps the span exact for any date chrono can hold
    dt.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

pub(crate) fn calculate_moon_position(moon: Moon, time: DateTime<Utc>) -> MoonPosition {
    let orbit = moon.orbit();
    let angle = orbit.initial_phase + TAU * days_since_j2000(time) / orbit.period_days;
    let x = orbit.semi_major_axis * angle.sin();
    let is_behind = angle.cos() < 0.0 && x.abs() < JUPITER_RADIUS;
    MoonPosition { x, is_behind, angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn after_days(days: f64) -> DateTime<Utc> {
        j2000() + Duration::milliseconds((days * SECONDS_PER_DAY * 1000.0).round() as i64)
    }

    #[test]
    fn io_at_epoch_is_centred_and_in_front() {
        let p = calculate_moon_position(Moon::Io, j2000());
        assert_eq!(p.angle, 0.0);
        assert_eq!(p.x, 0.0);
        assert!(!p.is_behind);
    }

    #[test]
    fn position_repeats_after_one_period() {
        let starts = [-3650.25, -12.5, 0.0, 0.37, 41.0, 9000.125];
        for moon in Moon::ALL {
            let period = moon.orbit().period_days;
            for &t0 in &starts {
                let a = calculate_moon_position(moon, after_days(t0));
                let b = calculate_moon_position(moon, after_days(t0 + period));
                assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-3);
                assert_eq!(a.is_behind, b.is_behind, "{} at {t0}", moon.name());
            }
        }
    }

    #[test]
    fn half_period_puts_io_behind_jupiter() {
        let p = calculate_moon_position(Moon::Io, after_days(1.769 / 2.0));
        assert!(p.angle.cos() < 0.0);
        assert!(p.x.abs() < JUPITER_RADIUS);
        assert!(p.is_behind);
    }

    #[test]
    fn far_side_at_elongation_is_not_behind() {
        // angle ≈ 0.6π: far side, but well clear of the disk
        let p = calculate_moon_position(Moon::Io, after_days(1.769 * 0.3));
        assert!(p.angle.cos() < 0.0);
        assert!(p.x.abs() > JUPITER_RADIUS);
        assert!(!p.is_behind);
    }

    #[test]
    fn quarter_period_reaches_greatest_elongation() {
        let p = calculate_moon_position(Moon::Io, after_days(1.769 / 4.0));
        assert_abs_diff_eq!(p.x, 75.0, epsilon = 1e-3);
    }

    #[test]
    fn offsets_stay_within_semi_major_axis() {
        for moon in Moon::ALL {
            let a = moon.orbit().semi_major_axis;
            for i in 0..200 {
                let p = calculate_moon_position(moon, after_days(i as f64 * 0.731));
                assert!(p.x.abs() <= a + 1e-9);
            }
        }
    }
}
