use crate::clock::{parse_picker, InputError, SimulationClock};
use crate::geom::{deg, rot2, Vec2};
use crate::moons::{calculate_moon_position, Moon};
use chrono::{DateTime, Duration, DurationRound, TimeZone, Utc};

pub(crate) const BEHIND_OPACITY: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct JupiterState {
    pub(crate) clock: SimulationClock,
    /// Rotation of the whole moon system on screen, degrees.
    pub(crate) parallactic_angle: f64,
    /// Time-offset slider position relative to `clock.base`.
    pub(crate) offset_hours: i64,
    pub(crate) show_labels: bool,
}

impl JupiterState {
    pub(crate) fn new(at: DateTime<Utc>, show_labels: bool) -> Self {
        Self {
            clock: SimulationClock::new(at),
            parallactic_angle: 0.0,
            offset_hours: 0,
            show_labels,
        }
    }

    /// Date/time entry or preset: new base, slider back to zero.
    pub(crate) fn set_time(&mut self, at: DateTime<Utc>) {
        self.clock.set(at);
        self.offset_hours = 0;
    }

    pub(crate) fn nudge_offset(&mut self, hours: i64, range: i64) {
        let range = range.max(0);
        self.offset_hours = (self.offset_hours + hours).clamp(-range, range);
        self.clock.set_offset_hours(self.offset_hours);
    }

    pub(crate) fn nudge_angle(&mut self, degrees: f64) {
        self.parallactic_angle = (self.parallactic_angle + degrees).clamp(-180.0, 180.0);
    }

    pub(crate) fn advanced(self, step: Duration) -> Self {
        Self {
            clock: self.clock.advanced(step),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JupiterPreset {
    /// Galileo's first sighting of the moons, 7 January 1610.
    Galileo,
    Now,
}

impl JupiterPreset {
    pub(crate) fn resolve<Tz: TimeZone>(self, tz: &Tz) -> Result<DateTime<Utc>, InputError> {
        match self {
            JupiterPreset::Galileo => parse_picker("1610-01-07", "18:00", tz),
            JupiterPreset::Now => {
                let now = Utc::now();
                Ok(now.duration_trunc(Duration::minutes(1)).unwrap_or(now))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MoonSprite {
    pub(crate) moon: Moon,
    /// Signed offset along the line of the orbits, before rotation.
    pub(crate) x: f64,
    /// Offset from Jupiter's centre after the parallactic rotation.
    pub(crate) offset: Vec2,
    /// On the far side of Jupiter, whether or not the disk hides it.
    pub(crate) far_side: bool,
    pub(crate) opacity: f64,
    pub(crate) is_behind: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct JupiterView {
    pub(crate) time: DateTime<Utc>,
    pub(crate) parallactic_angle: f64,
    pub(crate) offset_hours: i64,
    pub(crate) playing: bool,
    pub(crate) show_labels: bool,
    pub(crate) moons: Vec<MoonSprite>,
}

impl JupiterView {
    pub(crate) fn angle_text(&self) -> String {
        format!("{:.0}", self.parallactic_angle)
    }
}

pub(crate) fn jupiter_view(state: &JupiterState) -> JupiterView {
    let rotation = deg(state.parallactic_angle);
    let moons = Moon::ALL
        .iter()
        .map(|&moon| {
            let pos = calculate_moon_position(moon, state.clock.current);
            MoonSprite {
                moon,
                x: pos.x,
                offset: rot2(Vec2::new(pos.x, 0.0), rotation),
                far_side: pos.angle.cos() < 0.0,
                opacity: if pos.is_behind { BEHIND_OPACITY } else { 1.0 },
                is_behind: pos.is_behind,
            }
        })
        .collect();

    JupiterView {
        time: state.clock.current,
        parallactic_angle: state.parallactic_angle,
        offset_hours: state.offset_hours,
        playing: state.clock.playing,
        show_labels: state.show_labels,
        moons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moons::j2000;
    use approx::assert_abs_diff_eq;

    #[test]
    fn view_at_epoch_has_io_centred_and_bright() {
        let view = jupiter_view(&JupiterState::new(j2000(), true));
        let io = view.moons[0];
        assert_eq!(io.moon, Moon::Io);
        assert_abs_diff_eq!(io.offset.x, 0.0);
        assert_eq!(io.opacity, 1.0);
        assert_eq!(view.moons.len(), 4);
    }

    #[test]
    fn parallactic_angle_rotates_offsets() {
        let mut st = JupiterState::new(j2000() + Duration::hours(10), false);
        let flat = jupiter_view(&st);
        st.nudge_angle(90.0);
        let turned = jupiter_view(&st);
        for (a, b) in flat.moons.iter().zip(&turned.moons) {
            assert_abs_diff_eq!(b.offset.x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(b.offset.y, a.offset.x, epsilon = 1e-9);
        }
        assert_eq!(turned.angle_text(), "90");
    }

    #[test]
    fn hidden_moon_is_dimmed() {
        // Io half an orbit after the epoch sits behind the disk
        let st = JupiterState::new(j2000() + Duration::seconds((1.769 * 43_200.0) as i64), true);
        let io = jupiter_view(&st).moons[0];
        assert!(io.is_behind);
        assert_eq!(io.opacity, BEHIND_OPACITY);
        assert!(io.far_side);
    }

    #[test]
    fn sprites_keep_the_unrotated_offset() {
        let mut st = JupiterState::new(j2000() + Duration::hours(10), true);
        st.nudge_angle(-40.0);
        let t = st.clock.current;
        for s in jupiter_view(&st).moons {
            let pos = calculate_moon_position(s.moon, t);
            assert_eq!(s.x, pos.x);
            assert_abs_diff_eq!(s.offset.len(), pos.x.abs(), epsilon = 1e-9);
            assert_eq!(s.far_side, pos.angle.cos() < 0.0);
        }
    }

    #[test]
    fn slider_offset_is_clamped_and_reset_by_new_time() {
        let mut st = JupiterState::new(j2000(), true);
        st.nudge_offset(200, 240);
        st.nudge_offset(200, 240);
        assert_eq!(st.offset_hours, 240);
        assert_eq!(st.clock.current, j2000() + Duration::hours(240));

        let galileo = JupiterPreset::Galileo.resolve(&Utc).unwrap();
        st.set_time(galileo);
        assert_eq!(st.offset_hours, 0);
        assert_eq!(st.clock.base, galileo);
        st.nudge_offset(-1, 240);
        assert_eq!(st.clock.current, galileo - Duration::hours(1));
    }

    #[test]
    fn play_step_moves_current_only() {
        let st = JupiterState::new(j2000(), true).advanced(Duration::minutes(30));
        assert_eq!(st.clock.current, j2000() + Duration::minutes(30));
        assert_eq!(st.clock.base, j2000());
    }
}
