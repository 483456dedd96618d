use std::f64::consts::PI;

// -------------------- Shared math --------------------
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Vec2 {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Vec2 {
    pub(crate) const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    pub(crate) fn sub(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x - o.x, y: self.y - o.y }
    }
    pub(crate) fn len(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
    pub(crate) fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }
    pub(crate) fn lerp(self, o: Vec2, t: f64) -> Vec2 {
        Vec2 { x: lerp(self.x, o.x, t), y: lerp(self.y, o.y, t) }
    }
}

/// Point on a circle of radius `r` around `center`, measured from +x towards +y
/// (screen coordinates, so positive angles turn clockwise on screen).
pub(crate) fn on_circle(center: Vec2, r: f64, ang: f64) -> Vec2 {
    let (s, c) = ang.sin_cos();
    Vec2 { x: center.x + r * c, y: center.y + r * s }
}

pub(crate) fn rot2(v: Vec2, ang: f64) -> Vec2 {
    let (s, c) = ang.sin_cos();
    Vec2 { x: v.x * c - v.y * s, y: v.x * s + v.y * c }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn deg(x: f64) -> f64 {
    x * PI / 180.0
}

/// Panel a widget is laid out in. Widget geometry scales with `width` the same
/// way the page layout did, so any aspect ratio works.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl Viewport {
    pub(crate) const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
    pub(crate) fn center(self) -> Vec2 {
        Vec2 { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn on_circle_quarter_turn_points_down_screen() {
        let p = on_circle(Vec2::new(10.0, 10.0), 5.0, PI / 2.0);
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn rot2_keeps_length() {
        let v = Vec2::new(3.0, 4.0);
        let r = rot2(v, deg(37.0));
        assert_abs_diff_eq!(r.len(), 5.0, epsilon = 1e-12);
    }
}
