//! Rendering port between the widget core and whatever draws it.
//!
//! Every method has a no-op default, so a surface only implements the panels
//! it actually has. A panel without a viewport is treated as absent and its
//! widget skips the update.

use crate::config::Language;
use crate::geom::Viewport;
use crate::jupiter::JupiterView;
use crate::model::Page;
use crate::roemer::RoemerReading;
use crate::venus::VenusView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Panel {
    Ptolemy,
    Copernicus,
    Roemer,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Hud {
    pub(crate) page: Page,
    pub(crate) language: Language,
    pub(crate) status: Option<String>,
    /// Text typed so far while the date/time entry is open.
    pub(crate) entry: Option<String>,
    pub(crate) help: bool,
}

pub(crate) trait Surface {
    fn viewport(&self, _panel: Panel) -> Option<Viewport> {
        None
    }
    fn jupiter(&mut self, _view: &JupiterView) {}
    fn venus(&mut self, _view: &VenusView) {}
    fn roemer(&mut self, _reading: &RoemerReading) {}
    fn hud(&mut self, _hud: &Hud) {}
}

/// Surface with no panels at all.
#[cfg(test)]
pub(crate) struct NullSurface;

#[cfg(test)]
impl Surface for NullSurface {}
