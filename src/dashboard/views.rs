// src/dashboard/views.rs

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::present::{ChartPayload, ListItem, SelectOption};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Selectors, detail panel, comparison chart and user prompts.
///
/// Every `show_*` call replaces whatever that widget rendered before.
pub trait DashboardView: Send + Sync {
    fn set_loading(&self, loading: bool);
    /// Fill the detail selector and both comparison selectors.
    fn show_options(&self, options: &[SelectOption]);
    fn hide_detail(&self);
    /// `chart` is `None` when the region has nothing numeric to plot.
    fn show_detail(&self, title: &str, items: &[ListItem], chart: Option<&ChartPayload>);
    fn show_comparison(&self, chart: &ChartPayload);
    /// Direct user feedback, reserved for input the user can act on.
    fn notify(&self, message: &str);
}

pub trait MapView: Send + Sync {
    fn center(&self, at: Coordinates, zoom: u8);
    fn place_marker(&self, at: Coordinates, popup: &str);
}

pub trait Geolocator: Send + Sync {
    fn current_position(&self) -> Result<Coordinates, GeoError>;
}

/// Reports a configured position, or denial when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    position: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl Geolocator for FixedLocator {
    fn current_position(&self) -> Result<Coordinates, GeoError> {
        self.position.ok_or(GeoError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_locator_without_position_is_denied() {
        assert_eq!(
            FixedLocator::default().current_position(),
            Err(GeoError::PermissionDenied)
        );
        let at = Coordinates { lat: 12.97, lon: 77.59 };
        assert_eq!(FixedLocator::new(Some(at)).current_position(), Ok(at));
    }
}
