//! Panning and zooming of the diagram.
//!
//! The view is a uniform scale followed by a translation, so a point `p` in
//! diagram coordinates is shown at `p * scale + translation`.

use log::trace;

use celldl_core::geometry::{Point, Transform};

use crate::config::InteractionConfig;

/// A pan in progress: where the pointer went down, and the translation then.
#[derive(Debug, Clone, Copy)]
struct PanStart {
    pointer: Point,
    translation: Point,
}

/// Pan and zoom state for a diagram view.
#[derive(Debug, Clone)]
pub struct PanZoom {
    enabled: bool,
    scale: f64,
    translation: Point,
    min_zoom: f64,
    max_zoom: f64,
    zoom_step: f64,
    click_tolerance: f64,
    pan_start: Option<PanStart>,
}

impl PanZoom {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            enabled: false,
            scale: 1.0,
            translation: Point::default(),
            min_zoom: config.min_zoom(),
            max_zoom: config.max_zoom(),
            zoom_step: config.zoom_step(),
            click_tolerance: config.click_tolerance(),
            pan_start: None,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops responding to input and returns to the unpanned, unzoomed view.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.reset();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.translation = Point::default();
        self.pan_start = None;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    /// Whether a pointer press is being tracked as a possible pan.
    pub fn is_panning(&self) -> bool {
        self.pan_start.is_some()
    }

    /// The view transform, for the diagram root's `transform` attribute.
    pub fn transform(&self) -> Transform {
        Transform::new(
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.translation.x(),
            self.translation.y(),
        )
    }

    /// Starts a pan candidate at `position`.
    pub fn pointer_down(&mut self, position: Point) {
        if self.enabled {
            self.pan_start = Some(PanStart {
                pointer: position,
                translation: self.translation,
            });
        }
    }

    /// Pans to follow the pointer.
    ///
    /// Returns `true` once the pointer has moved further than the click
    /// tolerance from where it went down; smaller movements don't pan.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        let Some(start) = self.pan_start else {
            return false;
        };
        let delta = position.sub_point(start.pointer);
        if delta.hypot() <= self.click_tolerance {
            return false;
        }
        self.translation = start.translation.add_point(delta);
        trace!(x = self.translation.x(), y = self.translation.y(); "Panned view");
        true
    }

    pub fn pointer_up(&mut self) {
        self.pan_start = None;
    }

    /// Scales the view by `factor` about `point`, given in view coordinates.
    ///
    /// The scale is clamped to the configured zoom range, and the diagram
    /// point under `point` stays where it is.
    pub fn zoom_at(&mut self, point: Point, factor: f64) {
        if !self.enabled || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let scale = (self.scale * factor).clamp(self.min_zoom, self.max_zoom);
        let anchor = self.to_diagram(point);
        self.scale = scale;
        self.translation = point.sub_point(anchor.scale(scale));
        trace!(scale = scale; "Zoomed view");
    }

    /// Zooms in one step about `point`.
    pub fn zoom_in(&mut self, point: Point) {
        self.zoom_at(point, self.zoom_step);
    }

    /// Zooms out one step about `point`.
    pub fn zoom_out(&mut self, point: Point) {
        self.zoom_at(point, 1.0 / self.zoom_step);
    }

    /// Maps a view point to diagram coordinates.
    pub fn to_diagram(&self, point: Point) -> Point {
        point.sub_point(self.translation).scale(1.0 / self.scale)
    }

    /// Maps a diagram point to view coordinates.
    pub fn to_view(&self, point: Point) -> Point {
        point.scale(self.scale).add_point(self.translation)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn panzoom() -> PanZoom {
        let mut panzoom = PanZoom::new(&InteractionConfig::default());
        panzoom.enable();
        panzoom
    }

    #[test]
    fn test_pan_beyond_tolerance() {
        let mut panzoom = panzoom();
        panzoom.pointer_down(Point::new(10.0, 10.0));
        assert!(panzoom.is_panning());

        assert!(!panzoom.pointer_move(Point::new(10.5, 10.5)));
        assert_eq!(panzoom.translation(), Point::default());

        assert!(panzoom.pointer_move(Point::new(20.0, 5.0)));
        assert_eq!(panzoom.translation(), Point::new(10.0, -5.0));

        panzoom.pointer_up();
        assert!(!panzoom.is_panning());
        assert!(!panzoom.pointer_move(Point::new(50.0, 50.0)));
        assert_eq!(panzoom.transform().to_string(), "matrix(1, 0, 0, 1, 10, -5)");
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut panzoom = PanZoom::new(&InteractionConfig::default());
        panzoom.pointer_down(Point::new(0.0, 0.0));
        assert!(!panzoom.pointer_move(Point::new(50.0, 0.0)));
        panzoom.zoom_at(Point::new(0.0, 0.0), 2.0);
        assert!(panzoom.transform().is_identity());
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut panzoom = panzoom();
        let anchor = Point::new(100.0, 50.0);
        panzoom.zoom_at(anchor, 2.0);

        assert!(approx_eq!(f64, panzoom.scale(), 2.0));
        assert_eq!(panzoom.translation(), Point::new(-100.0, -50.0));
        assert_eq!(panzoom.to_diagram(anchor), anchor);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut panzoom = panzoom();
        panzoom.zoom_at(Point::default(), 1000.0);
        assert!(approx_eq!(f64, panzoom.scale(), 10.0));
        panzoom.zoom_at(Point::default(), 1e-6);
        assert!(approx_eq!(f64, panzoom.scale(), 0.1));
        panzoom.zoom_at(Point::default(), -1.0);
        assert!(approx_eq!(f64, panzoom.scale(), 0.1));
    }

    #[test]
    fn test_zoom_steps_and_disable() {
        let mut panzoom = panzoom();
        panzoom.zoom_in(Point::default());
        assert!(approx_eq!(f64, panzoom.scale(), 1.1));
        panzoom.zoom_out(Point::default());
        assert!(approx_eq!(f64, panzoom.scale(), 1.0, epsilon = 1e-12));

        panzoom.zoom_in(Point::new(5.0, 5.0));
        panzoom.disable();
        assert!(!panzoom.is_enabled());
        assert!(panzoom.transform().is_identity());
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn factor_strategy() -> impl Strategy<Value = f64> {
        0.01f64..100.0
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Zooming never leaves the configured range.
    fn check_zoom_within_range(factors: Vec<f64>, point: Point) -> Result<(), TestCaseError> {
        let config = InteractionConfig::default();
        let mut panzoom = PanZoom::new(&config);
        panzoom.enable();
        for factor in factors {
            panzoom.zoom_at(point, factor);
            prop_assert!(panzoom.scale() >= config.min_zoom());
            prop_assert!(panzoom.scale() <= config.max_zoom());
        }
        Ok(())
    }

    /// The diagram point under the zoom centre doesn't move.
    fn check_zoom_fixes_anchor(
        pan: Point,
        anchor: Point,
        factor: f64,
    ) -> Result<(), TestCaseError> {
        let mut panzoom = PanZoom::new(&InteractionConfig::default());
        panzoom.enable();
        panzoom.pointer_down(Point::default());
        panzoom.pointer_move(pan);
        panzoom.pointer_up();

        let before = panzoom.to_diagram(anchor);
        panzoom.zoom_at(anchor, factor);
        let after = panzoom.to_diagram(anchor);
        prop_assert!(approx_eq!(f64, before.x(), after.x(), epsilon = 1e-6));
        prop_assert!(approx_eq!(f64, before.y(), after.y(), epsilon = 1e-6));
        Ok(())
    }

    /// View and diagram mappings are inverse, and agree with the transform.
    fn check_mappings_inverse(factor: f64, pan: Point, p: Point) -> Result<(), TestCaseError> {
        let mut panzoom = PanZoom::new(&InteractionConfig::default());
        panzoom.enable();
        panzoom.zoom_at(Point::default(), factor);
        panzoom.pointer_down(Point::default());
        panzoom.pointer_move(pan);

        let view = panzoom.to_view(p);
        let by_transform = panzoom.transform().transform_point(p);
        prop_assert!(approx_eq!(f64, view.x(), by_transform.x(), epsilon = 1e-6));
        prop_assert!(approx_eq!(f64, view.y(), by_transform.y(), epsilon = 1e-6));

        let back = panzoom.to_diagram(view);
        prop_assert!(approx_eq!(f64, back.x(), p.x(), epsilon = 1e-6));
        prop_assert!(approx_eq!(f64, back.y(), p.y(), epsilon = 1e-6));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn zoom_within_range(
            factors in prop::collection::vec(factor_strategy(), 1..20),
            point in point_strategy(),
        ) {
            check_zoom_within_range(factors, point)?;
        }

        #[test]
        fn zoom_fixes_anchor(
            pan in point_strategy(),
            anchor in point_strategy(),
            factor in factor_strategy(),
        ) {
            check_zoom_fixes_anchor(pan, anchor, factor)?;
        }

        #[test]
        fn mappings_inverse(
            factor in factor_strategy(),
            pan in point_strategy(),
            p in point_strategy(),
        ) {
            check_mappings_inverse(factor, pan, p)?;
        }
    }
}
