//! Virtual joystick core: turns a continuous drag gesture into at most one
//! active directional key. Pure state machine, no DOM; the touch-controls
//! component feeds it pointer offsets and forwards the transitions it emits.

/// Synthetic direction, mapped onto the arrow-key codes the engine reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn key_code(self) -> &'static str {
        match self {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        }
    }
}

/// Key-state change the joystick wants dispatched. Order within an emitted
/// batch matters: a release always precedes the next press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTransition {
    Press(Direction),
    Release(Direction),
}

/// Physical geometry of the on-screen control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickLayout {
    pub control_diameter: f64,
    pub knob_diameter: f64,
    /// Fraction of the travel radius ignored as noise.
    pub dead_zone_ratio: f64,
}

impl Default for JoystickLayout {
    fn default() -> Self {
        Self {
            control_diameter: 140.0,
            knob_diameter: 56.0,
            dead_zone_ratio: 0.3,
        }
    }
}

impl JoystickLayout {
    /// Travel limit of the knob center from the control center.
    pub fn max_radius(&self) -> f64 {
        (self.control_diameter - self.knob_diameter) / 2.0
    }

    fn threshold(&self) -> f64 {
        self.max_radius() * self.dead_zone_ratio
    }
}

/// Drag state machine. Invariant: at most one direction active at any time;
/// every change emits the previous direction's release before the new press.
pub struct JoystickCore {
    layout: JoystickLayout,
    dragging: bool,
    knob_offset: (f64, f64),
    active: Option<Direction>,
}

impl JoystickCore {
    pub fn new(layout: JoystickLayout) -> Self {
        Self {
            layout,
            dragging: false,
            knob_offset: (0.0, 0.0),
            active: None,
        }
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Clamped knob offset from the control center, for positioning the
    /// knob visual.
    pub fn knob_offset(&self) -> (f64, f64) {
        self.knob_offset
    }

    pub fn active(&self) -> Option<Direction> {
        self.active
    }

    /// Pointer went down inside the control; `dx`/`dy` are the pointer
    /// position relative to the control center.
    pub fn begin_drag(&mut self, dx: f64, dy: f64) -> Vec<KeyTransition> {
        self.dragging = true;
        self.update_offset(dx, dy)
    }

    /// Pointer moved while dragging. No-op if no drag is in progress.
    pub fn drag_to(&mut self, dx: f64, dy: f64) -> Vec<KeyTransition> {
        if !self.dragging {
            return Vec::new();
        }
        self.update_offset(dx, dy)
    }

    /// Pointer released (or gesture cancelled, or the control is being torn
    /// down): recenter the knob and release whatever was held. Guarantees no
    /// key outlives the gesture.
    pub fn release(&mut self) -> Vec<KeyTransition> {
        self.dragging = false;
        self.knob_offset = (0.0, 0.0);
        match self.active.take() {
            Some(prev) => vec![KeyTransition::Release(prev)],
            None => Vec::new(),
        }
    }

    fn update_offset(&mut self, dx: f64, dy: f64) -> Vec<KeyTransition> {
        // Clamp to the knob's travel radius first, then classify; a fast
        // drag straight past the rim must not skip the dead-zone check.
        let max = self.layout.max_radius();
        let len = (dx * dx + dy * dy).sqrt();
        let (cx, cy) = if len > max && len > 0.0 {
            let scale = max / len;
            (dx * scale, dy * scale)
        } else {
            (dx, dy)
        };
        self.knob_offset = (cx, cy);

        let next = self.resolve(cx, cy);
        if next == self.active {
            // Unchanged resolution emits nothing; this is what stops
            // key-repeat storms while the finger jitters inside one sector.
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        if let Some(prev) = self.active {
            out.push(KeyTransition::Release(prev));
        }
        if let Some(dir) = next {
            out.push(KeyTransition::Press(dir));
        }
        self.active = next;
        out
    }

    fn resolve(&self, cx: f64, cy: f64) -> Option<Direction> {
        let threshold = self.layout.threshold();
        if cx.abs() <= threshold && cy.abs() <= threshold {
            return None;
        }
        // Dominant axis wins; ties go to the horizontal axis.
        if cx.abs() >= cy.abs() {
            Some(if cx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if cy > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radius_40() -> JoystickLayout {
        // max_radius = (136 - 56) / 2 = 40, threshold = 12.
        JoystickLayout {
            control_diameter: 136.0,
            knob_diameter: 56.0,
            dead_zone_ratio: 0.3,
        }
    }

    #[test]
    fn dead_zone_drag_emits_nothing() {
        let mut core = JoystickCore::new(radius_40());
        assert!(core.begin_drag(5.0, 5.0).is_empty());
        assert!(core.drag_to(-10.0, 8.0).is_empty());
        assert!(core.drag_to(12.0, -12.0).is_empty());
        assert_eq!(core.active(), None);
        assert!(core.release().is_empty());
    }

    #[test]
    fn full_right_deflection_then_recenter() {
        // Center at (100,100), pointer to (140,100): offset 40, at the rim.
        let mut core = JoystickCore::new(radius_40());
        assert_eq!(
            core.begin_drag(40.0, 0.0),
            vec![KeyTransition::Press(Direction::Right)]
        );
        assert_eq!(core.knob_offset(), (40.0, 0.0));
        // Back to center: bare release of the held direction.
        assert_eq!(
            core.drag_to(0.0, 0.0),
            vec![KeyTransition::Release(Direction::Right)]
        );
        assert_eq!(core.active(), None);
    }

    #[test]
    fn offset_is_clamped_before_classification() {
        let mut core = JoystickCore::new(radius_40());
        let out = core.begin_drag(500.0, 10.0);
        assert_eq!(out, vec![KeyTransition::Press(Direction::Right)]);
        let (kx, ky) = core.knob_offset();
        assert!((kx * kx + ky * ky).sqrt() <= 40.0 + 1e-9);
    }

    #[test]
    fn unchanged_direction_is_not_re_emitted() {
        let mut core = JoystickCore::new(radius_40());
        assert_eq!(core.begin_drag(30.0, 0.0).len(), 1);
        assert!(core.drag_to(35.0, 5.0).is_empty());
        assert!(core.drag_to(25.0, -8.0).is_empty());
        assert_eq!(core.active(), Some(Direction::Right));
    }

    #[test]
    fn direction_change_releases_before_pressing() {
        let mut core = JoystickCore::new(radius_40());
        core.begin_drag(30.0, 0.0);
        assert_eq!(
            core.drag_to(-30.0, 0.0),
            vec![
                KeyTransition::Release(Direction::Right),
                KeyTransition::Press(Direction::Left),
            ]
        );
        assert_eq!(core.active(), Some(Direction::Left));
    }

    #[test]
    fn vertical_axis_resolves_up_and_down() {
        let mut core = JoystickCore::new(radius_40());
        assert_eq!(
            core.begin_drag(0.0, -20.0),
            vec![KeyTransition::Press(Direction::Up)]
        );
        assert_eq!(
            core.drag_to(0.0, 20.0),
            vec![
                KeyTransition::Release(Direction::Up),
                KeyTransition::Press(Direction::Down),
            ]
        );
    }

    #[test]
    fn equal_axes_favor_horizontal() {
        let mut core = JoystickCore::new(radius_40());
        assert_eq!(
            core.begin_drag(20.0, 20.0),
            vec![KeyTransition::Press(Direction::Right)]
        );
    }

    #[test]
    fn release_emits_key_up_for_the_active_direction() {
        let mut core = JoystickCore::new(radius_40());
        core.begin_drag(0.0, 30.0);
        assert_eq!(
            core.release(),
            vec![KeyTransition::Release(Direction::Down)]
        );
        assert!(!core.dragging());
        assert_eq!(core.knob_offset(), (0.0, 0.0));
        // Second release is a no-op.
        assert!(core.release().is_empty());
    }

    #[test]
    fn moves_are_ignored_when_not_dragging() {
        let mut core = JoystickCore::new(radius_40());
        assert!(core.drag_to(40.0, 0.0).is_empty());
        assert_eq!(core.active(), None);
    }

    #[test]
    fn at_most_one_direction_active_over_a_gesture() {
        let mut core = JoystickCore::new(radius_40());
        let positions = [
            (40.0, 0.0),
            (30.0, 30.0),
            (0.0, 40.0),
            (-25.0, 25.0),
            (-40.0, 0.0),
            (3.0, 2.0),
            (0.0, -40.0),
        ];
        let mut held: Option<Direction> = None;
        let mut first = true;
        for (dx, dy) in positions {
            let out = if first {
                first = false;
                core.begin_drag(dx, dy)
            } else {
                core.drag_to(dx, dy)
            };
            for t in out {
                match t {
                    KeyTransition::Press(d) => {
                        assert_eq!(held, None, "press while another key held");
                        held = Some(d);
                    }
                    KeyTransition::Release(d) => {
                        assert_eq!(held, Some(d), "release without matching press");
                        held = None;
                    }
                }
            }
        }
        for t in core.release() {
            match t {
                KeyTransition::Release(d) => {
                    assert_eq!(held, Some(d));
                    held = None;
                }
                KeyTransition::Press(_) => panic!("release() must not press"),
            }
        }
        assert_eq!(held, None);
    }
}
