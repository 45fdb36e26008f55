//! Scalars and points whose values are clamped to a range.
//!
//! A [`RestrictedValue`] carries a value together with a `[minimum, maximum]`
//! range. Either end of the range may be a literal or a live reference to
//! another value ([`Limit::Tracking`]), so that, for example, the left edge of
//! a shape can be kept to the left of its right edge while both move.
//!
//! Values that take part in such relationships are shared through
//! [`SharedValue`] handles.

use std::{cell::RefCell, fmt, rc::Rc};

use super::Point;

/// A restricted value shared between the points and rectangles that use it.
pub type SharedValue = Rc<RefCell<RestrictedValue>>;

/// Source of the identifiers given to restricted values.
///
/// Each diagram owns its own generator, so identifiers are unique within a
/// diagram but not across diagrams.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next identifier, formatted as `prefix:n`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.last += 1;
        format!("{prefix}:{}", self.last)
    }
}

/// One end of a value's range.
#[derive(Debug, Clone)]
pub enum Limit {
    /// A literal bound.
    Value(f64),
    /// A bound that follows the current value of another restricted value.
    Tracking(SharedValue),
}

impl Limit {
    /// Evaluates the bound.
    ///
    /// A tracked value that is already mutably borrowed (a value limited by
    /// itself) evaluates to `fallback`.
    fn resolve(&self, fallback: f64) -> f64 {
        match self {
            Limit::Value(v) => *v,
            Limit::Tracking(value) => value
                .try_borrow()
                .map(|v| v.value())
                .unwrap_or(fallback),
        }
    }
}

impl From<f64> for Limit {
    fn from(value: f64) -> Self {
        Limit::Value(value)
    }
}

impl From<SharedValue> for Limit {
    fn from(value: SharedValue) -> Self {
        Limit::Tracking(value)
    }
}

impl From<&SharedValue> for Limit {
    fn from(value: &SharedValue) -> Self {
        Limit::Tracking(Rc::clone(value))
    }
}

#[derive(Clone)]
enum ValueKind {
    Restricted,
    Fixed,
    Computed(Rc<dyn Fn() -> f64>),
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Restricted => f.write_str("Restricted"),
            ValueKind::Fixed => f.write_str("Fixed"),
            ValueKind::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// A scalar clamped to a range, with a dirty flag.
///
/// There are three behaviours:
///
/// - **restricted** ([`RestrictedValue::new`]): assignments are clamped into
///   the range, and the value becomes dirty when the clamped result differs
///   from the previous value.
/// - **fixed** ([`RestrictedValue::fixed_at`]): the range is collapsed onto the
///   value and cannot be narrowed.
/// - **computed** ([`RestrictedValue::computed`]): the value is produced by a
///   function on every read and the value always reports itself dirty.
///
/// # Examples
///
/// ```
/// # use celldl_core::geometry::{IdGenerator, RestrictedValue};
/// let mut ids = IdGenerator::new();
/// let mut value = RestrictedValue::new(&mut ids, 5.0, 0.0, 10.0);
///
/// value.set_value(20.0);
/// assert_eq!(value.value(), 10.0);
/// assert!(value.dirty());
///
/// value.clean();
/// value.set_value(12.0); // clamps to 10 again, no change
/// assert!(!value.dirty());
/// ```
#[derive(Debug, Clone)]
pub struct RestrictedValue {
    id: String,
    value: f64,
    minimum: Limit,
    maximum: Limit,
    dirty: bool,
    kind: ValueKind,
}

impl RestrictedValue {
    /// Creates a value with the range `[range_start, range_end]`.
    ///
    /// The ends are swapped if given in decreasing order. The initial value is
    /// taken as given and is not clamped.
    pub fn new(
        ids: &mut IdGenerator,
        value: f64,
        range_start: impl Into<Limit>,
        range_end: impl Into<Limit>,
    ) -> Self {
        let (start, end) = (range_start.into(), range_end.into());
        let (minimum, maximum) =
            if start.resolve(f64::NEG_INFINITY) <= end.resolve(f64::INFINITY) {
                (start, end)
            } else {
                (end, start)
            };
        Self {
            id: ids.next_id("V"),
            value,
            minimum,
            maximum,
            dirty: false,
            kind: ValueKind::Restricted,
        }
    }

    /// Creates a value with an unbounded range.
    pub fn unbounded(ids: &mut IdGenerator, value: f64) -> Self {
        Self::new(ids, value, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Creates a value whose range is permanently collapsed onto `value`.
    pub fn fixed_at(ids: &mut IdGenerator, value: f64) -> Self {
        Self {
            kind: ValueKind::Fixed,
            ..Self::new(ids, value, value, value)
        }
    }

    /// Creates a value that is recomputed from `function` on every read.
    ///
    /// The computed result is still clamped into the range.
    pub fn computed(
        ids: &mut IdGenerator,
        function: impl Fn() -> f64 + 'static,
        minimum: impl Into<Limit>,
        maximum: impl Into<Limit>,
    ) -> Self {
        let initial = function();
        Self {
            kind: ValueKind::Computed(Rc::new(function)),
            ..Self::new(ids, initial, minimum, maximum)
        }
    }

    /// Wraps the value in a shared handle.
    pub fn shared(self) -> SharedValue {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the value has changed since the last [`clean`](Self::clean).
    ///
    /// Computed values are always dirty.
    pub fn dirty(&self) -> bool {
        match self.kind {
            ValueKind::Computed(_) => true,
            _ => self.dirty,
        }
    }

    /// Acknowledges the current value.
    pub fn clean(&mut self) {
        self.dirty = false;
    }

    /// Whether the value can no longer move.
    pub fn fixed(&self) -> bool {
        matches!(self.kind, ValueKind::Fixed) || self.minimum() == self.maximum()
    }

    pub fn minimum(&self) -> f64 {
        self.minimum.resolve(f64::NEG_INFINITY)
    }

    pub fn maximum(&self) -> f64 {
        self.maximum.resolve(f64::INFINITY)
    }

    pub fn value(&self) -> f64 {
        match &self.kind {
            ValueKind::Computed(function) => self.clamp(function()),
            _ => self.value,
        }
    }

    /// Clamps `value` into the current range.
    pub fn clamp(&self, value: f64) -> f64 {
        let (minimum, maximum) = (self.minimum(), self.maximum());
        if value < minimum {
            minimum
        } else if value > maximum {
            maximum
        } else {
            value
        }
    }

    /// Assigns a new value, clamped into the range.
    ///
    /// The value becomes dirty only if the clamped result differs from the
    /// current value. Assignments to computed values are ignored.
    pub fn set_value(&mut self, value: f64) {
        if matches!(self.kind, ValueKind::Computed(_)) || self.value == value {
            return;
        }
        let clamped = self.clamp(value);
        if self.value != clamped {
            self.value = clamped;
            self.dirty = true;
        }
    }

    /// Shifts the value and both ends of the range by `delta`.
    ///
    /// Tracking limits are resolved to literals first.
    pub fn adjust_value(&mut self, delta: f64) {
        self.minimum = Limit::Value(self.minimum() + delta);
        self.maximum = Limit::Value(self.maximum() + delta);
        self.value += delta;
    }

    /// Tightens the range to `[minimum, maximum]`.
    ///
    /// Each end is replaced only if the new bound is tighter than the current
    /// one, so the range never widens. The arguments are swapped if given in
    /// decreasing order. Fixed values ignore this.
    pub fn narrow_range(&mut self, minimum: impl Into<Limit>, maximum: impl Into<Limit>) {
        if matches!(self.kind, ValueKind::Fixed) {
            return;
        }
        let (mut low, mut high) = (minimum.into(), maximum.into());
        if low.resolve(f64::NEG_INFINITY) > high.resolve(f64::INFINITY) {
            std::mem::swap(&mut low, &mut high);
        }
        if low.resolve(f64::NEG_INFINITY) > self.minimum() {
            self.minimum = low;
        }
        if high.resolve(f64::INFINITY) < self.maximum() {
            self.maximum = high;
        }
    }

    /// Replaces the lower bound unconditionally.
    pub fn reassign_minimum(&mut self, minimum: impl Into<Limit>) {
        if !matches!(self.kind, ValueKind::Fixed) {
            self.minimum = minimum.into();
        }
    }

    /// Replaces the upper bound unconditionally.
    pub fn reassign_maximum(&mut self, maximum: impl Into<Limit>) {
        if !matches!(self.kind, ValueKind::Fixed) {
            self.maximum = maximum.into();
        }
    }

    /// Replaces the value without clamping and without marking it dirty.
    ///
    /// A fixed value moves its collapsed range along with it.
    pub fn reassign_value(&mut self, value: f64) {
        self.value = value;
        if matches!(self.kind, ValueKind::Fixed) {
            self.minimum = Limit::Value(value);
            self.maximum = Limit::Value(value);
        }
    }

    /// Creates an independent value with the same value, range and behaviour.
    ///
    /// Tracking limits keep tracking the same values.
    pub fn copy(&self, ids: &mut IdGenerator) -> Self {
        Self {
            id: ids.next_id("V"),
            dirty: false,
            ..self.clone()
        }
    }
}

fn round(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl fmt::Display for RestrictedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}, {}, {}]",
            self.id,
            round(self.minimum()),
            round(self.value()),
            round(self.maximum())
        )
    }
}

/// A point whose coordinates are independent restricted values.
///
/// Cloning a point shares its coordinate values.
#[derive(Debug, Clone)]
pub struct RestrictedPoint {
    x: SharedValue,
    y: SharedValue,
}

impl RestrictedPoint {
    pub fn new(x: SharedValue, y: SharedValue) -> Self {
        Self { x, y }
    }

    /// Creates a point with unbounded coordinates.
    pub fn from_point(ids: &mut IdGenerator, point: Point) -> Self {
        Self::new(
            RestrictedValue::unbounded(ids, point.x()).shared(),
            RestrictedValue::unbounded(ids, point.y()).shared(),
        )
    }

    /// Creates a point whose coordinates can never move.
    pub fn fixed_at(ids: &mut IdGenerator, point: Point) -> Self {
        Self::new(
            RestrictedValue::fixed_at(ids, point.x()).shared(),
            RestrictedValue::fixed_at(ids, point.y()).shared(),
        )
    }

    /// Dirty if either coordinate is dirty.
    pub fn dirty(&self) -> bool {
        self.x.borrow().dirty() || self.y.borrow().dirty()
    }

    pub fn fixed(&self) -> bool {
        self.x.borrow().fixed() && self.y.borrow().fixed()
    }

    pub fn x(&self) -> f64 {
        self.x.borrow().value()
    }

    pub fn y(&self) -> f64 {
        self.y.borrow().value()
    }

    pub fn point(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    /// Assigns both coordinates, each clamped into its own range.
    pub fn set_point(&self, point: Point) {
        self.x.borrow_mut().set_value(point.x());
        self.y.borrow_mut().set_value(point.y());
    }

    pub fn x_value(&self) -> &SharedValue {
        &self.x
    }

    pub fn y_value(&self) -> &SharedValue {
        &self.y
    }

    pub fn set_x_value(&mut self, value: SharedValue) {
        self.x = value;
    }

    pub fn set_y_value(&mut self, value: SharedValue) {
        self.y = value;
    }

    pub fn clean(&self) {
        self.x.borrow_mut().clean();
        self.y.borrow_mut().clean();
    }

    /// Shifts both coordinates, and their ranges, by `delta`.
    pub fn adjust_value(&self, delta: Point) {
        self.x.borrow_mut().adjust_value(delta.x());
        self.y.borrow_mut().adjust_value(delta.y());
    }

    /// Replaces both coordinates without clamping.
    pub fn reassign_value(&self, point: Point) {
        self.x.borrow_mut().reassign_value(point.x());
        self.y.borrow_mut().reassign_value(point.y());
    }
}

impl fmt::Display for RestrictedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RP: ({}, {})", round(self.x()), round(self.y()))
    }
}
