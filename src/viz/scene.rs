//! Retained chart scene: the element tree the renderer reconciles on every update and
//! the SVG, HTML, PNG and GUI outputs draw from.
//!
//! Coordinates of everything except the checkboxes are relative to the plot origin
//! (inside the margins), like a `<g transform="translate(left,top)">` group.

use std::time::Duration;

use super::types::Rgb;

/// Cubic ease-in-out on `t ∈ [0,1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// An eased interpolation of one numeric attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    elapsed: f64,
    duration: f64,
}

impl Transition {
    /// Already at rest on `value`.
    pub fn at(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        if self.is_done() {
            return self.to;
        }
        let t = ease_cubic_in_out(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Restart from the current value towards `to`.
    pub fn retarget(&mut self, to: f64, duration: Duration) {
        let current = self.value();
        self.from = current;
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration.as_secs_f64();
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt.as_secs_f64()).min(self.duration);
    }

    pub fn finish(&mut self) {
        self.from = self.to;
        self.elapsed = self.duration;
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// A horizontal bar for one (category, period) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub id: String,
    pub label: String,
    pub x: f64,
    /// Offset inside the category band.
    pub y: f64,
    pub height: f64,
    pub fill: Rgb,
    width: Transition,
    exiting: bool,
}

impl Bar {
    pub fn width(&self) -> f64 {
        self.width.value()
    }

    pub fn target_width(&self) -> f64 {
        self.width.target()
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }
}

/// Desired state of a bar after an update.
#[derive(Debug, Clone, PartialEq)]
pub struct BarTarget {
    pub id: String,
    pub label: String,
    pub y: f64,
    pub height: f64,
    pub fill: Rgb,
    pub width: f64,
}

/// What a join did to the existing elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

impl std::ops::AddAssign for JoinStats {
    fn add_assign(&mut self, rhs: Self) {
        self.entered += rhs.entered;
        self.updated += rhs.updated;
        self.exited += rhs.exited;
    }
}

/// `<g class="category">`: the bars of one category, translated to its band.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub name: String,
    pub offset: f64,
    bars: Vec<Bar>,
}

impl CategoryGroup {
    pub fn new(name: impl Into<String>, offset: f64) -> Self {
        Self {
            name: name.into(),
            offset,
            bars: Vec::new(),
        }
    }

    /// All bars still in the tree, including ones animating out.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Bars bound to data (not exiting).
    pub fn live_bars(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter().filter(|b| !b.exiting)
    }

    /// Bind `targets` to the live bars by position. Extra targets enter at width 0,
    /// extra bars shrink to width 0 and are dropped once their transition ends.
    pub fn join_bars(&mut self, targets: Vec<BarTarget>, duration: Duration) -> JoinStats {
        let mut stats = JoinStats::default();
        let mut targets = targets.into_iter();
        for bar in self.bars.iter_mut().filter(|b| !b.exiting) {
            match targets.next() {
                Some(t) => {
                    bar.id = t.id;
                    bar.label = t.label;
                    bar.x = 0.0;
                    bar.y = t.y;
                    bar.height = t.height;
                    bar.fill = t.fill;
                    bar.width.retarget(t.width, duration);
                    stats.updated += 1;
                }
                None => {
                    bar.exiting = true;
                    bar.width.retarget(0.0, duration);
                    stats.exited += 1;
                }
            }
        }
        for t in targets {
            let mut width = Transition::at(0.0);
            width.retarget(t.width, duration);
            self.bars.push(Bar {
                id: t.id,
                label: t.label,
                x: 0.0,
                y: t.y,
                height: t.height,
                fill: t.fill,
                width,
                exiting: false,
            });
            stats.entered += 1;
        }
        if duration.is_zero() {
            self.bars.retain(|b| !b.exiting);
        }
        stats
    }

    fn advance(&mut self, dt: Duration) {
        for bar in &mut self.bars {
            bar.width.advance(dt);
        }
        self.bars.retain(|b| !(b.exiting && b.width.is_done()));
    }

    fn settle(&mut self) {
        for bar in &mut self.bars {
            bar.width.finish();
        }
        self.bars.retain(|b| !b.exiting);
    }

    fn is_animating(&self) -> bool {
        self.bars.iter().any(|b| !b.width.is_done())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f64,
    pub label: String,
}

/// `<g class="x axis">` / `<g class="y axis">`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    /// Translation of the axis group relative to the plot origin.
    pub origin: (f64, f64),
    /// Pixel extent of the domain line.
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl Axis {
    pub const TICK_SIZE: f64 = 6.0;
    pub const TICK_PADDING: f64 = 3.0;

    pub fn new(orient: AxisOrient, origin: (f64, f64), extent: (f64, f64)) -> Self {
        Self {
            orient,
            origin,
            extent,
            ticks: Vec::new(),
        }
    }
}

/// `<g class="legend">`: colour swatch plus right-aligned label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub offset_y: f64,
}

/// Join legend entries by label. The result follows the order of `targets`.
pub fn join_legend(current: &mut Vec<LegendEntry>, targets: Vec<LegendEntry>) -> JoinStats {
    let mut stats = JoinStats::default();
    let mut next = Vec::with_capacity(targets.len());
    for t in targets {
        match current.iter().position(|e| e.label == t.label) {
            Some(i) => {
                let mut entry = current.swap_remove(i);
                entry.color = t.color;
                entry.offset_y = t.offset_y;
                next.push(entry);
                stats.updated += 1;
            }
            None => {
                next.push(t);
                stats.entered += 1;
            }
        }
    }
    stats.exited = current.len();
    *current = next;
    stats
}

/// One `<input type="checkbox" class="category">` in the `.categories` container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_px: u32,
}

/// The whole chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub outer_width: u32,
    pub outer_height: u32,
    /// Plot origin inside the outer canvas (left, top margins).
    pub origin: (f64, f64),
    pub inner_width: f64,
    pub inner_height: f64,
    pub label_font_px: u32,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub groups: Vec<CategoryGroup>,
    pub legend: Vec<LegendEntry>,
    pub title: Title,
    pub checkboxes: Vec<Checkbox>,
}

impl Scene {
    pub fn advance(&mut self, dt: Duration) {
        for g in &mut self.groups {
            g.advance(dt);
        }
    }

    pub fn settle(&mut self) {
        for g in &mut self.groups {
            g.settle();
        }
    }

    pub fn is_animating(&self) -> bool {
        self.groups.iter().any(CategoryGroup::is_animating)
    }

    /// Every bar in the tree, with its group offset.
    pub fn bars(&self) -> impl Iterator<Item = (&CategoryGroup, &Bar)> {
        self.groups
            .iter()
            .flat_map(|g| g.bars().iter().map(move |b| (g, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: Duration = Duration::from_millis(250);

    fn target(id: &str, width: f64) -> BarTarget {
        BarTarget {
            id: id.into(),
            label: id.to_uppercase(),
            y: 0.0,
            height: 10.0,
            fill: Rgb::BLACK,
            width,
        }
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn transition_progresses_and_retargets_from_current() {
        let mut t = Transition::at(0.0);
        t.retarget(100.0, D);
        assert_eq!(t.value(), 0.0);
        t.advance(Duration::from_millis(125));
        assert!((t.value() - 50.0).abs() < 1e-9);
        t.retarget(0.0, D);
        assert!((t.value() - 50.0).abs() < 1e-9);
        t.advance(D);
        assert_eq!(t.value(), 0.0);
        assert!(t.is_done());
    }

    #[test]
    fn entering_bars_start_at_zero() {
        let mut g = CategoryGroup::new("c", 0.0);
        let stats = g.join_bars(vec![target("a", 40.0), target("b", 80.0)], D);
        assert_eq!(stats.entered, 2);
        assert!(g.bars().iter().all(|b| b.width() == 0.0));
        g.advance(D);
        assert_eq!(g.bars()[1].width(), 80.0);
    }

    #[test]
    fn join_is_positional_and_exits_shrink() {
        let mut g = CategoryGroup::new("c", 0.0);
        g.join_bars(vec![target("a", 40.0), target("b", 80.0)], D);
        g.settle();

        let stats = g.join_bars(vec![target("b", 80.0)], D);
        assert_eq!(
            stats,
            JoinStats {
                entered: 0,
                updated: 1,
                exited: 1
            }
        );
        // first element is re-bound to "b"
        assert_eq!(g.bars()[0].id, "b");
        assert!(g.bars()[1].is_exiting());
        assert_eq!(g.bars()[1].target_width(), 0.0);

        g.advance(Duration::from_millis(100));
        assert_eq!(g.bars().len(), 2);
        g.advance(D);
        assert_eq!(g.bars().len(), 1);
        assert_eq!(g.live_bars().count(), 1);
    }

    #[test]
    fn exiting_bars_are_not_rejoined() {
        let mut g = CategoryGroup::new("c", 0.0);
        g.join_bars(vec![target("a", 40.0), target("b", 80.0)], D);
        g.settle();
        g.join_bars(vec![target("a", 40.0)], D);
        let stats = g.join_bars(vec![target("a", 40.0), target("c", 20.0)], D);
        assert_eq!(stats.entered, 1);
        assert_eq!(g.bars().len(), 3);
        g.settle();
        let ids: Vec<&str> = g.bars().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn legend_join_by_label() {
        let entry = |l: &str, y: f64| LegendEntry {
            label: l.into(),
            color: Rgb::BLACK,
            offset_y: y,
        };
        let mut legend = vec![entry("Jan 2022", 200.0), entry("May 2022", 220.0)];
        let stats = join_legend(&mut legend, vec![entry("May 2022", 200.0), entry("Jan 2023", 220.0)]);
        assert_eq!(
            stats,
            JoinStats {
                entered: 1,
                updated: 1,
                exited: 1
            }
        );
        assert_eq!(legend[0].label, "May 2022");
        assert_eq!(legend[0].offset_y, 200.0);
        assert_eq!(legend[1].label, "Jan 2023");
    }
}
