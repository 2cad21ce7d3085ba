//! Link curves.
//!
//! A link is drawn as a cubic bezier whose control points leave each
//! connector horizontally, outward from the node, by a quarter of the
//! distance between the two endpoints.

use crate::connection::Side;
use crate::viewport::Viewport;

/// Cubic bezier curve between two connector centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkCurve {
    pub p0: (f32, f32), // Start point
    pub p1: (f32, f32), // Control point 1
    pub p2: (f32, f32), // Control point 2
    pub p3: (f32, f32), // End point
}

impl LinkCurve {
    /// Curve leaving a connector on `side` at `start` and ending at `end`.
    ///
    /// Curves drawn from an input bend left first, curves from an output bend
    /// right, so a link dragged out of either end looks the same once dropped.
    pub fn new(start: (f32, f32), side: Side, end: (f32, f32)) -> Self {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let reach = (dx * dx + dy * dy).sqrt() / 4.0;
        let reach = match side {
            Side::Input => -reach,
            Side::Output => reach,
        };

        LinkCurve {
            p0: start,
            p1: (start.0 + reach, start.1),
            p2: (end.0 - reach, end.1),
            p3: end,
        }
    }

    /// The same curve in screen space.
    pub fn to_screen(&self, viewport: &Viewport) -> Self {
        let map = |(x, y): (f32, f32)| viewport.canvas_to_screen(x, y);
        LinkCurve {
            p0: map(self.p0),
            p1: map(self.p1),
            p2: map(self.p2),
            p3: map(self.p3),
        }
    }

    /// SVG path commands, e.g. `M 10 20 C 60 20 90 80 140 80`.
    pub fn commands(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.0, self.p0.1, self.p1.0, self.p1.1, self.p2.0, self.p2.1, self.p3.0, self.p3.1
        )
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> (f32, f32) {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.0 + 3.0 * mt2 * t * self.p1.0 + 3.0 * mt * t2 * self.p2.0 + t3 * self.p3.0;
        let y = mt3 * self.p0.1 + 3.0 * mt2 * t * self.p1.1 + 3.0 * mt * t2 * self.p2.1 + t3 * self.p3.1;

        (x, y)
    }
}
