pub type Point = (f64, f64);

/// Cubic Bezier curve in expanded polynomial form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn from_points(points: [Point; 4]) -> Self {
        Self::new(points[0], points[1], points[2], points[3])
    }

    pub fn point_at(&self, t: f64) -> Point {
        let (a, b, c) = self.coefficients();
        let tt = t * t;
        let ttt = tt * t;
        (
            a.0 * ttt + b.0 * tt + c.0 * t + self.p0.0,
            a.1 * ttt + b.1 * tt + c.1 * t + self.p0.1,
        )
    }

    /// Samples `count` points at `t = i / count` for `i` in `0..count`.
    ///
    /// The end point (`t = 1`) is never produced; stitched curves pick it up
    /// as the start of the following segment.
    pub fn samples(&self, count: usize) -> CubicSamples {
        let (a, b, c) = self.coefficients();
        CubicSamples {
            a,
            b,
            c,
            d: self.p0,
            index: 0,
            count,
        }
    }

    fn coefficients(&self) -> (Point, Point, Point) {
        let cx = 3.0 * (self.p1.0 - self.p0.0);
        let bx = 3.0 * (self.p2.0 - self.p1.0) - cx;
        let ax = self.p3.0 - self.p0.0 - cx - bx;
        let cy = 3.0 * (self.p1.1 - self.p0.1);
        let by = 3.0 * (self.p2.1 - self.p1.1) - cy;
        let ay = self.p3.1 - self.p0.1 - cy - by;
        ((ax, ay), (bx, by), (cx, cy))
    }
}

#[derive(Clone, Debug)]
pub struct CubicSamples {
    a: Point,
    b: Point,
    c: Point,
    d: Point,
    index: usize,
    count: usize,
}

impl Iterator for CubicSamples {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.index >= self.count {
            return None;
        }
        let t = self.index as f64 / self.count as f64;
        self.index += 1;
        let tt = t * t;
        let ttt = tt * t;
        Some((
            self.a.0 * ttt + self.b.0 * tt + self.c.0 * t + self.d.0,
            self.a.1 * ttt + self.b.1 * tt + self.c.1 * t + self.d.1,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CubicSamples {}
