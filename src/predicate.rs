//! The predicate layer (§4.2): orientation, azimuth, intersection,
//! containment, simplicity, linear referencing and polygonization.
//!
//! These are free functions over `geo::Coord<f64>` and coordinate slices —
//! no dispatch on geometry type is needed inside the kernel, per the spec's
//! own "closed trait" design note.

use std::f64::consts::PI;

use geo::Coord;

use crate::error::{Result, SpatialError};

/// A small relative epsilon used by `orientation` to decide collinearity.
/// Naive floating point evaluation is used; extended-precision arithmetic
/// is treated as a black-box implementation detail of this primitive (§1).
const ORIENTATION_EPS: f64 = 1e-9;

/// Sign of the signed area of the triangle `(p1, p2, q)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

impl Orientation {
    pub fn as_i8(self) -> i8 {
        match self {
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
            Orientation::CounterClockwise => 1,
        }
    }
}

/// Sign of the signed area of triangle (p1,p2,q). Positive area (CCW turn)
/// maps to `Orientation::CounterClockwise`.
pub fn orientation(p1: Coord<f64>, p2: Coord<f64>, q: Coord<f64>) -> Orientation {
    let cross = (p2.x - p1.x) * (q.y - p1.y) - (p2.y - p1.y) * (q.x - p1.x);
    let scale = (p2.x - p1.x).abs().max((p2.y - p1.y).abs()).max((q.x - p1.x).abs()).max((q.y - p1.y).abs()).max(1.0);
    let eps = ORIENTATION_EPS * scale * scale;
    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Angle of directed segment `a -> b`, measured clockwise from north, in
/// `[0, 2*PI)`. `a == b` is an error.
pub fn azimuth(a: Coord<f64>, b: Coord<f64>) -> Result<f64> {
    if a.x == b.x && a.y == b.y {
        return Err(SpatialError::DegenerateAzimuth);
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut angle = dx.atan2(dy);
    if angle < 0.0 {
        angle += 2.0 * PI;
    }
    Ok(angle)
}

// ---------------------------------------------------------------------------
// Segment-level helpers
// ---------------------------------------------------------------------------

fn on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);
    p.x >= min_x - 1e-12 && p.x <= max_x + 1e-12 && p.y >= min_y - 1e-12 && p.y <= max_y + 1e-12
}

/// Result of intersecting two closed line segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegIntersection {
    None,
    /// The segments meet at exactly one point.
    Point(Coord<f64>),
    /// The segments are collinear and overlap along a sub-segment.
    Collinear(Coord<f64>, Coord<f64>),
}

/// Intersect two closed segments `(a,b)` and `(c,d)`.
pub fn segment_intersection(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, d: Coord<f64>) -> SegIntersection {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 != o2 && o3 != o4 {
        // Proper or endpoint-touching crossing; solve the two line equations.
        let d1x = b.x - a.x;
        let d1y = b.y - a.y;
        let d2x = d.x - c.x;
        let d2y = d.y - c.y;
        let denom = d1x * d2y - d1y * d2x;
        if denom.abs() > 1e-15 {
            let t = ((c.x - a.x) * d2y - (c.y - a.y) * d2x) / denom;
            return SegIntersection::Point(Coord { x: a.x + t * d1x, y: a.y + t * d1y });
        }
    }

    // Collinear special cases.
    if o1 == Orientation::Collinear && on_segment(c, a, b) {
        return collinear_overlap(a, b, c, d);
    }
    if o2 == Orientation::Collinear && on_segment(d, a, b) {
        return collinear_overlap(a, b, c, d);
    }
    if o3 == Orientation::Collinear && on_segment(a, c, d) {
        return collinear_overlap(a, b, c, d);
    }
    if o4 == Orientation::Collinear && on_segment(b, c, d) {
        return collinear_overlap(a, b, c, d);
    }

    SegIntersection::None
}

fn collinear_overlap(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, d: Coord<f64>) -> SegIntersection {
    // Project onto the dominant axis and intersect the resulting intervals.
    let along_x = (b.x - a.x).abs() >= (b.y - a.y).abs();
    let key = |p: Coord<f64>| if along_x { p.x } else { p.y };

    let (mut lo1, mut hi1) = (key(a), key(b));
    if lo1 > hi1 {
        std::mem::swap(&mut lo1, &mut hi1);
    }
    let (mut lo2, mut hi2) = (key(c), key(d));
    if lo2 > hi2 {
        std::mem::swap(&mut lo2, &mut hi2);
    }
    let lo = lo1.max(lo2);
    let hi = hi1.min(hi2);
    if hi < lo - 1e-12 {
        return SegIntersection::None;
    }
    if (hi - lo).abs() <= 1e-12 {
        // Degenerate overlap: touches at a single point.
        let t = if (key(b) - key(a)).abs() > 1e-15 { (lo - key(a)) / (key(b) - key(a)) } else { 0.0 };
        let p = Coord { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) };
        return SegIntersection::Point(p);
    }
    let at = |v: f64| -> Coord<f64> {
        let t = if (key(b) - key(a)).abs() > 1e-15 { (v - key(a)) / (key(b) - key(a)) } else { 0.0 };
        Coord { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) }
    };
    SegIntersection::Collinear(at(lo), at(hi))
}

fn segments(cs: &[Coord<f64>]) -> impl Iterator<Item = (Coord<f64>, Coord<f64>)> + '_ {
    cs.windows(2).map(|w| (w[0], w[1]))
}

/// True iff the two polylines share at least one point.
pub fn intersects(cs1: &[Coord<f64>], cs2: &[Coord<f64>]) -> bool {
    for (a, b) in segments(cs1) {
        for (c, d) in segments(cs2) {
            if segment_intersection(a, b, c, d) != SegIntersection::None {
                return true;
            }
        }
    }
    false
}

/// The three relate predicates the kernel actually consumes: whether the two
/// polylines overlap on a collinear sub-segment, whether they cross
/// transversally (interiors meet at a point not shared by an endpoint pair),
/// and whether they touch somewhere that is *not* a coordinate shared by an
/// endpoint of both polylines (§3: "touch other than at a shared endpoint
/// node" is itself a structural violation — a touch exactly at a mutual
/// endpoint is not recorded here at all, since that is the ordinary case of
/// two edges meeting at a node).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Relate {
    pub coincident: bool,
    pub crosses: bool,
    pub touches: bool,
}

impl Relate {
    pub fn is_coincident(&self) -> bool {
        self.coincident
    }
    pub fn properly_intersects(&self) -> bool {
        self.crosses || self.touches
    }
    pub fn crosses(&self) -> bool {
        self.crosses
    }
}

fn coord_eq(a: Coord<f64>, b: Coord<f64>) -> bool {
    a.x == b.x && a.y == b.y
}

fn is_shared_endpoint(p: Coord<f64>, cs1: &[Coord<f64>], cs2: &[Coord<f64>]) -> bool {
    let ends1 = [cs1[0], cs1[cs1.len() - 1]];
    let ends2 = [cs2[0], cs2[cs2.len() - 1]];
    ends1.iter().any(|e| coord_eq(*e, p)) && ends2.iter().any(|e| coord_eq(*e, p))
}

/// Returns the DE-9IM-style relation between two polylines, reduced to the
/// three cells the kernel tests. A touch exactly at a coordinate shared by
/// an endpoint of both `cs1` and `cs2` is the ordinary case of two edges
/// meeting at a common node and is not recorded as `touches` — only a touch
/// elsewhere (the interior of one polyline, or an endpoint of only one of
/// them) is.
pub fn relate(cs1: &[Coord<f64>], cs2: &[Coord<f64>]) -> Relate {
    let mut rel = Relate::default();
    for (a, b) in segments(cs1) {
        for (c, d) in segments(cs2) {
            match segment_intersection(a, b, c, d) {
                SegIntersection::None => {}
                SegIntersection::Collinear(_, _) => rel.coincident = true,
                SegIntersection::Point(p) => {
                    if is_shared_endpoint(p, cs1, cs2) {
                        // Two edges meeting at a common node: not a violation.
                    } else if on_segment(p, a, b) && on_segment(p, c, d)
                        && !coord_eq(p, a) && !coord_eq(p, b) && !coord_eq(p, c) && !coord_eq(p, d)
                    {
                        rel.crosses = true;
                    } else {
                        rel.touches = true;
                    }
                }
            }
        }
    }
    rel
}

/// True iff the polyline has no self-intersection other than the closing
/// vertex of a ring (first coordinate == last coordinate).
pub fn is_simple(cs: &[Coord<f64>]) -> bool {
    if cs.len() < 2 {
        return true;
    }
    let is_ring = coord_eq(cs[0], cs[cs.len() - 1]) && cs.len() > 3;
    let segs: Vec<(Coord<f64>, Coord<f64>)> = segments(cs).collect();
    let n = segs.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (is_ring && i == 0 && j == n - 1);
            let (a, b) = segs[i];
            let (c, d) = segs[j];
            match segment_intersection(a, b, c, d) {
                SegIntersection::None => {}
                SegIntersection::Collinear(_, _) => return false,
                SegIntersection::Point(p) => {
                    if adjacent {
                        // Adjacent segments are expected to meet at their
                        // shared vertex exactly.
                        let shared = if j == i + 1 { b } else { a };
                        if !coord_eq(p, shared) {
                            return false;
                        }
                    } else {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Shoelace-convention signed area of a closed ring. Positive ⇒ clockwise,
/// non-positive ⇒ counter-clockwise, per the convention used throughout
/// this kernel (the negative of the textbook shoelace sign).
pub fn signed_area(ring: &[Coord<f64>]) -> f64 {
    let mut sum = 0.0;
    for (a, b) in segments(ring) {
        sum += a.x * b.y - b.x * a.y;
    }
    -0.5 * sum
}

/// Winding-number point-in-polygon test. A point exactly on the shell is
/// treated as outside.
pub fn point_in_poly(c: Coord<f64>, shell: &[Coord<f64>]) -> bool {
    let mut winding = 0i32;
    for (a, b) in segments(shell) {
        // Exact-boundary check first.
        if on_segment(c, a, b) && orientation(a, b, c) == Orientation::Collinear {
            return false;
        }
        if a.y <= c.y {
            if b.y > c.y && orientation(a, b, c) == Orientation::CounterClockwise {
                winding += 1;
            }
        } else if b.y <= c.y && orientation(a, b, c) == Orientation::Clockwise {
            winding -= 1;
        }
    }
    winding != 0
}

fn dist_point_to_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> (f64, Coord<f64>) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 <= 1e-18 {
        let d = ((p.x - a.x).powi(2) + (p.y - a.y).powi(2)).sqrt();
        return (d, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    let proj = Coord { x: a.x + t * dx, y: a.y + t * dy };
    let d = ((p.x - proj.x).powi(2) + (p.y - proj.y).powi(2)).sqrt();
    (d, proj)
}

/// Minimum Euclidean distance from a point to a polyline.
pub fn distance(c: Coord<f64>, cs: &[Coord<f64>]) -> f64 {
    segments(cs).map(|(a, b)| dist_point_to_segment(c, a, b).0).fold(f64::INFINITY, f64::min)
}

/// Splits a polyline at the projection of `c` onto its nearest segment.
/// The joining point equals the projection, not necessarily `c` itself.
pub fn split(cs: &[Coord<f64>], c: Coord<f64>) -> (Vec<Coord<f64>>, Vec<Coord<f64>>) {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    let mut best_proj = cs[0];
    for (i, (a, b)) in segments(cs).enumerate() {
        let (d, proj) = dist_point_to_segment(c, a, b);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
            best_proj = proj;
        }
    }
    let mut first: Vec<Coord<f64>> = cs[..=best_idx].to_vec();
    if !coord_eq(*first.last().unwrap(), best_proj) {
        first.push(best_proj);
    }
    let mut second: Vec<Coord<f64>> = Vec::new();
    second.push(best_proj);
    second.extend_from_slice(&cs[best_idx + 1..]);
    (first, second)
}

/// Assembles a list of noded linestrings into the boundary of the (unique)
/// face they enclose, chaining them end-to-end (allowing reversal).
pub fn polygonize(css: &[Vec<Coord<f64>>]) -> Result<Vec<Coord<f64>>> {
    if css.is_empty() {
        return Err(SpatialError::InvalidPolygonization);
    }
    let mut remaining: Vec<Vec<Coord<f64>>> = css.to_vec();
    let mut ring = remaining.remove(0);

    while !coord_eq(ring[0], *ring.last().unwrap()) {
        let tail = *ring.last().unwrap();
        let pos = remaining.iter().position(|seg| coord_eq(seg[0], tail) || coord_eq(*seg.last().unwrap(), tail));
        match pos {
            Some(i) => {
                let mut seg = remaining.remove(i);
                if coord_eq(*seg.last().unwrap(), tail) {
                    seg.reverse();
                }
                // seg[0] == tail now; drop the duplicate joining point.
                ring.extend(seg.into_iter().skip(1));
            }
            None => return Err(SpatialError::InvalidPolygonization),
        }
    }
    if !remaining.is_empty() {
        return Err(SpatialError::InvalidPolygonization);
    }
    if !is_simple(&ring) {
        return Err(SpatialError::InvalidPolygonization);
    }
    Ok(ring)
}
