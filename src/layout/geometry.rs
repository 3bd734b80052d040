//! Plane vector helpers over `[f64; 2]`.

pub type Point = [f64; 2];

pub fn add(a: Point, b: Point) -> Point {
    [a[0] + b[0], a[1] + b[1]]
}

pub fn sub(a: Point, b: Point) -> Point {
    [a[0] - b[0], a[1] - b[1]]
}

pub fn scale(a: Point, k: f64) -> Point {
    [a[0] * k, a[1] * k]
}

pub fn length(a: Point) -> f64 {
    a[0].hypot(a[1])
}

pub fn distance(a: Point, b: Point) -> f64 {
    length(sub(a, b))
}

/// Unit vector along `a`, or +x for a zero vector.
pub fn normalize(a: Point) -> Point {
    let len = length(a);
    if len < 1e-12 {
        [1.0, 0.0]
    } else {
        scale(a, 1.0 / len)
    }
}

pub fn angle(a: Point) -> f64 {
    a[1].atan2(a[0])
}

pub fn from_angle(theta: f64) -> Point {
    [theta.cos(), theta.sin()]
}

/// Counter-clockwise rotation about the origin.
pub fn rotate(a: Point, theta: f64) -> Point {
    let (s, c) = theta.sin_cos();
    [a[0] * c - a[1] * s, a[0] * s + a[1] * c]
}

pub fn rotate_about(a: Point, center: Point, theta: f64) -> Point {
    add(rotate(sub(a, center), theta), center)
}

pub fn centroid<I: IntoIterator<Item = Point>>(points: I) -> Option<Point> {
    let mut sum = [0.0, 0.0];
    let mut count = 0usize;
    for p in points {
        sum = add(sum, p);
        count += 1;
    }
    (count > 0).then(|| scale(sum, 1.0 / count as f64))
}

/// Axis-aligned bounds as `(min, max)`.
pub fn bounds<I: IntoIterator<Item = Point>>(points: I) -> Option<(Point, Point)> {
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((lo, hi)) => Some((
            [lo[0].min(p[0]), lo[1].min(p[1])],
            [hi[0].max(p[0]), hi[1].max(p[1])],
        )),
    })
}

/// Left-hand normal of `a`.
pub fn perpendicular(a: Point) -> Point {
    [-a[1], a[0]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: Point, b: Point) -> bool {
        distance(a, b) < 1e-9
    }

    #[test]
    fn rotation() {
        assert!(close(rotate([1.0, 0.0], FRAC_PI_2), [0.0, 1.0]));
        assert!(close(rotate_about([2.0, 1.0], [1.0, 1.0], FRAC_PI_2), [1.0, 2.0]));
    }

    #[test]
    fn centroid_and_bounds() {
        let pts = [[0.0, 0.0], [2.0, 0.0], [1.0, 3.0]];
        assert!(close(centroid(pts).unwrap(), [1.0, 1.0]));
        assert_eq!(bounds(pts), Some(([0.0, 0.0], [2.0, 3.0])));
        assert_eq!(centroid(std::iter::empty()), None);
    }

    #[test]
    fn normalize_zero_is_defined() {
        assert_eq!(normalize([0.0, 0.0]), [1.0, 0.0]);
        assert!(close(normalize([3.0, 4.0]), [0.6, 0.8]));
    }
}
