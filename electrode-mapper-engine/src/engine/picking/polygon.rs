use bevy::prelude::*;

/// Where a point lies relative to a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Boundary,
    Outside,
}

/// Classify a point against a closed polygon (last vertex joins the first).
///
/// Works for self-intersecting lasso outlines using the even-odd rule.
/// Arithmetic is done in f64 so collinearity checks on f32 input are exact.
/// Polygons with fewer than three vertices contain nothing.
pub fn classify_point(polygon: &[Vec2], point: Vec2) -> Containment {
    if polygon.len() < 3 {
        return Containment::Outside;
    }

    let (px, py) = (point.x as f64, point.y as f64);
    let mut inside = false;

    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);

        if on_segment(ax, ay, bx, by, px, py) {
            return Containment::Boundary;
        }

        // Half-open rule on y so shared vertices are counted once.
        if (ay > py) != (by > py) {
            let x_cross = ax + (py - ay) * (bx - ax) / (by - ay);
            if px < x_cross {
                inside = !inside;
            }
        }
    }

    if inside {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// Strict containment: boundary points count as outside.
pub fn is_inside(polygon: &[Vec2], point: Vec2) -> bool {
    classify_point(polygon, point) == Containment::Inside
}

fn on_segment(ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64) -> bool {
    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    if cross != 0.0 {
        return false;
    }
    px >= ax.min(bx) && px <= ax.max(bx) && py >= ay.min(by) && py <= ay.max(by)
}
