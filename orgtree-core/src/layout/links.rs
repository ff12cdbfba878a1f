use super::PointF;

/// SVG path for a radial link: a cubic bump from source to target whose
/// control points sit on the mid-radius circle at each endpoint's angle.
pub fn radial_link_path(source_angle: f64, source_radius: f64, target_angle: f64, target_radius: f64) -> String {
    let mid = (source_radius + target_radius) / 2.0;
    let p0 = PointF::from_polar(source_angle, source_radius);
    let p1 = PointF::from_polar(source_angle, mid);
    let p2 = PointF::from_polar(target_angle, mid);
    let p3 = PointF::from_polar(target_angle, target_radius);
    format!(
        "M{},{}C{},{},{},{},{},{}",
        p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
    )
}
