use glam::{Mat4, Vec3, Vec4};
use crate::math::AABB;
use super::*;

fn perspective_frustum(fov: f32, far: f32) -> Frustum {
    let projection = Mat4::perspective_rh(fov, 1.0, 0.1, far);
    let view = Mat4::look_at_rh(
        Vec3::new(0.0, 0.0, 5.0), // eye
        Vec3::ZERO,               // target
        Vec3::Y,                  // up
    );
    Frustum::from_view_projection(&(projection * view))
}

fn ortho_frustum() -> Frustum {
    let projection = Mat4::orthographic_rh(-5.0, 5.0, -5.0, 5.0, 0.1, 100.0);
    Frustum::from_view_projection(&projection)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_planes_are_normalized() {
    for frustum in [
        Frustum::from_view_projection(&Mat4::IDENTITY),
        perspective_frustum(std::f32::consts::FRAC_PI_4, 100.0),
        ortho_frustum(),
    ] {
        for plane in &frustum.planes {
            let normal_len = plane.truncate().length();
            assert!((normal_len - 1.0).abs() < 1e-4, "plane normal should be unit length");
        }
    }
}

#[test]
fn test_from_planes_normalizes() {
    let frustum = Frustum::from_planes([Vec4::new(2.0, 0.0, 0.0, 4.0); 6]);
    assert_eq!(frustum.planes[PLANE_LEFT], Vec4::new(1.0, 0.0, 0.0, 2.0));
}

#[test]
fn test_plane_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
}

#[test]
fn test_contains_point() {
    let frustum = perspective_frustum(std::f32::consts::FRAC_PI_2, 100.0);
    assert!(frustum.contains_point(Vec3::ZERO));
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0))); // behind eye
    assert!(frustum.distance(PLANE_NEAR, Vec3::ZERO) > 0.0);
}

// ============================================================================
// Frustum::intersects_aabb
// ============================================================================

#[test]
fn test_aabb_inside_frustum() {
    let frustum = perspective_frustum(std::f32::consts::FRAC_PI_2, 100.0);
    let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    assert!(frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_outside_frustum() {
    let frustum = perspective_frustum(std::f32::consts::FRAC_PI_4, 100.0);
    let aabb = AABB::new(Vec3::splat(100.0), Vec3::splat(101.0));
    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_behind_camera() {
    let frustum = perspective_frustum(std::f32::consts::FRAC_PI_2, 100.0);
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, 10.0), Vec3::new(1.0, 1.0, 12.0));
    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_beyond_far_plane() {
    let frustum = perspective_frustum(std::f32::consts::FRAC_PI_2, 10.0);
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, -20.0), Vec3::new(1.0, 1.0, -18.0));
    assert!(!frustum.intersects_aabb(&aabb));
}

#[test]
fn test_aabb_straddling_boundary() {
    let frustum = ortho_frustum();
    let aabb = AABB::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));
    assert!(frustum.intersects_aabb(&aabb));
}

// ============================================================================
// Frustum::classify_aabb
// ============================================================================

#[test]
fn test_classify_inside() {
    let frustum = ortho_frustum();
    let aabb = AABB::new(Vec3::new(-1.0, -1.0, -10.0), Vec3::new(1.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Inside);
}

#[test]
fn test_classify_partial() {
    let frustum = ortho_frustum();
    let aabb = AABB::new(Vec3::new(4.0, 0.0, -10.0), Vec3::new(6.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Partial);
}

#[test]
fn test_classify_outside() {
    let frustum = ortho_frustum();
    let aabb = AABB::new(Vec3::new(20.0, 0.0, -10.0), Vec3::new(22.0, 1.0, -5.0));
    assert_eq!(frustum.classify_aabb(&aabb), FrustumTest::Outside);
}

#[test]
fn test_classify_agrees_with_intersects() {
    let frustum = perspective_frustum(std::f32::consts::FRAC_PI_4, 50.0);
    let boxes = [
        AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
        AABB::new(Vec3::new(-100.0, -1.0, -1.0), Vec3::new(100.0, 1.0, 1.0)),
        AABB::new(Vec3::new(50.0, 50.0, 50.0), Vec3::new(51.0, 51.0, 51.0)),
    ];
    for aabb in &boxes {
        let visible = frustum.classify_aabb(aabb) != FrustumTest::Outside;
        assert_eq!(visible, frustum.intersects_aabb(aabb));
    }
}
