// Properties of the two camera models that must hold for any input.

use approx::assert_relative_eq;
use proptest::prelude::*;
use skyline_panorama::camera::{
    zoom_fov, CameraRig, DragLook, DragSession, OrbitControls, Orientation, MAX_DISTANCE,
    MAX_FOV, MAX_LATITUDE, MAX_POLAR, MIN_DISTANCE, MIN_FOV, MIN_LATITUDE, MIN_POLAR,
};
use skyline_panorama::panorama::{Variant, SPHERE_RADIUS};

proptest! {
    #[test]
    fn latitude_always_clamped(start_lat in -85.0f32..=85.0, y0 in -1e5f32..1e5, y1 in -1e5f32..1e5) {
        let session = DragSession {
            start: Orientation::new(0.0, start_lat),
            start_x: 0.0,
            start_y: y0,
        };
        let o = session.orientation_at(0.0, y1);
        prop_assert!(o.lat >= MIN_LATITUDE && o.lat <= MAX_LATITUDE);
    }

    #[test]
    fn fov_always_clamped(start in MIN_FOV..=MAX_FOV, deltas in prop::collection::vec(-5000.0f32..5000.0, 1..20)) {
        let mut fov = start;
        for d in deltas {
            fov = zoom_fov(fov, d);
            prop_assert!((MIN_FOV..=MAX_FOV).contains(&fov));
        }
    }

    #[test]
    fn orbit_distance_always_clamped(deltas in prop::collection::vec(-3000.0f32..3000.0, 1..30)) {
        let mut orbit = OrbitControls::default();
        for d in deltas {
            orbit.wheel(d);
            orbit.tick();
            let dist = orbit.distance();
            prop_assert!(dist >= MIN_DISTANCE - 1e-3 && dist <= MAX_DISTANCE + 1e-2, "distance {}", dist);
        }
    }

    #[test]
    fn orbit_polar_always_in_band(moves in prop::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..20)) {
        let mut orbit = OrbitControls::default();
        orbit.pointer_down(0.0, 0.0);
        for (x, y) in moves {
            orbit.pointer_move(x, y);
            orbit.tick();
            let phi = orbit.polar_angle();
            prop_assert!(phi >= MIN_POLAR - 1e-4 && phi <= MAX_POLAR + 1e-4, "phi {}", phi);
        }
    }

    #[test]
    fn drag_replay_is_deterministic(
        lon in -720.0f32..720.0,
        lat in -85.0f32..=85.0,
        sx in 0.0f32..4000.0, sy in 0.0f32..4000.0,
        cx in 0.0f32..4000.0, cy in 0.0f32..4000.0,
    ) {
        let session = DragSession { start: Orientation::new(lon, lat), start_x: sx, start_y: sy };
        prop_assert_eq!(session.orientation_at(cx, cy), session.orientation_at(cx, cy));

        // 中间经过任意位置不影响结果
        let mut look = DragLook::default();
        look.orientation = Orientation::new(lon, lat);
        look.pointer_down(sx, sy);
        look.pointer_move(cx * 0.5, cy * 0.25);
        look.pointer_move(cx, cy);
        prop_assert_eq!(look.orientation, session.orientation_at(cx, cy));
    }

    #[test]
    fn look_target_lies_on_sphere(lon in -360.0f32..360.0, lat in -85.0f32..=85.0) {
        let t = Orientation::new(lon, lat).look_target(SPHERE_RADIUS);
        prop_assert!((t.length() - SPHERE_RADIUS).abs() < 0.05);
    }
}

#[test]
fn drag_scenario_from_100_to_150() {
    let mut rig = CameraRig::for_variant(Variant::Drag);
    rig.pointer_down(100.0, 100.0);
    rig.pointer_move(150.0, 100.0);
    let CameraRig::Drag(look) = &rig else {
        panic!("drag variant builds a DragLook");
    };
    assert_relative_eq!(look.orientation.lon, -5.0);
    assert_relative_eq!(look.orientation.lat, 0.0);
}

#[test]
fn wheel_at_max_fov_does_not_change_it() {
    let mut look = DragLook::default();
    assert_eq!(look.fov, 75.0);
    look.wheel(100.0);
    assert_eq!(look.fov, 75.0);
}

#[test]
fn latitude_ninety_clamps_to_eighty_five() {
    let session = DragSession {
        start: Orientation::default(),
        start_x: 0.0,
        start_y: 0.0,
    };
    assert_eq!(session.orientation_at(0.0, 900.0).lat, 85.0);
}

#[test]
fn zero_orientation_targets_forward_axis() {
    let pose = DragLook::default().tick();
    assert_relative_eq!(pose.target.x, SPHERE_RADIUS, epsilon = 1e-3);
    assert_relative_eq!(pose.target.y, 0.0, epsilon = 1e-3);
    assert_relative_eq!(pose.target.z, 0.0, epsilon = 1e-3);
}

#[test]
fn every_frame_recomputes_without_input() {
    let mut rig = CameraRig::for_variant(Variant::Orbit);
    rig.pointer_down(0.0, 0.0);
    rig.pointer_move(300.0, 0.0);
    rig.pointer_up();
    let a = rig.tick();
    let b = rig.tick();
    // 阻尼仍在推动相机
    assert_ne!(a.eye, b.eye);
}

#[test]
fn view_projection_is_finite_for_both_models() {
    for variant in [Variant::Orbit, Variant::Drag] {
        let mut rig = CameraRig::for_variant(variant);
        let m = rig.tick().view_proj(16.0 / 9.0);
        assert!(m.to_cols_array().iter().all(|v| v.is_finite()), "{variant:?}");
    }
}
