// Integration tests for projection, the preset rig and the ambient volume.

use flock_core::{AmbientVolume, Camera, CameraPreset, CameraRig};
use glam::{Vec2, Vec3};

#[test]
fn project_and_unproject_agree() {
    let camera = Camera::default();
    let world = Vec3::new(3.0, 2.0, -4.0);
    let ndc = camera.project(world);
    assert!(ndc.x.abs() < 1.0 && ndc.y.abs() < 1.0);
    assert!((0.0..=1.0).contains(&ndc.z));
    assert!(camera.unproject(ndc).abs_diff_eq(world, 2e-2));
}

#[test]
fn right_vector_falls_back_when_looking_down() {
    let camera = Camera::default();
    assert!(camera.right_xz().abs_diff_eq(Vec2::X, 1e-5));

    let top = Camera {
        eye: Vec3::new(0.0, 10.0, 0.0),
        ..Camera::default()
    };
    assert_eq!(top.right_xz(), Vec2::X);
}

#[test]
fn rig_tweens_into_birds_eye_first() {
    let mut camera = Camera::default();
    let mut rig = CameraRig::default();
    assert!(!rig.update(&mut camera, 0.1));

    assert_eq!(rig.cycle(&camera), CameraPreset::BirdsEye);
    assert!(rig.is_active());
    assert!(rig.update(&mut camera, 1.0));
    assert!(rig.is_active());
    assert!(rig.update(&mut camera, 1.0));
    assert!(!rig.is_active());
    // keeps the starting azimuth (+Z)
    assert!(camera.eye.abs_diff_eq(Vec3::new(0.0, 44.0, 1.0), 1e-4));
    assert_eq!(camera.target, Vec3::ZERO);
    assert_eq!(rig.current(), Some(CameraPreset::BirdsEye));
}

#[test]
fn rig_cycles_all_presets_in_order() {
    let camera = Camera::default();
    let mut rig = CameraRig::default();
    let order: Vec<CameraPreset> = (0..5).map(|_| rig.cycle(&camera)).collect();
    assert_eq!(
        order,
        vec![
            CameraPreset::BirdsEye,
            CameraPreset::OuterMiddle,
            CameraPreset::LowGlide,
            CameraPreset::HighWide,
            CameraPreset::BirdsEye,
        ]
    );
}

#[test]
fn ambient_louder_up_close() {
    assert!((AmbientVolume::target_for_distance(8.0) - 0.25).abs() < 1e-6);
    assert!((AmbientVolume::target_for_distance(65.0) - 0.1).abs() < 1e-6);
    assert!((AmbientVolume::target_for_distance(200.0) - 0.1).abs() < 1e-6);

    let mut volume = AmbientVolume::default();
    assert_eq!(volume.current(), 0.25);
    for _ in 0..200 {
        volume.update(65.0);
    }
    assert!((volume.current() - 0.1).abs() < 1e-3);
}
