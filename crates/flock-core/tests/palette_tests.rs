// Integration tests for the colour modes and the infection spread.

use flock_core::{hsl_to_rgb, ColorMode, Palette};
use glam::Vec3;

fn line_positions(n: usize) -> Vec<Vec3> {
    (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
}

#[test]
fn hsl_primaries() {
    assert!(hsl_to_rgb(0.0, 1.0, 0.5).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
    assert!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5).abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));
    assert!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5).abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
    assert!(hsl_to_rgb(0.4, 0.0, 0.3).abs_diff_eq(Vec3::splat(0.3), 1e-6));
}

#[test]
fn mode_cycle_wraps_without_touching_tints() {
    let mut palette = Palette::new(1);
    assert_eq!(palette.mode(), ColorMode::Infection);
    assert_eq!(palette.cycle_mode(), ColorMode::Family);
    assert_eq!(palette.cycle_mode(), ColorMode::Rainbow);
    assert_eq!(palette.cycle_mode(), ColorMode::Infection);
}

#[test]
fn infection_spreads_to_nearest_neighbours() {
    let n = 20;
    let positions = line_positions(n);
    let mut tints = vec![Vec3::ONE; n];
    let mut palette = Palette::new(7);

    palette.trigger(&mut tints, &positions);
    assert_eq!(palette.infection().count(), 1);
    let first_hue = palette.infection().hue;
    assert_eq!(tints.iter().filter(|t| **t == Vec3::ONE).count(), n - 1);

    palette.trigger(&mut tints, &positions);
    assert_eq!(palette.infection().count(), 16);
    // growth along a line stays contiguous
    let infected: Vec<usize> = (0..n).filter(|&i| palette.infection().is_infected(i)).collect();
    assert_eq!(infected.last().unwrap() - infected[0] + 1, infected.len());

    palette.trigger(&mut tints, &positions);
    assert_eq!(palette.infection().count(), n);

    palette.trigger(&mut tints, &positions);
    assert_eq!(palette.infection().count(), 1);
    let expected = (first_hue + 0.5) % 1.0;
    assert!((palette.infection().hue - expected).abs() < 1e-5);
}

#[test]
fn rainbow_and_family_repaint_every_tint() {
    let n = 32;
    let positions = line_positions(n);
    let mut tints = vec![Vec3::ONE; n];
    let mut palette = Palette::new(3);

    palette.cycle_mode();
    palette.trigger(&mut tints, &positions);
    assert!(tints.iter().all(|t| *t != Vec3::ONE));

    palette.cycle_mode();
    let before = tints.clone();
    palette.trigger(&mut tints, &positions);
    assert_ne!(before, tints);
    assert!(tints.iter().all(|t| t.min_element() >= 0.0 && t.max_element() <= 1.0));
}

#[test]
fn reset_with_explicit_hue() {
    let mut tints = vec![Vec3::ZERO; 5];
    let mut palette = Palette::new(11);
    palette.reset_infection(&mut tints, Some(1.25));
    assert!((palette.infection().hue - 0.25).abs() < 1e-6);
    assert_eq!(palette.infection().count(), 1);
    assert_eq!(tints.iter().filter(|t| **t == Vec3::ZERO).count(), 4);
}

#[test]
fn restarted_infection_spreads_over_previous_colours() {
    let n = 20;
    let positions = line_positions(n);
    let mut tints = vec![Vec3::ONE; n];
    let mut palette = Palette::new(5);
    while palette.infection().count() < n {
        palette.trigger(&mut tints, &positions);
    }
    let before = tints.clone();

    palette.trigger(&mut tints, &positions);
    assert_eq!(palette.infection().count(), 1);
    let kept = (0..n).filter(|&i| tints[i] == before[i]).count();
    assert_eq!(kept, n - 1);
    assert!(tints.iter().all(|t| *t != Vec3::ONE));
}
