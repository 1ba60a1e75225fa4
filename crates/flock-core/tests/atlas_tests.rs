// Integration tests for sprite cropping, atlas layout and manifest parsing.

use flock_core::manifest::{normalize_sprite_url, parse_manifest, parse_manifest_str};
use flock_core::{opaque_bounds, AtlasLayout, AtlasRect, FlockError, PixelRect};
use serde_json::json;

fn set_alpha(rgba: &mut [u8], width: u32, x: u32, y: u32, a: u8) {
    rgba[((y * width + x) * 4 + 3) as usize] = a;
}

#[test]
fn opaque_bounds_crop_to_visible_pixels() {
    let mut rgba = vec![0u8; 4 * 4 * 4];
    set_alpha(&mut rgba, 4, 1, 2, 255);
    set_alpha(&mut rgba, 4, 2, 3, 9);
    set_alpha(&mut rgba, 4, 0, 0, 8);
    assert_eq!(
        opaque_bounds(&rgba, 4, 4),
        PixelRect { x: 1, y: 2, w: 2, h: 2 }
    );
}

#[test]
fn transparent_or_short_images_keep_full_extent() {
    let full = PixelRect { x: 0, y: 0, w: 4, h: 4 };
    assert_eq!(opaque_bounds(&vec![0u8; 64], 4, 4), full);
    assert_eq!(opaque_bounds(&[255u8; 10], 4, 4), full);
}

#[test]
fn grid_is_near_square() {
    let layout = AtlasLayout::compute(&[(100, 50); 5]);
    assert_eq!((layout.cols, layout.rows), (3, 2));
    assert_eq!((layout.width, layout.height), (300, 100));
    assert_eq!(
        layout.placements[4],
        PixelRect { x: 100, y: 50, w: 100, h: 50 }
    );
    let rect = layout.rects()[4];
    assert!((rect.u0 - 1.0 / 3.0).abs() < 1e-6);
    assert!((rect.v0 - 0.5).abs() < 1e-6);
}

#[test]
fn smaller_sprites_are_centred_in_their_cell() {
    let layout = AtlasLayout::compute(&[(100, 50), (50, 100)]);
    assert_eq!((layout.width, layout.height), (200, 100));
    assert_eq!(layout.placements[0], PixelRect { x: 0, y: 25, w: 100, h: 50 });
    assert_eq!(layout.placements[1], PixelRect { x: 125, y: 0, w: 50, h: 100 });
}

#[test]
fn oversized_sprites_are_capped_per_cell() {
    let layout = AtlasLayout::compute(&[(512, 256)]);
    assert_eq!(layout.placements[0], PixelRect { x: 0, y: 0, w: 256, h: 128 });
}

#[test]
fn sheet_scales_down_to_max_size() {
    let layout = AtlasLayout::compute(&[(256, 256); 100]);
    assert_eq!(layout.width, 2048);
    assert_eq!(layout.height, 2048);
    for p in &layout.placements {
        assert!(p.x + p.w <= layout.width && p.y + p.h <= layout.height);
    }
    for rect in layout.rects() {
        assert!(rect.u0 + rect.us <= 1.0 + 1e-6);
        assert!(rect.v0 + rect.vs <= 1.0 + 1e-6);
    }
}

#[test]
fn full_rect_covers_texture() {
    assert_eq!(AtlasRect::FULL.to_array(), [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn sprite_urls_resolve_under_birds() {
    assert_eq!(normalize_sprite_url("crow.png").as_deref(), Some("/birds/crow.png"));
    assert_eq!(
        normalize_sprite_url("./birds/crow.png").as_deref(),
        Some("/birds/crow.png")
    );
    assert_eq!(
        normalize_sprite_url("Birds\\owl.png").as_deref(),
        Some("/birds/owl.png")
    );
    assert_eq!(
        normalize_sprite_url("flock\\a.png").as_deref(),
        Some("/birds/flock/a.png")
    );
    assert_eq!(
        normalize_sprite_url("/static/a.png").as_deref(),
        Some("/static/a.png")
    );
    assert_eq!(
        normalize_sprite_url("https://cdn.test/x.png").as_deref(),
        Some("https://cdn.test/x.png")
    );
    assert_eq!(normalize_sprite_url("   "), None);
}

#[test]
fn manifest_shapes() {
    let urls = parse_manifest(&json!({ "files": ["a.png", 3, "b.png"] })).unwrap();
    assert_eq!(urls, vec!["/birds/a.png", "/birds/b.png"]);
    assert_eq!(parse_manifest(&json!(["c.png"])).unwrap(), vec!["/birds/c.png"]);

    assert!(matches!(
        parse_manifest(&json!({ "files": [] })),
        Err(FlockError::EmptyManifest)
    ));
    assert!(matches!(
        parse_manifest(&json!({ "files": [1, 2] })),
        Err(FlockError::EmptyManifest)
    ));
    assert!(matches!(parse_manifest_str("nope"), Err(FlockError::Json(_))));
}
