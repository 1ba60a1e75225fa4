use crate::edits_io::fetch_text;
use flock_core::constants::SPRITE_MANIFEST_URL;
use flock_core::manifest::parse_manifest_str;
use flock_core::{opaque_bounds, AtlasLayout, AtlasRect, PixelRect};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Packed RGBA atlas ready for upload, with one UV rect per sprite.
pub struct SpriteAtlas {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub rects: Vec<AtlasRect>,
}

fn context_2d(
    document: &web::Document,
    width: u32,
    height: u32,
) -> anyhow::Result<web::CanvasRenderingContext2d> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
}

fn read_pixels(
    ctx: &web::CanvasRenderingContext2d,
    width: u32,
    height: u32,
) -> anyhow::Result<Vec<u8>> {
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(data.data().0)
}

async fn load_image(url: &str) -> anyhow::Result<web::HtmlImageElement> {
    let img = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    img.set_src(url);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| anyhow::anyhow!("image {} failed to load: {:?}", url, e))?;
    Ok(img)
}

/// Crop of one source image to its opaque pixels.
fn opaque_crop(
    document: &web::Document,
    img: &web::HtmlImageElement,
) -> anyhow::Result<PixelRect> {
    let (w, h) = (img.natural_width(), img.natural_height());
    let ctx = context_2d(document, w, h)?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let rgba = read_pixels(&ctx, w, h)?;
    Ok(opaque_bounds(&rgba, w, h))
}

/// Fetch the manifest, load every sprite and pack them into one atlas.
pub async fn load_sprite_atlas(document: &web::Document) -> anyhow::Result<SpriteAtlas> {
    let manifest = fetch_text(SPRITE_MANIFEST_URL).await?;
    let urls = parse_manifest_str(&manifest)?;

    let mut images = Vec::with_capacity(urls.len());
    let mut crops = Vec::with_capacity(urls.len());
    for url in &urls {
        let img = load_image(url).await?;
        crops.push(opaque_crop(document, &img)?);
        images.push(img);
    }

    let sizes: Vec<(u32, u32)> = crops.iter().map(|c| (c.w, c.h)).collect();
    let layout = AtlasLayout::compute(&sizes);
    let ctx = context_2d(document, layout.width, layout.height)?;
    for ((img, crop), dst) in images.iter().zip(&crops).zip(&layout.placements) {
        ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            img,
            crop.x as f64,
            crop.y as f64,
            crop.w as f64,
            crop.h as f64,
            dst.x as f64,
            dst.y as f64,
            dst.w as f64,
            dst.h as f64,
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    let rgba = read_pixels(&ctx, layout.width, layout.height)?;
    log::info!(
        "[sprites] {} sprites packed into {}x{} ({}x{} grid)",
        images.len(),
        layout.width,
        layout.height,
        layout.cols,
        layout.rows
    );
    Ok(SpriteAtlas {
        width: layout.width,
        height: layout.height,
        rgba,
        rects: layout.rects(),
    })
}
