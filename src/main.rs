// src/main.rs

//! `textfb [CONFIG.json] [OUT.ppm] [TEXT]`
//!
//! Renders TEXT in each of the eight font slots, followed by the caret, and
//! writes the result as a PPM image. Built-in font names are looked up in
//! the directory named by `TEXTFB_FONT_DIR` (default `fonts`).

use anyhow::Context;
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use textfb::{text, DrawConfig, FontDirectory, FontSlot, Rgb, TextRenderer, SUBPIX};

const DEFAULT_OUTPUT: &str = "textfb.ppm";
const DEFAULT_TEXT: &str = "The quick brown fox – “fluffy”, ‘fine’ – jumps over the lazy dog.";
const MARGIN: i32 = 8;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path != "-" => DrawConfig::load(&path)?,
        _ => {
            info!("No config file given, using defaults.");
            DrawConfig::default()
        }
    };
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let sample = args.next().unwrap_or_else(|| DEFAULT_TEXT.to_string());

    let font_dir = std::env::var("TEXTFB_FONT_DIR").unwrap_or_else(|_| "fonts".to_string());
    info!("Built-in fonts from '{}'", font_dir);
    let fonts = FontDirectory::new(&font_dir);

    let mut renderer = TextRenderer::with_freetype(&config, &fonts)
        .context("Failed to initialize the text renderer")?;

    let codes = text::encode(&sample);
    let mut widest = 0;
    for slot in FontSlot::ALL {
        let width = renderer
            .measure_string(slot, &codes, None)
            .with_context(|| format!("Failed to measure text in {:?}", slot))?;
        widest = widest.max(width);
    }

    let width = (widest / SUBPIX + 2 * MARGIN).max(1) as usize;
    let height = (config.leading * FontSlot::ALL.len() as i32 + 2 * MARGIN).max(1) as usize;
    let mut fb = renderer.framebuffer(width, height);
    renderer.clear(&mut fb, Rgb::WHITE);

    let mut pen = MARGIN * SUBPIX;
    for (row, slot) in FontSlot::ALL.into_iter().enumerate() {
        let y = MARGIN + row as i32 * config.leading + config.baseline;
        pen = renderer
            .draw_string(&mut fb, slot, MARGIN * SUBPIX, y, Rgb::BLACK, &codes, None)
            .with_context(|| format!("Failed to draw text in {:?}", slot))?;
    }
    let last_baseline = MARGIN + (FontSlot::ALL.len() as i32 - 1) * config.leading + config.baseline;
    renderer.draw_caret(&mut fb, pen, last_baseline);

    if codes.contains(&b'?') && !sample.contains('?') {
        warn!("Some characters have no internal code and were drawn as '?'");
    }

    let file = File::create(&output).with_context(|| format!("Failed to create {}", output))?;
    fb.write_ppm(BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Wrote {}x{} preview to {}", width, height, output);
    Ok(())
}
