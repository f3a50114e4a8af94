// glyph-raster/demos/render-text.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use glyph_raster::batch::{self, BatchMode, BatchOptions};
use glyph_raster::canvas::{Canvas, Format};
use glyph_raster::color::Color;
use glyph_raster::handle::Handle;
use glyph_raster::loader::Loader;
use glyph_raster::rasterizer::{RasterOptions, Rasterizer};
use glyph_raster::RenderOutcome;
use std::path::{Path, PathBuf};
use std::process;

fn get_args() -> ArgMatches {
    let font_path_arg = Arg::new("FONT-PATH")
        .help("Path to a TrueType or OpenType font file")
        .required(true)
        .index(1);
    let text_arg = Arg::new("TEXT")
        .help("Text to render")
        .default_value("A")
        .index(2);
    let size_arg = Arg::new("size")
        .help("Font size in points")
        .short('S')
        .long("size")
        .default_value("32");
    let dpi_arg = Arg::new("dpi")
        .help("Output resolution in dots per inch")
        .long("dpi")
        .default_value("72");
    let bitmap_arg = Arg::new("bitmap")
        .help("Render the first character with the font's native glyph renderer")
        .short('b')
        .long("bitmap")
        .action(ArgAction::SetTrue);
    let background_arg = Arg::new("background")
        .help("Background color as RRGGBB or RRGGBBAA hex (default: transparent)")
        .long("background")
        .value_names(["COLOR"]);
    let output_arg = Arg::new("output")
        .help("Write a PNG here instead of printing to the terminal")
        .short('o')
        .long("output")
        .value_names(["PATH"]);
    let glyph_set_arg = Arg::new("glyph-set")
        .help("Write one PNG per character from U+0000 to U+00FF into this directory")
        .long("glyph-set")
        .value_names(["DIR"])
        .conflicts_with("output");
    Command::new("render-text")
        .version("0.1")
        .author("The Pathfinder Project Developers")
        .about("Simple example tool to render text with `glyph-raster`")
        .arg(font_path_arg)
        .arg(text_arg)
        .arg(size_arg)
        .arg(dpi_arg)
        .arg(bitmap_arg)
        .arg(background_arg)
        .arg(output_arg)
        .arg(glyph_set_arg)
        .get_matches()
}

fn main() {
    let matches = get_args();

    let font_path = matches.get_one::<String>("FONT-PATH").unwrap();
    let text = matches.get_one::<String>("TEXT").unwrap();
    let point_size: f32 = matches.get_one::<String>("size").unwrap().parse().unwrap();
    let dpi: f32 = matches.get_one::<String>("dpi").unwrap().parse().unwrap();
    let bitmap = matches.get_flag("bitmap");
    let background = matches
        .get_one::<String>("background")
        .map(|hex| parse_color(hex).unwrap_or_else(|| fail("bad background color")));

    let font = match Handle::from_path(PathBuf::from(font_path), 0).load() {
        Ok(font) => font,
        Err(err) => fail(&format!("failed to load {}: {}", font_path, err)),
    };
    let rasterizer = Rasterizer::with_options(RasterOptions {
        point_size,
        dpi,
        ..RasterOptions::default()
    });

    if let Some(dir) = matches.get_one::<String>("glyph-set") {
        let options = BatchOptions {
            background: Some(background.unwrap_or(Color::WHITE)),
            mode: if bitmap { BatchMode::Bitmap } else { BatchMode::Outline },
            ..BatchOptions::default()
        };
        let report = batch::render_glyph_set(&rasterizer,
                                             &font,
                                             (0u8..=0xff).map(char::from),
                                             Path::new(dir),
                                             &options)
            .unwrap_or_else(|err| fail(&err.to_string()));
        println!("{} glyphs written to {}, {} skipped",
                 report.written().count(),
                 dir,
                 report.skipped().count());
        return;
    }

    let character = text.chars().next().unwrap_or(' ');
    if let Some(path) = matches.get_one::<String>("output") {
        let result = if bitmap {
            rasterizer.render_glyph_bitmap(Some(&font), character, path, background)
        } else {
            rasterizer.render_text(Some(&font), text, path, background)
        };
        match result {
            Ok(RenderOutcome::Written { width, height }) => {
                println!("wrote {}×{} image to {}", width, height, path)
            }
            Ok(RenderOutcome::Skipped(reason)) => println!("nothing written: {:?}", reason),
            Err(err) => fail(&err.to_string()),
        }
        return;
    }

    let canvas = if bitmap {
        rasterizer.rasterize_glyph_bitmap(Some(&font), character, background)
    } else {
        rasterizer.rasterize_text(Some(&font), text, background)
    };
    let canvas = match canvas {
        Some(canvas) => canvas,
        None => fail(&format!("no glyph for {:?}", character)),
    };

    // Outline text carries coverage in alpha; native bitmaps carry it in luminance.
    let coverage_format = if bitmap { Format::Rgb24 } else { Format::A8 };
    let mut coverage = Canvas::new(canvas.size, coverage_format);
    coverage.blit_from_canvas(&canvas);
    let bytes_per_pixel = coverage_format.bytes_per_pixel() as usize;

    let family_name = font.family_name().unwrap_or_default();
    println!("{} ({}×{}):", family_name.bold(), canvas.width(), canvas.height());
    for y in 0..coverage.height() {
        let mut line = String::new();
        let row_start = y as usize * coverage.stride;
        let row = &coverage.pixels[row_start..row_start + coverage.width() as usize * bytes_per_pixel];
        for value in row.iter().step_by(bytes_per_pixel) {
            let cell = shade(*value).to_string().repeat(2);
            match *value {
                0 | 0xff => line.push_str(&cell),
                _ => line.push_str(&cell.yellow().to_string()),
            }
        }
        println!("{}", line);
    }
}

fn parse_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    let channel = |index: usize| u8::from_str_radix(hex.get(index * 2..index * 2 + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(channel(0)?, channel(1)?, channel(2)?)),
        8 => Some(Color::rgba(channel(0)?, channel(1)?, channel(2)?, channel(3)?)),
        _ => None,
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message.red());
    process::exit(1)
}

fn shade(value: u8) -> char {
    match value {
        0 => ' ',
        1..=84 => '░',
        85..=169 => '▒',
        170..=254 => '▓',
        _ => '█',
    }
}
