// glyph-raster/src/batch.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering a whole set of characters, one image per character.

use log::{debug, warn};
use std::cmp;
use std::fs;
use std::num::NonZeroUsize;
use std::panic;
use std::path::{Path, PathBuf};
use std::thread;

use crate::color::Color;
use crate::error::ExportError;
use crate::export::ImageSink;
use crate::loader::Loader;
use crate::rasterizer::{Rasterizer, RenderOutcome, SkipReason};

/// Which glyph source each character is rendered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchMode {
    /// Lay the character out as text and fill its outline.
    Outline,
    /// Use the font's native glyph renderer.
    Bitmap,
}

/// Options for `render_glyph_set`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchOptions {
    /// The number of worker threads. Zero is treated as one.
    pub workers: usize,
    /// The background of every image.
    pub background: Option<Color>,
    /// Which glyph source to render from.
    pub mode: BatchMode,
}

impl Default for BatchOptions {
    fn default() -> BatchOptions {
        BatchOptions {
            workers: thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1),
            background: None,
            mode: BatchMode::Outline,
        }
    }
}

/// What happened to each character of a batch, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    /// Every character with the outcome of rendering it.
    pub outcomes: Vec<(char, RenderOutcome)>,
}

impl BatchReport {
    /// The characters an image was written for.
    pub fn written(&self) -> impl Iterator<Item = char> + '_ {
        self.outcomes
            .iter()
            .filter(|&&(_, outcome)| outcome.is_written())
            .map(|&(character, _)| character)
    }

    /// The characters that were skipped.
    pub fn skipped(&self) -> impl Iterator<Item = char> + '_ {
        self.outcomes
            .iter()
            .filter(|&&(_, outcome)| !outcome.is_written())
            .map(|&(character, _)| character)
    }
}

/// Returns the path the image for `character` is written to: `<code point>.png` in
/// `output_dir`.
pub fn glyph_path(output_dir: &Path, character: char) -> PathBuf {
    output_dir.join(format!("{}.png", character as u32))
}

/// Renders every character of `characters` into its own image under `output_dir`, which is
/// created if needed.
///
/// Characters the font has no glyph for are skipped and the rest of the batch goes on. The work
/// is split across `options.workers` threads sharing the font and the rasterizer. The first
/// storage error is returned once all workers have finished.
pub fn render_glyph_set<F, S, I>(rasterizer: &Rasterizer<S>,
                                 font: &F,
                                 characters: I,
                                 output_dir: &Path,
                                 options: &BatchOptions)
                                 -> Result<BatchReport, ExportError>
where
    F: Loader + Sync,
    S: ImageSink + Sync,
    I: IntoIterator<Item = char>,
{
    let characters: Vec<char> = characters.into_iter().collect();
    fs::create_dir_all(output_dir)?;
    if characters.is_empty() {
        return Ok(BatchReport::default());
    }

    let workers = cmp::min(cmp::max(options.workers, 1), characters.len());
    let chunk_size = (characters.len() + workers - 1) / workers;
    debug!("rendering {} glyphs on {} workers", characters.len(), workers);

    let results: Vec<Result<Vec<(char, RenderOutcome)>, ExportError>> = thread::scope(|scope| {
        let handles: Vec<_> = characters
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || -> Result<Vec<(char, RenderOutcome)>, ExportError> {
                    let mut outcomes = Vec::with_capacity(chunk.len());
                    for &character in chunk {
                        let outcome =
                            render_one(rasterizer, font, character, output_dir, options)?;
                        outcomes.push((character, outcome));
                    }
                    Ok(outcomes)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    });

    let mut report = BatchReport {
        outcomes: Vec::with_capacity(characters.len()),
    };
    for result in results {
        report.outcomes.extend(result?);
    }
    Ok(report)
}

fn render_one<F, S>(rasterizer: &Rasterizer<S>,
                    font: &F,
                    character: char,
                    output_dir: &Path,
                    options: &BatchOptions)
                    -> Result<RenderOutcome, ExportError>
where
    F: Loader,
    S: ImageSink,
{
    // Outline layout skips unmapped characters silently, so check up front.
    if font.glyph_for_char(character).is_none() {
        debug!("no glyph for {:?}, skipping", character);
        return Ok(RenderOutcome::Skipped(SkipReason::MissingGlyph));
    }

    let path = glyph_path(output_dir, character);
    let mut buffer = [0; 4];
    let result = match options.mode {
        BatchMode::Outline => {
            rasterizer.render_text(Some(font),
                                   character.encode_utf8(&mut buffer),
                                   &path,
                                   options.background)
        }
        BatchMode::Bitmap => {
            rasterizer.render_glyph_bitmap(Some(font), character, &path, options.background)
        }
    };
    if let Err(ref err) = result {
        warn!("failed to write {}: {}", path.display(), err);
    }
    result
}
