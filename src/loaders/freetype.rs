// glyph-raster/src/loaders/freetype.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A cross-platform loader that uses the FreeType library to load and rasterize fonts.
//!
//! Glyph bitmaps come from FreeType's own renderer. A `Font` wraps a raw `FT_Face` created from
//! a thread-local `FT_Library`, so it is neither `Send` nor `Sync`.

use freetype::freetype::{FT_Done_Face, FT_Face, FT_Get_Char_Index, FT_Init_FreeType};
use freetype::freetype::{FT_Int32, FT_LOAD_DEFAULT, FT_LOAD_NO_HINTING, FT_Library};
use freetype::freetype::{FT_Load_Glyph, FT_Long, FT_New_Memory_Face, FT_Outline_Decompose};
use freetype::freetype::{FT_Outline_Funcs, FT_Pos, FT_Reference_Face, FT_Render_Glyph};
use freetype::freetype::{FT_Render_Mode, FT_Set_Char_Size, FT_UInt, FT_ULong, FT_Vector};
use log::{trace, warn};
use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::vector::{vec2f, Vector2F};
use std::ffi::CStr;
use std::fmt::{self, Debug, Formatter};
use std::fs::File;
use std::os::raw::{c_int, c_void};
use std::path::Path;
use std::ptr;
use std::slice;
use std::sync::Arc;

use crate::bitmap::GlyphBitmap;
use crate::error::{FontLoadingError, GlyphLoadingError};
use crate::handle::Handle;
use crate::loader::Loader;
use crate::metrics::Metrics;
use crate::outline::OutlineSink;

const FT_PIXEL_MODE_MONO: u8 = 1;
const FT_PIXEL_MODE_GRAY: u8 = 2;

thread_local! {
    static FREETYPE_LIBRARY: FT_Library = {
        unsafe {
            let mut library = ptr::null_mut();
            if FT_Init_FreeType(&mut library) != 0 {
                warn!("failed to initialize FreeType");
                library = ptr::null_mut();
            }
            library
        }
    };
}

/// The handle that the FreeType API natively uses to represent a font.
pub type NativeFont = FT_Face;

/// A font loaded and rasterized by FreeType.
pub struct Font {
    freetype_face: FT_Face,
    // FreeType reads from this buffer for as long as the face lives.
    font_data: Arc<Vec<u8>>,
}

impl Font {
    /// Loads a font from raw font data (the contents of a `.ttf`/`.otf`/etc. file).
    ///
    /// If the data represents a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index
    /// of the font to load from it. If the data represents a single font, pass 0 for `font_index`.
    pub fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Font, FontLoadingError> {
        FREETYPE_LIBRARY.with(|freetype_library| unsafe {
            if freetype_library.is_null() {
                return Err(FontLoadingError::Parse);
            }

            let mut freetype_face = ptr::null_mut();
            if FT_New_Memory_Face(*freetype_library,
                                  font_data.as_ptr(),
                                  font_data.len() as FT_Long,
                                  font_index as FT_Long,
                                  &mut freetype_face) != 0 {
                return Err(FontLoadingError::Parse);
            }

            reset_freetype_face_char_size(freetype_face);
            Ok(Font {
                freetype_face,
                font_data,
            })
        })
    }

    /// Loads a font from a `.ttf`/`.otf`/etc. file.
    #[inline]
    pub fn from_file(file: &mut File, font_index: u32) -> Result<Font, FontLoadingError> {
        <Font as Loader>::from_file(file, font_index)
    }

    /// Loads a font from the path to a `.ttf`/`.otf`/etc. file.
    #[inline]
    pub fn from_path<P>(path: P, font_index: u32) -> Result<Font, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        <Font as Loader>::from_path(path, font_index)
    }

    /// Loads the font pointed to by a handle.
    #[inline]
    pub fn from_handle(handle: &Handle) -> Result<Font, FontLoadingError> {
        <Font as Loader>::from_handle(handle)
    }

    /// Returns the wrapped native font handle.
    ///
    /// The face's char size is reset to one pixel per font unit between calls, so callers that
    /// change it should restore it.
    #[inline]
    pub fn native_font(&self) -> NativeFont {
        self.freetype_face
    }

    /// Returns the raw font data.
    #[inline]
    pub fn font_data(&self) -> Arc<Vec<u8>> {
        self.font_data.clone()
    }

    fn check_glyph_id(&self, glyph_id: u32) -> Result<(), GlyphLoadingError> {
        if glyph_id >= self.glyph_count() {
            return Err(GlyphLoadingError::NoSuchGlyph);
        }
        Ok(())
    }

    // Loads an unhinted glyph at the face's reset size, where one 26.6 unit is 1/64 font unit.
    unsafe fn load_unscaled_glyph(&self, glyph_id: u32) -> Result<(), GlyphLoadingError> {
        self.check_glyph_id(glyph_id)?;
        if FT_Load_Glyph(self.freetype_face,
                         glyph_id,
                         (FT_LOAD_DEFAULT | FT_LOAD_NO_HINTING) as FT_Int32) != 0 {
            return Err(GlyphLoadingError::NoSuchGlyph);
        }
        Ok(())
    }

    // Renders the glyph at whatever char size is currently set and copies the slot bitmap out.
    unsafe fn render_glyph_slot(&self, glyph_id: u32) -> Result<GlyphBitmap, GlyphLoadingError> {
        if FT_Load_Glyph(self.freetype_face, glyph_id, FT_LOAD_DEFAULT as FT_Int32) != 0 {
            return Err(GlyphLoadingError::NoSuchGlyph);
        }
        let slot = (*self.freetype_face).glyph;
        if FT_Render_Glyph(slot, FT_Render_Mode::FT_RENDER_MODE_NORMAL) != 0 {
            warn!("FreeType failed to render glyph {}", glyph_id);
            return Err(GlyphLoadingError::PlatformError);
        }

        let bitmap = &(*slot).bitmap;
        let (width, height) = (bitmap.width as u32, bitmap.rows as u32);
        if width == 0 || height == 0 || bitmap.buffer.is_null() {
            trace!("glyph {} has no ink", glyph_id);
            return Ok(GlyphBitmap::new(0, 0, 1));
        }
        let pitch = bitmap.pitch.unsigned_abs() as usize;
        if pitch == 0 {
            return Err(GlyphLoadingError::PlatformError);
        }

        let buffer = slice::from_raw_parts(bitmap.buffer as *const u8, pitch * height as usize);
        // A negative pitch means the rows are stored bottom to top.
        let rows: Vec<u8> = if bitmap.pitch >= 0 {
            buffer.to_vec()
        } else {
            buffer.chunks(pitch).rev().flatten().copied().collect()
        };

        match bitmap.pixel_mode {
            FT_PIXEL_MODE_GRAY => {
                GlyphBitmap::from_samples(width, height, pitch, rows)
                    .ok_or(GlyphLoadingError::PlatformError)
            }
            FT_PIXEL_MODE_MONO => Ok(GlyphBitmap::from_mono(&rows, width, height, pitch)),
            pixel_mode => {
                warn!("unexpected FreeType pixel mode {} for glyph {}", pixel_mode, glyph_id);
                Err(GlyphLoadingError::PlatformError)
            }
        }
    }
}

impl Loader for Font {
    #[inline]
    fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Self, FontLoadingError> {
        Font::from_bytes(font_data, font_index)
    }

    fn family_name(&self) -> Option<String> {
        unsafe {
            let family_name = (*self.freetype_face).family_name;
            if family_name.is_null() {
                return None;
            }
            Some(CStr::from_ptr(family_name).to_string_lossy().into_owned())
        }
    }

    #[inline]
    fn glyph_count(&self) -> u32 {
        unsafe { (*self.freetype_face).num_glyphs.max(0) as u32 }
    }

    fn glyph_for_char(&self, character: char) -> Option<u32> {
        match unsafe { FT_Get_Char_Index(self.freetype_face, character as FT_ULong) } {
            0 => None,
            glyph_id => Some(glyph_id),
        }
    }

    fn outline<S>(&self, glyph_id: u32, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        unsafe {
            self.load_unscaled_glyph(glyph_id)?;

            let funcs = FT_Outline_Funcs {
                move_to: Some(decompose_move_to::<S>),
                line_to: Some(decompose_line_to::<S>),
                conic_to: Some(decompose_conic_to::<S>),
                cubic_to: Some(decompose_cubic_to::<S>),
                shift: 0,
                delta: 0,
            };
            let mut context = DecomposeContext {
                sink,
                contour_open: false,
            };
            let outline = &mut (*(*self.freetype_face).glyph).outline;
            if FT_Outline_Decompose(outline,
                                    &funcs,
                                    &mut context as *mut DecomposeContext<S> as *mut c_void) != 0 {
                return Err(GlyphLoadingError::PlatformError);
            }
            if context.contour_open {
                context.sink.close();
            }
        }
        Ok(())
    }

    fn advance(&self, glyph_id: u32) -> Result<Vector2F, GlyphLoadingError> {
        unsafe {
            self.load_unscaled_glyph(glyph_id)?;
            let advance = (*(*self.freetype_face).glyph).advance;
            Ok(vec2f(ft_fixed_26_6_to_f32(advance.x), ft_fixed_26_6_to_f32(advance.y)))
        }
    }

    fn metrics(&self) -> Metrics {
        unsafe {
            let face = &*self.freetype_face;
            let (ascent, descent) = (face.ascender as f32, face.descender as f32);
            Metrics {
                units_per_em: face.units_per_EM as u32,
                ascent,
                descent,
                line_gap: face.height as f32 - ascent + descent,
            }
        }
    }

    /// Renders a glyph with FreeType's anti-aliased renderer.
    ///
    /// The slot bitmap is copied with its pitch as the stride. 1-bit bitmaps (from embedded
    /// bitmap strikes) are expanded to 8-bit coverage.
    fn rasterize_glyph(&self,
                       glyph_id: u32,
                       point_size: f32,
                       dpi: f32)
                       -> Result<GlyphBitmap, GlyphLoadingError> {
        self.check_glyph_id(glyph_id)?;
        unsafe {
            let dpi = dpi.round().max(1.0) as FT_UInt;
            if FT_Set_Char_Size(self.freetype_face,
                                f32_to_ft_fixed_26_6(point_size),
                                0,
                                dpi,
                                dpi) != 0 {
                warn!("FreeType rejected a size of {}pt at {} DPI", point_size, dpi);
                reset_freetype_face_char_size(self.freetype_face);
                return Err(GlyphLoadingError::PlatformError);
            }
            let result = self.render_glyph_slot(glyph_id);
            reset_freetype_face_char_size(self.freetype_face);
            result
        }
    }
}

impl Clone for Font {
    fn clone(&self) -> Font {
        unsafe {
            assert_eq!(FT_Reference_Face(self.freetype_face), 0);
            Font {
                freetype_face: self.freetype_face,
                font_data: self.font_data.clone(),
            }
        }
    }
}

impl Drop for Font {
    fn drop(&mut self) {
        unsafe {
            if !self.freetype_face.is_null() && FT_Done_Face(self.freetype_face) != 0 {
                warn!("failed to release a FreeType face");
            }
        }
    }
}

impl Debug for Font {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt.debug_struct("Font")
            .field("family_name", &self.family_name())
            .field("glyph_count", &self.glyph_count())
            .finish()
    }
}

struct DecomposeContext<'a, S> {
    sink: &'a mut S,
    contour_open: bool,
}

unsafe fn context<'a, 'b, S>(user: *mut c_void) -> &'a mut DecomposeContext<'b, S> {
    &mut *(user as *mut DecomposeContext<'b, S>)
}

unsafe extern "C" fn decompose_move_to<S>(to: *const FT_Vector, user: *mut c_void) -> c_int
where
    S: OutlineSink,
{
    let context = context::<S>(user);
    if context.contour_open {
        context.sink.close();
    }
    context.sink.move_to(ft_vector_to_f32(*to));
    context.contour_open = true;
    0
}

unsafe extern "C" fn decompose_line_to<S>(to: *const FT_Vector, user: *mut c_void) -> c_int
where
    S: OutlineSink,
{
    context::<S>(user).sink.line_to(ft_vector_to_f32(*to));
    0
}

unsafe extern "C" fn decompose_conic_to<S>(control: *const FT_Vector,
                                           to: *const FT_Vector,
                                           user: *mut c_void)
                                           -> c_int
where
    S: OutlineSink,
{
    context::<S>(user)
        .sink
        .quadratic_curve_to(ft_vector_to_f32(*control), ft_vector_to_f32(*to));
    0
}

unsafe extern "C" fn decompose_cubic_to<S>(control1: *const FT_Vector,
                                           control2: *const FT_Vector,
                                           to: *const FT_Vector,
                                           user: *mut c_void)
                                           -> c_int
where
    S: OutlineSink,
{
    let ctrl = LineSegment2F::new(ft_vector_to_f32(*control1), ft_vector_to_f32(*control2));
    context::<S>(user).sink.cubic_curve_to(ctrl, ft_vector_to_f32(*to));
    0
}

unsafe fn reset_freetype_face_char_size(face: FT_Face) {
    // Some fonts (Apple Color Emoji, for one) have 0 units per em.
    let units_per_em = (*face).units_per_EM as FT_Pos;
    if units_per_em > 0 && FT_Set_Char_Size(face, units_per_em << 6, 0, 0, 0) != 0 {
        warn!("failed to reset the FreeType char size");
    }
}

fn ft_vector_to_f32(vector: FT_Vector) -> Vector2F {
    vec2f(ft_fixed_26_6_to_f32(vector.x), ft_fixed_26_6_to_f32(vector.y))
}

fn ft_fixed_26_6_to_f32(fixed: FT_Pos) -> f32 {
    (fixed as f32) / 64.0
}

fn f32_to_ft_fixed_26_6(float: f32) -> FT_Pos {
    f32::round(float * 64.0) as FT_Pos
}

#[cfg(test)]
mod test {
    use super::{f32_to_ft_fixed_26_6, ft_fixed_26_6_to_f32, Font};
    use crate::error::FontLoadingError;
    use std::sync::Arc;

    #[test]
    fn fixed_26_6_conversions() {
        assert_eq!(f32_to_ft_fixed_26_6(12.5), 800);
        assert_eq!(ft_fixed_26_6_to_f32(-96), -1.5);
    }

    #[test]
    fn garbage_data_fails_to_load() {
        match Font::from_bytes(Arc::new(b"definitely not a font".to_vec()), 0) {
            Err(FontLoadingError::Parse) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
