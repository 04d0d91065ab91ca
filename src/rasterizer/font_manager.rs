//! The eight-slot font set.
//!
//! `FontSet` resolves each configured font name to either a built-in font
//! (bytes from a `BuiltinFonts` provider) or a file on disk, opens it through
//! the `FontDriver`, and pairs the face with its `GlyphCache`.

use super::font_driver::{Antialias, FontDriver};
use super::glyph_cache::{GlyphBitmap, GlyphCache};
use super::SUBPIXEL_PHASES;
use crate::config::DrawConfig;
use crate::error::{FontError, Result};
use crate::gamma::GammaTable;
use crate::text;
use bitflags::bitflags;
use log::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Identifiers of the fonts a `BuiltinFonts` provider can supply, by index.
pub const BUILTIN_FONT_NAMES: [&str; 8] = [
    "LuxiMonoRegular",
    "LuxiMonoBold",
    "LuxiMonoOblique",
    "LuxiMonoBoldOblique",
    "CharterBT-Roman",
    "CharterBT-Bold",
    "CharterBT-Italic",
    "CharterBT-BoldItalic",
];

/// Supplies the bytes of built-in fonts.
pub trait BuiltinFonts {
    /// Font file contents for `index` into `BUILTIN_FONT_NAMES`.
    fn font_bytes(&self, index: usize) -> Option<Cow<'_, [u8]>>;
}

/// Provider with no built-in fonts; every font must be a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBuiltinFonts;

impl BuiltinFonts for NoBuiltinFonts {
    fn font_bytes(&self, _index: usize) -> Option<Cow<'_, [u8]>> {
        None
    }
}

/// Fonts compiled into the binary, e.g. with `include_bytes!`.
impl BuiltinFonts for [&[u8]; 8] {
    fn font_bytes(&self, index: usize) -> Option<Cow<'_, [u8]>> {
        self.get(index).map(|b| Cow::Borrowed(*b))
    }
}

/// Looks for `<identifier>.{ttf,otf,pfb,pfa}` in a directory.
#[derive(Debug, Clone)]
pub struct FontDirectory {
    dir: PathBuf,
}

impl FontDirectory {
    const EXTENSIONS: [&'static str; 4] = ["ttf", "otf", "pfb", "pfa"];

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl BuiltinFonts for FontDirectory {
    fn font_bytes(&self, index: usize) -> Option<Cow<'_, [u8]>> {
        let name = BUILTIN_FONT_NAMES.get(index)?;
        for ext in Self::EXTENSIONS {
            let path = self.dir.join(format!("{}.{}", name, ext));
            match std::fs::read(&path) {
                Ok(bytes) => {
                    debug!("FontDirectory: {} -> {}", name, path.display());
                    return Some(Cow::Owned(bytes));
                }
                Err(e) => trace!("FontDirectory: {}: {}", path.display(), e),
            }
        }
        None
    }
}

/// Where a configured font name points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Index into `BUILTIN_FONT_NAMES`.
    Builtin(usize),
    Path(PathBuf),
}

impl FontSource {
    pub fn resolve(name: &str) -> Self {
        match BUILTIN_FONT_NAMES.iter().position(|&n| n == name) {
            Some(index) => FontSource::Builtin(index),
            None => FontSource::Path(PathBuf::from(name)),
        }
    }
}

bitflags! {
    /// Style bits that pick one of the eight font slots.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u8 {
        const PROPORTIONAL = 1 << 0;
        const BOLD         = 1 << 1;
        const ITALIC       = 1 << 2;
    }
}

/// One of the eight font slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FontSlot {
    MonoRegular = 0,
    MonoBold = 1,
    MonoItalic = 2,
    MonoBoldItalic = 3,
    PropRegular = 4,
    PropBold = 5,
    PropItalic = 6,
    PropBoldItalic = 7,
}

impl FontSlot {
    pub const ALL: [FontSlot; 8] = [
        FontSlot::MonoRegular,
        FontSlot::MonoBold,
        FontSlot::MonoItalic,
        FontSlot::MonoBoldItalic,
        FontSlot::PropRegular,
        FontSlot::PropBold,
        FontSlot::PropItalic,
        FontSlot::PropBoldItalic,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn for_style(style: FontStyle) -> Self {
        let base = if style.contains(FontStyle::PROPORTIONAL) { 4 } else { 0 };
        let variant = match (
            style.contains(FontStyle::BOLD),
            style.contains(FontStyle::ITALIC),
        ) {
            (true, true) => 3,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 0,
        };
        Self::ALL[base + variant]
    }

    pub fn is_proportional(self) -> bool {
        self.index() >= 4
    }
}

/// A loaded face together with its glyph cache.
pub struct Font<D: FontDriver> {
    name: String,
    face: D::Face,
    cache: GlyphCache,
    fixed_width: bool,
    ligatures: bool,
}

impl<D: FontDriver> Font<D> {
    /// Opens `name` at `size_pt` points, horizontally scaled by `aspect`.
    pub fn load(
        driver: &D,
        builtins: &dyn BuiltinFonts,
        name: &str,
        size_pt: f32,
        aspect: f32,
    ) -> Result<Self> {
        let load_err = |source| FontError::FontLoad {
            name: name.to_string(),
            source,
        };

        let mut face = match FontSource::resolve(name) {
            FontSource::Builtin(index) => {
                let bytes = builtins.font_bytes(index).ok_or_else(|| FontError::MissingBuiltin {
                    name: name.to_string(),
                    index,
                })?;
                debug!("Font: '{}' is built-in #{} ({} bytes)", name, index, bytes.len());
                driver.open_memory_face(bytes.into_owned()).map_err(load_err)?
            }
            FontSource::Path(path) => {
                debug!("Font: '{}' opened from file", name);
                let mut face = driver.open_file_face(&path).map_err(load_err)?;
                attach_type1_metrics(driver, &mut face, &path);
                face
            }
        };

        let width = (size_pt * aspect * 64.0) as i64;
        let height = (size_pt * 64.0) as i64;
        driver
            .set_char_size(&mut face, width, height, 72)
            .map_err(load_err)?;
        driver.select_unicode_charmap(&mut face).map_err(load_err)?;

        let fixed_width = driver.is_fixed_width(&face);
        let ligatures = !fixed_width
            && driver.glyph_index(&face, text::to_unicode(text::LIG_FI)).is_some()
            && driver.glyph_index(&face, text::to_unicode(text::LIG_FL)).is_some();

        info!(
            "Font: loaded '{}' at {}pt (aspect {}, fixed_width={}, ligatures={})",
            name, size_pt, aspect, fixed_width, ligatures
        );

        Ok(Self {
            name: name.to_string(),
            face,
            cache: GlyphCache::new(),
            fixed_width,
            ligatures,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn face(&self) -> &D::Face {
        &self.face
    }

    pub fn is_fixed_width(&self) -> bool {
        self.fixed_width
    }

    /// Whether "fi"/"fl" are drawn as ligatures in this font.
    pub fn ligatures(&self) -> bool {
        self.ligatures
    }

    pub fn is_loaded(&self, code: u8) -> bool {
        self.cache.is_loaded(code)
    }

    pub fn advance(&self, code: u8) -> i32 {
        self.cache.advance(code)
    }

    pub fn bitmap(&self, code: u8, phase: usize) -> Option<&GlyphBitmap> {
        self.cache.bitmap(code, phase)
    }

    /// Rasterizes `code` on first use.
    pub fn load_glyph(
        &mut self,
        driver: &D,
        gamma: &GammaTable,
        mode: Antialias,
        code: u8,
    ) -> Result<()> {
        self.cache
            .load(driver, &mut self.face, gamma, mode, code)
            .map_err(|source| FontError::GlyphRaster {
                font: self.name.clone(),
                code,
                source,
            })
    }

    /// Kerning between two codes in 1/`SUBPIXEL_PHASES` pixel units.
    /// Zero when either code has no glyph in this face.
    pub fn kerning(&self, driver: &D, left: u8, right: u8) -> Result<i32> {
        let l = driver.glyph_index(&self.face, text::to_unicode(left));
        let r = driver.glyph_index(&self.face, text::to_unicode(right));
        let (Some(l), Some(r)) = (l, r) else {
            return Ok(0);
        };
        let kx = driver
            .kerning(&self.face, l, r)
            .map_err(|source| FontError::Kerning {
                font: self.name.clone(),
                left,
                right,
                source,
            })?;
        Ok((kx * SUBPIXEL_PHASES as i64 / 64) as i32)
    }
}

/// Attaches `<stem>.afm` and `<stem>.AFM` to a Type 1 face. Failures are
/// expected (most fonts ship without one) and ignored.
fn attach_type1_metrics<D: FontDriver>(driver: &D, face: &mut D::Face, path: &Path) {
    let is_type1 = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pfb") || e.eq_ignore_ascii_case("pfa"));
    if !is_type1 {
        return;
    }
    for ext in ["afm", "AFM"] {
        let afm = path.with_extension(ext);
        match driver.attach_metrics(face, &afm) {
            Ok(()) => debug!("Font: attached metrics {}", afm.display()),
            Err(e) => debug!("Font: no metrics at {} ({})", afm.display(), e),
        }
    }
}

/// Fonts for all eight slots: mono then proportional, each regular, bold,
/// italic, bold+italic.
pub struct FontSet<D: FontDriver> {
    fonts: Vec<Font<D>>,
}

impl<D: FontDriver> FontSet<D> {
    pub fn load(driver: &D, builtins: &dyn BuiltinFonts, config: &DrawConfig) -> Result<Self> {
        info!("FontSet: loading 8 fonts");
        let fonts = FontSlot::ALL
            .iter()
            .map(|&slot| {
                let (name, size, aspect) = config.font_for(slot);
                Font::load(driver, builtins, name, size, aspect)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fonts })
    }

    pub fn get(&self, slot: FontSlot) -> &Font<D> {
        &self.fonts[slot.index()]
    }

    pub fn get_mut(&mut self, slot: FontSlot) -> &mut Font<D> {
        &mut self.fonts[slot.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontSlot, &Font<D>)> {
        FontSlot::ALL.into_iter().zip(self.fonts.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::mock_driver::{MockDriver, MockFace};
    use test_log::test;

    const BUILTINS: [&[u8]; 8] = [b"mono", b"mono", b"mono", b"mono", b"prop", b"prop", b"prop", b"prop"];

    #[test]
    fn test_resolve_builtin_and_path() {
        assert_eq!(FontSource::resolve("LuxiMonoRegular"), FontSource::Builtin(0));
        assert_eq!(FontSource::resolve("CharterBT-BoldItalic"), FontSource::Builtin(7));
        assert_eq!(
            FontSource::resolve("/usr/share/fonts/Foo.ttf"),
            FontSource::Path(PathBuf::from("/usr/share/fonts/Foo.ttf"))
        );
        // Lookup is exact, not case-folded.
        assert!(matches!(FontSource::resolve("luximonoregular"), FontSource::Path(_)));
    }

    #[test]
    fn test_slot_for_style() {
        assert_eq!(FontSlot::for_style(FontStyle::empty()), FontSlot::MonoRegular);
        assert_eq!(FontSlot::for_style(FontStyle::BOLD), FontSlot::MonoBold);
        assert_eq!(FontSlot::for_style(FontStyle::ITALIC), FontSlot::MonoItalic);
        assert_eq!(
            FontSlot::for_style(FontStyle::BOLD | FontStyle::ITALIC),
            FontSlot::MonoBoldItalic
        );
        assert_eq!(FontSlot::for_style(FontStyle::PROPORTIONAL), FontSlot::PropRegular);
        assert_eq!(
            FontSlot::for_style(FontStyle::all()),
            FontSlot::PropBoldItalic
        );
        for (i, slot) in FontSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(FontSlot::from_index(i), Some(*slot));
        }
        assert_eq!(FontSlot::from_index(8), None);
    }

    #[test]
    fn test_style_parses_from_flag_names() {
        let style: FontStyle = serde_json::from_str(r#""PROPORTIONAL | BOLD""#).unwrap();
        assert_eq!(FontSlot::for_style(style), FontSlot::PropBold);
    }

    #[test]
    fn test_load_builtin_sets_size_and_charmap() {
        let driver = MockDriver::new();
        let font = Font::load(&driver, &BUILTINS, "CharterBT-Roman", 12.0, 1.5).unwrap();
        assert_eq!(font.face().char_size, Some((1152, 768, 72)));
        assert!(font.face().charmap_selected);
        assert!(!font.is_fixed_width());
        assert!(font.ligatures());
        assert!((0..=255).all(|c| !font.is_loaded(c)));
    }

    #[test]
    fn test_fixed_width_font_disables_ligatures() {
        let driver = MockDriver::new();
        let font = Font::load(&driver, &BUILTINS, "LuxiMonoRegular", 12.0, 1.0).unwrap();
        assert!(font.is_fixed_width());
        assert!(!font.ligatures());
    }

    #[test]
    fn test_missing_ligature_glyph_disables_ligatures() {
        let driver = MockDriver::new().with_file("NoFl.ttf", MockFace::proportional().without('\u{FB02}'));
        let font = Font::load(&driver, &NoBuiltinFonts, "NoFl.ttf", 12.0, 1.0).unwrap();
        assert!(!font.ligatures());
    }

    #[test]
    fn test_missing_builtin_is_an_error() {
        let driver = MockDriver::new();
        let err = Font::load(&driver, &NoBuiltinFonts, "LuxiMonoBold", 12.0, 1.0)
            .err()
            .unwrap();
        assert!(matches!(err, FontError::MissingBuiltin { index: 1, .. }));
    }

    #[test]
    fn test_unopenable_file_reports_name_and_operation() {
        let driver = MockDriver::new();
        let err = Font::load(&driver, &NoBuiltinFonts, "/nope/Gone.ttf", 12.0, 1.0)
            .err()
            .unwrap();
        match err {
            FontError::FontLoad { name, source } => {
                assert_eq!(name, "/nope/Gone.ttf");
                assert_eq!(source.op, "FT_New_Face");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_size_and_charmap_failures_are_load_errors() {
        let mut bad_size = MockFace::proportional();
        bad_size.fail_size = true;
        let mut bad_charmap = MockFace::proportional();
        bad_charmap.fail_charmap = true;
        let driver = MockDriver::new()
            .with_file("size.ttf", bad_size)
            .with_file("charmap.ttf", bad_charmap);

        let err = Font::load(&driver, &NoBuiltinFonts, "size.ttf", 12.0, 1.0).err().unwrap();
        assert!(matches!(err, FontError::FontLoad { ref source, .. } if source.op == "FT_Set_Char_Size"));
        let err = Font::load(&driver, &NoBuiltinFonts, "charmap.ttf", 12.0, 1.0).err().unwrap();
        assert!(matches!(err, FontError::FontLoad { ref source, .. } if source.op == "FT_Select_Charmap"));
    }

    #[test]
    fn test_type1_font_attaches_afm_best_effort() {
        let driver = MockDriver::new()
            .with_file("fonts/Foo.PFB", MockFace::proportional())
            .with_file("fonts/Bar.pfa", MockFace::proportional())
            .with_metrics("fonts/Foo.afm");

        let foo = Font::load(&driver, &NoBuiltinFonts, "fonts/Foo.PFB", 12.0, 1.0).unwrap();
        assert_eq!(foo.face().attached, vec![PathBuf::from("fonts/Foo.afm")]);

        // No metrics file at all still loads.
        let bar = Font::load(&driver, &NoBuiltinFonts, "fonts/Bar.pfa", 12.0, 1.0).unwrap();
        assert!(bar.face().attached.is_empty());
    }

    #[test]
    fn test_truetype_font_skips_afm() {
        let driver = MockDriver::new()
            .with_file("Baz.ttf", MockFace::proportional())
            .with_metrics("Baz.afm");
        let font = Font::load(&driver, &NoBuiltinFonts, "Baz.ttf", 12.0, 1.0).unwrap();
        assert!(font.face().attached.is_empty());
    }

    #[test]
    fn test_font_set_loads_slots_in_order() {
        let driver = MockDriver::new();
        let config = DrawConfig::default();
        let set = FontSet::load(&driver, &BUILTINS, &config).unwrap();
        let names: Vec<&str> = set.iter().map(|(_, f)| f.name()).collect();
        assert_eq!(names, BUILTIN_FONT_NAMES.to_vec());
        assert!(set.get(FontSlot::MonoBold).is_fixed_width());
        assert!(!set.get(FontSlot::PropItalic).is_fixed_width());
    }

    #[test]
    fn test_font_set_propagates_first_failure() {
        let driver = MockDriver::new();
        let mut config = DrawConfig::default();
        config.prop_bold = "/missing/bold.ttf".to_string();
        let err = FontSet::load(&driver, &BUILTINS, &config).err().unwrap();
        assert!(err.to_string().contains("/missing/bold.ttf"));
    }

    #[test]
    fn test_kerning_scales_to_subpixels_and_skips_missing_glyphs() {
        let driver = MockDriver::new();
        let font = Font::load(&driver, &BUILTINS, "CharterBT-Roman", 12.0, 1.0).unwrap();
        // -96 / 64 px * 4
        assert_eq!(font.kerning(&driver, b'A', b'V').unwrap(), -6);
        assert_eq!(font.kerning(&driver, b'V', b'A').unwrap(), 0);
        let calls = driver.kerning_calls();
        assert_eq!(font.kerning(&driver, b'A', text::UNI_MDASH).unwrap(), 0);
        assert_eq!(driver.kerning_calls(), calls);
    }

    #[test]
    fn test_font_directory_reads_named_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CharterBT-Bold.pfb"), b"prop").unwrap();
        let provider = FontDirectory::new(dir.path());
        assert_eq!(provider.font_bytes(5).as_deref(), Some(&b"prop"[..]));
        assert!(provider.font_bytes(0).is_none());
        assert!(provider.font_bytes(8).is_none());
    }
}
