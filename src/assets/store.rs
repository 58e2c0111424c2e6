use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::{
        decode::{decode_data_url, decode_image, decode_svg, looks_like_svg},
        fonts::FontBook,
        media,
        placeholder::{PlaceholderImages, SeededPlaceholders},
    },
    foundation::{
        core::Color,
        error::{SlideError, SlideResult},
        math::Fnv1a64,
    },
    layout::tree::{ImageRegion, LogoRegion, RenderTree},
    model::design::BackgroundMedia,
    theme::resolver::{LogoFilter, SlideBackground},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Uniform image of `color`.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let px = color.premul_array();
        let mut bytes = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            bytes.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }

    /// Pixel at `(x, y)`, premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copy with the color channels inverted and alpha kept.
    pub fn inverted(&self) -> Self {
        let mut bytes = self.rgba8_premul.as_ref().clone();
        for px in bytes.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = a - px[0].min(a);
            px[1] = a - px[1].min(a);
            px[2] = a - px[2].min(a);
        }
        Self {
            width: self.width,
            height: self.height,
            rgba8_premul: Arc::new(bytes),
        }
    }

    /// Resample to exactly `width`×`height`.
    pub fn resized(&self, width: u32, height: u32) -> SlideResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlideError::validation("resize target must be non-zero"));
        }
        if (width, height) == (self.width, self.height) {
            return Ok(self.clone());
        }
        let buf = image::RgbaImage::from_raw(
            self.width,
            self.height,
            self.rgba8_premul.as_ref().clone(),
        )
        .ok_or_else(|| SlideError::validation("pixel buffer does not match dimensions"))?;
        let out = image::imageops::resize(
            &buf,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(out.into_raw()),
        })
    }

    /// Scale to cover `width`×`height`, then crop the center.
    pub fn cover(&self, width: u32, height: u32) -> SlideResult<Self> {
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return Err(SlideError::validation("cover target must be non-zero"));
        }
        let scale = (f64::from(width) / f64::from(self.width))
            .max(f64::from(height) / f64::from(self.height));
        let sw = ((f64::from(self.width) * scale).ceil() as u32).max(width);
        let sh = ((f64::from(self.height) * scale).ceil() as u32).max(height);
        let scaled = self.resized(sw, sh)?;

        let x0 = ((sw - width) / 2) as usize;
        let y0 = ((sh - height) / 2) as usize;
        let src_stride = sw as usize * 4;
        let row_len = width as usize * 4;
        let mut bytes = Vec::with_capacity(row_len * height as usize);
        for y in 0..height as usize {
            let start = (y0 + y) * src_stride + x0 * 4;
            bytes.extend_from_slice(&scaled.rgba8_premul[start..start + row_len]);
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }
}

/// Normalize and validate asset paths relative to the asset root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> SlideResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SlideError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(SlideError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SlideError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SlideError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// How asset failures are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrepareMode {
    /// Any failure fails the whole preparation (exports).
    #[default]
    Strict,
    /// Failures are logged and the asset is omitted (live view).
    Lenient,
}

/// What to do with video backgrounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VideoHandling {
    /// Decode the first frame. Strict preparation fails when that is impossible.
    #[cfg_attr(feature = "media-ffmpeg", default)]
    PosterFrame,
    /// Do not load videos; back-ends paint the fallback color.
    #[cfg_attr(not(feature = "media-ffmpeg"), default)]
    Fallback,
}

/// Where and how assets are loaded.
#[derive(Clone)]
pub struct AssetLoader {
    /// Base directory for relative references.
    pub root: PathBuf,
    /// Illustrative images for content and split slides.
    pub placeholders: Arc<dyn PlaceholderImages>,
    /// Extra font directories, searched before `$SLIDEWRIGHT_FONTS_DIR`.
    pub font_dirs: Vec<PathBuf>,
    /// Whether fonts are needed at all.
    pub load_fonts: bool,
    /// Video background handling.
    pub video: VideoHandling,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("root", &self.root)
            .field("font_dirs", &self.font_dirs)
            .field("load_fonts", &self.load_fonts)
            .field("video", &self.video)
            .finish_non_exhaustive()
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetLoader {
    /// Loader rooted at `root` with seeded placeholders and no fonts.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            placeholders: Arc::new(SeededPlaceholders::default()),
            font_dirs: Vec::new(),
            load_fonts: false,
            video: VideoHandling::default(),
        }
    }

    /// Replace the placeholder source.
    pub fn with_placeholders(mut self, placeholders: Arc<dyn PlaceholderImages>) -> Self {
        self.placeholders = placeholders;
        self
    }

    fn read_reference(&self, reference: &str) -> SlideResult<(Vec<u8>, Option<String>)> {
        if let Some(data) = decode_data_url(reference) {
            let data = data?;
            return Ok((data.bytes, Some(data.mime)));
        }
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Err(SlideError::asset_load(format!(
                "remote asset '{reference}' is not fetched; embed it as a data URL or a local file"
            )));
        }
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))?;
        Ok((bytes, None))
    }

    /// Load and decode a still image (raster or SVG).
    pub fn load_image(&self, reference: &str) -> SlideResult<PreparedImage> {
        let (bytes, mime) = self.read_reference(reference)?;
        let is_svg = mime.as_deref().is_some_and(|m| m.contains("svg"))
            || reference.to_ascii_lowercase().ends_with(".svg")
            || looks_like_svg(&bytes);
        if is_svg {
            decode_svg(&bytes)
        } else {
            decode_image(&bytes)
        }
    }

    /// First frame of a video reference.
    pub fn load_video_poster(&self, reference: &str) -> SlideResult<PreparedImage> {
        if let Some(data) = decode_data_url(reference) {
            let data = data?;
            return media::extract_poster_frame_from_bytes(
                &data.bytes,
                media::video_extension(&data.mime),
            );
        }
        let norm = normalize_rel_path(reference)?;
        media::extract_poster_frame(&self.root.join(Path::new(&norm)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Stable hashed identifier of a prepared asset.
pub struct AssetId(u64);

impl AssetId {
    fn new(kind_tag: u8, reference: &str, variant: u8) -> Self {
        let mut hasher = Fnv1a64::new_default();
        hasher.write_u8(kind_tag);
        hasher.write_str(reference);
        hasher.write_u8(variant);
        Self(hasher.finish())
    }

    fn background(reference: &str) -> Self {
        Self::new(b'B', reference, 0)
    }

    fn logo(reference: &str, filter: LogoFilter) -> Self {
        let variant = match filter {
            LogoFilter::None => 0,
            LogoFilter::Invert => 1,
        };
        Self::new(b'L', reference, variant)
    }

    fn illustration(slide_id: &str) -> Self {
        Self::new(b'I', slide_id, 0)
    }

    /// Raw 64-bit value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Immutable store of everything the renderers draw besides vectors and text.
///
/// All IO happens in [`AssetStore::prepare`]; lookups never touch the filesystem.
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    images: HashMap<AssetId, PreparedImage>,
    fonts: Arc<FontBook>,
}

impl AssetStore {
    /// Store with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the font book.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = Arc::new(fonts);
        self
    }

    /// Load every asset referenced by `trees`.
    #[tracing::instrument(skip_all, fields(slides = trees.len(), mode = ?mode))]
    pub fn prepare(
        loader: &AssetLoader,
        trees: &[RenderTree],
        mode: PrepareMode,
    ) -> SlideResult<Self> {
        let mut out = Self::empty();

        for tree in trees {
            if let SlideBackground::Media { media } = &tree.background {
                out.prepare_background(loader, media, mode)?;
            }
            if let Some(logo) = &tree.logo {
                let id = AssetId::logo(&logo.source, logo.filter);
                if !out.images.contains_key(&id) {
                    let loaded = loader.load_image(&logo.source).map(|img| match logo.filter {
                        LogoFilter::None => img,
                        LogoFilter::Invert => img.inverted(),
                    });
                    out.insert_or_report(id, &logo.source, loaded, mode)?;
                }
            }
            for region in &tree.images {
                let id = AssetId::illustration(&region.slide_id);
                if !out.images.contains_key(&id) {
                    let loaded = loader
                        .placeholders
                        .image_for(&region.slide_id, &region.keyword);
                    out.insert_or_report(id, &region.slide_id, loaded, mode)?;
                }
            }
        }

        if loader.load_fonts {
            let book = FontBook::discover(&loader.font_dirs);
            if book.is_empty() {
                let msg = format!(
                    "no usable fonts found; set {} or pass a fonts directory",
                    crate::assets::fonts::FONTS_DIR_ENV
                );
                match mode {
                    PrepareMode::Strict => return Err(SlideError::asset_load(msg)),
                    PrepareMode::Lenient => tracing::warn!("{msg}"),
                }
            }
            out.fonts = Arc::new(book);
        }

        tracing::debug!(images = out.images.len(), "assets prepared");
        Ok(out)
    }

    fn prepare_background(
        &mut self,
        loader: &AssetLoader,
        media: &BackgroundMedia,
        mode: PrepareMode,
    ) -> SlideResult<()> {
        match media {
            BackgroundMedia::Image(reference) => {
                let id = AssetId::background(reference);
                if !self.images.contains_key(&id) {
                    let loaded = loader.load_image(reference);
                    self.insert_or_report(id, reference, loaded, mode)?;
                }
            }
            BackgroundMedia::Video(reference) => {
                let id = AssetId::background(reference);
                if loader.video == VideoHandling::Fallback || self.images.contains_key(&id) {
                    return Ok(());
                }
                let loaded = loader.load_video_poster(reference);
                self.insert_or_report(id, reference, loaded, mode)?;
            }
        }
        Ok(())
    }

    fn insert_or_report(
        &mut self,
        id: AssetId,
        reference: &str,
        loaded: SlideResult<PreparedImage>,
        mode: PrepareMode,
    ) -> SlideResult<()> {
        match loaded {
            Ok(img) => {
                self.images.insert(id, img);
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    SlideError::AssetLoad(_) => e,
                    other => SlideError::asset_load(format!("'{}': {other}", short(reference))),
                };
                match mode {
                    PrepareMode::Strict => Err(err),
                    PrepareMode::Lenient => {
                        tracing::warn!(reference = %short(reference), error = %err, "asset omitted");
                        Ok(())
                    }
                }
            }
        }
    }

    /// Prepared background media, if it loaded.
    pub fn background(&self, media: &BackgroundMedia) -> Option<&PreparedImage> {
        let reference = match media {
            BackgroundMedia::Image(r) | BackgroundMedia::Video(r) => r,
        };
        self.images.get(&AssetId::background(reference))
    }

    /// Logo artwork with its filter already applied.
    pub fn logo(&self, logo: &LogoRegion) -> Option<&PreparedImage> {
        self.images.get(&AssetId::logo(&logo.source, logo.filter))
    }

    /// Illustration for an image panel.
    pub fn image(&self, region: &ImageRegion) -> Option<&PreparedImage> {
        self.images.get(&AssetId::illustration(&region.slide_id))
    }

    /// Loaded fonts.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Number of prepared images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image was prepared.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Data URLs make unreadable log lines.
fn short(reference: &str) -> &str {
    match reference.char_indices().nth(64) {
        Some((i, _)) => &reference[..i],
        None => reference,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
