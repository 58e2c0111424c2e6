use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{SlideError, SlideResult};

/// Environment variable listing font directories (`:`-separated, `;` on Windows).
pub const FONTS_DIR_ENV: &str = "SLIDEWRIGHT_FONTS_DIR";

/// One loaded font file.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Family name reported by the font.
    pub family: String,
    /// Raw font bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Where it was loaded from, when it came from disk.
    pub path: Option<PathBuf>,
}

/// Font files available to the rasterizer, indexed by family name.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
    by_family: HashMap<String, usize>,
}

fn family_names(bytes: &[u8]) -> Vec<String> {
    let mut ctx = parley::FontContext::default();
    let families = ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    families
        .iter()
        .filter_map(|(id, _)| ctx.collection.family_name(*id).map(str::to_owned))
        .collect()
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
}

impl FontBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no font was loaded.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Loaded family names, in load order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }

    /// Register raw font bytes. Returns the family names they provide.
    pub fn add_font_bytes(
        &mut self,
        bytes: Vec<u8>,
        path: Option<PathBuf>,
    ) -> SlideResult<Vec<String>> {
        let names = family_names(&bytes);
        if names.is_empty() {
            return Err(SlideError::asset_load(match &path {
                Some(p) => format!("no font families found in '{}'", p.display()),
                None => "no font families found in font bytes".to_owned(),
            }));
        }
        let bytes = Arc::new(bytes);
        for name in &names {
            let key = name.to_lowercase();
            if self.by_family.contains_key(&key) {
                continue;
            }
            self.by_family.insert(key, self.faces.len());
            self.faces.push(FontFace {
                family: name.clone(),
                bytes: Arc::clone(&bytes),
                path: path.clone(),
            });
        }
        Ok(names)
    }

    /// Load every `.ttf`, `.otf` and `.ttc` below `dirs`. Unreadable files are skipped.
    pub fn load_dirs(dirs: &[PathBuf]) -> Self {
        let mut book = Self::new();
        let mut files = Vec::new();
        for dir in dirs {
            collect_font_files(dir, &mut files, 0);
        }
        // Stable order regardless of directory iteration order.
        files.sort();
        for path in files {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    if let Err(e) = book.add_font_bytes(bytes, Some(path.clone())) {
                        tracing::debug!(path = %path.display(), error = %e, "skipping font");
                    }
                }
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "unreadable font"),
            }
        }
        book
    }

    /// Load from `$SLIDEWRIGHT_FONTS_DIR` plus `extra` directories.
    pub fn discover(extra: &[PathBuf]) -> Self {
        let mut dirs: Vec<PathBuf> = extra.to_vec();
        if let Some(v) = std::env::var_os(FONTS_DIR_ENV) {
            dirs.extend(std::env::split_paths(&v));
        }
        Self::load_dirs(&dirs)
    }

    /// Face for a family name or CSS-style stack (`"Inter, sans-serif"`).
    ///
    /// Falls back to the first loaded face so text always renders when any font exists.
    pub fn resolve(&self, family: &str) -> Option<&FontFace> {
        family
            .split(',')
            .map(|f| f.trim().trim_matches(['"', '\'']).to_lowercase())
            .find_map(|f| self.by_family.get(&f))
            .and_then(|&i| self.faces.get(i))
            .or_else(|| self.faces.first())
    }
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>, depth: usize) {
    if depth > 8 {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, out, depth + 1);
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
