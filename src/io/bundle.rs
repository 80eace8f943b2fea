//! Imports a bundle directory into one [`Aspect`].
//!
//! A bundle is laid out as
//! ```text
//! <root>/aspect.json      manifest
//! <root>/textures/*.png   shared textures, named by file stem
//! <root>/scripts/*.lua    scripts, named by file stem
//! <root>/entity/*.bbmodel model documents of each category
//! <root>/world/*.bbmodel
//! <root>/hud/*.bbmodel
//! ```
//! Missing category folders are treated as empty.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::aspect::Aspect;
use crate::core::model_part::ModelPart;
use crate::core::script::Script;
use crate::core::shared::ConfigType;
use crate::core::texture::TextureTable;
use crate::io::bbmodel::{self, CompiledDocument};
use crate::io::{manifest, texture_io};
use crate::shared::fields;
use crate::utils::file_stem_of;

const TEXTURES_DIR: &str = "textures";
const SCRIPTS_DIR: &str = "scripts";

#[derive(Debug, Clone)]
pub struct Config {
    pub manifest_name: String,
    /// Extensions are compared case-insensitively, without the dot.
    pub texture_extensions: Vec<String>,
    pub script_extensions: Vec<String>,
    pub model_extensions: Vec<String>,
    /// Visit folder entries sorted by file name. Texture deduplication depends
    /// on document order, so turning this off makes global texture indices
    /// follow whatever order the file system yields.
    pub sort_entries: bool,
    /// Reject texture bytes that are not a PNG image.
    pub validate_textures: bool,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            manifest_name: "aspect.json".to_string(),
            texture_extensions: vec!["png".to_string()],
            script_extensions: vec!["lua".to_string()],
            model_extensions: vec!["bbmodel".to_string(), "json".to_string()],
            sort_entries: true,
            validate_textures: true,
        }
    }
}


#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Bundle folder '{path}' does not exist")]
    BundleNotFound { path: String },
    #[error("Model document '{file}': {source}")]
    Document { file: String, source: bbmodel::Err },
    #[error("Manifest '{file}': {source}")]
    InvalidManifest { file: String, source: manifest::Err },
    #[error("Texture '{file}': {source}")]
    InvalidTexture { file: String, source: texture_io::Err },
    #[error("Failed to read '{path}': {source}")]
    Io { path: String, source: std::io::Error },
    #[error("Import task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Bundle has no manifest at '{path}'")]
    MissingManifest { path: String },
    #[error("Failed to list bundle folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Flat classification of import failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BundleNotFound,
    DuplicateUuid,
    InvalidManifest,
    InvalidTexture,
    Io,
    Join,
    MalformedDocument,
    MissingManifest,
    UnresolvedReference,
}

impl Err {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Err::BundleNotFound { .. } => ErrorKind::BundleNotFound,
            Err::Document { source, .. } => match source {
                bbmodel::Err::DuplicateUuid { .. } => ErrorKind::DuplicateUuid,
                bbmodel::Err::InvalidTexture { .. } => ErrorKind::InvalidTexture,
                bbmodel::Err::Json(_) | bbmodel::Err::MalformedDocument { .. } => ErrorKind::MalformedDocument,
                bbmodel::Err::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            },
            Err::InvalidManifest { .. } => ErrorKind::InvalidManifest,
            Err::InvalidTexture { .. } => ErrorKind::InvalidTexture,
            Err::Io { .. } | Err::Walk(_) => ErrorKind::Io,
            Err::Join(_) => ErrorKind::Join,
            Err::MissingManifest { .. } => ErrorKind::MissingManifest,
        }
    }
}


/// Imports the bundle at `root`. Any failure aborts the whole import.
pub fn import(root: &Path, cfg: Config) -> Result<Aspect, Err> {
    if !root.is_dir() {
        return Err(Err::BundleNotFound { path: root.display().to_string() });
    }
    log::info!("Importing bundle '{}'", root.display());

    // Metadata
    let manifest_path = root.join(&cfg.manifest_name);
    if !manifest_path.is_file() {
        return Err(Err::MissingManifest { path: manifest_path.display().to_string() });
    }
    let bytes = read(&manifest_path)?;
    let metadata = manifest::parse_metadata_bytes(&bytes)
        .map_err(|source| Err::InvalidManifest { file: display_name(&manifest_path), source })?;

    // Shared textures seed the table
    let mut table = TextureTable::new();
    for path in list_files(&root.join(TEXTURES_DIR), &cfg.texture_extensions, &cfg)? {
        let bytes = read(&path)?;
        if cfg.validate_textures {
            texture_io::image_format_from_buffer(&bytes)
                .map_err(|source| Err::InvalidTexture { file: display_name(&path), source })?;
        }
        log::debug!("Loaded texture '{}'", display_name(&path));
        table.insert_shared(file_stem_of(&path), bytes);
    }

    // Scripts
    let mut scripts = Vec::new();
    for path in list_files(&root.join(SCRIPTS_DIR), &cfg.script_extensions, &cfg)? {
        let source = fs::read_to_string(&path).map_err(|source| io_err(&path, source))?;
        log::debug!("Loaded script '{}'", display_name(&path));
        scripts.push(Script::new(file_stem_of(&path), source));
    }

    // Models
    let entity = ModelPart::group(fields::ENTITY, compile_category(root, fields::ENTITY, &mut table, &cfg)?);
    let world = compile_category(root, fields::WORLD, &mut table, &cfg)?;
    let hud = ModelPart::group(fields::HUD, compile_category(root, fields::HUD, &mut table, &cfg)?);

    let textures = table.into_textures();
    log::info!(
        "Imported '{}': {} textures, {} scripts, {} world roots",
        metadata.name,
        textures.len(),
        scripts.len(),
        world.len()
    );
    Ok(Aspect::new(metadata, entity, world, hud, textures, scripts))
}

/// Runs [`import`] on the blocking thread pool of the current tokio runtime.
pub async fn import_async(root: PathBuf, cfg: Config) -> Result<Aspect, Err> {
    tokio::task::spawn_blocking(move || import(&root, cfg)).await?
}


/// Compiles every document of one category folder, one root per document,
/// merging textures in folder order.
fn compile_category(root: &Path, category: &str, table: &mut TextureTable, cfg: &Config) -> Result<Vec<ModelPart>, Err> {
    let dir = root.join(category);
    let mut parts = Vec::new();
    for path in list_files(&dir, &cfg.model_extensions, cfg)? {
        let json = read(&path)?;
        let stem = file_stem_of(&path);
        let part = CompiledDocument::parse(&stem, &json, &dir)
            .and_then(|doc| doc.merge(table, cfg.validate_textures))
            .map_err(|source| Err::Document { file: display_name(&path), source })?;
        log::debug!("Compiled '{}' ({} parts) into {}", display_name(&path), part.count_nodes(), category);
        parts.push(part);
    }
    Ok(parts)
}

/// Files directly inside `dir` whose extension is one of `extensions`.
/// A missing folder has no files.
fn list_files(dir: &Path, extensions: &[String], cfg: &Config) -> Result<Vec<PathBuf>, Err> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if cfg.sort_entries {
        walker = walker.sort_by_file_name();
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        let matches = entry.file_type().is_file() && path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path.to_path_buf());
        } else {
            log::warn!("Skipping '{}'", path.display());
        }
    }
    Ok(files)
}

fn read(path: &Path) -> Result<Vec<u8>, Err> {
    fs::read(path).map_err(|source| io_err(path, source))
}

fn io_err(path: &Path, source: std::io::Error) -> Err {
    Err::Io { path: path.display().to_string(), source }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.manifest_name, "aspect.json");
        assert!(cfg.sort_entries);
        assert!(cfg.model_extensions.iter().any(|e| e == "bbmodel"));
    }

    #[test]
    fn document_errors_keep_their_kind() {
        let err = Err::Document {
            file: "a.bbmodel".to_string(),
            source: bbmodel::Err::UnresolvedReference { uuid: "x".to_string() },
        };
        assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
        assert!(err.to_string().contains("a.bbmodel"));
    }

    #[test]
    fn missing_root_is_not_found() {
        let err = import(Path::new("no/such/bundle"), Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BundleNotFound);
    }
}
