//! Resource pack loading from ZIP files and directories.

use super::{BlockModel, BlockstateDefinition, ResourcePack};
use crate::error::{RenderError, Result};
use crate::resource_pack::texture::load_texture_from_bytes;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Load a resource pack from a file path.
///
/// Supports both ZIP files and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ResourcePack> {
    let path = path.as_ref();

    let pack = if path.is_dir() {
        load_from_directory(path)?
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)?
    };

    let summary = pack.summary();
    debug!(
        path = %path.display(),
        blockstates = summary.blockstates,
        models = summary.models,
        textures = summary.textures,
        "loaded resource pack"
    );
    Ok(pack)
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = ResourcePack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let file_path = file.name().to_string();

        if file.is_dir() {
            continue;
        }

        let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) else {
            continue;
        };

        match asset_type {
            "blockstates" if asset_path.ends_with(".json") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                add_blockstate(&mut pack, namespace, asset_path.trim_end_matches(".json"), &contents);
            }
            "models" if asset_path.ends_with(".json") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                add_model(&mut pack, namespace, asset_path.trim_end_matches(".json"), &contents);
            }
            "textures" if asset_path.ends_with(".png") => {
                let mut data = Vec::new();
                file.read_to_end(&mut data)?;
                add_texture(&mut pack, namespace, asset_path.trim_end_matches(".png"), &data);
            }
            _ => {}
        }
    }

    Ok(pack)
}

/// Load a resource pack from a directory.
fn load_from_directory(path: &Path) -> Result<ResourcePack> {
    let mut pack = ResourcePack::new();

    // Accept either the pack root or its assets directory
    let assets_path = if path.join("assets").is_dir() {
        path.join("assets")
    } else if path.file_name().map(|n| n == "assets").unwrap_or(false) {
        path.to_path_buf()
    } else {
        return Err(RenderError::InvalidResourcePack(
            "No assets directory found".to_string(),
        ));
    };

    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let namespace = namespace_entry
            .file_name()
            .to_string_lossy()
            .to_string();
        let namespace_path = namespace_entry.path();

        let blockstates_path = namespace_path.join("blockstates");
        if blockstates_path.exists() {
            visit_files(&blockstates_path, &blockstates_path, "json", &mut |block_id, data| {
                add_blockstate(&mut pack, &namespace, block_id, &String::from_utf8_lossy(data));
            })?;
        }

        let models_path = namespace_path.join("models");
        if models_path.exists() {
            visit_files(&models_path, &models_path, "json", &mut |model_path, data| {
                add_model(&mut pack, &namespace, model_path, &String::from_utf8_lossy(data));
            })?;
        }

        let textures_path = namespace_path.join("textures");
        if textures_path.exists() {
            visit_files(&textures_path, &textures_path, "png", &mut |texture_path, data| {
                add_texture(&mut pack, &namespace, texture_path, data);
            })?;
        }
    }

    Ok(pack)
}

fn add_blockstate(pack: &mut ResourcePack, namespace: &str, block_id: &str, contents: &str) {
    let id = format!("{}:{}", namespace, block_id);
    match serde_json::from_str::<BlockstateDefinition>(contents) {
        Ok(def) => pack.insert_blockstate(&id, def),
        Err(e) => warn!("failed to parse blockstate {}: {}", id, e),
    }
}

fn add_model(pack: &mut ResourcePack, namespace: &str, model_path: &str, contents: &str) {
    let id = format!("{}:{}", namespace, model_path);
    match serde_json::from_str::<BlockModel>(contents) {
        Ok(model) => pack.insert_model(&id, model),
        Err(e) => warn!("failed to parse model {}: {}", id, e),
    }
}

fn add_texture(pack: &mut ResourcePack, namespace: &str, texture_path: &str, data: &[u8]) {
    let id = format!("{}:{}", namespace, texture_path);
    match load_texture_from_bytes(data) {
        Ok(texture) => pack.insert_texture(&id, texture),
        Err(e) => warn!("failed to load texture {}: {}", id, e),
    }
}

/// Parse an asset path from a ZIP file.
/// Returns (namespace, asset_type, asset_path) if valid.
fn parse_asset_path(file_path: &str) -> Option<(&str, &str, &str)> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(4, '/').collect();

    if parts.len() >= 4 && parts[0] == "assets" {
        Some((parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

/// Recursively visit files with the given extension, passing their path
/// relative to `base` (without extension, `/`-separated) and their bytes.
fn visit_files<F>(base: &Path, dir: &Path, extension: &str, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, &[u8]),
{
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            visit_files(base, &path, extension, handler)?;
        } else if path.extension().map(|e| e == extension).unwrap_or(false) {
            let Ok(relative) = path.strip_prefix(base) else {
                continue;
            };
            let relative = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            let data = std::fs::read(&path)?;
            handler(&relative, &data);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn png_bytes(color: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba(color));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_parse_asset_path() {
        assert_eq!(
            parse_asset_path("assets/minecraft/blockstates/stone.json"),
            Some(("minecraft", "blockstates", "stone.json"))
        );
        assert_eq!(
            parse_asset_path("assets/minecraft/models/block/stone.json"),
            Some(("minecraft", "models", "block/stone.json"))
        );
        assert_eq!(
            parse_asset_path("assets/custom/textures/block/bell.png"),
            Some(("custom", "textures", "block/bell.png"))
        );
        assert_eq!(parse_asset_path("pack.mcmeta"), None);
        assert_eq!(parse_asset_path("data/minecraft/recipes/test.json"), None);
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ns = dir.path().join("assets").join("minecraft");
        std::fs::create_dir_all(ns.join("blockstates")).unwrap();
        std::fs::create_dir_all(ns.join("models").join("block")).unwrap();
        std::fs::create_dir_all(ns.join("textures").join("block")).unwrap();

        std::fs::write(
            ns.join("blockstates").join("stone.json"),
            r#"{ "variants": { "": { "model": "block/stone" } } }"#,
        )
        .unwrap();
        std::fs::write(
            ns.join("models").join("block").join("stone.json"),
            r#"{ "parent": "block/cube_all", "textures": { "all": "block/stone" } }"#,
        )
        .unwrap();
        std::fs::write(ns.join("models").join("block").join("broken.json"), "{ nope").unwrap();
        std::fs::write(
            ns.join("textures").join("block").join("stone.png"),
            png_bytes([128, 128, 128, 255]),
        )
        .unwrap();

        let pack = load_from_path(dir.path()).unwrap();
        assert_eq!(pack.summary().blockstates, 1);
        assert_eq!(pack.summary().models, 1);
        assert!(pack.model("block/stone").is_some());
        assert_eq!(
            pack.texture("block/stone").unwrap().get_pixel(0, 0),
            [128, 128, 128, 255]
        );
    }

    #[test]
    fn test_load_directory_without_assets() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(dir.path()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidResourcePack(_)));
    }

    #[test]
    fn test_load_zip() {
        let mut buffer = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
            let options = zip::write::SimpleFileOptions::default();
            writer
                .start_file("assets/minecraft/models/block/cube.json", options)
                .unwrap();
            writer.write_all(br#"{ "elements": [] }"#).unwrap();
            writer
                .start_file("assets/minecraft/textures/block/red.png", options)
                .unwrap();
            writer.write_all(&png_bytes([255, 0, 0, 255])).unwrap();
            writer.finish().unwrap();
        }

        let pack = load_from_bytes(&buffer).unwrap();
        assert!(pack.model("minecraft:block/cube").unwrap().has_elements());
        assert_eq!(pack.texture("block/red").unwrap().get_pixel(5, 5), [255, 0, 0, 255]);
    }
}
