use crate::StudioResult;
use pixel_sprite_sdk::{ImagePart, SpriteFrame};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// A downloadable image of a finished creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset<'a> {
    Portrait,
    PixelCharacter,
    Frame(&'a str),
}

impl Asset<'_> {
    fn suffix(&self) -> String {
        match self {
            Self::Portrait => "portrait".to_string(),
            Self::PixelCharacter => "pixel_char".to_string(),
            Self::Frame(name) => (*name).to_string(),
        }
    }
}

/// `<figure>_<suffix>.png`, with the figure name lower-cased and whitespace
/// and characters reserved by file systems replaced with `_`.
#[must_use]
pub fn asset_file_name(figure_name: &str, asset: Asset<'_>) -> String {
    let prefix: String = figure_name
        .to_lowercase()
        .chars()
        .map(|c| {
            let reserved = matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
            if c.is_whitespace() || reserved {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{prefix}_{}.png", asset.suffix())
}

/// Everything needed to write out a creation's images.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub figure_name: &'a str,
    pub portrait_url: Option<&'a str>,
    pub base_character_url: Option<&'a str>,
    pub frames: &'a [SpriteFrame],
}

/// Decode every available image and write it into `dir`. Returns the written
/// paths: portrait, base character, then frames in order.
pub fn export_assets(dir: &Path, request: ExportRequest<'_>) -> StudioResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut assets: Vec<(Asset<'_>, &str)> = Vec::new();
    if let Some(url) = request.portrait_url {
        assets.push((Asset::Portrait, url));
    }
    if let Some(url) = request.base_character_url {
        assets.push((Asset::PixelCharacter, url));
    }
    for frame in request.frames {
        assets.push((Asset::Frame(frame.name.as_str()), frame.url.as_str()));
    }

    let mut written = Vec::with_capacity(assets.len());
    for (asset, url) in assets {
        let bytes = ImagePart::from_data_uri(url)?.decode()?;
        let path = dir.join(asset_file_name(request.figure_name, asset));
        fs::write(&path, bytes)?;
        written.push(path);
    }

    info!(files = written.len(), dir = %dir.display(), "exported assets");
    Ok(written)
}
