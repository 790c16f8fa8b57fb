use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::atlas::TextureAtlas;
use super::skin::Skin;
use super::texture::Texture;
use super::tiled_map::TiledMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    TiledMap,
    TextureAtlas,
    Skin,
}

impl AssetKind {
    pub const fn extension(self) -> &'static str {
        match self {
            AssetKind::Texture => "png",
            AssetKind::TiledMap => "tmx",
            AssetKind::TextureAtlas => "atlas",
            AssetKind::Skin => "json",
        }
    }
}

/// A loaded asset of any kind, as stored by the asset manager.
#[derive(Debug, Clone)]
pub enum AnyAsset {
    Texture(Arc<Texture>),
    TiledMap(Arc<TiledMap>),
    TextureAtlas(Arc<TextureAtlas>),
    Skin(Arc<Skin>),
}

impl AnyAsset {
    pub fn kind(&self) -> AssetKind {
        match self {
            AnyAsset::Texture(_) => AssetKind::Texture,
            AnyAsset::TiledMap(_) => AssetKind::TiledMap,
            AnyAsset::TextureAtlas(_) => AssetKind::TextureAtlas,
            AnyAsset::Skin(_) => AssetKind::Skin,
        }
    }
}

/// Typed view over [`AnyAsset`].
pub trait Asset: Sized {
    const KIND: AssetKind;

    fn from_any(asset: &AnyAsset) -> Option<Arc<Self>>;
}

impl Asset for Texture {
    const KIND: AssetKind = AssetKind::Texture;

    fn from_any(asset: &AnyAsset) -> Option<Arc<Self>> {
        match asset {
            AnyAsset::Texture(texture) => Some(Arc::clone(texture)),
            _ => None,
        }
    }
}

impl Asset for TiledMap {
    const KIND: AssetKind = AssetKind::TiledMap;

    fn from_any(asset: &AnyAsset) -> Option<Arc<Self>> {
        match asset {
            AnyAsset::TiledMap(map) => Some(Arc::clone(map)),
            _ => None,
        }
    }
}

impl Asset for TextureAtlas {
    const KIND: AssetKind = AssetKind::TextureAtlas;

    fn from_any(asset: &AnyAsset) -> Option<Arc<Self>> {
        match asset {
            AnyAsset::TextureAtlas(atlas) => Some(Arc::clone(atlas)),
            _ => None,
        }
    }
}

impl Asset for Skin {
    const KIND: AssetKind = AssetKind::Skin;

    fn from_any(asset: &AnyAsset) -> Option<Arc<Self>> {
        match asset {
            AnyAsset::Skin(skin) => Some(Arc::clone(skin)),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid empty asset path")]
    EmptyPath,
    #[error("asset {path}: expected '{expected}' got '{found}'")]
    ExtensionMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },
    #[error("asset {path} is registered as {registered:?} but was requested as {requested:?}")]
    KindMismatch {
        path: String,
        registered: AssetKind,
        requested: AssetKind,
    },
    #[error("asset {path} is not loaded")]
    NotLoaded { path: String },
    #[error("failed to read asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {kind:?} asset {path}: {message}")]
    Decode {
        path: PathBuf,
        kind: AssetKind,
        message: String,
    },
}

impl AssetError {
    /// Whether the request itself was malformed, as opposed to a load failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            AssetError::EmptyPath
                | AssetError::ExtensionMismatch { .. }
                | AssetError::KindMismatch { .. }
        )
    }
}
