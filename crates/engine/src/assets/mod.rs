mod atlas;
mod descriptor;
mod manager;
mod skin;
mod texture;
mod tiled_map;
mod toolbox;
mod types;

pub use atlas::{AtlasPage, AtlasRegion, TextureAtlas};
pub use descriptor::AssetDescriptor;
pub use manager::AssetManager;
pub use skin::Skin;
pub use texture::Texture;
pub use tiled_map::{MapObject, ObjectGroup, TileLayer, TiledMap, TilesetRef};
pub use toolbox::Toolbox;
pub use types::{AnyAsset, Asset, AssetError, AssetKind};
