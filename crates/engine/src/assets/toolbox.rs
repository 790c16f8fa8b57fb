use std::path::PathBuf;
use std::sync::Arc;

use super::atlas::TextureAtlas;
use super::descriptor::AssetDescriptor;
use super::manager::AssetManager;
use super::skin::Skin;
use super::texture::Texture;
use super::tiled_map::TiledMap;
use super::types::{Asset, AssetError};

/// Typed front door to the [`AssetManager`].
///
/// Every path is checked against the extension of the requested asset kind
/// before it reaches the manager. `queue_*` calls never block; `get_*` calls
/// load the asset synchronously when it is not ready yet.
#[derive(Debug)]
pub struct Toolbox {
    manager: AssetManager,
}

impl Toolbox {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            manager: AssetManager::new(asset_root),
        }
    }

    pub fn manager(&self) -> &AssetManager {
        &self.manager
    }

    pub fn queue_texture(&mut self, path: &str) -> Result<(), AssetError> {
        self.queue::<Texture>(path)
    }

    pub fn queue_map(&mut self, path: &str) -> Result<(), AssetError> {
        self.queue::<TiledMap>(path)
    }

    pub fn queue_atlas(&mut self, path: &str) -> Result<(), AssetError> {
        self.queue::<TextureAtlas>(path)
    }

    pub fn queue_skin(&mut self, path: &str) -> Result<(), AssetError> {
        self.queue::<Skin>(path)
    }

    pub fn get_texture(&mut self, path: &str) -> Result<Arc<Texture>, AssetError> {
        self.get::<Texture>(path)
    }

    pub fn get_map(&mut self, path: &str) -> Result<Arc<TiledMap>, AssetError> {
        self.get::<TiledMap>(path)
    }

    pub fn get_atlas(&mut self, path: &str) -> Result<Arc<TextureAtlas>, AssetError> {
        self.get::<TextureAtlas>(path)
    }

    pub fn get_skin(&mut self, path: &str) -> Result<Arc<Skin>, AssetError> {
        self.get::<Skin>(path)
    }

    /// Advance the load queue by one asset. `Ok(true)` once everything queued
    /// has been loaded.
    pub fn update_asset_loading(&mut self) -> Result<bool, AssetError> {
        self.manager.update()
    }

    pub fn unload_asset(&mut self, path: &str) {
        if self.manager.contains(path) {
            self.manager.unload(path);
        }
    }

    pub fn load_completion(&self) -> f32 {
        self.manager.progress()
    }

    pub fn queued_asset_count(&self) -> usize {
        self.manager.queued_assets()
    }

    pub fn is_asset_loaded(&self, path: &str) -> bool {
        self.manager.is_loaded(path)
    }

    fn queue<T: Asset>(&mut self, path: &str) -> Result<(), AssetError> {
        let descriptor = AssetDescriptor::new(path, T::KIND)?;
        self.manager.load(&descriptor)
    }

    fn get<T: Asset>(&mut self, path: &str) -> Result<Arc<T>, AssetError> {
        let descriptor = AssetDescriptor::new(path, T::KIND)?;
        if !self.manager.is_loaded(descriptor.path()) {
            if !self.manager.contains(descriptor.path()) {
                self.manager.load(&descriptor)?;
            }
            self.manager.finish_loading_asset(&descriptor)?;
        }
        self.manager.get::<T>(&descriptor)
    }
}
