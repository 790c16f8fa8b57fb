use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::atlas::load_texture_atlas;
use super::descriptor::AssetDescriptor;
use super::skin::load_skin;
use super::texture::load_texture;
use super::tiled_map::load_tiled_map;
use super::types::{AnyAsset, Asset, AssetError, AssetKind};

#[derive(Debug)]
struct AssetEntry {
    kind: AssetKind,
    ref_count: u32,
    asset: Option<AnyAsset>,
}

/// Reference-counted asset cache with a FIFO load queue, rooted at an asset
/// directory. Every `load` of a path adds one reference; `unload` drops one and
/// evicts the asset when none remain.
#[derive(Debug)]
pub struct AssetManager {
    root: PathBuf,
    entries: HashMap<String, AssetEntry>,
    queue: VecDeque<AssetDescriptor>,
    loaded_since_drain: usize,
    queued_since_drain: usize,
}

impl AssetManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
            queue: VecDeque::new(),
            loaded_since_drain: 0,
            queued_since_drain: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Queue `descriptor` for loading, or add a reference if the path is
    /// already queued or loaded.
    pub fn load(&mut self, descriptor: &AssetDescriptor) -> Result<(), AssetError> {
        if let Some(entry) = self.entries.get_mut(descriptor.path()) {
            ensure_kind(descriptor, entry.kind)?;
            entry.ref_count = entry.ref_count.saturating_add(1);
            debug!(
                path = descriptor.path(),
                ref_count = entry.ref_count,
                "asset_reference_added"
            );
            return Ok(());
        }

        self.entries.insert(
            descriptor.path().to_string(),
            AssetEntry {
                kind: descriptor.kind(),
                ref_count: 1,
                asset: None,
            },
        );
        self.queue.push_back(descriptor.clone());
        self.queued_since_drain += 1;
        debug!(
            path = descriptor.path(),
            kind = ?descriptor.kind(),
            queued = self.queue.len(),
            "asset_queued"
        );
        Ok(())
    }

    /// Load the next queued asset, if any. Returns `true` once the queue is
    /// empty. A failed asset is dropped from the queue and its error returned.
    pub fn update(&mut self) -> Result<bool, AssetError> {
        let Some(descriptor) = self.queue.pop_front() else {
            self.reset_progress();
            return Ok(true);
        };

        let result = self.load_now(&descriptor);
        if self.queue.is_empty() {
            self.reset_progress();
        }
        result.map(|_| self.queue.is_empty())
    }

    /// Block until the asset behind `descriptor` is loaded and return it. The
    /// asset must have been passed to [`AssetManager::load`] first.
    pub fn finish_loading_asset(
        &mut self,
        descriptor: &AssetDescriptor,
    ) -> Result<AnyAsset, AssetError> {
        let entry = self
            .entries
            .get(descriptor.path())
            .ok_or_else(|| AssetError::NotLoaded {
                path: descriptor.path().to_string(),
            })?;
        ensure_kind(descriptor, entry.kind)?;
        if let Some(asset) = &entry.asset {
            return Ok(asset.clone());
        }

        self.queue
            .retain(|queued| queued.path() != descriptor.path());
        let result = self.load_now(descriptor);
        if self.queue.is_empty() {
            self.reset_progress();
        }
        result
    }

    pub fn get<T: Asset>(&self, descriptor: &AssetDescriptor) -> Result<Arc<T>, AssetError> {
        let not_loaded = || AssetError::NotLoaded {
            path: descriptor.path().to_string(),
        };
        let entry = self.entries.get(descriptor.path()).ok_or_else(not_loaded)?;
        let asset = entry.asset.as_ref().ok_or_else(not_loaded)?;
        T::from_any(asset).ok_or_else(|| AssetError::KindMismatch {
            path: descriptor.path().to_string(),
            registered: entry.kind,
            requested: T::KIND,
        })
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.entries
            .get(path)
            .is_some_and(|entry| entry.asset.is_some())
    }

    pub fn reference_count(&self, path: &str) -> u32 {
        self.entries.get(path).map_or(0, |entry| entry.ref_count)
    }

    /// Drop one reference to `path`; the asset is evicted (or dequeued) when
    /// the last reference goes.
    pub fn unload(&mut self, path: &str) {
        let Some(entry) = self.entries.get_mut(path) else {
            warn!(path, "asset_unload_unknown");
            return;
        };
        entry.ref_count = entry.ref_count.saturating_sub(1);
        if entry.ref_count > 0 {
            debug!(path, ref_count = entry.ref_count, "asset_reference_dropped");
            return;
        }

        let was_loaded = entry.asset.is_some();
        self.entries.remove(path);
        if !was_loaded {
            let before = self.queue.len();
            self.queue.retain(|queued| queued.path() != path);
            if self.queue.len() < before {
                self.queued_since_drain = self.queued_since_drain.saturating_sub(1);
            }
            if self.queue.is_empty() {
                self.reset_progress();
            }
        }
        info!(path, was_loaded, "asset_unloaded");
    }

    /// Fraction of assets loaded since the queue was last empty, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.queued_since_drain == 0 {
            return 1.0;
        }
        (self.loaded_since_drain as f32 / self.queued_since_drain as f32).min(1.0)
    }

    pub fn queued_assets(&self) -> usize {
        self.queue.len()
    }

    fn load_now(&mut self, descriptor: &AssetDescriptor) -> Result<AnyAsset, AssetError> {
        let resolved = self.root.join(descriptor.path());
        self.loaded_since_drain += 1;
        match load_any(&resolved, descriptor.kind()) {
            Ok(asset) => {
                info!(
                    path = descriptor.path(),
                    kind = ?descriptor.kind(),
                    resolved = %resolved.display(),
                    "asset_loaded"
                );
                if let Some(entry) = self.entries.get_mut(descriptor.path()) {
                    entry.asset = Some(asset.clone());
                }
                Ok(asset)
            }
            Err(error) => {
                warn!(
                    path = descriptor.path(),
                    kind = ?descriptor.kind(),
                    error = %error,
                    "asset_load_failed"
                );
                self.entries.remove(descriptor.path());
                Err(error)
            }
        }
    }

    fn reset_progress(&mut self) {
        self.loaded_since_drain = 0;
        self.queued_since_drain = 0;
    }
}

fn ensure_kind(descriptor: &AssetDescriptor, registered: AssetKind) -> Result<(), AssetError> {
    if descriptor.kind() == registered {
        Ok(())
    } else {
        Err(AssetError::KindMismatch {
            path: descriptor.path().to_string(),
            registered,
            requested: descriptor.kind(),
        })
    }
}

fn load_any(path: &Path, kind: AssetKind) -> Result<AnyAsset, AssetError> {
    Ok(match kind {
        AssetKind::Texture => AnyAsset::Texture(Arc::new(load_texture(path)?)),
        AssetKind::TiledMap => AnyAsset::TiledMap(Arc::new(load_tiled_map(path)?)),
        AssetKind::TextureAtlas => AnyAsset::TextureAtlas(Arc::new(load_texture_atlas(path)?)),
        AssetKind::Skin => AnyAsset::Skin(Arc::new(load_skin(path)?)),
    })
}
