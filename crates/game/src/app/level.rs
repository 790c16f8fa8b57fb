use std::cell::RefCell;
use std::rc::Rc;

use marty_engine::{
    AssetError, Direction, MovementState, Scene, SceneCommand, SceneContext, TiledMap, Toolbox,
};
use tracing::{info, warn};

use super::config::GameConfig;
use super::player::{PlayerEntity, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueuedKind {
    Map,
    Atlas,
    Skin,
    Texture,
}

/// A single walkable level: one map plus the player's sprite resources.
pub(crate) struct LevelScene {
    config: GameConfig,
    player: Rc<RefCell<PlayerEntity>>,
    queued: Vec<(QueuedKind, String)>,
    spawn_applied: bool,
    last_reported_progress: Option<u32>,
    last_movement: Option<(Direction, MovementState)>,
}

impl LevelScene {
    pub(crate) fn new(config: GameConfig) -> Self {
        let player = PlayerEntity::new(Position::default(), config.player_move_speed);
        Self {
            config,
            player: Rc::new(RefCell::new(player)),
            queued: Vec::new(),
            spawn_applied: false,
            last_reported_progress: None,
            last_movement: None,
        }
    }

    #[cfg(test)]
    fn player(&self) -> PlayerEntity {
        self.player.borrow().clone()
    }

    fn requested_assets(&self) -> Vec<(QueuedKind, String)> {
        let mut requested = vec![(QueuedKind::Map, self.config.map_path.clone())];
        let optional = [
            (QueuedKind::Atlas, &self.config.atlas_path),
            (QueuedKind::Skin, &self.config.skin_path),
            (QueuedKind::Texture, &self.config.texture_path),
        ];
        for (kind, path) in optional {
            if let Some(path) = path {
                requested.push((kind, path.clone()));
            }
        }
        requested
    }

    fn report_loading(&mut self, toolbox: &Toolbox) {
        let percent = (toolbox.load_completion() * 100.0).round() as u32;
        if self.last_reported_progress == Some(percent) {
            return;
        }
        self.last_reported_progress = Some(percent);
        info!(
            percent,
            pending = toolbox.queued_asset_count(),
            "level_loading_progress"
        );
    }

    fn apply_spawn(&mut self, toolbox: &mut Toolbox) {
        if self.spawn_applied || !toolbox.is_asset_loaded(&self.config.map_path) {
            return;
        }
        self.spawn_applied = true;

        let map = match toolbox.get_map(&self.config.map_path) {
            Ok(map) => map,
            Err(error) => {
                warn!(error = %error, "level_map_unavailable");
                return;
            }
        };
        match spawn_position(&map, &self.config.spawn_object) {
            Some(position) => {
                self.player.borrow_mut().place_at(position);
                info!(x = position.x, y = position.y, "player_spawned");
            }
            None => warn!(
                object = %self.config.spawn_object,
                map = %self.config.map_path,
                "player_spawn_missing_using_origin"
            ),
        }
    }

    fn report_movement(&mut self) {
        let player = self.player.borrow();
        let current = (player.direction(), player.state());
        if self.last_movement == Some(current) {
            return;
        }
        self.last_movement = Some(current);
        let position = player.position();
        info!(
            direction = ?current.0,
            state = ?current.1,
            x = position.x,
            y = position.y,
            "player_movement_changed"
        );
    }
}

impl Scene for LevelScene {
    fn load(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), AssetError> {
        for (kind, path) in self.requested_assets() {
            match kind {
                QueuedKind::Map => ctx.toolbox.queue_map(&path)?,
                QueuedKind::Atlas => ctx.toolbox.queue_atlas(&path)?,
                QueuedKind::Skin => ctx.toolbox.queue_skin(&path)?,
                QueuedKind::Texture => ctx.toolbox.queue_texture(&path)?,
            }
            self.queued.push((kind, path));
        }
        ctx.controller.bind_entity(&self.player, true);
        info!(
            map = %self.config.map_path,
            queued = self.queued.len(),
            "level_loaded"
        );
        Ok(())
    }

    fn update(&mut self, _fixed_dt_seconds: f32, ctx: &mut SceneContext<'_>) -> SceneCommand {
        if !self.spawn_applied {
            self.report_loading(ctx.toolbox);
            self.apply_spawn(ctx.toolbox);
        }
        self.report_movement();
        SceneCommand::None
    }

    fn unload(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.controller.unbind_entity();
        for (_, path) in self.queued.drain(..) {
            ctx.toolbox.unload_asset(&path);
        }
        info!("level_unloaded");
    }
}

/// Tiled stores object positions in pixels with y pointing down; the player
/// lives in tile units with y pointing up.
fn spawn_position(map: &TiledMap, object_name: &str) -> Option<Position> {
    let object = map.find_object(object_name)?;
    if map.tile_width == 0 || map.tile_height == 0 {
        return None;
    }
    let tile_width = map.tile_width as f32;
    let tile_height = map.tile_height as f32;
    let map_height_px = map.height as f32 * tile_height;
    Some(Position {
        x: object.x / tile_width,
        y: (map_height_px - object.y) / tile_height,
    })
}
