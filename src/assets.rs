//! Sprite assets.
//!
//! Sprites are plain-text art files loaded on a background thread. Until a
//! sprite has arrived (or if its file is missing) `get` returns `None` and
//! the renderer draws a procedural fallback instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Player,
    Projectile,
    CritProjectile,
    AlienLarge,
    AlienSmall,
    Cloud(usize),
    MysteryBox,
    Explosion,
    Coin,
    Heart,
}

/// Text art. Spaces are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    rows: Vec<String>,
}

impl Sprite {
    /// Parse sprite text; blank files yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut rows: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            None
        } else {
            Some(Self { rows })
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Width in terminal cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    /// Height in terminal cells.
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Every named handle the renderer asks for, with its file name.
pub fn manifest(config: &GameConfig) -> Vec<(AssetId, String)> {
    let mut entries = vec![
        (AssetId::Player, config.player.image.clone()),
        (AssetId::Projectile, config.player.projectile_image.clone()),
        (AssetId::CritProjectile, config.player.crit_projectile_image.clone()),
        (AssetId::AlienLarge, config.enemy.large.image.clone()),
        (AssetId::AlienSmall, config.enemy.small.image.clone()),
        (AssetId::MysteryBox, config.mystery_box.image.clone()),
        (AssetId::Explosion, config.mystery_box.explosion_image.clone()),
        (AssetId::Coin, config.effects.coin_image.clone()),
        (AssetId::Heart, config.effects.heart_image.clone()),
    ];
    for (i, path) in config.background.cloud_images.iter().enumerate() {
        entries.push((AssetId::Cloud(i), path.clone()));
    }
    entries
}

type Loaded = (AssetId, Option<Sprite>);

#[derive(Debug, Default)]
pub struct AssetStore {
    sprites: HashMap<AssetId, Sprite>,
    pending: Option<mpsc::Receiver<Loaded>>,
}

impl AssetStore {
    /// A store with nothing loaded; everything renders as a fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start loading `manifest` entries relative to `root`. Call `poll` each
    /// frame to pick up finished sprites.
    pub fn load_in_background(root: &Path, manifest: Vec<(AssetId, String)>) -> Self {
        let (tx, rx) = mpsc::channel::<Loaded>();
        let root: PathBuf = root.to_path_buf();

        thread::spawn(move || {
            for (id, rel) in manifest {
                let path = root.join(&rel);
                let sprite = match std::fs::read_to_string(&path) {
                    Ok(text) => Sprite::parse(&text),
                    Err(err) => {
                        tracing::warn!(
                            ?id,
                            path = %path.display(),
                            %err,
                            "asset unavailable, using fallback"
                        );
                        None
                    }
                };
                if tx.send((id, sprite)).is_err() {
                    break; // store dropped
                }
            }
        });

        Self {
            sprites: HashMap::new(),
            pending: Some(rx),
        }
    }

    /// Drain finished loads without blocking.
    pub fn poll(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        loop {
            match rx.try_recv() {
                Ok((id, Some(sprite))) => {
                    self.sprites.insert(id, sprite);
                }
                Ok((_, None)) => {}
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::debug!(loaded = self.sprites.len(), "asset loading finished");
                    self.pending = None;
                    break;
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn insert(&mut self, id: AssetId, sprite: Sprite) {
        self.sprites.insert(id, sprite);
    }

    pub fn is_ready(&self, id: AssetId) -> bool {
        self.sprites.contains_key(&id)
    }

    pub fn get(&self, id: AssetId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }
}
