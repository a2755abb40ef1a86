//! Pure overlap tests. Every entity collides as a circle.
//!
//! Invincibility is not checked here; the orchestrator skips the player test
//! while the player is invincible.

use crate::entities::{Alien, Bullet, MysteryBox, Vec2};
use crate::player::Player;

/// True when two circles overlap (touching edges do not count).
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let reach = ra + rb;
    dx * dx + dy * dy < reach * reach
}

pub fn bullet_hits_enemy(bullet: &Bullet, alien: &Alien) -> bool {
    circles_overlap(bullet.pos, bullet.radius(), alien.pos, alien.radius())
}

pub fn bullet_hits_box(bullet: &Bullet, mystery_box: &MysteryBox) -> bool {
    circles_overlap(bullet.pos, bullet.radius(), mystery_box.pos, mystery_box.radius())
}

pub fn player_hits_enemy(player: &Player, alien: &Alien) -> bool {
    circles_overlap(player.pos, player.radius(), alien.pos, alien.radius())
}
