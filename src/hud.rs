//! HUD collaborator.
//!
//! The orchestrator pushes every visible stat change through `Hud`; it never
//! reads anything back. `HudPanel` just remembers the last values so the
//! terminal renderer can print them.

pub trait Hud {
    fn update_score(&mut self, score: u32);
    fn update_coins(&mut self, coins: u32);
    fn update_crit_chance(&mut self, crit_chance: f32);
    fn update_lives(&mut self, lives: u32);
    fn show_game_over(&mut self, score: u32, coins: u32);
    fn hide_game_over(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudPanel {
    pub score: u32,
    pub coins: u32,
    pub crit_chance: f32,
    pub lives: u32,
    /// Final `(score, coins)` while the game-over box is showing.
    pub game_over: Option<(u32, u32)>,
}

impl HudPanel {
    pub fn score_text(&self) -> String {
        format!("SCORE: {}", self.score)
    }

    pub fn coins_text(&self) -> String {
        format!("COINS: {}", self.coins)
    }

    pub fn crit_text(&self) -> String {
        format!("CRIT: {}%", self.crit_chance)
    }
}

impl Hud for HudPanel {
    fn update_score(&mut self, score: u32) {
        self.score = score;
    }

    fn update_coins(&mut self, coins: u32) {
        self.coins = coins;
    }

    fn update_crit_chance(&mut self, crit_chance: f32) {
        self.crit_chance = crit_chance;
    }

    fn update_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    fn show_game_over(&mut self, score: u32, coins: u32) {
        self.game_over = Some((score, coins));
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}
