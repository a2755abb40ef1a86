//! Entity managers. Each one owns a single entity family: its collection,
//! its spawn timer and the pruning of dead members.

pub mod alien;
pub mod cloud;
pub mod mystery_box;

pub use alien::AlienManager;
pub use cloud::CloudManager;
pub use mystery_box::MysteryBoxManager;

use rand::Rng;

/// Uniform coordinate in `[margin, extent - margin)`, or the midpoint when
/// the extent is too small to honour the margin.
pub(crate) fn random_coord(rng: &mut impl Rng, extent: f32, margin: f32) -> f32 {
    if extent - margin > margin {
        rng.gen_range(margin..extent - margin)
    } else {
        extent / 2.0
    }
}
