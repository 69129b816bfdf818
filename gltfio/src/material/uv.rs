//! UV channel resolution.
//!
//! glTF materials may reference any number of texture coordinate channels,
//! while programs sample from exactly two hardware UV sets. [`resolve_uv_map`]
//! decides which hardware set each glTF channel is wired to.
//!
//! # Assignment rule
//!
//! 1. Enabled texture slots are visited in [`TextureSlot`] declaration order;
//!    disabled slots never consume a UV set.
//! 2. The first distinct channel gets [`UvSet::Uv0`], the second [`UvSet::Uv1`].
//! 3. Every further channel is aliased onto the set most used by already
//!    bound slots of the same [`TextureCategory`] as the first slot reading
//!    it. Ties and categories with no bound slot fall back to `Uv0`.
//!
//! The result is a pure function of the key.

use static_assertions::const_assert;

use super::key::{MaterialKey, TextureCategory, TextureSlot};

/// Number of glTF UV channels a [`UvMap`] covers.
pub const UV_MAP_SIZE: usize = 8;

const_assert!(UV_MAP_SIZE >= 8);

/// Hardware UV set a glTF channel is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum UvSet {
    /// The channel is not sampled.
    #[default]
    Unused,
    /// First hardware texture coordinate stream.
    Uv0,
    /// Second hardware texture coordinate stream.
    Uv1,
}

/// Maps glTF UV channel `i` to the hardware set at index `i`.
pub type UvMap = [UvSet; UV_MAP_SIZE];

/// Build the UV map for a key.
///
/// Channels referenced only by disabled slots stay [`UvSet::Unused`].
pub fn resolve_uv_map(key: &MaterialKey) -> UvMap {
    let mut map = [UvSet::Unused; UV_MAP_SIZE];
    for (channel, set) in assign_channels(key) {
        if let Some(entry) = map.get_mut(channel as usize) {
            *entry = set;
        }
    }
    map
}

/// Hardware set sampled by one slot, or `None` if the slot is disabled.
///
/// Unlike [`resolve_uv_map`] this also covers channels beyond
/// [`UV_MAP_SIZE`].
pub fn uv_set_for(key: &MaterialKey, slot: TextureSlot) -> Option<UvSet> {
    let uv = key.texture(slot)?;
    assign_channels(key)
        .into_iter()
        .find(|(channel, _)| *channel == uv)
        .map(|(_, set)| set)
}

/// Distinct channels of enabled slots with their hardware sets, in first
/// reference order.
fn assign_channels(key: &MaterialKey) -> Vec<(u8, UvSet)> {
    let mut primary: Vec<(u8, UvSet)> = Vec::with_capacity(2);
    let mut surplus: Vec<(u8, TextureSlot)> = Vec::new();

    for (slot, uv) in key.enabled_textures() {
        let seen = primary.iter().any(|(c, _)| *c == uv) || surplus.iter().any(|(c, _)| *c == uv);
        if seen {
            continue;
        }
        match primary.len() {
            0 => primary.push((uv, UvSet::Uv0)),
            1 => primary.push((uv, UvSet::Uv1)),
            _ => surplus.push((uv, slot)),
        }
    }

    let mut assigned = primary.clone();
    for (channel, slot) in surplus {
        let set = category_set(key, slot.category(), &primary);
        log::trace!("uv channel {channel} ({}) aliased to {set:?}", slot.name());
        assigned.push((channel, set));
    }
    assigned
}

/// Most common hardware set among enabled slots of a category whose channel
/// got a set of its own.
fn category_set(key: &MaterialKey, category: TextureCategory, primary: &[(u8, UvSet)]) -> UvSet {
    let mut uv0 = 0usize;
    let mut uv1 = 0usize;
    for (slot, uv) in key.enabled_textures() {
        if slot.category() != category {
            continue;
        }
        match primary.iter().find(|(c, _)| *c == uv).map(|(_, set)| *set) {
            Some(UvSet::Uv0) => uv0 += 1,
            Some(UvSet::Uv1) => uv1 += 1,
            _ => {}
        }
    }
    if uv1 > uv0 { UvSet::Uv1 } else { UvSet::Uv0 }
}
