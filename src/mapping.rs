//! Brightness step to EC register mapping.
//!
//! Board variants differ only in data, so adding one means adding a row to
//! [`VARIANTS`].

use crate::board::BoardIdentity;
use crate::state::{BrightnessStep, MAX_STEP};

/// Number of entries in every per-step level table.
pub const LEVEL_COUNT: usize = MAX_STEP as usize + 1;

const WHITE_LEVELS: [u8; LEVEL_COUNT] = [0x00, 0x5c, 0xb8];

/// Where and what to write for each step on one board variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMapping {
    /// EC RAM address of the backlight level register.
    pub address: u16,
    /// Register value for each step, indexed by step.
    pub levels: [u8; LEVEL_COUNT],
}

impl RegisterMapping {
    /// Register value for `step`.
    pub fn level(&self, step: BrightnessStep) -> u8 {
        self.levels[step.index()]
    }
}

/// Mapping used by every board without an entry in [`VARIANTS`].
pub static DEFAULT_MAPPING: RegisterMapping = RegisterMapping {
    address: 0x0409,
    levels: WHITE_LEVELS,
};

/// Per-variant overrides.
pub static VARIANTS: &[(&str, RegisterMapping)] = &[(
    "IFLX14I01",
    RegisterMapping {
        address: 0x03e2,
        levels: WHITE_LEVELS,
    },
)];

/// Look up the mapping for `board`, falling back to [`DEFAULT_MAPPING`].
pub fn mapping_for(board: &BoardIdentity) -> &'static RegisterMapping {
    VARIANTS
        .iter()
        .find(|(ident, _)| *ident == board.as_str())
        .map_or(&DEFAULT_MAPPING, |(_, mapping)| mapping)
}

/// Map a validated step on `board` to a `(register address, register value)` pair.
pub fn map(step: BrightnessStep, board: &BoardIdentity) -> (u16, u8) {
    let mapping = mapping_for(board);
    (mapping.address, mapping.level(step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(raw: u32) -> BrightnessStep {
        BrightnessStep::new(raw).unwrap()
    }

    #[test]
    fn test_default_board() {
        let board = BoardIdentity::new("PULSE1403");
        assert_eq!(map(step(0), &board), (0x0409, 0x00));
        assert_eq!(map(step(1), &board), (0x0409, 0x5c));
        assert_eq!(map(step(2), &board), (0x0409, 0xb8));
    }

    #[test]
    fn test_variant_override() {
        let board = BoardIdentity::new("IFLX14I01");
        assert_eq!(map(step(1), &board), (0x03e2, 0x5c));
        assert_eq!(map(BrightnessStep::MAX, &board), (0x03e2, 0xb8));
    }

    #[test]
    fn test_unknown_board_uses_default() {
        let board = BoardIdentity::new("SOMETHING-ELSE");
        assert_eq!(mapping_for(&board), &DEFAULT_MAPPING);
        assert_eq!(mapping_for(&BoardIdentity::unknown()), &DEFAULT_MAPPING);
    }

    #[test]
    fn test_map_is_deterministic() {
        let board = BoardIdentity::new("IFLX14I01");
        let first = map(step(2), &board);
        for _ in 0..16 {
            assert_eq!(map(step(2), &board), first);
        }
    }
}
