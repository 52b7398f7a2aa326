use super::{LegacyMode, ModeResolver};

/// `(log2 bpp, x eig, y eig)` for the numbered screen modes 0 to 49
#[rustfmt::skip]
const MODES: [(u32, u32, u32); 50] = [
    (0, 1, 2), (1, 2, 2), (2, 3, 2), (0, 1, 2), (0, 2, 2),
    (1, 3, 2), (0, 2, 2), (2, 2, 2), (1, 1, 2), (2, 2, 2),
    (3, 3, 2), (1, 1, 2), (2, 1, 2), (3, 2, 2), (2, 1, 2),
    (3, 1, 2), (2, 1, 2), (2, 1, 2), (0, 1, 1), (1, 1, 1),
    (2, 1, 1), (3, 1, 1), (2, 0, 1), (0, 1, 1), (3, 1, 2),
    (0, 1, 1), (1, 1, 1), (2, 1, 1), (3, 1, 1), (0, 1, 1),
    (1, 1, 1), (2, 1, 1), (3, 1, 1), (0, 1, 2), (1, 1, 2),
    (2, 1, 2), (3, 1, 2), (0, 1, 2), (1, 1, 2), (2, 1, 2),
    (3, 1, 2), (0, 1, 2), (1, 1, 2), (2, 1, 2), (0, 1, 2),
    (1, 1, 2), (2, 1, 2), (3, 2, 2), (2, 2, 1), (3, 2, 1),
];

/// The classic numbered screen modes
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardModes;

impl ModeResolver for StandardModes {
    fn legacy_mode(&self, mode: u32) -> Option<LegacyMode> {
        let &(log2_bpp, x_eig, y_eig) = MODES.get(mode as usize)?;
        Some(LegacyMode {
            log2_bpp,
            x_eig,
            y_eig,
        })
    }
}
