use eframe::egui;

pub const DEFAULT_PARALLAX_STRENGTH: f32 = 20.0;

/// Background offset that follows the pointer.
///
/// The offset is `(pointer / viewport - 0.5) * strength` on each axis, so a
/// pointer in the centre leaves the backgrounds in place and the corners push
/// them by half the strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    strength: f32,
    offset: egui::Vec2,
}

impl Parallax {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            offset: egui::Vec2::ZERO,
        }
    }

    pub fn offset(&self) -> egui::Vec2 {
        self.offset
    }

    /// Record a pointer move. `pointer` is relative to the viewport origin.
    pub fn pointer_moved(&mut self, pointer: egui::Pos2, viewport: egui::Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        self.offset = egui::vec2(
            (pointer.x / viewport.x - 0.5) * self.strength,
            (pointer.y / viewport.y - 0.5) * self.strength,
        );
    }
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLAX_STRENGTH)
    }
}
