use bevy::prelude::*;

/// Interaction mode of the editor. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Mode {
    #[default]
    None,
    Drag,
    Draw,
    Spawn,
    Polygon,
}

impl Mode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::None => "None",
            Mode::Drag => "Drag Image",
            Mode::Draw => "Draw",
            Mode::Spawn => "Rectangle",
            Mode::Polygon => "Polygon",
        }
    }

    /// Modes reachable from the sidebar, in button order.
    pub fn toggles() -> &'static [Mode] {
        &[Mode::Drag, Mode::Draw, Mode::Spawn, Mode::Polygon]
    }

    /// Whether the sidebar shows a color picker while this mode is active.
    pub fn has_color_picker(&self) -> bool {
        matches!(self, Mode::Draw | Mode::Spawn | Mode::Polygon)
    }

    /// Result of pressing this mode's button while `current` is active.
    pub fn toggled_from(self, current: Mode) -> Mode {
        if current == self { Mode::None } else { self }
    }
}

/// The two-color palette offered by every picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Swatch {
    #[default]
    Red,
    Green,
}

impl Swatch {
    pub fn all() -> &'static [Swatch] {
        &[Swatch::Red, Swatch::Green]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Swatch::Red => "Red",
            Swatch::Green => "Green",
        }
    }

    pub fn rgba(&self) -> [u8; 4] {
        match self {
            Swatch::Red => [255, 0, 0, 255],
            Swatch::Green => [0, 128, 0, 255],
        }
    }

    pub fn color(&self) -> Color {
        let [r, g, b, a] = self.rgba();
        Color::srgba_u8(r, g, b, a)
    }
}
