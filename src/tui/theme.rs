//! Colour palettes for each [`ThemeId`].

use ratatui::style::{Color, Modifier, Style};

use crate::core::theme::ThemeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub border: Color,
    pub border_active: Color,
    pub background: Color,
    pub highlight: Color,
}

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

const CATPPUCCIN_MOCHA: Palette = Palette {
    primary: hex(0xcdd6f4),
    secondary: hex(0xa6adc8),
    accent: hex(0xf5c2e7),
    muted: hex(0x6c7086),
    error: hex(0xf38ba8),
    success: hex(0xa6e3a1),
    warning: hex(0xf9e2af),
    border: hex(0x45475a),
    border_active: hex(0x89b4fa),
    background: hex(0x313244),
    highlight: hex(0x45475a),
};

const CATPPUCCIN_LATTE: Palette = Palette {
    primary: hex(0x4c4f69),
    secondary: hex(0x5c5f77),
    accent: hex(0xea76cb),
    muted: hex(0x9ca0b0),
    error: hex(0xd20f39),
    success: hex(0x40a02b),
    warning: hex(0xdf8e1d),
    border: hex(0xdce0e8),
    border_active: hex(0x1e66f5),
    background: hex(0xe6e9ef),
    highlight: hex(0xccd0da),
};

const DRACULA: Palette = Palette {
    primary: hex(0xf8f8f2),
    secondary: hex(0x6272a4),
    accent: hex(0xff79c6),
    muted: hex(0x6272a4),
    error: hex(0xff5555),
    success: hex(0x50fa7b),
    warning: hex(0xf1fa8c),
    border: hex(0x44475a),
    border_active: hex(0xbd93f9),
    background: hex(0x282a36),
    highlight: hex(0x44475a),
};

const ROSE_PINE_MOON: Palette = Palette {
    primary: hex(0xe0def4),
    secondary: hex(0x908caa),
    accent: hex(0xebbcba),
    muted: hex(0x6e6a86),
    error: hex(0xeb6f92),
    success: hex(0x9ccfd8),
    warning: hex(0xf6c177),
    border: hex(0x403d52),
    border_active: hex(0xc4a7e7),
    background: hex(0x2a273f),
    highlight: hex(0x393552),
};

const ROSE_PINE_DAWN: Palette = Palette {
    primary: hex(0x575279),
    secondary: hex(0x797593),
    accent: hex(0xd7827e),
    muted: hex(0x9893a5),
    error: hex(0xb4637a),
    success: hex(0x56949f),
    warning: hex(0xea9d34),
    border: hex(0xf2e9e1),
    border_active: hex(0x907aa9),
    background: hex(0xfaf4ed),
    highlight: hex(0xf2e9e1),
};

const SOLARIZED_DARK: Palette = Palette {
    primary: hex(0x839496),
    secondary: hex(0x586e75),
    accent: hex(0xd33682),
    muted: hex(0x586e75),
    error: hex(0xdc322f),
    success: hex(0x859900),
    warning: hex(0xb58900),
    border: hex(0x073642),
    border_active: hex(0x268bd2),
    background: hex(0x002b36),
    highlight: hex(0x073642),
};

const SOLARIZED_LIGHT: Palette = Palette {
    primary: hex(0x657b83),
    secondary: hex(0x93a1a1),
    accent: hex(0xd33682),
    muted: hex(0x93a1a1),
    error: hex(0xdc322f),
    success: hex(0x859900),
    warning: hex(0xb58900),
    border: hex(0xeee8d5),
    border_active: hex(0x268bd2),
    background: hex(0xfdf6e3),
    highlight: hex(0xeee8d5),
};

pub fn palette(theme: ThemeId) -> Palette {
    match theme {
        ThemeId::CatppuccinMocha => CATPPUCCIN_MOCHA,
        ThemeId::CatppuccinLatte => CATPPUCCIN_LATTE,
        ThemeId::Dracula => DRACULA,
        ThemeId::RosePineMoon => ROSE_PINE_MOON,
        ThemeId::RosePineDawn => ROSE_PINE_DAWN,
        ThemeId::SolarizedDark => SOLARIZED_DARK,
        ThemeId::SolarizedLight => SOLARIZED_LIGHT,
    }
}

impl Palette {
    pub fn text(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border(&self, active: bool) -> Style {
        Style::default().fg(if active { self.border_active } else { self.border })
    }

    /// Selected row in a list.
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }
}
