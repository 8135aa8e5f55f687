//! Named colour themes. Only identity lives here; palettes are a TUI concern.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeId {
    #[default]
    CatppuccinMocha,
    CatppuccinLatte,
    Dracula,
    RosePineMoon,
    RosePineDawn,
    SolarizedDark,
    SolarizedLight,
}

impl ThemeId {
    pub const ALL: [ThemeId; 7] = [
        ThemeId::CatppuccinMocha,
        ThemeId::CatppuccinLatte,
        ThemeId::Dracula,
        ThemeId::RosePineMoon,
        ThemeId::RosePineDawn,
        ThemeId::SolarizedDark,
        ThemeId::SolarizedLight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeId::CatppuccinMocha => "Catppuccin Mocha",
            ThemeId::CatppuccinLatte => "Catppuccin Latte",
            ThemeId::Dracula => "Dracula",
            ThemeId::RosePineMoon => "Rosé Pine Moon",
            ThemeId::RosePineDawn => "Rosé Pine Dawn",
            ThemeId::SolarizedDark => "Solarized Dark",
            ThemeId::SolarizedLight => "Solarized Light",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<ThemeId> {
        let wanted = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.name().to_lowercase() == wanted)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips() {
        for theme in ThemeId::ALL {
            assert_eq!(ThemeId::from_name(theme.name()), Some(theme));
        }
        assert_eq!(ThemeId::from_name("dracula"), Some(ThemeId::Dracula));
        assert_eq!(ThemeId::from_name("Nord"), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        assert_eq!(ThemeId::default().index(), 0);
        assert_eq!(ThemeId::SolarizedLight.index(), 6);
    }
}
