use serde::{Deserialize, Serialize};

/// The eight matcap textures a material can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatcapPreset {
    Clay,
    RoughMetal,
    ShinyMetal,
    RoughCopper,
    ShinyCopper,
    Taffy,
    Slime,
    Chromatic,
}

impl MatcapPreset {
    pub const ALL: [MatcapPreset; 8] = [
        Self::Clay,
        Self::RoughMetal,
        Self::ShinyMetal,
        Self::RoughCopper,
        Self::ShinyCopper,
        Self::Taffy,
        Self::Slime,
        Self::Chromatic,
    ];

    /// Label shown in the debug panel.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clay => "Clay",
            Self::RoughMetal => "Rough Metal",
            Self::ShinyMetal => "Shiny Metal",
            Self::RoughCopper => "Rough Copper",
            Self::ShinyCopper => "Shiny Copper",
            Self::Taffy => "Taffy",
            Self::Slime => "Slime",
            Self::Chromatic => "Chromatic",
        }
    }

    /// 1-based number of the texture file (`textures/matcaps/<n>.png`).
    pub fn file_number(self) -> usize {
        self.index() + 1
    }

    /// Position in [`MatcapPreset::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for MatcapPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_numbers_are_one_based_and_unique() {
        let numbers: Vec<usize> = MatcapPreset::ALL.iter().map(|p| p.file_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(MatcapPreset::from_name("slime"), Some(MatcapPreset::Slime));
        assert_eq!(
            MatcapPreset::from_name("Rough Copper"),
            Some(MatcapPreset::RoughCopper)
        );
        assert_eq!(MatcapPreset::from_name("plastic"), None);
    }
}
