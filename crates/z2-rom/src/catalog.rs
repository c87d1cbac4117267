//! Which song lives where.
//!
//! The music is split into five table groups, each loaded by its own piece
//! of code and each with an 8-slot song table. Several slots alias the same
//! song or point at an empty sequence. This mapping is fixed by the game.

use core::fmt;
use core::str::FromStr;

/// One of the five independent song tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableGroup {
    TitleScreen = 0,
    Overworld = 1,
    Town = 2,
    Palace = 3,
    GreatPalace = 4,
}

/// Slot map entry: index into [`TableGroup::songs`], or `None` for the
/// empty sequence.
pub type Slot = Option<usize>;

impl TableGroup {
    pub const ALL: [TableGroup; 5] = [
        TableGroup::TitleScreen,
        TableGroup::Overworld,
        TableGroup::Town,
        TableGroup::Palace,
        TableGroup::GreatPalace,
    ];

    /// Songs stored in this group, in the order they are laid out.
    pub fn songs(self) -> &'static [SongTitle] {
        use SongTitle::*;
        match self {
            TableGroup::TitleScreen => &[
                TitleIntro,
                TitleThemeStart,
                TitleThemeBuildup,
                TitleThemeMain,
                TitleThemeBreakdown,
            ],
            TableGroup::Overworld => &[OverworldIntro, OverworldTheme, BattleTheme, CaveItemFanfare],
            TableGroup::Town => &[TownIntro, TownTheme, HouseTheme, TownItemFanfare],
            TableGroup::Palace => &[
                PalaceIntro,
                PalaceTheme,
                BossTheme,
                PalaceItemFanfare,
                CrystalFanfare,
            ],
            TableGroup::GreatPalace => &[
                GreatPalaceIntro,
                GreatPalaceTheme,
                ZeldaTheme,
                CreditsTheme,
                GreatPalaceItemFanfare,
                TriforceFanfare,
                FinalBossTheme,
            ],
        }
    }

    /// What each of the 8 table slots plays.
    pub fn slots(self) -> [Slot; 8] {
        match self {
            TableGroup::TitleScreen => [Some(0), Some(1), Some(2), Some(3), Some(4), None, None, None],
            TableGroup::Overworld | TableGroup::Town => {
                [Some(0), Some(1), Some(2), Some(2), Some(3), None, None, None]
            }
            TableGroup::Palace => [Some(0), Some(1), Some(1), Some(2), Some(3), None, Some(4), None],
            TableGroup::GreatPalace => {
                [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), None]
            }
        }
    }
}

/// Every piece of music in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SongTitle {
    TitleIntro,
    TitleThemeStart,
    TitleThemeBuildup,
    TitleThemeMain,
    TitleThemeBreakdown,
    OverworldIntro,
    OverworldTheme,
    BattleTheme,
    CaveItemFanfare,
    TownIntro,
    TownTheme,
    HouseTheme,
    TownItemFanfare,
    PalaceIntro,
    PalaceTheme,
    BossTheme,
    PalaceItemFanfare,
    CrystalFanfare,
    GreatPalaceIntro,
    GreatPalaceTheme,
    ZeldaTheme,
    CreditsTheme,
    GreatPalaceItemFanfare,
    TriforceFanfare,
    FinalBossTheme,
}

/// (title, group, slot it is decoded from, name)
const CATALOG: [(SongTitle, TableGroup, usize, &str); SongTitle::COUNT] = {
    use SongTitle::*;
    use TableGroup::*;
    [
        (TitleIntro, TitleScreen, 0, "title-intro"),
        (TitleThemeStart, TitleScreen, 1, "title-theme-start"),
        (TitleThemeBuildup, TitleScreen, 2, "title-theme-buildup"),
        (TitleThemeMain, TitleScreen, 3, "title-theme-main"),
        (TitleThemeBreakdown, TitleScreen, 4, "title-theme-breakdown"),
        (OverworldIntro, Overworld, 0, "overworld-intro"),
        (OverworldTheme, Overworld, 1, "overworld-theme"),
        (BattleTheme, Overworld, 2, "battle-theme"),
        (CaveItemFanfare, Overworld, 4, "cave-item-fanfare"),
        (TownIntro, Town, 0, "town-intro"),
        (TownTheme, Town, 1, "town-theme"),
        (HouseTheme, Town, 2, "house-theme"),
        (TownItemFanfare, Town, 4, "town-item-fanfare"),
        (PalaceIntro, Palace, 0, "palace-intro"),
        (PalaceTheme, Palace, 1, "palace-theme"),
        (BossTheme, Palace, 3, "boss-theme"),
        (PalaceItemFanfare, Palace, 4, "palace-item-fanfare"),
        (CrystalFanfare, Palace, 6, "crystal-fanfare"),
        (GreatPalaceIntro, GreatPalace, 0, "great-palace-intro"),
        (GreatPalaceTheme, GreatPalace, 1, "great-palace-theme"),
        (ZeldaTheme, GreatPalace, 2, "zelda-theme"),
        (CreditsTheme, GreatPalace, 3, "credits-theme"),
        (GreatPalaceItemFanfare, GreatPalace, 4, "great-palace-item-fanfare"),
        (TriforceFanfare, GreatPalace, 5, "triforce-fanfare"),
        (FinalBossTheme, GreatPalace, 6, "final-boss-theme"),
    ]
};

impl SongTitle {
    pub const COUNT: usize = 25;

    /// All songs, in catalog order.
    pub fn all() -> impl Iterator<Item = SongTitle> {
        CATALOG.iter().map(|&(title, ..)| title)
    }

    pub fn group(self) -> TableGroup {
        CATALOG[self as usize].1
    }

    /// The table slot the song is read from.
    pub fn slot(self) -> usize {
        CATALOG[self as usize].2
    }

    /// Kebab-case name, e.g. `"town-theme"`.
    pub fn name(self) -> &'static str {
        CATALOG[self as usize].3
    }
}

impl fmt::Display for SongTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SongTitle {
    type Err = UnknownSong;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SongTitle::all()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownSong(s.to_string()))
    }
}

/// A name that is not in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no song named {0:?}")]
pub struct UnknownSong(pub String);
