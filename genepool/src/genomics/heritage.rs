use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// How a genome came to be.
///
/// Heritage is recorded for diagnostics and display
/// only; no algorithm branches on it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Heritage {
    /// Randomly initialized.
    New,
    /// Copied verbatim from the previous generation's elite.
    UnchangedEliteCarryover,
    /// Produced by crossover.
    Offspring,
    /// An elite copy that has since been mutated.
    MutatedElite,
    /// A crossover child that has since been mutated.
    MutatedOffspring,
}

impl Heritage {
    /// Every heritage tag, in declaration order.
    pub const ALL: [Heritage; 5] = [
        Heritage::New,
        Heritage::UnchangedEliteCarryover,
        Heritage::Offspring,
        Heritage::MutatedElite,
        Heritage::MutatedOffspring,
    ];

    /// Returns the tag a genome of this heritage
    /// carries after being mutated.
    ///
    /// Fresh genomes have no lineage to speak of,
    /// so they stay `New`. Mutated tags are fixed points.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::Heritage;
    ///
    /// assert_eq!(Heritage::UnchangedEliteCarryover.mutated(), Heritage::MutatedElite);
    /// assert_eq!(Heritage::Offspring.mutated(), Heritage::MutatedOffspring);
    /// assert_eq!(Heritage::MutatedOffspring.mutated(), Heritage::MutatedOffspring);
    /// assert_eq!(Heritage::New.mutated(), Heritage::New);
    /// ```
    pub fn mutated(self) -> Heritage {
        match self {
            Heritage::UnchangedEliteCarryover | Heritage::MutatedElite => Heritage::MutatedElite,
            Heritage::Offspring | Heritage::MutatedOffspring => Heritage::MutatedOffspring,
            Heritage::New => Heritage::New,
        }
    }

    /// Whether the genome descends from an elite carryover.
    pub fn is_elite(self) -> bool {
        matches!(self, Heritage::UnchangedEliteCarryover | Heritage::MutatedElite)
    }

    /// Whether the genome descends from crossover.
    pub fn is_offspring(self) -> bool {
        matches!(self, Heritage::Offspring | Heritage::MutatedOffspring)
    }
}

impl fmt::Display for Heritage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heritage::New => "new",
            Heritage::UnchangedEliteCarryover => "elite",
            Heritage::Offspring => "offspring",
            Heritage::MutatedElite => "mutated elite",
            Heritage::MutatedOffspring => "mutated offspring",
        };
        f.write_str(name)
    }
}

/// An RGB colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Maps heritage tags to display colours.
///
/// Owned by whoever configures the run and handed
/// to the renderer; there is no process-wide table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeritagePalette {
    colours: HashMap<Heritage, Colour, RandomState>,
    fallback: Colour,
}

impl HeritagePalette {
    /// Returns a palette where every heritage maps to `fallback`.
    pub fn uniform(fallback: Colour) -> HeritagePalette {
        HeritagePalette {
            colours: HashMap::default(),
            fallback,
        }
    }

    /// Sets the colour for `heritage`, returning the palette.
    ///
    /// # Examples
    /// ```
    /// use genepool::genomics::{Colour, Heritage, HeritagePalette};
    ///
    /// let palette = HeritagePalette::uniform(Colour::rgb(0, 0, 0))
    ///     .with(Heritage::New, Colour::rgb(0, 255, 0));
    ///
    /// assert_eq!(palette.colour_of(Heritage::New), Colour::rgb(0, 255, 0));
    /// assert_eq!(palette.colour_of(Heritage::Offspring), Colour::rgb(0, 0, 0));
    /// ```
    pub fn with(mut self, heritage: Heritage, colour: Colour) -> HeritagePalette {
        self.colours.insert(heritage, colour);
        self
    }

    /// Returns the colour assigned to `heritage`.
    pub fn colour_of(&self, heritage: Heritage) -> Colour {
        self.colours.get(&heritage).copied().unwrap_or(self.fallback)
    }
}

impl Default for HeritagePalette {
    fn default() -> HeritagePalette {
        let mutated = Colour::rgb(0xd6, 0x45, 0x3d);
        HeritagePalette::uniform(Colour::rgb(0x80, 0x80, 0x80))
            .with(Heritage::New, Colour::rgb(0x4c, 0xaf, 0x50))
            .with(Heritage::UnchangedEliteCarryover, Colour::rgb(0xf2, 0xc1, 0x2e))
            .with(Heritage::Offspring, Colour::rgb(0x3f, 0x7f, 0xd9))
            .with(Heritage::MutatedElite, mutated)
            .with(Heritage::MutatedOffspring, mutated)
    }
}
