//! Closed vocabularies shared by the graph, the classifier and the API.
//!
//! Every enum serializes to the exact label stored in the graph, and parses
//! back from it through `FromStr`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a label is not part of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel {
    pub vocabulary: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.vocabulary, self.value)
    }
}

impl std::error::Error for UnknownLabel {}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $vocabulary:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The graph label for this member.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok($name::$variant), )+
                    other => Err(UnknownLabel {
                        vocabulary: $vocabulary,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

labelled_enum! {
    /// Governing tour. `Men` and `Women` are the ITF circuits.
    Tour, "tour" {
        Atp => "ATP",
        Wta => "WTA",
        Men => "Men",
        Women => "Women",
    }
}

impl Tour {
    /// True for the two ITF circuits.
    pub fn is_itf(&self) -> bool {
        matches!(self, Tour::Men | Tour::Women)
    }
}

labelled_enum! {
    /// Tournament level.
    Level, "level" {
        Tour => "Tour",
        Challenger => "Challenger",
        Itf => "ITF",
    }
}

labelled_enum! {
    Draw, "draw type" {
        Main => "Main",
        Qualifying => "Qualifying",
    }
}

labelled_enum! {
    MatchType, "match type" {
        Singles => "Singles",
        Doubles => "Doubles",
    }
}

labelled_enum! {
    Surface, "surface" {
        Clay => "Clay",
        Grass => "Grass",
        Hard => "Hard",
        Carpet => "Carpet",
    }
}

labelled_enum! {
    Environment, "environment" {
        Indoor => "Indoor",
        Outdoor => "Outdoor",
    }
}

labelled_enum! {
    /// Opponent's playing hand.
    Handedness, "handedness" {
        Right => "Right",
        Left => "Left",
    }
}

labelled_enum! {
    /// Event importance used by the "Match record" rows of the index.
    CategoryClass, "category" {
        GrandSlam => "Grand Slam",
        Masters => "Masters",
        Overall => "Overall",
    }
}

labelled_enum! {
    /// Draw round, from the title itself down to the first qualifying round.
    Round, "round" {
        Win => "Win",
        Final => "Final",
        Semifinals => "Semifinals",
        Quarterfinals => "Quarterfinals",
        RoundOf16 => "Round of 16",
        RoundOf32 => "Round of 32",
        RoundOf64 => "Round of 64",
        RoundOf128 => "Round of 128",
        Qualifier => "Qualifier",
        QualifyingRound3 => "Qualifying round 3",
        QualifyingRound2 => "Qualifying round 2",
        QualifyingRound1 => "Qualifying round 1",
        RoundRobin => "Round robin",
        Participation => "Participation",
        Alternate => "Alternate",
        Day1 => "Day 1",
        Day2 => "Day 2",
        Day3 => "Day 3",
    }
}
