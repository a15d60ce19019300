/// Ordered progression tag. Later eras unlock additional card packs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Era {
    #[default]
    Stone,
    Bronze,
    Iron,
    Industrial,
    Electric,
    Digital,
    Space,
}

impl Era {
    pub const ALL: [Era; 7] = [
        Era::Stone,
        Era::Bronze,
        Era::Iron,
        Era::Industrial,
        Era::Electric,
        Era::Digital,
        Era::Space,
    ];

    /// Every era up to and including `self`, oldest first.
    pub fn up_to(self) -> Vec<Era> {
        Self::ALL.into_iter().filter(|era| *era <= self).collect()
    }

    pub fn next(self) -> Option<Era> {
        Self::ALL.into_iter().find(|era| *era > self)
    }
}

/// Display-only rarity tier.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_to_includes_current_era() {
        assert_eq!(Era::Stone.up_to(), vec![Era::Stone]);
        assert_eq!(Era::Iron.up_to(), vec![Era::Stone, Era::Bronze, Era::Iron]);
    }

    #[test]
    fn next_stops_at_space() {
        assert_eq!(Era::Stone.next(), Some(Era::Bronze));
        assert_eq!(Era::Space.next(), None);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Bronze".parse::<Era>(), Ok(Era::Bronze));
        assert_eq!("legendary".parse::<Rarity>(), Ok(Rarity::Legendary));
        assert!("plastic".parse::<Era>().is_err());
        assert_eq!(Era::Industrial.to_string(), "industrial");
    }
}
