use serde::{Deserialize, Serialize};

/// How broadly a user's permissions apply within an organisation.
///
/// Precedence grows with the numeric value: `Individual` has the highest
/// precedence even though it grants the narrowest access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Organisation,
    Group,
    Individual,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [
        AccessLevel::Organisation,
        AccessLevel::Group,
        AccessLevel::Individual,
    ];

    pub fn precedence(&self) -> u8 {
        match self {
            AccessLevel::Organisation => 10,
            AccessLevel::Group => 20,
            AccessLevel::Individual => 30,
        }
    }

    pub fn highest_precedence_than(&self, other: &AccessLevel) -> bool {
        self.precedence() > other.precedence()
    }

    pub fn lowest_precedence_than(&self, other: &AccessLevel) -> bool {
        self.precedence() < other.precedence()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Organisation => "organisation",
            AccessLevel::Group => "group",
            AccessLevel::Individual => "individual",
        }
    }

    /// Parse an access level name, ignoring case
    pub fn parse(s: &str) -> Option<AccessLevel> {
        match s.to_ascii_lowercase().as_str() {
            "organisation" => Some(AccessLevel::Organisation),
            "group" => Some(AccessLevel::Group),
            "individual" => Some(AccessLevel::Individual),
            _ => None,
        }
    }
}

/// Sensitivity tier of data a user may access.
///
/// Same precedence convention as [`AccessLevel`]: `Public` has the highest
/// precedence value while being the least restrictive tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityClassification {
    Restricted,
    Private,
    Public,
}

impl SecurityClassification {
    pub const ALL: [SecurityClassification; 3] = [
        SecurityClassification::Restricted,
        SecurityClassification::Private,
        SecurityClassification::Public,
    ];

    pub fn precedence(&self) -> u8 {
        match self {
            SecurityClassification::Restricted => 10,
            SecurityClassification::Private => 20,
            SecurityClassification::Public => 30,
        }
    }

    pub fn highest_precedence_than(&self, other: &SecurityClassification) -> bool {
        self.precedence() > other.precedence()
    }

    pub fn lowest_precedence_than(&self, other: &SecurityClassification) -> bool {
        self.precedence() < other.precedence()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityClassification::Restricted => "restricted",
            SecurityClassification::Private => "private",
            SecurityClassification::Public => "public",
        }
    }

    /// Parse a classification name, ignoring case
    pub fn parse(s: &str) -> Option<SecurityClassification> {
        match s.to_ascii_lowercase().as_str() {
            "restricted" => Some(SecurityClassification::Restricted),
            "private" => Some(SecurityClassification::Private),
            "public" => Some(SecurityClassification::Public),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_precedence_follows_numeric_value() {
        for a in AccessLevel::ALL {
            for b in AccessLevel::ALL {
                assert_eq!(
                    a.highest_precedence_than(&b),
                    a.precedence() > b.precedence()
                );
                assert_eq!(a.lowest_precedence_than(&b), a.precedence() < b.precedence());
            }
        }
    }

    #[test]
    fn test_access_level_precedence_is_irreflexive_and_antisymmetric() {
        for a in AccessLevel::ALL {
            assert!(!a.highest_precedence_than(&a));
            for b in AccessLevel::ALL {
                if a.highest_precedence_than(&b) {
                    assert!(!b.highest_precedence_than(&a));
                }
            }
        }
    }

    #[test]
    fn test_individual_has_highest_precedence() {
        assert!(AccessLevel::Individual.highest_precedence_than(&AccessLevel::Group));
        assert!(AccessLevel::Group.highest_precedence_than(&AccessLevel::Organisation));
        assert!(AccessLevel::Organisation.lowest_precedence_than(&AccessLevel::Individual));
    }

    #[test]
    fn test_classification_precedence() {
        use SecurityClassification::{Private, Public, Restricted};

        assert!(Public.highest_precedence_than(&Private));
        assert!(Private.highest_precedence_than(&Restricted));
        assert!(!Public.highest_precedence_than(&Public));
        assert!(Restricted.lowest_precedence_than(&Public));
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(AccessLevel::parse("OrGaNiSaTiOn"), Some(AccessLevel::Organisation));
        assert_eq!(AccessLevel::parse("GROUP"), Some(AccessLevel::Group));
        assert_eq!(AccessLevel::parse("admin"), None);
        assert_eq!(
            SecurityClassification::parse("Restricted"),
            Some(SecurityClassification::Restricted)
        );
        assert_eq!(SecurityClassification::parse("secret"), None);
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for level in AccessLevel::ALL {
            assert_eq!(AccessLevel::parse(level.as_str()), Some(level));
        }
        for classification in SecurityClassification::ALL {
            assert_eq!(
                SecurityClassification::parse(classification.as_str()),
                Some(classification)
            );
        }
    }
}
