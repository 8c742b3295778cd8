use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown class: {0:?}")]
pub struct UnknownKlass(pub String);

/// Competitor class. Results and cup standings are always computed per class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Klass {
    #[serde(rename = "öppen")]
    Oppen,
    #[serde(rename = "dam")]
    Dam,
    #[serde(rename = "veteran")]
    Veteran,
    #[serde(rename = "ungdom")]
    Ungdom,
    #[serde(rename = "junior med stöd")]
    JuniorMedStod,
}

impl Klass {
    /// All classes in presentation order.
    pub const ALL: [Klass; 5] = [
        Klass::Oppen,
        Klass::Dam,
        Klass::Veteran,
        Klass::Ungdom,
        Klass::JuniorMedStod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oppen => "öppen",
            Self::Dam => "dam",
            Self::Veteran => "veteran",
            Self::Ungdom => "ungdom",
            Self::JuniorMedStod => "junior med stöd",
        }
    }

    /// Label with the first letter upper-cased, as used in cup documents.
    pub fn title(&self) -> String {
        let label = self.as_str();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl FromStr for Klass {
    type Err = UnknownKlass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|klass| klass.as_str() == s)
            .ok_or_else(|| UnknownKlass(s.to_string()))
    }
}

impl fmt::Display for Klass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_label() {
        for klass in Klass::ALL {
            assert_eq!(klass.as_str().parse::<Klass>(), Ok(klass));
        }
    }

    #[test]
    fn test_parse_unknown_label() {
        assert_eq!(
            "senior".parse::<Klass>(),
            Err(UnknownKlass("senior".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_swedish_labels() {
        let json = serde_json::to_string(&Klass::JuniorMedStod).unwrap();
        assert_eq!(json, "\"junior med stöd\"");
        let parsed: Klass = serde_json::from_str("\"öppen\"").unwrap();
        assert_eq!(parsed, Klass::Oppen);
    }

    #[test]
    fn test_title_capitalizes_non_ascii() {
        assert_eq!(Klass::Oppen.title(), "Öppen");
        assert_eq!(Klass::JuniorMedStod.title(), "Junior med stöd");
    }
}
