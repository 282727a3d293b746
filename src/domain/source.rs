use serde::{Deserialize, Serialize};

/// Content platforms an article link can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Medium,
    WordPress,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Medium => "medium",
            SourceType::WordPress => "wordpress",
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "medium" => Ok(SourceType::Medium),
            "wordpress" | "wp" => Ok(SourceType::WordPress),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
