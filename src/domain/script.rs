use serde::{Deserialize, Serialize};

/// Unicode scripts whose characters can be counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    #[default]
    Cyrillic,
    Latin,
    Greek,
}

impl Script {
    pub fn as_str(&self) -> &'static str {
        match self {
            Script::Cyrillic => "cyrillic",
            Script::Latin => "latin",
            Script::Greek => "greek",
        }
    }
}

impl std::str::FromStr for Script {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cyrillic" => Ok(Script::Cyrillic),
            "latin" => Ok(Script::Latin),
            "greek" => Ok(Script::Greek),
            _ => Err(format!("Unknown script: {}", s)),
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
