use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Script;

// `sc=` selects the Script property rather than Script_Extensions.
static CYRILLIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{sc=Cyrillic}+").unwrap());
static LATIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{sc=Latin}+").unwrap());
static GREEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{sc=Greek}+").unwrap());

/// Keeps only the characters of one Unicode script, in their original order
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptFilter {
    script: Script,
}

impl ScriptFilter {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    pub fn script(&self) -> Script {
        self.script
    }

    fn pattern(&self) -> &'static Regex {
        match self.script {
            Script::Cyrillic => &CYRILLIC,
            Script::Latin => &LATIN,
            Script::Greek => &GREEK,
        }
    }

    pub fn filter(&self, text: &str) -> String {
        self.pattern().find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Number of characters (not bytes) that survive the filter
    pub fn count(&self, text: &str) -> usize {
        self.filter(text).chars().count()
    }
}
