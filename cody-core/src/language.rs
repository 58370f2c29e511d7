//! Language profile registry.
//!
//! Maps each supported interview language to its starter template and the
//! display name sent to the assistant. The set is closed: four languages, no
//! runtime registration.

use std::fmt;
use std::str::FromStr;

/// Languages a candidate can code in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Go,
    Cpp,
}

impl Language {
    /// Every language in selector order.
    pub const ALL: [Language; 4] =
        [Language::JavaScript, Language::Python, Language::Go, Language::Cpp];

    /// Lowercase selector key, also used as the fenced-code tag.
    pub fn key(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Cpp => "cpp",
        }
    }

    /// Canonical human-readable name (`"C++"` for `cpp`).
    pub fn display_name(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Go => "Go",
            Language::Cpp => "C++",
        }
    }

    /// Starter code placed in the editor after a language change or reset.
    pub fn template(self) -> &'static str {
        match self {
            Language::JavaScript => "// Write your solution here",
            Language::Python => "# Write your solution here\ndef solution():\n    pass\n    return",
            Language::Go => "// Write your solution here\nfunc solution() {\n    // TODO\n}",
            Language::Cpp => concat!(
                "// Write your solution here\n",
                "#include <iostream>\n",
                "using namespace std;\n",
                "\n",
                "int main() {\n",
                "    // TODO\n",
                "    return 0;\n",
                "}"
            ),
        }
    }

    /// File extension used to look up a syntax definition for highlighting.
    pub fn extension(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Python => "py",
            Language::Go => "go",
            Language::Cpp => "cpp",
        }
    }

    /// Returns the language after `self` in selector order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Language::JavaScript => Language::Python,
            Language::Python => Language::Go,
            Language::Go => Language::Cpp,
            Language::Cpp => Language::JavaScript,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for a selector key outside the four supported languages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language key '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.key() == key)
            .ok_or(UnknownLanguage(s.to_owned()))
    }
}

/// Template for `language`.
pub fn template_for(language: Language) -> &'static str {
    language.template()
}

/// Display name for `language`.
pub fn display_name_for(language: Language) -> &'static str {
    language.display_name()
}

/// Display name for a raw selector key.
///
/// Unknown keys come back unchanged, so a stray value from config or the wire
/// is shown as-is instead of failing.
pub fn display_name_for_key(key: &str) -> String {
    key.parse::<Language>()
        .map(|lang| lang.display_name().to_owned())
        .unwrap_or_else(|_| key.to_owned())
}
