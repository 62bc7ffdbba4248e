//! Language registry: aliases, file extensions, and grammar lookup.

/// A language with grammar support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Css,
    Scss,
}

/// Extraction family: grammars in one family share a normalization ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// General-purpose grammars with Python-like definition shapes.
    General,
    /// JavaScript, TypeScript, and their JSX dialects.
    Ecma,
    /// CSS and SCSS style sheets.
    Style,
}

/// A language identifier with no grammar mapping.
#[derive(Debug, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub const ALL: &[Language] = &[
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
        Language::Css,
        Language::Scss,
    ];

    /// Resolve a language identifier through the fixed alias table.
    ///
    /// `jsx` is an alias for the JavaScript grammar (which parses JSX
    /// natively); `tsx` needs its own grammar variant.
    pub fn from_name(name: &str) -> Result<Self, UnsupportedLanguage> {
        match name.to_lowercase().as_str() {
            "python" => Ok(Self::Python),
            "js" | "javascript" | "jsx" => Ok(Self::JavaScript),
            "ts" | "typescript" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "css" => Ok(Self::Css),
            "scss" => Ok(Self::Scss),
            _ => Err(UnsupportedLanguage(name.to_string())),
        }
    }

    /// Map a file extension to a language, for scan-mode file discovery.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Self::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "css" => Some(Self::Css),
            "scss" => Some(Self::Scss),
            _ => None,
        }
    }

    /// Canonical language name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Css => "css",
            Self::Scss => "scss",
        }
    }

    /// The extraction family this language's grammar belongs to.
    pub fn family(self) -> Family {
        match self {
            Self::Python => Family::General,
            Self::JavaScript | Self::TypeScript | Self::Tsx => Family::Ecma,
            Self::Css | Self::Scss => Family::Style,
        }
    }

    /// The tree-sitter grammar for this language.
    pub fn ts_language(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            // SCSS is parsed with the CSS grammar; the rule shapes the
            // style extractor consumes are identical.
            Self::Css | Self::Scss => tree_sitter_css::LANGUAGE.into(),
        }
    }
}
