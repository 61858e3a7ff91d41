//! tsyn_options: parser options and `tsyn.json` project files.
//!
//! `ProjectConfig` is the on-disk shape (every field optional, camelCase);
//! `ParseOptions` is the validated form the parser consumes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tsyn_ast::types::KeywordSet;

/// Nesting depth allowed when no limit is configured.
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 100;

/// Highest nesting limit that may be configured. Parsing, dropping and
/// walking a tree all recurse once per level.
pub const MAX_NESTING_DEPTH: u32 = 1000;

/// Options for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// How deeply types and expressions may nest before the parser gives
    /// up with a nesting-limit error.
    pub max_nesting_depth: u32,
    /// Reserved words recognized by the lexer.
    pub keywords: KeywordSet,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            keywords: KeywordSet::default(),
        }
    }
}

impl ParseOptions {
    /// Set the nesting limit, clamped to `1..=MAX_NESTING_DEPTH`.
    pub fn with_max_nesting_depth(mut self, depth: u32) -> Self {
        self.max_nesting_depth = depth.clamp(1, MAX_NESTING_DEPTH);
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordSet) -> Self {
        self.keywords = keywords;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("'{0}' is not a reserved word")]
    UnknownKeyword(String),
    #[error("maxNestingDepth must be at least 1")]
    ZeroNestingDepth,
    #[error("maxNestingDepth must be at most {max}, got {0}", max = MAX_NESTING_DEPTH)]
    NestingDepthTooLarge(u32),
}

/// The `parseOptions` section of a project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptionsConfig {
    pub max_nesting_depth: Option<u32>,
    /// Replaces the default reserved-word set when present.
    pub keywords: Option<Vec<String>>,
}

impl ParseOptionsConfig {
    /// Validate and fill in defaults.
    pub fn resolve(&self) -> Result<ParseOptions, OptionsError> {
        let mut options = ParseOptions::default();
        if let Some(depth) = self.max_nesting_depth {
            if depth == 0 {
                return Err(OptionsError::ZeroNestingDepth);
            }
            if depth > MAX_NESTING_DEPTH {
                return Err(OptionsError::NestingDepthTooLarge(depth));
            }
            options.max_nesting_depth = depth;
        }
        if let Some(ref names) = self.keywords {
            options.keywords = parse_keyword_set(names)?;
        }
        Ok(options)
    }
}

/// Build a keyword set from reserved-word names.
pub fn parse_keyword_set<S: AsRef<str>>(names: &[S]) -> Result<KeywordSet, OptionsError> {
    names.iter().try_fold(KeywordSet::empty(), |set, name| {
        let name = name.as_ref();
        KeywordSet::from_keyword(name)
            .map(|flag| set | flag)
            .ok_or_else(|| OptionsError::UnknownKeyword(name.to_string()))
    })
}

/// A `tsyn.json` project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub parse_options: Option<ParseOptionsConfig>,
    /// Source files, relative to the project file.
    pub files: Option<Vec<String>>,
}

impl ProjectConfig {
    pub fn resolve_options(&self) -> Result<ParseOptions, OptionsError> {
        match self.parse_options {
            Some(ref config) => config.resolve(),
            None => Ok(ParseOptions::default()),
        }
    }

    /// `files` joined onto `base`.
    pub fn file_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .flatten()
            .map(|file| base.join(file))
            .collect()
    }
}

pub fn parse_config(content: &str) -> Result<ProjectConfig, OptionsError> {
    Ok(serde_json::from_str(content)?)
}

pub fn parse_config_file(path: &Path) -> Result<ProjectConfig, OptionsError> {
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
        assert_eq!(options.keywords, KeywordSet::all());
        assert_eq!(parse_config("{}").unwrap().resolve_options().unwrap(), options);
    }

    #[test]
    fn test_parse_project_file() {
        let config = parse_config(
            r#"{
                "parseOptions": { "maxNestingDepth": 32, "keywords": ["const", "function"] },
                "files": ["src/main.ts", "src/util.ts"]
            }"#,
        )
        .unwrap();
        let options = config.resolve_options().unwrap();
        assert_eq!(options.max_nesting_depth, 32);
        assert_eq!(options.keywords, KeywordSet::CONST | KeywordSet::FUNCTION);
        assert_eq!(
            config.file_paths(Path::new("/proj")),
            vec![PathBuf::from("/proj/src/main.ts"), PathBuf::from("/proj/src/util.ts")]
        );
    }

    #[test]
    fn test_unknown_keyword() {
        let config = parse_config(r#"{ "parseOptions": { "keywords": ["class"] } }"#).unwrap();
        let err = config.resolve_options().unwrap_err();
        assert!(matches!(err, OptionsError::UnknownKeyword(ref k) if k == "class"));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = ParseOptionsConfig {
            max_nesting_depth: Some(0),
            keywords: None,
        };
        assert!(matches!(config.resolve(), Err(OptionsError::ZeroNestingDepth)));
    }

    #[test]
    fn test_depth_above_cap_rejected() {
        let config = parse_config(r#"{ "parseOptions": { "maxNestingDepth": 4000000000 } }"#).unwrap();
        let err = config.resolve_options().unwrap_err();
        assert!(matches!(err, OptionsError::NestingDepthTooLarge(4_000_000_000)));
        assert_eq!(err.to_string(), "maxNestingDepth must be at most 1000, got 4000000000");

        let at_cap = ParseOptionsConfig {
            max_nesting_depth: Some(MAX_NESTING_DEPTH),
            keywords: None,
        };
        assert_eq!(at_cap.resolve().unwrap().max_nesting_depth, MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_builder_clamps_depth() {
        let options = ParseOptions::default().with_max_nesting_depth(u32::MAX);
        assert_eq!(options.max_nesting_depth, MAX_NESTING_DEPTH);
        assert_eq!(ParseOptions::default().with_max_nesting_depth(0).max_nesting_depth, 1);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_config("{ files: "), Err(OptionsError::Json(_))));
    }
}
