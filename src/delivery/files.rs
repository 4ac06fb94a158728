// ABOUTME: Selects the artifact files of a push delivery.
// ABOUTME: Ant-style include/exclude globs via the glob crate plus an extension filter.

use glob::{MatchOptions, Pattern};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// `*` and `?` stay within one directory; `**` crosses directories.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    /// Path relative to the base directory, `/`-separated.
    pub relative: String,
    pub absolute: PathBuf,
}

/// File selection rules for one push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilter {
    pub includes: Vec<Pattern>,
    pub excludes: Vec<Pattern>,
    /// Allowed extensions without the leading dot; empty allows all.
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(
        includes: &[String],
        excludes: &[String],
        extensions: Vec<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            includes: compile_patterns(includes)?,
            excludes: compile_patterns(excludes)?,
            extensions,
        })
    }

    pub fn matches(&self, relative: &str) -> bool {
        let included = self.includes.is_empty() || any_match(&self.includes, relative);
        if !included || any_match(&self.excludes, relative) {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        let extension = Path::new(relative)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

fn any_match(patterns: &[Pattern], relative: &str) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_with(relative, MATCH_OPTIONS))
}

/// Compile an Ant-style pattern.
///
/// Backslashes count as separators and a trailing `/` selects everything
/// below that directory.
pub fn compile_pattern(pattern: &str) -> Result<Pattern, ConfigError> {
    let mut normalized = pattern.trim().replace('\\', "/");
    if normalized.ends_with('/') {
        normalized.push_str("**");
    }
    Pattern::new(&normalized).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.msg,
    })
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns.iter().map(|p| compile_pattern(p)).collect()
}

/// Whether a `/`-separated relative path matches an Ant-style pattern.
///
/// Invalid patterns match nothing.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    compile_pattern(pattern)
        .map(|p| p.matches_with(path, MATCH_OPTIONS))
        .unwrap_or(false)
}

/// Walk `base` and return matching files, sorted by relative path.
pub fn collect_files(base: &Path, filter: &FileFilter) -> io::Result<Vec<ArtifactFile>> {
    let mut files = Vec::new();
    walk(base, base, filter, &mut files)?;
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

fn walk(
    base: &Path,
    dir: &Path,
    filter: &FileFilter,
    out: &mut Vec<ArtifactFile>,
) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(base, &path, filter, out)?;
        } else if file_type.is_file() {
            let relative = relative_path(base, &path);
            if filter.matches(&relative) {
                out.push(ArtifactFile {
                    relative,
                    absolute: path,
                });
            }
        }
    }
    Ok(())
}

fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn double_star_spans_directories() {
        assert!(glob_match("**/*.jar", "app.jar"));
        assert!(glob_match("**/*.jar", "lib/deep/app.jar"));
        assert!(!glob_match("**/*.jar", "lib/app.war"));
    }

    #[test]
    fn single_star_stays_in_segment() {
        assert!(glob_match("*.jar", "app.jar"));
        assert!(!glob_match("*.jar", "lib/app.jar"));
        assert!(glob_match("lib/*-?.jar", "lib/core-1.jar"));
    }

    #[test]
    fn trailing_slash_matches_subtree() {
        assert!(glob_match("conf/", "conf/a/b.xml"));
        assert!(!glob_match("conf/", "other/b.xml"));
    }

    #[test]
    fn backslash_patterns_use_forward_slashes() {
        assert!(glob_match("lib\\*.jar", "lib/core.jar"));
    }

    #[test]
    fn malformed_pattern_is_a_config_error() {
        let err = FileFilter::new(&["lib/a**".to_string()], &[], Vec::new()).unwrap_err();
        let ConfigError::InvalidPattern { pattern, .. } = err else {
            panic!("expected an invalid pattern error, got {err:?}");
        };
        assert_eq!(pattern, "lib/a**");
        assert!(!glob_match("lib/a**", "lib/a"));
    }

    #[test]
    fn collects_with_includes_excludes_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/test")).unwrap();
        fs::write(dir.path().join("app.jar"), b"a").unwrap();
        fs::write(dir.path().join("readme.txt"), b"r").unwrap();
        fs::write(dir.path().join("lib/core.jar"), b"c").unwrap();
        fs::write(dir.path().join("lib/test/fixture.jar"), b"f").unwrap();

        let filter = FileFilter::new(
            &["**/*".to_string()],
            &["**/test/**".to_string()],
            vec![".JAR".to_string()],
        )
        .unwrap();
        let files = collect_files(dir.path(), &filter).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(names, vec!["app.jar", "lib/core.jar"]);
    }

    #[test]
    fn missing_base_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_files(&dir.path().join("nope"), &FileFilter::default()).is_err());
    }
}
