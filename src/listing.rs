//! Listing collaborators that expand glob patterns into candidate asset paths.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use crate::asset_paths::to_forward_slashes;
use crate::finder::FileLister;

/// Glob options shared by the bundled listers: `*` and `?` never cross a `/`, while `**`
/// still spans any number of directories.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

fn compile_glob(pattern: &str) -> Result<Pattern, ListingError> {
  Pattern::new(pattern).map_err(|source| ListingError::Pattern {
    pattern: pattern.to_string(),
    source,
  })
}

/// Errors that can occur while listing candidate files.
#[derive(Debug)]
pub enum ListingError {
  /// The glob could not be compiled into a matcher.
  Pattern {
    /// Glob that failed to compile.
    pattern: String,
    /// Source glob error.
    source: glob::PatternError,
  },
  /// Walking the directory tree failed.
  Walk {
    /// Root directory being listed.
    root: PathBuf,
    /// Source walk error.
    source: walkdir::Error,
  },
}

impl std::fmt::Display for ListingError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Pattern { pattern, source } => {
        write!(f, "invalid listing pattern {pattern:?}: {source}")
      }
      Self::Walk { root, source } => {
        write!(f, "failed to list files under {}: {}", root.display(), source)
      }
    }
  }
}

impl std::error::Error for ListingError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Pattern { source, .. } => Some(source),
      Self::Walk { source, .. } => Some(source),
    }
  }
}

/// Lists files below a root directory on disk.
///
/// Returned paths are relative to the root, use forward slashes and are sorted, so the
/// listing order is stable across platforms. Subdirectories that cannot be read for lack of
/// permission are skipped; any other walk failure, including an unreadable root, is an error.
#[derive(Debug, Clone)]
pub struct DirectoryLister {
  root: PathBuf,
  include_hidden: bool,
  excluded_dirs: BTreeSet<String>,
}

impl DirectoryLister {
  /// Create a lister rooted at `root` that skips hidden entries.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      include_hidden: false,
      excluded_dirs: BTreeSet::new(),
    }
  }

  /// Also list dot-files and descend into dot-directories.
  pub fn include_hidden(mut self, include: bool) -> Self {
    self.include_hidden = include;
    self
  }

  /// Never descend into directories with this name.
  pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
    self.excluded_dirs.insert(name.into());
    self
  }

  /// Directory the listing is relative to.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn keeps_entry(&self, entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
      return true;
    }

    let name = entry.file_name().to_string_lossy();
    if !self.include_hidden && name.starts_with('.') {
      return false;
    }

    !(entry.file_type().is_dir() && self.excluded_dirs.contains(&*name))
  }

  fn relative_path(&self, path: &Path) -> String {
    let relative = path.strip_prefix(&self.root).unwrap_or(path);
    to_forward_slashes(&relative.to_string_lossy())
  }
}

impl FileLister for DirectoryLister {
  type Error = ListingError;

  fn list_files(&self, pattern: &str) -> Result<Vec<String>, ListingError> {
    let glob = compile_glob(pattern)?;
    let mut matches = Vec::new();

    let walker = WalkDir::new(&self.root)
      .min_depth(1)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| self.keeps_entry(entry));

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(err) if is_unreadable_below_root(&err) => {
          trace!(path = ?err.path(), "skipping unreadable entry");
          continue;
        }
        Err(source) => {
          return Err(ListingError::Walk {
            root: self.root.clone(),
            source,
          });
        }
      };
      if !entry.file_type().is_file() {
        continue;
      }

      let relative = self.relative_path(entry.path());
      if glob.matches_with(&relative, MATCH_OPTIONS) {
        matches.push(relative);
      }
    }

    matches.sort();
    trace!(
      root = %self.root.display(),
      pattern,
      matches = matches.len(),
      "listed candidate files"
    );
    Ok(matches)
  }
}

fn is_unreadable_below_root(err: &walkdir::Error) -> bool {
  err.depth() > 0
    && err
      .io_error()
      .is_some_and(|io| io.kind() == ErrorKind::PermissionDenied)
}

/// Lists from a precomputed set of paths, such as a build manifest.
///
/// Paths are filtered with the same glob rules as [`DirectoryLister`] and returned in the
/// order they were supplied.
#[derive(Debug, Clone, Default)]
pub struct StaticLister {
  paths: Vec<String>,
}

impl StaticLister {
  /// Create a lister over the given paths.
  pub fn new<I, S>(paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      paths: paths
        .into_iter()
        .map(|path| to_forward_slashes(&path.into()))
        .collect(),
    }
  }
}

impl FileLister for StaticLister {
  type Error = ListingError;

  fn list_files(&self, pattern: &str) -> Result<Vec<String>, ListingError> {
    let glob = compile_glob(pattern)?;
    Ok(
      self
        .paths
        .iter()
        .filter(|path| glob.matches_with(path, MATCH_OPTIONS))
        .cloned()
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  fn static_matches(pattern: &str, paths: &[&str]) -> Vec<String> {
    StaticLister::new(paths.iter().copied())
      .list_files(pattern)
      .unwrap()
  }

  #[test]
  fn double_star_matches_any_depth_including_root() {
    let matches = static_matches("**/*pic.png", &[
      "pic.png",
      "2123.pic.png",
      "images/2123.pic.png",
      "a/b/c/2123.pic.png",
      "images/pic.png.map",
    ]);
    assert_eq!(matches, vec![
      "pic.png".to_string(),
      "2123.pic.png".to_string(),
      "images/2123.pic.png".to_string(),
      "a/b/c/2123.pic.png".to_string(),
    ]);
  }

  #[test]
  fn single_star_stays_within_a_segment() {
    let matches = static_matches("images/*.png", &["images/pic.png", "images/sub/pic.png"]);
    assert_eq!(matches, vec!["images/pic.png".to_string()]);
  }

  #[test]
  fn escaped_brackets_match_literally() {
    let pattern = format!("**/*{}", Pattern::escape("pic[1].png"));
    let matches = static_matches(&pattern, &["images/7.pic[1].png", "images/7.pic1.png"]);
    assert_eq!(matches, vec!["images/7.pic[1].png".to_string()]);
  }

  #[test]
  fn rejects_malformed_patterns() {
    let err = StaticLister::default().list_files("**/pic[").unwrap_err();
    assert!(matches!(err, ListingError::Pattern { .. }));
    assert!(err.to_string().contains("invalid listing pattern"));
  }

  #[test]
  fn directory_lister_returns_sorted_relative_paths() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("images/misc")).unwrap();
    fs::write(root.join("images/2123.pic.png"), "png").unwrap();
    fs::write(root.join("images/misc/4567.pic.png"), "png").unwrap();
    fs::write(root.join("pic.png"), "png").unwrap();
    fs::write(root.join("other.css"), "css").unwrap();

    let lister = DirectoryLister::new(root);
    assert_eq!(lister.root(), root);
    let files = lister.list_files("**/*pic.png").unwrap();
    assert_eq!(files, vec![
      "images/2123.pic.png".to_string(),
      "images/misc/4567.pic.png".to_string(),
      "pic.png".to_string(),
    ]);
  }

  #[test]
  fn directory_lister_skips_hidden_and_excluded_directories() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::create_dir_all(root.join("images")).unwrap();
    fs::write(root.join(".cache/1.pic.png"), "png").unwrap();
    fs::write(root.join("node_modules/pkg/2.pic.png"), "png").unwrap();
    fs::write(root.join("images/3.pic.png"), "png").unwrap();

    let lister = DirectoryLister::new(root).exclude_dir("node_modules");
    assert_eq!(lister.list_files("**/*pic.png").unwrap(), vec![
      "images/3.pic.png".to_string()
    ]);

    let lister = DirectoryLister::new(root)
      .exclude_dir("node_modules")
      .include_hidden(true);
    assert_eq!(lister.list_files("**/*pic.png").unwrap(), vec![
      ".cache/1.pic.png".to_string(),
      "images/3.pic.png".to_string(),
    ]);
  }

  #[cfg(unix)]
  #[test]
  fn directory_lister_skips_unreadable_subdirectories() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("locked")).unwrap();
    fs::create_dir_all(root.join("images")).unwrap();
    fs::write(root.join("locked/1.pic.png"), "png").unwrap();
    fs::write(root.join("images/2.pic.png"), "png").unwrap();
    fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000)).unwrap();

    let result = DirectoryLister::new(root).list_files("**/*pic.png");
    fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();

    let files = result.unwrap();
    assert!(files.contains(&"images/2.pic.png".to_string()));
  }

  #[test]
  fn directory_lister_reports_missing_root() {
    let dir = tempdir().unwrap();
    let lister = DirectoryLister::new(dir.path().join("missing"));

    let err = lister.list_files("**/*").unwrap_err();
    assert!(matches!(err, ListingError::Walk { .. }));
    assert!(err.to_string().contains("failed to list files under"));
  }

  #[test]
  fn static_lister_filters_and_preserves_order() {
    let lister = StaticLister::new([
      "images/misc/4567.pic.png",
      "styles/site.css",
      "images\\2123.pic.png",
    ]);

    assert_eq!(lister.list_files("**/*pic.png").unwrap(), vec![
      "images/misc/4567.pic.png".to_string(),
      "images/2123.pic.png".to_string(),
    ]);
  }
}
