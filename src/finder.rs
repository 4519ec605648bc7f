//! Resolve an asset reference to the revved file sitting next to the original on disk.
//!
//! Fingerprinting renames `images/pic.png` to `images/2123.pic.png`. Documents that still
//! point at `../../images/pic.png` can ask the finder for the revved name while keeping their
//! own relative-path structure.

use glob::Pattern;
use regex::Regex;
use tracing::{debug, trace};

use crate::asset_paths::{
  basename, dirname, is_passthrough_reference, normalize_dir, split_root, to_forward_slashes,
};

/// Capability that expands a glob pattern into matching file paths.
///
/// `**` stands for any number of intervening directories and `*` for any characters within a
/// single segment. Where the files are looked up is entirely up to the implementation.
pub trait FileLister {
  /// Failure reported by the listing, handed back to the caller untouched.
  type Error;

  /// Return every path matching `pattern`, in the order candidates should be considered.
  fn list_files(&self, pattern: &str) -> Result<Vec<String>, Self::Error>;
}

impl<F, E> FileLister for F
where
  F: Fn(&str) -> Result<Vec<String>, E>,
{
  type Error = E;

  fn list_files(&self, pattern: &str) -> Result<Vec<String>, E> {
    self(pattern)
  }
}

/// Finds the revved version of a referenced file relative to the referencing document.
///
/// Given this tree:
///
/// ```text
/// build/css/style.css      references '../../images/pic.png'
/// images/2123.pic.png
/// ```
///
/// `find("../../images/pic.png", "build/css")` yields `../../images/2123.pic.png`.
#[derive(Debug, Clone)]
pub struct RevvedFinder<L> {
  lister: L,
}

impl<L: FileLister> RevvedFinder<L> {
  /// Create a finder that discovers candidates through `lister`.
  pub fn new(lister: L) -> Self {
    Self { lister }
  }

  /// The listing collaborator used for candidate discovery.
  pub fn lister(&self) -> &L {
    &self.lister
  }

  /// Resolve `reference`, made from a document in `base_dir`, to its revved counterpart.
  ///
  /// The reference comes back unchanged when it is external, names the site root, or has no
  /// revved file in the expected directory. An empty string means the match has no file name
  /// of its own and the reference should be dropped. Listing failures are returned as is.
  pub fn find(&self, reference: &str, base_dir: &str) -> Result<String, L::Error> {
    if is_passthrough_reference(reference) {
      debug!(reference, "leaving external or root reference untouched");
      return Ok(reference.to_string());
    }

    let (start_at_root, file) = split_root(reference);
    let file_name = basename(file);
    let relative_dir = dirname(file);
    let expected_dir = normalize_dir(&format!("{base_dir}/{relative_dir}"));

    let pattern = format!("**/*{}", Pattern::escape(file_name));
    let candidates = self.lister.list_files(&pattern)?;
    trace!(
      reference,
      expected_dir = %expected_dir,
      candidates = candidates.len(),
      "filtering revved candidates"
    );

    let revved_name = revved_name_pattern(file_name);
    let Some(matched) = candidates
      .iter()
      .map(|candidate| to_forward_slashes(candidate))
      .find(|candidate| {
        revved_name.is_match(candidate) && normalize_dir(dirname(candidate)) == expected_dir
      })
    else {
      debug!(reference, base_dir, "no revved file found");
      return Ok(reference.to_string());
    };

    let revved_file_name = basename(&matched);
    let resolved = if relative_dir == "." {
      revved_file_name.to_string()
    } else {
      format!("{relative_dir}/{revved_file_name}")
    };

    // Nothing left to point at: the asset was folded into another file.
    if resolved.is_empty() {
      debug!(reference, candidate = %matched, "revved match has no file name");
      return Ok(String::new());
    }

    let resolved = if start_at_root {
      format!("/{resolved}")
    } else {
      resolved
    };
    debug!(reference, resolved = %resolved, "resolved revved reference");
    Ok(resolved)
  }

  /// Resolve several references made from the same document, in order.
  ///
  /// Stops at the first listing failure.
  pub fn find_all<I, S>(&self, references: I, base_dir: &str) -> Result<Vec<String>, L::Error>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    references
      .into_iter()
      .map(|reference| self.find(reference.as_ref(), base_dir))
      .collect()
  }
}

/// `<digits>.<file name>` at the end of a path, with the file name matched literally.
fn revved_name_pattern(file_name: &str) -> Regex {
  Regex::new(&format!(r"[0-9]+\.{}$", regex::escape(file_name)))
    .expect("invalid revved name regex")
}
