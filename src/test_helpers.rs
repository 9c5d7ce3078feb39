//! Shared test utilities for the folio test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//! let project = find_project(&manifest, "shop");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::{self, Manifest};
use crate::types::Project;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Scan the stock fixtures.
pub fn fixture_manifest() -> Manifest {
    let tmp = setup_fixtures();
    scan::scan(tmp.path()).unwrap()
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a project by id. Panics with the available ids if not found.
pub fn find_project<'a>(manifest: &'a Manifest, id: &str) -> &'a Project {
    manifest
        .projects
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = manifest.projects.iter().map(|p| p.id.as_str()).collect();
            panic!("project '{id}' not found, have {ids:?}")
        })
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
