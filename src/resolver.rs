//! Referenced-Playbook Resolver
//!
//! A subprocess step references another playbook by catalog path,
//! possibly relative (`./x`, `../y`) to the current document's own
//! path. This module computes the normalized candidate paths and asks
//! an external existence checker; it performs no I/O itself.

use rustc_hash::FxHashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Collaborator that knows which catalog paths exist
pub trait ExistenceChecker {
    fn exists(&self, path: &str) -> bool;
}

/// Candidate catalog paths for a reference, most specific first.
///
/// `.yml`/`.yaml` suffixes are stripped; `./` and `../` resolve
/// against the directory of `current_path`.
pub fn reference_candidates(reference: &str, current_path: &str) -> Vec<String> {
    let stripped = strip_extension(reference.trim());
    if stripped.is_empty() {
        return Vec::new();
    }

    let base_dir = match current_path.rfind('/') {
        Some(idx) => &current_path[..idx],
        None => "",
    };

    let mut candidates = Vec::new();
    if stripped.starts_with("./") || stripped.starts_with("../") {
        candidates.push(join_normalized(base_dir, stripped));
    } else {
        candidates.push(stripped.to_string());
        let sibling = join_normalized(base_dir, stripped);
        if !candidates.contains(&sibling) {
            candidates.push(sibling);
        }
    }
    candidates.retain(|c| !c.is_empty());
    candidates
}

/// First candidate the checker confirms
pub fn resolve_reference<C: ExistenceChecker + ?Sized>(
    reference: &str,
    current_path: &str,
    checker: &C,
) -> Option<String> {
    reference_candidates(reference, current_path)
        .into_iter()
        .find(|candidate| checker.exists(candidate))
}

fn strip_extension(reference: &str) -> &str {
    reference
        .strip_suffix(".yaml")
        .or_else(|| reference.strip_suffix(".yml"))
        .unwrap_or(reference)
}

/// Join and resolve `.`/`..` segments without touching the filesystem.
/// `..` above the catalog root saturates at the root.
fn join_normalized(base_dir: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Filesystem-backed catalog: every `.yaml`/`.yml` under the root is a
/// playbook, addressed by its extension-less relative path. Used by
/// the CLI; the engine itself only sees the trait.
#[derive(Debug)]
pub struct FsCatalog {
    paths: FxHashSet<String>,
}

impl FsCatalog {
    pub fn scan(root: &Path) -> Self {
        let mut paths = FxHashSet::default();
        for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_playbook = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_playbook {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(root) {
                let logical = relative.with_extension("");
                paths.insert(logical.to_string_lossy().replace('\\', "/"));
            }
        }
        FsCatalog { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl ExistenceChecker for FsCatalog {
    fn exists(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SetChecker(FxHashSet<String>);

    impl ExistenceChecker for SetChecker {
        fn exists(&self, path: &str) -> bool {
            self.0.contains(path)
        }
    }

    fn checker(paths: &[&str]) -> SetChecker {
        SetChecker(paths.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn extensions_are_stripped() {
        assert_eq!(
            reference_candidates("shared/geo.yaml", "examples/weather")[0],
            "shared/geo"
        );
    }

    #[test]
    fn dot_relative_resolves_against_document_dir() {
        let candidates = reference_candidates("./geocode", "examples/weather");
        assert_eq!(candidates, vec!["examples/geocode"]);
    }

    #[test]
    fn dotdot_walks_up() {
        let candidates = reference_candidates("../shared/geo.yml", "examples/nested/weather");
        assert_eq!(candidates, vec!["examples/shared/geo"]);
    }

    #[test]
    fn dotdot_saturates_at_catalog_root() {
        let candidates = reference_candidates("../../../geo", "examples/weather");
        assert_eq!(candidates, vec!["geo"]);
    }

    #[test]
    fn bare_reference_tries_catalog_then_sibling() {
        let candidates = reference_candidates("geocode", "examples/weather");
        assert_eq!(candidates, vec!["geocode", "examples/geocode"]);
    }

    #[test]
    fn resolve_picks_first_existing() {
        let c = checker(&["examples/geocode"]);
        assert_eq!(
            resolve_reference("geocode", "examples/weather", &c),
            Some("examples/geocode".to_string())
        );
        assert_eq!(resolve_reference("missing", "examples/weather", &c), None);
    }
}
