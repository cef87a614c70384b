use crate::types::{ChangeRecord, PrefixMatch, Target, TargetMode};

/// Returns `true` when `target` (or, for folders, anything beneath it) has a
/// pending index change in `changes`.
///
/// File targets need an exact, case-sensitive path match. Folder targets
/// match by prefix according to `prefix_match`. No path normalization is
/// performed in either case.
#[must_use]
pub fn is_staged(target: &Target, changes: &[ChangeRecord], prefix_match: PrefixMatch) -> bool {
    match target.mode {
        TargetMode::File => changes.iter().any(|change| change.path == target.path),
        TargetMode::Folder => changes
            .iter()
            .any(|change| folder_contains(&target.path, &change.path, prefix_match)),
    }
}

fn folder_contains(folder: &str, path: &str, prefix_match: PrefixMatch) -> bool {
    match prefix_match {
        PrefixMatch::Literal => path.starts_with(folder),
        PrefixMatch::SegmentBoundary => {
            if folder.is_empty() || folder.ends_with(is_separator) {
                return path.starts_with(folder);
            }
            path.strip_prefix(folder)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(is_separator))
        }
    }
}

const fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(paths: &[&str]) -> Vec<ChangeRecord> {
        paths.iter().copied().map(ChangeRecord::new).collect()
    }

    #[test]
    fn file_matches_exact_path() {
        let c = changes(&["/repo/a.txt"]);
        assert!(is_staged(&Target::file("/repo/a.txt"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn file_does_not_match_other_path() {
        let c = changes(&["/repo/a.txt"]);
        assert!(!is_staged(&Target::file("/repo/b.txt"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn file_match_is_case_sensitive_and_unnormalized() {
        let c = changes(&["/repo/A.txt", "/repo/./b.txt"]);
        assert!(!is_staged(&Target::file("/repo/a.txt"), &c, PrefixMatch::Literal));
        assert!(!is_staged(&Target::file("/repo/b.txt"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn file_never_matches_by_prefix() {
        let c = changes(&["/repo/a.txt.bak"]);
        assert!(!is_staged(&Target::file("/repo/a.txt"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn folder_matches_nested_change() {
        let c = changes(&["/repo/dir/x.txt"]);
        assert!(is_staged(&Target::folder("/repo/dir"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn literal_folder_matches_sibling_sharing_prefix() {
        let c = changes(&["/repo/dirOther/x.txt"]);
        assert!(is_staged(&Target::folder("/repo/dir"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn boundary_folder_rejects_sibling_sharing_prefix() {
        let c = changes(&["/repo/dirOther/x.txt"]);
        assert!(!is_staged(
            &Target::folder("/repo/dir"),
            &c,
            PrefixMatch::SegmentBoundary
        ));
    }

    #[test]
    fn boundary_folder_matches_nested_and_exact() {
        let nested = changes(&["/repo/dir/sub/x.txt"]);
        let exact = changes(&["/repo/dir"]);
        let trailing = changes(&["/repo/dir/x.txt"]);
        let rule = PrefixMatch::SegmentBoundary;

        assert!(is_staged(&Target::folder("/repo/dir"), &nested, rule));
        assert!(is_staged(&Target::folder("/repo/dir"), &exact, rule));
        assert!(is_staged(&Target::folder("/repo/dir/"), &trailing, rule));
        assert!(is_staged(
            &Target::folder("C:\\repo\\dir"),
            &changes(&["C:\\repo\\dir\\x.txt"]),
            rule
        ));
    }

    #[test]
    fn empty_changes_never_match() {
        for rule in [PrefixMatch::Literal, PrefixMatch::SegmentBoundary] {
            for target in [
                Target::file("/repo/a.txt"),
                Target::folder("/repo"),
                Target::folder(""),
                Target::file(""),
            ] {
                assert!(!is_staged(&target, &[], rule), "{target:?} with {rule:?}");
            }
        }
    }

    #[test]
    fn empty_folder_matches_any_change() {
        let c = changes(&["/anything/at/all.rs"]);
        assert!(is_staged(&Target::folder(""), &c, PrefixMatch::Literal));
        assert!(is_staged(&Target::folder(""), &c, PrefixMatch::SegmentBoundary));
    }

    #[test]
    fn any_record_in_sequence_can_match() {
        let c = changes(&["/repo/a.txt", "/repo/b.txt", "/repo/dir/c.txt"]);
        assert!(is_staged(&Target::file("/repo/b.txt"), &c, PrefixMatch::Literal));
        assert!(is_staged(&Target::folder("/repo/dir"), &c, PrefixMatch::Literal));
        assert!(!is_staged(&Target::folder("/repo/other"), &c, PrefixMatch::Literal));
    }

    #[test]
    fn repeated_lookup_is_stable() {
        let c = changes(&["/repo/dir/x.txt"]);
        let target = Target::folder("/repo/dir");
        let first = is_staged(&target, &c, PrefixMatch::Literal);
        let second = is_staged(&target, &c, PrefixMatch::Literal);
        assert_eq!(first, second);
        assert_eq!(c, changes(&["/repo/dir/x.txt"]));
    }
}
