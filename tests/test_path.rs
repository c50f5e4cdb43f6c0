use std::path::{Component, Path, PathBuf};

use cubby::files::path::{MAX_FNAME_LEN, ResolveError, resolve};
use proptest::prelude::*;

const ROOT: &str = "/srv/cubby";

fn resolved(user: &str, target: &str) -> PathBuf {
    resolve(Path::new(ROOT), user, target)
        .unwrap()
        .as_path()
        .to_path_buf()
}

fn assert_contained(user: &str, target: &str) {
    let prefix = format!("{}/webdir/{}/", ROOT, user);
    let path = resolve(Path::new(ROOT), user, target).unwrap();
    let text = path.as_path().to_str().unwrap();

    assert!(text.starts_with(&prefix), "{target:?} escaped to {text:?}");
    assert!(!text.contains("../"), "{target:?} kept traversal in {text:?}");
    assert!(
        !path.as_path().components().any(|c| c == Component::ParentDir),
        "{target:?} kept a '..' segment in {text:?}"
    );
}

#[test]
fn test_plain_target() {
    assert_eq!(
        resolved("bob", "/docs/plan.txt"),
        PathBuf::from("/srv/cubby/webdir/bob/docs/plan.txt")
    );
}

#[test]
fn test_redundant_username_prefix_is_dropped() {
    assert_eq!(
        resolved("bob", "/bob/plan.txt"),
        PathBuf::from("/srv/cubby/webdir/bob/plan.txt")
    );
    // only a whole leading segment counts
    assert_eq!(
        resolved("bob", "/bobby.txt"),
        PathBuf::from("/srv/cubby/webdir/bob/bobby.txt")
    );
}

#[test]
fn test_known_traversal_attempts() {
    assert_eq!(
        resolved("bob", "/../../etc/passwd"),
        PathBuf::from("/srv/cubby/webdir/bob/etc/passwd")
    );
    assert_eq!(
        resolved("bob", "/..././x"),
        PathBuf::from("/srv/cubby/webdir/bob/x")
    );
    assert_eq!(
        resolved("bob", "/....//secret"),
        PathBuf::from("/srv/cubby/webdir/bob/secret")
    );
    assert_eq!(
        resolved("bob", "/a/../../alice/diary"),
        PathBuf::from("/srv/cubby/webdir/bob/a/alice/diary")
    );

    for target in ["/..", "/a/..", "/../..", "/.../..", "/x/..../..", "/bob/.."] {
        assert_contained("bob", target);
    }
}

#[test]
fn test_long_target_is_truncated() {
    let long = format!("/{}", "a".repeat(MAX_FNAME_LEN + 50));
    let path = resolved("bob", &long);
    let name = path.file_name().unwrap().to_str().unwrap();

    assert_eq!(name.len(), MAX_FNAME_LEN);
}

#[test]
fn test_intermediate_dirs() {
    let path = resolve(Path::new(ROOT), "bob", "/a/b/c.txt").unwrap();

    assert_eq!(path.user_dir(), Path::new("/srv/cubby/webdir/bob"));
    assert_eq!(
        path.intermediate_dirs(),
        vec![
            PathBuf::from("/srv/cubby/webdir/bob/a"),
            PathBuf::from("/srv/cubby/webdir/bob/a/b"),
        ]
    );
    assert!(
        resolve(Path::new(ROOT), "bob", "/c.txt")
            .unwrap()
            .intermediate_dirs()
            .is_empty()
    );
}

#[test]
fn test_unsafe_usernames_are_refused() {
    for user in ["", ".", "..", "a..", "../x", "a/b", "a:b"] {
        assert_eq!(
            resolve(Path::new(ROOT), user, "/f"),
            Err(ResolveError::UnsafeUsername(user.to_string()))
        );
    }
}

#[test]
fn test_unsafe_root_is_refused() {
    assert!(matches!(
        resolve(Path::new("/srv/../etc"), "bob", "/f"),
        Err(ResolveError::UnsafeRoot(_))
    ));
}

// Every target up to six characters over the alphabet that matters for
// traversal, with and without the redundant username segment.
#[test]
fn test_exhaustive_short_targets_stay_contained() {
    const ALPHABET: [char; 3] = ['.', '/', 'b'];

    let mut targets = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..6 {
        let mut next = Vec::new();
        for prefix in &frontier {
            for c in ALPHABET {
                let mut s = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        targets.extend(next.iter().cloned());
        frontier = next;
    }

    for t in &targets {
        assert_contained("bob", &format!("/{}", t));
        assert_contained("bob", &format!("/bob/{}", t));
        assert_contained("b.", &format!("/{}", t));
    }
}

proptest! {
    #[test]
    fn prop_resolved_paths_stay_under_user_dir(
        target in "[./a-z]{0,40}",
        user in "[a-z][a-z0-9_.-]{0,8}",
    ) {
        prop_assume!(!user.contains(".."));
        let prefix = format!("{}/webdir/{}/", ROOT, user);
        let path = resolve(Path::new(ROOT), &user, &format!("/{}", target)).unwrap();
        let text = path.as_path().to_str().unwrap().to_string();

        prop_assert!(text.starts_with(&prefix));
        prop_assert!(!text.contains("../"));
        prop_assert!(!path.as_path().components().any(|c| c == Component::ParentDir));
    }
}
