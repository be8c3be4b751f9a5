use super::*;
use std::collections::HashSet;

#[test]
fn safe_id_replaces_dot_space_and_underscore() {
    assert_eq!(safe_id("my_file name.py"), "my-file-name-py");
    assert_eq!(safe_id("Untitled-1"), "Untitled-1");
}

#[test]
fn safe_id_leaves_other_characters_alone() {
    assert_eq!(safe_id("Ärger+(1)"), "Ärger+(1)");
    assert_eq!(safe_id(""), "");
}

#[test]
fn safe_id_is_not_injective() {
    assert_eq!(safe_id("a.b"), safe_id("a_b"));
    assert_eq!(safe_id("a b"), safe_id("a-b"));
}

#[test]
fn allocator_returns_bare_candidate_when_free() {
    let taken: HashSet<String> = HashSet::new();
    let id = SafeIdAllocator::new().allocate("main.rs", |c| taken.contains(c));
    assert_eq!(id, "main-rs");
}

#[test]
fn allocator_appends_first_free_suffix() {
    let mut taken: HashSet<String> = HashSet::new();
    let alloc = SafeIdAllocator::new();

    let first = alloc.allocate("a.b", |c| taken.contains(c));
    taken.insert(first.clone());
    let second = alloc.allocate("a_b", |c| taken.contains(c));
    taken.insert(second.clone());
    let third = alloc.allocate("a b", |c| taken.contains(c));

    assert_eq!(first, "a-b");
    assert_eq!(second, "a-b-2");
    assert_eq!(third, "a-b-3");
}

#[test]
fn allocator_reuses_freed_id() {
    let mut taken: HashSet<String> = HashSet::new();
    let alloc = SafeIdAllocator::new();

    let first = alloc.allocate("x.txt", |c| taken.contains(c));
    taken.insert(first);
    let second = alloc.allocate("x_txt", |c| taken.contains(c));
    assert_eq!(second, "x-txt-2");

    taken.remove("x-txt");
    assert_eq!(alloc.allocate("x txt", |c| taken.contains(c)), "x-txt");
}
