use super::*;
use crate::test_support::sample_server;

fn registry_with(ids: &[&str]) -> ServerRegistry {
    let mut registry = ServerRegistry::new();
    registry.replace_all(ids.iter().map(|id| sample_server(id, id)).collect());
    registry
}

#[test]
fn starts_empty_without_selection() {
    let registry = ServerRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.current().is_none());
    assert!(registry.selected_id().is_none());
}

#[test]
fn keeps_discovery_order() {
    let registry = registry_with(&["c", "a", "b"]);
    let ids: Vec<&str> = registry.servers().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(registry.len(), 3);
}

#[test]
fn select_returns_server_and_sets_current() {
    let mut registry = registry_with(&["a", "b"]);

    let selected = registry.select(&ServerId::from("b")).expect("select b");
    assert_eq!(selected.id, ServerId::from("b"));
    assert_eq!(
        registry.current().map(|s| s.id.clone()),
        Some(ServerId::from("b"))
    );
}

#[test]
fn select_unknown_id_fails_and_keeps_previous_selection() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select(&ServerId::from("a")).expect("select a");

    let err = registry
        .select(&ServerId::from("zzz"))
        .expect_err("unknown id");
    assert_eq!(err.id, ServerId::from("zzz"));
    assert_eq!(registry.selected_id(), Some(&ServerId::from("a")));
}

#[test]
fn replace_all_keeps_selection_that_still_resolves() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select(&ServerId::from("b")).expect("select b");

    registry.replace_all(vec![sample_server("b", "renamed"), sample_server("c", "c")]);

    let current = registry.current().expect("still selected");
    assert_eq!(current.name, "renamed");
}

#[test]
fn replace_all_clears_dangling_selection() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select(&ServerId::from("a")).expect("select a");

    registry.replace_all(vec![sample_server("b", "b")]);
    assert!(registry.selected_id().is_none());
    assert!(registry.current().is_none());

    registry.replace_all(Vec::new());
    assert!(registry.is_empty());
    assert!(registry.selected_id().is_none());
}

#[test]
fn tolerates_used_above_total() {
    let mut server = sample_server("a", "a");
    server.metrics.memory.used = server.metrics.memory.total * 2.0;

    let mut registry = ServerRegistry::new();
    registry.replace_all(vec![server]);
    assert_eq!(registry.len(), 1);
}
