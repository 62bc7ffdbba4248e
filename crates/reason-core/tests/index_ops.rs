use reason_core::ast::{AstNode, NodeMeta, Point, Span};
use reason_core::index::{NodeFilter, SyntaxIndex};
use std::path::Path;

fn span(start_byte: usize, end_byte: usize) -> Span {
    Span {
        start_byte,
        end_byte,
        start: Point { row: 0, column: start_byte },
        end: Point { row: 0, column: end_byte },
    }
}

fn make_node(kind: &str, name: Option<&str>, parent: Option<usize>) -> AstNode {
    AstNode {
        kind: kind.to_string(),
        name: name.map(String::from),
        span: span(0, 10),
        parent,
        meta: None,
    }
}

#[test]
fn test_insert_assigns_ascending_ids() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "abc".into(), 12);
    let other = index.insert_file(run_id, Path::new("b.py"), "def".into(), 34);

    assert_eq!(run_id, 1);
    assert_eq!(file_id, 1);
    assert_eq!(other, 2);
    assert_eq!(index.file(file_id).unwrap().run_id, run_id);
}

#[test]
fn test_parent_index_translated_to_node_ids() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "abc".into(), 12);

    let ids = index.insert_nodes(
        file_id,
        vec![
            make_node("class_definition", Some("Foo"), None),
            make_node("function_definition", Some("bar"), Some(0)),
            make_node("function_definition", Some("baz"), None),
        ],
    );
    assert_eq!(ids.len(), 3);

    let bar = index.node(ids[1]).unwrap();
    assert_eq!(bar.parent_id, Some(ids[0]));
    let baz = index.node(ids[2]).unwrap();
    assert!(baz.parent_id.is_none());
}

#[test]
fn test_node_ids_unique_across_files() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let f1 = index.insert_file(run_id, Path::new("a.py"), "a".into(), 1);
    let f2 = index.insert_file(run_id, Path::new("b.py"), "b".into(), 1);

    let ids1 = index.insert_nodes(f1, vec![make_node("call_expression", Some("foo"), None)]);
    let ids2 = index.insert_nodes(f2, vec![make_node("call_expression", Some("foo"), None)]);
    assert_ne!(ids1[0], ids2[0]);
}

#[test]
fn test_query_nodes_by_kind_and_name() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "a".into(), 1);
    index.insert_nodes(
        file_id,
        vec![
            make_node("function_definition", Some("greet"), None),
            make_node("call_expression", Some("greet"), None),
            make_node("call_expression", Some("print"), None),
        ],
    );

    let by_kind = index.query_nodes(&NodeFilter {
        kind: Some("call_expression"),
        ..NodeFilter::default()
    });
    assert_eq!(by_kind.len(), 2);

    let by_both = index.query_nodes(&NodeFilter {
        kind: Some("call_expression"),
        name: Some("greet"),
        ..NodeFilter::default()
    });
    assert_eq!(by_both.len(), 1);
    assert_eq!(by_both[0].kind, "call_expression");
}

#[test]
fn test_query_defs_excludes_calls_and_imports() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("javascript", None);
    let file_id = index.insert_file(run_id, Path::new("a.js"), "a".into(), 1);
    index.insert_nodes(
        file_id,
        vec![
            make_node("function_declaration", Some("f"), None),
            make_node("class_declaration", Some("C"), None),
            make_node("import_statement", Some("./mod"), None),
            make_node("call_expression", Some("f"), None),
        ],
    );

    let defs = index.query_defs(&NodeFilter::default());
    assert_eq!(defs.len(), 2);
    assert!(defs.iter().all(|n| n.kind != "call_expression"));

    let named = index.query_defs(&NodeFilter {
        name: Some("C"),
        ..NodeFilter::default()
    });
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].kind, "class_declaration");
}

#[test]
fn test_query_calls_ignores_kind_filter_input() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "a".into(), 1);
    index.insert_nodes(
        file_id,
        vec![
            make_node("function_definition", Some("f"), None),
            make_node("call_expression", Some("f"), None),
        ],
    );

    let calls = index.query_calls(&NodeFilter {
        name: Some("f"),
        ..NodeFilter::default()
    });
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, "call_expression");
}

#[test]
fn test_query_scoped_to_run() {
    let mut index = SyntaxIndex::new();
    let run_a = index.begin_run("python", None);
    let file_a = index.insert_file(run_a, Path::new("a.py"), "a".into(), 1);
    index.insert_nodes(file_a, vec![make_node("call_expression", Some("f"), None)]);

    let run_b = index.begin_run("python", None);
    let file_b = index.insert_file(run_b, Path::new("b.py"), "b".into(), 1);
    index.insert_nodes(file_b, vec![make_node("call_expression", Some("f"), None)]);

    let scoped = index.query_nodes(&NodeFilter {
        run_id: Some(run_b),
        ..NodeFilter::default()
    });
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].file_id, file_b);
}

#[test]
fn test_query_limit() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "a".into(), 1);
    let nodes = (0..10)
        .map(|_| make_node("call_expression", Some("f"), None))
        .collect();
    index.insert_nodes(file_id, nodes);

    let limited = index.query_nodes(&NodeFilter {
        limit: 3,
        ..NodeFilter::default()
    });
    assert_eq!(limited.len(), 3);
}

#[test]
fn test_list_runs_most_recent_first() {
    let mut index = SyntaxIndex::new();
    let first = index.begin_run("python", None);
    let second = index.begin_run("css", None);

    let runs = index.list_runs(10);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, second);
    assert_eq!(runs[1].id, first);
}

#[test]
fn test_list_run_files() {
    let mut index = SyntaxIndex::new();
    let run_a = index.begin_run("python", None);
    let run_b = index.begin_run("python", None);
    index.insert_file(run_a, Path::new("a.py"), "a".into(), 1);
    index.insert_file(run_b, Path::new("b.py"), "b".into(), 1);
    index.insert_file(run_b, Path::new("c.py"), "c".into(), 1);

    let files = index.list_run_files(run_b, 10);
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.run_id == run_b));
}

#[test]
fn test_cst_lookup() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "a".into(), 1);
    index.insert_cst(file_id, "(module)".to_string());

    assert_eq!(index.cst(file_id), Some("(module)"));
    assert!(index.cst(file_id + 1).is_none());
}

#[test]
fn test_stats() {
    let mut index = SyntaxIndex::new();
    let run_a = index.begin_run("python", None);
    index.begin_run("css", None);
    let file_id = index.insert_file(run_a, Path::new("a.py"), "a".into(), 1);
    index.insert_nodes(file_id, vec![make_node("call_expression", Some("f"), None)]);

    let stats = index.stats();
    assert_eq!(stats.runs, 2);
    assert_eq!(stats.files, 1);
    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.languages, vec!["css".to_string(), "python".to_string()]);
}

#[test]
fn test_node_detail_carries_meta() {
    let mut index = SyntaxIndex::new();
    let run_id = index.begin_run("python", None);
    let file_id = index.insert_file(run_id, Path::new("a.py"), "a".into(), 1);
    let mut node = make_node("function_definition", Some("f"), None);
    node.meta = Some(NodeMeta::Params {
        names: vec!["x".to_string(), "y".to_string()],
    });
    let ids = index.insert_nodes(file_id, vec![node]);

    let detail = index.node(ids[0]).unwrap().detail();
    assert_eq!(
        detail.meta,
        Some(NodeMeta::Params {
            names: vec!["x".to_string(), "y".to_string()]
        })
    );
    assert_eq!(detail.start_byte, 0);
    assert_eq!(detail.end_byte, 10);
}
