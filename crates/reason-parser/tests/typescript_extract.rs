use reason_core::ast::{AstNode, NodeMeta};
use reason_parser::extract::extract;
use reason_parser::languages::Language;
use reason_parser::treesitter::parse_source;

fn extract_with(language: Language, source: &str) -> Vec<AstNode> {
    let tree = parse_source(language, source.as_bytes()).unwrap();
    extract(language, &tree, source.as_bytes())
}

#[test]
fn test_typed_function_declaration() {
    let nodes = extract_with(
        Language::TypeScript,
        "function add(a: number, b: number): number { return a + b; }\n",
    );
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, "function_declaration");
    assert_eq!(nodes[0].name.as_deref(), Some("add"));
}

#[test]
fn test_class_with_typed_method() {
    let nodes = extract_with(
        Language::TypeScript,
        "class Repo {\n  find(id: string): void {}\n}\n",
    );
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].name.as_deref(), Some("Repo"));
    assert_eq!(nodes[1].kind, "method_definition");
    assert_eq!(nodes[1].name.as_deref(), Some("find"));
    assert_eq!(nodes[1].parent, Some(0));
}

#[test]
fn test_interface_is_not_extracted() {
    let nodes = extract_with(
        Language::TypeScript,
        "interface Shape { area: number; }\nfunction f(): number { return 1; }\n",
    );
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name.as_deref(), Some("f"));
}

#[test]
fn test_typescript_import() {
    let nodes = extract_with(Language::TypeScript, "import { Repo } from \"./repo\";\n");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name.as_deref(), Some("./repo"));
    assert_eq!(
        nodes[0].meta,
        Some(NodeMeta::ImportSource {
            source: "./repo".to_string()
        })
    );
}

#[test]
fn test_generic_call_resolves_name() {
    let nodes = extract_with(Language::TypeScript, "parse<number>(input);\n");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, "call_expression");
    assert_eq!(nodes[0].name.as_deref(), Some("parse"));
}

#[test]
fn test_tsx_function_component() {
    let source = "export function Page() {\n  return <main>ok</main>;\n}\n";
    let nodes = extract_with(Language::Tsx, source);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, "function_declaration");
    assert_eq!(nodes[0].name.as_deref(), Some("Page"));
}

#[test]
fn test_tsx_member_call() {
    let nodes = extract_with(Language::Tsx, "const x = window.console.log(1);\n");
    let call = nodes.iter().find(|n| n.kind == "call_expression").unwrap();
    assert_eq!(call.name.as_deref(), Some("log"));
}
