//! Integration tests for per-node executors and completers

use std::sync::{Arc, Mutex};

use cmdtree::domain::{
    Caller, CommandNode, CommandTree, Invocation, Node, NodeBuilder, NodeWrapper, TreeBuilder,
    TreeError,
};
use cmdtree::util::testing::{init_test_setup, RecordingCaller};

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    command: String,
    alias: String,
    full: Vec<String>,
    remaining: Vec<String>,
}

#[test]
fn given_wrapper_without_hooks_when_used_then_behaves_like_the_node() {
    // Arrange
    let mut plain: CommandTree<&str, RecordingCaller> = CommandTree::new(Node::new("admin", "administration"));
    let config = plain.add(plain.root(), Node::new("config", "configuration")).unwrap();
    plain.add(config, Node::new("set", "sets a value")).unwrap();

    let mut wrapped: CommandTree<&str, RecordingCaller> = CommandTree::new(Node::new("admin", "administration"));
    let config = wrapped
        .add(wrapped.root(), NodeWrapper::new(Node::new("config", "configuration")))
        .unwrap();
    wrapped.add(config, Node::new("set", "sets a value")).unwrap();
    let caller = RecordingCaller::new();

    let dispatches: [&[&str]; 3] = [&["config", "set"], &["config", "unset"], &["config"]];
    let completions: [&[&str]; 3] = [&["config", "s"], &["c"], &["config", ""]];

    // Act / Assert
    for tokens in dispatches {
        assert_eq!(
            plain.dispatch(&caller, &args(tokens)),
            wrapped.dispatch(&caller, &args(tokens))
        );
    }
    for tokens in completions {
        assert_eq!(
            plain.complete(&caller, &args(tokens)),
            wrapped.complete(&caller, &args(tokens))
        );
    }
    let node = wrapped.get(config).unwrap();
    assert_eq!(node.label(), "config");
    assert_eq!(*node.payload(), "configuration");
}

#[test]
fn given_executor_when_dispatching_then_receives_invocation_and_remaining_arguments() {
    // Arrange
    let seen: Arc<Mutex<Option<Seen>>> = Arc::new(Mutex::new(None));
    let record = seen.clone();
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .node("config", "configuration", move |config| {
            config.with_executor(
                move |caller: &RecordingCaller, invocation: &Invocation<'_>, arguments: &[String]| {
                    caller.send_message("config handled");
                    *record.lock().unwrap() = Some(Seen {
                        command: invocation.command.to_string(),
                        alias: invocation.alias.to_string(),
                        full: invocation.arguments.to_vec(),
                        remaining: arguments.to_vec(),
                    });
                    Ok(true)
                },
            )
        })
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    // Act
    let result = tree.dispatch_as(&caller, "adm", &args(&["config", "motd", "hello"]));

    // Assert
    assert_eq!(result, Ok(true));
    assert_eq!(caller.messages(), vec!["config handled"]);
    assert_eq!(
        seen.lock().unwrap().clone(),
        Some(Seen {
            command: "admin".to_string(),
            alias: "adm".to_string(),
            full: args(&["config", "motd", "hello"]),
            remaining: args(&["motd", "hello"]),
        })
    );
}

#[test]
fn given_executor_when_dispatching_without_alias_then_alias_is_the_root_label() {
    let alias = Arc::new(Mutex::new(String::new()));
    let record = alias.clone();
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .child(NodeBuilder::<&str, RecordingCaller>::new("ban", "bans").with_executor(move |_caller, invocation, _arguments| {
            *record.lock().unwrap() = invocation.alias.to_string();
            Ok(true)
        }))
        .build()
        .unwrap();

    tree.dispatch(&RecordingCaller::new(), &args(&["ban"])).unwrap();

    assert_eq!(*alias.lock().unwrap(), "admin");
}

#[test]
fn given_executor_returning_false_when_dispatching_then_false() {
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .child(NodeBuilder::<&str, RecordingCaller>::new("ban", "bans").with_executor(|_caller, _invocation, arguments| {
            Ok(!arguments.is_empty())
        }))
        .build()
        .unwrap();

    assert_eq!(tree.dispatch(&RecordingCaller::new(), &args(&["ban"])), Ok(false));
    assert_eq!(tree.dispatch(&RecordingCaller::new(), &args(&["ban", "steve"])), Ok(true));
}

#[test]
fn given_failing_executor_when_dispatching_then_failure_is_swallowed() {
    // Arrange
    init_test_setup();
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .child(
            NodeBuilder::<&str, RecordingCaller>::new("ban", "bans")
                .with_executor(|_caller, _invocation, _arguments| Err("database offline".into())),
        )
        .child(
            NodeBuilder::<&str, RecordingCaller>::new("kick", "kicks")
                .with_executor(|_caller, _invocation, _arguments| panic!("executor exploded")),
        )
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    // Act
    let failed = tree.dispatch(&caller, &args(&["ban", "steve"]));
    let panicked = tree.dispatch(&caller, &args(&["kick", "steve"]));

    // Assert
    assert_eq!(failed, Ok(false));
    assert_eq!(panicked, Ok(false));
}

#[test]
fn given_completer_when_completing_then_it_replaces_child_completion() {
    // Arrange
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .node("ban", "bans", |ban| {
            ban.with_completer(|_caller, _invocation, arguments| {
                let players = ["alex", "steve", "sam"];
                Ok(match arguments {
                    [token] => players
                        .iter()
                        .filter(|p| p.starts_with(token.as_str()))
                        .map(|p| p.to_string())
                        .collect(),
                    _ => Vec::new(),
                })
            })
            .leaf("all", "bans everyone")
        })
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    // Act
    let completions = tree.complete(&caller, &args(&["ban", "s"]));

    // Assert
    assert_eq!(completions, vec!["steve", "sam"]);
}

#[test]
fn given_failing_completer_when_completing_then_empty() {
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .child(
            NodeBuilder::<&str, RecordingCaller>::new("ban", "bans")
                .with_completer(|_caller, _invocation, _arguments| Err("no players".into())),
        )
        .child(
            NodeBuilder::<&str, RecordingCaller>::new("kick", "kicks")
                .with_completer(|_caller, _invocation, _arguments| panic!("completer exploded")),
        )
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    assert!(tree.complete(&caller, &args(&["ban", ""])).is_empty());
    assert!(tree.complete(&caller, &args(&["kick", ""])).is_empty());
}

#[test]
fn given_unavailable_wrapper_when_dispatching_then_executor_is_never_called() {
    let called = Arc::new(Mutex::new(false));
    let record = called.clone();
    let tree = TreeBuilder::<&str, RecordingCaller>::new("admin", "administration")
        .child(
            NodeBuilder::<&str, RecordingCaller>::new("ban", "bans")
                .available_when(|| false)
                .with_executor(move |_caller, _invocation, _arguments| {
                    *record.lock().unwrap() = true;
                    Ok(true)
                }),
        )
        .build()
        .unwrap();

    let result = tree.dispatch(&RecordingCaller::new(), &args(&["ban"]));

    assert!(matches!(result, Err(TreeError::NotAvailableArgument { .. })));
    assert!(!*called.lock().unwrap());
}

#[test]
fn given_wrapper_when_inspected_then_reports_its_hooks() {
    let wrapper: NodeWrapper<&str, RecordingCaller> = NodeWrapper::new(Node::new("ban", "bans"))
        .with_executor(|_caller, _invocation, _arguments| Ok(true));

    assert!(wrapper.has_executor());
    assert!(!wrapper.has_completer());
    assert_eq!(wrapper.source().label(), "ban");
}
