//! Integration tests for the help node reserved by the root

use cmdtree::domain::{CommandNode, CommandTree, NodeBuilder, TreeBuilder, TreeError};
use cmdtree::util::testing::RecordingCaller;

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn admin_builder() -> TreeBuilder<&'static str, RecordingCaller> {
    TreeBuilder::new("admin", "server administration")
        .node("config", "inspect configuration", |config| {
            config
                .leaf("set", "sets a value")
                .leaf("show", "shows all values")
                .child(NodeBuilder::new("secret", "hidden values").available_when(|| false))
        })
        .leaf("ban", "bans a player")
}

#[test]
fn given_help_when_dispatching_then_explains_available_root_children() {
    // Arrange
    let tree = admin_builder().build().unwrap();
    let caller = RecordingCaller::new();

    // Act
    let result = tree.dispatch(&caller, &args(&["help"]));

    // Assert
    assert_eq!(result, Ok(true));
    assert_eq!(
        caller.messages(),
        vec!["ban - bans a player", "config - inspect configuration"]
    );
}

#[test]
fn given_help_with_path_when_dispatching_then_explains_target_and_its_children() {
    // Arrange
    let tree = admin_builder().build().unwrap();
    let caller = RecordingCaller::new();

    // Act
    let result = tree.dispatch(&caller, &args(&["help", "config"]));

    // Assert
    assert_eq!(result, Ok(true));
    assert_eq!(
        caller.messages(),
        vec![
            "config - inspect configuration",
            "set - sets a value",
            "show - shows all values",
        ]
    );
}

#[test]
fn given_help_for_leaf_when_dispatching_then_explains_only_the_leaf() {
    let tree = admin_builder().build().unwrap();
    let caller = RecordingCaller::new();

    let result = tree.dispatch(&caller, &args(&["help", "config", "set"]));

    assert_eq!(result, Ok(true));
    assert_eq!(caller.messages(), vec!["set - sets a value"]);
}

#[test]
fn given_help_for_unknown_path_when_dispatching_then_false_and_silent() {
    let tree = admin_builder().build().unwrap();
    let caller = RecordingCaller::new();

    let result = tree.dispatch(&caller, &args(&["help", "kick"]));

    assert_eq!(result, Ok(false));
    assert!(caller.messages().is_empty());
}

#[test]
fn given_help_for_unavailable_node_when_dispatching_then_still_explains_it() {
    let tree = admin_builder().build().unwrap();
    let caller = RecordingCaller::new();

    let result = tree.dispatch(&caller, &args(&["help", "config", "secret"]));

    assert_eq!(result, Ok(true));
    assert_eq!(caller.messages(), vec!["secret - hidden values"]);
}

#[test]
fn given_help_through_unavailable_node_when_dispatching_then_previews_only_available_children() {
    // Arrange
    let tree: CommandTree<&str, RecordingCaller> = TreeBuilder::new("admin", "administration")
        .child(
            NodeBuilder::new("debug", "debug tools")
                .available_when(|| false)
                .leaf("dump", "dumps state")
                .child(NodeBuilder::new("wipe", "wipes state").available_when(|| false)),
        )
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    // Act
    let result = tree.dispatch(&caller, &args(&["help", "debug"]));

    // Assert
    assert_eq!(result, Ok(true));
    assert_eq!(caller.messages(), vec!["debug - debug tools", "dump - dumps state"]);
}

#[test]
fn given_custom_separator_when_dispatching_help_then_lines_use_it() {
    let tree = admin_builder().separator(": ").build().unwrap();
    let caller = RecordingCaller::new();

    tree.dispatch(&caller, &args(&["help"])).unwrap();

    assert_eq!(
        caller.messages(),
        vec!["ban: bans a player", "config: inspect configuration"]
    );
}

#[test]
fn given_displayer_when_dispatching_help_then_it_renders_every_line() {
    // Arrange
    let tree = admin_builder()
        .displayer(|_caller: &RecordingCaller, node: &dyn CommandNode<&'static str, RecordingCaller>| {
            format!("[{}] {}", node.label().to_uppercase(), node.payload())
        })
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    // Act
    tree.dispatch(&caller, &args(&["help"])).unwrap();

    // Assert
    assert_eq!(
        caller.messages(),
        vec!["[BAN] bans a player", "[CONFIG] inspect configuration"]
    );
}

#[test]
fn given_custom_helper_label_when_dispatching_then_only_that_label_is_intercepted() {
    // Arrange
    let tree: CommandTree<&str, RecordingCaller> = admin_builder().helper_label("aide").build().unwrap();
    let caller = RecordingCaller::new();

    // Act
    let aide = tree.dispatch(&caller, &args(&["aide"]));
    let help = tree.dispatch(&caller, &args(&["help"]));

    // Assert
    assert_eq!(tree.helper_label(), Some("aide"));
    assert_eq!(aide, Ok(true));
    assert!(matches!(help, Err(TreeError::NodeNotFound { ref segment, .. }) if segment == "help"));
}

#[test]
fn given_nested_help_child_when_dispatching_then_routes_to_the_child() {
    // Only the root reserves the helper label
    let tree: CommandTree<&str, RecordingCaller> = TreeBuilder::new("admin", "administration")
        .node("config", "configuration", |config| config.leaf("help", "config help page"))
        .build()
        .unwrap();
    let caller = RecordingCaller::new();

    let result = tree.dispatch(&caller, &args(&["config", "help"]));

    assert_eq!(result, Ok(true));
    assert!(caller.messages().is_empty());
}
