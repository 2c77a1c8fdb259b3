//! Caller identity and per-call metadata

/// Whoever issued a command.
///
/// The tree never inspects the caller; it only hands it to hooks and uses it
/// to emit help lines.
pub trait Caller {
    /// Deliver one line of output to the caller.
    fn send_message(&self, message: &str);
}

impl<T: Caller + ?Sized> Caller for &T {
    fn send_message(&self, message: &str) {
        (**self).send_message(message)
    }
}

/// Metadata of the top-level call, passed unchanged down the whole traversal.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Label of the root command.
    pub command: &'a str,
    /// Name the command was invoked under (equals `command` unless aliased).
    pub alias: &'a str,
    /// The full argument line of the call.
    pub arguments: &'a [String],
}
