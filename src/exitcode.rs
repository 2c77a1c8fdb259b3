//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error, including tokens the tree cannot route
pub const USAGE: i32 = 64;

/// The tree routed the call but the target did not handle it
pub const SOFTWARE: i32 = 70;

/// Configuration or manifest error
pub const CONFIG: i32 = 78;
