#![allow(dead_code)]

pub use flagpipe_test_utils::builders;
pub use flagpipe_test_utils::fake_client;
pub use flagpipe_test_utils::{init_tracing, with_timeout};

use flagpipe::dag::SimpleScheduler;
use flagpipe::engine::{FlagPaths, LaunchOptions, Launcher};
use flagpipe::fs::mock::MockFileSystem;
use flagpipe::types::ClientKind;

use self::builders::{output_dir, DEFAULT_OUTPUT_ROOT};
use self::fake_client::FakeClient;

/// Launcher over the mock filesystem and a fake client, validating the
/// shell client's required keys.
pub fn mock_launcher(client: &FakeClient, fs: &MockFileSystem, options: LaunchOptions) -> Launcher {
    Launcher::new(
        Box::new(SimpleScheduler),
        Box::new(client.clone()),
        Box::new(fs.clone()),
        options,
    )
    .with_required_keys(ClientKind::Shell.required_keys())
}

/// Marker paths of a node built with the default output root.
pub fn flags_of(name: &str) -> FlagPaths {
    FlagPaths::for_output(&output_dir(DEFAULT_OUTPUT_ROOT, name))
}
