//! # testsettings demo application
//!
//! A small CLI that resolves the test settings cascade in the current
//! directory and prints the outcome. It exists to demonstrate and manually
//! verify testsettings' behaviour.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example testsettings_demo -- list
//! cargo run --example testsettings_demo -- --build-server-mode true sources
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                    | How to exercise it                                                          |
//! |----------------------------|-----------------------------------------------------------------------------|
//! | Base file                  | Create `testsettings.json` in cwd, then run `list`                          |
//! | Development override       | Add `testsettings.Development.json`, run `list`                             |
//! | Build-server mode (flag)   | `cargo run --example testsettings_demo -- --build-server-mode true list`    |
//! | Build-server mode (env)    | `CI=true cargo run --example testsettings_demo -- --build-server-mode-env-var CI list` |
//! | Env var layer              | `MyTests_Value=x cargo run --example testsettings_demo -- --load-environment-variables true --environment-variables-prefix MyTests_ get Value` |
//! | Which layers were merged   | `cargo run --example testsettings_demo -- sources`                          |
//! | Resolution logging         | `RUST_LOG=testsettings=debug cargo run --example testsettings_demo -- list` |

use clap::Parser;
use tracing_subscriber::EnvFilter;

use testsettings::{ResolveArgs, SettingsArgs, TestSettings};

/// testsettings demo: print the resolved test settings.
#[derive(Parser, Debug)]
#[command(name = "testsettings-demo")]
struct Cli {
    #[command(flatten)]
    resolve: ResolveArgs,

    #[command(flatten)]
    settings: SettingsArgs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let builder = cli.resolve.apply(TestSettings::builder());
    let action = cli.settings.into_action();

    builder.handle_and_print(&action).unwrap_or_else(|e| {
        eprintln!("Settings error:\n{e}");
        std::process::exit(1);
    });
}
