//! Counter demo binary
//!
//! Set `APP_ENV=production` to disable shape checks.

use compose_reducer_core::Composer;
use counter::{action, counter_reducer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=info,compose_reducer_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let composer = Composer::from_env();
    println!("=== Counter ({} mode) ===\n", composer.diagnostics().mode());

    let reducer = counter_reducer(&composer)?;
    let mut state = None;
    for short_name in ["increment", "increment", "double_step", "increment", "decrement", "reset"] {
        let next = reducer.reduce(state, &action(short_name));
        println!(">>> {short_name:<12} {next}");
        state = Some(next);
    }

    Ok(())
}
