//! FrozenMap demo.
//!
//! Builds a small map, derives new versions from it and prints each one.
//! Set `RUST_LOG=frozenmap=trace` to see the construction events emitted by
//! the library.
//!
//! ```text
//! cargo run --example frozen_map_demo
//! ```

use frozenmap::{FrozenMap, PartialOrder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,frozenmap=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let entries = [
        (0, "root"),
        (1, "words"),
        (4, "blah"),
        (2, "goop"),
        (-1, "ham"),
        (100, "eggs"),
    ];
    let map = FrozenMap::from_entries(entries, []);

    for (key, value) in &map {
        println!("{key} : {value}");
    }
    let keys: Vec<String> = map.keys().map(ToString::to_string).collect();
    println!("keys: {}", keys.join(", "));

    let derived = FrozenMap::from_entries(map.clone(), [(4, "BLAH"), (7, "spam")]);
    let trimmed = derived.remove(&-1);
    tracing::info!(
        original = map.len(),
        derived = derived.len(),
        trimmed = trimmed.len(),
        "derived two versions"
    );
    println!("original: {map}");
    println!("derived:  {derived}");
    println!("trimmed:  {trimmed}");

    match trimmed.lookup(&-1) {
        Ok(value) => println!("-1 => {value}"),
        Err(error) => tracing::warn!("lookup of -1 failed: {error}"),
    }

    println!("{}", trimmed.tree_diagram());
    match trimmed.check_invariants() {
        Ok(height) => tracing::info!(height, "tree is balanced"),
        Err(violation) => tracing::error!("tree is broken: {violation}"),
    }

    let measurements = FrozenMap::try_from_entries_with(PartialOrder, [(0.5, "half"), (0.25, "quarter")], []);
    match measurements.and_then(|map| map.try_insert(f64::NAN, "nan")) {
        Ok(map) => println!("measurements: {map}"),
        Err(error) => tracing::warn!("measurement rejected: {error}"),
    }
}
