//! Example of augmenting an embedded graph read from a file.
//! I use it with `RUST_LOG=debug cargo run --example augment | neato -Tsvg > augmented.svg`

use planar_augmentation::augment;
use planar_augmentation::input::from_file;
use planar_augmentation::output::draw_graph;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/augment.in".to_string());
    let mut graph = from_file(&path)?;

    let inserted = augment(&mut graph)?;
    eprintln!("inserted {} edges", inserted.len());

    print!("{}", draw_graph(&graph.to_ungraph(&inserted)));
    Ok(())
}
