//! Example of drawing a block-cut tree from a graph input file.
//! I use it with `cargo run --example bc_tree | dot -Tsvg > bc.svg`

use planar_augmentation::block_cut::BlockCutTree;
use planar_augmentation::debugging::draw_bc_tree;
use planar_augmentation::input::from_file;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let graph = from_file("assets/augment.in")?;

    let mut bc_tree = BlockCutTree::new(&graph);

    print!("{}", draw_bc_tree(&mut bc_tree));
    Ok(())
}
