//! A star becomes a wheel: the leaves are connected by a cycle in the order of the rotation
//! around the center.

use planar_augmentation::{Embedding, augment};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let leaves = 5;
    let mut rotations = vec![(1..=leaves).collect::<Vec<_>>()];
    rotations.extend((1..=leaves).map(|_| vec![0]));
    let mut star = Embedding::from_rotations(&rotations)?;

    for eid in augment(&mut star)? {
        let (u, v) = star.endpoints(eid);
        println!("{} -- {}", u, v);
    }
    Ok(())
}
