//! Weighted pick from a loot table, compared against the requested weights.
//!
//! Run with `RUST_LOG=debug` to see the build summary.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vose::AliasTable;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let items = ["common", "uncommon", "rare", "epic", "legendary", "mythic"];
    let weights = [0.60, 0.25, 0.10, 0.04, 0.00995, 0.00005];

    let table = AliasTable::new(&weights)?;

    println!("columns (mass, alias):");
    for i in 0..table.len() {
        if let Some(col) = table.column(i) {
            println!("  {:<10} {:.6}  {:?}", items[i], col.probability_mass, col.alias);
        }
    }
    println!();

    let draws = 1_000_000;
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut counts = vec![0usize; items.len()];
    for _ in 0..draws {
        counts[table.sample_with_rng(&mut rng)] += 1;
    }

    println!("{:<10} {:>9} {:>9} {:>9}", "item", "weight", "table", "observed");
    for (i, name) in items.iter().enumerate() {
        println!(
            "{:<10} {:>9.5} {:>9.5} {:>9.5}",
            name,
            weights[i],
            table.marginal(i).unwrap_or(0.0),
            counts[i] as f64 / draws as f64
        );
    }

    // A malformed distribution is an error value, not a crash.
    if let Err(e) = AliasTable::new(&[0.3, 0.3]) {
        println!();
        println!("rejected [0.3, 0.3]: {e}");
    }

    Ok(())
}
