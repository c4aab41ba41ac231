//! Read a MAT-file back and dump its contents

use mat5::MatFile;
use std::time::Instant;

fn main() -> mat5::Result<()> {
    let filename = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("example_file.mat"));

    if !std::path::Path::new(&filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_matfile' first");
        return Ok(());
    }

    let start = Instant::now();
    let file = MatFile::read_path(&filename)?;
    println!(
        "Read {} arrays in {:.3}ms",
        file.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!("Header: {}", file.header());

    for array in file.arrays() {
        println!("\n{} {array}", array.name());
        println!("{}", array.content_to_string());
    }
    Ok(())
}
