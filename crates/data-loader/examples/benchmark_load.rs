use data_loader::load_movie_records;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let path = Path::new("data/movies.jsonl");

    println!("Loading movie records...\n");

    let start = Instant::now();
    let records = load_movie_records(path)?;
    let elapsed = start.elapsed();

    let with_overview = records.iter().filter(|r| r.overview.is_some()).count();
    let with_year = records.iter().filter(|r| r.release_year().is_some()).count();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Records: {}", records.len());
    println!("With overview: {}", with_overview);
    println!("With release year: {}", with_year);
    println!("\nPerformance: {:.0} records/second",
             records.len() as f64 / elapsed.as_secs_f64());
    Ok(())
}
