use citeval::{config::Config, data::Dataset, InteractionMatrix};

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[usize], p: f64) -> usize {
    if sorted_values.is_empty() {
        return 0;
    }
    let index = ((sorted_values.len() - 1) as f64 * p).ceil() as usize;
    sorted_values[index.min(sorted_values.len() - 1)]
}

fn print_row_stats(label: &str, matrix: &InteractionMatrix) {
    let mut counts: Vec<usize> = (0..matrix.rows()).map(|r| matrix.count_ones_in_row(r)).collect();
    counts.sort_unstable();
    let total: usize = counts.iter().sum();
    let empty = counts.iter().filter(|&&c| c == 0).count();
    let mean = if counts.is_empty() {
        0.0
    } else {
        total as f64 / counts.len() as f64
    };

    println!("{} ({} x {}):", label, matrix.rows(), matrix.cols());
    println!("{:-<50}", "");
    println!("{:<20} {:>15}", "Total", total);
    println!("{:<20} {:>15.2}", "Mean per row", mean);
    println!("{:<20} {:>15}", "P50", percentile(&counts, 0.50));
    println!("{:<20} {:>15}", "P90", percentile(&counts, 0.90));
    println!("{:<20} {:>15}", "P99", percentile(&counts, 0.99));
    println!("{:<20} {:>15}", "Max", counts.last().copied().unwrap_or(0));
    println!("{:<20} {:>15}", "Empty rows", empty);
    println!("{:-<50}\n", "");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    let dataset = Dataset::new(&config.dataset);

    println!("\n=== Citeval Dataset Statistics ===\n");
    println!("Data folder: {}\n", config.data_folder().display());

    let likes = dataset.load_user_article_likes()?;
    print_row_stats("User likes", &likes);

    let citations = dataset.load_citations()?;
    print_row_stats("Citations", &citations);

    let tags_path = config.data_folder().join(&config.dataset.tags_file);
    let item_tags_path = config.data_folder().join(&config.dataset.item_tags_file);
    if tags_path.exists() && item_tags_path.exists() {
        let tags = dataset.load_tags()?;
        let article_tags = dataset.load_article_tags()?;
        let assigned: usize = article_tags.iter().map(Vec::len).sum();
        println!("Tags:");
        println!("  Vocabulary size: {}", tags.len());
        println!("  Tagged articles: {}", article_tags.iter().filter(|t| !t.is_empty()).count());
        if !article_tags.is_empty() {
            println!("  Mean tags per article: {:.2}", assigned as f64 / article_tags.len() as f64);
        }
    } else {
        log::info!("Tag files not found, skipping tag statistics");
    }

    println!();

    Ok(())
}
