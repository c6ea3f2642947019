//! Debug script for the login → search → resolve flow against the live site
//!
//! Run with: CNVS_TOKEN=... cargo run --example debug_resolve -p cnvsweb-core -- "batman"

use cnvsweb_core::{CnvsScraper, KindFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let token = std::env::var("CNVS_TOKEN")?;
    let query = std::env::args().nth(1).unwrap_or_else(|| "batman".to_string());

    let scraper = CnvsScraper::new()?;
    scraper.try_login(&token).await?;
    println!("✓ Logged in\n");

    let catalog = scraper.try_fetch_catalog(10, KindFilter::All).await?;
    let summary = catalog.summary();
    println!(
        "Most watched: {} items ({} movies, {} series)\n",
        summary.total, summary.movies, summary.series
    );

    println!("Searching for '{}'...\n", query);
    let page = scraper.try_search(&query, 5).await?;

    if page.items.is_empty() {
        println!("No results found!");
        return Ok(());
    }

    for (i, item) in page.items.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, item.title, item.kind);
        println!("   ID: {}", item.id);
        println!("   Tags: {} | {} | {}", item.duration_or_seasons, item.year, item.rating);
        println!("   Watch page: {}", item.watch_page_url);
        println!();
    }

    let item = &page.items[0];
    println!("Resolving media URL for: {}", item.title);

    match scraper.try_resolve(&item.watch_page_url).await {
        Ok(url) => println!("✓ Media URL found:\n{}", url),
        Err(e) => {
            println!("✗ Failed to resolve media URL: {}", e);

            // keep the page around for selector work
            let html = scraper.client().fetch(&item.watch_page_url).await?;
            std::fs::write("debug_watch_page.html", &html)?;
            println!("HTML saved to debug_watch_page.html");
        }
    }

    Ok(())
}
