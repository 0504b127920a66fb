use crate::config::ScrapeConfig;
use crate::model::{DownloadResult, PageDocument};

/// Aggregate counts for the end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub title: String,
    pub sections: usize,
    pub tables: usize,
    pub links: usize,
    pub images_found: usize,
    pub unique_urls: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub total_bytes: u64,
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    pub fn from_page(page: &PageDocument, unique_urls: usize) -> Self {
        let (ok, failed): (Vec<&DownloadResult>, Vec<&DownloadResult>) =
            page.downloaded_images.iter().partition(|r| r.success);

        RunSummary {
            title: page.title.clone(),
            sections: page.sections.len(),
            tables: page.tables.len(),
            links: page.links.len(),
            images_found: page.images.len(),
            unique_urls,
            downloaded: ok.len(),
            failed: failed.len(),
            total_bytes: ok.iter().filter_map(|r| r.size_bytes).sum(),
            failures: failed
                .iter()
                .map(|r| {
                    let error = r.error.clone().unwrap_or_else(|| "Unknown".to_string());
                    (r.url.clone(), error)
                })
                .collect(),
        }
    }

    pub fn print(&self, config: &ScrapeConfig) {
        let rule = "=".repeat(70);
        println!("\n{}", rule);
        println!("SUMMARY");
        println!("{}", rule);
        println!("Title: {}", self.title);
        println!("Sections extracted: {}", self.sections);
        println!("Tables extracted: {}", self.tables);
        println!("Links extracted: {}", self.links);
        println!("\nImages:");
        println!("  - Found in HTML: {}", self.images_found);
        println!("  - Total unique URLs: {}", self.unique_urls);
        println!("  - Successfully downloaded: {}", self.downloaded);
        println!("  - Failed: {}", self.failed);
        println!(
            "  - Total size: {} bytes ({:.2} MB)",
            group_thousands(self.total_bytes),
            self.total_bytes as f64 / 1024.0 / 1024.0
        );

        if !self.failures.is_empty() {
            println!("\nFailed downloads:");
            for (url, error) in &self.failures {
                println!("  ✗ {}", url);
                println!("    Error: {}", error);
            }
        }

        println!("\nOutput:");
        println!("  - Directory: {}", config.output_dir.display());
        println!("  - HTML file: {}", config.html_path().display());
        println!("  - JSON data: {}", config.data_path().display());
        println!("  - Images: {}", config.images_dir().display());
        println!("{}", rule);
    }
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──
