// tests/collector.rs
use ai_daily_digest::ingest::types::{Category, Item, SourceProvider};
use ai_daily_digest::ingest::Collector;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

struct Fixed {
    key: &'static str,
    name: &'static str,
    items: Vec<Item>,
    delay: Duration,
}

#[async_trait]
impl SourceProvider for Fixed {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.items.clone())
    }
    fn key(&self) -> &'static str {
        self.key
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

struct Failing;

#[async_trait]
impl SourceProvider for Failing {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Err(anyhow!("upstream down"))
    }
    fn key(&self) -> &'static str {
        "failing_source"
    }
    fn name(&self) -> &'static str {
        "Failing"
    }
}

struct Panicking;

#[async_trait]
impl SourceProvider for Panicking {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        panic!("parser bug")
    }
    fn key(&self) -> &'static str {
        "panicking_source"
    }
    fn name(&self) -> &'static str {
        "Panicking"
    }
}

fn items(source: &str, category: Category, n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item::new(format!("{source} item {i}"), source, category.clone()))
        .collect()
}

fn fixed(key: &'static str, name: &'static str, items: Vec<Item>) -> Box<dyn SourceProvider> {
    Box::new(Fixed {
        key,
        name,
        items,
        delay: Duration::ZERO,
    })
}

#[tokio::test]
async fn two_sources_one_empty() {
    let collector = Collector::new(vec![
        fixed("src_a", "Source A", items("A", Category::News, 3)),
        fixed("src_b", "Source B", vec![]),
    ]);

    let (bundle, stats) = collector.collect().await;

    assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["src_a", "src_b"]);
    assert_eq!(bundle.get("src_a").map(|v| v.len()), Some(3));
    assert_eq!(bundle.get("src_b").map(|v| v.len()), Some(0));
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.sources_count, 2);
    assert_eq!(stats.sources_list, vec!["Source A", "Source B"]);
    assert_eq!(stats.by_category.get("News"), Some(&3));
    assert_eq!(stats.by_source.get("A"), Some(&3));
}

#[tokio::test]
async fn failures_and_panics_keep_their_keys() {
    let collector = Collector::new(vec![
        fixed("good", "Good", items("G", Category::ResearchPaper, 2)),
        Box::new(Failing),
        Box::new(Panicking),
    ]);

    let (bundle, stats) = collector.collect().await;

    assert_eq!(
        bundle.keys().collect::<Vec<_>>(),
        vec!["good", "failing_source", "panicking_source"]
    );
    assert!(bundle.get("failing_source").is_some_and(|v| v.is_empty()));
    assert!(bundle.get("panicking_source").is_some_and(|v| v.is_empty()));
    assert_eq!(stats.total_items, 2);
    assert_eq!(stats.sources_count, 1);
    assert_eq!(stats.sources_list, vec!["Good"]);
}

#[tokio::test]
async fn providers_run_concurrently() {
    let slow = |key: &'static str, name: &'static str| -> Box<dyn SourceProvider> {
        Box::new(Fixed {
            key,
            name,
            items: items(name, Category::News, 1),
            delay: Duration::from_millis(300),
        })
    };
    let collector = Collector::new(vec![slow("a", "A"), slow("b", "B"), slow("c", "C")]);

    let t0 = std::time::Instant::now();
    let (bundle, _) = collector.collect().await;
    assert_eq!(bundle.total_items(), 3);
    assert!(t0.elapsed() < Duration::from_millis(850));
}

#[tokio::test]
async fn stats_are_consistent_with_bundle() {
    let collector = Collector::new(vec![
        fixed("x", "X", items("X", Category::ModelRelease, 4)),
        fixed("y", "Y", items("", Category::Unknown, 2)),
    ]);
    let (bundle, stats) = collector.collect().await;

    assert_eq!(stats.total_items, bundle.total_items());
    assert_eq!(stats.by_category.values().sum::<usize>(), stats.total_items);
    assert_eq!(stats.by_source.values().sum::<usize>(), stats.total_items);
    assert_eq!(stats.by_source.get("Unknown"), Some(&2));
}
