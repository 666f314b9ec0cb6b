// tests/pipeline_e2e.rs
//
// End-to-end aggregation over fixture feeds: normalize across payload
// shapes, collapse cross-feed duplicates, rank, and bound.

use serde_json::json;

use techsum_newsletter::highlights::{self, providers::TechsumFeed, FeedProvider};

fn providers() -> Vec<Box<dyn FeedProvider>> {
    // Products: list shape. The chip story also appears in Affairs
    // with the same link but less heat.
    let products = json!([
        {
            "suggested_headline": "Big Tech Unveils New Chip!",
            "earliest_published": "2025-10-12 09:00:00",
            "feed_num": 120,
            "articles": [{"link": "https://news.example.com/chip"}],
            "images": [{"image_link": "https://cdn.example.com/chip.jpg"}]
        },
        {
            "suggested_headline": "Streaming service raises prices",
            "earliest_published": "2025-10-11 10:00:00",
            "feed_num": 40,
            "articles": [{"link": "https://news.example.com/stream"}]
        }
    ]);

    // Affairs: map shape, keys doubling as fallback titles.
    let affairs = json!({
        "chip-story": {
            "title": "big tech unveils new chip",
            "earliest_published": "2025-10-12 11:00:00",
            "feed_num": 80,
            "articles": [{"link": "https://news.example.com/chip?ref=affairs"}]
        },
        "Regulators open inquiry": {
            "earliest_published": "2025-10-10 08:00:00",
            "feed_num": 95,
            "articles": [{"link": "https://news.example.com/inquiry"}]
        }
    });

    // Innovation: map-of-lists shape.
    let innovation = json!({
        "Lab results": [
            {
                "suggested_headline": "Fusion startup hits milestone",
                "earliest_published": "2025-10-09 12:00:00",
                "feed_num": 60,
                "images": [{"url": "https://cdn.example.com/fusion.jpg"}],
                "articles": [{"url": "https://news.example.com/fusion"}]
            }
        ]
    });

    vec![
        Box::new(TechsumFeed::from_fixture("Products", &products.to_string())),
        Box::new(TechsumFeed::from_fixture("Affairs", &affairs.to_string())),
        Box::new(TechsumFeed::from_fixture("Innovation", &innovation.to_string())),
    ]
}

#[tokio::test]
async fn cross_feed_duplicates_collapse_and_images_lead() {
    let feeds = providers();
    let top = highlights::run_once(&feeds, 10).await;

    // 5 raw records, chip story counted once.
    assert_eq!(top.len(), 4);

    // The chip story survives with the hotter representative.
    let chip: Vec<_> = top
        .iter()
        .filter(|r| r.link_url.contains("/chip"))
        .collect();
    assert_eq!(chip.len(), 1);
    assert_eq!(chip[0].heat, 120);
    assert_eq!(chip[0].category, "Products");

    // Both image-bearing records come first, primary order inside the
    // partition; the image-less ones follow by heat.
    let titles: Vec<&str> = top.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Big Tech Unveils New Chip!",
            "Fusion startup hits milestone",
            "Regulators open inquiry",
            "Streaming service raises prices",
        ]
    );
}

#[tokio::test]
async fn a_broken_feed_is_skipped_not_fatal() {
    let feeds: Vec<Box<dyn FeedProvider>> = vec![
        Box::new(TechsumFeed::from_fixture("Products", "{ not json")),
        Box::new(TechsumFeed::from_fixture(
            "Affairs",
            &json!([{"title": "Survivor", "feed_num": 3}]).to_string(),
        )),
    ];
    let top = highlights::run_once(&feeds, 10).await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].title, "Survivor");
}

#[tokio::test]
async fn all_feeds_empty_yields_an_empty_result() {
    let feeds: Vec<Box<dyn FeedProvider>> =
        vec![Box::new(TechsumFeed::from_fixture("Products", "[]"))];
    let top = highlights::run_once(&feeds, 10).await;
    assert!(top.is_empty());
}
