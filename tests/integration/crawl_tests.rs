//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small synthetic catalog and a temporary
//! SQLite database as the store, then run the full pipeline end-to-end.

use catalog_harvest::catalog::UNKNOWN_CATEGORY;
use catalog_harvest::config::Config;
use catalog_harvest::crawler::{build_http_client, Coordinator, PageWorkerPool};
use catalog_harvest::state::PageTaskState;
use catalog_harvest::storage::{SqliteStore, StoreConnector};
use catalog_harvest::{CatalogError, NormalizedRecord};
use std::collections::HashMap;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One item on a synthetic catalog page
struct Book<'a> {
    title: &'a str,
    slug: &'a str,
    rating: &'a str,
    price: &'a str,
    stock: &'a str,
}

fn catalog_page(books: &[Book<'_>], next: Option<&str>) -> String {
    let articles: String = books
        .iter()
        .map(|b| {
            format!(
                r#"<li class="col-xs-6"><article class="product_pod">
                    <div class="image_container"><a href="{slug}/index.html"><img src="thumb.jpg"></a></div>
                    <p class="star-rating {rating}"><i class="icon-star"></i></p>
                    <h3><a href="{slug}/index.html" title="{title}">{title}</a></h3>
                    <div class="product_price">
                        <p class="price_color">{price}</p>
                        <p class="instock availability"><i class="icon-ok"></i> {stock} </p>
                    </div>
                </article></li>"#,
                slug = b.slug,
                rating = b.rating,
                title = b.title,
                price = b.price,
                stock = b.stock,
            )
        })
        .collect();

    let pager = match next {
        Some(href) => format!(r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#, href),
        None => r#"<ul class="pager"><li class="current">Last page</li></ul>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>All products</title></head>
        <body><section><ol class="row">{}</ol>{}</section></body></html>"#,
        articles, pager
    )
}

fn detail_page(category: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/x_2/index.html">{}</a></li>
            <li class="active">{}</li>
        </ul></body></html>"#,
        category, title
    )
}

async fn mount_html(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts the two-page catalog: "Book A" resolves to Fiction, "Book B"'s
/// detail page is broken.
async fn mount_two_page_catalog(server: &MockServer, book_a_price: &str, book_a_stock: &str) {
    let book_a = Book {
        title: "Book A",
        slug: "book-a_1",
        rating: "Three",
        price: book_a_price,
        stock: book_a_stock,
    };

    mount_html(
        server,
        "/catalogue/page-1.html",
        200,
        catalog_page(&[book_a], Some("page-2.html")),
    )
    .await;
    mount_html(
        server,
        "/catalogue/page-2.html",
        200,
        catalog_page(
            &[Book {
                title: "Book B",
                slug: "book-b_2",
                rating: "Five",
                price: "£5,50",
                stock: "In stock",
            }],
            None,
        ),
    )
    .await;
    mount_html(
        server,
        "/catalogue/book-a_1/index.html",
        200,
        detail_page("Fiction", "Book A"),
    )
    .await;
    mount_html(
        server,
        "/catalogue/book-b_2/index.html",
        500,
        "<html><body>Internal error</body></html>".to_string(),
    )
    .await;
}

fn create_test_config(base_url: &str, db_path: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        (
            "CATALOG_START_URL",
            format!("{}/catalogue/page-1.html", base_url),
        ),
        ("CATALOG_SQLITE_PATH", db_path.display().to_string()),
        ("CATALOG_WORKERS", "4".to_string()),
        ("CATALOG_USER_AGENT", "TestBot/1.0".to_string()),
        ("CATALOG_TIMEOUT_SECS", "5".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

fn load_sorted(db_path: &Path) -> Vec<NormalizedRecord> {
    let store = SqliteStore::open(db_path).expect("Failed to open DB");
    let mut records = store.load_records().expect("Failed to load records");
    records.sort_by(|a, b| {
        a.title
            .cmp(&b.title)
            .then(a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal))
    });
    records
}

#[tokio::test]
async fn test_two_page_catalog_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_two_page_catalog(&mock_server, "£10.00", "In stock").await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");
    let config = create_test_config(&mock_server.uri(), &db_path);

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_discovered, 2);
    assert_eq!(summary.pages_done, 2);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.items_extracted, 2);
    assert_eq!(summary.categories_unknown, 1);
    assert_eq!(summary.rows_inserted, 2);

    let records = load_sorted(&db_path);
    assert_eq!(records.len(), 2, "Expected two rows, got {:?}", records);

    let a = &records[0];
    assert_eq!(a.title, "Book A");
    assert_eq!(a.rating_label, "3 stars");
    assert_eq!(a.category, "Fiction");
    assert_eq!(a.price, 10.00);
    assert_eq!(a.stock_status, "In stock");

    let b = &records[1];
    assert_eq!(b.title, "Book B");
    assert_eq!(b.rating_label, "5 stars");
    assert_eq!(b.category, UNKNOWN_CATEGORY);
    assert_eq!(b.price, 5.50);
    assert_eq!(b.stock_status, "In stock");
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_two_page_catalog(&mock_server, "£10.00", "In stock").await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");

    let first = Coordinator::new(create_test_config(&mock_server.uri(), &db_path))
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("First crawl failed");
    let second = Coordinator::new(create_test_config(&mock_server.uri(), &db_path))
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Second crawl failed");

    assert_eq!(first.rows_inserted, 2);
    assert_eq!(second.rows_inserted, 0);
    assert_eq!(second.pages_done, 2);
    assert_eq!(load_sorted(&db_path).len(), 2);
}

#[tokio::test]
async fn test_price_change_adds_row_and_keeps_original() {
    let mock_server = MockServer::start().await;
    mount_two_page_catalog(&mock_server, "£10.00", "In stock").await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");
    Coordinator::new(create_test_config(&mock_server.uri(), &db_path))
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("First crawl failed");

    // Same title at a new price, plus a stock change at the new price point
    mock_server.reset().await;
    mount_two_page_catalog(&mock_server, "£12.00", "Out of stock").await;
    Coordinator::new(create_test_config(&mock_server.uri(), &db_path))
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Second crawl failed");

    let records = load_sorted(&db_path);
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].title, "Book A");
    assert_eq!(records[0].price, 10.0);
    assert_eq!(records[0].stock_status, "In stock");

    assert_eq!(records[1].title, "Book A");
    assert_eq!(records[1].price, 12.0);
    assert_eq!(records[1].stock_status, "Out of stock");

    assert_eq!(records[2].title, "Book B");
}

#[tokio::test]
async fn test_failed_page_does_not_affect_siblings() {
    let mock_server = MockServer::start().await;
    mount_two_page_catalog(&mock_server, "£10.00", "In stock").await;
    mount_html(
        &mock_server,
        "/catalogue/page-3.html",
        404,
        "<html><body>Not found</body></html>".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");
    let config = create_test_config(&mock_server.uri(), &db_path);
    let connector = StoreConnector::from_config(&config.store);
    connector.bootstrap().await.expect("Failed to bootstrap store");

    let client = build_http_client(&config.crawler).expect("Failed to build client");
    let pool = PageWorkerPool::new(client, connector.clone(), 3);
    let base = mock_server.uri();
    let reports = pool
        .run_all(vec![
            format!("{}/catalogue/page-1.html", base),
            format!("{}/catalogue/page-3.html", base),
            format!("{}/catalogue/page-2.html", base),
        ])
        .await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].state, PageTaskState::Done);
    assert_eq!(reports[1].state, PageTaskState::Failed);
    assert_eq!(reports[1].failed_in, Some(PageTaskState::Fetching));
    assert_eq!(reports[1].rows_inserted, 0);
    assert_eq!(reports[2].state, PageTaskState::Done);

    assert_eq!(connector.count_rows().await.expect("Failed to count rows"), 2);
}

#[tokio::test]
async fn test_discovery_failure_aborts_run() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        catalog_page(
            &[Book {
                title: "Book A",
                slug: "book-a_1",
                rating: "One",
                price: "£1.00",
                stock: "In stock",
            }],
            Some("page-2.html"),
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/page-2.html",
        503,
        "unavailable".to_string(),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");
    let result = Coordinator::new(create_test_config(&mock_server.uri(), &db_path))
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert!(matches!(
        result,
        Err(CatalogError::HttpStatus { status: 503, .. })
    ));
    assert!(load_sorted(&db_path).is_empty());
}

#[tokio::test]
async fn test_malformed_item_is_skipped_rest_of_page_loads() {
    let mock_server = MockServer::start().await;
    let page = catalog_page(
        &[
            Book {
                title: "Good One",
                slug: "good-one_1",
                rating: "Four",
                price: "£4.00",
                stock: "In stock",
            },
            Book {
                title: "Good Two",
                slug: "good-two_2",
                rating: "Bogus",
                price: "£2.00",
                stock: "In stock",
            },
        ],
        None,
    )
    .replace(
        "</ol>",
        r#"<li><article class="product_pod"><h3>No link here</h3><p class="price_color">£9.99</p></article></li></ol>"#,
    );
    mount_html(&mock_server, "/catalogue/page-1.html", 200, page).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("catalog.db");
    let summary = Coordinator::new(create_test_config(&mock_server.uri(), &db_path))
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(summary.items_extracted, 2);
    assert_eq!(summary.items_skipped, 1);
    assert_eq!(summary.pages_done, 1);

    let records = load_sorted(&db_path);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].rating_label, "4 stars");
    assert_eq!(records[1].rating_label, "no rating");
    assert!(records.iter().all(|r| r.category == UNKNOWN_CATEGORY));
}
