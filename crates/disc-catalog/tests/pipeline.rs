use disc_catalog::output::{CSV_COLUMNS, write_csv_file};
use disc_catalog::timestamp::{format_date, update_html_file};
use disc_catalog::{Pipeline, PipelineConfig, ScraperError, WebScraper};

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const HOMEPAGE: &str = r#"<html><body>
<div id="main-menu"><ul>
    <li><a href="/">Home</a></li>
    <li><a href="/category/brands">Brands</a><ul>
        <li><a href="/category/Innova">Innova</a></li>
        <li><a href="/category/Discraft">Discraft</a></li>
    </ul></li>
    <li><a href="/category/Innova">Innova</a></li>
</ul></div>
</body></html>"#;

fn manufacturer_page(product_path: &str) -> String {
    format!(
        r#"<html><body>
        <div id="ContentPlaceHolder1_pnlDD">
            <div class="thumbnail">
                <button onclick="addToWishlist(1)">Wishlist</button>
                <button onclick="window.location='{product_path}'">View</button>
            </div>
        </div>
        </body></html>"#
    )
}

fn product_page(name: &str, speed: f64, glide: f64, turn: f64, fade: f64) -> String {
    format!(
        r#"<html><body>
        <h1 id="ContentPlaceHolder1_lblDiscName">{name}</h1>
        <a id="ContentPlaceHolder1_lnkDiscImage" href="/images/discs/{name}.png">Zoom</a>
        <ul>
            <li id="ContentPlaceHolder1_lblSpeed">Speed: {speed}</li>
            <li id="ContentPlaceHolder1_lblGlide">Glide: {glide}</li>
            <li id="ContentPlaceHolder1_lblTurn">Turn: {turn}</li>
            <li id="ContentPlaceHolder1_lblFade">Fade: {fade}</li>
            <li id="ContentPlaceHolder1_lblStability">Stability: Stable</li>
            <li id="ContentPlaceHolder1_lblDiameter">Diameter: 21.2 cm</li>
            <li id="ContentPlaceHolder1_lblHeight">Height: 1.4 cm</li>
            <li id="ContentPlaceHolder1_lblRimDepth">Rim Depth: 1.1 cm</li>
            <li id="ContentPlaceHolder1_lblRimWidth">Rim Width: 2.2 cm</li>
            <li id="ContentPlaceHolder1_lblBeadless">Beadless</li>
        </ul>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

async fn stub_site() -> MockServer {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE.to_string()).await;
    mount_html(&server, "/category/Innova", manufacturer_page("/Innova-Star-Wraith")).await;
    mount_html(&server, "/category/Discraft", manufacturer_page("/Discraft-Z-Buzzz")).await;
    mount_html(
        &server,
        "/Innova-Star-Wraith",
        product_page("Star Wraith", 11.0, 5.0, -1.0, 3.0),
    )
    .await;
    mount_html(
        &server,
        "/Discraft-Z-Buzzz",
        product_page("Z Buzzz", 5.0, 4.0, -1.0, 1.0),
    )
    .await;
    server
}

fn pipeline(server: &MockServer) -> Pipeline {
    let scraper = WebScraper::with_base_url(&server.uri()).expect("Failed to build scraper");
    Pipeline::new(scraper, PipelineConfig::default())
}

#[tokio::test]
async fn test_end_to_end_csv() {
    let server = stub_site().await;

    let records = pipeline(&server).run().await.expect("Pipeline failed");
    assert_eq!(records.len(), 2);

    let dir = TempDir::new().expect("tempdir");
    let csv_path = dir.path().join("docs").join("discs.csv");
    write_csv_file(&records, &csv_path).expect("Failed to write CSV");

    let mut reader = csv::Reader::from_path(&csv_path).expect("Failed to open CSV");
    let headers: Vec<String> = reader
        .headers()
        .expect("headers")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, CSV_COLUMNS);

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("Failed to read rows");
    assert_eq!(rows.len(), 2);

    for row in &rows {
        for (column, cell) in CSV_COLUMNS.iter().zip(row.iter()) {
            assert!(!cell.is_empty(), "{column} should be populated");
        }
    }

    assert_eq!(&rows[0][0], "Discraft");
    assert_eq!(&rows[0][1], "Z Buzzz");
    assert_eq!(&rows[0][6], "0.0");
    assert_eq!(&rows[1][0], "Innova");
    assert_eq!(&rows[1][1], "Star Wraith");
    assert_eq!(&rows[1][2], "11.0");
    assert_eq!(&rows[1][6], "2.0");
    assert_eq!(&rows[1][7], "21.2 cm");
    assert_eq!(&rows[1][11], "Beadless");
    assert_eq!(rows[1][12].to_string(), format!("{}/Innova-Star-Wraith", server.uri()));

    let wraith = records
        .iter()
        .find(|r| r.name() == "Star Wraith")
        .expect("Star Wraith record");
    assert_eq!(
        wraith.text("img"),
        Some(format!("{}/images/discs/Star Wraith.png", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_collect_products_tags_manufacturer() {
    let server = stub_site().await;

    let products = pipeline(&server)
        .collect_products()
        .await
        .expect("Failed to collect products");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].manufacturer, "Innova");
    assert_eq!(products[0].link, format!("{}/Innova-Star-Wraith", server.uri()));
    assert_eq!(products[1].manufacturer, "Discraft");
}

#[tokio::test]
async fn test_product_fetch_failure_propagates() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE.to_string()).await;
    mount_html(&server, "/category/Innova", manufacturer_page("/Innova-Star-Wraith")).await;
    mount_html(&server, "/category/Discraft", manufacturer_page("/Discraft-Z-Buzzz")).await;
    mount_html(
        &server,
        "/Innova-Star-Wraith",
        product_page("Star Wraith", 11.0, 5.0, -1.0, 3.0),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/Discraft-Z-Buzzz"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = pipeline(&server).run().await;
    assert!(matches!(result, Err(ScraperError::HttpError(_))));
}

#[tokio::test]
async fn test_partial_product_page_is_not_fatal() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE.to_string()).await;
    mount_html(&server, "/category/Innova", manufacturer_page("/Innova-Star-Wraith")).await;
    mount_html(&server, "/category/Discraft", "<html><body></body></html>".into()).await;
    mount_html(
        &server,
        "/Innova-Star-Wraith",
        "<html><body><h1 id=\"ContentPlaceHolder1_lblDiscName\">Star Wraith</h1></body></html>"
            .into(),
    )
    .await;

    let records = pipeline(&server).run().await.expect("Pipeline failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].manufacturer, "Innova");
    assert_eq!(records[0].name(), "Star Wraith");
    assert!(records[0].get("speed").is_missing());
    assert!(records[0].get("stability").is_missing());
}

#[tokio::test]
async fn test_missing_menu_is_fatal() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<html><body>maintenance</body></html>".into()).await;

    let result = pipeline(&server).run().await;
    assert!(matches!(result, Err(ScraperError::ParseError(_))));
}

#[test]
fn test_update_html_file() {
    let dir = TempDir::new().expect("tempdir");
    let html_path = dir.path().join("index.html");
    let before = "<html>\n<footer>Last updated <span id=\"last-update\">OLD</span></footer>\n</html>\n";
    fs::write(&html_path, before).expect("Failed to write fixture");

    let date = NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
    update_html_file(&html_path, date).expect("Failed to patch");

    let after = fs::read_to_string(&html_path).expect("Failed to read back");
    assert_eq!(after, before.replace("OLD", &format_date(date)));
    assert!(after.contains("October 18, 2026"));
}
