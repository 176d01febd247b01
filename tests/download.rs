use std::sync::Mutex;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tempfile::tempdir;
use tokio::net::TcpListener;

use wagon_defect_detector::download::{DownloadJob, ImageDownloader};
use wagon_defect_detector::error::DetectorError;
use wagon_defect_detector::upload::ImageKind;

async fn serve_images() -> String {
    let router = Router::new()
        .route("/static/uploads/wagon1.png", get(|| async { &b"original-bytes"[..] }))
        .route(
            "/static/results/wagon1_annotated.png",
            get(|| async { &b"annotated-bytes"[..] }),
        )
        .route("/static/results/missing.png", get(|| async { StatusCode::NOT_FOUND }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn job(kind: ImageKind, url: String, file_name: &str) -> DownloadJob {
    DownloadJob {
        kind,
        url,
        file_name: file_name.to_string(),
    }
}

#[tokio::test]
async fn download_writes_the_image_under_its_generated_name() {
    let base = serve_images().await;
    let dir = tempdir().unwrap();
    let downloader = ImageDownloader::new(reqwest::Client::new(), dir.path().to_path_buf());

    let saved = downloader
        .download(&job(
            ImageKind::Original,
            format!("{}/static/uploads/wagon1.png", base),
            "wagon1-original-2024-01-02T03-04-05.jpg",
        ))
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("wagon1-original-2024-01-02T03-04-05.jpg"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"original-bytes");
}

#[tokio::test]
async fn failed_fetch_leaves_nothing_behind() {
    let base = serve_images().await;
    let dir = tempdir().unwrap();
    let downloader = ImageDownloader::new(reqwest::Client::new(), dir.path().to_path_buf());

    let err = downloader
        .download(&job(
            ImageKind::Annotated,
            format!("{}/static/results/missing.png", base),
            "missing.jpg",
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, DetectorError::Download(_)));
    assert_eq!(err.to_string(), "Download failed: Failed to fetch image: Not Found");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn batch_reports_each_half_and_fails_as_a_whole() {
    let base = serve_images().await;
    let dir = tempdir().unwrap();
    let downloader = ImageDownloader::new(reqwest::Client::new(), dir.path().to_path_buf());
    let settled = Mutex::new(Vec::new());

    let result = downloader
        .download_both(
            &job(
                ImageKind::Original,
                format!("{}/static/uploads/wagon1.png", base),
                "wagon1-original.jpg",
            ),
            &job(
                ImageKind::Annotated,
                format!("{}/static/results/missing.png", base),
                "wagon1-defects-detected.jpg",
            ),
            |kind, result| settled.lock().unwrap().push((kind, result.is_ok())),
        )
        .await;

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Batch download failed: Failed to fetch image: Not Found"
    );
    assert!(dir.path().join("wagon1-original.jpg").exists());
    assert!(!dir.path().join("wagon1-defects-detected.jpg").exists());

    let mut settled = settled.into_inner().unwrap();
    settled.sort_by_key(|(kind, _)| *kind == ImageKind::Annotated);
    assert_eq!(
        settled,
        vec![(ImageKind::Original, true), (ImageKind::Annotated, false)]
    );
}

#[tokio::test]
async fn batch_saves_both_images() {
    let base = serve_images().await;
    let dir = tempdir().unwrap();
    let downloader = ImageDownloader::new(reqwest::Client::new(), dir.path().join("nested"));

    let (original, annotated) = downloader
        .download_both(
            &job(
                ImageKind::Original,
                format!("{}/static/uploads/wagon1.png", base),
                "a.jpg",
            ),
            &job(
                ImageKind::Annotated,
                format!("{}/static/results/wagon1_annotated.png", base),
                "b.jpg",
            ),
            |_, _| {},
        )
        .await
        .unwrap();

    assert_eq!(std::fs::read(original).unwrap(), b"original-bytes");
    assert_eq!(std::fs::read(annotated).unwrap(), b"annotated-bytes");
}
