//! End-to-end checks of the crop → compose → export pipeline.

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use poster_common::error::PosterResult;
use poster_model::{
    AspectMode, CropRectangle, CroppedImage, EncodedImage, SourceImage, TemplateAsset, WorkItemId,
};
use poster_processing::{codec, extract_crop};
use poster_render::{
    builtin_templates, compose_decoded, compose_poster, export_batch, export_single,
    BatchFailurePolicy, BatchItem, BatchOptions, BatchProgress, BatchStage, MemorySink,
    ProgressCallback,
};

fn png_bytes(image: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn gradient_source(width: u32, height: u32) -> SourceImage {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    SourceImage::from_bytes(png_bytes(image))
}

fn solid_crop(color: [u8; 4], width: u32, height: u32) -> CroppedImage {
    let encoded = EncodedImage::new(png_bytes(RgbaImage::from_pixel(width, height, Rgba(color))));
    CroppedImage::new(encoded, CropRectangle::new(0, 0, width, height))
}

/// 160x120 template: left half opaque red, right half transparent.
fn half_red_template(mode: AspectMode) -> TemplateAsset {
    let image = RgbaImage::from_fn(160, 120, |x, _| {
        if x < 80 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    TemplateAsset::new(mode, EncodedImage::new(png_bytes(image)))
}

fn fast_options() -> BatchOptions {
    BatchOptions {
        delay: Duration::from_millis(20),
        failure_policy: BatchFailurePolicy::SkipAndContinue,
    }
}

#[tokio::test]
async fn test_scenario_800x600_to_landscape_poster() {
    let source = gradient_source(800, 600);
    let cropped = extract_crop(&source, Some(CropRectangle::new(100, 50, 400, 450))).unwrap();
    assert_eq!(cropped.dimensions(), (400, 450));

    let templates = builtin_templates().unwrap();
    let template = templates.for_mode(AspectMode::Landscape);
    let poster = compose_poster(&cropped, template, AspectMode::Landscape)
        .await
        .unwrap();

    assert_eq!(poster.dimensions(), (1600, 1200));
    assert_eq!(poster.encoded().format(), Some(ImageFormat::Png));
    assert_eq!(poster.encoded().dimensions().unwrap(), (1600, 1200));
}

#[tokio::test]
async fn test_output_size_ignores_input_sizes() {
    let cropped = solid_crop([10, 200, 30, 255], 37, 91);
    for mode in [AspectMode::Landscape, AspectMode::Portrait] {
        let template = half_red_template(mode);
        let poster = compose_poster(&cropped, &template, mode).await.unwrap();
        assert_eq!(poster.encoded().dimensions().unwrap(), mode.output_size());
    }
}

#[tokio::test]
async fn test_identical_inputs_give_identical_bytes() {
    let source = gradient_source(640, 480);
    let cropped = extract_crop(&source, Some(CropRectangle::new(20, 10, 300, 225))).unwrap();
    let template = half_red_template(AspectMode::Landscape);

    let first = compose_poster(&cropped, &template, AspectMode::Landscape)
        .await
        .unwrap();
    let second = compose_poster(&cropped, &template, AspectMode::Landscape)
        .await
        .unwrap();
    assert_eq!(first.encoded().bytes(), second.encoded().bytes());
}

#[tokio::test]
async fn test_opaque_template_pixels_win() {
    let cropped = solid_crop([0, 0, 255, 255], 50, 50);
    let template = half_red_template(AspectMode::Landscape);

    let poster = compose_poster(&cropped, &template, AspectMode::Landscape)
        .await
        .unwrap();
    let decoded = codec::decode(poster.encoded()).unwrap().to_rgb8();

    for (x, y) in [(100, 100), (400, 600), (700, 1100)] {
        assert_eq!(decoded.get_pixel(x, y).0, [255, 0, 0], "at ({x}, {y})");
    }
    for (x, y) in [(900, 100), (1200, 600), (1500, 1100)] {
        assert_eq!(decoded.get_pixel(x, y).0, [0, 0, 255], "at ({x}, {y})");
    }

    // Columns beside the opaque/transparent edge of the template.
    for y in [0, 600, 1199] {
        for x in 780..800 {
            assert_eq!(decoded.get_pixel(x, y).0, [255, 0, 0], "at ({x}, {y})");
        }
        for x in 800..820 {
            assert_eq!(decoded.get_pixel(x, y).0, [0, 0, 255], "at ({x}, {y})");
        }
    }
}

#[tokio::test]
async fn test_decode_order_does_not_change_output() {
    let crop = RgbaImage::from_fn(40, 30, |x, y| Rgba([x as u8 * 6, y as u8 * 8, 90, 255]));
    let template = RgbaImage::from_fn(40, 30, |x, _| {
        if x < 5 {
            Rgba([240, 240, 240, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    let delayed = |image: RgbaImage, ms: u64| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        PosterResult::Ok(image)
    };

    let slow_template = compose_decoded(
        delayed(crop.clone(), 0),
        delayed(template.clone(), 40),
        AspectMode::Portrait,
    )
    .await
    .unwrap();
    let slow_crop = compose_decoded(
        delayed(crop, 40),
        delayed(template, 0),
        AspectMode::Portrait,
    )
    .await
    .unwrap();

    assert_eq!(slow_template.encoded().bytes(), slow_crop.encoded().bytes());
}

#[tokio::test]
async fn test_broken_template_fails_without_delivery() {
    let cropped = solid_crop([1, 2, 3, 255], 8, 6);
    let template = TemplateAsset::new(
        AspectMode::Landscape,
        EncodedImage::new(vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0]),
    );
    let mut sink = MemorySink::new();

    let err = export_single(
        WorkItemId::new(1),
        &cropped,
        &template,
        AspectMode::Landscape,
        &mut sink,
    )
    .await
    .unwrap_err();

    assert!(err.is_decode(), "unexpected error: {err}");
    assert!(sink.deliveries().is_empty());
}

#[tokio::test]
async fn test_single_export_names_file_by_id() {
    let cropped = solid_crop([9, 9, 9, 255], 4, 3);
    let template = half_red_template(AspectMode::Landscape);
    let mut sink = MemorySink::new();

    let name = export_single(
        WorkItemId::new(42),
        &cropped,
        &template,
        AspectMode::Landscape,
        &mut sink,
    )
    .await
    .unwrap();

    assert_eq!(name, "poster-42.png");
    assert_eq!(sink.file_names(), vec!["poster-42.png"]);
}

#[tokio::test]
async fn test_batch_of_three_is_sequential_and_numbered() {
    let items: Vec<BatchItem> = (0..3)
        .map(|i| BatchItem {
            id: WorkItemId::new(10 + i),
            cropped: solid_crop([i as u8 * 80, 0, 0, 255], 16, 12),
        })
        .collect();
    let template = half_red_template(AspectMode::Landscape);
    let mut sink = MemorySink::new();
    let options = fast_options();

    let stages = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&stages);
    let progress: ProgressCallback = Box::new(move |p: BatchProgress| {
        recorder.lock().unwrap().push((p.completed, p.current, p.stage));
    });

    let started = Instant::now();
    let report = export_batch(
        &items,
        &template,
        AspectMode::Landscape,
        &mut sink,
        &options,
        Some(progress),
    )
    .await
    .unwrap();

    assert!(started.elapsed() >= options.delay * 2);
    assert!(report.is_complete_success());
    assert_eq!(
        sink.file_names(),
        vec!["poster-1.png", "poster-2.png", "poster-3.png"]
    );
    let ids: Vec<_> = report.delivered.iter().map(|d| d.id.get()).collect();
    assert_eq!(ids, vec![10, 11, 12]);

    // Each item is composed and delivered before the next one starts.
    let stages = stages.lock().unwrap();
    let composing: Vec<_> = stages
        .iter()
        .filter(|(_, _, stage)| *stage == BatchStage::Composing)
        .map(|(completed, current, _)| (*completed, current.map(WorkItemId::get)))
        .collect();
    assert_eq!(
        composing,
        vec![(0, Some(10)), (1, Some(11)), (2, Some(12))]
    );
    assert_eq!(stages.first().map(|s| s.2), Some(BatchStage::Preparing));
    assert_eq!(stages.last().map(|s| (s.0, s.2)), Some((3, BatchStage::Complete)));
}

#[tokio::test]
async fn test_batch_skips_failed_item() {
    let broken = CroppedImage::new(
        EncodedImage::new(vec![1, 2, 3, 4]),
        CropRectangle::new(0, 0, 2, 2),
    );
    let items = vec![
        BatchItem {
            id: WorkItemId::new(1),
            cropped: solid_crop([5, 5, 5, 255], 4, 4),
        },
        BatchItem {
            id: WorkItemId::new(2),
            cropped: broken,
        },
        BatchItem {
            id: WorkItemId::new(3),
            cropped: solid_crop([6, 6, 6, 255], 4, 4),
        },
    ];
    let template = half_red_template(AspectMode::Portrait);
    let mut sink = MemorySink::new();

    let report = export_batch(
        &items,
        &template,
        AspectMode::Portrait,
        &mut sink,
        &fast_options(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(sink.file_names(), vec!["poster-1.png", "poster-3.png"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, WorkItemId::new(2));
    assert_eq!(report.failed[0].file_name, "poster-2.png");
}

#[tokio::test]
async fn test_batch_abort_stops_at_first_failure() {
    let broken = CroppedImage::new(EncodedImage::new(vec![]), CropRectangle::new(0, 0, 1, 1));
    let items = vec![
        BatchItem {
            id: WorkItemId::new(1),
            cropped: broken,
        },
        BatchItem {
            id: WorkItemId::new(2),
            cropped: solid_crop([6, 6, 6, 255], 4, 4),
        },
    ];
    let template = half_red_template(AspectMode::Landscape);
    let mut sink = MemorySink::new();
    let options = BatchOptions {
        delay: Duration::ZERO,
        failure_policy: BatchFailurePolicy::Abort,
    };

    let err = export_batch(
        &items,
        &template,
        AspectMode::Landscape,
        &mut sink,
        &options,
        None,
    )
    .await
    .unwrap_err();

    assert!(err.is_decode());
    assert!(sink.deliveries().is_empty());
}

#[tokio::test]
async fn test_empty_batch_reports_nothing() {
    let template = half_red_template(AspectMode::Landscape);
    let mut sink = MemorySink::new();
    let report = export_batch(
        &[],
        &template,
        AspectMode::Landscape,
        &mut sink,
        &BatchOptions::default(),
        None,
    )
    .await
    .unwrap();
    assert!(report.delivered.is_empty());
    assert!(report.failed.is_empty());
}
