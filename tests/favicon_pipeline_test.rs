// End-to-end tests for the SVG → favicon pipeline
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use favicon_mcp_server::favicon::{
    FAVICON_CATALOGUE, FaviconConfig, FaviconError, FaviconHandler, FaviconRequest,
    FaviconServiceState, ICO_FILE_NAME, OutputFormats, SvgSource,
};

const ICON_24: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
    <circle cx="12" cy="12" r="10" fill="#1e88e5"/>
    <path d="M7 12 L11 16 L17 8" stroke="#ffffff" stroke-width="2" fill="none"/>
</svg>"##;

fn test_config() -> FaviconConfig {
    FaviconConfig {
        load_system_fonts: false,
        ..FaviconConfig::default()
    }
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("favicon-e2e-{}-{}-{}", tag, std::process::id(), nanos))
}

/// (width, height) of every ICO directory entry, in stored order.
fn ico_entries(ico: &[u8]) -> Vec<(u32, u32)> {
    assert_eq!(&ico[0..4], &[0, 0, 1, 0], "ICO header");
    let count = u16::from_le_bytes([ico[4], ico[5]]) as usize;

    (0..count)
        .map(|index| {
            let entry = 6 + index * 16;
            let len = u32::from_le_bytes(ico[entry + 8..entry + 12].try_into().unwrap()) as usize;
            let offset = u32::from_le_bytes(ico[entry + 12..entry + 16].try_into().unwrap()) as usize;
            let frame = image::load_from_memory(&ico[offset..offset + len])
                .expect("embedded frame should decode");
            (frame.width(), frame.height())
        })
        .collect()
}

#[test]
fn scenario_a_square_icon_produces_full_set() {
    let handler = FaviconHandler::new(test_config());
    let result = handler
        .convert(ICON_24, OutputFormats::default())
        .expect("conversion should succeed");

    assert_eq!(result.png.len(), FAVICON_CATALOGUE.len());
    for spec in FAVICON_CATALOGUE.iter() {
        let bytes = result
            .png
            .get(&spec.file_name())
            .unwrap_or_else(|| panic!("missing {}", spec.file_name()));
        let decoded = image::load_from_memory(bytes).expect("png should decode");
        assert_eq!((decoded.width(), decoded.height()), (spec.size, spec.size));
    }

    assert!(result.png.contains_key("apple-touch-icon.png"));
    assert!(result.ico_error.is_none());
    let ico = result.ico.expect("ico should be produced");
    assert_eq!(ico_entries(&ico), vec![(16, 16), (32, 32)]);
}

#[test]
fn scenario_b_zero_width_aborts_without_outputs() {
    let handler = FaviconHandler::new(test_config());

    let view_box = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 0 100"/>"#;
    assert!(matches!(
        handler.convert(view_box, OutputFormats::default()),
        Err(FaviconError::InvalidDimensions(_))
    ));

    let attributes = r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="100"/>"#;
    assert!(matches!(
        handler.convert(attributes, OutputFormats::default()),
        Err(FaviconError::InvalidDimensions(_))
    ));
}

#[test]
fn scenario_b_writes_nothing_to_disk() {
    let service = FaviconServiceState::with_config(test_config());
    let dir = unique_temp_dir("invalid");

    let result = service.process_request(
        FaviconRequest {
            source: SvgSource::Inline(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 0 100"/>"#.to_string()),
            output_dir: Some(dir.clone()),
            formats: OutputFormats::default(),
        },
        None,
    );

    assert!(matches!(result, Err(FaviconError::InvalidDimensions(_))));
    assert!(!dir.exists());
}

#[test]
fn scenario_c_container_failure_keeps_png_entries() {
    // 512 is outside the ICO frame range, so packing must fail
    let service = FaviconServiceState::with_config(FaviconConfig {
        ico_sizes: vec![16, 32, 512],
        ..test_config()
    });

    let report = service
        .process_request(
            FaviconRequest {
                source: SvgSource::Inline(ICON_24.to_string()),
                output_dir: None,
                formats: OutputFormats::default(),
            },
            None,
        )
        .expect("conversion should still succeed");

    let png = report.meta["png"].as_object().expect("png map expected");
    assert_eq!(png.len(), FAVICON_CATALOGUE.len());
    assert!(report.meta["ico_error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(!report.meta.contains_key("ico"));
}

#[test]
fn repeated_conversion_is_byte_identical() {
    let handler = FaviconHandler::new(test_config());
    let first = handler.convert(ICON_24, OutputFormats::default()).expect("first run");
    let second = handler.convert(ICON_24, OutputFormats::default()).expect("second run");

    assert_eq!(first.png, second.png);
    assert_eq!(first.ico, second.ico);
}

#[test]
fn wide_icon_is_centered_with_transparent_margins() {
    let wide = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20">
        <rect width="40" height="20" fill="#ff0000"/>
    </svg>"##;
    let handler = FaviconHandler::new(test_config());
    let result = handler
        .convert(wide, OutputFormats { png: true, ico: false })
        .expect("conversion should succeed");

    let png = result.png.get("favicon-32x32.png").expect("32px png expected");
    let pixels = image::load_from_memory(png).expect("decode").into_rgba8();

    assert_eq!(pixels.get_pixel(16, 0).0[3], 0);
    assert_eq!(pixels.get_pixel(16, 31).0[3], 0);
    assert_eq!(pixels.get_pixel(16, 16).0, [255, 0, 0, 255]);
}

#[test]
fn file_source_is_written_to_output_directory() {
    let root = unique_temp_dir("disk");
    std::fs::create_dir_all(&root).expect("create temp root failed");
    let svg_path = root.join("icon.svg");
    std::fs::write(&svg_path, ICON_24).expect("write svg failed");
    let out_dir = root.join("out").join("favicons");

    let service = FaviconServiceState::with_config(test_config());
    let report = service
        .process_request(
            FaviconRequest {
                source: SvgSource::FilePath(svg_path.display().to_string()),
                output_dir: Some(out_dir.clone()),
                formats: OutputFormats::default(),
            },
            None,
        )
        .expect("conversion should succeed");

    for spec in FAVICON_CATALOGUE.iter() {
        assert!(out_dir.join(spec.file_name()).is_file(), "{} missing", spec.file_name());
    }
    assert!(out_dir.join(ICO_FILE_NAME).is_file());
    assert_eq!(
        report.text.lines().filter(|line| line.starts_with("Saved ")).count(),
        FAVICON_CATALOGUE.len() + 1
    );

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn malformed_document_is_parse_error() {
    let handler = FaviconHandler::new(test_config());
    assert!(matches!(
        handler.convert("<svg viewBox=\"0 0 10 10\"><rect></svg>", OutputFormats::default()),
        Err(FaviconError::Parse(_))
    ));
    assert!(matches!(
        handler.convert("<div>hello</div>", OutputFormats::default()),
        Err(FaviconError::Parse(_))
    ));
}

#[test]
fn text_and_gradients_render_best_effort() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64">
        <defs>
            <linearGradient id="g" x1="0" y1="0" x2="1" y2="1">
                <stop offset="0" stop-color="#ff0080"/>
                <stop offset="1" stop-color="#7928ca"/>
            </linearGradient>
        </defs>
        <rect width="64" height="64" rx="12" fill="url(#g)"/>
        <text x="32" y="42" font-size="28" text-anchor="middle" fill="#fff">A</text>
    </svg>"##;

    let handler = FaviconHandler::new(test_config());
    let result = handler
        .convert(svg, OutputFormats::default())
        .expect("unsupported pieces must not fail the conversion");
    assert_eq!(result.png.len(), FAVICON_CATALOGUE.len());
    assert!(result.ico.is_some());
}

#[test]
fn svg_without_namespace_produces_painted_set() {
    let svg = r##"<svg viewBox="0 0 24 24" width="24" height="24"><rect width="24" height="24" fill="#f00"/></svg>"##;
    let handler = FaviconHandler::new(test_config());
    let result = handler
        .convert(svg, OutputFormats::default())
        .expect("missing xmlns should still convert");

    assert_eq!(result.png.len(), FAVICON_CATALOGUE.len());
    for (name, bytes) in result.png.iter() {
        let pixels = image::load_from_memory(bytes).expect("decode").into_rgba8();
        let center = pixels.get_pixel(pixels.width() / 2, pixels.height() / 2).0;
        assert_eq!(center, [255, 0, 0, 255], "{} should be painted", name);
    }
    assert!(result.ico.is_some());
}
