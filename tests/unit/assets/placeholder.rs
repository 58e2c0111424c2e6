use std::io::Cursor;

use super::*;

fn small() -> SeededPlaceholders {
    SeededPlaceholders {
        width: 32,
        height: 24,
    }
}

#[test]
fn same_id_same_picture() {
    let a = small().image_for("slide-7", "ocean").unwrap();
    let b = small().image_for("slide-7", "mountains").unwrap();
    assert_eq!(a.width, 32);
    assert_eq!(a.height, 24);
    assert_eq!(a.rgba8_premul, b.rgba8_premul);
}

#[test]
fn different_ids_differ() {
    let a = small().image_for("slide-1", "x").unwrap();
    let b = small().image_for("slide-2", "x").unwrap();
    assert_ne!(a.rgba8_premul, b.rgba8_premul);
}

#[test]
fn placeholders_are_opaque() {
    let a = small().image_for("s", "k").unwrap();
    assert!(a.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn zero_size_is_rejected() {
    let p = SeededPlaceholders {
        width: 0,
        height: 10,
    };
    assert!(p.image_for("s", "k").is_err());
}

#[test]
fn directory_lookup_prefers_files_and_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(dir.path().join("hero.png"), buf).unwrap();

    let p = DirectoryPlaceholders::with_fallback(dir.path(), Arc::new(small()));
    let found = p.image_for("hero", "k").unwrap();
    assert_eq!((found.width, found.height), (3, 2));
    let missing = p.image_for("other", "k").unwrap();
    assert_eq!((missing.width, missing.height), (32, 24));
}

#[test]
fn hsl_primaries() {
    assert_eq!(hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
    assert_eq!(hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
    assert_eq!(hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
}
