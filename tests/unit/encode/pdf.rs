use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn cfg(pages: usize) -> PageConfig {
    PageConfig {
        page_width: 1920.0,
        page_height: 1080.0,
        pages,
        title: "Quarterly Review".to_owned(),
    }
}

#[test]
fn jpeg_has_soi_marker() {
    let jpeg = encode_jpeg(&frame(8, 4, [255, 0, 0, 255]), 90).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}

#[test]
fn jpeg_rejects_short_buffers() {
    let mut f = frame(8, 4, [0, 0, 0, 255]);
    f.data.pop();
    assert!(encode_jpeg(&f, 90).is_err());
}

#[test]
fn one_page_per_slide_with_frame_sized_media_box() {
    let mut sink = PdfSink::default();
    sink.begin(cfg(3)).unwrap();
    for i in 0..3 {
        sink.push_page(i, &frame(16, 9, [10, 20, 30, 255])).unwrap();
    }
    sink.end().unwrap();
    assert_eq!(sink.page_count(), 3);
    let bytes = sink.finish().unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);
    for (_, id) in pages {
        let page = doc.get_dictionary(id).unwrap();
        let media = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media.len(), 4);
        assert_eq!(media[2].as_float().unwrap(), 1920.0);
        assert_eq!(media[3].as_float().unwrap(), 1080.0);
    }
}

fn info_title(bytes: &[u8]) -> Vec<u8> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let info = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    match doc.get_dictionary(info).unwrap().get(b"Title").unwrap() {
        Object::String(bytes, _) => bytes.clone(),
        other => panic!("title is not a string: {other:?}"),
    }
}

#[test]
fn non_ascii_titles_are_utf16_with_a_bom() {
    let mut sink = PdfSink::default();
    sink.begin(PageConfig {
        title: "Café Über".to_owned(),
        ..cfg(1)
    })
    .unwrap();
    sink.push_page(0, &frame(4, 4, [0, 0, 0, 255])).unwrap();
    sink.end().unwrap();

    let title = info_title(&sink.finish().unwrap());
    assert_eq!(&title[..2], &[0xFE, 0xFF]);
    let units: Vec<u16> = title[2..]
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(String::from_utf16(&units).unwrap(), "Café Über");
}

#[test]
fn ascii_titles_stay_literal() {
    let mut sink = PdfSink::default();
    sink.begin(cfg(1)).unwrap();
    sink.push_page(0, &frame(4, 4, [0, 0, 0, 255])).unwrap();
    sink.end().unwrap();
    assert_eq!(info_title(&sink.finish().unwrap()), b"Quarterly Review");
}

#[test]
fn missing_pages_fail_finish() {
    let mut sink = PdfSink::default();
    sink.begin(cfg(2)).unwrap();
    sink.push_page(0, &frame(4, 4, [0, 0, 0, 255])).unwrap();
    let err = sink.finish().unwrap_err();
    assert!(matches!(err, SlideError::ExportEncoding(_)));
}

#[test]
fn pages_must_arrive_in_order() {
    let mut sink = PdfSink::default();
    sink.begin(cfg(2)).unwrap();
    assert!(sink.push_page(1, &frame(4, 4, [0, 0, 0, 255])).is_err());
}
