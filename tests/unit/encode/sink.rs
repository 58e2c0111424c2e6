use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![1, 2, 3, 255],
        premultiplied: true,
    }
}

fn cfg() -> PageConfig {
    PageConfig {
        page_width: 1920.0,
        page_height: 1080.0,
        pages: 2,
        title: "t".to_owned(),
    }
}

#[test]
fn in_memory_sink_collects_pages_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_page(0, &frame()).unwrap();
    sink.push_page(1, &frame()).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.pages().len(), 2);
    assert_eq!(sink.config().unwrap().pages, 2);
    assert!(sink.is_finished());
}

#[test]
fn out_of_order_pages_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let err = sink.push_page(1, &frame()).unwrap_err();
    assert!(matches!(err, SlideError::ExportEncoding(_)));
}
