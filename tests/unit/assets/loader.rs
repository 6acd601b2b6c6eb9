use std::io::Cursor;

use super::*;

fn png_source(width: u32, height: u32, rgba: [u8; 4]) -> ImageSource {
    let px = rgba.repeat((width * height) as usize);
    let img = image::RgbaImage::from_raw(width, height, px).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ImageSource::from(buf)
}

fn garbage_source() -> ImageSource {
    ImageSource::from(b"definitely not a png".to_vec())
}

#[test]
fn arena_waits_for_every_slot() {
    let mut arena = LoadArena::<u32>::new(3);
    assert_eq!(arena.complete(2, Ok(30)), None);
    assert_eq!(arena.complete(0, Ok(10)), None);
    assert_eq!(arena.remaining(), 1);
    assert!(!arena.is_settled());

    let settled = arena.complete(1, Ok(20));
    assert_eq!(settled, Some(Ok(vec![10, 20, 30])));
    assert!(arena.is_settled());
}

#[test]
fn arena_fires_exactly_once() {
    let mut arena = LoadArena::<u32>::new(2);
    assert!(arena.complete(0, Ok(1)).is_none());
    assert!(arena.complete(1, Ok(2)).is_some());
    assert!(arena.complete(1, Ok(3)).is_none());
    assert!(arena.complete(0, Err("late".to_string())).is_none());
}

#[test]
fn arena_settles_on_first_failure() {
    let mut arena = LoadArena::<u32>::new(2);
    let settled = arena.complete(1, Err("bad bytes".to_string()));
    assert_eq!(
        settled,
        Some(Err(SlotFailure {
            slot: 1,
            reason: "bad bytes".to_string()
        }))
    );
    assert!(arena.complete(0, Ok(5)).is_none());
}

#[test]
fn arena_ignores_duplicates_and_out_of_range() {
    let mut arena = LoadArena::<u32>::new(2);
    assert!(arena.complete(0, Ok(1)).is_none());
    assert!(arena.complete(0, Ok(9)).is_none());
    assert!(arena.complete(7, Ok(9)).is_none());
    assert_eq!(arena.remaining(), 1);
    assert_eq!(arena.complete(1, Ok(2)), Some(Ok(vec![1, 2])));
}

#[test]
fn empty_batch_is_immediately_ready() {
    let mut pending = AssetLoader::new(LoaderMode::Background).load(Vec::new());
    assert!(pending.is_settled());
    assert_eq!(pending.poll().unwrap().unwrap().len(), 0);
    assert!(pending.poll().is_none());
}

#[test]
fn inline_pair_decodes_both() {
    let loader = AssetLoader::new(LoaderMode::Inline);
    let mut pending = loader.load_pair(
        png_source(4, 2, [255, 0, 0, 255]),
        png_source(2, 4, [0, 0, 255, 255]),
    );
    assert!(pending.is_settled());
    let pair = pending.poll().unwrap().unwrap();
    assert_eq!((pair.previous.width, pair.previous.height), (4, 2));
    assert_eq!((pair.next.width, pair.next.height), (2, 4));
    assert!(pending.poll().is_none());
}

#[test]
fn inline_failure_names_the_side() {
    let loader = AssetLoader::new(LoaderMode::Inline);

    let failure = loader
        .load_pair(garbage_source(), png_source(1, 1, [0, 0, 0, 255]))
        .wait()
        .unwrap_err();
    assert_eq!(failure.side, AssetSide::Previous);

    let failure = loader
        .load_pair(png_source(1, 1, [0, 0, 0, 255]), garbage_source())
        .wait()
        .unwrap_err();
    assert_eq!(failure.side, AssetSide::Next);
    assert!(failure.reason.contains("decode image"));
}

#[test]
fn background_pair_settles_after_both() {
    let loader = AssetLoader::new(LoaderMode::Background);
    let pair = loader
        .load_pair(
            png_source(8, 8, [10, 20, 30, 255]),
            png_source(8, 8, [40, 50, 60, 255]),
        )
        .wait()
        .unwrap();
    assert_eq!(pair.previous.pixel(0, 0), [10, 20, 30, 255]);
    assert_eq!(pair.next.pixel(7, 7), [40, 50, 60, 255]);
}

#[test]
fn background_poll_eventually_reports_failure() {
    let loader = AssetLoader::new(LoaderMode::Background);
    let mut pending = loader.load_pair(png_source(2, 2, [1, 2, 3, 255]), garbage_source());

    let mut outcome = None;
    for _ in 0..2_000 {
        if let Some(o) = pending.poll() {
            outcome = Some(o);
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    let failure = outcome.expect("load never settled").unwrap_err();
    assert_eq!(failure.side, AssetSide::Next);
}
