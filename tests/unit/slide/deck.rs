use super::*;

fn slide(image: &str, effect: TransitionEffect, time: i64) -> SlideUpdate {
    SlideUpdate {
        image: image.to_owned(),
        transition_effect: effect,
        transition_time: time,
        ..SlideUpdate::default()
    }
}

#[test]
fn first_slide_is_initial() {
    let mut deck = SlideDeck::new();
    let change = deck.apply(slide("AAAA", TransitionEffect::Pixel, 5)).unwrap();
    assert_eq!(change, SlideChange::Initial);
    assert_eq!(deck.current().unwrap().image, "AAAA");
    assert_eq!(deck.applied(), 1);
}

#[test]
fn changed_image_with_pixel_effect_requests_a_reveal() {
    let mut deck = SlideDeck::new();
    deck.apply(slide("AAAA", TransitionEffect::Fade, 0)).unwrap();
    let change = deck
        .apply(slide("data:image/png;base64,BBBB", TransitionEffect::Pixel, 7))
        .unwrap();

    assert_eq!(
        change,
        SlideChange::Pixel(PixelTransitionRequest {
            previous: ImageSource::DataUri("data:image/jpeg;base64,AAAA".to_owned()),
            next: ImageSource::DataUri("data:image/png;base64,BBBB".to_owned()),
            duration: Duration::from_millis(1500),
        })
    );
}

#[test]
fn pixel_reveals_use_the_deck_duration_not_transition_time() {
    let mut deck = SlideDeck::new().with_pixel_duration(Duration::from_millis(400));
    deck.apply(slide("AAAA", TransitionEffect::Fade, 0)).unwrap();
    let change = deck.apply(slide("BBBB", TransitionEffect::Pixel, 50)).unwrap();
    let SlideChange::Pixel(request) = change else {
        panic!("expected a pixel reveal");
    };
    assert_eq!(request.duration, Duration::from_millis(400));
    assert_eq!(deck.pixel_duration(), Duration::from_millis(400));
}

#[test]
fn other_effects_are_left_to_the_host() {
    let mut deck = SlideDeck::new();
    deck.apply(slide("AAAA", TransitionEffect::Pixel, 0)).unwrap();
    let change = deck.apply(slide("BBBB", TransitionEffect::Slide, 0)).unwrap();
    assert_eq!(
        change,
        SlideChange::Declarative {
            effect: TransitionEffect::Slide,
            duration: Duration::from_millis(2000),
        }
    );
}

#[test]
fn same_or_missing_image_is_unchanged_but_still_stored() {
    let mut deck = SlideDeck::new();
    deck.apply(slide("AAAA", TransitionEffect::Pixel, 0)).unwrap();

    let mut same = slide("AAAA", TransitionEffect::Pixel, 0);
    same.text_color = "red".to_owned();
    assert_eq!(deck.apply(same).unwrap(), SlideChange::ImageUnchanged);
    assert_eq!(deck.current().unwrap().text_color, "red");

    assert_eq!(
        deck.apply(slide("", TransitionEffect::Pixel, 0)).unwrap(),
        SlideChange::ImageUnchanged
    );
    assert_eq!(deck.current().unwrap().image, "");
}

#[test]
fn image_after_an_empty_slide_is_initial() {
    let mut deck = SlideDeck::new();
    deck.apply(slide("", TransitionEffect::Pixel, 0)).unwrap();
    assert_eq!(
        deck.apply(slide("AAAA", TransitionEffect::Pixel, 0)).unwrap(),
        SlideChange::Initial
    );
    assert_eq!(deck.applied(), 2);
}
