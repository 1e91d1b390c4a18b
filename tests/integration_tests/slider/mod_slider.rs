use adoptlite::slider::{Slider, SliderProps};
use std::sync::mpsc;

fn distance_slider(value: f64) -> SliderProps {
    SliderProps { minimum: 0.0, maximum: 10.0, value, value_text: "km".into() }
}

#[test]
fn renders_distance_label() {
    let view = Slider::new(distance_slider(4.0), |_| {}).render();
    assert_eq!(view.label, "4 km");
    assert_eq!(view.minimum_value, 0.0);
    assert_eq!(view.maximum_value, 10.0);
    assert_eq!(view.value, 4.0);
}

#[test]
fn view_serializes_with_fixed_styles() {
    let view = Slider::new(distance_slider(7.0), |_| {}).render();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["thumb_style"]["border_color"], "white");
    assert_eq!(json["thumb_style"]["border_width"], 3);
    assert_eq!(json["track_style"]["border_radius"], 6);
    assert_eq!(json["label_style"]["color"], "#2bda8e");
    assert_eq!(json["wrapper_style"]["flex"], 1);
}

#[test]
fn dragging_reports_whole_kilometers() {
    let (tx, rx) = mpsc::channel();
    let mut slider = Slider::new(distance_slider(4.0), move |v| {
        let _ = tx.send(v);
    });
    slider.slide_to(2.49);
    slider.slide_to(2.5);
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![2.0, 3.0]);
    // Rendering still reflects the props it was given.
    assert_eq!(slider.render().label, "4 km");
}

#[test]
fn steps_count_from_minimum_and_stay_in_range() {
    let (tx, rx) = mpsc::channel();
    let props = SliderProps { minimum: 0.5, maximum: 10.5, value: 3.5, value_text: "km".into() };
    let mut slider = Slider::new(props, move |v| {
        let _ = tx.send(v);
    });
    slider.slide_to(12.0);
    slider.slide_to(-3.0);
    slider.slide_to(1.2);
    slider.slide_to(4.4);
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![10.5, 0.5, 1.5, 4.5]);
}
