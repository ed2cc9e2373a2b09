use picker_core::{order_links, Direction, Fields, Link, Normalization, OrderParseError, OrderSpec, RawLink};
use pretty_assertions::assert_eq;

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn link(target: &str, pairs: &[(&str, &str)]) -> Link {
    let fields: Fields = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Link::from_raw(RawLink::new(target, target), Normalization::default()).with_fields(fields)
}

fn targets(links: &[Link]) -> Vec<&str> {
    links.iter().map(|l| l.match_target.as_str()).collect()
}

#[test]
fn order_spec_parses_direction_and_items() {
    assert_eq!(
        "small->large:version".parse::<OrderSpec>(),
        Ok(OrderSpec::by_fields(Direction::Ascending, ["version"]))
    );
    assert_eq!(
        " large->small : major , minor ".parse::<OrderSpec>(),
        Ok(OrderSpec::by_fields(Direction::Descending, ["major", "minor"]))
    );
    assert_eq!(
        "large->small".parse::<OrderSpec>(),
        Ok(OrderSpec::whole_string(Direction::Descending))
    );
    assert_eq!(
        "small->large:   ".parse::<OrderSpec>(),
        Ok(OrderSpec::whole_string(Direction::Ascending))
    );
    assert_eq!(
        "natural:version".parse::<OrderSpec>(),
        Err(OrderParseError::UnknownDirection("natural".to_string()))
    );
}

#[test]
fn whole_string_ordering_is_lexicographic() {
    init_logging();
    let links = vec![link("b-10", &[]), link("b-2", &[]), link("a-9", &[])];

    let up = order_links(links.clone(), &OrderSpec::whole_string(Direction::Ascending));
    assert_eq!(targets(&up), ["a-9", "b-10", "b-2"]);

    let down = order_links(links, &OrderSpec::whole_string(Direction::Descending));
    assert_eq!(targets(&down), ["b-2", "b-10", "a-9"]);
}

#[test]
fn field_tuple_orders_left_to_right_without_numeric_coercion() {
    init_logging();
    let links = vec![
        link("x-1-10", &[("major", "1"), ("minor", "10")]),
        link("x-2-0", &[("major", "2"), ("minor", "0")]),
        link("x-1-9", &[("major", "1"), ("minor", "9")]),
    ];

    let ordered = order_links(
        links,
        &OrderSpec::by_fields(Direction::Ascending, ["major", "minor"]),
    );
    assert_eq!(targets(&ordered), ["x-1-10", "x-1-9", "x-2-0"]);
}

#[test]
fn ties_keep_input_order_ascending_and_mirror_it_descending() {
    init_logging();
    let links = vec![
        link("first", &[("v", "1")]),
        link("second", &[("v", "1")]),
        link("third", &[("v", "0")]),
    ];

    let up = order_links(links.clone(), &OrderSpec::by_fields(Direction::Ascending, ["v"]));
    assert_eq!(targets(&up), ["third", "first", "second"]);

    let down = order_links(links, &OrderSpec::by_fields(Direction::Descending, ["v"]));
    assert_eq!(targets(&down), ["second", "first", "third"]);
}

#[test]
fn ordering_twice_is_the_same_as_ordering_once() {
    init_logging();
    let links = vec![
        link("c", &[("v", "2")]),
        link("a", &[("v", "1")]),
        link("b", &[("v", "1")]),
    ];
    let spec = OrderSpec::by_fields(Direction::Ascending, ["v"]);

    let once = order_links(links, &spec);
    let twice = order_links(once.clone(), &spec);
    assert_eq!(once, twice);
}

#[test]
fn missing_field_sorts_before_every_value() {
    init_logging();
    let links = vec![
        link("has-a", &[("v", "a")]),
        link("missing", &[]),
        link("has-0", &[("v", "0")]),
    ];

    let up = order_links(links.clone(), &OrderSpec::by_fields(Direction::Ascending, ["v"]));
    assert_eq!(targets(&up), ["missing", "has-0", "has-a"]);

    let down = order_links(links, &OrderSpec::by_fields(Direction::Descending, ["v"]));
    assert_eq!(targets(&down), ["has-a", "has-0", "missing"]);
}

#[test]
fn empty_input_stays_empty() {
    let ordered = order_links(Vec::new(), &OrderSpec::whole_string(Direction::Descending));
    assert!(ordered.is_empty());
}
