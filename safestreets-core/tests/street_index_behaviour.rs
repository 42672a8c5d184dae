//! Behavioural tests for building and querying the street index.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use safestreets_core::test_support::square_street;
use safestreets_core::{StreetIndex, StreetIndexError, StreetLookup, StreetPolygon};

type BuildResult = Result<StreetIndex, StreetIndexError>;

#[fixture]
fn streets() -> RefCell<Vec<StreetPolygon>> {
    RefCell::new(Vec::new())
}

#[fixture]
fn index() -> RefCell<Option<BuildResult>> {
    RefCell::new(None)
}

#[fixture]
fn found() -> RefCell<Vec<String>> {
    RefCell::new(Vec::new())
}

fn with_index<R>(index: &RefCell<Option<BuildResult>>, f: impl FnOnce(&StreetIndex) -> R) -> R {
    match index.borrow().as_ref() {
        Some(Ok(built)) => f(built),
        other => panic!("expected a built index, found {other:?}"),
    }
}

#[given("two adjacent square streets")]
fn given_adjacent_streets(#[from(streets)] streets: &RefCell<Vec<StreetPolygon>>) {
    streets.borrow_mut().extend([
        square_street("west", -77.002, 38.9, 0.001),
        square_street("east", -77.0, 38.9, 0.001),
    ]);
}

#[given("a street with a broken ring")]
fn given_broken_street(#[from(streets)] streets: &RefCell<Vec<StreetPolygon>>) {
    streets.borrow_mut().push(StreetPolygon::new(
        "broken",
        "Broken Street",
        vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.0 }],
    ));
}

#[given("no streets")]
fn given_no_streets(#[from(streets)] streets: &RefCell<Vec<StreetPolygon>>) {
    streets.borrow_mut().clear();
}

#[when("I build the street index")]
fn when_build(
    #[from(streets)] streets: &RefCell<Vec<StreetPolygon>>,
    #[from(index)] index: &RefCell<Option<BuildResult>>,
) {
    let collection = streets.borrow().clone();
    *index.borrow_mut() = Some(StreetIndex::build(collection));
}

#[when("I look for candidates near the eastern street")]
fn when_candidates(
    #[from(index)] index: &RefCell<Option<BuildResult>>,
    #[from(found)] found: &RefCell<Vec<String>>,
) {
    let ids = with_index(index, |built| {
        built
            .nearest_candidates(Coord { x: -76.9994, y: 38.9005 }, 1.0)
            .iter()
            .map(|c| c.street.id().to_string())
            .collect::<Vec<_>>()
    });
    *found.borrow_mut() = ids;
}

#[when("I ask which street contains a point in the western square")]
fn when_containing(
    #[from(index)] index: &RefCell<Option<BuildResult>>,
    #[from(found)] found: &RefCell<Vec<String>>,
) {
    let ids = with_index(index, |built| {
        built
            .containing(Coord { x: -77.0015, y: 38.9005 })
            .map(|s| s.id().to_string())
            .into_iter()
            .collect::<Vec<_>>()
    });
    *found.borrow_mut() = ids;
}

#[then("the eastern street is the first candidate")]
fn then_east_first(#[from(found)] found: &RefCell<Vec<String>>) {
    assert_eq!(found.borrow().first().map(String::as_str), Some("east"));
}

#[then("the western street is the second candidate")]
fn then_west_second(#[from(found)] found: &RefCell<Vec<String>>) {
    assert_eq!(found.borrow().get(1).map(String::as_str), Some("west"));
}

#[then("the western street contains the point")]
fn then_west_contains(#[from(found)] found: &RefCell<Vec<String>>) {
    assert_eq!(*found.borrow(), vec![String::from("west")]);
}

#[then("the index holds three streets")]
fn then_three_streets(#[from(index)] index: &RefCell<Option<BuildResult>>) {
    assert_eq!(with_index(index, StreetIndex::len), 3);
}

#[then("one street was skipped")]
fn then_one_skipped(#[from(index)] index: &RefCell<Option<BuildResult>>) {
    assert_eq!(with_index(index, StreetIndex::skipped), 1);
}

#[then("building fails because the collection is empty")]
fn then_empty_error(#[from(index)] index: &RefCell<Option<BuildResult>>) {
    assert!(matches!(
        index.borrow().as_ref(),
        Some(Err(StreetIndexError::Empty))
    ));
}

#[scenario(path = "tests/features/street_index.feature", index = 0)]
fn scenario_nearest_first(
    streets: RefCell<Vec<StreetPolygon>>,
    index: RefCell<Option<BuildResult>>,
    found: RefCell<Vec<String>>,
) {
    let _ = (streets, index, found);
}

#[scenario(path = "tests/features/street_index.feature", index = 1)]
fn scenario_containment(
    streets: RefCell<Vec<StreetPolygon>>,
    index: RefCell<Option<BuildResult>>,
    found: RefCell<Vec<String>>,
) {
    let _ = (streets, index, found);
}

#[scenario(path = "tests/features/street_index.feature", index = 2)]
fn scenario_broken_ring(
    streets: RefCell<Vec<StreetPolygon>>,
    index: RefCell<Option<BuildResult>>,
    found: RefCell<Vec<String>>,
) {
    let _ = (streets, index, found);
}

#[scenario(path = "tests/features/street_index.feature", index = 3)]
fn scenario_empty(
    streets: RefCell<Vec<StreetPolygon>>,
    index: RefCell<Option<BuildResult>>,
    found: RefCell<Vec<String>>,
) {
    let _ = (streets, index, found);
}
