use crate::{
    butterfly::{ButterflyUnit, ValidatingButterfly},
    coordinate::Coordinate,
    error::{NetworkError, Result},
    tags::{Tag, TagSet},
};

fn tags() -> TagSet {
    [Tag::Forward, Tag::Poly(1), Tag::Level(0)].into_iter().collect()
}

fn unit() -> Coordinate {
    Coordinate::new(1, 2, 13, 4, TagSet::empty()).unwrap()
}

fn inputs(tags: TagSet) -> Vec<Coordinate> {
    (0..4)
        .map(|j| Coordinate::new(1, 3, j * 16 + 13, 4, tags).unwrap())
        .collect()
}

#[test]
fn validating_outputs() {
    let out: Vec<Coordinate> = ValidatingButterfly.compute(&inputs(tags()), &unit()).unwrap();
    assert_eq!(out.len(), 4);
    out.iter().enumerate().for_each(|(i, c)| {
        assert_eq!((c.stage(), c.length(), c.value()), (0, 3, 13 * 4 + i));
        assert_eq!(c.tags(), tags());
    });
}

#[test]
fn validating_rejects() {
    let bu: ValidatingButterfly = ValidatingButterfly;

    println!("test validating_rejects: input count");
    assert!(matches!(
        bu.compute(&inputs(tags())[..3], &unit()),
        Err(NetworkError::Bounds { .. })
    ));

    println!("test validating_rejects: position");
    let mut swapped: Vec<Coordinate> = inputs(tags());
    swapped.swap(1, 2);
    assert!(matches!(
        bu.compute(&swapped, &unit()),
        Err(NetworkError::InvariantViolation(_))
    ));

    println!("test validating_rejects: membership");
    let mut foreign: Vec<Coordinate> = inputs(tags());
    foreign[3] = Coordinate::new(1, 3, 3 * 16 + 12, 4, tags()).unwrap();
    assert!(matches!(
        bu.compute(&foreign, &unit()),
        Err(NetworkError::InvariantViolation(_))
    ));

    println!("test validating_rejects: tags");
    let mut mixed: Vec<Coordinate> = inputs(tags());
    mixed[2] = mixed[2].with_tags(tags().with(Tag::Level(1)));
    assert!(matches!(
        bu.compute(&mixed, &unit()),
        Err(NetworkError::InvariantViolation(_))
    ));
}

#[test]
fn closure_butterfly() {
    let reversed = |inputs: &[Coordinate], unit: &Coordinate| -> Result<Vec<Coordinate>> {
        let mut out: Vec<Coordinate> = ValidatingButterfly.compute(inputs, unit)?;
        out.reverse();
        Ok(out)
    };
    let out: Vec<Coordinate> = reversed.compute(&inputs(tags()), &unit()).unwrap();
    assert_eq!(out[0].value(), 13 * 4 + 3);
    assert_eq!(out[3].value(), 13 * 4);
}
