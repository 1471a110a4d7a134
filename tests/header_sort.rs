//! Collection-level ordering contract: classify once per record, then
//! stable-sort with the O(1) key comparator.

use fitsprop::{classify, compare, DicbClass, Property, ValueType};

fn keyword(name: &str) -> Property {
    let mut p = Property::new(name, ValueType::String).unwrap();
    p.set_sort_key(classify(p.name()));
    p
}

#[test]
fn header_sorts_into_dicb_order() {
    let mut header: Vec<Property> = [
        "END",
        "COMMENT",
        "HISTORY",
        "ESO XYZ FOO",
        "ESO OBS ID",
        "ESO DPR TYPE",
        "NAXIS1",
        "NAXIS",
        "SIMPLE",
    ]
    .iter()
    .map(|n| keyword(n))
    .collect();

    header.sort_by(|a, b| compare(a.sort_key(), b.sort_key()));

    let order: Vec<&str> = header.iter().map(|p| p.name()).collect();
    assert_eq!(
        order,
        [
            "SIMPLE",
            "NAXIS",
            "NAXIS1",
            "ESO DPR TYPE",
            "ESO OBS ID",
            "ESO XYZ FOO",
            "HISTORY",
            "COMMENT",
            "END",
        ]
    );
}

#[test]
fn stable_sort_keeps_order_within_a_class() {
    let mut header = vec![
        keyword("NAXIS2"),
        keyword("NAXIS1"),
        keyword("SIMPLE"),
    ];
    assert_eq!(
        compare(header[0].sort_key(), header[1].sort_key()),
        std::cmp::Ordering::Equal
    );

    header.sort_by(|a, b| compare(a.sort_key(), b.sort_key()));
    let order: Vec<&str> = header.iter().map(|p| p.name()).collect();
    // NAXIS2 stays ahead of NAXIS1: same class, stable sort
    assert_eq!(order, ["SIMPLE", "NAXIS2", "NAXIS1"]);
}

#[test]
fn unclassified_records_are_unordered() {
    let fresh = Property::new("ANYTHING", ValueType::Int32).unwrap();
    let classified = keyword("SIMPLE");
    assert_eq!(fresh.sort_key(), DicbClass::Unclassified);
    assert_eq!(
        compare(fresh.sort_key(), classified.sort_key()),
        std::cmp::Ordering::Equal
    );
    assert_eq!(
        compare(fresh.sort_key(), fresh.sort_key()),
        std::cmp::Ordering::Equal
    );
}

#[test]
fn records_survive_a_full_populate_sort_read_cycle() {
    let mut simple = Property::new("SIMPLE", ValueType::Bool).unwrap();
    simple.set_bool(true).unwrap();
    simple.set_comment("file does conform to FITS standard");

    let mut naxis = Property::new("NAXIS", ValueType::Int32).unwrap();
    naxis.set_i32(2).unwrap();

    let mut object = Property::new("OBJECT", ValueType::String).unwrap();
    object.set_str("M31").unwrap();

    let mut dpr = Property::new("ESO DPR TYPE", ValueType::String).unwrap();
    dpr.set_str("OBJECT").unwrap();

    let mut header = vec![dpr, object, naxis, simple];
    for p in &mut header {
        p.set_sort_key(classify(p.name()));
    }
    header.sort_by(|a, b| compare(a.sort_key(), b.sort_key()));

    let order: Vec<&str> = header.iter().map(|p| p.name()).collect();
    assert_eq!(order, ["SIMPLE", "NAXIS", "OBJECT", "ESO DPR TYPE"]);
    assert!(header[0].get_bool().unwrap());
    assert_eq!(header[1].get_i64().unwrap(), 2);
    assert_eq!(header[2].get_str().unwrap(), "M31");
    assert_eq!(
        header[3].comment(),
        None,
    );
}
