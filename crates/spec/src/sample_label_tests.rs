// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn accepts_three_dash_separated_fields() {
    let label = SampleLabel::parse("GroupA-Rep1-Tech1").unwrap();
    assert_eq!(label.as_str(), "GroupA-Rep1-Tech1");
}

#[test]
fn rejects_two_fields() {
    let err = SampleLabel::parse("GroupA-Rep1").unwrap_err();
    assert_eq!(err, "GroupA-Rep1");
}

#[test]
fn rejects_four_fields() {
    assert!(SampleLabel::parse("GroupA-Rep1-Tech1-Extra").is_err());
}

#[test]
fn rejects_empty_field() {
    assert!(SampleLabel::parse("GroupA--Tech1").is_err());
    assert!(SampleLabel::parse("-Rep1-Tech1").is_err());
}

#[test]
fn components_splits_on_first_two_dashes() {
    let label = SampleLabel::parse("Group-A-Rep1-Tech1").unwrap_err();
    assert_eq!(label, "Group-A-Rep1-Tech1");

    let label = SampleLabel::parse("GroupA-Rep1-Tech1").unwrap();
    assert_eq!(label.components(), ("GroupA", "Rep1", "Tech1"));
}

#[test]
fn display_renders_raw_string() {
    let label = SampleLabel::parse("g-b-t").unwrap();
    assert_eq!(label.to_string(), "g-b-t");
}
