use crate::core::shell::grabs::*;

#[test]
fn test_valid_edge_masks() {
    for edges in [
        EDGE_TOP,
        EDGE_BOTTOM,
        EDGE_LEFT,
        EDGE_RIGHT,
        EDGE_TOP | EDGE_LEFT,
        EDGE_TOP | EDGE_RIGHT,
        EDGE_BOTTOM | EDGE_LEFT,
        EDGE_BOTTOM | EDGE_RIGHT,
    ] {
        assert!(valid_resize_edges(edges), "edges {:#x} should be valid", edges);
    }
}

#[test]
fn test_invalid_edge_masks() {
    // Zero, out of range, and opposite-edge combinations.
    for edges in [0, 16, 255, 3, 12, 7, 11, 13, 14, 15] {
        assert!(!valid_resize_edges(edges), "edges {:#x} should be invalid", edges);
    }
}

#[test]
fn test_resize_right_edge_grows_with_pointer() {
    let (w, h) = resize_dimensions(EDGE_RIGHT, 100, 100, 130, 100, 200, 150);
    assert_eq!((w, h), (230, 150));
}

#[test]
fn test_resize_left_edge_grows_against_pointer() {
    let (w, h) = resize_dimensions(EDGE_LEFT, 100, 100, 70, 100, 200, 150);
    assert_eq!((w, h), (230, 150));
}

#[test]
fn test_resize_bottom_edge() {
    let (w, h) = resize_dimensions(EDGE_BOTTOM, 100, 100, 100, 140, 200, 150);
    assert_eq!((w, h), (200, 190));
}

#[test]
fn test_resize_top_edge() {
    let (w, h) = resize_dimensions(EDGE_TOP, 100, 100, 100, 60, 200, 150);
    assert_eq!((w, h), (200, 190));
}

#[test]
fn test_resize_corner_moves_both() {
    let (w, h) = resize_dimensions(EDGE_BOTTOM | EDGE_RIGHT, 0, 0, 25, 35, 100, 100);
    assert_eq!((w, h), (125, 135));
}

#[test]
fn test_resize_can_go_negative() {
    // Dimensions are suggestions; clamping is the client's call.
    let (w, h) = resize_dimensions(EDGE_RIGHT, 100, 0, 0, 0, 50, 50);
    assert_eq!((w, h), (-50, 50));
}
