use crate::core::render::host::HeadlessGraphics;
use crate::core::render::node::NodeAnchor;
use crate::core::state::CompositorState;
use crate::core::surface::MapState;
use crate::util::geometry::Rect;

fn state_with_output() -> CompositorState {
    let mut state = CompositorState::new(Box::new(HeadlessGraphics::new()));
    state.add_output(Rect::new(0, 0, 800, 600));
    state
}

#[test]
fn test_surface_starts_unmapped_and_hidden() {
    let mut state = state_with_output();
    let id = state.create_surface(None);

    let surface = state.surface(id).unwrap();
    assert_eq!(surface.map_state, MapState::Unmapped);
    let node = state.scene.node(surface.node).unwrap();
    assert!(!node.visible);
    assert!(!node.reactive);
}

#[test]
fn test_map_toplevel_shows_surface() {
    let mut state = state_with_output();
    let id = state.create_surface(None);

    state.surface_map_toplevel(id);

    let surface = state.surface(id).unwrap();
    assert_eq!(surface.map_state, MapState::Toplevel);
    let node = state.scene.node(surface.node).unwrap();
    assert!(node.visible);
    assert!(node.reactive);
    assert!(node.anchor.is_none());
}

#[test]
fn test_map_transient_anchors_to_parent() {
    let mut state = state_with_output();
    let parent = state.create_surface(None);
    let child = state.create_surface(None);
    state.surface_map_toplevel(parent);
    state.move_surface(parent, 100, 50);

    state.surface_map_transient(child, parent, 10, 20, 0);

    let surface = state.surface(child).unwrap();
    assert_eq!(surface.map_state, MapState::Transient { parent, dx: 10, dy: 20 });
    let node = state.scene.node(surface.node).unwrap();
    assert_eq!((node.x, node.y), (110, 70));

    // The anchor follows the parent on the next layout pass.
    state.move_surface(parent, 0, 0);
    state.scene.layout();
    let node = state.scene.node(state.surface(child).unwrap().node).unwrap();
    assert_eq!((node.x, node.y), (10, 20));
}

#[test]
fn test_map_transient_missing_parent_stays_unmapped() {
    let mut state = state_with_output();
    let id = state.create_surface(None);

    state.surface_map_transient(id, 999, 0, 0, 0);

    assert_eq!(state.surface(id).unwrap().map_state, MapState::Unmapped);
}

#[test]
fn test_map_transient_same_parent_is_idempotent() {
    let mut state = state_with_output();
    let parent = state.create_surface(None);
    let child = state.create_surface(None);
    state.surface_map_toplevel(parent);
    state.surface_map_transient(child, parent, 10, 20, 0);

    // A second map with the same parent must not move the surface.
    state.surface_map_transient(child, parent, 50, 60, 0);

    assert_eq!(
        state.surface(child).unwrap().map_state,
        MapState::Transient { parent, dx: 10, dy: 20 }
    );
}

#[test]
fn test_map_fullscreen_fills_output() {
    let mut state = state_with_output();
    let id = state.create_surface(None);

    state.surface_map_fullscreen(id);

    let surface = state.surface(id).unwrap();
    assert_eq!(surface.map_state, MapState::Fullscreen);
    let node = state.scene.node(surface.node).unwrap();
    assert_eq!((node.x, node.y), (0, 0));
    assert_eq!((node.width, node.height), (800, 600));

    // Fullscreen tracks output geometry.
    state.set_output_geometry(1, Rect::new(0, 0, 1024, 768));
    let node = state.scene.node(state.surface(id).unwrap().node).unwrap();
    assert_eq!((node.width, node.height), (1024, 768));
}

#[test]
fn test_fullscreen_to_toplevel_clears_anchor() {
    let mut state = state_with_output();
    let id = state.create_surface(None);
    state.surface_map_fullscreen(id);

    state.surface_map_toplevel(id);

    let surface = state.surface(id).unwrap();
    assert_eq!(surface.map_state, MapState::Toplevel);
    let node = state.scene.node(surface.node).unwrap();
    assert!(node.anchor.is_none());
}

#[test]
fn test_transient_to_fullscreen_replaces_anchor() {
    let mut state = state_with_output();
    let parent = state.create_surface(None);
    let child = state.create_surface(None);
    state.surface_map_toplevel(parent);
    state.surface_map_transient(child, parent, 10, 20, 0);

    state.surface_map_fullscreen(child);

    let node = state.scene.node(state.surface(child).unwrap().node).unwrap();
    assert!(matches!(node.anchor, Some(NodeAnchor::Fill { .. })));
}

#[test]
fn test_destroy_removes_node() {
    let mut state = state_with_output();
    let id = state.create_surface(None);
    let node = state.surface(id).unwrap().node;

    state.destroy_surface(id, 0);

    assert!(state.surface(id).is_none());
    assert!(state.scene.node(node).is_none());
}
