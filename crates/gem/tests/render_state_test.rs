//! Render traversal and cache behaviour through the public API.

use gem::*;
use proptest::prelude::*;

fn patch() -> Patch {
    Patch::new(Settings::defaults(), StoreRegistry::new())
}

#[test]
fn nodes_see_upstream_state() {
    let mut patch = patch();
    patch.create("GEMglEnable", &["GL_DEPTH_TEST".into()]).unwrap();
    let depth = patch.create("GEMglDepthFunc", &["GL_GREATER".into()]).unwrap();
    patch.create("GEMglColor4f", &[Atom::Float(1.0), Atom::Float(0.0), Atom::Float(0.0), Atom::Float(1.0)])
        .unwrap();

    let state = patch.render();
    assert!(state.is_enabled(gl::GL_DEPTH_TEST));
    assert_eq!(state.depth_func(), gl::GL_GREATER);
    assert_eq!(state.color(), Vec4::new(1.0, 0.0, 0.0, 1.0));
    let Handle::Node(depth_id) = depth else {
        panic!("expected a node handle");
    };
    assert_eq!(state.last_modifier(StateCategory::Depth), Some(depth_id));
}

#[test]
fn invalid_update_leaves_state_unchanged() {
    let mut patch = patch();
    let depth = patch.create("GEMglDepthFunc", &["GL_EQUAL".into()]).unwrap();
    patch.render();

    let err = patch.send(&depth, "func", &["GL_SIDEWAYS".into()]).unwrap_err();
    assert!(matches!(err, Error::Node(GemError::UnknownToken(_))));
    assert_eq!(patch.render().depth_func(), gl::GL_EQUAL);
}

#[test]
fn one_argument_nodes_reject_two() {
    let settings = Settings::defaults();
    let registry = StoreRegistry::new();
    for class in ["GEMglDepthFunc", "GEMglEnable", "GEMglDisable", "GEMglLineWidth"] {
        let result = create_node(class, &[Atom::Float(1.0), Atom::Float(2.0)], &settings, &registry);
        assert!(
            matches!(result, Err(GemError::InvalidConfiguration { .. })),
            "{class} accepted two arguments"
        );
    }
}

#[test]
fn oversized_scope_is_refused() {
    let mut patch = patch();
    let err = patch.create("scopeXYZ~", &[Atom::Float(2.0e9)]).unwrap_err();
    assert!(matches!(err, Error::Node(GemError::InvalidConfiguration { .. })));

    let scope = patch.create("scopeXYZ~", &[Atom::Float(8.0)]).unwrap();
    let err = patch.send(&scope, "length", &[Atom::Float(2.0e9)]).unwrap_err();
    assert!(matches!(err, Error::Node(GemError::InvalidArgument { .. })));
}

#[test]
fn later_nodes_override_earlier_ones() {
    let mut patch = patch();
    patch.create("GEMglDepthFunc", &["GL_NEVER".into()]).unwrap();
    let second = patch.create("GEMglDepthFunc", &["GL_ALWAYS".into()]).unwrap();
    patch.create("GEMglTexCoord4sv", &[Atom::Float(1.0), Atom::Float(2.0)]).unwrap();

    let state = patch.render();
    assert_eq!(state.depth_func(), gl::GL_ALWAYS);
    assert_eq!(state.tex_coord(), [1, 2, 0, 0]);
    assert_eq!(Handle::Node(state.last_modifier(StateCategory::Depth).unwrap()), second);
}

#[test]
fn cache_replays_unmodified_nodes() {
    let mut patch = patch();
    let width = patch.create("GEMglLineWidth", &[Atom::Float(2.0)]).unwrap();
    patch.create("GEMglDepthFunc", &[]).unwrap();

    let first = patch.render().calls().to_vec();
    let stats = patch.cache_stats();
    assert_eq!((stats.hits, stats.misses), (0, 2));

    let second = patch.render().calls().to_vec();
    assert_eq!(first, second);
    assert_eq!(patch.cache_stats().hits, 2);

    patch.send(&width, "width", &[Atom::Float(5.0)]).unwrap();
    let third = patch.render();
    assert!((third.line_width() - 5.0).abs() < f32::EPSILON);
    assert_eq!(patch.cache_stats().misses, 3);
}

#[test]
fn removed_nodes_stop_rendering() {
    let mut patch = patch();
    let node = patch.create("GEMglEnable", &["GL_FOG".into()]).unwrap();
    assert!(patch.render().is_enabled(gl::GL_FOG));
    assert!(patch.remove(&node));
    assert!(!patch.render().is_enabled(gl::GL_FOG));
    assert!(patch.send(&node, "cap", &["GL_BLEND".into()]).is_err());
}

#[test]
fn frame_plan_from_scope() {
    let mut patch = patch();
    patch.create("GEMglEnable", &["GL_DEPTH_TEST".into()]).unwrap();
    let mut scope = ScopeXyz::new(&[Atom::Float(4.0)]).unwrap();
    scope.feed(&[0.0, 1.0, 2.0, 3.0], &[0.0; 4], &[0.0; 4]);
    patch.push(Box::new(scope));

    patch.render();
    let plan = patch.plan(wgpu::TextureFormat::Depth32Float).unwrap();
    assert!(plan.depth_stencil.is_some());
    assert_eq!(plan.draws.len(), 1);
    assert_eq!(plan.vertex_count(), 4);
    assert!((plan.draws[0].1.line_width - 1.0).abs() < f32::EPSILON);
}

#[test]
fn text_follows_modelview() {
    let mut patch = patch();
    let text = patch.create("text3d", &[]).unwrap();
    patch.send(&text, "text", &["hi".into()]).unwrap();

    let moved = Mat4::from_translation(Vec3::X);
    let state = patch.render_with(|s| s.set_modelview(moved));
    let Some(GlCall::DrawText(draw)) = state.calls().first() else {
        panic!("expected a text draw");
    };
    assert_eq!(draw.transform, moved);
    assert_eq!(draw.font, "vera.ttf");

    let state = patch.render();
    let Some(GlCall::DrawText(draw)) = state.calls().first() else {
        panic!("expected a text draw");
    };
    assert_eq!(draw.transform, Mat4::IDENTITY);
}

#[derive(Debug, Clone)]
enum Msg {
    Depth(u32),
    Width(f32),
    Cap(bool),
}

fn msg() -> impl Strategy<Value = Msg> {
    prop_oneof![
        (gl::GL_NEVER..=gl::GL_ALWAYS).prop_map(Msg::Depth),
        (0.5f32..10.0).prop_map(Msg::Width),
        any::<bool>().prop_map(Msg::Cap),
    ]
}

fn apply_msg(patch: &mut Patch, handles: &[Handle; 3], m: &Msg) {
    match m {
        Msg::Depth(f) => patch.send(&handles[0], "func", &[Atom::Float(*f as f32)]),
        Msg::Width(w) => patch.send(&handles[1], "width", &[Atom::Float(*w)]),
        Msg::Cap(blend) => {
            let cap = if *blend { "GL_BLEND" } else { "GL_FOG" };
            patch.send(&handles[2], "cap", &[cap.into()])
        }
    }
    .unwrap();
}

fn build(caching: bool) -> (Patch, [Handle; 3]) {
    let mut patch = patch();
    patch.set_caching(caching);
    let handles = [
        patch.create("GEMglDepthFunc", &[]).unwrap(),
        patch.create("GEMglLineWidth", &[]).unwrap(),
        patch.create("GEMglEnable", &["GL_CULL_FACE".into()]).unwrap(),
    ];
    (patch, handles)
}

proptest! {
    #[test]
    fn cached_frames_match_uncached(frames in prop::collection::vec(prop::collection::vec(msg(), 0..3), 1..6)) {
        let (mut cached, ch) = build(true);
        let (mut plain, ph) = build(false);
        for messages in &frames {
            for m in messages {
                apply_msg(&mut cached, &ch, m);
                apply_msg(&mut plain, &ph, m);
            }
            let a = cached.render().calls().to_vec();
            let b = plain.render().calls().to_vec();
            prop_assert_eq!(a, b);
        }
    }
}
