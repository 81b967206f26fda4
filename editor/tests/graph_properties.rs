use std::sync::atomic::{AtomicUsize, Ordering};

use ragdoll_editor::{CreateParams, GraphEditor, Selection};
use ragdoll_shared::{
    AssetError, BoneVertInfo, BoneVertTable, ConvexDecomposer, ConvexElem, GeomKind,
    PhysicsAsset, RefSkeleton, SkeletonView, Vec3,
};

/// A box-shaped vertex cloud from `min` to `max`, rigidly bound.
fn cloud(min: Vec3, max: Vec3) -> BoneVertInfo {
    let mut positions = Vec::new();
    for &x in &[min.x, max.x] {
        for &y in &[min.y, max.y] {
            for &z in &[min.z, max.z] {
                positions.push(Vec3::new(x, y, z));
            }
        }
    }
    BoneVertInfo::from_positions(positions)
}

fn limb(len: f32) -> BoneVertInfo {
    cloud(Vec3::new(-2.0, -2.0, 0.0), Vec3::new(2.0, 2.0, len))
}

// pelvis ── spine ── neck ── head
//   ├─ thigh_L ── calf_L
//   └─ thigh_R ── calf_R
fn humanoid() -> (RefSkeleton, BoneVertTable) {
    let skel = RefSkeleton::new()
        .with_bone("pelvis", None, Vec3::new(0.0, 0.0, 100.0))
        .and_then(|s| s.with_bone("spine", Some("pelvis"), Vec3::new(0.0, 0.0, 15.0)))
        .and_then(|s| s.with_bone("neck", Some("spine"), Vec3::new(0.0, 0.0, 30.0)))
        .and_then(|s| s.with_bone("head", Some("neck"), Vec3::new(0.0, 0.0, 8.0)))
        .and_then(|s| s.with_bone("thigh_L", Some("pelvis"), Vec3::new(10.0, 0.0, 0.0)))
        .and_then(|s| s.with_bone("calf_L", Some("thigh_L"), Vec3::new(0.0, 0.0, -45.0)))
        .and_then(|s| s.with_bone("thigh_R", Some("pelvis"), Vec3::new(-10.0, 0.0, 0.0)))
        .and_then(|s| s.with_bone("calf_R", Some("thigh_R"), Vec3::new(0.0, 0.0, -45.0)))
        .expect("valid skeleton");

    let mut verts = BoneVertTable::with_bone_count(skel.bone_count());
    for (name, len) in [
        ("pelvis", 15.0),
        ("spine", 30.0),
        ("neck", 8.0),
        ("head", 20.0),
        ("thigh_L", -45.0),
        ("calf_L", -45.0),
        ("thigh_R", -45.0),
        ("calf_R", -45.0),
    ] {
        let bone = skel.find_bone_index(name).expect("bone exists");
        verts.set_rigid(bone, limb(len));
    }
    (skel, verts)
}

fn built() -> GraphEditor<RefSkeleton> {
    let (skel, verts) = humanoid();
    let mut ed = GraphEditor::new(skel, verts);
    ed.build_from_skeleton().expect("import succeeds");
    ed
}

fn assert_indices_consistent(asset: &PhysicsAsset) {
    for (i, body) in asset.bodies().bodies().iter().enumerate() {
        assert_eq!(asset.bodies().find_body_index(body.bone_name()), Some(i));
    }
    for (i, j) in asset.collision().pairs() {
        assert!(i < j);
        assert!(j < asset.body_count());
        assert!(!asset.is_collision_enabled(i, j));
        assert!(!asset.is_collision_enabled(j, i));
    }
    asset.check_consistency().expect("consistent asset");
}

#[test]
fn single_large_root_makes_one_body() {
    let skel = RefSkeleton::new()
        .with_bone("root", None, Vec3::zeros())
        .expect("valid skeleton");
    let mut verts = BoneVertTable::with_bone_count(1);
    verts.set_rigid(
        0,
        BoneVertInfo::from_positions(vec![Vec3::new(-20.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0)]),
    );
    let mut ed = GraphEditor::new(skel, verts);
    assert_eq!(ed.build_from_skeleton(), Ok(1));
    assert_eq!(ed.asset().body_count(), 1);
    assert_eq!(ed.asset().constraint_count(), 0);
}

#[test]
fn import_builds_a_connected_ragdoll() {
    let ed = built();
    let asset = ed.asset();
    assert_eq!(asset.body_count(), 8);
    assert_eq!(asset.constraint_count(), 7);
    for c in asset.constraints().constraints() {
        let a = asset.bodies().find_body_index(&c.bone_a).expect("child body");
        let b = asset.bodies().find_body_index(&c.bone_b).expect("parent body");
        assert!(!asset.is_collision_enabled(a, b), "joint {} collides", c.joint_name);
    }
    ed.validate().expect("hierarchy rule holds");
    assert_indices_consistent(asset);
}

#[test]
fn indices_stay_consistent_through_edits() {
    let mut ed = built();
    assert_indices_consistent(ed.asset());

    let spine = ed.asset().bodies().find_body_index("spine").expect("spine body");
    ed.delete_body(spine).expect("delete spine");
    assert_indices_consistent(ed.asset());

    let spine_bone = ed.skeleton().find_bone_index("spine").expect("spine bone");
    ed.make_body(spine_bone).expect("re-add spine");
    assert_indices_consistent(ed.asset());
    ed.validate().expect("spine re-inserted between pelvis and neck");

    let calf = ed.asset().bodies().find_body_index("calf_R").expect("calf body");
    let thigh = ed.asset().bodies().find_body_index("thigh_R").expect("thigh body");
    ed.weld_bodies(thigh, calf).expect("weld leg");
    assert_indices_consistent(ed.asset());

    let head = ed.asset().bodies().find_body_index("head").expect("head body");
    ed.delete_body(head).expect("delete head");
    assert_indices_consistent(ed.asset());
}

#[test]
fn deleting_a_middle_body_reparents_its_child() {
    let skel = RefSkeleton::new()
        .with_bone("a", None, Vec3::zeros())
        .and_then(|s| s.with_bone("b", Some("a"), Vec3::new(0.0, 0.0, 20.0)))
        .and_then(|s| s.with_bone("c", Some("b"), Vec3::new(0.0, 0.0, 20.0)))
        .expect("valid skeleton");
    let mut verts = BoneVertTable::with_bone_count(3);
    for bone in 0..3 {
        verts.set_rigid(bone, limb(20.0));
    }
    let mut ed = GraphEditor::new(skel.clone(), verts.clone());
    ed.build_from_skeleton().expect("import");
    assert_eq!(ed.asset().constraint_count(), 2);

    // Give the b-c joint distinctive limits.
    let mut asset = ed.into_asset();
    let bc = asset.constraints().find_constraint_index("c").expect("b-c joint");
    let limits = {
        let profile = &mut asset.constraint_at_mut(bc).expect("joint").profile;
        profile.angular.swing1_limit_deg = 27.0;
        profile.linear.limit = 3.0;
        profile.clone()
    };
    let mut ed = GraphEditor::with_asset(asset, skel, verts);

    ed.delete_body(1).expect("delete b");

    let asset = ed.asset();
    let names: Vec<&str> = asset.bodies().bodies().iter().map(|b| b.bone_name()).collect();
    assert_eq!(names, vec!["a", "c"]);
    assert_eq!(asset.constraint_count(), 1);
    let c = asset.constraint_at(0).expect("a-c joint");
    assert_eq!((c.bone_a.as_str(), c.bone_b.as_str()), ("c", "a"));
    assert_eq!(c.profile, limits);
    assert!((c.frame_b.translation - Vec3::new(0.0, 0.0, 40.0)).norm() < 1.0e-4);
    assert!(!asset.is_collision_enabled(0, 1));
    assert!(asset.constraints().find_constraint_index("b").is_none());
}

#[test]
fn weld_keeps_every_shape() {
    let mut ed = built();
    let spine = ed.asset().bodies().find_body_index("spine").expect("spine");
    let neck = ed.asset().bodies().find_body_index("neck").expect("neck");
    let expected = ed.asset().body_at(spine).expect("spine").geom.element_count()
        + ed.asset().body_at(neck).expect("neck").geom.element_count();

    let merged = ed.weld_bodies(spine, neck).expect("weld");
    assert_eq!(ed.asset().body_at(merged).expect("merged").geom.element_count(), expected);
    assert!(ed.asset().bodies().find_body_index("neck").is_none());
    assert_eq!(ed.asset().body_count(), 7);
    assert_eq!(ed.asset().constraint_count(), 6);
    assert!(ed.validate().is_ok());

    let thigh = ed.asset().bodies().find_body_index("thigh_L").expect("thigh");
    let head = ed.asset().bodies().find_body_index("head").expect("head");
    assert_eq!(
        ed.weld_bodies(thigh, head),
        Err(AssetError::NotAdjacent { base: thigh, add: head })
    );
}

#[test]
fn deletion_remaps_exclusions_monotonically() {
    let mut ed = built();
    let count = ed.asset().body_count();
    ed.set_collision_between_selected(&(0..count).collect::<Vec<_>>(), false)
        .expect("disable all");
    let before: Vec<(usize, usize)> = ed.asset().collision().pairs().collect();

    let k = 3;
    ed.delete_body(k).expect("delete");
    let shift = |x: usize| if x > k { x - 1 } else { x };
    let expected: Vec<(usize, usize)> = before
        .iter()
        .filter(|&&(i, j)| i != k && j != k)
        .map(|&(i, j)| (shift(i), shift(j)))
        .collect();
    let after: Vec<(usize, usize)> = ed.asset().collision().pairs().collect();
    assert_eq!(after, expected);
}

#[test]
fn mirror_round_trip_restores_geometry() {
    let mut ed = built();
    let thigh_l = ed.asset().bodies().find_body_index("thigh_L").expect("thigh_L");
    let original = ed.asset().body_at(thigh_l).expect("body").geom.clone();

    let out = ed.mirror_selection(&[Selection::Body(thigh_l)]).expect("mirror");
    let thigh_r = out[0];
    let mirrored = ed.asset().body_at(thigh_r).expect("body").geom.clone();
    assert_eq!(ed.asset().body_at(thigh_r).expect("body").bone_name(), "thigh_R");
    assert_eq!(mirrored.capsules.len(), original.capsules.len());
    for (m, o) in mirrored.capsules.iter().zip(&original.capsules) {
        assert_eq!(m.radius, o.radius);
        assert_eq!(m.length, o.length);
    }

    ed.mirror_selection(&[Selection::Body(thigh_r)]).expect("mirror back");
    let restored = &ed.asset().body_at(thigh_l).expect("body").geom;
    for (r, o) in restored.capsules.iter().zip(&original.capsules) {
        assert!((r.center - o.center).norm() < 1.0e-4);
        assert!(ragdoll_shared::types::same_rotation(&r.rotation, &o.rotation, 1.0e-4));
    }
    assert_eq!(ed.asset().body_count(), 8);
}

#[test]
fn import_is_deterministic() {
    let a = built().into_asset();
    let b = built().into_asset();
    assert_eq!(a, b);
}

#[test]
fn every_primitive_kind_imports() {
    for kind in [GeomKind::Box, GeomKind::Sphere, GeomKind::SingleConvexHull] {
        let (skel, verts) = humanoid();
        let params = CreateParams {
            geom_kind: kind,
            ..CreateParams::default()
        };
        let mut ed = GraphEditor::new(skel, verts).with_params(params);
        assert_eq!(ed.build_from_skeleton(), Ok(8), "{kind:?}");
        assert!(ed
            .asset()
            .bodies()
            .bodies()
            .iter()
            .all(|b| b.geom.element_count() == 1));
    }
}

struct BrokenDecomposer;

impl ConvexDecomposer for BrokenDecomposer {
    fn decompose(
        &self,
        _vertices: &[Vec3],
        _triangles: &[[u32; 3]],
        _accuracy: f32,
        _max_hull_verts: u32,
    ) -> Result<Vec<ConvexElem>, AssetError> {
        Err(AssetError::DecompositionFailed {
            reason: "unavailable".into(),
        })
    }
}

#[test]
fn decomposition_failure_aborts_import() {
    let (skel, verts) = humanoid();
    let params = CreateParams {
        geom_kind: GeomKind::MultiConvexHull,
        ..CreateParams::default()
    };
    let mut ed = GraphEditor::new(skel, verts)
        .with_params(params)
        .with_decomposer(Box::new(BrokenDecomposer));
    assert!(matches!(
        ed.build_from_skeleton(),
        Err(AssetError::DecompositionFailed { .. })
    ));
}

/// Hulls the first bone it is given, then fails.
#[derive(Default)]
struct FailsAfterFirst {
    calls: AtomicUsize,
}

impl ConvexDecomposer for FailsAfterFirst {
    fn decompose(
        &self,
        vertices: &[Vec3],
        _triangles: &[[u32; 3]],
        _accuracy: f32,
        _max_hull_verts: u32,
    ) -> Result<Vec<ConvexElem>, AssetError> {
        if self.calls.fetch_add(1, Ordering::Relaxed) == 0 {
            return Ok(vec![ConvexElem::new(vertices.to_vec())]);
        }
        Err(AssetError::DecompositionFailed {
            reason: "out of budget".into(),
        })
    }
}

#[test]
fn failure_midway_through_import_leaves_the_asset_untouched() {
    let (skel, verts) = humanoid();
    let params = CreateParams {
        geom_kind: GeomKind::MultiConvexHull,
        ..CreateParams::default()
    };
    let mut ed = GraphEditor::new(skel, verts)
        .with_params(params)
        .with_decomposer(Box::new(FailsAfterFirst::default()));
    assert!(matches!(
        ed.build_from_skeleton(),
        Err(AssetError::DecompositionFailed { .. })
    ));
    assert_eq!(ed.asset().body_count(), 0);
    assert_eq!(ed.asset().constraint_count(), 0);
    assert!(ed.asset().collision().is_empty());
}

#[test]
fn repair_passes_restore_a_usable_asset() {
    let mut ed = built();
    let head = ed.asset().bodies().find_body_index("head").expect("head");
    let shape = ragdoll_shared::ShapeRef {
        kind: ragdoll_shared::ShapeKind::Capsule,
        index: 0,
    };
    ed.delete_shape(head, shape).expect("delete head capsule");
    assert!(ed.asset().bodies().find_body_index("head").is_none());

    let mut asset = ed.into_asset();
    asset.bodies_mut().create_body("prop");
    let (skel, verts) = humanoid();
    let mut ed = GraphEditor::with_asset(asset, skel, verts);
    assert_eq!(ed.reset_empty_bodies(), 1);
    assert_eq!(ed.remove_bodies_without_bones(), Ok(1));
    assert_eq!(ed.asset().body_count(), 7);
    assert!(ed.asset().bodies().bodies().iter().all(|b| !b.geom.is_empty()));
}
