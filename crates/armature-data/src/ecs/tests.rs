// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::*;
use armature_core::event::{ModelEvent, ModelFormat};
use armature_core::math::Vec3;
use armature_core::scene::{AnimationClip, NodeId, SceneGraph, SceneNode, NodeKind};
use serde_json::json;

#[test]
fn test_entity_id_recycling_and_aba_protection() {
    // --- 1. SETUP ---
    let mut world = World::new();
    let id_a = world.spawn("a");
    assert_eq!((id_a.index, id_a.generation), (0, 0));

    // --- 2. ACTION ---
    assert!(world.despawn(id_a));
    assert_eq!(world.store().freed_entities, vec![0]);
    let id_b = world.spawn("b");

    // --- 3. ASSERTIONS ---
    assert_eq!(id_b.index, 0, "The recycled entity should have index 0");
    assert_eq!(id_b.generation, 1, "The generation should be incremented to 1");
    assert!(world.store().freed_entities.is_empty());

    assert!(!world.despawn(id_a), "Despawning with a stale ID should fail");
    assert!(world.is_alive(id_b));
    assert_eq!(world.name(id_b), Some("b"));
    assert_eq!(
        world.set_attribute(id_a, "visible", json!(true)),
        Err(WorldError::EntityNotFound(id_a))
    );
}

#[test]
fn test_despawn_removes_subtree() {
    let mut world = World::new();
    let root = world.spawn_connected("root");
    let arm = world.spawn("arm");
    let hand = world.spawn("hand");
    world.append_child(root, arm).unwrap();
    world.append_child(arm, hand).unwrap();

    assert!(world.despawn(arm));

    assert!(world.children(root).is_empty());
    assert!(!world.is_alive(hand));
    assert_eq!(world.len(), 1);
}

#[test]
fn test_despawned_child_is_unlinked_and_stale() {
    let mut world = World::new();
    let root = world.spawn_connected("root");
    let child = world.spawn("child");
    world.append_child(root, child).unwrap();

    assert!(world.despawn(child));

    assert!(world.children(root).is_empty());
    assert_eq!(world.detach(child), Err(WorldError::EntityNotFound(child)));
    assert!(world.is_connected(root));
}

#[test]
fn test_connection_follows_the_hierarchy() {
    // --- 1. SETUP ---
    let mut world = World::new();
    let scene = world.spawn_connected("scene");
    let wrapper = world.spawn("wrapper");
    let leaf = world.spawn("leaf");
    world.append_child(wrapper, leaf).unwrap();
    assert!(!world.is_connected(leaf));

    // --- 2. ACTION & ASSERTIONS ---
    world.append_child(scene, wrapper).unwrap();
    assert!(world.is_connected(wrapper));
    assert!(world.is_connected(leaf));

    world.detach(wrapper).unwrap();
    assert!(!world.is_connected(leaf));
    assert_eq!(world.parent(wrapper), None);
    assert!(world.is_connected(scene));
}

#[test]
fn test_append_rejects_cycles() {
    let mut world = World::new();
    let a = world.spawn("a");
    let b = world.spawn("b");
    world.append_child(a, b).unwrap();

    assert_eq!(
        world.append_child(b, a),
        Err(WorldError::HierarchyCycle { parent: b, child: a })
    );
    assert_eq!(world.children(a), &[b]);
}

#[test]
fn test_descendants_with_class() {
    let mut world = World::new();
    let root = world.spawn("root");
    let left = world.spawn("left");
    let right = world.spawn("right");
    let nested = world.spawn("nested");
    world.append_child(root, left).unwrap();
    world.append_child(root, right).unwrap();
    world.append_child(left, nested).unwrap();
    world.add_class(root, "Hand_L").unwrap();
    world.add_class(nested, "Hand_L").unwrap();
    world.add_class(nested, "Hand_L").unwrap();

    assert_eq!(world.descendants(root), vec![left, nested, right]);
    assert_eq!(world.descendants_with_class(root, "Hand_L"), vec![nested]);
    assert_eq!(world.classes(nested).len(), 1);
}

#[test]
fn test_transform_attributes() {
    let mut world = World::new();
    let id = world.spawn("node");
    let transform = EntityTransform {
        position: Vec3::new(0.0, 1.5, 0.0),
        rotation: Vec3::new(0.0, 90.0, 0.0),
        scale: Vec3::ONE,
    };

    world.set_transform(id, transform).unwrap();

    assert_eq!(
        world.attribute(id, POSITION_ATTRIBUTE),
        Some(&json!({ "x": 0.0, "y": 1.5, "z": 0.0 }))
    );
    assert_eq!(world.transform(id), Some(transform));
}

#[test]
fn test_object_and_animations() {
    let mut world = World::new();
    let mut graph = SceneGraph::new();
    let node: NodeId = graph.add(SceneNode::new("Body", NodeKind::Mesh));
    let id = world.spawn("Body");

    world.set_object(id, NodeKind::Mesh.tag(), graph.node_ref(node)).unwrap();
    world
        .push_animations(id, vec![AnimationClip::new("idle", Vec::new())])
        .unwrap();

    assert_eq!(world.object(id).map(|o| o.slot.as_str()), Some("mesh"));
    assert_eq!(world.animations(id).len(), 1);

    let cleared = world.clear_object(id).unwrap();
    assert_eq!(cleared.and_then(|o| o.node()), Some(graph.node_ref(node)));
    assert!(world.object(id).is_none());
}

#[test]
fn test_behavior_schemas() {
    let mut world = World::new();
    world.register_behavior("sound", BehaviorSchema::MULTIPLE);

    assert_eq!(world.behavior("sound"), Some(BehaviorSchema { multiple: true }));
    assert_eq!(world.behavior("billboard"), None);
    assert_eq!(BehaviorSchema::instance_key("sound", 2), "sound__2");
}

#[test]
fn test_emit_reaches_subscribers() {
    let mut world = World::new();
    let host = world.spawn_connected("host");
    let events = world.subscribe();

    world.emit(
        host,
        ModelEvent::Error {
            format: ModelFormat::Gltf,
            requested: "#missing".to_string(),
        },
    );

    let received = events.try_recv().unwrap();
    assert_eq!(received.target, host);
    assert_eq!(received.event.name(), "model-error");
}
