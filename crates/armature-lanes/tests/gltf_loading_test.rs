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

use anyhow::Result;
use approx::assert_relative_eq;
use armature_core::asset::{LoadRequest, MaterialTechnique};
use armature_core::scene::{NodeKind, ParsedAsset};
use armature_lanes::asset_lane::{FileSystemFetcher, GltfLoaderLane, MemoryFetcher, SceneLoaderLane};
use armature_lanes::scene_lane::CloneLane;
use base64::Engine;
use std::fs;
use std::sync::Arc;

const AVATAR: &str = include_str!("fixtures/avatar.gltf");

fn node_kind(asset: &ParsedAsset, name: &str) -> Option<NodeKind> {
    let root = asset.scene?;
    let id = asset.graph.find_by_name(root, name)?;
    Some(asset.graph[id].kind)
}

/// The fixture with its embedded buffer moved to an external `avatar.bin`.
fn split_avatar() -> Result<(String, Vec<u8>)> {
    let mut document: serde_json::Value = serde_json::from_str(AVATAR)?;
    let uri = document["buffers"][0]["uri"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let (_, data) = uri.split_once(',').unwrap_or_default();
    let bytes = base64::engine::general_purpose::STANDARD.decode(data)?;
    document["buffers"][0]["uri"] = serde_json::Value::from("avatar.bin");
    Ok((serde_json::to_string(&document)?, bytes))
}

/// The fixture rewritten by `edit`.
fn edited_avatar(edit: impl FnOnce(&mut serde_json::Value)) -> Result<String> {
    let mut document: serde_json::Value = serde_json::from_str(AVATAR)?;
    edit(&mut document);
    Ok(serde_json::to_string(&document)?)
}

#[tokio::test]
async fn test_load_gltf_from_disk() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    // --- 1. SETUP ---
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("models"))?;
    fs::write(dir.path().join("models/avatar.gltf"), AVATAR)?;
    let lane = GltfLoaderLane::new(Arc::new(FileSystemFetcher::new(dir.path())));
    let request = LoadRequest::new("models/avatar.gltf").with_technique(MaterialTechnique::Unlit);

    // --- 2. ACTION ---
    let asset = lane.load(&request).await?;

    // --- 3. ASSERTIONS ---
    let root = asset.scene.expect("default scene");
    assert_eq!(asset.scenes.len(), 2);
    assert_eq!(asset.scenes[0], root);
    assert_eq!(asset.graph[root].name, "Scene");
    assert_eq!(asset.graph[root].kind, NodeKind::Group);
    assert!(asset.graph.find_by_name(root, "Thumbnail").is_none());

    assert_eq!(node_kind(&asset, "Armature"), Some(NodeKind::Group));
    assert_eq!(node_kind(&asset, "Hips"), Some(NodeKind::Bone));
    assert_eq!(node_kind(&asset, "Head"), Some(NodeKind::Bone));
    assert_eq!(node_kind(&asset, "Body"), Some(NodeKind::SkinnedMesh));

    let hips = asset.graph.find_by_name(root, "Hips").unwrap();
    assert_relative_eq!(asset.graph[hips].transform.translation.y, 1.0);

    let head = asset.graph.find_by_name(root, "Head").unwrap();
    let metadata = asset.graph[head].metadata.as_ref().expect("head metadata");
    assert!(metadata.contains_key("billboard"));
    assert!(asset.graph[hips].metadata.is_none());

    let body = asset.graph.find_by_name(root, "Body").unwrap();
    let skeleton = asset.graph[body].skin.as_ref().expect("skeleton");
    assert_eq!(skeleton.bones, vec![hips, head]);
    let ibm = skeleton.inverse_bind_matrices[1].to_cols_array_2d();
    assert_relative_eq!(ibm[3][1], -1.5);

    let mesh = asset.graph[body].mesh.as_ref().expect("mesh");
    assert_eq!(mesh.geometry.positions.len(), 3);
    let material = mesh.material.read();
    assert!(material.unlit);
    assert_eq!(material.name.as_deref(), Some("Skin"));
    assert_relative_eq!(material.base_color[1], 0.5);

    assert_eq!(asset.animations.len(), 1);
    assert_eq!(asset.animations[0].name, "nod");
    assert_relative_eq!(asset.animations[0].duration, 1.5);
    assert_eq!(asset.animations[0].targets().collect::<Vec<_>>(), vec!["Head"]);
    Ok(())
}

#[tokio::test]
async fn test_pbr_technique_ignores_unlit_extension() -> Result<()> {
    let fetcher = MemoryFetcher::new().with_file("avatar.gltf", AVATAR);
    let lane = GltfLoaderLane::new(Arc::new(fetcher));

    let asset = lane.load(&LoadRequest::new("avatar.gltf")).await?;

    let root = asset.scene.unwrap();
    let body = asset.graph.find_by_name(root, "Body").unwrap();
    assert!(!asset.graph[body].mesh.as_ref().unwrap().material.read().unlit);
    Ok(())
}

#[tokio::test]
async fn test_external_buffer_is_fetched_relative_to_base_path() -> Result<()> {
    // --- 1. SETUP ---
    let (document, bin) = split_avatar()?;
    let fetcher = MemoryFetcher::new()
        .with_file("models/avatar.gltf", document)
        .with_file("models/avatar.bin", bin);
    let lane = GltfLoaderLane::new(Arc::new(fetcher.clone()));

    // --- 2. ACTION ---
    let asset = lane.load(&LoadRequest::new("models/avatar.gltf")).await?;

    // --- 3. ASSERTIONS ---
    assert_eq!(fetcher.fetch_count(), 2);
    let root = asset.scene.unwrap();
    let body = asset.graph.find_by_name(root, "Body").unwrap();
    assert_eq!(asset.graph[body].skin.as_ref().unwrap().bones.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_external_buffer_fails() -> Result<()> {
    let (document, _) = split_avatar()?;
    let fetcher = MemoryFetcher::new().with_file("models/avatar.gltf", document);
    let lane = GltfLoaderLane::new(Arc::new(fetcher));

    let error = lane
        .load(&LoadRequest::new("models/avatar.gltf"))
        .await
        .unwrap_err();

    assert!(format!("{error:#}").contains("models/avatar.bin"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_document_fails() {
    let fetcher = MemoryFetcher::new().with_file("broken.gltf", "{ not gltf");
    let lane = GltfLoaderLane::new(Arc::new(fetcher));

    assert!(lane.load(&LoadRequest::new("broken.gltf")).await.is_err());
}

#[tokio::test]
async fn test_node_shared_by_two_scenes_stays_in_both() -> Result<()> {
    // --- 1. SETUP ---
    let document = edited_avatar(|doc| doc["scenes"][1]["nodes"] = serde_json::json!([0]))?;
    let fetcher = MemoryFetcher::new().with_file("shared.gltf", document);
    let lane = GltfLoaderLane::new(Arc::new(fetcher));

    // --- 2. ACTION ---
    let asset = lane.load(&LoadRequest::new("shared.gltf")).await?;

    // --- 3. ASSERTIONS ---
    let main = asset.scene.unwrap();
    let alt = asset.scenes[1];
    assert_eq!(asset.graph[main].children().len(), 1);
    assert_eq!(asset.graph[alt].children().len(), 1);
    assert_ne!(asset.graph[main].children(), asset.graph[alt].children());

    let main_body = asset.graph.find_by_name(main, "Body").unwrap();
    let alt_body = asset.graph.find_by_name(alt, "Body").unwrap();
    assert_ne!(main_body, alt_body);
    let main_hips = asset.graph.find_by_name(main, "Hips").unwrap();
    assert_eq!(asset.graph[main_body].skin.as_ref().unwrap().bones[0], main_hips);

    let cloned = CloneLane::new().clone_asset(&asset)?;
    assert!(cloned.graph.find_by_name(cloned.root, "Body").is_some());
    Ok(())
}

#[tokio::test]
async fn test_animation_on_unnamed_node_resolves_in_every_clone() -> Result<()> {
    // --- 1. SETUP ---
    let document = edited_avatar(|doc| {
        if let Some(head) = doc["nodes"][2].as_object_mut() {
            head.remove("name");
        }
    })?;
    let fetcher = MemoryFetcher::new().with_file("anonymous.gltf", document);
    let lane = GltfLoaderLane::new(Arc::new(fetcher));

    // --- 2. ACTION ---
    let asset = lane.load(&LoadRequest::new("anonymous.gltf")).await?;
    let first = CloneLane::new().clone_asset(&asset)?;
    let second = CloneLane::new().clone_asset(&asset)?;

    // --- 3. ASSERTIONS ---
    let target = asset.animations[0].targets().next().unwrap().to_string();
    assert!(!target.is_empty());
    let source = asset.graph.find_by_name(asset.scene.unwrap(), &target).unwrap();
    assert_eq!(asset.graph[source].kind, NodeKind::Bone);

    for cloned in [&first, &second] {
        let head = cloned.graph.find_by_name(cloned.root, &target);
        assert!(head.is_some(), "clip target '{target}' missing from clone");
    }
    Ok(())
}
