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

use super::InflateError;
use armature_core::ecs::EntityId;
use armature_data::ecs::{BehaviorSchema, World};
use serde_json::Value;
use std::sync::Arc;

/// Configures a host behavior on an inflated entity.
///
/// Arguments are the world, the entity, the host behavior name, the behavior
/// configuration taken from node metadata, and the context path (the URL base of the
/// loaded asset, for resolving relative locations inside the configuration).
pub type Inflator =
    Arc<dyn Fn(&mut World, EntityId, &str, &Value, &str) -> Result<(), InflateError> + Send + Sync>;

/// Writes `config` as the `behavior` attribute of `entity`.
///
/// For a behavior that supports multiple instances, an array configuration is split
/// into one attribute per element, keyed `behavior__0`, `behavior__1`, and so on.
pub fn default_inflator(
    world: &mut World,
    entity: EntityId,
    behavior: &str,
    config: &Value,
    _context_path: &str,
) -> Result<(), InflateError> {
    let Some(schema) = world.behavior(behavior) else {
        return Err(InflateError::UnknownBehavior {
            behavior: behavior.to_string(),
            node: world.name(entity).unwrap_or_default().to_string(),
        });
    };

    match config {
        Value::Array(instances) if schema.multiple => {
            for (i, instance) in instances.iter().enumerate() {
                world.set_attribute(
                    entity,
                    BehaviorSchema::instance_key(behavior, i),
                    instance.clone(),
                )?;
            }
        }
        _ => world.set_attribute(entity, behavior, config.clone())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_data::ecs::WorldError;
    use serde_json::json;

    #[test]
    fn test_single_behavior_sets_one_attribute() {
        let mut world = World::new();
        world.register_behavior("spin", BehaviorSchema::SINGLE);
        let id = world.spawn("Fan");

        default_inflator(&mut world, id, "spin", &json!({ "speed": 2 }), "./").unwrap();

        assert_eq!(world.attribute(id, "spin"), Some(&json!({ "speed": 2 })));
    }

    #[test]
    fn test_multiple_behavior_sets_indexed_attributes() {
        let mut world = World::new();
        world.register_behavior("sound", BehaviorSchema::MULTIPLE);
        let id = world.spawn("Speaker");
        let config = json!([{ "src": "a.ogg" }, { "src": "b.ogg" }]);

        default_inflator(&mut world, id, "sound", &config, "./").unwrap();

        assert_eq!(world.attribute(id, "sound__0"), Some(&json!({ "src": "a.ogg" })));
        assert_eq!(world.attribute(id, "sound__1"), Some(&json!({ "src": "b.ogg" })));
        assert_eq!(world.attribute(id, "sound"), None);
    }

    #[test]
    fn test_array_for_single_behavior_is_kept_whole() {
        let mut world = World::new();
        world.register_behavior("path", BehaviorSchema::SINGLE);
        let id = world.spawn("Rail");

        default_inflator(&mut world, id, "path", &json!([1, 2]), "./").unwrap();

        assert_eq!(world.attribute(id, "path"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_unsupported_behavior_fails() {
        let mut world = World::new();
        let id = world.spawn("Head");

        let result = default_inflator(&mut world, id, "billboard", &json!({}), "./");

        assert_eq!(
            result,
            Err(InflateError::UnknownBehavior {
                behavior: "billboard".to_string(),
                node: "Head".to_string(),
            })
        );
    }

    #[test]
    fn test_dead_entity_is_a_host_error() {
        let mut world = World::new();
        world.register_behavior("spin", BehaviorSchema::SINGLE);
        let id = world.spawn("Fan");
        world.despawn(id);

        let result = default_inflator(&mut world, id, "spin", &json!(true), "./");

        assert_eq!(
            result,
            Err(InflateError::Host(WorldError::EntityNotFound(id)))
        );
    }
}
