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

use super::{ModelError, ModelLoaderConfig};
use armature_core::{
    asset::{extract_url_base, LoadRequest},
    ecs::EntityId,
    event::{ModelEvent, ModelFormat},
    lane::{Lane, LaneKind},
    scene::{ClonedAsset, NodeRef, ParsedAsset},
};
use armature_data::{
    assets::{AssetCache, AssetCatalog},
    ecs::{ObjectTarget, SharedWorld, World, MESH_SLOT},
    markup::{MarkupNode, TemplateSet},
};
use armature_lanes::{
    asset_lane::SceneLoaderLane,
    behavior_lane::BehaviorRegistry,
    scene_lane::{CloneLane, InflateLane, TemplateLane},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Where a loader stands in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderPhase {
    /// Nothing requested, or the model was cleared.
    #[default]
    Idle,
    /// Resolving a `#id` reference.
    Resolving,
    /// Waiting for the parsed scene and cloning it.
    Loading,
    /// Wrapping nodes into entities and binding templates.
    Inflating,
    /// A model is attached to the host.
    Attached,
    /// The latest request failed while loading or inflating. The loader accepts new
    /// requests.
    Failed,
}

/// What a call to [`ModelLoader::request`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The requested model replaced the previous one.
    Attached,
    /// The previous model was removed.
    Cleared,
    /// The source was already applied; nothing changed.
    Unchanged,
    /// A newer request started first; this result was discarded.
    Superseded,
    /// The request failed; the previous model, if any, is still attached.
    Failed(ModelError),
}

/// What a loader currently has attached to its host.
#[derive(Debug)]
struct Attachment {
    source: String,
    asset: ClonedAsset,
    inflated: Option<EntityId>,
}

#[derive(Debug, Default)]
struct LoaderState {
    config: ModelLoaderConfig,
    phase: LoaderPhase,
    /// Incremented by every request; an in-flight request is stale once it differs.
    ticket: u64,
    requested: Option<String>,
    attached: Option<Attachment>,
    /// Inflated roots appended to the host but not attached yet, by ticket.
    provisional: Vec<(u64, EntityId)>,
}

/// Loads a model for one host entity.
///
/// Requests run cooperatively: a request suspends while the asset cache fetches and
/// parses, and once more between appending the inflated tree and binding templates.
/// After each suspension the request checks that no newer request has started; a
/// superseded request discards its result without touching the world.
///
/// The loader owns the cloned scene and the inflated entities it attaches. A failed
/// request leaves the previous model in place.
pub struct ModelLoader {
    world: SharedWorld,
    host: EntityId,
    templates: TemplateSet,
    catalog: AssetCatalog,
    cache: Arc<AssetCache<ParsedAsset>>,
    loader_lane: Arc<dyn SceneLoaderLane>,
    clone_lane: CloneLane,
    inflate_lane: InflateLane,
    template_lane: TemplateLane,
    state: Mutex<LoaderState>,
}

impl ModelLoader {
    /// Creates an idle loader for `host`, parsing through `loader_lane`.
    ///
    /// The loader uses the process-wide asset cache and behavior registry, no
    /// templates and an empty catalog until configured otherwise.
    pub fn new(world: SharedWorld, host: EntityId, loader_lane: Arc<dyn SceneLoaderLane>) -> Self {
        Self {
            world,
            host,
            templates: TemplateSet::new(),
            catalog: AssetCatalog::new(),
            cache: AssetCache::global(),
            loader_lane,
            clone_lane: CloneLane::new(),
            inflate_lane: InflateLane::default(),
            template_lane: TemplateLane::new(),
            state: Mutex::new(LoaderState::default()),
        }
    }

    /// Uses `cache` instead of the process-wide one.
    pub fn with_cache(mut self, cache: Arc<AssetCache<ParsedAsset>>) -> Self {
        self.cache = cache;
        self
    }

    /// Resolves `#id` sources through `catalog`.
    pub fn with_catalog(mut self, catalog: AssetCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Resolves behavior keys through `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<BehaviorRegistry>) -> Self {
        self.inflate_lane = InflateLane::new(registry);
        self
    }

    /// Reads the templates declared in the host's child markup.
    pub fn with_markup(mut self, markup: &[MarkupNode]) -> Self {
        self.templates = TemplateSet::from_markup(markup);
        self
    }

    /// Applies `config` and requests its source.
    ///
    /// Settings other than the source take effect at the next request that changes
    /// the source.
    pub async fn update(&self, config: ModelLoaderConfig) -> LoadOutcome {
        let source = config.source().map(str::to_string);
        self.state().config = config;
        self.request(source.as_deref()).await
    }

    /// Requests `source`, or clears the model when it is `None` or blank.
    pub async fn request(&self, source: Option<&str>) -> LoadOutcome {
        let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) else {
            return self.clear();
        };

        let (ticket, config) = {
            let mut state = self.state();
            let applied = state.attached.as_ref().map(|a| a.source.as_str());
            let in_flight = matches!(
                state.phase,
                LoaderPhase::Resolving | LoaderPhase::Loading | LoaderPhase::Inflating
            );
            if state.requested.as_deref() == Some(source) && (in_flight || applied == Some(source)) {
                return LoadOutcome::Unchanged;
            }
            state.ticket += 1;
            state.requested = Some(source.to_string());
            state.phase = LoaderPhase::Resolving;
            (state.ticket, state.config.clone())
        };

        match self.run(ticket, source, &config).await {
            Ok(outcome) => outcome,
            Err(error) => self.fail(ticket, source, error),
        }
    }

    /// Removes the attached model, as if the source had been cleared.
    pub fn remove(&self) {
        self.clear();
    }

    /// The current phase.
    pub fn phase(&self) -> LoaderPhase {
        self.state().phase
    }

    /// The host entity.
    pub fn host(&self) -> EntityId {
        self.host
    }

    /// The source of the attached model.
    pub fn attached_source(&self) -> Option<String> {
        self.state().attached.as_ref().map(|a| a.source.clone())
    }

    /// The root of the attached cloned scene.
    pub fn attached_root(&self) -> Option<NodeRef> {
        self.state()
            .attached
            .as_ref()
            .map(|a| a.asset.graph.node_ref(a.asset.root))
    }

    /// The entity wrapping the attached scene, when it was inflated.
    pub fn inflated_root(&self) -> Option<EntityId> {
        self.state().attached.as_ref().and_then(|a| a.inflated)
    }

    /// The stages a request runs through, in order, as `(kind, strategy)` pairs.
    pub fn pipeline(&self) -> Vec<(LaneKind, &'static str)> {
        vec![
            stage(self.loader_lane.as_ref()),
            stage(&self.clone_lane),
            stage(&self.inflate_lane),
            stage(&self.template_lane),
        ]
    }

    /// Runs `f` on the attached cloned scene.
    pub fn with_attached<R>(&self, f: impl FnOnce(&ClonedAsset) -> R) -> Option<R> {
        self.state().attached.as_ref().map(|a| f(&a.asset))
    }

    // --- Request pipeline ---

    async fn run(
        &self,
        ticket: u64,
        source: &str,
        config: &ModelLoaderConfig,
    ) -> Result<LoadOutcome, ModelError> {
        let location = self
            .catalog
            .resolve(source)
            .ok_or_else(|| ModelError::Resolution {
                reference: source.to_string(),
            })?;

        self.set_phase(ticket, LoaderPhase::Loading);
        let request = LoadRequest::new(location.as_str())
            .with_base_path(config.base_path.as_deref())
            .with_technique(config.technique);
        trace_stage(self.loader_lane.as_ref(), source);
        let lane = Arc::clone(&self.loader_lane);
        let parsed = self
            .cache
            .fetch_or_load(&location, move || async move { lane.load(&request).await })
            .await;
        if !self.is_current(ticket) {
            log::debug!("Discarding superseded load of '{source}'.");
            return Ok(LoadOutcome::Superseded);
        }
        let parsed = parsed?;

        trace_stage(&self.clone_lane, source);
        let mut asset = self.clone_lane.clone_asset(&parsed)?;
        asset.graph[asset.root]
            .animations
            .extend(parsed.animations.iter().cloned());

        if !config.inflate {
            return self.attach(ticket, source, asset, None);
        }

        self.set_phase(ticket, LoaderPhase::Inflating);
        let Some(root) = self.inflate(ticket, &location, &mut asset)? else {
            return self.attach(ticket, source, asset, None);
        };

        connection_settled().await;
        if !self.is_current(ticket) {
            log::debug!("Discarding superseded inflation of '{source}'.");
            self.discard_provisional(ticket, root);
            return Ok(LoadOutcome::Superseded);
        }

        if let Err(error) = self.bind_templates(root) {
            self.discard_provisional(ticket, root);
            return Err(error);
        }
        self.attach(ticket, source, asset, Some(root))
    }

    /// Inflates `asset` and appends the result to the host.
    fn inflate(
        &self,
        ticket: u64,
        location: &str,
        asset: &mut ClonedAsset,
    ) -> Result<Option<EntityId>, ModelError> {
        trace_stage(&self.inflate_lane, location);
        let context_path = extract_url_base(location);
        let mut world = self.world.lock();
        let Some(root) = self.inflate_lane.inflate(
            &mut world,
            &mut asset.graph,
            asset.root,
            &self.templates,
            &context_path,
        )?
        else {
            return Ok(None);
        };

        if let Err(error) = world.append_child(self.host, root) {
            world.despawn(root);
            return Err(error.into());
        }
        drop(world);

        self.state().provisional.push((ticket, root));
        Ok(Some(root))
    }

    /// Binds every template within the new inflated tree only.
    fn bind_templates(&self, root: EntityId) -> Result<(), ModelError> {
        let mut world = self.world.lock();
        for template in &self.templates {
            trace_stage(&self.template_lane, &template.name);
            self.template_lane.bind(&mut world, root, template)?;
        }
        Ok(())
    }

    /// Swaps the new model in, destroying the previous one.
    fn attach(
        &self,
        ticket: u64,
        source: &str,
        asset: ClonedAsset,
        inflated: Option<EntityId>,
    ) -> Result<LoadOutcome, ModelError> {
        let model = asset.graph.node_ref(asset.root);
        let target = match inflated {
            Some(root) => ObjectTarget::Entity(root),
            None => ObjectTarget::Node(model),
        };

        let (previous, orphans) = {
            let mut state = self.state();
            if state.ticket != ticket {
                return Ok(LoadOutcome::Superseded);
            }
            let previous = state.attached.replace(Attachment {
                source: source.to_string(),
                asset,
                inflated,
            });
            state.phase = LoaderPhase::Attached;
            (previous, take_provisional(&mut state, inflated))
        };

        let mut world = self.world.lock();
        destroy(&mut world, previous.and_then(|p| p.inflated), &orphans);
        world.set_object(self.host, MESH_SLOT, target)?;
        world.emit(
            self.host,
            ModelEvent::Loaded {
                format: ModelFormat::Gltf,
                model,
            },
        );
        log::info!("Model '{source}' attached to entity {}.", self.host);
        Ok(LoadOutcome::Attached)
    }

    fn clear(&self) -> LoadOutcome {
        let (previous, orphans) = {
            let mut state = self.state();
            state.ticket += 1;
            state.requested = None;
            state.phase = LoaderPhase::Idle;
            (state.attached.take(), take_provisional(&mut state, None))
        };

        let mut world = self.world.lock();
        destroy(&mut world, None, &orphans);
        let Some(previous) = previous else {
            return LoadOutcome::Unchanged;
        };
        destroy(&mut world, previous.inflated, &[]);
        if let Err(error) = world.clear_object(self.host) {
            log::warn!("Could not clear the model of entity {}: {error}", self.host);
        }
        log::warn!("Source cleared, unloading model '{}' from entity {}.", previous.source, self.host);
        LoadOutcome::Cleared
    }

    fn fail(&self, ticket: u64, source: &str, error: ModelError) -> LoadOutcome {
        {
            let mut state = self.state();
            if state.ticket != ticket {
                log::debug!("Ignoring failure of superseded request '{source}': {error}");
                return LoadOutcome::Superseded;
            }
            // Nothing was loaded for an unresolved reference.
            state.phase = match (&error, state.attached.is_some()) {
                (ModelError::Resolution { .. }, false) => LoaderPhase::Idle,
                (ModelError::Resolution { .. }, true) => LoaderPhase::Attached,
                _ => LoaderPhase::Failed,
            };
        }

        log::error!("Failed to load model '{source}' for entity {}: {error}", self.host);
        self.world.lock().emit(
            self.host,
            ModelEvent::Error {
                format: ModelFormat::Gltf,
                requested: source.to_string(),
            },
        );
        LoadOutcome::Failed(error)
    }

    fn discard_provisional(&self, ticket: u64, root: EntityId) {
        self.state()
            .provisional
            .retain(|(t, id)| !(*t == ticket && *id == root));
        self.world.lock().despawn(root);
    }

    // --- State ---

    fn state(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.state().ticket == ticket
    }

    fn set_phase(&self, ticket: u64, phase: LoaderPhase) {
        let mut state = self.state();
        if state.ticket == ticket {
            state.phase = phase;
        }
    }
}

impl Drop for ModelLoader {
    fn drop(&mut self) {
        if self.state().attached.is_some() {
            self.remove();
        }
    }
}

/// Suspends once so that the host settles the connection of freshly appended
/// entities. On return, entities appended before the call are connected.
async fn connection_settled() {
    tokio::task::yield_now().await;
}

fn stage<L: Lane + ?Sized>(lane: &L) -> (LaneKind, &'static str) {
    (lane.lane_kind(), lane.strategy_name())
}

fn trace_stage<L: Lane + ?Sized>(lane: &L, source: &str) {
    log::debug!("[{}] {} running for '{source}'.", lane.lane_kind(), lane.strategy_name());
}

/// Takes every provisional root except `keep`.
fn take_provisional(state: &mut LoaderState, keep: Option<EntityId>) -> Vec<EntityId> {
    std::mem::take(&mut state.provisional)
        .into_iter()
        .map(|(_, id)| id)
        .filter(|id| Some(*id) != keep)
        .collect()
}

fn destroy(world: &mut World, inflated: Option<EntityId>, orphans: &[EntityId]) {
    for id in inflated.iter().chain(orphans) {
        world.despawn(*id);
    }
}
