//! The frame graph core: declaration, compilation, execution.
//!
//! A frame is declared as passes over virtual resources, compiled into a
//! topological order with dependency levels and the minimum set of barriers,
//! then executed against a [`DeviceContext`]. See the crate docs for the
//! overall flow.

mod barrier;
mod builder;
mod pass;
mod present;
mod registry;
mod resource;
mod usage;

pub use builder::Builder;
pub use pass::{
    AttachmentTexture, ColorAttachment, DepthStencilAttachment, PassId, PassKind, QueueType,
    RenderPass,
};
pub use present::PRESENT_ACCESS;
pub use registry::Registry;
pub use resource::{
    BufferCreateInfo, BufferHandle, ResourceHandle, ResourceId, ResourceType, TextureCreateInfo,
    TextureHandle, TextureViewHandle,
};
pub use usage::{map_resource_usage, ResourceUsage};

use ahash::AHashMap;
use ember_rhi::{
    AccessFlags, CommandEncoder, DeviceContext, PresentInfo, QueueFamilyIndices, SubmitInfo,
    SwapchainHandle, TextureKind,
};
use glam::Vec4;
use tracing::{debug, instrument, trace};

use crate::error::FrameGraphError;
use crate::frame_graph::barrier::{BufferBarrier, PassBarriers, TextureBarrier};
use crate::frame_graph::pass::{FrameGraphPass, GenericPass, RenderGraphPass};
use crate::frame_graph::present::PresentPass;
use crate::frame_graph::resource::{
    BufferOrigin, BufferResource, Resource, TextureOrigin, TextureResource,
};

/// Passes whose longest-path distance from any root is `level`. Passes
/// within one level have no data dependency on each other and may overlap on
/// the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLevel {
    pub level: u32,
    pub passes: Vec<PassId>,
}

struct PassRecord {
    pass: Box<dyn FrameGraphPass>,
    /// Attachment declaration, for render passes.
    declaration: Option<RenderPass>,
    /// Backend render-pass descriptor with accesses resolved by the barrier
    /// planner. Attachment handles are filled from the registry at execute
    /// time.
    resolved: Option<ember_rhi::RenderPass>,
}

#[derive(Default)]
struct PassResources {
    reads: AHashMap<ResourceId, ResourceUsage>,
    writes: AHashMap<ResourceId, ResourceUsage>,
    creates: Vec<ResourceId>,
}

/// Last recorded hazard source for a resource.
///
/// Entries are written by passes that write the resource; read-only accesses
/// deliberately leave the entry alone, so every reader synchronizes against
/// the producing write and read-only fan-out needs no barriers between the
/// readers themselves.
struct LastUsage {
    pass: PassId,
    queue: QueueType,
    usage: ResourceUsage,
    is_written: bool,
}

///
pub struct FrameGraph {
    registry: Registry,
    resources: Vec<Resource>,
    passes: Vec<PassRecord>,
    present_passes: Vec<PresentPass>,
    pass_resources: Vec<PassResources>,
    pass_barriers: Vec<PassBarriers>,

    adjacency_list: Vec<Vec<PassId>>,
    topologically_sorted: Vec<PassId>,
    dependency_levels: Vec<DependencyLevel>,

    queue_indices: QueueFamilyIndices,
}

impl FrameGraph {
    pub fn new(device: &dyn DeviceContext) -> Self {
        Self {
            registry: Registry::default(),
            resources: Vec::new(),
            passes: Vec::new(),
            present_passes: Vec::new(),
            pass_resources: Vec::new(),
            pass_barriers: Vec::new(),
            adjacency_list: Vec::new(),
            topologically_sorted: Vec::new(),
            dependency_levels: Vec::new(),
            queue_indices: device.queue_family_indices(),
        }
    }

    /// Declares a pass. `setup` declares the pass's resources through the
    /// [`Builder`] and returns user data which is handed back to the caller
    /// (so later setup closures can reference the handles) and to `execute`
    /// when the pass runs.
    ///
    /// `execute` must capture everything it needs by value.
    pub fn add_pass<D, S, E>(
        &mut self,
        queue_type: QueueType,
        name: impl Into<String>,
        setup: S,
        execute: E,
    ) -> D
    where
        D: Clone + 'static,
        S: FnOnce(&mut Builder<'_>) -> D,
        E: FnMut(&mut dyn DeviceContext, &Registry, &mut CommandEncoder, &D) + 'static,
    {
        let name = name.into();
        let pass_id = PassId::new(self.passes.len() as u32);
        self.pass_resources.push(PassResources::default());
        self.pass_barriers.push(PassBarriers::default());

        let mut builder = Builder::new(self, pass_id);
        let data = setup(&mut builder);

        self.passes.push(PassRecord {
            pass: Box::new(GenericPass {
                name,
                queue_type,
                data: data.clone(),
                execute,
            }),
            declaration: None,
            resolved: None,
        });

        data
    }

    /// Like [`FrameGraph::add_pass`], but `setup` additionally fills in a
    /// [`RenderPass`] attachment declaration, and `execute` receives the
    /// resolved [`ember_rhi::RenderPass`] to begin rendering with.
    pub fn add_render_pass<D, S, E>(
        &mut self,
        queue_type: QueueType,
        name: impl Into<String>,
        setup: S,
        execute: E,
    ) -> Result<D, FrameGraphError>
    where
        D: Clone + 'static,
        S: FnOnce(&mut Builder<'_>, &mut RenderPass) -> D,
        E: FnMut(&mut dyn DeviceContext, &Registry, &mut CommandEncoder, &D, &ember_rhi::RenderPass)
            + 'static,
    {
        let name = name.into();
        let pass_id = PassId::new(self.passes.len() as u32);
        self.pass_resources.push(PassResources::default());
        self.pass_barriers.push(PassBarriers::default());

        let mut render_pass = RenderPass::default();
        let mut builder = Builder::new(self, pass_id);
        let data = setup(&mut builder, &mut render_pass);

        if render_pass_contains_duplicates(&render_pass) {
            self.pass_resources.pop();
            self.pass_barriers.pop();
            return Err(FrameGraphError::DuplicateAttachment { pass: name });
        }

        self.passes.push(PassRecord {
            pass: Box::new(RenderGraphPass {
                name,
                queue_type,
                data: data.clone(),
                execute,
            }),
            declaration: Some(render_pass),
            resolved: None,
        });

        Ok(data)
    }

    /// Schedules `texture` to be handed to `swapchain` after every other
    /// pass. The texture cannot be used again after
    /// [`FrameGraph::execute`].
    pub fn add_present_pass(
        &mut self,
        swapchain: SwapchainHandle,
        texture: TextureHandle,
    ) -> Result<(), FrameGraphError> {
        let precondition_failed = |texture: &TextureResource, reason: &str| {
            Err(FrameGraphError::PresentPreconditionFailed {
                texture: texture.name.clone(),
                reason: reason.to_string(),
            })
        };

        let Some(resource) = self.resources.get(texture.resource_id().index()) else {
            return Err(FrameGraphError::UnusedResource {
                resource: format!("#{}", texture.resource_id().raw()),
            });
        };
        let Resource::Texture(texture_resource) = resource else {
            return Err(FrameGraphError::UnusedResource {
                resource: resource.name().to_string(),
            });
        };

        let create_info = &texture_resource.create_info;
        if !create_info
            .usage
            .contains(ember_rhi::TextureUsageFlags::PRESENT)
        {
            return precondition_failed(texture_resource, "the `PRESENT` usage bit is not set");
        }
        if !create_info.format.is_valid_present_src() {
            return precondition_failed(texture_resource, "the format is not presentable");
        }
        if create_info.tiling != ember_rhi::TextureTiling::Optimal {
            return precondition_failed(texture_resource, "tiling must be `Optimal`");
        }
        if !matches!(create_info.kind, TextureKind::Texture2D { .. }) {
            return precondition_failed(texture_resource, "only 2D textures can be presented");
        }
        if create_info.kind.sample_count() != ember_rhi::SampleCount::Count1 {
            return precondition_failed(texture_resource, "sample count must be 1");
        }

        self.present_passes.push(PresentPass {
            swapchain,
            texture,
            barrier: None,
        });

        Ok(())
    }

    /// Registers a texture that lives outside the graph. The graph records
    /// usages and plans barriers starting from `previous_access`, but never
    /// destroys the texture.
    pub fn import_texture(
        &mut self,
        name: impl Into<String>,
        handle: ember_rhi::TextureHandle,
        create_info: TextureCreateInfo,
        previous_access: AccessFlags,
    ) -> TextureHandle {
        let id = ResourceId::new(self.resources.len() as u32);
        self.resources.push(Resource::Texture(TextureResource {
            name: name.into(),
            create_info,
            origin: TextureOrigin::Imported {
                handle,
                previous_access,
            },
            realized: None,
        }));
        TextureHandle::new(id)
    }

    /// Registers a buffer that lives outside the graph.
    pub fn import_buffer(
        &mut self,
        name: impl Into<String>,
        handle: ember_rhi::BufferHandle,
        create_info: BufferCreateInfo,
    ) -> BufferHandle {
        let id = ResourceId::new(self.resources.len() as u32);
        self.resources.push(Resource::Buffer(BufferResource {
            name: name.into(),
            create_info,
            origin: BufferOrigin::Imported { handle },
            realized: None,
        }));
        BufferHandle::new(id)
    }

    /// Derives execution order, dependency levels and all barriers from the
    /// declared passes. Must be called before [`FrameGraph::execute`].
    #[instrument(level = "debug", skip_all)]
    pub fn compile(&mut self) -> Result<(), FrameGraphError> {
        self.adjacency_list.clear();
        self.topologically_sorted.clear();
        self.dependency_levels.clear();
        for barriers in &mut self.pass_barriers {
            barriers.clear();
        }
        for present_pass in &mut self.present_passes {
            present_pass.barrier = None;
        }

        self.build_adjacency_list();
        self.topological_sort()?;
        self.build_dependency_levels();
        self.build_barriers()?;

        debug!(
            passes = self.passes.len(),
            resources = self.resources.len(),
            levels = self.dependency_levels.len(),
            "frame graph compiled"
        );
        Ok(())
    }

    /// Runs every pass in dependency-level order: realizes created
    /// resources, records barriers and user commands, folds consecutive
    /// same-queue encoders into single submissions, emits present passes,
    /// then destroys all transient resources.
    #[instrument(level = "debug", skip_all)]
    pub fn execute(&mut self, device: &mut dyn DeviceContext) {
        if self.dependency_levels.is_empty() {
            return;
        }

        // Imported resources have nothing to allocate; publish them up
        // front.
        for (index, resource) in self.resources.iter_mut().enumerate() {
            if !resource.is_transient() {
                resource.realize(ResourceId::new(index as u32), device, &mut self.registry);
            }
        }

        let mut submit_infos: Vec<SubmitInfo> = Vec::new();

        for level in &self.dependency_levels {
            for &pass_id in &level.passes {
                let index = pass_id.index();

                for &resource_id in &self.pass_resources[index].creates {
                    self.resources[resource_id.index()].realize(
                        resource_id,
                        device,
                        &mut self.registry,
                    );
                }

                let mut encoder = CommandEncoder::new();
                encoder.begin_command_buffer();
                encoder.begin_region(self.passes[index].pass.name(), Vec4::ONE);

                translate_barriers(
                    &self.registry,
                    &mut encoder,
                    self.pass_barriers[index].global_barrier.before,
                    &self.pass_barriers[index].texture_barriers.before,
                    &self.pass_barriers[index].buffer_barriers.before,
                );

                let resolved = self.passes[index].resolved.as_ref().map(|template| {
                    let declaration = self.passes[index]
                        .declaration
                        .as_ref()
                        .expect("render pass without attachment declaration");
                    resolve_attachment_textures(template, declaration, &self.registry)
                });

                let record = &mut self.passes[index];
                record
                    .pass
                    .execute(device, &self.registry, &mut encoder, resolved.as_ref());

                translate_barriers(
                    &self.registry,
                    &mut encoder,
                    self.pass_barriers[index].global_barrier.after,
                    &self.pass_barriers[index].texture_barriers.after,
                    &self.pass_barriers[index].buffer_barriers.after,
                );

                encoder.end_region();
                encoder.end_command_buffer();

                push_or_coalesce(
                    &mut submit_infos,
                    encoder,
                    self.passes[index].pass.queue_type(),
                );
            }
        }

        let mut present_infos = Vec::with_capacity(self.present_passes.len());
        if !self.present_passes.is_empty() {
            let mut encoder = CommandEncoder::new();
            encoder.begin_command_buffer();
            encoder.begin_region("Prepare textures to present", Vec4::new(1.0, 0.5, 1.0, 1.0));

            for present_pass in &self.present_passes {
                if let Some(barrier) = &present_pass.barrier {
                    encoder.texture_barrier(vec![translate_texture_barrier(
                        &self.registry,
                        barrier,
                    )]);
                }

                present_infos.push(PresentInfo {
                    swapchain: present_pass.swapchain,
                    texture: self.registry.get_texture(present_pass.texture),
                    texture_previous_access: PRESENT_ACCESS,
                });
            }

            encoder.end_region();
            encoder.end_command_buffer();

            submit_infos.push(SubmitInfo {
                encoders: vec![encoder],
                synchronization_stage: QueueType::Present.synchronization_stage(),
                queue_type: QueueType::Present.to_rhi(),
            });
        }

        device.submit(submit_infos, present_infos);

        for resource in &mut self.resources {
            resource.discard(device);
        }
    }

    /// Clears all frame state; the graph can be rebuilt for the next frame.
    #[instrument(level = "debug", skip_all)]
    pub fn reset(&mut self) {
        self.registry.clear();
        self.resources.clear();
        self.passes.clear();
        self.present_passes.clear();
        self.pass_resources.clear();
        self.pass_barriers.clear();
        self.adjacency_list.clear();
        self.topologically_sorted.clear();
        self.dependency_levels.clear();
    }

    /// Pass execution order derived by the last [`FrameGraph::compile`].
    pub fn execution_order(&self) -> &[PassId] {
        &self.topologically_sorted
    }

    /// Dependency levels derived by the last [`FrameGraph::compile`].
    pub fn dependency_levels(&self) -> &[DependencyLevel] {
        &self.dependency_levels
    }

    ///
    pub fn pass_name(&self, pass: PassId) -> &str {
        self.passes[pass.index()].pass.name()
    }

    fn create_texture(
        &mut self,
        creator: PassId,
        name: String,
        create_info: TextureCreateInfo,
    ) -> TextureHandle {
        let id = ResourceId::new(self.resources.len() as u32);
        self.resources.push(Resource::Texture(TextureResource {
            name,
            create_info,
            origin: TextureOrigin::Transient { creator },
            realized: None,
        }));
        self.pass_resources[creator.index()].creates.push(id);
        TextureHandle::new(id)
    }

    fn create_buffer(
        &mut self,
        creator: PassId,
        name: String,
        create_info: BufferCreateInfo,
    ) -> BufferHandle {
        let id = ResourceId::new(self.resources.len() as u32);
        self.resources.push(Resource::Buffer(BufferResource {
            name,
            create_info,
            origin: BufferOrigin::Transient { creator },
            realized: None,
        }));
        self.pass_resources[creator.index()].creates.push(id);
        BufferHandle::new(id)
    }

    /// An edge `A -> B` exists iff `B` reads a resource `A` writes.
    /// Write-after-write and write-after-read hazards are no edges; the
    /// barrier planner covers them from the per-resource timeline.
    fn build_adjacency_list(&mut self) {
        self.adjacency_list = vec![Vec::new(); self.passes.len()];

        for pass_index in 0..self.passes.len() {
            for other_index in 0..self.passes.len() {
                if pass_index == other_index {
                    continue;
                }

                let depends = self.pass_resources[other_index]
                    .reads
                    .keys()
                    .any(|read| self.pass_resources[pass_index].writes.contains_key(read));
                if depends {
                    self.adjacency_list[pass_index].push(PassId::new(other_index as u32));
                }
            }
        }
    }

    /// Iterative DFS; an edge closing onto an on-stack vertex is a cycle.
    /// The order is collected in post-order and reversed.
    fn topological_sort(&mut self) -> Result<(), FrameGraphError> {
        let num_passes = self.passes.len();
        let mut visited = vec![false; num_passes];
        let mut on_stack = vec![false; num_passes];
        let mut sorted: Vec<PassId> = Vec::with_capacity(num_passes);
        let mut stack: Vec<usize> = Vec::new();

        for root in 0..num_passes {
            if visited[root] {
                continue;
            }
            stack.push(root);

            while let Some(&current) = stack.last() {
                if visited[current] {
                    stack.pop();
                    if on_stack[current] {
                        on_stack[current] = false;
                        sorted.push(PassId::new(current as u32));
                    }
                    continue;
                }

                visited[current] = true;
                on_stack[current] = true;

                for &adjacent in &self.adjacency_list[current] {
                    if !visited[adjacent.index()] {
                        stack.push(adjacent.index());
                    } else if on_stack[adjacent.index()] {
                        return Err(FrameGraphError::CycleDetected {
                            from: self.passes[current].pass.name().to_string(),
                            to: self.passes[adjacent.index()].pass.name().to_string(),
                        });
                    }
                }
            }
        }

        sorted.reverse();
        self.topologically_sorted = sorted;
        Ok(())
    }

    /// Longest-path distance from any root, relaxed in topological order.
    fn build_dependency_levels(&mut self) {
        let num_passes = self.passes.len();
        let mut distances = vec![0u32; num_passes];
        let mut level_count = 1;

        for &pass_id in &self.topologically_sorted {
            let distance = distances[pass_id.index()] + 1;
            for &adjacent in &self.adjacency_list[pass_id.index()] {
                if distances[adjacent.index()] < distance {
                    distances[adjacent.index()] = distance;
                    level_count = level_count.max(distance + 1);
                }
            }
        }

        self.dependency_levels = (0..level_count)
            .map(|level| DependencyLevel {
                level,
                passes: Vec::new(),
            })
            .collect();

        for &pass_id in &self.topologically_sorted {
            let level = distances[pass_id.index()];
            self.dependency_levels[level as usize].passes.push(pass_id);
        }
    }

    fn build_barriers(&mut self) -> Result<(), FrameGraphError> {
        let mut last_usage: AHashMap<ResourceId, LastUsage> = AHashMap::new();

        let pass_order: Vec<PassId> = self
            .dependency_levels
            .iter()
            .flat_map(|level| level.passes.iter().copied())
            .collect();

        for pass_id in pass_order {
            let index = pass_id.index();
            let pass_queue = self.passes[index].pass.queue_type();
            let pass_name = self.passes[index].pass.name().to_string();

            // Hash-map order is not stable between frames; sorting keeps
            // recompiles reproducible.
            let mut resources_used: Vec<ResourceId> = self.pass_resources[index]
                .reads
                .keys()
                .chain(self.pass_resources[index].writes.keys())
                .copied()
                .collect();
            resources_used.sort_unstable();
            resources_used.dedup();

            for &resource_id in &resources_used {
                let Some(resource) = self.resources.get(resource_id.index()) else {
                    return Err(FrameGraphError::MissingResource {
                        pass: pass_name.clone(),
                        resource: format!("#{}", resource_id.raw()),
                    });
                };
                let resource_type = resource.resource_type();
                let imported_access = resource.imported_texture_access();
                let is_transient = resource.is_transient();
                let creator = resource.creator();

                let is_written = self.pass_resources[index].writes.contains_key(&resource_id);
                let is_read = self.pass_resources[index].reads.contains_key(&resource_id);

                let mut combined_usage = ResourceUsage::NONE;
                if let Some(read_usage) = self.pass_resources[index].reads.get(&resource_id) {
                    combined_usage |= *read_usage;
                }
                if let Some(write_usage) = self.pass_resources[index].writes.get(&resource_id) {
                    combined_usage |= *write_usage;
                }

                self.check_attachment_compatibility(
                    &pass_name,
                    resource_id,
                    combined_usage,
                    ResourceUsage::COLOR_ATTACHMENT,
                )?;
                self.check_attachment_compatibility(
                    &pass_name,
                    resource_id,
                    combined_usage,
                    ResourceUsage::DEPTH_STENCIL_ATTACHMENT,
                )?;

                match last_usage.get(&resource_id) {
                    Some(previous) => {
                        let same_queue = previous.queue.family_index(&self.queue_indices)
                            == pass_queue.family_index(&self.queue_indices);
                        // A write-only pass may discard the previous
                        // contents; anything that reads preserves them.
                        let discard_contents = is_written && !is_read;

                        if same_queue {
                            self.insert_barrier(
                                resource_id,
                                resource_type,
                                (previous.usage, previous.is_written),
                                pass_id,
                                (combined_usage, is_written),
                                discard_contents,
                            );
                        } else {
                            self.queue_ownership_transfer(
                                resource_id,
                                resource_type,
                                previous.pass,
                                (previous.usage, previous.is_written),
                                pass_id,
                                (combined_usage, is_written),
                                previous.queue,
                                pass_queue,
                                discard_contents,
                            );
                        }
                    }
                    None => {
                        // First consumer of this resource in the frame.
                        if is_transient && is_read {
                            return Err(FrameGraphError::MissingResource {
                                pass: pass_name.clone(),
                                resource: self.resources[resource_id.index()].name().to_string(),
                            });
                        }

                        trace!(
                            resource = resource_id.raw(),
                            creator = ?creator,
                            "first use of resource"
                        );

                        // Only textures need a barrier here; a transient's
                        // contents are undefined, an import's come with a
                        // recorded access.
                        if resource_type == ResourceType::Texture {
                            let (previous_access, discard_contents) = match imported_access {
                                Some(access) => (access, is_written && !is_read),
                                None => (AccessFlags::NONE, true),
                            };
                            let next_access = map_resource_usage(combined_usage, is_written);

                            self.pass_barriers[index].texture_barriers.before.push(
                                TextureBarrier {
                                    texture: resource_id,
                                    previous_access,
                                    next_access,
                                    source_queue: None,
                                    destination_queue: None,
                                    discard_contents,
                                },
                            );
                        }
                    }
                }

                // Reads synchronize against the producing write; only writes
                // move the hazard source forward.
                if is_written {
                    last_usage.insert(
                        resource_id,
                        LastUsage {
                            pass: pass_id,
                            queue: pass_queue,
                            usage: combined_usage,
                            is_written,
                        },
                    );
                }
            }

            if self.passes[index].pass.kind() == PassKind::Render {
                self.resolve_render_pass_accesses(pass_id, &pass_name, &resources_used, &last_usage)?;
            }
        }

        self.plan_present_barriers(&last_usage)?;
        Ok(())
    }

    fn check_attachment_compatibility(
        &self,
        pass_name: &str,
        resource_id: ResourceId,
        combined_usage: ResourceUsage,
        attachment: ResourceUsage,
    ) -> Result<(), FrameGraphError> {
        if !combined_usage.contains(attachment) {
            return Ok(());
        }

        let allowed = attachment
            | ResourceUsage::SHADER_GRAPHICS
            | ResourceUsage::SHADER_COMPUTE
            | ResourceUsage::TRANSFER;
        if combined_usage.intersects(ResourceUsage::ALL.difference(allowed)) {
            return Err(FrameGraphError::IllegalUsageCombination {
                pass: pass_name.to_string(),
                resource: self.resource_name(resource_id),
                attachment,
                usage: combined_usage,
            });
        }
        Ok(())
    }

    /// Same-queue transition. Buffers fold into the pass's before-global
    /// barrier; textures do too when the usage mask is unchanged, otherwise
    /// they get a dedicated barrier (the layout may change).
    fn insert_barrier(
        &mut self,
        resource_id: ResourceId,
        resource_type: ResourceType,
        (previous_usage, previous_written): (ResourceUsage, bool),
        pass_id: PassId,
        (next_usage, next_written): (ResourceUsage, bool),
        discard_contents: bool,
    ) {
        let previous_access = map_resource_usage(previous_usage, previous_written);
        let next_access = map_resource_usage(next_usage, next_written);
        let barriers = &mut self.pass_barriers[pass_id.index()];

        match resource_type {
            ResourceType::Buffer => {
                if previous_written || next_written {
                    merge_global_barrier(
                        &mut barriers.global_barrier.before,
                        previous_access,
                        next_access,
                    );
                }
            }
            ResourceType::Texture => {
                if previous_usage == next_usage {
                    if previous_written || next_written {
                        merge_global_barrier(
                            &mut barriers.global_barrier.before,
                            previous_access,
                            next_access,
                        );
                    }
                } else {
                    barriers.texture_barriers.before.push(TextureBarrier {
                        texture: resource_id,
                        previous_access,
                        next_access,
                        source_queue: None,
                        destination_queue: None,
                        discard_contents,
                    });
                }
            }
        }

        trace!(
            resource = resource_id.raw(),
            ?previous_access,
            ?next_access,
            "planned same-queue transition"
        );
    }

    /// Cross-queue transition: a release barrier after the previous pass and
    /// a matching acquire barrier before this one.
    #[allow(clippy::too_many_arguments)]
    fn queue_ownership_transfer(
        &mut self,
        resource_id: ResourceId,
        resource_type: ResourceType,
        previous_pass_id: PassId,
        (previous_usage, previous_written): (ResourceUsage, bool),
        pass_id: PassId,
        (next_usage, next_written): (ResourceUsage, bool),
        source_queue: QueueType,
        destination_queue: QueueType,
        discard_contents: bool,
    ) {
        let previous_access = map_resource_usage(previous_usage, previous_written);
        let next_access = map_resource_usage(next_usage, next_written);

        match resource_type {
            ResourceType::Buffer => {
                let barrier = BufferBarrier {
                    buffer: resource_id,
                    previous_access,
                    next_access,
                    source_queue: Some(source_queue),
                    destination_queue: Some(destination_queue),
                };

                self.pass_barriers[previous_pass_id.index()]
                    .buffer_barriers
                    .after
                    .push(barrier.clone());
                self.pass_barriers[pass_id.index()]
                    .buffer_barriers
                    .before
                    .push(barrier);
            }
            ResourceType::Texture => {
                let barrier = TextureBarrier {
                    texture: resource_id,
                    previous_access,
                    next_access,
                    source_queue: Some(source_queue),
                    destination_queue: Some(destination_queue),
                    discard_contents,
                };

                self.pass_barriers[previous_pass_id.index()]
                    .texture_barriers
                    .after
                    .push(barrier.clone());
                self.pass_barriers[pass_id.index()]
                    .texture_barriers
                    .before
                    .push(barrier);
            }
        }

        trace!(
            resource = resource_id.raw(),
            ?source_queue,
            ?destination_queue,
            "planned queue ownership transfer"
        );
    }

    /// Fills the per-attachment accesses of the backend render-pass
    /// descriptor; the backend derives image layouts from them.
    fn resolve_render_pass_accesses(
        &mut self,
        pass_id: PassId,
        pass_name: &str,
        resources_used: &[ResourceId],
        last_usage: &AHashMap<ResourceId, LastUsage>,
    ) -> Result<(), FrameGraphError> {
        let attachment_access = |texture: AttachmentTexture| -> Result<AccessFlags, FrameGraphError> {
            let resource_id = texture.resource_id();
            if resources_used.binary_search(&resource_id).is_err() {
                return Err(FrameGraphError::MissingResource {
                    pass: pass_name.to_string(),
                    resource: self.resource_name(resource_id),
                });
            }
            let entry = last_usage
                .get(&resource_id)
                .ok_or_else(|| FrameGraphError::MissingResource {
                    pass: pass_name.to_string(),
                    resource: self.resource_name(resource_id),
                })?;
            Ok(map_resource_usage(entry.usage, entry.is_written))
        };

        let declaration = self.passes[pass_id.index()]
            .declaration
            .as_ref()
            .expect("render pass without attachment declaration");

        let mut resolved = ember_rhi::RenderPass::default();
        resolved
            .color_attachments
            .reserve(declaration.color_attachments.len());

        for attachment in &declaration.color_attachments {
            let resolve_texture = match attachment.resolve_texture {
                Some(texture) => Some(ember_rhi::ResolveTexture {
                    texture_access: attachment_access(texture)?,
                    // The realized handle is filled in at execute time.
                    resolve_texture: ember_rhi::AttachmentTexture::Texture(
                        ember_rhi::TextureHandle::NULL,
                    ),
                }),
                None => None,
            };

            resolved.color_attachments.push(ember_rhi::ColorAttachment {
                ops: attachment.ops,
                texture_access: attachment_access(attachment.texture)?,
                texture: ember_rhi::AttachmentTexture::Texture(ember_rhi::TextureHandle::NULL),
                resolve_texture,
                clear_value: attachment.clear_value,
            });
        }

        if let Some(attachment) = &declaration.depth_stencil_attachment {
            let resolve_texture = match attachment.resolve_texture {
                Some(texture) => Some(ember_rhi::ResolveTexture {
                    texture_access: attachment_access(texture)?,
                    resolve_texture: ember_rhi::AttachmentTexture::Texture(
                        ember_rhi::TextureHandle::NULL,
                    ),
                }),
                None => None,
            };

            resolved.depth_stencil_attachment = Some(ember_rhi::DepthStencilAttachment {
                ops: attachment.ops,
                stencil_ops: attachment.stencil_ops,
                texture_access: attachment_access(attachment.texture)?,
                texture: ember_rhi::AttachmentTexture::Texture(ember_rhi::TextureHandle::NULL),
                resolve_texture,
                clear_value: attachment.clear_value,
            });
        }

        self.passes[pass_id.index()].resolved = Some(resolved);
        Ok(())
    }

    /// Plans the swapchain handoff for every present pass: a plain
    /// transition when the last producer runs on the present family, a
    /// release/acquire pair otherwise.
    fn plan_present_barriers(
        &mut self,
        last_usage: &AHashMap<ResourceId, LastUsage>,
    ) -> Result<(), FrameGraphError> {
        for present_index in 0..self.present_passes.len() {
            let resource_id = self.present_passes[present_index].texture.resource_id();

            let Some(entry) = last_usage.get(&resource_id) else {
                return Err(FrameGraphError::UnusedResource {
                    resource: self.resource_name(resource_id),
                });
            };

            let previous_access = map_resource_usage(entry.usage, entry.is_written);
            let same_queue = entry.queue.family_index(&self.queue_indices)
                == QueueType::Present.family_index(&self.queue_indices);

            if same_queue {
                self.present_passes[present_index].barrier = Some(TextureBarrier {
                    texture: resource_id,
                    previous_access,
                    next_access: PRESENT_ACCESS,
                    source_queue: None,
                    destination_queue: None,
                    discard_contents: false,
                });
            } else {
                let barrier = TextureBarrier {
                    texture: resource_id,
                    previous_access,
                    next_access: PRESENT_ACCESS,
                    source_queue: Some(entry.queue),
                    destination_queue: Some(QueueType::Present),
                    discard_contents: false,
                };

                self.pass_barriers[entry.pass.index()]
                    .texture_barriers
                    .after
                    .push(barrier.clone());
                self.present_passes[present_index].barrier = Some(barrier);
            }
        }
        Ok(())
    }

    fn resource_name(&self, resource_id: ResourceId) -> String {
        match self.resources.get(resource_id.index()) {
            Some(resource) => resource.name().to_string(),
            None => format!("#{}", resource_id.raw()),
        }
    }
}

fn render_pass_contains_duplicates(render_pass: &RenderPass) -> bool {
    let mut seen: Vec<ResourceId> = Vec::new();
    let mut insert = |texture: AttachmentTexture| {
        let id = texture.resource_id();
        if seen.contains(&id) {
            return true;
        }
        seen.push(id);
        false
    };

    for attachment in &render_pass.color_attachments {
        if insert(attachment.texture) {
            return true;
        }
        if let Some(resolve) = attachment.resolve_texture
            && insert(resolve)
        {
            return true;
        }
    }

    if let Some(attachment) = &render_pass.depth_stencil_attachment {
        if insert(attachment.texture) {
            return true;
        }
        if let Some(resolve) = attachment.resolve_texture
            && insert(resolve)
        {
            return true;
        }
    }

    false
}

fn merge_global_barrier(
    slot: &mut Option<ember_rhi::GlobalBarrier>,
    previous_access: AccessFlags,
    next_access: AccessFlags,
) {
    match slot {
        Some(barrier) => {
            barrier.previous_access |= previous_access;
            barrier.next_access |= next_access;
        }
        None => {
            *slot = Some(ember_rhi::GlobalBarrier {
                previous_access,
                next_access,
            });
        }
    }
}

fn translate_barriers(
    registry: &Registry,
    encoder: &mut CommandEncoder,
    global_barrier: Option<ember_rhi::GlobalBarrier>,
    texture_barriers: &[TextureBarrier],
    buffer_barriers: &[BufferBarrier],
) {
    if let Some(barrier) = global_barrier {
        encoder.global_barrier(barrier);
    }

    if !texture_barriers.is_empty() {
        encoder.texture_barrier(
            texture_barriers
                .iter()
                .map(|barrier| translate_texture_barrier(registry, barrier))
                .collect(),
        );
    }

    if !buffer_barriers.is_empty() {
        encoder.buffer_barrier(
            buffer_barriers
                .iter()
                .map(|barrier| ember_rhi::BufferBarrier {
                    buffer: registry.get_buffer(BufferHandle::new(barrier.buffer)),
                    previous_access: barrier.previous_access,
                    next_access: barrier.next_access,
                    source_queue: barrier.source_queue.map(QueueType::to_rhi),
                    destination_queue: barrier.destination_queue.map(QueueType::to_rhi),
                    subresource_range: ember_rhi::BufferSubresourceRange::default(),
                })
                .collect(),
        );
    }
}

fn translate_texture_barrier(
    registry: &Registry,
    barrier: &TextureBarrier,
) -> ember_rhi::TextureBarrier {
    ember_rhi::TextureBarrier {
        texture: registry.get_texture(TextureHandle::new(barrier.texture)),
        previous_access: barrier.previous_access,
        next_access: barrier.next_access,
        source_queue: barrier.source_queue.map(QueueType::to_rhi),
        destination_queue: barrier.destination_queue.map(QueueType::to_rhi),
        subresource_range: ember_rhi::TextureSubresourceRange::default(),
        discard_contents: barrier.discard_contents,
    }
}

fn resolve_attachment_textures(
    template: &ember_rhi::RenderPass,
    declaration: &RenderPass,
    registry: &Registry,
) -> ember_rhi::RenderPass {
    let resolve = |texture: AttachmentTexture| -> ember_rhi::AttachmentTexture {
        match texture {
            AttachmentTexture::Texture(handle) => {
                ember_rhi::AttachmentTexture::Texture(registry.get_texture(handle))
            }
            AttachmentTexture::TextureView(_) => {
                unreachable!("the graph never mints texture view handles")
            }
        }
    };

    let mut resolved = template.clone();

    for (slot, attachment) in declaration.color_attachments.iter().enumerate() {
        resolved.color_attachments[slot].texture = resolve(attachment.texture);
        if let Some(resolve_texture) = attachment.resolve_texture {
            resolved.color_attachments[slot]
                .resolve_texture
                .as_mut()
                .expect("resolve attachment lost between compile and execute")
                .resolve_texture = resolve(resolve_texture);
        }
    }

    if let (Some(attachment), Some(resolved_attachment)) = (
        declaration.depth_stencil_attachment.as_ref(),
        resolved.depth_stencil_attachment.as_mut(),
    ) {
        resolved_attachment.texture = resolve(attachment.texture);
        if let Some(resolve_texture) = attachment.resolve_texture {
            resolved_attachment
                .resolve_texture
                .as_mut()
                .expect("resolve attachment lost between compile and execute")
                .resolve_texture = resolve(resolve_texture);
        }
    }

    resolved
}

fn push_or_coalesce(
    submit_infos: &mut Vec<SubmitInfo>,
    encoder: CommandEncoder,
    queue_type: QueueType,
) {
    let rhi_queue = queue_type.to_rhi();

    if let Some(last) = submit_infos.last_mut()
        && last.queue_type == rhi_queue
    {
        last.encoders.push(encoder);
        return;
    }

    submit_infos.push(SubmitInfo {
        encoders: vec![encoder],
        synchronization_stage: queue_type.synchronization_stage(),
        queue_type: rhi_queue,
    });
}
