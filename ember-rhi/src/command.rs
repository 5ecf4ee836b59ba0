//! Command recording.
//!
//! The encoder does not talk to the GPU. It records an ordered list of
//! [`Command`] values that a backend walks during submission; keeping the
//! stream as plain data is also what lets debugging layers re-walk it.

use crate::barrier::{BufferBarrier, GlobalBarrier, TextureBarrier};
use crate::buffer::BufferCopyRegion;
use crate::handle::{BufferHandle, GraphicsPipelineHandle, TextureHandle};
use crate::render_pass::RenderPass;
use crate::texture::{BufferTextureCopyRegion, TextureCopyRegion};
use glam::{IVec2, UVec2, Vec4};

///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub offset: IVec2,
    pub extent: UVec2,
}

impl Rect {
    pub const fn from_extent(extent: UVec2) -> Self {
        Self {
            offset: IVec2::ZERO,
            extent,
        }
    }
}

///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub rect: Rect,
    pub depth_min: f32,
    pub depth_max: f32,
}

///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scissor {
    pub offset: IVec2,
    pub extent: UVec2,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullingMode {
    None,
    Front,
    #[default]
    Back,
}

///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    U16,
    U32,
}

/// A single recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginCommandBuffer,
    EndCommandBuffer,
    BeginRegion {
        name: String,
        color: Vec4,
    },
    EndRegion,
    BeginRenderPass {
        render_area: Rect,
        render_pass: RenderPass,
    },
    EndRenderPass,
    PushConstants {
        buffer: BufferHandle,
        offset: u32,
    },
    BindGraphicsPipeline {
        pipeline: GraphicsPipelineHandle,
    },
    SetViewport {
        viewport: Viewport,
    },
    SetScissor {
        scissor: Scissor,
    },
    SetCullingMode {
        culling_mode: CullingMode,
    },
    BindIndexBuffer {
        buffer: BufferHandle,
        offset: u64,
        index_type: IndexType,
    },
    Draw {
        vertex_count: u32,
        first_vertex: u32,
    },
    DrawIndexed {
        index_count: u32,
        first_index: u32,
        vertex_offset: i32,
    },
    DrawIndexedInstanced {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    },
    DrawIndexedIndirect {
        buffer: BufferHandle,
        offset: u64,
        draw_count: u32,
        stride: u32,
    },
    DrawIndexedIndirectCount {
        buffer: BufferHandle,
        offset: u64,
        count_buffer: BufferHandle,
        count_buffer_offset: u64,
        max_draw_count: u32,
        stride: u32,
    },
    Dispatch {
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    },
    DispatchIndirect {
        buffer: BufferHandle,
        offset: u64,
    },
    BufferCopy {
        src: BufferHandle,
        dst: BufferHandle,
        regions: Vec<BufferCopyRegion>,
    },
    TextureCopy {
        src: TextureHandle,
        dst: TextureHandle,
        regions: Vec<TextureCopyRegion>,
    },
    CopyBufferToTexture {
        src: BufferHandle,
        dst: TextureHandle,
        regions: Vec<BufferTextureCopyRegion>,
    },
    CopyTextureToBuffer {
        src: TextureHandle,
        dst: BufferHandle,
        regions: Vec<BufferTextureCopyRegion>,
    },
    GlobalBarrier {
        barrier: GlobalBarrier,
    },
    TextureBarrier {
        barriers: Vec<TextureBarrier>,
    },
    BufferBarrier {
        barriers: Vec<BufferBarrier>,
    },
}

///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandEncoder {
    commands: Vec<Command>,
}

impl CommandEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded stream, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops every recorded command so the encoder can be reused.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn begin_command_buffer(&mut self) {
        self.commands.push(Command::BeginCommandBuffer);
    }

    pub fn end_command_buffer(&mut self) {
        self.commands.push(Command::EndCommandBuffer);
    }

    /// Opens a named debug region.
    pub fn begin_region(&mut self, name: impl Into<String>, color: Vec4) {
        self.commands.push(Command::BeginRegion {
            name: name.into(),
            color,
        });
    }

    pub fn end_region(&mut self) {
        self.commands.push(Command::EndRegion);
    }

    pub fn begin_render_pass(&mut self, render_area: Rect, render_pass: RenderPass) {
        self.commands.push(Command::BeginRenderPass {
            render_area,
            render_pass,
        });
    }

    pub fn end_render_pass(&mut self) {
        self.commands.push(Command::EndRenderPass);
    }

    pub fn push_constants(&mut self, buffer: BufferHandle, offset: u32) {
        self.commands.push(Command::PushConstants { buffer, offset });
    }

    pub fn bind_graphics_pipeline(&mut self, pipeline: GraphicsPipelineHandle) {
        self.commands.push(Command::BindGraphicsPipeline { pipeline });
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(Command::SetViewport { viewport });
    }

    pub fn set_scissor(&mut self, scissor: Scissor) {
        self.commands.push(Command::SetScissor { scissor });
    }

    pub fn set_culling_mode(&mut self, culling_mode: CullingMode) {
        self.commands.push(Command::SetCullingMode { culling_mode });
    }

    pub fn bind_index_buffer(&mut self, buffer: BufferHandle, offset: u64, index_type: IndexType) {
        self.commands.push(Command::BindIndexBuffer {
            buffer,
            offset,
            index_type,
        });
    }

    pub fn draw(&mut self, vertex_count: u32, first_vertex: u32) {
        self.commands.push(Command::Draw {
            vertex_count,
            first_vertex,
        });
    }

    pub fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) {
        self.commands.push(Command::DrawIndexed {
            index_count,
            first_index,
            vertex_offset,
        });
    }

    pub fn draw_indexed_instanced(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        self.commands.push(Command::DrawIndexedInstanced {
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        });
    }

    pub fn draw_indexed_indirect(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        draw_count: u32,
        stride: u32,
    ) {
        self.commands.push(Command::DrawIndexedIndirect {
            buffer,
            offset,
            draw_count,
            stride,
        });
    }

    pub fn draw_indexed_indirect_count(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        count_buffer: BufferHandle,
        count_buffer_offset: u64,
        max_draw_count: u32,
        stride: u32,
    ) {
        self.commands.push(Command::DrawIndexedIndirectCount {
            buffer,
            offset,
            count_buffer,
            count_buffer_offset,
            max_draw_count,
            stride,
        });
    }

    pub fn dispatch(&mut self, group_count_x: u32, group_count_y: u32, group_count_z: u32) {
        self.commands.push(Command::Dispatch {
            group_count_x,
            group_count_y,
            group_count_z,
        });
    }

    pub fn dispatch_indirect(&mut self, buffer: BufferHandle, offset: u64) {
        self.commands.push(Command::DispatchIndirect { buffer, offset });
    }

    pub fn buffer_copy(
        &mut self,
        src: BufferHandle,
        dst: BufferHandle,
        regions: Vec<BufferCopyRegion>,
    ) {
        self.commands.push(Command::BufferCopy { src, dst, regions });
    }

    pub fn texture_copy(
        &mut self,
        src: TextureHandle,
        dst: TextureHandle,
        regions: Vec<TextureCopyRegion>,
    ) {
        self.commands.push(Command::TextureCopy { src, dst, regions });
    }

    pub fn copy_buffer_to_texture(
        &mut self,
        src: BufferHandle,
        dst: TextureHandle,
        regions: Vec<BufferTextureCopyRegion>,
    ) {
        self.commands
            .push(Command::CopyBufferToTexture { src, dst, regions });
    }

    pub fn copy_texture_to_buffer(
        &mut self,
        src: TextureHandle,
        dst: BufferHandle,
        regions: Vec<BufferTextureCopyRegion>,
    ) {
        self.commands
            .push(Command::CopyTextureToBuffer { src, dst, regions });
    }

    pub fn global_barrier(&mut self, barrier: GlobalBarrier) {
        self.commands.push(Command::GlobalBarrier { barrier });
    }

    pub fn texture_barrier(&mut self, barriers: Vec<TextureBarrier>) {
        self.commands.push(Command::TextureBarrier { barriers });
    }

    pub fn buffer_barrier(&mut self, barriers: Vec<BufferBarrier>) {
        self.commands.push(Command::BufferBarrier { barriers });
    }
}
