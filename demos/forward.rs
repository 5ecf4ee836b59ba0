//! A small forward-rendering frame on the headless device.
//!
//! Declares a depth prepass, an async-compute light culling pass, a forward
//! color pass and a present, then prints what the graph actually submitted.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example forward
//! ```

use ember_graph::frame_graph::{
    AttachmentTexture, BufferCreateInfo, ColorAttachment, DepthStencilAttachment, FrameGraph,
    QueueType, ResourceUsage, TextureCreateInfo,
};
use ember_headless::HeadlessDevice;
use ember_rhi::{
    AttachmentOps, BufferUpdateRegion, BufferUsageFlags, ClearDepthStencil, ClearValue, Command,
    DeviceContext, Rect, SwapchainHandle, TextureFormat, TextureKind, TextureUsageFlags,
};
use glam::{Mat4, UVec2, Vec3, Vec4};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
}

fn texture_2d(format: TextureFormat, usage: TextureUsageFlags) -> TextureCreateInfo {
    TextureCreateInfo {
        kind: TextureKind::Texture2D {
            width: WIDTH,
            height: HEIGHT,
            num_layers: 1,
            num_mips: 1,
            sample_count: ember_rhi::SampleCount::Count1,
        },
        format,
        usage,
        ..Default::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut device = HeadlessDevice::new();
    let swapchain = SwapchainHandle::from_raw(1);

    // A persistent camera buffer owned by the application, refreshed every
    // frame.
    let camera_info = BufferCreateInfo {
        usage: BufferUsageFlags::UNIFORM_BUFFER | BufferUsageFlags::TRANSFER_DESTINATION,
        size: std::mem::size_of::<CameraUniforms>() as u64,
        ..Default::default()
    };
    let camera_backend = device.create_buffer(ember_rhi::BufferCreateInfo {
        usage: camera_info.usage,
        memory_type: camera_info.memory_type,
        size: camera_info.size,
        name: "camera".to_string(),
    });

    let view = Mat4::look_at_rh(Vec3::new(0.0, 2.0, 6.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(
        60f32.to_radians(),
        WIDTH as f32 / HEIGHT as f32,
        0.1,
        100.0,
    );
    let uniforms = CameraUniforms {
        view_proj: (projection * view).to_cols_array_2d(),
    };

    let mut frame_graph = FrameGraph::new(&device);
    let camera = frame_graph.import_buffer("camera", camera_backend, camera_info);

    let depth = frame_graph
        .add_render_pass(
            QueueType::Graphics,
            "depth_prepass",
            |builder, render_pass| {
                let depth = builder.create_texture(
                    "depth",
                    texture_2d(
                        TextureFormat::D32_FLOAT,
                        TextureUsageFlags::DEPTH_ATTACHMENT | TextureUsageFlags::SRV,
                    ),
                );
                builder.write(depth, ResourceUsage::DEPTH_STENCIL_ATTACHMENT);
                builder.read(camera, ResourceUsage::SHADER_GRAPHICS);

                render_pass.depth_stencil_attachment = Some(DepthStencilAttachment {
                    ops: AttachmentOps::INIT,
                    stencil_ops: AttachmentOps::DONT_CARE,
                    texture: AttachmentTexture::Texture(depth),
                    resolve_texture: None,
                    clear_value: ClearDepthStencil {
                        depth: 0.0,
                        stencil: 0,
                    },
                });

                depth
            },
            move |device, registry, encoder, _data: &_, render_pass| {
                device.update_buffer(
                    registry.get_buffer(camera),
                    &[BufferUpdateRegion {
                        src: bytemuck::bytes_of(&uniforms),
                        dst_offset: 0,
                    }],
                );
                encoder.begin_render_pass(
                    Rect::from_extent(UVec2::new(WIDTH, HEIGHT)),
                    render_pass.clone(),
                );
                encoder.end_render_pass();
            },
        )
        .expect("depth prepass declaration is valid");

    let lights = frame_graph.add_pass(
        QueueType::AsyncCompute,
        "light_culling",
        |builder| {
            builder.read(depth, ResourceUsage::SHADER_COMPUTE);
            builder.read(camera, ResourceUsage::SHADER_COMPUTE);
            let lights = builder.create_buffer(
                "light_list",
                BufferCreateInfo {
                    usage: BufferUsageFlags::STORAGE_BUFFER,
                    size: 64 * 1024,
                    ..Default::default()
                },
            );
            builder.write(lights, ResourceUsage::SHADER_COMPUTE)
        },
        |_, _, encoder, _| {
            encoder.dispatch(WIDTH.div_ceil(16), HEIGHT.div_ceil(16), 1);
        },
    );

    let color = frame_graph
        .add_render_pass(
            QueueType::Graphics,
            "forward",
            |builder, render_pass| {
                builder.read(lights, ResourceUsage::SHADER_GRAPHICS);
                builder.read(camera, ResourceUsage::SHADER_GRAPHICS);
                builder.read(depth, ResourceUsage::DEPTH_STENCIL_ATTACHMENT);

                let color = builder.create_texture(
                    "color",
                    texture_2d(
                        TextureFormat::B8_G8_R8_A8_UNORM,
                        TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::PRESENT,
                    ),
                );
                builder.write(color, ResourceUsage::COLOR_ATTACHMENT);

                render_pass.color_attachments.push(ColorAttachment {
                    ops: AttachmentOps::INIT,
                    texture: AttachmentTexture::Texture(color),
                    resolve_texture: None,
                    clear_value: ClearValue::Float(Vec4::new(0.05, 0.05, 0.08, 1.0)),
                });
                render_pass.depth_stencil_attachment = Some(DepthStencilAttachment {
                    ops: AttachmentOps::PRESERVE,
                    stencil_ops: AttachmentOps::DONT_CARE,
                    texture: AttachmentTexture::Texture(depth),
                    resolve_texture: None,
                    clear_value: ClearDepthStencil::default(),
                });

                color
            },
            |_, _, encoder, _: &_, render_pass| {
                encoder.begin_render_pass(
                    Rect::from_extent(UVec2::new(WIDTH, HEIGHT)),
                    render_pass.clone(),
                );
                encoder.draw(3, 0);
                encoder.end_render_pass();
            },
        )
        .expect("forward pass declaration is valid");

    frame_graph
        .add_present_pass(swapchain, color)
        .expect("color target is presentable");

    frame_graph.compile().expect("frame graph compiles");
    frame_graph.execute(&mut device);

    print_submissions(&device);

    frame_graph.reset();
    device.destroy_buffer(camera_backend);
}

fn print_submissions(device: &HeadlessDevice) {
    for submission in device.submissions() {
        for submit_info in &submission.submit_infos {
            println!(
                "[{:?}] {} encoder(s), stage {:?}",
                submit_info.queue_type,
                submit_info.encoders.len(),
                submit_info.synchronization_stage,
            );

            for encoder in &submit_info.encoders {
                let mut region = "<unnamed>";
                let mut barrier_batches = 0;
                let mut draws_and_dispatches = 0;
                for command in encoder.commands() {
                    match command {
                        Command::BeginRegion { name, .. } => region = name.as_str(),
                        Command::GlobalBarrier { .. }
                        | Command::TextureBarrier { .. }
                        | Command::BufferBarrier { .. } => barrier_batches += 1,
                        Command::Draw { .. }
                        | Command::DrawIndexed { .. }
                        | Command::Dispatch { .. } => draws_and_dispatches += 1,
                        _ => {}
                    }
                }
                println!(
                    "    {region}: {} command(s), {barrier_batches} barrier batch(es), \
                     {draws_and_dispatches} draw/dispatch",
                    encoder.commands().len(),
                );
            }
        }

        for present_info in &submission.present_infos {
            println!(
                "present swapchain {:?} <- texture {:?} ({:?})",
                present_info.swapchain, present_info.texture, present_info.texture_previous_access,
            );
        }
    }
}
