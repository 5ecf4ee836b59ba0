//! End-to-end scenarios driven through a headless device.

use ember_graph::frame_graph::{
    AttachmentTexture, ColorAttachment, FrameGraph, QueueType, ResourceUsage, TextureCreateInfo,
};
use ember_graph::FrameGraphError;
use ember_headless::HeadlessDevice;
use ember_rhi::{
    AccessFlags, AttachmentOps, ClearValue, Command, CommandEncoder, Rect, SwapchainHandle,
    TextureFormat, TextureKind, TextureUsageFlags,
};
use glam::{UVec2, UVec4};

fn presentable_texture(width: u32, height: u32) -> TextureCreateInfo {
    TextureCreateInfo {
        kind: TextureKind::Texture2D {
            width,
            height,
            num_layers: 1,
            num_mips: 1,
            sample_count: ember_rhi::SampleCount::Count1,
        },
        format: TextureFormat::R8_G8_B8_A8_UNORM,
        usage: TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::PRESENT,
        ..Default::default()
    }
}

fn color_texture(width: u32, height: u32) -> TextureCreateInfo {
    TextureCreateInfo {
        kind: TextureKind::Texture2D {
            width,
            height,
            num_layers: 1,
            num_mips: 1,
            sample_count: ember_rhi::SampleCount::Count1,
        },
        format: TextureFormat::R8_G8_B8_A8_UNORM,
        usage: TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::SRV,
        ..Default::default()
    }
}

/// All commands of one encoder, skipping the begin/end bookkeeping.
fn texture_barrier_commands(encoder: &CommandEncoder) -> Vec<&[ember_rhi::TextureBarrier]> {
    encoder
        .commands()
        .iter()
        .filter_map(|command| match command {
            Command::TextureBarrier { barriers } => Some(barriers.as_slice()),
            _ => None,
        })
        .collect()
}

fn buffer_barrier_commands(encoder: &CommandEncoder) -> Vec<&[ember_rhi::BufferBarrier]> {
    encoder
        .commands()
        .iter()
        .filter_map(|command| match command {
            Command::BufferBarrier { barriers } => Some(barriers.as_slice()),
            _ => None,
        })
        .collect()
}

fn region_name(encoder: &CommandEncoder) -> &str {
    encoder
        .commands()
        .iter()
        .find_map(|command| match command {
            Command::BeginRegion { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .expect("encoder has no debug region")
}

#[test]
fn cycle_is_a_compile_error() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let texture_t = frame_graph.import_texture(
        "t",
        ember_rhi::TextureHandle::from_raw(100),
        color_texture(16, 16),
        AccessFlags::SRV_GRAPHICS,
    );
    let texture_u = frame_graph.import_texture(
        "u",
        ember_rhi::TextureHandle::from_raw(101),
        color_texture(16, 16),
        AccessFlags::SRV_GRAPHICS,
    );

    frame_graph.add_pass(
        QueueType::Graphics,
        "a",
        |builder| {
            builder.write(texture_t, ResourceUsage::SHADER_GRAPHICS);
            builder.read(texture_u, ResourceUsage::SHADER_GRAPHICS);
        },
        |_, _, _, _: &()| {},
    );
    frame_graph.add_pass(
        QueueType::Graphics,
        "b",
        |builder| {
            builder.write(texture_u, ResourceUsage::SHADER_GRAPHICS);
            builder.read(texture_t, ResourceUsage::SHADER_GRAPHICS);
        },
        |_, _, _, _: &()| {},
    );

    let error = frame_graph.compile().unwrap_err();
    assert!(matches!(error, FrameGraphError::CycleDetected { .. }));
}

#[test]
fn single_render_pass_with_present() {
    let mut device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);
    let swapchain = SwapchainHandle::from_raw(1);

    let target = frame_graph
        .add_render_pass(
            QueueType::Graphics,
            "clear",
            |builder, render_pass| {
                let target = builder.create_texture("backbuffer", presentable_texture(1920, 1080));
                builder.write(target, ResourceUsage::COLOR_ATTACHMENT);
                render_pass.color_attachments.push(ColorAttachment {
                    ops: AttachmentOps::INIT,
                    texture: AttachmentTexture::Texture(target),
                    resolve_texture: None,
                    clear_value: ClearValue::Uint(UVec4::new(0xffff_ffff, 0, 0, 0)),
                });
                target
            },
            |_, _, encoder, _, render_pass| {
                encoder.begin_render_pass(
                    Rect::from_extent(UVec2::new(1920, 1080)),
                    render_pass.clone(),
                );
                encoder.end_render_pass();
            },
        )
        .unwrap();

    frame_graph.add_present_pass(swapchain, target).unwrap();
    frame_graph.compile().unwrap();
    frame_graph.execute(&mut device);

    let submission = &device.submissions()[0];
    assert_eq!(submission.submit_infos.len(), 2);

    // First submission: the clear pass on the graphics queue.
    let clear_submit = &submission.submit_infos[0];
    assert_eq!(clear_submit.queue_type, ember_rhi::QueueType::Graphics);
    assert_eq!(clear_submit.encoders.len(), 1);
    let clear_encoder = &clear_submit.encoders[0];
    assert_eq!(region_name(clear_encoder), "clear");

    let barriers = texture_barrier_commands(clear_encoder);
    assert_eq!(barriers.len(), 1);
    assert_eq!(barriers[0].len(), 1);
    let first_touch = &barriers[0][0];
    assert_eq!(first_touch.previous_access, AccessFlags::NONE);
    assert_eq!(first_touch.next_access, AccessFlags::COLOR_ATTACHMENT_WRITE);
    assert!(first_touch.discard_contents);
    assert!(first_touch.source_queue.is_none());

    // The resolved render pass carries the write access for the attachment.
    let begin_render_pass = clear_encoder
        .commands()
        .iter()
        .find_map(|command| match command {
            Command::BeginRenderPass { render_pass, .. } => Some(render_pass),
            _ => None,
        })
        .expect("no render pass begun");
    assert_eq!(
        begin_render_pass.color_attachments[0].texture_access,
        AccessFlags::COLOR_ATTACHMENT_WRITE
    );
    let ember_rhi::AttachmentTexture::Texture(attachment_texture) =
        begin_render_pass.color_attachments[0].texture
    else {
        panic!("attachment did not resolve to a texture");
    };
    assert!(attachment_texture.is_valid());

    // Second submission: the present barrier and handoff.
    let present_submit = &submission.submit_infos[1];
    assert_eq!(present_submit.queue_type, ember_rhi::QueueType::Present);
    let present_encoder = &present_submit.encoders[0];
    let barriers = texture_barrier_commands(present_encoder);
    assert_eq!(barriers.len(), 1);
    let handoff = &barriers[0][0];
    assert_eq!(handoff.previous_access, AccessFlags::COLOR_ATTACHMENT_WRITE);
    assert_eq!(handoff.next_access, AccessFlags::TRANSFER_SOURCE);
    assert!(!handoff.discard_contents);

    assert_eq!(submission.present_infos.len(), 1);
    assert_eq!(submission.present_infos[0].swapchain, swapchain);
    assert_eq!(
        submission.present_infos[0].texture_previous_access,
        AccessFlags::TRANSFER_SOURCE
    );

    // The backbuffer is transient: allocated for the frame, then destroyed.
    assert_eq!(device.alive_texture_count(), 0);
    assert_eq!(device.destroyed_textures().len(), 1);
}

#[test]
fn cross_queue_buffer_handoff() {
    let mut device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let buffer = frame_graph.add_pass(
        QueueType::AsyncCompute,
        "producer",
        |builder| {
            let buffer = builder.create_buffer(
                "draw_args",
                ember_graph::frame_graph::BufferCreateInfo {
                    usage: ember_rhi::BufferUsageFlags::STORAGE_BUFFER
                        | ember_rhi::BufferUsageFlags::INDIRECT_BUFFER,
                    size: 256,
                    ..Default::default()
                },
            );
            builder.write(buffer, ResourceUsage::SHADER_COMPUTE)
        },
        |_, _, encoder, _| {
            encoder.dispatch(1, 1, 1);
        },
    );

    frame_graph.add_pass(
        QueueType::Graphics,
        "consumer",
        |builder| {
            builder.read(buffer, ResourceUsage::INDIRECT_BUFFER);
        },
        |_, _, _, _: &()| {},
    );

    frame_graph.compile().unwrap();
    frame_graph.execute(&mut device);

    let submission = &device.submissions()[0];
    assert_eq!(submission.submit_infos.len(), 2);
    assert_eq!(
        submission.submit_infos[0].queue_type,
        ember_rhi::QueueType::Compute
    );
    assert_eq!(
        submission.submit_infos[1].queue_type,
        ember_rhi::QueueType::Graphics
    );

    let producer_encoder = &submission.submit_infos[0].encoders[0];
    let release_batches = buffer_barrier_commands(producer_encoder);
    assert_eq!(release_batches.len(), 1);
    let release = &release_batches[0][0];
    assert_eq!(release.previous_access, AccessFlags::UAV_COMPUTE);
    assert_eq!(release.next_access, AccessFlags::INDIRECT_BUFFER);
    assert_eq!(release.source_queue, Some(ember_rhi::QueueType::Compute));
    assert_eq!(release.destination_queue, Some(ember_rhi::QueueType::Graphics));

    // The release sits after the producer's own work.
    let producer_commands = producer_encoder.commands();
    let dispatch_position = producer_commands
        .iter()
        .position(|command| matches!(command, Command::Dispatch { .. }))
        .unwrap();
    let release_position = producer_commands
        .iter()
        .position(|command| matches!(command, Command::BufferBarrier { .. }))
        .unwrap();
    assert!(release_position > dispatch_position);

    let consumer_encoder = &submission.submit_infos[1].encoders[0];
    let acquire_batches = buffer_barrier_commands(consumer_encoder);
    assert_eq!(acquire_batches.len(), 1);
    assert_eq!(&acquire_batches[0][0], release);
}

#[test]
fn independent_passes_share_a_dependency_level() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let t1 = frame_graph.add_pass(
        QueueType::Graphics,
        "a",
        |builder| {
            let t1 = builder.create_texture("t1", color_texture(64, 64));
            builder.write(t1, ResourceUsage::COLOR_ATTACHMENT)
        },
        |_, _, _, _| {},
    );
    let t2 = frame_graph.add_pass(
        QueueType::Graphics,
        "b",
        |builder| {
            let t2 = builder.create_texture("t2", color_texture(64, 64));
            builder.write(t2, ResourceUsage::COLOR_ATTACHMENT)
        },
        |_, _, _, _| {},
    );
    let t3 = frame_graph.add_pass(
        QueueType::Graphics,
        "c",
        |builder| {
            builder.read(t1, ResourceUsage::SHADER_GRAPHICS);
            builder.read(t2, ResourceUsage::SHADER_GRAPHICS);
            let t3 = builder.create_texture("t3", color_texture(64, 64));
            builder.write(t3, ResourceUsage::COLOR_ATTACHMENT)
        },
        |_, _, _, _| {},
    );
    frame_graph.add_pass(
        QueueType::Graphics,
        "d",
        |builder| {
            builder.read(t3, ResourceUsage::SHADER_GRAPHICS);
        },
        |_, _, _, _: &()| {},
    );

    frame_graph.compile().unwrap();

    let levels = frame_graph.dependency_levels();
    assert_eq!(levels.len(), 3);

    let names_of = |level: usize| {
        let mut names: Vec<&str> = levels[level]
            .passes
            .iter()
            .map(|&pass| frame_graph.pass_name(pass))
            .collect();
        names.sort_unstable();
        names
    };
    assert_eq!(names_of(0), vec!["a", "b"]);
    assert_eq!(names_of(1), vec!["c"]);
    assert_eq!(names_of(2), vec!["d"]);

    // Order respects every edge.
    let order = frame_graph.execution_order();
    let position = |name: &str| {
        order
            .iter()
            .position(|&pass| frame_graph.pass_name(pass) == name)
            .unwrap()
    };
    assert!(position("a") < position("c"));
    assert!(position("b") < position("c"));
    assert!(position("c") < position("d"));
}

#[test]
fn read_only_fan_out_barriers_from_the_write() {
    let mut device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let texture = frame_graph.add_pass(
        QueueType::Graphics,
        "p",
        |builder| {
            let texture = builder.create_texture("shaded", color_texture(128, 128));
            builder.write(texture, ResourceUsage::COLOR_ATTACHMENT)
        },
        |_, _, _, _| {},
    );
    frame_graph.add_pass(
        QueueType::Graphics,
        "q",
        |builder| {
            builder.read(texture, ResourceUsage::SHADER_COMPUTE);
        },
        |_, _, _, _: &()| {},
    );
    frame_graph.add_pass(
        QueueType::Graphics,
        "r",
        |builder| {
            builder.read(texture, ResourceUsage::SHADER_COMPUTE);
        },
        |_, _, _, _: &()| {},
    );

    frame_graph.compile().unwrap();
    frame_graph.execute(&mut device);

    let submission = &device.submissions()[0];
    // Everything is on the graphics queue: one submission, three encoders.
    assert_eq!(submission.submit_infos.len(), 1);
    assert_eq!(submission.submit_infos[0].encoders.len(), 3);

    // Each reader transitions from the producing write; there is no barrier
    // between the readers themselves.
    for encoder in &submission.submit_infos[0].encoders[1..] {
        let batches = texture_barrier_commands(encoder);
        assert_eq!(batches.len(), 1, "{} has stray barriers", region_name(encoder));
        let barrier = &batches[0][0];
        assert_eq!(barrier.previous_access, AccessFlags::COLOR_ATTACHMENT_WRITE);
        assert_eq!(barrier.next_access, AccessFlags::SRV_COMPUTE);
        assert!(barrier.source_queue.is_none());
        assert!(!barrier.discard_contents);
    }
}

#[test]
fn duplicate_attachments_are_rejected() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let result = frame_graph.add_render_pass(
        QueueType::Graphics,
        "broken",
        |builder, render_pass| {
            let target = builder.create_texture("target", color_texture(32, 32));
            builder.write(target, ResourceUsage::COLOR_ATTACHMENT);
            for _ in 0..2 {
                render_pass.color_attachments.push(ColorAttachment {
                    ops: AttachmentOps::INIT,
                    texture: AttachmentTexture::Texture(target),
                    resolve_texture: None,
                    clear_value: ClearValue::default(),
                });
            }
        },
        |_, _, _, _: &(), _| {},
    );

    assert_eq!(
        result.unwrap_err(),
        FrameGraphError::DuplicateAttachment {
            pass: "broken".to_string()
        }
    );
}

#[test]
fn illegal_attachment_combination_is_rejected() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    frame_graph.add_pass(
        QueueType::Graphics,
        "bad",
        |builder| {
            let texture = builder.create_texture("target", color_texture(32, 32));
            builder.write(texture, ResourceUsage::COLOR_ATTACHMENT);
            builder.read(texture, ResourceUsage::INDEX_BUFFER);
        },
        |_, _, _, _: &()| {},
    );

    let error = frame_graph.compile().unwrap_err();
    assert!(matches!(
        error,
        FrameGraphError::IllegalUsageCombination { .. }
    ));
}

#[test]
fn reading_an_unwritten_transient_is_rejected() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    frame_graph.add_pass(
        QueueType::Graphics,
        "reader",
        |builder| {
            let texture = builder.create_texture("never_written", color_texture(8, 8));
            builder.read(texture, ResourceUsage::SHADER_GRAPHICS);
        },
        |_, _, _, _: &()| {},
    );

    let error = frame_graph.compile().unwrap_err();
    assert!(matches!(error, FrameGraphError::MissingResource { .. }));
}

#[test]
fn present_preconditions_are_checked_up_front() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    // Missing the PRESENT usage bit.
    let texture = frame_graph.add_pass(
        QueueType::Graphics,
        "draw",
        |builder| {
            let texture = builder.create_texture("off_screen", color_texture(64, 64));
            builder.write(texture, ResourceUsage::COLOR_ATTACHMENT)
        },
        |_, _, _, _| {},
    );

    let error = frame_graph
        .add_present_pass(SwapchainHandle::from_raw(1), texture)
        .unwrap_err();
    assert!(matches!(
        error,
        FrameGraphError::PresentPreconditionFailed { .. }
    ));
}

#[test]
fn presenting_an_unproduced_texture_is_rejected() {
    let device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let texture = frame_graph.import_texture(
        "orphan",
        ember_rhi::TextureHandle::from_raw(7),
        presentable_texture(64, 64),
        AccessFlags::NONE,
    );
    frame_graph
        .add_present_pass(SwapchainHandle::from_raw(1), texture)
        .unwrap();

    let error = frame_graph.compile().unwrap_err();
    assert_eq!(
        error,
        FrameGraphError::UnusedResource {
            resource: "orphan".to_string()
        }
    );
}

#[test]
fn imported_resources_are_never_destroyed() {
    let mut device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&device);

    let imported = frame_graph.import_texture(
        "history",
        ember_rhi::TextureHandle::from_raw(42),
        color_texture(256, 256),
        AccessFlags::SRV_GRAPHICS,
    );

    frame_graph.add_pass(
        QueueType::Graphics,
        "feedback",
        |builder| {
            builder.read(imported, ResourceUsage::SHADER_GRAPHICS);
            let scratch = builder.create_texture("scratch", color_texture(256, 256));
            builder.write(scratch, ResourceUsage::COLOR_ATTACHMENT)
        },
        |_, _, _, _| {},
    );

    frame_graph.compile().unwrap();
    frame_graph.execute(&mut device);

    // Only the transient scratch texture is destroyed.
    assert_eq!(device.destroyed_textures().len(), 1);

    // The imported read transitions from the access the client recorded.
    let submission = &device.submissions()[0];
    let encoder = &submission.submit_infos[0].encoders[0];
    let batches = texture_barrier_commands(encoder);
    let imported_barrier = batches
        .iter()
        .flat_map(|batch| batch.iter())
        .find(|barrier| barrier.texture == ember_rhi::TextureHandle::from_raw(42))
        .expect("no barrier for the imported texture");
    assert_eq!(imported_barrier.previous_access, AccessFlags::SRV_GRAPHICS);
    assert!(!imported_barrier.discard_contents);
}

#[test]
fn rebuilding_after_reset_reproduces_the_frame() {
    fn build_and_run(device: &mut HeadlessDevice, frame_graph: &mut FrameGraph) {
        let swapchain = SwapchainHandle::from_raw(1);

        let depth = frame_graph.add_pass(
            QueueType::Graphics,
            "depth_prepass",
            |builder| {
                let depth = builder.create_texture(
                    "depth",
                    TextureCreateInfo {
                        kind: TextureKind::Texture2D {
                            width: 512,
                            height: 512,
                            num_layers: 1,
                            num_mips: 1,
                            sample_count: ember_rhi::SampleCount::Count1,
                        },
                        format: TextureFormat::D32_FLOAT,
                        usage: TextureUsageFlags::DEPTH_ATTACHMENT | TextureUsageFlags::SRV,
                        ..Default::default()
                    },
                );
                builder.write(depth, ResourceUsage::DEPTH_STENCIL_ATTACHMENT)
            },
            |_, _, _, _| {},
        );

        let culled = frame_graph.add_pass(
            QueueType::AsyncCompute,
            "light_culling",
            |builder| {
                builder.read(depth, ResourceUsage::SHADER_COMPUTE);
                let lights = builder.create_buffer(
                    "light_list",
                    ember_graph::frame_graph::BufferCreateInfo {
                        size: 4096,
                        ..Default::default()
                    },
                );
                builder.write(lights, ResourceUsage::SHADER_COMPUTE)
            },
            |_, _, encoder, _| {
                encoder.dispatch(16, 16, 1);
            },
        );

        let color = frame_graph.add_pass(
            QueueType::Graphics,
            "forward",
            |builder| {
                builder.read(culled, ResourceUsage::SHADER_GRAPHICS);
                let color = builder.create_texture("color", presentable_texture(512, 512));
                builder.write(color, ResourceUsage::COLOR_ATTACHMENT)
            },
            |_, _, _, _| {},
        );

        frame_graph.add_present_pass(swapchain, color).unwrap();
        frame_graph.compile().unwrap();
        frame_graph.execute(device);
    }

    let mut first_device = HeadlessDevice::new();
    let mut frame_graph = FrameGraph::new(&first_device);
    build_and_run(&mut first_device, &mut frame_graph);

    frame_graph.reset();

    // A fresh device hands out the same handles, so identical declarations
    // must reproduce the submission stream bit for bit.
    let mut second_device = HeadlessDevice::new();
    build_and_run(&mut second_device, &mut frame_graph);

    assert_eq!(first_device.submissions(), second_device.submissions());
}
