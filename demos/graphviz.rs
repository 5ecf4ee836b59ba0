//! Renders a second-generation node graph as GraphViz.
//!
//! Builds a tiny deferred-style frame with one dead-end debug pass, compiles
//! it (which culls the dead end) and prints the digraph; paste the output
//! into <https://dreampuf.github.io/GraphvizOnline> to see it.
//!
//! ```sh
//! cargo run --example graphviz
//! ```

use ember_graph::frame_graph::{QueueType, TextureCreateInfo};
use ember_graph::frame_graph2::{FrameGraph, NodeKind, TextureResourceUsage};
use ember_rhi::{TextureFormat, TextureKind, TextureUsageFlags};

fn target(format: TextureFormat) -> TextureCreateInfo {
    TextureCreateInfo {
        kind: TextureKind::Texture2D {
            width: 1280,
            height: 720,
            num_layers: 1,
            num_mips: 1,
            sample_count: ember_rhi::SampleCount::Count1,
        },
        format,
        usage: TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::SRV,
        ..Default::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut frame_graph = FrameGraph::new();

    let backbuffer =
        frame_graph.import_texture("backbuffer", target(TextureFormat::B8_G8_R8_A8_UNORM));

    let albedo = frame_graph.add_pass(QueueType::Graphics, "gbuffer", |builder| {
        let albedo = builder.create_texture("albedo", target(TextureFormat::R8_G8_B8_A8_UNORM));
        builder.write(albedo, TextureResourceUsage::COLOR_ATTACHMENT)
    });

    frame_graph.add_pass(QueueType::Graphics, "lighting", |builder| {
        builder.read(albedo, TextureResourceUsage::GRAPHICS_SAMPLED_IMAGE);
        builder.write(backbuffer, TextureResourceUsage::COLOR_ATTACHMENT);
        // The swapchain observes the result; nothing inside the graph reads
        // it.
        builder.side_effect();
    });

    // Reads the gbuffer but produces nothing anyone consumes.
    frame_graph.add_pass(QueueType::Graphics, "debug_overlay", |builder| {
        builder.read(albedo, TextureResourceUsage::GRAPHICS_SAMPLED_IMAGE);
    });

    frame_graph.compile().expect("node graph compiles");

    println!("{}", frame_graph.export_graphviz());
    println!();

    for &node_index in frame_graph.execution_order() {
        let node = frame_graph.node(node_index).expect("node exists");
        let kind = match node.kind() {
            NodeKind::Pass(_) => "pass",
            NodeKind::Resource(_) => "resource",
        };
        println!("{kind:>8}  {}", node.name());
    }
}
