//! Property tests over randomly generated frames.

use ember_graph::frame_graph::{
    FrameGraph, QueueType, ResourceUsage, TextureCreateInfo, TextureHandle,
};
use ember_headless::HeadlessDevice;
use ember_rhi::{AccessFlags, Command, TextureFormat, TextureKind, TextureUsageFlags};
use proptest::prelude::*;
use std::collections::HashMap;

fn scratch_texture() -> TextureCreateInfo {
    TextureCreateInfo {
        kind: TextureKind::Texture2D {
            width: 16,
            height: 16,
            num_layers: 1,
            num_mips: 1,
            sample_count: ember_rhi::SampleCount::Count1,
        },
        format: TextureFormat::R8_G8_B8_A8_UNORM,
        usage: TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::SRV,
        ..Default::default()
    }
}

/// Random DAGs as forward-edge adjacency: a biased coin per pair `i < j`.
fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..9).prop_flat_map(|n| {
        let pair_count = n * (n - 1) / 2;
        proptest::collection::vec(proptest::bool::weighted(0.4), pair_count).prop_map(
            move |coins| {
                let mut edges = Vec::new();
                let mut slot = 0;
                for i in 0..n {
                    for j in (i + 1)..n {
                        if coins[slot] {
                            edges.push((i, j));
                        }
                        slot += 1;
                    }
                }
                (n, edges)
            },
        )
    })
}

/// Declares one pass per node; every edge becomes a texture written by the
/// source and read by the target.
fn declare_dag(frame_graph: &mut FrameGraph, n: usize, edges: &[(usize, usize)]) {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (edge_index, &(from, to)) in edges.iter().enumerate() {
        outgoing[from].push(edge_index);
        incoming[to].push(edge_index);
    }

    let mut channels: HashMap<usize, TextureHandle> = HashMap::new();
    for node in 0..n {
        let outgoing_edges = outgoing[node].clone();
        let incoming_edges = incoming[node].clone();
        let incoming_handles: Vec<TextureHandle> = incoming_edges
            .iter()
            .map(|edge_index| channels[edge_index])
            .collect();

        let created = frame_graph.add_pass(
            QueueType::Graphics,
            format!("pass_{node}"),
            |builder| {
                for handle in &incoming_handles {
                    builder.read(*handle, ResourceUsage::SHADER_GRAPHICS);
                }
                outgoing_edges
                    .iter()
                    .map(|&edge_index| {
                        let texture = builder.create_texture(
                            format!("edge_{edge_index}"),
                            scratch_texture(),
                        );
                        builder.write(texture, ResourceUsage::COLOR_ATTACHMENT);
                        (edge_index, texture)
                    })
                    .collect::<Vec<_>>()
            },
            |_, _, _, _| {},
        );

        for (edge_index, handle) in created {
            channels.insert(edge_index, handle);
        }
    }
}

proptest! {
    /// The execution order is a permutation of all passes in which every
    /// edge points forward.
    #[test]
    fn topological_order_respects_every_edge((n, edges) in dag_strategy()) {
        let device = HeadlessDevice::new();
        let mut frame_graph = FrameGraph::new(&device);
        declare_dag(&mut frame_graph, n, &edges);
        frame_graph.compile().unwrap();

        let order = frame_graph.execution_order();
        prop_assert_eq!(order.len(), n);

        let mut position = vec![usize::MAX; n];
        for (index, pass) in order.iter().enumerate() {
            position[pass.raw() as usize] = index;
        }
        prop_assert!(position.iter().all(|&p| p != usize::MAX));

        for &(from, to) in &edges {
            prop_assert!(position[from] < position[to]);
        }
    }

    /// A pass's dependency level is the longest-path distance from any
    /// root.
    #[test]
    fn dependency_levels_are_longest_paths((n, edges) in dag_strategy()) {
        let device = HeadlessDevice::new();
        let mut frame_graph = FrameGraph::new(&device);
        declare_dag(&mut frame_graph, n, &edges);
        frame_graph.compile().unwrap();

        // Expected distances via relaxation over pass indices, which are
        // already topological for forward-edge graphs.
        let mut expected = vec![0u32; n];
        for &(from, to) in &edges {
            expected[to] = expected[to].max(expected[from] + 1);
        }

        let mut actual = vec![0u32; n];
        for level in frame_graph.dependency_levels() {
            for &pass in &level.passes {
                actual[pass.raw() as usize] = level.level;
            }
        }
        prop_assert_eq!(actual, expected);
    }

    /// Rebuilding the identical graph after `reset()` reproduces the
    /// submission stream exactly.
    #[test]
    fn recompilation_is_deterministic((n, edges) in dag_strategy()) {
        let mut first_device = HeadlessDevice::new();
        let mut frame_graph = FrameGraph::new(&first_device);
        declare_dag(&mut frame_graph, n, &edges);
        frame_graph.compile().unwrap();
        frame_graph.execute(&mut first_device);

        frame_graph.reset();

        let mut second_device = HeadlessDevice::new();
        declare_dag(&mut frame_graph, n, &edges);
        frame_graph.compile().unwrap();
        frame_graph.execute(&mut second_device);

        prop_assert_eq!(first_device.submissions(), second_device.submissions());
    }

    /// Readers barrier from the producing write access; writers either
    /// coalesce or discard, depending on whether anything reads.
    #[test]
    fn consumer_barriers_source_from_the_write(
        reads in proptest::collection::vec(
            prop_oneof![
                Just(ResourceUsage::SHADER_GRAPHICS),
                Just(ResourceUsage::SHADER_COMPUTE),
                Just(ResourceUsage::TRANSFER),
            ],
            1..5,
        )
    ) {
        let mut device = HeadlessDevice::new();
        let mut frame_graph = FrameGraph::new(&device);

        let texture = frame_graph.add_pass(
            QueueType::Graphics,
            "producer",
            |builder| {
                let texture = builder.create_texture("target", scratch_texture());
                builder.write(texture, ResourceUsage::COLOR_ATTACHMENT)
            },
            |_, _, _, _| {},
        );

        for (index, usage) in reads.iter().enumerate() {
            let usage = *usage;
            frame_graph.add_pass(
                QueueType::Graphics,
                format!("reader_{index}"),
                |builder| {
                    builder.read(texture, usage);
                },
                |_, _, _, _: &()| {},
            );
        }

        frame_graph.compile().unwrap();
        frame_graph.execute(&mut device);

        let submission = &device.submissions()[0];
        prop_assert_eq!(submission.submit_infos.len(), 1);
        let encoders = &submission.submit_infos[0].encoders;
        prop_assert_eq!(encoders.len(), reads.len() + 1);

        for (encoder, usage) in encoders[1..].iter().zip(&reads) {
            let barriers: Vec<_> = encoder
                .commands()
                .iter()
                .filter_map(|command| match command {
                    Command::TextureBarrier { barriers } => Some(barriers),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(barriers.len(), 1);
            let barrier = &barriers[0][0];
            prop_assert_eq!(barrier.previous_access, AccessFlags::COLOR_ATTACHMENT_WRITE);
            prop_assert_eq!(
                barrier.next_access,
                ember_graph::frame_graph::map_resource_usage(*usage, false)
            );
            prop_assert!(!barrier.discard_contents);
        }
    }

    /// Exactly one release/acquire pair per cross-family handoff, none when
    /// the families match.
    #[test]
    fn queue_crossings_emit_matched_pairs(
        producer_queue in prop_oneof![Just(QueueType::Graphics), Just(QueueType::AsyncCompute)],
        consumer_queue in prop_oneof![Just(QueueType::Graphics), Just(QueueType::AsyncCompute)],
    ) {
        let mut device = HeadlessDevice::new();
        let mut frame_graph = FrameGraph::new(&device);

        let buffer = frame_graph.add_pass(
            producer_queue,
            "producer",
            |builder| {
                let buffer = builder.create_buffer(
                    "payload",
                    ember_graph::frame_graph::BufferCreateInfo {
                        size: 128,
                        ..Default::default()
                    },
                );
                builder.write(buffer, ResourceUsage::SHADER_COMPUTE)
            },
            |_, _, _, _| {},
        );
        frame_graph.add_pass(
            consumer_queue,
            "consumer",
            |builder| {
                builder.read(buffer, ResourceUsage::SHADER_COMPUTE);
            },
            |_, _, _, _: &()| {},
        );

        frame_graph.compile().unwrap();
        frame_graph.execute(&mut device);

        let submission = &device.submissions()[0];
        let mut crossing_barriers = Vec::new();
        for submit_info in &submission.submit_infos {
            for encoder in &submit_info.encoders {
                for command in encoder.commands() {
                    if let Command::BufferBarrier { barriers } = command {
                        crossing_barriers
                            .extend(barriers.iter().filter(|b| b.source_queue.is_some()));
                    }
                }
            }
        }

        if producer_queue == consumer_queue {
            prop_assert!(crossing_barriers.is_empty());
            prop_assert_eq!(submission.submit_infos.len(), 1);
        } else {
            prop_assert_eq!(crossing_barriers.len(), 2);
            prop_assert_eq!(crossing_barriers[0], crossing_barriers[1]);
            prop_assert_eq!(
                crossing_barriers[0].source_queue,
                Some(match producer_queue {
                    QueueType::AsyncCompute => ember_rhi::QueueType::Compute,
                    _ => ember_rhi::QueueType::Graphics,
                })
            );
            prop_assert_eq!(submission.submit_infos.len(), 2);
        }
    }

    /// `discard_contents` is set iff the consuming pass is write-only.
    #[test]
    fn discard_marks_write_only_consumers(reads in any::<bool>(), writes in any::<bool>()) {
        prop_assume!(reads || writes);

        let mut device = HeadlessDevice::new();
        let mut frame_graph = FrameGraph::new(&device);

        let texture = frame_graph.add_pass(
            QueueType::Graphics,
            "producer",
            |builder| {
                let texture = builder.create_texture("target", scratch_texture());
                builder.write(texture, ResourceUsage::COLOR_ATTACHMENT)
            },
            |_, _, _, _| {},
        );

        frame_graph.add_pass(
            QueueType::Graphics,
            "consumer",
            |builder| {
                if reads {
                    builder.read(texture, ResourceUsage::SHADER_COMPUTE);
                }
                if writes {
                    builder.write(texture, ResourceUsage::SHADER_COMPUTE);
                }
            },
            |_, _, _, _: &()| {},
        );

        frame_graph.compile().unwrap();
        frame_graph.execute(&mut device);

        let submission = &device.submissions()[0];
        let consumer_encoder = &submission.submit_infos[0].encoders[1];
        let barrier = consumer_encoder
            .commands()
            .iter()
            .find_map(|command| match command {
                Command::TextureBarrier { barriers } => Some(&barriers[0]),
                _ => None,
            })
            .expect("consumer has no texture barrier");

        prop_assert_eq!(barrier.discard_contents, writes && !reads);
    }
}
