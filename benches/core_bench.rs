use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rng_event_editor::{
    compute_reach, write_session_xml, BranchSide, Event, InsertTarget, NodeKindTag, Session,
};
use std::hint::black_box;

/// Baut einen vollständigen Binärbaum aus Verzweigungen mit Blättern am Ende.
fn build_synthetic_session(depth: usize) -> Session {
    let mut session = Session::new();
    let mut frontier = vec![InsertTarget::Root];

    for level in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for target in frontier {
            let kind = if level + 1 == depth {
                NodeKindTag::SpawnItem
            } else {
                NodeKindTag::Branch
            };
            let id = session
                .add_node(kind, target)
                .expect("Einfügen im Benchmark fehlgeschlagen");
            if kind == NodeKindTag::Branch {
                for side in [BranchSide::Success, BranchSide::Failure] {
                    next.push(InsertTarget::Branch { parent_id: id, side });
                }
            }
        }
        frontier = next;
    }

    session
}

fn build_wide_event(root_count: usize) -> Event {
    let mut session = Session::new();
    for index in 0..root_count {
        let kind = NodeKindTag::ALL[index % NodeKindTag::ALL.len()];
        session
            .add_node(kind, InsertTarget::Root)
            .expect("Einfügen im Benchmark fehlgeschlagen");
    }
    session.active_event().clone()
}

fn bench_compute_reach(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_reach");

    for &depth in &[8usize, 12usize] {
        let session = build_synthetic_session(depth);
        let event = session.active_event().clone();

        group.bench_with_input(BenchmarkId::new("deep", depth), &event, |b, event| {
            b.iter(|| black_box(compute_reach(black_box(event)).len()))
        });
    }

    let wide = build_wide_event(10_000);
    group.bench_with_input(BenchmarkId::new("wide", 10_000), &wide, |b, event| {
        b.iter(|| black_box(compute_reach(black_box(event)).len()))
    });

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut session = build_synthetic_session(10);

    c.bench_function("undo_redo_cycle", |b| {
        b.iter(|| {
            session.undo().expect("Undo im Benchmark fehlgeschlagen");
            session.redo().expect("Redo im Benchmark fehlgeschlagen");
            black_box(session.next_id())
        })
    });
}

fn bench_xml_export(c: &mut Criterion) {
    let session = build_synthetic_session(10);

    c.bench_function("xml_export_depth_10", |b| {
        b.iter(|| {
            let xml = write_session_xml(black_box(session.events()), 4)
                .expect("XML-Export fehlgeschlagen");
            black_box(xml.len())
        })
    });
}

criterion_group!(benches, bench_compute_reach, bench_undo_redo, bench_xml_export);
criterion_main!(benches);
