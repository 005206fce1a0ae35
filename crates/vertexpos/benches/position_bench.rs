//! Criterion microbenches for vertex positioning.
//!
//! - closed-form three-point solver vs the generic reduced kernel
//! - full `position` call (kernels + filters) for point, line and mixed triples
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::vector;
use vertexpos::gen::{draw_point_triple, ReplayToken, TripleCfg};
use vertexpos::prelude::*;

fn point_table(tok: ReplayToken) -> (EdgeTable, Site) {
    let pts = draw_point_triple(TripleCfg::default(), tok).unwrap();
    let mut vd = EdgeTable::new(10.0);
    let face_site = vd.add_site(Site::point(pts[0].x, pts[0].y));
    let twin_site = vd.add_site(Site::point(pts[1].x, pts[1].y));
    vd.add_edge(EdgeRecord {
        face_site,
        k1: 1.0,
        twin_site,
        k2: 1.0,
        t_src: 0.0,
        t_trg: 100.0,
    });
    (vd, Site::point(pts[2].x, pts[2].y))
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels");
    let (vd, s3) = point_table(ReplayToken { seed: 42, index: 0 });
    let vp = VertexPositioner::new(&vd);
    let edge = vd.split_edge(EdgeId(0)).unwrap();
    group.bench_function(BenchmarkId::new("ppp", "closed-form"), |b| {
        b.iter(|| vp.solve(edge.s1, 1.0, edge.s2, 1.0, &s3, 1.0))
    });
    group.bench_function(BenchmarkId::new("ppp", "reduced"), |b| {
        b.iter(|| vp.solve_generic(edge.s1, 1.0, edge.s2, 1.0, &s3, 1.0))
    });

    let a = Site::line(vector![0.0, 0.0], vector![4.0, 0.0]);
    let l = Site::line(vector![4.0, 0.0], vector![0.0, 3.0]);
    let m = Site::line(vector![0.0, 3.0], vector![0.0, 0.0]);
    let eqns = [a.eqn(1.0), l.eqn(1.0), m.eqn(1.0)];
    let cfg = PositionerCfg::default();
    group.bench_function(BenchmarkId::new("lll", "triangle"), |b| {
        b.iter(|| vertexpos::positioner::lll_solver(&eqns, 1.0, &cfg))
    });
    group.finish();
}

fn bench_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("position");
    group.bench_function(BenchmarkId::new("points", "random"), |b| {
        b.iter_batched(
            || ReplayToken { seed: 7, index: 0 },
            |mut tok| {
                tok.index = tok.index.wrapping_add(1);
                let (vd, s3) = point_table(tok);
                let mut vp = VertexPositioner::new(&vd);
                let _ = vp.position(EdgeId(0), &s3);
            },
            BatchSize::SmallInput,
        )
    });

    let mut vd = EdgeTable::new(20.0);
    let lo = vd.add_site(Site::line(vector![-10.0, 0.0], vector![10.0, 0.0]));
    let hi = vd.add_site(Site::line(vector![10.0, 4.0], vector![-10.0, 4.0]));
    let e = vd.add_edge(EdgeRecord {
        face_site: lo,
        k1: 1.0,
        twin_site: hi,
        k2: 1.0,
        t_src: 1.5,
        t_trg: 2.5,
    });
    let arc = Site::arc(vector![0.0, 1.0], vector![0.0, 3.0], vector![0.0, 2.0], true);
    let pt = Site::point(0.0, 1.0);
    for (name, s3) in [("line-line-arc", arc), ("line-line-point", pt)] {
        group.bench_function(BenchmarkId::new("mixed", name), |b| {
            b.iter_batched(
                || VertexPositioner::new(&vd),
                |mut vp| {
                    let _ = vp.position(e, &s3);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernels, bench_position);
criterion_main!(benches);
