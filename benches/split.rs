//! Benchmarks for hard-edge splitting.

use std::f64::consts::TAU;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use edgesplit::algo::normals::compute_vertex_normals;
use edgesplit::prelude::*;
use nalgebra::Point3;

/// Flat grid with a sawtooth height field: every other row of triangles is tilted.
fn create_grid_mesh(n: usize) -> TriangleMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            let z = if j % 2 == 0 { 0.0 } else { 0.75 };
            vertices.push(Point3::new(i as f64, j as f64, z));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = (j * (n + 1) + i) as u32;
            let v10 = v00 + 1;
            let v01 = v00 + (n as u32 + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    let mut mesh = from_triangles(&vertices, &faces).unwrap();
    compute_vertex_normals(&mut mesh);
    mesh
}

/// Closed cylinder with `sides` facets: sharp caps, smooth or faceted walls.
fn create_cylinder_mesh(sides: usize, rings: usize) -> TriangleMesh {
    let mut vertices = Vec::with_capacity(sides * (rings + 1) + 2);
    let mut faces = Vec::new();

    for r in 0..=rings {
        let z = r as f64 / rings as f64;
        for s in 0..sides {
            let a = TAU * s as f64 / sides as f64;
            vertices.push(Point3::new(a.cos(), a.sin(), z));
        }
    }
    let bottom = vertices.len() as u32;
    vertices.push(Point3::new(0.0, 0.0, 0.0));
    let top = vertices.len() as u32;
    vertices.push(Point3::new(0.0, 0.0, 1.0));

    let at = |r: usize, s: usize| (r * sides + s % sides) as u32;
    for r in 0..rings {
        for s in 0..sides {
            faces.push([at(r, s), at(r, s + 1), at(r + 1, s + 1)]);
            faces.push([at(r, s), at(r + 1, s + 1), at(r + 1, s)]);
        }
    }
    for s in 0..sides {
        faces.push([bottom, at(0, s + 1), at(0, s)]);
        faces.push([top, at(rings, s), at(rings, s + 1)]);
    }

    from_triangles(&vertices, &faces).unwrap()
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_hard_edges");

    for n in [32, 128] {
        let mesh = create_grid_mesh(n);
        for parallel in [false, true] {
            let options = SplitOptions::with_cutoff_degrees(30.0).with_parallel(parallel);
            let mode = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(format!("grid_{mode}"), n), &mesh, |b, m| {
                b.iter(|| split_hard_edges(black_box(m), &options).unwrap());
            });
        }
    }

    let cylinder = create_cylinder_mesh(64, 32);
    for degrees in [3.0, 30.0] {
        let options = SplitOptions::with_cutoff_degrees(degrees);
        group.bench_with_input(
            BenchmarkId::new("cylinder_64x32", degrees),
            &cylinder,
            |b, m| {
                b.iter(|| split_hard_edges(black_box(m), &options).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_weld_then_split(c: &mut Criterion) {
    let mesh = create_cylinder_mesh(64, 32);
    let mut builder = MeshBuilder::new();
    for tri in mesh.triangles() {
        for v in tri {
            builder.vertex(mesh.position(v as usize));
        }
    }
    let soup = builder.build_non_indexed().unwrap();
    let welder = VertexWelder::default();
    let options = SplitOptions::default();

    c.bench_function("weld_then_split_cylinder_64x32", |b| {
        b.iter(|| split_hard_edges_with_merger(black_box(&soup), &options, &welder).unwrap());
    });
}

criterion_group!(benches, bench_split, bench_weld_then_split);
criterion_main!(benches);
