//! Benchmarks for the CPU reference shading and shader generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};

use coffee_smoke::mesh::PlumeMesh;
use coffee_smoke::noise::NoiseField;
use coffee_smoke::params::SmokeParams;
use coffee_smoke::shader::smoke_shader;
use coffee_smoke::shading::{FrameParams, SmokeEffect};

fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise");

    for size in [64u32, 256] {
        group.bench_with_input(BenchmarkId::new("perlin", size), &size, |b, &size| {
            b.iter(|| black_box(NoiseField::perlin(size, 8, 5, 1)))
        });
    }

    let noise = NoiseField::procedural_default();
    group.bench_function("sample", |b| {
        let mut uv = Vec2::ZERO;
        b.iter(|| {
            uv += Vec2::new(0.013, 0.007);
            black_box(noise.sample(uv))
        })
    });

    group.finish();
}

fn bench_shading(c: &mut Criterion) {
    let effect = SmokeEffect::new(SmokeParams::default(), NoiseField::procedural_default())
        .expect("default params are valid");
    let mesh = PlumeMesh::coffee_plume();
    let mut group = c.benchmark_group("shading");

    group.bench_function("displace_plume", |b| {
        b.iter(|| {
            for v in &mesh.vertices {
                black_box(effect.displace_vertex(v.position(), v.uv(), 12.5));
            }
        })
    });

    let frame = FrameParams::at(12.5).with_pointer(Vec2::new(0.1, 0.2));
    group.bench_function("shade_64x64", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..64 {
                for j in 0..64 {
                    let uv = Vec2::new(i as f32 / 63.0, j as f32 / 63.0);
                    sum += effect.shade_fragment(uv, uv * 2.0 - Vec2::ONE, &frame).w;
                }
            }
            black_box(sum)
        })
    });

    group.bench_function("twist", |b| {
        b.iter(|| black_box(effect.twist(black_box(Vec3::new(0.5, 3.0, 0.0)), 0.7)))
    });

    group.finish();
}

fn bench_shader_gen(c: &mut Criterion) {
    let params = SmokeParams::default();
    c.bench_function("smoke_shader", |b| b.iter(|| black_box(smoke_shader(&params))));
}

criterion_group!(benches, bench_noise, bench_shading, bench_shader_gen);
criterion_main!(benches);
