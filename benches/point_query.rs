use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use minidist::{
    PointQuery, RayCast, Scene, TriangleGeometry,
    geometry::{FloatType, WorldPoint, WorldVector},
};

/// Builds a unit UV sphere centered at `center`.
fn uv_sphere(center: WorldPoint, stacks: u32, slices: u32) -> TriangleGeometry {
    use std::f32::consts::PI;

    let mut vertices = Vec::new();
    for stack in 0..=stacks {
        let phi = PI * stack as FloatType / stacks as FloatType;
        for slice in 0..slices {
            let theta = 2.0 * PI * slice as FloatType / slices as FloatType;
            vertices.push(
                center
                    + WorldVector::new(
                        phi.sin() * theta.cos(),
                        phi.sin() * theta.sin(),
                        phi.cos(),
                    ),
            );
        }
    }

    let mut indices = Vec::new();
    for stack in 0..stacks {
        for slice in 0..slices {
            let next_slice = (slice + 1) % slices;
            let top_left = stack * slices + slice;
            let top_right = stack * slices + next_slice;
            let bottom_left = (stack + 1) * slices + slice;
            let bottom_right = (stack + 1) * slices + next_slice;
            indices.extend([top_left, bottom_left, top_right]);
            indices.extend([top_right, bottom_left, bottom_right]);
        }
    }

    TriangleGeometry::from_buffers(vertices, indices).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut scene = Scene::new();
    for i in 0..4 {
        scene.attach(uv_sphere(
            WorldPoint::new(i as FloatType * 4.0, 0.0, 0.0),
            64,
            64,
        ));
    }
    scene.commit();

    c.bench_function("closest_point_spheres", |b| {
        let query = PointQuery::builder()
            .point(WorldPoint::new(1.7, 0.3, 0.1))
            .build();
        b.iter(|| scene.closest_point(query))
    });

    c.bench_function("intersect_spheres", |b| {
        let cast = RayCast::builder()
            .origin(WorldPoint::new(-5.0, 0.1, 0.2))
            .direction(WorldVector::new(1.0, 0.0, 0.0))
            .build();
        b.iter(|| scene.intersect(&cast))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(30).measurement_time(Duration::from_secs(10));
    targets = criterion_benchmark
}
criterion_main!(benches);
