use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fastephem::ephemeris::StandardEphemeris;
use fastephem::solar_system::prepare_earth_position_vel_jd;
use fastephem::units::{au_to_km, AU_TO_KM_PARALLEL};
use ndarray::Array1;

fn bench_au_to_km(c: &mut Criterion) {
    let mut group = c.benchmark_group("au_to_km");
    for size in [1_000usize, 100_000, 1_000_000] {
        let values = Array1::linspace(0.0, 50.0, size);

        group.bench_with_input(BenchmarkId::new("serial", size), &values, |b, v| {
            b.iter(|| au_to_km(black_box(v)))
        });

        if let Some(kernel) = AU_TO_KM_PARALLEL.as_ref() {
            group.bench_with_input(BenchmarkId::new("parallel", size), &values, |b, v| {
                b.iter(|| kernel.call(black_box(v)))
            });
        }
    }
    group.finish();
}

fn bench_builtin_earth(c: &mut Criterion) {
    let provider = StandardEphemeris::new();
    let jd1 = Array1::from_elem(1_000, 2_451_545.0);
    let jd2 = Array1::linspace(0.0, 3_650.0, 1_000);

    c.bench_function("builtin_earth_1000", |b| {
        b.iter(|| {
            prepare_earth_position_vel_jd(
                &provider,
                black_box(jd1.view()),
                black_box(jd2.view()),
                Some("builtin"),
                "km",
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_au_to_km, bench_builtin_earth);
criterion_main!(benches);
