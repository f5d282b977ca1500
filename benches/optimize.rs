use criterion::{criterion_group, criterion_main, Criterion};
use floorplan::*;

fn bench_case() -> Vec<Block> {
    vec![
        Block::builder().name("cpu").width(30.0).height(20.0).location(Location::TopLeftCorner).build(),
        Block::builder().name("l2").width(15.0).height(15.0).neighbor("cpu").build(),
        Block::builder().name("dram_ctl").width(12.0).height(8.0).build(),
        Block::builder().name("phy").width(8.0).height(24.0).location(Location::BottomRightCorner).build(),
        Block::builder().name("dsp").width(10.0).height(10.0).build(),
        Block::builder().name("io0").width(6.0).height(4.0).build(),
        Block::builder().name("io1").width(6.0).height(4.0).build(),
        Block::builder().name("sram").width(14.0).height(6.0).neighbor("dsp").build(),
    ]
}

fn bench_optimize(c: &mut Criterion) {
    let blocks = bench_case();
    let config = AnnealConfig::builder()
        .initial_temp(200.0)
        .final_temp(1.0)
        .cooling_rate(0.8)
        .iterations_per_temp(20)
        .seed(42)
        .build();
    c.bench_function("compute_floorplan_8_blocks", |b| {
        b.iter(|| compute_floorplan_with(&blocks, 2.0, &config).unwrap())
    });
}

criterion_group!(benches, bench_optimize);
criterion_main!(benches);
