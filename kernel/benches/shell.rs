use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use uos_allocator::BumpAllocator;
use uos_kernel::shell::{CommandLine, CommandRegistry};

fn parse_and_lookup(c: &mut Criterion) {
    let registry = CommandRegistry::builtin();

    c.bench_function("command_line_parse", |b| {
        b.iter(|| CommandLine::parse(black_box("  directory /system/config.sys")))
    });

    c.bench_function("registry_lookup_alias", |b| {
        b.iter(|| registry.lookup(black_box("DEL")))
    });
}

fn bump_allocation(c: &mut Criterion) {
    let mut region = vec![0u8; 1 << 20];
    let start = region.as_mut_ptr() as usize;
    let limit = start + region.len();

    c.bench_function("bump_allocate_1k_blocks", |b| {
        b.iter(|| {
            let mut heap = unsafe { BumpAllocator::new(start, limit) }.expect("heap bounds");
            for size in 1..=1024usize {
                let _ = black_box(heap.allocate(size));
            }
            heap.stats()
        })
    });
}

criterion_group!(benches, parse_and_lookup, bump_allocation);
criterion_main!(benches);
