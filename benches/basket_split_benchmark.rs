use basket_splitter::algorithms::min_cost_flow::MinCostMaxFlow;
use basket_splitter::utils::synthetic::{random_basket, random_catalog};
use basket_splitter::BasketSplitter;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_basket_split(c: &mut Criterion) {
    // Create benchmark data
    let catalog = random_catalog(42, 100, 6, 3);
    let basket = random_basket(7, &catalog, 20);
    let baskets: Vec<Vec<String>> = (0..8)
        .map(|seed| random_basket(seed, &catalog, 12))
        .collect();
    let splitter = BasketSplitter::new(catalog);

    // Benchmark a single basket with six deliveries
    c.bench_function("basket_split_20_items_6_deliveries", |b| {
        b.iter(|| splitter.split(black_box(basket.as_slice())))
    });

    // Benchmark independent baskets split in parallel
    c.bench_function("basket_split_all_8_baskets", |b| {
        b.iter(|| splitter.split_all(black_box(baskets.as_slice())))
    });
}

fn benchmark_min_cost_flow(c: &mut Criterion) {
    // Dense bipartite graph: 30 left nodes, 10 right nodes
    c.bench_function("min_cost_flow_dense_bipartite", |b| {
        b.iter(|| {
            let (left, right) = (30, 10);
            let source = left + right;
            let sink = source + 1;
            let mut solver = MinCostMaxFlow::with_nodes(left + right + 2, source, sink).unwrap();
            for i in 0..left {
                solver.add_edge(source, i, 1, 0).unwrap();
                for j in 0..right {
                    solver
                        .add_edge(i, left + j, 1, ((i * 7 + j * 3) % 11) as i64)
                        .unwrap();
                }
            }
            for j in 0..right {
                solver.add_edge(left + j, sink, 4, 1).unwrap();
            }
            black_box(solver.solve().unwrap())
        })
    });
}

criterion_group!(benches, benchmark_basket_split, benchmark_min_cost_flow);
criterion_main!(benches);
