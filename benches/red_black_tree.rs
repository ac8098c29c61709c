use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use rb_collections::red_black_tree::RedBlackTree;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1000;

fn random_keys() -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

fn bench_btreeset_insert(c: &mut Criterion) {
    let keys = random_keys();
    c.bench_function("bench btreeset insert", move |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for key in &keys {
                set.insert(*key);
            }
        })
    });
}

fn bench_btreeset_get(c: &mut Criterion) {
    let keys = random_keys();
    let set = keys.iter().cloned().collect::<BTreeSet<u32>>();
    c.bench_function("bench btreeset get", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(set.get(key));
            }
        })
    });
}

fn bench_red_black_tree_insert(c: &mut Criterion) {
    let keys = random_keys();
    c.bench_function("bench red_black_tree insert", move |b| {
        b.iter(|| {
            let mut tree = RedBlackTree::with_capacity(NUM_OF_OPERATIONS);
            for key in &keys {
                tree.insert(*key);
            }
        })
    });
}

fn bench_red_black_tree_get(c: &mut Criterion) {
    let keys = random_keys();
    let tree = keys.iter().cloned().collect::<RedBlackTree<u32>>();
    c.bench_function("bench red_black_tree get", move |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.get(key));
            }
        })
    });
}

fn bench_red_black_tree_delete(c: &mut Criterion) {
    let keys = random_keys();
    c.bench_function("bench red_black_tree delete", move |b| {
        b.iter(|| {
            let mut tree = keys.iter().cloned().collect::<RedBlackTree<u32>>();
            for key in &keys {
                black_box(tree.delete(key));
            }
        })
    });
}

fn bench_red_black_tree_linearize(c: &mut Criterion) {
    let tree = random_keys().into_iter().collect::<RedBlackTree<u32>>();
    c.bench_function("bench red_black_tree linearize", move |b| {
        b.iter(|| black_box(tree.linearize().len()))
    });
}

criterion_group!(
    benches,
    bench_btreeset_insert,
    bench_btreeset_get,
    bench_red_black_tree_insert,
    bench_red_black_tree_get,
    bench_red_black_tree_delete,
    bench_red_black_tree_linearize
);
criterion_main!(benches);
