use log::LevelFilter;
use rand::Rng;
use rb_collections::red_black_tree::RedBlackTree;
use simplelog::{Config, TestLogger};

const NUM_OF_KEYS: u32 = 1000;
const NUM_OF_OPERATIONS: usize = 10_000;

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

fn seeded_rng() -> rand::XorShiftRng {
    rand::SeedableRng::from_seed([1, 1, 1, 1])
}

fn shuffled_keys(rng: &mut rand::XorShiftRng) -> Vec<u32> {
    let mut keys = (0..NUM_OF_KEYS).collect::<Vec<u32>>();
    rng.shuffle(&mut keys);
    keys
}

fn linearized(tree: &RedBlackTree<u32>) -> Vec<u32> {
    tree.linearize().into_iter().cloned().collect()
}

#[test]
fn int_test_insert_shuffled() {
    init_logging();
    let mut rng = seeded_rng();
    let mut tree = RedBlackTree::new();

    for key in shuffled_keys(&mut rng) {
        tree.insert(key);
        assert!(tree.check_invariants().is_ok());
    }

    assert_eq!(tree.len(), NUM_OF_KEYS as usize);
    assert_eq!(linearized(&tree), (0..NUM_OF_KEYS).collect::<Vec<u32>>());
    assert_eq!(tree.min(), Some(&0));
    assert_eq!(tree.max(), Some(&(NUM_OF_KEYS - 1)));
}

#[test]
fn int_test_get() {
    init_logging();
    let mut rng = seeded_rng();
    let tree = shuffled_keys(&mut rng)
        .into_iter()
        .collect::<RedBlackTree<u32>>();

    for key in &[1u32, 2, 369, 500, 256, 978, 999] {
        assert_eq!(tree.get(key), Some(key));
        assert!(tree.contains(key));
    }
    assert_eq!(tree.get(&1259), None);
    assert!(!tree.contains(&1259));
}

#[test]
fn int_test_delete_contiguous_range() {
    init_logging();
    let mut rng = seeded_rng();
    let keys = shuffled_keys(&mut rng);
    let mut tree = keys.iter().cloned().collect::<RedBlackTree<u32>>();
    let mut expected = (0..NUM_OF_KEYS).collect::<Vec<u32>>();

    let start = rng.gen_range(0, keys.len());
    let end = rng.gen_range(start, keys.len() + 1);
    for key in &keys[start..end] {
        assert_eq!(tree.delete(key), Some(*key));
        let index = expected
            .binary_search(key)
            .expect("Expected key to be present.");
        expected.remove(index);

        assert!(tree.check_invariants().is_ok());
        assert_eq!(linearized(&tree), expected);
        assert_eq!(tree.get(key), None);
    }
    assert_eq!(tree.len(), expected.len());
}

#[test]
fn int_test_delete_everything() {
    init_logging();
    let mut rng = seeded_rng();
    let keys = shuffled_keys(&mut rng);
    let mut tree = keys.iter().cloned().collect::<RedBlackTree<u32>>();

    for key in shuffled_keys(&mut rng) {
        assert_eq!(tree.delete(&key), Some(key));
        assert!(tree.check_invariants().is_ok());
    }
    assert!(tree.is_empty());
    assert!(tree.linearize().is_empty());
}

#[test]
fn int_test_delete_absent_is_idempotent() {
    init_logging();
    let mut rng = seeded_rng();
    let mut tree = shuffled_keys(&mut rng)
        .into_iter()
        .filter(|key| key % 2 == 0)
        .collect::<RedBlackTree<u32>>();
    let before = linearized(&tree);

    for key in (1..NUM_OF_KEYS).step_by(2) {
        assert_eq!(tree.delete(&key), None);
    }
    assert_eq!(tree.delete(&NUM_OF_KEYS), None);

    assert_eq!(linearized(&tree), before);
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn int_test_random_operations_with_duplicates() {
    init_logging();
    let mut rng = seeded_rng();
    let mut tree = RedBlackTree::new();
    let mut expected: Vec<u32> = Vec::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.gen_range(0, 100);
        if rng.gen_range(0, 3) < 2 {
            let had_key = expected.binary_search(&key).is_ok();
            tree.insert(key);
            let index = match expected.binary_search(&key) {
                Ok(index) | Err(index) => index,
            };
            expected.insert(index, key);
            if !had_key {
                assert_eq!(tree.get(&key), Some(&key));
            }
        } else {
            let removed = tree.delete(&key);
            match expected.binary_search(&key) {
                Ok(index) => {
                    expected.remove(index);
                    assert_eq!(removed, Some(key));
                },
                Err(_) => assert_eq!(removed, None),
            }
            if expected.binary_search(&key).is_err() {
                assert_eq!(tree.get(&key), None);
            }
        }

        let black_height = tree
            .check_invariants()
            .expect("Expected red black invariants to hold.");
        assert!(tree.is_empty() || black_height > 0);
        assert_eq!(tree.len(), expected.len());
    }

    assert_eq!(linearized(&tree), expected);
    assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), expected);
    assert_eq!(tree.into_iter().collect::<Vec<u32>>(), expected);
}

#[test]
fn int_test_linearize_is_repeatable() {
    init_logging();
    let mut rng = seeded_rng();
    let tree = shuffled_keys(&mut rng)
        .into_iter()
        .collect::<RedBlackTree<u32>>();

    let first = linearized(&tree);
    let second = linearized(&tree);
    assert_eq!(first, second);
    assert_eq!(tree.len(), NUM_OF_KEYS as usize);
}

#[test]
fn int_test_black_height_is_logarithmic() {
    init_logging();
    let tree = (0..(1 << 16)).collect::<RedBlackTree<u32>>();
    let black_height = tree
        .check_invariants()
        .expect("Expected red black invariants to hold.");

    // n >= 2^bh - 1
    assert!(black_height <= 17);
    assert!(black_height >= 8);
}
