extern crate rand;
extern crate rubytree;

use rand::Rng;
use rubytree::RubyTree;

#[test]
fn test_random_membership() {
    let mut rng = rand::thread_rng();
    let mut tree = RubyTree::new();
    let mut expected: Vec<u32> = Vec::new();

    for _ in 0..100_000 {
        if !expected.is_empty() && rng.gen_range(0, 3) == 0 {
            let index = rng.gen_range(0, expected.len());
            let value = expected.swap_remove(index);
            assert_eq!(tree.remove(&value), Some(value));
        } else {
            let value = rng.gen_range(0u32, 1000);
            tree.insert(value);
            expected.push(value);
        }

        assert_eq!(tree.len(), expected.len());
    }

    for value in &expected {
        assert!(tree.contains(value));
    }
    for value in 0..1000 {
        assert_eq!(tree.contains(&value), expected.contains(&value));
    }
}

#[test]
fn test_drain_to_empty() {
    let mut rng = rand::thread_rng();
    let mut tree = RubyTree::new();
    let mut expected: Vec<u32> = Vec::new();

    for _ in 0..10_000 {
        let value = rng.gen::<u32>();
        tree.insert(value);
        expected.push(value);
    }

    while !expected.is_empty() {
        let index = rng.gen_range(0, expected.len());
        let value = expected.swap_remove(index);
        assert_eq!(tree.remove(&value), Some(value));
    }

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
}
