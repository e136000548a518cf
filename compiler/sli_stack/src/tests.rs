use super::*;

enum Nested {
    Leaf,
    Node(Box<Nested>),
}

fn depth(n: &Nested) -> usize {
    ensure_sufficient_stack(|| match n {
        Nested::Leaf => 0,
        Nested::Node(inner) => depth(inner) + 1,
    })
}

#[test]
fn test_returns_closure_result() {
    assert_eq!(ensure_sufficient_stack(|| 42), 42);
}

#[test]
fn test_deeply_nested_structure_walk() {
    // 100k levels of nesting would overflow a typical 8MB stack
    let mut value = Nested::Leaf;
    for _ in 0..100_000 {
        value = Nested::Node(Box::new(value));
    }
    assert_eq!(depth(&value), 100_000);

    // Drop iteratively so the test does not overflow on destruction.
    let mut current = value;
    while let Nested::Node(inner) = current {
        current = *inner;
    }
}
