//! Properties of size functions, space unification and placement

use gofish_layout::layout::space::{unify_align, unify_layered, unify_stack};
use gofish_layout::layout::{
    data, layout, Alignment, Axis, Interval, InverseOptions, LayoutConfig, Monotonic, Node, Rect, RenderContext,
    SceneGraph, Spread, UnderlyingSpace,
};
use gofish_layout::Palette;
use pretty_assertions::assert_eq;

const TOLERANCE: f64 = 1e-3;

fn permutations(spaces: &[UnderlyingSpace]) -> Vec<Vec<&UnderlyingSpace>> {
    let n = spaces.len();
    (0..n)
        .map(|shift| (0..n).map(|i| &spaces[(i + shift) % n]).collect())
        .chain(std::iter::once(spaces.iter().rev().collect()))
        .collect()
}

#[test]
fn test_linear_inverse_is_exact() {
    let f = Monotonic::linear(3.0, 2.0);
    let inv = f.inverse(20.0, &InverseOptions::default()).unwrap();
    assert_eq!(inv.value, 6.0);
    assert!(inv.converged);
}

#[test]
fn test_opaque_inverse_by_bisection() {
    let f = Monotonic::unknown(|x| x * x + x);
    let inv = f.inverse(12.0, &InverseOptions::default()).unwrap();
    assert!(inv.converged);
    assert!((inv.value - 3.0).abs() < TOLERANCE);
    assert!((f.run(inv.value) - 12.0).abs() < 1e-4);
}

#[test]
fn test_inverse_grows_bracket() {
    let f = Monotonic::unknown(|x| x);
    let options = InverseOptions::default().with_upper_bound_guess(1.0);
    let inv = f.inverse(500.0, &options).unwrap();
    assert!(inv.converged);
    assert!((inv.value - 500.0).abs() < TOLERANCE);
}

#[test]
fn test_flat_functions() {
    assert!(Monotonic::constant(5.0).inverse(10.0, &InverseOptions::default()).is_none());

    let flat = Monotonic::unknown(|_| 5.0);
    let inv = flat.inverse(10.0, &InverseOptions::default()).unwrap();
    assert!(!inv.converged);
}

#[test]
fn test_sum_and_max_stay_linear() {
    let fns = [Monotonic::linear(2.0, 1.0), Monotonic::linear(5.0, 1.0)];
    let sum = Monotonic::add(&fns).adds(4.0);
    assert!(sum.is_linear());
    assert_eq!(sum.run(2.0), 20.0);

    let max = Monotonic::max(&fns);
    assert!(max.is_linear());
    assert_eq!(max.run(2.0), 11.0);

    let mixed = Monotonic::max(&[Monotonic::linear(1.0, 0.0), Monotonic::constant(3.0)]);
    assert!(!mixed.is_linear());
    assert_eq!(mixed.run(1.0), 3.0);
    assert_eq!(mixed.run(10.0), 10.0);
}

#[test]
fn test_layered_position_is_order_independent() {
    let spaces = vec![
        UnderlyingSpace::Position(Interval::new(0.0, 4.0)),
        UnderlyingSpace::Position(Interval::new(-2.0, 3.0)),
        UnderlyingSpace::Undefined,
        UnderlyingSpace::Position(Interval::new(1.0, 9.0)),
    ];
    for order in permutations(&spaces) {
        assert_eq!(
            unify_layered(&order),
            UnderlyingSpace::Position(Interval::new(-2.0, 9.0))
        );
    }
}

#[test]
fn test_layered_ordinal_keys_are_a_set() {
    let spaces = vec![
        UnderlyingSpace::Ordinal(vec!["a".into(), "b".into()]),
        UnderlyingSpace::Position(Interval::new(0.0, 1.0)),
        UnderlyingSpace::Ordinal(vec!["b".into(), "c".into()]),
    ];
    for order in permutations(&spaces) {
        let UnderlyingSpace::Ordinal(mut keys) = unify_layered(&order) else {
            panic!("expected ordinal");
        };
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}

#[test]
fn test_align_is_order_independent() {
    let spaces = vec![
        UnderlyingSpace::Size(4.0),
        UnderlyingSpace::Size(-3.0),
        UnderlyingSpace::Size(9.0),
    ];
    for order in permutations(&spaces) {
        assert_eq!(
            unify_align(&order, Alignment::Start).space,
            UnderlyingSpace::Position(Interval::new(-3.0, 9.0))
        );
        assert_eq!(
            unify_align(&order, Alignment::Middle).space,
            UnderlyingSpace::Difference(9.0)
        );
    }
}

#[test]
fn test_stack_total_is_order_independent() {
    let spaces = vec![
        UnderlyingSpace::Size(4.0),
        UnderlyingSpace::Size(2.5),
        UnderlyingSpace::Size(1.5),
    ];
    for order in permutations(&spaces) {
        assert_eq!(
            unify_stack(&order, 0.0, vec![]),
            UnderlyingSpace::Position(Interval::new(0.0, 8.0))
        );
    }
    assert!(unify_stack(&spaces.iter().collect::<Vec<_>>(), 1.0, vec![]).is_ordinal());
}

#[test]
fn test_stack_size_matches_its_domain() {
    let mut graph = SceneGraph::new();
    let children = [2.0, 5.0, 7.0]
        .into_iter()
        .map(|h| graph.leaf(Node::new(Rect::new().width(10.0).height(data(h)))))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let root = graph
        .add(Node::new(Spread::stack(Axis::Y).spacing(3.0)), children)
        .unwrap();
    let mut cx = RenderContext::new(LayoutConfig::new().with_size(100.0, 100.0), Palette::default());
    layout(&mut graph, &mut cx, root).unwrap();

    let domains = graph.node(root).unwrap().size_domains().cloned().unwrap();
    let height = graph.intrinsic_dims(root).unwrap()[1].size.unwrap();
    assert_eq!(height, 20.0);
    assert_eq!(domains[1].run(1.0), height);
}

#[test]
fn test_placement_is_write_once() {
    let mut graph = SceneGraph::new();
    let root = graph.leaf(Node::new(Rect::new().width(4.0).height(4.0))).unwrap();
    layout(&mut graph, &mut RenderContext::default(), root).unwrap();
    let before = graph.dims(root).unwrap();

    graph.place(root, Axis::X, 999.0).unwrap();
    graph.place(root, Axis::Y, -5.0).unwrap();
    assert_eq!(graph.dims(root).unwrap(), before);
}
