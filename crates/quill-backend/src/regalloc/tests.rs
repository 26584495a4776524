use std::collections::{BTreeSet, HashSet};

use quill_common::ir::{Block, Expr, Program};
use quill_common::names::{Name, Names};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

fn read(names: &mut Names, src: &str) -> Program {
    match quill_reader::read(names, 0, src) {
        Ok(program) => program,
        Err(msgs) => panic!("test program has errors: {:?}", msgs.msgs),
    }
}

fn complete(names: &mut Names, count: usize) -> (Interference, Vec<Name>) {
    let nodes: Vec<_> = (0..count).map(|i| names.lit(format!("n{i}"))).collect();
    let mut graph = Interference::new();
    graph.add_clique(&nodes);
    (graph, nodes)
}

fn is_proper(graph: &Interference, coloring: &Coloring) -> bool {
    graph
        .edges()
        .all(|(a, b)| match (coloring.get(&a), coloring.get(&b)) {
            (Some(x), Some(y)) => x != y,
            _ => true,
        })
}

/// Every name bound or read in `block`, callees excluded.
fn all_names(block: &Block) -> Vec<Name> {
    let mut names = Vec::new();
    let mut worklist = vec![block];

    while let Some(block) = worklist.pop() {
        let exprs = block
            .stmts
            .iter()
            .inspect(|stmt| names.push(stmt.name))
            .map(|stmt| &stmt.value)
            .chain(std::iter::once(&block.tail))
            .collect::<Vec<_>>();

        for expr in exprs {
            names.extend(expr.uses());
            if let Expr::If { then, elze, .. } = expr {
                worklist.push(then.as_ref());
                worklist.push(elze.as_ref());
            }
        }
    }

    names
}

#[test]
fn single_edge_needs_two_colors() {
    let mut names = Names::new();
    let x = names.lit("x");
    let y = names.lit("y");

    let mut graph = Interference::new();
    graph.add_edge(x, y);

    assert_eq!(None, color(&graph, 1));

    let coloring = color(&graph, 2).unwrap();
    assert_ne!(coloring[&x], coloring[&y]);
}

#[test]
fn as_many_colors_as_nodes_always_suffice() {
    let mut names = Names::new();
    let (mut graph, nodes) = complete(&mut names, 4);

    let extra = names.lit("extra");
    graph.add_edge(extra, nodes[0]);
    let lonely = names.lit("lonely");
    graph.add_node(lonely);

    let coloring = color(&graph, graph.len()).unwrap();
    assert_eq!(graph.len(), coloring.len());
    assert!(is_proper(&graph, &coloring));
}

#[test]
fn equal_degrees_color_in_name_order() {
    let mut names = Names::new();
    let (graph, nodes) = complete(&mut names, 3);

    let coloring = color(&graph, 3).unwrap();
    assert_eq!(vec![0, 1, 2], nodes.iter().map(|node| coloring[node]).collect::<Vec<_>>());
}

#[test]
fn complete_graph_spills_one_node() {
    let mut names = Names::new();
    let (graph, nodes) = complete(&mut names, 5);

    assert_eq!(None, color(&graph, 4));

    let allocation = allocate(&graph, 4);
    assert_eq!(vec![nodes[0]], allocation.spilled);
    assert_eq!(4, allocation.coloring.len());
    assert!(is_proper(&graph, &allocation.coloring));
}

#[test]
fn spill_loop_terminates_without_registers() {
    let mut names = Names::new();
    let (graph, nodes) = complete(&mut names, 3);

    let allocation = allocate(&graph, 0);
    assert_eq!(nodes, allocation.spilled);
    assert!(allocation.coloring.is_empty());

    assert_eq!(Allocation::default(), allocate(&Interference::new(), 0));
}

#[test]
fn removing_a_node_removes_its_edges() {
    let mut names = Names::new();
    let (mut graph, nodes) = complete(&mut names, 3);

    graph.remove(&nodes[1]);

    assert!(!graph.contains(&nodes[1]));
    assert_eq!(1, graph.degree(&nodes[0]));
    assert_eq!(vec![(nodes[0], nodes[2])], graph.edges().collect::<Vec<_>>());
}

#[test]
fn unused_bindings_are_discarded() {
    let mut names = Names::new();
    let mut program = read(&mut names, "main = let x = 1 in let y = 2 in y");
    let globals = program.global_names();

    let live = liveness(names.discard(), &globals, &mut program.entry.body);

    let x = names.lit("x");
    assert_eq!(1, live.dead);
    assert_eq!(names.discard(), program.entry.body.stmts[0].name);
    assert!(!live.graph.contains(&x));
    assert!(!live.graph.contains(&names.discard()));
}

#[test]
fn dead_bindings_still_read_their_operands() {
    let src = "main =
  let x = 1 in
  let y = 2 in
  let _ = extern print(x) in
  y";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let globals = program.global_names();

    let live = liveness(names.discard(), &globals, &mut program.entry.body);

    let x = names.lit("x");
    let y = names.lit("y");
    assert_eq!(0, live.dead);
    assert!(live.graph.interferes(&x, &y));
}

#[test]
fn globals_are_not_part_of_the_graph() {
    let src = "global g = 1
fun f(a) = add a g
main =
  let x = add g g in
  let r = f(x) in
  r";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let globals = program.global_names();

    let live = liveness(names.discard(), &globals, &mut program.entry.body);

    let [f, g, x, r] = ["f", "g", "x", "r"].map(|text| names.lit(text));
    assert!(!live.graph.contains(&f));
    assert!(!live.graph.contains(&g));
    assert!(live.graph.contains(&x));
    assert!(live.graph.contains(&r));
    assert!(live.live_in.is_empty());
}

#[test]
fn arguments_dead_after_a_call_do_not_interfere_with_later_names() {
    let src = "fun f(a, b) = sub a b
main =
  let x = 1 in
  let y = 2 in
  let r = f(x, y) in
  let z = neg r in
  add z y";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let globals = program.global_names();

    let live = liveness(names.discard(), &globals, &mut program.entry.body);

    let [x, y, z] = ["x", "y", "z"].map(|text| names.lit(text));
    assert!(!live.graph.interferes(&x, &z));
    assert!(live.graph.interferes(&x, &y));
    assert!(live.graph.interferes(&z, &y));
}

#[test]
fn conditionals_merge_both_branches() {
    let src = "main =
  let a = 1 in
  let b = 2 in
  let c = 3 in
  if a < b then c else neg a";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let globals = program.global_names();

    let live = liveness(names.discard(), &globals, &mut program.entry.body);

    let [a, b, c] = ["a", "b", "c"].map(|text| names.lit(text));
    assert!(live.graph.interferes(&a, &b));
    assert!(live.graph.interferes(&a, &c));
    assert!(live.graph.interferes(&b, &c));
}

#[test]
fn unread_parameters_are_cleared() {
    let src = "fun f(a, b) = a
main =
  let x = 1 in
  let y = 2 in
  f(x, y)";

    let mut names = Names::new();
    let mut program = read(&mut names, src);

    let constraints = Constraints {
        shuffle: false,
        ..Default::default()
    };
    regalloc(&mut names, &constraints, StdRng::seed_from_u64(0), &mut program).unwrap();

    let params = &program.functions[0].params;
    assert!(names.register_index(&params[0]).is_some());
    assert_eq!(names.discard(), params[1]);
}

#[test]
fn renamed_names_are_registers_spills_globals_or_discards() {
    let src = "global limit = 10
fun f(a, b) =
  let c = sub a b in
  let d = mul c a in
  let e = add d b in
  e
main =
  let x = 1 in
  let y = 2 in
  let u = 3 in
  let unused = add x y in
  let w = if x < limit then add x u else f(y, u) in
  let r = f(x, y) in
  let z = neg r in
  tuple(z, y, w, u)";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let constraints = Constraints {
        registers: 2,
        ..Default::default()
    };

    let graphs = interference_graphs(&names, &constraints, &program).unwrap();
    let spilled: HashSet<Name> = graphs
        .iter()
        .flat_map(|unit| unit.allocation.spilled.iter().copied())
        .collect();
    assert!(!spilled.is_empty());

    let globals = program.global_names();
    let report =
        regalloc(&mut names, &constraints, StdRng::seed_from_u64(3), &mut program).unwrap();
    assert_eq!(spilled.len(), report.spills.total());

    for unit in program.units() {
        let renamed = unit.params.iter().copied().chain(all_names(unit.body));
        for name in renamed {
            assert!(
                names.register_index(&name).is_some()
                    || spilled.contains(&name)
                    || globals.contains(&name)
                    || names.is_discard(&name),
                "`{}` was not renamed",
                names.text(&name)
            );
        }
    }
}

#[test]
fn spill_counts_are_reported_per_unit() {
    let src = "fun f(a, b) = sub a b
main =
  let x = 1 in
  let y = 2 in
  let r = f(x, y) in
  let z = neg r in
  add z y";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let constraints = Constraints {
        registers: 2,
        ..Default::default()
    };

    let report =
        regalloc(&mut names, &constraints, StdRng::seed_from_u64(0), &mut program).unwrap();

    let f = names.lit("f");
    let main = names.lit("main");
    assert_eq!(Some(0), report.spills.get(&f));
    assert_eq!(Some(1), report.spills.get(&main));

    // `y` has the most interferences and is the one left in memory.
    let y = names.lit("y");
    assert!(all_names(&program.entry.body).contains(&y));
}

#[test]
fn malformed_programs_are_refused() {
    let mut names = Names::new();
    let mut program = read(&mut names, "fun f(a) = a\nmain = let x = 1 in f(x, x)");

    let result = regalloc(
        &mut names,
        &Constraints::default(),
        StdRng::seed_from_u64(0),
        &mut program,
    );
    assert!(result.is_err());
}

#[test]
#[should_panic(expected = "internal compiler error")]
fn shared_registers_among_interfering_names_are_caught() {
    let mut names = Names::new();
    let x = names.lit("x");
    let y = names.lit("y");
    let registers = Registers::new(&mut names, 2);

    let mut graph = Interference::new();
    graph.add_edge(x, y);

    let allocation = Allocation {
        coloring: Coloring::from([(x, 1), (y, 1)]),
        spilled: Vec::new(),
    };

    Applier::new(&registers, names.discard(), &allocation).check_consistency(&graph);
}

#[test]
fn parameterless_functions_are_never_shuffled() {
    let src = "fun f() = 1
fun g() = 2
main =
  let x = f() in
  let y = g() in
  add x y";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let constraints = Constraints {
        shuffle: false,
        ..Default::default()
    };
    regalloc(&mut names, &constraints, StdRng::seed_from_u64(0), &mut program).unwrap();

    let before = program.clone();
    let registers = Registers::new(&mut names, constraints.registers);
    let mut shuffler = Shuffler::new(&registers, &mut program, StdRng::seed_from_u64(1));

    for _ in 0..20 {
        assert_eq!(Trial::Skipped, shuffler.trial());
    }

    let stats = shuffler.run(50);
    assert_eq!(70, stats.trials);
    assert_eq!(0, stats.accepted);
    assert_eq!(before, program);
}

const CALLS: &str = "fun f(a, b) = sub a b
fun g(p, q) =
  let r = f(q, p) in
  let s = f(p, r) in
  add r s
main =
  let x = 1 in
  let y = 2 in
  let s = g(y, x) in
  let t = f(x, y) in
  let u = g(t, s) in
  tuple(s, t, u)";

#[test]
fn move_cost_never_increases() {
    let mut names = Names::new();
    let mut program = read(&mut names, CALLS);
    let constraints = Constraints {
        registers: 4,
        shuffle: false,
        ..Default::default()
    };
    regalloc(&mut names, &constraints, StdRng::seed_from_u64(0), &mut program).unwrap();

    let registers = Registers::new(&mut names, constraints.registers);
    let mut shuffler = Shuffler::new(&registers, &mut program, StdRng::seed_from_u64(7));

    let mut cost = shuffler.cost();
    for _ in 0..500 {
        let trial = shuffler.trial();
        let next = shuffler.cost();

        assert!(next <= cost);
        assert_eq!(trial == Trial::Improved, next < cost);
        cost = next;
    }
    drop(shuffler);

    assert_eq!(cost, move_cost(&registers, &program));
}

#[test]
fn swaps_line_up_crossed_arguments() {
    let src = "fun f(a, b) = sub a b
main =
  let x = 1 in
  let y = 2 in
  let r = f(y, x) in
  tuple(r, x, y)";

    let mut names = Names::new();
    let mut program = read(&mut names, src);
    let constraints = Constraints {
        registers: 4,
        shuffle: false,
        ..Default::default()
    };
    regalloc(&mut names, &constraints, StdRng::seed_from_u64(0), &mut program).unwrap();

    // `x` and `a` share %r0, `y` and `b` share %r1, so both arguments move.
    let registers = Registers::new(&mut names, constraints.registers);
    assert_eq!(2, move_cost(&registers, &program));

    let stats = Shuffler::new(&registers, &mut program, StdRng::seed_from_u64(1)).run(200);

    assert_eq!(2, stats.initial_cost);
    assert_eq!(0, stats.final_cost);
    assert!(stats.accepted > 0);
    assert!(stats.trials > 200);
    assert_eq!(0, move_cost(&registers, &program));
    assert_eq!(
        vec![registers.register(1), registers.register(0)],
        program.functions[0].params
    );
}

#[test]
fn shuffling_is_reproducible() {
    let run = |seed| {
        let mut names = Names::new();
        let mut program = read(&mut names, CALLS);
        let constraints = Constraints {
            registers: 4,
            patience: 200,
            shuffle: true,
        };

        let report = regalloc(
            &mut names,
            &constraints,
            StdRng::seed_from_u64(seed),
            &mut program,
        )
        .unwrap();
        (report.moves, program)
    };

    let (stats, program) = run(42);
    let stats = stats.unwrap();

    assert!(stats.final_cost <= stats.initial_cost);
    assert!(stats.trials >= 200);
    assert_eq!((Some(stats), program), run(42));
}

#[test]
fn default_constraints() {
    let constraints = Constraints::default();

    assert_eq!(24, constraints.registers);
    assert_eq!(1000, constraints.patience);
    assert!(constraints.shuffle);
}

#[test]
fn registers_are_interned_once() {
    let mut names = Names::new();
    let first = Registers::new(&mut names, 3);
    let second = Registers::new(&mut names, 3);

    let expected: BTreeSet<_> = first.iter().collect();
    assert_eq!(expected, second.iter().collect::<BTreeSet<_>>());
    assert_eq!(Some(2), first.index_of(&first.register(2)));
    assert_eq!("%r1", names.text(&second.register(1)));
}
