use itertools::Itertools;
use propsat::sat::assignment::Valuation;
use propsat::sat::cnf::Cnf;
use propsat::sat::dpll::SatSolver;
use propsat::sat::solver::{Phase, Solution, Solver, SolverConfig, VariableOrder};
use propsat::sat::theory::Theory;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn clause(ns: &[i64]) -> String {
    ns.iter().join(" ")
}

fn theory<S: AsRef<str>>(clauses: &[S]) -> Theory {
    Theory::parse(clauses).unwrap()
}

/// Solves `clauses` and checks the answer, and for a satisfiable result that
/// the valuation covers every variable and satisfies every clause.
fn check<S: AsRef<str>>(expect_sat: bool, clauses: &[S]) -> Solution {
    init();
    let t = theory(clauses);
    let cnf = t.to_cnf();
    let num_vars = t.num_vars();

    let solution = SatSolver::new(t).solve();
    assert_eq!(solution.is_sat(), expect_sat, "{cnf}");

    if let Some(valuation) = solution.valuation() {
        assert_eq!(valuation.len(), num_vars, "valuation is not total");
        for c in &cnf {
            assert!(c.is_satisfied_by(valuation), "clause {c} is not satisfied by {valuation}");
        }
    }
    solution
}

fn true_chain(n: i64) -> Vec<String> {
    let mut cnf = vec![clause(&[1, 2]), clause(&[-n, -1])];
    cnf.extend((0..n).map(|i| clause(&[-i, i + 1])));
    cnf
}

fn false_chain(n: i64) -> Vec<String> {
    let mut cnf = vec![clause(&[1, 2]), clause(&[-n, -2])];
    cnf.extend((0..n).map(|i| clause(&[-i, i + 1])));
    cnf
}

/// `n` queens on an `n`×`n` board, variable `r*n + c + 1` for row `r`, column `c`.
fn queens(n: i64) -> Vec<String> {
    let var = |r: i64, c: i64| r * n + c + 1;
    let squares = (0..n).cartesian_product(0..n).collect_vec();

    let mut cnf = (0..n)
        .map(|r| clause(&(0..n).map(|c| var(r, c)).collect_vec()))
        .collect_vec();

    for (&(r1, c1), &(r2, c2)) in squares.iter().tuple_combinations() {
        let attacks = r1 == r2 || c1 == c2 || (r1 - r2).abs() == (c1 - c2).abs();
        if attacks {
            cnf.push(clause(&[-var(r1, c1), -var(r2, c2)]));
        }
    }
    cnf
}

fn brute_force_sat(cnf: &Cnf) -> bool {
    let vars = cnf.vars().into_iter().collect_vec();
    (0..1u64 << vars.len()).any(|bits| {
        let v: Valuation = vars
            .iter()
            .enumerate()
            .map(|(i, &n)| (n, bits >> i & 1 == 1))
            .collect();
        cnf.verify(&v)
    })
}

#[test]
fn test_trivial() {
    check::<&str>(true, &[]);
    check(false, &[""]);
    check(false, &["", "p"]);
}

#[test]
fn test_single_clauses() {
    let solution = check(true, &["a"]);
    assert_eq!(solution.valuation().unwrap().get("a"), Some(true));

    let solution = check(true, &["-a"]);
    assert_eq!(solution.valuation().unwrap().get("a"), Some(false));

    check(false, &["a", "-a"]);
    check(true, &["a b"]);
    check(true, &["a", "b"]);
}

#[test]
fn test_forced_by_unit() {
    let solution = check(true, &["a b c", "-b"]);
    let v = solution.valuation().unwrap();
    assert_eq!(v.get("b"), Some(false));
    assert!(v.get("a") == Some(true) || v.get("c") == Some(true));
}

#[test]
fn test_chain() {
    let solution = check(true, &["-a b", "-b c", "-c d", "-d e", "a"]);
    assert_eq!(solution.valuation().unwrap().to_string(), "a b c d e");
    check(false, &["-a b", "-b c", "-c d", "-d e", "a", "-e"]);
}

#[test]
fn test_long_clause_with_units() {
    check(true, &["p q r s t u v", "-p", "-q", "-r", "-s", "-t", "-u"]);
    check(false, &["p q r s t u v", "-p", "-q", "-r", "-s", "-t", "-u", "-v"]);
}

#[test]
fn test_kim_jim_sarah() {
    let base = ["-kim -sarah", "-jim kim", "-sarah jim", "kim jim sarah"];
    let with = |extra: &'static str| base.iter().copied().chain([extra]).collect_vec();

    check(true, &base);
    check(false, &with("-kim"));
    check(false, &with("sarah"));
    check(true, &with("-jim"));
    check(true, &with("jim"));
}

#[test]
fn test_implication_chains() {
    for n in [4, 20] {
        check(true, &true_chain(n));
        check(false, &false_chain(n));
    }
}

#[test]
fn test_queens() {
    check(false, &queens(3));
    let solution = check(true, &queens(4));
    assert_eq!(solution.valuation().unwrap().iter().filter(|(_, b)| *b).count(), 4);
}

#[test]
fn test_random_3sat_agrees_with_brute_force() {
    init();
    let mut rng = fastrand::Rng::with_seed(20);

    for _ in 0..60 {
        let clauses = (0..rng.usize(10..40))
            .map(|_| {
                let lits = (0..3)
                    .map(|_| {
                        let v = rng.i64(1..=10);
                        if rng.bool() { v } else { -v }
                    })
                    .collect_vec();
                clause(&lits)
            })
            .collect_vec();

        let expected = brute_force_sat(&Cnf::parse(&clauses).unwrap());
        check(expected, &clauses);
    }
}

#[test]
fn test_configurations_agree() {
    let problems = [queens(4), queens(3), false_chain(6), true_chain(6)];
    let configs = [
        SolverConfig::default(),
        SolverConfig {
            phase: Phase(false),
            ..SolverConfig::default()
        },
        SolverConfig {
            variable_order: VariableOrder::Random { seed: 1 },
            ..SolverConfig::default()
        },
        SolverConfig {
            variable_order: VariableOrder::Random { seed: 99 },
            phase: Phase(false),
        },
    ];

    for problem in &problems {
        let expected = SatSolver::new(theory(problem)).solve().is_sat();
        for config in configs {
            let t = theory(problem);
            let cnf = t.to_cnf();
            let solution = SatSolver::with_config(t, config).solve();
            assert_eq!(solution.is_sat(), expected, "{config:?}");
            if let Some(v) = solution.valuation() {
                assert!(cnf.verify(v));
            }
        }
    }
}

#[test]
fn test_stats_on_unsat() {
    let mut solver = SatSolver::new(theory(&queens(3)));
    assert_eq!(solver.solve(), Solution::Unsatisfiable);

    let stats = solver.stats();
    assert!(stats.decisions > 0);
    assert!(stats.conflicts > 0);
    assert!(stats.backtracks <= stats.decisions);
}
